//! Rule synthesis
//!
//! Enumerates every legal matcher --> replacer pairing of a [`Taxonomy`],
//! binds operand kinds to slots, and groups the results under their rule
//! keys. The output is a pure function of the taxonomy: operators, kinds and
//! keys are all iterated in a fixed order.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::error::TaxonomyError;
use crate::operand::{Operand, OperandKind, OperandTypeSet};
use crate::resolver::resolve;
use crate::taxonomy::{Op, Taxonomy, INCDEC, P_INCDEC};

/// Separates the match side from the replace side of a rule name
pub const MATCH_REPLACE_SEP: char = '!';
/// Stands in for `,`, `(` and `)` inside a rule name
pub const OPERAND_SEP: char = '$';

/// `op` or `op(a, b, ...)`
fn render(op: Op, operands: &[Operand]) -> String {
    if operands.is_empty() {
        return op.token().to_string();
    }
    let args: Vec<String> = operands.iter().map(ToString::to_string).collect();
    format!("{}({})", op, args.join(", "))
}

fn encode_side(expr: &str) -> String {
    expr.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            ',' | '(' | ')' => OPERAND_SEP,
            other => other,
        })
        .collect()
}

/// Canonical identifier of one matcher/replacer binding,
/// e.g. `ADD$@1$@2$!MUL$@1$@2$`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleName(String);

impl RuleName {
    pub fn encode(key: &RuleKey, replacer: Op, operands: &[Operand]) -> Self {
        let mut name = encode_side(&key.to_string());
        name.push(MATCH_REPLACE_SEP);
        name.push_str(&encode_side(&render(replacer, operands)));
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A matcher bound to concrete, slot-tagged operand kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub matcher: Op,
    pub operands: Vec<Operand>,
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self.matcher, &self.operands))
    }
}

/// One replacement for a rule key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: RuleName,
    pub replacer: Op,
    pub operands: Vec<Operand>,
}

impl Rule {
    /// Replacer expression as written in the configuration, e.g. `MUL(@1, @2)`
    pub fn expression(&self) -> String {
        render(self.replacer, &self.operands)
    }
}

/// All replacements accumulated for one key, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    pub key: RuleKey,
    pub rules: Vec<Rule>,
}

/// The synthesized rule set, ordered by matcher then key text
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn rules(&self) -> impl Iterator<Item = (&RuleKey, &Rule)> {
        self.groups
            .iter()
            .flat_map(|g| g.rules.iter().map(move |r| (&g.key, r)))
    }

    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    pub fn groups_for(&self, matcher: Op) -> impl Iterator<Item = &RuleGroup> {
        self.groups.iter().filter(move |g| g.key.matcher == matcher)
    }

    pub fn find(&self, name: &str) -> Option<(&RuleKey, &Rule)> {
        self.rules().find(|(_, r)| r.name.as_str() == name)
    }

    /// Number of rules per matcher
    pub fn counts_by_matcher(&self) -> BTreeMap<Op, usize> {
        let mut counts = BTreeMap::new();
        for group in &self.groups {
            *counts.entry(group.key.matcher).or_insert(0) += group.rules.len();
        }
        counts
    }
}

/// Operand-less matchers, each with its own replacement idiom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullaryMatcher {
    /// `@ --> ABS(@)`
    ArithExpr,
    /// `C --> C + k`, `C --> 0`
    ArithConst,
    /// `V --> ++V`, ...
    ArithVar,
    /// `A --> NULL`
    AddressExpr,
    /// `P --> ++P`, ...
    PointerVar,
    /// Statement deletion or trap
    Stmt,
    /// Same as `Stmt`, for return/break/continue
    ReturnBreakContinue,
    /// Argument shuffle, callee substitution
    Call,
    /// Case-destination shuffle, case removal
    Switch,
}

impl NullaryMatcher {
    pub fn of(op: Op) -> Option<Self> {
        match op {
            Op::ArithExpr => Some(Self::ArithExpr),
            Op::ArithConst => Some(Self::ArithConst),
            Op::ArithVar => Some(Self::ArithVar),
            Op::AddressExpr => Some(Self::AddressExpr),
            Op::PointerVar => Some(Self::PointerVar),
            Op::Stmt => Some(Self::Stmt),
            Op::ReturnBreakContinue => Some(Self::ReturnBreakContinue),
            Op::Call => Some(Self::Call),
            Op::Switch => Some(Self::Switch),
            _ => None,
        }
    }

    pub fn op(self) -> Op {
        match self {
            Self::ArithExpr => Op::ArithExpr,
            Self::ArithConst => Op::ArithConst,
            Self::ArithVar => Op::ArithVar,
            Self::AddressExpr => Op::AddressExpr,
            Self::PointerVar => Op::PointerVar,
            Self::Stmt => Op::Stmt,
            Self::ReturnBreakContinue => Op::ReturnBreakContinue,
            Self::Call => Op::Call,
            Self::Switch => Op::Switch,
        }
    }
}

/// Accumulates the rules of a single matcher, grouped by key text
struct Emitter<'t> {
    taxonomy: &'t Taxonomy,
    matcher: Op,
    groups: BTreeMap<String, RuleGroup>,
}

impl<'t> Emitter<'t> {
    fn new(taxonomy: &'t Taxonomy, matcher: Op) -> Self {
        Self {
            taxonomy,
            matcher,
            groups: BTreeMap::new(),
        }
    }

    fn emit(
        &mut self,
        key_operands: Vec<Operand>,
        replacer: Op,
        operands: Vec<Operand>,
    ) -> Result<(), TaxonomyError> {
        if !self.taxonomy.allows(self.matcher, replacer) {
            return Err(TaxonomyError::ForbiddenPair {
                matcher: self.matcher.to_string(),
                replacer: replacer.to_string(),
            });
        }

        let key = RuleKey {
            matcher: self.matcher,
            operands: key_operands,
        };
        let name = RuleName::encode(&key, replacer, &operands);
        let group = self
            .groups
            .entry(key.to_string())
            .or_insert_with(|| RuleGroup {
                key,
                rules: Vec::new(),
            });
        group.rules.push(Rule {
            name,
            replacer,
            operands,
        });
        Ok(())
    }

    fn finish(self) -> Vec<RuleGroup> {
        self.groups.into_values().collect()
    }
}

/// Enumerates all rules of a taxonomy
#[derive(Debug, Clone, Copy)]
pub struct RuleSynthesizer<'t> {
    taxonomy: &'t Taxonomy,
}

impl<'t> RuleSynthesizer<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Synthesize the full rule set and check that rule names are unique
    pub fn synthesize(&self) -> Result<RuleSet, TaxonomyError> {
        let mut groups = Vec::new();
        for matcher in self.taxonomy.matchers() {
            let matcher_groups = self.synthesize_matcher(matcher)?;
            debug!(
                matcher = %matcher,
                keys = matcher_groups.len(),
                rules = matcher_groups.iter().map(|g| g.rules.len()).sum::<usize>(),
                "synthesized matcher"
            );
            groups.extend(matcher_groups);
        }

        let set = RuleSet { groups };
        check_unique_names(&set)?;
        info!(
            keys = set.groups().len(),
            rules = set.rule_count(),
            "rule synthesis complete"
        );
        Ok(set)
    }

    /// Rules for one matcher, grouped by key
    pub fn synthesize_matcher(&self, matcher: Op) -> Result<Vec<RuleGroup>, TaxonomyError> {
        let mut emitter = Emitter::new(self.taxonomy, matcher);
        if self.taxonomy.format(matcher).is_empty() {
            let nullary = NullaryMatcher::of(matcher).ok_or_else(|| {
                TaxonomyError::UnhandledNullaryMatcher {
                    op: matcher.to_string(),
                }
            })?;
            self.expand_nullary(nullary, &mut emitter)?;
        } else {
            self.expand_with_operands(matcher, &mut emitter)?;
        }
        Ok(emitter.finish())
    }

    fn expand_nullary(&self, nullary: NullaryMatcher, emitter: &mut Emitter<'_>) -> Result<(), TaxonomyError> {
        let op = nullary.op();
        let constants = self.taxonomy.constants();
        let allowed: Vec<Op> = self.taxonomy.rules_allowed(op).collect();

        match nullary {
            NullaryMatcher::ArithExpr => {
                if allowed.contains(&Op::Abs) {
                    emitter.emit(vec![], Op::Abs, vec![Operand::bare(OperandKind::ArithExpr)])?;
                }
            }
            NullaryMatcher::ArithConst => {
                for k in constants.scalar_constants.iter() {
                    emitter.emit(
                        vec![],
                        Op::Add,
                        vec![
                            Operand::bare(OperandKind::ArithConst),
                            Operand::bare(k.clone()),
                        ],
                    )?;
                }
                emitter.emit(vec![], Op::ConstVal, vec![Operand::bare(constants.zero())])?;
            }
            NullaryMatcher::ArithVar | NullaryMatcher::PointerVar => {
                let (kind, forms) = if nullary == NullaryMatcher::ArithVar {
                    (OperandKind::ArithVar, INCDEC)
                } else {
                    (OperandKind::PointerVar, P_INCDEC)
                };
                for rep in allowed.iter().filter(|r| forms.contains(r)) {
                    emitter.emit(vec![], *rep, vec![Operand::bare(kind.clone())])?;
                }
            }
            NullaryMatcher::AddressExpr => {
                if allowed.contains(&Op::ConstVal) {
                    emitter.emit(vec![], Op::ConstVal, vec![Operand::bare(constants.zero())])?;
                }
            }
            NullaryMatcher::Stmt | NullaryMatcher::ReturnBreakContinue => {
                for rep in allowed {
                    if !self.taxonomy.format(rep).is_empty() {
                        return Err(TaxonomyError::InvalidExpansion {
                            matcher: op.to_string(),
                            replacer: rep.to_string(),
                            reason: "statement matchers only take operand-less replacers".to_string(),
                        });
                    }
                    emitter.emit(vec![], rep, vec![])?;
                }
            }
            NullaryMatcher::Call => {
                for rep in allowed {
                    match rep {
                        Op::ShuffleArgs => {
                            emit_counters(emitter, rep, &constants.shuffle_counters)?;
                        }
                        Op::NewCallee => {
                            self.expand_new_callee(op, emitter, &constants.callee_names)?;
                        }
                        _ => debug!(matcher = %op, replacer = %rep, "no call-site expansion"),
                    }
                }
            }
            NullaryMatcher::Switch => {
                for rep in allowed {
                    match rep {
                        Op::ShuffleCasesDests => {
                            emit_counters(emitter, rep, &constants.shuffle_counters)?;
                        }
                        Op::RemoveCases => {
                            emit_counters(emitter, rep, &constants.case_remove_counters)?;
                        }
                        _ => debug!(matcher = %op, replacer = %rep, "no switch expansion"),
                    }
                }
            }
        }
        Ok(())
    }

    /// Every ordered pair of distinct callee names
    fn expand_new_callee(
        &self,
        matcher: Op,
        emitter: &mut Emitter<'_>,
        callees: &OperandTypeSet,
    ) -> Result<(), TaxonomyError> {
        let arity = self.taxonomy.format(Op::NewCallee).len();
        if arity != 2 {
            return Err(TaxonomyError::InvalidExpansion {
                matcher: matcher.to_string(),
                replacer: Op::NewCallee.to_string(),
                reason: format!("expected matched and replacement callee, format has {} slots", arity),
            });
        }
        for matched in callees.iter() {
            for replacement in callees.iter().filter(|c| *c != matched) {
                emitter.emit(
                    vec![],
                    Op::NewCallee,
                    vec![Operand::bare(matched.clone()), Operand::bare(replacement.clone())],
                )?;
            }
        }
        Ok(())
    }

    fn expand_with_operands(&self, matcher: Op, emitter: &mut Emitter<'_>) -> Result<(), TaxonomyError> {
        let format = self.taxonomy.format(matcher);

        for replacer in self.taxonomy.rules_allowed(matcher) {
            let replacer_format = self.taxonomy.format(replacer);
            match replacer_format {
                [] => {
                    if let Some(key) = bind_slots(format, &[]) {
                        emitter.emit(key, replacer, vec![])?;
                    }
                }
                [required] => {
                    for slot in 0..format.len() {
                        let Some(kind) = resolve(&format[slot], Some(required)) else {
                            continue;
                        };
                        let Some(key) = bind_slots(format, &[(slot, kind.clone())]) else {
                            continue;
                        };
                        emitter.emit(key, replacer, vec![Operand::slotted(kind, slot)])?;
                    }
                }
                [left_req, right_req] => {
                    let commutative = self.taxonomy.is_commutative(replacer);
                    for rh in 0..format.len() {
                        for lh in 0..rh {
                            for swapped in [false, true] {
                                // both orientations are the same mutant
                                if swapped && commutative {
                                    continue;
                                }
                                let (l, r) = if swapped { (rh, lh) } else { (lh, rh) };
                                let (Some(lk), Some(rk)) = (
                                    resolve(&format[l], Some(left_req)),
                                    resolve(&format[r], Some(right_req)),
                                ) else {
                                    continue;
                                };
                                let Some(key) =
                                    bind_slots(format, &[(l, lk.clone()), (r, rk.clone())])
                                else {
                                    continue;
                                };
                                emitter.emit(
                                    key,
                                    replacer,
                                    vec![Operand::slotted(lk, l), Operand::slotted(rk, r)],
                                )?;
                            }
                        }
                    }
                }
                other => {
                    return Err(TaxonomyError::InvalidReplacerArity {
                        op: replacer.to_string(),
                        arity: other.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn emit_counters(emitter: &mut Emitter<'_>, replacer: Op, counters: &OperandTypeSet) -> Result<(), TaxonomyError> {
    for counter in counters.iter() {
        emitter.emit(vec![], replacer, vec![Operand::bare(counter.clone())])?;
    }
    Ok(())
}

/// Slot-tagged key operands: `fixed` slots as given, every other slot
/// unconstrained. `None` if some slot admits no kind at all.
fn bind_slots(format: &[OperandTypeSet], fixed: &[(usize, OperandKind)]) -> Option<Vec<Operand>> {
    format
        .iter()
        .enumerate()
        .map(|(slot, candidates)| {
            let kind = match fixed.iter().find(|(s, _)| *s == slot) {
                Some((_, kind)) => kind.clone(),
                None => resolve(candidates, None)?,
            };
            Some(Operand::slotted(kind, slot))
        })
        .collect()
}

fn check_unique_names(set: &RuleSet) -> Result<(), TaxonomyError> {
    let mut seen: BTreeMap<&str, String> = BTreeMap::new();
    for (key, rule) in set.rules() {
        let origin = format!("{} --> {}", key, rule.expression());
        if let Some(first) = seen.insert(rule.name.as_str(), origin.clone()) {
            return Err(TaxonomyError::RuleNameCollision {
                name: rule.name.to_string(),
                first,
                second: origin,
            });
        }
    }
    Ok(())
}
