//! Mutation operator taxonomy
//!
//! Every operator the generator knows about, the operand format of each,
//! whether it may match, replace, or both, its class path, and the table of
//! which replacers may substitute which matchers. The registry is assembled
//! by [`TaxonomyBuilder`] and validated once; a [`Taxonomy`] value is never
//! modified afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::class_path::ClassPath;
use crate::config::Settings;
use crate::error::TaxonomyError;
use crate::operand::{OperandKind, OperandTypeSet};

macro_rules! operators {
    ($($variant:ident => $token:literal),+ $(,)?) => {
        /// Operator mnemonic
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Op {
            $($variant),+
        }

        impl Op {
            /// Every operator, in declaration order
            pub const ALL: &'static [Op] = &[$(Op::$variant),+];

            pub fn token(self) -> &'static str {
                match self {
                    $(Op::$variant => $token),+
                }
            }
        }
    };
}

operators! {
    // Match-only values
    ArithExpr => "@",
    ArithVar => "V",
    ArithConst => "C",
    PointerVar => "P",
    AddressExpr => "A",
    // Match-only structures
    Stmt => "STMT",
    ReturnBreakContinue => "RETURN_BREAK_CONTINUE",
    Call => "CALL",
    Switch => "SWITCH",
    // Replace-only
    DelStmt => "DELSTMT",
    TrapStmt => "TRAPSTMT",
    KeepOperand => "OPERAND",
    ConstVal => "CONSTVAL",
    NewCallee => "NEWCALLEE",
    ShuffleArgs => "SHUFFLEARGS",
    ShuffleCasesDests => "SHUFFLECASESDESTS",
    RemoveCases => "REMOVECASES",
    Abs => "ABS",
    // Arithmetic
    Add => "ADD",
    Sub => "SUB",
    Mul => "MUL",
    Div => "DIV",
    Mod => "MOD",
    BitAnd => "BITAND",
    BitOr => "BITOR",
    BitXor => "BITXOR",
    BitShl => "BITSHL",
    BitShr => "BITSHR",
    Eq => "EQ",
    Neq => "NEQ",
    Lt => "LT",
    Gt => "GT",
    Le => "LE",
    Ge => "GE",
    Assign => "ASSIGN",
    BitNot => "BITNOT",
    Neg => "NEG",
    LeftInc => "LEFTINC",
    LeftDec => "LEFTDEC",
    RightInc => "RIGHTINC",
    RightDec => "RIGHTDEC",
    // Pointer
    PAdd => "PADD",
    PSub => "PSUB",
    PEq => "PEQ",
    PNeq => "PNEQ",
    PLt => "PLT",
    PGt => "PGT",
    PLe => "PLE",
    PGe => "PGE",
    PLeftInc => "PLEFTINC",
    PLeftDec => "PLEFTDEC",
    PRightInc => "PRIGHTINC",
    PRightDec => "PRIGHTDEC",
    // Logical
    And => "AND",
    Or => "OR",
    // Dereference arithmetic
    PDerefAdd => "PDEREF_ADD",
    PDerefSub => "PDEREF_SUB",
    PAddDeref => "PADD_DEREF",
    PSubDeref => "PSUB_DEREF",
    PDerefLeftInc => "PDEREF_LEFTINC",
    PDerefRightInc => "PDEREF_RIGHTINC",
    PDerefLeftDec => "PDEREF_LEFTDEC",
    PDerefRightDec => "PDEREF_RIGHTDEC",
    PLeftIncDeref => "PLEFTINC_DEREF",
    PRightIncDeref => "PRIGHTINC_DEREF",
    PLeftDecDeref => "PLEFTDEC_DEREF",
    PRightDecDeref => "PRIGHTDEC_DEREF",
}

impl Op {
    pub fn from_token(token: &str) -> Option<Op> {
        Op::ALL.iter().copied().find(|op| op.token() == token)
    }

    /// The operand kind a match-only value operator stands for
    pub fn value_kind(self) -> Option<OperandKind> {
        match self {
            Op::ArithExpr => Some(OperandKind::ArithExpr),
            Op::ArithVar => Some(OperandKind::ArithVar),
            Op::ArithConst => Some(OperandKind::ArithConst),
            Op::PointerVar => Some(OperandKind::PointerVar),
            Op::AddressExpr => Some(OperandKind::AddressExpr),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::from_token(s).ok_or_else(|| format!("unknown operator '{}'", s))
    }
}

pub const ARITH_VALUES: &[Op] = &[Op::ArithExpr, Op::ArithVar, Op::ArithConst];
pub const POINTER_VALUES: &[Op] = &[Op::PointerVar, Op::AddressExpr];
pub const MATCH_ONLY_DEL: &[Op] = &[Op::Stmt, Op::ReturnBreakContinue];

pub const AOR: &[Op] = &[Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Mod];
pub const BIT: &[Op] = &[Op::BitAnd, Op::BitOr, Op::BitXor, Op::BitShl, Op::BitShr];
pub const ROR: &[Op] = &[Op::Eq, Op::Neq, Op::Lt, Op::Gt, Op::Le, Op::Ge];
pub const UNARY: &[Op] = &[Op::BitNot, Op::Neg];
pub const INCDEC: &[Op] = &[Op::LeftInc, Op::LeftDec, Op::RightInc, Op::RightDec];
pub const P_AOR: &[Op] = &[Op::PAdd, Op::PSub];
pub const P_ROR: &[Op] = &[Op::PEq, Op::PNeq, Op::PLt, Op::PGt, Op::PLe, Op::PGe];
pub const P_INCDEC: &[Op] = &[Op::PLeftInc, Op::PLeftDec, Op::PRightInc, Op::PRightDec];
pub const LOR: &[Op] = &[Op::And, Op::Or];
pub const DEREF_AOR: &[Op] = &[Op::PDerefAdd, Op::PDerefSub];
pub const AOR_DEREF: &[Op] = &[Op::PAddDeref, Op::PSubDeref];
pub const DEREF_INCDEC: &[Op] = &[
    Op::PDerefLeftInc,
    Op::PDerefRightInc,
    Op::PDerefLeftDec,
    Op::PDerefRightDec,
];
pub const INCDEC_DEREF: &[Op] = &[
    Op::PLeftIncDeref,
    Op::PRightIncDeref,
    Op::PLeftDecDeref,
    Op::PRightDecDeref,
];

const MATCH_ONLY: &[&[Op]] = &[
    ARITH_VALUES,
    POINTER_VALUES,
    MATCH_ONLY_DEL,
    &[Op::Call, Op::Switch],
];

const REPLACE_ONLY: &[Op] = &[
    Op::Abs,
    Op::DelStmt,
    Op::TrapStmt,
    Op::KeepOperand,
    Op::ConstVal,
    Op::NewCallee,
    Op::ShuffleArgs,
    Op::ShuffleCasesDests,
    Op::RemoveCases,
];

/// Literal zero used by `CONSTVAL`
pub const ZERO: &str = "0";
/// False and true
pub const BOOLEAN_CONSTANTS: &[&str] = &["0", "1"];

/// Which side of a rule an operator may appear on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    MatchOnly,
    ReplaceOnly,
    Both,
}

/// A registered operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub op: Op,
    /// One set of admissible kinds per operand slot; empty for nullary operators
    pub format: Vec<OperandTypeSet>,
    pub role: Role,
    pub class_path: ClassPath,
}

impl Operator {
    pub fn arity(&self) -> usize {
        self.format.len()
    }
}

/// Literal parameters bound by the nullary expansions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constants {
    pub scalar_constants: OperandTypeSet,
    pub shuffle_counters: OperandTypeSet,
    pub case_remove_counters: OperandTypeSet,
    pub callee_names: OperandTypeSet,
}

impl Constants {
    pub fn zero(&self) -> OperandKind {
        OperandKind::literal(ZERO)
    }

    fn from_settings(settings: &Settings) -> Self {
        Self {
            scalar_constants: OperandTypeSet::literals(&settings.scalar_constants),
            shuffle_counters: OperandTypeSet::literals(&settings.shuffle_counters),
            case_remove_counters: OperandTypeSet::literals(&settings.case_remove_counters),
            callee_names: OperandTypeSet::literals(&settings.callee_names),
        }
    }
}

/// Immutable, validated operator registry
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// Indexed by `Op as usize`; complete by construction
    operators: Vec<Operator>,
    rules: BTreeMap<Op, BTreeSet<Op>>,
    commutative: BTreeSet<Op>,
    constants: Constants,
}

impl Taxonomy {
    /// The standard MART operator table with the given literal settings
    pub fn build(settings: &Settings) -> Result<Self, TaxonomyError> {
        TaxonomyBuilder::standard(settings)?.build()
    }

    /// The standard table with default settings
    pub fn standard() -> Result<Self, TaxonomyError> {
        Self::build(&Settings::default())
    }

    pub fn operator(&self, op: Op) -> &Operator {
        &self.operators[op as usize]
    }

    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter()
    }

    pub fn format(&self, op: Op) -> &[OperandTypeSet] {
        &self.operator(op).format
    }

    pub fn class_path_of(&self, op: Op) -> &ClassPath {
        &self.operator(op).class_path
    }

    pub fn is_commutative(&self, op: Op) -> bool {
        self.commutative.contains(&op)
    }

    /// Replacers allowed for `matcher`, in stable order
    pub fn rules_allowed(&self, matcher: Op) -> impl Iterator<Item = Op> + '_ {
        self.rules.get(&matcher).into_iter().flatten().copied()
    }

    pub fn allows(&self, matcher: Op, replacer: Op) -> bool {
        self.rules
            .get(&matcher)
            .is_some_and(|reps| reps.contains(&replacer))
    }

    /// Operators that appear as matchers in the rule table
    pub fn matchers(&self) -> impl Iterator<Item = Op> + '_ {
        self.rules.keys().copied()
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }
}

/// Collects formats, class paths, roles and rules, then validates them
/// into a [`Taxonomy`].
///
/// Registration errors are recorded and reported by [`build`](Self::build)
/// so that table definitions read as plain declarations.
#[derive(Debug)]
pub struct TaxonomyBuilder {
    formats: BTreeMap<Op, Vec<OperandTypeSet>>,
    class_paths: BTreeMap<Op, ClassPath>,
    roles: BTreeMap<Op, Role>,
    rules: BTreeMap<Op, BTreeSet<Op>>,
    commutative: BTreeSet<Op>,
    constants: Constants,
    errors: Vec<TaxonomyError>,
}

impl TaxonomyBuilder {
    pub fn new(settings: &Settings) -> Result<Self, TaxonomyError> {
        settings.validate()?;
        Ok(Self {
            formats: BTreeMap::new(),
            class_paths: BTreeMap::new(),
            roles: BTreeMap::new(),
            rules: BTreeMap::new(),
            commutative: BTreeSet::new(),
            constants: Constants::from_settings(settings),
            errors: Vec::new(),
        })
    }

    /// Set the operand format of each operator in `ops`
    pub fn format(&mut self, ops: &[Op], format: &[OperandTypeSet]) -> &mut Self {
        for &op in ops {
            if self.formats.insert(op, format.to_vec()).is_some() {
                self.errors.push(TaxonomyError::DuplicateFormat {
                    op: op.to_string(),
                });
            }
        }
        self
    }

    /// Place each operator in `ops` under `prefix/<token>`
    pub fn class(&mut self, ops: &[Op], prefix: &[&str]) -> &mut Self {
        for &op in ops {
            let segments = prefix.iter().copied().chain([op.token()]);
            let Some(path) = ClassPath::new(segments) else {
                self.errors.push(TaxonomyError::MissingClassPath {
                    op: op.to_string(),
                });
                continue;
            };
            if let Some(first) = self.class_paths.get(&op) {
                self.errors.push(TaxonomyError::DuplicateClassPath {
                    op: op.to_string(),
                    first: first.to_string(),
                    second: path.to_string(),
                });
                continue;
            }
            self.class_paths.insert(op, path);
        }
        self
    }

    pub fn role(&mut self, ops: &[Op], role: Role) -> &mut Self {
        for &op in ops {
            self.roles.insert(op, role);
        }
        self
    }

    pub fn commutative(&mut self, ops: &[Op]) -> &mut Self {
        self.commutative.extend(ops.iter().copied());
        self
    }

    /// Allow every operator in `replacers` except the matcher itself to
    /// replace each operator in `matchers`
    pub fn allow(&mut self, matchers: &[Op], replacers: &[Op]) -> &mut Self {
        self.allow_except(matchers, replacers, &[])
    }

    /// Like [`allow`](Self::allow), also leaving out `excluded`
    pub fn allow_except(&mut self, matchers: &[Op], replacers: &[Op], excluded: &[Op]) -> &mut Self {
        for &matcher in matchers {
            let allowed = self.rules.entry(matcher).or_default();
            allowed.extend(
                replacers
                    .iter()
                    .copied()
                    .filter(|r| *r != matcher && !excluded.contains(r)),
            );
        }
        self
    }

    /// Builder populated with the standard operator table
    pub fn standard(settings: &Settings) -> Result<Self, TaxonomyError> {
        let mut b = Self::new(settings)?;

        let arith = OperandTypeSet::arith_value();
        let pointer = OperandTypeSet::pointer_value();
        let var = OperandTypeSet::single(OperandKind::ArithVar);
        let pvar = OperandTypeSet::single(OperandKind::PointerVar);
        let constval = b
            .constants
            .scalar_constants
            .union(&OperandTypeSet::literals([ZERO]))
            .union(&OperandTypeSet::literals(BOOLEAN_CONSTANTS));
        let callee = b.constants.callee_names.clone();
        let shuffle = b.constants.shuffle_counters.clone();
        let case_remove = b.constants.case_remove_counters.clone();

        // Operand formats
        let binary_arith = [arith.clone(), arith.clone()];
        let pointer_arith = [pointer.clone(), arith.clone()];
        for group in [AOR, BIT, ROR, LOR] {
            b.format(group, &binary_arith);
        }
        b.format(&[Op::Assign], &[var.clone(), arith.clone()]);
        for group in [P_AOR, P_ROR, DEREF_AOR, AOR_DEREF] {
            b.format(group, &pointer_arith);
        }
        b.format(UNARY, &[arith.clone()])
            .format(&[Op::Abs], &[arith.clone()])
            .format(INCDEC, &[var])
            .format(P_INCDEC, &[pvar.clone()])
            .format(DEREF_INCDEC, &[pvar.clone()])
            .format(INCDEC_DEREF, &[pvar]);
        for group in MATCH_ONLY {
            b.format(group, &[]);
        }
        b.format(&[Op::DelStmt, Op::TrapStmt], &[])
            .format(&[Op::KeepOperand], &[arith.union(&pointer)])
            .format(&[Op::ConstVal], &[constval])
            // the matched callee plus one replacement
            .format(&[Op::NewCallee], &[callee.clone(), callee])
            .format(&[Op::ShuffleArgs, Op::ShuffleCasesDests], &[shuffle])
            .format(&[Op::RemoveCases], &[case_remove]);

        // Roles
        for group in MATCH_ONLY {
            b.role(group, Role::MatchOnly);
        }
        b.role(REPLACE_ONLY, Role::ReplaceOnly);

        // Class paths
        const EXPR: &str = "EXPRESSION-MUTATION";
        const STMT: &str = "STATEMENT-MUTATION";
        b.class(ARITH_VALUES, &[EXPR, "SCALAR", "VALUE", "VAL"])
            .class(POINTER_VALUES, &[EXPR, "POINTER", "VALUE", "VAL"])
            .class(AOR, &[EXPR, "SCALAR", "BINARY", "AO"])
            .class(BIT, &[EXPR, "SCALAR", "BINARY", "BIT"])
            .class(ROR, &[EXPR, "SCALAR", "BINARY", "RO"])
            .class(LOR, &[EXPR, "SCALAR", "BINARY", "LO"])
            .class(&[Op::Assign], &[EXPR, "SCALAR", "BINARY", "ASSIGN"])
            .class(UNARY, &[EXPR, "SCALAR", "UNARY", "UO"])
            .class(&[Op::Abs], &[EXPR, "SCALAR", "UNARY", "UO"])
            .class(INCDEC, &[EXPR, "SCALAR", "UNARY", "INCDEC"])
            .class(P_AOR, &[EXPR, "POINTER", "BINARY", "AO"])
            .class(P_ROR, &[EXPR, "POINTER", "BINARY", "RO"])
            .class(P_INCDEC, &[EXPR, "POINTER", "UNARY", "INCDEC"])
            .class(DEREF_AOR, &[EXPR, "DEREF", "BINARY", "DEREF-AO"])
            .class(AOR_DEREF, &[EXPR, "DEREF", "BINARY", "AO-DEREF"])
            .class(DEREF_INCDEC, &[EXPR, "DEREF", "UNARY", "DEREF-INCDEC"])
            .class(INCDEC_DEREF, &[EXPR, "DEREF", "UNARY", "INCDEC-DEREF"])
            .class(&[Op::KeepOperand], &[EXPR, "ANY", "UNARY", "OPERAND"])
            .class(&[Op::ConstVal], &[EXPR, "ANY", "CONSTANT", "CONSTVAL"])
            .class(MATCH_ONLY_DEL, &[STMT, "STATEMENT", "SITE"])
            .class(&[Op::DelStmt], &[STMT, "STATEMENT", "DELETION"])
            .class(&[Op::TrapStmt], &[STMT, "STATEMENT", "TRAP"])
            .class(&[Op::Call], &[STMT, "CALL", "SITE"])
            .class(&[Op::NewCallee], &[STMT, "CALL", "CALLEE"])
            .class(&[Op::ShuffleArgs], &[STMT, "CALL", "ARGS"])
            .class(&[Op::Switch], &[STMT, "SWITCH", "SITE"])
            .class(&[Op::ShuffleCasesDests, Op::RemoveCases], &[STMT, "SWITCH", "CASES"]);

        // Commutativity
        b.commutative(&[Op::Add, Op::Mul, Op::BitAnd, Op::BitOr, Op::BitXor])
            .commutative(&[Op::Eq, Op::Neq, Op::PEq, Op::PNeq])
            .commutative(LOR)
            .commutative(P_AOR);
        for group in [DEREF_AOR, AOR_DEREF, DEREF_INCDEC, INCDEC_DEREF] {
            b.commutative(group);
        }

        // Who may replace whom
        let arith_ops = [AOR, BIT, ROR, &[Op::Assign][..], UNARY, INCDEC].concat();
        let arith_extra = [Op::DelStmt, Op::TrapStmt, Op::KeepOperand, Op::ConstVal, Op::Abs];
        let arith_repl = [&arith_ops[..], &arith_extra[..]].concat();
        let pointer_ops = [P_AOR, P_INCDEC].concat();
        let pointer_extra = [Op::DelStmt, Op::TrapStmt, Op::KeepOperand];
        let del_trap = [Op::DelStmt, Op::TrapStmt];

        b.allow(&arith_ops, &arith_repl)
            .allow(&pointer_ops, &[&pointer_ops[..], &pointer_extra[..]].concat())
            .allow(P_ROR, &[P_ROR, &pointer_extra[..]].concat())
            .allow(LOR, &[LOR, &del_trap[..], &[Op::KeepOperand, Op::ConstVal][..]].concat())
            .allow_except(&[Op::ArithExpr], &arith_repl, &[&[Op::KeepOperand][..], INCDEC].concat())
            .allow_except(&[Op::ArithVar], &arith_repl, &[Op::KeepOperand])
            .allow_except(&[Op::ArithConst], &arith_repl, &[&[Op::KeepOperand][..], INCDEC].concat())
            .allow_except(
                &[Op::AddressExpr],
                &[&pointer_ops[..], &del_trap[..], &[Op::ConstVal][..]].concat(),
                P_INCDEC,
            )
            .allow(&[Op::PointerVar], &[&pointer_ops[..], &del_trap[..]].concat())
            .allow(MATCH_ONLY_DEL, &del_trap)
            .allow(&[Op::Call], &[Op::DelStmt, Op::TrapStmt, Op::NewCallee, Op::ShuffleArgs])
            .allow(
                &[Op::Switch],
                &[Op::DelStmt, Op::TrapStmt, Op::ShuffleCasesDests, Op::RemoveCases],
            )
            .allow(
                &[AOR_DEREF, INCDEC_DEREF].concat(),
                &[DEREF_AOR, DEREF_INCDEC, &del_trap[..]].concat(),
            )
            .allow(
                &[DEREF_AOR, DEREF_INCDEC].concat(),
                &[AOR_DEREF, INCDEC_DEREF, &del_trap[..]].concat(),
            );

        Ok(b)
    }

    /// Validate and freeze the registry
    pub fn build(self) -> Result<Taxonomy, TaxonomyError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut operators = Vec::with_capacity(Op::ALL.len());
        for &op in Op::ALL {
            let format = self
                .formats
                .get(&op)
                .cloned()
                .ok_or_else(|| TaxonomyError::UnknownOperator { op: op.to_string() })?;
            let class_path = self
                .class_paths
                .get(&op)
                .cloned()
                .ok_or_else(|| TaxonomyError::MissingClassPath { op: op.to_string() })?;
            let role = self.roles.get(&op).copied().unwrap_or(Role::Both);
            operators.push(Operator {
                op,
                format,
                role,
                class_path,
            });
        }

        for (matcher, replacers) in &self.rules {
            if operators[*matcher as usize].role == Role::ReplaceOnly {
                return Err(TaxonomyError::ReplaceOnlyMatcher {
                    op: matcher.to_string(),
                });
            }
            for replacer in replacers {
                if operators[*replacer as usize].role == Role::MatchOnly {
                    return Err(TaxonomyError::MatchOnlyReplacer {
                        matcher: matcher.to_string(),
                        replacer: replacer.to_string(),
                    });
                }
            }
        }

        Ok(Taxonomy {
            operators,
            rules: self.rules,
            commutative: self.commutative,
            constants: self.constants,
        })
    }
}

#[cfg(test)]
impl TaxonomyBuilder {
    /// Re-register every operator of `taxonomy` (formats, class paths, roles)
    /// except the formats of `without_format`. No rules are copied.
    pub(crate) fn replicate(taxonomy: &Taxonomy, without_format: &[Op]) -> Self {
        let mut b = Self::new(&Settings::default()).unwrap();
        for operator in taxonomy.operators() {
            let op = operator.op;
            if !without_format.contains(&op) {
                b.format(&[op], &operator.format);
            }
            let segments = operator.class_path.segments();
            let prefix: Vec<&str> = segments[..segments.len() - 1]
                .iter()
                .map(String::as_str)
                .collect();
            b.class(&[op], &prefix).role(&[op], operator.role);
        }
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::standard().unwrap()
    }

    #[test]
    fn test_tokens_round_trip() {
        for &op in Op::ALL {
            assert_eq!(Op::from_token(op.token()), Some(op));
        }
        assert_eq!("PDEREF_ADD".parse::<Op>(), Ok(Op::PDerefAdd));
        assert!("NOPE".parse::<Op>().is_err());
    }

    #[test]
    fn test_operator_table_is_indexed_by_op() {
        let t = taxonomy();
        for &op in Op::ALL {
            assert_eq!(t.operator(op).op, op);
        }
    }

    #[test]
    fn test_formats() {
        let t = taxonomy();
        assert_eq!(t.format(Op::Add).len(), 2);
        assert_eq!(t.format(Op::Stmt).len(), 0);
        assert_eq!(t.format(Op::NewCallee).len(), 2);
        assert!(t.format(Op::Assign)[0].contains(&OperandKind::ArithVar));
        assert!(!t.format(Op::Assign)[0].contains(&OperandKind::ArithExpr));
        assert!(t.format(Op::ConstVal)[0].contains(&OperandKind::literal("0")));
        assert!(t.format(Op::ConstVal)[0].contains(&OperandKind::literal("-1")));
    }

    #[test]
    fn test_roles() {
        let t = taxonomy();
        assert_eq!(t.operator(Op::Stmt).role, Role::MatchOnly);
        assert_eq!(t.operator(Op::ArithExpr).role, Role::MatchOnly);
        assert_eq!(t.operator(Op::DelStmt).role, Role::ReplaceOnly);
        assert_eq!(t.operator(Op::Add).role, Role::Both);
        assert_eq!(t.operator(Op::PDerefAdd).role, Role::Both);
    }

    #[test]
    fn test_class_paths() {
        let t = taxonomy();
        assert_eq!(
            t.class_path_of(Op::Add).to_string(),
            "EXPRESSION-MUTATION/SCALAR/BINARY/AO/ADD"
        );
        assert_eq!(
            t.class_path_of(Op::DelStmt).to_string(),
            "STATEMENT-MUTATION/STATEMENT/DELETION/DELSTMT"
        );
        for operator in t.operators() {
            assert_eq!(operator.class_path.leaf(), operator.op.token());
        }
    }

    #[test]
    fn test_rules_exclude_self_and_respect_roles() {
        let t = taxonomy();
        for matcher in t.matchers() {
            assert_ne!(t.operator(matcher).role, Role::ReplaceOnly);
            for replacer in t.rules_allowed(matcher) {
                assert_ne!(replacer, matcher);
                assert_ne!(t.operator(replacer).role, Role::MatchOnly);
            }
        }
    }

    #[test]
    fn test_selected_rules() {
        let t = taxonomy();
        let stmt: Vec<Op> = t.rules_allowed(Op::Stmt).collect();
        assert_eq!(stmt, vec![Op::DelStmt, Op::TrapStmt]);

        assert!(t.allows(Op::Add, Op::Mul));
        assert!(t.allows(Op::Add, Op::LeftInc));
        assert!(t.allows(Op::ArithVar, Op::LeftInc));
        assert!(!t.allows(Op::ArithExpr, Op::LeftInc));
        assert!(!t.allows(Op::ArithExpr, Op::KeepOperand));
        assert!(t.allows(Op::ArithConst, Op::ConstVal));
        assert!(t.allows(Op::AddressExpr, Op::ConstVal));
        assert!(!t.allows(Op::AddressExpr, Op::PLeftInc));
        assert!(t.allows(Op::PEq, Op::PLt));
        assert!(!t.allows(Op::PEq, Op::PAdd));
        assert!(t.allows(Op::And, Op::Or));
        assert!(!t.allows(Op::And, Op::Add));
        assert!(t.allows(Op::PAddDeref, Op::PDerefSub));
        assert!(!t.allows(Op::PAddDeref, Op::PSubDeref));
    }

    #[test]
    fn test_commutative() {
        let t = taxonomy();
        assert!(t.is_commutative(Op::Mul));
        assert!(t.is_commutative(Op::PSub));
        assert!(t.is_commutative(Op::PDerefLeftInc));
        assert!(!t.is_commutative(Op::Sub));
        assert!(!t.is_commutative(Op::Lt));
    }

    #[test]
    fn test_duplicate_class_path_fails() {
        let mut b = TaxonomyBuilder::standard(&Settings::default()).unwrap();
        b.class(&[Op::Add], &["EXPRESSION-MUTATION", "OTHER"]);
        match b.build() {
            Err(TaxonomyError::DuplicateClassPath { op, second, .. }) => {
                assert_eq!(op, "ADD");
                assert_eq!(second, "EXPRESSION-MUTATION/OTHER/ADD");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_replace_only_matcher_fails() {
        let mut b = TaxonomyBuilder::standard(&Settings::default()).unwrap();
        b.allow(&[Op::DelStmt], &[Op::TrapStmt]);
        assert_eq!(
            b.build().unwrap_err(),
            TaxonomyError::ReplaceOnlyMatcher {
                op: "DELSTMT".to_string()
            }
        );
    }

    #[test]
    fn test_match_only_replacer_fails() {
        let mut b = TaxonomyBuilder::standard(&Settings::default()).unwrap();
        b.allow(&[Op::Add], &[Op::ArithConst]);
        assert_eq!(
            b.build().unwrap_err(),
            TaxonomyError::MatchOnlyReplacer {
                matcher: "ADD".to_string(),
                replacer: "C".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_format_fails() {
        let mut b = TaxonomyBuilder::standard(&Settings::default()).unwrap();
        b.format(&[Op::Add], &[]);
        assert_eq!(
            b.build().unwrap_err(),
            TaxonomyError::DuplicateFormat {
                op: "ADD".to_string()
            }
        );
    }

    #[test]
    fn test_replicated_builder_matches_standard() {
        let t = taxonomy();
        let mut b = TaxonomyBuilder::replicate(&t, &[]);
        b.allow(&[Op::Stmt], &[Op::DelStmt, Op::TrapStmt]);
        let copy = b.build().unwrap();
        for &op in Op::ALL {
            assert_eq!(copy.operator(op), t.operator(op));
        }
        assert_eq!(copy.matchers().collect::<Vec<_>>(), vec![Op::Stmt]);
    }

    #[test]
    fn test_missing_format_fails() {
        let b = TaxonomyBuilder::new(&Settings::default()).unwrap();
        assert!(matches!(
            b.build(),
            Err(TaxonomyError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_invalid_settings_fail() {
        let settings = Settings {
            scalar_constants: vec!["1,2".to_string()],
            ..Settings::default()
        };
        assert!(matches!(
            Taxonomy::build(&settings),
            Err(TaxonomyError::InvalidLiteral { .. })
        ));
    }
}
