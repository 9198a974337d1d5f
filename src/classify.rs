//! Mutant classification
//!
//! Decodes rule names back into their matcher and replacer operators and maps
//! them onto operator classes at a chosen granularity. Used to derive the
//! mutant-type features of externally generated mutants.

use std::fmt;
use std::str::FromStr;

use crate::class_path::ClassPath;
use crate::error::{DecodeError, MconfError, UnsupportedError};
use crate::synth::{MATCH_REPLACE_SEP, OPERAND_SEP};
use crate::taxonomy::{Op, Taxonomy};

/// Trailing segment appended to the replacer path of swapped rules
pub const SWAP_MARKER: &str = "SWAPPED";

/// A rule name split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRule {
    pub matcher: Op,
    pub matcher_operands: Vec<String>,
    pub replacer: Op,
    pub replacer_operands: Vec<String>,
}

impl DecodedRule {
    /// Binary on both sides with the replacer operands transposed
    pub fn is_swapped(&self) -> bool {
        match (self.matcher_operands.as_slice(), self.replacer_operands.as_slice()) {
            ([m0, m1], [r0, r1]) => m0 != m1 && r0 == m1 && r1 == m0,
            _ => false,
        }
    }
}

fn decode_side(name: &str, side: &str) -> Result<(Op, Vec<String>), DecodeError> {
    let mut parts = side.split(OPERAND_SEP);
    let token = parts.next().unwrap_or_default();
    let op = Op::from_token(token).ok_or_else(|| DecodeError::UnknownOperator {
        name: name.to_string(),
        token: token.to_string(),
    })?;

    let mut operands: Vec<&str> = parts.collect();
    // the closing separator leaves one empty trailing part
    if operands.last() == Some(&"") {
        operands.pop();
    }
    if operands.iter().any(|p| p.is_empty()) {
        return Err(DecodeError::MalformedName {
            name: name.to_string(),
        });
    }
    Ok((op, operands.into_iter().map(str::to_string).collect()))
}

/// Split `<matcher>[$oprd...]!<replacer>[$oprd...]`
pub fn decode_rule_name(name: &str) -> Result<DecodedRule, DecodeError> {
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let mut sides = compact.split(MATCH_REPLACE_SEP);
    let (Some(match_side), Some(replace_side), None) = (sides.next(), sides.next(), sides.next())
    else {
        return Err(DecodeError::MalformedName {
            name: name.to_string(),
        });
    };

    let (matcher, matcher_operands) = decode_side(name, match_side)?;
    let (replacer, replacer_operands) = decode_side(name, replace_side)?;
    Ok(DecodedRule {
        matcher,
        matcher_operands,
        replacer,
        replacer_operands,
    })
}

/// How much detail a classification keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Every matcher ancestor crossed with every replacer ancestor (`-1`)
    AllAncestors,
    /// Class paths without their two last segments (`1`)
    Category,
    /// Class paths without their last segment (`2`)
    Group,
    /// Full class paths (`3`)
    Operator,
    /// Full class paths plus the swap marker (`4`)
    OperatorSwap,
    /// The rule name itself (`5`)
    Exact,
}

impl Granularity {
    pub fn level(self) -> i32 {
        match self {
            Self::AllAncestors => -1,
            Self::Category => 1,
            Self::Group => 2,
            Self::Operator => 3,
            Self::OperatorSwap => 4,
            Self::Exact => 5,
        }
    }
}

impl TryFrom<i32> for Granularity {
    type Error = DecodeError;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        match level {
            -1 => Ok(Self::AllAncestors),
            1 => Ok(Self::Category),
            2 => Ok(Self::Group),
            3 => Ok(Self::Operator),
            4 => Ok(Self::OperatorSwap),
            5 => Ok(Self::Exact),
            _ => Err(DecodeError::InvalidLevel { level }),
        }
    }
}

/// Selective mutation operator sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectiveKind {
    /// ABS, AOR, LCR, ROR and UOI (Offutt et al.)
    Offutt,
    /// Recognized but without defined semantics
    Re,
    /// Recognized but without defined semantics
    Rs,
}

impl fmt::Display for SelectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offutt => write!(f, "OFFUTT"),
            Self::Re => write!(f, "RE"),
            Self::Rs => write!(f, "RS"),
        }
    }
}

impl FromStr for SelectiveKind {
    type Err = UnsupportedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OFFUTT" => Ok(Self::Offutt),
            "RE" => Ok(Self::Re),
            "RS" => Ok(Self::Rs),
            _ => Err(UnsupportedError::SelectiveKind {
                kind: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ClassMatch {
    Any,
    /// Leaf segment
    Mnemonic(&'static str),
    /// Segment right above the leaf
    Group(&'static [&'static str]),
    /// Third segment (VALUE, UNARY, BINARY, ...)
    Shape(&'static str),
}

impl ClassMatch {
    fn matches(self, path: &ClassPath) -> bool {
        match self {
            Self::Any => true,
            Self::Mnemonic(m) => path.leaf() == m,
            Self::Group(groups) => path
                .depth()
                .checked_sub(2)
                .and_then(|i| path.segment(i))
                .is_some_and(|g| groups.contains(&g)),
            Self::Shape(shape) => path.segment(2) == Some(shape),
        }
    }
}

struct SelectivePattern {
    label: &'static str,
    matcher: ClassMatch,
    replacer: ClassMatch,
}

const OFFUTT_CATALOGUE: &[SelectivePattern] = &[
    SelectivePattern {
        label: "ABS",
        matcher: ClassMatch::Any,
        replacer: ClassMatch::Mnemonic("ABS"),
    },
    SelectivePattern {
        label: "AOR",
        matcher: ClassMatch::Group(&["AO", "BIT"]),
        replacer: ClassMatch::Group(&["AO", "BIT"]),
    },
    SelectivePattern {
        label: "LCR",
        matcher: ClassMatch::Group(&["LO"]),
        replacer: ClassMatch::Group(&["LO"]),
    },
    SelectivePattern {
        label: "ROR",
        matcher: ClassMatch::Group(&["RO"]),
        replacer: ClassMatch::Group(&["RO"]),
    },
    SelectivePattern {
        label: "UOI",
        matcher: ClassMatch::Shape("VALUE"),
        replacer: ClassMatch::Shape("UNARY"),
    },
];

/// Read-only classification over a taxonomy
#[derive(Debug, Clone, Copy)]
pub struct OperatorClassifier<'t> {
    taxonomy: &'t Taxonomy,
}

impl<'t> OperatorClassifier<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn class_path_of(&self, op: Op) -> &'t ClassPath {
        self.taxonomy.class_path_of(op)
    }

    pub fn decode(&self, name: &str) -> Result<DecodedRule, DecodeError> {
        decode_rule_name(name)
    }

    /// Classes of a rule name at `granularity`.
    ///
    /// Exactly one entry except for [`Granularity::AllAncestors`], which
    /// lists the finest combination first.
    pub fn classify(&self, name: &str, granularity: Granularity) -> Result<Vec<String>, DecodeError> {
        let decoded = decode_rule_name(name)?;
        let matcher = self.class_path_of(decoded.matcher);
        let replacer = self.class_path_of(decoded.replacer);
        let pair = |m: &ClassPath, r: &ClassPath| format!("{}{}{}", m, MATCH_REPLACE_SEP, r);

        let classes = match granularity {
            Granularity::Exact => vec![name.to_string()],
            Granularity::OperatorSwap => {
                if decoded.is_swapped() {
                    vec![pair(matcher, &replacer.child(SWAP_MARKER))]
                } else {
                    vec![pair(matcher, replacer)]
                }
            }
            Granularity::Operator => vec![pair(matcher, replacer)],
            Granularity::Group => vec![pair(&matcher.truncated(1), &replacer.truncated(1))],
            Granularity::Category => vec![pair(&matcher.truncated(2), &replacer.truncated(2))],
            Granularity::AllAncestors => matcher
                .ancestors()
                .flat_map(|m| replacer.ancestors().map(move |r| pair(&m, &r)))
                .collect(),
        };
        Ok(classes)
    }

    /// Single class for levels 1..=5
    pub fn class_of(&self, name: &str, granularity: Granularity) -> Result<String, DecodeError> {
        let classes = self.classify(name, granularity)?;
        classes
            .into_iter()
            .next()
            .ok_or(DecodeError::InvalidLevel {
                level: granularity.level(),
            })
    }

    /// Feature column label, e.g. `EXPRESSION-MUTATION/SCALAR!...--mutantType1`
    pub fn mutant_type_feature(&self, name: &str, granularity: Granularity) -> Result<String, DecodeError> {
        let class = self.class_of(name, granularity)?;
        Ok(format!("{}--mutantType{}", class, granularity.level()))
    }

    /// Whether `name` is the `DELSTMT` mnemonic or a rule name replacing
    /// with `DELSTMT`
    pub fn is_statement_deletion(&self, name: &str) -> Result<bool, DecodeError> {
        let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(op) = Op::from_token(&compact) {
            return Ok(op == Op::DelStmt);
        }
        Ok(decode_rule_name(name)?.replacer == Op::DelStmt)
    }

    /// Catalogue entry the rule falls under, if any
    pub fn selective_label(&self, name: &str, kind: SelectiveKind) -> Result<Option<&'static str>, MconfError> {
        let catalogue = match kind {
            SelectiveKind::Offutt => OFFUTT_CATALOGUE,
            SelectiveKind::Re | SelectiveKind::Rs => {
                return Err(UnsupportedError::SelectiveKind {
                    kind: kind.to_string(),
                }
                .into());
            }
        };

        let decoded = decode_rule_name(name)?;
        let matcher = self.class_path_of(decoded.matcher);
        let replacer = self.class_path_of(decoded.replacer);
        Ok(catalogue
            .iter()
            .find(|p| p.matcher.matches(matcher) && p.replacer.matches(replacer))
            .map(|p| p.label))
    }

    pub fn is_selective_mutation(&self, name: &str, kind: SelectiveKind) -> Result<bool, MconfError> {
        Ok(self.selective_label(name, kind)?.is_some())
    }
}
