//! Operand kinds and the sets of kinds an operator slot accepts

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A semantic category of sub-expression that can fill an operand slot,
/// or a literal value a replacer is parameterized with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Any arithmetic expression (`@`), the arithmetic supertype
    ArithExpr,
    /// Arithmetic variable (`V`)
    ArithVar,
    /// Arithmetic constant (`C`)
    ArithConst,
    /// Pointer variable (`P`)
    PointerVar,
    /// Any address expression (`A`), the pointer supertype
    AddressExpr,
    /// Literal constant, counter or callee name
    Literal(String),
}

impl OperandKind {
    pub fn token(&self) -> &str {
        match self {
            Self::ArithExpr => "@",
            Self::ArithVar => "V",
            Self::ArithConst => "C",
            Self::PointerVar => "P",
            Self::AddressExpr => "A",
            Self::Literal(s) => s,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    fn rank(&self) -> u8 {
        match self {
            Self::ArithExpr => 0,
            Self::ArithVar => 1,
            Self::ArithConst => 2,
            Self::PointerVar => 3,
            Self::AddressExpr => 4,
            Self::Literal(_) => 5,
        }
    }
}

// Kinds sort by token so every set iterates in lexicographic order; a literal
// spelled like a kind token sorts after that kind.
impl Ord for OperandKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token()
            .cmp(other.token())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for OperandKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The admissible kinds for one operand slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperandTypeSet(BTreeSet<OperandKind>);

impl OperandTypeSet {
    pub fn new(kinds: impl IntoIterator<Item = OperandKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// `{@, V, C}`
    pub fn arith_value() -> Self {
        Self::new([
            OperandKind::ArithExpr,
            OperandKind::ArithVar,
            OperandKind::ArithConst,
        ])
    }

    /// `{P, A}`
    pub fn pointer_value() -> Self {
        Self::new([OperandKind::PointerVar, OperandKind::AddressExpr])
    }

    pub fn single(kind: OperandKind) -> Self {
        Self::new([kind])
    }

    pub fn literals<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|v| OperandKind::literal(v.as_ref())),
        )
    }

    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn contains(&self, kind: &OperandKind) -> bool {
        self.0.contains(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Members in lexicographic token order
    pub fn iter(&self) -> impl Iterator<Item = &OperandKind> {
        self.0.iter()
    }
}

impl FromIterator<OperandKind> for OperandTypeSet {
    fn from_iter<I: IntoIterator<Item = OperandKind>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// An operand kind bound into a rule, optionally tagged with the 1-based
/// matcher slot it refers to (`@1`, `V2`). Untagged operands are literals or
/// references to the whole matched value (`ABS(@)`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operand {
    pub kind: OperandKind,
    pub slot: Option<usize>,
}

impl Operand {
    pub fn slotted(kind: OperandKind, index: usize) -> Self {
        Self {
            kind,
            slot: Some(index + 1),
        }
    }

    pub fn bare(kind: OperandKind) -> Self {
        Self { kind, slot: None }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "{}{}", self.kind, slot),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_spelled_like_kind_is_distinct() {
        let literal = OperandKind::literal("@");
        assert_ne!(literal, OperandKind::ArithExpr);
        assert_eq!(literal.cmp(&OperandKind::ArithExpr), Ordering::Greater);
        assert_eq!(literal.cmp(&OperandKind::literal("@")), Ordering::Equal);

        let set = OperandTypeSet::arith_value().union(&OperandTypeSet::literals(["@", "V"]));
        assert_eq!(set.len(), 5);
        assert!(set.contains(&OperandKind::ArithExpr));
        assert!(set.contains(&OperandKind::literal("@")));
    }

    #[test]
    fn test_sets_iterate_lexicographically() {
        let tokens: Vec<_> = OperandTypeSet::arith_value()
            .iter()
            .map(|k| k.token().to_string())
            .collect();
        assert_eq!(tokens, vec!["@", "C", "V"]);

        let literals = OperandTypeSet::literals(["dirname", "basename", "-1", "0"]);
        let tokens: Vec<_> = literals.iter().map(|k| k.token()).collect();
        assert_eq!(tokens, vec!["-1", "0", "basename", "dirname"]);
    }

    #[test]
    fn test_literal_orders_with_named_kinds() {
        // "@" sorts before letters but after digits and '-'
        assert!(OperandKind::literal("1") < OperandKind::ArithExpr);
        assert!(OperandKind::ArithExpr < OperandKind::AddressExpr);
        assert!(OperandKind::AddressExpr < OperandKind::PointerVar);
    }

    #[test]
    fn test_operand_display() {
        assert_eq!(Operand::slotted(OperandKind::ArithVar, 0).to_string(), "V1");
        assert_eq!(Operand::bare(OperandKind::ArithExpr).to_string(), "@");
        assert_eq!(Operand::bare(OperandKind::literal("-1")).to_string(), "-1");
    }

    #[test]
    fn test_union() {
        let any = OperandTypeSet::arith_value().union(&OperandTypeSet::pointer_value());
        assert_eq!(any.len(), 5);
        assert!(any.contains(&OperandKind::AddressExpr));
        assert!(any.contains(&OperandKind::ArithConst));
    }
}
