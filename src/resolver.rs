//! Operand binding
//!
//! Picks the kind bound to a matcher slot. Supertype markers win so rule keys
//! stay as general as possible unless a replacer narrows the slot.

use crate::operand::{OperandKind, OperandTypeSet};

/// Candidates in preference order: `@` first, else `A` first, then the rest
/// lexicographically.
pub fn preference_order(candidates: &OperandTypeSet) -> Vec<&OperandKind> {
    let marker = [OperandKind::ArithExpr, OperandKind::AddressExpr]
        .into_iter()
        .find(|m| candidates.contains(m));

    let mut ordered: Vec<&OperandKind> = Vec::with_capacity(candidates.len());
    if let Some(marker) = &marker {
        ordered.extend(candidates.iter().filter(|k| *k == marker));
    }
    ordered.extend(candidates.iter().filter(|k| Some(*k) != marker.as_ref()));
    ordered
}

/// Resolve the kind to bind for a slot accepting `candidates`.
///
/// Without a constraint the most preferred candidate is returned; with one,
/// the most preferred candidate that `required` also admits. `None` means no
/// binding is possible.
pub fn resolve(candidates: &OperandTypeSet, required: Option<&OperandTypeSet>) -> Option<OperandKind> {
    preference_order(candidates)
        .into_iter()
        .find(|kind| required.map_or(true, |req| req.contains(kind)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_prefers_supertype() {
        assert_eq!(
            resolve(&OperandTypeSet::arith_value(), None),
            Some(OperandKind::ArithExpr)
        );
        assert_eq!(
            resolve(&OperandTypeSet::pointer_value(), None),
            Some(OperandKind::AddressExpr)
        );
    }

    #[test]
    fn test_arith_marker_beats_address_marker() {
        let any = OperandTypeSet::arith_value().union(&OperandTypeSet::pointer_value());
        let order: Vec<&str> = preference_order(&any).iter().map(|k| k.token()).collect();
        assert_eq!(order, vec!["@", "A", "C", "P", "V"]);
    }

    #[test]
    fn test_fallback_is_lexicographic() {
        let literals = OperandTypeSet::literals(["dirname", "basename"]);
        assert_eq!(resolve(&literals, None), Some(OperandKind::literal("basename")));
    }

    #[test]
    fn test_constraint_narrows() {
        let var = OperandTypeSet::single(OperandKind::ArithVar);
        assert_eq!(
            resolve(&OperandTypeSet::arith_value(), Some(&var)),
            Some(OperandKind::ArithVar)
        );
        let any = OperandTypeSet::arith_value().union(&OperandTypeSet::pointer_value());
        assert_eq!(
            resolve(&OperandTypeSet::pointer_value(), Some(&any)),
            Some(OperandKind::AddressExpr)
        );
    }

    #[test]
    fn test_incompatible_constraint() {
        let consts = OperandTypeSet::literals(["0", "1"]);
        assert_eq!(resolve(&OperandTypeSet::arith_value(), Some(&consts)), None);
        assert_eq!(
            resolve(&OperandTypeSet::arith_value(), Some(&OperandTypeSet::pointer_value())),
            None
        );
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(resolve(&OperandTypeSet::default(), None), None);
    }
}
