//! AND / OR / NOT composition of specifications
//!
//! Both operands describe the same entity, so composition places their
//! predicate trees under one new node. The result is still a plain
//! [`Expr`] that a query layer can translate, and neither operand is
//! modified.

use std::ops::{BitAnd, BitOr, Not};

use super::{Expr, Specification};

/// How two specifications are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Junction {
    /// Both must hold
    And,
    /// At least one must hold
    Or,
}

impl Junction {
    /// Joins two predicates
    #[must_use]
    pub fn join(self, left: Expr, right: Expr) -> Expr {
        match self {
            Self::And => left.and(right),
            Self::Or => left.or(right),
        }
    }
}

impl<T> Specification<T> {
    /// Combines two specifications into a new one
    #[must_use]
    pub fn combine(left: &Self, junction: Junction, right: &Self) -> Self {
        Self::new(junction.join(left.criteria().clone(), right.criteria().clone()))
    }

    /// Satisfied when both `self` and `other` are
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        Self::combine(self, Junction::And, other)
    }

    /// Satisfied when `self`, `other`, or both are
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        Self::combine(self, Junction::Or, other)
    }

    /// Satisfied when `self` is definitely not
    #[must_use]
    pub fn negate(&self) -> Self {
        Self::new(self.criteria().clone().negate())
    }
}

impl<T> BitAnd for Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        Specification::new(self.into_criteria().and(rhs.into_criteria()))
    }
}

impl<T> BitAnd for &Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<T> BitOr for Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        Specification::new(self.into_criteria().or(rhs.into_criteria()))
    }
}

impl<T> BitOr for &Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<T> Not for Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        Specification::new(self.into_criteria().negate())
    }
}

impl<T> Not for &Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityId};
    use crate::query::FieldValue;
    use crate::specification::field;

    #[derive(Debug, Clone, Copy)]
    struct Flags {
        a: bool,
        b: bool,
        c: bool,
    }

    impl Entity for Flags {
        const ENTITY_TYPE: &'static str = "Flags";

        fn id(&self) -> EntityId {
            EntityId::empty()
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "a" => Some(self.a.into()),
                "b" => Some(self.b.into()),
                "c" => Some(self.c.into()),
                _ => None,
            }
        }
    }

    fn spec(name: &str) -> Specification<Flags> {
        Specification::new(field(name).eq(true))
    }

    fn every_combination() -> Vec<Flags> {
        let mut all = Vec::new();
        for bits in 0..8_u8 {
            all.push(Flags {
                a: bits & 1 != 0,
                b: bits & 2 != 0,
                c: bits & 4 != 0,
            });
        }
        all
    }

    #[test]
    fn test_and_truth_table() {
        let (a, b) = (spec("a"), spec("b"));
        let both = a.and(&b);
        for e in every_combination() {
            assert_eq!(
                both.is_satisfied_by(&e),
                a.is_satisfied_by(&e) && b.is_satisfied_by(&e)
            );
        }
    }

    #[test]
    fn test_or_truth_table() {
        let (a, b) = (spec("a"), spec("b"));
        let either = a.or(&b);
        for e in every_combination() {
            assert_eq!(
                either.is_satisfied_by(&e),
                a.is_satisfied_by(&e) || b.is_satisfied_by(&e)
            );
        }
    }

    #[test]
    fn test_commutative() {
        let (a, b) = (spec("a"), spec("b"));
        for e in every_combination() {
            assert_eq!(a.and(&b).is_satisfied_by(&e), b.and(&a).is_satisfied_by(&e));
            assert_eq!(a.or(&b).is_satisfied_by(&e), b.or(&a).is_satisfied_by(&e));
        }
    }

    #[test]
    fn test_associative() {
        let (a, b, c) = (spec("a"), spec("b"), spec("c"));
        for e in every_combination() {
            assert_eq!(
                a.and(&b).and(&c).is_satisfied_by(&e),
                a.and(&b.and(&c)).is_satisfied_by(&e)
            );
            assert_eq!(
                a.or(&b).or(&c).is_satisfied_by(&e),
                a.or(&b.or(&c)).is_satisfied_by(&e)
            );
        }
    }

    #[test]
    fn test_nested_composition() {
        let (a, b, c) = (spec("a"), spec("b"), spec("c"));
        let nested = &(&a & &b) | &c;
        for e in every_combination() {
            assert_eq!(nested.is_satisfied_by(&e), (e.a && e.b) || e.c);
        }
    }

    #[test]
    fn test_operands_unchanged() {
        let (a, b) = (spec("a"), spec("b"));
        let before = (a.clone(), b.clone());
        let _ = a.and(&b);
        let _ = &a | &b;
        let _ = !&a;
        assert_eq!(a, before.0);
        assert_eq!(b, before.1);
    }

    #[test]
    fn test_owned_operators_match_named() {
        let (a, b) = (spec("a"), spec("b"));
        assert_eq!(a.clone() & b.clone(), a.and(&b));
        assert_eq!(a.clone() | b.clone(), a.or(&b));
        assert_eq!(!a.clone(), a.negate());
    }

    #[test]
    fn test_combined_criteria_stay_inspectable() {
        let combined = spec("a").or(&spec("b"));
        assert!(matches!(combined.criteria(), Expr::Or(_, _)));
        assert_eq!(combined.criteria().fields(), vec!["a", "b"]);
    }

    #[test]
    fn test_negate() {
        let a = spec("a");
        for e in every_combination() {
            assert_eq!(a.negate().is_satisfied_by(&e), !e.a);
        }
    }
}
