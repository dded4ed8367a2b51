//! Property-based tests for monomials and polynomials.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::coeff::Coeff;
    use crate::monomial::Monomial;
    use crate::polynomial::Polynomial;
    use crate::symbol::{Symbol, SymbolKind, SymbolTable};

    const NUM_VARS: u32 = 4;

    // Strategy for raw variable-power mappings, zero entries included
    fn raw_mapping() -> impl Strategy<Value = Vec<(Symbol, u32)>> {
        proptest::collection::vec((0..NUM_VARS, 0u32..4), 0..6)
            .prop_map(|v| v.into_iter().map(|(s, e)| (Symbol::new(s), e)).collect())
    }

    // Strategy for small polynomials with integer coefficients
    fn small_poly() -> impl Strategy<Value = Polynomial> {
        proptest::collection::vec((raw_mapping(), -5i64..5), 0..5).prop_map(|terms| {
            Polynomial::from_terms(
                terms
                    .into_iter()
                    .map(|(m, c)| (Monomial::from_powers(m), Coeff::from_integer(c))),
            )
        })
    }

    fn state_table() -> (SymbolTable, Vec<Symbol>) {
        let mut table = SymbolTable::new();
        let gens = (0..NUM_VARS)
            .map(|i| table.intern(&format!("x{i}"), SymbolKind::State).unwrap())
            .collect();
        (table, gens)
    }

    proptest! {
        // Mapping equivalence

        #[test]
        fn monomial_ignores_order(mut mapping in raw_mapping()) {
            let forward = Monomial::from_powers(mapping.iter().copied());
            mapping.reverse();
            let backward = Monomial::from_powers(mapping.iter().copied());
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn monomial_ignores_zero_entries(mapping in raw_mapping(), extra in 0..NUM_VARS) {
            let m = Monomial::from_powers(mapping.iter().copied());
            let mut padded = mapping.clone();
            padded.push((Symbol::new(extra), 0));
            prop_assert!(m.is_equivalent_to(&padded));
            prop_assert!(m.powers().iter().all(|&(_, e)| e > 0));
        }

        #[test]
        fn monomial_degree_additive(a in raw_mapping(), b in raw_mapping()) {
            let a = Monomial::from_powers(a);
            let b = Monomial::from_powers(b);
            prop_assert_eq!(a.mul(&b).total_degree(), a.total_degree() + b.total_degree());
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        // Polynomial ring laws used by update expressions

        #[test]
        fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn poly_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            let left = a.mul(&b.add(&c));
            let right = a.mul(&b).add(&a.mul(&c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn poly_pow_matches_repeated_mul(a in small_poly(), n in 0u32..4) {
            let mut expected = Polynomial::one();
            for _ in 0..n {
                expected = expected.mul(&a);
            }
            prop_assert_eq!(a.pow(n), expected);
        }

        // Support extraction

        #[test]
        fn tuples_match_support(p in small_poly()) {
            let (table, gens) = state_table();
            let tuples = p.exponent_tuples(&gens, &table).unwrap();
            prop_assert_eq!(tuples.len(), p.len());

            for tuple in &tuples {
                let m = Monomial::from_powers(gens.iter().copied().zip(tuple.iter().copied()));
                prop_assert!(!p.coeff(&m).is_zero());
            }
        }
    }
}
