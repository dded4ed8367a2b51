//! Property-based tests for basis completion.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rustc_hash::FxHashSet;

    use treering_poly::{Monomial, Polynomial, Symbol};

    use crate::basis::MomentBasis;
    use crate::engine::expand;
    use crate::limits::{CompletionLimits, UpdateForm};
    use crate::system::PolynomialSystem;
    use crate::traits::{DependenceStructure, UpdateAlgebra};

    /// A random system with affine update relations.
    ///
    /// Affine relations never raise the degree, so every completion
    /// terminates.
    #[derive(Debug, Clone)]
    struct AffineModel {
        /// `support[i][j]` puts `x_j` into the relation of `x_i`; the last
        /// entry adds a constant.
        support: Vec<Vec<bool>>,
        edges: Vec<(usize, usize)>,
        initial: Vec<u32>,
    }

    fn affine_model() -> impl Strategy<Value = AffineModel> {
        (2usize..5).prop_flat_map(|n| {
            (
                proptest::collection::vec(proptest::collection::vec(any::<bool>(), n + 1), n),
                proptest::collection::vec((0..n, 0..n), 0..6),
                proptest::collection::vec(0u32..3, n),
            )
                .prop_map(|(support, edges, initial)| AffineModel {
                    support,
                    edges,
                    initial,
                })
        })
    }

    fn build(model: &AffineModel) -> (PolynomialSystem, Vec<(Symbol, u32)>) {
        let n = model.initial.len();
        let mut system = PolynomialSystem::new();
        let states: Vec<Symbol> = (0..n)
            .map(|i| system.add_state(&format!("x{i}")).unwrap())
            .collect();

        for (i, row) in model.support.iter().enumerate() {
            let mut relation = Polynomial::zero();
            for (j, &present) in row.iter().take(n).enumerate() {
                if present {
                    relation = relation.add(&Polynomial::var(states[j]));
                }
            }
            if row[n] {
                relation = relation.add(&Polynomial::one());
            }
            if relation.is_zero() {
                relation = Polynomial::var(states[i]);
            }
            system.define(states[i], relation).unwrap();
        }

        for &(a, b) in &model.edges {
            system.couple(states[a], states[b]).unwrap();
        }

        let mut initial: Vec<(Symbol, u32)> = states
            .iter()
            .copied()
            .zip(model.initial.iter().copied())
            .collect();
        if initial.iter().all(|&(_, e)| e == 0) {
            initial[0].1 = 1;
        }
        (system, initial)
    }

    fn form_strategy() -> impl Strategy<Value = UpdateForm> {
        any::<bool>().prop_map(UpdateForm::from_reduced)
    }

    /// Monomials a basis must track for `discovered` to be covered.
    fn required(
        system: &PolynomialSystem,
        discovered: &Monomial,
        form: UpdateForm,
    ) -> Vec<Monomial> {
        match form {
            UpdateForm::Unreduced => vec![discovered.clone()],
            UpdateForm::Reduced => {
                let active: Vec<Symbol> = discovered.symbols().collect();
                system
                    .dependence_graph()
                    .components(&active)
                    .unwrap()
                    .iter()
                    .map(|c| discovered.restrict(c))
                    .collect()
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn basis_has_no_duplicates(model in affine_model(), form in form_strategy()) {
            let (system, initial) = build(&model);
            let basis = system.complete(&initial, form, CompletionLimits::default()).unwrap();

            let distinct: FxHashSet<&Monomial> = basis.monomials().collect();
            prop_assert_eq!(distinct.len(), basis.len());
        }

        #[test]
        fn basis_is_closed(model in affine_model(), form in form_strategy()) {
            let (system, initial) = build(&model);
            let basis = system.complete(&initial, form, CompletionLimits::default()).unwrap();
            let states = system.state_symbols();

            for variable in &basis {
                let tuples = system.exponent_tuples(variable.update_relation(), states).unwrap();
                for tuple in tuples {
                    let discovered = Monomial::from_powers(
                        states.iter().copied().zip(tuple.iter().copied()),
                    );
                    for needed in required(&system, &discovered, form) {
                        prop_assert!(basis.contains(&needed), "missing {:?}", needed);
                    }
                }
            }
        }

        #[test]
        fn update_relations_match_products(model in affine_model(), form in form_strategy()) {
            let (system, initial) = build(&model);
            let basis = system.complete(&initial, form, CompletionLimits::default()).unwrap();

            for variable in &basis {
                let mut product = Polynomial::one();
                for &(var, power) in variable.monomial().powers() {
                    let relation = system.update_relation(var).unwrap();
                    product = product.mul(&relation.pow(power));
                }
                prop_assert_eq!(&product, variable.update_relation());
            }
        }

        #[test]
        fn reduced_basis_is_connected(model in affine_model()) {
            let (system, initial) = build(&model);
            let basis = system
                .complete(&initial, UpdateForm::Reduced, CompletionLimits::default())
                .unwrap();

            for monomial in basis.monomials() {
                let active: Vec<Symbol> = monomial.symbols().collect();
                let components = system.dependence_graph().components(&active).unwrap();
                prop_assert!(components.len() <= 1);
            }
        }

        #[test]
        fn completion_is_idempotent(model in affine_model(), form in form_strategy()) {
            let (system, initial) = build(&model);
            let mut basis = MomentBasis::new();
            system.complete_into(&initial, &mut basis, form, CompletionLimits::default()).unwrap();
            let before: Vec<Monomial> = basis.monomials().cloned().collect();

            system.complete_into(&initial, &mut basis, form, CompletionLimits::default()).unwrap();
            let after: Vec<Monomial> = basis.monomials().cloned().collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn update_form_succeeds_on_completed_basis(model in affine_model(), form in form_strategy()) {
            let (system, initial) = build(&model);
            let basis = system.complete(&initial, form, CompletionLimits::default()).unwrap();

            let updates = system.update_form(&basis, form).unwrap();
            prop_assert_eq!(updates.len(), basis.len());
        }

        #[test]
        fn unreduced_expand_matches_complete(model in affine_model()) {
            let (system, initial) = build(&model);
            let via_system = system
                .complete(&initial, UpdateForm::Unreduced, CompletionLimits::default())
                .unwrap();

            let mut basis = MomentBasis::new();
            expand(
                &initial,
                system.state_symbols(),
                &system.disturbance_symbols(),
                &system,
                system.dependence_graph(),
                &mut basis,
                UpdateForm::Unreduced,
                CompletionLimits::default(),
            )
            .unwrap();

            let a: Vec<&Monomial> = via_system.monomials().collect();
            let b: Vec<&Monomial> = basis.monomials().collect();
            prop_assert_eq!(a, b);
        }
    }
}
