//! The basis completion engine.
//!
//! Completion is a depth-first search over monomials:
//! 1. Materialize the candidate: build its update expression as the product
//!    of its variables' update relations raised to their powers, and insert
//!    it into the basis.
//! 2. Expand the update over the ordered state variables and read off the
//!    monomials it contains.
//! 3. Recurse on every discovered monomial (unreduced form) or on every
//!    dependence-graph component of it (reduced form) that the basis does
//!    not yet contain.
//!
//! The candidate is inserted before its discoveries are visited, so the
//! search never revisits a monomial and stops at the fixed point where
//! every discovered monomial is already tracked.

use tracing::{debug, trace, warn};

use treering_poly::polynomial::ExponentTuple;
use treering_poly::{Monomial, Symbol};

use crate::basis::{BasisVariable, MomentBasis};
use crate::error::CompletionError;
use crate::limits::{CompletionLimits, UpdateForm};
use crate::traits::{DependenceStructure, UpdateAlgebra};

/// Context for one completion.
///
/// Holds the read-only collaborators and the current recursion depth. The
/// basis is passed separately so that several completions can extend the
/// same basis one after another.
pub struct BasisCompletion<'a, A, G> {
    algebra: &'a A,
    graph: &'a G,
    state_variables: &'a [Symbol],
    disturbance_variables: &'a [Symbol],
    form: UpdateForm,
    limits: CompletionLimits,
    /// Length of the current discovery chain.
    depth: usize,
}

impl<'a, A, G> BasisCompletion<'a, A, G>
where
    A: UpdateAlgebra,
    G: DependenceStructure,
{
    /// Creates a completion context with the reduced form and default limits.
    ///
    /// `state_variables` fixes the order in which update expressions are
    /// expanded; it must list every state variable the update relations
    /// mention.
    #[must_use]
    pub fn new(
        algebra: &'a A,
        graph: &'a G,
        state_variables: &'a [Symbol],
        disturbance_variables: &'a [Symbol],
    ) -> Self {
        Self {
            algebra,
            graph,
            state_variables,
            disturbance_variables,
            form: UpdateForm::default(),
            limits: CompletionLimits::default(),
            depth: 0,
        }
    }

    /// Sets the update form.
    #[must_use]
    pub fn with_form(mut self, form: UpdateForm) -> Self {
        self.form = form;
        self
    }

    /// Sets the completion limits.
    #[must_use]
    pub fn with_limits(mut self, limits: CompletionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the update form.
    #[must_use]
    pub fn form(&self) -> UpdateForm {
        self.form
    }

    /// Returns the completion limits.
    #[must_use]
    pub fn limits(&self) -> &CompletionLimits {
        &self.limits
    }

    /// Returns the ordered state variables.
    #[must_use]
    pub fn state_variables(&self) -> &[Symbol] {
        self.state_variables
    }

    /// Returns the disturbance variables.
    #[must_use]
    pub fn disturbance_variables(&self) -> &[Symbol] {
        self.disturbance_variables
    }

    /// Materializes `mapping` and everything its update discovers.
    ///
    /// Zero-power entries of `mapping` are ignored. The mapping itself is not
    /// checked against the basis: callers skip monomials that are already
    /// present.
    ///
    /// # Errors
    ///
    /// Propagates algebra and graph failures, and reports exceeded limits.
    /// The basis keeps every variable inserted before the failure.
    pub fn expand(
        &mut self,
        mapping: &[(Symbol, u32)],
        basis: &mut MomentBasis<A::Expr>,
    ) -> Result<(), CompletionError> {
        let monomial = Monomial::try_from_powers(mapping.iter().copied())?;
        self.materialize(monomial, basis)
    }

    fn materialize(
        &mut self,
        monomial: Monomial,
        basis: &mut MomentBasis<A::Expr>,
    ) -> Result<(), CompletionError> {
        self.check_limits(&monomial, basis)?;

        let mut update = self.algebra.unit();
        for &(var, power) in monomial.powers() {
            let relation = self.algebra.update_relation(var)?;
            let factor = self.algebra.power(relation, power)?;
            update = self.algebra.multiply(&update, &factor)?;
        }
        let support = self.algebra.exponent_tuples(&update, self.state_variables)?;

        debug!(
            monomial = ?monomial,
            depth = self.depth,
            terms = support.len(),
            "materialized basis variable"
        );
        basis.insert(BasisVariable::new(monomial, update));

        self.depth += 1;
        let result = self.visit_support(&support, basis);
        self.depth -= 1;
        result
    }

    fn visit_support(
        &mut self,
        support: &[ExponentTuple],
        basis: &mut MomentBasis<A::Expr>,
    ) -> Result<(), CompletionError> {
        for tuple in support {
            let discovered = Monomial::try_from_powers(
                self.state_variables
                    .iter()
                    .copied()
                    .zip(tuple.iter().copied()),
            )?;

            match self.form {
                UpdateForm::Unreduced => self.visit(discovered, basis)?,
                UpdateForm::Reduced => {
                    let active: Vec<Symbol> = discovered.symbols().collect();
                    for component in self.graph.components(&active)? {
                        self.visit(discovered.restrict(&component), basis)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn visit(
        &mut self,
        monomial: Monomial,
        basis: &mut MomentBasis<A::Expr>,
    ) -> Result<(), CompletionError> {
        if basis.contains(&monomial) {
            trace!(monomial = ?monomial, "already tracked");
            return Ok(());
        }
        self.materialize(monomial, basis)
    }

    fn check_limits(
        &self,
        monomial: &Monomial,
        basis: &MomentBasis<A::Expr>,
    ) -> Result<(), CompletionError> {
        if let Some(limit) = self.limits.max_basis_size {
            if basis.len() >= limit {
                warn!(limit, "moment basis size limit reached");
                return Err(CompletionError::BasisLimitExceeded { limit });
            }
        }

        if let Some(limit) = self.limits.max_degree {
            let degree = monomial.total_degree();
            if degree > u64::from(limit) {
                warn!(monomial = ?monomial, degree, limit, "monomial degree limit exceeded");
                return Err(CompletionError::DegreeLimitExceeded {
                    monomial: format!("{monomial:?}"),
                    degree,
                    limit,
                });
            }
        }

        if let Some(limit) = self.limits.max_depth {
            if self.depth > limit {
                warn!(limit, "expansion depth limit exceeded");
                return Err(CompletionError::DepthLimitExceeded { limit });
            }
        }

        Ok(())
    }
}

/// Completes `moment_basis` from the variable-power mapping `mapping`.
///
/// This is the one-shot form of [`BasisCompletion::expand`]. The mapping is
/// materialized unconditionally; every monomial its update discovers is
/// materialized only if the basis does not already track it. Returns the
/// basis for convenience.
///
/// # Errors
///
/// See [`BasisCompletion::expand`].
#[allow(clippy::too_many_arguments)]
pub fn expand<'b, A, G>(
    mapping: &[(Symbol, u32)],
    state_variables: &[Symbol],
    disturbance_variables: &[Symbol],
    algebra: &A,
    dependence_graph: &G,
    moment_basis: &'b mut MomentBasis<A::Expr>,
    form: UpdateForm,
    limits: CompletionLimits,
) -> Result<&'b mut MomentBasis<A::Expr>, CompletionError>
where
    A: UpdateAlgebra,
    G: DependenceStructure,
{
    BasisCompletion::new(
        algebra,
        dependence_graph,
        state_variables,
        disturbance_variables,
    )
    .with_form(form)
    .with_limits(limits)
    .expand(mapping, moment_basis)?;

    Ok(moment_basis)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rustc_hash::{FxHashMap, FxHashSet};
    use treering_graph::UndirectedGraph;
    use treering_poly::{Polynomial, PolyError};

    use crate::system::PolynomialSystem;

    /// An algebra that only tracks which monomials appear, never their
    /// coefficients.
    struct SupportAlgebra {
        relations: FxHashMap<Symbol, Vec<Monomial>>,
    }

    impl UpdateAlgebra for SupportAlgebra {
        type Expr = Vec<Monomial>;

        fn unit(&self) -> Self::Expr {
            vec![Monomial::one()]
        }

        fn update_relation(&self, var: Symbol) -> Result<&Self::Expr, CompletionError> {
            self.relations
                .get(&var)
                .ok_or_else(|| CompletionError::MissingUpdateRelation(var.to_string()))
        }

        fn multiply(
            &self,
            lhs: &Self::Expr,
            rhs: &Self::Expr,
        ) -> Result<Self::Expr, CompletionError> {
            let mut out: Vec<Monomial> = Vec::new();
            let mut seen = FxHashSet::default();
            for a in lhs {
                for b in rhs {
                    let m = a
                        .checked_mul(b)
                        .ok_or(CompletionError::Poly(PolyError::ExponentOverflow))?;
                    if seen.insert(m.clone()) {
                        out.push(m);
                    }
                }
            }
            Ok(out)
        }

        fn power(&self, base: &Self::Expr, exp: u32) -> Result<Self::Expr, CompletionError> {
            let mut out = self.unit();
            for _ in 0..exp {
                out = self.multiply(&out, base)?;
            }
            Ok(out)
        }

        fn exponent_tuples(
            &self,
            expr: &Self::Expr,
            gens: &[Symbol],
        ) -> Result<Vec<ExponentTuple>, CompletionError> {
            Ok(expr
                .iter()
                .map(|m| gens.iter().map(|&g| m.power(g)).collect())
                .collect())
        }
    }

    fn s(i: u32) -> Symbol {
        Symbol::new(i)
    }

    fn monomials(basis: &MomentBasis<Vec<Monomial>>) -> FxHashSet<Monomial> {
        basis.monomials().cloned().collect()
    }

    #[test]
    fn test_scenario_x_plus_y() {
        // x' = x + y, y' = y, edge x - y
        let (x, y) = (s(0), s(1));
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([
                (x, vec![Monomial::var(x), Monomial::var(y)]),
                (y, vec![Monomial::var(y)]),
            ]),
        };
        let graph = UndirectedGraph::from_edges([(x, y)]);
        let states = [x, y];

        let mut basis = MomentBasis::new();
        expand(
            &[(x, 1)],
            &states,
            &[],
            &algebra,
            &graph,
            &mut basis,
            UpdateForm::Reduced,
            CompletionLimits::default(),
        )
        .unwrap();

        assert_eq!(basis.len(), 2);
        assert_eq!(basis.get(0).map(BasisVariable::monomial), Some(&Monomial::var(x)));
        assert_eq!(basis.get(1).map(BasisVariable::monomial), Some(&Monomial::var(y)));
    }

    #[test]
    fn test_zero_entries_dropped_from_input() {
        let (x, y) = (s(0), s(1));
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([
                (x, vec![Monomial::var(x)]),
                (y, vec![Monomial::var(y)]),
            ]),
        };
        let graph = UndirectedGraph::with_nodes([x, y]);

        let mut basis = MomentBasis::new();
        BasisCompletion::new(&algebra, &graph, &[x, y], &[])
            .expand(&[(y, 0), (x, 2)], &mut basis)
            .unwrap();

        assert_eq!(monomials(&basis), FxHashSet::from_iter([Monomial::from_powers([(x, 2)])]));
    }

    #[test]
    fn test_unreduced_tracks_constant() {
        // x' = x + 1: the constant term becomes its own basis variable
        let x = s(0);
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([(x, vec![Monomial::var(x), Monomial::one()])]),
        };
        let graph = UndirectedGraph::with_nodes([x]);

        let mut unreduced = MomentBasis::new();
        BasisCompletion::new(&algebra, &graph, &[x], &[])
            .with_form(UpdateForm::Unreduced)
            .expand(&[(x, 1)], &mut unreduced)
            .unwrap();
        assert_eq!(
            monomials(&unreduced),
            FxHashSet::from_iter([Monomial::var(x), Monomial::one()])
        );

        let mut reduced = MomentBasis::new();
        BasisCompletion::new(&algebra, &graph, &[x], &[])
            .expand(&[(x, 1)], &mut reduced)
            .unwrap();
        assert_eq!(monomials(&reduced), FxHashSet::from_iter([Monomial::var(x)]));
    }

    #[test]
    fn test_degree_limit_stops_runaway() {
        // x' = x^2 never closes
        let x = s(0);
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([(x, vec![Monomial::from_powers([(x, 2)])])]),
        };
        let graph = UndirectedGraph::with_nodes([x]);

        let mut basis = MomentBasis::new();
        let err = BasisCompletion::new(&algebra, &graph, &[x], &[])
            .with_limits(CompletionLimits::unbounded().with_max_degree(8))
            .expand(&[(x, 1)], &mut basis)
            .unwrap_err();

        assert!(matches!(
            err,
            CompletionError::DegreeLimitExceeded { degree: 16, limit: 8, .. }
        ));
        // x, x^2, x^4, x^8 were materialized before the abort
        assert_eq!(basis.len(), 4);
    }

    #[test]
    fn test_depth_and_size_limits() {
        // x' = x^2 again, bounded by depth and by size instead
        let x = s(0);
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([(x, vec![Monomial::from_powers([(x, 2)])])]),
        };
        let graph = UndirectedGraph::with_nodes([x]);

        let mut basis = MomentBasis::new();
        let err = BasisCompletion::new(&algebra, &graph, &[x], &[])
            .with_limits(CompletionLimits::unbounded().with_max_depth(2))
            .expand(&[(x, 1)], &mut basis)
            .unwrap_err();
        assert_eq!(err, CompletionError::DepthLimitExceeded { limit: 2 });
        assert_eq!(basis.len(), 3);

        let mut basis = MomentBasis::new();
        let err = BasisCompletion::new(&algebra, &graph, &[x], &[])
            .with_limits(CompletionLimits::unbounded().with_max_basis_size(5))
            .expand(&[(x, 1)], &mut basis)
            .unwrap_err();
        assert_eq!(err, CompletionError::BasisLimitExceeded { limit: 5 });
        assert_eq!(basis.len(), 5);
    }

    #[test]
    fn test_missing_node_is_fatal() {
        let (x, y) = (s(0), s(1));
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([
                (x, vec![Monomial::var(y)]),
                (y, vec![Monomial::var(y)]),
            ]),
        };
        // y was never added to the graph
        let graph = UndirectedGraph::with_nodes([x]);

        let mut basis = MomentBasis::new();
        let err = BasisCompletion::new(&algebra, &graph, &[x, y], &[])
            .expand(&[(x, 1)], &mut basis)
            .unwrap_err();
        assert!(matches!(err, CompletionError::Graph(_)));
    }

    #[test]
    fn test_builder_settings() {
        let (x, w) = (s(0), s(1));
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([(x, vec![Monomial::var(x)])]),
        };
        let graph = UndirectedGraph::with_nodes([x]);
        let limits = CompletionLimits::unbounded().with_max_depth(3);
        let (states, noise) = ([x], [w]);

        let completion = BasisCompletion::new(&algebra, &graph, &states, &noise)
            .with_form(UpdateForm::Unreduced)
            .with_limits(limits);

        assert_eq!(completion.form(), UpdateForm::Unreduced);
        assert_eq!(completion.limits(), &limits);
        assert_eq!(completion.state_variables(), &[x]);
        assert_eq!(completion.disturbance_variables(), &[w]);

        let defaults = BasisCompletion::new(&algebra, &graph, &states, &[]);
        assert!(defaults.form().is_reduced());
        assert_eq!(defaults.limits(), &CompletionLimits::default());
    }

    #[test]
    fn test_state_order_must_cover_relations() {
        // x' = x + y, but y is left out of the expansion order
        let mut system = PolynomialSystem::new();
        let x = system.add_state("x").unwrap();
        let y = system.add_state("y").unwrap();
        system
            .define(x, Polynomial::var(x).add(&Polynomial::var(y)))
            .unwrap();
        system.define(y, Polynomial::var(y)).unwrap();
        system.couple(x, y).unwrap();

        let mut basis = MomentBasis::new();
        let err = expand(
            &[(x, 1)],
            &[x],
            &[],
            &system,
            system.dependence_graph(),
            &mut basis,
            UpdateForm::Reduced,
            CompletionLimits::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            CompletionError::Poly(PolyError::StrayGenerator("y".to_string()))
        );
        // nothing is inserted when the update cannot be expanded
        assert!(basis.is_empty());
    }

    #[test]
    fn test_update_overflow_is_an_error() {
        // y' = y^(2^30): the seed y^4 is small but its update is y^(2^32)
        let mut system = PolynomialSystem::new();
        let y = system.add_state("y").unwrap();
        system.define(y, Polynomial::var(y).pow(1 << 30)).unwrap();

        let mut basis = MomentBasis::new();
        let err = BasisCompletion::new(&system, system.dependence_graph(), &[y], &[])
            .expand(&[(y, 4)], &mut basis)
            .unwrap_err();

        assert_eq!(err, CompletionError::Poly(PolyError::ExponentOverflow));
        assert!(basis.is_empty());
    }

    #[test]
    fn test_repeated_input_symbol_overflow() {
        let x = s(0);
        let algebra = SupportAlgebra {
            relations: FxHashMap::from_iter([(x, vec![Monomial::var(x)])]),
        };
        let graph = UndirectedGraph::with_nodes([x]);

        let mut basis = MomentBasis::new();
        let err = BasisCompletion::new(&algebra, &graph, &[x], &[])
            .expand(&[(x, u32::MAX), (x, 1)], &mut basis)
            .unwrap_err();
        assert_eq!(err, CompletionError::Poly(PolyError::ExponentOverflow));
    }
}
