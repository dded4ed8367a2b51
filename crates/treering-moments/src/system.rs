//! Polynomial dynamical systems.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use treering_graph::UndirectedGraph;
use treering_poly::polynomial::ExponentTuple;
use treering_poly::{Monomial, Polynomial, Symbol, SymbolKind, SymbolTable};

use crate::basis::MomentBasis;
use crate::engine::BasisCompletion;
use crate::error::CompletionError;
use crate::limits::{CompletionLimits, UpdateForm};
use crate::traits::{DependenceStructure, UpdateAlgebra};
use crate::variables::{DisturbanceVariable, Moments, StateVariable};

/// A discrete-time polynomial system with stochastic disturbances.
///
/// Owns the symbols, the ordered state variables with their update
/// relations, the disturbances and the dependence graph over the state
/// variables.
#[derive(Clone, Debug, Default)]
pub struct PolynomialSystem {
    table: SymbolTable,
    /// State variables in declaration order.
    states: Vec<Symbol>,
    relations: FxHashMap<Symbol, StateVariable>,
    disturbances: Vec<DisturbanceVariable>,
    graph: UndirectedGraph<Symbol>,
}

impl PolynomialSystem {
    /// Creates an empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a state variable, returning its symbol.
    ///
    /// Declaring the same name twice returns the existing symbol.
    ///
    /// # Errors
    ///
    /// Fails if `name` is already a disturbance.
    pub fn add_state(&mut self, name: &str) -> Result<Symbol, CompletionError> {
        let symbol = self.table.intern(name, SymbolKind::State)?;
        if self.graph.add_node(symbol) {
            self.states.push(symbol);
        }
        Ok(symbol)
    }

    /// Declares a disturbance with the given moments.
    ///
    /// # Errors
    ///
    /// Fails if `name` is already a state variable or an existing
    /// disturbance.
    pub fn add_disturbance(
        &mut self,
        name: &str,
        moments: Moments,
    ) -> Result<Symbol, CompletionError> {
        let symbol = self.table.intern(name, SymbolKind::Disturbance)?;
        if self.disturbance(symbol).is_some() {
            return Err(CompletionError::AlreadyDefined(name.to_string()));
        }
        self.disturbances
            .push(DisturbanceVariable::new(symbol, moments));
        Ok(symbol)
    }

    /// Sets the update relation of a state variable.
    ///
    /// # Errors
    ///
    /// Fails if `var` is not a state variable, already has a relation, or
    /// the relation mentions an undeclared symbol.
    pub fn define(&mut self, var: Symbol, relation: Polynomial) -> Result<(), CompletionError> {
        self.expect_state(var)?;
        if self.relations.contains_key(&var) {
            return Err(CompletionError::AlreadyDefined(self.table.display_name(var)));
        }
        for symbol in relation.symbols() {
            self.table.kind(symbol)?;
        }
        self.relations
            .insert(var, StateVariable::new(var, relation));
        Ok(())
    }

    /// Adds a dependence edge between two state variables.
    ///
    /// Returns false if the edge already existed or `a == b`.
    ///
    /// # Errors
    ///
    /// Fails if either endpoint is not a state variable.
    pub fn couple(&mut self, a: Symbol, b: Symbol) -> Result<bool, CompletionError> {
        self.expect_state(a)?;
        self.expect_state(b)?;
        Ok(self.graph.add_edge(a, b))
    }

    /// Couples every state variable with the state variables appearing in
    /// its update relation. Returns the number of new edges.
    pub fn couple_from_relations(&mut self) -> usize {
        let mut added = 0;
        for &var in &self.states {
            let Some(variable) = self.relations.get(&var) else {
                continue;
            };
            for other in variable.update_relation().symbols() {
                if self.table.kind(other).ok() == Some(SymbolKind::State)
                    && self.graph.add_edge(var, other)
                {
                    added += 1;
                }
            }
        }
        added
    }

    /// Returns the symbol table.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    /// Returns the state variables in declaration order.
    #[must_use]
    pub fn state_symbols(&self) -> &[Symbol] {
        &self.states
    }

    /// Returns the state variable of `symbol`, if its relation is defined.
    #[must_use]
    pub fn state_variable(&self, symbol: Symbol) -> Option<&StateVariable> {
        self.relations.get(&symbol)
    }

    /// Iterates over the defined state variables in declaration order.
    pub fn state_variables(&self) -> impl Iterator<Item = &StateVariable> + '_ {
        self.states.iter().filter_map(|s| self.relations.get(s))
    }

    /// Returns the disturbance symbols in declaration order.
    #[must_use]
    pub fn disturbance_symbols(&self) -> Vec<Symbol> {
        self.disturbances
            .iter()
            .map(DisturbanceVariable::symbol)
            .collect()
    }

    /// Returns the disturbance variable of `symbol`.
    #[must_use]
    pub fn disturbance(&self, symbol: Symbol) -> Option<&DisturbanceVariable> {
        self.disturbances.iter().find(|d| d.symbol() == symbol)
    }

    /// Returns the disturbances in declaration order.
    #[must_use]
    pub fn disturbances(&self) -> &[DisturbanceVariable] {
        &self.disturbances
    }

    /// Returns the dependence graph over the state variables.
    #[must_use]
    pub fn dependence_graph(&self) -> &UndirectedGraph<Symbol> {
        &self.graph
    }

    /// Checks that the system is ready for completion.
    ///
    /// # Errors
    ///
    /// Fails if a state variable has no update relation, a relation mentions
    /// an undeclared symbol, or a graph node is not a state variable.
    pub fn validate(&self) -> Result<(), CompletionError> {
        for &var in &self.states {
            let variable = self
                .relations
                .get(&var)
                .ok_or_else(|| CompletionError::MissingUpdateRelation(self.table.display_name(var)))?;
            for symbol in variable.update_relation().symbols() {
                self.table.kind(symbol)?;
            }
        }
        for &node in self.graph.nodes() {
            self.expect_state(node)?;
        }
        Ok(())
    }

    /// Completes a fresh basis from the monomial `initial`.
    ///
    /// # Errors
    ///
    /// See [`PolynomialSystem::complete_into`].
    pub fn complete(
        &self,
        initial: &[(Symbol, u32)],
        form: UpdateForm,
        limits: CompletionLimits,
    ) -> Result<MomentBasis, CompletionError> {
        let mut basis = MomentBasis::new();
        self.complete_into(initial, &mut basis, form, limits)?;
        Ok(basis)
    }

    /// Extends `basis` so that it is closed for the monomial `initial`.
    ///
    /// In reduced form the initial monomial is first split into its
    /// dependence-graph components. Seeds the basis already tracks are
    /// skipped, so completing the same monomial twice is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if `initial` mentions a symbol that is not a state variable, a
    /// reached state variable has no update relation, or a limit is
    /// exceeded. The basis keeps everything inserted before a failure.
    pub fn complete_into(
        &self,
        initial: &[(Symbol, u32)],
        basis: &mut MomentBasis,
        form: UpdateForm,
        limits: CompletionLimits,
    ) -> Result<(), CompletionError> {
        let monomial = Monomial::try_from_powers(initial.iter().copied())?;
        for symbol in monomial.symbols() {
            self.expect_state(symbol)?;
        }

        let seeds = match form {
            UpdateForm::Unreduced => vec![monomial.clone()],
            UpdateForm::Reduced => {
                let active: Vec<Symbol> = monomial.symbols().collect();
                self.graph
                    .components(&active)?
                    .iter()
                    .map(|component| monomial.restrict(component))
                    .collect()
            }
        };

        debug!(
            monomial = ?monomial,
            %form,
            seeds = seeds.len(),
            basis = basis.len(),
            "starting completion"
        );

        let disturbances = self.disturbance_symbols();
        let mut completion = BasisCompletion::new(self, &self.graph, &self.states, &disturbances)
            .with_form(form)
            .with_limits(limits);

        for seed in seeds {
            if basis.contains(&seed) {
                trace!(monomial = ?seed, "seed already tracked");
                continue;
            }
            completion.expand(seed.powers(), basis)?;
        }

        debug!(basis = basis.len(), "completion finished");
        Ok(())
    }

    fn expect_state(&self, symbol: Symbol) -> Result<(), CompletionError> {
        match self.table.kind(symbol)? {
            SymbolKind::State => Ok(()),
            SymbolKind::Disturbance => {
                Err(CompletionError::NotAState(self.table.display_name(symbol)))
            }
        }
    }
}

impl UpdateAlgebra for PolynomialSystem {
    type Expr = Polynomial;

    fn unit(&self) -> Polynomial {
        Polynomial::one()
    }

    fn update_relation(&self, var: Symbol) -> Result<&Polynomial, CompletionError> {
        self.relations
            .get(&var)
            .map(StateVariable::update_relation)
            .ok_or_else(|| CompletionError::MissingUpdateRelation(self.table.display_name(var)))
    }

    fn multiply(&self, lhs: &Polynomial, rhs: &Polynomial) -> Result<Polynomial, CompletionError> {
        Ok(lhs.try_mul(rhs)?)
    }

    fn power(&self, base: &Polynomial, exp: u32) -> Result<Polynomial, CompletionError> {
        Ok(base.try_pow(exp)?)
    }

    fn exponent_tuples(
        &self,
        expr: &Polynomial,
        gens: &[Symbol],
    ) -> Result<Vec<ExponentTuple>, CompletionError> {
        Ok(expr.exponent_tuples(gens, &self.table)?)
    }
}
