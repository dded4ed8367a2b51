//! Basis variables and the moment basis.
//!
//! The basis is an insertion-only set keyed by monomial equivalence: a
//! monomial is stored once, in discovery order, and never removed.

use rustc_hash::FxHashMap;
use std::fmt;

use treering_poly::{Monomial, Polynomial, Symbol, SymbolTable};

use crate::traits::EquivalentPowers;

/// A tracked monomial together with its one-step update expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasisVariable<E = Polynomial> {
    monomial: Monomial,
    update_relation: E,
}

impl<E> BasisVariable<E> {
    /// Creates a basis variable.
    #[must_use]
    pub fn new(monomial: Monomial, update_relation: E) -> Self {
        Self {
            monomial,
            update_relation,
        }
    }

    /// Returns the tracked monomial.
    #[must_use]
    pub fn monomial(&self) -> &Monomial {
        &self.monomial
    }

    /// Returns the update expression.
    #[must_use]
    pub fn update_relation(&self) -> &E {
        &self.update_relation
    }

    /// Returns the total degree of the tracked monomial.
    #[must_use]
    pub fn degree(&self) -> u64 {
        self.monomial.total_degree()
    }
}

impl<E> EquivalentPowers for BasisVariable<E> {
    fn is_equivalent(&self, mapping: &[(Symbol, u32)]) -> bool {
        self.monomial.is_equivalent_to(mapping)
    }
}

/// The moment basis being completed.
#[derive(Clone, Debug)]
pub struct MomentBasis<E = Polynomial> {
    /// Basis variables in insertion order.
    variables: Vec<BasisVariable<E>>,
    /// Position of every monomial in `variables`.
    index: FxHashMap<Monomial, usize>,
}

impl<E> Default for MomentBasis<E> {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<E> MomentBasis<E> {
    /// Creates an empty basis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a basis variable.
    ///
    /// Returns false, leaving the basis unchanged, if an equivalent
    /// monomial is already present.
    pub fn insert(&mut self, variable: BasisVariable<E>) -> bool {
        if self.index.contains_key(&variable.monomial) {
            return false;
        }
        self.index
            .insert(variable.monomial.clone(), self.variables.len());
        self.variables.push(variable);
        true
    }

    /// Returns true if a basis variable tracks `monomial`.
    #[must_use]
    pub fn contains(&self, monomial: &Monomial) -> bool {
        self.index.contains_key(monomial)
    }

    /// Returns true if any basis variable is equivalent to the raw mapping.
    #[must_use]
    pub fn contains_mapping(&self, mapping: &[(Symbol, u32)]) -> bool {
        self.variables.iter().any(|v| v.is_equivalent(mapping))
    }

    /// Returns the position of the variable tracking `monomial`.
    #[must_use]
    pub fn position(&self, monomial: &Monomial) -> Option<usize> {
        self.index.get(monomial).copied()
    }

    /// Returns the variable tracking `monomial`.
    #[must_use]
    pub fn find(&self, monomial: &Monomial) -> Option<&BasisVariable<E>> {
        self.position(monomial).map(|i| &self.variables[i])
    }

    /// Returns the variable at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&BasisVariable<E>> {
        self.variables.get(position)
    }

    /// Returns the number of basis variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the basis is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over the basis variables in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, BasisVariable<E>> {
        self.variables.iter()
    }

    /// Iterates over the tracked monomials in insertion order.
    pub fn monomials(&self) -> impl Iterator<Item = &Monomial> + '_ {
        self.variables.iter().map(BasisVariable::monomial)
    }

    /// Returns a displayable listing that resolves names through `table`.
    #[must_use]
    pub fn display<'a>(&'a self, table: &'a SymbolTable) -> DisplayBasis<'a, E> {
        DisplayBasis { basis: self, table }
    }
}

impl<'a, E> IntoIterator for &'a MomentBasis<E> {
    type Item = &'a BasisVariable<E>;
    type IntoIter = std::slice::Iter<'a, BasisVariable<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A basis paired with the table that names its symbols.
pub struct DisplayBasis<'a, E> {
    basis: &'a MomentBasis<E>,
    table: &'a SymbolTable,
}

impl<E> fmt::Display for DisplayBasis<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.basis.monomials().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", m.display(self.table))?;
        }
        write!(f, "}}")
    }
}
