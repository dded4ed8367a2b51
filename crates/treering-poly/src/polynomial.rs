//! Sparse multivariate polynomials over exact rationals.
//!
//! Terms are stored as (monomial, coefficient) pairs, sorted by graded
//! lexicographic order with the leading term first. Like terms are always
//! combined and zero terms dropped, so the term list is the polynomial's
//! support.

use num_traits::{One, Zero};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::fmt;

use crate::coeff::Coeff;
use crate::error::PolyError;
use crate::monomial::Monomial;
use crate::symbol::{Symbol, SymbolKind, SymbolTable};

/// An exponent tuple aligned to an ordered list of generators.
pub type ExponentTuple = SmallVec<[u32; 8]>;

/// A sparse multivariate polynomial.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    /// Terms in descending graded lexicographic order.
    terms: Vec<(Monomial, Coeff)>,
}

impl Polynomial {
    /// Creates a polynomial from terms.
    ///
    /// Terms are combined, zero coefficients removed and the result sorted.
    #[must_use]
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (Monomial, Coeff)>,
    {
        let mut combined: FxHashMap<Monomial, Coeff> = FxHashMap::default();
        for (m, c) in terms {
            let slot = combined.entry(m).or_insert_with(Coeff::zero);
            *slot = slot.clone() + c;
        }

        let mut terms: Vec<_> = combined.into_iter().filter(|(_, c)| !c.is_zero()).collect();
        terms.sort_by(|a, b| b.0.cmp_grlex(&a.0));
        Self { terms }
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::constant(Coeff::one())
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: Coeff) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![(Monomial::one(), c)],
            }
        }
    }

    /// Creates the polynomial consisting of a single variable.
    #[must_use]
    pub fn var(symbol: Symbol) -> Self {
        Self {
            terms: vec![(Monomial::var(symbol), Coeff::one())],
        }
    }

    /// Creates the single term `c * m`.
    #[must_use]
    pub fn term(m: Monomial, c: Coeff) -> Self {
        Self::from_terms([(m, c)])
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the terms.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, Coeff)] {
        &self.terms
    }

    /// Returns the leading term.
    #[must_use]
    pub fn leading_term(&self) -> Option<&(Monomial, Coeff)> {
        self.terms.first()
    }

    /// Returns the coefficient of `m` (zero if absent).
    #[must_use]
    pub fn coeff(&self, m: &Monomial) -> Coeff {
        self.terms
            .iter()
            .find(|(tm, _)| tm == m)
            .map_or_else(Coeff::zero, |(_, c)| c.clone())
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::from_terms(self.terms.iter().chain(&other.terms).cloned())
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c.clone())).collect(),
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    ///
    /// # Panics
    ///
    /// Panics if an exponent overflows `u32`; see [`Polynomial::try_mul`].
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        match self.try_mul(other) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Multiplies two polynomials.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ExponentOverflow`] if a product exponent does
    /// not fit in `u32`.
    pub fn try_mul(&self, other: &Self) -> Result<Self, PolyError> {
        if self.is_zero() || other.is_zero() {
            return Ok(Self::zero());
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                let m = m1.checked_mul(m2).ok_or(PolyError::ExponentOverflow)?;
                terms.push((m, c1.clone() * c2.clone()));
            }
        }

        Ok(Self::from_terms(terms))
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &Coeff) -> Self {
        if c.is_zero() {
            return Self::zero();
        }

        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, x)| (m.clone(), x.clone() * c.clone()))
                .collect(),
        }
    }

    /// Computes self^n by repeated squaring.
    ///
    /// # Panics
    ///
    /// Panics if an exponent overflows `u32`; see [`Polynomial::try_pow`].
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        match self.try_pow(n) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Computes self^n by repeated squaring.
    ///
    /// The base is only squared while bits of `n` remain, so no
    /// intermediate power exceeds the result's degree.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ExponentOverflow`] if an exponent of the result
    /// does not fit in `u32`.
    pub fn try_pow(&self, n: u32) -> Result<Self, PolyError> {
        if n == 0 {
            return Ok(Self::one());
        }

        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result.try_mul(&base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.try_mul(&base)?;
            }
        }

        Ok(result)
    }

    /// Computes the total degree (zero for the zero polynomial).
    #[must_use]
    pub fn total_degree(&self) -> u64 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Computes the degree in a single symbol.
    #[must_use]
    pub fn degree_in(&self, symbol: Symbol) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.power(symbol))
            .max()
            .unwrap_or(0)
    }

    /// Returns every symbol occurring in the polynomial, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self
            .terms
            .iter()
            .flat_map(|(m, _)| m.symbols())
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();
        symbols.sort_unstable();
        symbols
    }

    /// Expands the polynomial over the ordered generators `gens` and returns
    /// the exponent tuples of its monomials.
    ///
    /// Symbols outside `gens` must be disturbances; they are treated as part
    /// of the coefficient domain, so terms differing only in disturbance
    /// factors collapse to one tuple. Tuples are distinct and follow the
    /// term order.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::StrayGenerator`] if a state symbol is missing
    /// from `gens`, or [`PolyError::UnknownSymbol`] if a symbol is not in
    /// `table`.
    pub fn exponent_tuples(
        &self,
        gens: &[Symbol],
        table: &SymbolTable,
    ) -> Result<Vec<ExponentTuple>, PolyError> {
        let position: FxHashMap<Symbol, usize> =
            gens.iter().enumerate().map(|(i, &s)| (s, i)).collect();

        let mut seen: FxHashSet<ExponentTuple> = FxHashSet::default();
        let mut tuples = Vec::new();

        for (m, _) in &self.terms {
            let mut tuple: ExponentTuple = smallvec::smallvec![0; gens.len()];
            for &(symbol, exp) in m.powers() {
                if let Some(&i) = position.get(&symbol) {
                    tuple[i] = exp;
                } else if table.kind(symbol)? == SymbolKind::State {
                    return Err(PolyError::StrayGenerator(table.display_name(symbol)));
                }
            }
            if seen.insert(tuple.clone()) {
                tuples.push(tuple);
            }
        }

        Ok(tuples)
    }

    /// Groups the terms by their restriction to `keep`.
    ///
    /// Each entry pairs the kept part of a monomial with the polynomial
    /// formed by the remaining factors and coefficients.
    #[must_use]
    pub fn collect_by(&self, mut keep: impl FnMut(Symbol) -> bool) -> Vec<(Monomial, Polynomial)> {
        let mut groups: FxHashMap<Monomial, Vec<(Monomial, Coeff)>> = FxHashMap::default();
        for (m, c) in &self.terms {
            let (kept, rest) = m.split(&mut keep);
            groups.entry(kept).or_default().push((rest, c.clone()));
        }

        let mut collected: Vec<_> = groups
            .into_iter()
            .map(|(m, terms)| (m, Self::from_terms(terms)))
            .filter(|(_, p)| !p.is_zero())
            .collect();
        collected.sort_by(|a, b| b.0.cmp_grlex(&a.0));
        collected
    }

    /// Returns a displayable view that resolves names through `table`.
    #[must_use]
    pub fn display<'a>(&'a self, table: &'a SymbolTable) -> DisplayPolynomial<'a> {
        DisplayPolynomial { poly: self, table }
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.terms.iter().map(|(m, c)| (c, m)))
            .finish()
    }
}

/// A polynomial paired with the table that names its symbols.
pub struct DisplayPolynomial<'a> {
    poly: &'a Polynomial,
    table: &'a SymbolTable,
}

impl fmt::Display for DisplayPolynomial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.poly.is_zero() {
            return write!(f, "0");
        }

        for (i, (m, c)) in self.poly.terms.iter().enumerate() {
            let magnitude = if c.is_negative() { -c.clone() } else { c.clone() };
            if i == 0 {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else if c.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }

            if m.is_one() {
                write!(f, "{magnitude}")?;
            } else if magnitude.is_one() {
                write!(f, "{}", m.display(self.table))?;
            } else {
                write!(f, "{magnitude}*{}", m.display(self.table))?;
            }
        }
        Ok(())
    }
}
