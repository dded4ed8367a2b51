//! Canonical sparse monomials.
//!
//! A monomial is a variable-power mapping stored as `(symbol, exponent)`
//! pairs sorted by symbol. Zero exponents are never stored, so the derived
//! `Eq` and `Hash` coincide with mapping equivalence: two mappings that
//! differ only in zero entries or in iteration order build the same
//! monomial.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

use crate::error::PolyError;
use crate::symbol::{Symbol, SymbolTable};

/// Inline storage for monomial factors.
pub type Powers = SmallVec<[(Symbol, u32); 4]>;

/// A monomial over interned symbols.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Monomial {
    /// Factors sorted by symbol, every exponent positive.
    powers: Powers,
}

impl Monomial {
    /// Creates the identity monomial (1).
    #[must_use]
    pub fn one() -> Self {
        Self::default()
    }

    /// Creates the monomial `x`.
    #[must_use]
    pub fn var(symbol: Symbol) -> Self {
        Self {
            powers: smallvec::smallvec![(symbol, 1)],
        }
    }

    /// Creates a monomial from a variable-power mapping.
    ///
    /// Zero exponents are dropped and repeated symbols have their exponents
    /// added, so the result is independent of the input order.
    ///
    /// # Panics
    ///
    /// Panics if the exponents of a repeated symbol overflow `u32`. Use
    /// [`Monomial::try_from_powers`] for untrusted input.
    #[must_use]
    pub fn from_powers<I>(powers: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, u32)>,
    {
        match Self::try_from_powers(powers) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a monomial from a variable-power mapping.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ExponentOverflow`] if the exponents of a
    /// repeated symbol overflow `u32`.
    pub fn try_from_powers<I>(powers: I) -> Result<Self, PolyError>
    where
        I: IntoIterator<Item = (Symbol, u32)>,
    {
        let mut collected: Powers = powers.into_iter().filter(|&(_, e)| e != 0).collect();
        collected.sort_unstable_by_key(|&(s, _)| s);

        let mut merged = Powers::with_capacity(collected.len());
        for (symbol, exp) in collected {
            match merged.last_mut() {
                Some((last, total)) if *last == symbol => {
                    *total = total.checked_add(exp).ok_or(PolyError::ExponentOverflow)?;
                }
                _ => merged.push((symbol, exp)),
            }
        }

        Ok(Self { powers: merged })
    }

    /// Returns the exponent of `symbol` (zero if absent).
    #[must_use]
    pub fn power(&self, symbol: Symbol) -> u32 {
        self.powers
            .binary_search_by_key(&symbol, |&(s, _)| s)
            .map_or(0, |i| self.powers[i].1)
    }

    /// Returns the factors in symbol order.
    #[must_use]
    pub fn powers(&self) -> &[(Symbol, u32)] {
        &self.powers
    }

    /// Iterates over the symbols with positive exponent.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.powers.iter().map(|&(s, _)| s)
    }

    /// Returns the number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Returns true if this is the identity monomial.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.powers.is_empty()
    }

    /// Returns the total degree.
    ///
    /// Widened to `u64`, since the sum of valid exponents can exceed `u32`.
    #[must_use]
    pub fn total_degree(&self) -> u64 {
        self.powers.iter().map(|&(_, e)| u64::from(e)).sum()
    }

    /// Checks whether this monomial is equivalent to a raw mapping.
    ///
    /// The mapping may contain zero exponents and any ordering.
    #[must_use]
    pub fn is_equivalent_to(&self, mapping: &[(Symbol, u32)]) -> bool {
        *self == Self::from_powers(mapping.iter().copied())
    }

    /// Multiplies two monomials (adds exponents).
    ///
    /// # Panics
    ///
    /// Panics if an exponent overflows `u32`; see [`Monomial::checked_mul`].
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        match self.checked_mul(other) {
            Some(m) => m,
            None => panic!("{}", PolyError::ExponentOverflow),
        }
    }

    /// Multiplies two monomials, returning `None` if an exponent overflows.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        let mut powers = Powers::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);

        while i < self.powers.len() && j < other.powers.len() {
            let (a, ea) = self.powers[i];
            let (b, eb) = other.powers[j];
            match a.cmp(&b) {
                Ordering::Less => {
                    powers.push((a, ea));
                    i += 1;
                }
                Ordering::Greater => {
                    powers.push((b, eb));
                    j += 1;
                }
                Ordering::Equal => {
                    powers.push((a, ea.checked_add(eb)?));
                    i += 1;
                    j += 1;
                }
            }
        }
        powers.extend_from_slice(&self.powers[i..]);
        powers.extend_from_slice(&other.powers[j..]);

        Some(Self { powers })
    }

    /// Raises the monomial to a power.
    ///
    /// # Panics
    ///
    /// Panics if an exponent overflows `u32`; see [`Monomial::checked_pow`].
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        match self.checked_pow(exp) {
            Some(m) => m,
            None => panic!("{}", PolyError::ExponentOverflow),
        }
    }

    /// Raises the monomial to a power, returning `None` on overflow.
    #[must_use]
    pub fn checked_pow(&self, exp: u32) -> Option<Self> {
        if exp == 0 {
            return Some(Self::one());
        }
        let powers = self
            .powers
            .iter()
            .map(|&(s, e)| e.checked_mul(exp).map(|p| (s, p)))
            .collect::<Option<Powers>>()?;
        Some(Self { powers })
    }

    /// Restricts the monomial to the given symbols.
    #[must_use]
    pub fn restrict(&self, symbols: &[Symbol]) -> Self {
        self.filter(|s| symbols.contains(&s))
    }

    /// Keeps only the factors whose symbol satisfies `keep`.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(Symbol) -> bool) -> Self {
        Self {
            powers: self.powers.iter().copied().filter(|&(s, _)| keep(s)).collect(),
        }
    }

    /// Splits the monomial into the factors satisfying `pred` and the rest.
    #[must_use]
    pub fn split(&self, mut pred: impl FnMut(Symbol) -> bool) -> (Self, Self) {
        let (matching, rest): (Powers, Powers) =
            self.powers.iter().copied().partition(|&(s, _)| pred(s));
        (Self { powers: matching }, Self { powers: rest })
    }

    /// Compares by graded lexicographic order.
    ///
    /// Total degree first; ties are broken by the earliest symbol with the
    /// larger exponent.
    #[must_use]
    pub fn cmp_grlex(&self, other: &Self) -> Ordering {
        match self.total_degree().cmp(&other.total_degree()) {
            Ordering::Equal => {}
            ord => return ord,
        }

        let mut a = self.powers.iter();
        let mut b = other.powers.iter();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(&(sa, ea)), Some(&(sb, eb))) => {
                    // An earlier symbol carries more weight.
                    match sb.cmp(&sa) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                    match ea.cmp(&eb) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
            }
        }
    }

    /// Returns a displayable view that resolves names through `table`.
    #[must_use]
    pub fn display<'a>(&'a self, table: &'a SymbolTable) -> DisplayMonomial<'a> {
        DisplayMonomial {
            monomial: self,
            table,
        }
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mono(")?;
        if self.powers.is_empty() {
            write!(f, "1")?;
        }
        for (i, &(s, e)) in self.powers.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if e == 1 {
                write!(f, "{s}")?;
            } else {
                write!(f, "{s}^{e}")?;
            }
        }
        write!(f, ")")
    }
}

/// A monomial paired with the table that names its symbols.
pub struct DisplayMonomial<'a> {
    monomial: &'a Monomial,
    table: &'a SymbolTable,
}

impl fmt::Display for DisplayMonomial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.monomial.is_one() {
            return write!(f, "1");
        }
        for (i, &(s, e)) in self.monomial.powers.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            let name = self.table.display_name(s);
            if e == 1 {
                write!(f, "{name}")?;
            } else {
                write!(f, "{name}^{e}")?;
            }
        }
        Ok(())
    }
}
