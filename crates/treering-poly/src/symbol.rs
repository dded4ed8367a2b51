//! Interned symbols.
//!
//! Every variable of a system is interned once and referred to by a 32-bit
//! [`Symbol`]. The table remembers whether the symbol is a state variable
//! (a target of expansion) or a disturbance (folded into coefficients).

use hashbrown::HashMap;
use std::fmt;

use crate::error::PolyError;

/// A handle to an interned symbol.
///
/// Symbols order by declaration, which gives every table a stable total
/// order over its variables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw index.
    ///
    /// This is primarily for internal use by the table.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this symbol.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The role a symbol plays in a system.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SymbolKind {
    /// A state variable with its own update relation.
    State,
    /// An exogenous noise variable.
    Disturbance,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::State => write!(f, "state"),
            SymbolKind::Disturbance => write!(f, "disturbance"),
        }
    }
}

/// Interning table for symbol names.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    /// Maps names to their symbols.
    by_name: HashMap<String, Symbol>,
    /// Names indexed by symbol.
    names: Vec<String>,
    /// Kinds indexed by symbol.
    kinds: Vec<SymbolKind>,
    /// Maximum number of symbols.
    capacity: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::with_capacity_limit(u32::MAX)
    }
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table that holds at most `capacity` symbols.
    #[must_use]
    pub fn with_capacity_limit(capacity: u32) -> Self {
        Self {
            by_name: HashMap::new(),
            names: Vec::new(),
            kinds: Vec::new(),
            capacity,
        }
    }

    /// Interns a name with the given kind.
    ///
    /// Interning an existing name with the same kind returns the existing
    /// symbol.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::KindConflict`] if the name was already declared
    /// with a different kind, or [`PolyError::CapacityExceeded`] if no
    /// symbol ids are left.
    pub fn intern(&mut self, name: &str, kind: SymbolKind) -> Result<Symbol, PolyError> {
        if let Some(&symbol) = self.by_name.get(name) {
            let existing = self.kinds[symbol.index() as usize];
            if existing != kind {
                return Err(PolyError::KindConflict {
                    name: name.to_string(),
                    existing,
                });
            }
            return Ok(symbol);
        }

        let index = u32::try_from(self.names.len())
            .ok()
            .filter(|&i| i < self.capacity)
            .ok_or(PolyError::CapacityExceeded(self.capacity))?;

        let symbol = Symbol::new(index);
        self.by_name.insert(name.to_string(), symbol);
        self.names.push(name.to_string());
        self.kinds.push(kind);
        Ok(symbol)
    }

    /// Looks up a symbol by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a symbol.
    #[must_use]
    pub fn name(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(symbol.index() as usize).map(String::as_str)
    }

    /// Returns the kind of a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::UnknownSymbol`] if the symbol is not in this table.
    pub fn kind(&self, symbol: Symbol) -> Result<SymbolKind, PolyError> {
        self.kinds
            .get(symbol.index() as usize)
            .copied()
            .ok_or(PolyError::UnknownSymbol(symbol.index()))
    }

    /// Returns true if the symbol was interned in this table.
    #[must_use]
    pub fn contains(&self, symbol: Symbol) -> bool {
        (symbol.index() as usize) < self.names.len()
    }

    /// Returns the display name of a symbol, falling back to `#id`.
    #[must_use]
    pub fn display_name(&self, symbol: Symbol) -> String {
        self.name(symbol)
            .map_or_else(|| symbol.to_string(), ToString::to_string)
    }

    /// Returns the number of interned symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over all symbols of the given kind in declaration order.
    pub fn symbols_of(&self, kind: SymbolKind) -> impl Iterator<Item = Symbol> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == kind)
            .map(|(i, _)| Symbol::new(i as u32))
    }
}
