//! Completion configuration.
//!
//! A model whose update relations keep generating new monomials never
//! reaches a fixed point. The limits below turn that into an error instead
//! of unbounded recursion.

/// Which moment update form the completion targets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum UpdateForm {
    /// Split discovered monomials into dependence-graph components.
    #[default]
    Reduced,
    /// Track every discovered monomial as a whole.
    Unreduced,
}

impl UpdateForm {
    /// Selects the form from a `reduced` flag.
    #[must_use]
    pub const fn from_reduced(reduced: bool) -> Self {
        if reduced {
            UpdateForm::Reduced
        } else {
            UpdateForm::Unreduced
        }
    }

    /// Returns true for the reduced form.
    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, UpdateForm::Reduced)
    }

    /// Returns a short name for the form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UpdateForm::Reduced => "reduced",
            UpdateForm::Unreduced => "unreduced",
        }
    }
}

impl std::fmt::Display for UpdateForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Bounds on a single completion. `None` disables a bound.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CompletionLimits {
    /// Maximum number of basis variables.
    pub max_basis_size: Option<usize>,
    /// Maximum total degree of a materialized monomial.
    pub max_degree: Option<u32>,
    /// Maximum length of a discovery chain.
    pub max_depth: Option<usize>,
}

impl CompletionLimits {
    /// Default maximum basis size.
    pub const DEFAULT_MAX_BASIS_SIZE: usize = 10_000;
    /// Default maximum monomial degree.
    pub const DEFAULT_MAX_DEGREE: u32 = 64;
    /// Default maximum recursion depth.
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    /// Disables every bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_basis_size: None,
            max_degree: None,
            max_depth: None,
        }
    }

    /// Sets the maximum basis size.
    #[must_use]
    pub fn with_max_basis_size(mut self, limit: usize) -> Self {
        self.max_basis_size = Some(limit);
        self
    }

    /// Sets the maximum monomial degree.
    #[must_use]
    pub fn with_max_degree(mut self, limit: u32) -> Self {
        self.max_degree = Some(limit);
        self
    }

    /// Sets the maximum recursion depth.
    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }
}

impl Default for CompletionLimits {
    fn default() -> Self {
        Self {
            max_basis_size: Some(Self::DEFAULT_MAX_BASIS_SIZE),
            max_degree: Some(Self::DEFAULT_MAX_DEGREE),
            max_depth: Some(Self::DEFAULT_MAX_DEPTH),
        }
    }
}
