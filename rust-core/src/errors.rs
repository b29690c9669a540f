//! Error taxonomy of the symmetry engine.
//!
//! Every failure is reported through a return value. Parse and lookup
//! failures are recoverable by falling back to an identity-only group;
//! numeric degeneracy only ever affects the single operator it was found on.

use thiserror::Error;

/// Errors produced by the symmetry engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymmetryError {
    /// Malformed operator text
    #[error("Cannot parse operator '{text}': {message}")]
    Parse { text: String, message: String },

    /// Malformed Hall symbol
    #[error("Invalid Hall symbol '{symbol}': {message}")]
    Hall { symbol: String, message: String },

    /// Catalog key not found
    #[error("No catalog entry matches '{0}'")]
    LookupMiss(String),

    /// det(R) is not ±1 or the geometric reconstruction failed
    #[error("Degenerate operator {xyz}: {message}")]
    NumericDegenerate { xyz: String, message: String },

    /// Basis change produced a non-integral rotation part
    #[error("Basis change {basis} is incompatible with operator {xyz}")]
    IncompatibleBasis { basis: String, xyz: String },

    /// Operators of different dimensionality were combined
    #[error("Dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl SymmetryError {
    pub(crate) fn parse(text: &str, message: impl Into<String>) -> Self {
        SymmetryError::Parse {
            text: text.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn hall(symbol: &str, message: impl Into<String>) -> Self {
        SymmetryError::Hall {
            symbol: symbol.to_string(),
            message: message.into(),
        }
    }
}
