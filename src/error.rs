//! Error types for the Whiley CFA front end
//!
//! User-facing type errors are not Rust errors: they are [`Diagnostic`]
//! values streamed to a message sink. The variants here cover the driver
//! refusing to continue and contract violations inside the passes.
//!
//! [`Diagnostic`]: crate::types::Diagnostic

use thiserror::Error;

/// Front end errors
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The program did not type-check, so it was not lowered
    ///
    /// **Triggered by:** any `TypeMismatch` or `VariableNotDeclared` diagnostic
    /// **Recovery:** surface `diagnostics` to the user verbatim
    #[error("Type check failed with {} diagnostic(s)", diagnostics.len())]
    TypeCheckFailed {
        /// Rendered diagnostics, in emission order
        diagnostics: Vec<String>,
    },

    /// A pass was handed input that breaks its precondition
    ///
    /// **Triggered by:** lowering a program that was never type-checked, e.g.
    /// an identifier with no matching register
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// The program builder was asked to reduce more nodes than it holds
    #[error("Missing element on {stack} stack")]
    BuilderStackUnderflow {
        /// Which stack ran dry (`expression` or `statement`)
        stack: &'static str,
    },

    /// The lowered automaton failed structural validation
    #[error("Invalid control-flow automaton: {}", issues.join("; "))]
    InvalidCfa {
        /// Rendered validation issues
        issues: Vec<String>,
    },

    /// JSON export failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Caller bug; the result must not be used
    Fatal,
    /// Bad input that the caller can fix and retry
    Recoverable,
    /// Informational
    Warning,
}

impl Error {
    /// Create a contract violation with a message
    pub fn contract(msg: impl Into<String>) -> Self {
        Error::ContractViolation(msg.into())
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::ContractViolation(_) => ErrorSeverity::Fatal,
            Error::InvalidCfa { .. } => ErrorSeverity::Fatal,
            Error::BuilderStackUnderflow { .. } => ErrorSeverity::Fatal,

            Error::TypeCheckFailed { .. } => ErrorSeverity::Recoverable,
            Error::Serialization(_) => ErrorSeverity::Recoverable,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for front end operations
pub type Result<T> = std::result::Result<T, Error>;
