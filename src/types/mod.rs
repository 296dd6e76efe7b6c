//! # Fixed-Width Type System
//!
//! Every variable of a program has one of eight fixed-width integer types.
//! `Untyped` is the poison value: it marks an expression whose type could not
//! be derived, and it propagates through every operator that touches it.
//!
//! Casts are checked by width only:
//!
//! ```
//! use whiley_cfa::Type;
//!
//! assert_eq!(Type::UI8.bytesize(), Type::SI8.bytesize());
//! assert_ne!(Type::UI8.bytesize(), Type::UI16.bytesize());
//! ```

pub mod checker;

pub use checker::TypeChecker;

use crate::ast::{Declaration, FileLoc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Source-level type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Type {
    /// No valid type could be derived
    #[default]
    Untyped,
    /// Unsigned 8-bit integer
    UI8,
    /// Signed 8-bit integer
    SI8,
    /// Unsigned 16-bit integer
    UI16,
    /// Signed 16-bit integer
    SI16,
    /// Unsigned 32-bit integer
    UI32,
    /// Signed 32-bit integer
    SI32,
    /// Unsigned 64-bit integer
    UI64,
    /// Signed 64-bit integer
    SI64,
}

impl Type {
    /// All variants, `Untyped` first
    pub const ALL: [Type; 9] = [
        Type::Untyped,
        Type::UI8,
        Type::SI8,
        Type::UI16,
        Type::SI16,
        Type::UI32,
        Type::SI32,
        Type::UI64,
        Type::SI64,
    ];

    /// Parse a type from its name, ignoring case (`ui8`, `SI16`, ...)
    pub fn from_name(name: &str) -> Option<Type> {
        match name.to_ascii_lowercase().as_str() {
            "ui8" => Some(Type::UI8),
            "si8" => Some(Type::SI8),
            "ui16" => Some(Type::UI16),
            "si16" => Some(Type::SI16),
            "ui32" => Some(Type::UI32),
            "si32" => Some(Type::SI32),
            "ui64" => Some(Type::UI64),
            "si64" => Some(Type::SI64),
            "untyped" => Some(Type::Untyped),
            _ => None,
        }
    }

    /// Width in bytes; `Untyped` has width 0
    pub fn bytesize(self) -> usize {
        match self {
            Type::UI8 | Type::SI8 => 1,
            Type::UI16 | Type::SI16 => 2,
            Type::UI32 | Type::SI32 => 4,
            Type::UI64 | Type::SI64 => 8,
            Type::Untyped => 0,
        }
    }

    /// Check if this is a signed integer type
    pub fn is_signed(self) -> bool {
        matches!(self, Type::SI8 | Type::SI16 | Type::SI32 | Type::SI64)
    }

    /// Check if this type is the `Untyped` poison value
    pub fn is_untyped(self) -> bool {
        self == Type::Untyped
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Untyped => write!(f, "Untyped"),
            Type::UI8 => write!(f, "ui8"),
            Type::SI8 => write!(f, "si8"),
            Type::UI16 => write!(f, "ui16"),
            Type::SI16 => write!(f, "si16"),
            Type::UI32 => write!(f, "ui32"),
            Type::SI32 => write!(f, "si32"),
            Type::UI64 => write!(f, "ui64"),
            Type::SI64 => write!(f, "si64"),
        }
    }
}

/// Type checker diagnostic
///
/// Rendered as `@<line:col>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two types were required to agree and did not
    TypeMismatch {
        /// The type the context required
        expected: Type,
        /// The type that was derived
        found: Type,
        /// Where the mismatch was detected
        at: FileLoc,
    },
    /// An assignment targeted a name with no declaration
    VariableNotDeclared {
        /// The undeclared name
        name: String,
        /// The assignment's location
        at: FileLoc,
    },
}

impl Diagnostic {
    /// Creates a type mismatch diagnostic
    pub fn mismatch(expected: Type, found: Type, at: FileLoc) -> Self {
        Diagnostic::TypeMismatch {
            expected,
            found,
            at,
        }
    }

    /// Source location the diagnostic points at
    pub fn location(&self) -> FileLoc {
        match self {
            Diagnostic::TypeMismatch { at, .. } | Diagnostic::VariableNotDeclared { at, .. } => *at,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TypeMismatch {
                expected,
                found,
                at,
            } => write!(
                f,
                "@{}: type mismatch: expected {}, found {}",
                at, expected, found
            ),
            Diagnostic::VariableNotDeclared { name, at } => {
                write!(f, "@{}: '{}' not declared", at, name)
            }
        }
    }
}

/// Declared variables of one program, indexed by name
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    variables: HashMap<String, Type>,
}

impl TypeEnv {
    /// Build the environment from a program's declarations.
    /// The first declaration of a name wins; redeclarations are ignored.
    pub fn from_declarations(decls: &[Declaration]) -> Self {
        let mut variables = HashMap::with_capacity(decls.len());
        for d in decls {
            variables.entry(d.name.clone()).or_insert(d.ty);
        }
        TypeEnv { variables }
    }

    /// Look up a variable's declared type
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.variables.get(name).copied()
    }

    /// Number of declared variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_name() {
        assert_eq!(Type::from_name("ui8"), Some(Type::UI8));
        assert_eq!(Type::from_name("SI16"), Some(Type::SI16));
        assert_eq!(Type::from_name("u8"), None);
    }

    #[test]
    fn test_type_display() {
        assert_eq!(Type::UI8.to_string(), "ui8");
        assert_eq!(Type::SI64.to_string(), "si64");
        assert_eq!(Type::Untyped.to_string(), "Untyped");
    }

    #[test]
    fn test_bytesize() {
        assert_eq!(Type::Untyped.bytesize(), 0);
        assert_eq!(Type::SI8.bytesize(), 1);
        assert_eq!(Type::UI16.bytesize(), 2);
        assert_eq!(Type::SI32.bytesize(), 4);
        assert_eq!(Type::UI64.bytesize(), 8);
    }

    #[test]
    fn test_signedness() {
        let signed: Vec<_> = Type::ALL.iter().filter(|t| t.is_signed()).collect();
        assert_eq!(signed, [&Type::SI8, &Type::SI16, &Type::SI32, &Type::SI64]);
    }

    #[test]
    fn test_diagnostic_rendering() {
        let at = FileLoc { line: 3, col: 5 };
        let d = Diagnostic::mismatch(Type::UI8, Type::Untyped, at);
        assert_eq!(
            d.to_string(),
            "@3:5: type mismatch: expected ui8, found Untyped"
        );

        let d = Diagnostic::VariableNotDeclared {
            name: "y".into(),
            at,
        };
        assert_eq!(d.to_string(), "@3:5: 'y' not declared");
    }

    #[test]
    fn test_env_lookup() {
        let env = TypeEnv::from_declarations(&[
            Declaration::new("x", Type::UI8),
            Declaration::new("s", Type::SI32),
        ]);
        assert_eq!(env.lookup("x"), Some(Type::UI8));
        assert_eq!(env.lookup("s"), Some(Type::SI32));
        assert_eq!(env.lookup("z"), None);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_env_first_declaration_wins() {
        let env = TypeEnv::from_declarations(&[
            Declaration::new("x", Type::UI8),
            Declaration::new("x", Type::SI8),
        ]);
        assert_eq!(env.lookup("x"), Some(Type::UI8));
        assert_eq!(env.len(), 1);
    }
}
