//! # Whiley CFA Compiler - typed AST to Control-Flow Automaton
//!
//! This module drives a parsed program through the front end and hands back
//! an automaton ready for a model checker.
//!
//! ## Architecture
//!
//! ```text
//! Program → Type Check → Lower → Validate → Cfa
//! ```
//!
//! Type errors stop the pipeline before lowering: the diagnostics have
//! already gone to the message sink and are also returned inside
//! [`Error::TypeCheckFailed`].
//!
//! ## Usage
//!
//! ```ignore
//! use whiley_cfa::compiler::{Compiler, CompileOptions};
//! use whiley_cfa::messaging::StderrSink;
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let output = compiler.compile(&mut program, &mut StderrSink)?;
//! println!("{}", output.cfa);
//! ```

pub mod lower;

pub use lower::{CfaCompiler, ASSERT_VIOLATION_NAME, INITIAL_LOCATION_NAME};

use crate::ast::Program;
use crate::error::{Error, Result};
use crate::ir::{Cfa, ValidationReport};
use crate::messaging::MessageSink;
use crate::types::TypeChecker;

/// Compilation options
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Run structural validation on the lowered automaton
    pub validate: bool,
    /// Name statement entry locations after their source position
    pub name_locations: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            validate: true,
            name_locations: true,
        }
    }
}

/// Size of a compiled automaton
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub locations: usize,
    pub edges: usize,
    pub registers: usize,
    pub error_locations: usize,
}

impl CompileStats {
    pub fn of(cfa: &Cfa) -> Self {
        CompileStats {
            locations: cfa.locations().len(),
            edges: cfa.edge_count(),
            registers: cfa.registers().len(),
            error_locations: cfa.error_locations().count(),
        }
    }
}

/// Compilation result with metadata
#[derive(Debug)]
pub struct CompileOutput {
    /// The lowered automaton
    pub cfa: Cfa,
    /// Validation result (when `CompileOptions::validate` is set)
    pub validation: Option<ValidationReport>,
    pub stats: CompileStats,
}

/// Type checker and CFA compiler in one pipeline
pub struct Compiler {
    options: CompileOptions,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl Compiler {
    /// Create a new compiler with options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Check and lower `program`
    ///
    /// On success every expression in `program` carries its computed type.
    pub fn compile(&self, program: &mut Program, sink: &mut dyn MessageSink) -> Result<CompileOutput> {
        // Phase 1: Type check
        let mut checker = TypeChecker::new(sink);
        if !checker.check_program(program) {
            let diagnostics = checker
                .diagnostics()
                .iter()
                .map(|d| d.to_string())
                .collect();
            return Err(Error::TypeCheckFailed { diagnostics });
        }

        // Phase 2: Lower
        let cfa = CfaCompiler::new()
            .with_location_names(self.options.name_locations)
            .compile(program)?;

        // Phase 3: Validate
        let validation = if self.options.validate {
            let report = cfa.validate();
            if !report.is_valid() {
                return Err(Error::InvalidCfa {
                    issues: report.issues.iter().map(|i| i.to_string()).collect(),
                });
            }
            Some(report)
        } else {
            None
        };

        let stats = CompileStats::of(&cfa);
        tracing::debug!(
            locations = stats.locations,
            edges = stats.edges,
            error_locations = stats.error_locations,
            "compiled program"
        );

        Ok(CompileOutput {
            cfa,
            validation,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Expression, SourceSpan, Statement};
    use crate::messaging::CapturingSink;
    use crate::types::Type;

    fn sp(line: usize, col: usize) -> SourceSpan {
        SourceSpan::at(line, col)
    }

    #[test]
    fn test_ill_typed_program_is_not_lowered() {
        let mut program = Program::new(
            Vec::new(),
            Statement::assign("y", Expression::number(1, sp(2, 5)), sp(2, 1)),
        );
        let mut sink = CapturingSink::new();
        let err = Compiler::default().compile(&mut program, &mut sink).unwrap_err();

        match err {
            Error::TypeCheckFailed { diagnostics } => {
                assert_eq!(diagnostics, sink.messages().to_vec());
                assert_eq!(diagnostics, vec!["@2:1: 'y' not declared".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stats_and_validation() {
        let mut program = Program::new(
            vec![Declaration::new("x", Type::SI8)],
            Statement::assert(Expression::identifier("x", sp(1, 8)), sp(1, 1)),
        );
        let mut sink = CapturingSink::new();
        let output = Compiler::default().compile(&mut program, &mut sink).unwrap();

        assert!(sink.is_empty());
        assert_eq!(
            output.stats,
            CompileStats {
                locations: 3,
                edges: 2,
                registers: 1,
                error_locations: 1
            }
        );
        assert!(output.validation.map(|r| r.is_valid()).unwrap_or(false));
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let options = CompileOptions {
            validate: false,
            ..CompileOptions::default()
        };
        let mut program = Program::new(Vec::new(), Statement::skip(sp(1, 1)));
        let mut sink = CapturingSink::new();
        let output = Compiler::new(options).compile(&mut program, &mut sink).unwrap();
        assert!(output.validation.is_none());
    }
}
