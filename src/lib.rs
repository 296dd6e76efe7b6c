//! # Whiley CFA - Type Checker and Control-Flow Automaton Compiler
//!
//! The front end of a verification toolchain for a minimal Whiley-like
//! language. A parsed [`Program`] is type-checked, every expression is
//! annotated with its resolved [`Type`], and the program is lowered to a
//! [`Cfa`] (control-flow automaton) that a model checker can explore.
//!
//! ## Quick Start
//!
//! ```rust
//! use whiley_cfa::{Compiler, CompileOptions, ProgramBuilder, SourceSpan, Type};
//! use whiley_cfa::messaging::CapturingSink;
//!
//! # fn main() -> whiley_cfa::Result<()> {
//! // si8 x; x = 3; assert (x == 3);
//! let at = SourceSpan::at;
//! let mut builder = ProgramBuilder::new();
//! builder.declare("x", Type::SI8);
//! builder.number(3, at(2, 5)).assign("x", at(2, 1))?;
//! builder
//!     .identifier("x", at(3, 9))
//!     .number(3, at(3, 14))
//!     .binary(whiley_cfa::BinaryOp::Eq, at(3, 9))?
//!     .assert(at(3, 1))?
//!     .sequence(at(2, 1))?;
//! let mut program = builder.finish()?;
//!
//! let mut sink = CapturingSink::new();
//! let output = Compiler::new(CompileOptions::default()).compile(&mut program, &mut sink)?;
//!
//! assert!(sink.is_empty());
//! assert_eq!(output.stats.error_locations, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Program (AST) → TypeChecker → typed AST → CfaCompiler → Cfa
//! ```
//!
//! ### Main Components
//!
//! - [`ast`] - Declarations, expressions, statements and the [`ProgramBuilder`]
//! - [`types`] - The [`Type`] lattice and the [`TypeChecker`]
//! - [`ir`] - The [`Cfa`] with its locations, edges and registers
//! - [`compiler`] - Lowering and the [`Compiler`] pipeline
//! - [`messaging`] - Where diagnostics go
//!
//! ## Diagnostics
//!
//! Type errors are reported as `@line:col: message` lines to a
//! [`MessageSink`], never as panics. The checker keeps going after the first
//! error so one run reports everything.
//!
//! ## Logging
//!
//! Passes log through `tracing`; the library installs no subscriber.

/// Version of the front end
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod compiler;
pub mod error;
pub mod ir;
pub mod messaging;
pub mod types;

// Re-export main types
pub use ast::{
    BinaryOp, Declaration, ExprKind, Expression, FileLoc, Program, ProgramBuilder, SourceSpan,
    Statement, StmtKind,
};
pub use compiler::{CfaCompiler, CompileOptions, CompileOutput, CompileStats, Compiler};
pub use error::{Error, ErrorSeverity, Result};
pub use ir::{Cfa, Edge, IrExpr, Location, LocationId, Operation, Register, RegisterId};
pub use messaging::{CapturingSink, MessageSink, SharedSink, StderrSink, TracingSink};
pub use types::{Diagnostic, Type, TypeChecker, TypeEnv};
