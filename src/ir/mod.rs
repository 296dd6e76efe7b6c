//! # Control-Flow Automaton IR
//!
//! The output of the front end: a graph of program locations connected by
//! edges labeled with [`Operation`]s, plus one [`Register`] per declared
//! variable.
//!
//! ## Module Structure
//!
//! ```text
//! ir/
//! ├── mod.rs        # This file - re-exports
//! ├── cfa.rs        # Cfa, Location, Edge, Register and their ids
//! ├── expr.rs       # IrExpr, one node per operator
//! ├── operation.rs  # Operation (edge labels)
//! ├── validate.rs   # Structural invariant checks
//! └── dump.rs       # Text dump with register names
//! ```
//!
//! Locations are stored in an arena owned by the [`Cfa`]; an [`Edge`] names
//! its target by [`LocationId`]. Loop headers and join points are therefore
//! ordinary locations with several incoming edges.

mod cfa;
mod dump;
mod expr;
mod operation;
pub mod validate;

pub use cfa::{Cfa, Edge, Location, LocationId, Register, RegisterId};
pub use dump::Named;
pub use expr::IrExpr;
pub use operation::Operation;
pub use validate::{ValidationIssue, ValidationReport};
