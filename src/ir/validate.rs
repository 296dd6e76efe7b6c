//! # Structural Validation
//!
//! Checks the invariants a downstream verifier relies on before it accepts
//! an automaton:
//!
//! - exactly one initial location
//! - every edge targets an existing location
//! - every register an edge mentions exists
//! - error locations have no outgoing edges
//! - no reachable location is a dead end, except error locations and the exit

use super::cfa::{Cfa, LocationId, RegisterId};
use std::fmt;

/// One violated invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// No location is marked initial
    NoInitialLocation,
    /// More than one location is marked initial
    MultipleInitialLocations(Vec<LocationId>),
    /// An edge points outside the location arena
    DanglingTarget {
        /// Source of the edge
        from: LocationId,
        /// Missing target
        to: LocationId,
    },
    /// An edge mentions a register that was never created
    UnknownRegister {
        /// Source of the edge
        from: LocationId,
        /// Missing register
        register: RegisterId,
    },
    /// A reachable non-terminal location has no outgoing edge
    DeadEnd(LocationId),
    /// An error location has outgoing edges
    ErrorLocationHasEdges(LocationId),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoInitialLocation => write!(f, "no initial location"),
            ValidationIssue::MultipleInitialLocations(ids) => {
                write!(f, "{} initial locations:", ids.len())?;
                for id in ids {
                    write!(f, " {}", id)?;
                }
                Ok(())
            }
            ValidationIssue::DanglingTarget { from, to } => {
                write!(f, "edge from {} targets missing location {}", from, to)
            }
            ValidationIssue::UnknownRegister { from, register } => {
                write!(f, "edge from {} uses unknown register #{}", from, register.0)
            }
            ValidationIssue::DeadEnd(id) => write!(f, "reachable dead end at {}", id),
            ValidationIssue::ErrorLocationHasEdges(id) => {
                write!(f, "error location {} has outgoing edges", id)
            }
        }
    }
}

/// Outcome of [`validate`]
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Violations found, in discovery order
    pub issues: Vec<ValidationIssue>,
    /// Number of locations reachable from the initial location
    pub reachable: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate the structural invariants of `cfa`
pub fn validate(cfa: &Cfa) -> ValidationReport {
    let mut issues = Vec::new();

    let initials: Vec<LocationId> = cfa
        .locations()
        .iter()
        .filter(|l| l.is_initial)
        .map(|l| l.id)
        .collect();
    match initials.len() {
        0 => issues.push(ValidationIssue::NoInitialLocation),
        1 => {}
        _ => issues.push(ValidationIssue::MultipleInitialLocations(initials)),
    }

    for (from, edge) in cfa.edges() {
        if cfa.location(edge.target).is_none() {
            issues.push(ValidationIssue::DanglingTarget {
                from,
                to: edge.target,
            });
        }
        for register in edge.operation.registers() {
            if cfa.register(register).is_none() {
                issues.push(ValidationIssue::UnknownRegister { from, register });
            }
        }
    }

    let reachable = cfa.reachable();
    for loc in cfa.locations() {
        if loc.is_error && !loc.edges.is_empty() {
            issues.push(ValidationIssue::ErrorLocationHasEdges(loc.id));
        }
        let terminal = loc.is_error || cfa.exit() == Some(loc.id);
        if reachable.contains(&loc.id) && loc.edges.is_empty() && !terminal {
            issues.push(ValidationIssue::DeadEnd(loc.id));
        }
    }

    if !issues.is_empty() {
        tracing::warn!(issues = issues.len(), "control-flow automaton failed validation");
    }

    ValidationReport {
        issues,
        reachable: reachable.len(),
    }
}

impl Cfa {
    /// Validate the structural invariants of this automaton
    pub fn validate(&self) -> ValidationReport {
        validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IrExpr, Operation};

    #[test]
    fn test_empty_cfa_has_no_initial() {
        let report = Cfa::new().validate();
        assert_eq!(report.issues, vec![ValidationIssue::NoInitialLocation]);
    }

    #[test]
    fn test_dead_end_detected() {
        let mut cfa = Cfa::new();
        let a = cfa.make_location("Init", true, false);
        let b = cfa.make_location("", false, false);
        let c = cfa.make_location("", false, false);
        cfa.add_edge(a, Operation::Skip, b).unwrap();
        cfa.add_edge(a, Operation::Skip, c).unwrap();
        cfa.set_exit(c);

        let report = cfa.validate();
        assert_eq!(report.issues, vec![ValidationIssue::DeadEnd(b)]);
        assert_eq!(report.reachable, 3);
    }

    #[test]
    fn test_dangling_target_and_unknown_register() {
        let mut cfa = Cfa::new();
        let a = cfa.make_location("Init", true, false);
        cfa.add_edge(a, Operation::NonDetAssign(RegisterId(4)), LocationId(9)).unwrap();
        cfa.set_exit(a);

        let report = cfa.validate();
        assert!(report.issues.contains(&ValidationIssue::DanglingTarget {
            from: a,
            to: LocationId(9)
        }));
        assert!(report.issues.contains(&ValidationIssue::UnknownRegister {
            from: a,
            register: RegisterId(4)
        }));
    }

    #[test]
    fn test_error_location_with_edges() {
        let mut cfa = Cfa::new();
        let a = cfa.make_location("Init", true, false);
        let err = cfa.make_location("AssertViolation", false, true);
        cfa.add_edge(a, Operation::Assume(IrExpr::Constant(1)), err).unwrap();
        cfa.add_edge(err, Operation::Skip, a).unwrap();
        cfa.set_exit(a);

        let report = cfa.validate();
        assert_eq!(
            report.issues,
            vec![ValidationIssue::ErrorLocationHasEdges(err)]
        );
        assert_eq!(
            report.issues[0].to_string(),
            "error location L1 has outgoing edges"
        );
    }
}
