//! Control-flow automaton storage
//!
//! Locations live in an arena and edges refer to their targets by
//! [`LocationId`], so join points and loop headers can have any number of
//! incoming edges without shared ownership.

use super::operation::Operation;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a location in its automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub usize);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Index of a register in its automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegisterId(pub usize);

/// Storage cell for one declared variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub id: RegisterId,
    pub name: String,
}

/// Labeled edge to another location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Effect of taking the edge
    pub operation: Operation,
    /// Where the edge leads
    pub target: LocationId,
}

/// A program point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Display name; a source position, `Init`, `AssertViolation` or empty
    pub name: String,
    /// Program entry
    pub is_initial: bool,
    /// Assertion-violation sink
    pub is_error: bool,
    /// Outgoing edges in creation order
    pub edges: Vec<Edge>,
}

/// Control-flow automaton: locations, labeled edges and registers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cfa {
    locations: Vec<Location>,
    registers: Vec<Register>,
    #[serde(skip)]
    register_index: HashMap<String, RegisterId>,
    exit: Option<LocationId>,
}

impl Cfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a location and return its id
    pub fn make_location(
        &mut self,
        name: impl Into<String>,
        is_initial: bool,
        is_error: bool,
    ) -> LocationId {
        let id = LocationId(self.locations.len());
        self.locations.push(Location {
            id,
            name: name.into(),
            is_initial,
            is_error,
            edges: Vec::new(),
        });
        id
    }

    /// Create a register, or return the existing one with that name
    pub fn make_register(&mut self, name: impl Into<String>) -> RegisterId {
        let name = name.into();
        if let Some(&id) = self.register_index.get(&name) {
            return id;
        }
        let id = RegisterId(self.registers.len());
        self.register_index.insert(name.clone(), id);
        self.registers.push(Register { id, name });
        id
    }

    fn location_mut(&mut self, id: LocationId) -> Result<&mut Location> {
        self.locations
            .get_mut(id.0)
            .ok_or_else(|| Error::contract(format!("no location {}", id)))
    }

    /// Add an edge `from --operation--> to`
    ///
    /// `from` must exist. A missing `to` is accepted here and reported by
    /// [`Cfa::validate`] as a dangling target.
    pub fn add_edge(&mut self, from: LocationId, operation: Operation, to: LocationId) -> Result<()> {
        self.location_mut(from)?.edges.push(Edge {
            operation,
            target: to,
        });
        Ok(())
    }

    /// Rename a location
    pub fn set_name(&mut self, id: LocationId, name: impl Into<String>) -> Result<()> {
        self.location_mut(id)?.name = name.into();
        Ok(())
    }

    pub(crate) fn set_exit(&mut self, exit: LocationId) {
        self.exit = Some(exit);
    }

    /// All locations, indexed by `LocationId`
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    /// The program entry
    pub fn initial(&self) -> Option<LocationId> {
        self.locations
            .iter()
            .find(|l| l.is_initial)
            .map(|l| l.id)
    }

    /// Exit of the root statement
    pub fn exit(&self) -> Option<LocationId> {
        self.exit
    }

    /// Assertion-violation sinks
    pub fn error_locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations.iter().filter(|l| l.is_error)
    }

    /// All registers, indexed by `RegisterId`
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    pub fn register(&self, id: RegisterId) -> Option<&Register> {
        self.registers.get(id.0)
    }

    pub fn register_by_name(&self, name: &str) -> Option<RegisterId> {
        self.register_index.get(name).copied()
    }

    /// Every edge with its source location
    pub fn edges(&self) -> impl Iterator<Item = (LocationId, &Edge)> + '_ {
        self.locations
            .iter()
            .flat_map(|l| l.edges.iter().map(move |e| (l.id, e)))
    }

    pub fn edge_count(&self) -> usize {
        self.locations.iter().map(|l| l.edges.len()).sum()
    }

    /// Edges leading into `id`, with their sources
    pub fn predecessors(&self, id: LocationId) -> Vec<(LocationId, &Edge)> {
        self.edges().filter(|(_, e)| e.target == id).collect()
    }

    /// Locations reachable from the initial location
    pub fn reachable(&self) -> HashSet<LocationId> {
        let mut visited = HashSet::new();
        let mut stack: Vec<LocationId> = self.initial().into_iter().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(loc) = self.location(id) {
                for edge in &loc.edges {
                    stack.push(edge.target);
                }
            }
        }
        visited
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read an automaton back from JSON
    pub fn from_json(json: &str) -> Result<Cfa> {
        let mut cfa: Cfa = serde_json::from_str(json)?;
        cfa.register_index = cfa
            .registers
            .iter()
            .map(|r| (r.name.clone(), r.id))
            .collect();
        Ok(cfa)
    }
}
