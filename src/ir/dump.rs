//! Human-readable automaton dump

use super::cfa::{Cfa, Register, RegisterId};
use super::expr::IrExpr;
use super::operation::Operation;
use std::fmt;

/// Displays an IR value with register ids resolved to names
pub struct Named<'a, T> {
    value: &'a T,
    registers: &'a [Register],
}

impl<'a, T> Named<'a, T> {
    pub fn new(value: &'a T, registers: &'a [Register]) -> Self {
        Named { value, registers }
    }

    fn nested<U>(&self, value: &'a U) -> Named<'a, U> {
        Named {
            value,
            registers: self.registers,
        }
    }
}

impl fmt::Display for Named<'_, IrExpr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            IrExpr::Constant(v) => write!(f, "{}", v),
            IrExpr::Register(id) => match self.registers.get(id.0) {
                Some(reg) => write!(f, "{}", reg.name),
                None => write!(f, "%{}", id.0),
            },
            IrExpr::Deref(inner) => write!(f, "*{}", self.nested(&**inner)),
            IrExpr::Negation(inner) => write!(f, "!({})", self.nested(&**inner)),
            other => match (other.operands(), other.symbol()) {
                (Some((l, r)), Some(sym)) => {
                    write!(f, "({} {} {})", self.nested(l), sym, self.nested(r))
                }
                _ => write!(f, "{:?}", other),
            },
        }
    }
}

impl fmt::Display for Named<'_, Operation> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg_name = |id: &RegisterId| {
            self.registers
                .get(id.0)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| format!("%{}", id.0))
        };
        match self.value {
            Operation::Assign { register, expr } => {
                write!(f, "{} := {}", reg_name(register), self.nested(expr))
            }
            Operation::NonDetAssign(register) => write!(f, "{} := nondet", reg_name(register)),
            Operation::Store { value, addr } => {
                write!(f, "*{} := {}", self.nested(addr), self.nested(value))
            }
            Operation::Assume(e) => write!(f, "assume {}", self.nested(e)),
            Operation::Skip => write!(f, "skip"),
        }
    }
}

impl fmt::Display for Cfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.registers().iter().map(|r| r.name.as_str()).collect();
        writeln!(f, "registers: [{}]", names.join(", "))?;
        for loc in self.locations() {
            write!(f, "{} \"{}\"", loc.id, loc.name)?;
            if loc.is_initial {
                write!(f, " [init]")?;
            }
            if loc.is_error {
                write!(f, " [error]")?;
            }
            if self.exit() == Some(loc.id) {
                write!(f, " [exit]")?;
            }
            writeln!(f)?;
            for edge in &loc.edges {
                writeln!(
                    f,
                    "  --[{}]--> {}",
                    Named::new(&edge.operation, self.registers()),
                    edge.target
                )?;
            }
        }
        Ok(())
    }
}
