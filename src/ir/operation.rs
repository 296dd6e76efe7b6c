//! Edge operations

use super::cfa::RegisterId;
use super::expr::IrExpr;
use serde::{Deserialize, Serialize};

/// Effect of taking an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// `register := expr`
    Assign {
        /// Written register
        register: RegisterId,
        /// Assigned value
        expr: IrExpr,
    },
    /// `register := <any value>`
    NonDetAssign(RegisterId),
    /// `*addr := value`
    Store {
        /// Stored value
        value: IrExpr,
        /// Byte address
        addr: IrExpr,
    },
    /// Guard; the edge is traversable only when the expression is truthy
    Assume(IrExpr),
    /// No effect
    Skip,
}

impl Operation {
    /// Guard expression of an `Assume`
    pub fn guard(&self) -> Option<&IrExpr> {
        match self {
            Operation::Assume(e) => Some(e),
            _ => None,
        }
    }

    /// Register written by this operation, if any
    pub fn written_register(&self) -> Option<RegisterId> {
        match self {
            Operation::Assign { register, .. } | Operation::NonDetAssign(register) => {
                Some(*register)
            }
            _ => None,
        }
    }

    /// Every register this operation reads or writes
    pub fn registers(&self) -> Vec<RegisterId> {
        let mut out = Vec::new();
        match self {
            Operation::Assign { register, expr } => {
                out.push(*register);
                expr.collect_registers(&mut out);
            }
            Operation::NonDetAssign(register) => out.push(*register),
            Operation::Store { value, addr } => {
                value.collect_registers(&mut out);
                addr.collect_registers(&mut out);
            }
            Operation::Assume(e) => e.collect_registers(&mut out),
            Operation::Skip => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(n: usize) -> IrExpr {
        IrExpr::Register(RegisterId(n))
    }

    #[test]
    fn test_written_register() {
        let assign = Operation::Assign {
            register: RegisterId(0),
            expr: reg(1),
        };
        assert_eq!(assign.written_register(), Some(RegisterId(0)));
        assert_eq!(
            Operation::NonDetAssign(RegisterId(2)).written_register(),
            Some(RegisterId(2))
        );
        let store = Operation::Store {
            value: reg(1),
            addr: reg(0),
        };
        assert_eq!(store.written_register(), None);
    }

    #[test]
    fn test_registers_read_and_written() {
        let op = Operation::Assign {
            register: RegisterId(0),
            expr: IrExpr::Add(Box::new(reg(1)), Box::new(IrExpr::Deref(Box::new(reg(2))))),
        };
        assert_eq!(op.registers(), vec![RegisterId(0), RegisterId(1), RegisterId(2)]);
        assert!(Operation::Skip.registers().is_empty());
        assert_eq!(Operation::Assume(reg(3)).guard(), Some(&reg(3)));
    }
}
