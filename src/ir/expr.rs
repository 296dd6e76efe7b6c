//! IR expressions

use super::cfa::RegisterId;
use serde::{Deserialize, Serialize};

/// Expression tree evaluated on an edge
///
/// Every arithmetic and comparison operator has its own node so consumers
/// can match on the operator directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrExpr {
    /// Integer constant
    Constant(i64),
    /// Current value of a register
    Register(RegisterId),
    /// Byte loaded from the address the operand evaluates to
    Deref(Box<IrExpr>),
    /// `lhs + rhs`
    Add(Box<IrExpr>, Box<IrExpr>),
    /// `lhs - rhs`
    Sub(Box<IrExpr>, Box<IrExpr>),
    /// `lhs * rhs`
    Mul(Box<IrExpr>, Box<IrExpr>),
    /// `lhs / rhs`
    Div(Box<IrExpr>, Box<IrExpr>),
    /// `lhs <= rhs`
    LEq(Box<IrExpr>, Box<IrExpr>),
    /// `lhs >= rhs`
    GEq(Box<IrExpr>, Box<IrExpr>),
    /// `lhs < rhs`
    Lt(Box<IrExpr>, Box<IrExpr>),
    /// `lhs > rhs`
    Gt(Box<IrExpr>, Box<IrExpr>),
    /// `lhs == rhs`
    Eq(Box<IrExpr>, Box<IrExpr>),
    /// `lhs != rhs`
    NEq(Box<IrExpr>, Box<IrExpr>),
    /// Logical negation of a guard
    Negation(Box<IrExpr>),
}

impl IrExpr {
    /// Wrap `self` in a `Negation`
    pub fn negated(self) -> IrExpr {
        IrExpr::Negation(Box::new(self))
    }

    /// Operands of a binary node, `None` for every other node
    pub fn operands(&self) -> Option<(&IrExpr, &IrExpr)> {
        match self {
            IrExpr::Add(l, r)
            | IrExpr::Sub(l, r)
            | IrExpr::Mul(l, r)
            | IrExpr::Div(l, r)
            | IrExpr::LEq(l, r)
            | IrExpr::GEq(l, r)
            | IrExpr::Lt(l, r)
            | IrExpr::Gt(l, r)
            | IrExpr::Eq(l, r)
            | IrExpr::NEq(l, r) => Some((l, r)),
            _ => None,
        }
    }

    /// Operator symbol of a binary node
    pub fn symbol(&self) -> Option<&'static str> {
        let sym = match self {
            IrExpr::Add(..) => "+",
            IrExpr::Sub(..) => "-",
            IrExpr::Mul(..) => "*",
            IrExpr::Div(..) => "/",
            IrExpr::LEq(..) => "<=",
            IrExpr::GEq(..) => ">=",
            IrExpr::Lt(..) => "<",
            IrExpr::Gt(..) => ">",
            IrExpr::Eq(..) => "==",
            IrExpr::NEq(..) => "!=",
            _ => return None,
        };
        Some(sym)
    }

    /// Append every register read by this expression to `out`
    pub fn collect_registers(&self, out: &mut Vec<RegisterId>) {
        match self {
            IrExpr::Constant(_) => {}
            IrExpr::Register(r) => out.push(*r),
            IrExpr::Deref(inner) | IrExpr::Negation(inner) => inner.collect_registers(out),
            other => {
                if let Some((l, r)) = other.operands() {
                    l.collect_registers(out);
                    r.collect_registers(out);
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        match self {
            IrExpr::Constant(_) | IrExpr::Register(_) => 1,
            IrExpr::Deref(inner) | IrExpr::Negation(inner) => 1 + inner.size(),
            other => other
                .operands()
                .map(|(l, r)| 1 + l.size() + r.size())
                .unwrap_or(1),
        }
    }
}
