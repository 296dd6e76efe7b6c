//! # AST to CFA Lowering
//!
//! Every statement lowers to a subgraph with one entry and one non-error
//! exit. [`LoweringContext::lower_statement`] takes the entry location and
//! returns the exit; a sequence simply feeds the exit of its first half in
//! as the entry of its second half.
//!
//! ```text
//! assert e:      start --assume e--> end
//!                start --assume !e--> AssertViolation
//!
//! if e S1 S2:    start --assume e--> t0 ..S1.. t_end --skip--> end
//!                start --assume !e--> f0 ..S2.. f_end --skip--> end
//!
//! while e S:     start --assume e--> body ..S.. body_end --skip--> start
//!                start --assume !e--> end
//! ```
//!
//! The lowering performs no checks of its own. It must only be run on a
//! program that type-checked; a name without a register is reported as
//! [`Error::ContractViolation`].

use crate::ast::{BinaryOp, ExprKind, Expression, Program, Statement, StmtKind};
use crate::error::{Error, Result};
use crate::ir::{Cfa, IrExpr, LocationId, Operation, RegisterId};

/// Name of the entry location before the first statement renames it
pub const INITIAL_LOCATION_NAME: &str = "Init";

/// Name of every assertion-violation sink
pub const ASSERT_VIOLATION_NAME: &str = "AssertViolation";

/// Prefix of registers holding nested nondeterministic values
pub const NONDET_PREFIX: &str = "__nondet";

/// Lowers type-checked programs to control-flow automata
#[derive(Debug, Clone)]
pub struct CfaCompiler {
    name_locations: bool,
}

impl Default for CfaCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl CfaCompiler {
    pub fn new() -> Self {
        CfaCompiler {
            name_locations: true,
        }
    }

    /// Whether statement entry locations are named after their source position
    pub fn with_location_names(mut self, enabled: bool) -> Self {
        self.name_locations = enabled;
        self
    }

    /// Lower `program` into a fresh automaton
    pub fn compile(&self, program: &Program) -> Result<Cfa> {
        let mut ctx = LoweringContext {
            cfa: Cfa::new(),
            name_locations: self.name_locations,
            next_nondet: 0,
        };

        for decl in &program.declarations {
            ctx.cfa.make_register(decl.name.as_str());
        }

        let start = ctx.cfa.make_location(INITIAL_LOCATION_NAME, true, false);
        let exit = ctx.lower_statement(&program.body, start)?;
        ctx.cfa.set_exit(exit);

        tracing::debug!(
            locations = ctx.cfa.locations().len(),
            edges = ctx.cfa.edge_count(),
            registers = ctx.cfa.registers().len(),
            "lowered program to control-flow automaton"
        );

        Ok(ctx.cfa)
    }
}

/// In-progress automaton threaded through the recursive lowering
struct LoweringContext {
    cfa: Cfa,
    name_locations: bool,
    next_nondet: usize,
}

impl LoweringContext {
    fn fresh(&mut self) -> LocationId {
        self.cfa.make_location("", false, false)
    }

    fn register(&self, name: &str) -> Result<RegisterId> {
        self.cfa
            .register_by_name(name)
            .ok_or_else(|| Error::contract(format!("no register for variable '{}'", name)))
    }

    /// A compiler temporary whose name no declaration uses
    fn nondet_register(&mut self) -> RegisterId {
        loop {
            let name = format!("{}{}", NONDET_PREFIX, self.next_nondet);
            self.next_nondet += 1;
            if self.cfa.register_by_name(&name).is_none() {
                return self.cfa.make_register(name);
            }
        }
    }

    /// Havoc each pending temporary on its own edge, returning the new entry
    fn havoc(&mut self, mut start: LocationId, pending: Vec<RegisterId>) -> Result<LocationId> {
        for register in pending {
            let next = self.fresh();
            self.cfa
                .add_edge(start, Operation::NonDetAssign(register), next)?;
            start = next;
        }
        Ok(start)
    }

    /// Lower an expression together with the havocs it needs first
    fn lower_guarded(&mut self, expr: &Expression, start: LocationId) -> Result<(IrExpr, LocationId)> {
        let mut pending = Vec::new();
        let lowered = self.lower_expression(expr, &mut pending)?;
        let start = self.havoc(start, pending)?;
        Ok((lowered, start))
    }

    fn lower_statement(&mut self, stmt: &Statement, start: LocationId) -> Result<LocationId> {
        if self.name_locations && !matches!(stmt.kind, StmtKind::Sequence { .. }) {
            self.cfa.set_name(start, stmt.location().to_string())?;
        }
        tracing::trace!(at = %stmt.location(), entry = %start, "lowering statement");

        match &stmt.kind {
            StmtKind::Skip => {
                let end = self.fresh();
                self.cfa.add_edge(start, Operation::Skip, end)?;
                Ok(end)
            }

            StmtKind::Assign { name, value } => {
                let register = self.register(name)?;
                if let ExprKind::Undefined(_) = value.kind {
                    let end = self.fresh();
                    self.cfa
                        .add_edge(start, Operation::NonDetAssign(register), end)?;
                    return Ok(end);
                }
                let (expr, start) = self.lower_guarded(value, start)?;
                let end = self.fresh();
                self.cfa
                    .add_edge(start, Operation::Assign { register, expr }, end)?;
                Ok(end)
            }

            StmtKind::MemAssign { addr, value } => {
                let mut pending = Vec::new();
                let addr = self.lower_expression(addr, &mut pending)?;
                let value = self.lower_expression(value, &mut pending)?;
                let start = self.havoc(start, pending)?;
                let end = self.fresh();
                self.cfa
                    .add_edge(start, Operation::Store { value, addr }, end)?;
                Ok(end)
            }

            StmtKind::Assert(cond) => {
                let (expr, start) = self.lower_guarded(cond, start)?;
                let violated = self.cfa.make_location(ASSERT_VIOLATION_NAME, false, true);
                self.cfa
                    .add_edge(start, Operation::Assume(expr.clone().negated()), violated)?;
                let end = self.fresh();
                self.cfa.add_edge(start, Operation::Assume(expr), end)?;
                Ok(end)
            }

            StmtKind::Assume(cond) => {
                let (expr, start) = self.lower_guarded(cond, start)?;
                let end = self.fresh();
                self.cfa.add_edge(start, Operation::Assume(expr), end)?;
                Ok(end)
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let (pos, branch) = self.lower_guarded(condition, start)?;
                let neg = pos.clone().negated();
                let end = self.fresh();

                let then_start = self.fresh();
                self.cfa.add_edge(branch, Operation::Assume(pos), then_start)?;
                let then_end = self.lower_statement(then_branch, then_start)?;
                self.cfa.add_edge(then_end, Operation::Skip, end)?;

                let else_start = self.fresh();
                self.cfa.add_edge(branch, Operation::Assume(neg), else_start)?;
                let else_end = self.lower_statement(else_branch, else_start)?;
                self.cfa.add_edge(else_end, Operation::Skip, end)?;

                Ok(end)
            }

            StmtKind::While { condition, body } => {
                // `start` is the loop header; the back edge returns to it so the
                // condition (and any havoc it needs) is re-evaluated.
                let (pos, branch) = self.lower_guarded(condition, start)?;
                let neg = pos.clone().negated();
                let end = self.fresh();
                let body_start = self.fresh();

                self.cfa.add_edge(branch, Operation::Assume(neg), end)?;
                self.cfa.add_edge(branch, Operation::Assume(pos), body_start)?;
                let body_end = self.lower_statement(body, body_start)?;
                self.cfa.add_edge(body_end, Operation::Skip, start)?;

                Ok(end)
            }

            StmtKind::Sequence { first, second } => {
                let mid = self.lower_statement(first, start)?;
                self.lower_statement(second, mid)
            }
        }
    }

    fn lower_expression(&mut self, expr: &Expression, pending: &mut Vec<RegisterId>) -> Result<IrExpr> {
        match &expr.kind {
            ExprKind::Identifier(name) => Ok(IrExpr::Register(self.register(name)?)),

            ExprKind::Number(value) => Ok(IrExpr::Constant(*value)),

            ExprKind::Undefined(_) => {
                let register = self.nondet_register();
                pending.push(register);
                Ok(IrExpr::Register(register))
            }

            ExprKind::Deref { addr, .. } => {
                let addr = self.lower_expression(addr, pending)?;
                Ok(IrExpr::Deref(Box::new(addr)))
            }

            // Casts only reinterpret bits of the same width.
            ExprKind::Cast { expr: inner, .. } => self.lower_expression(inner, pending),

            ExprKind::Binary { op, left, right } => {
                let left = self.lower_expression(left, pending)?;
                let right = self.lower_expression(right, pending)?;
                Ok(binary_node(*op, left, right))
            }
        }
    }
}

/// The IR node for `op`
pub fn binary_node(op: BinaryOp, left: IrExpr, right: IrExpr) -> IrExpr {
    let (l, r) = (Box::new(left), Box::new(right));
    match op {
        BinaryOp::Add => IrExpr::Add(l, r),
        BinaryOp::Sub => IrExpr::Sub(l, r),
        BinaryOp::Mul => IrExpr::Mul(l, r),
        BinaryOp::Div => IrExpr::Div(l, r),
        BinaryOp::LEq => IrExpr::LEq(l, r),
        BinaryOp::GEq => IrExpr::GEq(l, r),
        BinaryOp::Lt => IrExpr::Lt(l, r),
        BinaryOp::Gt => IrExpr::Gt(l, r),
        BinaryOp::Eq => IrExpr::Eq(l, r),
        BinaryOp::NEq => IrExpr::NEq(l, r),
    }
}
