//! Stack-based AST construction
//!
//! Grammar actions of a shift-reduce parser push leaves and reduce the top
//! of two stacks (expressions and statements) into interior nodes. The
//! operand order matches the order the grammar shifted them: for `a - b`,
//! `a` is pushed first and `b` second.

use super::{BinaryOp, Declaration, Expression, Program, SourceSpan, Statement};
use crate::error::{Error, Result};
use crate::types::Type;

/// Builds a [`Program`] from grammar reduce actions
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    expressions: Vec<Expression>,
    statements: Vec<Statement>,
    declarations: Vec<Declaration>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn pop_expr(&mut self) -> Result<Expression> {
        self.expressions
            .pop()
            .ok_or(Error::BuilderStackUnderflow { stack: "expression" })
    }

    fn pop_stmt(&mut self) -> Result<Statement> {
        self.statements
            .pop()
            .ok_or(Error::BuilderStackUnderflow { stack: "statement" })
    }

    pub fn number(&mut self, value: i64, span: SourceSpan) -> &mut Self {
        self.expressions.push(Expression::number(value, span));
        self
    }

    pub fn undefined(&mut self, ty: Type, span: SourceSpan) -> &mut Self {
        self.expressions.push(Expression::undefined(ty, span));
        self
    }

    pub fn identifier(&mut self, name: impl Into<String>, span: SourceSpan) -> &mut Self {
        self.expressions.push(Expression::identifier(name, span));
        self
    }

    /// Replace the top expression with a load through it
    pub fn deref(&mut self, load: Type, span: SourceSpan) -> Result<&mut Self> {
        let addr = self.pop_expr()?;
        self.expressions.push(Expression::deref(addr, load, span));
        Ok(self)
    }

    /// Replace the top expression with a cast of it
    pub fn cast(&mut self, target: Type, span: SourceSpan) -> Result<&mut Self> {
        let expr = self.pop_expr()?;
        self.expressions.push(Expression::cast(expr, target, span));
        Ok(self)
    }

    /// Combine the two top expressions; the top one is the right operand
    pub fn binary(&mut self, op: BinaryOp, span: SourceSpan) -> Result<&mut Self> {
        let right = self.pop_expr()?;
        let left = self.pop_expr()?;
        self.expressions
            .push(Expression::binary(op, left, right, span));
        Ok(self)
    }

    /// Record a declaration; declarations never touch the stacks
    pub fn declare(&mut self, name: impl Into<String>, ty: Type) -> &mut Self {
        self.declarations.push(Declaration::new(name, ty));
        self
    }

    pub fn skip(&mut self, span: SourceSpan) -> &mut Self {
        self.statements.push(Statement::skip(span));
        self
    }

    pub fn assign(&mut self, name: impl Into<String>, span: SourceSpan) -> Result<&mut Self> {
        let value = self.pop_expr()?;
        self.statements.push(Statement::assign(name, value, span));
        Ok(self)
    }

    /// `*addr = value`; `addr` was pushed before `value`
    pub fn mem_assign(&mut self, span: SourceSpan) -> Result<&mut Self> {
        let value = self.pop_expr()?;
        let addr = self.pop_expr()?;
        self.statements
            .push(Statement::mem_assign(addr, value, span));
        Ok(self)
    }

    pub fn assert(&mut self, span: SourceSpan) -> Result<&mut Self> {
        let cond = self.pop_expr()?;
        self.statements.push(Statement::assert(cond, span));
        Ok(self)
    }

    pub fn assume(&mut self, span: SourceSpan) -> Result<&mut Self> {
        let cond = self.pop_expr()?;
        self.statements.push(Statement::assume(cond, span));
        Ok(self)
    }

    /// Uses the top expression as condition and the two top statements as
    /// then (pushed first) and else (pushed second) branches
    pub fn if_stmt(&mut self, span: SourceSpan) -> Result<&mut Self> {
        let cond = self.pop_expr()?;
        let else_branch = self.pop_stmt()?;
        let then_branch = self.pop_stmt()?;
        self.statements
            .push(Statement::if_else(cond, then_branch, else_branch, span));
        Ok(self)
    }

    pub fn while_stmt(&mut self, span: SourceSpan) -> Result<&mut Self> {
        let cond = self.pop_expr()?;
        let body = self.pop_stmt()?;
        self.statements
            .push(Statement::while_loop(cond, body, span));
        Ok(self)
    }

    pub fn sequence(&mut self, span: SourceSpan) -> Result<&mut Self> {
        let second = self.pop_stmt()?;
        let first = self.pop_stmt()?;
        self.statements
            .push(Statement::sequence(first, second, span));
        Ok(self)
    }

    /// Finish the program. An empty statement stack becomes a `Skip` at `0:0`.
    pub fn finish(mut self) -> Result<Program> {
        if self.statements.is_empty() {
            self.skip(SourceSpan::at(0, 0));
        }
        let body = self.pop_stmt()?;
        if !self.expressions.is_empty() || !self.statements.is_empty() {
            tracing::warn!(
                expressions = self.expressions.len(),
                statements = self.statements.len(),
                "program builder finished with unreduced nodes"
            );
        }
        Ok(Program::new(self.declarations, body))
    }
}
