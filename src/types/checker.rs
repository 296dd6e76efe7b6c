//! # Type Checker
//!
//! Assigns a resolved [`Type`] to every expression of a [`Program`] and
//! reports violations to a [`MessageSink`]. The checker never stops at the
//! first problem: every statement and expression is visited, each statement
//! contributes one boolean, and the booleans are AND-combined up the tree.
//!
//! ## Typing rules
//!
//! | Expression | Type |
//! |------------|------|
//! | identifier | declared type, `Untyped` if undeclared |
//! | literal | `si8` |
//! | `undef T` | `T` |
//! | `*addr` | `ui8` when `addr : ui8`, otherwise `Untyped` + diagnostic |
//! | `e as T` | `T` when `e` has the width of `T`, otherwise `Untyped` |
//! | `l op r` | `Untyped` if either side is, else `si8` if either side is, else `ui8` |
//!
//! Diagnostics are emitted in pre-order, left to right.

use super::{Diagnostic, Type, TypeEnv};
use crate::ast::{Declaration, ExprKind, Expression, Program, Statement, StmtKind};
use crate::messaging::MessageSink;

/// Type checker for Whiley programs
pub struct TypeChecker<'a> {
    env: TypeEnv,
    sink: &'a mut dyn MessageSink,
    /// Diagnostics of the last run, in emission order
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TypeChecker<'a> {
    /// Creates a checker writing its diagnostics to `sink`
    pub fn new(sink: &'a mut dyn MessageSink) -> Self {
        TypeChecker {
            env: TypeEnv::default(),
            sink,
            diagnostics: Vec::new(),
        }
    }

    /// Type check a complete program, annotating every expression.
    /// Returns `true` when the program is well typed.
    pub fn check_program(&mut self, program: &mut Program) -> bool {
        self.set_declarations(&program.declarations);
        self.diagnostics.clear();

        tracing::debug!(
            declarations = program.declarations.len(),
            "type checking program"
        );

        let ok = self.check_statement(&mut program.body);

        tracing::debug!(
            ok,
            diagnostics = self.diagnostics.len(),
            "type check finished"
        );
        ok
    }

    /// Replace the variable environment used for identifier lookup
    pub fn set_declarations(&mut self, decls: &[Declaration]) {
        self.env = TypeEnv::from_declarations(decls);
    }

    /// Diagnostics emitted since the last `check_program`
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.emit(&diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Infer, record and return the type of an expression
    pub fn check_expression(&mut self, expr: &mut Expression) -> Type {
        let at = expr.location();
        let ty = match &mut expr.kind {
            ExprKind::Identifier(name) => self.env.lookup(name).unwrap_or(Type::Untyped),

            ExprKind::Number(_) => Type::SI8,

            ExprKind::Undefined(ty) => *ty,

            // Loads are byte-wide whatever width was requested.
            ExprKind::Deref { addr, .. } => {
                let addr_ty = self.check_expression(addr);
                if addr_ty == Type::UI8 {
                    Type::UI8
                } else {
                    self.report(Diagnostic::mismatch(Type::UI8, addr_ty, at));
                    Type::Untyped
                }
            }

            ExprKind::Cast { expr: inner, target } => {
                let source = self.check_expression(inner);
                if source.bytesize() == target.bytesize() {
                    *target
                } else {
                    Type::Untyped
                }
            }

            ExprKind::Binary { left, right, .. } => {
                let left_ty = self.check_expression(left);
                let right_ty = self.check_expression(right);
                promote(left_ty, right_ty)
            }
        };

        expr.set_type(ty);
        ty
    }

    /// Check a condition of `if`/`while`; the diagnostic points at the condition
    fn check_condition(&mut self, cond: &mut Expression) -> bool {
        let ty = self.check_expression(cond);
        if ty.is_untyped() {
            self.report(Diagnostic::mismatch(Type::SI8, ty, cond.location()));
            false
        } else {
            true
        }
    }

    /// Type check a statement and everything below it
    pub fn check_statement(&mut self, stmt: &mut Statement) -> bool {
        let at = stmt.location();
        match &mut stmt.kind {
            StmtKind::Skip => true,

            StmtKind::Assign { name, value } => {
                let found = self.check_expression(value);
                match self.env.lookup(name) {
                    Some(declared) if declared == found => true,
                    Some(declared) => {
                        self.report(Diagnostic::mismatch(declared, found, at));
                        false
                    }
                    None => {
                        self.report(Diagnostic::VariableNotDeclared {
                            name: name.clone(),
                            at,
                        });
                        false
                    }
                }
            }

            StmtKind::MemAssign { addr, value } => {
                let addr_ty = self.check_expression(addr);
                let value_ty = self.check_expression(value);
                let mut ok = true;
                if addr_ty != Type::UI8 {
                    self.report(Diagnostic::mismatch(Type::UI8, addr_ty, addr.location()));
                    ok = false;
                }
                // An untyped value fails silently; its cause was reported below it.
                ok && !value_ty.is_untyped()
            }

            StmtKind::Assert(cond) | StmtKind::Assume(cond) => {
                let ty = self.check_expression(cond);
                if ty.is_untyped() {
                    self.report(Diagnostic::mismatch(Type::SI8, ty, at));
                    false
                } else {
                    true
                }
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond_ok = self.check_condition(condition);
                let then_ok = self.check_statement(then_branch);
                let else_ok = self.check_statement(else_branch);
                cond_ok && then_ok && else_ok
            }

            StmtKind::While { condition, body } => {
                let cond_ok = self.check_condition(condition);
                let body_ok = self.check_statement(body);
                cond_ok && body_ok
            }

            StmtKind::Sequence { first, second } => {
                let first_ok = self.check_statement(first);
                let second_ok = self.check_statement(second);
                first_ok && second_ok
            }
        }
    }
}

/// Result type of a binary operator; comparisons and arithmetic share it
pub fn promote(left: Type, right: Type) -> Type {
    if left.is_untyped() || right.is_untyped() {
        Type::Untyped
    } else if left == Type::SI8 || right == Type::SI8 {
        Type::SI8
    } else {
        Type::UI8
    }
}
