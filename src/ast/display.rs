//! Pretty printer for programs (debug output, not a stable format)

use super::{ExprKind, Expression, Program, Statement, StmtKind};
use std::fmt;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Number(value) => write!(f, "{}", value),
            ExprKind::Undefined(ty) => write!(f, "undef {}", ty),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            ExprKind::Deref { addr, .. } => write!(f, "*{}", addr),
            ExprKind::Cast { expr, target } => write!(f, "{} as {}", expr, target),
        }
    }
}

fn write_statement(f: &mut fmt::Formatter<'_>, stmt: &Statement, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match &stmt.kind {
        StmtKind::Skip => writeln!(f, "{}skip;", pad),
        StmtKind::Assign { name, value } => writeln!(f, "{}{} = {};", pad, name, value),
        StmtKind::MemAssign { addr, value } => writeln!(f, "{}*{} = {};", pad, addr, value),
        StmtKind::Assert(cond) => writeln!(f, "{}assert ({});", pad, cond),
        StmtKind::Assume(cond) => writeln!(f, "{}assume ({});", pad, cond),
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            writeln!(f, "{}if ({}) {{", pad, condition)?;
            write_statement(f, then_branch, depth + 1)?;
            writeln!(f, "{}}} else {{", pad)?;
            write_statement(f, else_branch, depth + 1)?;
            writeln!(f, "{}}}", pad)
        }
        StmtKind::While { condition, body } => {
            writeln!(f, "{}while ({}) {{", pad, condition)?;
            write_statement(f, body, depth + 1)?;
            writeln!(f, "{}}}", pad)
        }
        StmtKind::Sequence { first, second } => {
            write_statement(f, first, depth)?;
            write_statement(f, second, depth)
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.declarations {
            writeln!(f, "{} {};", decl.ty, decl.name)?;
        }
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Declaration, Expression, Program, SourceSpan, Statement};
    use crate::types::Type;

    #[test]
    fn test_print_loop_program() {
        let sp = SourceSpan::default;
        let x = || Expression::identifier("x", sp());
        let body = Statement::assign(
            "x",
            Expression::binary(BinaryOp::Add, x(), Expression::number(1, sp()), sp()),
            sp(),
        );
        let program = Program::new(
            vec![Declaration::new("x", Type::UI8)],
            Statement::while_loop(
                Expression::binary(BinaryOp::Lt, x(), Expression::number(10, sp()), sp()),
                body,
                sp(),
            ),
        );

        assert_eq!(
            program.to_string(),
            "ui8 x;\nwhile ((x < 10)) {\n  x = (x + 1);\n}\n"
        );
    }

    #[test]
    fn test_print_memory_and_casts() {
        let sp = SourceSpan::default;
        let stmt = Statement::mem_assign(
            Expression::identifier("p", sp()),
            Expression::cast(
                Expression::deref(Expression::identifier("q", sp()), Type::UI8, sp()),
                Type::SI8,
                sp(),
            ),
            sp(),
        );
        assert_eq!(stmt.to_string(), "*p = *q as si8;\n");
    }
}
