//! # Abstract Syntax Tree
//!
//! The tree a parser hands to the front end. Parents own their children;
//! there is no sharing and there are no cycles. Every node carries the
//! source span it was parsed from, and every expression carries a resolved
//! [`Type`] that starts out `Untyped` and is filled in by the
//! [`TypeChecker`](crate::types::TypeChecker).
//!
//! Trees are usually produced through [`ProgramBuilder`], which mirrors the
//! reduce actions of a shift-reduce grammar.

mod builder;
mod display;

pub use builder::ProgramBuilder;

use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileLoc {
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub col: usize,
}

impl FileLoc {
    /// Creates a position
    pub fn new(line: usize, col: usize) -> Self {
        FileLoc { line, col }
    }
}

impl Default for FileLoc {
    fn default() -> Self {
        FileLoc { line: 1, col: 1 }
    }
}

impl fmt::Display for FileLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Begin/end positions of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First character of the node
    pub begin: FileLoc,
    /// One past the last character of the node
    pub end: FileLoc,
}

impl SourceSpan {
    /// Creates a span from two positions
    pub fn new(begin: FileLoc, end: FileLoc) -> Self {
        SourceSpan { begin, end }
    }

    /// A zero-width span at `line:col`
    pub fn at(line: usize, col: usize) -> Self {
        let loc = FileLoc::new(line, col);
        SourceSpan {
            begin: loc,
            end: loc,
        }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.begin, self.end)
    }
}

/// A declared variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Variable name
    pub name: String,
    /// Declared type
    pub ty: Type,
}

impl Declaration {
    /// Creates a declaration
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Declaration {
            name: name.into(),
            ty,
        }
    }
}

/// Binary operators (arithmetic and comparison)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `<=`
    LEq,
    /// `>=`
    GEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `==`
    Eq,
    /// `!=`
    NEq,
}

impl BinaryOp {
    /// All operators
    pub const ALL: [BinaryOp; 10] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::LEq,
        BinaryOp::GEq,
        BinaryOp::Lt,
        BinaryOp::Gt,
        BinaryOp::Eq,
        BinaryOp::NEq,
    ];

    /// Concrete syntax of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::LEq => "<=",
            BinaryOp::GEq => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Eq => "==",
            BinaryOp::NEq => "!=",
        }
    }

    /// True for the six comparison operators
    pub fn is_comparison(self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// What kind of expression this is
    pub kind: ExprKind,
    /// Where it was parsed from
    pub span: SourceSpan,
    ty: Type,
}

/// Expression variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Variable reference
    Identifier(String),
    /// Integer literal
    Number(i64),
    /// Unconstrained value of the given type (nondeterministic input)
    Undefined(Type),
    /// Arithmetic or comparison
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
    },
    /// Load of `load`-wide value from the byte address `addr`
    Deref {
        /// Address expression
        addr: Box<Expression>,
        /// Requested load width
        load: Type,
    },
    /// Width-preserving reinterpretation
    Cast {
        /// Operand
        expr: Box<Expression>,
        /// Target type
        target: Type,
    },
}

impl Expression {
    /// Wraps a kind in an untyped node
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Expression {
            kind,
            span,
            ty: Type::Untyped,
        }
    }

    pub fn identifier(name: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(ExprKind::Identifier(name.into()), span)
    }

    pub fn number(value: i64, span: SourceSpan) -> Self {
        Self::new(ExprKind::Number(value), span)
    }

    pub fn undefined(ty: Type, span: SourceSpan) -> Self {
        Self::new(ExprKind::Undefined(ty), span)
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression, span: SourceSpan) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn deref(addr: Expression, load: Type, span: SourceSpan) -> Self {
        Self::new(
            ExprKind::Deref {
                addr: Box::new(addr),
                load,
            },
            span,
        )
    }

    pub fn cast(expr: Expression, target: Type, span: SourceSpan) -> Self {
        Self::new(
            ExprKind::Cast {
                expr: Box::new(expr),
                target,
            },
            span,
        )
    }

    /// Resolved type; `Untyped` until the type checker has run
    pub fn ty(&self) -> Type {
        self.ty
    }

    pub(crate) fn set_type(&mut self, ty: Type) {
        self.ty = ty;
    }

    /// True for literals
    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ExprKind::Number(_))
    }

    /// Source position used in diagnostics
    pub fn location(&self) -> FileLoc {
        self.span.begin
    }
}

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// What kind of statement this is
    pub kind: StmtKind,
    /// Where it was parsed from
    pub span: SourceSpan,
}

/// Statement variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// No-op
    Skip,
    /// `name = value`
    Assign {
        /// Target variable
        name: String,
        /// Assigned value
        value: Expression,
    },
    /// `*addr = value`
    MemAssign {
        /// Byte address
        addr: Expression,
        /// Stored value
        value: Expression,
    },
    /// Checked condition; violation is an error
    Assert(Expression),
    /// Condition taken as a fact
    Assume(Expression),
    /// Two-way branch
    If {
        /// Branch condition
        condition: Expression,
        /// Taken when the condition holds
        then_branch: Box<Statement>,
        /// Taken otherwise
        else_branch: Box<Statement>,
    },
    /// Loop re-testing `condition` before each iteration
    While {
        /// Loop condition
        condition: Expression,
        /// Loop body
        body: Box<Statement>,
    },
    /// `first; second`
    Sequence {
        /// Runs first
        first: Box<Statement>,
        /// Runs after `first`
        second: Box<Statement>,
    },
}

impl Statement {
    pub fn new(kind: StmtKind, span: SourceSpan) -> Self {
        Statement { kind, span }
    }

    pub fn skip(span: SourceSpan) -> Self {
        Self::new(StmtKind::Skip, span)
    }

    pub fn assign(name: impl Into<String>, value: Expression, span: SourceSpan) -> Self {
        Self::new(
            StmtKind::Assign {
                name: name.into(),
                value,
            },
            span,
        )
    }

    pub fn mem_assign(addr: Expression, value: Expression, span: SourceSpan) -> Self {
        Self::new(StmtKind::MemAssign { addr, value }, span)
    }

    pub fn assert(condition: Expression, span: SourceSpan) -> Self {
        Self::new(StmtKind::Assert(condition), span)
    }

    pub fn assume(condition: Expression, span: SourceSpan) -> Self {
        Self::new(StmtKind::Assume(condition), span)
    }

    pub fn if_else(
        condition: Expression,
        then_branch: Statement,
        else_branch: Statement,
        span: SourceSpan,
    ) -> Self {
        Self::new(
            StmtKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        )
    }

    pub fn while_loop(condition: Expression, body: Statement, span: SourceSpan) -> Self {
        Self::new(
            StmtKind::While {
                condition,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn sequence(first: Statement, second: Statement, span: SourceSpan) -> Self {
        Self::new(
            StmtKind::Sequence {
                first: Box::new(first),
                second: Box::new(second),
            },
            span,
        )
    }

    /// Chain statements left to right; `None` for an empty list.
    /// Each sequence node takes the span of its first statement.
    pub fn chain(statements: impl IntoIterator<Item = Statement>) -> Option<Statement> {
        statements.into_iter().reduce(|first, second| {
            let span = first.span;
            Statement::sequence(first, second, span)
        })
    }

    /// Source position used in diagnostics and IR location names
    pub fn location(&self) -> FileLoc {
        self.span.begin
    }
}

/// Complete program: declarations plus one root statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Declared variables, in source order
    pub declarations: Vec<Declaration>,
    /// Root statement
    pub body: Statement,
}

impl Program {
    pub fn new(declarations: Vec<Declaration>, body: Statement) -> Self {
        Program { declarations, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_loc_display() {
        assert_eq!(FileLoc::new(4, 12).to_string(), "4:12");
        assert_eq!(FileLoc::default().to_string(), "1:1");
        let span = SourceSpan::new(FileLoc::new(1, 2), FileLoc::new(1, 9));
        assert_eq!(span.to_string(), "1:2 - 1:9");
    }

    #[test]
    fn test_new_expression_is_untyped() {
        let e = Expression::binary(
            BinaryOp::Add,
            Expression::number(1, SourceSpan::at(1, 1)),
            Expression::identifier("x", SourceSpan::at(1, 5)),
            SourceSpan::at(1, 1),
        );
        assert_eq!(e.ty(), Type::Untyped);
        assert!(!e.is_constant());
        assert!(Expression::number(3, SourceSpan::default()).is_constant());
    }

    #[test]
    fn test_chain_is_left_nested() {
        let s = Statement::chain(vec![
            Statement::skip(SourceSpan::at(1, 1)),
            Statement::skip(SourceSpan::at(2, 1)),
            Statement::skip(SourceSpan::at(3, 1)),
        ])
        .unwrap();

        match &s.kind {
            StmtKind::Sequence { first, second } => {
                assert!(matches!(first.kind, StmtKind::Sequence { .. }));
                assert_eq!(second.location(), FileLoc::new(3, 1));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
        assert!(Statement::chain(Vec::new()).is_none());
    }

    #[test]
    fn test_comparison_ops() {
        let comparisons: Vec<_> = BinaryOp::ALL
            .iter()
            .filter(|op| op.is_comparison())
            .collect();
        assert_eq!(comparisons.len(), 6);
        assert_eq!(BinaryOp::NEq.symbol(), "!=");
    }
}
