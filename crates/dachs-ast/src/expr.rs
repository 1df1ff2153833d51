//! Statements and expressions.

use derive_more::Display;

use dachs_core::Position;

use crate::decl::FuncParam;
use crate::node::Symbol;
use crate::pattern::{Destructuring, Pattern};
use crate::types::Type;

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub start: Position,
    pub end: Position,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(start: Position, end: Position, kind: StmtKind) -> Self {
        Self { start, end, kind }
    }

    /// Wrap an expression as a statement spanning the same range.
    pub fn expr(expr: Expr) -> Self {
        Self {
            start: expr.start.clone(),
            end: expr.end.clone(),
            kind: StmtKind::Expr(expr),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `let a, {b} = 1, r` or `var a = 1`
    VarDecl {
        mutable: bool,
        decls: Vec<Destructuring>,
        rhs: Vec<Expr>,
    },
    /// `a = 1`, `a, b = 1, 2`
    VarAssign { idents: Vec<Symbol>, rhs: Vec<Expr> },
    /// `arr[idx] = 42`
    IndexAssign {
        assignee: Expr,
        index: Expr,
        rhs: Expr,
    },
    /// `ret`, `ret a, b`
    Ret(Vec<Expr>),
    If(IfStmt),
    Switch(SwitchStmt),
    Match(MatchStmt),
    /// `for x in xs ... end`
    ForEach {
        iterator: Destructuring,
        range: Expr,
        body: Vec<Stmt>,
    },
    /// `for cond ... end`
    While { cond: Expr, body: Vec<Stmt> },
    Expr(Expr),
}

/// `if c then ... else ... end`
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Vec<Stmt>,
    pub else_block: Vec<Stmt>,
}

/// `switch case c1 then ... case c2 then ... else ... end`
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStmt {
    pub cases: Vec<SwitchStmtCase>,
    pub else_block: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStmtCase {
    pub cond: Expr,
    pub stmts: Vec<Stmt>,
}

/// `match e with p1 then ... with p2 then ... else ... end`
#[derive(Clone, Debug, PartialEq)]
pub struct MatchStmt {
    pub matched: Expr,
    pub arms: Vec<MatchStmtArm>,
    pub else_block: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchStmtArm {
    pub pattern: Pattern,
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub start: Position,
    pub end: Position,
    pub kind: Box<ExprKind>,
}

impl Expr {
    pub fn new(start: Position, end: Position, kind: ExprKind) -> Self {
        Self {
            start,
            end,
            kind: Box::new(kind),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum UnaryOp {
    #[display("-")]
    Neg,
    #[display("+")]
    Pos,
    #[display("!")]
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum BinaryOp {
    #[display("+")]
    Add,
    #[display("-")]
    Sub,
    #[display("*")]
    Mul,
    #[display("/")]
    Div,
    #[display("%")]
    Mod,
    #[display("==")]
    Eq,
    #[display("!=")]
    NotEq,
    #[display("<")]
    Less,
    #[display("<=")]
    LessEq,
    #[display(">")]
    Greater,
    #[display(">=")]
    GreaterEq,
    #[display("&&")]
    And,
    #[display("||")]
    Or,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    String(String),
    VarRef(Symbol),
    /// `[e1, e2]`
    Array(Vec<Expr>),
    /// `[k1 => v1, k2 => v2]`, `[=>]`
    Dict(Vec<DictKeyVal>),
    Unary {
        op: UnaryOp,
        child: Expr,
    },
    Binary {
        op: BinaryOp,
        lhs: Expr,
        rhs: Expr,
    },
    /// Statements followed by a value. Built only by block promotion.
    Seq {
        stmts: Vec<Stmt>,
        last: Expr,
    },
    If(IfExpr),
    Switch(SwitchExpr),
    Match(MatchExpr),
    /// `e as T`
    Coerce {
        expr: Expr,
        ty: Type,
    },
    /// `e[i]`
    IndexAccess {
        child: Expr,
        index: Expr,
    },
    /// `e.name`
    FieldAccess {
        child: Expr,
        name: String,
    },
    /// `Foo{a: e1, b: e2}`, `{a: e}`
    Record {
        ident: Option<Symbol>,
        fields: Vec<RecordLitField>,
    },
    /// `{_: e1, _: e2}`, `Foo{_: e}`
    Tuple {
        ident: Option<Symbol>,
        elems: Vec<Expr>,
    },
    /// `f(a, b)`, optionally followed by a `do ... end` lambda.
    FuncCall {
        callee: Expr,
        args: Vec<Expr>,
        do_block: Option<Expr>,
    },
    /// `f(a: e1, b: e2)`
    FuncCallNamed {
        callee: Expr,
        args: Vec<NamedArg>,
        do_block: Option<Expr>,
    },
    /// `-> a, b in a + b`, `-> 42`, `do x ... end`
    Lambda {
        is_do_block: bool,
        params: Vec<FuncParam>,
        body: Expr,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DictKeyVal {
    pub key: Expr,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordLitField {
    pub name: String,
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamedArg {
    pub name: String,
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfExpr {
    pub cond: Expr,
    pub then_expr: Expr,
    pub else_expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchExpr {
    pub cases: Vec<SwitchExprCase>,
    pub else_expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchExprCase {
    pub cond: Expr,
    pub body: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchExpr {
    pub matched: Expr,
    pub arms: Vec<MatchExprArm>,
    pub else_expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchExprArm {
    pub pattern: Pattern,
    pub body: Expr,
}
