//! Type expressions.

use dachs_core::Position;

use crate::expr::Expr;
use crate::node::Symbol;

/// A type written in source code.
#[derive(Clone, Debug, PartialEq)]
pub struct Type {
    pub start: Position,
    pub end: Position,
    pub kind: TypeKind,
}

impl Type {
    pub fn new(start: Position, end: Position, kind: TypeKind) -> Self {
        Self { start, end, kind }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    /// `int`, `float`, `Foo`
    Ref(Symbol),

    /// `'a`
    Var(Symbol),

    /// `T{A, B}`
    Instantiate { ident: Symbol, args: Vec<Type> },

    /// `{a: int, b: T}`
    Record(Vec<RecordTypeField>),

    /// `{_: int, _: str}`
    Tuple(Vec<Type>),

    /// `(int, str) -> float`
    Function { params: Vec<Type>, ret: Box<Type> },

    /// `Enum::Case`
    Enum { ident: Symbol, case: Symbol },

    /// `typeof(expr)`
    Typeof(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordTypeField {
    pub name: String,
    pub ty: Type,
}
