//! Patterns of `match` arms and destructuring targets of declarations.
//!
//! Record fields carry no slot for renaming. `{foo}` binds the field `foo`
//! to a variable of the same name and a nested pattern may only refine the
//! shape of the field, so `{foo: bar}` cannot be represented.

use dachs_core::Position;

use crate::node::Symbol;

/// A pattern in a `with` arm of `match`.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub start: Position,
    pub end: Position,
    pub kind: PatternKind,
}

impl Pattern {
    pub fn new(start: Position, end: Position, kind: PatternKind) -> Self {
        Self { start, end, kind }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// `42`
    IntConst(i64),
    /// `42u`
    UIntConst(u64),
    /// `true`
    BoolConst(bool),
    /// `"foo"`
    StringConst(String),
    /// `3.14`
    FloatConst(f64),

    /// `{a, b}`, `Foo{a, ...}`, `Foo::Bar{a: 42}`
    Record {
        ident: Option<Symbol>,
        enum_case: Option<Symbol>,
        fields: Vec<FieldPattern>,
        rest: Option<Box<Pattern>>,
    },

    /// `a`, `_`
    VarDecl(Symbol),

    /// `[a, b, c]`, `[a, ...rest]`
    Array {
        elems: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
    },

    /// `...` or `...name`
    Rest(Option<Symbol>),
}

/// A field in a record pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPattern {
    pub name: Symbol,
    /// When `None`, the field value is bound to a variable named after it.
    pub pattern: Option<Pattern>,
}

/// Left hand side of `let`, `var` and `for ... in`.
#[derive(Clone, Debug, PartialEq)]
pub struct Destructuring {
    pub start: Position,
    pub end: Position,
    pub kind: DestructuringKind,
}

impl Destructuring {
    pub fn new(start: Position, end: Position, kind: DestructuringKind) -> Self {
        Self { start, end, kind }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DestructuringKind {
    /// `a`, `_`
    VarDecl(Symbol),

    /// `{a, b}`, `Foo{a, ...}`, `Foo::Bar{a: {b}}`
    Record {
        ident: Option<Symbol>,
        enum_case: Option<Symbol>,
        fields: Vec<RecordDestructuringField>,
        rest: Option<Box<Destructuring>>,
    },

    /// `...` or `...name`
    Rest(Option<Symbol>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordDestructuringField {
    pub name: Symbol,
    /// Nested record destructuring. When `None`, the field is bound to a
    /// variable named after it.
    pub child: Option<Destructuring>,
}
