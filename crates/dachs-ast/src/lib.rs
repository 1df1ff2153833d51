//! Abstract syntax tree of the Dachs language.
//!
//! Each node family is a struct holding its source range plus a `kind` enum
//! with the variant specific fields. [`NodeRef`] gives a uniform view over
//! all families and drives [`walk`].

pub mod decl;
pub mod expr;
pub mod node;
pub mod pattern;
pub mod printer;
pub mod types;
pub mod visit;

pub use decl::{
    EnumTypeCase, EnumTypedef, FuncParam, Function, Import, Module, Program, Toplevel, Typedef,
};
pub use expr::{
    BinaryOp, DictKeyVal, Expr, ExprKind, IfExpr, IfStmt, MatchExpr, MatchExprArm, MatchStmt,
    MatchStmtArm, NamedArg, RecordLitField, Stmt, StmtKind, SwitchExpr, SwitchExprCase,
    SwitchStmt, SwitchStmtCase, UnaryOp,
};
pub use node::{Node, NodeRef, Symbol};
pub use pattern::{
    Destructuring, DestructuringKind, FieldPattern, Pattern, PatternKind,
    RecordDestructuringField,
};
pub use printer::{Printer, fprint, fprintln};
pub use types::{RecordTypeField, Type, TypeKind};
pub use visit::{Visitor, WalkAction, walk};
