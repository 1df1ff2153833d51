//! Uniform view over every node family.
//!
//! [`NodeRef`] borrows any node, reports its range and label, and lists its
//! children in traversal order. Adding a node kind requires extending the
//! exhaustive matches below, so traversal cannot silently miss one.

use std::fmt;

use derive_more::{Display, From};

use dachs_core::Position;

use crate::decl::{EnumTypedef, Function, Import, Program, Toplevel, Typedef};
use crate::expr::{Expr, ExprKind, Stmt, StmtKind};
use crate::pattern::{Destructuring, DestructuringKind, Pattern, PatternKind};
use crate::types::{Type, TypeKind};

/// Name of a variable, type or function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Common interface of AST nodes.
pub trait Node {
    fn start(&self) -> Position;
    fn end(&self) -> Position;
}

/// Borrowed reference to any node.
#[derive(Clone, Copy, Debug, From)]
pub enum NodeRef<'a> {
    Program(&'a Program),
    Typedef(&'a Typedef),
    EnumTypedef(&'a EnumTypedef),
    Function(&'a Function),
    Import(&'a Import),
    Type(&'a Type),
    Pattern(&'a Pattern),
    Destructuring(&'a Destructuring),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

impl<'a> From<&'a Toplevel> for NodeRef<'a> {
    fn from(toplevel: &'a Toplevel) -> Self {
        match toplevel {
            Toplevel::Typedef(t) => NodeRef::Typedef(t),
            Toplevel::EnumTypedef(t) => NodeRef::EnumTypedef(t),
            Toplevel::Function(f) => NodeRef::Function(f),
            Toplevel::Import(i) => NodeRef::Import(i),
        }
    }
}

// Parsed programs always have a toplevel. Programs built by hand may not.
impl Node for Program {
    fn start(&self) -> Position {
        match self.toplevels.first() {
            Some(t) => NodeRef::from(t).start(),
            None => Position::start_of(self.source.clone()),
        }
    }

    fn end(&self) -> Position {
        match self.toplevels.last() {
            Some(t) => NodeRef::from(t).end(),
            None => Position::start_of(self.source.clone()),
        }
    }
}

impl Node for Toplevel {
    fn start(&self) -> Position {
        NodeRef::from(self).start()
    }

    fn end(&self) -> Position {
        NodeRef::from(self).end()
    }
}

impl Node for Typedef {
    fn start(&self) -> Position {
        self.start.clone()
    }

    fn end(&self) -> Position {
        self.ty.end.clone()
    }
}

macro_rules! impl_node_with_range {
    ($($ty:ty),*) => {
        $(
            impl Node for $ty {
                fn start(&self) -> Position {
                    self.start.clone()
                }

                fn end(&self) -> Position {
                    self.end.clone()
                }
            }
        )*
    };
}

impl_node_with_range!(EnumTypedef, Function, Import, Type, Pattern, Destructuring, Stmt, Expr);

impl<'a> NodeRef<'a> {
    pub fn start(self) -> Position {
        match self {
            NodeRef::Program(n) => n.start(),
            NodeRef::Typedef(n) => n.start(),
            NodeRef::EnumTypedef(n) => n.start(),
            NodeRef::Function(n) => n.start(),
            NodeRef::Import(n) => n.start(),
            NodeRef::Type(n) => n.start(),
            NodeRef::Pattern(n) => n.start(),
            NodeRef::Destructuring(n) => n.start(),
            NodeRef::Stmt(n) => n.start(),
            NodeRef::Expr(n) => n.start(),
        }
    }

    pub fn end(self) -> Position {
        match self {
            NodeRef::Program(n) => n.end(),
            NodeRef::Typedef(n) => n.end(),
            NodeRef::EnumTypedef(n) => n.end(),
            NodeRef::Function(n) => n.end(),
            NodeRef::Import(n) => n.end(),
            NodeRef::Type(n) => n.end(),
            NodeRef::Pattern(n) => n.end(),
            NodeRef::Destructuring(n) => n.end(),
            NodeRef::Stmt(n) => n.end(),
            NodeRef::Expr(n) => n.end(),
        }
    }

    /// Direct children in traversal order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::Program(n) => out.extend(n.toplevels.iter().map(NodeRef::from)),
            NodeRef::Typedef(n) => out.push(NodeRef::Type(&n.ty)),
            NodeRef::EnumTypedef(n) => {
                out.extend(n.cases.iter().filter_map(|c| c.child.as_ref()).map(NodeRef::Type))
            }
            NodeRef::Function(n) => {
                out.extend(n.params.iter().filter_map(|p| p.ty.as_ref()).map(NodeRef::Type));
                out.extend(n.ret_ty.as_ref().map(NodeRef::Type));
                out.extend(n.body.iter().map(NodeRef::Stmt));
            }
            NodeRef::Import(_) => {}
            NodeRef::Type(n) => type_children(n, &mut out),
            NodeRef::Pattern(n) => pattern_children(n, &mut out),
            NodeRef::Destructuring(n) => destructuring_children(n, &mut out),
            NodeRef::Stmt(n) => stmt_children(n, &mut out),
            NodeRef::Expr(n) => expr_children(n, &mut out),
        }
        out
    }
}

fn type_children<'a>(ty: &'a Type, out: &mut Vec<NodeRef<'a>>) {
    match &ty.kind {
        TypeKind::Ref(_) | TypeKind::Var(_) | TypeKind::Enum { .. } => {}
        TypeKind::Instantiate { args, .. } => out.extend(args.iter().map(NodeRef::Type)),
        TypeKind::Record(fields) => out.extend(fields.iter().map(|f| NodeRef::Type(&f.ty))),
        TypeKind::Tuple(elems) => out.extend(elems.iter().map(NodeRef::Type)),
        TypeKind::Function { params, ret } => {
            out.extend(params.iter().map(NodeRef::Type));
            out.push(NodeRef::Type(ret));
        }
        TypeKind::Typeof(expr) => out.push(NodeRef::Expr(expr)),
    }
}

fn pattern_children<'a>(pat: &'a Pattern, out: &mut Vec<NodeRef<'a>>) {
    match &pat.kind {
        PatternKind::IntConst(_)
        | PatternKind::UIntConst(_)
        | PatternKind::BoolConst(_)
        | PatternKind::StringConst(_)
        | PatternKind::FloatConst(_)
        | PatternKind::VarDecl(_)
        | PatternKind::Rest(_) => {}
        PatternKind::Record { fields, rest, .. } => {
            out.extend(fields.iter().filter_map(|f| f.pattern.as_ref()).map(NodeRef::Pattern));
            out.extend(rest.as_deref().map(NodeRef::Pattern));
        }
        PatternKind::Array { elems, rest } => {
            out.extend(elems.iter().map(NodeRef::Pattern));
            out.extend(rest.as_deref().map(NodeRef::Pattern));
        }
    }
}

fn destructuring_children<'a>(d: &'a Destructuring, out: &mut Vec<NodeRef<'a>>) {
    match &d.kind {
        DestructuringKind::VarDecl(_) | DestructuringKind::Rest(_) => {}
        DestructuringKind::Record { fields, rest, .. } => {
            out.extend(
                fields
                    .iter()
                    .filter_map(|f| f.child.as_ref())
                    .map(NodeRef::Destructuring),
            );
            out.extend(rest.as_deref().map(NodeRef::Destructuring));
        }
    }
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match &stmt.kind {
        StmtKind::VarDecl { decls, rhs, .. } => {
            out.extend(decls.iter().map(NodeRef::Destructuring));
            out.extend(rhs.iter().map(NodeRef::Expr));
        }
        StmtKind::VarAssign { rhs, .. } => out.extend(rhs.iter().map(NodeRef::Expr)),
        StmtKind::IndexAssign {
            assignee,
            index,
            rhs,
        } => out.extend([assignee, index, rhs].map(NodeRef::Expr)),
        StmtKind::Ret(exprs) => out.extend(exprs.iter().map(NodeRef::Expr)),
        StmtKind::If(s) => {
            out.push(NodeRef::Expr(&s.cond));
            out.extend(s.then_block.iter().map(NodeRef::Stmt));
            out.extend(s.else_block.iter().map(NodeRef::Stmt));
        }
        StmtKind::Switch(s) => {
            for case in &s.cases {
                out.push(NodeRef::Expr(&case.cond));
                out.extend(case.stmts.iter().map(NodeRef::Stmt));
            }
            out.extend(s.else_block.iter().map(NodeRef::Stmt));
        }
        StmtKind::Match(s) => {
            out.push(NodeRef::Expr(&s.matched));
            for arm in &s.arms {
                out.push(NodeRef::Pattern(&arm.pattern));
                out.extend(arm.stmts.iter().map(NodeRef::Stmt));
            }
            out.extend(s.else_block.iter().map(NodeRef::Stmt));
        }
        StmtKind::ForEach {
            iterator,
            range,
            body,
        } => {
            out.push(NodeRef::Destructuring(iterator));
            out.push(NodeRef::Expr(range));
            out.extend(body.iter().map(NodeRef::Stmt));
        }
        StmtKind::While { cond, body } => {
            out.push(NodeRef::Expr(cond));
            out.extend(body.iter().map(NodeRef::Stmt));
        }
        StmtKind::Expr(e) => out.push(NodeRef::Expr(e)),
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match expr.kind.as_ref() {
        ExprKind::Int(_)
        | ExprKind::UInt(_)
        | ExprKind::Float(_)
        | ExprKind::Bool(_)
        | ExprKind::String(_)
        | ExprKind::VarRef(_) => {}
        ExprKind::Array(elems) => out.extend(elems.iter().map(NodeRef::Expr)),
        ExprKind::Dict(elems) => {
            for kv in elems {
                out.push(NodeRef::Expr(&kv.key));
                out.push(NodeRef::Expr(&kv.value));
            }
        }
        ExprKind::Unary { child, .. } => out.push(NodeRef::Expr(child)),
        ExprKind::Binary { lhs, rhs, .. } => out.extend([lhs, rhs].map(NodeRef::Expr)),
        ExprKind::Seq { stmts, last } => {
            out.extend(stmts.iter().map(NodeRef::Stmt));
            out.push(NodeRef::Expr(last));
        }
        ExprKind::If(e) => out.extend([&e.cond, &e.then_expr, &e.else_expr].map(NodeRef::Expr)),
        ExprKind::Switch(e) => {
            for case in &e.cases {
                out.push(NodeRef::Expr(&case.cond));
                out.push(NodeRef::Expr(&case.body));
            }
            out.push(NodeRef::Expr(&e.else_expr));
        }
        ExprKind::Match(e) => {
            out.push(NodeRef::Expr(&e.matched));
            for arm in &e.arms {
                out.push(NodeRef::Pattern(&arm.pattern));
                out.push(NodeRef::Expr(&arm.body));
            }
            out.push(NodeRef::Expr(&e.else_expr));
        }
        ExprKind::Coerce { expr, ty } => {
            out.push(NodeRef::Expr(expr));
            out.push(NodeRef::Type(ty));
        }
        ExprKind::IndexAccess { child, index } => out.extend([child, index].map(NodeRef::Expr)),
        ExprKind::FieldAccess { child, .. } => out.push(NodeRef::Expr(child)),
        ExprKind::Record { fields, .. } => out.extend(fields.iter().map(|f| NodeRef::Expr(&f.expr))),
        ExprKind::Tuple { elems, .. } => out.extend(elems.iter().map(NodeRef::Expr)),
        ExprKind::FuncCall {
            callee,
            args,
            do_block,
        } => {
            out.push(NodeRef::Expr(callee));
            out.extend(args.iter().map(NodeRef::Expr));
            out.extend(do_block.as_ref().map(NodeRef::Expr));
        }
        ExprKind::FuncCallNamed {
            callee,
            args,
            do_block,
        } => {
            out.push(NodeRef::Expr(callee));
            out.extend(args.iter().map(|a| NodeRef::Expr(&a.expr)));
            out.extend(do_block.as_ref().map(NodeRef::Expr));
        }
        ExprKind::Lambda { params, body, .. } => {
            out.extend(params.iter().filter_map(|p| p.ty.as_ref()).map(NodeRef::Type));
            out.push(NodeRef::Expr(body));
        }
    }
}

fn or_anonym(ident: &Option<Symbol>) -> &str {
    ident.as_ref().map_or("anonym", Symbol::as_str)
}

fn join<T>(items: &[T], name: impl Fn(&T) -> &str) -> String {
    items.iter().map(name).collect::<Vec<_>>().join(",")
}

/// Qualified name of a record pattern or destructuring: `Foo`, `Foo::Bar`.
fn record_name(ident: &Option<Symbol>, enum_case: &Option<Symbol>) -> String {
    match enum_case {
        Some(case) => format!("{}::{}", or_anonym(ident), case),
        None => or_anonym(ident).to_string(),
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program (toplevels: {})", self.toplevels.len())
    }
}

impl fmt::Display for Typedef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typedef ({})", self.ident)
    }
}

impl fmt::Display for EnumTypedef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cases = join(&self.cases, |c| c.name.as_str());
        write!(f, "EnumTypedef {}({})", self.ident, cases)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = join(&self.params, |p| p.ident.as_str());
        write!(f, "Function {}({})", self.ident, params)
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Import ({})", self.path())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Ref(ident) => write!(f, "TypeRef ({})", ident),
            TypeKind::Var(ident) => write!(f, "TypeVar ({})", ident),
            TypeKind::Instantiate { ident, .. } => write!(f, "TypeInstantiate ({})", ident),
            TypeKind::Record(fields) => write!(f, "RecordType {{{}}}", join(fields, |x| x.name.as_str())),
            TypeKind::Tuple(_) => f.write_str("TupleType"),
            TypeKind::Function { .. } => f.write_str("FunctionType"),
            TypeKind::Enum { ident, case } => write!(f, "EnumType ({}::{})", ident, case),
            TypeKind::Typeof(_) => f.write_str("Typeof"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PatternKind::IntConst(v) => write!(f, "IntConstPattern ({})", v),
            PatternKind::UIntConst(v) => write!(f, "UIntConstPattern ({})", v),
            PatternKind::BoolConst(v) => write!(f, "BoolConstPattern ({})", v),
            PatternKind::StringConst(v) => write!(f, "StringConstPattern \"{}\"", v),
            PatternKind::FloatConst(v) => write!(f, "FloatConstPattern ({:?})", v),
            PatternKind::Record {
                ident,
                enum_case,
                fields,
                ..
            } => write!(
                f,
                "RecordPattern {}{{{}}}",
                record_name(ident, enum_case),
                join(fields, |x| x.name.as_str())
            ),
            PatternKind::VarDecl(ident) => write!(f, "VarDeclPattern ({})", ident),
            PatternKind::Array { .. } => f.write_str("ArrayPattern"),
            PatternKind::Rest(Some(ident)) => write!(f, "RestPattern ({})", ident),
            PatternKind::Rest(None) => f.write_str("RestPattern"),
        }
    }
}

impl fmt::Display for Destructuring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DestructuringKind::VarDecl(ident) => write!(f, "VarDeclDestructuring ({})", ident),
            DestructuringKind::Record {
                ident,
                enum_case,
                fields,
                ..
            } => write!(
                f,
                "RecordDestructuring {}{{{}}}",
                record_name(ident, enum_case),
                join(fields, |x| x.name.as_str())
            ),
            DestructuringKind::Rest(Some(ident)) => write!(f, "RestDestructuring ({})", ident),
            DestructuringKind::Rest(None) => f.write_str("RestDestructuring"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::VarDecl { mutable, decls, .. } => {
                let var = if *mutable { "var " } else { "" };
                write!(f, "VarDecl {}(decls: {})", var, decls.len())
            }
            StmtKind::VarAssign { idents, .. } => {
                write!(f, "VarAssign ({})", join(idents, Symbol::as_str))
            }
            StmtKind::IndexAssign { .. } => f.write_str("IndexAssign"),
            StmtKind::Ret(_) => f.write_str("RetStmt"),
            StmtKind::If(_) => f.write_str("IfStmt"),
            StmtKind::Switch(_) => f.write_str("SwitchStmt"),
            StmtKind::Match(_) => f.write_str("MatchStmt"),
            StmtKind::ForEach { .. } => f.write_str("ForEachStmt"),
            StmtKind::While { .. } => f.write_str("WhileStmt"),
            StmtKind::Expr(_) => f.write_str("ExprStmt"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.as_ref() {
            ExprKind::Int(v) => write!(f, "IntLiteral ({})", v),
            ExprKind::UInt(v) => write!(f, "UIntLiteral ({})", v),
            ExprKind::Float(v) => write!(f, "FloatLiteral ({:?})", v),
            ExprKind::Bool(v) => write!(f, "BoolLiteral ({})", v),
            ExprKind::String(v) => write!(f, "StringLiteral \"{}\"", v),
            ExprKind::VarRef(ident) => write!(f, "VarRef ({})", ident),
            ExprKind::Array(elems) => write!(f, "ArrayLiteral (elems: {})", elems.len()),
            ExprKind::Dict(elems) => write!(f, "DictLiteral (elems: {})", elems.len()),
            ExprKind::Unary { op, .. } => write!(f, "UnaryExpr ({})", op),
            ExprKind::Binary { op, .. } => write!(f, "BinaryExpr ({})", op),
            ExprKind::Seq { .. } => f.write_str("SeqExpr"),
            ExprKind::If(_) => f.write_str("IfExpr"),
            ExprKind::Switch(_) => f.write_str("SwitchExpr"),
            ExprKind::Match(_) => f.write_str("MatchExpr"),
            ExprKind::Coerce { .. } => f.write_str("CoerceExpr"),
            ExprKind::IndexAccess { .. } => f.write_str("IndexAccess"),
            ExprKind::FieldAccess { name, .. } => write!(f, "FieldAccess ({})", name),
            ExprKind::Record { ident, fields } => write!(
                f,
                "RecordLiteral {}{{{}}}",
                or_anonym(ident),
                join(fields, |x| x.name.as_str())
            ),
            ExprKind::Tuple { elems, .. } => write!(f, "TupleLiteral (elems: {})", elems.len()),
            ExprKind::FuncCall { .. } => f.write_str("FuncCall"),
            ExprKind::FuncCallNamed { .. } => f.write_str("FuncCallNamed"),
            ExprKind::Lambda { params, .. } => {
                write!(f, "Lambda ({})", join(params, |p| p.ident.as_str()))
            }
        }
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Program(n) => fmt::Display::fmt(n, f),
            NodeRef::Typedef(n) => fmt::Display::fmt(n, f),
            NodeRef::EnumTypedef(n) => fmt::Display::fmt(n, f),
            NodeRef::Function(n) => fmt::Display::fmt(n, f),
            NodeRef::Import(n) => fmt::Display::fmt(n, f),
            NodeRef::Type(n) => fmt::Display::fmt(n, f),
            NodeRef::Pattern(n) => fmt::Display::fmt(n, f),
            NodeRef::Destructuring(n) => fmt::Display::fmt(n, f),
            NodeRef::Stmt(n) => fmt::Display::fmt(n, f),
            NodeRef::Expr(n) => fmt::Display::fmt(n, f),
        }
    }
}
