//! Program and toplevel declarations.

use std::sync::Arc;

use dachs_core::{Position, Source};

use crate::expr::Stmt;
use crate::node::Symbol;
use crate::types::Type;

/// Root of a parsed file.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub source: Arc<Source>,
    pub toplevels: Vec<Toplevel>,
    /// Filled by import resolution, one entry per `import` in declaration order.
    pub modules: Vec<Module>,
}

impl Program {
    pub fn new(source: Arc<Source>, toplevels: Vec<Toplevel>) -> Self {
        Self {
            source,
            toplevels,
            modules: Vec::new(),
        }
    }

    /// Iterate over the `import` declarations in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.toplevels.iter().filter_map(|t| match t {
            Toplevel::Import(i) => Some(i),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.toplevels.iter().filter_map(|t| match t {
            Toplevel::Function(f) => Some(f),
            _ => None,
        })
    }
}

/// Resolved view of one `import` declaration.
///
/// `ast` is shared with the resolver's cache so every import of the same
/// file refers to the same program.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    /// Set for `import a.b.*`: the last segment of the path (`b`).
    pub namespace: Option<String>,
    pub imported: Vec<String>,
    pub expose_all: bool,
    pub ast: Arc<Program>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Toplevel {
    Typedef(Typedef),
    EnumTypedef(EnumTypedef),
    Function(Function),
    Import(Import),
}

/// `type Name T`
#[derive(Clone, Debug, PartialEq)]
pub struct Typedef {
    pub start: Position,
    pub ident: Symbol,
    pub ty: Type,
}

/// `type Name case A case B{x: int} end`
#[derive(Clone, Debug, PartialEq)]
pub struct EnumTypedef {
    pub start: Position,
    pub end: Position,
    pub ident: Symbol,
    pub cases: Vec<EnumTypeCase>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumTypeCase {
    pub name: String,
    /// Record type of the payload, when the case has one.
    pub child: Option<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncParam {
    pub ident: Symbol,
    pub ty: Option<Type>,
}

/// `func name(params): ret ... end`
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub start: Position,
    pub end: Position,
    pub ident: Symbol,
    pub params: Vec<FuncParam>,
    pub ret_ty: Option<Type>,
    pub body: Vec<Stmt>,
}

/// `import a.b.c` has parents `[a, b]` and imported `[c]`.
/// `import .a.{b, c}` is relative with parents `[a]` and imported `[b, c]`.
/// `import a.b.*` imports everything of `a.b` under the namespace `b`.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub start: Position,
    pub end: Position,
    pub relative: bool,
    pub parents: Vec<String>,
    pub imported: Vec<String>,
}

impl Import {
    pub fn is_import_all(&self) -> bool {
        self.imported.len() == 1 && self.imported[0] == "*"
    }

    /// Import path as written, e.g. `.a.b.{c,d}`.
    pub fn path(&self) -> String {
        let head = if self.relative { "." } else { "" };
        let tail = match self.imported.as_slice() {
            [one] => one.clone(),
            many => format!("{{{}}}", many.join(",")),
        };
        if self.parents.is_empty() {
            format!("{}{}", head, tail)
        } else {
            format!("{}{}.{}", head, self.parents.join("."), tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(relative: bool, parents: &[&str], imported: &[&str]) -> Import {
        let pos = Position::start_of(Source::dummy(""));
        Import {
            start: pos.clone(),
            end: pos,
            relative,
            parents: parents.iter().map(|s| s.to_string()).collect(),
            imported: imported.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn import_paths() {
        assert_eq!(import(false, &["a", "b"], &["c"]).path(), "a.b.c");
        assert_eq!(import(true, &["a"], &["b", "c"]).path(), ".a.{b,c}");
        assert_eq!(import(false, &["std"], &["*"]).path(), "std.*");
    }

    #[test]
    fn import_all() {
        assert!(import(false, &["std"], &["*"]).is_import_all());
        assert!(!import(false, &["std"], &["print"]).is_import_all());
    }
}
