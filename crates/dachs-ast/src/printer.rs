//! Indented dump of an AST, one node per line.
//!
//! ```text
//! AST of main.dcs:
//! Program (toplevels: 1) (1:1-1:23)
//! -   Function main() (1:1-1:23)
//! -   -   RetStmt (1:12-1:18)
//! -   -   -   IntLiteral (42) (1:16-1:18)
//! ```

use std::io;

use crate::node::NodeRef;
use crate::visit::{Visitor, WalkAction, walk};

/// Visitor writing each node with indentation proportional to its depth.
pub struct Printer<W> {
    out: W,
    depth: usize,
    error: Option<io::Error>,
}

impl<W: io::Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            depth: 0,
            error: None,
        }
    }

    /// Finish printing and return the first write error, if any.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn write_node(&mut self, node: NodeRef<'_>) -> io::Result<()> {
        let (s, e) = (node.start(), node.end());
        write!(
            self.out,
            "\n{}{} ({}:{}-{}:{})",
            "-   ".repeat(self.depth),
            node,
            s.line,
            s.column,
            e.line,
            e.column
        )
    }
}

impl<'a, W: io::Write> Visitor<'a> for Printer<W> {
    fn visit(&mut self, node: NodeRef<'a>) -> WalkAction {
        if self.error.is_some() {
            return WalkAction::Skip;
        }
        if let Err(err) = self.write_node(node) {
            self.error = Some(err);
            return WalkAction::Skip;
        }
        self.depth += 1;
        WalkAction::Advance
    }

    fn leave(&mut self, _node: NodeRef<'a>) {
        self.depth -= 1;
    }
}

/// Print the tree rooted at `node` with a header naming its file.
pub fn fprint<'a>(mut out: impl io::Write, node: impl Into<NodeRef<'a>>) -> io::Result<()> {
    let node = node.into();
    let start = node.start();
    if start.source.name.is_empty() {
        write!(out, "AST:")?;
    } else {
        write!(out, "AST of {}:", start.source.name)?;
    }
    let mut printer = Printer::new(out);
    walk(&mut printer, node);
    printer.finish().map(drop)
}

/// Same as [`fprint`], followed by a newline.
pub fn fprintln<'a>(mut out: impl io::Write, node: impl Into<NodeRef<'a>>) -> io::Result<()> {
    fprint(&mut out, node)?;
    writeln!(out)
}

/// Render the tree into a string.
pub fn to_string<'a>(node: impl Into<NodeRef<'a>>) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = fprint(&mut buf, node);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use dachs_core::{Position, Source};

    use super::*;
    use crate::*;

    #[test]
    fn prints_nodes_with_depth_and_range() {
        let src = Source::dummy("func main\n  ret 42\nend");
        let p = |offset, line, column| Position::new(offset, line, column, src.clone());
        let value = Expr::new(p(16, 2, 7), p(18, 2, 9), ExprKind::Int(42));
        let ret = Stmt::new(p(12, 2, 3), p(18, 2, 9), StmtKind::Ret(vec![value]));
        let func = Function {
            start: p(0, 1, 1),
            end: p(22, 3, 4),
            ident: Symbol::new("main"),
            params: vec![],
            ret_ty: None,
            body: vec![ret],
        };
        let prog = Program::new(src.clone(), vec![Toplevel::Function(func)]);

        insta::assert_snapshot!(to_string(&prog), @r"
        AST of <dummy>:
        Program (toplevels: 1) (1:1-3:4)
        -   Function main() (1:1-3:4)
        -   -   RetStmt (2:3-2:9)
        -   -   -   IntLiteral (42) (2:7-2:9)
        ");
    }

    #[test]
    fn fprintln_appends_newline() {
        let src = Source::dummy("type t int");
        let p = |offset, column| Position::new(offset, 1, column, src.clone());
        let typedef = Typedef {
            start: p(0, 1),
            ident: Symbol::new("t"),
            ty: Type::new(p(7, 8), p(10, 11), TypeKind::Ref(Symbol::new("int"))),
        };
        let prog = Program::new(src.clone(), vec![Toplevel::Typedef(typedef)]);

        let mut out = Vec::new();
        fprintln(&mut out, &prog).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "AST of <dummy>:\nProgram (toplevels: 1) (1:1-1:11)\n-   Typedef (t) (1:1-1:11)\n-   -   TypeRef (int) (1:8-1:11)\n"
        );
    }
}
