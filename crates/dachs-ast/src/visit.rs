//! Pre-order traversal over the AST.

use crate::node::NodeRef;

/// Controls whether to descend into children during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Continue walking and descend into the children.
    Advance,
    /// Skip the children of the current node. Siblings are still visited.
    Skip,
}

/// A pass over the AST.
///
/// `visit` is called on entering a node. `leave` is called after all
/// children of a node were walked, and only when `visit` returned
/// [`WalkAction::Advance`] for it.
pub trait Visitor<'a> {
    fn visit(&mut self, node: NodeRef<'a>) -> WalkAction;

    fn leave(&mut self, _node: NodeRef<'a>) {}
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(NodeRef<'a>) -> WalkAction,
{
    fn visit(&mut self, node: NodeRef<'a>) -> WalkAction {
        self(node)
    }
}

/// Walk `node` and its descendants depth-first.
pub fn walk<'a, V>(visitor: &mut V, node: impl Into<NodeRef<'a>>)
where
    V: Visitor<'a> + ?Sized,
{
    let node = node.into();
    if visitor.visit(node) == WalkAction::Skip {
        return;
    }
    for child in node.children() {
        walk(visitor, child);
    }
    visitor.leave(node);
}

#[cfg(test)]
mod tests {
    use dachs_core::{Position, Source};

    use super::*;
    use crate::*;

    fn pos() -> Position {
        Position::start_of(Source::dummy(""))
    }

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(pos(), pos(), kind)
    }

    fn ret(value: i64) -> Stmt {
        Stmt::new(pos(), pos(), StmtKind::Ret(vec![expr(ExprKind::Int(value))]))
    }

    fn program(body: Vec<Stmt>) -> Program {
        let func = Function {
            start: pos(),
            end: pos(),
            ident: Symbol::new("main"),
            params: vec![],
            ret_ty: None,
            body,
        };
        Program::new(Source::dummy(""), vec![Toplevel::Function(func)])
    }

    fn nested_returns() -> Program {
        let inner_if = IfStmt {
            cond: expr(ExprKind::Bool(true)),
            then_block: vec![ret(1)],
            else_block: vec![ret(2)],
        };
        program(vec![
            Stmt::new(pos(), pos(), StmtKind::If(inner_if)),
            Stmt::new(
                pos(),
                pos(),
                StmtKind::While {
                    cond: expr(ExprKind::Bool(false)),
                    body: vec![ret(3)],
                },
            ),
            ret(4),
        ])
    }

    #[derive(Default)]
    struct ReturnGatherer<'a> {
        found: Vec<&'a Stmt>,
    }

    impl<'a> Visitor<'a> for ReturnGatherer<'a> {
        fn visit(&mut self, node: NodeRef<'a>) -> WalkAction {
            if let NodeRef::Stmt(stmt) = node
                && let StmtKind::Ret(_) = stmt.kind
            {
                self.found.push(stmt);
            }
            WalkAction::Advance
        }
    }

    fn returned_value(stmt: &Stmt) -> i64 {
        let StmtKind::Ret(exprs) = &stmt.kind else {
            panic!("not a return: {}", stmt);
        };
        match exprs[0].kind.as_ref() {
            ExprKind::Int(v) => *v,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn gathers_returns_in_preorder() {
        let prog = nested_returns();
        let mut gatherer = ReturnGatherer::default();
        walk(&mut gatherer, &prog);
        let values: Vec<_> = gatherer.found.into_iter().map(returned_value).collect();
        assert_eq!(values, [1, 2, 3, 4]);
    }

    #[test]
    fn skip_prunes_subtree_only() {
        let prog = nested_returns();
        let mut labels = Vec::new();
        walk(
            &mut |node: NodeRef<'_>| {
                labels.push(node.to_string());
                match node {
                    NodeRef::Stmt(Stmt { kind: StmtKind::If(_), .. }) => WalkAction::Skip,
                    _ => WalkAction::Advance,
                }
            },
            &prog,
        );
        assert_eq!(
            labels,
            [
                "Program (toplevels: 1)",
                "Function main()",
                "IfStmt",
                "WhileStmt",
                "BoolLiteral (false)",
                "RetStmt",
                "IntLiteral (3)",
                "RetStmt",
                "IntLiteral (4)",
            ]
        );
    }

    #[test]
    fn leave_is_balanced_with_advance() {
        struct Depth {
            depth: usize,
            max: usize,
        }

        impl<'a> Visitor<'a> for Depth {
            fn visit(&mut self, _node: NodeRef<'a>) -> WalkAction {
                self.depth += 1;
                self.max = self.max.max(self.depth);
                WalkAction::Advance
            }

            fn leave(&mut self, _node: NodeRef<'a>) {
                self.depth -= 1;
            }
        }

        let prog = nested_returns();
        let mut v = Depth { depth: 0, max: 0 };
        walk(&mut v, &prog);
        assert_eq!(v.depth, 0);
        // Program > Function > IfStmt > RetStmt > IntLiteral
        assert_eq!(v.max, 5);
    }
}
