//! Conversion of statement blocks into expressions.
//!
//! Blocks of `if`, `switch` and `match` are always parsed as statements.
//! When such a construct appears where a value is needed, its blocks are
//! converted here: the last statement of each block becomes the value of the
//! block and the preceding statements are kept in a [`ExprKind::Seq`].
//! The conversion recurses because the last statement may itself be an
//! `if` statement, as in
//!
//! ```text
//! if c1 then 1 else if c2 then 2 else 3 end end
//! ```

use dachs_ast::{
    Expr, ExprKind, IfExpr, IfStmt, MatchExpr, MatchExprArm, MatchStmt, Stmt, StmtKind,
    SwitchExpr, SwitchExprCase, SwitchStmt,
};
use dachs_core::{Error, Position, ordinal};

/// Convert a block into one expression.
///
/// `hint` is reported when the block is empty, since an empty block has no
/// position of its own.
pub fn block_expr(mut stmts: Vec<Stmt>, hint: &Position) -> Result<Expr, Error> {
    let Some(last) = stmts.pop() else {
        return Err(Error::at(
            hint.clone(),
            "Blocks in expression must end with an expression, but the block is empty",
        ));
    };

    let last = promote_stmt(last)?;
    if stmts.is_empty() {
        return Ok(last);
    }

    let start = stmts[0].start.clone();
    let end = last.end.clone();
    Ok(Expr::new(start, end, ExprKind::Seq { stmts, last }))
}

/// Convert the last statement of a block into an expression.
pub fn promote_stmt(stmt: Stmt) -> Result<Expr, Error> {
    let Stmt { start, end, kind } = stmt;
    match kind {
        StmtKind::Expr(e) => Ok(e),
        StmtKind::If(s) => if_expr(s, start, end),
        StmtKind::Switch(s) => switch_expr(s, start, end),
        StmtKind::Match(s) => match_expr(s, start, end),
        kind => {
            let label = Stmt::new(start.clone(), end.clone(), kind).to_string();
            Err(Error::new(
                start,
                end,
                format!(
                    "Blocks in expression must end with an expression but the last item in block is '{}'",
                    label
                ),
            ))
        }
    }
}

fn if_expr(stmt: IfStmt, start: Position, end: Position) -> Result<Expr, Error> {
    let IfStmt {
        cond,
        then_block,
        else_block,
    } = stmt;

    let then_expr = block_expr(then_block, &start)
        .map_err(|e| e.note_at(&start, "'then' block of 'if' expression is incorrect"))?;
    let else_expr = block_expr(else_block, &start)
        .map_err(|e| e.note_at(&start, "'else' block of 'if' expression is incorrect"))?;

    Ok(Expr::new(
        start,
        end,
        ExprKind::If(IfExpr {
            cond,
            then_expr,
            else_expr,
        }),
    ))
}

fn switch_expr(stmt: SwitchStmt, start: Position, end: Position) -> Result<Expr, Error> {
    let mut cases = Vec::with_capacity(stmt.cases.len());
    for (i, case) in stmt.cases.into_iter().enumerate() {
        let body = block_expr(case.stmts, &start).map_err(|e| {
            e.note_at(
                &start,
                format!("{} 'case' block of 'switch' expression is incorrect", ordinal(i + 1)),
            )
        })?;
        cases.push(SwitchExprCase {
            cond: case.cond,
            body,
        });
    }

    let else_expr = block_expr(stmt.else_block, &start)
        .map_err(|e| e.note_at(&start, "'else' block of 'switch' expression is incorrect"))?;

    Ok(Expr::new(start, end, ExprKind::Switch(SwitchExpr { cases, else_expr })))
}

fn match_expr(stmt: MatchStmt, start: Position, end: Position) -> Result<Expr, Error> {
    let mut arms = Vec::with_capacity(stmt.arms.len());
    for (i, arm) in stmt.arms.into_iter().enumerate() {
        let body = block_expr(arm.stmts, &start).map_err(|e| {
            e.note_at(
                &start,
                format!("{} 'with' block of 'match' expression is incorrect", ordinal(i + 1)),
            )
        })?;
        arms.push(MatchExprArm {
            pattern: arm.pattern,
            body,
        });
    }

    let else_expr = block_expr(stmt.else_block, &start)
        .map_err(|e| e.note_at(&start, "'else' block of 'match' expression is incorrect"))?;

    Ok(Expr::new(
        start,
        end,
        ExprKind::Match(MatchExpr {
            matched: stmt.matched,
            arms,
            else_expr,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use dachs_ast::{MatchStmtArm, Pattern, PatternKind, SwitchStmtCase};
    use dachs_core::Source;

    use super::*;

    fn pos(offset: usize) -> Position {
        Position::new(offset, 1, offset + 1, Source::dummy("0123456789"))
    }

    fn int(v: i64) -> Expr {
        Expr::new(pos(1), pos(2), ExprKind::Int(v))
    }

    fn expr_stmt(v: i64) -> Stmt {
        Stmt::expr(int(v))
    }

    fn ret_stmt() -> Stmt {
        Stmt::new(pos(3), pos(4), StmtKind::Ret(vec![]))
    }

    fn if_stmt(then_block: Vec<Stmt>, else_block: Vec<Stmt>) -> Stmt {
        Stmt::new(
            pos(0),
            pos(9),
            StmtKind::If(IfStmt {
                cond: Expr::new(pos(0), pos(1), ExprKind::Bool(true)),
                then_block,
                else_block,
            }),
        )
    }

    #[test]
    fn single_expr_stmt_is_unwrapped() {
        let e = block_expr(vec![expr_stmt(42)], &pos(0)).unwrap();
        assert_eq!(e, int(42));
    }

    #[test]
    fn multiple_stmts_become_seq() {
        let e = block_expr(vec![expr_stmt(1), expr_stmt(2), expr_stmt(3)], &pos(0)).unwrap();
        let ExprKind::Seq { stmts, last } = e.kind.as_ref() else {
            panic!("not a seq: {}", e);
        };
        assert_eq!(stmts, &vec![expr_stmt(1), expr_stmt(2)]);
        assert_eq!(last, &int(3));
    }

    #[test]
    fn empty_block_reports_hint() {
        let err = block_expr(vec![], &pos(5)).unwrap_err();
        assert_eq!(err.start, pos(5));
        assert_eq!(
            err.message(),
            "Blocks in expression must end with an expression, but the block is empty"
        );
        assert!(err.end.is_none());
    }

    #[test]
    fn non_expression_at_last() {
        let err = block_expr(vec![expr_stmt(1), ret_stmt()], &pos(0)).unwrap_err();
        assert_eq!(
            err.message(),
            "Blocks in expression must end with an expression but the last item in block is 'RetStmt'"
        );
        assert_eq!(err.start, pos(3));
    }

    #[test]
    fn nested_if_is_promoted_recursively() {
        let inner = if_stmt(vec![expr_stmt(2)], vec![expr_stmt(3)]);
        let outer = if_stmt(vec![expr_stmt(1)], vec![inner]);
        let e = block_expr(vec![outer], &pos(0)).unwrap();

        let ExprKind::If(outer) = e.kind.as_ref() else {
            panic!("not an if: {}", e);
        };
        assert_eq!(outer.then_expr, int(1));
        let ExprKind::If(inner) = outer.else_expr.kind.as_ref() else {
            panic!("else is not an if: {}", outer.else_expr);
        };
        assert_eq!(inner.then_expr, int(2));
        assert_eq!(inner.else_expr, int(3));
    }

    #[test]
    fn missing_else_of_if() {
        let err = block_expr(vec![if_stmt(vec![expr_stmt(1)], vec![])], &pos(0)).unwrap_err();
        assert_eq!(
            err.notes(),
            ["'else' block of 'if' expression is incorrect (at <dummy>:1:1)"]
        );
    }

    #[test]
    fn notes_stack_from_inner_to_outer() {
        let inner = if_stmt(vec![], vec![expr_stmt(1)]);
        let outer = if_stmt(vec![expr_stmt(1)], vec![inner]);
        let err = block_expr(vec![outer], &pos(0)).unwrap_err();
        assert_eq!(
            err.notes(),
            [
                "'then' block of 'if' expression is incorrect (at <dummy>:1:1)",
                "'else' block of 'if' expression is incorrect (at <dummy>:1:1)",
            ]
        );
    }

    #[test]
    fn switch_case_is_named_by_ordinal() {
        let switch = Stmt::new(
            pos(0),
            pos(9),
            StmtKind::Switch(SwitchStmt {
                cases: vec![
                    SwitchStmtCase {
                        cond: int(1),
                        stmts: vec![expr_stmt(1)],
                    },
                    SwitchStmtCase {
                        cond: int(2),
                        stmts: vec![ret_stmt()],
                    },
                ],
                else_block: vec![expr_stmt(3)],
            }),
        );
        let err = block_expr(vec![switch], &pos(0)).unwrap_err();
        assert_eq!(
            err.notes(),
            ["2nd 'case' block of 'switch' expression is incorrect (at <dummy>:1:1)"]
        );
    }

    #[test]
    fn match_promotes_arms_and_else() {
        let arm = |v| MatchStmtArm {
            pattern: Pattern::new(pos(1), pos(2), PatternKind::IntConst(v)),
            stmts: vec![expr_stmt(v)],
        };
        let stmt = Stmt::new(
            pos(0),
            pos(9),
            StmtKind::Match(MatchStmt {
                matched: int(0),
                arms: vec![arm(1), arm(2)],
                else_block: vec![expr_stmt(3)],
            }),
        );
        let e = promote_stmt(stmt).unwrap();
        let ExprKind::Match(m) = e.kind.as_ref() else {
            panic!("not a match: {}", e);
        };
        assert_eq!(m.arms.len(), 2);
        assert_eq!(m.arms[1].body, int(2));
        assert_eq!(m.else_expr, int(3));
        assert_eq!((e.start.offset, e.end.offset), (0, 9));
    }

    #[test]
    fn empty_else_of_match() {
        let stmt = Stmt::new(
            pos(0),
            pos(9),
            StmtKind::Match(MatchStmt {
                matched: int(0),
                arms: vec![],
                else_block: vec![],
            }),
        );
        let err = promote_stmt(stmt).unwrap_err();
        assert_eq!(
            err.notes(),
            ["'else' block of 'match' expression is incorrect (at <dummy>:1:1)"]
        );
    }
}
