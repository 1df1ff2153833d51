//! Statements of function bodies and blocks.

use dachs_ast::{
    Destructuring, DestructuringKind, Expr, ExprKind, IfStmt, MatchStmt, MatchStmtArm, Stmt, StmtKind,
    SwitchStmt, SwitchStmtCase, Symbol,
};
use dachs_core::Error;

use super::Parser;
use crate::token::TokenKind;

impl Parser {
    pub(super) fn statement(&mut self) -> Result<Stmt, Error> {
        match self.peek_kind() {
            TokenKind::Let | TokenKind::Var => self.var_decl(),
            TokenKind::Ret => self.ret_stmt(),
            TokenKind::If => self.if_stmt(),
            TokenKind::Switch => self.switch_stmt(),
            TokenKind::Match => self.match_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Ident => match self.peek_kind_nth(1) {
                TokenKind::Define => self.define(),
                TokenKind::Assign | TokenKind::Comma => self.var_assign(),
                _ => self.expr_stmt(),
            },
            _ => self.expr_stmt(),
        }
    }

    /// `let a, {b} = e1, e2` or `var a = e`
    fn var_decl(&mut self) -> Result<Stmt, Error> {
        let keyword = self.next();
        let mutable = keyword.kind == TokenKind::Var;
        let decls = self.destructuring_list()?;
        self.expect(TokenKind::Assign, "'=' in variable declaration")?;
        self.skip_newlines();
        let rhs = self.expr_list()?;
        Ok(Stmt::new(
            keyword.start,
            self.last_end(),
            StmtKind::VarDecl {
                mutable,
                decls,
                rhs,
            },
        ))
    }

    /// `x := e`, a shorthand of `let x = e`
    fn define(&mut self) -> Result<Stmt, Error> {
        let (ident, tok) = self.expect_ident("variable name")?;
        self.next();
        self.skip_newlines();
        let rhs = self.expr()?;
        let decl = Destructuring::new(
            tok.start.clone(),
            tok.end,
            DestructuringKind::VarDecl(ident),
        );
        Ok(Stmt::new(
            tok.start,
            rhs.end.clone(),
            StmtKind::VarDecl {
                mutable: false,
                decls: vec![decl],
                rhs: vec![rhs],
            },
        ))
    }

    /// `a = e` or `a, b = e1, e2`
    fn var_assign(&mut self) -> Result<Stmt, Error> {
        let (first, tok) = self.expect_ident("variable name")?;
        let mut idents: Vec<Symbol> = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            self.skip_newlines();
            idents.push(self.expect_ident("variable name")?.0);
        }
        self.expect(TokenKind::Assign, "'=' in assignment")?;
        self.skip_newlines();
        let rhs = self.expr_list()?;
        Ok(Stmt::new(
            tok.start,
            self.last_end(),
            StmtKind::VarAssign { idents, rhs },
        ))
    }

    /// An expression, or `a[i] = e` when followed by `=`.
    fn expr_stmt(&mut self) -> Result<Stmt, Error> {
        let expr = self.expr()?;
        if self.eat(TokenKind::Assign).is_none() {
            return Ok(Stmt::expr(expr));
        }

        let Expr { start, end, kind } = expr;
        let (child, index) = match *kind {
            ExprKind::IndexAccess { child, index } => (child, index),
            kind => {
                let label = Expr::new(start.clone(), end.clone(), kind).to_string();
                return Err(Error::new(
                    start,
                    end,
                    format!("Cannot assign to '{}'", label),
                ));
            }
        };
        self.skip_newlines();
        let rhs = self.expr()?;
        Ok(Stmt::new(
            start,
            rhs.end.clone(),
            StmtKind::IndexAssign {
                assignee: child,
                index,
                rhs,
            },
        ))
    }

    /// `ret` or `ret e1, e2`
    fn ret_stmt(&mut self) -> Result<Stmt, Error> {
        let ret = self.next();
        let values = match self.peek_kind() {
            TokenKind::Newline
            | TokenKind::Semicolon
            | TokenKind::End
            | TokenKind::Else
            | TokenKind::Case
            | TokenKind::With
            | TokenKind::Eof => vec![],
            _ => self.expr_list()?,
        };
        Ok(Stmt::new(ret.start, self.last_end(), StmtKind::Ret(values)))
    }

    /// `if c then ... else ... end`
    fn if_stmt(&mut self) -> Result<Stmt, Error> {
        let start = self.next().start;
        let cond = self.expr()?;
        self.then_or_separator("condition of 'if'")?;
        let then_block = self.block(&[TokenKind::Else, TokenKind::End])?;
        let else_block = match self.eat(TokenKind::Else) {
            Some(_) => self.block(&[TokenKind::End])?,
            None => vec![],
        };
        let end = self.expect(TokenKind::End, "'end' closing 'if'")?.end;
        Ok(Stmt::new(
            start,
            end,
            StmtKind::If(IfStmt {
                cond,
                then_block,
                else_block,
            }),
        ))
    }

    /// `switch case c1 then ... case c2 then ... else ... end`
    fn switch_stmt(&mut self) -> Result<Stmt, Error> {
        let start = self.next().start;
        self.skip_separators();

        let mut cases = Vec::new();
        while self.eat(TokenKind::Case).is_some() {
            let cond = self.expr()?;
            self.then_or_separator("condition of 'case'")?;
            let stmts = self.block(&[TokenKind::Case, TokenKind::Else, TokenKind::End])?;
            cases.push(SwitchStmtCase { cond, stmts });
        }
        if cases.is_empty() {
            return Err(self.unexpected("'case' in 'switch'"));
        }

        let else_block = match self.eat(TokenKind::Else) {
            Some(_) => self.block(&[TokenKind::End])?,
            None => vec![],
        };
        let end = self.expect(TokenKind::End, "'end' closing 'switch'")?.end;
        Ok(Stmt::new(
            start,
            end,
            StmtKind::Switch(SwitchStmt { cases, else_block }),
        ))
    }

    /// `match e with p1 then ... with p2 then ... else ... end`
    fn match_stmt(&mut self) -> Result<Stmt, Error> {
        let start = self.next().start;
        let matched = self.expr()?;
        self.skip_separators();

        let mut arms = Vec::new();
        while self.eat(TokenKind::With).is_some() {
            let pattern = self.pattern()?;
            self.then_or_separator("pattern of 'with'")?;
            let stmts = self.block(&[TokenKind::With, TokenKind::Else, TokenKind::End])?;
            arms.push(MatchStmtArm { pattern, stmts });
        }
        if arms.is_empty() {
            return Err(self.unexpected("'with' in 'match'"));
        }

        let else_block = match self.eat(TokenKind::Else) {
            Some(_) => self.block(&[TokenKind::End])?,
            None => vec![],
        };
        let end = self.expect(TokenKind::End, "'end' closing 'match'")?.end;
        Ok(Stmt::new(
            start,
            end,
            StmtKind::Match(MatchStmt {
                matched,
                arms,
                else_block,
            }),
        ))
    }

    /// `for x in xs ... end` or `for cond ... end`
    fn for_stmt(&mut self) -> Result<Stmt, Error> {
        let start = self.next().start;
        let kind = if self.destructuring_then_in() {
            let iterator = self.destructuring()?;
            self.expect(TokenKind::In, "'in' of 'for' statement")?;
            let range = self.expr()?;
            let body = self.block(&[TokenKind::End])?;
            StmtKind::ForEach {
                iterator,
                range,
                body,
            }
        } else {
            let cond = self.expr()?;
            let body = self.block(&[TokenKind::End])?;
            StmtKind::While { cond, body }
        };
        let end = self.expect(TokenKind::End, "'end' closing 'for'")?.end;
        Ok(Stmt::new(start, end, kind))
    }
}
