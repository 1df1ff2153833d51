//! Expressions, from binary operators down to primaries.

use dachs_ast::{
    BinaryOp, DictKeyVal, Expr, ExprKind, FuncParam, NamedArg, RecordLitField, Symbol, UnaryOp,
};
use dachs_core::{Error, Position, ordinal};

use super::Parser;
use super::literals::{parse_float_literal, parse_int_literal, parse_uint_literal, unquote_string};
use crate::block_expr::{block_expr, promote_stmt};
use crate::token::{Token, TokenKind};

/// Binary operator and its binding power. Larger binds tighter.
fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
    let op = match kind {
        TokenKind::Or => (BinaryOp::Or, 1),
        TokenKind::And => (BinaryOp::And, 2),
        TokenKind::Equal => (BinaryOp::Eq, 3),
        TokenKind::NotEqual => (BinaryOp::NotEq, 3),
        TokenKind::Less => (BinaryOp::Less, 4),
        TokenKind::LessEqual => (BinaryOp::LessEq, 4),
        TokenKind::Greater => (BinaryOp::Greater, 4),
        TokenKind::GreaterEqual => (BinaryOp::GreaterEq, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Sub, 5),
        TokenKind::Star => (BinaryOp::Mul, 6),
        TokenKind::Div => (BinaryOp::Div, 6),
        TokenKind::Percent => (BinaryOp::Mod, 6),
        _ => return None,
    };
    Some(op)
}

impl Parser {
    pub(super) fn expr(&mut self) -> Result<Expr, Error> {
        self.binary_expr(1)
    }

    /// Comma separated expressions. Newlines are allowed after commas.
    pub(super) fn expr_list(&mut self) -> Result<Vec<Expr>, Error> {
        let mut exprs = vec![self.expr()?];
        while self.eat(TokenKind::Comma).is_some() {
            self.skip_newlines();
            exprs.push(self.expr()?);
        }
        Ok(exprs)
    }

    fn binary_expr(&mut self, min_power: u8) -> Result<Expr, Error> {
        let mut lhs = self.coerce_expr()?;
        loop {
            let Some((op, power)) = binary_op(self.peek_kind()) else {
                break;
            };
            if power < min_power {
                break;
            }
            self.next();
            self.skip_newlines();
            let rhs = self.binary_expr(power + 1)?;
            lhs = Expr::new(
                lhs.start.clone(),
                rhs.end.clone(),
                ExprKind::Binary { op, lhs, rhs },
            );
        }
        Ok(lhs)
    }

    /// `e as T`
    fn coerce_expr(&mut self) -> Result<Expr, Error> {
        let mut expr = self.unary_expr()?;
        while self.eat(TokenKind::As).is_some() {
            let ty = self.type_expr()?;
            expr = Expr::new(expr.start.clone(), ty.end.clone(), ExprKind::Coerce { expr, ty });
        }
        Ok(expr)
    }

    fn unary_expr(&mut self) -> Result<Expr, Error> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.postfix_expr(),
        };
        if matches!(op, UnaryOp::Neg) && self.negative_literal_ahead() {
            let minus = self.next().start;
            let tok = self.next();
            return self.literal(tok, Some(minus));
        }
        let start = self.next().start;
        let child = self.unary_expr()?;
        Ok(Expr::new(start, child.end.clone(), ExprKind::Unary { op, child }))
    }

    /// `-` directly before a numeric literal that no postfix operator binds
    /// to. The sign is part of the literal so that `i64::MIN` is writable.
    fn negative_literal_ahead(&mut self) -> bool {
        matches!(self.peek_kind_nth(1), TokenKind::Int | TokenKind::Float)
            && !matches!(
                self.peek_kind_nth(2),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot
            )
    }

    /// Calls, index accesses and field accesses.
    fn postfix_expr(&mut self) -> Result<Expr, Error> {
        let mut expr = self.primary_expr()?;
        loop {
            expr = match self.peek_kind() {
                TokenKind::LParen => self.call(expr)?,
                TokenKind::LBracket => {
                    self.next();
                    self.skip_newlines();
                    let index = self.expr()?;
                    self.skip_newlines();
                    let end = self.expect(TokenKind::RBracket, "']' closing index access")?.end;
                    Expr::new(
                        expr.start.clone(),
                        end,
                        ExprKind::IndexAccess { child: expr, index },
                    )
                }
                TokenKind::Dot => {
                    self.next();
                    let (name, tok) = self.expect_ident("field name after '.'")?;
                    Expr::new(
                        expr.start.clone(),
                        tok.end,
                        ExprKind::FieldAccess {
                            child: expr,
                            name: name.0,
                        },
                    )
                }
                _ => return Ok(expr),
            };
        }
    }

    /// `f(a, b)` or `f(x: a, y: b)`, optionally followed by `do ... end`.
    fn call(&mut self, callee: Expr) -> Result<Expr, Error> {
        self.next();
        self.skip_newlines();

        let named = self.peek_kind() == TokenKind::Ident && self.peek_kind_nth(1) == TokenKind::Colon;
        let mut args = Vec::new();
        let mut named_args = Vec::new();
        while self.peek_kind() != TokenKind::RParen {
            if named {
                let (name, _) = self.expect_ident("argument name")?;
                self.expect(TokenKind::Colon, "':' after argument name")?;
                self.skip_newlines();
                let expr = self.expr()?;
                named_args.push(NamedArg { name: name.0, expr });
            } else {
                args.push(self.expr()?);
            }
            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        let mut end = self.expect(TokenKind::RParen, "')' closing arguments")?.end;

        let do_block = match self.peek_kind() {
            TokenKind::Do => {
                let block = self.do_block()?;
                end = block.end.clone();
                Some(block)
            }
            _ => None,
        };

        let start = callee.start.clone();
        let kind = if named {
            ExprKind::FuncCallNamed {
                callee,
                args: named_args,
                do_block,
            }
        } else {
            ExprKind::FuncCall {
                callee,
                args,
                do_block,
            }
        };
        Ok(Expr::new(start, end, kind))
    }

    /// `do x, y <newline> ... end` passed as the last argument of a call.
    fn do_block(&mut self) -> Result<Expr, Error> {
        let do_tok = self.next();
        let params = if self.do_params_ahead() {
            self.lambda_params()?
        } else {
            vec![]
        };
        let body = self.block_body(&do_tok.start)?;
        Ok(Expr::new(
            do_tok.start,
            self.last_end(),
            ExprKind::Lambda {
                is_do_block: true,
                params,
                body,
            },
        ))
    }

    /// Parameters of a `do` block are identifiers on the line of `do`.
    fn do_params_ahead(&mut self) -> bool {
        let mut n = 0;
        loop {
            if self.peek_kind_nth(n) != TokenKind::Ident {
                return false;
            }
            n += 1;
            match self.peek_kind_nth(n) {
                TokenKind::Comma => n += 1,
                kind => return Self::is_separator(kind),
            }
        }
    }

    fn lambda_params(&mut self) -> Result<Vec<FuncParam>, Error> {
        let mut params = Vec::new();
        loop {
            let (ident, _) = self.expect_ident("parameter name")?;
            params.push(FuncParam { ident, ty: None });
            if self.eat(TokenKind::Comma).is_none() {
                return Ok(params);
            }
            self.skip_newlines();
        }
    }

    /// Statements up to `end`, converted into one expression.
    fn block_body(&mut self, hint: &Position) -> Result<Expr, Error> {
        let stmts = self.block(&[TokenKind::End])?;
        self.expect(TokenKind::End, "'end' closing block")?;
        block_expr(stmts, hint)
    }

    fn primary_expr(&mut self) -> Result<Expr, Error> {
        match self.peek_kind() {
            TokenKind::Int
            | TokenKind::UInt
            | TokenKind::Float
            | TokenKind::Bool
            | TokenKind::String => {
                let tok = self.next();
                self.literal(tok, None)
            }
            TokenKind::Ident => {
                if self.peek_kind_nth(1) == TokenKind::LBrace {
                    return self.record_or_tuple_lit();
                }
                let (ident, tok) = self.expect_ident("variable")?;
                Ok(Expr::new(tok.start, tok.end, ExprKind::VarRef(ident)))
            }
            TokenKind::LBrace => self.record_or_tuple_lit(),
            TokenKind::LBracket => self.array_or_dict_lit(),
            TokenKind::LParen => {
                self.next();
                self.skip_newlines();
                let expr = self.expr()?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "')' closing parenthesized expression")?;
                Ok(expr)
            }
            TokenKind::RightArrow => self.lambda(),
            TokenKind::If | TokenKind::Switch | TokenKind::Match => {
                let stmt = self.statement()?;
                promote_stmt(stmt)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// A literal token. `negative` is the position of a `-` folded into it.
    fn literal(&mut self, tok: Token, negative: Option<Position>) -> Result<Expr, Error> {
        let text = tok.value().into_owned();
        let neg = negative.is_some();
        let (what, kind) = match tok.kind {
            TokenKind::Int => ("integer", parse_int_literal(&text, neg).map(ExprKind::Int)),
            TokenKind::UInt => ("unsigned integer", parse_uint_literal(&text).map(ExprKind::UInt)),
            TokenKind::Float => ("float", parse_float_literal(&text, neg).map(ExprKind::Float)),
            TokenKind::String => ("string", unquote_string(&text).map(ExprKind::String)),
            _ => ("boolean", Ok(ExprKind::Bool(text == "true"))),
        };
        let sign = if neg { "-" } else { "" };
        let start = negative.unwrap_or_else(|| tok.start.clone());
        match kind {
            Ok(kind) => Ok(Expr::new(start, tok.end, kind)),
            Err(err) => Err(Error::new(
                start,
                tok.end,
                format!("Invalid {} literal {}{}: {}", what, sign, text, err),
            )),
        }
    }

    /// `{a: e, b: e}`, `{_: e, _: e}`, optionally prefixed with a name.
    fn record_or_tuple_lit(&mut self) -> Result<Expr, Error> {
        let ident = match self.eat(TokenKind::Ident) {
            Some(tok) => Some((Symbol::new(tok.value()), tok.start)),
            None => None,
        };
        let open = self.expect(TokenKind::LBrace, "'{'")?;

        let mut fields = Vec::new();
        let mut tuple = None;
        self.skip_newlines();
        while self.peek_kind() != TokenKind::RBrace {
            let (name, name_tok) = self.expect_ident("field name")?;
            let unnamed = name.as_str() == "_";
            let nth = fields.len() + 1;
            match tuple {
                None => tuple = Some(unnamed),
                Some(true) if !unnamed => {
                    return Err(Error::new(
                        name_tok.start,
                        name_tok.end,
                        format!("{} field of tuple literal must be unnamed", ordinal(nth)),
                    ));
                }
                Some(false) if unnamed => {
                    return Err(Error::new(
                        name_tok.start,
                        name_tok.end,
                        format!("{} field of record literal must be named", ordinal(nth)),
                    ));
                }
                Some(_) => {}
            }

            self.expect(TokenKind::Colon, "':' after field name")?;
            self.skip_newlines();
            let expr = self.expr()?;
            fields.push(RecordLitField { name: name.0, expr });

            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(TokenKind::RBrace, "'}' closing literal")?.end;

        let (ident, start) = match ident {
            Some((ident, start)) => (Some(ident), start),
            None => (None, open.start),
        };
        let kind = if tuple == Some(true) {
            ExprKind::Tuple {
                ident,
                elems: fields.into_iter().map(|f| f.expr).collect(),
            }
        } else {
            ExprKind::Record { ident, fields }
        };
        Ok(Expr::new(start, end, kind))
    }

    /// `[a, b]`, `[]`, `[k => v]` or `[=>]`
    fn array_or_dict_lit(&mut self) -> Result<Expr, Error> {
        let start = self.next().start;
        self.skip_newlines();

        if self.eat(TokenKind::FatRightArrow).is_some() {
            self.skip_newlines();
            let end = self.expect(TokenKind::RBracket, "']' closing empty dictionary")?.end;
            return Ok(Expr::new(start, end, ExprKind::Dict(vec![])));
        }
        if let Some(close) = self.eat(TokenKind::RBracket) {
            return Ok(Expr::new(start, close.end, ExprKind::Array(vec![])));
        }

        let first = self.expr()?;
        self.skip_newlines();
        let kind = if self.eat(TokenKind::FatRightArrow).is_some() {
            self.skip_newlines();
            let value = self.expr()?;
            let mut elems = vec![DictKeyVal { key: first, value }];
            while self.eat(TokenKind::Comma).is_some() {
                self.skip_newlines();
                if self.peek_kind() == TokenKind::RBracket {
                    break;
                }
                let key = self.expr()?;
                self.skip_newlines();
                self.expect(TokenKind::FatRightArrow, "'=>' in dictionary literal")?;
                self.skip_newlines();
                let value = self.expr()?;
                elems.push(DictKeyVal { key, value });
                self.skip_newlines();
            }
            ExprKind::Dict(elems)
        } else {
            let mut elems = vec![first];
            while self.eat(TokenKind::Comma).is_some() {
                self.skip_newlines();
                if self.peek_kind() == TokenKind::RBracket {
                    break;
                }
                elems.push(self.expr()?);
                self.skip_newlines();
            }
            ExprKind::Array(elems)
        };
        self.skip_newlines();
        let end = self.expect(TokenKind::RBracket, "']' closing literal")?.end;
        Ok(Expr::new(start, end, kind))
    }

    /// `-> a, b in e`, `-> e`, `-> a do ... end`, `-> do ... end`
    fn lambda(&mut self) -> Result<Expr, Error> {
        let arrow = self.next();

        let has_params = self.peek_kind() == TokenKind::Ident
            && matches!(
                self.peek_kind_nth(1),
                TokenKind::Comma | TokenKind::In | TokenKind::Do
            );
        let params = if has_params {
            self.lambda_params()?
        } else {
            vec![]
        };

        let body = if let Some(do_tok) = self.eat(TokenKind::Do) {
            self.block_body(&do_tok.start)?
        } else if has_params {
            self.expect(TokenKind::In, "'in' or 'do' after lambda parameters")?;
            self.skip_newlines();
            self.expr()?
        } else {
            self.expr()?
        };

        Ok(Expr::new(
            arrow.start,
            self.last_end(),
            ExprKind::Lambda {
                is_do_block: false,
                params,
                body,
            },
        ))
    }
}
