//! Type expressions.

use dachs_ast::{RecordTypeField, Symbol, Type, TypeKind};
use dachs_core::Error;

use super::Parser;
use crate::token::TokenKind;

impl Parser {
    /// `T`, `'a`, `T{A, B}`, `Enum::Case`, `{a: T}`, `{_: T}`, `(A) -> B`,
    /// `typeof(e)`
    pub(super) fn type_expr(&mut self) -> Result<Type, Error> {
        match self.peek_kind() {
            TokenKind::Ident => self.named_type(),
            TokenKind::LBrace => self.record_or_tuple_type(),
            TokenKind::LParen => self.function_type(),
            TokenKind::Typeof => {
                let start = self.next().start;
                self.expect(TokenKind::LParen, "'(' after 'typeof'")?;
                self.skip_newlines();
                let expr = self.expr()?;
                self.skip_newlines();
                let end = self.expect(TokenKind::RParen, "')' closing 'typeof'")?.end;
                Ok(Type::new(start, end, TypeKind::Typeof(Box::new(expr))))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn named_type(&mut self) -> Result<Type, Error> {
        let (ident, tok) = self.expect_ident("type name")?;
        if ident.as_str().starts_with('\'') {
            return Ok(Type::new(tok.start, tok.end, TypeKind::Var(ident)));
        }

        match self.peek_kind() {
            TokenKind::ColonColon => {
                self.next();
                let (case, case_tok) = self.expect_ident("enum case name after '::'")?;
                Ok(Type::new(tok.start, case_tok.end, TypeKind::Enum { ident, case }))
            }
            TokenKind::LBrace => {
                self.next();
                let args = self.type_list(TokenKind::RBrace)?;
                let end = self.expect(TokenKind::RBrace, "'}' closing type arguments")?.end;
                Ok(Type::new(tok.start, end, TypeKind::Instantiate { ident, args }))
            }
            _ => Ok(Type::new(tok.start, tok.end, TypeKind::Ref(ident))),
        }
    }

    /// Comma separated types up to `close`, which is left unconsumed.
    fn type_list(&mut self, close: TokenKind) -> Result<Vec<Type>, Error> {
        let mut types = Vec::new();
        self.skip_newlines();
        while self.peek_kind() != close {
            types.push(self.type_expr()?);
            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        Ok(types)
    }

    /// `{a: int, b: str}` or `{_: int, _: str}`. The first field decides which.
    pub(super) fn record_or_tuple_type(&mut self) -> Result<Type, Error> {
        let start = self.expect(TokenKind::LBrace, "'{'")?.start;
        let mut names: Vec<Symbol> = Vec::new();
        let mut types = Vec::new();
        let mut tuple = None;

        self.skip_newlines();
        while self.peek_kind() != TokenKind::RBrace {
            let (name, name_tok) = self.expect_ident("field name of record or tuple type")?;
            let unnamed = name.as_str() == "_";
            match tuple {
                None => tuple = Some(unnamed),
                Some(true) if !unnamed => {
                    return Err(Error::new(
                        name_tok.start,
                        name_tok.end,
                        "Mixing unnamed and named fields is not permitted in tuple type",
                    ));
                }
                Some(false) if unnamed => {
                    return Err(Error::new(
                        name_tok.start,
                        name_tok.end,
                        "Mixing unnamed and named fields are not permitted in record type",
                    ));
                }
                Some(_) => {}
            }

            self.expect(TokenKind::Colon, "':' after field name")?;
            self.skip_newlines();
            names.push(name);
            types.push(self.type_expr()?);
            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(TokenKind::RBrace, "'}' closing record or tuple type")?.end;

        let kind = if tuple == Some(true) {
            TypeKind::Tuple(types)
        } else {
            TypeKind::Record(
                names
                    .into_iter()
                    .zip(types)
                    .map(|(name, ty)| RecordTypeField { name: name.0, ty })
                    .collect(),
            )
        };
        Ok(Type::new(start, end, kind))
    }

    fn function_type(&mut self) -> Result<Type, Error> {
        let start = self.next().start;
        let params = self.type_list(TokenKind::RParen)?;
        self.expect(TokenKind::RParen, "')' closing parameter types")?;
        self.expect(TokenKind::RightArrow, "'->' of function type")?;
        let ret = self.type_expr()?;
        Ok(Type::new(
            start,
            ret.end.clone(),
            TypeKind::Function {
                params,
                ret: Box::new(ret),
            },
        ))
    }
}
