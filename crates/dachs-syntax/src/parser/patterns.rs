//! Patterns of `match` arms and destructuring of `let`/`var`/`for`.

use dachs_ast::{
    Destructuring, DestructuringKind, FieldPattern, Pattern, PatternKind,
    RecordDestructuringField, Symbol,
};
use dachs_core::{Error, Position};

use super::Parser;
use super::literals::{parse_float_literal, parse_int_literal, parse_uint_literal, unquote_string};
use crate::token::{Token, TokenKind};

/// `Name`, `Name::Case` or nothing in front of `{` of a record pattern.
struct RecordHead {
    start: Option<Position>,
    ident: Option<Symbol>,
    enum_case: Option<Symbol>,
}

impl Parser {
    // =========================================================================
    // Patterns
    // =========================================================================

    pub(super) fn pattern(&mut self) -> Result<Pattern, Error> {
        match self.peek_kind() {
            TokenKind::Int
            | TokenKind::UInt
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Bool => {
                let tok = self.next();
                self.const_pattern(tok, None)
            }
            TokenKind::Minus => {
                let minus = self.next();
                if !matches!(self.peek_kind(), TokenKind::Int | TokenKind::Float) {
                    return Err(self.unexpected("number after '-' in pattern"));
                }
                let tok = self.next();
                self.const_pattern(tok, Some(minus.start))
            }
            TokenKind::Ident => {
                if matches!(
                    self.peek_kind_nth(1),
                    TokenKind::LBrace | TokenKind::ColonColon
                ) {
                    return self.record_pattern();
                }
                let (ident, tok) = self.expect_ident("pattern")?;
                Ok(Pattern::new(tok.start, tok.end, PatternKind::VarDecl(ident)))
            }
            TokenKind::LBrace => self.record_pattern(),
            TokenKind::LBracket => self.array_pattern(),
            _ => Err(self.unexpected("pattern")),
        }
    }

    /// `negative` is the position of a preceding `-`.
    fn const_pattern(&mut self, tok: Token, negative: Option<Position>) -> Result<Pattern, Error> {
        let text = tok.value().into_owned();
        let kind = match tok.kind {
            TokenKind::Int => parse_int_literal(&text, negative.is_some()).map(PatternKind::IntConst),
            TokenKind::UInt => parse_uint_literal(&text).map(PatternKind::UIntConst),
            TokenKind::Float => {
                parse_float_literal(&text, negative.is_some()).map(PatternKind::FloatConst)
            }
            TokenKind::String => unquote_string(&text).map(PatternKind::StringConst),
            _ => Ok(PatternKind::BoolConst(text == "true")),
        };
        let start = negative.unwrap_or_else(|| tok.start.clone());
        match kind {
            Ok(kind) => Ok(Pattern::new(start, tok.end, kind)),
            Err(err) => Err(Error::new(
                start,
                tok.end,
                format!("Invalid literal {} in pattern: {}", text, err),
            )),
        }
    }

    fn record_head(&mut self) -> Result<RecordHead, Error> {
        if self.peek_kind() != TokenKind::Ident {
            return Ok(RecordHead {
                start: None,
                ident: None,
                enum_case: None,
            });
        }
        let (ident, tok) = self.expect_ident("record name")?;
        let enum_case = match self.eat(TokenKind::ColonColon) {
            Some(_) => Some(self.expect_ident("enum case name after '::'")?.0),
            None => None,
        };
        Ok(RecordHead {
            start: Some(tok.start),
            ident: Some(ident),
            enum_case,
        })
    }

    /// `{a, b: p, ...rest}`, `Name{...}`, `Name::Case{...}` or `Name::Case`
    fn record_pattern(&mut self) -> Result<Pattern, Error> {
        let head = self.record_head()?;
        let Some(open) = self.eat(TokenKind::LBrace) else {
            // Enum case without payload
            let start = head.start.unwrap_or_else(|| self.last_end());
            return Ok(Pattern::new(
                start,
                self.last_end(),
                PatternKind::Record {
                    ident: head.ident,
                    enum_case: head.enum_case,
                    fields: vec![],
                    rest: None,
                },
            ));
        };
        let start = head.start.unwrap_or_else(|| open.start.clone());

        let mut fields = Vec::new();
        let mut rest = None;
        self.skip_newlines();
        while self.peek_kind() != TokenKind::RBrace {
            if self.peek_kind() == TokenKind::Ellipsis {
                rest = Some(Box::new(self.rest_pattern()));
                self.skip_newlines();
                break;
            }

            let (name, _) = self.expect_ident("field name of record pattern")?;
            let pattern = if self.eat(TokenKind::Colon).is_some() {
                self.skip_newlines();
                let p = self.pattern()?;
                if let PatternKind::VarDecl(var) = &p.kind
                    && var.as_str() != "_"
                {
                    return Err(Error::new(
                        p.start.clone(),
                        p.end.clone(),
                        format!(
                            "Renaming field '{}' to '{}' is not permitted in record pattern",
                            name, var
                        ),
                    ));
                }
                Some(p)
            } else {
                None
            };
            fields.push(FieldPattern { name, pattern });

            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(TokenKind::RBrace, "'}' closing record pattern")?.end;

        Ok(Pattern::new(
            start,
            end,
            PatternKind::Record {
                ident: head.ident,
                enum_case: head.enum_case,
                fields,
                rest,
            },
        ))
    }

    /// `[a, 42, ...rest]`
    fn array_pattern(&mut self) -> Result<Pattern, Error> {
        let start = self.next().start;
        let mut elems = Vec::new();
        let mut rest = None;
        self.skip_newlines();
        while self.peek_kind() != TokenKind::RBracket {
            if self.peek_kind() == TokenKind::Ellipsis {
                rest = Some(Box::new(self.rest_pattern()));
                self.skip_newlines();
                break;
            }
            elems.push(self.pattern()?);
            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(TokenKind::RBracket, "']' closing array pattern")?.end;
        Ok(Pattern::new(start, end, PatternKind::Array { elems, rest }))
    }

    fn rest_pattern(&mut self) -> Pattern {
        let (start, end, name) = self.rest();
        Pattern::new(start, end, PatternKind::Rest(name))
    }

    /// `...` or `...name`
    fn rest(&mut self) -> (Position, Position, Option<Symbol>) {
        let dots = self.next();
        match self.eat(TokenKind::Ident) {
            Some(tok) => (dots.start, tok.end.clone(), Some(Symbol::new(tok.value()))),
            None => (dots.start, dots.end, None),
        }
    }

    // =========================================================================
    // Destructuring
    // =========================================================================

    pub(super) fn destructuring(&mut self) -> Result<Destructuring, Error> {
        match self.peek_kind() {
            TokenKind::Ident
                if !matches!(
                    self.peek_kind_nth(1),
                    TokenKind::LBrace | TokenKind::ColonColon
                ) =>
            {
                let (ident, tok) = self.expect_ident("variable name")?;
                Ok(Destructuring::new(
                    tok.start,
                    tok.end,
                    DestructuringKind::VarDecl(ident),
                ))
            }
            TokenKind::Ident | TokenKind::LBrace => self.record_destructuring(),
            _ => Err(self.unexpected("variable name or record destructuring")),
        }
    }

    /// Comma separated destructurings of `let` and `var`.
    pub(super) fn destructuring_list(&mut self) -> Result<Vec<Destructuring>, Error> {
        let mut decls = vec![self.destructuring()?];
        while self.eat(TokenKind::Comma).is_some() {
            self.skip_newlines();
            decls.push(self.destructuring()?);
        }
        Ok(decls)
    }

    fn record_destructuring(&mut self) -> Result<Destructuring, Error> {
        let head = self.record_head()?;
        let open = self.expect(TokenKind::LBrace, "'{' of record destructuring")?;
        let start = head.start.unwrap_or_else(|| open.start.clone());

        let mut fields = Vec::new();
        let mut rest = None;
        self.skip_newlines();
        while self.peek_kind() != TokenKind::RBrace {
            if self.peek_kind() == TokenKind::Ellipsis {
                let (s, e, name) = self.rest();
                rest = Some(Box::new(Destructuring::new(s, e, DestructuringKind::Rest(name))));
                self.skip_newlines();
                break;
            }

            let (name, _) = self.expect_ident("field name of record destructuring")?;
            let child = if self.eat(TokenKind::Colon).is_some() {
                self.skip_newlines();
                let d = self.destructuring()?;
                if let DestructuringKind::VarDecl(var) = &d.kind
                    && var.as_str() != "_"
                {
                    return Err(Error::new(
                        d.start.clone(),
                        d.end.clone(),
                        format!(
                            "Renaming field '{}' to '{}' is not permitted in record destructuring",
                            name, var
                        ),
                    ));
                }
                Some(d)
            } else {
                None
            };
            fields.push(RecordDestructuringField { name, child });

            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        let end = self
            .expect(TokenKind::RBrace, "'}' closing record destructuring")?
            .end;

        Ok(Destructuring::new(
            start,
            end,
            DestructuringKind::Record {
                ident: head.ident,
                enum_case: head.enum_case,
                fields,
                rest,
            },
        ))
    }

    /// Whether the tokens ahead are a destructuring followed by `in`, which
    /// makes a `for` statement iterate over a range.
    pub(super) fn destructuring_then_in(&mut self) -> bool {
        let mut n = 0;
        if self.peek_kind_nth(n) == TokenKind::Ident {
            n += 1;
            if self.peek_kind_nth(n) == TokenKind::ColonColon {
                n += 2;
            }
        }
        if self.peek_kind_nth(n) == TokenKind::LBrace {
            n = self.skip_braces_ahead(n);
        }
        n > 0 && self.peek_kind_nth(n) == TokenKind::In
    }
}
