//! Toplevel declarations: `import`, `type` and `func`.

use dachs_ast::{EnumTypeCase, EnumTypedef, FuncParam, Function, Import, Toplevel, Typedef};
use dachs_core::{Error, log};

use super::Parser;
use crate::token::TokenKind;

impl Parser {
    pub(super) fn toplevel(&mut self) -> Result<Toplevel, Error> {
        match self.peek_kind() {
            TokenKind::Import => self.import().map(Toplevel::Import),
            TokenKind::Type => self.typedef(),
            TokenKind::Func => self.function().map(Toplevel::Function),
            _ => Err(self.unexpected("'func', 'type' or 'import' at toplevel")),
        }
    }

    /// `import a.b`, `import .a.b.*`, `import a.{b, c}`
    fn import(&mut self) -> Result<Import, Error> {
        let start = self.next().start;
        let relative = self.eat(TokenKind::Dot).is_some();

        let mut parents = vec![self.expect_ident("module name of import path")?.0 .0];
        self.expect(TokenKind::Dot, "'.' in import path")?;
        let imported = loop {
            match self.peek_kind() {
                TokenKind::Star => {
                    self.next();
                    break vec!["*".to_string()];
                }
                TokenKind::LBrace => {
                    self.next();
                    self.skip_newlines();
                    let mut names = vec![self.expect_ident("imported name")?.0 .0];
                    self.skip_newlines();
                    while self.eat(TokenKind::Comma).is_some() {
                        self.skip_newlines();
                        names.push(self.expect_ident("imported name")?.0 .0);
                        self.skip_newlines();
                    }
                    self.expect(TokenKind::RBrace, "'}' closing imported names")?;
                    break names;
                }
                TokenKind::Ident => {
                    let (name, _) = self.expect_ident("imported name")?;
                    if self.eat(TokenKind::Dot).is_some() {
                        parents.push(name.0);
                    } else {
                        break vec![name.0];
                    }
                }
                _ => return Err(self.unexpected("name, '*' or '{' in import path")),
            }
        };

        let import = Import {
            start,
            end: self.last_end(),
            relative,
            parents,
            imported,
        };
        log!(self.logger, "Parsed import '{}'", import.path());
        Ok(import)
    }

    /// `type Name T`, or an enum type `type Name case A case B{f: T}`
    fn typedef(&mut self) -> Result<Toplevel, Error> {
        let start = self.next().start;
        let (ident, _) = self.expect_ident("name of type")?;

        let mut cases = Vec::new();
        loop {
            // Cases may be put on separate lines
            let n = self.skip_separators_ahead(0);
            if self.peek_kind_nth(n) != TokenKind::Case {
                break;
            }
            self.skip_separators();
            self.next();
            let (name, _) = self.expect_ident("name of enum case")?;
            let child = match self.peek_kind() {
                TokenKind::LBrace => Some(self.record_or_tuple_type()?),
                _ => None,
            };
            cases.push(EnumTypeCase {
                name: name.0,
                child,
            });
        }

        if cases.is_empty() {
            let ty = self.type_expr()?;
            return Ok(Toplevel::Typedef(Typedef { start, ident, ty }));
        }
        Ok(Toplevel::EnumTypedef(EnumTypedef {
            start,
            end: self.last_end(),
            ident,
            cases,
        }))
    }

    /// `func name(a, b: T): R ... end`. Parentheses may be omitted when
    /// there is no parameter.
    fn function(&mut self) -> Result<Function, Error> {
        let start = self.next().start;
        let (ident, _) = self.expect_ident("function name")?;

        let mut params = Vec::new();
        if self.eat(TokenKind::LParen).is_some() {
            self.skip_newlines();
            while self.peek_kind() != TokenKind::RParen {
                let (ident, _) = self.expect_ident("parameter name")?;
                let ty = match self.eat(TokenKind::Colon) {
                    Some(_) => Some(self.type_expr()?),
                    None => None,
                };
                params.push(FuncParam { ident, ty });
                self.skip_newlines();
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
                self.skip_newlines();
            }
            self.expect(TokenKind::RParen, "')' closing parameters")?;
        }

        let ret_ty = match self.eat(TokenKind::Colon) {
            Some(_) => Some(self.type_expr()?),
            None => None,
        };

        let body = self.block(&[TokenKind::End])?;
        let end = self.expect(TokenKind::End, "'end' closing function")?.end;
        log!(self.logger, "Parsed function '{}'", ident);

        Ok(Function {
            start,
            end,
            ident,
            params,
            ret_ty,
            body,
        })
    }
}
