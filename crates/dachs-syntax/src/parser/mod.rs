//! Recursive descent parser building [`Program`]s from token streams.
//!
//! ## Layout
//!
//! - `context`: the [`Parser`] cursor over the lexer's channel
//! - `declarations`: `import`, `type` and `func`
//! - `statements`: statements in blocks
//! - `expressions`: operators, calls, literals and lambdas
//! - `patterns`: `match` patterns and destructuring
//! - `types`: type expressions
//! - `literals`: decoding literal tokens
//!
//! Newlines and `;` separate statements. Newlines are ignored inside
//! brackets and after binary operators and commas.

mod context;
mod declarations;
mod expressions;
mod literals;
mod patterns;
mod statements;
mod types;

use std::sync::Arc;

use crossbeam_channel::Receiver;
use dachs_ast::Program;
use dachs_core::{Error, Logger, Source, log};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub use context::Parser;
pub use literals::LiteralError;

// =============================================================================
// Entry Points
// =============================================================================

/// Lex and parse `src`. The lexer runs on its own thread.
///
/// A lexical error is reported in preference to syntax errors caused by it.
pub fn parse(src: Arc<Source>, logger: Logger) -> Result<Program, Error> {
    let (err_tx, err_rx) = crossbeam_channel::unbounded();
    let (lexer, tokens) = Lexer::new(src.clone(), logger);
    let handle = lexer
        .on_error(move |err| {
            let _ = err_tx.send(err);
        })
        .spawn();

    // The receiver is dropped on return so a lexer still running quits
    let parsed = parse_tokens(src, tokens, logger);
    let _ = handle.join();

    if let Ok(err) = err_rx.try_recv() {
        return Err(err);
    }
    parsed
}

/// Parse tokens of `src` received from `tokens`.
pub fn parse_tokens(
    src: Arc<Source>,
    tokens: Receiver<Token>,
    logger: Logger,
) -> Result<Program, Error> {
    Parser::new(src, tokens, logger).parse_program()
}

impl Parser {
    /// Parse toplevels until the end of the stream. A program needs at least
    /// one toplevel.
    ///
    /// After a syntax error the parser skips to the next `func`, `type` or
    /// `import` and continues, so that several errors are reported at once.
    pub fn parse_program(mut self) -> Result<Program, Error> {
        log!(self.logger, "Start parsing {}", self.src.name);
        let mut toplevels = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_separators();
            if self.at_terminal() {
                let stray = toplevels.is_empty() || self.peek_kind() == TokenKind::Illegal;
                if stray && errors.is_empty() {
                    errors.push(self.unexpected("toplevel"));
                }
                break;
            }

            match self.toplevel_item() {
                Ok(toplevel) => toplevels.push(toplevel),
                Err(err) => {
                    log!(self.logger, "Syntax error: {}", err.message());
                    errors.push(err);
                    self.recover();
                }
            }
        }

        let mut errors = errors.into_iter();
        let Some(first) = errors.next() else {
            log!(self.logger, "Parsed {} successfully", self.src.name);
            return Ok(Program::new(self.src.clone(), toplevels));
        };
        if errors.len() == 0 {
            return Err(first);
        }

        let count = errors.len() + 1;
        let mut err = Error::at(
            first.start.clone(),
            format!("{} error(s) while parsing", count),
        );
        for e in std::iter::once(first).chain(errors) {
            err = err.note_at(&e.start, e.message());
        }
        Err(err)
    }

    /// A toplevel followed by a separator or the end of input.
    fn toplevel_item(&mut self) -> Result<dachs_ast::Toplevel, Error> {
        let toplevel = self.toplevel()?;
        let kind = self.peek_kind();
        if !Self::is_separator(kind) && kind != TokenKind::Eof {
            return Err(self.unexpected("end of line after toplevel"));
        }
        Ok(toplevel)
    }

    fn recover(&mut self) {
        if self.at_terminal() {
            return;
        }
        self.next();
        while !self.at_terminal()
            && !matches!(
                self.peek_kind(),
                TokenKind::Func | TokenKind::Type | TokenKind::Import
            )
        {
            self.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use dachs_ast::{ExprKind, StmtKind, Toplevel};

    use super::*;

    fn parse_str(code: &str) -> Result<Program, Error> {
        parse(Source::dummy(code), Logger::disabled())
    }

    #[test]
    fn empty_source() {
        let err = parse_str("").unwrap_err();
        assert_eq!(err.message(), "Expected toplevel but got EOF");
        let err = parse_str("\n\n!! only a comment\n").unwrap_err();
        assert_eq!(err.message(), "Expected toplevel but got EOF");
    }

    #[test]
    fn one_line_function() {
        let prog = parse_str("func main; ret 42; end").unwrap();
        let [Toplevel::Function(f)] = prog.toplevels.as_slice() else {
            panic!("unexpected toplevels: {:?}", prog.toplevels);
        };
        assert_eq!(f.ident.as_str(), "main");
        let [stmt] = f.body.as_slice() else {
            panic!("unexpected body: {:?}", f.body);
        };
        let StmtKind::Ret(values) = &stmt.kind else {
            panic!("not a ret: {}", stmt);
        };
        assert_eq!(*values[0].kind, ExprKind::Int(42));
        assert_eq!((f.start.offset, f.end.offset), (0, 22));
    }

    #[test]
    fn errors_are_collected_across_toplevels() {
        let err = parse_str("func a\n  ret (\nend\nfunc b\n  1 +\nend\nfunc c; end").unwrap_err();
        assert_eq!(err.message(), "2 error(s) while parsing");
        assert_eq!(err.notes().len(), 2);
    }

    #[test]
    fn single_error_is_returned_as_is() {
        let err = parse_str("func main\n  let = 1\nend").unwrap_err();
        assert_eq!(
            err.message(),
            "Expected variable name or record destructuring but got '='"
        );
        assert_eq!((err.start.line, err.start.column), (2, 7));
    }

    #[test]
    fn lexical_error_wins() {
        let err = parse_str("func main; 12 # 3; end").unwrap_err();
        assert!(err.message().contains("but got '#'"), "{}", err);
    }

    #[test]
    fn parse_tokens_from_channel() {
        let src = Source::dummy("import a.b\n");
        let (lexer, rx) = Lexer::new(src.clone(), Logger::disabled());
        let handle = lexer.spawn();
        let prog = parse_tokens(src, rx, Logger::disabled()).unwrap();
        handle.join().unwrap();
        assert_eq!(prog.imports().count(), 1);
    }
}
