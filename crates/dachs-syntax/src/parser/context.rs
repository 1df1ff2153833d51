//! Token cursor shared by all parsing functions.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use dachs_ast::{Stmt, Symbol};
use dachs_core::{Error, LogTags, Logger, Position, Source, log};

use crate::token::{Token, TokenKind};

/// Recursive descent parser reading tokens from a lexer channel.
///
/// Tokens are pulled lazily into a lookahead buffer. `COMMENT` tokens never
/// enter the buffer. Once a terminal token (`EOF` or `ILLEGAL`) was received,
/// every further peek past the end sees that token again.
pub struct Parser {
    pub(super) src: Arc<Source>,
    tokens: Receiver<Token>,
    lookahead: VecDeque<Token>,
    terminal: Option<Token>,
    /// End of the last consumed token.
    last: Position,
    pub(super) logger: Logger,
}

impl Parser {
    pub fn new(src: Arc<Source>, tokens: Receiver<Token>, logger: Logger) -> Self {
        let last = Position::start_of(src.clone());
        Self {
            src,
            tokens,
            lookahead: VecDeque::new(),
            terminal: None,
            last,
            logger: logger.for_tag(LogTags::PARSING),
        }
    }

    /// Receive the next meaningful token from the channel.
    fn pull(&mut self) -> Token {
        if let Some(t) = &self.terminal {
            return t.clone();
        }
        loop {
            match self.tokens.recv() {
                Ok(t) if t.kind == TokenKind::Comment => continue,
                Ok(t) => {
                    log!(self.logger, "Parser received token: {}", t);
                    if t.kind.is_terminal() {
                        self.terminal = Some(t.clone());
                    }
                    return t;
                }
                Err(_) => {
                    // Sender went away without EOF
                    let t = Token {
                        kind: TokenKind::Eof,
                        start: self.last.clone(),
                        end: self.last.clone(),
                    };
                    self.terminal = Some(t.clone());
                    return t;
                }
            }
        }
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            let tok = self.pull();
            self.lookahead.push_back(tok);
        }
    }

    pub(super) fn peek_nth(&mut self, n: usize) -> &Token {
        self.fill(n);
        &self.lookahead[n]
    }

    pub(super) fn peek(&mut self) -> &Token {
        self.peek_nth(0)
    }

    pub(super) fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    pub(super) fn peek_kind_nth(&mut self, n: usize) -> TokenKind {
        self.peek_nth(n).kind
    }

    pub(super) fn next(&mut self) -> Token {
        let tok = match self.lookahead.pop_front() {
            Some(tok) => tok,
            None => self.pull(),
        };
        self.last = tok.end.clone();
        tok
    }

    /// End of the most recently consumed token.
    pub(super) fn last_end(&self) -> Position {
        self.last.clone()
    }

    pub(super) fn at_terminal(&mut self) -> bool {
        self.peek_kind().is_terminal()
    }

    /// Consume the next token when it is of `kind`.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == kind {
            Some(self.next())
        } else {
            None
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, Error> {
        match self.eat(kind) {
            Some(tok) => Ok(tok),
            None => Err(self.unexpected(what)),
        }
    }

    pub(super) fn expect_ident(&mut self, what: &str) -> Result<(Symbol, Token), Error> {
        let tok = self.expect(TokenKind::Ident, what)?;
        Ok((Symbol::new(tok.value()), tok))
    }

    /// Error for the next token not being `what`.
    pub(super) fn unexpected(&mut self, what: &str) -> Error {
        let tok = self.peek().clone();
        let got = match tok.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Illegal => format!("illegal token '{}'", tok.value()),
            _ => format!("'{}'", tok.value()),
        };
        Error::new(
            tok.start,
            tok.end,
            format!("Expected {} but got {}", what, got),
        )
    }

    pub(super) fn is_separator(kind: TokenKind) -> bool {
        matches!(kind, TokenKind::Newline | TokenKind::Semicolon)
    }

    pub(super) fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline).is_some() {}
    }

    pub(super) fn skip_separators(&mut self) {
        while Self::is_separator(self.peek_kind()) {
            self.next();
        }
    }

    /// Index of the first token after separators, starting from `n`.
    pub(super) fn skip_separators_ahead(&mut self, mut n: usize) -> usize {
        while Self::is_separator(self.peek_kind_nth(n)) {
            n += 1;
        }
        n
    }

    /// Index just after the `}` matching the `{` at `n`.
    pub(super) fn skip_braces_ahead(&mut self, mut n: usize) -> usize {
        let mut depth = 0usize;
        loop {
            match self.peek_kind_nth(n) {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return n + 1;
                    }
                }
                TokenKind::Eof | TokenKind::Illegal => return n,
                _ => {}
            }
            n += 1;
        }
    }

    /// Statements until one of `closers`. The closer is not consumed.
    pub(super) fn block(&mut self, closers: &[TokenKind]) -> Result<Vec<Stmt>, Error> {
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            let kind = self.peek_kind();
            if closers.contains(&kind) {
                return Ok(stmts);
            }
            if kind.is_terminal() {
                return Err(self.unexpected("'end' of block"));
            }

            stmts.push(self.statement()?);

            let kind = self.peek_kind();
            if !Self::is_separator(kind) && !closers.contains(&kind) {
                return Err(self.unexpected("end of statement"));
            }
        }
    }

    /// `then` or a separator after a condition.
    pub(super) fn then_or_separator(&mut self, what: &str) -> Result<(), Error> {
        if self.eat(TokenKind::Then).is_some() || Self::is_separator(self.peek_kind()) {
            return Ok(());
        }
        Err(self.unexpected(&format!("'then' or end of line after {}", what)))
    }
}
