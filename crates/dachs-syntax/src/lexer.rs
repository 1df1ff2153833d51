//! Hand-written scanner producing a stream of [`Token`]s.
//!
//! The lexer is a small state machine. Each state consumes characters of the
//! source and tells which state to run next. Tokens are sent on a bounded
//! channel, so a lexer running on its own thread stays at most one token
//! ahead of its consumer. The stream always ends with `EOF` or `ILLEGAL`.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use dachs_core::{Error, LogTags, Logger, Position, Source, log};

use crate::token::{Token, TokenKind};

/// Callback receiving lexical errors. It runs on the lexer's thread.
pub type ErrorHandler = Box<dyn FnMut(Error) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Lex,
    Exclamation,
    Equal,
    Colon,
    Dot,
    Ident,
    StringLiteral,
    Number,
}

pub struct Lexer {
    src: Arc<Source>,
    start: Position,
    current: Position,
    /// Character at `current`. `None` at the end of input or on an invalid
    /// UTF-8 sequence.
    top: Option<char>,
    invalid: Option<u8>,
    tokens: Sender<Token>,
    on_error: Option<ErrorHandler>,
    logger: Logger,
    disconnected: bool,
}

impl Lexer {
    /// Create a lexer and the receiving end of its token stream.
    pub fn new(src: Arc<Source>, logger: Logger) -> (Self, Receiver<Token>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (Self::with_sender(src, tx, logger), rx)
    }

    pub fn with_sender(src: Arc<Source>, tokens: Sender<Token>, logger: Logger) -> Self {
        let start = Position::start_of(src.clone());
        Self {
            src,
            current: start.clone(),
            start,
            top: None,
            invalid: None,
            tokens,
            on_error: None,
            logger: logger.for_tag(LogTags::PARSING),
            disconnected: false,
        }
    }

    pub fn on_error(mut self, handler: impl FnMut(Error) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Run [`Lexer::lex`] on a new thread.
    pub fn spawn(self) -> thread::JoinHandle<()> {
        thread::spawn(move || self.lex())
    }

    /// Scan the whole source. Stops early when the receiver was dropped.
    pub fn lex(mut self) {
        log!(self.logger, "Start lexing {}", self.src.name);
        self.forward();
        let mut state = Some(State::Lex);
        while let Some(s) = state {
            if self.disconnected {
                log!(self.logger, "Token receiver was dropped. Lexer quitting");
                return;
            }
            state = self.step(s);
        }
        log!(self.logger, "Finished lexing {}", self.src.name);
    }

    fn step(&mut self, state: State) -> Option<State> {
        match state {
            State::Lex => self.lex_token(),
            State::Exclamation => self.lex_exclamation(),
            State::Equal => self.lex_equal(),
            State::Colon => self.lex_colon(),
            State::Dot => self.lex_dot(),
            State::Ident => self.lex_ident(),
            State::StringLiteral => self.lex_string(),
            State::Number => self.lex_number(),
        }
    }

    /// Decode the character at the current offset.
    fn forward(&mut self) {
        let rest = self.src.code.get(self.current.offset..).unwrap_or_default();
        let chunk = &rest[..rest.len().min(4)];
        let decoded = match std::str::from_utf8(chunk) {
            Ok(s) => s.chars().next(),
            Err(e) => std::str::from_utf8(&chunk[..e.valid_up_to()])
                .unwrap_or_default()
                .chars()
                .next(),
        };
        self.top = decoded;
        self.invalid = match decoded {
            None => chunk.first().copied(),
            Some(_) => None,
        };
    }

    fn eat(&mut self) {
        let Some(c) = self.top else {
            return;
        };
        let size = c.len_utf8();
        self.current.offset += size;
        if c == '\n' {
            self.current.line += 1;
            self.current.column = 1;
        } else {
            self.current.column += size;
        }
        self.forward();
    }

    /// Eat the current character without making it a part of any token.
    fn consume(&mut self) {
        self.eat();
        self.start = self.current.clone();
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.src.code.get(self.current.offset + ahead).copied()
    }

    fn top_is(&self, pred: impl Fn(char) -> bool) -> bool {
        self.top.is_some_and(pred)
    }

    fn emit(&mut self, kind: TokenKind) {
        let tok = Token {
            kind,
            start: self.start.clone(),
            end: self.current.clone(),
        };
        log!(self.logger, "Lexed token: {}", tok);
        if self.tokens.send(tok).is_err() {
            self.disconnected = true;
        }
        self.start = self.current.clone();
    }

    fn fail(&mut self, msg: impl Into<String>) {
        let err = Error::new(self.start.clone(), self.current.clone(), msg);
        log!(self.logger, "Lexical error: {}", err.message());
        if let Some(handler) = self.on_error.as_mut() {
            handler(err);
        }
    }

    /// Report an unexpected character and close the stream with `ILLEGAL`.
    fn expected(&mut self, what: &str) {
        let got = match (self.top, self.invalid) {
            (Some(c), _) => format!("'{}'({})", c, c as u32),
            (None, Some(b)) => format!("invalid UTF-8 byte 0x{:02x}", b),
            (None, None) => "EOF".to_string(),
        };
        self.fail(format!("Expected {} but got {}", what, got));
        self.emit(TokenKind::Illegal);
    }

    fn single(&mut self, kind: TokenKind) {
        self.eat();
        self.emit(kind);
    }

    /// `<` or `<=`, `>` or `>=`
    fn with_equal(&mut self, one: TokenKind, two: TokenKind) {
        self.eat();
        if self.top == Some('=') {
            self.eat();
            self.emit(two);
        } else {
            self.emit(one);
        }
    }

    fn lex_token(&mut self) -> Option<State> {
        loop {
            if self.disconnected {
                return None;
            }

            let Some(c) = self.top else {
                match self.invalid {
                    Some(b) => {
                        self.fail(format!("Invalid UTF-8 sequence starting with byte 0x{:02x}", b));
                        self.emit(TokenKind::Illegal);
                    }
                    None => self.emit(TokenKind::Eof),
                }
                return None;
            };

            match c {
                '!' => return Some(State::Exclamation),
                '=' => return Some(State::Equal),
                ':' => return Some(State::Colon),
                '.' => return Some(State::Dot),
                '"' => return Some(State::StringLiteral),
                // Type variable 'a
                '\'' => return Some(State::Ident),
                '\n' => self.single(TokenKind::Newline),
                ';' => self.single(TokenKind::Semicolon),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                ',' => self.single(TokenKind::Comma),
                '+' => self.single(TokenKind::Plus),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Div),
                '%' => self.single(TokenKind::Percent),
                '<' => self.with_equal(TokenKind::Less, TokenKind::LessEqual),
                '>' => self.with_equal(TokenKind::Greater, TokenKind::GreaterEqual),
                '-' => {
                    self.eat();
                    if self.top == Some('>') {
                        self.eat();
                        self.emit(TokenKind::RightArrow);
                    } else {
                        self.emit(TokenKind::Minus);
                    }
                }
                '|' | '&' => {
                    self.eat();
                    if self.top != Some(c) {
                        self.expected(&format!("'{c}' for '{c}{c}'"));
                        return None;
                    }
                    self.eat();
                    self.emit(if c == '|' { TokenKind::Or } else { TokenKind::And });
                }
                c if c.is_whitespace() => self.consume(),
                c if c.is_ascii_digit() => return Some(State::Number),
                _ => return Some(State::Ident),
            }
        }
    }

    fn lex_exclamation(&mut self) -> Option<State> {
        self.eat();
        match self.top {
            Some('=') => {
                self.eat();
                self.emit(TokenKind::NotEqual);
            }
            Some('!') => {
                while self.top.is_some_and(|c| c != '\n') {
                    self.eat();
                }
                self.emit(TokenKind::Comment);
            }
            _ => self.emit(TokenKind::Not),
        }
        Some(State::Lex)
    }

    fn lex_equal(&mut self) -> Option<State> {
        self.eat();
        match self.top {
            Some('=') => self.single(TokenKind::Equal),
            Some('>') => self.single(TokenKind::FatRightArrow),
            _ => self.emit(TokenKind::Assign),
        }
        Some(State::Lex)
    }

    fn lex_colon(&mut self) -> Option<State> {
        self.eat();
        match self.top {
            Some('=') => self.single(TokenKind::Define),
            Some(':') => self.single(TokenKind::ColonColon),
            _ => self.emit(TokenKind::Colon),
        }
        Some(State::Lex)
    }

    fn lex_dot(&mut self) -> Option<State> {
        if self.peek_byte(1) == Some(b'.') && self.peek_byte(2) == Some(b'.') {
            self.eat();
            self.eat();
            self.single(TokenKind::Ellipsis);
        } else {
            self.single(TokenKind::Dot);
        }
        Some(State::Lex)
    }

    fn lex_ident(&mut self) -> Option<State> {
        let type_var = self.top == Some('\'');
        if type_var {
            self.eat();
        }

        if !self.top_is(is_letter) {
            self.expected("letter for head character of identifier");
            return None;
        }
        self.eat();
        while self.top_is(|c| is_letter(c) || c.is_numeric()) {
            self.eat();
        }

        let kind = if type_var {
            TokenKind::Ident
        } else {
            TokenKind::keyword(&self.start.text_to(&self.current)).unwrap_or(TokenKind::Ident)
        };
        self.emit(kind);
        Some(State::Lex)
    }

    fn lex_string(&mut self) -> Option<State> {
        // Opening '"'
        self.eat();
        while let Some(c) = self.top {
            match c {
                '\\' => {
                    // Escaped character never closes the literal
                    self.eat();
                    self.eat();
                }
                '"' => {
                    self.single(TokenKind::String);
                    return Some(State::Lex);
                }
                _ => self.eat(),
            }
        }

        if self.invalid.is_some() {
            return Some(State::Lex);
        }
        self.fail("Unclosed string literal");
        self.emit(TokenKind::Illegal);
        None
    }

    fn lex_number(&mut self) -> Option<State> {
        if self.top == Some('0') {
            match self.peek_byte(1) {
                Some(b'x' | b'X') => {
                    return self.lex_radix_int(
                        |c| c.is_ascii_hexdigit(),
                        "hexadecimal digit for hex integer literal",
                    );
                }
                Some(b'b' | b'B') => {
                    return self.lex_radix_int(
                        |c| c == '0' || c == '1',
                        "binary digit (0 or 1) for binary integer literal",
                    );
                }
                _ => {}
            }
        }

        let mut kind = TokenKind::Int;
        self.eat_digits();

        // `1.` is a float. `1...` is an int before an ellipsis
        let ellipsis = self.peek_byte(1) == Some(b'.') && self.peek_byte(2) == Some(b'.');
        if self.top == Some('.') && !ellipsis {
            kind = TokenKind::Float;
            self.eat();
            self.eat_digits();
        }

        if matches!(self.top, Some('e' | 'E')) {
            kind = TokenKind::Float;
            self.eat();
            if matches!(self.top, Some('+' | '-')) {
                self.eat();
            }
            if !self.top_is(|c| c.is_ascii_digit()) {
                self.expected("number for exponential part of float literal");
                return None;
            }
            self.eat_digits();
        }

        if kind == TokenKind::Int && self.top == Some('u') {
            self.eat();
            kind = TokenKind::UInt;
        }

        self.emit(kind);
        Some(State::Lex)
    }

    /// `0x1f`, `0b101`, optionally followed by `u`.
    fn lex_radix_int(&mut self, is_digit: fn(char) -> bool, what: &str) -> Option<State> {
        // '0' and 'x' or 'b'
        self.eat();
        self.eat();

        if !self.top_is(is_digit) {
            self.expected(what);
            return None;
        }
        while self.top_is(is_digit) {
            self.eat();
        }
        if self.top_is(|c| c.is_ascii_digit()) {
            self.expected(what);
            return None;
        }

        let kind = if self.top == Some('u') {
            self.eat();
            TokenKind::UInt
        } else {
            TokenKind::Int
        };
        self.emit(kind);
        Some(State::Lex)
    }

    fn eat_digits(&mut self) {
        while self.top_is(|c| c.is_ascii_digit()) {
            self.eat();
        }
    }
}

fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Lex the whole source on a separate thread and collect the tokens.
///
/// The last token is `EOF` on success. The first lexical error is returned
/// instead of the tokens when the stream ended with `ILLEGAL`.
pub fn tokenize(src: Arc<Source>, logger: Logger) -> Result<Vec<Token>, Error> {
    let (err_tx, err_rx) = crossbeam_channel::unbounded();
    let (lexer, tokens) = Lexer::new(src, logger);
    let handle = lexer
        .on_error(move |err| {
            let _ = err_tx.send(err);
        })
        .spawn();

    let collected: Vec<Token> = tokens.iter().collect();
    let _ = handle.join();

    match err_rx.try_recv() {
        Ok(err) => Err(err),
        Err(_) => Ok(collected),
    }
}
