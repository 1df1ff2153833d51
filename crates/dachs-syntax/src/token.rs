use std::borrow::Cow;
use std::fmt;

use derive_more::Display;

use dachs_core::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[display("ILLEGAL")]
    Illegal,
    /// `!! ...` up to the end of line
    #[display("COMMENT")]
    Comment,
    #[display("NEWLINE")]
    Newline,
    #[display("SEMICOLON")]
    Semicolon,
    #[display("LPAREN")]
    LParen,
    #[display("RPAREN")]
    RParen,
    #[display("LBRACE")]
    LBrace,
    #[display("RBRACE")]
    RBrace,
    #[display("LBRACKET")]
    LBracket,
    #[display("RBRACKET")]
    RBracket,
    /// Including `'a` and `_`
    #[display("IDENT")]
    Ident,
    #[display("BOOL")]
    Bool,
    #[display("INT")]
    Int,
    /// `42u`
    #[display("UINT")]
    UInt,
    #[display("FLOAT")]
    Float,
    #[display("STRING")]
    String,
    #[display("MINUS")]
    Minus,
    #[display("PLUS")]
    Plus,
    #[display("STAR")]
    Star,
    #[display("DIV")]
    Div,
    #[display("NOT")]
    Not,
    #[display("OR")]
    Or,
    #[display("AND")]
    And,
    #[display("PERCENT")]
    Percent,
    #[display("EQUAL")]
    Equal,
    #[display("NOT_EQUAL")]
    NotEqual,
    #[display("ASSIGN")]
    Assign,
    /// `:=`
    #[display("DEFINE")]
    Define,
    #[display("LESS")]
    Less,
    #[display("LESS_EQUAL")]
    LessEqual,
    #[display("GREATER")]
    Greater,
    #[display("GREATER_EQUAL")]
    GreaterEqual,
    #[display("END")]
    End,
    #[display("IF")]
    If,
    #[display("THEN")]
    Then,
    #[display("ELSE")]
    Else,
    #[display("SWITCH")]
    Switch,
    #[display("CASE")]
    Case,
    #[display("MATCH")]
    Match,
    #[display("WITH")]
    With,
    #[display("RET")]
    Ret,
    #[display("IMPORT")]
    Import,
    #[display("DOT")]
    Dot,
    #[display("TYPE")]
    Type,
    #[display("COLON")]
    Colon,
    #[display("COLON_COLON")]
    ColonColon,
    #[display("FOR")]
    For,
    #[display("IN")]
    In,
    /// `=>`
    #[display("FAT_RIGHT_ARROW")]
    FatRightArrow,
    #[display("TYPEOF")]
    Typeof,
    #[display("AS")]
    As,
    #[display("FUNC")]
    Func,
    #[display("DO")]
    Do,
    /// `->`
    #[display("RIGHT_ARROW")]
    RightArrow,
    #[display("COMMA")]
    Comma,
    /// `...`
    #[display("ELLIPSIS")]
    Ellipsis,
    #[display("LET")]
    Let,
    #[display("VAR")]
    Var,
    #[display("EOF")]
    Eof,
}

impl TokenKind {
    /// Keyword spelled as `ident`, if any.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "match" => TokenKind::Match,
            "with" => TokenKind::With,
            "ret" => TokenKind::Ret,
            "import" => TokenKind::Import,
            "type" => TokenKind::Type,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "typeof" => TokenKind::Typeof,
            "as" => TokenKind::As,
            "func" => TokenKind::Func,
            "do" => TokenKind::Do,
            "let" => TokenKind::Let,
            "var" => TokenKind::Var,
            "true" | "false" => TokenKind::Bool,
            _ => return None,
        };
        Some(kind)
    }

    /// The stream ends after a token of this kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, TokenKind::Eof | TokenKind::Illegal)
    }
}

/// A lexical unit. Its text is sliced from the source on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn value(&self) -> Cow<'_, str> {
        self.start.text_to(&self.end)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}:{}>({}:{}:{}-{}:{}:{})",
            self.kind,
            self.value(),
            self.start.line,
            self.start.column,
            self.start.offset,
            self.end.line,
            self.end.column,
            self.end.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use dachs_core::Source;

    use super::*;

    #[test]
    fn token_display() {
        let s = Source::dummy("a bc d");
        let tok = Token {
            kind: TokenKind::Ident,
            start: Position::new(2, 1, 3, s.clone()),
            end: Position::new(4, 1, 5, s),
        };
        assert_eq!(tok.to_string(), "<IDENT:bc>(1:3:2-1:5:4)");
    }

    #[test]
    fn keywords() {
        assert_eq!(TokenKind::keyword("func"), Some(TokenKind::Func));
        assert_eq!(TokenKind::keyword("false"), Some(TokenKind::Bool));
        assert_eq!(TokenKind::keyword("main"), None);
    }
}
