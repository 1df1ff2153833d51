//! Tests for the streaming lexer.
//!
//! Tokens are checked through [`tokenize`], which runs the lexer on its own
//! thread exactly like the parser does.

use dachs_core::{Logger, Source};
use dachs_syntax::{Lexer, Token, TokenKind, tokenize};

fn lex(code: &str) -> Vec<Token> {
    tokenize(Source::dummy(code), Logger::disabled())
        .unwrap_or_else(|err| panic!("lexing {:?} failed: {}", code, err))
}

fn kinds(code: &str) -> Vec<TokenKind> {
    lex(code).iter().map(|t| t.kind).collect()
}

fn lex_error(code: &str) -> String {
    match tokenize(Source::dummy(code), Logger::disabled()) {
        Ok(tokens) => panic!("lexing {:?} succeeded: {:?}", code, tokens),
        Err(err) => err.message().to_string(),
    }
}

fn dump(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Token Stream
// =============================================================================

/// Test the positions and values of a one-line function.
#[test]
fn test_one_line_function() {
    insta::assert_snapshot!(dump(&lex("func main; ret 42; end")), @r"
    <FUNC:func>(1:1:0-1:5:4)
    <IDENT:main>(1:6:5-1:10:9)
    <SEMICOLON:;>(1:10:9-1:11:10)
    <RET:ret>(1:12:11-1:15:14)
    <INT:42>(1:16:15-1:18:17)
    <SEMICOLON:;>(1:18:17-1:19:18)
    <END:end>(1:20:19-1:23:22)
    <EOF:>(1:23:22-1:23:22)
    ");
}

/// Test that the text between tokens is only whitespace.
#[test]
fn test_tokens_cover_source() {
    let code = "func add(a, b)\n  !! sum\n  ret a + b\nend\n\nfunc main\n  x := [1 => \"one\"]\n  print(add(x[1], 0x1f))\nend\n";
    let tokens = lex(code);

    let mut last = 0;
    for tok in &tokens {
        let gap = &code[last..tok.start.offset];
        assert!(gap.trim().is_empty(), "non-space gap {:?} before {}", gap, tok);
        assert!(tok.start.offset <= tok.end.offset);
        last = tok.end.offset;
    }
    assert_eq!(last, code.len());
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

/// Test that EOF is positioned at the end of the source.
#[test]
fn test_eof_position() {
    let tokens = lex("func main\n  ret 42\nend");
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!((eof.start.offset, eof.start.line, eof.start.column), (22, 3, 4));
    assert_eq!(eof.start, eof.end);
}

/// Test that columns count bytes rather than characters.
#[test]
fn test_columns_are_bytes() {
    let tokens = lex("\"あ\" x");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[1].value(), "x");
    assert_eq!(tokens[1].start.column, 7);
}

// =============================================================================
// Token Kinds
// =============================================================================

/// Test operators including the two-character ones.
#[test]
fn test_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds("+ - * / % == != = := < <= > >= && || ! -> => : :: . ..."),
        vec![
            Plus, Minus, Star, Div, Percent, Equal, NotEqual, Assign, Define, Less, LessEqual,
            Greater, GreaterEqual, And, Or, Not, RightArrow, FatRightArrow, Colon, ColonColon, Dot,
            Ellipsis, Eof,
        ]
    );
}

/// Test keywords and identifiers.
#[test]
fn test_keywords_and_identifiers() {
    use TokenKind::*;
    assert_eq!(
        kinds("func if then else end true false funcs _ 'a x1"),
        vec![Func, If, Then, Else, End, Bool, Bool, Ident, Ident, Ident, Ident, Eof]
    );
    assert_eq!(lex("'elem")[0].value(), "'elem");
}

/// Test numeric literals.
#[test]
fn test_numbers() {
    use TokenKind::*;
    assert_eq!(
        kinds("42 42u 0x1f 0x1fu 0b101 3.14 1e10 2.5E-3"),
        vec![Int, UInt, Int, UInt, Int, Float, Float, Float, Eof]
    );
    assert_eq!(kinds("1. 1.e5 1.5e+2"), vec![Float, Float, Float, Eof]);
    assert_eq!(lex("1.e5")[0].value(), "1.e5");
    assert_eq!(kinds("x := 1."), vec![Ident, Define, Float, Eof]);
    assert_eq!(kinds("1.foo"), vec![Float, Ident, Eof]);
    assert_eq!(kinds("1..."), vec![Int, Ellipsis, Eof]);
}

/// Test that an escaped quote does not close a string literal.
#[test]
fn test_string_with_escape() {
    let tokens = lex(r#""a\"b" c"#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value(), r#""a\"b""#);
    assert_eq!(tokens[1].kind, TokenKind::Ident);
}

/// Test that comments are emitted up to the end of line.
#[test]
fn test_comments() {
    use TokenKind::*;
    let tokens = lex("a !! comment here\nb");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![Ident, Comment, Newline, Ident, Eof]
    );
    assert_eq!(tokens[1].value(), "!! comment here");
}

// =============================================================================
// Lexical Errors
// =============================================================================

/// Test messages of lexical errors.
#[test]
fn test_errors() {
    let cases = [
        ("3.14e", "number for exponential part of float literal"),
        ("0b2", "binary digit (0 or 1) for binary integer literal"),
        ("0xg", "hexadecimal digit for hex integer literal"),
        ("\"abc", "Unclosed string literal"),
        ("a | b", "'|' for '||'"),
        ("a & b", "'&' for '&&'"),
        ("#", "letter for head character of identifier"),
    ];
    for (code, expected) in cases {
        let msg = lex_error(code);
        assert!(msg.contains(expected), "{:?}: {:?}", code, msg);
    }
}

/// Test that the stream ends with ILLEGAL after an error.
#[test]
fn test_illegal_ends_stream() {
    let (lexer, rx) = Lexer::new(Source::dummy("a | b c d"), Logger::disabled());
    let handle = lexer.spawn();
    let kinds: Vec<TokenKind> = rx.iter().map(|t| t.kind).collect();
    handle.join().unwrap();
    assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Illegal]);
}

/// Test invalid UTF-8 in the source.
#[test]
fn test_invalid_utf8() {
    let src = Source::from_reader("<bytes>", &[b'a', b' ', 0xff][..]).unwrap();
    let err = tokenize(src, Logger::disabled()).unwrap_err();
    assert_eq!(err.message(), "Invalid UTF-8 sequence starting with byte 0xff");
    assert_eq!(err.start.offset, 2);
}

// =============================================================================
// Streaming
// =============================================================================

/// Test that the lexer quits when the receiver is dropped.
#[test]
fn test_dropped_receiver_stops_lexer() {
    let code = "x + ".repeat(10_000);
    let (lexer, rx) = Lexer::new(Source::dummy(code), Logger::disabled());
    let handle = lexer.spawn();

    assert_eq!(rx.recv().unwrap().kind, TokenKind::Ident);
    assert_eq!(rx.recv().unwrap().kind, TokenKind::Plus);
    drop(rx);

    handle.join().unwrap();
}

/// Test that lexical errors go to the registered handler.
#[test]
fn test_error_handler() {
    let (tx, errors) = crossbeam_channel::unbounded();
    let (lexer, rx) = Lexer::new(Source::dummy("1 |"), Logger::disabled());
    let handle = lexer
        .on_error(move |err| {
            tx.send(err).unwrap();
        })
        .spawn();
    let tokens: Vec<Token> = rx.iter().collect();
    handle.join().unwrap();

    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Illegal));
    let err = errors.try_recv().unwrap();
    assert!(err.message().starts_with("Expected '|' for '||' but got EOF"));
}
