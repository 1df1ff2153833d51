//! Decoding of literal tokens into values.

use std::num::IntErrorKind;

use derive_more::{Display, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum LiteralError {
    #[display("value out of range")]
    OutOfRange,
    #[display("invalid syntax")]
    InvalidSyntax,
}

// =============================================================================
// Numbers
// =============================================================================

/// Magnitude of an integer literal. Accepts `0x` and `0b` prefixes.
fn parse_nat(text: &str) -> Result<u64, LiteralError> {
    let (digits, radix) = if let Some(rest) = strip_radix(text, 'x') {
        (rest, 16)
    } else if let Some(rest) = strip_radix(text, 'b') {
        (rest, 2)
    } else {
        (text, 10)
    };
    u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => LiteralError::OutOfRange,
        _ => LiteralError::InvalidSyntax,
    })
}

fn strip_radix(text: &str, marker: char) -> Option<&str> {
    let rest = text.strip_prefix('0')?;
    rest.strip_prefix(marker)
        .or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

/// Parse an `INT` token, optionally preceded by `-` in patterns.
pub fn parse_int_literal(text: &str, negative: bool) -> Result<i64, LiteralError> {
    let n = parse_nat(text)?;
    if !negative {
        return i64::try_from(n).map_err(|_| LiteralError::OutOfRange);
    }
    // -9223372036854775808 has no positive counterpart
    if n == i64::MAX as u64 + 1 {
        return Ok(i64::MIN);
    }
    i64::try_from(n)
        .map(|v| -v)
        .map_err(|_| LiteralError::OutOfRange)
}

/// Parse a `UINT` token such as `42u` or `0xffu`.
pub fn parse_uint_literal(text: &str) -> Result<u64, LiteralError> {
    let text = text.strip_suffix('u').unwrap_or(text);
    parse_nat(text)
}

pub fn parse_float_literal(text: &str, negative: bool) -> Result<f64, LiteralError> {
    let v: f64 = text.parse().map_err(|_| LiteralError::InvalidSyntax)?;
    if v.is_infinite() {
        return Err(LiteralError::OutOfRange);
    }
    Ok(if negative { -v } else { v })
}

// =============================================================================
// Strings
// =============================================================================

/// Decode a double-quoted `STRING` token.
///
/// Recognized escapes are `\a \b \f \n \r \t \v \\ \"`, three octal digits
/// `\101`, `\xHH`, `\uHHHH` and `\UHHHHHHHH`. Octal and `\x` escapes denote
/// raw bytes; a byte sequence which is not UTF-8 is decoded lossily.
pub fn unquote_string(text: &str) -> Result<String, LiteralError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(LiteralError::InvalidSyntax)?;

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut out, c);
            continue;
        }

        let escaped = chars.next().ok_or(LiteralError::InvalidSyntax)?;
        match escaped {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            '"' => out.push(b'"'),
            '0'..='7' => {
                let mut v = escaped.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    let d = chars
                        .next()
                        .and_then(|c| c.to_digit(8))
                        .ok_or(LiteralError::InvalidSyntax)?;
                    v = v * 8 + d;
                }
                let byte = u8::try_from(v).map_err(|_| LiteralError::InvalidSyntax)?;
                out.push(byte);
            }
            'x' => {
                let v = hex_digits(&mut chars, 2)?;
                out.push(v as u8);
            }
            'u' | 'U' => {
                let len = if escaped == 'u' { 4 } else { 8 };
                let v = hex_digits(&mut chars, len)?;
                let c = char::from_u32(v).ok_or(LiteralError::InvalidSyntax)?;
                push_char(&mut out, c);
            }
            _ => return Err(LiteralError::InvalidSyntax),
        }
    }

    Ok(match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn hex_digits(chars: &mut std::str::Chars<'_>, len: usize) -> Result<u32, LiteralError> {
    let mut v = 0u32;
    for _ in 0..len {
        let d = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(LiteralError::InvalidSyntax)?;
        v = v * 16 + d;
    }
    Ok(v)
}
