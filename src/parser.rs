// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/parser.rs - Parser for legacy Factorio blueprint table text.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `parser` Module
 *
 * This module parses the Lua table literal carried by legacy (0.14)
 * blueprint strings into a [LegacyValue].
 *
 * The game serializes blueprints as a chunk of the form
 * `do local _={...};return _;end`. The parser accepts that chunk, a
 * `return {...}` chunk, or a bare value.
 *
 * ## Usage Example
 *
 * ```
 * use fbpcodec::parser::parse;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let value = parse(r#"do local _={name="belts",entities={{name="transport-belt"}}};return _;end"#)?;
 *
 *     let table = value.as_table().unwrap();
 *     assert_eq!(table.get("name").and_then(|v| v.as_str()), Some("belts"));
 *     assert_eq!(table.get("entities").and_then(|v| v.as_sequence()).map(|s| s.len()), Some(1));
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use log::trace;

use crate::error::{ParseError, ParseErrorKind};
use crate::options::{DEFAULT_MAX_DEPTH, DecodeOptions};
use crate::value::{LegacyTable, LegacyValue, Scalar};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    String(String),
    Number(Scalar),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Comma,
    Semicolon,
    Minus,
    Slash,
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Name(name) => write!(f, "`{}`", name),
            Token::String(_) => write!(f, "string"),
            Token::Number(_) => write!(f, "number"),
            Token::LBrace => write!(f, "`{{`"),
            Token::RBrace => write!(f, "`}}`"),
            Token::LBracket => write!(f, "`[`"),
            Token::RBracket => write!(f, "`]`"),
            Token::Equals => write!(f, "`=`"),
            Token::Comma => write!(f, "`,`"),
            Token::Semicolon => write!(f, "`;`"),
            Token::Minus => write!(f, "`-`"),
            Token::Slash => write!(f, "`/`"),
            Token::Dot => write!(f, "`.`"),
        }
    }
}

#[derive(Debug)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_name_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

struct Lexer<'a> {
    text: &'a str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        let data = text.as_bytes();
        let pos = if data.starts_with(b"\xEF\xBB\xBF") { 3 } else { 0 };
        Self { text, data, pos }
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::at(kind, self.data, offset)
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.data.get(self.pos + ahead).copied()
    }

    fn punct(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn tokenize(mut self) -> Result<Vec<Spanned>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia()?;
            let Some(b) = self.peek_byte(0) else {
                break;
            };

            let offset = self.pos;
            let token = match b {
                b'{' => self.punct(Token::LBrace),
                b'}' => self.punct(Token::RBrace),
                b'[' => match self.long_bracket_level() {
                    Some(level) => Token::String(self.read_long_bracket(level)?),
                    None => self.punct(Token::LBracket),
                },
                b']' => self.punct(Token::RBracket),
                b'=' => self.punct(Token::Equals),
                b',' => self.punct(Token::Comma),
                b';' => self.punct(Token::Semicolon),
                b'-' => self.punct(Token::Minus),
                b'/' => self.punct(Token::Slash),
                b'.' if self.peek_byte(1).is_some_and(|c| c.is_ascii_digit()) => {
                    Token::Number(self.read_number()?)
                }
                b'.' => self.punct(Token::Dot),
                b'"' | b'\'' => Token::String(self.read_short_string(b)?),
                b'0'..=b'9' => Token::Number(self.read_number()?),
                b if b == b'_' || b.is_ascii_alphabetic() => Token::Name(self.read_name()),
                _ => {
                    let c = self
                        .text
                        .get(self.pos..)
                        .and_then(|rest| rest.chars().next())
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    return Err(self.error(ParseErrorKind::UnexpectedChar(c), offset));
                }
            };

            tokens.push(Spanned { token, offset });
        }

        Ok(tokens)
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        while let Some(b) = self.peek_byte(0) {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'-' && self.peek_byte(1) == Some(b'-') {
                self.pos += 2;
                if self.peek_byte(0) == Some(b'[') {
                    if let Some(level) = self.long_bracket_level() {
                        self.read_long_bracket(level)?;
                        continue;
                    }
                }
                while self.peek_byte(0).is_some_and(|c| c != b'\n') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Returns the level of a long bracket (`[[`, `[=[`, ...) opening at the
    /// current position.
    fn long_bracket_level(&self) -> Option<usize> {
        let mut level = 0;
        while self.peek_byte(1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_byte(1 + level) == Some(b'[')).then_some(level)
    }

    fn read_long_bracket(&mut self, level: usize) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += level + 2;

        // A newline right after the opening bracket is not part of the string.
        match (self.peek_byte(0), self.peek_byte(1)) {
            (Some(b'\r'), Some(b'\n')) | (Some(b'\n'), Some(b'\r')) => self.pos += 2,
            (Some(b'\r' | b'\n'), _) => self.pos += 1,
            _ => (),
        }

        let content_start = self.pos;
        while self.pos < self.data.len() {
            if self.data[self.pos] == b']' {
                let mut equals = 0;
                while self.peek_byte(1 + equals) == Some(b'=') {
                    equals += 1;
                }
                if equals == level && self.peek_byte(1 + equals) == Some(b']') {
                    let content = &self.data[content_start..self.pos];
                    self.pos += level + 2;
                    return Ok(String::from_utf8_lossy(content).into_owned());
                }
            }
            self.pos += 1;
        }

        Err(self.error(ParseErrorKind::UnterminatedLongBracket, start))
    }

    fn read_short_string(&mut self, quote: u8) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += 1;

        let mut buffer = Vec::new();
        loop {
            let Some(b) = self.peek_byte(0) else {
                return Err(self.error(ParseErrorKind::UnterminatedString, start));
            };
            match b {
                _ if b == quote => {
                    self.pos += 1;
                    return Ok(String::from_utf8_lossy(&buffer).into_owned());
                }
                b'\n' | b'\r' => return Err(self.error(ParseErrorKind::UnterminatedString, start)),
                b'\\' => self.read_escape(&mut buffer, start)?,
                _ => {
                    buffer.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn read_escape(&mut self, buffer: &mut Vec<u8>, string_start: usize) -> Result<(), ParseError> {
        let escape_start = self.pos;
        self.pos += 1;

        let Some(b) = self.peek_byte(0) else {
            return Err(self.error(ParseErrorKind::UnterminatedString, string_start));
        };
        self.pos += 1;

        match b {
            b'a' => buffer.push(0x07),
            b'b' => buffer.push(0x08),
            b'f' => buffer.push(0x0c),
            b'n' => buffer.push(b'\n'),
            b'r' => buffer.push(b'\r'),
            b't' => buffer.push(b'\t'),
            b'v' => buffer.push(0x0b),
            b'\\' | b'"' | b'\'' => buffer.push(b),
            b'\n' | b'\r' => {
                buffer.push(b'\n');
                // "\r\n" and "\n\r" count as one line break.
                if matches!(self.peek_byte(0), Some(c @ (b'\n' | b'\r')) if c != b) {
                    self.pos += 1;
                }
            }
            b'x' => {
                let high = self.hex_digit(escape_start)?;
                let low = self.hex_digit(escape_start)?;
                buffer.push((high * 16 + low) as u8);
            }
            b'z' => {
                while self.peek_byte(0).is_some_and(is_whitespace) {
                    self.pos += 1;
                }
            }
            b'0'..=b'9' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek_byte(0) {
                        Some(d) if d.is_ascii_digit() => {
                            value = value * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| self.error(ParseErrorKind::InvalidEscape, escape_start))?;
                buffer.push(byte);
            }
            b'u' => {
                if self.peek_byte(0) != Some(b'{') {
                    return Err(self.error(ParseErrorKind::InvalidEscape, escape_start));
                }
                self.pos += 1;

                let mut code_point: u32 = 0;
                let mut digits = 0;
                while self.peek_byte(0) != Some(b'}') {
                    let digit = self.hex_digit(escape_start)?;
                    code_point = code_point
                        .checked_mul(16)
                        .and_then(|c| c.checked_add(digit))
                        .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape, escape_start))?;
                    digits += 1;
                }
                self.pos += 1;

                let c = char::from_u32(code_point)
                    .filter(|_| digits > 0)
                    .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape, escape_start))?;
                let mut utf8 = [0u8; 4];
                buffer.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
            _ => return Err(self.error(ParseErrorKind::InvalidEscape, escape_start)),
        }

        Ok(())
    }

    fn hex_digit(&mut self, escape_start: usize) -> Result<u32, ParseError> {
        let digit = self
            .peek_byte(0)
            .and_then(|c| char::from(c).to_digit(16))
            .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape, escape_start))?;
        self.pos += 1;
        Ok(digit)
    }

    fn skip_digits(&mut self) {
        while self.peek_byte(0).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn read_number(&mut self) -> Result<Scalar, ParseError> {
        let start = self.pos;

        if self.data[start] == b'0' && matches!(self.peek_byte(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek_byte(0).is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            self.check_number_end(start)?;

            let digits = &self.data[digits_start..self.pos];
            if digits.is_empty() {
                let literal = self.text[start..self.pos].to_string();
                return Err(self.error(ParseErrorKind::InvalidNumber(literal), start));
            }
            // Hexadecimal integers wrap around modulo 2^64.
            let value = digits.iter().fold(0u64, |acc, &d| {
                let digit = char::from(d).to_digit(16).unwrap_or(0);
                acc.wrapping_mul(16).wrapping_add(u64::from(digit))
            });
            return Ok(Scalar::Integer(value as i64));
        }

        let mut is_float = false;
        self.skip_digits();
        if self.peek_byte(0) == Some(b'.') {
            is_float = true;
            self.pos += 1;
            self.skip_digits();
        }
        if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek_byte(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exponent_start = self.pos;
            self.skip_digits();
            if self.pos == exponent_start {
                self.consume_number_tail();
                let literal = self.text[start..self.pos].to_string();
                return Err(self.error(ParseErrorKind::InvalidNumber(literal), start));
            }
        }
        self.check_number_end(start)?;

        let literal = &self.text[start..self.pos];
        if !is_float {
            // Integers too large for 64 bits fall back to floats.
            if let Ok(i) = literal.parse::<i64>() {
                return Ok(Scalar::Integer(i));
            }
        }
        literal
            .parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| self.error(ParseErrorKind::InvalidNumber(literal.to_string()), start))
    }

    fn consume_number_tail(&mut self) {
        while self.peek_byte(0).is_some_and(|c| is_name_byte(c) || c == b'.') {
            self.pos += 1;
        }
    }

    /// Rejects numbers running straight into a name, like `12abc`.
    fn check_number_end(&mut self, start: usize) -> Result<(), ParseError> {
        if self.peek_byte(0).is_some_and(|c| is_name_byte(c) || c == b'.') {
            self.consume_number_tail();
            let literal = self.text[start..self.pos].to_string();
            return Err(self.error(ParseErrorKind::InvalidNumber(literal), start));
        }
        Ok(())
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while self.peek_byte(0).is_some_and(is_name_byte) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }
}

/// A Lua table key before it is turned into a sequence index or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    fn from_value(value: &LegacyValue) -> Option<Self> {
        match value {
            LegacyValue::Scalar(Scalar::String(s)) => Some(Key::Str(s.clone())),
            LegacyValue::Scalar(Scalar::Integer(i)) => Some(Key::Int(*i)),
            LegacyValue::Scalar(Scalar::Float(f)) if f.is_nan() => None,
            LegacyValue::Scalar(Scalar::Float(f))
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(Key::Int(*f as i64))
            }
            LegacyValue::Scalar(Scalar::Float(f)) => Some(Key::Str(f.to_string())),
            LegacyValue::Scalar(Scalar::Bool(b)) => Some(Key::Str(b.to_string())),
            LegacyValue::Sequence(_) | LegacyValue::Mapping(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Collects the fields of one table constructor.
#[derive(Default)]
struct TableBuilder {
    /// `None` values are fields assigned `nil`.
    entries: IndexMap<Key, Option<LegacyValue>>,
    next_position: i64,
}

impl TableBuilder {
    fn set(&mut self, key: Key, value: Option<LegacyValue>) {
        self.entries.insert(key, value);
    }

    fn push(&mut self, value: Option<LegacyValue>) {
        self.next_position += 1;
        self.set(Key::Int(self.next_position), value);
    }

    fn finish(self) -> LegacyValue {
        let mut entries: Vec<(Key, LegacyValue)> = self
            .entries
            .into_iter()
            .filter_map(|(key, value)| Some((key, value?)))
            .collect();

        // Keys are unique, so `len` keys all within 1..=len are exactly 1..=len.
        let len = entries.len() as u64;
        let is_sequence = entries
            .iter()
            .all(|(key, _)| matches!(key, Key::Int(i) if *i >= 1 && (*i as u64) <= len));
        if is_sequence {
            entries.sort_by_key(|(key, _)| match key {
                Key::Int(i) => *i,
                Key::Str(_) => 0,
            });
            return LegacyValue::Sequence(entries.into_iter().map(|(_, value)| value).collect());
        }

        // `1` and `"1"` are distinct Lua keys but collide once stringified.
        // The later one wins and the earlier one's position is kept.
        LegacyValue::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect::<LegacyTable>(),
        )
    }
}

enum FieldKind {
    /// `[key] = value`
    Bracketed,
    /// `name = value`
    Named,
    /// `value`
    Positional,
}

struct Parser<'a> {
    data: &'a [u8],
    tokens: VecDeque<Spanned>,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.front().map(|t| &t.token)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(1).map(|t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens.front().map_or(self.data.len(), |t| t.offset)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(kind, self.data, self.offset())
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            None => self.error(ParseErrorKind::UnexpectedEof),
            Some(token) => self.error(ParseErrorKind::UnexpectedToken {
                expected,
                found: token.to_string(),
            }),
        }
    }

    fn unexpected_at(&self, token: Token, expected: &'static str, offset: usize) -> ParseError {
        ParseError::at(
            ParseErrorKind::UnexpectedToken {
                expected,
                found: token.to_string(),
            },
            self.data,
            offset,
        )
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        match self.tokens.pop_front() {
            Some(spanned) => Ok(spanned.token),
            None => Err(self.error(ParseErrorKind::UnexpectedEof)),
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.tokens.pop_front();
            true
        } else {
            false
        }
    }

    fn eat_name(&mut self, name: &str) -> bool {
        if matches!(self.peek(), Some(Token::Name(n)) if n == name) {
            self.tokens.pop_front();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), ParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.tokens.pop_front() {
            Some(Spanned {
                token: Token::Name(name),
                ..
            }) => Ok(name),
            Some(Spanned { token, offset }) => Err(self.unexpected_at(token, "a name", offset)),
            None => Err(self.error(ParseErrorKind::UnexpectedEof)),
        }
    }

    fn parse_chunk(&mut self) -> Result<LegacyValue, ParseError> {
        let wrapped = self.eat_name("do");
        if self.eat_name("local") {
            self.expect_name()?;
            self.expect(&Token::Equals, "`=`")?;
        } else {
            self.eat_name("return");
        }

        let offset = self.offset();
        let value = self.parse_value(0)?.ok_or_else(|| {
            self.unexpected_at(Token::Name("nil".to_string()), "a value", offset)
        })?;

        self.eat(&Token::Semicolon);
        if self.eat_name("return") {
            self.expect_name()?;
            self.eat(&Token::Semicolon);
        }
        if wrapped && !self.eat_name("end") {
            return Err(self.unexpected("`end`"));
        }
        if !self.tokens.is_empty() {
            return Err(self.error(ParseErrorKind::TrailingInput));
        }

        Ok(value)
    }

    /// Parses one value. `nil` yields `None`.
    fn parse_value(&mut self, depth: usize) -> Result<Option<LegacyValue>, ParseError> {
        let offset = self.offset();
        let value = match self.bump()? {
            Token::LBrace => self.parse_table(depth + 1, offset)?,
            Token::String(s) => LegacyValue::from(s),
            Token::Name(ref name) if name == "nil" => return Ok(None),
            Token::Name(ref name) if name == "true" => LegacyValue::from(true),
            Token::Name(ref name) if name == "false" => LegacyValue::from(false),
            token @ (Token::Number(_) | Token::Minus | Token::Name(_)) => {
                let numerator = self.parse_number(token, offset)?;
                LegacyValue::Scalar(self.parse_division(numerator)?)
            }
            token => return Err(self.unexpected_at(token, "a value", offset)),
        };
        Ok(Some(value))
    }

    fn parse_number(&mut self, first: Token, offset: usize) -> Result<Scalar, ParseError> {
        let mut token = first;
        let mut offset = offset;
        let mut negate = false;
        while token == Token::Minus {
            negate = !negate;
            offset = self.offset();
            token = self.bump()?;
        }

        let value = match token {
            Token::Number(n) => n,
            Token::Name(ref name) if name == "math" => {
                self.expect(&Token::Dot, "`.`")?;
                if !self.eat_name("huge") {
                    return Err(self.unexpected("`huge`"));
                }
                Scalar::Float(f64::INFINITY)
            }
            token => return Err(self.unexpected_at(token, "a value", offset)),
        };

        if !negate {
            return Ok(value);
        }
        Ok(match value {
            Scalar::Integer(i) => Scalar::Integer(i.wrapping_neg()),
            Scalar::Float(f) => Scalar::Float(-f),
            other => other,
        })
    }

    /// Handles the `0/0` and `1/0` forms used for NaN and infinities.
    fn parse_division(&mut self, numerator: Scalar) -> Result<Scalar, ParseError> {
        if !self.eat(&Token::Slash) {
            return Ok(numerator);
        }
        let offset = self.offset();
        let token = self.bump()?;
        let denominator = self.parse_number(token, offset)?;
        Ok(Scalar::Float(as_f64(&numerator) / as_f64(&denominator)))
    }

    fn parse_table(&mut self, depth: usize, open_offset: usize) -> Result<LegacyValue, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::at(
                ParseErrorKind::TooDeep {
                    limit: self.max_depth,
                },
                self.data,
                open_offset,
            ));
        }

        let mut builder = TableBuilder::default();
        loop {
            if self.eat(&Token::RBrace) {
                break;
            }

            let field = match (self.peek(), self.peek_second()) {
                (Some(Token::LBracket), _) => FieldKind::Bracketed,
                (Some(Token::Name(_)), Some(Token::Equals)) => FieldKind::Named,
                _ => FieldKind::Positional,
            };

            match field {
                FieldKind::Bracketed => {
                    self.bump()?;
                    let key_offset = self.offset();
                    let key = self
                        .parse_value(depth)?
                        .as_ref()
                        .and_then(Key::from_value)
                        .ok_or_else(|| {
                            ParseError::at(ParseErrorKind::InvalidKey, self.data, key_offset)
                        })?;
                    self.expect(&Token::RBracket, "`]`")?;
                    self.expect(&Token::Equals, "`=`")?;
                    let value = self.parse_value(depth)?;
                    builder.set(key, value);
                }
                FieldKind::Named => {
                    let name = self.expect_name()?;
                    self.bump()?;
                    let value = self.parse_value(depth)?;
                    builder.set(Key::Str(name), value);
                }
                FieldKind::Positional => {
                    let value = self.parse_value(depth)?;
                    builder.push(value);
                }
            }

            if self.eat(&Token::Comma) || self.eat(&Token::Semicolon) {
                continue;
            }
            self.expect(&Token::RBrace, "`,`, `;` or `}`")?;
            break;
        }

        Ok(builder.finish())
    }
}

fn as_f64(n: &Scalar) -> f64 {
    match n {
        Scalar::Integer(i) => *i as f64,
        Scalar::Float(f) => *f,
        Scalar::Bool(_) | Scalar::String(_) => f64::NAN,
    }
}

/// Parser for legacy blueprint table text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyParser {
    max_depth: usize,
}

impl LegacyParser {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn from_options(options: &DecodeOptions) -> Self {
        Self::new().with_max_depth(options.max_depth())
    }

    /// Limits how deeply tables may nest.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses `text` into a [LegacyValue].
    ///
    /// Parsing is all-or-nothing: any syntax error fails the whole text.
    pub fn parse(&self, text: &str) -> Result<LegacyValue, ParseError> {
        let tokens = Lexer::new(text).tokenize()?;
        trace!("legacy table text: {} bytes, {} tokens", text.len(), tokens.len());

        let mut parser = Parser {
            data: text.as_bytes(),
            tokens: tokens.into(),
            max_depth: self.max_depth,
        };
        parser.parse_chunk()
    }
}

impl Default for LegacyParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses legacy table text with the default depth limit.
pub fn parse(text: &str) -> Result<LegacyValue, ParseError> {
    LegacyParser::new().parse(text)
}
