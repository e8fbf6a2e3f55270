// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for Factorio blueprint string decoding.
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

use std::fmt;
use std::io;

use thiserror::Error;

/// Any error that can occur while turning a blueprint string into a
/// canonical object.
#[derive(Debug, Error)]
pub enum Error {
    /// The string does not start with a recognized format prefix.
    #[error("unknown blueprint string format")]
    UnknownFormat,

    /// The base64 body or the compressed stream is corrupt.
    #[error("failed to decode blueprint string: {0}")]
    Decode(#[from] DecodeError),

    /// The legacy table text is malformed.
    #[error("failed to parse legacy blueprint table: {0}")]
    Parse(#[from] ParseError),

    /// The decoded object cannot be converted to the canonical schema.
    #[error("failed to convert blueprint: {0}")]
    Conversion(#[from] ConversionError),

    /// A canonical object could not be represented as JSON.
    #[error("failed to serialize canonical object: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Compressing a canonical object into a blueprint string failed.
    #[error("failed to encode blueprint string: {0}")]
    Encode(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("corrupt compressed stream: {0}")]
    Decompress(#[source] io::Error),

    /// The decompressed payload exceeded [crate::options::DecodeOptions::max_output_len].
    #[error("decompressed payload exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The specific problem found while parsing legacy table text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedEof,
    UnexpectedChar(char),
    UnterminatedString,
    UnterminatedLongBracket,
    InvalidEscape,
    InvalidNumber(String),
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    /// Table keys must be strings, numbers or booleans.
    InvalidKey,
    TooDeep {
        limit: usize,
    },
    TrailingInput,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {:?}", c),
            ParseErrorKind::UnterminatedString => write!(f, "unterminated string"),
            ParseErrorKind::UnterminatedLongBracket => write!(f, "unterminated long bracket"),
            ParseErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
            ParseErrorKind::InvalidNumber(s) => write!(f, "invalid number {:?}", s),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParseErrorKind::InvalidKey => write!(f, "table keys must be strings, numbers or booleans"),
            ParseErrorKind::TooDeep { limit } => {
                write!(f, "tables nested deeper than {} levels", limit)
            }
            ParseErrorKind::TrailingInput => write!(f, "unexpected input after table"),
        }
    }
}

/// A legacy table parse failure and where it happened.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the table text.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in bytes.
    pub column: usize,
}

impl ParseError {
    pub(crate) fn at(kind: ParseErrorKind, text: &[u8], offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match before.iter().rposition(|&b| b == b'\n') {
            Some(nl) => offset - nl,
            None => offset + 1,
        };

        Self {
            kind,
            offset,
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Conversion only applies to legacy-format data.
    #[error("conversion requires a legacy-format blueprint")]
    NotLegacy,

    #[error("expected a single blueprint, found a blueprint book")]
    IsBook,

    #[error("expected a blueprint book, found a single blueprint")]
    NotBook,

    #[error("field `{field}` is not a table")]
    NotATable { field: String },

    #[error("missing field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` should be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}
