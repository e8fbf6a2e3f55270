// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Base64 and compression layer of Factorio blueprint strings.
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
 * # `decoder` Module
 *
 * Strips the transport encoding off a blueprint string, leaving the text it
 * wraps:
 *
 * - Legacy (0.14) strings are base64 over a gzip stream of Lua table text.
 * - Current (0.15+) strings are a `0` version byte, then base64 over a zlib
 *   stream of JSON text.
 *
 * ## Usage Example
 *
 * ```
 * use fbpcodec::decoder::{DecodedBlueprintString, encode_current};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let encoded = encode_current(r#"{"blueprint":{"label":"x"}}"#)?;
 *
 *     let decoded = DecodedBlueprintString::new(&encoded)?;
 *     assert!(decoded.format().is_current());
 *     assert_eq!(decoded.text(), r#"{"blueprint":{"label":"x"}}"#);
 *
 *     Ok(())
 * }
 * ```
 */

use std::io::prelude::*;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use log::trace;

use crate::error::{DecodeError, Error};
use crate::format::{CURRENT_PREFIX, Format};
use crate::options::DecodeOptions;

/// Standard alphabet, padded on output, padding optional on input.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The game client exports at maximum compression.
const EXPORT_COMPRESSION_LEVEL: u32 = 9;

fn decode_base64(body: &str) -> Result<Vec<u8>, DecodeError> {
    // Pasted strings are often wrapped across lines.
    let compact: Vec<u8> = body
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(BASE64.decode(compact)?)
}

fn decompress<R: Read>(decoder: R, limit: usize) -> Result<String, DecodeError> {
    let mut buffer = Vec::new();
    decoder
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(DecodeError::Decompress)?;
    if buffer.len() > limit {
        return Err(DecodeError::TooLarge { limit });
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Decodes a legacy blueprint string into Lua table text.
///
/// The legacy prefix is part of the gzip header, so the whole string is
/// base64 data.
pub fn decode_legacy(text: &str, options: &DecodeOptions) -> Result<String, Error> {
    let compressed = decode_base64(text)?;
    trace!("legacy payload: {} compressed bytes", compressed.len());
    let table_text = decompress(GzDecoder::new(compressed.as_slice()), options.max_output_len())?;
    Ok(table_text)
}

/// Decodes a current blueprint string into JSON text.
pub fn decode_current(text: &str, options: &DecodeOptions) -> Result<String, Error> {
    let body = text
        .strip_prefix(CURRENT_PREFIX)
        .ok_or(Error::UnknownFormat)?;
    let compressed = decode_base64(body)?;
    trace!("current payload: {} compressed bytes", compressed.len());
    let json_text = decompress(ZlibDecoder::new(compressed.as_slice()), options.max_output_len())?;
    Ok(json_text)
}

/// Encodes JSON text as a current-format blueprint string.
pub fn encode_current(json: &str) -> Result<String, Error> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(EXPORT_COMPRESSION_LEVEL));
    encoder.write_all(json.as_bytes()).map_err(Error::Encode)?;
    let compressed = encoder.finish().map_err(Error::Encode)?;

    let mut encoded = String::with_capacity(1 + compressed.len().div_ceil(3) * 4);
    encoded.push(CURRENT_PREFIX);
    BASE64.encode_string(compressed, &mut encoded);
    Ok(encoded)
}

/// The text carried inside a blueprint string, tagged with its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedBlueprintString {
    /// Lua table text from a legacy string.
    Legacy(String),
    /// JSON text from a current string.
    Current(String),
}

impl DecodedBlueprintString {
    /// Detects the format of `encoded` and decodes it with default limits.
    pub fn new(encoded: &str) -> Result<Self, Error> {
        Self::with_options(encoded, &DecodeOptions::default())
    }

    pub fn with_options(encoded: &str, options: &DecodeOptions) -> Result<Self, Error> {
        match Format::classify(encoded)? {
            Format::Legacy => Ok(Self::Legacy(decode_legacy(encoded, options)?)),
            Format::Current => Ok(Self::Current(decode_current(encoded, options)?)),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Self::Legacy(_) => Format::Legacy,
            Self::Current(_) => Format::Current,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Legacy(text) | Self::Current(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::GzBuilder;

    fn encode_legacy(table_text: &str) -> String {
        let mut encoder = GzBuilder::new()
            .operating_system(255)
            .write(Vec::new(), Compression::new(6));
        encoder.write_all(table_text.as_bytes()).unwrap();
        BASE64.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_legacy_header_matches_prefix() {
        let encoded = encode_legacy("do local _={};return _;end");
        assert!(encoded.starts_with(crate::format::LEGACY_PREFIX));
    }

    #[test]
    fn test_decode_legacy() {
        let table_text = "do local _={name=\"x\",entities={}};return _;end";
        let decoded = DecodedBlueprintString::new(&encode_legacy(table_text)).unwrap();
        assert_eq!(decoded, DecodedBlueprintString::Legacy(table_text.to_string()));
    }

    #[test]
    fn test_decode_current() {
        let json = r#"{"blueprint":{"label":"x"}}"#;
        let decoded = DecodedBlueprintString::new(&encode_current(json).unwrap()).unwrap();
        assert_eq!(decoded.format(), Format::Current);
        assert_eq!(decoded.text(), json);
    }

    #[test]
    fn test_wrapped_lines_are_accepted() {
        let json = r#"{"blueprint":{"label":"a fairly long label to wrap"}}"#;
        let encoded = encode_current(json).unwrap();
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{}\r\n{}\n", head, tail);
        assert_eq!(DecodedBlueprintString::new(&wrapped).unwrap().text(), json);
    }

    #[test]
    fn test_missing_padding_is_accepted() {
        let json = r#"{"blueprint":{}}"#;
        let encoded = encode_current(json).unwrap();
        let unpadded = encoded.trim_end_matches('=');
        assert_eq!(DecodedBlueprintString::new(unpadded).unwrap().text(), json);
    }

    #[test]
    fn test_invalid_base64() {
        let err = DecodedBlueprintString::new("0eNq!!!!").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Base64(_))));
    }

    #[test]
    fn test_corrupt_stream() {
        // Valid base64, but not a zlib stream.
        let encoded = format!("0{}", BASE64.encode(b"definitely not zlib data"));
        let err = DecodedBlueprintString::new(&encoded).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_truncated_legacy_stream() {
        let encoded = encode_legacy("do local _={name=\"truncated\"};return _;end");
        let raw = BASE64.decode(&encoded).unwrap();
        let truncated = BASE64.encode(&raw[..raw.len() - 6]);
        let err = DecodedBlueprintString::new(&truncated).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_output_limit() {
        let json = format!(r#"{{"blueprint":{{"label":"{}"}}}}"#, "a".repeat(4096));
        let encoded = encode_current(&json).unwrap();
        let options = DecodeOptions::new().with_max_output_len(1024);
        let err = DecodedBlueprintString::with_options(&encoded, &options).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::TooLarge { limit: 1024 })));

        let options = DecodeOptions::new().with_max_output_len(json.len());
        assert!(DecodedBlueprintString::with_options(&encoded, &options).is_ok());
    }

    #[test]
    fn test_decode_current_requires_version_byte() {
        let err = decode_current("eNqrVkrKTM5Wsqo2AAA", &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }
}
