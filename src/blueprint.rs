// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/blueprint.rs - Single entry point for Factorio blueprint strings.
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
 * # `blueprint` Module
 *
 * [Blueprint] decodes a blueprint string once, up front, and hands out the
 * canonical (current-schema) object whichever format the string was in.
 *
 * ## Usage Example
 *
 * ```
 * use fbpcodec::Blueprint;
 * use fbpcodec::decoder::encode_current;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let encoded = encode_current(r#"{"blueprint":{"label":"x"}}"#)?;
 *
 *     let blueprint = Blueprint::from_encoded(&encoded)?;
 *     assert!(blueprint.is_current());
 *     assert!(!blueprint.is_book());
 *
 *     let canonical = blueprint.to_canonical()?;
 *     assert_eq!(canonical["blueprint"]["label"], "x");
 *
 *     Ok(())
 * }
 * ```
 */

use std::str::FromStr;

use log::debug;
use serde_json::Value;

use crate::canonical::Canonical;
use crate::converter;
use crate::decoder::{DecodedBlueprintString, encode_current};
use crate::error::{ConversionError, DecodeError, Error};
use crate::format::Format;
use crate::options::DecodeOptions;
use crate::parser::LegacyParser;
use crate::value::{LegacyTable, LegacyValue};

/// The object carried by a blueprint string, in its own format's schema.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedObject {
    /// A parsed legacy Lua table.
    Legacy(LegacyValue),
    /// A current-schema JSON object.
    Current(Value),
}

impl DecodedObject {
    /// Parses the text of a decoded blueprint string.
    pub fn from_decoded(
        decoded: DecodedBlueprintString,
        options: &DecodeOptions,
    ) -> Result<Self, Error> {
        match decoded {
            DecodedBlueprintString::Legacy(text) => Ok(Self::Legacy(
                LegacyParser::from_options(options).parse(&text)?,
            )),
            DecodedBlueprintString::Current(text) => Ok(Self::Current(
                serde_json::from_str(&text).map_err(DecodeError::Json)?,
            )),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Self::Legacy(_) => Format::Legacy,
            Self::Current(_) => Format::Current,
        }
    }

    /// Whether the object is a blueprint book, judged by its format's keys.
    pub fn is_book(&self) -> bool {
        match self {
            Self::Legacy(value) => value.as_table().is_some_and(converter::is_book),
            Self::Current(value) => value.get("blueprint_book").is_some(),
        }
    }
}

/// A decoded blueprint string.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    encoded: String,
    decoded: DecodedObject,
}

impl Blueprint {
    /// Decodes `encoded` with the default [DecodeOptions].
    pub fn from_encoded(encoded: &str) -> Result<Self, Error> {
        Self::from_encoded_with(encoded, &DecodeOptions::default())
    }

    /// Decodes `encoded`.
    ///
    /// Fails with [Error::UnknownFormat] before any decoding if the prefix is
    /// not recognized.
    pub fn from_encoded_with(encoded: &str, options: &DecodeOptions) -> Result<Self, Error> {
        let decoded = DecodedBlueprintString::with_options(encoded, options)?;
        let format = decoded.format();
        let text_len = decoded.text().len();

        let decoded = DecodedObject::from_decoded(decoded, options)?;
        debug!(
            "decoded {:?} blueprint string: {} encoded bytes, {} decoded bytes",
            format,
            encoded.len(),
            text_len
        );

        Ok(Self {
            encoded: encoded.to_string(),
            decoded,
        })
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn decoded(&self) -> &DecodedObject {
        &self.decoded
    }

    pub fn format(&self) -> Format {
        self.decoded.format()
    }

    pub fn is_legacy(&self) -> bool {
        self.format().is_legacy()
    }

    pub fn is_current(&self) -> bool {
        self.format().is_current()
    }

    pub fn is_book(&self) -> bool {
        self.decoded.is_book()
    }

    fn legacy_table(&self) -> Result<&LegacyTable, ConversionError> {
        match &self.decoded {
            DecodedObject::Legacy(value) => converter::root_table(value),
            DecodedObject::Current(_) => Err(ConversionError::NotLegacy),
        }
    }

    /// See [converter::convert_single_blueprint]. Legacy strings only.
    pub fn convert_single_blueprint(&self) -> Result<Canonical, ConversionError> {
        converter::convert_single_blueprint(self.legacy_table()?)
    }

    /// See [converter::convert_blueprint_book]. Legacy strings only.
    pub fn convert_blueprint_book(&self) -> Result<Canonical, ConversionError> {
        converter::convert_blueprint_book(self.legacy_table()?)
    }

    /// See [converter::convert]. Legacy strings only.
    pub fn convert(&self) -> Result<Canonical, ConversionError> {
        let table = self.legacy_table()?;
        debug!(
            "converting legacy {}",
            if converter::is_book(table) { "blueprint book" } else { "blueprint" }
        );
        converter::convert(table)
    }

    /// Returns the blueprint in the current schema.
    ///
    /// Current-format objects are returned as decoded, without validation.
    /// Legacy objects are converted.
    pub fn to_canonical(&self) -> Result<Value, Error> {
        match &self.decoded {
            DecodedObject::Current(value) => Ok(value.clone()),
            DecodedObject::Legacy(_) => {
                serde_json::to_value(self.convert()?).map_err(Error::Serialize)
            }
        }
    }

    /// Re-encodes the canonical object as a current-format blueprint string.
    pub fn to_current_encoding(&self) -> Result<String, Error> {
        encode_current(&self.to_canonical()?.to_string())
    }
}

impl FromStr for Blueprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_encoded(s)
    }
}
