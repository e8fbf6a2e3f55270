// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder and converter library for Factorio blueprint strings.
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
 * # `fbpcodec` Crate
 *
 * A library for decoding Factorio blueprint strings and converting them to
 * the current blueprint schema.
 *
 * Two string formats exist. Legacy strings are base64-encoded gzip streams
 * holding Lua table text. Current strings are a `0` followed by
 * base64-encoded zlib-compressed JSON. The pipeline is:
 *
 * 1. [format]: Identifies the format from the string's prefix.
 * 2. [decoder]: Removes the base64 and compression layers.
 * 3. [parser]: Reads legacy Lua table text into a [value::LegacyValue].
 * 4. [converter]: Rewrites legacy objects into the [canonical] schema.
 *
 * [Blueprint] runs all of it.
 *
 * ## Usage Example
 *
 * ```no_run
 * use fbpcodec::Blueprint;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let encoded = std::fs::read_to_string("blueprint.txt")?;
 *
 *     let blueprint = Blueprint::from_encoded(&encoded)?;
 *     println!("legacy: {}, book: {}", blueprint.is_legacy(), blueprint.is_book());
 *
 *     let canonical = blueprint.to_canonical()?;
 *     println!("{}", serde_json::to_string_pretty(&canonical)?);
 *
 *     Ok(())
 * }
 * ```
 */

pub mod blueprint;
pub mod canonical;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod format;
pub mod options;
pub mod parser;
pub mod value;

pub use blueprint::Blueprint;
pub use error::Error;
pub use format::Format;
pub use options::DecodeOptions;
