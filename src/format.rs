// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/format.rs - Blueprint string format detection.
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

use crate::error::Error;

/// Base64 of the gzip header written by the 0.14 game client.
pub const LEGACY_PREFIX: &str = "H4sIAAAAAAAA/";

/// Version byte that starts every 0.15+ blueprint string.
pub const CURRENT_PREFIX: char = '0';

/// The two blueprint string encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Gzip-compressed Lua table text, base64 encoded.
    Legacy,
    /// A `0` version byte followed by zlib-compressed JSON, base64 encoded.
    Current,
}

impl Format {
    /// Identifies the format of `text` by its literal prefix.
    ///
    /// Only the prefix is inspected. Anything that matches neither prefix,
    /// including the empty string, is [Error::UnknownFormat].
    pub fn classify(text: &str) -> Result<Self, Error> {
        if text.starts_with(LEGACY_PREFIX) {
            Ok(Format::Legacy)
        } else if text.starts_with(CURRENT_PREFIX) {
            Ok(Format::Current)
        } else {
            Err(Error::UnknownFormat)
        }
    }

    pub fn is_legacy(self) -> bool {
        self == Format::Legacy
    }

    pub fn is_current(self) -> bool {
        self == Format::Current
    }
}
