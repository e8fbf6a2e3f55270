// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/options.rs - Resource limits for blueprint string decoding.
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

/// Default cap on the decompressed payload size.
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 128 * 1024 * 1024;

/// Default cap on legacy table nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits applied while decoding untrusted blueprint strings.
///
/// ```
/// use fbpcodec::options::DecodeOptions;
///
/// let options = DecodeOptions::new()
///     .with_max_output_len(1 << 20)
///     .with_max_depth(32);
///
/// assert_eq!(options.max_output_len(), 1 << 20);
/// assert_eq!(options.max_depth(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_output_len: usize,
    max_depth: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of bytes the compressed stream may expand to.
    pub fn with_max_output_len(mut self, max_output_len: usize) -> Self {
        self.max_output_len = max_output_len;
        self
    }

    /// Maximum nesting depth of legacy tables.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_output_len(&self) -> usize {
        self.max_output_len
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
