// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/value.rs - Values parsed from legacy blueprint table text.
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

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// A leaf value of a legacy table.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Integer(i) => Value::Number(Number::from(*i)),
            // JSON has no infinities or NaN.
            Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

/// A value in a parsed legacy table.
///
/// Lua has a single table type. The parser splits it in two: tables keyed
/// exactly `1..=n` become a [LegacyValue::Sequence], everything else a
/// [LegacyValue::Mapping].
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyValue {
    Scalar(Scalar),
    Sequence(Vec<LegacyValue>),
    Mapping(LegacyTable),
}

impl LegacyValue {
    pub fn as_table(&self) -> Option<&LegacyTable> {
        match self {
            LegacyValue::Mapping(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[LegacyValue]> {
        match self {
            LegacyValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LegacyValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Short description of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            LegacyValue::Scalar(Scalar::Bool(_)) => "boolean",
            LegacyValue::Scalar(Scalar::Integer(_) | Scalar::Float(_)) => "number",
            LegacyValue::Scalar(Scalar::String(_)) => "string",
            LegacyValue::Sequence(_) => "sequence",
            LegacyValue::Mapping(_) => "table",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            LegacyValue::Scalar(scalar) => scalar.to_json(),
            LegacyValue::Sequence(items) => {
                Value::Array(items.iter().map(LegacyValue::to_json).collect())
            }
            LegacyValue::Mapping(table) => Value::Object(table.to_json()),
        }
    }
}

impl From<bool> for LegacyValue {
    fn from(b: bool) -> Self {
        LegacyValue::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for LegacyValue {
    fn from(i: i64) -> Self {
        LegacyValue::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for LegacyValue {
    fn from(f: f64) -> Self {
        LegacyValue::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for LegacyValue {
    fn from(s: &str) -> Self {
        LegacyValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for LegacyValue {
    fn from(s: String) -> Self {
        LegacyValue::Scalar(Scalar::String(s))
    }
}

impl From<Vec<LegacyValue>> for LegacyValue {
    fn from(items: Vec<LegacyValue>) -> Self {
        LegacyValue::Sequence(items)
    }
}

impl From<LegacyTable> for LegacyValue {
    fn from(table: LegacyTable) -> Self {
        LegacyValue::Mapping(table)
    }
}

/// A string-keyed legacy table, in the order its keys first appeared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyTable {
    entries: IndexMap<String, LegacyValue>,
}

impl LegacyTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LegacyValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets `key`, keeping its original position if it was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: LegacyValue) -> Option<LegacyValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LegacyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, LegacyValue)> for LegacyTable {
    fn from_iter<I: IntoIterator<Item = (K, LegacyValue)>>(iter: I) -> Self {
        let mut table = LegacyTable::new();
        table.entries.extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_position() {
        let mut table = LegacyTable::new();
        table.insert("a", LegacyValue::from(1i64));
        table.insert("b", LegacyValue::from(2i64));
        assert_eq!(table.insert("a", LegacyValue::from(3i64)), Some(LegacyValue::from(1i64)));

        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(table.get("a"), Some(&LegacyValue::from(3i64)));
    }

    #[test]
    fn test_large_table_lookup() {
        let table: LegacyTable = (0..20_000i64)
            .map(|i| (format!("key{}", i), LegacyValue::from(i)))
            .collect();
        assert_eq!(table.len(), 20_000);
        for i in 0..20_000i64 {
            assert_eq!(table.get(&format!("key{}", i)), Some(&LegacyValue::from(i)));
        }
        assert_eq!(table.iter().next().map(|(k, _)| k), Some("key0"));
        assert!(!table.contains_key("key20000"));
    }

    #[test]
    fn test_to_json() {
        let table: LegacyTable = [
            ("name", LegacyValue::from("inserter")),
            (
                "position",
                LegacyValue::from(LegacyTable::from_iter([
                    ("x", LegacyValue::from(1.5f64)),
                    ("y", LegacyValue::from(-2i64)),
                ])),
            ),
            (
                "flags",
                LegacyValue::from(vec![LegacyValue::from(true), LegacyValue::from(false)]),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            LegacyValue::from(table).to_json(),
            json!({"name": "inserter", "position": {"x": 1.5, "y": -2}, "flags": [true, false]})
        );
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(Scalar::Float(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(Scalar::Float(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn test_to_json_preserves_key_order() {
        let table: LegacyTable = [("z", LegacyValue::from(1i64)), ("a", LegacyValue::from(2i64))]
            .into_iter()
            .collect();
        let json = table.to_json();
        let keys: Vec<&String> = json.keys().collect();
        assert_eq!(keys, ["z", "a"]);
    }
}
