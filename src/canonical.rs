// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/canonical.rs - Current-schema blueprint and blueprint book objects.
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

use serde::Serialize;
use serde_json::{Map, Value};

/// Version stamped on every converted blueprint and book.
///
/// This identifies the target game version, not a version of this crate.
pub const CANONICAL_VERSION: u64 = 12_345_567_890;

/// The `item` field of a canonical object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    #[serde(rename = "blueprint")]
    Blueprint,
    #[serde(rename = "blueprint-book")]
    BlueprintBook,
}

/// A single blueprint in the current schema.
///
/// Fields serialize in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalBlueprint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<Value>,
    /// Each entity starts with an `entity_number` equal to its position.
    pub entities: Vec<Map<String, Value>>,
    pub item: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub version: u64,
}

/// One slot of a blueprint book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookEntry {
    pub blueprint: CanonicalBlueprint,
    pub index: usize,
}

/// A blueprint book in the current schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalBlueprintBook {
    pub blueprints: Vec<BookEntry>,
    pub item: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub active_index: usize,
    pub version: u64,
}

/// A converted blueprint string: `{"blueprint": ..}` or `{"blueprint_book": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Canonical {
    Blueprint(CanonicalBlueprint),
    BlueprintBook(CanonicalBlueprintBook),
}

impl Canonical {
    pub fn is_book(&self) -> bool {
        matches!(self, Canonical::BlueprintBook(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_blueprint() -> CanonicalBlueprint {
        let entity = json!({"entity_number": 0, "name": "a"});
        CanonicalBlueprint {
            icons: Some(json!([])),
            entities: vec![entity.as_object().cloned().unwrap()],
            item: ItemKind::Blueprint,
            label: Some("test".to_string()),
            version: CANONICAL_VERSION,
        }
    }

    #[test]
    fn test_blueprint_shape() {
        let canonical = Canonical::Blueprint(sample_blueprint());
        assert!(!canonical.is_book());
        assert_eq!(
            serde_json::to_value(&canonical).unwrap(),
            json!({"blueprint": {
                "icons": [],
                "entities": [{"entity_number": 0, "name": "a"}],
                "item": "blueprint",
                "label": "test",
                "version": 12345567890u64
            }})
        );
    }

    #[test]
    fn test_book_shape() {
        let book = CanonicalBlueprintBook {
            blueprints: vec![BookEntry {
                blueprint: sample_blueprint(),
                index: 0,
            }],
            item: ItemKind::BlueprintBook,
            label: None,
            active_index: 0,
            version: CANONICAL_VERSION,
        };
        let canonical = Canonical::BlueprintBook(book);
        assert!(canonical.is_book());

        let json = serde_json::to_value(&canonical).unwrap();
        assert_eq!(json["blueprint_book"]["item"], json!("blueprint-book"));
        assert_eq!(json["blueprint_book"]["active_index"], json!(0));
        assert_eq!(json["blueprint_book"]["blueprints"][0]["index"], json!(0));
        assert!(json["blueprint_book"].get("label").is_none());

        let keys: Vec<&String> = json["blueprint_book"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["blueprints", "item", "active_index", "version"]);
    }

    #[test]
    fn test_missing_optionals_are_omitted() {
        let blueprint = CanonicalBlueprint {
            icons: None,
            label: None,
            ..sample_blueprint()
        };
        let json = serde_json::to_value(Canonical::Blueprint(blueprint)).unwrap();
        let keys: Vec<&String> = json["blueprint"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["entities", "item", "version"]);
    }

    #[test]
    fn test_key_order() {
        let json = serde_json::to_value(Canonical::Blueprint(sample_blueprint())).unwrap();
        let keys: Vec<&String> = json["blueprint"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["icons", "entities", "item", "label", "version"]);
    }
}
