// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/converter.rs - Legacy to current schema conversion for blueprints.
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
 * # `converter` Module
 *
 * This module converts parsed legacy (0.14) blueprint tables into the
 * current blueprint schema.
 *
 * A legacy single blueprint looks like `{name, icons, entities}`. A legacy
 * book looks like `{type = "blueprint-book", data = {label, active, main}}`,
 * and its entries carry their entities under `tiles`.
 *
 * ## Usage Example
 *
 * ```
 * use fbpcodec::converter;
 * use fbpcodec::parser::parse;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let value = parse(r#"{name="test", icons={}, entities={{name="a"},{name="b"}}}"#)?;
 *     let table = converter::root_table(&value)?;
 *
 *     let canonical = converter::convert(table)?;
 *     let json = serde_json::to_value(&canonical)?;
 *     assert_eq!(json["blueprint"]["label"], "test");
 *     assert_eq!(json["blueprint"]["entities"][1]["entity_number"], 1);
 *
 *     Ok(())
 * }
 * ```
 */

use std::iter;
use std::sync::LazyLock;

use log::trace;
use serde_json::{Map, Value};

use crate::canonical::{
    BookEntry, CANONICAL_VERSION, Canonical, CanonicalBlueprint, CanonicalBlueprintBook, ItemKind,
};
use crate::error::ConversionError;
use crate::value::{LegacyTable, LegacyValue};

/// An empty Lua table parses as an empty sequence, so it doubles as an empty
/// mapping here.
static EMPTY_TABLE: LazyLock<LegacyTable> = LazyLock::new(LegacyTable::new);

fn expect_table<'v>(value: &'v LegacyValue, field: &str) -> Result<&'v LegacyTable, ConversionError> {
    match value {
        LegacyValue::Mapping(table) => Ok(table),
        LegacyValue::Sequence(items) if items.is_empty() => Ok(&*EMPTY_TABLE),
        _ => Err(ConversionError::NotATable {
            field: field.to_string(),
        }),
    }
}

fn required<'v>(table: &'v LegacyTable, field: &str) -> Result<&'v LegacyValue, ConversionError> {
    table.get(field).ok_or_else(|| ConversionError::MissingField {
        field: field.to_string(),
    })
}

fn optional_string(table: &LegacyTable, field: &str) -> Result<Option<String>, ConversionError> {
    match table.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ConversionError::InvalidField {
                field: field.to_string(),
                expected: "a string",
            }),
    }
}

/// Returns the list slot a mapping key came from, if it was a positive
/// integer key.
fn slot(key: &str) -> Option<u64> {
    key.parse::<u64>()
        .ok()
        .filter(|&slot| slot >= 1 && slot.to_string() == key)
}

/// Returns the items of a list in order.
///
/// Lists with holes parse as integer-keyed mappings; their items are taken
/// in ascending key order.
fn ordered_items<'v>(
    value: &'v LegacyValue,
    field: &str,
) -> Result<Vec<&'v LegacyValue>, ConversionError> {
    match value {
        LegacyValue::Sequence(items) => Ok(items.iter().collect()),
        LegacyValue::Mapping(table) => {
            let mut slots = table
                .iter()
                .map(|(key, item)| slot(key).map(|slot| (slot, item)))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| ConversionError::InvalidField {
                    field: field.to_string(),
                    expected: "a list",
                })?;
            slots.sort_by_key(|(slot, _)| *slot);
            Ok(slots.into_iter().map(|(_, item)| item).collect())
        }
        LegacyValue::Scalar(_) => Err(ConversionError::InvalidField {
            field: field.to_string(),
            expected: "a list",
        }),
    }
}

/// Converts legacy entities, numbering them by position.
///
/// Any `entity_number` in the source is discarded.
fn number_entities(value: &LegacyValue, field: &str) -> Result<Vec<Map<String, Value>>, ConversionError> {
    ordered_items(value, field)?
        .into_iter()
        .enumerate()
        .map(|(index, entity)| {
            let entity = expect_table(entity, field)?;
            let mut numbered = Map::with_capacity(entity.len() + 1);
            numbered.insert("entity_number".to_string(), Value::from(index));
            for (key, value) in entity.iter().filter(|(key, _)| *key != "entity_number") {
                numbered.insert(key.to_string(), value.to_json());
            }
            Ok(numbered)
        })
        .collect()
}

/// Returns the root table of a parsed legacy blueprint string.
pub fn root_table(value: &LegacyValue) -> Result<&LegacyTable, ConversionError> {
    expect_table(value, "<root>")
}

/// Whether a legacy table is a blueprint book.
pub fn is_book(table: &LegacyTable) -> bool {
    table.contains_key("book")
        || table.get("type").and_then(LegacyValue::as_str) == Some("blueprint-book")
}

/// Converts a legacy single blueprint (`{name, icons, entities}`).
pub fn convert_single_blueprint(table: &LegacyTable) -> Result<Canonical, ConversionError> {
    if is_book(table) {
        return Err(ConversionError::IsBook);
    }

    let entities = number_entities(required(table, "entities")?, "entities")?;
    trace!("converting single blueprint with {} entities", entities.len());

    Ok(Canonical::Blueprint(CanonicalBlueprint {
        icons: table.get("icons").map(LegacyValue::to_json),
        entities,
        item: ItemKind::Blueprint,
        label: optional_string(table, "name")?,
        version: CANONICAL_VERSION,
    }))
}

/// Converts one entry of a legacy book (`{label, icons, tiles}`).
///
/// Book entries keep their entities under `tiles`, unlike top-level
/// blueprints.
pub fn convert_single_book_entry(entry: &LegacyTable) -> Result<CanonicalBlueprint, ConversionError> {
    Ok(CanonicalBlueprint {
        icons: entry.get("icons").map(LegacyValue::to_json),
        entities: number_entities(required(entry, "tiles")?, "tiles")?,
        item: ItemKind::Blueprint,
        label: optional_string(entry, "label")?,
        version: CANONICAL_VERSION,
    })
}

/// Converts a legacy blueprint book (`{data = {label, active, main}}`).
///
/// The `active` entry always becomes the first blueprint, followed by the
/// `main` entries in order, and `active_index` is always 0.
pub fn convert_blueprint_book(table: &LegacyTable) -> Result<Canonical, ConversionError> {
    if !is_book(table) {
        return Err(ConversionError::NotBook);
    }

    let data = expect_table(required(table, "data")?, "data")?;
    let active = required(data, "active")?;
    let main = ordered_items(required(data, "main")?, "main")?;
    trace!("converting blueprint book with {} main entries", main.len());

    let blueprints = iter::once(active)
        .chain(main)
        .enumerate()
        .map(|(index, entry)| {
            let field = if index == 0 { "active" } else { "main" };
            Ok(BookEntry {
                blueprint: convert_single_book_entry(expect_table(entry, field)?)?,
                index,
            })
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;

    Ok(Canonical::BlueprintBook(CanonicalBlueprintBook {
        blueprints,
        item: ItemKind::BlueprintBook,
        label: optional_string(data, "label")?,
        active_index: 0,
        version: CANONICAL_VERSION,
    }))
}

/// Converts a legacy blueprint or book, whichever `table` is.
pub fn convert(table: &LegacyTable) -> Result<Canonical, ConversionError> {
    if is_book(table) {
        convert_blueprint_book(table)
    } else {
        convert_single_blueprint(table)
    }
}
