// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tests/blueprint.rs - End-to-end tests for blueprint string handling.
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

use std::io::Write;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::{Compression, GzBuilder};
use rstest::rstest;
use serde_json::json;

use fbpcodec::canonical::CANONICAL_VERSION;
use fbpcodec::decoder::encode_current;
use fbpcodec::error::{ConversionError, DecodeError, ParseErrorKind};
use fbpcodec::format::LEGACY_PREFIX;
use fbpcodec::{Blueprint, DecodeOptions, Error, Format};

/// Encodes Lua table text the way the old game client did.
fn legacy(text: &str) -> String {
    let mut encoder = GzBuilder::new()
        .operating_system(255)
        .write(Vec::new(), Compression::new(6));
    encoder.write_all(text.as_bytes()).unwrap();
    STANDARD.encode(encoder.finish().unwrap())
}

const SINGLE: &str = r#"do local _={name="test",icons={},entities={{name="a"},{name="b"}}};return _;end"#;

const BOOK: &str = r#"do local _={
    type="blueprint-book",
    data={
        label="book",
        active={label="A", icons={}, tiles={{name="x"}}},
        main={
            {label="B", tiles={}},
            {label="C", tiles={{name="y"}, {name="z"}}},
        },
    },
};return _;end"#;

#[test]
fn test_fixture_prefix() {
    assert!(legacy(SINGLE).starts_with(LEGACY_PREFIX));
}

#[rstest]
#[case::empty("")]
#[case::json("{\"blueprint\":{}}")]
#[case::bare_base64("eJyrVg==")]
#[case::almost_legacy("H4sIAAAAAAAA")]
fn test_unknown_format(#[case] text: &str) {
    assert!(matches!(Blueprint::from_encoded(text), Err(Error::UnknownFormat)));
}

#[test]
fn test_legacy_single_blueprint() {
    let blueprint = Blueprint::from_encoded(&legacy(SINGLE)).unwrap();
    assert_eq!(blueprint.format(), Format::Legacy);
    assert!(!blueprint.is_book());

    assert_eq!(
        blueprint.to_canonical().unwrap(),
        json!({"blueprint": {
            "icons": [],
            "entities": [
                {"entity_number": 0, "name": "a"},
                {"entity_number": 1, "name": "b"}
            ],
            "item": "blueprint",
            "label": "test",
            "version": CANONICAL_VERSION
        }})
    );
}

#[test]
fn test_legacy_book() {
    let blueprint = Blueprint::from_encoded(&legacy(BOOK)).unwrap();
    assert!(blueprint.is_legacy());
    assert!(blueprint.is_book());

    let canonical = blueprint.to_canonical().unwrap();
    let book = &canonical["blueprint_book"];
    assert_eq!(book["item"], "blueprint-book");
    assert_eq!(book["label"], "book");
    assert_eq!(book["active_index"], 0);
    assert_eq!(book["version"], CANONICAL_VERSION);

    let blueprints = book["blueprints"].as_array().unwrap();
    assert_eq!(blueprints.len(), 3);
    let labels: Vec<&str> = blueprints
        .iter()
        .map(|entry| entry["blueprint"]["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["A", "B", "C"]);
    for (i, entry) in blueprints.iter().enumerate() {
        assert_eq!(entry["index"], i);
    }
    assert_eq!(
        blueprints[2]["blueprint"]["entities"],
        json!([{"entity_number": 0, "name": "y"}, {"entity_number": 1, "name": "z"}])
    );
}

#[test]
fn test_wrong_dispatch() {
    let single = Blueprint::from_encoded(&legacy(SINGLE)).unwrap();
    assert_eq!(single.convert_blueprint_book(), Err(ConversionError::NotBook));

    let book = Blueprint::from_encoded(&legacy(BOOK)).unwrap();
    assert_eq!(book.convert_single_blueprint(), Err(ConversionError::IsBook));
}

#[test]
fn test_missing_entities() {
    let blueprint = Blueprint::from_encoded(&legacy(r#"{name="empty"}"#)).unwrap();
    let err = blueprint.to_canonical().unwrap_err();
    assert!(matches!(
        err,
        Error::Conversion(ConversionError::MissingField { ref field }) if field == "entities"
    ));
}

#[test]
fn test_current_passthrough() {
    let encoded = encode_current(r#"{"blueprint":{"label":"x"}}"#).unwrap();
    assert!(encoded.starts_with('0'));

    let blueprint: Blueprint = encoded.parse().unwrap();
    assert!(blueprint.is_current());
    assert_eq!(blueprint.encoded(), encoded);
    assert_eq!(blueprint.to_canonical().unwrap(), json!({"blueprint": {"label": "x"}}));
}

#[test]
fn test_to_canonical_is_idempotent() {
    for encoded in [legacy(SINGLE), legacy(BOOK)] {
        let blueprint = Blueprint::from_encoded(&encoded).unwrap();
        assert_eq!(blueprint.to_canonical().unwrap(), blueprint.to_canonical().unwrap());
    }
}

#[test]
fn test_current_round_trip() {
    let object = json!({"blueprint_book": {
        "blueprints": [{"blueprint": {"item": "blueprint", "entities": []}, "index": 0}],
        "item": "blueprint-book",
        "active_index": 0,
        "version": 1
    }});
    let encoded = encode_current(&object.to_string()).unwrap();

    let blueprint = Blueprint::from_encoded(&encoded).unwrap();
    assert!(blueprint.is_book());
    assert_eq!(blueprint.to_canonical().unwrap(), object);
}

#[test]
fn test_upgrade_to_current_encoding() {
    let legacy_blueprint = Blueprint::from_encoded(&legacy(BOOK)).unwrap();
    let upgraded = Blueprint::from_encoded(&legacy_blueprint.to_current_encoding().unwrap()).unwrap();

    assert!(upgraded.is_current());
    assert!(upgraded.is_book());
    assert_eq!(
        upgraded.to_canonical().unwrap(),
        legacy_blueprint.to_canonical().unwrap()
    );
}

#[rstest]
#[case::unterminated_table(r#"do local _={entities={{name="a"};return _;end"#)]
#[case::unterminated_string(r#"{name="a}"#)]
#[case::bad_token(r#"{name=@}"#)]
fn test_malformed_legacy_text(#[case] text: &str) {
    let err = Blueprint::from_encoded(&legacy(text)).unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{:?}", err);
}

#[test]
fn test_corrupt_base64() {
    let err = Blueprint::from_encoded("0!!!!").unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Base64(_))));
}

#[test]
fn test_corrupt_legacy_stream() {
    let mut encoded = legacy(SINGLE);
    encoded.truncate(LEGACY_PREFIX.len() + 11);
    let err = Blueprint::from_encoded(&encoded).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "{:?}", err);
}

#[test]
fn test_whitespace_in_body() {
    let encoded = legacy(SINGLE);
    let (head, tail) = encoded.split_at(20);
    let wrapped = format!("{}\n  {}\n", head, tail);

    let blueprint = Blueprint::from_encoded(&wrapped).unwrap();
    assert_eq!(blueprint.to_canonical().unwrap()["blueprint"]["label"], "test");
}

#[test]
fn test_options() {
    let encoded = legacy(SINGLE);

    let small = DecodeOptions::new().with_max_output_len(16);
    let err = Blueprint::from_encoded_with(&encoded, &small).unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::TooLarge { limit: 16 })));

    let shallow = DecodeOptions::new().with_max_depth(1);
    let err = Blueprint::from_encoded_with(&encoded, &shallow).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ref e) if e.kind == ParseErrorKind::TooDeep { limit: 1 }
    ));
}
