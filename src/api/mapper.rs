//! Response Mapping
//!
//! Parses catalog payloads into [`Card`] and [`Set`] records.
//!
//! Collections arrive under a plural key (`cards`, `sets`); a missing or null
//! key is an empty collection. Elements that are not objects or lack a
//! required field (`id`/`name` for cards, `code`/`name` for sets) are skipped
//! with a warning, so one bad element never fails the batch. An optional field
//! of the wrong type is dropped and the element kept. Only a body that is not
//! a JSON object, or a collection that is not an array, is a mapping error.

use crate::error::ClassifiedError;
use crate::models::{Card, Color, Set};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// Card element as published upstream
///
/// Every field decodes leniently: a value of the wrong JSON type is treated
/// as absent instead of failing the element.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCard {
    #[serde(deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(deserialize_with = "text")]
    name: Option<String>,
    #[serde(deserialize_with = "text")]
    mana_cost: Option<String>,
    #[serde(deserialize_with = "number")]
    cmc: Option<f64>,
    #[serde(deserialize_with = "string_list")]
    colors: Option<Vec<String>>,
    #[serde(deserialize_with = "string_list")]
    color_identity: Option<Vec<String>>,
    #[serde(rename = "type", deserialize_with = "text")]
    type_line: Option<String>,
    #[serde(deserialize_with = "string_list")]
    supertypes: Option<Vec<String>>,
    #[serde(deserialize_with = "string_list")]
    types: Option<Vec<String>>,
    #[serde(deserialize_with = "string_list")]
    subtypes: Option<Vec<String>>,
    #[serde(deserialize_with = "text")]
    text: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    power: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    toughness: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    loyalty: Option<String>,
    #[serde(deserialize_with = "text")]
    set: Option<String>,
    #[serde(deserialize_with = "text")]
    set_name: Option<String>,
    #[serde(deserialize_with = "text")]
    rarity: Option<String>,
    #[serde(deserialize_with = "text")]
    image_url: Option<String>,
}

/// Set element as published upstream, decoded as leniently as [`RawCard`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSet {
    #[serde(deserialize_with = "text")]
    code: Option<String>,
    #[serde(deserialize_with = "text")]
    name: Option<String>,
    #[serde(rename = "type", deserialize_with = "text")]
    set_type: Option<String>,
    #[serde(deserialize_with = "text")]
    release_date: Option<String>,
    #[serde(deserialize_with = "text")]
    block: Option<String>,
    #[serde(deserialize_with = "flag")]
    online_only: Option<bool>,
    #[serde(deserialize_with = "number")]
    card_count: Option<f64>,
}

/// Strings only
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Accept strings or numbers (`"3"` or `3`) for text-valued stats
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numbers or numeric strings
fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Arrays, keeping only their string items
fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

/// Map a `{"cards": [...]}` payload
pub fn map_cards(body: &[u8]) -> Result<Vec<Card>, ClassifiedError> {
    let root = parse_root(body)?;
    Ok(collection(&root, "cards")?
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match card_from_value(element) {
            Ok(card) => Some(card),
            Err(reason) => {
                tracing::warn!(index, %reason, "skipping card element");
                None
            }
        })
        .collect())
}

/// Map a `{"card": {...}}` payload; `None` when the key is absent
pub fn map_card(body: &[u8]) -> Result<Option<Card>, ClassifiedError> {
    let root = parse_root(body)?;
    match root.get("card") {
        None | Some(Value::Null) => Ok(None),
        Some(element) => card_from_value(element)
            .map(Some)
            .map_err(|reason| ClassifiedError::mapping(format!("card element: {}", reason))),
    }
}

/// Map a `{"sets": [...]}` payload
pub fn map_sets(body: &[u8]) -> Result<Vec<Set>, ClassifiedError> {
    let root = parse_root(body)?;
    Ok(collection(&root, "sets")?
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match set_from_value(element) {
            Ok(set) => Some(set),
            Err(reason) => {
                tracing::warn!(index, %reason, "skipping set element");
                None
            }
        })
        .collect())
}

/// Map a `{"set": {...}}` payload; `None` when the key is absent
pub fn map_set(body: &[u8]) -> Result<Option<Set>, ClassifiedError> {
    let root = parse_root(body)?;
    match root.get("set") {
        None | Some(Value::Null) => Ok(None),
        Some(element) => set_from_value(element)
            .map(Some)
            .map_err(|reason| ClassifiedError::mapping(format!("set element: {}", reason))),
    }
}

fn parse_root(body: &[u8]) -> Result<serde_json::Map<String, Value>, ClassifiedError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ClassifiedError::mapping(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(ClassifiedError::mapping(format!("invalid JSON: {}", e))),
    }
}

fn collection<'a>(
    root: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a [Value], ClassifiedError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ClassifiedError::mapping(format!(
            "'{}' should be an array, got {}",
            key,
            json_type(other)
        ))),
    }
}

fn card_from_value(element: &Value) -> Result<Card, String> {
    let raw = RawCard::deserialize(element).map_err(|e| e.to_string())?;

    Ok(Card {
        id: required(raw.id, "id")?,
        name: required(raw.name, "name")?,
        mana_cost: raw.mana_cost,
        converted_mana_cost: raw.cmc.and_then(non_negative_whole),
        colors: colors(raw.colors),
        color_identity: colors(raw.color_identity),
        type_line: raw.type_line,
        supertypes: raw.supertypes.unwrap_or_default(),
        types: raw.types.unwrap_or_default(),
        subtypes: raw.subtypes.unwrap_or_default(),
        rules_text: raw.text,
        power: raw.power,
        toughness: raw.toughness,
        loyalty: raw.loyalty,
        set_code: raw.set,
        set_name: raw.set_name,
        rarity: raw.rarity,
        image_url: raw.image_url,
    })
}

fn set_from_value(element: &Value) -> Result<Set, String> {
    let raw = RawSet::deserialize(element).map_err(|e| e.to_string())?;

    Ok(Set {
        code: required(raw.code, "code")?,
        name: required(raw.name, "name")?,
        set_type: raw.set_type,
        release_date: raw.release_date,
        block: raw.block,
        online_only: raw.online_only.unwrap_or(false),
        card_count: raw.card_count.and_then(non_negative_whole),
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("missing required field '{}'", field)),
    }
}

/// Truncate a non-negative finite number to an integer
fn non_negative_whole(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0).then(|| value as u32)
}

fn colors(values: Option<Vec<String>>) -> BTreeSet<Color> {
    values
        .unwrap_or_default()
        .iter()
        .filter_map(|value| match value.parse::<Color>() {
            Ok(color) => Some(color),
            Err(e) => {
                tracing::debug!(%e, "dropping unrecognised color");
                None
            }
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn bolt() -> Value {
        json!({
            "id": "b7c19924-b4bf-56fc-aa73-f586e940bd42",
            "name": "Lightning Bolt",
            "manaCost": "{R}",
            "cmc": 1.0,
            "colors": ["Red"],
            "colorIdentity": ["R"],
            "type": "Instant",
            "types": ["Instant"],
            "text": "Lightning Bolt deals 3 damage to any target.",
            "set": "M10",
            "setName": "Magic 2010",
            "rarity": "Common",
            "imageUrl": "http://gatherer.wizards.com/Handlers/Image.ashx?multiverseid=191089&type=card",
            "multiverseid": "191089",
            "legalities": [{"format": "Modern", "legality": "Legal"}]
        })
    }

    #[test]
    fn test_map_cards_full_element() {
        let body = json!({ "cards": [bolt()] }).to_string();
        let cards = map_cards(body.as_bytes()).unwrap();

        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.mana_cost.as_deref(), Some("{R}"));
        assert_eq!(card.converted_mana_cost, Some(1));
        assert_eq!(card.colors, BTreeSet::from([Color::Red]));
        assert_eq!(card.color_identity, BTreeSet::from([Color::Red]));
        assert_eq!(card.type_line.as_deref(), Some("Instant"));
        assert_eq!(card.set_code.as_deref(), Some("M10"));
        assert_eq!(card.set_name.as_deref(), Some("Magic 2010"));
        assert!(card.power.is_none());
    }

    #[test]
    fn test_missing_collection_is_empty() {
        assert!(map_cards(b"{}").unwrap().is_empty());
        assert!(map_cards(br#"{"cards": null}"#).unwrap().is_empty());
        assert!(map_sets(br#"{"cards": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_skips_elements_missing_required_fields() {
        let body = json!({
            "cards": [
                bolt(),
                {"name": "No Id"},
                {"id": "x", "name": "   "},
                {"id": "y", "name": "Wrong Types", "colors": "Red"},
                {"id": "z", "name": "Shivan Dragon", "power": 5, "toughness": "5"}
            ]
        })
        .to_string();

        let cards = map_cards(body.as_bytes()).unwrap();
        let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lightning Bolt", "Wrong Types", "Shivan Dragon"]);
        assert!(cards[1].colors.is_empty());
        assert_eq!(cards[2].power.as_deref(), Some("5"));
    }

    #[test]
    fn test_wrong_typed_optional_fields_are_dropped() {
        let body = json!({ "cards": [
            "not an object",
            {"id": 42, "name": "Numeric Id", "cmc": "3", "colors": [1, "Red"],
             "setName": 5, "supertypes": "Legendary", "manaCost": ["{R}"]},
            {"id": "2", "name": "Bad Cmc", "cmc": "three", "colorIdentity": {"R": true}},
            {"id": "3", "name": 7}
        ]})
        .to_string();

        let cards = map_cards(body.as_bytes()).unwrap();
        assert_eq!(cards.len(), 2);

        let numeric = &cards[0];
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.converted_mana_cost, Some(3));
        assert_eq!(numeric.colors, BTreeSet::from([Color::Red]));
        assert!(numeric.set_name.is_none());
        assert!(numeric.supertypes.is_empty());
        assert!(numeric.mana_cost.is_none());

        let bad_cmc = &cards[1];
        assert_eq!(bad_cmc.name, "Bad Cmc");
        assert_eq!(bad_cmc.converted_mana_cost, None);
        assert!(bad_cmc.color_identity.is_empty());

        let body = json!({ "sets": [
            {"code": "ZEN", "name": "Zendikar", "onlineOnly": "no", "cardCount": "269"}
        ]})
        .to_string();
        let sets = map_sets(body.as_bytes()).unwrap();
        assert!(!sets[0].online_only);
        assert_eq!(sets[0].card_count, Some(269));
    }

    #[test]
    fn test_mapped_card_survives_serde_round_trip() {
        let body = json!({ "cards": [{
            "id": "5f8287b1-5bb6-5f4c-ad17-316a40d5bb0c",
            "name": "Ajani Goldmane",
            "manaCost": "{2}{W}{W}",
            "cmc": 4,
            "colors": ["White"],
            "colorIdentity": ["W"],
            "type": "Legendary Planeswalker \u{2014} Ajani",
            "supertypes": ["Legendary"],
            "types": ["Planeswalker"],
            "subtypes": ["Ajani"],
            "text": "+1: You gain 2 life.",
            "power": "0",
            "toughness": "0",
            "loyalty": 4,
            "set": "LRW",
            "setName": "Lorwyn",
            "rarity": "Rare",
            "imageUrl": "http://gatherer.wizards.com/Handlers/Image.ashx?multiverseid=140233&type=card"
        }]})
        .to_string();

        let card = map_cards(body.as_bytes()).unwrap().remove(0);
        assert_eq!(card.converted_mana_cost, Some(4));
        assert_eq!(card.supertypes, vec!["Legendary"]);
        assert_eq!(card.subtypes, vec!["Ajani"]);
        assert_eq!(card.power.as_deref(), Some("0"));
        assert_eq!(card.toughness.as_deref(), Some("0"));
        assert_eq!(card.loyalty.as_deref(), Some("4"));
        assert!(card.image_url.is_some());

        let json = serde_json::to_string(&card).unwrap();
        let restored: Card = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id, card.id);
        assert_eq!(restored.name, card.name);
        assert_eq!(restored.mana_cost, card.mana_cost);
        assert_eq!(restored.converted_mana_cost, card.converted_mana_cost);
        assert_eq!(restored.colors, card.colors);
        assert_eq!(restored.color_identity, card.color_identity);
        assert_eq!(restored.type_line, card.type_line);
        assert_eq!(restored.supertypes, card.supertypes);
        assert_eq!(restored.types, card.types);
        assert_eq!(restored.subtypes, card.subtypes);
        assert_eq!(restored.rules_text, card.rules_text);
        assert_eq!(restored.power, card.power);
        assert_eq!(restored.toughness, card.toughness);
        assert_eq!(restored.loyalty, card.loyalty);
        assert_eq!(restored.set_code, card.set_code);
        assert_eq!(restored.set_name, card.set_name);
        assert_eq!(restored.rarity, card.rarity);
        assert_eq!(restored.image_url, card.image_url);
        assert_eq!(restored, card);
    }

    #[test]
    fn test_unparseable_body_is_mapping_error() {
        assert_eq!(map_cards(b"not json").unwrap_err().kind(), ErrorKind::Mapping);
        assert_eq!(map_cards(b"[1, 2]").unwrap_err().kind(), ErrorKind::Mapping);
        assert_eq!(
            map_cards(br#"{"cards": {"id": "1"}}"#).unwrap_err().kind(),
            ErrorKind::Mapping
        );
    }

    #[test]
    fn test_map_single_card() {
        let body = json!({ "card": bolt() }).to_string();
        let card = map_card(body.as_bytes()).unwrap().unwrap();
        assert_eq!(card.id, "b7c19924-b4bf-56fc-aa73-f586e940bd42");

        assert!(map_card(b"{}").unwrap().is_none());
        assert_eq!(
            map_card(br#"{"card": {"name": "nameless"}}"#)
                .unwrap_err()
                .kind(),
            ErrorKind::Mapping
        );
    }

    #[test]
    fn test_cmc_handling() {
        let body = json!({ "cards": [
            {"id": "1", "name": "Half", "cmc": 0.5},
            {"id": "2", "name": "Negative", "cmc": -1},
            {"id": "3", "name": "Seven", "cmc": 7}
        ]})
        .to_string();
        let cards = map_cards(body.as_bytes()).unwrap();
        assert_eq!(cards[0].converted_mana_cost, Some(0));
        assert_eq!(cards[1].converted_mana_cost, None);
        assert_eq!(cards[2].converted_mana_cost, Some(7));
    }

    #[test]
    fn test_unknown_colors_dropped() {
        let body = json!({ "cards": [
            {"id": "1", "name": "Odd", "colors": ["Red", "Purple"], "colorIdentity": ["R", "X"]}
        ]})
        .to_string();
        let cards = map_cards(body.as_bytes()).unwrap();
        assert_eq!(cards[0].colors, BTreeSet::from([Color::Red]));
        assert_eq!(cards[0].color_identity, BTreeSet::from([Color::Red]));
    }

    #[test]
    fn test_map_sets() {
        let body = json!({ "sets": [
            {"code": "LEA", "name": "Limited Edition Alpha", "type": "core",
             "releaseDate": "1993-08-05", "onlineOnly": false, "booster": ["rare"]},
            {"code": "PRM", "name": "Magic Online Promos", "onlineOnly": true, "block": "MTGO"},
            {"name": "Codeless"}
        ]})
        .to_string();

        let sets = map_sets(body.as_bytes()).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].code, "LEA");
        assert_eq!(sets[0].set_type.as_deref(), Some("core"));
        assert_eq!(sets[0].release_date.as_deref(), Some("1993-08-05"));
        assert!(!sets[0].online_only);
        assert!(sets[1].online_only);
        assert_eq!(sets[1].block.as_deref(), Some("MTGO"));
    }

    #[test]
    fn test_map_single_set() {
        let body = json!({ "set": {"code": "M10", "name": "Magic 2010", "cardCount": 249} }).to_string();
        let set = map_set(body.as_bytes()).unwrap().unwrap();
        assert_eq!(set.code, "M10");
        assert_eq!(set.card_count, Some(249));
        assert!(map_set(b"{}").unwrap().is_none());
    }
}
