//! Card record

use super::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single catalog card
///
/// `id` and `name` are never empty on a card produced by the mapper.
/// Every other attribute is optional upstream and modelled as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Catalog identity
    pub id: String,

    /// Card name
    pub name: String,

    /// Mana cost in symbol notation, e.g. `{1}{R}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,

    /// Converted mana cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_mana_cost: Option<u32>,

    /// Card colors
    #[serde(default)]
    pub colors: BTreeSet<Color>,

    /// Color identity
    #[serde(default)]
    pub color_identity: BTreeSet<Color>,

    /// Full type line, e.g. `Legendary Artifact Creature`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,

    #[serde(default)]
    pub supertypes: Vec<String>,

    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub subtypes: Vec<String>,

    /// Oracle text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_text: Option<String>,

    /// Power (may be non-numeric, e.g. `*`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    /// Toughness (may be non-numeric)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,

    /// Starting loyalty for planeswalkers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Card {
    /// `power/toughness` when both are present
    pub fn power_toughness(&self) -> Option<String> {
        match (&self.power, &self.toughness) {
            (Some(power), Some(toughness)) => Some(format!("{}/{}", power, toughness)),
            _ => None,
        }
    }

    /// Set name with the code in parentheses, e.g. `Magic 2010 (M10)`
    pub fn set_label(&self) -> Option<String> {
        match (&self.set_name, &self.set_code) {
            (Some(name), Some(code)) => Some(format!("{} ({})", name, code)),
            (Some(name), None) => Some(name.clone()),
            (None, Some(code)) => Some(code.clone()),
            (None, None) => None,
        }
    }
}
