//! The five-color alphabet

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A Magic color, serialized as its single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    /// All colors in WUBRG order
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Single-letter code (`W`, `U`, `B`, `R`, `G`)
    pub fn code(&self) -> &'static str {
        match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
        }
    }

    /// Full color name as the catalog API spells it
    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is neither a color letter nor a color name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color '{0}'")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    /// Accepts letters or names, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Color::ALL
            .into_iter()
            .find(|color| {
                trimmed.eq_ignore_ascii_case(color.code())
                    || trimmed.eq_ignore_ascii_case(color.name())
            })
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}
