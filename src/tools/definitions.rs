//! Tool definitions advertised through `tools/list`

use crate::api::validators::{
    FILTER_LIMIT_DEFAULT, FILTER_LIMIT_MAX, RANDOM_COUNT_DEFAULT, RANDOM_COUNT_MAX,
    SEARCH_LIMIT_DEFAULT, SEARCH_LIMIT_MAX,
};
use crate::mcp::protocol::Tool;
use serde_json::json;

pub const SEARCH_CARDS: &str = "search_cards";
pub const GET_CARD: &str = "get_card";
pub const FILTER_CARDS: &str = "filter_cards";
pub const GET_SETS: &str = "get_sets";
pub const GET_RANDOM_CARDS: &str = "get_random_cards";

/// Names of every tool, in advertisement order
pub const TOOL_NAMES: [&str; 5] = [SEARCH_CARDS, GET_CARD, FILTER_CARDS, GET_SETS, GET_RANDOM_CARDS];

/// All tool definitions
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: SEARCH_CARDS.to_string(),
            description: "Search for Magic: The Gathering cards by name with partial matching support"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Card name or partial name to search for"
                    },
                    "limit": {
                        "type": "integer",
                        "description": format!(
                            "Maximum number of results to return (default: {}, max: {})",
                            SEARCH_LIMIT_DEFAULT, SEARCH_LIMIT_MAX
                        ),
                        "minimum": 1,
                        "maximum": SEARCH_LIMIT_MAX,
                        "default": SEARCH_LIMIT_DEFAULT
                    }
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: GET_CARD.to_string(),
            description: "Get detailed information for a specific Magic: The Gathering card by ID"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "card_id": {
                        "type": "string",
                        "description": "Catalog card ID"
                    }
                },
                "required": ["card_id"]
            }),
        },
        Tool {
            name: FILTER_CARDS.to_string(),
            description: "Filter Magic: The Gathering cards by color, type, mana value, set and rarity. \
                          All supplied filters must match."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "colors": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Colors the card must have: W, U, B, R, G (or White, Blue, Black, Red, Green)"
                    },
                    "type": {
                        "type": "string",
                        "description": "Card type (creature, instant, sorcery, etc.)"
                    },
                    "cmc": {
                        "type": "integer",
                        "description": "Converted mana cost",
                        "minimum": 0
                    },
                    "set": {
                        "type": "string",
                        "description": "Set code (e.g., LEA, M10, etc.)"
                    },
                    "rarity": {
                        "type": "string",
                        "description": "Card rarity (Common, Uncommon, Rare, Mythic Rare)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": format!(
                            "Maximum number of results to return (default: {}, max: {})",
                            FILTER_LIMIT_DEFAULT, FILTER_LIMIT_MAX
                        ),
                        "minimum": 1,
                        "maximum": FILTER_LIMIT_MAX,
                        "default": FILTER_LIMIT_DEFAULT
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: GET_SETS.to_string(),
            description: "Look up a Magic: The Gathering set by code, or list sets optionally filtered by name"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "set_code": {
                        "type": "string",
                        "description": "Exact set code (e.g., M10). Takes precedence over name."
                    },
                    "name": {
                        "type": "string",
                        "description": "Set name or partial name"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: GET_RANDOM_CARDS.to_string(),
            description: "Draw random Magic: The Gathering cards".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "count": {
                        "type": "integer",
                        "description": format!(
                            "Number of cards to draw (default: {}, max: {})",
                            RANDOM_COUNT_DEFAULT, RANDOM_COUNT_MAX
                        ),
                        "minimum": 1,
                        "maximum": RANDOM_COUNT_MAX,
                        "default": RANDOM_COUNT_DEFAULT
                    }
                },
                "required": []
            }),
        },
    ]
}
