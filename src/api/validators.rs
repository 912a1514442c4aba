//! Argument Validation
//!
//! Pure checks run before any network call. Each validator turns raw tool
//! arguments into a validated bundle or fails with a validation error naming
//! the offending field.
//!
//! # Rules
//!
//! - Name and identifier strings must be non-empty after trimming
//! - `limit`/`count` must be positive; values above the operation ceiling are
//!   clamped to the ceiling, zero and negative values are rejected
//! - Colors must come from the `W U B R G` alphabet (full names accepted)
//! - Blank optional filters count as not supplied

use crate::error::ClassifiedError;
use crate::models::Color;
use std::collections::BTreeSet;

/// Default and maximum result counts per operation
pub const SEARCH_LIMIT_DEFAULT: u32 = 10;
pub const SEARCH_LIMIT_MAX: u32 = 50;
pub const FILTER_LIMIT_DEFAULT: u32 = 20;
pub const FILTER_LIMIT_MAX: u32 = 100;
pub const RANDOM_COUNT_DEFAULT: u32 = 1;
pub const RANDOM_COUNT_MAX: u32 = 10;

/// Validated `search_cards` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub limit: u32,
}

/// Raw `filter_cards` arguments as received from the tool caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    pub colors: Option<Vec<String>>,
    pub type_line: Option<String>,
    pub cmc: Option<i64>,
    pub set: Option<String>,
    pub rarity: Option<String>,
    pub limit: Option<i64>,
}

impl FilterArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = Some(type_line.into());
        self
    }

    pub fn cmc(mut self, cmc: i64) -> Self {
        self.cmc = Some(cmc);
        self
    }

    pub fn set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }

    pub fn rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Validated `filter_cards` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFilter {
    pub colors: BTreeSet<Color>,
    pub type_line: Option<String>,
    pub cmc: Option<u32>,
    pub set: Option<String>,
    pub rarity: Option<String>,
    pub limit: u32,
}

impl CardFilter {
    /// Whether any restricting filter was supplied
    pub fn has_filters(&self) -> bool {
        !self.colors.is_empty()
            || self.type_line.is_some()
            || self.cmc.is_some()
            || self.set.is_some()
            || self.rarity.is_some()
    }
}

/// Validated `get_sets` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetQuery {
    /// Exact lookup by set code
    Code(String),
    /// Listing, optionally filtered by name
    Listing { name: Option<String> },
}

/// Validated `get_random_cards` arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomQuery {
    pub count: u32,
}

/// Validate `search_cards` arguments
pub fn validate_search(name: &str, limit: Option<i64>) -> Result<SearchQuery, ClassifiedError> {
    Ok(SearchQuery {
        name: require_text("name", name)?,
        limit: bounded_count("limit", limit, SEARCH_LIMIT_DEFAULT, SEARCH_LIMIT_MAX)?,
    })
}

/// Validate a card identifier
pub fn validate_card_id(card_id: &str) -> Result<String, ClassifiedError> {
    require_text("card_id", card_id)
}

/// Validate `filter_cards` arguments
pub fn validate_filter(args: &FilterArgs) -> Result<CardFilter, ClassifiedError> {
    let colors = match &args.colors {
        Some(values) => parse_colors(values)?,
        None => BTreeSet::new(),
    };

    let cmc = match args.cmc {
        Some(value) if value < 0 => {
            return Err(ClassifiedError::validation(
                "cmc",
                "must be a non-negative integer",
            ))
        }
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            ClassifiedError::validation("cmc", "is too large")
        })?),
        None => None,
    };

    Ok(CardFilter {
        colors,
        type_line: optional_text(args.type_line.as_deref()),
        cmc,
        set: optional_text(args.set.as_deref()),
        rarity: optional_text(args.rarity.as_deref()),
        limit: bounded_count("limit", args.limit, FILTER_LIMIT_DEFAULT, FILTER_LIMIT_MAX)?,
    })
}

/// Validate `get_sets` arguments
///
/// A supplied set code selects exact lookup and must not be blank.
pub fn validate_set_query(
    set_code: Option<&str>,
    name: Option<&str>,
) -> Result<SetQuery, ClassifiedError> {
    match set_code {
        Some(code) => Ok(SetQuery::Code(require_text("set_code", code)?)),
        None => Ok(SetQuery::Listing {
            name: optional_text(name),
        }),
    }
}

/// Validate `get_random_cards` arguments
pub fn validate_random(count: Option<i64>) -> Result<RandomQuery, ClassifiedError> {
    Ok(RandomQuery {
        count: bounded_count("count", count, RANDOM_COUNT_DEFAULT, RANDOM_COUNT_MAX)?,
    })
}

fn require_text(field: &str, value: &str) -> Result<String, ClassifiedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClassifiedError::validation(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Apply the default, reject non-positive values, clamp to the ceiling
fn bounded_count(
    field: &str,
    value: Option<i64>,
    default: u32,
    ceiling: u32,
) -> Result<u32, ClassifiedError> {
    let Some(value) = value else {
        return Ok(default);
    };

    if value <= 0 {
        return Err(ClassifiedError::validation(
            field,
            "must be a positive integer",
        ));
    }

    if value > i64::from(ceiling) {
        tracing::debug!(field, requested = value, ceiling, "clamping to ceiling");
        return Ok(ceiling);
    }

    // value is in 1..=ceiling here
    Ok(value as u32)
}

fn parse_colors(values: &[String]) -> Result<BTreeSet<Color>, ClassifiedError> {
    values
        .iter()
        .map(|value| {
            value.parse::<Color>().map_err(|_| {
                ClassifiedError::validation(
                    "colors",
                    format!("'{}' is not one of W, U, B, R, G", value),
                )
            })
        })
        .collect()
}
