//! Set record

use serde::{Deserialize, Serialize};

/// A catalog set (expansion, core set, promo collection, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    /// Set code, e.g. `M10`
    pub code: String,

    pub name: String,

    /// Set type, e.g. `core` or `expansion`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,

    /// Release date as published upstream (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,

    #[serde(default)]
    pub online_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_count: Option<u32>,
}
