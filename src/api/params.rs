//! Query Parameter Builder
//!
//! Deterministic conversion of validated argument bundles into the query
//! parameters the catalog API expects. Filters combine with AND semantics;
//! parameters the caller did not supply are omitted.

use super::validators::{CardFilter, RandomQuery, SearchQuery};

/// Page size parameter understood by the catalog API
pub const PAGE_SIZE: &str = "pageSize";

/// Ordered query parameters for one outbound request
///
/// Built once per facade call and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    /// Empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.pairs.push((name.to_string(), value.into()));
        self
    }

    fn with_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Value of the named parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parameters for a name search
pub fn build_search_params(query: &SearchQuery) -> QueryParameters {
    QueryParameters::new()
        .with("name", query.name.as_str())
        .with(PAGE_SIZE, query.limit.to_string())
}

/// Parameters for an attribute filter
///
/// Colors are sent comma-separated, which the API treats as "all of".
pub fn build_filter_params(filter: &CardFilter) -> QueryParameters {
    let colors = if filter.colors.is_empty() {
        None
    } else {
        Some(
            filter
                .colors
                .iter()
                .map(|color| color.name())
                .collect::<Vec<_>>()
                .join(","),
        )
    };

    QueryParameters::new()
        .with_opt("colors", colors)
        .with_opt("type", filter.type_line.as_deref())
        .with_opt("cmc", filter.cmc.map(|cmc| cmc.to_string()))
        .with_opt("set", filter.set.as_deref())
        .with_opt("rarity", filter.rarity.as_deref())
        .with(PAGE_SIZE, filter.limit.to_string())
}

/// Parameters for a set listing
pub fn build_set_params(name: Option<&str>) -> QueryParameters {
    QueryParameters::new().with_opt("name", name)
}

/// Parameters for a random draw
pub fn build_random_params(query: &RandomQuery) -> QueryParameters {
    QueryParameters::new()
        .with("random", "true")
        .with(PAGE_SIZE, query.count.to_string())
}
