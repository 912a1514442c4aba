//! Property-Based Tests for the Catalog Client
//!
//! # Test Strategies
//!
//! - **Validation**: counts are either rejected or land within `1..=ceiling`
//! - **Parameters**: the page size never exceeds the operation ceiling and
//!   unsupplied filters never appear
//! - **Backoff**: delays never decrease and never exceed the cap
//! - **Mapping**: arbitrary bytes never panic the mapper
//!
//! # Running the Tests
//!
//! ```bash
//! cargo test --lib api::proptests
//! ```

use proptest::prelude::*;
use std::time::Duration;

use crate::api::mapper::{map_cards, map_sets};
use crate::api::params::{build_filter_params, build_random_params, build_search_params, PAGE_SIZE};
use crate::api::retry::RetryConfig;
use crate::api::validators::{
    validate_filter, validate_random, validate_search, FilterArgs, FILTER_LIMIT_MAX,
    RANDOM_COUNT_MAX, SEARCH_LIMIT_MAX,
};
use crate::error::ErrorKind;

fn arb_color() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("W".to_string()),
        Just("u".to_string()),
        Just("Black".to_string()),
        Just("red".to_string()),
        Just("G".to_string()),
    ]
}

proptest! {
    #[test]
    fn prop_search_limit_within_ceiling(limit in any::<i64>()) {
        match validate_search("Bolt", Some(limit)) {
            Ok(query) => {
                prop_assert!(limit > 0);
                prop_assert!(query.limit >= 1 && query.limit <= SEARCH_LIMIT_MAX);

                let params = build_search_params(&query);
                let page_size: u32 = params.get(PAGE_SIZE).unwrap().parse().unwrap();
                prop_assert!(page_size <= SEARCH_LIMIT_MAX);
            }
            Err(err) => {
                prop_assert!(limit <= 0);
                prop_assert_eq!(err.kind(), ErrorKind::Validation);
                prop_assert_eq!(err.field(), Some("limit"));
            }
        }
    }

    #[test]
    fn prop_random_count_within_ceiling(count in 1i64..10_000) {
        let query = validate_random(Some(count)).unwrap();
        prop_assert_eq!(i64::from(query.count), count.min(i64::from(RANDOM_COUNT_MAX)));

        let params = build_random_params(&query);
        prop_assert_eq!(params.get("random"), Some("true"));
    }

    #[test]
    fn prop_blank_names_rejected(name in "[ \t\n]*") {
        let err = validate_search(&name, None).unwrap_err();
        prop_assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn prop_filter_params_only_supplied(
        colors in prop::option::of(prop::collection::vec(arb_color(), 0..5)),
        cmc in prop::option::of(0i64..20),
        limit in prop::option::of(1i64..500)
    ) {
        let mut args = FilterArgs::new();
        if let Some(colors) = colors.clone() {
            args = args.colors(colors);
        }
        if let Some(cmc) = cmc {
            args = args.cmc(cmc);
        }
        if let Some(limit) = limit {
            args = args.limit(limit);
        }

        let filter = validate_filter(&args).unwrap();
        let params = build_filter_params(&filter);

        let has_colors = colors.map(|c| !c.is_empty()).unwrap_or(false);
        prop_assert_eq!(params.get("colors").is_some(), has_colors);
        prop_assert_eq!(params.get("cmc").is_some(), cmc.is_some());
        prop_assert!(params.get("type").is_none());
        prop_assert!(params.get("set").is_none());

        let page_size: u32 = params.get(PAGE_SIZE).unwrap().parse().unwrap();
        prop_assert!(page_size >= 1 && page_size <= FILTER_LIMIT_MAX);
    }

    #[test]
    fn prop_backoff_monotonic_and_capped(
        base_ms in 1u64..2_000,
        max_ms in 1u64..60_000,
        attempt in 0u32..64
    ) {
        let config = RetryConfig::default()
            .base_delay(Duration::from_millis(base_ms))
            .max_delay(Duration::from_millis(max_ms));

        let current = config.calculate_delay(attempt);
        let next = config.calculate_delay(attempt + 1);
        prop_assert!(next >= current);
        prop_assert!(next <= Duration::from_millis(max_ms));
    }

    #[test]
    fn prop_mapper_never_panics(body in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = map_cards(&body);
        let _ = map_sets(&body);
    }
}
