//! Tool dispatch and result formatting

mod common;

use common::{bolt_body, card_json, json_response, status, MockTransport};
use mtg_catalog_mcp::api::CatalogClient;
use mtg_catalog_mcp::rate_limit::RateLimiter;
use mtg_catalog_mcp::tools::{ToolHandler, TOOL_NAMES};
use serde_json::json;
use std::sync::Arc;

fn handler(transport: MockTransport) -> ToolHandler<MockTransport> {
    ToolHandler::new(CatalogClient::new(transport, Arc::new(RateLimiter::disabled())))
}

#[tokio::test(start_paused = true)]
async fn search_cards_formats_listing() {
    let handler = handler(MockTransport::always(json_response(bolt_body())));

    let output = handler
        .call("search_cards", json!({ "name": "Lightning Bolt", "limit": 5 }))
        .await;

    assert!(!output.is_error);
    assert!(output.text.starts_with("Found 1 cards matching 'Lightning Bolt':"));
    assert!(output.text.contains("1. **Lightning Bolt**"));
    assert!(output.text.contains("Set: Magic 2010 (M10)"));
}

#[tokio::test(start_paused = true)]
async fn search_cards_reports_empty_result() {
    let handler = handler(MockTransport::always(json_response(json!({ "cards": [] }))));
    let output = handler.call("search_cards", json!({ "name": "Zzyzx" })).await;

    assert!(!output.is_error);
    assert_eq!(output.text, "No cards found matching 'Zzyzx'");
}

#[tokio::test(start_paused = true)]
async fn missing_required_argument_is_validation_error() {
    let handler = handler(MockTransport::always(json_response(bolt_body())));

    let output = handler.call("search_cards", json!({ "limit": 3 })).await;
    assert!(output.is_error);
    assert_eq!(
        output.text,
        "Error (ValidationError): Invalid parameter 'name': is required"
    );

    let output = handler.call("get_card", json!({})).await;
    assert!(output.is_error);
    assert!(output.text.contains("'card_id'"));
    assert_eq!(handler.client().transport().call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wrong_argument_type_names_field() {
    let handler = handler(MockTransport::always(json_response(bolt_body())));

    let output = handler
        .call("filter_cards", json!({ "cmc": "three" }))
        .await;
    assert!(output.is_error);
    assert!(output.text.starts_with("Error (ValidationError): Invalid parameter 'cmc'"));
    assert_eq!(handler.client().transport().call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_fields_are_ignored() {
    let handler = handler(MockTransport::always(json_response(bolt_body())));
    let output = handler
        .call("search_cards", json!({ "name": "Bolt", "format": "modern" }))
        .await;
    assert!(!output.is_error);
}

#[tokio::test(start_paused = true)]
async fn get_card_shows_details() {
    let body = json!({ "card": card_json("bolt-1", "Lightning Bolt") });
    let handler = handler(MockTransport::always(json_response(body)));

    let output = handler.call("get_card", json!({ "card_id": "bolt-1" })).await;

    assert!(!output.is_error);
    assert!(output.text.starts_with("**Lightning Bolt**"));
    assert!(output.text.contains("ID: bolt-1"));
    assert!(output.text.contains("Converted Mana Cost: 1"));
}

#[tokio::test(start_paused = true)]
async fn not_found_is_reported_as_error_output() {
    let handler = handler(MockTransport::always(status(404)));
    let output = handler.call("get_card", json!({ "card_id": "nope" })).await;

    assert!(output.is_error);
    assert_eq!(output.text, "Error (NotFoundError): Card with ID nope not found");
}

#[tokio::test(start_paused = true)]
async fn upstream_outage_is_reported_as_error_output() {
    let handler = handler(MockTransport::always(status(503)));
    let output = handler.call("get_random_cards", json!({ "count": 2 })).await;

    assert!(output.is_error);
    assert!(output.text.starts_with("Error (UpstreamUnavailableError):"));
    assert_eq!(handler.client().transport().call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn filter_cards_passes_filters() {
    let handler = handler(MockTransport::always(json_response(bolt_body())));

    let output = handler
        .call(
            "filter_cards",
            json!({ "colors": ["R"], "type": "Instant", "set": "M10", "limit": 5 }),
        )
        .await;

    assert!(!output.is_error);
    assert!(output.text.starts_with("Found 1 cards matching the specified filters:"));
    assert!(output.text.contains("Colors: Red"));

    let params = handler.client().transport().requests()[0].params().clone();
    assert_eq!(params.get("colors"), Some("Red"));
    assert_eq!(params.get("set"), Some("M10"));
    assert_eq!(params.get("pageSize"), Some("5"));
}

#[tokio::test(start_paused = true)]
async fn get_sets_lists_sets() {
    let body = json!({ "sets": [{ "code": "ZEN", "name": "Zendikar", "block": "Zendikar" }] });
    let handler = handler(MockTransport::always(json_response(body)));

    let output = handler.call("get_sets", json!({ "name": "Zendikar" })).await;
    assert!(!output.is_error);
    assert!(output.text.contains("1. **Zendikar** (ZEN)"));
    assert!(output.text.contains("Block: Zendikar"));
}

#[tokio::test(start_paused = true)]
async fn get_sets_reports_empty_listing() {
    let handler = handler(MockTransport::always(json_response(json!({ "sets": [] }))));
    let output = handler.call("get_sets", json!({ "name": "Nothing" })).await;
    assert_eq!(output.text, "No sets found matching 'Nothing'");
}

#[tokio::test(start_paused = true)]
async fn unknown_tool_is_error_output() {
    let handler = handler(MockTransport::always(json_response(bolt_body())));
    let output = handler.call("delete_cards", json!({})).await;

    assert!(output.is_error);
    assert_eq!(output.text, "Unknown tool: delete_cards");
    assert_eq!(handler.client().transport().call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn every_advertised_tool_dispatches() {
    let handler = handler(MockTransport::always(json_response(json!({}))));
    for name in TOOL_NAMES {
        let output = handler
            .call(name, json!({ "name": "x", "card_id": "x" }))
            .await;
        assert!(!output.text.starts_with("Unknown tool"), "{} not dispatched", name);
    }
}
