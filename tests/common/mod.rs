//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use mtg_catalog_mcp::api::{ApiRequest, RawResponse, Transport, TransportResult};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Scripted transport: replays queued outcomes, then repeats the fallback
pub struct MockTransport {
    script: Mutex<VecDeque<TransportResult>>,
    fallback: TransportResult,
    delay: Option<Duration>,
    calls: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl MockTransport {
    /// Always answer with `outcome`
    pub fn always(outcome: TransportResult) -> Self {
        Self::scripted(Vec::new(), outcome)
    }

    /// Answer with `script` in order, then `fallback` forever
    pub fn scripted(script: Vec<TransportResult>, fallback: TransportResult) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Take `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &ApiRequest) -> TransportResult {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn json_response(body: Value) -> TransportResult {
    Ok(RawResponse::new(200, body.to_string()))
}

pub fn status(code: u16) -> TransportResult {
    Ok(RawResponse::new(code, ""))
}

pub fn card_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "manaCost": "{R}",
        "cmc": 1.0,
        "colors": ["Red"],
        "colorIdentity": ["R"],
        "type": "Instant",
        "types": ["Instant"],
        "text": "Deals 3 damage to any target.",
        "set": "M10",
        "setName": "Magic 2010",
        "rarity": "Common"
    })
}

pub fn cards_body(count: usize) -> Value {
    let cards: Vec<Value> = (0..count)
        .map(|i| card_json(&format!("id-{}", i), &format!("Card {}", i)))
        .collect();
    json!({ "cards": cards })
}

pub fn bolt_body() -> Value {
    json!({ "cards": [card_json("bolt-1", "Lightning Bolt")] })
}
