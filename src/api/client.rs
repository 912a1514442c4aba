//! Catalog Client Facade
//!
//! The five catalog operations. Each one validates its arguments, builds the
//! query, runs the exchange through the rate limiter and retry policy, then
//! maps or classifies the result:
//!
//! ```text
//! validate -> params -> [acquire permit -> transport]* -> classify | map
//! ```
//!
//! Validation failures return before any network activity. Every failure is
//! logged once here with the operation name and its arguments or request.

use super::classify::classify;
use super::mapper;
use super::params::{build_filter_params, build_random_params, build_search_params, build_set_params};
use super::retry::{retry_within_budget, RetryConfig};
use super::transport::{ApiRequest, HttpTransport, Transport, TransportError, DEFAULT_TIMEOUT};
use super::validators::{
    validate_card_id, validate_filter, validate_random, validate_search, validate_set_query,
    FilterArgs, SetQuery,
};
use crate::config::Config;
use crate::error::ClassifiedError;
use crate::models::{Card, Set};
use crate::rate_limit::RateLimiter;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

/// MTG catalog client
///
/// Safe to share across tasks; the rate limiter is shared by every clone of
/// the `Arc` handed to [`CatalogClient::new`].
#[derive(Debug)]
pub struct CatalogClient<T: Transport = HttpTransport> {
    transport: T,
    limiter: Arc<RateLimiter>,
    retry: RetryConfig,
    request_timeout: Duration,
}

impl CatalogClient<HttpTransport> {
    /// Build an HTTP-backed client from process configuration
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let transport = HttpTransport::with_user_agent(&config.api.base_url, &config.api.user_agent)?
            .with_timeout(config.api.timeout());
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self::new(transport, limiter)
            .with_retry(config.retry.clone())
            .with_request_timeout(config.api.timeout()))
    }
}

impl<T: Transport> CatalogClient<T> {
    /// Create a client over any transport with the default retry policy
    pub fn new(transport: T, limiter: Arc<RateLimiter>) -> Self {
        Self {
            transport,
            limiter,
            retry: RetryConfig::default(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-attempt timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search cards by (partial) name
    pub async fn search_cards(
        &self,
        name: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Card>, ClassifiedError> {
        let query = validate_search(name, limit)
            .map_err(|err| self.reject("search_cards", &(name, limit), err))?;
        let request = ApiRequest::cards(build_search_params(&query));

        let body = self.fetch("search_cards", &request, None).await?;
        let mut cards = self.map("search_cards", &request, mapper::map_cards(&body))?;
        cards.truncate(query.limit as usize);
        Ok(cards)
    }

    /// Fetch one card by identifier
    pub async fn get_card(&self, card_id: &str) -> Result<Card, ClassifiedError> {
        let card_id =
            validate_card_id(card_id).map_err(|err| self.reject("get_card", &card_id, err))?;
        let entity = format!("Card with ID {}", card_id);
        let request = ApiRequest::card(card_id);

        let body = self.fetch("get_card", &request, Some(&entity)).await?;
        match self.map("get_card", &request, mapper::map_card(&body))? {
            Some(card) => Ok(card),
            None => Err(self.fail("get_card", &request, 1, ClassifiedError::not_found(entity))),
        }
    }

    /// Filter cards by attributes; filters combine with AND
    pub async fn filter_cards(&self, args: &FilterArgs) -> Result<Vec<Card>, ClassifiedError> {
        let filter = validate_filter(args).map_err(|err| self.reject("filter_cards", args, err))?;
        let request = ApiRequest::cards(build_filter_params(&filter));

        let body = self.fetch("filter_cards", &request, None).await?;
        let mut cards = self.map("filter_cards", &request, mapper::map_cards(&body))?;
        cards.truncate(filter.limit as usize);
        Ok(cards)
    }

    /// Look up one set by code, or list sets optionally filtered by name
    ///
    /// When `set_code` is given the name filter is ignored and an unknown
    /// code fails with a not-found error.
    pub async fn get_sets(
        &self,
        set_code: Option<&str>,
        name: Option<&str>,
    ) -> Result<Vec<Set>, ClassifiedError> {
        let query = validate_set_query(set_code, name)
            .map_err(|err| self.reject("get_sets", &(set_code, name), err))?;
        match query {
            SetQuery::Code(code) => {
                let entity = format!("Set with code {}", code);
                let request = ApiRequest::set(code);

                let body = self.fetch("get_sets", &request, Some(&entity)).await?;
                match self.map("get_sets", &request, mapper::map_set(&body))? {
                    Some(set) => Ok(vec![set]),
                    None => Err(self.fail("get_sets", &request, 1, ClassifiedError::not_found(entity))),
                }
            }
            SetQuery::Listing { name } => {
                let request = ApiRequest::sets(build_set_params(name.as_deref()));
                let body = self.fetch("get_sets", &request, None).await?;
                self.map("get_sets", &request, mapper::map_sets(&body))
            }
        }
    }

    /// Draw random cards
    pub async fn get_random_cards(&self, count: Option<i64>) -> Result<Vec<Card>, ClassifiedError> {
        let query =
            validate_random(count).map_err(|err| self.reject("get_random_cards", &count, err))?;
        let request = ApiRequest::cards(build_random_params(&query));

        let body = self.fetch("get_random_cards", &request, None).await?;
        let mut cards = self.map("get_random_cards", &request, mapper::map_cards(&body))?;
        cards.truncate(query.count as usize);
        Ok(cards)
    }

    /// Run one request through the limiter and retry policy
    ///
    /// Each attempt is bounded by the request timeout. Attempts and backoff
    /// together are bounded by `request_timeout * max_attempts` plus the total
    /// backoff; time queued at the rate limiter is not counted.
    async fn fetch(
        &self,
        operation: &'static str,
        request: &ApiRequest,
        entity: Option<&str>,
    ) -> Result<Bytes, ClassifiedError> {
        let transport = &self.transport;
        let per_attempt = self.request_timeout;
        let budget = per_attempt
            .saturating_mul(self.retry.max_attempts.max(1))
            .saturating_add(self.retry.total_backoff());

        let outcome = retry_within_budget(
            &self.retry,
            &self.limiter,
            Some(budget),
            move |_attempt| async move {
                match tokio::time::timeout(per_attempt, transport.get(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(per_attempt)),
                }
            },
        )
        .await;

        if let Some(err) = classify(&outcome.result, entity) {
            return Err(self.fail(operation, request, outcome.attempts, err));
        }

        match outcome.result {
            Ok(response) => {
                tracing::debug!(
                    operation,
                    path = %request.path(),
                    status = response.status,
                    attempts = outcome.attempts,
                    "catalog request succeeded"
                );
                Ok(response.body)
            }
            // classify() only passes successes through
            Err(err) => Err(self.fail(
                operation,
                request,
                outcome.attempts,
                ClassifiedError::network(err.to_string(), err.is_timeout()),
            )),
        }
    }

    fn map<V>(
        &self,
        operation: &'static str,
        request: &ApiRequest,
        mapped: Result<V, ClassifiedError>,
    ) -> Result<V, ClassifiedError> {
        mapped.map_err(|err| self.fail(operation, request, 1, err))
    }

    fn reject(
        &self,
        operation: &'static str,
        arguments: &dyn std::fmt::Debug,
        err: ClassifiedError,
    ) -> ClassifiedError {
        tracing::error!(
            operation,
            arguments = ?arguments,
            kind = %err.kind(),
            field = err.field().unwrap_or_default(),
            "{}",
            err
        );
        err
    }

    fn fail(
        &self,
        operation: &'static str,
        request: &ApiRequest,
        attempts: u32,
        err: ClassifiedError,
    ) -> ClassifiedError {
        tracing::error!(
            operation,
            path = %request.path(),
            params = ?request.params(),
            kind = %err.kind(),
            status = err.status_code(),
            attempts,
            detail = err.detail().unwrap_or_default(),
            "{}",
            err
        );
        err
    }
}
