//! Request lifecycle and response normalization.
//!
//! [`SearchState`] is the explicit state container for one session:
//!
//! ```text
//!   Idle ──start──▶ Loading ──succeed──▶ Success
//!                      │                    │
//!                      └──fail──▶ Error ◀───┘ (next start re-enters Loading)
//! ```
//!
//! It is only mutated through [`SearchState::start`], [`SearchState::succeed`]
//! and [`SearchState::fail`]. [`Orchestrator`] pairs it with a
//! [`SourcingService`] and gates submits while a request is in flight.
//!
//! # Ordering
//!
//! Gating lives in [`Orchestrator::submit`], not in the state container.
//! A caller that drives `start`/`succeed`/`fail` for overlapping requests
//! gets "last applied wins": the completion applied last overwrites state
//! regardless of issue order. Sequence numbers are tracked and logged but
//! never used to discard a response.

use serde_json::Value;

use crate::client::SourcingService;
use crate::error::SearchError;
use crate::models::{whole_number, Candidate, RequestPayload, SearchResponse};
use crate::rank::{rank, SortKey};

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Results, count, and error message of the current session.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    phase: Phase,
    results: Vec<Candidate>,
    count: u64,
    error: Option<String>,
    issued: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Results of the last successful response (possibly stale after an error).
    pub fn results(&self) -> &[Candidate] {
        &self.results
    }

    /// Total reported by the last successful response.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the most recently started request (0 = none yet).
    pub fn last_issued(&self) -> u64 {
        self.issued
    }

    /// Display order of the current results.
    pub fn ranked(&self, key: SortKey) -> Vec<&Candidate> {
        rank(&self.results, key)
    }

    /// Enter `Loading` for a new request and return its sequence number.
    ///
    /// Clears the error message; results and count are left in place.
    pub fn start(&mut self) -> u64 {
        self.issued += 1;
        self.phase = Phase::Loading;
        self.error = None;
        self.issued
    }

    /// Replace results and count with a successful response.
    pub fn succeed(&mut self, seq: u64, response: SearchResponse) {
        if seq != self.issued {
            tracing::debug!(seq, latest = self.issued, "applying response from an older request");
        }
        self.results = response.results;
        self.count = response.count;
        self.error = None;
        self.phase = Phase::Success;
    }

    /// Record a failure. Results and count from earlier successes are kept.
    pub fn fail(&mut self, seq: u64, err: &SearchError) {
        if seq != self.issued {
            tracing::debug!(seq, latest = self.issued, "applying failure from an older request");
        }
        self.error = Some(err.to_string());
        self.phase = Phase::Error;
    }
}

/// Normalize a successful response body.
///
/// A body that is not JSON at all is an error, so the caller keeps its
/// previous results. Valid JSON of any shape normalizes per
/// [`normalize_value`].
pub fn normalize_response(body: &[u8]) -> Result<SearchResponse, SearchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SearchError::transport(format!("Invalid response from service: {}", e)))?;
    Ok(normalize_value(&value))
}

/// Normalize a parsed response body.
///
/// `results` is the body's `results` array (non-object entries dropped) or
/// empty. `count` is the body's `count` when it is a non-negative whole
/// number (`42` or `42.0`); otherwise it is the number of results kept
/// after dropping, not the raw array length.
pub fn normalize_value(value: &Value) -> SearchResponse {
    let results: Vec<Candidate> = match value.get("results") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::Object(_) => match serde_json::from_value(item.clone()) {
                    Ok(candidate) => Some(candidate),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "dropping undecodable result");
                        None
                    }
                },
                _ => {
                    tracing::warn!(index, "dropping result that is not an object");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    let count = value
        .get("count")
        .and_then(whole_number)
        .unwrap_or(results.len() as u64);

    SearchResponse { count, results }
}

/// Send `payload` to its endpoint and interpret the response.
pub async fn fetch<S>(service: &S, payload: &RequestPayload) -> Result<SearchResponse, SearchError>
where
    S: SourcingService + ?Sized,
{
    let body = serde_json::to_value(payload).map_err(|e| SearchError::transport(e.to_string()))?;
    let response = service.post_json(payload.endpoint(), &body).await?;

    if !response.is_success() {
        return Err(SearchError::from_status(response.status, &response.body));
    }
    normalize_response(&response.body)
}

/// Owns the session state and issues submits against a service.
pub struct Orchestrator<S> {
    service: S,
    state: SearchState,
}

impl<S: SourcingService> Orchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: SearchState::new(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run one request to completion.
    ///
    /// Returns `false` without doing anything if a request is already in
    /// flight. Failures never escape: they land in [`SearchState::error`].
    pub async fn submit(&mut self, payload: &RequestPayload) -> bool {
        if self.state.is_loading() {
            tracing::debug!("submit ignored: request already in flight");
            return false;
        }

        let seq = self.state.start();
        tracing::info!(seq, endpoint = payload.endpoint(), "submitting search");

        match fetch(&self.service, payload).await {
            Ok(response) => {
                tracing::info!(
                    seq,
                    count = response.count,
                    returned = response.results.len(),
                    "search succeeded"
                );
                self.state.succeed(seq, response);
            }
            Err(err) => {
                tracing::warn!(seq, status = ?err.status(), error = %err, "search failed");
                self.state.fail(seq, &err);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RawResponse;
    use crate::models::PlainQuery;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned outcomes and records the requests it saw.
    struct Scripted {
        replies: Mutex<VecDeque<Result<RawResponse, SearchError>>>,
        seen: Mutex<Vec<(String, Value)>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<RawResponse, SearchError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SourcingService for Scripted {
        async fn post_json(
            &self,
            endpoint: &str,
            body: &Value,
        ) -> Result<RawResponse, SearchError> {
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.to_string(), body.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    fn ok(body: Value) -> Result<RawResponse, SearchError> {
        Ok(RawResponse::new(200, body.to_string()))
    }

    fn plain(text: &str) -> RequestPayload {
        RequestPayload::Plain(PlainQuery { text: text.into() })
    }

    #[test]
    fn normalize_null_results() {
        let r = normalize_value(&json!({ "results": null }));
        assert!(r.results.is_empty());
        assert_eq!(r.count, 0);
    }

    #[test]
    fn normalize_keeps_reported_count() {
        let r = normalize_value(&json!({
            "count": 42,
            "results": [{ "login": "a" }, { "login": "b" }]
        }));
        let logins: Vec<_> = r.results.iter().map(|c| c.identity()).collect();
        assert_eq!(logins, vec!["a", "b"]);
        assert_eq!(r.count, 42);
    }

    #[test]
    fn normalize_count_falls_back_to_length() {
        let r = normalize_value(&json!({ "count": "lots", "results": [{ "login": "a" }] }));
        assert_eq!(r.count, 1);
        let r = normalize_value(&json!({ "count": -1, "results": [] }));
        assert_eq!(r.count, 0);
    }

    #[test]
    fn normalize_drops_non_objects() {
        let r = normalize_value(&json!({ "results": [{ "login": "a" }, 7, "b", null] }));
        assert_eq!(r.results.len(), 1);
        assert_eq!(r.count, 1);
    }

    #[test]
    fn normalize_accepts_float_encoded_count() {
        let r = normalize_response(br#"{"count": 42.0, "results": [{"login":"a"},{"login":"b"}]}"#)
            .unwrap();
        assert_eq!(r.count, 42);
        let r = normalize_value(&json!({ "count": 1e2, "results": [] }));
        assert_eq!(r.count, 100);
        let r = normalize_value(&json!({ "count": 2.5, "results": [{ "login": "a" }] }));
        assert_eq!(r.count, 1);
    }

    #[test]
    fn normalize_garbage_body_is_error() {
        let err = normalize_response(b"<html>proxy page</html>").unwrap_err();
        assert!(matches!(err, SearchError::Transport(Some(_))));
        assert!(err.to_string().starts_with("Invalid response from service"));
    }

    #[test]
    fn normalize_json_of_wrong_shape_defaults() {
        let r = normalize_response(b"[1, 2]").unwrap();
        assert_eq!(r, SearchResponse::default());
    }

    #[test]
    fn state_last_applied_wins() {
        let mut state = SearchState::new();
        let first = state.start();
        let second = state.start();
        assert_eq!((first, second), (1, 2));

        state.succeed(
            second,
            normalize_value(&json!({ "results": [{ "login": "newer" }] })),
        );
        state.succeed(
            first,
            normalize_value(&json!({ "results": [{ "login": "older" }] })),
        );
        assert_eq!(state.results()[0].identity(), "older");
        assert_eq!(state.last_issued(), 2);
    }

    #[tokio::test]
    async fn success_replaces_results() {
        let svc = Scripted::new(vec![
            ok(json!({ "count": 3, "results": [{ "login": "a" }] })),
            ok(json!({ "count": 1, "results": [{ "login": "b" }] })),
        ]);
        let mut orch = Orchestrator::new(svc);
        assert_eq!(orch.state().phase(), Phase::Idle);

        assert!(orch.submit(&plain("x")).await);
        assert_eq!(orch.state().phase(), Phase::Success);
        assert_eq!(orch.state().count(), 3);

        assert!(orch.submit(&plain("y")).await);
        assert_eq!(orch.state().results().len(), 1);
        assert_eq!(orch.state().results()[0].identity(), "b");
        assert_eq!(orch.state().count(), 1);
        assert_eq!(orch.state().error(), None);
    }

    #[tokio::test]
    async fn failure_keeps_stale_results() {
        let svc = Scripted::new(vec![
            ok(json!({ "count": 2, "results": [{ "login": "a" }, { "login": "b" }] })),
            Ok(RawResponse::new(503, r#"{"error":"rate limited"}"#)),
        ]);
        let mut orch = Orchestrator::new(svc);
        orch.submit(&plain("x")).await;
        orch.submit(&plain("x")).await;

        let state = orch.state();
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.error(), Some("rate limited"));
        assert_eq!(state.results().len(), 2);
        assert_eq!(state.count(), 2);
    }

    #[tokio::test]
    async fn non_json_success_keeps_previous_results() {
        let svc = Scripted::new(vec![
            ok(json!({ "count": 2, "results": [{ "login": "a" }, { "login": "b" }] })),
            Ok(RawResponse::new(200, "<html>proxy page</html>")),
        ]);
        let mut orch = Orchestrator::new(svc);
        orch.submit(&plain("x")).await;
        orch.submit(&plain("x")).await;

        let state = orch.state();
        assert_eq!(state.phase(), Phase::Error);
        assert!(state.error().unwrap().contains("Invalid response"));
        assert_eq!(state.results().len(), 2);
        assert_eq!(state.count(), 2);
    }

    #[tokio::test]
    async fn unparsable_failure_body_mentions_status() {
        let svc = Scripted::new(vec![Ok(RawResponse::new(500, "<h1>boom</h1>"))]);
        let mut orch = Orchestrator::new(svc);
        orch.submit(&plain("x")).await;
        assert!(orch.state().error().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn transport_failure_then_recovery() {
        let svc = Scripted::new(vec![
            Err(SearchError::Transport(None)),
            ok(json!({ "results": [{ "login": "a" }] })),
        ]);
        let mut orch = Orchestrator::new(svc);

        orch.submit(&plain("x")).await;
        assert_eq!(orch.state().phase(), Phase::Error);
        assert_eq!(orch.state().error(), Some("Something went wrong"));

        orch.submit(&plain("x")).await;
        assert_eq!(orch.state().phase(), Phase::Success);
        assert_eq!(orch.state().error(), None);
        assert_eq!(orch.state().count(), 1);
    }

    #[tokio::test]
    async fn submit_posts_payload_to_mode_endpoint() {
        let svc = Scripted::new(vec![ok(json!({ "results": [] }))]);
        let mut orch = Orchestrator::new(svc);
        orch.submit(&plain("rust devs")).await;

        let seen = orch.service().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "/search-plain");
        assert_eq!(seen[0].1, json!({ "text": "rust devs" }));
    }

    #[tokio::test]
    async fn submit_rejected_while_loading() {
        let svc = Scripted::new(vec![]);
        let mut orch = Orchestrator::new(svc);
        orch.state.start();
        assert!(!orch.submit(&plain("x")).await);
        assert!(orch.service().seen.lock().unwrap().is_empty());
    }
}
