//! End-to-end tests of the orchestrator against a real HTTP mock service.

mod common;

use candidate_scout::client::HttpSourcingService;
use candidate_scout::coerce::NumericInput;
use candidate_scout::orchestrator::{Orchestrator, Phase};
use candidate_scout::query::{PlainFields, QueryForm, QueryMode, StructuredFields};
use candidate_scout::rank::SortKey;
use serde_json::json;

fn form(query: &str) -> QueryForm {
    QueryForm::new(
        StructuredFields {
            query: query.to_string(),
            min_experience: NumericInput::new("2"),
            max_experience: NumericInput::new(""),
            limit: NumericInput::new("20"),
        },
        PlainFields {
            text: "rust people".to_string(),
        },
    )
}

#[tokio::test]
async fn test_structured_submit_round_trip() {
    let mock = common::spawn_mock().await;
    let mut orch = Orchestrator::new(HttpSourcingService::new(&mock.base_url).unwrap());

    assert!(orch.submit(&form("type:user rust").payload()).await);

    let state = orch.state();
    assert_eq!(state.phase(), Phase::Success);
    assert_eq!(state.count(), 42);
    assert_eq!(state.results().len(), 3);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "/search");
    assert_eq!(
        requests[0].1,
        json!({
            "query": "type:user rust",
            "min_experience": 2,
            "max_experience": null,
            "limit": 20
        })
    );

    let order: Vec<&str> = state
        .ranked(SortKey::Experience)
        .iter()
        .map(|c| c.identity())
        .collect();
    assert_eq!(order, vec!["mona", "octocat", "hubot"]);
}

#[tokio::test]
async fn test_plain_submit_uses_plain_endpoint() {
    let mock = common::spawn_mock().await;
    let mut orch = Orchestrator::new(HttpSourcingService::new(&mock.base_url).unwrap());

    let mut f = form("ignored");
    f.set_mode(QueryMode::Plain);
    orch.submit(&f.payload()).await;

    let requests = mock.requests();
    assert_eq!(requests[0].0, "/search-plain");
    assert_eq!(requests[0].1, json!({ "text": "rust people" }));
}

#[tokio::test]
async fn test_service_error_keeps_previous_results() {
    let mock = common::spawn_mock().await;
    let mut orch = Orchestrator::new(HttpSourcingService::new(&mock.base_url).unwrap());

    orch.submit(&form("type:user").payload()).await;
    assert_eq!(orch.state().results().len(), 3);

    orch.submit(&form("fail please").payload()).await;
    let state = orch.state();
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.error(), Some("rate limited"));
    assert_eq!(state.results().len(), 3);
    assert_eq!(state.count(), 42);
}

#[tokio::test]
async fn test_unparsable_error_body_names_status() {
    let mock = common::spawn_mock().await;
    let mut orch = Orchestrator::new(HttpSourcingService::new(&mock.base_url).unwrap());

    orch.submit(&form("crash").payload()).await;
    let message = orch.state().error().unwrap();
    assert!(message.contains("500"), "unexpected message: {}", message);
}

#[tokio::test]
async fn test_non_json_success_keeps_previous_results() {
    let mock = common::spawn_mock().await;
    let mut orch = Orchestrator::new(HttpSourcingService::new(&mock.base_url).unwrap());

    orch.submit(&form("type:user").payload()).await;
    orch.submit(&form("proxy").payload()).await;

    let state = orch.state();
    assert_eq!(state.phase(), Phase::Error);
    assert!(state.error().unwrap().starts_with("Invalid response from service"));
    assert_eq!(state.results().len(), 3);
    assert_eq!(state.count(), 42);
}

#[tokio::test]
async fn test_null_results_normalize_to_empty() {
    let mock = common::spawn_mock().await;
    let mut orch = Orchestrator::new(HttpSourcingService::new(&mock.base_url).unwrap());

    orch.submit(&form("type:user").payload()).await;
    orch.submit(&form("empty").payload()).await;

    let state = orch.state();
    assert_eq!(state.phase(), Phase::Success);
    assert!(state.results().is_empty());
    assert_eq!(state.count(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_reported() {
    let mut orch = Orchestrator::new(HttpSourcingService::new(&common::dead_origin()).unwrap());
    orch.submit(&form("type:user").payload()).await;
    assert_eq!(orch.state().phase(), Phase::Error);
    assert!(!orch.state().error().unwrap().is_empty());
}
