use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};

use journeygo_api::models::plan::TravelStyle;
use journeygo_api::models::recommendation::RecommendationRequest;
use journeygo_api::services::completion_client::{CompletionProvider, PromptPair, ProviderError};
use journeygo_api::services::recommendation_service::{
    RecommendationError, RecommendationService, RetryPolicy,
};

/// Replays canned outcomes in order and counts the calls it receives.
struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<Value, ProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<Value, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete_json(&self, _prompt: &PromptPair) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyReply))
    }
}

async fn transport_error() -> ProviderError {
    let err = reqwest::get("http://127.0.0.1:1/")
        .await
        .expect_err("nothing listens on port 1");
    ProviderError::Transport(err)
}

fn upstream_error() -> ProviderError {
    ProviderError::Upstream {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

fn service(provider: Arc<ScriptedProvider>) -> RecommendationService {
    RecommendationService::new(provider, RetryPolicy::with_delay(Duration::from_millis(5)))
}

fn request() -> RecommendationRequest {
    RecommendationRequest {
        destination: Some("Bali".to_string()),
        duration: Some(4),
        people: Some(2),
        style: TravelStyle::Premium,
        request_type: Default::default(),
    }
}

#[tokio::test]
async fn test_transport_failure_then_success_returns_second_reply() {
    let reply = json!({ "destination": "Bali" });
    let provider = ScriptedProvider::new(vec![Err(transport_error().await), Ok(reply.clone())]);

    let result = service(provider.clone()).recommend(&request()).await;

    assert_eq!(result.unwrap(), reply);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_second_attempt_waits_for_retry_delay() {
    let delay = Duration::from_millis(50);
    let reply = json!({ "destination": "Bali" });
    let provider = ScriptedProvider::new(vec![Err(upstream_error()), Ok(reply.clone())]);
    let service = RecommendationService::new(provider.clone(), RetryPolicy::with_delay(delay));

    let started = Instant::now();
    let result = service.recommend(&request()).await;

    assert_eq!(result.unwrap(), reply);
    assert_eq!(provider.calls(), 2);
    assert!(started.elapsed() >= delay);
}

#[tokio::test]
async fn test_first_attempt_success_does_not_wait() {
    let provider = ScriptedProvider::new(vec![Ok(json!({ "destination": "Bali" }))]);
    let service = RecommendationService::new(
        provider.clone(),
        RetryPolicy::with_delay(Duration::from_secs(30)),
    );

    let result = tokio::time::timeout(Duration::from_secs(5), service.recommend(&request())).await;

    assert!(result.expect("no delay before the first attempt").is_ok());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_never_more_than_two_attempts() {
    let provider = ScriptedProvider::new(vec![
        Err(upstream_error()),
        Err(upstream_error()),
        Ok(json!({ "destination": "Bali" })),
    ]);

    let result = service(provider.clone()).recommend(&request()).await;

    assert!(matches!(result, Err(RecommendationError::Unavailable(_))));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_missing_credential_is_not_retried() {
    let provider = ScriptedProvider::new(vec![Err(ProviderError::MissingCredential)]);

    let result = service(provider.clone()).recommend(&request()).await;

    assert!(matches!(result, Err(RecommendationError::Configuration)));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_empty_reply_is_not_retried() {
    let provider = ScriptedProvider::new(vec![Err(ProviderError::EmptyReply)]);

    let result = service(provider.clone()).recommend(&request()).await;

    assert!(matches!(result, Err(RecommendationError::InvalidReply(_))));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_invalid_request_makes_no_calls() {
    let provider = ScriptedProvider::new(vec![]);
    let mut incomplete = request();
    incomplete.people = Some(0);

    let result = service(provider.clone()).recommend(&incomplete).await;

    assert!(matches!(result, Err(RecommendationError::InvalidRequest(_))));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_suggest_parses_destination_list() {
    let provider = ScriptedProvider::new(vec![Ok(json!({
        "suggestions": [
            { "destination": "Raja Ampat", "estimatedCost": 25000000, "duration": 6,
              "reason": "Diving", "highlights": ["Wayag"] }
        ]
    }))]);

    let suggestions = service(provider).suggest(TravelStyle::Premium).await.unwrap();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].destination, "Raja Ampat");
    assert_eq!(suggestions[0].estimated_cost, 25_000_000.0);
}

#[tokio::test]
async fn test_suggest_rejects_reply_without_list_shape() {
    let provider = ScriptedProvider::new(vec![Ok(json!({ "suggestions": "none" }))]);

    let result = service(provider).suggest(TravelStyle::Budget).await;

    assert!(matches!(result, Err(RecommendationError::InvalidReply(_))));
}
