use std::{sync::Arc, time::Duration};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::{error, info, warn};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{
    plan::TravelStyle,
    recommendation::{DestinationSuggestion, RecommendationRequest, SuggestionList},
};
use crate::services::completion_client::{CompletionProvider, PromptPair, ProviderError};
use crate::services::prompts::build_prompt;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(1000),
        }
    }
}

/// Errors surfaced by the recommendation endpoint. Every variant renders as
/// `{error, retry: true}`.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("AI provider API key is not configured")]
    Configuration,
    #[error("Failed to get a recommendation from the AI")]
    Unavailable(#[source] ProviderError),
    #[error("Failed to read the AI recommendation")]
    InvalidReply(#[source] ProviderError),
}

impl ResponseError for RecommendationError {
    fn status_code(&self) -> StatusCode {
        match self {
            RecommendationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string(),
            "retry": true
        }))
    }
}

pub struct RecommendationService {
    provider: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Returns the provider's JSON reply unmodified.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<Value, RecommendationError> {
        let prompt = build_prompt(request).map_err(RecommendationError::InvalidRequest)?;
        self.complete_with_retry(&prompt).await
    }

    pub async fn suggest(&self, style: TravelStyle) -> Result<Vec<DestinationSuggestion>, RecommendationError> {
        let reply = self.recommend(&RecommendationRequest::suggestion(style)).await?;
        let list: SuggestionList = serde_json::from_value(reply)
            .map_err(|e| RecommendationError::InvalidReply(ProviderError::MalformedContent(e)))?;
        Ok(list.suggestions)
    }

    async fn complete_with_retry(&self, prompt: &PromptPair) -> Result<Value, RecommendationError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.provider.complete_json(prompt).await {
                Ok(reply) => {
                    if attempt > 1 {
                        info!("AI provider succeeded on attempt {}", attempt);
                    }
                    return Ok(reply);
                }
                Err(ProviderError::MissingCredential) => {
                    error!("AI provider API key is not configured");
                    return Err(RecommendationError::Configuration);
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "AI provider attempt {}/{} failed: {}",
                        attempt, max_attempts, err
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_retryable() => {
                    match &err {
                        ProviderError::Upstream { status, body } => {
                            error!("AI provider error ({}): {}", status, body)
                        }
                        other => error!("AI provider unreachable: {}", other),
                    }
                    return Err(RecommendationError::Unavailable(err));
                }
                Err(err) => {
                    error!("AI provider reply rejected: {}", err);
                    return Err(RecommendationError::InvalidReply(err));
                }
            }
        }
    }
}
