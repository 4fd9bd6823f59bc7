use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::plan::TravelStyle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    #[default]
    Recommendation,
    Suggestion,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Recommendation => f.write_str("recommendation"),
            RequestType::Suggestion => f.write_str("suggestion"),
        }
    }
}

/// Body of `POST /api/ai-travel-recommendation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub people: Option<u32>,
    pub style: TravelStyle,
    #[serde(rename = "type", default)]
    pub request_type: RequestType,
}

impl RecommendationRequest {
    pub fn suggestion(style: TravelStyle) -> Self {
        Self {
            destination: None,
            duration: None,
            people: None,
            style,
            request_type: RequestType::Suggestion,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSuggestion {
    pub destination: String,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionList {
    #[serde(default)]
    pub suggestions: Vec<DestinationSuggestion>,
}
