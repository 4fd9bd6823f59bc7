use crate::models::recommendation::{RecommendationRequest, RequestType};
use crate::services::completion_client::PromptPair;

const RECOMMENDATION_SYSTEM_PROMPT: &str = r#"You are a professional AI travel planner who specializes in planning holidays.
All costs are in Indonesian rupiah (IDR).
Answer with JSON using exactly this structure:
{
  "itinerary": [
    {
      "day": 1,
      "activities": [
        {
          "time": "09:00",
          "location": "Place name",
          "activity": "Activity",
          "estimatedCost": 100000
        }
      ]
    }
  ],
  "costBreakdown": {
    "transportation": 2000000,
    "accommodation": 3500000,
    "food": 1500000,
    "activities": 1000000,
    "total": 8000000
  },
  "tips": ["Tip 1", "Tip 2", "Tip 3"],
  "alternatives": [
    {
      "destination": "Destination name",
      "estimatedCost": 5000000,
      "reason": "Why this alternative is worth considering"
    }
  ]
}"#;

const SUGGESTION_SYSTEM_PROMPT: &str = r#"You are an AI assistant that suggests destinations based on the user's preferences.
All costs are in Indonesian rupiah (IDR).
Give 3 destination suggestions as JSON:
{
  "suggestions": [
    {
      "destination": "Destination name",
      "estimatedCost": 5000000,
      "duration": 3,
      "reason": "Why it matches the user's preferences",
      "highlights": ["Highlight 1", "Highlight 2"]
    }
  ]
}"#;

const STYLE_GUIDE: &str = "Travel styles:
- budget: minimal budget, hostels or cheap lodging, local food, public transport
- standard: mid-range budget, 3-star hotels, a mix of restaurants and street stalls, mixed transport
- premium: high budget, 4-5 star hotels, good restaurants, private transport";

/// Builds the fixed prompt pair for a request, rejecting recommendation
/// requests that lack the trip details the prompt needs.
pub fn build_prompt(request: &RecommendationRequest) -> Result<PromptPair, String> {
    match request.request_type {
        RequestType::Recommendation => {
            let destination = request
                .destination
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .ok_or_else(|| "Destination is required".to_string())?;
            let duration = request
                .duration
                .filter(|d| *d > 0)
                .ok_or_else(|| "Duration must be at least one day".to_string())?;
            let people = request
                .people
                .filter(|p| *p > 0)
                .ok_or_else(|| "People count must be at least one".to_string())?;

            Ok(PromptPair {
                system: RECOMMENDATION_SYSTEM_PROMPT.to_string(),
                user: format!(
                    "The user wants a holiday in {} for {} days for {} people, with a {} travel style.\n\n{}\n\nGive a complete recommendation as JSON.",
                    destination, duration, people, request.style, STYLE_GUIDE
                ),
            })
        }
        RequestType::Suggestion => Ok(PromptPair {
            system: SUGGESTION_SYSTEM_PROMPT.to_string(),
            user: format!(
                "The user prefers a {} travel style.\nGive 3 interesting destinations in Indonesia that fit that budget and style.",
                request.style
            ),
        }),
    }
}
