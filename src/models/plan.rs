use std::fmt;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    #[serde(alias = "hemat")]
    Budget,
    #[serde(alias = "standar")]
    Standard,
    Premium,
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "budget",
            TravelStyle::Standard => "standard",
            TravelStyle::Premium => "premium",
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-category cost decomposition of a trip, in rupiah.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default)]
    pub transportation: f64,
    #[serde(default)]
    pub accommodation: f64,
    #[serde(default)]
    pub food: f64,
    #[serde(default)]
    pub activities: f64,
    #[serde(default)]
    pub total: f64,
}

impl CostBreakdown {
    /// Reads `costBreakdown` out of an AI recommendation blob. Each category
    /// is read on its own; a missing, null or non-numeric one counts as 0.
    pub fn from_recommendation(recommendation: &Value) -> Option<Self> {
        let breakdown = recommendation.get("costBreakdown")?;
        if !breakdown.is_object() {
            return None;
        }

        let amount = |key: &str| breakdown.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        Some(Self {
            transportation: amount("transportation"),
            accommodation: amount("accommodation"),
            food: amount("food"),
            activities: amount("activities"),
            total: amount("total"),
        })
    }
}

/// Form submission for a new plan.
#[derive(Debug, Deserialize)]
pub struct NewTravelPlan {
    pub destination: String,
    pub duration: u32,
    pub people_count: u32,
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub ai_recommendation: Option<Value>,
}

impl NewTravelPlan {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.destination.trim().is_empty() {
            return Err("Destination is required");
        }
        if self.duration == 0 {
            return Err("Duration must be at least one day");
        }
        if self.people_count == 0 {
            return Err("People count must be at least one");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPlan {
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub duration: u32,
    pub people_count: u32,
    pub travel_style: TravelStyle,
    pub ai_recommendation: Option<Value>,
    pub total_cost: f64,
    pub cost_breakdown: Option<CostBreakdown>,
    pub created_at: DateTime<Utc>,
}

impl TravelPlan {
    /// Builds the stored plan. Cost fields come from the attached recommendation;
    /// without one the plan carries a zero total and no breakdown.
    pub fn from_submission(user_id: &str, input: NewTravelPlan, created_at: DateTime<Utc>) -> Self {
        let cost_breakdown = input
            .ai_recommendation
            .as_ref()
            .and_then(CostBreakdown::from_recommendation);
        let total_cost = cost_breakdown.as_ref().map(|b| b.total).unwrap_or(0.0);

        Self {
            id: ObjectId::new().to_hex(),
            user_id: user_id.to_string(),
            destination: input.destination.trim().to_string(),
            duration: input.duration,
            people_count: input.people_count,
            travel_style: input.travel_style,
            ai_recommendation: input.ai_recommendation,
            total_cost,
            cost_breakdown,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(ai_recommendation: Option<Value>) -> NewTravelPlan {
        NewTravelPlan {
            destination: " Bali ".to_string(),
            duration: 3,
            people_count: 2,
            travel_style: TravelStyle::Standard,
            ai_recommendation,
        }
    }

    #[test]
    fn test_plan_without_recommendation_has_zero_cost() {
        let plan = TravelPlan::from_submission("user-1", submission(None), Utc::now());
        assert_eq!(plan.total_cost, 0.0);
        assert!(plan.cost_breakdown.is_none());
        assert_eq!(plan.destination, "Bali");
    }

    #[test]
    fn test_plan_cost_is_derived_from_recommendation() {
        let recommendation = json!({
            "itinerary": [],
            "costBreakdown": {
                "transportation": 2000000,
                "accommodation": 3500000,
                "food": 1500000,
                "activities": 1000000,
                "total": 8000000
            },
            "tips": [],
            "alternatives": []
        });
        let plan = TravelPlan::from_submission("user-1", submission(Some(recommendation)), Utc::now());
        assert_eq!(plan.total_cost, 8_000_000.0);
        let breakdown = plan.cost_breakdown.unwrap();
        assert_eq!(breakdown.accommodation, 3_500_000.0);
        assert!(plan.ai_recommendation.is_some());
    }

    #[test]
    fn test_recommendation_without_breakdown_keeps_zero_cost() {
        let plan = TravelPlan::from_submission(
            "user-1",
            submission(Some(json!({ "tips": ["Bring sunscreen"] }))),
            Utc::now(),
        );
        assert_eq!(plan.total_cost, 0.0);
        assert!(plan.cost_breakdown.is_none());
    }

    #[test]
    fn test_missing_breakdown_fields_default_to_zero() {
        let breakdown =
            CostBreakdown::from_recommendation(&json!({ "costBreakdown": { "food": 50000, "total": 50000 } }))
                .unwrap();
        assert_eq!(breakdown.transportation, 0.0);
        assert_eq!(breakdown.food, 50_000.0);
    }

    #[test]
    fn test_bad_category_only_zeroes_that_category() {
        let recommendation = json!({
            "costBreakdown": {
                "transportation": 2000000,
                "accommodation": 3500000,
                "food": null,
                "activities": "unknown",
                "total": 6500000
            }
        });
        let plan = TravelPlan::from_submission("user-1", submission(Some(recommendation)), Utc::now());
        assert_eq!(plan.total_cost, 6_500_000.0);
        let breakdown = plan.cost_breakdown.unwrap();
        assert_eq!(breakdown.transportation, 2_000_000.0);
        assert_eq!(breakdown.accommodation, 3_500_000.0);
        assert_eq!(breakdown.food, 0.0);
        assert_eq!(breakdown.activities, 0.0);
    }

    #[test]
    fn test_validation_rejects_blank_destination_and_zero_counts() {
        let mut input = submission(None);
        input.destination = "   ".to_string();
        assert!(input.validate().is_err());

        let mut input = submission(None);
        input.duration = 0;
        assert!(input.validate().is_err());

        let mut input = submission(None);
        input.people_count = 0;
        assert!(input.validate().is_err());

        assert!(submission(None).validate().is_ok());
    }

    #[test]
    fn test_travel_style_accepts_local_aliases() {
        let style: TravelStyle = serde_json::from_value(json!("hemat")).unwrap();
        assert_eq!(style, TravelStyle::Budget);
        let style: TravelStyle = serde_json::from_value(json!("standar")).unwrap();
        assert_eq!(style, TravelStyle::Standard);
        assert_eq!(serde_json::to_value(TravelStyle::Premium).unwrap(), json!("premium"));
    }
}
