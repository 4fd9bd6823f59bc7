use serde::Serialize;

use crate::models::plan::{CostBreakdown, TravelStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Transportation,
    Accommodation,
    Food,
    Activities,
}

impl CostCategory {
    pub const ALL: [CostCategory; 4] = [
        CostCategory::Transportation,
        CostCategory::Accommodation,
        CostCategory::Food,
        CostCategory::Activities,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Transportation => "Transportation",
            CostCategory::Accommodation => "Accommodation",
            CostCategory::Food => "Food",
            CostCategory::Activities => "Activities",
        }
    }

    pub fn amount(&self, breakdown: &CostBreakdown) -> f64 {
        match self {
            CostCategory::Transportation => breakdown.transportation,
            CostCategory::Accommodation => breakdown.accommodation,
            CostCategory::Food => breakdown.food,
            CostCategory::Activities => breakdown.activities,
        }
    }
}

/// One pie-chart slice.
#[derive(Debug, Clone, Serialize)]
pub struct CostSlice {
    pub category: CostCategory,
    pub label: &'static str,
    pub value: f64,
    pub formatted: String,
    pub percent: u32,
}

/// One bar-chart bar, in millions of rupiah.
#[derive(Debug, Clone, Serialize)]
pub struct CostBar {
    pub label: &'static str,
    pub value_in_million: f64,
}

#[derive(Debug, Serialize)]
pub struct PlanEstimate {
    pub plan_id: String,
    pub destination: String,
    pub has_estimate: bool,
    pub total_cost: f64,
    pub formatted_total: String,
    pub cost_breakdown: Option<CostBreakdown>,
    pub slices: Vec<CostSlice>,
    pub bars: Vec<CostBar>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub plan_id: String,
    pub destination: String,
    pub duration: u32,
    pub people_count: u32,
    pub travel_style: TravelStyle,
    pub has_estimate: bool,
    pub transportation: f64,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub total: f64,
    pub formatted_total: String,
}

#[derive(Debug, Serialize)]
pub struct PlanComparison {
    pub comparable: bool,
    pub rows: Vec<ComparisonRow>,
    pub cheapest_plan_id: Option<String>,
    pub most_expensive_plan_id: Option<String>,
}
