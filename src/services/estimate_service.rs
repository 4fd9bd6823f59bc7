use crate::models::{
    estimate::{ComparisonRow, CostBar, CostCategory, CostSlice, PlanComparison, PlanEstimate},
    plan::{CostBreakdown, TravelPlan},
};

pub struct EstimateService;

impl EstimateService {
    /// Rupiah with dot thousands separators and no decimals, e.g. `Rp 8.000.000`.
    pub fn format_rupiah(amount: f64) -> String {
        let rounded = amount.round();
        let digits = format!("{}", rounded.abs() as u64);

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if rounded < 0.0 {
            format!("-Rp {}", grouped)
        } else {
            format!("Rp {}", grouped)
        }
    }

    /// Pie slices for the non-zero categories, each with its whole-percent share of the total.
    pub fn cost_slices(breakdown: &CostBreakdown) -> Vec<CostSlice> {
        CostCategory::ALL
            .iter()
            .map(|category| (category, category.amount(breakdown)))
            .filter(|(_, value)| *value > 0.0)
            .map(|(category, value)| CostSlice {
                category: *category,
                label: category.label(),
                value,
                formatted: Self::format_rupiah(value),
                percent: share_percent(value, breakdown.total),
            })
            .collect()
    }

    pub fn cost_bars(breakdown: &CostBreakdown) -> Vec<CostBar> {
        Self::cost_slices(breakdown)
            .into_iter()
            .map(|slice| CostBar {
                label: slice.label,
                value_in_million: slice.value / 1_000_000.0,
            })
            .collect()
    }

    pub fn estimate(plan: &TravelPlan) -> PlanEstimate {
        let (slices, bars) = match &plan.cost_breakdown {
            Some(breakdown) => (Self::cost_slices(breakdown), Self::cost_bars(breakdown)),
            None => (Vec::new(), Vec::new()),
        };

        PlanEstimate {
            plan_id: plan.id.clone(),
            destination: plan.destination.clone(),
            has_estimate: plan.cost_breakdown.is_some(),
            total_cost: plan.total_cost,
            formatted_total: Self::format_rupiah(plan.total_cost),
            cost_breakdown: plan.cost_breakdown.clone(),
            slices,
            bars,
        }
    }

    /// Comparison table over plans in the order given. Cheapest and most
    /// expensive only consider plans that carry an estimate.
    pub fn compare(plans: &[TravelPlan]) -> PlanComparison {
        let rows: Vec<ComparisonRow> = plans
            .iter()
            .enumerate()
            .map(|(index, plan)| {
                let breakdown = plan.cost_breakdown.clone().unwrap_or_default();
                ComparisonRow {
                    label: format!("Plan {}", index + 1),
                    plan_id: plan.id.clone(),
                    destination: plan.destination.clone(),
                    duration: plan.duration,
                    people_count: plan.people_count,
                    travel_style: plan.travel_style,
                    has_estimate: plan.cost_breakdown.is_some(),
                    transportation: breakdown.transportation,
                    accommodation: breakdown.accommodation,
                    food: breakdown.food,
                    activities: breakdown.activities,
                    total: plan.total_cost,
                    formatted_total: Self::format_rupiah(plan.total_cost),
                }
            })
            .collect();

        let estimated = || rows.iter().filter(|row| row.has_estimate);
        let cheapest_plan_id = estimated()
            .min_by(|a, b| a.total.total_cmp(&b.total))
            .map(|row| row.plan_id.clone());
        let most_expensive_plan_id = estimated()
            .max_by(|a, b| a.total.total_cmp(&b.total))
            .map(|row| row.plan_id.clone());

        PlanComparison {
            comparable: rows.len() >= 2,
            rows,
            cheapest_plan_id,
            most_expensive_plan_id,
        }
    }
}

fn share_percent(value: f64, total: f64) -> u32 {
    if total <= 0.0 {
        return 0;
    }
    (value / total * 100.0).round() as u32
}
