use serde::{Deserialize, Serialize};

use super::domain::{IncentiveAmount, IncentiveLineItem};

/// Derived cost figures for one measure's final line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total_incentives: u32,
    pub net_cost: u32,
    pub coverage_percent: u16,
}

/// Pure roll-up of line items against a measure cost.
///
/// Any full-coverage line short-circuits: the whole cost is covered no
/// matter what the numeric lines sum to. Coverage can exceed 100% when gap
/// assurance over-funds a measure; net cost never goes below zero.
pub fn breakdown(estimated_cost: u32, line_items: &[IncentiveLineItem]) -> CostBreakdown {
    if line_items
        .iter()
        .any(|item| item.amount == IncentiveAmount::FullCoverage)
    {
        return CostBreakdown {
            total_incentives: estimated_cost,
            net_cost: 0,
            coverage_percent: 100,
        };
    }

    let total_incentives: u32 = line_items
        .iter()
        .filter_map(|item| item.amount.numeric())
        .sum();

    let net_cost = estimated_cost.saturating_sub(total_incentives);
    let coverage_percent = if estimated_cost > 0 {
        (total_incentives as f64 / estimated_cost as f64 * 100.0).round() as u16
    } else {
        0
    };

    CostBreakdown {
        total_incentives,
        net_cost,
        coverage_percent,
    }
}
