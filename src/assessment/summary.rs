use std::collections::BTreeMap;

use serde::Serialize;

use crate::programs::ProgramId;

use super::domain::{PoolUsage, Recommendation};

/// Aggregate rollup across all measures in one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentSummary {
    pub total_estimated_cost: u32,
    pub total_incentives: u32,
    pub total_net_cost: u32,
    pub program_totals: Vec<ProgramTotal>,
    pub household_pool: PoolUsage,
    pub site_pool: PoolUsage,
}

/// Dollars and measure count contributed by one program across the
/// assessment. Full-coverage lines are counted at the measure cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramTotal {
    pub program: ProgramId,
    pub program_label: &'static str,
    pub measure_count: usize,
    pub total_amount: u32,
}

impl AssessmentSummary {
    pub fn build(
        recommendations: &[Recommendation],
        household_pool: PoolUsage,
        site_pool: PoolUsage,
    ) -> Self {
        let mut per_program: BTreeMap<ProgramId, (usize, u32)> = BTreeMap::new();

        for recommendation in recommendations {
            let Some(package) = &recommendation.chosen else {
                continue;
            };
            for item in &package.line_items {
                let entry = per_program.entry(item.program).or_default();
                entry.0 += 1;
                entry.1 += item.amount.value_against(recommendation.estimated_cost);
            }
        }

        let program_totals = per_program
            .into_iter()
            .map(|(program, (measure_count, total_amount))| ProgramTotal {
                program,
                program_label: program.label(),
                measure_count,
                total_amount,
            })
            .collect();

        Self {
            total_estimated_cost: recommendations.iter().map(|rec| rec.estimated_cost).sum(),
            total_incentives: recommendations.iter().map(|rec| rec.total_incentives).sum(),
            total_net_cost: recommendations.iter().map(|rec| rec.net_cost).sum(),
            program_totals,
            household_pool,
            site_pool,
        }
    }
}
