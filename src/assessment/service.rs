use serde::Deserialize;
use tracing::info;

use crate::income::{IncomeProfile, IncomeThresholdTable, ThresholdLookupError};
use crate::programs::ProgramRules;

use super::domain::{AssessmentInput, MeasureRequest, ProgramOptOuts};
use super::engine::{Assessment, IncentiveEngine};

/// Service facade composing the engine with the income-threshold table so
/// callers can submit either precomputed income ratios or raw income
/// figures.
pub struct AssessmentService {
    engine: IncentiveEngine,
    thresholds: IncomeThresholdTable,
}

/// Inbound assessment request. Income arrives as explicit ratios or as
/// annual income + county + household size resolved through the table.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub income: Option<IncomeProfile>,
    #[serde(default)]
    pub annual_income: Option<u32>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub household_size: Option<u8>,
    pub measures: Vec<MeasureRequest>,
    #[serde(default)]
    pub opt_outs: ProgramOptOuts,
    #[serde(default)]
    pub no_cost_assurance: bool,
}

/// Error raised while turning a request into an engine input.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(
        "income could not be resolved: supply ami/smi/fpl percentages, or annual income with county and household size"
    )]
    IncompleteIncome,
    #[error(transparent)]
    Thresholds(#[from] ThresholdLookupError),
}

impl AssessmentService {
    pub fn new(rules: ProgramRules, thresholds: IncomeThresholdTable) -> Self {
        Self {
            engine: IncentiveEngine::new(rules),
            thresholds,
        }
    }

    pub fn engine(&self) -> &IncentiveEngine {
        &self.engine
    }

    pub fn assess(&self, request: AssessmentRequest) -> Result<Assessment, AssessmentServiceError> {
        let income = self.resolve_income(&request)?;
        let input = AssessmentInput {
            income,
            measures: request.measures,
            opt_outs: request.opt_outs,
            no_cost_assurance: request.no_cost_assurance,
        };

        let assessment = self.engine.assess(&input);
        info!(
            tier = assessment.tier.label(),
            measures = assessment.recommendations.len(),
            total_incentives = assessment.summary.total_incentives,
            "assessment computed"
        );
        Ok(assessment)
    }

    fn resolve_income(
        &self,
        request: &AssessmentRequest,
    ) -> Result<IncomeProfile, AssessmentServiceError> {
        if let Some(profile) = &request.income {
            return Ok(profile.clone());
        }

        match (
            request.annual_income,
            request.county.as_deref(),
            request.household_size,
        ) {
            (Some(annual_income), Some(county), Some(household_size)) => Ok(self
                .thresholds
                .income_profile(annual_income, county, household_size)?),
            _ => Err(AssessmentServiceError::IncompleteIncome),
        }
    }
}
