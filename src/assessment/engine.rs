use serde::Serialize;
use tracing::debug;

use crate::income::IncomeProfile;
use crate::programs::ProgramRules;

use super::allocation::PoolAllocator;
use super::domain::{AssessmentInput, EligibilityTier, Recommendation};
use super::resolver::{PackageResolver, ResolutionOptions};
use super::summary::AssessmentSummary;
use super::{eligibility, selector};

/// Completed assessment: the classified tier, every measure's final
/// recommendation, and the aggregate summary.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub tier: EligibilityTier,
    pub tier_label: &'static str,
    pub recommendations: Vec<Recommendation>,
    pub summary: AssessmentSummary,
}

/// Stateless pipeline facade over the validated program rules.
///
/// `assess` is a synchronous pure computation: classify the household, build
/// candidate packages per measure, choose the best per measure, then run the
/// cross-measure shared-pool allocation and roll up totals. Every invocation
/// owns its data, so concurrent assessments need no coordination.
pub struct IncentiveEngine {
    rules: ProgramRules,
}

impl IncentiveEngine {
    pub fn new(rules: ProgramRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ProgramRules {
        &self.rules
    }

    pub fn classify(&self, income: &IncomeProfile) -> EligibilityTier {
        eligibility::classify(income, &self.rules.income_thresholds)
    }

    pub fn assess(&self, input: &AssessmentInput) -> Assessment {
        let tier = self.classify(&input.income);

        // Declining federal programs leaves only the market-rate track; the
        // classified tier is still reported so the advisor can revisit it.
        let effective_tier = if input.opt_outs.federal_programs {
            EligibilityTier::Standard
        } else {
            tier
        };

        let resolver = PackageResolver::new(&self.rules);
        let options = ResolutionOptions {
            flex_fund_opt_out: input.opt_outs.flex_fund,
            no_cost_assurance: input.no_cost_assurance,
        };

        let mut recommendations = Vec::with_capacity(input.measures.len());
        for request in &input.measures {
            let candidates = resolver.resolve(request, effective_tier, &options);
            if candidates.is_empty() {
                debug!(measure = %request.measure, "no incentive rule configured for measure");
            }
            let chosen = selector::select_best(&candidates, request.estimated_cost);
            let category = self
                .rules
                .measure_rule(&request.measure)
                .map(|rule| rule.category);
            recommendations.push(Recommendation::new(
                request.measure.clone(),
                category,
                request.estimated_cost,
                candidates,
                chosen,
            ));
        }

        let outcome = PoolAllocator::new(&self.rules).allocate(recommendations, effective_tier);
        let summary = AssessmentSummary::build(
            &outcome.recommendations,
            outcome.household_pool,
            outcome.site_pool,
        );

        Assessment {
            tier,
            tier_label: tier.label(),
            recommendations: outcome.recommendations,
            summary,
        }
    }
}
