use tracing::{debug, warn};

use crate::programs::{ProgramId, ProgramRules};

use super::domain::{EligibilityTier, IncentiveAmount, PoolUsage, Recommendation, SharedPool};

/// Result of the cross-measure allocation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub recommendations: Vec<Recommendation>,
    pub household_pool: PoolUsage,
    pub site_pool: PoolUsage,
}

/// Divides the two capped shared pools across every measure in one
/// assessment. This is the only component with cross-measure state.
///
/// The pass consumes the recommendations and returns a new set; pool
/// balances are created fresh per invocation, so re-running on finalized
/// recommendations changes nothing, and concurrent assessments never share
/// state. Allocation is greedy in the configured priority order — a
/// different ordering yields a different (still cap-respecting) split.
pub struct PoolAllocator<'a> {
    rules: &'a ProgramRules,
}

impl<'a> PoolAllocator<'a> {
    pub fn new(rules: &'a ProgramRules) -> Self {
        Self { rules }
    }

    pub fn allocate(
        &self,
        recommendations: Vec<Recommendation>,
        tier: EligibilityTier,
    ) -> AllocationOutcome {
        let mut recommendations = recommendations;

        self.audit_hear_cap(&recommendations);
        let household_pool = self.apply_household_cap(&mut recommendations);
        let site_pool = self.apply_site_allocation(&mut recommendations, tier);

        for recommendation in &mut recommendations {
            recommendation.refresh_totals();
        }

        AllocationOutcome {
            recommendations,
            household_pool,
            site_pool,
        }
    }

    /// The HEAR household rebate cap is reported, not redistributed: the
    /// rebate is claimed per measure through the administering agency, so
    /// the engine surfaces the overrun for the advisor to resolve.
    fn audit_hear_cap(&self, recommendations: &[Recommendation]) {
        let cap = self.rules.program_caps.hear_household_cap;
        let total: u32 = recommendations
            .iter()
            .filter_map(|rec| rec.chosen.as_ref())
            .flat_map(|package| &package.line_items)
            .filter(|item| item.program == ProgramId::Hear)
            .filter_map(|item| item.amount.numeric())
            .sum();

        if total > cap {
            warn!(total, cap, "HEAR rebates exceed the household cap");
        }
    }

    /// Enforce the enabling-repair household cap by splitting it evenly
    /// across the consuming measures, remainder to the last in order.
    fn apply_household_cap(&self, recommendations: &mut [Recommendation]) -> PoolUsage {
        let cap = self.rules.program_caps.certa_household_cap;
        let mut pool = SharedPool::new(ProgramId::Certa, cap);

        let consumers: Vec<usize> = recommendations
            .iter()
            .enumerate()
            .filter(|(_, rec)| {
                rec.chosen
                    .as_ref()
                    .is_some_and(|package| package.contains(ProgramId::Certa))
            })
            .map(|(idx, _)| idx)
            .collect();

        let requested: u32 = consumers
            .iter()
            .filter_map(|&idx| recommendations[idx].chosen.as_ref())
            .flat_map(|package| &package.line_items)
            .filter(|item| item.program == ProgramId::Certa)
            .filter_map(|item| item.amount.numeric())
            .sum();

        if requested <= cap {
            pool.draw(requested);
            return pool.usage();
        }

        let count = consumers.len() as u32;
        let share = cap / count;
        for (position, &idx) in consumers.iter().enumerate() {
            let amount = if position as u32 == count - 1 {
                cap - share * (count - 1)
            } else {
                share
            };
            let recommendation = &mut recommendations[idx];
            if let Some(package) = recommendation.chosen.as_mut() {
                for item in package
                    .line_items
                    .iter_mut()
                    .filter(|item| item.program == ProgramId::Certa)
                {
                    item.amount = IncentiveAmount::Numeric(amount);
                    item.note = Some(format!(
                        "${amount} of ${cap} household cap (shared across {count} measures)"
                    ));
                }
            }
            pool.draw(amount);
            debug!(measure = %recommendation.measure, amount, "enabling-repair cap shared");
        }

        pool.usage()
    }

    /// Walk measures in the configured priority order, filling each funding
    /// gap from the flexible site pool until it runs dry. A measure funded
    /// by HEAR never also draws from this pool, and a measure that would
    /// receive zero keeps no placeholder line.
    fn apply_site_allocation(
        &self,
        recommendations: &mut [Recommendation],
        tier: EligibilityTier,
    ) -> PoolUsage {
        let mut pool = SharedPool::new(ProgramId::Homes, self.rules.program_caps.homes_flex_site_cap);

        if tier == EligibilityTier::Standard {
            for recommendation in recommendations.iter_mut() {
                if let Some(package) = recommendation.chosen.as_mut() {
                    package
                        .line_items
                        .retain(|item| item.program != ProgramId::Homes);
                }
            }
            debug!("flexible funds unavailable above the moderate-income ceiling");
            return pool.usage();
        }

        let moderate_coverage = (tier == EligibilityTier::HearModerate)
            .then(|| self.rules.homes_coverage_rules.moderate_income.coverage_percent);

        let mut order: Vec<usize> = (0..recommendations.len()).collect();
        order.sort_by_key(|&idx| self.rules.priority_rank(&recommendations[idx].measure));

        for idx in order {
            let recommendation = &mut recommendations[idx];
            let Some(package) = recommendation.chosen.as_mut() else {
                continue;
            };

            if package.contains(ProgramId::Hear) {
                package
                    .line_items
                    .retain(|item| item.program != ProgramId::Homes);
                continue;
            }
            if !package.contains(ProgramId::Homes) {
                continue;
            }

            let other_incentives: u32 = package
                .line_items
                .iter()
                .filter(|item| item.program != ProgramId::Homes)
                .filter_map(|item| item.amount.numeric())
                .sum();
            let mut gap = recommendation.estimated_cost.saturating_sub(other_incentives);
            if let Some(percent) = moderate_coverage {
                gap = gap.min(recommendation.estimated_cost * percent as u32 / 100);
            }

            let granted = pool.draw(gap);
            if granted == 0 {
                package
                    .line_items
                    .retain(|item| item.program != ProgramId::Homes);
                debug!(measure = %recommendation.measure, "no flexible funds allocated");
                continue;
            }

            let note = format!(
                "${granted} of ${} site cap (fills gap after other incentives)",
                pool.cap()
            );
            if let Some(line) = package
                .line_items
                .iter_mut()
                .find(|item| item.program == ProgramId::Homes)
            {
                line.amount = IncentiveAmount::Numeric(granted);
                line.note = Some(note);
            }
            debug!(
                measure = %recommendation.measure,
                granted,
                remaining = pool.remaining(),
                "flexible funds allocated"
            );
        }

        pool.usage()
    }
}
