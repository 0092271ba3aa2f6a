use super::domain::IncentivePackage;
use super::netcost;

/// Pick the best candidate package for one measure.
///
/// The winner is the candidate with the greatest total incentive value
/// (full coverage valued at the measure cost); ties go to a candidate that
/// drives net cost to zero. The choice is local to the measure — shared-pool
/// contention is resolved later by the allocator, so a package holding a
/// zero-amount pool placeholder competes only on its other line items here.
pub fn select_best(
    candidates: &[IncentivePackage],
    estimated_cost: u32,
) -> Option<IncentivePackage> {
    let mut best: Option<(&IncentivePackage, netcost::CostBreakdown)> = None;

    for candidate in candidates {
        let calc = netcost::breakdown(estimated_cost, &candidate.line_items);
        let wins = match &best {
            None => true,
            Some((_, current)) => {
                calc.total_incentives > current.total_incentives
                    || (calc.total_incentives == current.total_incentives
                        && calc.net_cost == 0
                        && current.net_cost != 0)
            }
        };
        if wins {
            best = Some((candidate, calc));
        }
    }

    best.map(|(package, _)| package.clone())
}
