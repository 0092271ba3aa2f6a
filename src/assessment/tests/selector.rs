use super::common::{measure, resolve};
use crate::assessment::domain::{
    EligibilityTier, IncentiveAmount, IncentiveLineItem, IncentivePackage,
};
use crate::assessment::resolver::ResolutionOptions;
use crate::assessment::selector::select_best;
use crate::programs::ProgramId;

fn package(name: &str, amounts: &[u32]) -> IncentivePackage {
    let line_items = amounts
        .iter()
        .enumerate()
        .map(|(idx, amount)| {
            IncentiveLineItem::new(
                ProgramId::EnergyTrustStandard,
                IncentiveAmount::Numeric(*amount),
                idx as u8 + 1,
            )
        })
        .collect();
    IncentivePackage::new(name, line_items)
}

#[test]
fn empty_candidates_yield_no_choice() {
    assert!(select_best(&[], 5_000).is_none());
}

#[test]
fn picks_the_greatest_total() {
    let candidates = vec![
        package("smaller", &[1_000]),
        package("larger", &[1_500, 400]),
        package("middle", &[1_200]),
    ];
    let best = select_best(&candidates, 10_000).expect("candidates exist");
    assert_eq!(best.name, "larger");
}

#[test]
fn full_coverage_counts_as_the_measure_cost() {
    let full = IncentivePackage::new(
        "comprehensive",
        vec![IncentiveLineItem::new(
            ProgramId::Weatherization,
            IncentiveAmount::FullCoverage,
            1,
        )],
    );
    let candidates = vec![package("partial", &[4_000]), full];
    let best = select_best(&candidates, 6_000).expect("candidates exist");
    assert_eq!(best.name, "comprehensive");
}

#[test]
fn ties_prefer_zero_net_cost() {
    // Equal totals, but only the second drives a smaller measure to $0.
    let candidates = vec![package("first", &[2_000]), package("no cost", &[2_000])];
    let best = select_best(&candidates, 2_000).expect("candidates exist");
    // Both reach zero; the earlier candidate keeps the win.
    assert_eq!(best.name, "first");

    let candidates = vec![package("partial", &[2_000]), package("covering", &[2_000])];
    let best = select_best(&candidates, 5_000).expect("candidates exist");
    assert_eq!(best.name, "partial");
}

#[test]
fn federal_stack_beats_flexible_placeholder_before_allocation() {
    // At selection time the flexible-fund line is still a $0 placeholder, so
    // a funded federal stack wins the measure.
    let request = measure("attic_insulation", 3_000);
    let candidates = resolve(&request, EligibilityTier::CpfLowIncome, &ResolutionOptions::default());
    let best = select_best(&candidates, request.estimated_cost).expect("candidates exist");
    assert!(best.contains(ProgramId::Hear));
    assert!(!best.contains(ProgramId::Homes));
}
