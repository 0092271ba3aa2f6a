use std::collections::BTreeMap;

use crate::assessment::domain::{
    EligibilityTier, IncentiveAmount, IncentiveLineItem, IncentivePackage, MeasureDetails,
    MeasureRequest, Recommendation,
};
use crate::assessment::resolver::{PackageResolver, ResolutionOptions};
use crate::income::IncomeProfile;
use crate::programs::{
    CoverageRule, CpfRate, HomesCoverageRules, IncomeThresholds, MeasureCategory, MeasureId,
    MeasureRule, ProgramCaps, ProgramId, ProgramRules, StandardRate,
};

pub(super) fn thresholds() -> IncomeThresholds {
    IncomeThresholds {
        weatherization_smi_max: 60,
        weatherization_fpl_max: 200,
        cpf_tier1_ami_max: 80,
        hear_moderate_ami_min: 81,
        hear_moderate_ami_max: 150,
        homes_ami_max: 150,
    }
}

pub(super) fn caps() -> ProgramCaps {
    ProgramCaps {
        hear_household_cap: 14_000,
        homes_modeled_min: 2_000,
        homes_modeled_max: 8_000,
        homes_flex_site_cap: 10_000,
        certa_household_cap: 2_000,
    }
}

fn rule(
    category: MeasureCategory,
    cpf: Option<CpfRate>,
    hear: Option<u32>,
    standard: Option<StandardRate>,
    homes_eligible: bool,
) -> MeasureRule {
    MeasureRule {
        category,
        cpf,
        hear,
        standard,
        homes_eligible,
        cpf_requirements: Vec::new(),
    }
}

pub(super) fn rules() -> ProgramRules {
    let mut measure_incentives = BTreeMap::new();
    measure_incentives.insert(
        MeasureId::new("heat_pump_ductless"),
        rule(
            MeasureCategory::Hvac,
            Some(CpfRate::ByHousingType {
                single_family: 1_800,
                manufactured: Some(3_500),
                multifamily: Some(2_000),
            }),
            Some(8_000),
            Some(StandardRate::Flat(800)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("heat_pump_ducted"),
        rule(
            MeasureCategory::Hvac,
            Some(CpfRate::ByHousingType {
                single_family: 4_000,
                manufactured: None,
                multifamily: None,
            }),
            Some(8_000),
            Some(StandardRate::Flat(1_500)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("attic_insulation"),
        rule(
            MeasureCategory::Envelope,
            Some(CpfRate::PerSqft(1.5)),
            Some(1_600),
            Some(StandardRate::PerSqft(0.10)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("wall_insulation"),
        rule(
            MeasureCategory::Envelope,
            Some(CpfRate::PerSqft(1.0)),
            Some(1_600),
            Some(StandardRate::PerSqft(0.08)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("floor_insulation"),
        rule(
            MeasureCategory::Envelope,
            Some(CpfRate::PerSqft(1.2)),
            Some(1_600),
            Some(StandardRate::PerSqft(0.10)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("air_sealing"),
        rule(
            MeasureCategory::Envelope,
            Some(CpfRate::Flat(800)),
            None,
            Some(StandardRate::Flat(400)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("duct_sealing"),
        rule(
            MeasureCategory::Hvac,
            Some(CpfRate::Flat(600)),
            None,
            Some(StandardRate::Flat(400)),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("heat_pump_water_heater"),
        rule(
            MeasureCategory::WaterHeating,
            Some(CpfRate::Flat(240)),
            Some(1_750),
            Some(StandardRate::Flat(240)),
            false,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("window_replacement"),
        rule(
            MeasureCategory::Envelope,
            Some(CpfRate::PerSqft(1.5)),
            None,
            Some(StandardRate::PerWindow { rate: 50, max: 500 }),
            true,
        ),
    );
    measure_incentives.insert(
        MeasureId::new("health_safety_repairs"),
        rule(
            MeasureCategory::HealthSafety,
            Some(CpfRate::FullCoverage),
            None,
            None,
            true,
        ),
    );

    ProgramRules {
        version: "2.0".to_string(),
        income_thresholds: thresholds(),
        program_caps: caps(),
        homes_coverage_rules: HomesCoverageRules {
            low_income: CoverageRule {
                ami_min: None,
                ami_max: Some(80),
                coverage_percent: 100,
            },
            moderate_income: CoverageRule {
                ami_min: Some(81),
                ami_max: Some(150),
                coverage_percent: 50,
            },
        },
        measure_incentives,
        certa_eligible_measures: vec![
            MeasureId::new("attic_insulation"),
            MeasureId::new("wall_insulation"),
            MeasureId::new("floor_insulation"),
            MeasureId::new("air_sealing"),
            MeasureId::new("duct_sealing"),
        ],
        homes_allocation_priority: vec![
            MeasureId::new("health_safety_repairs"),
            MeasureId::new("attic_insulation"),
            MeasureId::new("wall_insulation"),
            MeasureId::new("floor_insulation"),
            MeasureId::new("air_sealing"),
            MeasureId::new("window_replacement"),
            MeasureId::new("duct_sealing"),
        ],
    }
}

pub(super) fn profile(ami: u16, smi: u16, fpl: u16) -> IncomeProfile {
    IncomeProfile {
        ami_percent: ami,
        smi_percent: smi,
        fpl_percent: fpl,
        household_size: 3,
        county: "Multnomah".to_string(),
    }
}

pub(super) fn measure(id: &str, estimated_cost: u32) -> MeasureRequest {
    MeasureRequest {
        measure: MeasureId::new(id),
        estimated_cost,
        details: MeasureDetails::default(),
    }
}

pub(super) fn resolve(
    request: &MeasureRequest,
    tier: EligibilityTier,
    options: &ResolutionOptions,
) -> Vec<IncentivePackage> {
    let rules = rules();
    let resolver = PackageResolver::new(&rules);
    resolver.resolve(request, tier, options)
}

/// Recommendation whose chosen package holds only a flexible-fund
/// placeholder, for exercising the allocator in isolation.
pub(super) fn flex_only_recommendation(id: &str, estimated_cost: u32) -> Recommendation {
    let package = IncentivePackage::new(
        "HOMES Package",
        vec![IncentiveLineItem::new(
            ProgramId::Homes,
            IncentiveAmount::Numeric(0),
            1,
        )],
    );
    Recommendation::new(
        MeasureId::new(id),
        Some(MeasureCategory::Envelope),
        estimated_cost,
        vec![package.clone()],
        Some(package),
    )
}

pub(super) fn line_amount(package: &IncentivePackage, program: ProgramId) -> Option<u32> {
    package
        .line_items
        .iter()
        .find(|item| item.program == program)
        .and_then(|item| item.amount.numeric())
}
