use crate::programs::{CpfRate, MeasureId, MeasureRule, ProgramId, ProgramRules, StandardRate};

use super::domain::{
    EligibilityTier, HousingType, IncentiveAmount, IncentiveLineItem, IncentivePackage,
    MeasureDetails, MeasureRequest,
};

// Sizing fallbacks when the assessment omits measurements.
const DEFAULT_AREA_SQFT: u32 = 1_000;
const DEFAULT_WINDOW_COUNT: u32 = 10;

/// Knobs carried from the assessment input into package construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionOptions {
    pub flex_fund_opt_out: bool,
    pub no_cost_assurance: bool,
}

/// Builds the candidate incentive packages for one measure at a time.
///
/// Each package is a complete, internally consistent funding alternative;
/// HEAR and HOMES never share a package, and CERTA rides along only on
/// measures from the configured enabling-repair list. A measure with no
/// configured rule resolves to an empty list, not an error.
pub struct PackageResolver<'a> {
    rules: &'a ProgramRules,
}

impl<'a> PackageResolver<'a> {
    pub fn new(rules: &'a ProgramRules) -> Self {
        Self { rules }
    }

    pub fn resolve(
        &self,
        request: &MeasureRequest,
        tier: EligibilityTier,
        options: &ResolutionOptions,
    ) -> Vec<IncentivePackage> {
        let Some(rule) = self.rules.measure_rule(&request.measure) else {
            return Vec::new();
        };

        let homes_eligible = rule.homes_eligible && !options.flex_fund_opt_out;

        match tier {
            EligibilityTier::Weatherization => {
                self.weatherization_packages(request, rule, homes_eligible)
            }
            EligibilityTier::CpfLowIncome => {
                self.gap_funded_packages(request, rule, homes_eligible, options)
            }
            EligibilityTier::HearModerate => self.moderate_packages(request, rule, homes_eligible),
            EligibilityTier::Standard => self.standard_packages(request, rule),
        }
    }

    fn weatherization_packages(
        &self,
        request: &MeasureRequest,
        rule: &MeasureRule,
        homes_eligible: bool,
    ) -> Vec<IncentivePackage> {
        let mut packages = vec![IncentivePackage::new(
            "Weatherization (Primary)",
            vec![IncentiveLineItem::new(
                ProgramId::Weatherization,
                IncentiveAmount::FullCoverage,
                1,
            )
            .with_requirements(vec![
                "Income verification".to_string(),
                "Application approval".to_string(),
            ])
            .with_note("No-cost comprehensive weatherization; agency waitlist may apply")],
        )
        .with_note("Full no-cost coverage (waitlist may apply)")];

        if let Some(hear) = hear_amount(rule, 100) {
            let mut items = vec![IncentiveLineItem::new(
                ProgramId::Hear,
                IncentiveAmount::Numeric(hear),
                1,
            )
            .with_requirements(hear_requirements())
            .with_note("Available even with weatherization eligibility - no waitlist")];
            if let Some(certa) = self.certa_line(&request.measure, 2) {
                items.push(certa);
            }
            packages.push(
                IncentivePackage::new("HEAR 100% Package (Faster Alternative)", items)
                    .with_note("Faster timeline than the weatherization waitlist"),
            );
        }

        if homes_eligible {
            packages.push(
                IncentivePackage::new(
                    "HOMES Package (Comprehensive Alternative)",
                    vec![homes_placeholder(2)],
                )
                .with_note("Flexible funding for comprehensive projects - no waitlist"),
            );
        }

        packages
    }

    fn gap_funded_packages(
        &self,
        request: &MeasureRequest,
        rule: &MeasureRule,
        homes_eligible: bool,
        options: &ResolutionOptions,
    ) -> Vec<IncentivePackage> {
        let cpf = cpf_amount(rule, &request.details);
        let hear = hear_amount(rule, 100);
        // Gap assurance sizes CPF from what federal dollars leave uncovered.
        // The HEAR entitlement is the measure's federal offset regardless of
        // which stack the line lands in, so the same CPF amount appears in
        // every alternative.
        let federal_offset = hear.unwrap_or(0);
        let cpf_configured = cpf.is_some();
        let cpf_resolved = cpf.and_then(|configured| {
            self.cpf_line_amount(
                configured,
                request.estimated_cost,
                federal_offset,
                options.no_cost_assurance,
            )
        });
        let mut packages = Vec::new();

        if let (Some(hear_value), true) = (hear, cpf_configured) {
            let mut items = vec![IncentiveLineItem::new(
                ProgramId::Hear,
                IncentiveAmount::Numeric(hear_value),
                1,
            )
            .with_requirements(hear_requirements())
            .with_note("Primary federal funding - household rebate cap applies")];
            if let Some(cpf_value) = cpf_resolved {
                items.push(self.cpf_line(rule, cpf_value, 2));
            }
            if let Some(certa) = self.certa_line(&request.measure, 3) {
                items.push(certa);
            }
            packages.push(
                IncentivePackage::new("HEAR + CPF Stack (No-Cost Path)", items)
                    .with_note("Federal dollars first, CPF fills the remaining gap"),
            );
        }

        if homes_eligible && cpf_configured {
            let mut items = vec![homes_placeholder(1)];
            if let Some(cpf_value) = cpf_resolved {
                items.push(self.cpf_line(rule, cpf_value, 2));
            }
            if let Some(certa) = self.certa_line(&request.measure, 3) {
                items.push(certa);
            }
            packages.push(
                IncentivePackage::new("HOMES + CPF Stack (No-Cost Path)", items)
                    .with_note("Whole-home rebate plus CPF gap funding"),
            );
        }

        if let Some(cpf_value) = cpf_resolved {
            if hear.is_none() && !homes_eligible {
                let mut items = vec![self.cpf_line(rule, cpf_value, 1)];
                if let Some(certa) = self.certa_line(&request.measure, 2) {
                    items.push(certa);
                }
                packages.push(
                    IncentivePackage::new("CPF Package", items).with_note("Enhanced CPF rebates"),
                );
            }
        }

        packages
    }

    fn moderate_packages(
        &self,
        request: &MeasureRequest,
        rule: &MeasureRule,
        homes_eligible: bool,
    ) -> Vec<IncentivePackage> {
        let standard = standard_amount(rule, &request.details);
        let hear = hear_amount(rule, 50);
        let mut packages = Vec::new();

        if let (Some(hear_value), Some(standard_value)) = (hear, standard) {
            packages.push(
                IncentivePackage::new(
                    "HEAR 50% + Standard",
                    vec![
                        IncentiveLineItem::new(
                            ProgramId::Hear,
                            IncentiveAmount::Numeric(hear_value),
                            1,
                        )
                        .with_requirements(hear_requirements())
                        .with_note("Federal funding applied first - household rebate cap applies"),
                        standard_line(standard_value, 2)
                            .with_note("Gap funding for remaining costs"),
                    ],
                )
                .with_note("Federal dollars first, standard programs fill gaps"),
            );
        }

        if let (true, Some(standard_value)) = (homes_eligible, standard) {
            packages.push(
                IncentivePackage::new(
                    "HOMES + Standard",
                    vec![
                        homes_placeholder(1),
                        standard_line(standard_value, 2)
                            .with_note("Gap funding for remaining costs"),
                    ],
                )
                .with_note("Federal dollars first for comprehensive envelope work"),
            );
        }

        if let Some(standard_value) = standard {
            if hear.is_none() && !homes_eligible {
                packages.push(
                    IncentivePackage::new(
                        "Standard Programs",
                        vec![standard_line(standard_value, 1)],
                    )
                    .with_note("Standard rebate available"),
                );
            }
        }

        packages
    }

    fn standard_packages(
        &self,
        request: &MeasureRequest,
        rule: &MeasureRule,
    ) -> Vec<IncentivePackage> {
        match standard_amount(rule, &request.details) {
            Some(amount) => vec![IncentivePackage::new(
                "Standard Programs",
                vec![standard_line(amount, 1)],
            )
            .with_note("Market-rate incentives")],
            None => Vec::new(),
        }
    }

    fn cpf_line(
        &self,
        rule: &MeasureRule,
        amount: IncentiveAmount,
        priority: u8,
    ) -> IncentiveLineItem {
        let requirements = if rule.cpf_requirements.is_empty() {
            vec!["Income verification".to_string()]
        } else {
            rule.cpf_requirements.clone()
        };
        IncentiveLineItem::new(ProgramId::Cpf, amount, priority)
            .with_requirements(requirements)
            .with_note("Gap funding to achieve no-cost (may exceed remaining cost)")
    }

    /// CPF amount for one package. With gap assurance, the configured amount
    /// is replaced by 110% of the gap left after federal dollars in the same
    /// package, so the stack reaches $0 with headroom; a zero gap yields no
    /// CPF line at all.
    fn cpf_line_amount(
        &self,
        configured: IncentiveAmount,
        estimated_cost: u32,
        federal_dollars: u32,
        no_cost_assurance: bool,
    ) -> Option<IncentiveAmount> {
        if !no_cost_assurance {
            return Some(configured);
        }
        match configured {
            IncentiveAmount::FullCoverage => Some(IncentiveAmount::FullCoverage),
            IncentiveAmount::Numeric(_) => {
                let gap = estimated_cost.saturating_sub(federal_dollars);
                let assured = gap * 110 / 100;
                (assured > 0).then_some(IncentiveAmount::Numeric(assured))
            }
        }
    }

    fn certa_line(&self, measure: &MeasureId, priority: u8) -> Option<IncentiveLineItem> {
        if !self.rules.is_certa_eligible(measure) {
            return None;
        }
        let cap = self.rules.program_caps.certa_household_cap;
        Some(
            IncentiveLineItem::new(ProgramId::Certa, IncentiveAmount::Numeric(cap), priority)
                .with_note(format!("Up to ${cap} household cap for enabling work")),
        )
    }
}

fn hear_requirements() -> Vec<String> {
    vec![
        "Income verification".to_string(),
        "Licensed contractor".to_string(),
        "Meets efficiency standards".to_string(),
    ]
}

/// Zero-amount line the allocator later resolves against the site cap, or
/// removes when nothing can be allocated.
fn homes_placeholder(priority: u8) -> IncentiveLineItem {
    IncentiveLineItem::new(ProgramId::Homes, IncentiveAmount::Numeric(0), priority)
        .with_note("Allocated dynamically up to the site cap (fills gaps after other incentives)")
}

fn standard_line(amount: u32, priority: u8) -> IncentiveLineItem {
    IncentiveLineItem::new(
        ProgramId::EnergyTrustStandard,
        IncentiveAmount::Numeric(amount),
        priority,
    )
}

fn cpf_amount(rule: &MeasureRule, details: &MeasureDetails) -> Option<IncentiveAmount> {
    match rule.cpf.as_ref()? {
        CpfRate::Flat(amount) => (*amount > 0).then_some(IncentiveAmount::Numeric(*amount)),
        CpfRate::PerSqft(rate) => {
            let sqft = details.area_sqft.unwrap_or(DEFAULT_AREA_SQFT);
            let amount = (sqft as f64 * rate).floor() as u32;
            (amount > 0).then_some(IncentiveAmount::Numeric(amount))
        }
        CpfRate::ByHousingType {
            single_family,
            manufactured,
            multifamily,
        } => {
            let amount = match details.housing_type {
                HousingType::Manufactured => manufactured.unwrap_or(*single_family),
                HousingType::Multifamily => multifamily.unwrap_or(*single_family),
                HousingType::SingleFamily => *single_family,
            };
            (amount > 0).then_some(IncentiveAmount::Numeric(amount))
        }
        CpfRate::FullCoverage => Some(IncentiveAmount::FullCoverage),
    }
}

fn hear_amount(rule: &MeasureRule, percent: u32) -> Option<u32> {
    let base = rule.hear?;
    let amount = base * percent / 100;
    (amount > 0).then_some(amount)
}

fn standard_amount(rule: &MeasureRule, details: &MeasureDetails) -> Option<u32> {
    let amount = match rule.standard.as_ref()? {
        StandardRate::Flat(amount) => *amount,
        StandardRate::PerSqft(rate) => {
            let sqft = details.area_sqft.unwrap_or(DEFAULT_AREA_SQFT);
            (sqft as f64 * rate).floor() as u32
        }
        StandardRate::PerWindow { rate, max } => {
            let windows = details.window_count.unwrap_or(DEFAULT_WINDOW_COUNT);
            (windows * rate).min(*max)
        }
    };
    (amount > 0).then_some(amount)
}
