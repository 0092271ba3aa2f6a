use serde::{Deserialize, Serialize};

use crate::income::IncomeProfile;
use crate::programs::{MeasureCategory, MeasureId, ProgramId};

/// Eligibility bracket a household falls into. Exactly one per assessment;
/// it determines which program combinations are even considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityTier {
    Weatherization,
    CpfLowIncome,
    HearModerate,
    Standard,
}

impl EligibilityTier {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityTier::Weatherization => "No-Cost Weatherization Eligible",
            EligibilityTier::CpfLowIncome => "Income-Qualified (CPF + HEAR 100%)",
            EligibilityTier::HearModerate => "Moderate-Income (Standard + HEAR 50%)",
            EligibilityTier::Standard => "Standard Incentives",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    #[default]
    SingleFamily,
    Manufactured,
    Multifamily,
}

/// Sizing details used by per-unit rate resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureDetails {
    #[serde(default)]
    pub area_sqft: Option<u32>,
    #[serde(default)]
    pub window_count: Option<u32>,
    #[serde(default)]
    pub housing_type: HousingType,
}

/// One retrofit measure submitted for incentive pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureRequest {
    pub measure: MeasureId,
    pub estimated_cost: u32,
    #[serde(default)]
    pub details: MeasureDetails,
}

/// Program opt-outs the household has requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramOptOuts {
    /// Decline every federally funded program; only the standard
    /// market-rate track remains regardless of income.
    #[serde(default)]
    pub federal_programs: bool,
    /// Decline the HOMES flexible-fund pool while keeping other programs.
    #[serde(default)]
    pub flex_fund: bool,
}

/// Everything the engine needs for one assessment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub income: IncomeProfile,
    pub measures: Vec<MeasureRequest>,
    #[serde(default)]
    pub opt_outs: ProgramOptOuts,
    /// When set, CPF lines are raised to fill the remaining funding gap with
    /// headroom so income-qualified stacks reach $0 out of pocket.
    #[serde(default)]
    pub no_cost_assurance: bool,
}

/// Dollar amount of a line item. Full coverage is a distinct variant, never
/// an overloaded number, so downstream math cannot misread the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveAmount {
    Numeric(u32),
    FullCoverage,
}

impl IncentiveAmount {
    pub fn numeric(self) -> Option<u32> {
        match self {
            IncentiveAmount::Numeric(amount) => Some(amount),
            IncentiveAmount::FullCoverage => None,
        }
    }

    /// Dollar value of this line when applied to a measure of the given cost.
    pub fn value_against(self, estimated_cost: u32) -> u32 {
        match self {
            IncentiveAmount::Numeric(amount) => amount,
            IncentiveAmount::FullCoverage => estimated_cost,
        }
    }
}

/// One program's contribution to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveLineItem {
    pub program: ProgramId,
    pub amount: IncentiveAmount,
    pub priority: u8,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IncentiveLineItem {
    pub fn new(program: ProgramId, amount: IncentiveAmount, priority: u8) -> Self {
        Self {
            program,
            amount,
            priority,
            requirements: Vec::new(),
            note: None,
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One complete, internally consistent way to fund a measure. Alternatives
/// are mutually exclusive options, never summed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentivePackage {
    pub name: String,
    pub line_items: Vec<IncentiveLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IncentivePackage {
    pub fn new(name: impl Into<String>, line_items: Vec<IncentiveLineItem>) -> Self {
        Self {
            name: name.into(),
            line_items,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn contains(&self, program: ProgramId) -> bool {
        self.line_items.iter().any(|item| item.program == program)
    }

    /// Pairs of line items whose programs may not fund the same measure.
    /// A well-formed package always returns an empty list.
    pub fn stacking_conflicts(&self) -> Vec<(ProgramId, ProgramId)> {
        let mut conflicts = Vec::new();
        for (i, a) in self.line_items.iter().enumerate() {
            for b in &self.line_items[i + 1..] {
                if a.program.conflicts_with(b.program) {
                    conflicts.push((a.program, b.program));
                }
            }
        }
        conflicts
    }
}

/// A measure bound to one assessment: its candidate packages, the chosen
/// package, and the derived cost figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub measure: MeasureId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MeasureCategory>,
    pub estimated_cost: u32,
    pub candidate_packages: Vec<IncentivePackage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<IncentivePackage>,
    pub total_incentives: u32,
    pub net_cost: u32,
    pub coverage_percent: u16,
}

impl Recommendation {
    pub fn new(
        measure: MeasureId,
        category: Option<MeasureCategory>,
        estimated_cost: u32,
        candidate_packages: Vec<IncentivePackage>,
        chosen: Option<IncentivePackage>,
    ) -> Self {
        let mut recommendation = Self {
            measure,
            category,
            estimated_cost,
            candidate_packages,
            chosen,
            total_incentives: 0,
            net_cost: estimated_cost,
            coverage_percent: 0,
        };
        recommendation.refresh_totals();
        recommendation
    }

    /// Recompute totals from the chosen package's current line items.
    pub fn refresh_totals(&mut self) {
        let breakdown = match &self.chosen {
            Some(package) => super::netcost::breakdown(self.estimated_cost, &package.line_items),
            None => super::netcost::breakdown(self.estimated_cost, &[]),
        };
        self.total_incentives = breakdown.total_incentives;
        self.net_cost = breakdown.net_cost;
        self.coverage_percent = breakdown.coverage_percent;
    }
}

/// A capped budget consumed across all measures in one assessment. Balances
/// are scoped to a single allocation pass; nothing persists across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedPool {
    program: ProgramId,
    cap: u32,
    remaining: u32,
}

impl SharedPool {
    pub fn new(program: ProgramId, cap: u32) -> Self {
        Self {
            program,
            cap,
            remaining: cap,
        }
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn used(&self) -> u32 {
        self.cap - self.remaining
    }

    /// Take up to `want` dollars from the pool, returning what was granted.
    pub fn draw(&mut self, want: u32) -> u32 {
        let granted = want.min(self.remaining);
        self.remaining -= granted;
        granted
    }

    pub fn usage(&self) -> PoolUsage {
        PoolUsage {
            program: self.program,
            used: self.used(),
            cap: self.cap,
        }
    }
}

/// Utilization of one shared pool, reported in the assessment summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUsage {
    pub program: ProgramId,
    pub used: u32,
    pub cap: u32,
}
