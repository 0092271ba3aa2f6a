use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration key identifying a retrofit measure (e.g. `attic_insulation`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeasureId(pub String);

impl MeasureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeasureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Work category a measure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureCategory {
    HealthSafety,
    Envelope,
    Hvac,
    WaterHeating,
}

impl MeasureCategory {
    pub const fn label(self) -> &'static str {
        match self {
            MeasureCategory::HealthSafety => "health & safety",
            MeasureCategory::Envelope => "envelope",
            MeasureCategory::Hvac => "HVAC",
            MeasureCategory::WaterHeating => "water heating",
        }
    }
}

/// Validated program-rules document.
///
/// The engine embeds no dollar amounts of its own; every threshold, cap, and
/// incentive rate flows through this document. Loading is an explicit,
/// caller-owned step that either yields a validated value or fails — amounts
/// in a compliance-sensitive pipeline are never silently defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramRules {
    pub version: String,
    pub income_thresholds: IncomeThresholds,
    pub program_caps: ProgramCaps,
    pub homes_coverage_rules: HomesCoverageRules,
    pub measure_incentives: BTreeMap<MeasureId, MeasureRule>,
    #[serde(default)]
    pub certa_eligible_measures: Vec<MeasureId>,
    #[serde(default)]
    pub homes_allocation_priority: Vec<MeasureId>,
}

/// Income-ratio cutoffs gating tier classification, as percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeThresholds {
    pub weatherization_smi_max: u16,
    pub weatherization_fpl_max: u16,
    pub cpf_tier1_ami_max: u16,
    pub hear_moderate_ami_min: u16,
    pub hear_moderate_ami_max: u16,
    pub homes_ami_max: u16,
}

/// Household- and site-level dollar caps, per program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramCaps {
    pub hear_household_cap: u32,
    pub homes_modeled_min: u32,
    pub homes_modeled_max: u32,
    pub homes_flex_site_cap: u32,
    pub certa_household_cap: u32,
}

/// Income-banded coverage limits for the HOMES flexible pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomesCoverageRules {
    pub low_income: CoverageRule,
    pub moderate_income: CoverageRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRule {
    #[serde(default)]
    pub ami_min: Option<u16>,
    #[serde(default)]
    pub ami_max: Option<u16>,
    pub coverage_percent: u8,
}

/// Per-measure incentive rule. Each program's amount resolves through
/// exactly one mode (flat, per-sqft, per-window, housing-type tier, or full
/// coverage).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureRule {
    pub category: MeasureCategory,
    #[serde(default)]
    pub cpf: Option<CpfRate>,
    #[serde(default)]
    pub hear: Option<u32>,
    #[serde(default)]
    pub standard: Option<StandardRate>,
    #[serde(default)]
    pub homes_eligible: bool,
    #[serde(default)]
    pub cpf_requirements: Vec<String>,
}

/// How a CPF amount is derived for a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpfRate {
    Flat(u32),
    PerSqft(f64),
    ByHousingType {
        single_family: u32,
        #[serde(default)]
        manufactured: Option<u32>,
        #[serde(default)]
        multifamily: Option<u32>,
    },
    FullCoverage,
}

/// How a standard market-rate amount is derived for a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardRate {
    Flat(u32),
    PerSqft(f64),
    PerWindow { rate: u32, max: u32 },
}

const REQUIRED_FIELDS: [&str; 5] = [
    "version",
    "income_thresholds",
    "program_caps",
    "homes_coverage_rules",
    "measure_incentives",
];

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read program rules from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("program rules document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ProgramRules {
    /// Parse and validate a program-rules document from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, RulesError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;

        // Name the first absent field instead of relying on a serde error so
        // operators can fix the document without reading a deserializer trace.
        for field in REQUIRED_FIELDS {
            if value.get(field).is_none() {
                return Err(RulesError::MissingField(field));
            }
        }

        let rules: ProgramRules = serde_json::from_value(value)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Parse and validate a program-rules document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    fn validate(&self) -> Result<(), RulesError> {
        if self.measure_incentives.is_empty() {
            return Err(RulesError::Invalid(
                "no measure incentives defined".to_string(),
            ));
        }

        let caps = &self.program_caps;
        if caps.hear_household_cap == 0
            || caps.homes_flex_site_cap == 0
            || caps.certa_household_cap == 0
        {
            return Err(RulesError::Invalid(
                "program caps must be non-zero".to_string(),
            ));
        }
        if caps.homes_modeled_min > caps.homes_modeled_max {
            return Err(RulesError::Invalid(format!(
                "homes_modeled_min ({}) exceeds homes_modeled_max ({})",
                caps.homes_modeled_min, caps.homes_modeled_max
            )));
        }

        let thresholds = &self.income_thresholds;
        if thresholds.weatherization_smi_max == 0 {
            return Err(RulesError::Invalid(
                "weatherization_smi_max must be non-zero".to_string(),
            ));
        }
        if thresholds.cpf_tier1_ami_max <= thresholds.weatherization_smi_max {
            return Err(RulesError::Invalid(format!(
                "cpf_tier1_ami_max ({}) must exceed weatherization_smi_max ({})",
                thresholds.cpf_tier1_ami_max, thresholds.weatherization_smi_max
            )));
        }
        if thresholds.hear_moderate_ami_max < thresholds.hear_moderate_ami_min {
            return Err(RulesError::Invalid(format!(
                "hear_moderate_ami_max ({}) is below hear_moderate_ami_min ({})",
                thresholds.hear_moderate_ami_max, thresholds.hear_moderate_ami_min
            )));
        }

        for (name, rule) in [
            ("low_income", &self.homes_coverage_rules.low_income),
            ("moderate_income", &self.homes_coverage_rules.moderate_income),
        ] {
            if rule.coverage_percent > 100 {
                return Err(RulesError::Invalid(format!(
                    "homes_coverage_rules.{name}.coverage_percent exceeds 100"
                )));
            }
        }

        Ok(())
    }

    pub fn measure_rule(&self, measure: &MeasureId) -> Option<&MeasureRule> {
        self.measure_incentives.get(measure)
    }

    pub fn is_certa_eligible(&self, measure: &MeasureId) -> bool {
        self.certa_eligible_measures.contains(measure)
    }

    /// Position of a measure in the HOMES allocation priority order.
    /// Unlisted measures sort after every listed one, keeping their relative
    /// order stable.
    pub fn priority_rank(&self, measure: &MeasureId) -> usize {
        self.homes_allocation_priority
            .iter()
            .position(|m| m == measure)
            .unwrap_or(usize::MAX)
    }
}
