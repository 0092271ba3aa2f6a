//! Funding-program reference data: the closed program catalog with its
//! stacking restrictions, and the configuration document supplying dollar
//! amounts, caps, and eligibility lists.

pub mod catalog;
pub mod rules;

pub use catalog::{ProgramCategory, ProgramId};
pub use rules::{
    CoverageRule, CpfRate, HomesCoverageRules, IncomeThresholds, MeasureCategory, MeasureId,
    MeasureRule, ProgramCaps, ProgramRules, RulesError, StandardRate,
};
