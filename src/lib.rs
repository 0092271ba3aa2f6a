//! Incentive eligibility and stacking engine for residential energy retrofits.
//!
//! Given a household's income ratios and a set of recommended retrofit
//! measures, the engine classifies the household into an eligibility tier,
//! builds the valid incentive packages per measure, picks the best one, and
//! then divides the two capped shared funding pools (the CERTA enabling-repair
//! household cap and the HOMES flexible site cap) across all measures in
//! priority order. The computation is synchronous and pure per assessment;
//! the HTTP service and CLI in `main.rs` are thin wrappers around it.

pub mod assessment;
pub mod config;
pub mod error;
pub mod income;
pub mod programs;
pub mod telemetry;
