//! Assessment pipeline: tier classification, per-measure package
//! construction and selection, cross-measure shared-pool allocation, and the
//! final cost rollup.
//!
//! Data flows one way — classifier → resolver → selector → allocator → net
//! cost — and only the allocator sees more than one measure at a time.

pub mod allocation;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod netcost;
pub mod resolver;
pub mod router;
pub mod selector;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use allocation::{AllocationOutcome, PoolAllocator};
pub use domain::{
    AssessmentInput, EligibilityTier, HousingType, IncentiveAmount, IncentiveLineItem,
    IncentivePackage, MeasureDetails, MeasureRequest, PoolUsage, ProgramOptOuts, Recommendation,
    SharedPool,
};
pub use engine::{Assessment, IncentiveEngine};
pub use netcost::CostBreakdown;
pub use resolver::{PackageResolver, ResolutionOptions};
pub use router::assessment_router;
pub use service::{AssessmentRequest, AssessmentService, AssessmentServiceError};
pub use summary::{AssessmentSummary, ProgramTotal};
