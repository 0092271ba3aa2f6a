use crate::income::IncomeProfile;
use crate::programs::IncomeThresholds;

use super::domain::EligibilityTier;

/// Classify a household into its eligibility tier.
///
/// Checks run in fixed order and the first match wins. Thresholds are
/// inclusive on the favorable side (SMI exactly at the weatherization cutoff
/// still qualifies). Every input maps to a tier; out-of-range percentages
/// are the caller's concern, not rejected here.
pub fn classify(profile: &IncomeProfile, thresholds: &IncomeThresholds) -> EligibilityTier {
    if profile.smi_percent <= thresholds.weatherization_smi_max
        || profile.fpl_percent <= thresholds.weatherization_fpl_max
    {
        return EligibilityTier::Weatherization;
    }

    if profile.ami_percent > thresholds.weatherization_smi_max
        && profile.ami_percent <= thresholds.cpf_tier1_ami_max
    {
        return EligibilityTier::CpfLowIncome;
    }

    // The moderate band's lower bound is exclusive: a household exactly at
    // hear_moderate_ami_min lands in the standard tier.
    if profile.ami_percent > thresholds.hear_moderate_ami_min
        && profile.ami_percent <= thresholds.hear_moderate_ami_max
    {
        return EligibilityTier::HearModerate;
    }

    EligibilityTier::Standard
}
