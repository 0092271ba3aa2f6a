use super::common::{profile, thresholds};
use crate::assessment::domain::EligibilityTier;
use crate::assessment::eligibility::classify;

#[test]
fn smi_at_weatherization_cutoff_qualifies() {
    let tier = classify(&profile(70, 60, 250), &thresholds());
    assert_eq!(tier, EligibilityTier::Weatherization);
}

#[test]
fn fpl_at_weatherization_cutoff_qualifies() {
    // High AMI does not matter when the poverty-level test passes.
    let tier = classify(&profile(85, 70, 200), &thresholds());
    assert_eq!(tier, EligibilityTier::Weatherization);
}

#[test]
fn low_income_household_is_weatherization() {
    let tier = classify(&profile(55, 55, 195), &thresholds());
    assert_eq!(tier, EligibilityTier::Weatherization);
}

#[test]
fn ami_at_cpf_cutoff_is_cpf_low_income() {
    let tier = classify(&profile(80, 80, 250), &thresholds());
    assert_eq!(tier, EligibilityTier::CpfLowIncome);
}

#[test]
fn ami_at_moderate_cutoff_is_hear_moderate() {
    let tier = classify(&profile(150, 150, 450), &thresholds());
    assert_eq!(tier, EligibilityTier::HearModerate);
}

#[test]
fn ami_above_moderate_cutoff_is_standard() {
    let tier = classify(&profile(151, 151, 460), &thresholds());
    assert_eq!(tier, EligibilityTier::Standard);
}

#[test]
fn moderate_band_lower_bound_is_exclusive() {
    // Exactly at the lower bound falls through to the standard tier.
    let tier = classify(&profile(81, 81, 260), &thresholds());
    assert_eq!(tier, EligibilityTier::Standard);
}

#[test]
fn mid_moderate_band_classifies() {
    let tier = classify(&profile(120, 120, 350), &thresholds());
    assert_eq!(tier, EligibilityTier::HearModerate);
}

#[test]
fn every_input_maps_to_exactly_one_tier() {
    let thresholds = thresholds();
    for ami in (0u16..400).step_by(7) {
        let tier = classify(&profile(ami, ami, ami * 3), &thresholds);
        // Classification is total; the match below also documents the
        // expected band per input.
        match tier {
            EligibilityTier::Weatherization => {
                assert!(ami <= 60 || ami * 3 <= 200);
            }
            EligibilityTier::CpfLowIncome => {
                assert!(ami > 60 && ami <= 80);
            }
            EligibilityTier::HearModerate => {
                assert!(ami > 81 && ami <= 150);
            }
            EligibilityTier::Standard => {
                assert!(ami == 81 || ami > 150);
            }
        }
    }
}
