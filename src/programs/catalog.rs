use serde::{Deserialize, Serialize};

/// Funding programs the engine can place on a measure.
///
/// The catalog is closed: the configuration document supplies amounts and
/// eligibility per measure, but the set of programs and their stacking
/// relationships are fixed reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramId {
    Weatherization,
    Hear,
    Homes,
    Cpf,
    EnergyTrustStandard,
    Certa,
}

/// Administrative category of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    Federal,
    State,
    Utility,
    Local,
}

impl ProgramId {
    pub const ALL: [ProgramId; 6] = [
        ProgramId::Weatherization,
        ProgramId::Hear,
        ProgramId::Homes,
        ProgramId::Cpf,
        ProgramId::EnergyTrustStandard,
        ProgramId::Certa,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProgramId::Weatherization => "Oregon Weatherization (OHCS)",
            ProgramId::Hear => "HEAR (IRA Federal)",
            ProgramId::Homes => "HOMES (IRA Federal)",
            ProgramId::Cpf => "CPF - Energy Trust",
            ProgramId::EnergyTrustStandard => "Energy Trust Standard",
            ProgramId::Certa => "CERTA (Enabling Repairs)",
        }
    }

    pub const fn category(self) -> ProgramCategory {
        match self {
            ProgramId::Weatherization => ProgramCategory::State,
            ProgramId::Hear | ProgramId::Homes => ProgramCategory::Federal,
            ProgramId::Cpf => ProgramCategory::State,
            ProgramId::EnergyTrustStandard => ProgramCategory::Utility,
            ProgramId::Certa => ProgramCategory::State,
        }
    }

    /// Whether the program requires income verification.
    pub const fn income_qualified(self) -> bool {
        matches!(
            self,
            ProgramId::Weatherization | ProgramId::Hear | ProgramId::Homes | ProgramId::Cpf
        )
    }

    /// Programs backed by federal dollars, removed by the federal opt-out.
    /// CPF counts: its enhanced rebates ride the same funding pathway.
    pub const fn federally_funded(self) -> bool {
        matches!(
            self,
            ProgramId::Weatherization | ProgramId::Hear | ProgramId::Homes | ProgramId::Cpf
        )
    }

    /// Programs that may never fund the same measure as `self`.
    ///
    /// Weatherization is comprehensive and standalone; HEAR and HOMES are
    /// mutually exclusive per IRA rules; CPF replaces the standard
    /// market-rate track rather than stacking with it.
    pub const fn cannot_stack_with(self) -> &'static [ProgramId] {
        match self {
            ProgramId::Weatherization => &[
                ProgramId::Hear,
                ProgramId::Homes,
                ProgramId::Cpf,
                ProgramId::EnergyTrustStandard,
                ProgramId::Certa,
            ],
            ProgramId::Hear => &[ProgramId::Weatherization, ProgramId::Homes],
            ProgramId::Homes => &[ProgramId::Weatherization, ProgramId::Hear],
            ProgramId::Cpf => &[ProgramId::Weatherization, ProgramId::EnergyTrustStandard],
            ProgramId::EnergyTrustStandard => &[ProgramId::Weatherization, ProgramId::Cpf],
            ProgramId::Certa => &[ProgramId::Weatherization],
        }
    }

    /// Structural anti-stacking check; symmetric by construction.
    pub fn conflicts_with(self, other: ProgramId) -> bool {
        self.cannot_stack_with().contains(&other) || other.cannot_stack_with().contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacking_relation_is_symmetric() {
        for a in ProgramId::ALL {
            for b in ProgramId::ALL {
                assert_eq!(
                    a.conflicts_with(b),
                    b.conflicts_with(a),
                    "conflict between {a:?} and {b:?} must be symmetric"
                );
            }
        }
    }

    #[test]
    fn hear_and_homes_never_stack() {
        assert!(ProgramId::Hear.conflicts_with(ProgramId::Homes));
    }

    #[test]
    fn certa_stacks_with_both_federal_rebates() {
        assert!(!ProgramId::Certa.conflicts_with(ProgramId::Hear));
        assert!(!ProgramId::Certa.conflicts_with(ProgramId::Homes));
        assert!(!ProgramId::Certa.conflicts_with(ProgramId::Cpf));
    }

    #[test]
    fn weatherization_is_standalone() {
        for other in ProgramId::ALL {
            if other != ProgramId::Weatherization {
                assert!(ProgramId::Weatherization.conflicts_with(other));
            }
        }
    }
}
