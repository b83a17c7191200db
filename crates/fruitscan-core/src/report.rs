//! Presentation mapping for diagnoses.
//!
//! Pure functions from a result to the tiers, bands and sections a renderer
//! shows. No decision logic beyond presentation branching lives here.

use crate::analysis::{Diagnosis, Severity};

/// Visual tier of a disease severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTier {
    Healthy,
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Healthy => "✓",
            Self::Mild => "ℹ",
            Self::Moderate | Self::Severe => "⚠",
        }
    }
}

/// Map a severity to its tier. Unrecognized values render as healthy.
pub fn severity_tier(severity: &Severity) -> SeverityTier {
    match severity {
        Severity::Mild => SeverityTier::Mild,
        Severity::Moderate => SeverityTier::Moderate,
        Severity::Severe => SeverityTier::Severe,
        Severity::Healthy | Severity::Other(_) => SeverityTier::Healthy,
    }
}

/// Banding of the affected share of the fruit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageBand {
    Minimal,
    Light,
    Moderate,
    Heavy,
}

impl DamageBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minimal => "Minimal damage",
            Self::Light => "Light damage",
            Self::Moderate => "Moderate damage",
            Self::Heavy => "Heavy damage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Minimal => "Only small spots are affected; the fruit is largely intact.",
            Self::Light => "Damage is localized and can usually be cut away.",
            Self::Moderate => "A large part of the fruit is affected.",
            Self::Heavy => "Most of the fruit is affected and should be discarded.",
        }
    }
}

/// Band thresholds: ≤10, ≤30, ≤60, above 60.
pub fn damage_band(affected_percentage: f64) -> DamageBand {
    if affected_percentage <= 10.0 {
        DamageBand::Minimal
    } else if affected_percentage <= 30.0 {
        DamageBand::Light
    } else if affected_percentage <= 60.0 {
        DamageBand::Moderate
    } else {
        DamageBand::Heavy
    }
}

/// Which optional report sections have something to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections {
    pub damage: bool,
    pub edibility: bool,
    pub notes: bool,
    pub immediate: bool,
    pub prevention: bool,
    pub chemicals: bool,
}

pub fn sections(diagnosis: &Diagnosis) -> Sections {
    Sections {
        damage: diagnosis.affected_percentage.is_some(),
        edibility: diagnosis.is_edible.is_some(),
        notes: !diagnosis.additional_notes.trim().is_empty(),
        immediate: !diagnosis.treatment.immediate.is_empty(),
        prevention: !diagnosis.treatment.prevention.is_empty(),
        chemicals: !diagnosis.treatment.chemicals.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Disease, Treatment};

    fn diagnosis() -> Diagnosis {
        Diagnosis {
            fruit_type: "Strawberry".into(),
            is_healthy: false,
            health_status: None,
            is_edible: None,
            edibility_reason: None,
            affected_percentage: None,
            disease: Disease {
                name: "Gray Mold".into(),
                severity: Severity::Moderate,
                confidence: 81.0,
                description: "Fuzzy gray growth".into(),
            },
            treatment: Treatment::default(),
            additional_notes: String::new(),
        }
    }

    #[test]
    fn test_severity_tier() {
        let tier = |s: &str| severity_tier(&Severity::from(s.to_string()));
        assert_eq!(tier("Healthy"), SeverityTier::Healthy);
        assert_eq!(tier("MILD"), SeverityTier::Mild);
        assert_eq!(tier("moderate"), SeverityTier::Moderate);
        assert_eq!(tier("Severe"), SeverityTier::Severe);
        assert_eq!(tier("catastrophic"), SeverityTier::Healthy);
    }

    #[test]
    fn test_damage_band_boundaries() {
        assert_eq!(damage_band(0.0), DamageBand::Minimal);
        assert_eq!(damage_band(10.0), DamageBand::Minimal);
        assert_eq!(damage_band(10.5), DamageBand::Light);
        assert_eq!(damage_band(30.0), DamageBand::Light);
        assert_eq!(damage_band(31.0), DamageBand::Moderate);
        assert_eq!(damage_band(60.0), DamageBand::Moderate);
        assert_eq!(damage_band(60.1), DamageBand::Heavy);
        assert_eq!(damage_band(100.0), DamageBand::Heavy);
    }

    #[test]
    fn test_sections_empty() {
        assert_eq!(sections(&diagnosis()), Sections::default());
    }

    #[test]
    fn test_sections_populated() {
        let mut d = diagnosis();
        d.is_edible = Some(false);
        d.affected_percentage = Some(40.0);
        d.additional_notes = "Sliced fruit, internal rot".into();
        d.treatment.chemicals = vec!["Fenhexamid".into()];

        let s = sections(&d);
        assert!(s.damage && s.edibility && s.notes && s.chemicals);
        assert!(!s.immediate && !s.prevention);
    }
}
