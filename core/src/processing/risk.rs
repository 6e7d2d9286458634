use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Graded deviation of a final-approach parameter from its nominal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Nominal,
    Marginal,
    Exceeding,
}

impl RiskLevel {
    pub fn level(&self) -> u8 {
        match self {
            RiskLevel::Nominal => 0,
            RiskLevel::Marginal => 1,
            RiskLevel::Exceeding => 2,
        }
    }
}

/// Nominal band and the wider marginal band enclosing it.
struct RiskBands {
    nominal: RangeInclusive<f64>,
    marginal: RangeInclusive<f64>,
}

impl RiskBands {
    fn grade(&self, value: f64) -> RiskLevel {
        if self.nominal.contains(&value) {
            RiskLevel::Nominal
        } else if self.marginal.contains(&value) {
            RiskLevel::Marginal
        } else {
            RiskLevel::Exceeding
        }
    }
}

const IAS_BANDS: RiskBands = RiskBands {
    nominal: 61.0..=66.0,
    marginal: 56.0..=71.0,
};

const VSI_BANDS: RiskBands = RiskBands {
    nominal: -800.0..=-500.0,
    marginal: -1000.0..=-250.0,
};

const CROSSTRACK_BANDS: RiskBands = RiskBands {
    nominal: -40.0..=40.0,
    marginal: -50.0..=50.0,
};

/// Risk levels of the final-gate means; `None` when the gate saw no samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub ias: Option<RiskLevel>,
    pub vsi: Option<RiskLevel>,
    pub crosstrack: Option<RiskLevel>,
}

impl RiskAssessment {
    pub fn grade(ias: Option<f64>, vsi: Option<f64>, crosstrack: Option<f64>) -> Self {
        Self {
            ias: ias.map(|v| IAS_BANDS.grade(v)),
            vsi: vsi.map(|v| VSI_BANDS.grade(v)),
            crosstrack: crosstrack.map(|v| CROSSTRACK_BANDS.grade(v)),
        }
    }

    /// Worst level over the graded parameters.
    pub fn overall(&self) -> Option<RiskLevel> {
        [self.ias, self.vsi, self.crosstrack].into_iter().flatten().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ias_bands() {
        assert_eq!(IAS_BANDS.grade(63.0), RiskLevel::Nominal);
        assert_eq!(IAS_BANDS.grade(61.0), RiskLevel::Nominal);
        assert_eq!(IAS_BANDS.grade(58.0), RiskLevel::Marginal);
        assert_eq!(IAS_BANDS.grade(70.5), RiskLevel::Marginal);
        assert_eq!(IAS_BANDS.grade(50.0), RiskLevel::Exceeding);
        assert_eq!(IAS_BANDS.grade(80.0), RiskLevel::Exceeding);
    }

    #[test]
    fn vsi_and_crosstrack_bands() {
        assert_eq!(VSI_BANDS.grade(-600.0), RiskLevel::Nominal);
        assert_eq!(VSI_BANDS.grade(-900.0), RiskLevel::Marginal);
        assert_eq!(VSI_BANDS.grade(-100.0), RiskLevel::Exceeding);
        assert_eq!(CROSSTRACK_BANDS.grade(-45.0), RiskLevel::Marginal);
        assert_eq!(CROSSTRACK_BANDS.grade(60.0), RiskLevel::Exceeding);
    }

    #[test]
    fn overall_is_the_worst_graded_level() {
        let risk = RiskAssessment::grade(Some(64.0), Some(-900.0), None);
        assert_eq!(risk.crosstrack, None);
        assert_eq!(risk.overall(), Some(RiskLevel::Marginal));
        assert_eq!(RiskAssessment::default().overall(), None);
    }
}
