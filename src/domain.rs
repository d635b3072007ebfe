//! Domain types shared by the plan generators and the renderer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::formulas::round_to;

/// Main lifts programmed by the 5/3/1 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
    Press,
}

impl Lift {
    /// Returns all lifts in programming order.
    pub fn all() -> &'static [Lift] {
        &[Lift::Squat, Lift::Bench, Lift::Deadlift, Lift::Press]
    }

    /// Returns the display name for the lift.
    pub fn display_name(&self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::Bench => "Bench",
            Lift::Deadlift => "Deadlift",
            Lift::Press => "Press",
        }
    }
}

impl FromStr for Lift {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squat" => Ok(Lift::Squat),
            "bench" | "bench press" => Ok(Lift::Bench),
            "deadlift" => Ok(Lift::Deadlift),
            "press" | "ohp" | "overhead press" => Ok(Lift::Press),
            _ => Err(ConfigError::UnknownLift(s.to_string())),
        }
    }
}

impl TryFrom<String> for Lift {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lift> for String {
    fn from(lift: Lift) -> Self {
        lift.display_name().to_lowercase()
    }
}

impl std::fmt::Display for Lift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Day intensity in a Heavy-Light-Medium rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Heavy,
    Medium,
    Light,
}

impl Intensity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Intensity::Heavy => "Heavy",
            Intensity::Medium => "Medium",
            Intensity::Light => "Light",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Whether supplied lift values are training maxes or one-rep maxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxType {
    #[default]
    TrainingMax,
    OneRepMax,
}

/// Fractional reductions applied to a heavy weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionTable {
    pub medium: f64,
    pub light: f64,
}

impl Default for ReductionTable {
    fn default() -> Self {
        Self {
            medium: 0.10,
            light: 0.20,
        }
    }
}

impl ReductionTable {
    /// Checks that both reductions lie in [0, 1).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("medium", self.medium), ("light", self.light)] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::BadReduction { name, value });
            }
        }
        Ok(())
    }

    /// Multiplier that turns a heavy weight into the given intensity.
    pub fn factor(&self, intensity: Intensity) -> f64 {
        match intensity {
            Intensity::Heavy => 1.0,
            Intensity::Medium => 1.0 - self.medium,
            Intensity::Light => 1.0 - self.light,
        }
    }
}

/// Plate increment every derived weight is rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundingRule {
    pub increment: f64,
}

impl Default for RoundingRule {
    fn default() -> Self {
        Self { increment: 2.5 }
    }
}

impl RoundingRule {
    pub fn new(increment: f64) -> Result<Self, ConfigError> {
        let rule = Self { increment };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.increment.is_finite() || self.increment <= 0.0 {
            return Err(ConfigError::BadIncrement(self.increment));
        }
        Ok(())
    }

    /// Rounds a weight to the nearest multiple of the increment.
    pub fn round(&self, weight: f64) -> f64 {
        round_to(weight, self.increment)
    }
}

/// Checks that a supplied lift weight is a positive, finite number.
pub fn validate_weight(lift: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::BadWeight {
            lift: lift.to_string(),
            value,
        });
    }
    Ok(())
}

/// Which generator produced a plan. The renderer formats summaries per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Hlm,
    Wendler,
}

/// A complete generated program, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub kind: PlanKind,
    pub title: String,
    pub summary: Vec<SummaryLine>,
    pub header: Option<String>,
    pub sections: Vec<Section>,
}

/// One named lift and its base weight (HLM) or training max (5/3/1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub weight: f64,
}

/// A training day (HLM) or week (5/3/1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub label: String,
    pub blocks: Vec<Block>,
}

/// Lines grouped under an optional lift heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub heading: Option<String>,
    pub lines: Vec<ExerciseLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseLine {
    /// A named exercise at one intensity; `weight` is None for bodyweight work.
    Exercise {
        intensity: Intensity,
        name: String,
        scheme: String,
        weight: Option<f64>,
        note: Option<String>,
    },
    /// A main working set of a percentage program.
    Set {
        number: usize,
        reps: String,
        weight: f64,
        percentage: f64,
    },
    /// Extra volume after the main sets (FSL, Pyramid, Widowmaker).
    Supplemental {
        label: String,
        prescription: String,
        weight: f64,
        percentage: f64,
    },
}

#[cfg(test)]
impl Section {
    /// Iterates every line of the section across its blocks.
    pub fn lines(&self) -> impl Iterator<Item = &ExerciseLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lift_from_str_lowercase() {
        assert_eq!(Lift::from_str("squat").unwrap(), Lift::Squat);
        assert_eq!(Lift::from_str("bench").unwrap(), Lift::Bench);
        assert_eq!(Lift::from_str("deadlift").unwrap(), Lift::Deadlift);
        assert_eq!(Lift::from_str("press").unwrap(), Lift::Press);
    }

    #[test]
    fn test_lift_from_str_aliases_and_case() {
        assert_eq!(Lift::from_str("OHP").unwrap(), Lift::Press);
        assert_eq!(Lift::from_str("  Bench Press ").unwrap(), Lift::Bench);
        assert_eq!(Lift::from_str("DeadLift").unwrap(), Lift::Deadlift);
    }

    #[test]
    fn test_lift_from_str_invalid() {
        assert_eq!(
            Lift::from_str("curl"),
            Err(ConfigError::UnknownLift("curl".to_string()))
        );
        assert!(Lift::from_str("").is_err());
    }

    #[test]
    fn test_reduction_factor() {
        let table = ReductionTable::default();
        assert_eq!(table.factor(Intensity::Heavy), 1.0);
        assert!((table.factor(Intensity::Medium) - 0.9).abs() < 1e-12);
        assert!((table.factor(Intensity::Light) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_reduction_validate() {
        assert!(ReductionTable::default().validate().is_ok());
        assert!(
            ReductionTable {
                medium: 0.0,
                light: 0.0
            }
            .validate()
            .is_ok()
        );
        assert!(matches!(
            ReductionTable {
                medium: 1.0,
                light: 0.2
            }
            .validate(),
            Err(ConfigError::BadReduction { name: "medium", .. })
        ));
        assert!(matches!(
            ReductionTable {
                medium: 0.1,
                light: -0.1
            }
            .validate(),
            Err(ConfigError::BadReduction { name: "light", .. })
        ));
    }

    #[test]
    fn test_rounding_rule_rejects_non_positive() {
        assert!(RoundingRule::new(2.5).is_ok());
        assert_eq!(RoundingRule::new(0.0), Err(ConfigError::BadIncrement(0.0)));
        assert!(RoundingRule::new(-1.0).is_err());
        assert!(RoundingRule::new(f64::NAN).is_err());
    }

    #[test]
    fn test_rounding_rule_round() {
        let rule = RoundingRule::default();
        assert_eq!(rule.round(108.0), 107.5);
        assert_eq!(rule.round(96.0), 95.0);
        let half = RoundingRule::new(0.5).unwrap();
        assert_eq!(half.round(54.3), 54.5);
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight("squat", 100.0).is_ok());
        assert!(validate_weight("squat", 0.0).is_err());
        assert!(validate_weight("squat", -5.0).is_err());
        assert!(validate_weight("squat", f64::INFINITY).is_err());
    }
}
