//! One-rep-max estimation and weight rounding.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FormulaError};

/// Brzycki's denominator reaches zero at this rep count.
const BRZYCKI_REP_LIMIT: u32 = 37;

/// Rounds `value` to the nearest multiple of `increment`, halves away from zero.
pub fn round_to(value: f64, increment: f64) -> f64 {
    (value / increment).round() * increment
}

/// Formula used to turn a rep-max into an estimated 1RM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Formula {
    /// Supplied weights are already maxes and pass through unchanged.
    #[default]
    TrainingMax,
    Epley,
    Brzycki,
    Lombardi,
}

impl Formula {
    /// Returns all estimation formulas, excluding the passthrough.
    pub fn estimators() -> &'static [Formula] {
        &[Formula::Epley, Formula::Brzycki, Formula::Lombardi]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Formula::TrainingMax => "training-max",
            Formula::Epley => "epley",
            Formula::Brzycki => "brzycki",
            Formula::Lombardi => "lombardi",
        }
    }
}

impl FromStr for Formula {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "training-max" | "trainingmax" | "training_max" | "tm" | "none" => {
                Ok(Formula::TrainingMax)
            }
            "epley" => Ok(Formula::Epley),
            // Common misspelling kept for older configuration files
            "brzycki" | "bryzcki" => Ok(Formula::Brzycki),
            "lombardi" => Ok(Formula::Lombardi),
            _ => Err(ConfigError::UnsupportedFormula(s.to_string())),
        }
    }
}

impl TryFrom<String> for Formula {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> Self {
        formula.name().to_string()
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Estimates a one-rep max from a set of `reps` at `weight`.
///
/// For reps == 1 the weight is already a true max and is returned unchanged
/// whatever the formula.
///
/// # Errors
/// Returns FormulaError for a non-positive weight, zero reps, or a rep count
/// outside the formula's domain (Brzycki at 37 reps or more).
pub fn estimate_1rm(weight: f64, reps: u32, formula: Formula) -> Result<f64, FormulaError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(FormulaError::BadWeight(weight));
    }

    if reps == 0 {
        return Err(FormulaError::BadReps(reps));
    }

    if reps == 1 {
        return Ok(weight);
    }

    let r = reps as f64;
    let estimate = match formula {
        Formula::TrainingMax => weight,
        // Epley: w × (1 + r/30)
        Formula::Epley => weight * (1.0 + r / 30.0),
        // Brzycki: w × 36 / (37 - r)
        Formula::Brzycki => {
            if reps >= BRZYCKI_REP_LIMIT {
                return Err(FormulaError::RepsOutOfDomain { formula, reps });
            }
            weight * (36.0 / (37.0 - r))
        }
        // Lombardi: w × r^0.1
        Formula::Lombardi => weight * r.powf(0.1),
    };

    Ok(estimate)
}

/// A lift performance: `weight` lifted for `reps`.
///
/// Parses from `"120"` or `"120x5"`, and deserializes from
/// `{"weight": 120, "reps": 5}` with reps defaulting to one.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LiftInput {
    pub weight: f64,
    #[serde(default = "default_reps")]
    pub reps: u32,
}

fn default_reps() -> u32 {
    1
}

impl LiftInput {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }

    /// Resolves this performance into a max using `formula`.
    pub fn resolve(&self, formula: Formula) -> Result<f64, FormulaError> {
        estimate_1rm(self.weight, self.reps, formula)
    }
}

impl FromStr for LiftInput {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::BadLiftInput(s.to_string());
        let lower = s.trim().to_lowercase();

        let (weight, reps) = match lower.split_once('x') {
            Some((w, r)) => (w.trim(), r.trim().parse::<u32>().map_err(|_| bad())?),
            None => (lower.as_str(), 1),
        };
        let weight = weight.parse::<f64>().map_err(|_| bad())?;

        Ok(Self::new(weight, reps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to check floating point equality with tolerance
    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_round_to_nearest_increment() {
        assert_eq!(round_to(108.0, 2.5), 107.5);
        assert_eq!(round_to(96.0, 2.5), 95.0);
        assert_eq!(round_to(65.0, 2.5), 65.0);
        assert_eq!(round_to(54.25, 0.5), 54.5);
    }

    #[test]
    fn test_round_to_ties_away_from_zero() {
        // 106.25 / 2.5 = 42.5 exactly
        assert_eq!(round_to(106.25, 2.5), 107.5);
        assert_eq!(round_to(1.25, 2.5), 2.5);
    }

    #[test]
    fn test_round_to_within_half_step() {
        let step = 2.5;
        for base in [20.0, 47.5, 60.0, 93.3, 120.0, 141.7, 227.5] {
            for reduction in [0.0, 0.05, 0.1, 0.15, 0.2, 0.33, 0.5, 0.95] {
                let target: f64 = base * (1.0 - reduction);
                let derived = round_to(target, step);
                assert!(
                    (derived - target).abs() <= step / 2.0 + 1e-9,
                    "{} rounded to {}",
                    target,
                    derived
                );
            }
        }
    }

    #[test]
    fn test_e1rm_single_rep() {
        // For 1 rep, every formula returns the weight directly
        for formula in [
            Formula::TrainingMax,
            Formula::Epley,
            Formula::Brzycki,
            Formula::Lombardi,
        ] {
            assert_eq!(estimate_1rm(100.0, 1, formula).unwrap(), 100.0);
            assert_eq!(estimate_1rm(142.5, 1, formula).unwrap(), 142.5);
        }
    }

    #[test]
    fn test_e1rm_epley() {
        // 100kg × 5 reps: 100 × (1 + 5/30) = 116.67
        let e1rm = estimate_1rm(100.0, 5, Formula::Epley).unwrap();
        assert!(approx_eq(e1rm, 116.6667, 0.001));
    }

    #[test]
    fn test_e1rm_brzycki() {
        // 100kg × 5 reps: 100 × 36 / 32 = 112.5
        assert_eq!(estimate_1rm(100.0, 5, Formula::Brzycki).unwrap(), 112.5);
        // 100kg × 10 reps: 100 × 36 / 27 = 133.33
        let e1rm = estimate_1rm(100.0, 10, Formula::Brzycki).unwrap();
        assert!(approx_eq(e1rm, 133.3333, 0.001));
    }

    #[test]
    fn test_e1rm_lombardi() {
        // 100kg × 10 reps: 100 × 10^0.1 = 125.89
        let e1rm = estimate_1rm(100.0, 10, Formula::Lombardi).unwrap();
        assert!(approx_eq(e1rm, 125.8925, 0.001));
    }

    #[test]
    fn test_e1rm_training_max_passthrough() {
        assert_eq!(estimate_1rm(100.0, 8, Formula::TrainingMax).unwrap(), 100.0);
    }

    #[test]
    fn test_e1rm_brzycki_domain() {
        assert!(estimate_1rm(100.0, 36, Formula::Brzycki).is_ok());
        assert_eq!(
            estimate_1rm(100.0, 37, Formula::Brzycki),
            Err(FormulaError::RepsOutOfDomain {
                formula: Formula::Brzycki,
                reps: 37
            })
        );
        assert!(estimate_1rm(100.0, 50, Formula::Brzycki).is_err());
        // Other formulas have no such limit
        assert!(estimate_1rm(100.0, 40, Formula::Epley).is_ok());
    }

    #[test]
    fn test_e1rm_invalid_inputs() {
        assert_eq!(
            estimate_1rm(0.0, 5, Formula::Epley),
            Err(FormulaError::BadWeight(0.0))
        );
        assert!(estimate_1rm(-100.0, 5, Formula::Epley).is_err());
        assert_eq!(
            estimate_1rm(100.0, 0, Formula::Epley),
            Err(FormulaError::BadReps(0))
        );
    }

    #[test]
    fn test_formula_from_str() {
        assert_eq!(Formula::from_str("epley").unwrap(), Formula::Epley);
        assert_eq!(Formula::from_str("Brzycki").unwrap(), Formula::Brzycki);
        assert_eq!(Formula::from_str("bryzcki").unwrap(), Formula::Brzycki);
        assert_eq!(Formula::from_str("LOMBARDI").unwrap(), Formula::Lombardi);
        assert_eq!(
            Formula::from_str("trainingmax").unwrap(),
            Formula::TrainingMax
        );
    }

    #[test]
    fn test_formula_from_str_unsupported() {
        assert_eq!(
            Formula::from_str("wathan"),
            Err(ConfigError::UnsupportedFormula("wathan".to_string()))
        );
    }

    #[test]
    fn test_lift_input_from_str() {
        assert_eq!(
            LiftInput::from_str("120x5").unwrap(),
            LiftInput::new(120.0, 5)
        );
        assert_eq!(
            LiftInput::from_str(" 102.5 X 3 ").unwrap(),
            LiftInput::new(102.5, 3)
        );
        assert_eq!(LiftInput::from_str("140").unwrap(), LiftInput::new(140.0, 1));
    }

    #[test]
    fn test_lift_input_from_str_invalid() {
        assert!(matches!(
            LiftInput::from_str("heavy"),
            Err(ConfigError::BadLiftInput(_))
        ));
        assert!(LiftInput::from_str("120x").is_err());
        assert!(LiftInput::from_str("x5").is_err());
    }

    #[test]
    fn test_lift_input_resolve() {
        let input = LiftInput::new(100.0, 5);
        assert_eq!(input.resolve(Formula::Brzycki).unwrap(), 112.5);
        assert_eq!(input.resolve(Formula::TrainingMax).unwrap(), 100.0);
    }
}
