//! Error types for plan generation.

use thiserror::Error;

use crate::domain::Lift;
use crate::formulas::Formula;
use crate::wendler::Template;

/// Errors raised while validating a program configuration.
///
/// All of these are detected before any part of a plan is rendered.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("templates {0:?} are mutually exclusive: select at most one of FSL, Pyramid or Widowmaker")]
    MutuallyExclusiveTemplates(Vec<Template>),

    #[error("FSL template selected without FSL sets/reps")]
    MissingFslParams,

    #[error("FSL sets must be between 3 and 8, got {0}")]
    FslSetsOutOfRange(u32),

    #[error("FSL reps must be between 3 and 5, got {0}")]
    FslRepsOutOfRange(u32),

    #[error("unsupported 1RM formula: {0}")]
    UnsupportedFormula(String),

    #[error("unknown lift: {0}")]
    UnknownLift(String),

    #[error("unknown HLM variant: {0}")]
    UnknownVariant(String),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("weight for {lift} must be positive: {value}")]
    BadWeight { lift: String, value: f64 },

    #[error("{name} reduction must be in [0, 1): {value}")]
    BadReduction { name: &'static str, value: f64 },

    #[error("rounding increment must be positive: {0}")]
    BadIncrement(f64),

    #[error("training max percentage must be in (0, 100]: {0}")]
    BadTrainingMaxPercentage(f64),

    #[error("at least one lift must be active")]
    NoActiveLifts,

    #[error("lift listed more than once: {0}")]
    DuplicateLift(Lift),

    #[error("invalid lift input {0:?}, expected WEIGHT or WEIGHTxREPS")]
    BadLiftInput(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("cannot read file: {0}")]
    CannotRead(String),

    #[error("invalid program file: {0}")]
    InvalidFile(String),
}

/// Errors that can occur in formula calculations.
#[derive(Debug, Error, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum FormulaError {
    #[error("weight must be positive: {0}")]
    BadWeight(f64),

    #[error("repetitions must be positive: {0}")]
    BadReps(u32),

    #[error("{formula} is undefined for {reps} repetitions")]
    RepsOutOfDomain { formula: Formula, reps: u32 },
}

/// Any error raised while turning a configuration into a plan.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Formula(#[from] FormulaError),
}
