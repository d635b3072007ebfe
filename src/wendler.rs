//! Wendler 5/3/1 cycle generation.
//!
//! Every active lift follows the same four-week percentage table of its
//! training max. At most one supplemental template adds volume after the
//! main sets in weeks 1-3.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Block, ExerciseLine, Lift, MaxType, Plan, PlanKind, RoundingRule, Section, SummaryLine,
    validate_weight,
};
use crate::error::{ConfigError, FormulaError};
use crate::formulas::{Formula, LiftInput};

const DEFAULT_TM_PERCENTAGE: f64 = 90.0;

const FSL_SETS: std::ops::RangeInclusive<u32> = 3..=8;
const FSL_REPS: std::ops::RangeInclusive<u32> = 3..=5;

/// One week of the cycle: rep targets and training-max percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Week {
    pub number: u8,
    pub name: &'static str,
    pub reps: [&'static str; 3],
    pub percentages: [f64; 3],
}

impl Week {
    pub fn is_deload(&self) -> bool {
        self.number == 4
    }
}

pub const WEEKS: [Week; 4] = [
    Week {
        number: 1,
        name: "Week 1 (5/5/5+)",
        reps: ["5", "5", "5+"],
        percentages: [0.65, 0.75, 0.85],
    },
    Week {
        number: 2,
        name: "Week 2 (3/3/3+)",
        reps: ["3", "3", "3+"],
        percentages: [0.70, 0.80, 0.90],
    },
    Week {
        number: 3,
        name: "Week 3 (5/3/1+)",
        reps: ["5", "3", "1+"],
        percentages: [0.75, 0.85, 0.95],
    },
    Week {
        number: 4,
        name: "Week 4 (Deload)",
        reps: ["5", "5", "5"],
        percentages: [0.40, 0.50, 0.60],
    },
];

/// Program template as selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Template {
    /// Main sets only.
    Base,
    Fsl,
    Pyramid,
    Widowmaker,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Base => "base",
            Template::Fsl => "fsl",
            Template::Pyramid => "pyramid",
            Template::Widowmaker => "widowmaker",
        }
    }

    /// Whether the template adds supplemental work after the main sets.
    pub fn is_supplemental(&self) -> bool {
        !matches!(self, Template::Base)
    }

    /// Training-max percentage used when none is configured.
    pub fn default_tm_percentage(&self) -> f64 {
        match self {
            Template::Base | Template::Fsl | Template::Pyramid | Template::Widowmaker => {
                DEFAULT_TM_PERCENTAGE
            }
        }
    }
}

impl FromStr for Template {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" | "default" | "none" => Ok(Template::Base),
            "fsl" | "first-set-last" => Ok(Template::Fsl),
            "pyramid" | "pyradmid" => Ok(Template::Pyramid),
            "widowmaker" => Ok(Template::Widowmaker),
            _ => Err(ConfigError::UnknownTemplate(s.to_string())),
        }
    }
}

impl TryFrom<String> for Template {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.name().to_string()
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sets and reps for First Set Last work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FslParams {
    pub sets: u32,
    pub reps: u32,
}

impl FslParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !FSL_SETS.contains(&self.sets) {
            return Err(ConfigError::FslSetsOutOfRange(self.sets));
        }
        if !FSL_REPS.contains(&self.reps) {
            return Err(ConfigError::FslRepsOutOfRange(self.reps));
        }
        Ok(())
    }
}

/// Validated supplemental scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Supplemental {
    Fsl(FslParams),
    Pyramid,
    Widowmaker,
}

impl Supplemental {
    /// Picks the single supplemental scheme out of the selected templates.
    ///
    /// # Errors
    /// Returns ConfigError if more than one supplemental template is
    /// selected, or FSL is selected without valid sets/reps.
    pub fn resolve(
        templates: &[Template],
        fsl_params: Option<FslParams>,
    ) -> Result<Option<Self>, ConfigError> {
        let selected: Vec<Template> = templates
            .iter()
            .copied()
            .filter(Template::is_supplemental)
            .collect();

        match selected.as_slice() {
            [] => Ok(None),
            [Template::Fsl] => {
                let params = fsl_params.ok_or(ConfigError::MissingFslParams)?;
                params.validate()?;
                Ok(Some(Supplemental::Fsl(params)))
            }
            [Template::Pyramid] => Ok(Some(Supplemental::Pyramid)),
            [Template::Widowmaker] => Ok(Some(Supplemental::Widowmaker)),
            _ => Err(ConfigError::MutuallyExclusiveTemplates(selected)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Supplemental::Fsl(_) => "FSL",
            Supplemental::Pyramid => "PYRAMID",
            Supplemental::Widowmaker => "WIDOWMAKER",
        }
    }

    /// Supplemental lines for one lift in one week. Deload weeks get none.
    pub fn lines(
        &self,
        week: &Week,
        training_max: f64,
        rounding: &RoundingRule,
    ) -> Vec<ExerciseLine> {
        if week.is_deload() {
            return Vec::new();
        }

        let line = |prescription: String, percentage: f64| ExerciseLine::Supplemental {
            label: self.label().to_string(),
            prescription,
            weight: rounding.round(training_max * percentage),
            percentage,
        };
        let [first, second, _] = week.percentages;

        match self {
            Supplemental::Fsl(params) => {
                vec![line(format!("{} x {}", params.sets, params.reps), first)]
            }
            Supplemental::Widowmaker => vec![line("AMRAP".to_string(), first)],
            Supplemental::Pyramid => vec![
                line(format!("{} reps", week.reps[1]), second),
                line(format!("{}+ reps", week.reps[0]), first),
            ],
        }
    }
}

/// Inputs for a 5/3/1 cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WendlerConfig {
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub press: f64,
    /// Lifts to program, in output order.
    pub active_lifts: Vec<Lift>,
    pub max_type: MaxType,
    /// Percentage of a 1RM used as the training max; defaults per template.
    pub tm_percentage: Option<f64>,
    pub templates: Vec<Template>,
    pub fsl_params: Option<FslParams>,
    pub rounding: RoundingRule,
    /// Free text printed between the training maxes and the first week.
    pub header: Option<String>,
    /// Lifts whose value is an estimated one-rep max, whatever `max_type` says.
    #[serde(skip)]
    pub estimated: BTreeSet<Lift>,
}

impl Default for WendlerConfig {
    fn default() -> Self {
        Self {
            squat: 100.0,
            bench: 100.0,
            deadlift: 100.0,
            press: 100.0,
            active_lifts: Lift::all().to_vec(),
            max_type: MaxType::default(),
            tm_percentage: None,
            templates: Vec::new(),
            fsl_params: None,
            rounding: RoundingRule::default(),
            header: None,
            estimated: BTreeSet::new(),
        }
    }
}

impl WendlerConfig {
    pub fn max_for(&self, lift: Lift) -> f64 {
        match lift {
            Lift::Squat => self.squat,
            Lift::Bench => self.bench,
            Lift::Deadlift => self.deadlift,
            Lift::Press => self.press,
        }
    }

    pub fn set_max(&mut self, lift: Lift, value: f64) {
        match lift {
            Lift::Squat => self.squat = value,
            Lift::Bench => self.bench = value,
            Lift::Deadlift => self.deadlift = value,
            Lift::Press => self.press = value,
        }
    }

    /// Replaces lift maxes with performances resolved through `formula`.
    ///
    /// Any formula other than the training-max passthrough yields one-rep
    /// maxes, so those lifts are marked as estimated and scaled to training
    /// maxes. Lifts given as plain values keep `max_type`.
    pub fn apply_lift_inputs(
        &mut self,
        inputs: &BTreeMap<Lift, LiftInput>,
        formula: Formula,
    ) -> Result<(), FormulaError> {
        for (&lift, input) in inputs {
            let value = input.resolve(formula)?;
            log::debug!(
                "{}: {} x {} -> {:.2} kg ({})",
                lift,
                input.weight,
                input.reps,
                value,
                formula
            );
            self.set_max(lift, value);
            if formula != Formula::TrainingMax {
                self.estimated.insert(lift);
            }
        }

        Ok(())
    }

    /// Checks the configuration and returns the supplemental scheme to use.
    pub fn validate(&self) -> Result<Option<Supplemental>, ConfigError> {
        let supplemental = Supplemental::resolve(&self.templates, self.fsl_params)?;

        if self.active_lifts.is_empty() {
            return Err(ConfigError::NoActiveLifts);
        }
        for (i, lift) in self.active_lifts.iter().enumerate() {
            if self.active_lifts[..i].contains(lift) {
                return Err(ConfigError::DuplicateLift(*lift));
            }
            validate_weight(lift.display_name(), self.max_for(*lift))?;
        }

        if let Some(pct) = self.tm_percentage
            && !(pct > 0.0 && pct <= 100.0)
        {
            return Err(ConfigError::BadTrainingMaxPercentage(pct));
        }

        self.rounding.validate()?;
        Ok(supplemental)
    }

    /// Training-max percentage in effect: configured, else the template default.
    pub fn effective_tm_percentage(&self) -> f64 {
        self.tm_percentage.unwrap_or_else(|| {
            self.templates
                .iter()
                .find(|t| t.is_supplemental())
                .unwrap_or(&Template::Base)
                .default_tm_percentage()
        })
    }

    /// Training maxes of the active lifts, in output order.
    pub fn training_maxes(&self) -> Vec<(Lift, f64)> {
        let tm_scale = self.effective_tm_percentage() / 100.0;

        self.active_lifts
            .iter()
            .map(|&lift| {
                let one_rep_max =
                    self.max_type == MaxType::OneRepMax || self.estimated.contains(&lift);
                let scale = if one_rep_max { tm_scale } else { 1.0 };
                (lift, self.max_for(lift) * scale)
            })
            .collect()
    }
}

/// Builds a four-week 5/3/1 plan.
///
/// # Errors
/// Returns ConfigError for conflicting or incomplete template selection,
/// an empty or repeated lift list, non-positive maxes, or an invalid
/// training-max percentage or rounding increment.
pub fn build_wendler_plan(config: &WendlerConfig) -> Result<Plan, ConfigError> {
    let supplemental = config.validate()?;
    let maxes = config.training_maxes();

    for (lift, tm) in &maxes {
        log::debug!("{} training max: {:.2} kg", lift, tm);
    }

    let sections = WEEKS
        .iter()
        .map(|week| Section {
            label: week.name.to_string(),
            blocks: maxes
                .iter()
                .map(|&(lift, tm)| Block {
                    heading: Some(lift.display_name().to_string()),
                    lines: week_lines(week, tm, &config.rounding, supplemental.as_ref()),
                })
                .collect(),
        })
        .collect();

    let title = supplemental.map(|s| s.label()).unwrap_or("Base");

    Ok(Plan {
        kind: PlanKind::Wendler,
        title: format!("Wendler 5/3/1: {}", title),
        summary: maxes
            .iter()
            .map(|&(lift, tm)| SummaryLine {
                name: lift.display_name().to_string(),
                weight: tm,
            })
            .collect(),
        header: config.header.clone(),
        sections,
    })
}

fn week_lines(
    week: &Week,
    training_max: f64,
    rounding: &RoundingRule,
    supplemental: Option<&Supplemental>,
) -> Vec<ExerciseLine> {
    let mut lines: Vec<ExerciseLine> = week
        .percentages
        .iter()
        .zip(week.reps.iter())
        .enumerate()
        .map(|(i, (&percentage, &reps))| ExerciseLine::Set {
            number: i + 1,
            reps: reps.to_string(),
            weight: rounding.round(training_max * percentage),
            percentage,
        })
        .collect();

    if let Some(supplemental) = supplemental {
        lines.extend(supplemental.lines(week, training_max, rounding));
    }

    lines
}
