//! Heavy-Light-Medium weekly program generation.
//!
//! Heavy weights are taken as supplied. Medium and light weights are derived
//! once from the heavy weight using the reduction table and rounded to the
//! configured increment. A variant's day table decides which intensity of
//! which lift goes into each of the three slots on Monday, Wednesday and
//! Friday.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Block, ExerciseLine, Intensity, Plan, PlanKind, ReductionTable, RoundingRule, Section,
    SummaryLine, validate_weight,
};
use crate::error::ConfigError;

/// Day templates selectable for an HLM week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HlmVariant {
    #[default]
    Standard,
    /// Secondary press takes Monday's pressing slot.
    AlternatePressing,
    /// Wednesday presses are replaced by weighted dips.
    OhpFocus,
}

impl HlmVariant {
    pub fn name(&self) -> &'static str {
        match self {
            HlmVariant::Standard => "standard",
            HlmVariant::AlternatePressing => "alternate-pressing",
            HlmVariant::OhpFocus => "ohp-focus",
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            HlmVariant::Standard => "HLM Standard 5s",
            HlmVariant::AlternatePressing => "HLM Standard 5s (Alternate Pressing)",
            HlmVariant::OhpFocus => "HLM Standard 5s (OHP Focus)",
        }
    }

    fn days(&self) -> &'static [DayTemplate; 3] {
        match self {
            HlmVariant::Standard => &STANDARD_DAYS,
            HlmVariant::AlternatePressing => &ALTERNATE_PRESSING_DAYS,
            HlmVariant::OhpFocus => &OHP_FOCUS_DAYS,
        }
    }
}

impl FromStr for HlmVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(HlmVariant::Standard),
            "alternate-pressing" | "alternate" => Ok(HlmVariant::AlternatePressing),
            "ohp-focus" | "ohp" => Ok(HlmVariant::OhpFocus),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

impl TryFrom<String> for HlmVariant {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HlmVariant> for String {
    fn from(variant: HlmVariant) -> Self {
        variant.name().to_string()
    }
}

impl std::fmt::Display for HlmVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lift families with heavy, medium and light weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HlmLift {
    Squat,
    Pull,
    Press,
}

impl HlmLift {
    pub fn all() -> &'static [HlmLift] {
        &LIFTS
    }
}

const LIFTS: [HlmLift; 3] = [HlmLift::Squat, HlmLift::Pull, HlmLift::Press];
const INTENSITIES: [Intensity; 3] = [Intensity::Heavy, Intensity::Medium, Intensity::Light];

/// Rep scheme of an explicitly supplied secondary lift.
const SECONDARY_SCHEME: &str = "5x5";
const BACKOFF_NOTE: &str = "4x5 Backoff";

/// One exercise slot of a training day.
#[derive(Debug, Clone, Copy)]
enum Slot {
    /// A lift family at a fixed intensity.
    Lift {
        lift: HlmLift,
        intensity: Intensity,
        scheme: &'static str,
        backoff: bool,
    },
    /// The secondary press when supplied, otherwise the fallback. A `None`
    /// fallback programs the secondary press as bodyweight work.
    SecondaryPress {
        fallback: Option<(Intensity, &'static str)>,
    },
    /// The secondary pull when supplied, otherwise a light or medium pull.
    SecondaryPull {
        fallback: (Intensity, &'static str),
    },
}

#[derive(Debug, Clone, Copy)]
struct DayTemplate {
    label: &'static str,
    slots: [Slot; 3],
}

const fn lift(lift: HlmLift, intensity: Intensity, scheme: &'static str) -> Slot {
    Slot::Lift {
        lift,
        intensity,
        scheme,
        backoff: false,
    }
}

const fn top_single(lift: HlmLift) -> Slot {
    Slot::Lift {
        lift,
        intensity: Intensity::Heavy,
        scheme: "1x1-5",
        backoff: true,
    }
}

const STANDARD_DAYS: [DayTemplate; 3] = [
    DayTemplate {
        label: "Mon",
        slots: [
            top_single(HlmLift::Squat),
            lift(HlmLift::Press, Intensity::Medium, "4x5"),
            Slot::SecondaryPull {
                fallback: (Intensity::Light, "3x3-5"),
            },
        ],
    },
    DayTemplate {
        label: "Wed",
        slots: [
            lift(HlmLift::Squat, Intensity::Light, "3x5"),
            Slot::SecondaryPress {
                fallback: Some((Intensity::Light, "3x5")),
            },
            lift(HlmLift::Pull, Intensity::Heavy, "2x1-5"),
        ],
    },
    DayTemplate {
        label: "Fri",
        slots: [
            lift(HlmLift::Squat, Intensity::Medium, "4x5"),
            top_single(HlmLift::Press),
            lift(HlmLift::Pull, Intensity::Medium, "3x4-5"),
        ],
    },
];

const ALTERNATE_PRESSING_DAYS: [DayTemplate; 3] = [
    DayTemplate {
        label: "Mon",
        slots: [
            top_single(HlmLift::Squat),
            Slot::SecondaryPress {
                fallback: Some((Intensity::Medium, "4x5")),
            },
            Slot::SecondaryPull {
                fallback: (Intensity::Light, "3x3-5"),
            },
        ],
    },
    DayTemplate {
        label: "Wed",
        slots: [
            lift(HlmLift::Squat, Intensity::Light, "3x5"),
            lift(HlmLift::Press, Intensity::Light, "3x5"),
            lift(HlmLift::Pull, Intensity::Heavy, "2x1-5"),
        ],
    },
    STANDARD_DAYS[2],
];

const OHP_FOCUS_DAYS: [DayTemplate; 3] = [
    STANDARD_DAYS[0],
    DayTemplate {
        label: "Wed",
        slots: [
            lift(HlmLift::Squat, Intensity::Light, "3x5"),
            Slot::SecondaryPress { fallback: None },
            lift(HlmLift::Pull, Intensity::Heavy, "2x1-5"),
        ],
    },
    STANDARD_DAYS[2],
];

/// Display names for each programmed exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseNames {
    pub squat: String,
    pub pull: String,
    pub press: String,
    pub secondary_press: String,
    pub secondary_pull: String,
}

impl Default for ExerciseNames {
    fn default() -> Self {
        Self {
            squat: "Squat".to_string(),
            pull: "Pull".to_string(),
            press: "Press".to_string(),
            secondary_press: "Weighted Dips".to_string(),
            secondary_pull: "Rows".to_string(),
        }
    }
}

impl ExerciseNames {
    fn for_lift(&self, lift: HlmLift) -> &str {
        match lift {
            HlmLift::Squat => &self.squat,
            HlmLift::Pull => &self.pull,
            HlmLift::Press => &self.press,
        }
    }
}

/// Inputs for an HLM week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HlmConfig {
    pub variant: HlmVariant,
    /// Heavy (5s) squat weight.
    pub squat: f64,
    /// Heavy (5s) pull weight.
    pub pull: f64,
    /// Heavy (5s) primary press weight.
    pub press: f64,
    /// Weight for the secondary press, programmed heavy 5x5 when present.
    pub secondary_press: Option<f64>,
    /// Weight for the secondary pull, programmed heavy 5x5 when present.
    pub secondary_pull: Option<f64>,
    /// Used as the medium pull weight instead of the derived one.
    pub medium_pull: Option<f64>,
    /// Used as the light pull weight instead of the derived one.
    pub light_pull: Option<f64>,
    pub reductions: ReductionTable,
    pub rounding: RoundingRule,
    pub names: ExerciseNames,
    /// Free text printed between the weight summary and the schedule.
    pub header: Option<String>,
}

impl Default for HlmConfig {
    fn default() -> Self {
        Self {
            variant: HlmVariant::default(),
            squat: 100.0,
            pull: 100.0,
            press: 100.0,
            secondary_press: None,
            secondary_pull: None,
            medium_pull: None,
            light_pull: None,
            reductions: ReductionTable::default(),
            rounding: RoundingRule::default(),
            names: ExerciseNames::default(),
            header: None,
        }
    }
}

impl HlmConfig {
    /// Checks numeric inputs before any weight is derived.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_weight(&self.names.squat, self.squat)?;
        validate_weight(&self.names.pull, self.pull)?;
        validate_weight(&self.names.press, self.press)?;

        let optional = [
            (self.names.secondary_press.as_str(), self.secondary_press),
            (self.names.secondary_pull.as_str(), self.secondary_pull),
            ("medium pull", self.medium_pull),
            ("light pull", self.light_pull),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                validate_weight(name, value)?;
            }
        }

        self.reductions.validate()?;
        self.rounding.validate()
    }

    fn base_weight(&self, lift: HlmLift) -> f64 {
        match lift {
            HlmLift::Squat => self.squat,
            HlmLift::Pull => self.pull,
            HlmLift::Press => self.press,
        }
    }

    /// Supplied weight that replaces a derived one, if any.
    fn override_for(&self, lift: HlmLift, intensity: Intensity) -> Option<f64> {
        match (lift, intensity) {
            (HlmLift::Pull, Intensity::Medium) => self.medium_pull,
            (HlmLift::Pull, Intensity::Light) => self.light_pull,
            _ => None,
        }
    }
}

/// Weights for every (lift, intensity) pair, computed once per configuration.
///
/// Rows follow `HlmLift` declaration order, columns `Intensity` order.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedWeights {
    weights: [[f64; 3]; 3],
}

impl CalculatedWeights {
    /// Derives the table. Heavy weights are not re-rounded.
    pub fn compute(config: &HlmConfig) -> Self {
        let weights = LIFTS.map(|lift| {
            let base = config.base_weight(lift);
            INTENSITIES.map(|intensity| match (intensity, config.override_for(lift, intensity)) {
                (_, Some(w)) => w,
                (Intensity::Heavy, None) => base,
                (_, None) => config
                    .rounding
                    .round(base * config.reductions.factor(intensity)),
            })
        });

        Self { weights }
    }

    pub fn get(&self, lift: HlmLift, intensity: Intensity) -> f64 {
        self.weights[lift as usize][intensity as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (HlmLift, Intensity, f64)> + '_ {
        LIFTS.into_iter().flat_map(move |lift| {
            INTENSITIES
                .into_iter()
                .map(move |intensity| (lift, intensity, self.get(lift, intensity)))
        })
    }
}

/// Builds a Monday/Wednesday/Friday HLM plan.
///
/// # Errors
/// Returns ConfigError if a weight is not positive, a reduction lies outside
/// [0, 1), or the rounding increment is not positive.
pub fn build_hlm_plan(config: &HlmConfig) -> Result<Plan, ConfigError> {
    config.validate()?;

    let weights = CalculatedWeights::compute(config);
    for (lift, intensity, weight) in weights.iter() {
        log::debug!("{:?} {}: {:.2} kg", lift, intensity, weight);
    }

    let sections = config
        .variant
        .days()
        .iter()
        .map(|day| Section {
            label: day.label.to_string(),
            blocks: vec![Block {
                heading: None,
                lines: day
                    .slots
                    .iter()
                    .map(|slot| resolve_slot(*slot, config, &weights))
                    .collect(),
            }],
        })
        .collect();

    Ok(Plan {
        kind: PlanKind::Hlm,
        title: format!("HLM: {}", config.variant.template_name()),
        summary: summary(config),
        header: config.header.clone(),
        sections,
    })
}

fn summary(config: &HlmConfig) -> Vec<SummaryLine> {
    let names = &config.names;
    let mut lines: Vec<SummaryLine> = HlmLift::all()
        .iter()
        .map(|&lift| SummaryLine {
            name: names.for_lift(lift).to_string(),
            weight: config.base_weight(lift),
        })
        .collect();

    let secondaries = [
        (&names.secondary_press, config.secondary_press),
        (&names.secondary_pull, config.secondary_pull),
    ];
    for (name, weight) in secondaries {
        if let Some(weight) = weight {
            lines.push(SummaryLine {
                name: name.clone(),
                weight,
            });
        }
    }

    lines
}

fn resolve_slot(slot: Slot, config: &HlmConfig, weights: &CalculatedWeights) -> ExerciseLine {
    let names = &config.names;
    let derived = |lift: HlmLift, intensity: Intensity, scheme: &str, backoff: bool| {
        ExerciseLine::Exercise {
            intensity,
            name: names.for_lift(lift).to_string(),
            scheme: scheme.to_string(),
            weight: Some(weights.get(lift, intensity)),
            note: backoff.then(|| BACKOFF_NOTE.to_string()),
        }
    };
    let secondary = |name: &str, weight: Option<f64>| ExerciseLine::Exercise {
        intensity: Intensity::Heavy,
        name: name.to_string(),
        scheme: SECONDARY_SCHEME.to_string(),
        weight,
        note: None,
    };

    match slot {
        Slot::Lift {
            lift,
            intensity,
            scheme,
            backoff,
        } => derived(lift, intensity, scheme, backoff),
        Slot::SecondaryPress { fallback } => match (config.secondary_press, fallback) {
            (Some(weight), _) => secondary(&names.secondary_press, Some(weight)),
            (None, Some((intensity, scheme))) => derived(HlmLift::Press, intensity, scheme, false),
            (None, None) => secondary(&names.secondary_press, None),
        },
        Slot::SecondaryPull {
            fallback: (intensity, scheme),
        } => match config.secondary_pull {
            Some(weight) => secondary(&names.secondary_pull, Some(weight)),
            None => derived(HlmLift::Pull, intensity, scheme, false),
        },
    }
}
