mod config;
mod domain;
mod error;
mod formulas;
mod hlm;
mod render;
mod wendler;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::load_program;
use crate::domain::{Lift, MaxType, Plan, ReductionTable, RoundingRule};
use crate::formulas::{Formula, LiftInput, estimate_1rm};
use crate::hlm::{ExerciseNames, HlmConfig, HlmVariant, build_hlm_plan};
use crate::render::{render, render_json};
use crate::wendler::{FslParams, Template, WendlerConfig, build_wendler_plan};

/// Strength program generator for Heavy-Light-Medium weeks and 5/3/1 cycles.
#[derive(Parser, Debug)]
#[command(name = "liftplan")]
#[command(about = "Generate Heavy-Light-Medium and Wendler 5/3/1 training plans")]
#[command(version)]
struct Args {
    /// Output format for the generated plan.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Heavy-Light-Medium week on Monday, Wednesday and Friday.
    Hlm(HlmArgs),

    /// Four-week Wendler 5/3/1 cycle.
    Wendler(WendlerArgs),

    /// Estimate a one-rep max from a set of several reps.
    Estimate {
        /// Weight lifted.
        weight: f64,

        /// Repetitions completed.
        reps: u32,

        /// Formula to use; all formulas are shown when omitted.
        #[arg(long)]
        formula: Option<Formula>,
    },

    /// Generate the plan described by a JSON program file.
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Settings shared by both generators.
#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Plate increment every derived weight is rounded to.
    /// Can also be set via LIFTPLAN_INCREMENT environment variable.
    #[arg(long, env = "LIFTPLAN_INCREMENT", default_value_t = 2.5)]
    increment: f64,

    /// Text printed between the weight summary and the schedule.
    #[arg(long, conflicts_with = "header_file")]
    header: Option<String>,

    /// Read the header text from a file.
    #[arg(long, value_name = "FILE")]
    header_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct HlmArgs {
    /// Day template.
    #[arg(long, default_value = "standard")]
    variant: HlmVariant,

    /// Heavy squat weight (5s).
    #[arg(long)]
    squat: f64,

    /// Heavy pull weight (5s).
    #[arg(long)]
    pull: f64,

    /// Heavy press weight (5s).
    #[arg(long)]
    press: f64,

    /// Secondary press weight, programmed heavy 5x5 in place of a derived press.
    #[arg(long)]
    secondary_press: Option<f64>,

    /// Secondary pull weight, programmed heavy 5x5 in place of the light pull.
    #[arg(long)]
    secondary_pull: Option<f64>,

    /// Medium pull weight, used instead of the derived one.
    #[arg(long)]
    medium_pull: Option<f64>,

    /// Light pull weight, used instead of the derived one.
    #[arg(long)]
    light_pull: Option<f64>,

    /// Fraction taken off heavy weights on medium days.
    #[arg(long, default_value_t = 0.10)]
    medium_reduction: f64,

    /// Fraction taken off heavy weights on light days.
    #[arg(long, default_value_t = 0.20)]
    light_reduction: f64,

    #[arg(long, value_name = "NAME")]
    squat_name: Option<String>,

    #[arg(long, value_name = "NAME")]
    pull_name: Option<String>,

    #[arg(long, value_name = "NAME")]
    press_name: Option<String>,

    #[arg(long, value_name = "NAME")]
    secondary_press_name: Option<String>,

    #[arg(long, value_name = "NAME")]
    secondary_pull_name: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(clap::Args, Debug)]
struct WendlerArgs {
    /// Squat max as WEIGHT or WEIGHTxREPS.
    #[arg(long)]
    squat: Option<LiftInput>,

    /// Bench max as WEIGHT or WEIGHTxREPS.
    #[arg(long)]
    bench: Option<LiftInput>,

    /// Deadlift max as WEIGHT or WEIGHTxREPS.
    #[arg(long)]
    deadlift: Option<LiftInput>,

    /// Press max as WEIGHT or WEIGHTxREPS.
    #[arg(long)]
    press: Option<LiftInput>,

    /// 1RM formula for WEIGHTxREPS inputs; training-max uses weights as given.
    #[arg(long, default_value = "training-max")]
    formula: Formula,

    /// Treat the supplied weights as one-rep maxes rather than training maxes.
    #[arg(long)]
    one_rep_max: bool,

    /// Percentage of a 1RM used as the training max.
    #[arg(long)]
    tm_percentage: Option<f64>,

    /// Lifts to program, comma separated, in output order.
    #[arg(long, value_delimiter = ',')]
    lifts: Vec<Lift>,

    /// Supplemental template: fsl, pyramid or widowmaker.
    #[arg(long = "template", value_delimiter = ',')]
    templates: Vec<Template>,

    /// Number of FSL sets (3-8).
    #[arg(long, requires = "fsl_reps")]
    fsl_sets: Option<u32>,

    /// Reps per FSL set (3-5).
    #[arg(long, requires = "fsl_sets")]
    fsl_reps: Option<u32>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    let plan = match args.command {
        Command::Hlm(hlm) => {
            log::info!("Generating HLM plan ({})", hlm.variant);
            build_hlm_plan(&hlm_config(hlm)?)?
        }
        Command::Wendler(wendler) => {
            let config = wendler_config(wendler)?;
            log::info!(
                "Generating 5/3/1 plan for {} lift(s)",
                config.active_lifts.len()
            );
            build_wendler_plan(&config)?
        }
        Command::Run { file } => {
            let program = load_program(&file)
                .with_context(|| format!("Failed to load program from {}", file.display()))?;
            log::info!("Generating {} plan from {}", program.name(), file.display());
            program.build()?
        }
        Command::Estimate {
            weight,
            reps,
            formula,
        } => return print_estimates(weight, reps, formula, args.format),
    };

    print_plan(&plan, args.format)
}

fn print_plan(plan: &Plan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render(plan)),
        OutputFormat::Json => println!("{}", render_json(plan)?),
    }
    Ok(())
}

/// Prints the estimated 1RM for one formula, or for every formula.
fn print_estimates(
    weight: f64,
    reps: u32,
    formula: Option<Formula>,
    format: OutputFormat,
) -> Result<()> {
    let formulas = match formula {
        Some(f) => vec![f],
        None => Formula::estimators().to_vec(),
    };

    let mut estimates = BTreeMap::new();
    for formula in formulas {
        estimates.insert(formula.name(), estimate_1rm(weight, reps, formula)?);
    }

    match format {
        OutputFormat::Text => {
            println!("{:.1} kg x {} reps", weight, reps);
            for (name, e1rm) in &estimates {
                println!("  {}: {:.2} kg", name, e1rm);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&estimates)?),
    }
    Ok(())
}

/// Resolves the header text from `--header` or `--header-file`.
fn read_header(common: &CommonArgs) -> Result<Option<String>> {
    match &common.header_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read header from {}", path.display()))?;
            Ok(Some(text))
        }
        None => Ok(common.header.clone()),
    }
}

fn hlm_config(args: HlmArgs) -> Result<HlmConfig> {
    let defaults = ExerciseNames::default();
    let names = ExerciseNames {
        squat: args.squat_name.unwrap_or(defaults.squat),
        pull: args.pull_name.unwrap_or(defaults.pull),
        press: args.press_name.unwrap_or(defaults.press),
        secondary_press: args.secondary_press_name.unwrap_or(defaults.secondary_press),
        secondary_pull: args.secondary_pull_name.unwrap_or(defaults.secondary_pull),
    };

    Ok(HlmConfig {
        variant: args.variant,
        squat: args.squat,
        pull: args.pull,
        press: args.press,
        secondary_press: args.secondary_press,
        secondary_pull: args.secondary_pull,
        medium_pull: args.medium_pull,
        light_pull: args.light_pull,
        reductions: ReductionTable {
            medium: args.medium_reduction,
            light: args.light_reduction,
        },
        rounding: RoundingRule::new(args.common.increment)?,
        names,
        header: read_header(&args.common)?,
    })
}

fn wendler_config(args: WendlerArgs) -> Result<WendlerConfig> {
    let mut config = WendlerConfig {
        max_type: if args.one_rep_max {
            MaxType::OneRepMax
        } else {
            MaxType::TrainingMax
        },
        tm_percentage: args.tm_percentage,
        templates: args.templates,
        fsl_params: fsl_params(args.fsl_sets, args.fsl_reps),
        rounding: RoundingRule::new(args.common.increment)?,
        header: read_header(&args.common)?,
        ..WendlerConfig::default()
    };
    if !args.lifts.is_empty() {
        config.active_lifts = args.lifts;
    }

    let inputs: BTreeMap<Lift, LiftInput> = [
        (Lift::Squat, args.squat),
        (Lift::Bench, args.bench),
        (Lift::Deadlift, args.deadlift),
        (Lift::Press, args.press),
    ]
    .into_iter()
    .filter_map(|(lift, input)| input.map(|i| (lift, i)))
    .collect();

    config
        .apply_lift_inputs(&inputs, args.formula)
        .context("Failed to estimate one-rep maxes")?;

    Ok(config)
}

/// FSL sets/reps from the command line. clap rejects one without the other.
fn fsl_params(sets: Option<u32>, reps: Option<u32>) -> Option<FslParams> {
    sets.zip(reps).map(|(sets, reps)| FslParams { sets, reps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::error::ConfigError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_hlm_args_to_config() {
        let args = parse(&[
            "liftplan",
            "hlm",
            "--squat",
            "120",
            "--pull",
            "140",
            "--press",
            "60",
            "--variant",
            "alternate-pressing",
            "--secondary-press",
            "80",
            "--secondary-press-name",
            "bench press",
            "--increment",
            "0.5",
        ]);
        let Command::Hlm(hlm) = args.command else {
            panic!("expected hlm subcommand");
        };
        let config = hlm_config(hlm).unwrap();

        assert_eq!(config.variant, HlmVariant::AlternatePressing);
        assert_eq!(config.secondary_press, Some(80.0));
        assert_eq!(config.names.secondary_press, "bench press");
        assert_eq!(config.names.squat, "Squat");
        assert_eq!(config.rounding.increment, 0.5);
        assert_eq!(config.reductions, ReductionTable::default());
    }

    #[test]
    fn test_hlm_requires_base_weights() {
        assert!(Args::try_parse_from(["liftplan", "hlm", "--squat", "100"]).is_err());
    }

    #[test]
    fn test_wendler_args_estimate_maxes() {
        let args = parse(&[
            "liftplan",
            "wendler",
            "--squat",
            "100x5",
            "--bench",
            "80",
            "--formula",
            "brzycki",
            "--lifts",
            "squat,bench",
            "--template",
            "fsl",
            "--fsl-sets",
            "3",
            "--fsl-reps",
            "5",
        ]);
        let Command::Wendler(wendler) = args.command else {
            panic!("expected wendler subcommand");
        };
        let config = wendler_config(wendler).unwrap();

        assert_eq!(config.squat, 112.5);
        assert_eq!(config.bench, 80.0);
        assert_eq!(config.deadlift, 100.0);
        assert_eq!(config.max_type, MaxType::TrainingMax);
        assert_eq!(config.active_lifts, vec![Lift::Squat, Lift::Bench]);

        // Only the estimated squat is scaled; the plain bench is a training max
        let maxes = config.training_maxes();
        assert!((maxes[0].1 - 101.25).abs() < 1e-9);
        assert_eq!(maxes[1], (Lift::Bench, 80.0));
        assert_eq!(config.templates, vec![Template::Fsl]);
        assert_eq!(config.fsl_params, Some(FslParams { sets: 3, reps: 5 }));
    }

    #[test]
    fn test_wendler_conflicting_templates_fail_at_build() {
        let args = parse(&[
            "liftplan",
            "wendler",
            "--template",
            "fsl,pyramid",
            "--fsl-sets",
            "3",
            "--fsl-reps",
            "5",
        ]);
        let Command::Wendler(wendler) = args.command else {
            panic!("expected wendler subcommand");
        };
        let config = wendler_config(wendler).unwrap();
        assert!(matches!(
            build_wendler_plan(&config),
            Err(ConfigError::MutuallyExclusiveTemplates(_))
        ));
    }

    #[test]
    fn test_unsupported_formula_rejected() {
        assert!(
            Args::try_parse_from(["liftplan", "estimate", "100", "5", "--formula", "oconner"])
                .is_err()
        );
    }

    #[test]
    fn test_global_format_flag() {
        let args = parse(&["liftplan", "estimate", "100", "5", "--format", "json"]);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_fsl_flags_required_together() {
        for flag in ["--fsl-sets", "--fsl-reps"] {
            let result =
                Args::try_parse_from(["liftplan", "wendler", "--template", "fsl", flag, "4"]);
            assert!(result.is_err(), "{} accepted on its own", flag);
        }
        assert_eq!(fsl_params(None, None), None);
        assert_eq!(fsl_params(Some(4), Some(3)), Some(FslParams { sets: 4, reps: 3 }));
    }

    #[test]
    fn test_fsl_template_without_flags_fails_at_build() {
        let args = parse(&["liftplan", "wendler", "--template", "fsl"]);
        let Command::Wendler(wendler) = args.command else {
            panic!("expected wendler subcommand");
        };
        let config = wendler_config(wendler).unwrap();
        assert_eq!(
            build_wendler_plan(&config),
            Err(ConfigError::MissingFslParams)
        );
    }

    #[test]
    fn test_header_file_missing() {
        let common = CommonArgs {
            increment: 2.5,
            header: None,
            header_file: Some(PathBuf::from("/nonexistent/header.txt")),
        };
        assert!(read_header(&common).is_err());
    }
}
