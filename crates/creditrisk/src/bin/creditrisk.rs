//! Command-line scoring against a model bundle.
//!
//! Results are written to stdout as JSON; logs go to stderr.
//!
//! Examples:
//!   creditrisk predict --bundle model_bundle.json --input applicant.json
//!   echo '{"SCORE_CR22": 650}' | creditrisk predict --bundle model_bundle.json
//!   creditrisk assess --bundle model_bundle.json --input profile.json --threshold 0.4
//!   creditrisk bands --score 650 --late-12m 1 --late-24m 2
//!   creditrisk inspect --bundle model_bundle.json

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use creditrisk::bands::{cr22_risk_band, delinquency_band, long_term_delinquency_count};
use creditrisk::{
    ApplicantProfile, Classifier, ModelBundle, PredictorConfig, RawRecord, RiskPredictor,
    UnknownCategoryPolicy,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Score credit applicants with a pre-trained risk model.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a raw record (flat JSON object of field name to value)
    Predict {
        #[command(flatten)]
        scoring: ScoringArgs,
    },
    /// Score a typed applicant profile and include display bands
    Assess {
        #[command(flatten)]
        scoring: ScoringArgs,
    },
    /// Print display bands without loading a model
    Bands {
        /// CR22 bureau score
        #[arg(long, allow_negative_numbers = true)]
        score: i64,

        /// Late payments (30+ DPD) in the last 12 months
        #[arg(long = "late-12m", default_value_t = 0)]
        late_12m: u32,

        /// Late payments (30+ DPD) in the last 24 months
        #[arg(long = "late-24m", default_value_t = 0)]
        late_24m: u32,
    },
    /// Summarize a model bundle
    Inspect {
        /// Path to the model bundle
        #[arg(long, env = "CREDITRISK_BUNDLE")]
        bundle: PathBuf,
    },
}

#[derive(Args)]
struct ScoringArgs {
    /// Path to the model bundle (relative paths are tried next to the binary first)
    #[arg(long, env = "CREDITRISK_BUNDLE")]
    bundle: PathBuf,

    /// Input JSON file (reads stdin if omitted or "-")
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Probability of "Bad" at or above which the decision is "Bad"
    #[arg(long, default_value_t = creditrisk::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Handling of categorical values not seen during training
    #[arg(long, value_enum, default_value_t = UnknownCategories::Warn)]
    unknown_categories: UnknownCategories,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnknownCategories {
    Ignore,
    Warn,
    Reject,
}

impl From<UnknownCategories> for UnknownCategoryPolicy {
    fn from(value: UnknownCategories) -> Self {
        match value {
            UnknownCategories::Ignore => Self::Ignore,
            UnknownCategories::Warn => Self::Warn,
            UnknownCategories::Reject => Self::Reject,
        }
    }
}

impl ScoringArgs {
    fn predictor(&self) -> Result<RiskPredictor> {
        let config = PredictorConfig::builder()
            .threshold(self.threshold)
            .unknown_categories(self.unknown_categories.into())
            .build()?;
        let bundle = ModelBundle::load(&self.bundle)
            .with_context(|| format!("loading bundle {}", self.bundle.display()))?;
        Ok(RiskPredictor::from_bundle(bundle, &config))
    }

    fn read_input<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let reader: Box<dyn Read> = match self.input.as_deref() {
            Some(path) if path != Path::new("-") => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("opening {}", path.display()))?,
            )),
            _ => Box::new(std::io::stdin().lock()),
        };
        serde_json::from_reader(reader).context("parsing input JSON")
    }
}

#[derive(Serialize)]
struct BandsOutput {
    score_band: creditrisk::ScoreBand,
    delinquency_count: u32,
    delinquency_band: creditrisk::DelinquencyBand,
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
    model: &'static str,
    n_features: usize,
    features: &'a [String],
    cols_to_scale: &'a [String],
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs to stderr so stdout stays clean JSON. Default to warn for
    // dependencies, the chosen level for this crate.
    let level = cli.verbose.tracing_level_filter();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,creditrisk={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Predict { scoring } => {
            let predictor = scoring.predictor()?;
            let record: RawRecord = scoring.read_input()?;
            let prediction = predictor.predict(&record)?;
            write_json(&prediction)
        }
        Commands::Assess { scoring } => {
            let predictor = scoring.predictor()?;
            let profile: ApplicantProfile = scoring.read_input()?;
            let assessment = predictor.assess(&profile)?;
            write_json(&assessment)
        }
        Commands::Bands {
            score,
            late_12m,
            late_24m,
        } => {
            let delinquency_count = long_term_delinquency_count(late_12m, late_24m);
            write_json(&BandsOutput {
                score_band: cr22_risk_band(score),
                delinquency_count,
                delinquency_band: delinquency_band(delinquency_count),
            })
        }
        Commands::Inspect { bundle } => {
            let bundle = ModelBundle::load(&bundle)
                .with_context(|| format!("loading bundle {}", bundle.display()))?;
            write_json(&InspectOutput {
                name: bundle.meta().name.as_deref(),
                description: bundle.meta().description.as_deref(),
                model: bundle.model().kind(),
                n_features: bundle.model().n_features(),
                features: bundle.schema().names(),
                cols_to_scale: bundle.scaler().columns(),
            })
        }
    }
}
