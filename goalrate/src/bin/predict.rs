use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use goalrate::data;
use goalrate::domain::MatchRecord;
use goalrate::model::{ModelConfig, PoissonModel, DEFAULT_MAX_GOALS, DEFAULT_SMOOTHING_K};
use goalrate::predict::OutcomePrediction;
use goalrate::print;
use goalrate::standings;

const HEAD_TO_HEAD_LIMIT: usize = 10;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the match data from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// home team
    #[clap(long)]
    home: String,

    /// away team
    #[clap(long)]
    away: String,

    /// largest number of goals per side in the score grid
    #[clap(long, default_value_t = DEFAULT_MAX_GOALS)]
    max_goals: u8,

    /// pseudo-matches added to every team's record when estimating strengths
    #[clap(short = 'k', long, default_value_t = DEFAULT_SMOOTHING_K)]
    smoothing_k: f64,

    /// restrict training to these seasons (repeatable)
    #[clap(short = 's', long)]
    season: Vec<String>,

    /// emit the prediction as JSON instead of tables
    #[clap(long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.home == self.away {
            bail!("home and away teams must differ");
        }
        Ok(())
    }

    fn config(&self) -> ModelConfig {
        ModelConfig {
            max_goals: self.max_goals,
            smoothing_k: self.smoothing_k,
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictionReport<'a> {
    home_team: &'a str,
    away_team: &'a str,
    #[serde(flatten)]
    prediction: &'a OutcomePrediction,
    head_to_head: &'a [&'a MatchRecord],
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let start_time = Instant::now();
    let dataset = data::read_from_file(&args.file)?;
    let training = if args.season.is_empty() {
        dataset.clone()
    } else {
        let seasons: Vec<_> = args.season.iter().map(String::as_str).collect();
        dataset.filter_seasons(&seasons)
    };
    info!(
        "training on {} matches across seasons {:?}",
        training.len(),
        training.seasons()
    );

    let model = PoissonModel::fitted(args.config(), &training)?;
    let (prediction, scoregrid) = model.predict_with_grid(&args.home, &args.away)?;
    let elapsed = start_time.elapsed();
    debug!("fitted and predicted in {elapsed:?}");
    let meetings = standings::head_to_head(&dataset, &args.home, &args.away, HEAD_TO_HEAD_LIMIT);

    if args.json {
        let report = PredictionReport {
            home_team: &args.home,
            away_team: &args.away,
            prediction: &prediction,
            head_to_head: &meetings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let strengths = model.strengths()?;
    let console = Console::default();
    info!(
        "strengths from {} matches:\n{}",
        strengths.num_matches(),
        console.render(&print::tabulate_strengths(strengths))
    );
    info!(
        "prediction:\n{}",
        console.render(&print::tabulate_prediction(&args.home, &args.away, &prediction))
    );
    info!(
        "score grid:\n{}",
        console.render(&print::tabulate_scoregrid(&scoregrid))
    );
    if meetings.is_empty() {
        info!("no previous meetings of {} and {}", args.home, args.away);
    } else {
        info!(
            "last {} meetings:\n{}",
            meetings.len(),
            console.render(&print::tabulate_head_to_head(&meetings))
        );
    }
    Ok(())
}
