use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use goalrate::data;
use goalrate::model::{ModelConfig, PoissonModel, DEFAULT_MAX_GOALS, DEFAULT_SMOOTHING_K};
use goalrate::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the match data from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// season to hold out for testing; the newest 20% of matches are held out if omitted
    #[clap(short = 't', long)]
    test_season: Option<String>,

    /// largest number of goals per side in the score grid
    #[clap(long, default_value_t = DEFAULT_MAX_GOALS)]
    max_goals: u8,

    /// pseudo-matches added to every team's record when estimating strengths
    #[clap(short = 'k', long, default_value_t = DEFAULT_SMOOTHING_K)]
    smoothing_k: f64,

    /// emit the metrics as JSON instead of a table
    #[clap(long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(test_season) = &self.test_season {
            if test_season.trim().is_empty() {
                bail!("test season must not be blank");
            }
        }
        Ok(())
    }
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
    let model = PoissonModel::new(ModelConfig {
        max_goals: args.max_goals,
        smoothing_k: args.smoothing_k,
    })?;
    let metrics = model.evaluate(&dataset, args.test_season.as_deref())?;
    let elapsed = start_time.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        info!(
            "backtest:\n{}",
            Console::default().render(&print::tabulate_metrics(&metrics))
        );
    }
    info!("took {elapsed:?}");
    Ok(())
}
