use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};
use tracing::{debug, info};

use goalrate::data;
use goalrate::print;
use goalrate::standings;
use goalrate::standings::PointsProgress;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the match data from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// season to tabulate; defaults to the latest season in the file
    #[clap(short = 's', long)]
    season: Option<String>,

    /// also print home and away records for every team
    #[clap(short = 'c', long)]
    contexts: bool,

    /// print the match-by-match points progress of this team
    #[clap(short = 't', long)]
    team: Option<String>,

    /// print every team's results over its last N matches of the season
    #[clap(long, value_name = "N")]
    form: Option<usize>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if !self.file.is_file() {
            return Err(anyhow!("{} is not a file", self.file.display()));
        }
        if self.form == Some(0) {
            return Err(anyhow!("form must cover at least one match"));
        }
        Ok(())
    }
}

fn tabulate_progress(progress: &[PointsProgress]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(20))),
            Col::new(Styles::default().with(MinWidth(6))),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Date".into(),
                "Opponent".into(),
                "Side".into(),
                "Pts".into(),
                "Total".into(),
            ],
        ));
    for row in progress {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                row.date
                    .map_or_else(|| "-".to_string(), |date| date.to_string())
                    .into(),
                row.opponent.as_str().into(),
                row.side.to_string().into(),
                format!("{}", row.points).into(),
                format!("{}", row.cumulative_points).into(),
            ],
        ));
    }
    table
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

    let dataset = data::read_from_file(&args.file)?;
    let season = match &args.season {
        Some(season) => season.clone(),
        None => dataset
            .seasons()
            .last()
            .map(|season| season.to_string())
            .ok_or(anyhow!("no seasons in {}", args.file.display()))?,
    };

    let console = Console::default();
    let rows = standings::standings(&dataset, &season);
    info!(
        "standings for {season}:\n{}",
        console.render(&print::tabulate_standings(&rows))
    );

    if args.contexts {
        let stats = standings::context_stats(&dataset, Some(season.as_str()));
        info!(
            "home and away records for {season}:\n{}",
            console.render(&print::tabulate_context_stats(&stats))
        );
    }

    if let Some(n) = args.form {
        let forms: Vec<_> = dataset
            .teams(Some(season.as_str()))
            .into_iter()
            .map(|team| {
                let form = standings::recent_form(&dataset, team, n, Some(season.as_str()));
                (team, form)
            })
            .collect();
        info!(
            "form over the last {n} matches of {season}:\n{}",
            console.render(&print::tabulate_form(&forms))
        );
    }

    if let Some(team) = &args.team {
        let progress = standings::cumulative_points(&dataset, &season, team);
        if progress.is_empty() {
            return Err(anyhow!("{team} played no matches in {season}").into());
        }
        info!(
            "points progress of {team} in {season}:\n{}",
            console.render(&tabulate_progress(&progress))
        );
    }
    Ok(())
}
