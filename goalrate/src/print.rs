use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::domain::MatchRecord;
use crate::evaluate::Metrics;
use crate::predict::OutcomePrediction;
use crate::scoregrid::ScoreGrid;
use crate::standings::{ContextStats, RecentForm, StandingRow};
use crate::strength::TeamStrengths;

pub fn tabulate_prediction(
    home_team: &str,
    away_team: &str,
    prediction: &OutcomePrediction,
) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![format!("{home_team} v {away_team}").into(), "".into()],
        ));
    let rows = [
        ("λ home", format!("{:.3}", prediction.lambda_home)),
        ("λ away", format!("{:.3}", prediction.lambda_away)),
        ("Expected total goals", format!("{:.3}", prediction.expected_total_goals)),
        ("P(home win)", format!("{:.4}", prediction.p_home_win)),
        ("P(draw)", format!("{:.4}", prediction.p_draw)),
        ("P(away win)", format!("{:.4}", prediction.p_away_win)),
        ("Most likely score", prediction.most_likely.to_string()),
        ("Favourite", prediction.favourite().to_string()),
    ];
    for (label, value) in rows {
        table.push_row(Row::new(Styles::default(), vec![label.into(), value.into()]));
    }
    table
}

/// Correct-score probabilities, with home goals down the rows and away goals across.
pub fn tabulate_scoregrid(scoregrid: &ScoreGrid) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(5))
                    .with(HAlign::Centred),
            )];
            for _ in 0..scoregrid.size() {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(8)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["H \\ A".into()];
            for away_goals in 0..scoregrid.size() {
                header_cells.push(format!("{away_goals}").into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });
    for home_goals in 0..scoregrid.size() {
        let mut row_cells = vec![format!("{home_goals}").into()];
        for prob in scoregrid.row_slice(home_goals) {
            row_cells.push(format!("{prob:.4}").into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_strengths(strengths: &TeamStrengths) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(Styles::default().with(MinWidth(20)).with(Left))];
            for _ in 0..4 {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(12)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "Attack home".into(),
                "Defense home".into(),
                "Attack away".into(),
                "Defense away".into(),
            ],
        ));
    let format_ratio = |ratio: Option<f64>| match ratio {
        None => "-".to_string(),
        Some(ratio) => format!("{ratio:.3}"),
    };
    for team in strengths.teams() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                team.into(),
                format_ratio(strengths.attack_home(team)).into(),
                format_ratio(strengths.defense_home(team)).into(),
                format_ratio(strengths.attack_away(team)).into(),
                format_ratio(strengths.defense_away(team)).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_metrics(metrics: &Metrics) -> Table {
    Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(16))),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Split".into(), "Tested".into(), "Accuracy".into(), "Log-loss".into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec![
                metrics.split.to_string().into(),
                format!("{}", metrics.n_test).into(),
                format!("{:.4}", metrics.accuracy).into(),
                format!("{:.4}", metrics.log_loss).into(),
            ],
        ))
}

pub fn tabulate_standings(rows: &[StandingRow]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![
                Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right)),
                Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            ];
            for _ in 0..8 {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(4)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            ["#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"]
                .into_iter()
                .map(Into::into)
                .collect(),
        ));
    table.push_rows(rows.iter().map(|row| {
        let record = &row.record;
        Row::new(
            Styles::default(),
            vec![
                format!("{}", row.rank).into(),
                Cell::new(Styles::default(), row.team.clone().into()),
                format!("{}", record.played).into(),
                format!("{}", record.wins).into(),
                format!("{}", record.draws).into(),
                format!("{}", record.losses).into(),
                format!("{}", record.goals_for).into(),
                format!("{}", record.goals_against).into(),
                format!("{:+}", record.goal_difference()).into(),
                format!("{}", record.points).into(),
            ],
        )
    }));
    table
}

pub fn tabulate_context_stats(stats: &[ContextStats]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![
                Col::new(Styles::default().with(MinWidth(20)).with(Left)),
                Col::new(Styles::default().with(MinWidth(6)).with(Left)),
            ];
            for _ in 0..6 {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(8)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            ["Team", "Side", "P", "PPM", "Win %", "Draw %", "GF/M", "GA/M"]
                .into_iter()
                .map(Into::into)
                .collect(),
        ));
    for row in stats {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                row.team.as_str().into(),
                row.side.to_string().into(),
                format!("{}", row.record.played).into(),
                format!("{:.2}", row.points_per_match).into(),
                format!("{:.1}", row.win_rate * 100.0).into(),
                format!("{:.1}", row.draw_rate * 100.0).into(),
                format!("{:.2}", row.avg_goals_for).into(),
                format!("{:.2}", row.avg_goals_against).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_form(forms: &[(&str, RecentForm)]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(Left)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Team".into(), "Form".into(), "Pts".into()],
        ));
    for (team, form) in forms {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                (*team).into(),
                form.to_string().into(),
                format!("{}", form.points).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_head_to_head(meetings: &[&MatchRecord]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(8))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Season".into(),
                "Date".into(),
                "Home".into(),
                "Score".into(),
                "Away".into(),
            ],
        ));
    for record in meetings {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                record.season.as_str().into(),
                record
                    .date
                    .map_or_else(|| "-".to_string(), |date| date.to_string())
                    .into(),
                record.home_team.as_str().into(),
                record
                    .score()
                    .map_or_else(|| "-".to_string(), |score| score.to_string())
                    .into(),
                record.away_team.as_str().into(),
            ],
        ));
    }
    table
}
