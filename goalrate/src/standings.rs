//! League tables and per-context team records derived from played matches.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::domain::{MatchRecord, Outcome, Side};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}
impl Record {
    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    fn add(&mut self, goals_for: u8, goals_against: u8, outcome: Outcome, side: Side) {
        self.played += 1;
        self.goals_for += goals_for as u32;
        self.goals_against += goals_against as u32;
        self.points += outcome.points(side) as u32;
        match outcome.winner() {
            None => self.draws += 1,
            Some(winner) if winner == side => self.wins += 1,
            Some(_) => self.losses += 1,
        }
    }

    fn rate(&self, count: u32) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            count as f64 / self.played as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: usize,
    pub team: String,
    pub record: Record,
}

/// Visits every played match twice, once from each side's perspective.
fn for_each_side<'a>(
    matches: impl Iterator<Item = &'a MatchRecord>,
    mut f: impl FnMut(&'a MatchRecord, Side, u8, u8, Outcome),
) {
    for record in matches {
        let (Some(score), Some(outcome)) = (record.score(), record.played_result()) else {
            continue;
        };
        f(record, Side::Home, score.home, score.away, outcome);
        f(record, Side::Away, score.away, score.home, outcome);
    }
}

/// The league table for `season`, ranked by points, then goal difference, then goals scored.
/// Teams level on all three are listed alphabetically.
pub fn standings(dataset: &Dataset, season: &str) -> Vec<StandingRow> {
    let mut records: BTreeMap<&str, Record> = BTreeMap::new();
    for_each_side(
        dataset.played().filter(|record| record.season == season),
        |record, side, goals_for, goals_against, outcome| {
            records
                .entry(record.team(side))
                .or_default()
                .add(goals_for, goals_against, outcome, side);
        },
    );

    let mut rows: Vec<_> = records.into_iter().collect();
    rows.sort_by(|(a_team, a), (b_team, b)| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| a_team.cmp(b_team))
    });
    rows.into_iter()
        .enumerate()
        .map(|(index, (team, record))| StandingRow {
            rank: index + 1,
            team: team.to_string(),
            record,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextStats {
    pub team: String,
    pub side: Side,
    pub record: Record,
    pub points_per_match: f64,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
}
impl From<(&str, Side, Record)> for ContextStats {
    fn from((team, side, record): (&str, Side, Record)) -> Self {
        Self {
            team: team.to_string(),
            side,
            points_per_match: record.rate(record.points),
            win_rate: record.rate(record.wins),
            draw_rate: record.rate(record.draws),
            loss_rate: record.rate(record.losses),
            avg_goals_for: record.rate(record.goals_for),
            avg_goals_against: record.rate(record.goals_against),
            record,
        }
    }
}

/// Home and away records for every team, optionally restricted to one season. Sorted by team,
/// with the home row first.
pub fn context_stats(dataset: &Dataset, season: Option<&str>) -> Vec<ContextStats> {
    let mut records: BTreeMap<(&str, Side), Record> = BTreeMap::new();
    for_each_side(
        dataset
            .played()
            .filter(|record| season.map_or(true, |season| record.season == season)),
        |record, side, goals_for, goals_against, outcome| {
            records
                .entry((record.team(side), side))
                .or_default()
                .add(goals_for, goals_against, outcome, side);
        },
    );
    records
        .into_iter()
        .map(|((team, side), record)| ContextStats::from((team, side, record)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsProgress {
    pub date: Option<NaiveDate>,
    pub opponent: String,
    pub side: Side,
    pub points: u8,
    pub cumulative_points: u32,
}

/// Match-by-match points of `team` in `season`, in chronological order.
pub fn cumulative_points(dataset: &Dataset, season: &str, team: &str) -> Vec<PointsProgress> {
    let mut matches: Vec<_> = dataset
        .played()
        .filter(|record| record.season == season)
        .filter(|record| record.home_team == team || record.away_team == team)
        .collect();
    matches.sort_by(|a, b| a.cmp_chronological(b));

    let mut cumulative_points = 0;
    let mut progress = Vec::with_capacity(matches.len());
    for_each_side(matches.into_iter(), |record, side, _, _, outcome| {
        if record.team(side) != team {
            return;
        }
        let points = outcome.points(side);
        cumulative_points += points as u32;
        progress.push(PointsProgress {
            date: record.date,
            opponent: record.team(side.flip()).to_string(),
            side,
            points,
            cumulative_points,
        });
    });
    progress
}

/// A match result from one team's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}
impl FormResult {
    pub fn from_outcome(outcome: Outcome, side: Side) -> Self {
        match outcome.winner() {
            None => FormResult::Draw,
            Some(winner) if winner == side => FormResult::Win,
            Some(_) => FormResult::Loss,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FormResult::Win => "W",
            FormResult::Draw => "D",
            FormResult::Loss => "L",
        }
    }
}

impl Display for FormResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentForm {
    /// Oldest first.
    pub results: Vec<FormResult>,
    pub points: u32,
}

impl Display for RecentForm {
    /// Formats as, e.g., `W-D-L-W-W`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, result) in self.results.iter().enumerate() {
            if index > 0 {
                write!(f, "-")?;
            }
            write!(f, "{result}")?;
        }
        Ok(())
    }
}

/// Results and points of `team` over its last `n` played matches, optionally within one season.
pub fn recent_form(dataset: &Dataset, team: &str, n: usize, season: Option<&str>) -> RecentForm {
    let mut matches: Vec<_> = dataset
        .played()
        .filter(|record| season.map_or(true, |season| record.season == season))
        .filter(|record| record.home_team == team || record.away_team == team)
        .collect();
    matches.sort_by(|a, b| a.cmp_chronological(b));
    let skip = matches.len().saturating_sub(n);

    let mut form = RecentForm::default();
    for_each_side(matches.into_iter().skip(skip), |record, side, _, _, outcome| {
        if record.team(side) == team {
            form.results.push(FormResult::from_outcome(outcome, side));
            form.points += outcome.points(side) as u32;
        }
    });
    form
}

/// Up to `limit` played meetings between `team_a` and `team_b` at either venue, newest first.
pub fn head_to_head<'a>(
    dataset: &'a Dataset,
    team_a: &str,
    team_b: &str,
    limit: usize,
) -> Vec<&'a MatchRecord> {
    let mut meetings: Vec<_> = dataset
        .played()
        .filter(|record| {
            (record.home_team == team_a && record.away_team == team_b)
                || (record.home_team == team_b && record.away_team == team_a)
        })
        .collect();
    meetings.sort_by(|a, b| a.cmp_reverse_chronological(b));
    meetings.truncate(limit);
    meetings
}
