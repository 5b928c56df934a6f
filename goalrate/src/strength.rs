//! Estimation of per-team attack and defense strengths, relative to the league average, in home
//! and away contexts.
//!
//! Each team's per-match rate is shrunk towards the league mean by adding `smoothing_k`
//! pseudo-matches played at exactly the league rate:
//!
//! ```text
//! ratio = ((goals + k × league_avg) / (matches + k)) / league_avg
//! ```
//!
//! With `k = 0` this is the raw rate ratio; as `k` grows, the ratio tends monotonically to 1.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::{MatchRecord, Side};

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("no played matches to fit")]
    EmptyDataset,

    #[error("smoothing must be a non-negative number, got {0}")]
    InvalidSmoothing(f64),
}

/// Strength ratios, where 1.0 is the league average. A ratio is present only for teams that
/// played at least once in the corresponding context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrengths {
    num_matches: usize,
    league_avg_home_goals: f64,
    league_avg_away_goals: f64,
    attack_home: FxHashMap<String, f64>,
    defense_home: FxHashMap<String, f64>,
    attack_away: FxHashMap<String, f64>,
    defense_away: FxHashMap<String, f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    matches: u32,
    scored: u32,
    conceded: u32,
}

impl TeamStrengths {
    /// Fits strengths from the played subset of `matches`; scheduled fixtures are ignored.
    pub fn fit<'a>(
        matches: impl IntoIterator<Item = &'a MatchRecord>,
        smoothing_k: f64,
    ) -> Result<Self, FitError> {
        if !smoothing_k.is_finite() || smoothing_k < 0.0 {
            return Err(FitError::InvalidSmoothing(smoothing_k));
        }

        let mut num_matches = 0;
        let (mut total_home_goals, mut total_away_goals) = (0u64, 0u64);
        let mut home_tallies: FxHashMap<&str, Tally> = FxHashMap::default();
        let mut away_tallies: FxHashMap<&str, Tally> = FxHashMap::default();
        for record in matches {
            let Some(score) = record.score() else {
                continue;
            };
            let (home_goals, away_goals) = (score.home as u32, score.away as u32);
            num_matches += 1;
            total_home_goals += home_goals as u64;
            total_away_goals += away_goals as u64;

            let home = home_tallies.entry(record.team(Side::Home)).or_default();
            home.matches += 1;
            home.scored += home_goals;
            home.conceded += away_goals;

            let away = away_tallies.entry(record.team(Side::Away)).or_default();
            away.matches += 1;
            away.scored += away_goals;
            away.conceded += home_goals;
        }
        if num_matches == 0 {
            return Err(FitError::EmptyDataset);
        }

        let avg_home = total_home_goals as f64 / num_matches as f64;
        let avg_away = total_away_goals as f64 / num_matches as f64;
        let ratios = |tallies: &FxHashMap<&str, Tally>, goals: fn(&Tally) -> u32, league_avg: f64| {
            tallies
                .iter()
                .map(|(&team, tally)| {
                    let ratio =
                        smoothed_ratio(goals(tally), tally.matches, league_avg, smoothing_k);
                    (team.to_string(), ratio)
                })
                .collect::<FxHashMap<_, _>>()
        };

        let strengths = Self {
            num_matches,
            league_avg_home_goals: avg_home,
            league_avg_away_goals: avg_away,
            attack_home: ratios(&home_tallies, |tally| tally.scored, avg_home),
            defense_home: ratios(&home_tallies, |tally| tally.conceded, avg_away),
            attack_away: ratios(&away_tallies, |tally| tally.scored, avg_away),
            defense_away: ratios(&away_tallies, |tally| tally.conceded, avg_home),
        };
        info!(
            "fitted Poisson strengths on {num_matches} matches, league avg (home={avg_home:.3}, away={avg_away:.3})"
        );
        Ok(strengths)
    }

    /// Played matches the strengths were fitted on.
    pub fn num_matches(&self) -> usize {
        self.num_matches
    }

    pub fn league_avg_home_goals(&self) -> f64 {
        self.league_avg_home_goals
    }

    pub fn league_avg_away_goals(&self) -> f64 {
        self.league_avg_away_goals
    }

    pub fn attack_home(&self, team: &str) -> Option<f64> {
        self.attack_home.get(team).copied()
    }

    pub fn defense_home(&self, team: &str) -> Option<f64> {
        self.defense_home.get(team).copied()
    }

    pub fn attack_away(&self, team: &str) -> Option<f64> {
        self.attack_away.get(team).copied()
    }

    pub fn defense_away(&self, team: &str) -> Option<f64> {
        self.defense_away.get(team).copied()
    }

    pub fn attack(&self, team: &str, side: Side) -> Option<f64> {
        match side {
            Side::Home => self.attack_home(team),
            Side::Away => self.attack_away(team),
        }
    }

    pub fn defense(&self, team: &str, side: Side) -> Option<f64> {
        match side {
            Side::Home => self.defense_home(team),
            Side::Away => self.defense_away(team),
        }
    }

    /// All teams with at least one ratio, sorted by name.
    pub fn teams(&self) -> Vec<&str> {
        let mut teams: Vec<_> = self
            .attack_home
            .keys()
            .chain(self.attack_away.keys())
            .map(String::as_str)
            .collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    /// Expected goals `(λ_home, λ_away)` for a fixture. Each side's rate pairs its attack with the
    /// opponent's defense in the opposite context. Teams without a ratio are treated as league
    /// average.
    pub fn expected_goals(&self, home_team: &str, away_team: &str) -> (f64, f64) {
        let attack_home = self.attack_home(home_team).unwrap_or(1.0);
        let defense_home = self.defense_home(home_team).unwrap_or(1.0);
        let attack_away = self.attack_away(away_team).unwrap_or(1.0);
        let defense_away = self.defense_away(away_team).unwrap_or(1.0);

        let lambda_home = self.league_avg_home_goals * attack_home * defense_away;
        let lambda_away = self.league_avg_away_goals * attack_away * defense_home;
        (lambda_home, lambda_away)
    }
}

#[inline]
fn smoothed_ratio(goals: u32, matches: u32, league_avg: f64, smoothing_k: f64) -> f64 {
    let weight = matches as f64 + smoothing_k;
    let mean = if weight > 0.0 {
        (goals as f64 + smoothing_k * league_avg) / weight
    } else {
        league_avg
    };
    if league_avg > 0.0 {
        mean / league_avg
    } else {
        1.0
    }
}
