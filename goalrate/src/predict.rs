//! Outcome prediction for a single fixture.

use serde::{Deserialize, Serialize};
use strum::EnumCount;

use crate::domain::{Outcome, Score};
use crate::scoregrid::ScoreGrid;
use crate::strength::TeamStrengths;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomePrediction {
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub p_home_win: f64,
    pub p_draw: f64,
    pub p_away_win: f64,
    pub most_likely: Score,
    pub expected_total_goals: f64,
}
impl OutcomePrediction {
    pub fn probabilities(&self) -> [f64; Outcome::COUNT] {
        [self.p_home_win, self.p_draw, self.p_away_win]
    }

    pub fn probability(&self, outcome: Outcome) -> f64 {
        self.probabilities()[outcome.ordinal()]
    }

    /// The most probable outcome. Exact ties are resolved in the order home, draw, away.
    pub fn favourite(&self) -> Outcome {
        if self.p_home_win >= f64::max(self.p_draw, self.p_away_win) {
            Outcome::Home
        } else if self.p_draw >= self.p_away_win {
            Outcome::Draw
        } else {
            Outcome::Away
        }
    }
}

pub fn predict(
    strengths: &TeamStrengths,
    home_team: &str,
    away_team: &str,
    max_goals: u8,
) -> OutcomePrediction {
    predict_with_grid(strengths, home_team, away_team, max_goals).0
}

/// Predicts the fixture, also returning the score grid the prediction was derived from.
pub fn predict_with_grid(
    strengths: &TeamStrengths,
    home_team: &str,
    away_team: &str,
    max_goals: u8,
) -> (OutcomePrediction, ScoreGrid) {
    let (lambda_home, lambda_away) = strengths.expected_goals(home_team, away_team);
    let scoregrid = ScoreGrid::from_poisson(lambda_home, lambda_away, max_goals);
    let prediction = from_scoregrid(lambda_home, lambda_away, &scoregrid);
    (prediction, scoregrid)
}

/// Derives outcome probabilities from a (possibly truncated) score grid. The three outcome
/// probabilities are rescaled to sum to 1 unless the grid carries no mass at all.
pub fn from_scoregrid(
    lambda_home: f64,
    lambda_away: f64,
    scoregrid: &ScoreGrid,
) -> OutcomePrediction {
    let (mut p_home_win, mut p_draw, mut p_away_win) =
        (scoregrid.home_win(), scoregrid.draw(), scoregrid.away_win());
    let total = p_home_win + p_draw + p_away_win;
    if total > 0.0 {
        p_home_win /= total;
        p_draw /= total;
        p_away_win /= total;
    }
    let (most_likely, _) = scoregrid.most_likely();

    OutcomePrediction {
        lambda_home,
        lambda_away,
        p_home_win,
        p_draw,
        p_away_win,
        most_likely,
        expected_total_goals: lambda_home + lambda_away,
    }
}
