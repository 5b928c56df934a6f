//! Backtesting of the strength model on a temporal train/test split.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::Dataset;
use crate::domain::MatchRecord;
use crate::model::ModelConfig;
use crate::predict;
use crate::strength::{FitError, TeamStrengths};

/// Share of the chronologically ordered played matches used for training when no test season
/// is given.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Probabilities are clamped from below before taking logs.
pub const MIN_PROB: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("no played matches to evaluate")]
    EmptyDataset,

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("{0}")]
    Fit(#[from] FitError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    /// Train on every other season and test on this one.
    TestSeason(String),
    /// Train on the oldest 80% of matches and test on the newest 20%.
    Temporal80_20,
}

impl Display for Split {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Split::TestSeason(season) => write!(f, "test_season={season}"),
            Split::Temporal80_20 => write!(f, "temporal_80_20"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub n_test: usize,
    pub accuracy: f64,
    pub log_loss: f64,
    pub split: Split,
}

#[derive(Debug)]
pub struct TrainTest<'a> {
    pub train: Vec<&'a MatchRecord>,
    pub test: Vec<&'a MatchRecord>,
    pub split: Split,
}

/// Partitions the played matches of `dataset` into chronologically ordered train and test sets.
pub fn split<'a>(
    dataset: &'a Dataset,
    test_season: Option<&str>,
) -> Result<TrainTest<'a>, EvaluationError> {
    let played = dataset.played_chronological();
    if played.is_empty() {
        return Err(EvaluationError::EmptyDataset);
    }

    let train_test = match test_season {
        Some(test_season) => {
            let (test, train): (Vec<_>, Vec<_>) = played
                .into_iter()
                .partition(|record| record.season == test_season);
            if test.is_empty() || train.is_empty() {
                return Err(EvaluationError::InsufficientData(format!(
                    "test season {test_season} leaves {} training and {} test matches",
                    train.len(),
                    test.len()
                )));
            }
            TrainTest {
                train,
                test,
                split: Split::TestSeason(test_season.to_string()),
            }
        }
        None => {
            let cut = (TRAIN_FRACTION * played.len() as f64) as usize;
            if cut == 0 {
                return Err(EvaluationError::InsufficientData(format!(
                    "{} played matches leave no training data",
                    played.len()
                )));
            }
            let mut train = played;
            let test = train.split_off(cut);
            TrainTest {
                train,
                test,
                split: Split::Temporal80_20,
            }
        }
    };
    debug!(
        "split {}: {} training, {} test matches",
        train_test.split,
        train_test.train.len(),
        train_test.test.len()
    );
    Ok(train_test)
}

/// Fits once on the training set and scores the predictions on every test match.
pub fn evaluate(
    dataset: &Dataset,
    config: &ModelConfig,
    test_season: Option<&str>,
) -> Result<Metrics, EvaluationError> {
    let TrainTest { train, test, split } = split(dataset, test_season)?;
    let strengths = TeamStrengths::fit(train.iter().copied(), config.smoothing_k)?;

    let mut correct = 0;
    let mut log_losses = Vec::with_capacity(test.len());
    for record in &test {
        let prediction = predict::predict(
            &strengths,
            &record.home_team,
            &record.away_team,
            config.max_goals,
        );
        let actual = record.played_result();
        if actual == Some(prediction.favourite()) {
            correct += 1;
        }
        let p_true = actual.map_or(1.0 / 3.0, |actual| prediction.probability(actual));
        log_losses.push(-f64::ln(p_true.clamp(MIN_PROB, 1.0)));
    }

    let n_test = test.len();
    let accuracy = if n_test > 0 {
        correct as f64 / n_test as f64
    } else {
        0.0
    };
    let log_loss = if log_losses.is_empty() {
        f64::NAN
    } else {
        log_losses.iter().sum::<f64>() / log_losses.len() as f64
    };
    info!("evaluated {split}: n_test={n_test}, accuracy={accuracy:.4}, log_loss={log_loss:.4}");

    Ok(Metrics {
        n_test,
        accuracy,
        log_loss,
        split,
    })
}
