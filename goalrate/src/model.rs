//! The fitted model: a configuration plus an immutable snapshot of team strengths.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Dataset;
use crate::evaluate;
use crate::evaluate::{EvaluationError, Metrics};
use crate::predict;
use crate::predict::OutcomePrediction;
use crate::scoregrid::ScoreGrid;
use crate::strength::{FitError, TeamStrengths};

pub const DEFAULT_MAX_GOALS: u8 = 7;
pub const DEFAULT_SMOOTHING_K: f64 = 3.0;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("no played matches found to fit the model")]
    EmptyDataset,

    #[error("model is not fitted")]
    NotFitted,

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<FitError> for ModelError {
    fn from(err: FitError) -> Self {
        match err {
            FitError::EmptyDataset => ModelError::EmptyDataset,
            FitError::InvalidSmoothing(_) => ModelError::InvalidConfig(err.to_string()),
        }
    }
}

impl From<EvaluationError> for ModelError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::EmptyDataset => ModelError::EmptyDataset,
            EvaluationError::InsufficientData(reason) => ModelError::InsufficientData(reason),
            EvaluationError::Fit(err) => err.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Largest goal count per side represented in the score grid.
    pub max_goals: u8,
    /// Pseudo-matches at the league rate added to every team's record.
    pub smoothing_k: f64,
}
impl ModelConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.smoothing_k.is_finite() || self.smoothing_k < 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "smoothing_k must be a non-negative number, got {}",
                self.smoothing_k
            )));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_goals: DEFAULT_MAX_GOALS,
            smoothing_k: DEFAULT_SMOOTHING_K,
        }
    }
}

/// Poisson team-strength model. Fitting replaces the strengths wholesale; a fitted snapshot is
/// never modified, so a fitted model may be shared freely across threads for prediction.
#[derive(Debug, Clone)]
pub struct PoissonModel {
    config: ModelConfig,
    strengths: Option<TeamStrengths>,
}
impl PoissonModel {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            config,
            strengths: None,
        })
    }

    pub fn fitted(config: ModelConfig, dataset: &Dataset) -> Result<Self, ModelError> {
        let mut model = Self::new(config)?;
        model.fit(dataset)?;
        Ok(model)
    }

    /// Fits strengths from the played matches in `dataset`. On failure, any previously fitted
    /// strengths are retained.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<&mut Self, ModelError> {
        let strengths = TeamStrengths::fit(dataset.records(), self.config.smoothing_k)?;
        self.strengths = Some(strengths);
        Ok(self)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.strengths.is_some()
    }

    pub fn strengths(&self) -> Result<&TeamStrengths, ModelError> {
        self.strengths.as_ref().ok_or(ModelError::NotFitted)
    }

    pub fn expected_goals(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<(f64, f64), ModelError> {
        Ok(self.strengths()?.expected_goals(home_team, away_team))
    }

    pub fn score_grid(&self, lambda_home: f64, lambda_away: f64) -> Result<ScoreGrid, ModelError> {
        self.strengths()?;
        Ok(ScoreGrid::from_poisson(
            lambda_home,
            lambda_away,
            self.config.max_goals,
        ))
    }

    pub fn predict_proba(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<OutcomePrediction, ModelError> {
        Ok(predict::predict(
            self.strengths()?,
            home_team,
            away_team,
            self.config.max_goals,
        ))
    }

    pub fn predict_with_grid(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<(OutcomePrediction, ScoreGrid), ModelError> {
        Ok(predict::predict_with_grid(
            self.strengths()?,
            home_team,
            away_team,
            self.config.max_goals,
        ))
    }

    /// Backtests this model's configuration on `dataset`. Independent of the model's own fit.
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        test_season: Option<&str>,
    ) -> Result<Metrics, ModelError> {
        Ok(evaluate::evaluate(dataset, &self.config, test_season)?)
    }
}

#[cfg(test)]
mod tests;
