//! Truncated joint distribution of full-time scorelines.

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::domain::{Outcome, Score};
use crate::factorial::{Factorial, Lookup};
use crate::poisson;

/// A square grid of scoreline probabilities. Rows are home goals and columns are away goals, each
/// ranging over `0..=max_goals`. Scorelines beyond `max_goals` are not represented, so the grid's
/// total mass is at most 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    data: Vec<f64>,
    size: usize,
}
impl ScoreGrid {
    pub fn allocate(max_goals: u8) -> Self {
        let size = max_goals as usize + 1;
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Joint probabilities of two independent Poisson-distributed goal counts.
    pub fn from_poisson(lambda_home: f64, lambda_away: f64, max_goals: u8) -> Self {
        Self::from_poisson_with(lambda_home, lambda_away, max_goals, &Lookup::default())
    }

    pub fn from_poisson_with(
        lambda_home: f64,
        lambda_away: f64,
        max_goals: u8,
        factorial: &impl Factorial,
    ) -> Self {
        let mut grid = Self::allocate(max_goals);
        let home_probs = poisson::marginals(lambda_home, max_goals as u16, factorial);
        let away_probs = poisson::marginals(lambda_away, max_goals as u16, factorial);
        for (home_goals, home_prob) in home_probs.iter().enumerate() {
            for (away_goals, away_prob) in away_probs.iter().enumerate() {
                grid[(home_goals, away_goals)] = home_prob * away_prob;
            }
        }
        grid
    }

    pub fn max_goals(&self) -> u8 {
        (self.size - 1) as u8
    }

    /// Number of rows, which equals the number of columns.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row_slice(&self, home_goals: usize) -> &[f64] {
        debug_assert!(self.validate_index(home_goals));
        let row_start = home_goals * self.size;
        &self.data[row_start..(row_start + self.size)]
    }

    pub fn flatten(&self) -> &[f64] {
        &self.data
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn home_win(&self) -> f64 {
        self.gather(Outcome::Home)
    }

    pub fn draw(&self) -> f64 {
        self.gather(Outcome::Draw)
    }

    pub fn away_win(&self) -> f64 {
        self.gather(Outcome::Away)
    }

    /// Total probability of all scorelines resulting in the given `outcome`.
    pub fn gather(&self, outcome: Outcome) -> f64 {
        let mut prob = 0.0;
        for home_goals in 0..self.size {
            let row = self.row_slice(home_goals);
            let cols = match outcome {
                Outcome::Home => 0..home_goals,
                Outcome::Draw => home_goals..home_goals + 1,
                Outcome::Away => home_goals + 1..self.size,
            };
            for away_goals in cols {
                prob += row[away_goals];
            }
        }
        prob
    }

    /// The most probable scoreline. Ties go to the first cell in row-major order.
    pub fn most_likely(&self) -> (Score, f64) {
        let mut best_index = 0;
        let mut best_prob = self.data[0];
        for (index, &prob) in self.data.iter().enumerate().skip(1) {
            if prob > best_prob {
                best_index = index;
                best_prob = prob;
            }
        }
        let score = Score::new((best_index / self.size) as u8, (best_index % self.size) as u8);
        (score, best_prob)
    }

    fn validate_index(&self, goals: usize) -> bool {
        assert!(
            goals < self.size,
            "invalid goal count {goals} for a {}x{} score grid",
            self.size,
            self.size
        );
        true
    }
}

impl Index<(usize, usize)> for ScoreGrid {
    type Output = f64;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (home_goals, away_goals) = index;
        debug_assert!(self.validate_index(home_goals));
        debug_assert!(self.validate_index(away_goals));
        &self.data[home_goals * self.size + away_goals]
    }
}

impl IndexMut<(usize, usize)> for ScoreGrid {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (home_goals, away_goals) = index;
        debug_assert!(self.validate_index(home_goals));
        debug_assert!(self.validate_index(away_goals));
        &mut self.data[home_goals * self.size + away_goals]
    }
}

impl Index<&Score> for ScoreGrid {
    type Output = f64;

    #[inline]
    fn index(&self, score: &Score) -> &Self::Output {
        &self[(score.home as usize, score.away as usize)]
    }
}

impl Display for ScoreGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for home_goals in 0..self.size {
            let row = self.row_slice(home_goals);
            for (away_goals, prob) in row.iter().enumerate() {
                if away_goals > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{prob:.6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
