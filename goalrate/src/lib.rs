//! A Poisson team-strength model for football. Estimates smoothed home/away attack and defense
//! ratios from historical results, derives expected goals for a fixture, and expands them into a
//! scoreline grid and 1X2 outcome probabilities. Also backtests the model on a temporal split.

pub mod data;
pub mod domain;
pub mod evaluate;
pub mod factorial;
pub mod model;
pub mod poisson;
pub mod predict;
pub mod print;
pub mod scoregrid;
pub mod standings;
pub mod strength;

#[doc = include_str!("../../README.md")]
#[cfg(doc)]
fn readme() {}
