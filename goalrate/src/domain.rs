use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use ordinalizer::Ordinal;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}
impl Side {
    pub fn flip(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// A 1X2 match outcome, from the home side's perspective.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, Ordinal, EnumCount, EnumIter, Serialize, Deserialize,
)]
pub enum Outcome {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "A")]
    Away,
}
impl Outcome {
    pub fn from_goals(home_goals: u8, away_goals: u8) -> Self {
        match home_goals.cmp(&away_goals) {
            Ordering::Greater => Outcome::Home,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Away,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Home => "H",
            Outcome::Draw => "D",
            Outcome::Away => "A",
        }
    }

    /// League points earned by `side` under this outcome.
    pub fn points(&self, side: Side) -> u8 {
        match (self, side) {
            (Outcome::Draw, _) => 1,
            (Outcome::Home, Side::Home) | (Outcome::Away, Side::Away) => 3,
            _ => 0,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Home => Some(Side::Home),
            Outcome::Draw => None,
            Outcome::Away => Some(Side::Away),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported result code '{0}'")]
pub struct OutcomeParseError(pub String);

impl FromStr for Outcome {
    type Err = OutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" => Ok(Outcome::Home),
            "D" => Ok(Outcome::Draw),
            "A" => Ok(Outcome::Away),
            _ => Err(OutcomeParseError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn nil_all() -> Self {
        Self { home: 0, away: 0 }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_goals(self.home, self.away)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// A single fixture, played or scheduled. Team names are opaque keys and are compared verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub season: String,
    pub date: Option<NaiveDate>,
    pub datetime: Option<NaiveDateTime>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u8>,
    pub away_goals: Option<u8>,
    pub result: Option<Outcome>,
}
impl MatchRecord {
    pub fn played(
        season: impl Into<String>,
        date: Option<NaiveDate>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        score: Score,
    ) -> Self {
        Self {
            season: season.into(),
            date,
            datetime: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            result: Some(score.outcome()),
            home_goals: Some(score.home),
            away_goals: Some(score.away),
        }
    }

    pub fn scheduled(
        season: impl Into<String>,
        date: Option<NaiveDate>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Self {
        Self {
            season: season.into(),
            date,
            datetime: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals: None,
            away_goals: None,
            result: None,
        }
    }

    pub fn with_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.datetime = Some(datetime);
        self
    }

    pub fn is_played(&self) -> bool {
        self.home_goals.is_some() && self.away_goals.is_some()
    }

    pub fn score(&self) -> Option<Score> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some(Score { home, away }),
            _ => None,
        }
    }

    /// The recorded result of a played match, falling back to the one implied by the score.
    pub fn played_result(&self) -> Option<Outcome> {
        let score = self.score()?;
        Some(self.result.unwrap_or_else(|| score.outcome()))
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    /// Orders matches by date then by date-time, with missing values last.
    pub fn cmp_chronological(&self, other: &Self) -> Ordering {
        cmp_nones_last(&self.date, &other.date, false)
            .then_with(|| cmp_nones_last(&self.datetime, &other.datetime, false))
    }

    /// Newest first. Missing values are still ordered last.
    pub fn cmp_reverse_chronological(&self, other: &Self) -> Ordering {
        cmp_nones_last(&self.date, &other.date, true)
            .then_with(|| cmp_nones_last(&self.datetime, &other.datetime, true))
    }
}

fn cmp_nones_last<T: Ord>(a: &Option<T>, b: &Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(a),
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
