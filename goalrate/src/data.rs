//! The match dataset: an immutable table of played and scheduled fixtures, and a reader for the
//! processed matches CSV written by the cleaning pipeline.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::domain::{MatchRecord, Outcome, OutcomeParseError, Score};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<MatchRecord>,
}
impl Dataset {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn played(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().filter(|record| record.is_played())
    }

    /// Played matches in chronological order. Matches that compare equal retain their
    /// relative order in the dataset.
    pub fn played_chronological(&self) -> Vec<&MatchRecord> {
        let mut played: Vec<_> = self.played().collect();
        played.sort_by(|a, b| a.cmp_chronological(b));
        played
    }

    pub fn seasons(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.season.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct team names, optionally restricted to one season.
    pub fn teams(&self, season: Option<&str>) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| season.map_or(true, |season| record.season == season))
            .flat_map(|record| [record.home_team.as_str(), record.away_team.as_str()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn filter_seasons(&self, seasons: &[&str]) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|record| seasons.contains(&record.season.as_str()))
            .cloned()
            .collect();
        Dataset { records }
    }
}

impl From<Vec<MatchRecord>> for Dataset {
    fn from(records: Vec<MatchRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<MatchRecord> for Dataset {
    fn from_iter<T: IntoIterator<Item = MatchRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("missing header row")]
    MissingHeader,

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: invalid {column} '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: {source}")]
    InvalidResult {
        line: usize,
        source: OutcomeParseError,
    },
}

pub fn read_from_file(path: impl AsRef<Path>) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = read_from_reader(BufReader::new(file))?;
    debug!("read {} matches from {}", dataset.len(), path.display());
    Ok(dataset)
}

pub fn read_from_reader(reader: impl BufRead) -> Result<Dataset, DataError> {
    let mut reader = CsvReader::new(reader);
    let header = reader.next().ok_or(DataError::MissingHeader)??;
    let columns = Columns::locate(&header)?;

    let mut records = vec![];
    for (index, row) in reader.enumerate() {
        let line = index + 2;
        let row = row?;
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() < columns.width {
            return Err(DataError::FieldCount {
                line,
                expected: columns.width,
                actual: row.len(),
            });
        }
        records.push(columns.parse(&row, line)?);
    }
    Ok(Dataset::new(records))
}

const SEASON: &str = "season";
const MATCH_DATE: &str = "match_date";
const MATCH_DATETIME: &str = "match_datetime";
const HOME_TEAM: &str = "home_team";
const AWAY_TEAM: &str = "away_team";
const HOME_GOALS: &str = "home_goals";
const AWAY_GOALS: &str = "away_goals";
const RESULT: &str = "result";

struct Columns {
    season: usize,
    date: usize,
    datetime: Option<usize>,
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
    result: Option<usize>,
    width: usize,
}
impl Columns {
    fn locate(header: &[String]) -> Result<Self, DataError> {
        let find = |name: &'static str| header.iter().position(|column| column.trim() == name);
        let require = |name: &'static str| find(name).ok_or(DataError::MissingColumn(name));
        let mut columns = Self {
            season: require(SEASON)?,
            date: require(MATCH_DATE)?,
            datetime: find(MATCH_DATETIME),
            home_team: require(HOME_TEAM)?,
            away_team: require(AWAY_TEAM)?,
            home_goals: require(HOME_GOALS)?,
            away_goals: require(AWAY_GOALS)?,
            result: find(RESULT),
            width: 0,
        };
        columns.width = [
            Some(columns.season),
            Some(columns.date),
            columns.datetime,
            Some(columns.home_team),
            Some(columns.away_team),
            Some(columns.home_goals),
            Some(columns.away_goals),
            columns.result,
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |max| max + 1);
        Ok(columns)
    }

    fn parse(&self, row: &[String], line: usize) -> Result<MatchRecord, DataError> {
        let date = parse_date(&row[self.date]).ok_or_else(|| DataError::InvalidValue {
            line,
            column: MATCH_DATE,
            value: row[self.date].clone(),
        })?;
        let datetime = match self.datetime {
            None => None,
            Some(column) => parse_datetime(&row[column]).ok_or_else(|| DataError::InvalidValue {
                line,
                column: MATCH_DATETIME,
                value: row[column].clone(),
            })?,
        };
        let home_goals = parse_goals(&row[self.home_goals], HOME_GOALS, line)?;
        let away_goals = parse_goals(&row[self.away_goals], AWAY_GOALS, line)?;
        let recorded = match self.result {
            None => None,
            Some(column) if is_null(&row[column]) => None,
            Some(column) => Some(
                Outcome::from_str(&row[column])
                    .map_err(|source| DataError::InvalidResult { line, source })?,
            ),
        };
        let result = match (home_goals, away_goals) {
            (Some(home), Some(away)) => {
                Some(recorded.unwrap_or_else(|| Score::new(home, away).outcome()))
            }
            _ => None,
        };

        Ok(MatchRecord {
            season: row[self.season].trim().to_string(),
            date,
            datetime,
            home_team: row[self.home_team].trim().to_string(),
            away_team: row[self.away_team].trim().to_string(),
            home_goals,
            away_goals,
            result,
        })
    }
}

fn is_null(value: &str) -> bool {
    matches!(value.trim(), "" | "nan" | "NaN" | "NaT" | "<NA>" | "None")
}

/// `Some(None)` for a null value, `None` if the value is malformed.
fn parse_date(value: &str) -> Option<Option<NaiveDate>> {
    if is_null(value) {
        return Some(None);
    }
    let value = value.trim();
    let date_part = value.split([' ', 'T']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok().map(Some)
}

fn parse_datetime(value: &str) -> Option<Option<NaiveDateTime>> {
    if is_null(value) {
        return Some(None);
    }
    let value = value.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(Some)
}

fn parse_goals(value: &str, column: &'static str, line: usize) -> Result<Option<u8>, DataError> {
    if is_null(value) {
        return Ok(None);
    }
    let invalid = || DataError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    };
    let goals = value.trim().parse::<f64>().map_err(|_| invalid())?;
    if goals < 0.0 || goals.fract() != 0.0 || goals > u8::MAX as f64 {
        return Err(invalid());
    }
    Ok(Some(goals as u8))
}

/// Line-oriented CSV reader. Fields may be wrapped in double quotes, in which case they may
/// contain commas and doubled quotes; embedded line breaks are not supported.
struct CsvReader<R> {
    lines: Lines<R>,
}
impl<R: BufRead> CsvReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for CsvReader<R> {
    type Item = Result<Vec<String>, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines
            .next()
            .map(|line| line.map(|line| split_fields(line.trim_end_matches('\r'))))
    }
}

fn split_fields(line: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
