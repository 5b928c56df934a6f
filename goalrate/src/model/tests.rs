use super::*;
use crate::domain::{MatchRecord, Score};
use assert_float_eq::*;
use chrono::NaiveDate;
use goalrate_testing::assert_slice_f64_absolute;

fn played(
    season: &str,
    month: u32,
    day: u32,
    home: &str,
    away: &str,
    score: (u8, u8),
) -> MatchRecord {
    MatchRecord::played(
        season,
        NaiveDate::from_ymd_opt(2024, month, day),
        home,
        away,
        Score::new(score.0, score.1),
    )
}

/// Ten played matches between four sides, plus one scheduled fixture.
fn ten_matches() -> Dataset {
    Dataset::new(vec![
        played("2425", 8, 16, "Lille", "Nice", (2, 0)),
        played("2425", 8, 17, "Monaco", "Lens", (1, 1)),
        played("2425", 8, 23, "Nice", "Monaco", (0, 3)),
        played("2425", 8, 24, "Lens", "Lille", (1, 2)),
        played("2425", 8, 31, "Lille", "Monaco", (0, 0)),
        played("2425", 9, 1, "Nice", "Lens", (2, 2)),
        played("2425", 9, 14, "Monaco", "Lille", (2, 1)),
        played("2425", 9, 15, "Lens", "Nice", (3, 0)),
        played("2425", 9, 21, "Lille", "Lens", (1, 0)),
        played("2425", 9, 22, "Monaco", "Nice", (4, 1)),
        MatchRecord::scheduled("2425", NaiveDate::from_ymd_opt(2024, 9, 28), "Nice", "Lille"),
    ])
}

#[test]
fn default_config() {
    let config = ModelConfig::default();
    assert_eq!(7, config.max_goals);
    assert_eq!(3.0, config.smoothing_k);
    assert_eq!(Ok(()), config.validate());
}

#[test]
fn invalid_config() {
    let config = ModelConfig {
        smoothing_k: -0.5,
        ..ModelConfig::default()
    };
    assert!(matches!(
        PoissonModel::new(config),
        Err(ModelError::InvalidConfig(_))
    ));
    let config = ModelConfig {
        smoothing_k: f64::NAN,
        ..ModelConfig::default()
    };
    assert!(matches!(config.validate(), Err(ModelError::InvalidConfig(_))));
}

#[test]
fn max_goals_spans_full_range() {
    let config = ModelConfig {
        max_goals: u8::MAX,
        ..ModelConfig::default()
    };
    assert_eq!(Ok(()), config.validate());
    let model = PoissonModel::fitted(config, &ten_matches()).unwrap();
    let (prediction, scoregrid) = model.predict_with_grid("Lille", "Lens").unwrap();
    assert_eq!(256, scoregrid.size());
    assert_float_absolute_eq!(1.0, prediction.probabilities().iter().sum::<f64>(), 1e-9);
}

#[test]
fn shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PoissonModel>();
    assert_send_sync::<TeamStrengths>();

    let model = &PoissonModel::fitted(ModelConfig::default(), &ten_matches()).unwrap();
    let expected = model.predict_proba("Lille", "Nice").unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || model.predict_proba("Lille", "Nice").unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(expected, handle.join().unwrap());
        }
    });
}

#[test]
fn not_fitted() {
    let model = PoissonModel::new(ModelConfig::default()).unwrap();
    assert!(!model.is_fitted());
    assert_eq!(Err(ModelError::NotFitted), model.strengths().map(|_| ()));
    assert_eq!(Err(ModelError::NotFitted), model.expected_goals("Lille", "Nice"));
    assert_eq!(Err(ModelError::NotFitted), model.score_grid(1.0, 1.0));
    assert_eq!(Err(ModelError::NotFitted), model.predict_proba("Lille", "Nice"));
}

#[test]
fn empty_dataset() {
    let mut model = PoissonModel::new(ModelConfig::default()).unwrap();
    assert_eq!(
        Err(ModelError::EmptyDataset),
        model.fit(&Dataset::default()).map(|_| ())
    );
    let scheduled = Dataset::new(vec![MatchRecord::scheduled("2425", None, "Lille", "Nice")]);
    assert_eq!(
        Err(ModelError::EmptyDataset),
        PoissonModel::fitted(ModelConfig::default(), &scheduled).map(|_| ())
    );
}

#[test]
fn failed_refit_retains_strengths() {
    let mut model = PoissonModel::fitted(ModelConfig::default(), &ten_matches()).unwrap();
    let before = model.strengths().unwrap().clone();
    assert!(model.fit(&Dataset::default()).is_err());
    assert_eq!(&before, model.strengths().unwrap());
}

#[test]
fn refit_replaces_strengths() {
    let dataset = ten_matches();
    let mut model = PoissonModel::fitted(ModelConfig::default(), &dataset).unwrap();
    assert_eq!(10, model.strengths().unwrap().num_matches());
    model.fit(&dataset.played().take(4).cloned().collect()).unwrap();
    assert_eq!(4, model.strengths().unwrap().num_matches());
}

/// A scores 3 and 1 at home, conceding 2 and 0; B never plays at home.
#[test]
fn home_attack_by_hand() {
    let dataset = Dataset::new(vec![
        played("2425", 8, 16, "A", "B", (3, 2)),
        played("2425", 8, 23, "A", "B", (1, 0)),
    ]);
    let config = ModelConfig {
        smoothing_k: 0.0,
        ..ModelConfig::default()
    };
    let model = PoissonModel::fitted(config, &dataset).unwrap();
    let strengths = model.strengths().unwrap();
    let league_avg_home_goals = (3.0 + 1.0) / 2.0;
    assert_eq!(league_avg_home_goals, strengths.league_avg_home_goals());
    assert_eq!(
        Some(((3.0 + 1.0) / 2.0) / league_avg_home_goals),
        strengths.attack_home("A")
    );
    assert_eq!(Some(1.0), strengths.attack_home("A"));
    assert_eq!(None, strengths.attack_home("B"));
    assert_eq!(Some(2.0 / 2.0 / 1.0), strengths.defense_home("A"));
}

#[test]
fn unseen_teams_predict_league_average() {
    let model = PoissonModel::fitted(ModelConfig::default(), &ten_matches()).unwrap();
    let strengths = model.strengths().unwrap();
    let prediction = model.predict_proba("TeamX", "TeamY").unwrap();
    assert_eq!(strengths.league_avg_home_goals(), prediction.lambda_home);
    assert_eq!(strengths.league_avg_away_goals(), prediction.lambda_away);
    assert_float_absolute_eq!(
        1.0,
        prediction.p_home_win + prediction.p_draw + prediction.p_away_win,
        1e-9
    );
}

#[test]
fn score_grid_uses_configured_bound() {
    let config = ModelConfig {
        max_goals: 0,
        ..ModelConfig::default()
    };
    let model = PoissonModel::fitted(config, &ten_matches()).unwrap();
    let scoregrid = model.score_grid(1.5, 1.5).unwrap();
    assert_eq!(1, scoregrid.flatten().len());
    assert_float_absolute_eq!(0.0498, scoregrid[(0, 0)], 1e-4);
    assert_eq!(Score::nil_all(), scoregrid.most_likely().0);
}

#[test]
fn predict_with_grid_agrees() {
    let model = PoissonModel::fitted(ModelConfig::default(), &ten_matches()).unwrap();
    let (prediction, scoregrid) = model.predict_with_grid("Monaco", "Nice").unwrap();
    assert_eq!(prediction, model.predict_proba("Monaco", "Nice").unwrap());
    assert_eq!(8, scoregrid.size());
    let (lambda_home, lambda_away) = model.expected_goals("Monaco", "Nice").unwrap();
    assert_eq!(
        model.score_grid(lambda_home, lambda_away).unwrap(),
        scoregrid
    );
    let total = scoregrid.home_win() + scoregrid.draw() + scoregrid.away_win();
    assert_slice_f64_absolute(
        &[
            scoregrid.home_win() / total,
            scoregrid.draw() / total,
            scoregrid.away_win() / total,
        ],
        &prediction.probabilities(),
        1e-15,
    );
}

#[test]
fn normalised_for_every_pairing() {
    let dataset = ten_matches();
    let model = PoissonModel::fitted(ModelConfig::default(), &dataset).unwrap();
    for home in dataset.teams(None) {
        for away in dataset.teams(None) {
            let prediction = model.predict_proba(home, away).unwrap();
            assert_float_absolute_eq!(1.0, prediction.probabilities().iter().sum::<f64>(), 1e-9);
            assert!(prediction.most_likely.home <= 7 && prediction.most_likely.away <= 7);
        }
    }
}

#[test]
fn evaluate_absent_season() {
    let model = PoissonModel::new(ModelConfig::default()).unwrap();
    assert!(matches!(
        model.evaluate(&ten_matches(), Some("2425-absent")),
        Err(ModelError::InsufficientData(_))
    ));
    assert!(matches!(
        model.evaluate(&ten_matches(), Some("2526")),
        Err(ModelError::InsufficientData(_))
    ));
}

#[test]
fn evaluate_does_not_require_fit() {
    let model = PoissonModel::new(ModelConfig::default()).unwrap();
    let metrics = model.evaluate(&ten_matches(), None).unwrap();
    assert_eq!(2, metrics.n_test);
    assert_eq!("temporal_80_20", metrics.split.to_string());
    assert!(!model.is_fitted());
}

#[test]
fn error_conversions() {
    assert_eq!(ModelError::EmptyDataset, ModelError::from(FitError::EmptyDataset));
    assert_eq!(
        ModelError::EmptyDataset,
        ModelError::from(EvaluationError::Fit(FitError::EmptyDataset))
    );
    assert_eq!(
        ModelError::InsufficientData("x".into()),
        ModelError::from(EvaluationError::InsufficientData("x".into()))
    );
}
