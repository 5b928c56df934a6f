use super::*;
use crate::factorial::Calculator;
use assert_float_eq::*;
use goalrate_testing::assert_slice_f64_relative;

fn create_test_4x4_scoregrid() -> ScoreGrid {
    let mut scoregrid = ScoreGrid::allocate(3);
    let rows = [
        [0.04, 0.03, 0.02, 0.01],
        [0.08, 0.06, 0.04, 0.02],
        [0.12, 0.09, 0.06, 0.03],
        [0.16, 0.12, 0.08, 0.04],
    ];
    for (home_goals, row) in rows.iter().enumerate() {
        for (away_goals, &prob) in row.iter().enumerate() {
            scoregrid[(home_goals, away_goals)] = prob;
        }
    }
    scoregrid
}

#[test]
pub fn gather_outcomes() {
    let scoregrid = create_test_4x4_scoregrid();
    assert_float_absolute_eq!(0.65, scoregrid.home_win());
    assert_float_absolute_eq!(0.2, scoregrid.draw());
    assert_float_absolute_eq!(0.15, scoregrid.away_win());
    assert_float_absolute_eq!(1.0, scoregrid.total());
}

#[test]
pub fn most_likely_of_hand_built_grid() {
    let scoregrid = create_test_4x4_scoregrid();
    let (score, prob) = scoregrid.most_likely();
    assert_eq!(Score::new(3, 0), score);
    assert_eq!(0.16, prob);
    assert_eq!(0.16, scoregrid[&score]);
}

#[test]
pub fn most_likely_ties_break_row_major() {
    let mut scoregrid = ScoreGrid::allocate(2);
    scoregrid[(1, 2)] = 0.3;
    scoregrid[(2, 0)] = 0.3;
    scoregrid[(0, 1)] = 0.1;
    assert_eq!(Score::new(1, 2), scoregrid.most_likely().0);

    let degenerate = ScoreGrid::from_poisson(0.0, 0.0, 0);
    assert_eq!(Score::nil_all(), degenerate.most_likely().0);

    // 1-0 and 0-1 are equally likely with symmetric rates; 0-1 is encountered first
    let mut symmetric = ScoreGrid::allocate(1);
    symmetric[(0, 1)] = 0.25;
    symmetric[(1, 0)] = 0.25;
    assert_eq!(Score::new(0, 1), symmetric.most_likely().0);
}

#[test]
pub fn single_cell_grid() {
    let scoregrid = ScoreGrid::from_poisson(1.5, 1.5, 0);
    assert_eq!(1, scoregrid.flatten().len());
    assert_eq!(0, scoregrid.max_goals());
    assert_float_relative_eq!(f64::exp(-1.5) * f64::exp(-1.5), scoregrid[(0, 0)]);
    assert_float_absolute_eq!(0.049787, scoregrid[(0, 0)], 1e-6);
    assert_eq!(Score::nil_all(), scoregrid.most_likely().0);
    assert_eq!(scoregrid[(0, 0)], scoregrid.draw());
    assert_eq!(0.0, scoregrid.home_win());
    assert_eq!(0.0, scoregrid.away_win());
}

#[test]
pub fn zero_rates() {
    let scoregrid = ScoreGrid::from_poisson(0.0, 0.0, 7);
    assert_eq!(1.0, scoregrid[(0, 0)]);
    for (index, &prob) in scoregrid.flatten().iter().enumerate().skip(1) {
        assert_eq!(0.0, prob, "cell {index}");
    }
}

#[test]
pub fn truncation_bound() {
    for max_goals in [0, 1, 3, 7, 10] {
        for (lambda_home, lambda_away) in [(0.2, 0.1), (1.4, 1.1), (3.5, 0.7), (20.0, 6.0)] {
            let scoregrid = ScoreGrid::from_poisson(lambda_home, lambda_away, max_goals);
            let cells = (max_goals as usize + 1).pow(2);
            assert_eq!(cells, scoregrid.flatten().len());
            assert!(scoregrid.flatten().iter().all(|&prob| prob >= 0.0));
            assert!(scoregrid.total() <= 1.0 + 1e-12);
        }
    }
}

#[test]
pub fn cells_are_products_of_marginals() {
    let scoregrid = ScoreGrid::from_poisson(1.4, 0.9, 4);
    let home: Vec<_> = (0..=4).map(|k| poisson::univariate(k, 1.4, &Calculator)).collect();
    let away: Vec<_> = (0..=4).map(|k| poisson::univariate(k, 0.9, &Calculator)).collect();
    for i in 0..=4 {
        let expected: Vec<_> = away.iter().map(|away_prob| home[i] * away_prob).collect();
        assert_slice_f64_relative(&expected, scoregrid.row_slice(i), 1e-12);
    }
}

#[test]
pub fn partitions_sum_to_total() {
    let scoregrid = ScoreGrid::from_poisson(1.7, 1.2, 7);
    let sum = scoregrid.home_win() + scoregrid.draw() + scoregrid.away_win();
    assert_float_relative_eq!(scoregrid.total(), sum, 1e-12);
    assert!(scoregrid.home_win() > scoregrid.away_win());
}

#[test]
pub fn display() {
    let scoregrid = create_test_4x4_scoregrid();
    let rendered = scoregrid.to_string();
    assert_eq!(4, rendered.lines().count());
    assert_eq!(
        "0.040000 0.030000 0.020000 0.010000",
        rendered.lines().next().unwrap()
    );
}
