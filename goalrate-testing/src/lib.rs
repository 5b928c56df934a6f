//! Testing helpers.

use assert_float_eq::*;

/// Asserts that two probability slices agree element-wise within an absolute `epsilon`.
pub fn assert_slice_f64_absolute(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_absolute_eq!(expected, actual, epsilon);
        }
    }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// Asserts that a sequence of values approaches `target` without ever moving away from it.
pub fn assert_monotone_towards(values: &[f64], target: f64) {
    for window in values.windows(2) {
        let (prev, next) = (window[0], window[1]);
        assert!(
            f64::abs(next - target) <= f64::abs(prev - target),
            "{next} is further from {target} than {prev}"
        );
        assert!(
            (prev - target) * (next - target) >= 0.0,
            "{prev} → {next} crossed over {target}"
        );
    }
}
