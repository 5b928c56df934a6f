use crate::factorial::{Factorial, MAX_FACTORIAL};

/// Probability of exactly `k` goals given a Poisson rate `lambda`. A non-positive rate is a
/// point mass at zero.
///
/// # Panics
/// If `k` exceeds the range of `factorial`.
#[inline]
pub fn univariate(k: u16, lambda: f64, factorial: &impl Factorial) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    let prob = f64::exp(-lambda) * lambda.powf(k as f64) / factorial.get(k);
    if prob.is_finite() {
        prob
    } else {
        // lambda^k overflowed
        f64::exp(k as f64 * lambda.ln() - lambda - factorial.get(k).ln())
    }
}

/// Probabilities of `0..=max` goals. Terms beyond [`MAX_FACTORIAL`] continue by the recurrence
/// `p(k) = p(k - 1) × lambda / k`.
pub fn marginals(lambda: f64, max: u16, factorial: &impl Factorial) -> Vec<f64> {
    let mut probs = Vec::with_capacity(max as usize + 1);
    for k in 0..=max {
        let prob = if k <= MAX_FACTORIAL {
            univariate(k, lambda, factorial)
        } else {
            probs[k as usize - 1] * f64::max(lambda, 0.0) / k as f64
        };
        probs.push(prob);
    }
    probs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factorial::{Calculator, Lookup};
    use assert_float_eq::*;

    #[test]
    pub fn test_univariate() {
        assert_float_relative_eq!(
            0.36787944117144233,
            univariate(0, 1.0, &Calculator)
        );
        assert_float_relative_eq!(
            0.36787944117144233,
            univariate(1, 1.0, &Calculator)
        );
        assert_float_relative_eq!(
            0.18393972058572117,
            univariate(2, 1.0, &Calculator)
        );
        assert_float_relative_eq!(
            0.0820849986238988,
            univariate(0, 2.5, &Lookup::default())
        );
        assert_float_relative_eq!(
            0.205212496559747,
            univariate(1, 2.5, &Lookup::default())
        );
        assert_float_relative_eq!(
            0.25651562069968376,
            univariate(2, 2.5, &Lookup::default())
        );
    }

    #[test]
    pub fn zero_rate_is_point_mass() {
        assert_eq!(1.0, univariate(0, 0.0, &Calculator));
        assert_eq!(0.0, univariate(1, 0.0, &Calculator));
        assert_eq!(0.0, univariate(7, 0.0, &Calculator));
        assert_eq!(1.0, univariate(0, -0.5, &Calculator));
    }

    #[test]
    pub fn sums_to_one_over_support() {
        let lookup = Lookup::default();
        let total: f64 = (0..=60).map(|k| univariate(k, 3.2, &lookup)).sum();
        assert_float_absolute_eq!(1.0, total, 1e-12);
    }

    #[test]
    pub fn large_rate_does_not_overflow() {
        let prob = univariate(160, 150.0, &Lookup::default());
        assert!(prob.is_finite());
        assert!(prob > 0.01 && prob < 0.05, "prob: {prob}");
    }

    #[test]
    pub fn marginals_past_factorial_range() {
        let lookup = Lookup::default();
        let probs = marginals(2.5, 200, &lookup);
        assert_eq!(201, probs.len());
        for (k, &prob) in probs.iter().take(MAX_FACTORIAL as usize + 1).enumerate() {
            assert_eq!(univariate(k as u16, 2.5, &lookup), prob);
        }
        assert!(probs.iter().all(|prob| prob.is_finite() && *prob >= 0.0));
        assert_float_absolute_eq!(1.0, probs.iter().sum::<f64>(), 1e-12);

        let probs = marginals(0.0, 200, &lookup);
        assert_eq!(1.0, probs[0]);
        assert!(probs[1..].iter().all(|&prob| prob == 0.0));
    }
}
