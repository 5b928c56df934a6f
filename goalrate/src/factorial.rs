/// The largest `n` for which `n!` is finite in `f64`.
pub const MAX_FACTORIAL: u16 = 170;

pub trait Factorial {
    fn get(&self, n: u16) -> f64;
}

#[derive(Default)]
pub struct Calculator;

impl Factorial for Calculator {
    #[inline]
    fn get(&self, n: u16) -> f64 {
        assert!(n <= MAX_FACTORIAL, "{n}! overflows");
        let mut product = 1.0;
        for i in 2..=n {
            product *= i as f64;
        }
        product
    }
}

const MAX_FACTORIAL_ENTRIES: usize = MAX_FACTORIAL as usize + 1;

/// Precomputed factorials, for repeated evaluation of the Poisson pmf over a score grid.
pub struct Lookup {
    entries: [f64; MAX_FACTORIAL_ENTRIES],
}
impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u16) -> f64 {
        assert!(n <= MAX_FACTORIAL, "{n}! overflows");
        self.entries[n as usize]
    }
}

impl Default for Lookup {
    fn default() -> Self {
        let mut entries = [1.0; MAX_FACTORIAL_ENTRIES];
        for i in 2..MAX_FACTORIAL_ENTRIES {
            entries[i] = i as f64 * entries[i - 1];
        }
        Self { entries }
    }
}
