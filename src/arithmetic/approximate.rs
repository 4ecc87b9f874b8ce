use std::sync::OnceLock;

use super::PossibilityArithmetic;

/// Absolute tolerance on log results held against the exact domains.
pub const APPROXIMATE_TOLERANCE: f64 = 1e-3;

/// Table steps per unit of log difference.
const SCALE: f64 = 64.0;
/// Differences at or beyond this contribute nothing measurable.
const CUTOFF: f64 = 32.0;
const TABLE_LEN: usize = (CUTOFF * SCALE) as usize + 2;

static LN1P_EXP_TABLE: OnceLock<[f64; TABLE_LEN]> = OnceLock::new();

// ln(1 + e^(-k / SCALE)) for k in 0..TABLE_LEN
#[inline(always)]
fn ln1p_exp_table() -> &'static [f64; TABLE_LEN] {
    LN1P_EXP_TABLE.get_or_init(|| {
        let mut t = [0.0; TABLE_LEN];
        for (k, slot) in t.iter_mut().enumerate() {
            *slot = (-(k as f64) / SCALE).exp().ln_1p();
        }
        t
    })
}

/// Natural-log domain with a table-driven log-sum-exp.
///
/// Products are exact; sums interpolate `ln(1 + e^-d)` linearly between
/// table points, so every addition may overestimate by a few `1e-6`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogApproximatePossibility;

impl PossibilityArithmetic for LogApproximatePossibility {
    #[inline]
    fn zero(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn one(&self) -> f64 {
        0.0
    }

    #[inline]
    fn multiply(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn divide(&self, a: f64, b: f64) -> f64 {
        if a == f64::NEG_INFINITY {
            return a;
        }
        a - b
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        if a == f64::NEG_INFINITY {
            return b;
        }
        if b == f64::NEG_INFINITY {
            return a;
        }
        let (max, min) = if a >= b { (a, b) } else { (b, a) };
        let diff = max - min;
        if diff >= CUTOFF {
            return max;
        }
        let table = ln1p_exp_table();
        let x = diff * SCALE;
        let k = x as usize;
        let frac = x - k as f64;
        max + table[k] + (table[k + 1] - table[k]) * frac
    }

    #[inline]
    fn gt(&self, a: f64, b: f64) -> bool {
        a > b
    }

    fn is_valid(&self, v: f64) -> bool {
        !v.is_nan() && v != f64::INFINITY
    }

    #[inline]
    fn poss2ln(&self, v: f64) -> f64 {
        v
    }

    #[inline]
    fn ln2poss(&self, ln: f64) -> f64 {
        ln
    }

    #[inline]
    fn prob2poss(&self, p: f64) -> f64 {
        p.ln()
    }

    #[inline]
    fn poss2prob(&self, v: f64) -> f64 {
        v.exp()
    }

    #[inline]
    fn underflow(&self, _v: f64) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::LogPossibility;

    #[test]
    fn test_table_points_are_exact() {
        let exact = LogPossibility;
        let approx = LogApproximatePossibility;
        for k in [0usize, 1, 64, 640] {
            let d = k as f64 / SCALE;
            let a = approx.add(0.0, -d);
            let b = exact.add(0.0, -d);
            assert!((a - b).abs() < 1e-12, "k={k}");
        }
    }

    #[test]
    fn test_interpolation_stays_within_tolerance() {
        let exact = LogPossibility;
        let approx = LogApproximatePossibility;
        let mut worst: f64 = 0.0;
        let mut d = 0.0;
        while d < CUTOFF + 1.0 {
            worst = worst.max((approx.add(-3.0, -3.0 - d) - exact.add(-3.0, -3.0 - d)).abs());
            d += 0.0037;
        }
        assert!(worst < 1e-5, "worst interpolation error {worst}");
    }

    #[test]
    fn test_cutoff_returns_max() {
        let approx = LogApproximatePossibility;
        assert_eq!(approx.add(-1.0, -40.0), -1.0);
    }
}
