use super::PossibilityArithmetic;

/// Exact natural-log domain.
///
/// Sums use `max + ln(1 + e^(min - max))`, which keeps full precision for
/// values far below the smallest representable linear `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogPossibility;

impl PossibilityArithmetic for LogPossibility {
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
        max + (min - max).exp().ln_1p()
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
