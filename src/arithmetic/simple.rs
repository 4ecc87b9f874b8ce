use super::PossibilityArithmetic;

/// Linear values below this are treated as having lost precision.
pub const UNDERFLOW_LIMIT: f64 = 1e-250;

/// Plain linear domain: the fastest, and the first to underflow on long reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplePossibility;

impl PossibilityArithmetic for SimplePossibility {
    #[inline]
    fn zero(&self) -> f64 {
        0.0
    }

    #[inline]
    fn one(&self) -> f64 {
        1.0
    }

    #[inline]
    fn multiply(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    #[inline]
    fn divide(&self, a: f64, b: f64) -> f64 {
        if a == 0.0 {
            return 0.0;
        }
        a / b
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn gt(&self, a: f64, b: f64) -> bool {
        a > b
    }

    fn is_valid(&self, v: f64) -> bool {
        v.is_finite() && v >= 0.0
    }

    #[inline]
    fn poss2ln(&self, v: f64) -> f64 {
        v.ln()
    }

    #[inline]
    fn ln2poss(&self, ln: f64) -> f64 {
        ln.exp()
    }

    #[inline]
    fn prob2poss(&self, p: f64) -> f64 {
        p
    }

    #[inline]
    fn poss2prob(&self, v: f64) -> f64 {
        v
    }

    #[inline]
    fn underflow(&self, v: f64) -> bool {
        v < UNDERFLOW_LIMIT
    }
}
