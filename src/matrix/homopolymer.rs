use std::fmt;
use std::sync::Arc;

use super::band::{Band, Topology, TransitionModel};
use super::AllPaths;
use crate::arithmetic::PossibilityArithmetic;
use crate::config::MatrixConfig;
use crate::environment::{Environment, HomopolymerEnvironment};
use crate::params::{unsupported, HomopolymerParams, RealignParams};
use crate::RealignError;

/// Standard matrix with calibrated homopolymer run lengths.
///
/// Where a read run of length `r` ends against the end of a template run of
/// the same base with length `t`, the match cell is replaced by a single
/// transition that consumes both runs whole, weighted by
/// `P(r | base, t)` from the calibration. Cells with no calibrated
/// probability keep the ordinary recurrence, so an empty calibration gives
/// exactly the [`ScoreMatrix`](super::ScoreMatrix) result.
#[derive(Debug, Clone)]
pub struct ScoreMatrixHomopolymer<A: PossibilityArithmetic> {
    band: Band<A>,
    calibration: Arc<HomopolymerParams>,
}

impl<A: PossibilityArithmetic + Default + Copy> ScoreMatrixHomopolymer<A> {
    /// Matrix with the default configuration.
    pub fn new<P: RealignParams + ?Sized>(params: &P, calibration: Arc<HomopolymerParams>) -> Self {
        Self {
            band: Band::new(TransitionModel::from_params(params), MatrixConfig::new()),
            calibration,
        }
    }

    /// Matrix with explicit sizing limits.
    pub fn with_config<P: RealignParams + ?Sized>(
        params: &P,
        calibration: Arc<HomopolymerParams>,
        config: MatrixConfig,
    ) -> Result<Self, RealignError> {
        config.validate()?;
        Ok(Self {
            band: Band::new(TransitionModel::from_params(params), config),
            calibration,
        })
    }

    /// Calibration the matrix consults.
    pub fn calibration(&self) -> &HomopolymerParams {
        &self.calibration
    }
}

/// Weight of the whole-run transition into cell `(row, t)`, if calibrated.
fn run_transition<A, E>(
    band: &Band<A>,
    env: &HomopolymerEnvironment<E>,
    calibration: &HomopolymerParams,
    row: usize,
    t: isize,
) -> Option<f64>
where
    A: PossibilityArithmetic + Default + Copy,
    E: Environment,
{
    let read_run = env.read_end(row - 1);
    if read_run == 0 {
        return None;
    }
    let template_run = env.template_end(t);
    if template_run == 0 {
        return None;
    }
    let base = env.read(row - 1);
    if env.template(t) != base {
        return None;
    }
    let probability = calibration.transition(base, template_run, read_run)?;

    let a = band.arith();
    let before = row - read_run;
    let col = t - template_run as isize - band.offset(before);
    if col < 0 || col as usize >= band.width() {
        return Some(a.zero());
    }
    let mut weight = a.prob2poss(probability);
    for index in before..row {
        let (same, _) = band.emissions(env.quality(index));
        weight = a.multiply(weight, same);
    }
    Some(a.multiply(weight, band.entry(before, col as usize)))
}

impl<A: PossibilityArithmetic + Default + Copy> AllPaths for ScoreMatrixHomopolymer<A> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        if self.calibration.is_empty() {
            return self.band.populate(env, &Topology::default(), |_, _, _, _, _| None);
        }
        let annotated = HomopolymerEnvironment::new(env);
        let calibration = Arc::clone(&self.calibration);
        self.band.populate(&annotated, &Topology::default(), |band, env, row, _, t| {
            run_transition(band, env, &calibration, row, t)
        })
    }

    fn read_starts_before_ln(&self, _index: isize) -> Result<f64, RealignError> {
        Err(unsupported("read_starts_before_ln", self.band.model.machine))
    }

    fn read_ends_after_ln(&self, index: isize) -> Result<f64, RealignError> {
        Ok(self.band.ends_after_ln(index))
    }

    delegate_band!();
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for ScoreMatrixHomopolymer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.band, f)
    }
}
