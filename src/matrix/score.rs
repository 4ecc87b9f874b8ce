use std::fmt;

use super::band::{Band, Topology, TransitionModel};
use super::AllPaths;
use crate::arithmetic::PossibilityArithmetic;
use crate::config::MatrixConfig;
use crate::environment::{Environment, InvertedEnvironment};
use crate::params::{unsupported, RealignParams};
use crate::RealignError;

/// Standard banded matrix with linear gap penalties.
///
/// Row 0 lets the read start anywhere in the band; the total sums match and
/// delete cells of the last row, so a read never ends inside an insertion.
#[derive(Debug, Clone)]
pub struct ScoreMatrix<A: PossibilityArithmetic> {
    band: Band<A>,
}

impl<A: PossibilityArithmetic + Default + Copy> ScoreMatrix<A> {
    /// Matrix with the default configuration.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Self {
        Self {
            band: Band::new(TransitionModel::from_params(params), MatrixConfig::new()),
        }
    }

    /// Matrix with explicit sizing limits.
    pub fn with_config<P: RealignParams + ?Sized>(
        params: &P,
        config: MatrixConfig,
    ) -> Result<Self, RealignError> {
        config.validate()?;
        Ok(Self {
            band: Band::new(TransitionModel::from_params(params), config),
        })
    }

    pub(crate) fn band(&self) -> &Band<A> {
        &self.band
    }
}

impl<A: PossibilityArithmetic + Default + Copy> AllPaths for ScoreMatrix<A> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        self.band.populate(env, &Topology::default(), |_, _, _, _, _| None)
    }

    fn read_starts_before_ln(&self, _index: isize) -> Result<f64, RealignError> {
        Err(unsupported("read_starts_before_ln", self.band.model.machine))
    }

    fn read_ends_after_ln(&self, index: isize) -> Result<f64, RealignError> {
        Ok(self.band.ends_after_ln(index))
    }

    delegate_band!();
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for ScoreMatrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.band, f)
    }
}

/// Standard matrix walked from the end of the read.
///
/// Computes the same recurrence over the read and template reflected about
/// the read length, so its start-boundary function mirrors the forward
/// matrix's end-boundary function.
#[derive(Debug, Clone)]
pub struct ScoreMatrixReverse<A: PossibilityArithmetic> {
    band: Band<A>,
    pivot: isize,
}

impl<A: PossibilityArithmetic + Default + Copy> ScoreMatrixReverse<A> {
    /// Matrix with the default configuration.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Self {
        Self {
            band: Band::new(TransitionModel::from_params(params), MatrixConfig::new()),
            pivot: 0,
        }
    }

    /// Matrix with explicit sizing limits.
    pub fn with_config<P: RealignParams + ?Sized>(
        params: &P,
        config: MatrixConfig,
    ) -> Result<Self, RealignError> {
        config.validate()?;
        Ok(Self {
            band: Band::new(TransitionModel::from_params(params), config),
            pivot: 0,
        })
    }
}

impl<A: PossibilityArithmetic + Default + Copy> AllPaths for ScoreMatrixReverse<A> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        let inverted = InvertedEnvironment::new(env);
        self.pivot = inverted.pivot();
        self.band.populate(&inverted, &Topology::default(), |_, _, _, _, _| None)
    }

    fn read_starts_before_ln(&self, index: isize) -> Result<f64, RealignError> {
        Ok(self.band.ends_after_ln(self.pivot - 1 - index))
    }

    fn read_ends_after_ln(&self, _index: isize) -> Result<f64, RealignError> {
        Err(unsupported("read_ends_after_ln", self.band.model.machine))
    }

    delegate_band!();
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for ScoreMatrixReverse<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.band, f)
    }
}
