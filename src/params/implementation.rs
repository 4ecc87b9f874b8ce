use super::{
    rate_ln, CalibrationError, GapCategory, GapDistribution, GapTables, MachineType, RealignParams,
};
use crate::RealignError;

/// Calibrated error profile of a sequencing machine.
///
/// Length distributions are indexed by indel length minus one, so
/// `insert_lengths[0]` is the weight of single-base insertions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineErrorParams {
    /// Machine the profile was calibrated on.
    pub machine: MachineType,
    /// Aggregate per-base mismatch rate.
    pub mismatch_rate: f64,
    /// Per-base insertion opening rate.
    pub insert_open_rate: f64,
    /// Per-base deletion opening rate.
    pub delete_open_rate: f64,
    /// Empirical insertion length weights.
    pub insert_lengths: Vec<f64>,
    /// Empirical deletion length weights.
    pub delete_lengths: Vec<f64>,
    /// Fragment gap distributions (gapped machines only).
    pub gaps: Vec<GapDistribution>,
}

impl MachineErrorParams {
    /// Profile with single-base indels only and no gap data.
    pub fn new(
        machine: MachineType,
        mismatch_rate: f64,
        insert_open_rate: f64,
        delete_open_rate: f64,
    ) -> Self {
        Self {
            machine,
            mismatch_rate,
            insert_open_rate,
            delete_open_rate,
            insert_lengths: vec![1.0],
            delete_lengths: vec![1.0],
            gaps: Vec::new(),
        }
    }

    /// Set the insertion length weights.
    pub fn with_insert_lengths(mut self, weights: Vec<f64>) -> Self {
        self.insert_lengths = weights;
        self
    }

    /// Set the deletion length weights.
    pub fn with_delete_lengths(mut self, weights: Vec<f64>) -> Self {
        self.delete_lengths = weights;
        self
    }

    /// Add a fragment gap distribution.
    pub fn with_gap(mut self, gap: GapDistribution) -> Self {
        self.gaps.push(gap);
        self
    }
}

/// Geometric extension probability matching the weighted mean length
/// beyond the first base: `mean / (1 + mean)`.
pub(crate) fn mean_decay_extend(
    name: &'static str,
    weights: &[f64],
) -> Result<f64, CalibrationError> {
    if weights.iter().any(|&w| w < 0.0 || !w.is_finite()) {
        return Err(CalibrationError::EmptyDistribution(name));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(CalibrationError::EmptyDistribution(name));
    }
    let mean = weights
        .iter()
        .enumerate()
        .map(|(extra, &w)| extra as f64 * w)
        .sum::<f64>()
        / total;
    Ok(mean / (1.0 + mean))
}

/// Parameters derived from a calibrated [`MachineErrorParams`].
#[derive(Debug, Clone)]
pub struct RealignParamsImplementation {
    machine: MachineType,
    match_ln: f64,
    mismatch_ln: f64,
    insert_open_ln: f64,
    insert_extend_ln: f64,
    delete_open_ln: f64,
    delete_extend_ln: f64,
    gaps: GapTables,
}

impl RealignParamsImplementation {
    /// Derive parameters, validating every rate and distribution.
    pub fn new(profile: &MachineErrorParams) -> Result<Self, CalibrationError> {
        let mismatch_ln = rate_ln("mismatch", profile.mismatch_rate)?;
        let insert_open_ln = rate_ln("insert open", profile.insert_open_rate)?;
        let delete_open_ln = rate_ln("delete open", profile.delete_open_rate)?;
        let open_total = profile.insert_open_rate + profile.delete_open_rate;
        if open_total >= 1.0 {
            return Err(CalibrationError::InvalidRate {
                name: "insert open + delete open",
                value: open_total,
            });
        }
        let insert_extend = mean_decay_extend("insert length", &profile.insert_lengths)?;
        let delete_extend = mean_decay_extend("delete length", &profile.delete_lengths)?;

        let mut gaps = GapTables::default();
        if profile.machine.is_cg() {
            for gap in &profile.gaps {
                gaps.insert(gap)?;
            }
            if let Some(missing) = GapCategory::ALL.into_iter().find(|&c| !gaps.contains(c)) {
                return Err(CalibrationError::MissingGapDistribution(missing));
            }
        }

        Ok(Self {
            machine: profile.machine,
            match_ln: (-profile.mismatch_rate).ln_1p(),
            mismatch_ln,
            insert_open_ln,
            insert_extend_ln: insert_extend.ln(),
            delete_open_ln,
            delete_extend_ln: delete_extend.ln(),
            gaps,
        })
    }
}

impl RealignParams for RealignParamsImplementation {
    fn match_ln(&self) -> f64 {
        self.match_ln
    }

    fn mismatch_ln(&self) -> f64 {
        self.mismatch_ln
    }

    fn insert_open_ln(&self) -> f64 {
        self.insert_open_ln
    }

    fn insert_extend_ln(&self) -> f64 {
        self.insert_extend_ln
    }

    fn delete_open_ln(&self) -> f64 {
        self.delete_open_ln
    }

    fn delete_extend_ln(&self) -> f64 {
        self.delete_extend_ln
    }

    fn machine_type(&self) -> MachineType {
        self.machine
    }

    fn gap_start(&self, category: GapCategory) -> Result<i32, RealignError> {
        self.gaps.start(category, self.machine)
    }

    fn gap_end(&self, category: GapCategory) -> Result<i32, RealignError> {
        self.gaps.end(category, self.machine)
    }

    fn gap_freq_ln(&self, category: GapCategory, length: i32) -> Result<f64, RealignError> {
        self.gaps.freq_ln(category, length, self.machine)
    }
}
