use super::{CalibrationError, GapCategory, GapDistribution, GapTables, MachineType, RealignParams};
use crate::RealignError;

/// Parameters given directly as probabilities and literal gap tables.
#[derive(Debug, Clone)]
pub struct LiteralRealignParams {
    machine: MachineType,
    mismatch: f64,
    insert_open: f64,
    insert_extend: f64,
    delete_open: f64,
    delete_extend: f64,
    gaps: GapTables,
}

impl LiteralRealignParams {
    /// Literal probabilities with no gap tables.
    ///
    /// Values are taken as-is; callers are trusted to pass probabilities.
    pub fn new(
        machine: MachineType,
        mismatch: f64,
        insert_open: f64,
        insert_extend: f64,
        delete_open: f64,
        delete_extend: f64,
    ) -> Self {
        debug_assert!(insert_open + delete_open < 1.0);
        Self {
            machine,
            mismatch,
            insert_open,
            insert_extend,
            delete_open,
            delete_extend,
            gaps: GapTables::default(),
        }
    }

    /// Add (or replace) the gap table for a category; frequencies are
    /// normalised and must carry positive mass.
    pub fn with_gap(
        mut self,
        category: GapCategory,
        start: i32,
        frequencies: &[f64],
    ) -> Result<Self, CalibrationError> {
        let distribution = GapDistribution::new(category, start, frequencies.to_vec());
        self.gaps.insert(&distribution)?;
        Ok(self)
    }

    /// First-generation Complete Genomics tables.
    pub fn cg_v1() -> Result<Self, CalibrationError> {
        Self::new(MachineType::CompleteGenomics, 0.01, 0.001, 0.2, 0.001, 0.2)
            .with_gap(GapCategory::Overlap, -4, &[0.02, 0.08, 0.80, 0.09, 0.01])?
            .with_gap(GapCategory::Small, 0, &[0.90, 0.08, 0.02])?
            .with_gap(GapCategory::Large, 4, &[0.02, 0.25, 0.55, 0.15, 0.03])
    }

    /// Second-generation Complete Genomics tables.
    pub fn cg_v2() -> Result<Self, CalibrationError> {
        Self::new(MachineType::CompleteGenomics2, 0.01, 0.001, 0.2, 0.001, 0.2)
            .with_gap(GapCategory::Overlap, -4, &[0.01, 0.04, 0.85, 0.09, 0.01])?
            .with_gap(GapCategory::Small, 0, &[0.95, 0.04, 0.01])?
            .with_gap(GapCategory::Large, 4, &[0.01, 0.20, 0.65, 0.12, 0.02])
    }
}

impl RealignParams for LiteralRealignParams {
    fn match_ln(&self) -> f64 {
        (-self.mismatch).ln_1p()
    }

    fn mismatch_ln(&self) -> f64 {
        self.mismatch.ln()
    }

    fn insert_open_ln(&self) -> f64 {
        self.insert_open.ln()
    }

    fn insert_extend_ln(&self) -> f64 {
        self.insert_extend.ln()
    }

    fn delete_open_ln(&self) -> f64 {
        self.delete_open.ln()
    }

    fn delete_extend_ln(&self) -> f64 {
        self.delete_extend.ln()
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
