use super::{MachineType, RealignParams};

const MISMATCH: f64 = 0.002;
const INDEL_OPEN: f64 = 0.0002;
const INDEL_EXTEND: f64 = 0.3;

/// Fixed whole-genome default for reads of unknown provenance.
#[derive(Debug, Clone, Copy)]
pub struct RealignParamsGenome {
    machine: MachineType,
}

impl RealignParamsGenome {
    /// Default parameters, reported as paired-end Illumina.
    pub fn new() -> Self {
        Self {
            machine: MachineType::IlluminaPe,
        }
    }

    /// Default parameters reported as a different (ungapped) machine.
    pub fn for_machine(machine: MachineType) -> Self {
        Self { machine }
    }
}

impl Default for RealignParamsGenome {
    fn default() -> Self {
        Self::new()
    }
}

impl RealignParams for RealignParamsGenome {
    fn match_ln(&self) -> f64 {
        (-MISMATCH).ln_1p()
    }

    fn mismatch_ln(&self) -> f64 {
        MISMATCH.ln()
    }

    fn insert_open_ln(&self) -> f64 {
        INDEL_OPEN.ln()
    }

    fn insert_extend_ln(&self) -> f64 {
        INDEL_EXTEND.ln()
    }

    fn delete_open_ln(&self) -> f64 {
        INDEL_OPEN.ln()
    }

    fn delete_extend_ln(&self) -> f64 {
        INDEL_EXTEND.ln()
    }

    fn machine_type(&self) -> MachineType {
        self.machine
    }
}
