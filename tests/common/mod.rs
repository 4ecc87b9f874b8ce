#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use realign::environment::EnvironmentImplementation;
use realign::params::{GapCategory, LiteralRealignParams, MachineType};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("REALIGN_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set REALIGN_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path, expected, actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

/// Error model used by the reference scenarios.
pub fn params() -> LiteralRealignParams {
    LiteralRealignParams::new(MachineType::IlluminaPe, 0.02, 0.003, 0.25, 0.05, 0.2)
}

/// Same rates with the first-generation gap tables.
pub fn cg_params() -> LiteralRealignParams {
    LiteralRealignParams::new(MachineType::CompleteGenomics, 0.02, 0.003, 0.25, 0.05, 0.2)
        .with_gap(GapCategory::Overlap, -4, &[0.02, 0.08, 0.80, 0.09, 0.01])
        .and_then(|p| p.with_gap(GapCategory::Small, 0, &[0.90, 0.08, 0.02]))
        .and_then(|p| p.with_gap(GapCategory::Large, 4, &[0.02, 0.25, 0.55, 0.15, 0.03]))
        .expect("gap tables carry mass")
}

pub const CG_TEMPLATE: &str = "GCTAAAGACAATTACATAACATACACGTCAGCACGAAACTTGTTGGCCCAGTGTGAATCG";
pub const CG_READ: &str = "AGACACAATTACATAACATACACGTGAAACTTGTT";

/// 35-base gapped read placed with overlap -2, small gap 0, large gap 6.
pub fn cg_env() -> EnvironmentImplementation {
    EnvironmentImplementation::from_strs(3, CG_TEMPLATE, 5, CG_READ, 0.01)
        .expect("valid CG environment")
}

/// Eight-base read with two low-quality leading bases.
pub fn mixed_quality_env() -> EnvironmentImplementation {
    let mut quality = vec![0.01; 8];
    quality[0] = 0.1;
    quality[1] = 10f64.powf(-1.5);
    EnvironmentImplementation::new(
        2,
        realign::dna::encode_lenient(b"GGACGTACGTTT"),
        2,
        realign::dna::encode_lenient(b"ACGCGACG"),
        quality,
    )
    .expect("valid environment")
}

pub fn random_sequence(len: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            b"ACGT"[(state >> 33) as usize % 4] as char
        })
        .collect()
}
