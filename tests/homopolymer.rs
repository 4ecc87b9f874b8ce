mod common;

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use realign::environment::{EnvironmentImplementation, HomopolymerEnvironment};
use realign::matrix::{AllPaths, ScoreFastUnderflowHomopolymer, ScoreMatrix, ScoreMatrixHomopolymer};
use realign::params::{CalibrationError, HomopolymerParams};
use realign::{LogApproximatePossibility, LogPossibility};
use test_case::test_case;

use common::params;

const PLAIN_LN: f64 = -3.940558672;

fn env() -> EnvironmentImplementation {
    // template run of five T, read run of four
    EnvironmentImplementation::from_strs(2, "ACGTTTTTACG", 0, "ACGTTTTACG", 0.01).unwrap()
}

fn score(table: HomopolymerParams) -> f64 {
    let mut matrix = ScoreMatrixHomopolymer::<LogPossibility>::new(&params(), Arc::new(table));
    matrix.set_env(&env()).unwrap();
    matrix.total_score_ln()
}

#[test_case("TA\t5\t0\t0\t0\t3\t7\n", false, -3.316543621; "shortened run at 0.3")]
#[test_case("TA\t5\t0\t0\t0\t9\t1\n", false, -2.292577090; "shortened run at 0.9")]
#[test_case("AT\t5\t0\t0\t0\t3\t7\n", true, -3.316543621; "complement tag")]
#[test_case("AT\t5\t0\t0\t0\t3\t7\n", false, PLAIN_LN; "other base untouched")]
#[test_case("TA\t4\t0\t0\t0\t9\t1\n", false, PLAIN_LN; "other template length untouched")]
fn calibrated_totals(counts: &str, complement: bool, expected: f64) {
    let table = HomopolymerParams::parse_str(counts, complement).unwrap();
    assert_abs_diff_eq!(score(table), expected, epsilon = 1e-8);
}

#[test]
fn empty_table_is_plain_matrix() {
    let mut plain = ScoreMatrix::<LogPossibility>::new(&params());
    plain.set_env(&env()).unwrap();
    let empty = Arc::new(HomopolymerParams::empty());
    let mut hp = ScoreMatrixHomopolymer::<LogPossibility>::new(&params(), empty);
    hp.set_env(&env()).unwrap();
    assert_eq!(hp.to_string(), plain.to_string());
    assert_abs_diff_eq!(plain.total_score_ln(), PLAIN_LN, epsilon = 1e-8);
}

#[test]
fn approximate_domain_within_tolerance() {
    let table = Arc::new(HomopolymerParams::parse_str("TA\t5\t0\t0\t0\t3\t7\n", false).unwrap());
    let mut matrix = ScoreMatrixHomopolymer::<LogApproximatePossibility>::new(&params(), table);
    matrix.set_env(&env()).unwrap();
    assert_abs_diff_eq!(
        matrix.total_score_ln(),
        -3.316543621,
        epsilon = realign::arithmetic::APPROXIMATE_TOLERANCE
    );
}

#[test]
fn fast_wrapper_shares_calibration() {
    let table = Arc::new(HomopolymerParams::parse_str("TA\t5\t0\t0\t0\t3\t7\n", false).unwrap());
    let mut fast = ScoreFastUnderflowHomopolymer::new(&params(), table);
    fast.set_env(&env()).unwrap();
    assert!(!fast.underflow());
    assert_abs_diff_eq!(fast.total_score_ln(), -3.316543621, epsilon = 1e-8);
}

#[test]
fn calibration_file_round_trip_through_disk() {
    let path = std::env::temp_dir().join(format!("realign-hp-{}.tsv", std::process::id()));
    std::fs::write(&path, "# base tl counts\nTA\t5\t0\t0\t0\t3\t7\n").unwrap();
    let table = HomopolymerParams::from_path(&path, false).unwrap();
    std::fs::remove_file(&path).ok();
    assert_abs_diff_eq!(score(table), -3.316543621, epsilon = 1e-8);
}

#[test]
fn missing_file_reports_io_error() {
    let err = HomopolymerParams::from_path("/nonexistent/realign/counts.tsv", false).unwrap_err();
    assert!(matches!(err, CalibrationError::Io(_)));
}

#[test]
fn environment_runs_for_scenario() {
    let env = env();
    let hp = HomopolymerEnvironment::new(&env);
    assert_eq!(hp.read_end(6), 4);
    assert_eq!(hp.read_start(3), 4);
    assert_eq!(hp.template_end(7), 5);
    assert_eq!(hp.template_start(3), 5);
    assert_eq!(hp.template_end(6), 0);
}
