mod common;

use proptest::prelude::*;
use realign::environment::EnvironmentImplementation;
use realign::matrix::{AllPaths, DeltaMatrix, ScoreMatrix};
use realign::{LogPossibility, SimplePossibility};

use common::{assert_snapshot, params};

fn delta(template: &str, start: isize, read: &str, shift: usize) -> DeltaMatrix<LogPossibility> {
    let env = EnvironmentImplementation::from_strs(shift, template, start, read, 0.01).unwrap();
    let mut matrix = DeltaMatrix::new(&params());
    matrix.set_env(&env).unwrap();
    matrix
}

#[test]
fn terse_exact_match() {
    let matrix = delta("GGACGTACGTTT", 2, "ACGCGACG", 2);
    assert_snapshot("delta_terse_exact.txt", &matrix.render_terse());
}

#[test]
fn terse_shows_deletion() {
    // read skips the A between ACGT and CGGATC
    let matrix = delta("TTACGTACGGATCCA", 1, "ACGTCGGATC", 3);
    assert_snapshot("delta_terse_deletion.txt", &matrix.render_terse());
}

#[test]
fn forward_side_is_the_score_matrix() {
    let env = EnvironmentImplementation::from_strs(2, "GGACGTACGTTT", 2, "ACGCGACG", 0.01).unwrap();
    let mut matrix = DeltaMatrix::<LogPossibility>::new(&params());
    matrix.set_env(&env).unwrap();
    let mut plain = ScoreMatrix::<LogPossibility>::new(&params());
    plain.set_env(&env).unwrap();
    assert_eq!(matrix.total_score_ln(), plain.total_score_ln());
    assert_eq!(matrix.forward().to_string(), plain.to_string());
}

#[test]
fn reuse_counts_both_passes_once() {
    let mut matrix = DeltaMatrix::<SimplePossibility>::new(&params());
    for read in ["ACGCGACG", "ACGTACGT", "TTTACGCG"] {
        let env = EnvironmentImplementation::from_strs(2, "GGACGTACGTTT", 2, read, 0.01).unwrap();
        matrix.set_env(&env).unwrap();
    }
    assert_eq!(matrix.allocations(), 2);
}

fn scenario() -> impl Strategy<Value = (String, String, usize)> {
    let base = || prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')];
    (1usize..=10, 0usize..=3).prop_flat_map(move |(len, shift)| {
        (
            proptest::collection::vec(base(), len + 2 * shift + 2),
            proptest::collection::vec(base(), len),
            Just(shift),
        )
            .prop_map(|(t, r, s)| {
                (t.into_iter().collect::<String>(), r.into_iter().collect::<String>(), s)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn posterior_rows_are_normalised((template, read, shift) in scenario()) {
        let matrix = delta(&template, 0, &read, shift);
        let w = matrix.width();
        let first: f64 =
            (0..w).map(|j| matrix.posterior_match(0, j) + matrix.posterior_delete(0, j)).sum();
        prop_assert!((first - 1.0).abs() < 1e-9, "row 0 sums to {}", first);
        for row in 1..=matrix.length() {
            let sum: f64 = (0..w)
                .map(|j| matrix.posterior_match(row, j) + matrix.posterior_insert(row, j))
                .sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", row, sum);
            for j in 0..w {
                let cells = [
                    matrix.posterior_match(row, j),
                    matrix.posterior_insert(row, j),
                    matrix.posterior_delete(row, j),
                ];
                for p in cells {
                    prop_assert!((-1e-12..=1.0 + 1e-9).contains(&p));
                }
            }
        }
    }
}
