use proptest::prelude::*;
use realign::dna;
use realign::environment::{
    CgInvertedEnvironment, Environment, EnvironmentCombined, EnvironmentImplementation,
    EnvironmentTemplate, GenomeSubstitution, InvertedEnvironment, ReadEnvironment,
    SnpSubstitutionEnvironment, SubreadEnvironment, TemplateEnvironment,
};
use test_case::test_case;

fn bases(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    let base = prop_oneof![Just(dna::A), Just(dna::C), Just(dna::G), Just(dna::T)];
    proptest::collection::vec(base, range)
}

fn env_strategy() -> impl Strategy<Value = EnvironmentImplementation> {
    (bases(1..40), bases(1..20), -5isize..10, 0usize..6).prop_map(
        |(template, read, start, shift)| {
            let quality = (0..read.len()).map(|i| 0.001 * (i + 1) as f64).collect();
            EnvironmentImplementation::new(shift, template, start, read, quality)
                .expect("lengths agree")
        },
    )
}

proptest! {
    #[test]
    fn splice_matches_concatenation(
        original in bases(0..40),
        replacement in bases(0..12),
        a in 0usize..40,
        b in 0usize..40,
    ) {
        let (start, end) = (a.min(b).min(original.len()), a.max(b).min(original.len()));
        let template = TemplateEnvironment::new(original.clone());
        let spliced = GenomeSubstitution::new(&template, start, end, &replacement).unwrap();

        let mut expected = original[..start].to_vec();
        expected.extend_from_slice(&replacement);
        expected.extend_from_slice(&original[end..]);

        prop_assert_eq!(spliced.template_length(), expected.len());
        for (k, &base) in expected.iter().enumerate() {
            prop_assert_eq!(spliced.template_at(k as isize), base);
        }
        prop_assert_eq!(spliced.template_at(-1), dna::N);
        prop_assert_eq!(spliced.template_at(expected.len() as isize), dna::N);
    }

    #[test]
    fn double_inversion_is_identity(env in env_strategy(), pivot in -10isize..30) {
        let twice =
            InvertedEnvironment::with_pivot(InvertedEnvironment::with_pivot(&env, pivot), pivot);
        for i in 0..env.read_length() {
            prop_assert_eq!(twice.read(i), env.read(i));
            prop_assert_eq!(twice.quality(i), env.quality(i));
        }
        for k in -8..48 {
            prop_assert_eq!(twice.template(k), env.template(k));
            prop_assert_eq!(twice.absolute_template_position(k), env.absolute_template_position(k));
        }
    }

    #[test]
    fn subread_views_are_windows(env in env_strategy(), a in 0usize..20, b in 0usize..20) {
        let n = env.read_length();
        let (start, end) = (a.min(b).min(n), a.max(b).min(n));
        let sub = SubreadEnvironment::new(&env, start, end).unwrap();
        prop_assert_eq!(sub.read_length(), end - start);
        for i in 0..sub.read_length() {
            prop_assert_eq!(sub.read(i), env.read(i + start));
            prop_assert_eq!(sub.template(i as isize), env.template((i + start) as isize));
        }
    }

    #[test]
    fn snp_touches_one_position(env in env_strategy(), position in 0isize..40, base in 1u8..=4) {
        prop_assume!((position as usize) < env.template_length());
        let snp = SnpSubstitutionEnvironment::new(&env, position, base).unwrap();
        for k in -20..60 {
            if env.absolute_template_position(k) == position {
                prop_assert_eq!(snp.template(k), base);
            } else {
                prop_assert_eq!(snp.template(k), env.template(k));
            }
        }
    }

    #[test]
    fn cg_inversion_rotates_read(env in env_strategy(), rp in 1usize..20, delta in -6isize..6) {
        let n = env.read_length();
        prop_assume!(rp < n);
        prop_assume!(delta.unsigned_abs() <= env.template_length());
        let cg = CgInvertedEnvironment::new(&env, rp, delta).unwrap();
        for i in 0..n {
            prop_assert_eq!(cg.read(i), env.read((i + rp) % n));
        }
        let split = cg.split() as isize;
        for k in -5..split {
            prop_assert_eq!(cg.template(k), env.template(k));
        }
        for k in split..split + 20 {
            prop_assert_eq!(cg.template(k), env.template(k + delta));
        }
    }
}

#[test]
fn combined_matches_implementation_layout() {
    let read = ReadEnvironment::new(dna::encode_lenient(b"ACGT"), vec![0.01; 4]).unwrap();
    let template = TemplateEnvironment::from_sequence("TTACGTAA").unwrap();
    let combined = EnvironmentCombined::new(read, 2, 1, template);
    let implementation =
        EnvironmentImplementation::from_strs(1, "TTACGTAA", 2, "ACGT", 0.01).unwrap();
    for k in -4..10 {
        assert_eq!(combined.template(k), implementation.template(k));
        assert_eq!(
            combined.absolute_template_position(k),
            implementation.absolute_template_position(k)
        );
    }
    assert_eq!(combined.read_length(), 4);
}

#[test]
fn cg_inversion_rejects_bad_layouts() {
    let env = EnvironmentImplementation::from_strs(1, "ACGTACGT", 0, "ACGT", 0.01).unwrap();
    assert!(CgInvertedEnvironment::new(&env, 0, 0).is_err());
    assert!(CgInvertedEnvironment::new(&env, 4, 0).is_err());
    assert!(CgInvertedEnvironment::new(&env, 2, 9).is_err());
    let err = CgInvertedEnvironment::new(&env, 4, 0).unwrap_err();
    assert!(err.to_string().contains("replace position 4"));
}

#[test_case(2, 5, "", "ACTT"; "empty replacement")]
#[test_case(2, 5, "G", "ACGTT"; "shorter replacement")]
#[test_case(2, 4, "GGGG", "ACGGGGATT"; "longer replacement")]
#[test_case(2, 4, "TT", "ACTTATT"; "equal length replacement")]
#[test_case(0, 2, "TTT", "TTTGCATT"; "splice at left edge")]
#[test_case(5, 7, "CC", "ACGCACC"; "splice at right edge")]
#[test_case(7, 7, "G", "ACGCATTG"; "append past last base")]
fn splice_edges(start: usize, end: usize, replacement: &str, expected: &str) {
    let template = TemplateEnvironment::from_sequence("ACGCATT").unwrap();
    let replacement = dna::encode_lenient(replacement.as_bytes());
    let spliced = GenomeSubstitution::new(&template, start, end, &replacement).unwrap();
    assert_eq!(spliced.subsequence_length(), 7 - (end - start) + replacement.len());
    let bases: Vec<u8> =
        (0..spliced.template_length() as isize).map(|k| spliced.template_at(k)).collect();
    assert_eq!(dna::decode_all(&bases), expected);
    assert_eq!(spliced.template_at(-1), dna::N);
    assert_eq!(spliced.template_at(expected.len() as isize), dna::N);
}
