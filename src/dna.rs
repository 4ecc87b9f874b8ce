//! Nucleotide encoding used throughout the realignment engine.
//!
//! Bases are stored as small integer codes with `N` at zero, so that an
//! unknown base is also the default value of a `u8`.

use crate::environment::EnvironmentError;

/// Unknown or ambiguous base.
pub const N: u8 = 0;
/// Adenine.
pub const A: u8 = 1;
/// Cytosine.
pub const C: u8 = 2;
/// Guanine.
pub const G: u8 = 3;
/// Thymine.
pub const T: u8 = 4;

/// Number of distinct codes including `N`.
pub const ALPHABET_SIZE: usize = 5;

const LETTERS: [char; ALPHABET_SIZE] = ['N', 'A', 'C', 'G', 'T'];

/// Attempt to encode an ASCII base.
pub fn encode(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(A),
        b'C' | b'c' => Some(C),
        b'G' | b'g' => Some(G),
        b'T' | b't' | b'U' | b'u' => Some(T),
        b'N' | b'n' => Some(N),
        _ => None,
    }
}

/// Encode a sequence, mapping anything unrecognised to `N`.
pub fn encode_lenient(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().map(|&b| encode(b).unwrap_or(N)).collect()
}

/// Encode a sequence, rejecting characters outside `ACGTUN`.
pub fn encode_strict(sequence: &[u8]) -> Result<Vec<u8>, EnvironmentError> {
    sequence
        .iter()
        .enumerate()
        .map(|(offset, &b)| {
            encode(b).ok_or(EnvironmentError::InvalidBase {
                base: b as char,
                offset,
            })
        })
        .collect()
}

/// Decode a base code to its letter (`N` for anything out of range).
#[inline]
pub fn decode(code: u8) -> char {
    LETTERS.get(code as usize).copied().unwrap_or('N')
}

/// Decode a slice of codes.
pub fn decode_all(codes: &[u8]) -> String {
    codes.iter().map(|&c| decode(c)).collect()
}

/// Watson-Crick complement of a code; `N` maps to itself.
#[inline]
pub fn complement(code: u8) -> u8 {
    match code {
        A => T,
        C => G,
        G => C,
        T => A,
        _ => N,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        assert_eq!(encode_lenient(b"ACGTN"), vec![A, C, G, T, N]);
        assert_eq!(decode_all(&[A, C, G, T, N]), "ACGTN");
        assert_eq!(encode(b'u'), Some(T));
        assert_eq!(encode(b'-'), None);
        assert_eq!(encode_lenient(b"R"), vec![N]);
    }

    #[test]
    fn test_strict_reports_offset() {
        let err = encode_strict(b"ACXG").unwrap_err();
        assert!(matches!(err, EnvironmentError::InvalidBase { base: 'X', offset: 2 }));
    }

    #[test]
    fn test_complement_is_involution() {
        for code in [N, A, C, G, T] {
            assert_eq!(complement(complement(code)), code);
        }
        assert_eq!(complement(A), T);
        assert_eq!(complement(G), C);
    }
}
