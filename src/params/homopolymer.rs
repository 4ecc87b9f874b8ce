use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::CalibrationError;
use crate::dna;

/// Homopolymer run-length calibration.
///
/// Holds `P(read run length | base, template run length)` estimated from
/// counts of the form
///
/// ```text
/// # tag  template-length  count(read length 1)  count(read length 2) ...
/// AT     3                2                     10                     950
/// ```
///
/// The tag names a base followed by its complement. In complement mode the
/// counts are attributed to the second letter, giving the table for reads
/// on the opposite strand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomopolymerParams {
    probabilities: HashMap<(u8, usize), Vec<f64>>,
    complement: bool,
}

impl HomopolymerParams {
    /// Table with no observations; every lookup falls through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse counts from a reader.
    pub fn parse<R: BufRead>(reader: R, complement: bool) -> Result<Self, CalibrationError> {
        let mut counts: HashMap<(u8, usize), Vec<f64>> = HashMap::new();
        let mut lines = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            lines += 1;

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 2 {
                return Err(CalibrationError::MalformedLine {
                    line_number,
                    line: line.clone(),
                });
            }
            let (forward, reverse) = match fields[0] {
                "AT" => (dna::A, dna::T),
                "CG" => (dna::C, dna::G),
                "GC" => (dna::G, dna::C),
                "TA" => (dna::T, dna::A),
                _ => {
                    return Err(CalibrationError::UnknownTag {
                        line_number,
                        line: line.clone(),
                    })
                }
            };
            let base = if complement { reverse } else { forward };

            let invalid = || CalibrationError::InvalidCount {
                line_number,
                line: line.clone(),
            };
            let template_length: usize = fields[1].parse().map_err(|_| invalid())?;
            if template_length == 0 {
                return Err(invalid());
            }
            let entry = counts.entry((base, template_length)).or_default();
            for (k, field) in fields[2..].iter().enumerate() {
                let count: f64 = field.parse().map_err(|_| invalid())?;
                if !count.is_finite() || count < 0.0 {
                    return Err(invalid());
                }
                if entry.len() <= k {
                    entry.resize(k + 1, 0.0);
                }
                entry[k] += count;
            }
        }

        let probabilities: HashMap<(u8, usize), Vec<f64>> = counts
            .into_iter()
            .filter_map(|(key, row)| {
                let total: f64 = row.iter().sum();
                (total > 0.0).then(|| (key, row.iter().map(|c| c / total).collect()))
            })
            .collect();
        debug!(
            lines,
            entries = probabilities.len(),
            complement,
            "loaded homopolymer calibration"
        );
        Ok(Self {
            probabilities,
            complement,
        })
    }

    /// Parse counts from text.
    pub fn parse_str(text: &str, complement: bool) -> Result<Self, CalibrationError> {
        Self::parse(text.as_bytes(), complement)
    }

    /// Parse counts from a file.
    pub fn from_path(path: impl AsRef<Path>, complement: bool) -> Result<Self, CalibrationError> {
        let file = File::open(path.as_ref())?;
        Self::parse(BufReader::new(file), complement)
    }

    /// Whether no run combination has any observations.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Number of `(base, template length)` rows with observations.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether counts were attributed to the complement base.
    pub fn is_complement(&self) -> bool {
        self.complement
    }

    /// Probability of reading `read_length` copies of `base` from a template
    /// run of `template_length`; `None` when nothing was observed.
    pub fn transition(&self, base: u8, template_length: usize, read_length: usize) -> Option<f64> {
        if read_length == 0 {
            return None;
        }
        self.probabilities
            .get(&(base, template_length))
            .and_then(|row| row.get(read_length - 1).copied())
            .filter(|&p| p > 0.0)
    }

    /// Largest template run length with observations for `base`.
    pub fn max_template_length(&self, base: u8) -> Option<usize> {
        self.probabilities
            .keys()
            .filter(|(b, _)| *b == base)
            .map(|&(_, tl)| tl)
            .max()
    }
}
