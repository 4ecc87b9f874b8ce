//! Read/template alignment windows.
//!
//! An [`Environment`] describes one candidate alignment: the read bases with
//! their error probabilities, and the template addressed relative to where
//! read position 0 would land under zero drift. Template offsets outside the
//! physical template read as [`dna::N`].
//!
//! Variants wrap an existing environment by value (or by reference, through
//! the blanket impls) and override only what they change.

mod cg;
mod combined;
mod homopolymer;
mod implementation;
mod inverted;
mod read;
mod subread;
mod substitution;
mod template;

pub use cg::CgInvertedEnvironment;
pub use combined::EnvironmentCombined;
pub use homopolymer::HomopolymerEnvironment;
pub use implementation::EnvironmentImplementation;
pub use inverted::InvertedEnvironment;
pub use read::{EnvironmentRead, ReadEnvironment};
pub use subread::SubreadEnvironment;
pub use substitution::{GenomeSubstitution, SnpSubstitutionEnvironment};
pub use template::{EnvironmentTemplate, TemplateEnvironment};

use thiserror::Error;

use crate::dna;

/// Errors raised while constructing an environment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvironmentError {
    /// Base and quality strings disagree in length
    #[error("read has {bases} bases but {qualities} quality values")]
    QualityLengthMismatch {
        /// Number of bases
        bases: usize,
        /// Number of quality values
        qualities: usize,
    },

    /// Character outside the nucleotide alphabet
    #[error("unsupported nucleotide '{base}' at position {offset}")]
    InvalidBase {
        /// Offending character
        base: char,
        /// Position in the input sequence
        offset: usize,
    },

    /// Subread interval outside the read
    #[error("subread [{start}, {end}) is not within a read of length {length}")]
    InvalidSubread {
        /// Interval start
        start: usize,
        /// Interval end (exclusive)
        end: usize,
        /// Underlying read length
        length: usize,
    },

    /// Replacement interval outside the template
    #[error("substitution [{start}, {end}) is not within a template of length {length}")]
    InvalidSubstitution {
        /// Interval start
        start: usize,
        /// Interval end (exclusive)
        end: usize,
        /// Template length
        length: usize,
    },

    /// Template position outside the template
    #[error("template position {position} outside template of length {length}")]
    PositionOutOfRange {
        /// Requested absolute position
        position: isize,
        /// Template length
        length: usize,
    },

    /// CG read layout failed a sanity check
    #[error("invalid CG read layout: {0}")]
    InvalidCgLayout(String),

    /// Error probability outside `[0, 1)`
    #[error("quality {value} at position {offset} is not an error probability in [0, 1)")]
    InvalidQuality {
        /// Position in the read
        offset: usize,
        /// Offending value
        value: f64,
    },
}

/// Reject error probabilities that are NaN, infinite or outside `[0, 1)`.
pub(crate) fn check_quality(quality: &[f64]) -> Result<(), EnvironmentError> {
    match quality.iter().position(|q| !(0.0..1.0).contains(q)) {
        Some(offset) => Err(EnvironmentError::InvalidQuality {
            offset,
            value: quality[offset],
        }),
        None => Ok(()),
    }
}

/// A read aligned against a band of template.
pub trait Environment {
    /// Half-width of the band of template offsets considered per read base.
    fn max_shift(&self) -> usize;

    /// Number of read bases.
    fn read_length(&self) -> usize;

    /// Length of the physical template the window is drawn from.
    fn template_length(&self) -> usize;

    /// Absolute template coordinate of a window-relative template offset.
    fn absolute_template_position(&self, index: isize) -> isize;

    /// Encoded template base at a window-relative offset (`N` outside).
    fn template(&self, index: isize) -> u8;

    /// Encoded read base.
    fn read(&self, index: usize) -> u8;

    /// Probability that the read base at `index` is a sequencing error.
    fn quality(&self, index: usize) -> f64;
}

impl<E: Environment + ?Sized> Environment for &E {
    fn max_shift(&self) -> usize {
        (**self).max_shift()
    }

    fn read_length(&self) -> usize {
        (**self).read_length()
    }

    fn template_length(&self) -> usize {
        (**self).template_length()
    }

    fn absolute_template_position(&self, index: isize) -> isize {
        (**self).absolute_template_position(index)
    }

    fn template(&self, index: isize) -> u8 {
        (**self).template(index)
    }

    fn read(&self, index: usize) -> u8 {
        (**self).read(index)
    }

    fn quality(&self, index: usize) -> f64 {
        (**self).quality(index)
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn max_shift(&self) -> usize {
        (**self).max_shift()
    }

    fn read_length(&self) -> usize {
        (**self).read_length()
    }

    fn template_length(&self) -> usize {
        (**self).template_length()
    }

    fn absolute_template_position(&self, index: isize) -> isize {
        (**self).absolute_template_position(index)
    }

    fn template(&self, index: isize) -> u8 {
        (**self).template(index)
    }

    fn read(&self, index: usize) -> u8 {
        (**self).read(index)
    }

    fn quality(&self, index: usize) -> f64 {
        (**self).quality(index)
    }
}

/// Render the read and the template under it (zero drift) for diagnostics.
pub fn describe<E: Environment + ?Sized>(env: &E) -> String {
    let n = env.read_length();
    let shift = env.max_shift() as isize;
    let template: String = (-shift..n as isize + shift)
        .map(|k| dna::decode(env.template(k)))
        .collect();
    let read: String = (0..n).map(|i| dna::decode(env.read(i))).collect();
    format!(
        "template {} [{}..]\nread     {}{}",
        template,
        env.absolute_template_position(-shift),
        " ".repeat(shift as usize),
        read
    )
}
