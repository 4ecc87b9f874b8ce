use std::sync::Arc;

use super::EnvironmentError;
use crate::dna;

/// Template side of an environment, addressed by absolute position.
pub trait EnvironmentTemplate {
    /// Number of positions in the (possibly spliced) template.
    fn template_length(&self) -> usize;

    /// Encoded base at an absolute position; `N` outside `[0, template_length)`.
    fn template_at(&self, position: isize) -> u8;
}

/// Plain template over a shared encoded sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateEnvironment {
    bases: Arc<[u8]>,
}

impl TemplateEnvironment {
    /// Wrap encoded bases.
    pub fn new(bases: impl Into<Arc<[u8]>>) -> Self {
        Self { bases: bases.into() }
    }

    /// Encode an ASCII sequence.
    pub fn from_sequence(sequence: &str) -> Result<Self, EnvironmentError> {
        Ok(Self::new(dna::encode_strict(sequence.as_bytes())?))
    }
}

impl EnvironmentTemplate for TemplateEnvironment {
    fn template_length(&self) -> usize {
        self.bases.len()
    }

    #[inline]
    fn template_at(&self, position: isize) -> u8 {
        if position < 0 {
            return dna::N;
        }
        self.bases.get(position as usize).copied().unwrap_or(dna::N)
    }
}

impl<T: EnvironmentTemplate + ?Sized> EnvironmentTemplate for &T {
    fn template_length(&self) -> usize {
        (**self).template_length()
    }

    fn template_at(&self, position: isize) -> u8 {
        (**self).template_at(position)
    }
}
