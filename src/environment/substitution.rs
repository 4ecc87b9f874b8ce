use super::{Environment, EnvironmentError, EnvironmentTemplate};

/// Environment with exactly one template base replaced.
///
/// Used to score a single-nucleotide hypothesis against the same read
/// window as the reference.
#[derive(Debug, Clone)]
pub struct SnpSubstitutionEnvironment<E> {
    inner: E,
    position: isize,
    base: u8,
}

impl<E: Environment> SnpSubstitutionEnvironment<E> {
    /// Replace the base at absolute template `position` with `base`.
    pub fn new(inner: E, position: isize, base: u8) -> Result<Self, EnvironmentError> {
        let length = inner.template_length();
        if position < 0 || position as usize >= length {
            return Err(EnvironmentError::PositionOutOfRange { position, length });
        }
        Ok(Self {
            inner,
            position,
            base,
        })
    }

    /// Absolute template position that was replaced.
    pub fn position(&self) -> isize {
        self.position
    }
}

impl<E: Environment> Environment for SnpSubstitutionEnvironment<E> {
    fn max_shift(&self) -> usize {
        self.inner.max_shift()
    }

    fn read_length(&self) -> usize {
        self.inner.read_length()
    }

    fn template_length(&self) -> usize {
        self.inner.template_length()
    }

    fn absolute_template_position(&self, index: isize) -> isize {
        self.inner.absolute_template_position(index)
    }

    #[inline]
    fn template(&self, index: isize) -> u8 {
        if self.inner.absolute_template_position(index) == self.position {
            self.base
        } else {
            self.inner.template(index)
        }
    }

    fn read(&self, index: usize) -> u8 {
        self.inner.read(index)
    }

    fn quality(&self, index: usize) -> f64 {
        self.inner.quality(index)
    }
}

/// Template with the half-open interval `[start, end)` replaced by another
/// sequence: `original[..start] + replacement + original[end..]`.
#[derive(Debug, Clone)]
pub struct GenomeSubstitution<T> {
    inner: T,
    start: usize,
    end: usize,
    replacement: Vec<u8>,
}

impl<T: EnvironmentTemplate> GenomeSubstitution<T> {
    /// Splice encoded `replacement` over `[start, end)` of `inner`.
    pub fn new(
        inner: T,
        start: usize,
        end: usize,
        replacement: &[u8],
    ) -> Result<Self, EnvironmentError> {
        let length = inner.template_length();
        if start > end || end > length {
            return Err(EnvironmentError::InvalidSubstitution { start, end, length });
        }
        Ok(Self {
            inner,
            start,
            end,
            replacement: replacement.to_vec(),
        })
    }

    /// Length of the spliced template.
    pub fn subsequence_length(&self) -> usize {
        self.inner.template_length() - (self.end - self.start) + self.replacement.len()
    }
}

impl<T: EnvironmentTemplate> EnvironmentTemplate for GenomeSubstitution<T> {
    fn template_length(&self) -> usize {
        self.subsequence_length()
    }

    fn template_at(&self, position: isize) -> u8 {
        if position < 0 || position as usize >= self.subsequence_length() {
            return crate::dna::N;
        }
        let pos = position as usize;
        if pos < self.start {
            self.inner.template_at(position)
        } else if pos < self.start + self.replacement.len() {
            self.replacement[pos - self.start]
        } else {
            let shifted = pos - self.replacement.len() + (self.end - self.start);
            self.inner.template_at(shifted as isize)
        }
    }
}
