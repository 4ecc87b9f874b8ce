use super::{Environment, EnvironmentError};

/// View of the read interval `[read_start, read_end)` of another environment,
/// re-based so that the first base of the interval is read position 0.
#[derive(Debug, Clone)]
pub struct SubreadEnvironment<E> {
    inner: E,
    read_start: usize,
    read_end: usize,
}

impl<E: Environment> SubreadEnvironment<E> {
    /// Restrict `inner` to `[read_start, read_end)`.
    pub fn new(inner: E, read_start: usize, read_end: usize) -> Result<Self, EnvironmentError> {
        let length = inner.read_length();
        if read_start > read_end || read_end > length {
            return Err(EnvironmentError::InvalidSubread {
                start: read_start,
                end: read_end,
                length,
            });
        }
        Ok(Self {
            inner,
            read_start,
            read_end,
        })
    }
}

impl<E: Environment> Environment for SubreadEnvironment<E> {
    fn max_shift(&self) -> usize {
        self.inner.max_shift()
    }

    fn read_length(&self) -> usize {
        self.read_end - self.read_start
    }

    fn template_length(&self) -> usize {
        self.inner.template_length()
    }

    fn absolute_template_position(&self, index: isize) -> isize {
        self.inner
            .absolute_template_position(index + self.read_start as isize)
    }

    #[inline]
    fn template(&self, index: isize) -> u8 {
        self.inner.template(index + self.read_start as isize)
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.inner.read(index + self.read_start)
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.inner.quality(index + self.read_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna;
    use crate::environment::EnvironmentImplementation;

    #[test]
    fn test_rebased_coordinates() {
        let env =
            EnvironmentImplementation::from_strs(2, "GGACGTACGTTT", 2, "ACGCGACG", 0.01).unwrap();
        let sub = SubreadEnvironment::new(&env, 3, 6).unwrap();
        assert_eq!(sub.read_length(), 3);
        assert_eq!(sub.read(0), dna::C);
        assert_eq!(sub.template(0), env.template(3));
        assert_eq!(sub.absolute_template_position(0), 5);
        assert_eq!(sub.max_shift(), 2);
    }

    #[test]
    fn test_interval_checked() {
        let env = EnvironmentImplementation::from_strs(1, "ACGT", 0, "ACG", 0.01).unwrap();
        assert_eq!(
            SubreadEnvironment::new(&env, 2, 4).unwrap_err(),
            EnvironmentError::InvalidSubread { start: 2, end: 4, length: 3 }
        );
        assert!(SubreadEnvironment::new(&env, 3, 3).is_ok());
    }
}
