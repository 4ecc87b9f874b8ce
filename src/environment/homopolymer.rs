use super::Environment;
use crate::dna;

/// Environment annotated with homopolymer run lengths.
///
/// For a read or template position, `*_start` is the length of the maximal
/// run that position opens and `*_end` the length of the run it closes;
/// both are 0 for positions strictly inside a run. `N` never forms a run.
/// Read runs are computed up front; template runs are scanned on demand.
#[derive(Debug, Clone)]
pub struct HomopolymerEnvironment<E> {
    inner: E,
    read_start: Vec<usize>,
    read_end: Vec<usize>,
}

impl<E: Environment> HomopolymerEnvironment<E> {
    /// Annotate `inner`.
    pub fn new(inner: E) -> Self {
        let n = inner.read_length();
        let mut read_start = vec![0; n];
        let mut read_end = vec![0; n];
        let mut i = 0;
        while i < n {
            let base = inner.read(i);
            let mut j = i + 1;
            while j < n && inner.read(j) == base {
                j += 1;
            }
            if base != dna::N {
                read_start[i] = j - i;
                read_end[j - 1] = j - i;
            }
            i = j;
        }
        Self {
            inner,
            read_start,
            read_end,
        }
    }

    /// Length of the read run opened at `index`.
    #[inline]
    pub fn read_start(&self, index: usize) -> usize {
        self.read_start[index]
    }

    /// Length of the read run closed at `index`.
    #[inline]
    pub fn read_end(&self, index: usize) -> usize {
        self.read_end[index]
    }

    /// Length of the template run opened at `index`.
    pub fn template_start(&self, index: isize) -> usize {
        let base = self.inner.template(index);
        if base == dna::N || self.inner.template(index - 1) == base {
            return 0;
        }
        let mut k = index + 1;
        while self.inner.template(k) == base {
            k += 1;
        }
        (k - index) as usize
    }

    /// Length of the template run closed at `index`.
    pub fn template_end(&self, index: isize) -> usize {
        let base = self.inner.template(index);
        if base == dna::N || self.inner.template(index + 1) == base {
            return 0;
        }
        let mut k = index - 1;
        while self.inner.template(k) == base {
            k -= 1;
        }
        (index - k) as usize
    }
}

impl<E: Environment> Environment for HomopolymerEnvironment<E> {
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
        self.inner.template(index)
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.inner.read(index)
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.inner.quality(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentImplementation;

    #[test]
    fn test_read_runs() {
        let env = EnvironmentImplementation::from_strs(1, "ACGT", 0, "AAACNNGG", 0.01).unwrap();
        let hp = HomopolymerEnvironment::new(&env);
        let starts: Vec<usize> = (0..8).map(|i| hp.read_start(i)).collect();
        let ends: Vec<usize> = (0..8).map(|i| hp.read_end(i)).collect();
        assert_eq!(starts, vec![3, 0, 0, 1, 0, 0, 2, 0]);
        assert_eq!(ends, vec![0, 0, 3, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_template_runs_stop_at_extent() {
        let env = EnvironmentImplementation::from_strs(1, "TTGCCCCA", 0, "TT", 0.01).unwrap();
        let hp = HomopolymerEnvironment::new(&env);
        assert_eq!(hp.template_start(0), 2);
        assert_eq!(hp.template_end(1), 2);
        assert_eq!(hp.template_start(3), 4);
        assert_eq!(hp.template_end(6), 4);
        assert_eq!(hp.template_end(4), 0);
        assert_eq!(hp.template_end(7), 1);
        assert_eq!(hp.template_end(8), 0);
        assert_eq!(hp.template_start(-1), 0);
    }
}
