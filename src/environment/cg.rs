use super::{Environment, EnvironmentError};

/// Logical view of a two-fragment read whose fragments were reported in
/// swapped physical order.
///
/// The physical read is `P[..replace_position] + P[replace_position..]`; the
/// logical read is `P[replace_position..] + P[..replace_position]`. From the
/// logical position where the relocated fragment begins, template offsets
/// are shifted by `delta`, the drift the fragment boundary introduces.
#[derive(Debug, Clone)]
pub struct CgInvertedEnvironment<E> {
    inner: E,
    replace_position: usize,
    delta: isize,
}

impl<E: Environment> CgInvertedEnvironment<E> {
    /// Splice `inner` whose second physical fragment starts at
    /// `replace_position`.
    pub fn new(inner: E, replace_position: usize, delta: isize) -> Result<Self, EnvironmentError> {
        let n = inner.read_length();
        if replace_position == 0 || replace_position >= n {
            return Err(EnvironmentError::InvalidCgLayout(format!(
                "replace position {} must fall strictly inside a read of length {}",
                replace_position, n
            )));
        }
        if delta.unsigned_abs() > inner.template_length() {
            return Err(EnvironmentError::InvalidCgLayout(format!(
                "fragment drift {} exceeds template length {}",
                delta,
                inner.template_length()
            )));
        }
        Ok(Self {
            inner,
            replace_position,
            delta,
        })
    }

    /// Physical read position where the second fragment starts.
    pub fn replace_position(&self) -> usize {
        self.replace_position
    }

    /// Drift introduced at the splice.
    pub fn delta(&self) -> isize {
        self.delta
    }

    /// Logical read position where the relocated fragment begins.
    pub fn split(&self) -> usize {
        self.inner.read_length() - self.replace_position
    }

    #[inline]
    fn physical(&self, index: usize) -> usize {
        let n = self.inner.read_length();
        (index + self.replace_position) % n
    }

    #[inline]
    fn shifted(&self, index: isize) -> isize {
        if index < self.split() as isize {
            index
        } else {
            index + self.delta
        }
    }
}

impl<E: Environment> Environment for CgInvertedEnvironment<E> {
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
        self.inner.absolute_template_position(self.shifted(index))
    }

    #[inline]
    fn template(&self, index: isize) -> u8 {
        self.inner.template(self.shifted(index))
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.inner.read(self.physical(index))
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.inner.quality(self.physical(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna;
    use crate::environment::EnvironmentImplementation;

    const TEMPLATE: &str = "ACGTACGTTTGGCA";

    fn physical_env() -> EnvironmentImplementation {
        // logical read: TEMPLATE[0..4] + TEMPLATE[6..9]
        let logical = format!("{}{}", &TEMPLATE[0..4], &TEMPLATE[6..9]);
        let physical = format!("{}{}", &logical[4..], &logical[..4]);
        EnvironmentImplementation::from_strs(1, TEMPLATE, 0, &physical, 0.01).unwrap()
    }

    #[test]
    fn test_logical_read_matches_template() {
        let env = physical_env();
        let cg = CgInvertedEnvironment::new(&env, 3, 2).unwrap();
        assert_eq!(cg.split(), 4);
        for i in 0..7 {
            assert_eq!(cg.read(i), cg.template(i as isize), "position {i}");
        }
        assert_eq!(cg.absolute_template_position(3), 3);
        assert_eq!(cg.absolute_template_position(4), 6);
        assert_eq!(cg.template(-1), dna::N);
    }

    #[test]
    fn test_layout_checked() {
        let env = physical_env();
        assert!(matches!(
            CgInvertedEnvironment::new(&env, 0, 2),
            Err(EnvironmentError::InvalidCgLayout(_))
        ));
        assert!(CgInvertedEnvironment::new(&env, 7, 2).is_err());
        assert!(CgInvertedEnvironment::new(&env, 3, 40).is_err());
    }
}
