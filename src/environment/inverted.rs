use super::Environment;

/// Environment walked from the opposite end.
///
/// Read position `i` maps to `n - 1 - i` and template offset `k` reflects
/// about the pivot to `pivot - 1 - k`. The default pivot is the read length,
/// so a read aligned at offset 0 stays aligned at offset 0.
#[derive(Debug, Clone)]
pub struct InvertedEnvironment<E> {
    inner: E,
    pivot: isize,
}

impl<E: Environment> InvertedEnvironment<E> {
    /// Invert about the read length.
    pub fn new(inner: E) -> Self {
        let pivot = inner.read_length() as isize;
        Self { inner, pivot }
    }

    /// Invert about an explicit pivot, for layouts whose template span
    /// differs from the read length.
    pub fn with_pivot(inner: E, pivot: isize) -> Self {
        Self { inner, pivot }
    }

    /// Reflection pivot.
    pub fn pivot(&self) -> isize {
        self.pivot
    }

    /// Map an offset in this view back to the wrapped environment.
    #[inline]
    pub fn reflect(&self, index: isize) -> isize {
        self.pivot - 1 - index
    }
}

impl<E: Environment> Environment for InvertedEnvironment<E> {
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
        self.inner.absolute_template_position(self.reflect(index))
    }

    #[inline]
    fn template(&self, index: isize) -> u8 {
        self.inner.template(self.reflect(index))
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.inner.read(self.inner.read_length() - 1 - index)
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.inner.quality(self.inner.read_length() - 1 - index)
    }
}
