use super::{Environment, EnvironmentRead, EnvironmentTemplate};

/// Environment assembled from separate read and template sides.
///
/// This is how hypotheses are scored: the same read is combined with the
/// reference template and with each [`super::GenomeSubstitution`] of it.
#[derive(Debug, Clone)]
pub struct EnvironmentCombined<R, T> {
    read: R,
    start: isize,
    max_shift: usize,
    template: T,
}

impl<R: EnvironmentRead, T: EnvironmentTemplate> EnvironmentCombined<R, T> {
    /// Align `read` so that base 0 falls on template position `start`.
    pub fn new(read: R, start: isize, max_shift: usize, template: T) -> Self {
        Self {
            read,
            start,
            max_shift,
            template,
        }
    }

    /// Template side.
    pub fn template_side(&self) -> &T {
        &self.template
    }

    /// Read side.
    pub fn read_side(&self) -> &R {
        &self.read
    }
}

impl<R: EnvironmentRead, T: EnvironmentTemplate> Environment for EnvironmentCombined<R, T> {
    fn max_shift(&self) -> usize {
        self.max_shift
    }

    fn read_length(&self) -> usize {
        self.read.read_length()
    }

    fn template_length(&self) -> usize {
        self.template.template_length()
    }

    fn absolute_template_position(&self, index: isize) -> isize {
        self.start + index
    }

    #[inline]
    fn template(&self, index: isize) -> u8 {
        self.template.template_at(self.start + index)
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.read.read(index)
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.read.quality(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna;
    use crate::environment::{
        EnvironmentImplementation, GenomeSubstitution, ReadEnvironment, TemplateEnvironment,
    };

    #[test]
    fn test_matches_plain_environment() {
        let plain =
            EnvironmentImplementation::from_strs(2, "GGACGTACGTTT", 2, "ACGCGACG", 0.01).unwrap();
        let read = ReadEnvironment::new(dna::encode_lenient(b"ACGCGACG"), vec![0.01; 8]).unwrap();
        let template = TemplateEnvironment::from_sequence("GGACGTACGTTT").unwrap();
        let combined = EnvironmentCombined::new(read, 2, 2, template);
        assert_eq!(combined.read_length(), plain.read_length());
        assert_eq!(combined.template_length(), plain.template_length());
        for k in -5..15 {
            assert_eq!(combined.template(k), plain.template(k));
            assert_eq!(combined.absolute_template_position(k), plain.absolute_template_position(k));
        }
    }

    #[test]
    fn test_combined_with_substituted_template() {
        let template = TemplateEnvironment::from_sequence("AAAACCCC").unwrap();
        let spliced =
            GenomeSubstitution::new(&template, 4, 4, &dna::encode_lenient(b"GG")).unwrap();
        let read = ReadEnvironment::new(dna::encode_lenient(b"AAGGCC"), vec![0.01; 6]).unwrap();
        let env = EnvironmentCombined::new(read, 2, 1, spliced);
        let seen: Vec<u8> = (0..6).map(|k| env.template(k)).collect();
        assert_eq!(dna::decode_all(&seen), "AAGGCC");
        assert_eq!(env.template_length(), 10);
    }
}
