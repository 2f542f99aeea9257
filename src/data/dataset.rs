use burn::data::dataset::Dataset;

use crate::domain::sample::ClassificationSample;

/// In-memory samples exposed through Burn's Dataset trait so the
/// DataLoader can call `.get(index)` and `.len()`.
pub struct ClassificationDataset {
    samples: Vec<ClassificationSample>,
}

impl ClassificationDataset {
    pub fn new(samples: Vec<ClassificationSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<ClassificationSample> for ClassificationDataset {
    fn get(&self, index: usize) -> Option<ClassificationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_len() {
        let ds = ClassificationDataset::new(vec![
            ClassificationSample::new(vec![0.0, 1.0], 1),
            ClassificationSample::new(vec![1.0, 0.0], 0),
        ]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).map(|s| s.label), Some(0));
        assert!(ds.get(2).is_none());
    }
}
