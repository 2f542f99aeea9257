// ============================================================
// Layer 4 — Classification Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec of samples into
// tensors on the requested device:
//
//   Input:  N samples, each with F features and one label
//   Output: inputs  [N, F]  (float)
//           targets [N]     (int)
//
// Features are flattened into one long Vec and reshaped, so every
// sample in a batch must have the same feature count.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::sample::ClassificationSample;

#[derive(Debug, Clone)]
pub struct ClassificationBatch<B: Backend> {
    /// shape: [batch_size, num_features]
    pub inputs: Tensor<B, 2>,

    /// shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug, Default)]
pub struct ClassificationBatcher;

impl ClassificationBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, ClassificationSample, ClassificationBatch<B>> for ClassificationBatcher {
    fn batch(&self, items: Vec<ClassificationSample>, device: &B::Device) -> ClassificationBatch<B> {
        let batch_size   = items.len();
        let num_features = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let labels: Vec<i64> = items
            .iter()
            .map(|s| s.label as i64)
            .collect();

        let inputs = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, num_features]),
            device,
        );

        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]),
            device,
        );

        ClassificationBatch { inputs, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let device = Default::default();
        let items = vec![
            ClassificationSample::new(vec![1.0, 2.0, 3.0], 2),
            ClassificationSample::new(vec![4.0, 5.0, 6.0], 0),
        ];

        let batch: ClassificationBatch<NdArray> =
            Batcher::<NdArray, _, _>::batch(&ClassificationBatcher::new(), items, &device);

        assert_eq!(batch.inputs.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2]);

        let inputs = batch.inputs.into_data().to_vec::<f32>().unwrap();
        assert_eq!(inputs, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let targets: Vec<i64> = batch
            .targets
            .into_data()
            .iter::<i64>()
            .collect();
        assert_eq!(targets, vec![2, 0]);
    }
}
