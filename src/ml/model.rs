use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Linear, LinearConfig, Relu,
    },
    prelude::*,
};

use crate::domain::config::ModelSection;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SimpleModelConfig {
    #[config(default = 784)]
    pub input_size:  usize,
    #[config(default = 256)]
    pub hidden_size: usize,
    #[config(default = 10)]
    pub num_classes: usize,
}

impl SimpleModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SimpleModel<B> {
        SimpleModel {
            fc1:  LinearConfig::new(self.input_size, self.hidden_size).init(device),
            relu: Relu::new(),
            fc2:  LinearConfig::new(self.hidden_size, self.num_classes).init(device),
        }
    }
}

impl From<&ModelSection> for SimpleModelConfig {
    fn from(m: &ModelSection) -> Self {
        SimpleModelConfig::new()
            .with_input_size(m.input_size)
            .with_hidden_size(m.hidden_size)
            .with_num_classes(m.num_classes)
    }
}

/// Two-layer perceptron: Linear → ReLU → Linear.
#[derive(Module, Debug)]
pub struct SimpleModel<B: Backend> {
    pub fc1:  Linear<B>,
    pub relu: Relu,
    pub fc2:  Linear<B>,
}

impl<B: Backend> SimpleModel<B> {
    /// x: [batch, ...] → logits: [batch, num_classes]
    ///
    /// Every dimension after the batch dimension is flattened, so
    /// [batch, 28, 28] images and [batch, 784] vectors both work.
    pub fn forward<const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, 2> {
        let x = x.flatten::<2>(1, D - 1);
        let x = self.fc1.forward(x);
        let x = self.relu.forward(x);
        self.fc2.forward(x)
    }

    /// Returns (mean cross-entropy loss, logits).
    pub fn forward_classification(
        &self,
        inputs:  Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(inputs);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

/// Number of predictions in `logits` whose argmax equals `targets`.
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns shape [batch, 1] — flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

/// Formats a count with thousands separators: 203530 → "203,530"
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_forward_flattens_images() {
        let device = Default::default();
        let model  = SimpleModelConfig::new().init::<TestBackend>(&device);

        let images = Tensor::<TestBackend, 3>::zeros([2, 28, 28], &device);
        assert_eq!(model.forward(images).dims(), [2, 10]);
    }

    #[test]
    fn test_forward_on_flat_vectors() {
        let device = Default::default();
        let model  = SimpleModelConfig::new()
            .with_input_size(6)
            .with_hidden_size(4)
            .with_num_classes(3)
            .init::<TestBackend>(&device);

        let x = Tensor::<TestBackend, 2>::ones([5, 6], &device);
        assert_eq!(model.forward(x).dims(), [5, 3]);
    }

    #[test]
    fn test_default_parameter_count() {
        let device = Default::default();
        let model  = SimpleModelConfig::new().init::<TestBackend>(&device);
        // 784*256 + 256 + 256*10 + 10
        assert_eq!(model.num_params(), 203_530);
    }

    #[test]
    fn test_loss_is_finite() {
        let device = Default::default();
        let model  = SimpleModelConfig::new()
            .with_input_size(4)
            .with_hidden_size(8)
            .with_num_classes(2)
            .init::<TestBackend>(&device);

        let inputs  = Tensor::<TestBackend, 2>::ones([3, 4], &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 1], &device);
        let (loss, logits) = model.forward_classification(inputs, targets);

        assert_eq!(logits.dims(), [3, 2]);
        let loss: f64 = loss.into_scalar().elem::<f64>();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_floats(
            [[0.9, 0.1], [0.2, 0.8], [0.6, 0.4]],
            &device,
        );
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 1], &device);
        assert_eq!(count_correct(logits, targets), 2);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(203_530), "203,530");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
