// ============================================================
// Layer 5 — Logistic Regression Module
// ============================================================
// The classifier half of an artifact, as a burn Module so its
// weights can be written and read with burn's file recorders.
//
//   p(diabetic | x) = sigmoid(x · w + b)
//
// w has shape [n_features, 1], b has shape [1], matching
// LinearConfig::new(n_features, 1).

use burn::{
    module::Param,
    nn::{Linear, LinearConfig},
    prelude::*,
};

#[derive(Config, Debug)]
pub struct LogisticRegressionConfig {
    pub n_features: usize,
}

impl LogisticRegressionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticRegression<B> {
        LogisticRegression {
            linear: LinearConfig::new(self.n_features, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct LogisticRegression<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticRegression<B> {
    /// [batch, n_features] → [batch, 1] positive-class probabilities.
    /// Serving scores through BurnClassifier, which takes these weights
    /// out of the module; tests hold the two to the same output.
    #[cfg(test)]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        burn::tensor::activation::sigmoid(self.linear.forward(x))
    }

    /// Replace the weights with exported coefficients.
    /// `coefficients.len()` must equal the configured `n_features`.
    pub fn with_coefficients(
        mut self,
        coefficients: &[f32],
        intercept:    f32,
        device:       &B::Device,
    ) -> Self {
        let n = coefficients.len();
        let weight = Tensor::<B, 1>::from_floats(coefficients, device).reshape([n, 1]);
        let bias   = Tensor::<B, 1>::from_floats([intercept], device);

        self.linear.weight = Param::from_tensor(weight);
        self.linear.bias   = Some(Param::from_tensor(bias));
        self
    }
}
