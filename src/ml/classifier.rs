// ============================================================
// Layer 5 — Burn Classifier
// ============================================================
// Production Classifier implementation. Runs the logistic
// regression on burn's CPU (NdArray) backend.
//
// The weights are pulled out of the loaded module once, into
// plain immutable tensors. The classifier is then Send + Sync
// and every request can score against it without a lock.

use burn::prelude::*;
use burn::tensor::activation::sigmoid;

use crate::domain::error::InferenceError;
use crate::domain::prediction::PredictionResult;
use crate::domain::traits::Classifier;
use crate::ml::model::LogisticRegression;

pub type InferBackend = burn::backend::NdArray;
pub type InferDevice  = burn::backend::ndarray::NdArrayDevice;

pub struct BurnClassifier {
    /// [n_features, 1]
    weight:     Tensor<InferBackend, 2>,
    /// [1]
    bias:       Tensor<InferBackend, 1>,
    n_features: usize,
    device:     InferDevice,
}

impl BurnClassifier {
    /// Take the weights of a loaded module.
    pub fn from_module(
        model:  LogisticRegression<InferBackend>,
        device: InferDevice,
    ) -> Result<Self, String> {
        let weight = model.linear.weight.val();
        let bias = match &model.linear.bias {
            Some(b) => b.val(),
            None    => Tensor::zeros([1], &device),
        };

        let [n_features, outputs] = weight.dims();
        if outputs != 1 {
            return Err(format!("expected a single output column, found {outputs}"));
        }
        if bias.dims() != [1] {
            return Err(format!("expected a scalar intercept, found shape {:?}", bias.dims()));
        }

        Ok(Self { weight, bias, n_features, device })
    }

    /// Build directly from exported coefficients (no file round trip).
    #[cfg(test)]
    pub fn from_coefficients(coefficients: &[f32], intercept: f32) -> Result<Self, String> {
        use crate::ml::model::LogisticRegressionConfig;

        let device = InferDevice::default();
        let model = LogisticRegressionConfig::new(coefficients.len())
            .init::<InferBackend>(&device)
            .with_coefficients(coefficients, intercept, &device);
        Self::from_module(model, device)
    }
}

impl Classifier for BurnClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f32]) -> Result<PredictionResult, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::WidthMismatch {
                expected: self.n_features,
                found:    features.len(),
            });
        }

        // [1, n] · [n, 1] + [1, 1] → [1, 1]
        let x = Tensor::<InferBackend, 1>::from_floats(features, &self.device).unsqueeze::<2>();
        let logits = x.matmul(self.weight.clone()) + self.bias.clone().unsqueeze::<2>();

        let probs: Vec<f32> = sigmoid(logits)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| InferenceError::Backend(format!("{e:?}")))?;

        let p = probs
            .first()
            .copied()
            .ok_or_else(|| InferenceError::Backend("empty classifier output".to_string()))?
            as f64;

        Ok(PredictionResult::from_probability(p))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::DiabetesLabel;
    use crate::ml::model::LogisticRegressionConfig;

    #[test]
    fn test_zero_logit_is_half() {
        let c = BurnClassifier::from_coefficients(&[0.0, 0.0], 0.0).unwrap();
        let r = c.predict(&[3.0, -7.0]).unwrap();
        assert!((r.probability - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sign_of_logit_sets_label() {
        let c = BurnClassifier::from_coefficients(&[1.0, 2.0], -1.0).unwrap();

        // 1*2 + 2*1 - 1 = 3 → sigmoid(3) ≈ 0.9526
        let hi = c.predict(&[2.0, 1.0]).unwrap();
        assert_eq!(hi.label, DiabetesLabel::Diabetic);
        assert!((hi.probability - 0.952_574).abs() < 1e-4);

        // 1*0 + 2*(-1) - 1 = -3 → sigmoid(-3) ≈ 0.0474
        let lo = c.predict(&[0.0, -1.0]).unwrap();
        assert_eq!(lo.label, DiabetesLabel::NonDiabetic);
        assert!((lo.probability - 0.047_426).abs() < 1e-4);
    }

    #[test]
    fn test_width_checked() {
        let c = BurnClassifier::from_coefficients(&[1.0, 2.0, 3.0], 0.0).unwrap();
        assert_eq!(c.n_features(), 3);
        let err = c.predict(&[1.0]).unwrap_err();
        assert_eq!(err, InferenceError::WidthMismatch { expected: 3, found: 1 });
    }

    #[test]
    fn test_module_forward_agrees() {
        let device = InferDevice::default();
        let model = LogisticRegressionConfig::new(2)
            .init::<InferBackend>(&device)
            .with_coefficients(&[0.5, -0.25], 0.1, &device);
        let x = Tensor::<InferBackend, 1>::from_floats([1.0, 2.0], &device).unsqueeze::<2>();
        let from_module = model.forward(x).into_data().to_vec::<f32>().unwrap()[0] as f64;

        let c = BurnClassifier::from_module(model, device).unwrap();
        let from_classifier = c.predict(&[1.0, 2.0]).unwrap().probability;
        assert!((from_module - from_classifier).abs() < 1e-6);
    }

    #[test]
    fn test_classifier_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BurnClassifier>();
    }
}
