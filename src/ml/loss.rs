// ============================================================
// Layer 5: Loss and Perplexity
// ============================================================
// Categorical cross-entropy between one-hot targets and the
// predictor's softmax output, per example:
//
//   CE(y, p) = -Σ_k y_k · ln(clip(p_k, ε, 1 - ε))      ε = 1e-7
//
// Perplexity is defined on top of that loss as
//
//   PPL = 2^CE
//
// (base 2 on a natural-log loss, kept as defined). Since CE ≥ 0,
// perplexity is always ≥ 1.

use burn::prelude::*;

/// Probability clip applied before the logarithm.
pub const EPSILON: f64 = 1e-7;

/// targets, probs: [batch, vocab] → [batch]
pub fn categorical_cross_entropy<B: Backend>(targets: Tensor<B, 2>, probs: Tensor<B, 2>) -> Tensor<B, 1> {
    let log_probs = probs.clamp(EPSILON, 1.0 - EPSILON).log();
    (targets * log_probs).sum_dim(1).neg().squeeze(1)
}

/// Per-example perplexity from per-example cross-entropy.
pub fn perplexity<B: Backend>(cross_entropy: Tensor<B, 1>) -> Tensor<B, 1> {
    (cross_entropy * std::f64::consts::LN_2).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn values(t: Tensor<TestBackend, 1>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    #[test]
    fn test_cross_entropy_of_uniform_prediction() {
        let device  = <TestBackend as Backend>::Device::default();
        let targets = Tensor::<TestBackend, 1>::from_floats([0.0, 1.0, 0.0, 0.0], &device).reshape([1, 4]);
        let probs   = Tensor::<TestBackend, 2>::ones([1, 4], &device) / 4.0;

        let ce = values(categorical_cross_entropy(targets, probs));
        assert!((ce[0] - 4.0f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_perfect_prediction_is_near_zero_and_ppl_one() {
        let device  = <TestBackend as Backend>::Device::default();
        let targets = Tensor::<TestBackend, 1>::from_floats([0.0, 0.0, 1.0], &device).reshape([1, 3]);
        let probs   = targets.clone();

        let ce = categorical_cross_entropy(targets, probs);
        let ppl = values(perplexity(ce.clone()));
        assert!(values(ce)[0] < 1e-6);
        assert!((ppl[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_probability_is_clipped() {
        let device  = <TestBackend as Backend>::Device::default();
        let targets = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0], &device).reshape([1, 2]);
        let probs   = Tensor::<TestBackend, 1>::from_floats([0.0, 1.0], &device).reshape([1, 2]);

        let ce = values(categorical_cross_entropy(targets, probs))[0];
        assert!(ce.is_finite());
        assert!((ce - (-(1e-7f32).ln())).abs() < 1e-3);
    }

    #[test]
    fn test_perplexity_is_two_to_the_loss() {
        let device = <TestBackend as Backend>::Device::default();
        let ce     = Tensor::<TestBackend, 1>::from_floats([0.0, 1.0, 3.0], &device);
        let ppl    = values(perplexity(ce));
        assert!((ppl[0] - 1.0).abs() < 1e-5);
        assert!((ppl[1] - 2.0).abs() < 1e-5);
        assert!((ppl[2] - 8.0).abs() < 1e-4);
    }
}
