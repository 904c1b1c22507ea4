use anyhow::{anyhow, ensure, Result};
use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    module::AutodiffModule,
    prelude::*,
    tensor::{activation::softmax, backend::AutodiffBackend},
};

use crate::ml::block::{AttentionBlock, AttentionBlockConfig};
use crate::ml::loss::categorical_cross_entropy;

/// Fixed architectural constants. Every model is built with the
/// defaults; the struct exists so variants can be built in tests.
#[derive(Config, Debug)]
pub struct ArchitectureConfig {
    #[config(default = 6)]
    pub num_blocks: usize,
    #[config(default = 4)]
    pub num_heads: usize,
    #[config(default = 0.1)]
    pub dropout: f64,
    #[config(default = true)]
    pub shared_stage_layers: bool,
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct PredictorConfig {
    pub receptive_field: usize,
    pub embedding_dims:  usize,
    pub vocab_size:      usize,
    #[config(default = "ArchitectureConfig::new()")]
    pub architecture:    ArchitectureConfig,
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        let arch = &self.architecture;
        ensure!(self.receptive_field > 0, "receptive_field must be positive");
        ensure!(self.embedding_dims > 0, "embedding dims must be positive");
        ensure!(self.vocab_size > 0, "vocabulary must not be empty");
        ensure!(arch.num_heads > 0, "num_heads must be positive");
        ensure!(
            self.embedding_dims % arch.num_heads == 0,
            "embedding dims ({}) must be divisible by the head count ({})",
            self.embedding_dims,
            arch.num_heads
        );
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<CharPredictor<B>> {
        self.validate()?;
        let arch = &self.architecture;

        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dims).init(device);
        let block_cfg = AttentionBlockConfig::new(self.embedding_dims, arch.num_heads)
            .with_dropout(arch.dropout)
            .with_shared_stage_layers(arch.shared_stage_layers);
        let blocks: Vec<AttentionBlock<B>> = (0..arch.num_blocks)
            .map(|_| block_cfg.init(device))
            .collect();
        // Kernel spans the whole receptive field, so the sequence axis collapses to 1.
        let window_projection =
            Conv1dConfig::new(self.embedding_dims, self.vocab_size, self.receptive_field).init(device);
        let output = LinearConfig::new(self.vocab_size, self.vocab_size).init(device);

        Ok(CharPredictor {
            embedding,
            blocks,
            window_projection,
            output,
            receptive_field: self.receptive_field,
            embedding_dims:  self.embedding_dims,
            vocab_size:      self.vocab_size,
        })
    }
}

/// Embedding → attention blocks → windowed projection → dense → softmax.
#[derive(Module, Debug)]
pub struct CharPredictor<B: Backend> {
    pub embedding:         Embedding<B>,
    pub blocks:            Vec<AttentionBlock<B>>,
    pub window_projection: Conv1d<B>,
    pub output:            Linear<B>,
    pub receptive_field:   usize,
    pub embedding_dims:    usize,
    pub vocab_size:        usize,
}

impl<B: Backend> CharPredictor<B> {
    /// windows: [batch, receptive_field] → distributions: [batch, vocab_size]
    pub fn forward(&self, windows: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let mut x = self.embedding.forward(windows); // [batch, rf, dims]
        for block in &self.blocks {
            x = block.forward(x);
        }

        // Conv1d wants channels first: [batch, dims, rf] → [batch, vocab, 1]
        let projected = self.window_projection.forward(x.swap_dims(1, 2));
        let flat: Tensor<B, 2> = projected.flatten(1, 2);

        softmax(self.output.forward(flat), 1)
    }

    /// Mean categorical cross-entropy over the batch, plus the per-example values.
    pub fn forward_loss(
        &self,
        windows: Tensor<B, 2, Int>,
        targets: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let probs = self.forward(windows);
        let per_example = categorical_cross_entropy(targets, probs);
        (per_example.clone().mean(), per_example)
    }

    /// Reject batches whose shape cannot belong to this model.
    pub fn check_batch(&self, windows: &Tensor<B, 2, Int>, targets: &Tensor<B, 2>) -> Result<()> {
        let [n, width] = windows.dims();
        let [m, classes] = targets.dims();
        ensure!(
            width == self.receptive_field,
            "batch window width {width} does not match receptive field {}",
            self.receptive_field
        );
        ensure!(
            classes == self.vocab_size,
            "batch target width {classes} does not match vocabulary size {}",
            self.vocab_size
        );
        ensure!(n == m, "batch has {n} windows but {m} targets");
        Ok(())
    }

    /// Next-symbol distribution for a single encoded window. Forward only.
    pub fn predict_distribution(&self, window: &[usize]) -> Result<Vec<f32>> {
        ensure!(
            window.len() == self.receptive_field,
            "window of length {} does not match receptive field {}",
            window.len(),
            self.receptive_field
        );
        ensure!(
            window.iter().all(|&i| i < self.vocab_size),
            "window contains an index outside the vocabulary"
        );

        let device = self.embedding.weight.val().device();
        let ids: Vec<i32> = window.iter().map(|&i| i as i32).collect();
        let input = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &device)
            .reshape([1, self.receptive_field]);

        self.forward(input)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read prediction: {e:?}"))
    }
}

impl<B: AutodiffBackend> CharPredictor<B> {
    /// Copy on the inner backend: no gradient tracking, dropout off.
    pub fn for_inference(&self) -> CharPredictor<B::InnerBackend> {
        self.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn small(rf: usize, dims: usize, vocab: usize) -> PredictorConfig {
        PredictorConfig::new(rf, dims, vocab)
    }

    #[test]
    fn test_default_architecture_constants() {
        let arch = ArchitectureConfig::new();
        assert_eq!(arch.num_blocks, 6);
        assert_eq!(arch.num_heads, 4);
        assert_eq!(arch.dropout, 0.1);
        assert!(arch.shared_stage_layers);
    }

    #[test]
    fn test_create_builds_six_blocks() {
        let device = <TestBackend as Backend>::Device::default();
        let model  = small(3, 8, 6).init::<TestBackend>(&device).unwrap();
        assert_eq!(model.blocks.len(), 6);
        assert_eq!(model.embedding.weight.val().dims(), [6, 8]);
    }

    #[test]
    fn test_output_is_distribution() {
        let device = <TestBackend as Backend>::Device::default();
        let model  = small(4, 8, 7).init::<TestBackend>(&device).unwrap();
        let input  = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2, 3, 4, 5, 6, 0], &device)
            .reshape([2, 4]);

        let probs = model.forward(input);
        assert_eq!(probs.dims(), [2, 7]);

        let values: Vec<f32> = probs.clone().into_data().to_vec().unwrap();
        assert!(values.iter().all(|&p| p >= 0.0));
        let sums: Vec<f32> = probs.sum_dim(1).into_data().to_vec().unwrap();
        assert!(sums.iter().all(|s| (s - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_predict_distribution_single_window() {
        let device = <TestBackend as Backend>::Device::default();
        let model  = small(2, 8, 5).init::<TestBackend>(&device).unwrap();

        let dist = model.predict_distribution(&[0, 4]).unwrap();
        assert_eq!(dist.len(), 5);
        assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-5);

        assert!(model.predict_distribution(&[0]).is_err());
        assert!(model.predict_distribution(&[0, 5]).is_err());
    }

    #[test]
    fn test_dims_must_split_across_heads() {
        let device = <TestBackend as Backend>::Device::default();
        assert!(small(2, 6, 5).init::<TestBackend>(&device).is_err());
        assert!(small(0, 8, 5).init::<TestBackend>(&device).is_err());
    }

    #[test]
    fn test_check_batch_rejects_shape_mismatch() {
        let device  = <TestBackend as Backend>::Device::default();
        let model   = small(3, 8, 5).init::<TestBackend>(&device).unwrap();
        let windows = Tensor::<TestBackend, 2, Int>::zeros([2, 3], &device);
        let good    = Tensor::<TestBackend, 2>::zeros([2, 5], &device);
        let bad     = Tensor::<TestBackend, 2>::zeros([2, 4], &device);
        assert!(model.check_batch(&windows, &good).is_ok());
        assert!(model.check_batch(&windows, &bad).is_err());

        let narrow = Tensor::<TestBackend, 2, Int>::zeros([2, 2], &device);
        assert!(model.check_batch(&narrow, &good).is_err());
    }
}
