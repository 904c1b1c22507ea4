// ============================================================
// Layer 4: Window Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<WindowSample>
// into tensors the predictor can consume.
//
// How batching works here:
//   Input:  N WindowSamples, each a window of R indices + target
//   Output: WindowBatch with
//             windows: Int   [N, R]   encoded symbol indices
//             targets: Float [N, V]   one-hot over the vocabulary
//
//   Windows are flattened row by row, then reshaped:
//   [w1_1, ..., w1_R, w2_1, ..., wN_R] → [N, R]
//
// Every window already has width R, so no padding or masks are
// needed at this stage.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::windows::{sample_batches, SampleBatches, WindowSample};
use crate::domain::sentence::Sentence;
use crate::domain::vocabulary::Vocabulary;

// ─── WindowBatch ──────────────────────────────────────────────────────────────
/// A batch of window/target pairs ready for the forward pass.
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Encoded input windows, shape [batch_size, receptive_field]
    pub windows: Tensor<B, 2, Int>,

    /// One-hot next-symbol targets, shape [batch_size, vocab_size]
    pub targets: Tensor<B, 2>,
}

// ─── WindowBatcher ────────────────────────────────────────────────────────────
/// Holds the target device and the one-hot width.
#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device:     B::Device,
    pub vocab_size: usize,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device, vocab_size: usize) -> Self {
        Self { device, vocab_size }
    }
}

impl<B: Backend> Batcher<WindowSample, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<WindowSample>) -> WindowBatch<B> {
        let batch_size      = items.len();
        let receptive_field = items.first().map_or(0, |s| s.window.len());

        // Burn Int tensors are built from i32 slices
        let window_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.window.iter().map(|&x| x as i32))
            .collect();

        let target_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.one_hot(self.vocab_size))
            .collect();

        let windows = Tensor::<B, 1, Int>::from_ints(
            window_flat.as_slice(), &self.device
        ).reshape([batch_size, receptive_field]);

        let targets = Tensor::<B, 1>::from_floats(
            target_flat.as_slice(), &self.device
        ).reshape([batch_size, self.vocab_size]);

        WindowBatch { windows, targets }
    }
}

// ─── Batches ──────────────────────────────────────────────────────────────────
/// Lazy tensor batches over a corpus: SampleBatches run through the batcher.
/// Only one batch is materialised at a time.
pub struct Batches<'a, B: Backend> {
    samples: SampleBatches<'a>,
    batcher: WindowBatcher<B>,
}

impl<B: Backend> Iterator for Batches<'_, B> {
    type Item = WindowBatch<B>;

    fn next(&mut self) -> Option<WindowBatch<B>> {
        self.samples.next().map(|items| self.batcher.batch(items))
    }
}

/// Fresh batch sequence over `corpus`; call again for every epoch.
pub fn batches<'a, B: Backend>(
    corpus:          &'a [Sentence],
    vocab:           &'a Vocabulary,
    receptive_field: usize,
    batch_size:      usize,
    device:          &B::Device,
) -> Batches<'a, B> {
    Batches {
        samples: sample_batches(corpus, vocab, receptive_field, batch_size),
        batcher: WindowBatcher::new(device.clone(), vocab.size()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::split_sentences;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes() {
        let device = <TestBackend as Backend>::Device::default();
        let corpus = split_sentences("ab\n#SEP#\ncab");
        let vocab  = Vocabulary::derive(&corpus);

        let all: Vec<WindowBatch<TestBackend>> = batches(&corpus, &vocab, 2, 3, &device).collect();
        assert_eq!(all.len(), 2);
        for batch in &all {
            assert_eq!(batch.windows.dims(), [3, 2]);
            assert_eq!(batch.targets.dims(), [3, vocab.size()]);
        }
    }

    #[test]
    fn test_targets_are_one_hot_rows() {
        let device = <TestBackend as Backend>::Device::default();
        let corpus = split_sentences("hello\n#SEP#\nworld");
        let vocab  = Vocabulary::derive(&corpus);

        for batch in batches::<TestBackend>(&corpus, &vocab, 4, 4, &device) {
            let row_sums: Vec<f32> = batch
                .targets
                .clone()
                .sum_dim(1)
                .into_data()
                .to_vec()
                .unwrap();
            assert!(row_sums.iter().all(|&s| (s - 1.0).abs() < 1e-6));

            let ones: f32 = batch.targets.clone().greater_elem(0.5).int().sum().into_scalar().elem();
            assert_eq!(ones as usize, 4);
        }
    }

    #[test]
    fn test_window_values_match_samples() {
        let device = <TestBackend as Backend>::Device::default();
        let corpus = split_sentences("cab");
        let vocab  = Vocabulary::derive(&corpus);

        let batch: WindowBatch<TestBackend> = batches(&corpus, &vocab, 2, 4, &device)
            .next()
            .unwrap();
        let ids: Vec<i64> = batch.windows.into_data().convert::<i64>().to_vec().unwrap();
        let expected: Vec<i64> = sample_batches(&corpus, &vocab, 2, 4)
            .next()
            .unwrap()
            .iter()
            .flat_map(|s| s.window.iter().map(|&i| i as i64))
            .collect();
        assert_eq!(ids, expected);
    }
}
