// ============================================================
// Layer 4: Sliding Windows
// ============================================================
// Turns one sentence into (window, target) training pairs.
//
// With receptive field R the sentence is padded as
//
//   [<BOS>] * R  +  sentence  +  [<EOS>]
//
// and a window of width R slides over it with stride 1. The
// window starting at position i predicts the symbol at i + R.
//
// Example, R = 2, sentence "ab":
//   padded:  <BOS> <BOS>  a  b  <EOS>
//   pairs:   [<BOS>,<BOS>] → a
//            [<BOS>,  a  ] → b
//            [  a,    b  ] → <EOS>
//
// A sentence of length L therefore yields exactly L + 1 pairs.
//
// `SampleBatches` flattens those pairs across a corpus and groups
// them into fixed-size batches. A trailing batch smaller than
// `batch_size` is dropped, never emitted.

use std::iter::FusedIterator;

use crate::domain::sentence::Sentence;
use crate::domain::vocabulary::Vocabulary;

/// One training example: R encoded symbols and the index that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSample {
    pub window: Vec<usize>,
    pub target: usize,
}

impl WindowSample {
    /// One-hot encoding of the target over the whole vocabulary.
    pub fn one_hot(&self, vocab_size: usize) -> Vec<f32> {
        let mut v = vec![0.0; vocab_size];
        v[self.target] = 1.0;
        v
    }
}

// ─── Windows ──────────────────────────────────────────────────────────────────
/// Lazy window/target pairs for one sentence.
///
/// Holds only the padded, encoded sentence; each call to `windows`
/// builds fresh state, so iteration always restarts from position 0.
#[derive(Debug, Clone)]
pub struct Windows {
    padded:          Vec<usize>,
    receptive_field: usize,
    position:        usize,
}

pub fn windows(sentence: &Sentence, receptive_field: usize, vocab: &Vocabulary) -> Windows {
    let first = -(receptive_field as isize);
    let last  = sentence.len() as isize;
    let padded: Vec<usize> = (first..=last).map(|i| vocab.encode(sentence.at(i))).collect();
    Windows { padded, receptive_field, position: 0 }
}

impl Windows {
    fn remaining(&self) -> usize {
        (self.padded.len() - self.receptive_field).saturating_sub(self.position)
    }
}

impl Iterator for Windows {
    type Item = WindowSample;

    fn next(&mut self) -> Option<WindowSample> {
        if self.remaining() == 0 {
            return None;
        }
        let start = self.position;
        let end   = start + self.receptive_field;
        self.position += 1;
        Some(WindowSample {
            window: self.padded[start..end].to_vec(),
            target: self.padded[end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Windows {}
impl FusedIterator for Windows {}

// ─── SampleBatches ────────────────────────────────────────────────────────────
/// Lazy fixed-size batches of samples drawn from a whole corpus.
///
/// Sentences are windowed one at a time, in corpus order, so at most
/// one sentence and one batch are buffered.
pub struct SampleBatches<'a> {
    sentences:       std::slice::Iter<'a, Sentence>,
    current:         Option<Windows>,
    vocab:           &'a Vocabulary,
    receptive_field: usize,
    batch_size:      usize,
}

/// Group every window of `corpus` into batches of exactly `batch_size`.
///
/// # Panics
/// Panics if `batch_size` is zero.
pub fn sample_batches<'a>(
    corpus:          &'a [Sentence],
    vocab:           &'a Vocabulary,
    receptive_field: usize,
    batch_size:      usize,
) -> SampleBatches<'a> {
    assert!(batch_size > 0, "batch_size must be positive");
    SampleBatches {
        sentences: corpus.iter(),
        current: None,
        vocab,
        receptive_field,
        batch_size,
    }
}

impl SampleBatches<'_> {
    fn next_sample(&mut self) -> Option<WindowSample> {
        loop {
            if let Some(sample) = self.current.as_mut().and_then(|w| w.next()) {
                return Some(sample);
            }
            let sentence = self.sentences.next()?;
            self.current = Some(windows(sentence, self.receptive_field, self.vocab));
        }
    }
}

impl Iterator for SampleBatches<'_> {
    type Item = Vec<WindowSample>;

    fn next(&mut self) -> Option<Vec<WindowSample>> {
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            // Corpus exhausted mid-batch: the remainder is discarded.
            batch.push(self.next_sample()?);
        }
        Some(batch)
    }
}

impl FusedIterator for SampleBatches<'_> {}
