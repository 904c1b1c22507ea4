// ============================================================
// Layer 5: Text Generator
// ============================================================
// Produces text from a trained predictor, one symbol at a time.
//
// The window starts as R × <BOS>. Each step predicts the next
// distribution, picks a symbol, shifts it into the window and
// repeats until <EOS> or `max_len` symbols have been produced.
//
//   Greedy → most probable symbol every step
//   Sample → draw from the predicted distribution
//
// <BOS>/<UNK> picks are fed back into the window but never
// printed.

use anyhow::{anyhow, Result};
use burn::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::domain::symbol::Symbol;
use crate::domain::vocabulary::Vocabulary;
use crate::ml::model::CharPredictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    Greedy,
    Sample,
}

pub struct Generator<'a, B: Backend> {
    model: &'a CharPredictor<B>,
    vocab: &'a Vocabulary,
}

impl<'a, B: Backend> Generator<'a, B> {
    pub fn new(model: &'a CharPredictor<B>, vocab: &'a Vocabulary) -> Self {
        Self { model, vocab }
    }

    pub fn generate<R: Rng + ?Sized>(&self, max_len: usize, sampling: Sampling, rng: &mut R) -> Result<String> {
        let mut window = vec![self.vocab.bos_index(); self.model.receptive_field];
        let mut out    = String::new();

        for _ in 0..max_len {
            let dist = self.model.predict_distribution(&window)?;
            let next = match sampling {
                Sampling::Greedy => argmax(&dist),
                Sampling::Sample => WeightedIndex::new(&dist)
                    .map_err(|e| anyhow!("Cannot sample from prediction: {e}"))?
                    .sample(rng),
            };

            match self.vocab.decode(next) {
                Some(Symbol::Eos) => break,
                Some(Symbol::Char(c)) => out.push(c),
                Some(_) => {}
                None => return Err(anyhow!("Predicted index {next} is outside the vocabulary")),
            }

            window.remove(0);
            window.push(next);
        }

        tracing::debug!("Generated {} chars ({:?})", out.chars().count(), sampling);
        Ok(out)
    }
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}
