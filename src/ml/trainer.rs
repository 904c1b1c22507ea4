// ============================================================
// Layer 5: Training Loop
// ============================================================
// Epoch loop over lazily produced batches with Adam.
//
// Per epoch:
//   1. shuffle the training sentences, rebuild batches
//   2. one optimisation step per batch (autodiff backend)
//   3. if a test corpus is present: shuffle it, rebuild batches,
//      evaluate with model.valid() (inner backend, no dropout)
//
// A batch whose shape does not fit the model aborts the run.
// There is no early stopping; the epoch count is the only stop.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{batcher::batches, batcher::WindowBatch, shuffle::shuffle_sentences};
use crate::domain::{sentence::Sentence, vocabulary::Vocabulary};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::loss::perplexity;
use crate::ml::model::CharPredictor;

/// Adam step size. Fixed for this architecture.
pub const LEARNING_RATE: f64 = 1e-4;

/// A debug progress event is emitted every this many batches.
pub const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub epochs:     usize,
    pub batch_size: usize,
    pub seed:       u64,
}

// ─── PassStats ────────────────────────────────────────────────────────────────
/// Aggregate of one full pass over a corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassStats {
    /// Mean of the per-batch mean cross-entropy
    pub loss:       f64,
    /// Mean of the per-example 2^cross_entropy
    pub perplexity: f64,
    pub batches:    usize,
    pub examples:   usize,
}

#[derive(Default)]
struct PassAccumulator {
    loss_sum:       f64,
    perplexity_sum: f64,
    batches:        usize,
    examples:       usize,
}

impl PassAccumulator {
    fn add<B: Backend>(&mut self, batch_loss: f64, per_example_ce: Tensor<B, 1>) {
        let n = per_example_ce.dims()[0];
        let ppl_sum: f64 = perplexity(per_example_ce).sum().into_scalar().elem::<f64>();
        self.loss_sum       += batch_loss;
        self.perplexity_sum += ppl_sum;
        self.batches        += 1;
        self.examples       += n;
        if self.progress_due() {
            tracing::debug!(
                "{} batches, {} examples, running loss {:.4}",
                self.batches, self.examples, self.loss_sum / self.batches as f64
            );
        }
    }

    fn progress_due(&self) -> bool {
        self.batches % PROGRESS_EVERY == 0
    }

    /// Zero full batches → NaN, so an empty pass is never mistaken for a perfect one.
    fn finish(self) -> PassStats {
        let loss = if self.batches > 0 {
            self.loss_sum / self.batches as f64
        } else { f64::NAN };
        let perplexity = if self.examples > 0 {
            self.perplexity_sum / self.examples as f64
        } else { f64::NAN };
        if self.batches == 0 {
            tracing::warn!("Pass produced no full batch; metrics are NaN");
        }
        PassStats { loss, perplexity, batches: self.batches, examples: self.examples }
    }
}

// ─── Single passes ────────────────────────────────────────────────────────────

/// One optimisation step per batch. Returns the updated model.
pub fn train_pass<B, O>(
    mut model: CharPredictor<B>,
    optim:     &mut O,
    batches:   impl Iterator<Item = WindowBatch<B>>,
) -> Result<(CharPredictor<B>, PassStats)>
where
    B: AutodiffBackend,
    O: Optimizer<CharPredictor<B>, B>,
{
    let mut acc = PassAccumulator::default();

    for batch in batches {
        model.check_batch(&batch.windows, &batch.targets)?;
        let (loss, per_example) = model.forward_loss(batch.windows, batch.targets);

        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
        acc.add(loss_val, per_example.detach());

        // Backward pass + Adam update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(LEARNING_RATE, model, grads);
    }

    Ok((model, acc.finish()))
}

/// Forward passes only.
pub fn evaluate<B: Backend>(
    model:   &CharPredictor<B>,
    batches: impl Iterator<Item = WindowBatch<B>>,
) -> Result<PassStats> {
    let mut acc = PassAccumulator::default();

    for batch in batches {
        model.check_batch(&batch.windows, &batch.targets)?;
        let (loss, per_example) = model.forward_loss(batch.windows, batch.targets);
        acc.add(loss.into_scalar().elem::<f64>(), per_example);
    }

    Ok(acc.finish())
}

/// Reshuffle `corpus`, then evaluate over its full batches.
pub fn evaluate_corpus<B: Backend, R: Rng + ?Sized>(
    model:      &CharPredictor<B>,
    vocab:      &Vocabulary,
    corpus:     &mut [Sentence],
    batch_size: usize,
    rng:        &mut R,
    device:     &B::Device,
) -> Result<PassStats> {
    shuffle_sentences(corpus, rng);
    evaluate(model, batches::<B>(corpus, vocab, model.receptive_field, batch_size, device))
}

// ─── Epoch loop ───────────────────────────────────────────────────────────────

/// Train for `cfg.epochs` epochs, evaluating on `test_corpus` after each one.
pub fn run_training<B: AutodiffBackend>(
    cfg:          &TrainingConfig,
    mut model:    CharPredictor<B>,
    vocab:        &Vocabulary,
    train_corpus: &mut [Sentence],
    mut test_corpus: Option<&mut [Sentence]>,
    metrics:      Option<&MetricsLogger>,
    device:       &B::Device,
) -> Result<(CharPredictor<B>, Vec<EpochMetrics>)> {
    let receptive_field = model.receptive_field;
    let mut rng   = StdRng::seed_from_u64(cfg.seed);
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let mut history = Vec::with_capacity(cfg.epochs);

    tracing::info!(
        "Training {} epochs: receptive_field={}, dims={}, vocab={}, batch_size={}",
        cfg.epochs, receptive_field, model.embedding_dims, vocab.size(), cfg.batch_size,
    );

    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        shuffle_sentences(train_corpus, &mut rng);
        let train_batches = batches::<B>(train_corpus, vocab, receptive_field, cfg.batch_size, device);
        let (trained, train_stats) = train_pass(model, &mut optim, train_batches)?;
        model = trained;

        // ── Evaluation phase ──────────────────────────────────────────────────
        let test_stats = match test_corpus.as_deref_mut() {
            Some(corpus) => Some(evaluate_corpus(
                &model.valid(), vocab, corpus, cfg.batch_size, &mut rng, device,
            )?),
            None => None,
        };

        let row = EpochMetrics::new(epoch, Some(train_stats), test_stats);
        println!("Epoch {:>3}/{} | {}", epoch, cfg.epochs, row.summary());
        if let Some(logger) = metrics {
            logger.log(&row)?;
        }
        history.push(row);
    }

    tracing::info!("Training complete");
    Ok((model, history))
}
