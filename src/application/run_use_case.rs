// ============================================================
// Layer 2: RunUseCase
// ============================================================
// One invocation of the tool, in order:
//
//   Step 1: Validate the flag combination        (Layer 2)
//   Step 2: Load the train / test corpora        (Layer 4 - data)
//   Step 3: Create or load the predictor         (Layer 5 / 6)
//   Step 4: Train with per-epoch evaluation,
//           or evaluate once if only --test      (Layer 5 - ml)
//   Step 5: Save model + metadata                (Layer 6 - infra)
//   Step 6: Generate sample text                 (Layer 5 - ml)
//
// A configuration error is raised before any model is built or
// any checkpoint is touched.
//
// Reference: Rust Book §9 (Error Handling)
//            Burn Book §5 (Training)

use anyhow::{bail, ensure, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::loader::CorpusFileLoader;
use crate::domain::{
    metadata::Metadata,
    sentence::Sentence,
    traits::CorpusSource,
    vocabulary::Vocabulary,
};
use crate::infra::{
    checkpoint::CheckpointStore,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    backend::{self, TrainBackend},
    generator::{Generator, Sampling},
    model::{CharPredictor, PredictorConfig},
    trainer::{evaluate_corpus, run_training, TrainingConfig},
};

// ─── Run Configuration ───────────────────────────────────────────────────────
// Everything one run needs, free of clap types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub create:          bool,
    pub load:            Option<String>,
    pub save:            Option<String>,
    pub train:           Option<String>,
    pub test:            Option<String>,
    pub epochs:          usize,
    pub receptive_field: usize,
    pub dims:            usize,
    pub batch_size:      usize,
    pub seed:            u64,
    pub generate:        Option<usize>,
    pub sample:          bool,
    pub metrics:         Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            create:          false,
            load:            None,
            save:            None,
            train:           None,
            test:            None,
            epochs:          1,
            receptive_field: 128,
            dims:            64,
            batch_size:      64,
            seed:            42,
            generate:        None,
            sample:          false,
            metrics:         None,
        }
    }
}

impl RunConfig {
    /// True if the run needs a model at all.
    fn needs_model(&self) -> bool {
        self.train.is_some() || self.test.is_some() || self.save.is_some() || self.generate.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.create && self.load.is_some() {
            bail!("--create and --load cannot be used together");
        }
        if self.needs_model() && !self.create && self.load.is_none() {
            bail!("no model: pass --create or --load <path>");
        }
        ensure!(self.batch_size > 0, "--batch-size must be positive");
        Ok(())
    }
}

/// What a run produced, for callers that want more than stdout.
#[derive(Debug, Default)]
pub struct RunReport {
    pub history:   Vec<EpochMetrics>,
    pub generated: Option<String>,
}

// ─── RunUseCase ───────────────────────────────────────────────────────────────
pub struct RunUseCase {
    config: RunConfig,
}

impl RunUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<RunReport> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;
        tracing::debug!("Run config: {}", serde_json::to_string(cfg)?);
        backend::seed(cfg.seed);
        let device = backend::default_device();

        // ── Step 2: Corpora ───────────────────────────────────────────────────
        let mut train_corpus = load_corpus(cfg.train.as_deref())?;
        let mut test_corpus  = load_corpus(cfg.test.as_deref())?;

        // ── Step 3: Model ─────────────────────────────────────────────────────
        let (mut model, vocab): (CharPredictor<TrainBackend>, Vocabulary) = if cfg.create {
            let source = train_corpus.as_deref().or(test_corpus.as_deref()).unwrap_or_default();
            let vocab  = Vocabulary::derive(source);
            let model  = PredictorConfig::new(cfg.receptive_field, cfg.dims, vocab.size())
                .init::<TrainBackend>(&device)?;
            tracing::info!(
                "Created model: receptive_field={}, dims={}, vocab={}",
                cfg.receptive_field, cfg.dims, vocab.size()
            );
            (model, vocab)
        } else if let Some(path) = &cfg.load {
            let (model, metadata) = CheckpointStore::new(path).load::<TrainBackend>(&device)?;
            (model, metadata.vocabulary()?)
        } else {
            tracing::info!("Nothing to do: no model requested");
            return Ok(RunReport::default());
        };

        let metrics = cfg.metrics.as_deref().map(MetricsLogger::new).transpose()?;
        if let Some(logger) = &metrics {
            tracing::info!("Writing epoch metrics to '{}'", logger.csv_path().display());
        }
        let mut report = RunReport::default();

        // ── Step 4: Train / evaluate ──────────────────────────────────────────
        if let Some(train) = train_corpus.as_mut() {
            let training = TrainingConfig {
                epochs:     cfg.epochs,
                batch_size: cfg.batch_size,
                seed:       cfg.seed,
            };
            let (trained, history) = run_training(
                &training,
                model,
                &vocab,
                train,
                test_corpus.as_deref_mut(),
                metrics.as_ref(),
                &device,
            )?;
            model = trained;
            report.history = history;
        } else if let Some(test) = test_corpus.as_mut() {
            let mut rng = StdRng::seed_from_u64(cfg.seed);
            let stats = evaluate_corpus(
                &model.for_inference(), &vocab, test, cfg.batch_size, &mut rng, &device,
            )?;
            let row = EpochMetrics::new(1, None, Some(stats));
            println!("Evaluation | {}", row.summary());
            if let Some(logger) = &metrics {
                logger.log(&row)?;
            }
            report.history.push(row);
        }

        // ── Step 5: Save ──────────────────────────────────────────────────────
        if let Some(path) = &cfg.save {
            let metadata = Metadata::describe(&vocab, model.receptive_field, model.embedding_dims);
            CheckpointStore::new(path).save(&model, &metadata)?;
        }

        // ── Step 6: Generate ──────────────────────────────────────────────────
        if let Some(max_len) = cfg.generate {
            let sampling = if cfg.sample { Sampling::Sample } else { Sampling::Greedy };
            let inference = model.for_inference();
            let mut rng   = StdRng::seed_from_u64(cfg.seed);
            let text = Generator::new(&inference, &vocab).generate(max_len, sampling, &mut rng)?;
            println!("{text}");
            report.generated = Some(text);
        }

        Ok(report)
    }
}

fn load_corpus(path: Option<&str>) -> Result<Option<Vec<Sentence>>> {
    path.map(|p| CorpusFileLoader::new(p).load_all()).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const CORPUS: &str = "abcab\n#SEP#\ncabba\n#SEP#\nbca\n#SEP#\naabbcc";

    fn write_corpus(dir: &Path, name: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, CORPUS).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn small_config() -> RunConfig {
        RunConfig { receptive_field: 3, dims: 8, batch_size: 4, ..RunConfig::default() }
    }

    #[test]
    fn test_create_with_load_is_rejected() {
        let cfg = RunConfig { create: true, load: Some("x".into()), ..small_config() };
        let err = RunUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("--create"));
    }

    #[test]
    fn test_model_work_without_model_is_rejected() {
        let cfg = RunConfig { train: Some("corpus.txt".into()), ..small_config() };
        assert!(RunUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_no_flags_is_a_no_op() {
        let report = RunUseCase::new(RunConfig::default()).execute().unwrap();
        assert!(report.history.is_empty());
        assert!(report.generated.is_none());
    }

    #[test]
    fn test_missing_corpus_names_the_path() {
        let cfg = RunConfig {
            create: true,
            train:  Some("/definitely/not/here.txt".into()),
            ..small_config()
        };
        let err = RunUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_train_save_then_load_and_test() {
        let dir   = tempfile::tempdir().unwrap();
        let train = write_corpus(dir.path(), "train.txt");
        let test  = write_corpus(dir.path(), "test.txt");
        let out   = dir.path().join("out").to_string_lossy().into_owned();
        let csv   = dir.path().join("metrics.csv").to_string_lossy().into_owned();

        let first = RunUseCase::new(RunConfig {
            create:  true,
            train:   Some(train),
            save:    Some(out.clone()),
            epochs:  2,
            metrics: Some(csv.clone()),
            ..small_config()
        })
        .execute()
        .unwrap();

        assert_eq!(first.history.len(), 2);
        assert!(first.history.iter().all(|m| m.test.is_none()));
        assert!(CheckpointStore::new(&out).metadata_path().exists());
        assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 3);

        let second = RunUseCase::new(RunConfig {
            load:     Some(out),
            test:     Some(test),
            generate: Some(5),
            // Ignored on load: the metadata wins
            receptive_field: 99,
            dims:            16,
            ..small_config()
        })
        .execute()
        .unwrap();

        let stats = second.history[0].test.unwrap();
        assert!(stats.perplexity.is_finite() && stats.perplexity >= 1.0);
        assert!(second.generated.unwrap().chars().count() <= 5);
    }

    #[test]
    fn test_create_from_test_corpus_only() {
        let dir  = tempfile::tempdir().unwrap();
        let test = write_corpus(dir.path(), "test.txt");

        let report = RunUseCase::new(RunConfig { create: true, test: Some(test), ..small_config() })
            .execute()
            .unwrap();
        assert_eq!(report.history.len(), 1);
        assert!(report.history[0].train.is_none());
    }

    #[test]
    fn test_create_and_save_without_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty");

        RunUseCase::new(RunConfig {
            create: true,
            save:   Some(out.to_string_lossy().into_owned()),
            ..small_config()
        })
        .execute()
        .unwrap();

        let metadata = CheckpointStore::new(&out).load_metadata().unwrap();
        assert_eq!(metadata.alphabet, vec!["<BOS>", "<EOS>", "<UNK>"]);
    }
}
