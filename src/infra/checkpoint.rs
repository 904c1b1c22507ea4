// ============================================================
// Layer 6: Checkpoint Store
// ============================================================
// Saves and restores a predictor together with its metadata.
//
// What gets written for a checkpoint path P:
//   1. P.mpk: every learned parameter at full precision,
//      via Burn's DefaultRecorder
//   2. P.metadata.json: alphabet, receptive_field, dims
//
// Both names extend P as given, so `out.a` and `out.b` never
// share a weights file.
//
// Loading reads the metadata first, rebuilds an identical
// predictor from it, restores the parameters into it, then
// checks the restored shapes against the metadata.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{ensure, Context, Result};
use std::{ffi::OsString, fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{DefaultRecorder, FileRecorder, Recorder},
};

use crate::domain::metadata::Metadata;
use crate::domain::vocabulary::Vocabulary;
use crate::ml::backend::InnerBackend;
use crate::ml::model::{CharPredictor, PredictorConfig};

/// Suffix appended to the checkpoint path for the metadata file.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// Paired model + metadata persistence rooted at one user-given path.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// `<path>.metadata.json`, with the path exactly as given.
    pub fn metadata_path(&self) -> PathBuf {
        self.with_suffix(METADATA_SUFFIX)
    }

    /// `<path>.mpk`. Handed to the recorder with its extension already
    /// in place, so the recorder's extension swap is a no-op.
    pub fn model_path(&self) -> PathBuf {
        let ext = <DefaultRecorder as FileRecorder<InnerBackend>>::file_extension();
        self.with_suffix(&format!(".{ext}"))
    }

    /// Persist parameters and metadata as a pair.
    pub fn save<B: Backend>(&self, model: &CharPredictor<B>, metadata: &Metadata) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        DefaultRecorder::new()
            .record(model.clone().into_record(), self.model_path())
            .with_context(|| {
                format!("Failed to save model to '{}'", self.model_path().display())
            })?;

        let meta_path = self.metadata_path();
        let json = serde_json::to_string_pretty(metadata)?;
        fs::write(&meta_path, json)
            .with_context(|| format!("Cannot write metadata to '{}'", meta_path.display()))?;

        tracing::info!(
            "Saved checkpoint '{}' (+ '{}')",
            self.model_path().display(),
            meta_path.display()
        );
        Ok(())
    }

    /// Read the metadata sidecar on its own.
    pub fn load_metadata(&self) -> Result<Metadata> {
        let meta_path = self.metadata_path();
        let json = fs::read_to_string(&meta_path)
            .with_context(|| {
                format!("Cannot read metadata from '{}'", meta_path.display())
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed metadata in '{}'", meta_path.display()))
    }

    /// Rebuild the predictor from metadata, then restore its parameters.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(CharPredictor<B>, Metadata)> {
        let metadata = self.load_metadata()?;
        let vocab: Vocabulary = metadata.vocabulary()?;

        let model = PredictorConfig::new(metadata.receptive_field, metadata.dims, vocab.size())
            .init::<B>(device)
            .with_context(|| {
                format!("Metadata in '{}' describes an invalid model", self.metadata_path().display())
            })?;

        let record = DefaultRecorder::new()
            .load(self.model_path(), device)
            .with_context(|| {
                format!("Cannot load model from '{}'", self.model_path().display())
            })?;
        let model = model.load_record(record);

        let embedding = model.embedding.weight.val().dims();
        let projection = model.window_projection.weight.val().dims();
        ensure!(
            embedding == [vocab.size(), metadata.dims]
                && projection == [vocab.size(), metadata.dims, metadata.receptive_field],
            "Weights in '{}' do not match '{}': embedding {:?}, projection {:?}",
            self.model_path().display(),
            self.metadata_path().display(),
            embedding,
            projection
        );

        tracing::info!(
            "Loaded checkpoint '{}': receptive_field={}, dims={}, vocab={}",
            self.path.display(),
            metadata.receptive_field,
            metadata.dims,
            vocab.size()
        );
        Ok((model, metadata))
    }
}
