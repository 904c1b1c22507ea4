// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Records per-epoch loss and perplexity to a CSV file.
//
// Columns:
//   epoch, train_loss, train_perplexity, test_loss, test_perplexity
//
// A phase that did not run (no --train or no --test corpus) is
// written as empty cells, so every row has the same shape.
//
// Example CSV output:
//   epoch,train_loss,train_perplexity,test_loss,test_perplexity
//   1,3.124500,8.920000,3.089200,8.700000
//   2,2.890100,7.410000,,
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::ml::trainer::PassStats;

const HEADER: &str = "epoch,train_loss,train_perplexity,test_loss,test_perplexity";

/// One row of metrics for a single epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Training pass, if a training corpus was given
    pub train: Option<PassStats>,

    /// Evaluation pass, if a test corpus was given
    pub test: Option<PassStats>,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train: Option<PassStats>, test: Option<PassStats>) -> Self {
        Self { epoch, train, test }
    }

    /// One-line human summary for the console.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(t) = &self.train {
            parts.push(format!("train_loss={:.4} | train_ppl={:.4}", t.loss, t.perplexity));
        }
        if let Some(t) = &self.test {
            parts.push(format!("test_loss={:.4} | test_ppl={:.4}", t.loss, t.perplexity));
        }
        parts.join(" | ")
    }

    fn csv_row(&self) -> String {
        let cells = |stats: &Option<PassStats>| match stats {
            Some(s) => format!("{:.6},{:.6}", s.loss, s.perplexity),
            None    => ",".to_string(),
        };
        format!("{},{},{}", self.epoch, cells(&self.train), cells(&self.test))
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the header only if the file does not exist yet,
    /// so repeated runs append to one log.
    pub fn new(csv_path: impl AsRef<Path>) -> Result<Self> {
        let csv_path = csv_path.as_ref().to_path_buf();

        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create metrics file '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open metrics file '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.csv_row())?;

        tracing::debug!("Logged epoch {} metrics", m.epoch);
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
