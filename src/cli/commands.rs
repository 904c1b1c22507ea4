// ============================================================
// Layer 1: CLI Arguments
// ============================================================
// Every flag of the single `charlm` command.
//
// clap's derive macros generate:
//   - help text (--help)
//   - errors for unknown flags and bad values (exit code 2)
//   - type conversion (string → usize, u64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::Args;
use crate::application::run_use_case::RunConfig;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Build a new model with a vocabulary derived from the corpus
    #[arg(long, conflicts_with = "load")]
    pub create: bool,

    /// Restore a model saved with --save
    #[arg(long, value_name = "PATH")]
    pub load: Option<String>,

    /// Save the model and its metadata after the run
    #[arg(long, value_name = "PATH")]
    pub save: Option<String>,

    /// Training corpus: sentences separated by "\n#SEP#\n"
    #[arg(long, value_name = "PATH")]
    pub train: Option<String>,

    /// Evaluation corpus, same format as --train
    #[arg(long, value_name = "PATH")]
    pub test: Option<String>,

    /// Number of full passes through the training corpus
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Symbols of context the model sees (--create only)
    #[arg(long, default_value_t = 128)]
    pub receptive_field: usize,

    /// Embedding width; must be divisible by the 4 attention heads (--create only)
    #[arg(long, default_value_t = 64)]
    pub dims: usize,

    /// Window/target pairs per optimisation step
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Seed for initialisation, shuffling and sampling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print up to N generated characters after the run
    #[arg(long, value_name = "N")]
    pub generate: Option<usize>,

    /// Sample from the distribution instead of taking the most likely symbol
    #[arg(long, requires = "generate")]
    pub sample: bool,

    /// Append per-epoch loss and perplexity to this CSV file
    #[arg(long, value_name = "PATH")]
    pub metrics: Option<String>,
}

/// The application layer never sees clap types.
impl From<RunArgs> for RunConfig {
    fn from(a: RunArgs) -> Self {
        RunConfig {
            create:          a.create,
            load:            a.load,
            save:            a.save,
            train:           a.train,
            test:            a.test,
            epochs:          a.epochs,
            receptive_field: a.receptive_field,
            dims:            a.dims,
            batch_size:      a.batch_size,
            seed:            a.seed,
            generate:        a.generate,
            sample:          a.sample,
            metrics:         a.metrics,
        }
    }
}
