// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands a RunConfig to
// Layer 2. One invocation can create or load a model, train and
// evaluate it, save it and generate from it:
//
//   charlm --create --train train.txt --test test.txt \
//          --epochs 10 --save out
//   charlm --load out --test test.txt --generate 200
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::RunArgs;

use crate::application::run_use_case::RunUseCase;

#[derive(Parser, Debug)]
#[command(
    name = "charlm",
    version,
    about = "Train and evaluate a character-level attention language model."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let report = RunUseCase::new(self.args.into()).execute()?;
        tracing::debug!("Run finished after {} epoch(s)", report.history.len());
        Ok(())
    }
}
