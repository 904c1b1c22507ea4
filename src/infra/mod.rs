// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Persistence that other layers call into:
//
//   checkpoint.rs  Saving and loading a predictor.
//                  Burn's DefaultRecorder writes `<path>.mpk`;
//                  a JSON sidecar holds the alphabet, receptive
//                  field and embedding width, which are needed to
//                  rebuild the model before restoring parameters.
//
//   metrics.rs     Per-epoch loss and perplexity as CSV rows
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
