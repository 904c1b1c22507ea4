// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from a raw corpus file to tensor batches.
//
//   corpus file
//       │
//       ▼
//   CorpusFileLoader  → splits text on "\n#SEP#\n" into Sentences
//       │
//       ▼
//   shuffle_sentences → reorders sentences once per epoch
//       │
//       ▼
//   windows           → (window, target) pairs per sentence
//       │
//       ▼
//   sample_batches    → fixed-size groups, remainder dropped
//       │
//       ▼
//   WindowBatcher     → Int windows + one-hot float targets
//
// Every stage is a lazy iterator with fresh state per call, so a
// new epoch simply asks for a new batch sequence.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Reads a corpus file and splits it into sentences
pub mod loader;

/// Sentence-level shuffling between epochs
pub mod shuffle;

/// Sliding window/target pairs and fixed-size sample batches
pub mod windows;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
