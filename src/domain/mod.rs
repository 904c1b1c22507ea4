// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust types describing what the system works on:
// symbols, sentences, the vocabulary and checkpoint metadata.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A character or one of the <BOS>/<EOS>/<UNK> sentinels
pub mod symbol;

// One corpus record with virtual BOS/EOS padding
pub mod sentence;

// Immutable Symbol ↔ index mapping shared by every component
pub mod vocabulary;

// Architecture description persisted next to model weights
pub mod metadata;

// Core abstractions (traits) that other layers implement
pub mod traits;
