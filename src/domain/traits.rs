// ============================================================
// Layer 3: Core Traits
// ============================================================
// Seams the application layer programs against, so the workflow
// does not care where a corpus comes from.

use anyhow::Result;

use crate::domain::sentence::Sentence;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that can produce an ordered corpus of sentences.
///
/// Implementations:
///   - CorpusFileLoader → a UTF-8 file split on `\n#SEP#\n`
pub trait CorpusSource {
    /// Load every sentence, in source order.
    fn load_all(&self) -> Result<Vec<Sentence>>;
}
