// ============================================================
// Layer 4: Corpus Loader
// ============================================================
// Reads a UTF-8 corpus file and splits it into sentences on the
// literal delimiter "\n#SEP#\n".
//
//   "ab\n#SEP#\ncab"  →  ["ab", "cab"]
//
// Each piece between delimiters becomes one Sentence of its raw
// characters. Nothing is trimmed or normalised: newlines inside a
// sentence are ordinary symbols the model has to learn.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::sentence::Sentence;
use crate::domain::traits::CorpusSource;

/// Separator between sentences in a corpus file.
pub const SENTENCE_DELIMITER: &str = "\n#SEP#\n";

/// Loads one corpus file.
/// Implements the CorpusSource trait from Layer 3.
pub struct CorpusFileLoader {
    path: PathBuf,
}

impl CorpusFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CorpusFileLoader {
    fn load_all(&self) -> Result<Vec<Sentence>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let sentences = split_sentences(&text);
        let empty = sentences.iter().filter(|s| s.is_empty()).count();
        tracing::info!(
            "Loaded {} sentences from '{}' ({} empty)",
            sentences.len(),
            self.path.display(),
            empty
        );
        Ok(sentences)
    }
}

/// Split raw corpus text into sentences.
///
/// Behaves like a plain string split: text without the delimiter is
/// one sentence, and an empty text is one empty sentence.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    text.split(SENTENCE_DELIMITER).map(Sentence::from).collect()
}
