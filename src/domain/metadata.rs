// ============================================================
// Layer 3: Checkpoint Metadata
// ============================================================
// The smallest description needed to rebuild a predictor and to
// re-index a corpus against it:
//
//   {
//     "alphabet":        ["<BOS>", "<EOS>", "<UNK>", "a", ...],
//     "receptive_field": 128,
//     "dims":            64
//   }
//
// The key names are part of the on-disk format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;
use super::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    /// Vocabulary symbols in index order
    pub alphabet: Vec<String>,

    /// Number of preceding symbols the predictor conditions on
    pub receptive_field: usize,

    /// Embedding dimensionality
    pub dims: usize,
}

impl Metadata {
    pub fn describe(vocab: &Vocabulary, receptive_field: usize, dims: usize) -> Self {
        Self {
            alphabet: vocab.symbols().iter().map(Symbol::to_string).collect(),
            receptive_field,
            dims,
        }
    }

    /// Rebuild the exact vocabulary the parameters were trained against.
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        let symbols = self
            .alphabet
            .iter()
            .map(|text| Symbol::parse(text))
            .collect::<Result<Vec<_>>>()
            .context("Invalid alphabet entry in metadata")?;
        Vocabulary::from_symbols(symbols).context("Invalid alphabet in metadata")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentence::Sentence;

    #[test]
    fn test_json_uses_fixed_keys() {
        let vocab = Vocabulary::derive(&[Sentence::from("ab")]);
        let meta  = Metadata::describe(&vocab, 2, 8);
        let json: serde_json::Value = serde_json::to_value(&meta).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["alphabet", "dims", "receptive_field"]);
        assert_eq!(json["alphabet"][0], "<BOS>");
        assert_eq!(json["alphabet"][3], "a");
    }

    #[test]
    fn test_vocabulary_round_trip() {
        let vocab = Vocabulary::derive(&[Sentence::from("hello, world")]);
        let meta  = Metadata::describe(&vocab, 4, 16);
        let json  = serde_json::to_string(&meta).unwrap();
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
        assert_eq!(back.vocabulary().unwrap(), vocab);
    }

    #[test]
    fn test_bad_alphabet_is_rejected() {
        let meta = Metadata {
            alphabet:        vec!["<BOS>".into(), "ab".into()],
            receptive_field: 2,
            dims:            8,
        };
        assert!(meta.vocabulary().is_err());
    }
}
