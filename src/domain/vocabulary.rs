// ============================================================
// Layer 3: Vocabulary
// ============================================================
// The symbol set of one model and its Symbol ↔ index mapping.
//
// Indices are positions in the sorted symbol list. Every learned
// parameter tied to the embedding table and the output layer is
// laid out by these indices, so a Vocabulary is built exactly
// once per model (derived at create time, or rebuilt verbatim
// from checkpoint metadata) and never grows afterwards.
//
// The three sentinels are always present, even for an empty
// corpus. Unknown symbols encode to <UNK>, so `encode` is total.

use std::collections::{BTreeSet, HashMap};

use anyhow::{bail, ensure, Result};

use super::sentence::Sentence;
use super::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    symbols: Vec<Symbol>,
    index:   HashMap<Symbol, usize>,
}

impl Vocabulary {
    /// Union every symbol in the corpus with the sentinels and sort.
    pub fn derive<'a>(corpus: impl IntoIterator<Item = &'a Sentence>) -> Self {
        let mut set: BTreeSet<Symbol> = Symbol::SENTINELS.into_iter().collect();
        for sentence in corpus {
            set.extend(sentence.symbols().iter().copied());
        }
        let symbols: Vec<Symbol> = set.into_iter().collect();
        tracing::debug!("Derived vocabulary of {} symbols", symbols.len());
        Self::indexed(symbols)
    }

    /// Rebuild a vocabulary from a persisted, already ordered list.
    ///
    /// The order is taken verbatim; it is not re-sorted. Fails if a
    /// symbol repeats or a sentinel is missing.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self> {
        let vocab = Self::indexed(symbols);
        if vocab.index.len() != vocab.symbols.len() {
            bail!(
                "vocabulary lists {} symbols but only {} are distinct",
                vocab.symbols.len(),
                vocab.index.len()
            );
        }
        for sentinel in Symbol::SENTINELS {
            ensure!(
                vocab.index.contains_key(&sentinel),
                "vocabulary is missing the {sentinel} sentinel"
            );
        }
        Ok(vocab)
    }

    fn indexed(symbols: Vec<Symbol>) -> Self {
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, i))
            .collect();
        Self { symbols, index }
    }

    /// Index of `symbol`, or of <UNK> when the symbol is unseen.
    pub fn encode(&self, symbol: Symbol) -> usize {
        match self.index.get(&symbol) {
            Some(&i) => i,
            None => self.unk_index(),
        }
    }

    pub fn decode(&self, index: usize) -> Option<Symbol> {
        self.symbols.get(index).copied()
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    // Sentinels are guaranteed present by both constructors.
    pub fn bos_index(&self) -> usize {
        self.index[&Symbol::Bos]
    }

    pub fn eos_index(&self) -> usize {
        self.index[&Symbol::Eos]
    }

    pub fn unk_index(&self) -> usize {
        self.index[&Symbol::Unk]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[&str]) -> Vec<Sentence> {
        texts.iter().map(|t| Sentence::from(*t)).collect()
    }

    #[test]
    fn test_empty_corpus_has_only_sentinels() {
        let vocab = Vocabulary::derive(&corpus(&[]));
        assert_eq!(vocab.size(), 3);
        assert_eq!(vocab.symbols(), &[Symbol::Bos, Symbol::Eos, Symbol::Unk]);
    }

    #[test]
    fn test_derive_sorts_and_indexes() {
        let vocab = Vocabulary::derive(&corpus(&["ab", "cab"]));
        assert_eq!(
            vocab.symbols(),
            &[
                Symbol::Bos,
                Symbol::Eos,
                Symbol::Unk,
                Symbol::Char('a'),
                Symbol::Char('b'),
                Symbol::Char('c'),
            ]
        );
        assert_eq!(vocab.encode(Symbol::Char('a')), 3);
        assert_eq!(vocab.encode(Symbol::Char('c')), 5);
    }

    #[test]
    fn test_encode_is_total() {
        let vocab = Vocabulary::derive(&corpus(&["hello"]));
        for c in ['h', 'z', '∑', '\0'] {
            assert!(vocab.encode(Symbol::Char(c)) < vocab.size());
        }
        assert_eq!(vocab.encode(Symbol::Char('z')), vocab.unk_index());
    }

    #[test]
    fn test_from_symbols_keeps_given_order() {
        let order = vec![Symbol::Char('z'), Symbol::Unk, Symbol::Eos, Symbol::Bos];
        let vocab = Vocabulary::from_symbols(order.clone()).unwrap();
        assert_eq!(vocab.symbols(), order.as_slice());
        assert_eq!(vocab.encode(Symbol::Char('z')), 0);
    }

    #[test]
    fn test_from_symbols_rejects_duplicates_and_missing_sentinels() {
        assert!(Vocabulary::from_symbols(vec![
            Symbol::Bos, Symbol::Eos, Symbol::Unk, Symbol::Char('a'), Symbol::Char('a'),
        ])
        .is_err());
        assert!(Vocabulary::from_symbols(vec![Symbol::Bos, Symbol::Eos]).is_err());
    }

    #[test]
    fn test_decode_inverts_encode() {
        let vocab = Vocabulary::derive(&corpus(&["xyz"]));
        for &s in vocab.symbols() {
            assert_eq!(vocab.decode(vocab.encode(s)), Some(s));
        }
        assert_eq!(vocab.decode(vocab.size()), None);
    }
}
