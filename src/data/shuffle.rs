// ============================================================
// Layer 4: Sentence Shuffler
// ============================================================
// Reorders a corpus at sentence granularity before each epoch.
//
// Only the order of sentences changes; the characters inside a
// sentence never move, because every window depends on the
// symbols that precede it.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom. The RNG
// is passed in so a fixed --seed reproduces the epoch order.
//
// Reference: rand crate documentation

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::sentence::Sentence;

/// Shuffle sentence order in place.
pub fn shuffle_sentences<R: Rng + ?Sized>(corpus: &mut [Sentence], rng: &mut R) {
    corpus.shuffle(rng);
    tracing::debug!("Shuffled {} sentences", corpus.len());
}
