// ============================================================
// Layer 3: Symbol Domain Type
// ============================================================
// The unit the model reads and predicts: either one character
// or one of three reserved sentinels.
//
//   <BOS>  beginning of sequence (left padding of every window)
//   <EOS>  end of sequence (the last target of every sentence)
//   <UNK>  anything the vocabulary has never seen
//
// Symbols sort by their textual form, byte-wise. That is the
// order the vocabulary uses when it assigns indices, so it must
// never change once checkpoints exist.

use std::cmp::Ordering;
use std::fmt;

use anyhow::{bail, Result};

pub const BOS_TEXT: &str = "<BOS>";
pub const EOS_TEXT: &str = "<EOS>";
pub const UNK_TEXT: &str = "<UNK>";

/// A single character or a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Bos,
    Eos,
    Unk,
    Char(char),
}

impl Symbol {
    /// The three sentinels, in no particular order.
    pub const SENTINELS: [Symbol; 3] = [Symbol::Bos, Symbol::Eos, Symbol::Unk];

    /// Run `f` against the textual form without allocating.
    fn with_text<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        match self {
            Symbol::Bos => f(BOS_TEXT),
            Symbol::Eos => f(EOS_TEXT),
            Symbol::Unk => f(UNK_TEXT),
            Symbol::Char(c) => {
                let mut buf = [0u8; 4];
                f(c.encode_utf8(&mut buf))
            }
        }
    }

    /// Parse the textual form written into checkpoint metadata.
    ///
    /// Accepts the three sentinel names or a string of exactly one
    /// character. A literal `<` is therefore `Char('<')`, never a sentinel.
    pub fn parse(text: &str) -> Result<Self> {
        match text {
            BOS_TEXT => Ok(Symbol::Bos),
            EOS_TEXT => Ok(Symbol::Eos),
            UNK_TEXT => Ok(Symbol::Unk),
            _ => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Symbol::Char(c)),
                    _ => bail!("'{text}' is neither a sentinel nor a single character"),
                }
            }
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_text(|s| f.write_str(s))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.with_text(|a| other.with_text(|b| a.cmp(b)))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_sort_by_text() {
        let mut symbols = vec![
            Symbol::Char('a'),
            Symbol::Unk,
            Symbol::Char('<'),
            Symbol::Eos,
            Symbol::Bos,
            Symbol::Char('A'),
        ];
        symbols.sort();
        // '<' (0x3C) sorts before 'A' (0x41) and 'a' (0x61);
        // the bare '<' is a prefix of every sentinel, so it comes first.
        assert_eq!(
            symbols,
            vec![
                Symbol::Char('<'),
                Symbol::Bos,
                Symbol::Eos,
                Symbol::Unk,
                Symbol::Char('A'),
                Symbol::Char('a'),
            ]
        );
    }

    #[test]
    fn test_parse_round_trips_display() {
        for s in [Symbol::Bos, Symbol::Eos, Symbol::Unk, Symbol::Char('é'), Symbol::Char('\n')] {
            assert_eq!(Symbol::parse(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_parse_rejects_multi_char_text() {
        assert!(Symbol::parse("ab").is_err());
        assert!(Symbol::parse("").is_err());
    }
}
