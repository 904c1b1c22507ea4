// ============================================================
// Layer 3: Sentence Domain Type
// ============================================================
// One corpus record as an ordered run of symbols.
//
// Positional access behaves as if the sentence were padded
// forever with <BOS> on the left and <EOS> on the right:
//
//   index:   -2     -1     0   1   2     3      4
//   symbol: <BOS>  <BOS>   c   a   b   <EOS>  <EOS>
//
// Windowing only ever materialises a finite left pad, but the
// virtual view is handy for generation and tests.

use super::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sentence {
    symbols: Vec<Symbol>,
}

impl Sentence {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Symbol at a possibly out-of-range position.
    pub fn at(&self, index: isize) -> Symbol {
        if index < 0 {
            return Symbol::Bos;
        }
        self.symbols
            .get(index as usize)
            .copied()
            .unwrap_or(Symbol::Eos)
    }
}

/// Every character of the text becomes one symbol. No tokenisation.
impl From<&str> for Sentence {
    fn from(text: &str) -> Self {
        Self::new(text.chars().map(Symbol::Char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_padding() {
        let s = Sentence::from("cab");
        assert_eq!(s.at(-5), Symbol::Bos);
        assert_eq!(s.at(-1), Symbol::Bos);
        assert_eq!(s.at(0), Symbol::Char('c'));
        assert_eq!(s.at(2), Symbol::Char('b'));
        assert_eq!(s.at(3), Symbol::Eos);
        assert_eq!(s.at(100), Symbol::Eos);
    }

    #[test]
    fn test_chars_not_bytes() {
        let s = Sentence::from("héllo");
        assert_eq!(s.len(), 5);
    }
}
