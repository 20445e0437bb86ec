//! Alphabet: ordered, duplicate-free set of symbols.
//!
//! Provides the bijection between symbols and zero-based indices that
//! every [`Permutation`](crate::Permutation) and [`Rotor`](crate::Rotor)
//! is built against.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EnigmaError, Result};

/// Symbols of the default alphabet.
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of encodable symbols.
///
/// The K-th symbol has index K. Immutable after construction; share it
/// through an `Arc` between permutations, rotors and the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Alphabet {
    /// Creates an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    /// - [`EnigmaError::EmptyAlphabet`] if `chars` is empty.
    /// - [`EnigmaError::DuplicateSymbol`] if a character repeats.
    /// - [`EnigmaError::ReservedSymbol`] for parentheses or whitespace,
    ///   which cycle notation cannot name.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCDE").unwrap();
    /// assert_eq!(alpha.size(), 5);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols = Vec::with_capacity(chars.len());
        let mut indices = HashMap::with_capacity(chars.len());
        for ch in chars.chars() {
            if ch == '(' || ch == ')' || ch.is_whitespace() {
                return Err(EnigmaError::ReservedSymbol(ch));
            }
            if indices.insert(ch, symbols.len()).is_some() {
                return Err(EnigmaError::DuplicateSymbol(ch));
            }
            symbols.push(ch);
        }
        if symbols.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        Ok(Alphabet { symbols, indices })
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `ch` is in this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.indices.contains_key(&ch)
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] unless `index < size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `ch` is absent.
    pub fn to_index(&self, ch: char) -> Result<usize> {
        self.indices
            .get(&ch)
            .copied()
            .ok_or(EnigmaError::SymbolNotFound(ch))
    }

    /// Iterates over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl Default for Alphabet {
    /// The upper-case Latin alphabet `A..Z`.
    fn default() -> Self {
        let symbols: Vec<char> = UPPER.chars().collect();
        let indices = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, indices }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.symbols {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
