//! Permutation: a bijection on alphabet indices written in cycle notation.
//!
//! Cycle strings have the form `"(ABC) (DE)"`: every symbol maps to the
//! next one in its group, the last wraps to the first. Symbols that no
//! cycle mentions are fixed points. Whitespace is insignificant, inside
//! groups as well as between them.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A permutation of the indices of an [`Alphabet`].
///
/// The parsed cycles are kept for [`derangement`](Self::derangement) and
/// display; lookups go through the forward and inverse tables built from
/// them at construction.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` against `alphabet`.
    ///
    /// An empty (or all-whitespace) string yields the identity.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycles`] for unbalanced or nested
    ///   parentheses, an empty group `()`, or a symbol outside any group.
    /// - [`EnigmaError::SymbolNotFound`] for a symbol not in `alphabet`.
    /// - [`EnigmaError::DuplicateCycleSymbol`] if a symbol is named twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCDE").unwrap());
    /// let perm = Permutation::new("(BACD)", &alpha).unwrap();
    /// assert_eq!(perm.permute_char('A').unwrap(), 'C');
    /// assert_eq!(perm.permute(0), 2);
    /// assert_eq!(perm.invert(2), 0);
    /// ```
    pub fn new(cycles: &str, alphabet: &Arc<Alphabet>) -> Result<Self> {
        let parsed = parse_cycles(cycles, alphabet)?;
        Ok(Self::from_cycles(parsed, Arc::clone(alphabet)))
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: &Arc<Alphabet>) -> Self {
        Self::from_cycles(Vec::new(), Arc::clone(alphabet))
    }

    fn from_cycles(cycles: Vec<Vec<usize>>, alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();
        for cycle in &cycles {
            let len = cycle.len();
            for (k, &from) in cycle.iter().enumerate() {
                let to = cycle[(k + 1) % len];
                forward[from] = to;
                inverse[to] = from;
            }
        }
        Permutation {
            alphabet,
            cycles,
            forward,
            inverse,
        }
    }

    /// Returns the size of the alphabet this permutes.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Returns the alphabet this permutation was built against.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Reduces `p` modulo the alphabet size into `[0, size)`.
    ///
    /// Negative inputs wrap from the top: `wrap(-1) == size - 1`.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Applies the permutation to `p` taken modulo the alphabet size.
    pub fn permute(&self, p: i64) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse permutation to `c` taken modulo the alphabet size.
    pub fn invert(&self, c: i64) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Applies the permutation to the symbol `p`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_index(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Applies the inverse permutation to the symbol `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_index(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// Returns true iff the cycles cover the whole alphabet and none of
    /// them has length 1, i.e. no symbol maps to itself.
    pub fn derangement(&self) -> bool {
        let covered: usize = self.cycles.iter().map(Vec::len).sum();
        covered == self.size() && self.cycles.iter().all(|c| c.len() > 1)
    }

    /// Returns true if this is the identity mapping.
    pub fn is_identity(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &j)| i == j)
    }
}

impl fmt::Display for Permutation {
    /// Writes the cycles back out in notation form, `(ABC) (DE)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, cycle) in self.cycles.iter().enumerate() {
            if k > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for &index in cycle {
                let ch = self.alphabet.to_char(index).map_err(|_| fmt::Error)?;
                write!(f, "{}", ch)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Tokenizes cycle notation into groups of alphabet indices.
///
/// Grammar: `cycles := ( '(' symbol+ ')' )*`, with whitespace ignored
/// everywhere.
fn parse_cycles(cycles: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>> {
    let malformed = |reason: &str| EnigmaError::MalformedCycles {
        cycles: cycles.to_string(),
        reason: reason.to_string(),
    };

    let mut seen = vec![false; alphabet.size()];
    let mut groups = Vec::new();
    let mut current: Option<Vec<usize>> = None;

    for ch in cycles.chars().filter(|c| !c.is_whitespace()) {
        if ch == '(' {
            if current.is_some() {
                return Err(malformed("nested '('"));
            }
            current = Some(Vec::new());
        } else if ch == ')' {
            let group = current.take().ok_or_else(|| malformed("unmatched ')'"))?;
            if group.is_empty() {
                return Err(malformed("empty cycle"));
            }
            groups.push(group);
        } else {
            let group = current
                .as_mut()
                .ok_or_else(|| malformed("symbol outside a cycle"))?;
            let index = alphabet.to_index(ch)?;
            if seen[index] {
                return Err(EnigmaError::DuplicateCycleSymbol(ch));
            }
            seen[index] = true;
            group.push(index);
        }
    }
    if current.is_some() {
        return Err(malformed("unclosed '('"));
    }
    Ok(groups)
}
