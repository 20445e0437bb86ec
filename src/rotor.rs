//! Rotor: a wired permutation turned to some rotational offset.
//!
//! The three kinds of rotor (reflector, fixed, moving) share one
//! [`Rotor`] record and differ only in their [`RotorKind`] tag, so stepping
//! decisions are made with a `match` rather than through dynamic dispatch.
//!
//! Rotors live in a [`RotorArena`] owned by the machine and are addressed
//! by [`RotorId`]. Inserting rotors into slots selects ids; the arena stays
//! the single owner of every rotor's position.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Unique identifier for a rotor within an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Behavioral variant of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Occupies slot 0, never moves, turns the signal around.
    Reflector,
    /// Sits in a slot but is never driven by a pawl.
    Fixed,
    /// Advanced by the stepping mechanism; `notches` holds the positions
    /// at which it lets the pawl to its left engage.
    Moving { notches: Vec<usize> },
}

/// A rotor: name, wiring, current position and variant.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    position: usize,
    kind: RotorKind,
}

impl Rotor {
    /// Creates a reflector.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ReflectorNotDerangement`] if the wiring maps
    /// some symbol to itself: a reflector must send every contact elsewhere.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Result<Self> {
        let name = name.into();
        if !permutation.derangement() {
            return Err(EnigmaError::ReflectorNotDerangement(name));
        }
        Ok(Self::build(name, permutation, RotorKind::Reflector))
    }

    /// Creates a rotor that sits in its slot without ever advancing.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), permutation, RotorKind::Fixed)
    }

    /// Creates a moving rotor with notches at the symbols of `notches`.
    ///
    /// # Errors
    /// - [`EnigmaError::SymbolNotFound`] if a notch is not in the alphabet.
    /// - [`EnigmaError::DuplicateSymbol`] if a notch is listed twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", &alpha).unwrap();
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    /// rotor.set_char('Q').unwrap();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = permutation.alphabet();
        let mut indices = Vec::with_capacity(notches.len());
        for ch in notches.chars() {
            let index = alphabet.to_index(ch)?;
            if indices.contains(&index) {
                return Err(EnigmaError::DuplicateSymbol(ch));
            }
            indices.push(index);
        }
        Ok(Self::build(
            name.into(),
            permutation,
            RotorKind::Moving { notches: indices },
        ))
    }

    fn build(name: String, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name,
            permutation,
            position: 0,
            kind,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's variant.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring permutation.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet the wiring is built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the size of the alphabet.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns the current position, in `[0, size)`.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True only for reflectors.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// True only for moving rotors.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True if this is a moving rotor currently at one of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.position),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Sets the position to `posn`.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] unless `posn < size()`.
    /// - [`EnigmaError::ReflectorPosition`] for a non-zero reflector position.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::ReflectorPosition(self.name.clone()));
        }
        self.position = posn;
        Ok(())
    }

    /// Sets the position to the index of symbol `ch`.
    ///
    /// # Errors
    /// As [`set`](Self::set), plus [`EnigmaError::SymbolNotFound`].
    pub fn set_char(&mut self, ch: char) -> Result<()> {
        let posn = self.alphabet().to_index(ch)?;
        self.set(posn)
    }

    /// Passes contact `p` right-to-left through the wiring at the current offset.
    pub fn convert_forward(&self, p: usize) -> usize {
        let offset = self.position as i64;
        let out = self.permutation.permute(p as i64 + offset);
        self.permutation.wrap(out as i64 - offset)
    }

    /// Passes contact `e` left-to-right through the inverse wiring.
    pub fn convert_backward(&self, e: usize) -> usize {
        let offset = self.position as i64;
        let out = self.permutation.invert(e as i64 + offset);
        self.permutation.wrap(out as i64 - offset)
    }

    /// Advances a moving rotor one position. Other kinds never move and
    /// are left untouched.
    pub fn advance(&mut self) {
        if let RotorKind::Moving { .. } = self.kind {
            self.position = self.permutation.wrap(self.position as i64 + 1);
        }
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            RotorKind::Reflector => "reflector",
            RotorKind::Fixed => "fixed",
            RotorKind::Moving { .. } => "moving",
        };
        write!(f, "{} ({}) {}", self.name, tag, self.permutation)
    }
}

/// Inventory of rotors addressed by [`RotorId`] and looked up by name.
///
/// Stores every rotor in a contiguous `Vec`; slots in the machine hold ids
/// into it rather than references.
#[derive(Debug, Clone, Default)]
pub struct RotorArena {
    rotors: Vec<Rotor>,
    names: HashMap<String, RotorId>,
}

impl RotorArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty arena with room for `capacity` rotors.
    pub fn with_capacity(capacity: usize) -> Self {
        RotorArena {
            rotors: Vec::with_capacity(capacity),
            names: HashMap::with_capacity(capacity),
        }
    }

    /// Adds `rotor` to the arena.
    ///
    /// # Errors
    /// Returns [`EnigmaError::DuplicateRotor`] if the name is already taken.
    pub fn insert(&mut self, rotor: Rotor) -> Result<RotorId> {
        if self.names.contains_key(rotor.name()) {
            return Err(EnigmaError::DuplicateRotor(rotor.name().to_string()));
        }
        let id = RotorId(self.rotors.len());
        self.names.insert(rotor.name().to_string(), id);
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Returns the number of rotors in the arena.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the arena holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Resolves a rotor name.
    ///
    /// # Errors
    /// Returns [`EnigmaError::UnknownRotor`] if no rotor has that name.
    pub fn lookup(&self, name: &str) -> Result<RotorId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))
    }

    /// Returns the rotor behind `id`.
    pub fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Returns the rotor behind `id` for mutation.
    pub(crate) fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Iterates over all rotors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }
}
