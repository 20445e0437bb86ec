//! Machine: rotor slots, plugboard and the advance-then-convert cycle.
//!
//! Every symbol first steps the rotors (odometer motion with pawl-driven
//! double stepping), then travels plugboard → rotors right-to-left →
//! reflector → rotors left-to-right → plugboard.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::config::Setting;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorArena, RotorId};

/// A complete rotor machine.
///
/// # Architecture
///
/// The machine owns a [`RotorArena`] holding every available rotor.
/// [`insert_rotors`](Self::insert_rotors) fills the slots with ids into
/// that arena; slot 0 is always a reflector. Positions belong to the
/// arena's rotors and change only through this type.
///
/// A machine is a single sequential stream: each symbol's encoding depends
/// on every symbol converted before it. Use one machine per message stream.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    arena: RotorArena,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `pawls` pawls, able to
    /// use any of `rotors`.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidMachineShape`] unless `1 < num_rotors` and
    ///   `pawls < num_rotors`.
    /// - [`EnigmaError::AlphabetMismatch`] if a rotor uses another alphabet.
    /// - [`EnigmaError::DuplicateRotor`] if two rotors share a name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let rotors = vec![
    ///     Rotor::reflector("R", Permutation::new("(AC) (BD)", &alpha).unwrap()).unwrap(),
    ///     Rotor::moving("M", Permutation::new("(ABCD)", &alpha).unwrap(), "A").unwrap(),
    /// ];
    /// let mut machine = Machine::new(Arc::clone(&alpha), 2, 1, rotors).unwrap();
    /// machine.insert_rotors(&["R", "M"]).unwrap();
    /// machine.set_rotors("A").unwrap();
    ///
    /// let cipher = machine.convert("ABCD").unwrap();
    /// assert_eq!(cipher.len(), 4);
    /// ```
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        rotors: Vec<Rotor>,
    ) -> Result<Self> {
        if num_rotors < 2 || pawls >= num_rotors {
            return Err(EnigmaError::InvalidMachineShape { num_rotors, pawls });
        }
        let mut arena = RotorArena::with_capacity(rotors.len());
        for rotor in rotors {
            if rotor.alphabet().as_ref() != alphabet.as_ref() {
                return Err(EnigmaError::AlphabetMismatch);
            }
            arena.insert(rotor)?;
        }
        debug!(
            alphabet = %alphabet,
            num_rotors,
            pawls,
            available = arena.len(),
            "machine constructed"
        );
        let plugboard = Permutation::identity(&alphabet);
        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            arena,
            slots: Vec::with_capacity(num_rotors),
            plugboard,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the machine alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the inventory of available rotors.
    pub fn available_rotors(&self) -> &RotorArena {
        &self.arena
    }

    /// Returns the current plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the rotor in slot `k`, if the slots are filled.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k).map(|&id| self.arena.get(id))
    }

    /// Fills the slots with the rotors named by `names`; `names[0]` must be
    /// a reflector. Inserted rotors start at position 0.
    ///
    /// The slots are only replaced once every name has been validated.
    ///
    /// # Errors
    /// - [`EnigmaError::RotorCount`] unless there is one name per slot.
    /// - [`EnigmaError::DuplicateRotor`] if a name repeats; checked before
    ///   any name is looked up.
    /// - [`EnigmaError::UnknownRotor`] for a name not in the inventory.
    /// - [`EnigmaError::MissingReflector`] if slot 0 is not a reflector.
    /// - [`EnigmaError::MisplacedReflector`] if a reflector sits elsewhere.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::RotorCount {
                expected: self.num_rotors,
                found: names.len(),
            });
        }
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(name) = names.iter().map(AsRef::as_ref).find(|&n| !seen.insert(n)) {
            return Err(EnigmaError::DuplicateRotor(name.to_string()));
        }
        let mut slots = Vec::with_capacity(names.len());
        for (slot, name) in names.iter().map(AsRef::as_ref).enumerate() {
            let id = self.arena.lookup(name)?;
            let reflecting = self.arena.get(id).reflecting();
            if slot == 0 && !reflecting {
                return Err(EnigmaError::MissingReflector(name.to_string()));
            }
            if slot > 0 && reflecting {
                return Err(EnigmaError::MisplacedReflector {
                    name: name.to_string(),
                    slot,
                });
            }
            slots.push(id);
        }
        for &id in &slots {
            self.arena.get_mut(id).set(0)?;
        }
        self.slots = slots;
        let inserted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        debug!(rotors = ?inserted, "rotors inserted");
        Ok(())
    }

    /// Sets the positions of the non-reflector slots, leftmost first, from
    /// the symbols of `setting`.
    ///
    /// # Errors
    /// - [`EnigmaError::NotSetUp`] before [`insert_rotors`](Self::insert_rotors).
    /// - [`EnigmaError::SettingLength`] unless `setting` has
    ///   `num_rotors() - 1` symbols.
    /// - [`EnigmaError::SymbolNotFound`] for a symbol outside the alphabet.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        if self.slots.is_empty() {
            return Err(EnigmaError::NotSetUp);
        }
        let found = setting.chars().count();
        if found != self.num_rotors - 1 {
            return Err(EnigmaError::SettingLength {
                expected: self.num_rotors - 1,
                found,
            });
        }
        let positions = setting
            .chars()
            .map(|ch| self.alphabet.to_index(ch))
            .collect::<Result<Vec<_>>>()?;
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            self.arena.get_mut(id).set(posn)?;
        }
        debug!(setting, "rotor positions set");
        Ok(())
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] if `plugboard` was built
    /// over another alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if plugboard.alphabet().as_ref() != self.alphabet.as_ref() {
            return Err(EnigmaError::AlphabetMismatch);
        }
        debug!(plugboard = %plugboard, "plugboard set");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Applies a parsed setting line: rotors, positions, then plugboard.
    ///
    /// # Errors
    /// Any error of [`insert_rotors`](Self::insert_rotors),
    /// [`set_rotors`](Self::set_rotors) or of parsing the plugboard cycles.
    pub fn apply_setting(&mut self, setting: &Setting) -> Result<()> {
        self.insert_rotors(setting.rotors())?;
        self.set_rotors(setting.positions())?;
        let plugboard = Permutation::new(setting.plugboard(), &self.alphabet)?;
        self.set_plugboard(plugboard)
    }

    /// Returns the positions of the non-reflector slots as symbols,
    /// leftmost first, or `None` before rotors are inserted.
    pub fn positions(&self) -> Option<String> {
        if self.slots.is_empty() {
            return None;
        }
        self.slots[1..]
            .iter()
            .map(|&id| self.alphabet.to_char(self.arena.get(id).position()).ok())
            .collect()
    }

    /// Advances the machine one tick, then converts symbol index `c`.
    ///
    /// # Errors
    /// - [`EnigmaError::NotSetUp`] before [`insert_rotors`](Self::insert_rotors).
    /// - [`EnigmaError::IndexOutOfRange`] unless `c < alphabet().size()`.
    pub fn convert_index(&mut self, c: usize) -> Result<usize> {
        if self.slots.is_empty() {
            return Err(EnigmaError::NotSetUp);
        }
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        self.advance_rotors();
        Ok(self.route(c))
    }

    /// Converts every symbol of `msg` in order, carrying rotor state across
    /// the whole message.
    ///
    /// # Errors
    /// - [`EnigmaError::NotSetUp`] before [`insert_rotors`](Self::insert_rotors).
    /// - [`EnigmaError::SymbolNotFound`] for a symbol outside the alphabet;
    ///   rotors have already stepped for the symbols before it.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::MachineConfig;
    ///
    /// let config = MachineConfig::parse(
    ///     "ABCD 3 2 R R (AC) (BD) X MA (AB) Y MB (BCD)",
    /// ).unwrap();
    /// let mut encoder = config.build().unwrap();
    /// encoder.insert_rotors(&["R", "X", "Y"]).unwrap();
    /// encoder.set_rotors("AB").unwrap();
    /// let cipher = encoder.convert("ABCDDCBA").unwrap();
    ///
    /// encoder.insert_rotors(&["R", "X", "Y"]).unwrap();
    /// encoder.set_rotors("AB").unwrap();
    /// assert_eq!(encoder.convert(&cipher).unwrap(), "ABCDDCBA");
    /// ```
    pub fn convert(&mut self, msg: &str) -> Result<String> {
        if self.slots.is_empty() {
            return Err(EnigmaError::NotSetUp);
        }
        let mut out = String::with_capacity(msg.len());
        for ch in msg.chars() {
            let index = self.alphabet.to_index(ch)?;
            let result = self.convert_index(index)?;
            out.push(self.alphabet.to_char(result)?);
        }
        Ok(out)
    }

    // ──────── Stepping ────────

    /// Advances the rotors for one tick.
    ///
    /// The rightmost slot always steps. Pawl `k` engages when rotor `k`
    /// moves and rotor `k + 1` sits at a notch; an engaged pawl steps both
    /// rotors. The set of stepping slots is decided from the positions
    /// before any rotor moves, and each rotor steps at most once.
    fn advance_rotors(&mut self) {
        let n = self.slots.len();
        let mut step = vec![false; n];
        step[n - 1] = true;
        for k in 0..n - 1 {
            let left = self.arena.get(self.slots[k]);
            let right = self.arena.get(self.slots[k + 1]);
            if left.rotates() && right.at_notch() {
                step[k] = true;
                step[k + 1] = true;
            }
        }
        for (k, &id) in self.slots.iter().enumerate() {
            if step[k] {
                self.arena.get_mut(id).advance();
            }
        }
        trace!(positions = ?self.positions(), "rotors advanced");
    }

    // ──────── Signal path ────────

    /// Routes index `c` through plugboard, rotors and reflector at the
    /// current positions.
    fn route(&self, c: usize) -> usize {
        let mut signal = self.plugboard.permute(c as i64);
        for &id in self.slots.iter().rev() {
            signal = self.arena.get(id).convert_forward(signal);
        }
        for &id in &self.slots[1..] {
            signal = self.arena.get(id).convert_backward(signal);
        }
        self.plugboard.invert(signal as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reflector and three moving rotors over `ABCD`, notch at `B` on the
    /// two right rotors, identity-free wirings.
    fn small_machine() -> Machine {
        let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
        let perm = |c: &str| Permutation::new(c, &alpha).unwrap();
        let rotors = vec![
            Rotor::reflector("R", perm("(AB) (CD)")).unwrap(),
            Rotor::moving("L", perm("(ABCD)"), "A").unwrap(),
            Rotor::moving("M", perm("(AC) (BD)"), "B").unwrap(),
            Rotor::moving("F", perm("(ADCB)"), "B").unwrap(),
            Rotor::fixed("N", perm("(AD)")),
        ];
        Machine::new(alpha, 4, 3, rotors).unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let alpha = Arc::new(Alphabet::default());
        assert_eq!(
            Machine::new(Arc::clone(&alpha), 1, 0, Vec::new()).unwrap_err(),
            EnigmaError::InvalidMachineShape {
                num_rotors: 1,
                pawls: 0
            }
        );
        assert_eq!(
            Machine::new(alpha, 3, 3, Vec::new()).unwrap_err(),
            EnigmaError::InvalidMachineShape {
                num_rotors: 3,
                pawls: 3
            }
        );
    }

    #[test]
    fn test_alphabet_mismatch() {
        let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
        let other = Arc::new(Alphabet::new("ABCE").unwrap());
        let rotor = Rotor::fixed("N", Permutation::identity(&other));
        assert_eq!(
            Machine::new(alpha, 2, 1, vec![rotor]).unwrap_err(),
            EnigmaError::AlphabetMismatch
        );

        let mut machine = small_machine();
        assert_eq!(
            machine.set_plugboard(Permutation::identity(&other)),
            Err(EnigmaError::AlphabetMismatch)
        );
    }

    #[test]
    fn test_equal_alphabets_from_different_arcs() {
        let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
        let twin = Arc::new(Alphabet::new("ABCD").unwrap());
        let rotor = Rotor::fixed("N", Permutation::identity(&twin));
        assert!(Machine::new(alpha, 2, 1, vec![rotor]).is_ok());
    }

    #[test]
    fn test_insert_rotors_errors() {
        let mut machine = small_machine();
        assert_eq!(
            machine.insert_rotors(&["R", "L", "M"]),
            Err(EnigmaError::RotorCount {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            machine.insert_rotors(&["R", "L", "Q", "F"]),
            Err(EnigmaError::UnknownRotor("Q".to_string()))
        );
        assert_eq!(
            machine.insert_rotors(&["L", "R", "M", "F"]),
            Err(EnigmaError::MissingReflector("L".to_string()))
        );
        assert_eq!(
            machine.insert_rotors(&["R", "L", "L", "F"]),
            Err(EnigmaError::DuplicateRotor("L".to_string()))
        );
    }

    #[test]
    fn test_duplicate_reported_before_unknown_name() {
        let mut machine = small_machine();
        assert_eq!(
            machine.insert_rotors(&["R", "Q", "L", "L"]),
            Err(EnigmaError::DuplicateRotor("L".to_string()))
        );
        assert_eq!(
            machine.insert_rotors(&["L", "M", "M", "F"]),
            Err(EnigmaError::DuplicateRotor("M".to_string()))
        );
    }

    #[test]
    fn test_failed_insert_keeps_previous_slots() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        assert!(machine.insert_rotors(&["R", "N", "Q", "F"]).is_err());
        assert_eq!(machine.rotor(1).map(Rotor::name), Some("L"));
    }

    #[test]
    fn test_set_rotors() {
        let mut machine = small_machine();
        assert_eq!(machine.set_rotors("ABC"), Err(EnigmaError::NotSetUp));
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        assert_eq!(machine.positions().as_deref(), Some("AAA"));
        machine.set_rotors("BCD").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("BCD"));
        assert_eq!(
            machine.set_rotors("BC"),
            Err(EnigmaError::SettingLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            machine.set_rotors("BCE"),
            Err(EnigmaError::SymbolNotFound('E'))
        );
        // A rejected setting leaves the positions untouched.
        assert_eq!(machine.positions().as_deref(), Some("BCD"));
    }

    #[test]
    fn test_reinsert_resets_positions() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("DDD").unwrap();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        assert_eq!(machine.positions().as_deref(), Some("AAA"));
    }

    #[test]
    fn test_convert_before_setup() {
        let mut machine = small_machine();
        assert_eq!(machine.convert("A"), Err(EnigmaError::NotSetUp));
        assert_eq!(machine.convert_index(0), Err(EnigmaError::NotSetUp));
        assert_eq!(machine.positions(), None);
    }

    #[test]
    fn test_rightmost_always_steps() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("AAC").unwrap();
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("AAD"));
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("AAA"));
    }

    #[test]
    fn test_notch_carries_and_double_steps() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        // F at notch B drives M: M and F step together.
        machine.set_rotors("AAB").unwrap();
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("ABC"));
        // M now at its notch B: L and M step, M double-steps.
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("BCD"));
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("BCA"));
    }

    #[test]
    fn test_both_pawls_engage_in_one_tick() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        // M at B and F at B: every rotor steps exactly once.
        machine.set_rotors("ABB").unwrap();
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("BCC"));
    }

    #[test]
    fn test_fixed_rotor_blocks_pawl() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "N", "M", "F"]).unwrap();
        machine.set_rotors("AAB").unwrap();
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("ABC"));
        // M at its notch, but N does not rotate: only F steps.
        machine.convert("A").unwrap();
        assert_eq!(machine.positions().as_deref(), Some("ABD"));
    }

    #[test]
    fn test_empty_message_leaves_state() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("CBA").unwrap();
        assert_eq!(machine.convert(""), Ok(String::new()));
        assert_eq!(machine.positions().as_deref(), Some("CBA"));
    }

    #[test]
    fn test_convert_is_self_inverse() {
        let mut machine = small_machine();
        let plug = Permutation::new("(AD)", machine.alphabet()).unwrap();
        let msg = "ABCDABCDDCBAAAAABBBB";

        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("DAB").unwrap();
        machine.set_plugboard(plug.clone()).unwrap();
        let cipher = machine.convert(msg).unwrap();
        assert_eq!(cipher.len(), msg.len());

        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("DAB").unwrap();
        machine.set_plugboard(plug).unwrap();
        assert_eq!(machine.convert(&cipher).unwrap(), msg);
    }

    #[test]
    fn test_no_symbol_encrypts_to_itself() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("AAA").unwrap();
        let msg = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let cipher = machine.convert(msg).unwrap();
        assert!(!cipher.contains('A'));
    }

    #[test]
    fn test_convert_symbol_outside_alphabet() {
        let mut machine = small_machine();
        machine.insert_rotors(&["R", "L", "M", "F"]).unwrap();
        machine.set_rotors("AAA").unwrap();
        assert_eq!(machine.convert("ABZ"), Err(EnigmaError::SymbolNotFound('Z')));
        assert_eq!(
            machine.convert_index(4),
            Err(EnigmaError::IndexOutOfRange { index: 4, size: 4 })
        );
    }
}
