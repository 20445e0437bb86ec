//! Configuration and setting-line parsing.
//!
//! A configuration describes the machine: its alphabet, slot and pawl
//! counts, and the inventory of rotors.
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I     MQ  (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! Beta  N   (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B     R   (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!           (RX) (SZ) (TV)
//! ```
//!
//! A setting line selects rotors for one message stream:
//!
//! ```text
//! * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Token that opens a setting line.
pub const SETTING_MARKER: &str = "*";

/// Rotor variant tag as written in a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotorType {
    /// `M`: driven by a pawl.
    Moving,
    /// `N`: never moves.
    Fixed,
    /// `R`: reflector.
    Reflector,
}

impl RotorType {
    fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'M' => Some(RotorType::Moving),
            'N' => Some(RotorType::Fixed),
            'R' => Some(RotorType::Reflector),
            _ => None,
        }
    }
}

/// One rotor of the inventory, still in text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorDescriptor {
    /// Unique name of the rotor.
    pub name: String,
    /// Variant tag.
    pub rotor_type: RotorType,
    /// Notch symbols; empty unless `rotor_type` is [`RotorType::Moving`].
    pub notches: String,
    /// Wiring in cycle notation.
    pub wiring: String,
}

impl RotorDescriptor {
    /// Builds the rotor over `alphabet`.
    ///
    /// # Errors
    /// Any error from parsing the wiring or the notches, or
    /// [`EnigmaError::ReflectorNotDerangement`] for a bad reflector.
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
        let permutation = Permutation::new(&self.wiring, alphabet)?;
        match self.rotor_type {
            RotorType::Moving => Rotor::moving(self.name.as_str(), permutation, &self.notches),
            RotorType::Fixed => Ok(Rotor::fixed(self.name.as_str(), permutation)),
            RotorType::Reflector => Rotor::reflector(self.name.as_str(), permutation),
        }
    }
}

/// A parsed machine configuration.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Shared machine alphabet.
    pub alphabet: Arc<Alphabet>,
    /// Number of rotor slots, reflector included.
    pub num_rotors: usize,
    /// Number of pawls.
    pub pawls: usize,
    /// Rotor inventory, in file order.
    pub rotors: Vec<RotorDescriptor>,
}

impl MachineConfig {
    /// Parses configuration text.
    ///
    /// Tokens are whitespace separated; line breaks carry no meaning, so a
    /// rotor's cycles may continue on the following lines. A rotor's
    /// wiring is every following token that starts with `(`, plus any
    /// tokens inside a cycle left open.
    ///
    /// # Errors
    /// - [`EnigmaError::ConfigTruncated`] if the header or a rotor is cut short.
    /// - [`EnigmaError::InvalidNumber`] for non-numeric counts.
    /// - [`EnigmaError::BadRotorDescription`] for an unknown type tag or
    ///   notches on a rotor that does not move.
    /// - Any alphabet or cycle-notation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::MachineConfig;
    ///
    /// let config = MachineConfig::parse("ABCD 2 1\n R R (AB) (CD)\n I MA (ABC)").unwrap();
    /// assert_eq!(config.num_rotors, 2);
    /// assert_eq!(config.rotors.len(), 2);
    /// assert_eq!(config.rotors[1].notches, "A");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().peekable();

        let alphabet = tokens
            .next()
            .ok_or_else(|| EnigmaError::ConfigTruncated("missing alphabet".into()))?;
        let alphabet = Arc::new(Alphabet::new(alphabet)?);
        let num_rotors = parse_count(tokens.next(), "slot count")?;
        let pawls = parse_count(tokens.next(), "pawl count")?;

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            let info = tokens.next().ok_or_else(|| {
                EnigmaError::ConfigTruncated(format!("rotor {} has no type", name))
            })?;
            let mut chars = info.chars();
            let tag = chars.next().unwrap_or_default();
            let rotor_type =
                RotorType::from_tag(tag).ok_or_else(|| EnigmaError::BadRotorDescription {
                    name: name.to_string(),
                    reason: format!("unknown type '{}'", tag),
                })?;
            let notches: String = chars.collect();
            if rotor_type != RotorType::Moving && !notches.is_empty() {
                return Err(EnigmaError::BadRotorDescription {
                    name: name.to_string(),
                    reason: "only moving rotors have notches".into(),
                });
            }

            let mut cycles = Vec::new();
            let mut open = false;
            while let Some(cycle) = tokens.next_if(|t| open || t.starts_with('(')) {
                open = match (cycle.rfind('('), cycle.rfind(')')) {
                    (Some(l), Some(r)) => l > r,
                    (Some(_), None) => true,
                    (None, Some(_)) => false,
                    (None, None) => open,
                };
                cycles.push(cycle);
            }
            rotors.push(RotorDescriptor {
                name: name.to_string(),
                rotor_type,
                notches,
                wiring: cycles.join(" "),
            });
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            pawls,
            rotors = rotors.len(),
            "configuration parsed"
        );
        Ok(MachineConfig {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    /// Builds a [`Machine`] from this configuration.
    ///
    /// # Errors
    /// Any error from building a rotor or from [`Machine::new`].
    pub fn build(&self) -> Result<Machine> {
        let rotors = self
            .rotors
            .iter()
            .map(|descriptor| descriptor.build(&self.alphabet))
            .collect::<Result<Vec<_>>>()?;
        Machine::new(Arc::clone(&self.alphabet), self.num_rotors, self.pawls, rotors)
    }
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| EnigmaError::ConfigTruncated(format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| EnigmaError::InvalidNumber(token.to_string()))
}

/// The fields of one setting line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    rotors: Vec<String>,
    positions: String,
    plugboard: String,
}

impl Setting {
    /// Creates a setting from already split fields.
    pub fn new(rotors: Vec<String>, positions: impl Into<String>, plugboard: impl Into<String>) -> Self {
        Setting {
            rotors,
            positions: positions.into(),
            plugboard: plugboard.into(),
        }
    }

    /// Splits a setting line for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`EnigmaError::MalformedSetting`] if the line does not start
    /// with `*` or is too short to name every slot and the positions.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Setting;
    ///
    /// let setting = Setting::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(setting.rotors(), ["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(setting.positions(), "AXLE");
    /// assert_eq!(setting.plugboard(), "(HQ) (EX)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(SETTING_MARKER) {
            return Err(EnigmaError::MalformedSetting(format!(
                "\"{}\" does not start with '{}'",
                line.trim(),
                SETTING_MARKER
            )));
        }
        let rotors: Vec<String> = tokens.by_ref().take(num_rotors).map(String::from).collect();
        if rotors.len() != num_rotors {
            return Err(EnigmaError::MalformedSetting(format!(
                "expected {} rotor names in \"{}\"",
                num_rotors,
                line.trim()
            )));
        }
        let positions = tokens.next().ok_or_else(|| {
            EnigmaError::MalformedSetting(format!("missing positions in \"{}\"", line.trim()))
        })?;
        let plugboard = tokens.collect::<Vec<_>>().join(" ");
        Ok(Setting::new(rotors, positions, plugboard))
    }

    /// Returns true if `line` is a setting line rather than a message.
    pub fn is_setting_line(line: &str) -> bool {
        line.split_whitespace().next() == Some(SETTING_MARKER)
    }

    /// Rotor names, reflector first.
    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    /// Initial positions of the non-reflector rotors.
    pub fn positions(&self) -> &str {
        &self.positions
    }

    /// Plugboard in cycle notation; empty for none.
    pub fn plugboard(&self) -> &str {
        &self.plugboard
    }
}
