//! Rotor cipher machine simulator.
//!
//! Simulates an Enigma-style machine: a plugboard, a stack of rotors and a
//! reflector. Every symbol first advances the rotors, then passes through
//! the plugboard, the rotors right-to-left, the reflector, the rotors
//! left-to-right and the plugboard again. Running the same setting over a
//! ciphertext recovers the plaintext.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol <-> index bijection, shared read-only)
//!     ↓
//! Permutation  (cycle notation, forward/inverse lookup)
//!     ↓
//! Rotor        (wiring + position; Reflector | Fixed | Moving{notches})
//!     ↓ stored in a RotorArena, slots hold RotorIds
//! Machine      (stepping with double-step + signal path + plugboard)
//! ```
//!
//! [`MachineConfig`] and [`Setting`] parse the text forms of a machine and
//! of a per-message setting; [`session::process`] drives a whole input.
//!
//! # Examples
//!
//! ```
//! use enigma::{MachineConfig, Setting};
//!
//! let config = MachineConfig::parse(
//!     "ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
//!      I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!      II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//!      III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!      Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!      B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
//! ).unwrap();
//! let mut machine = config.build().unwrap();
//!
//! let setting = Setting::parse("* B Beta I II III AAAA", 5).unwrap();
//! machine.apply_setting(&setting).unwrap();
//! assert_eq!(machine.convert("AAAAA").unwrap(), "BDZGO");
//!
//! machine.apply_setting(&setting).unwrap();
//! assert_eq!(machine.convert("BDZGO").unwrap(), "AAAAA");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod format;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;

pub use alphabet::Alphabet;
pub use config::{MachineConfig, RotorDescriptor, RotorType, Setting};
pub use error::{EnigmaError, ErrorKind, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorArena, RotorId, RotorKind};
