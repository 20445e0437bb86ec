//! Error types for the enigma library.

use thiserror::Error;

/// Broad classification of every [`EnigmaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or inconsistent configuration (alphabet, wiring, slots).
    Configuration,
    /// A name, symbol or index that does not resolve.
    Lookup,
    /// An input of the wrong length.
    Length,
    /// Something repeated that must be unique.
    Duplicate,
}

/// Errors produced by the enigma library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// The alphabet contains no symbols.
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// A symbol appears more than once in the alphabet.
    #[error("Symbol '{0}' is duplicated in the alphabet")]
    DuplicateSymbol(char),
    /// A symbol that cycle notation reserves (parentheses, whitespace).
    #[error("Symbol '{0}' cannot be used in an alphabet")]
    ReservedSymbol(char),
    /// An index outside `[0, size)`.
    #[error("Index {index} is outside the alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// A symbol that is not part of the alphabet.
    #[error("Symbol '{0}' is not in the alphabet")]
    SymbolNotFound(char),
    /// Cycle notation that does not follow `(abc) (de) ...`.
    #[error("Malformed cycles \"{cycles}\": {reason}")]
    MalformedCycles { cycles: String, reason: String },
    /// A symbol named by two cycles of the same permutation.
    #[error("Symbol '{0}' appears in more than one cycle")]
    DuplicateCycleSymbol(char),
    /// Two permutations or rotors built over different alphabets.
    #[error("Alphabet does not match the machine alphabet")]
    AlphabetMismatch,
    /// A reflector whose wiring leaves some symbol fixed.
    #[error("Reflector {0} must be a derangement")]
    ReflectorNotDerangement(String),
    /// A reflector asked to leave position 0.
    #[error("Reflector {0} cannot be rotated")]
    ReflectorPosition(String),
    /// Slot count or pawl count outside the allowed range.
    #[error("Invalid machine shape: {num_rotors} slots with {pawls} pawls")]
    InvalidMachineShape { num_rotors: usize, pawls: usize },
    /// A rotor name that is not in the inventory.
    #[error("No such rotor: {0}")]
    UnknownRotor(String),
    /// A rotor name used twice in an inventory or a setting.
    #[error("Rotor {0} has been repeated")]
    DuplicateRotor(String),
    /// Slot 0 is not occupied by a reflector.
    #[error("First rotor {0} is not a reflector")]
    MissingReflector(String),
    /// A reflector placed anywhere but slot 0.
    #[error("Reflector {name} cannot occupy slot {slot}")]
    MisplacedReflector { name: String, slot: usize },
    /// Wrong number of rotor names for the slot count.
    #[error("Expected {expected} rotors, found {found}")]
    RotorCount { expected: usize, found: usize },
    /// Position setting of the wrong length.
    #[error("Setting has the wrong length: expected {expected}, found {found}")]
    SettingLength { expected: usize, found: usize },
    /// Conversion requested before any rotors were inserted.
    #[error("Machine has no rotors inserted")]
    NotSetUp,
    /// Configuration text ended before a complete description.
    #[error("Configuration truncated: {0}")]
    ConfigTruncated(String),
    /// A rotor description that cannot be understood.
    #[error("Bad rotor description for {name}: {reason}")]
    BadRotorDescription { name: String, reason: String },
    /// A count in the configuration header that is not a number.
    #[error("Invalid number in configuration: {0}")]
    InvalidNumber(String),
    /// A setting line that does not follow `* rotors... positions [plugboard]`.
    #[error("Malformed setting line: {0}")]
    MalformedSetting(String),
    /// A message line seen before any setting line.
    #[error("Input must start with a setting line")]
    MissingSetting,
}

impl EnigmaError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnigmaError::IndexOutOfRange { .. }
            | EnigmaError::SymbolNotFound(_)
            | EnigmaError::UnknownRotor(_) => ErrorKind::Lookup,
            EnigmaError::SettingLength { .. } | EnigmaError::RotorCount { .. } => {
                ErrorKind::Length
            }
            EnigmaError::DuplicateRotor(_) => ErrorKind::Duplicate,
            _ => ErrorKind::Configuration,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_symbol_not_found() {
        let err = EnigmaError::SymbolNotFound('F');
        assert_eq!(format!("{}", err), "Symbol 'F' is not in the alphabet");
    }

    #[test]
    fn test_display_setting_length() {
        let err = EnigmaError::SettingLength {
            expected: 4,
            found: 3,
        };
        assert_eq!(
            format!("{}", err),
            "Setting has the wrong length: expected 4, found 3"
        );
    }

    #[test]
    fn test_display_unknown_rotor() {
        let err = EnigmaError::UnknownRotor("IX".to_string());
        assert_eq!(format!("{}", err), "No such rotor: IX");
    }

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(EnigmaError::SymbolNotFound('x').kind(), ErrorKind::Lookup);
        assert_eq!(
            EnigmaError::IndexOutOfRange { index: 5, size: 5 }.kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            EnigmaError::SettingLength {
                expected: 4,
                found: 2
            }
            .kind(),
            ErrorKind::Length
        );
        assert_eq!(
            EnigmaError::DuplicateRotor("I".into()).kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(
            EnigmaError::DuplicateSymbol('A').kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EnigmaError::MissingReflector("I".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EnigmaError::MalformedCycles {
                cycles: "()".into(),
                reason: "empty cycle".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(EnigmaError::NotSetUp, EnigmaError::NotSetUp);
        assert_ne!(EnigmaError::NotSetUp, EnigmaError::MissingSetting);
    }
}
