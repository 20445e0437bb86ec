//! Message-stream processing: setting lines interleaved with messages.

use tracing::debug;

use crate::config::Setting;
use crate::error::{EnigmaError, Result};
use crate::format::{group, GROUP_SIZE};
use crate::machine::Machine;

/// Processes `input` line by line against `machine`.
///
/// A setting line (first token `*`) re-initializes the machine; every
/// other line is a message whose whitespace is dropped before conversion.
/// Each message produces one output line in groups of five. Rotor state
/// carries across message lines until the next setting line.
///
/// # Errors
/// - [`EnigmaError::MissingSetting`] if a message precedes every setting.
/// - Any error from parsing or applying a setting, or converting a message.
pub fn process(machine: &mut Machine, input: &str) -> Result<String> {
    let mut out = String::new();
    let mut configured = false;
    for (lineno, line) in input.lines().enumerate() {
        if Setting::is_setting_line(line) {
            let setting = Setting::parse(line, machine.num_rotors())?;
            machine.apply_setting(&setting)?;
            configured = true;
            debug!(line = lineno + 1, "setting applied");
            continue;
        }
        if !configured {
            if line.trim().is_empty() {
                continue;
            }
            return Err(EnigmaError::MissingSetting);
        }
        let msg: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let converted = machine.convert(&msg)?;
        out.push_str(&group(&converted, GROUP_SIZE));
        out.push('\n');
    }
    Ok(out)
}
