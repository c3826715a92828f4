//! Inbound command parsing
//!
//! One command per line, case-sensitive, exactly as the remote app sends
//! them. `AUTO` and `SAVE` take an optional single-digit slot suffix and
//! default to slot 1 without one; range clamping is the controller's job.

/// Default preset slot for bare `AUTO` / `SAVE`
pub const DEFAULT_SLOT: u8 = 1;

/// The two timed manual actuations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Posture {
    Sit,
    Lie,
}

impl Posture {
    /// The command word as it appears on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Posture::Sit => "Sit",
            Posture::Lie => "Lie",
        }
    }
}

/// A decoded remote command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `ON<n>` / `OFF<n>`: direct relay control
    Relay { index: u8, on: bool },
    /// `AUTO[<slot>]`: start auto-leveling toward a preset
    Auto { slot: u8 },
    /// `SAVE[<slot>]`: persist the current orientation as a preset
    Save { slot: u8 },
    /// `Sit` / `Lie`: begin a timed manual actuation
    Manual(Posture),
}

impl Command {
    /// Parse a command line; returns None for anything unrecognized
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            "ON1" => return Some(Command::Relay { index: 1, on: true }),
            "OFF1" => return Some(Command::Relay { index: 1, on: false }),
            "ON2" => return Some(Command::Relay { index: 2, on: true }),
            "OFF2" => return Some(Command::Relay { index: 2, on: false }),
            "Sit" => return Some(Command::Manual(Posture::Sit)),
            "Lie" => return Some(Command::Manual(Posture::Lie)),
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("AUTO") {
            return parse_slot(rest).map(|slot| Command::Auto { slot });
        }
        if let Some(rest) = line.strip_prefix("SAVE") {
            return parse_slot(rest).map(|slot| Command::Save { slot });
        }

        None
    }
}

/// Parse the optional slot suffix: empty means the default slot, a single
/// ASCII digit is taken literally (the controller clamps the range).
fn parse_slot(suffix: &str) -> Option<u8> {
    if suffix.is_empty() {
        return Some(DEFAULT_SLOT);
    }
    let mut chars = suffix.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    Some(digit as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_commands() {
        assert_eq!(
            Command::parse("ON1"),
            Some(Command::Relay { index: 1, on: true })
        );
        assert_eq!(
            Command::parse("OFF1"),
            Some(Command::Relay { index: 1, on: false })
        );
        assert_eq!(
            Command::parse("ON2"),
            Some(Command::Relay { index: 2, on: true })
        );
        assert_eq!(
            Command::parse("OFF2"),
            Some(Command::Relay { index: 2, on: false })
        );
    }

    #[test]
    fn test_auto_defaults_to_slot_one() {
        assert_eq!(Command::parse("AUTO"), Some(Command::Auto { slot: 1 }));
        assert_eq!(Command::parse("SAVE"), Some(Command::Save { slot: 1 }));
    }

    #[test]
    fn test_slot_suffixes() {
        assert_eq!(Command::parse("AUTO2"), Some(Command::Auto { slot: 2 }));
        assert_eq!(Command::parse("AUTO3"), Some(Command::Auto { slot: 3 }));
        assert_eq!(Command::parse("SAVE3"), Some(Command::Save { slot: 3 }));
        // Out-of-range digits parse; the controller clamps them
        assert_eq!(Command::parse("AUTO9"), Some(Command::Auto { slot: 9 }));
    }

    #[test]
    fn test_manual_commands() {
        assert_eq!(Command::parse("Sit"), Some(Command::Manual(Posture::Sit)));
        assert_eq!(Command::parse("Lie"), Some(Command::Manual(Posture::Lie)));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(Command::parse("on1"), None);
        assert_eq!(Command::parse("sit"), None);
        assert_eq!(Command::parse("SIT"), None);
        assert_eq!(Command::parse("auto1"), None);
    }

    #[test]
    fn test_malformed_rejected() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("ON3"), None);
        assert_eq!(Command::parse("AUTO12"), None);
        assert_eq!(Command::parse("AUTOx"), None);
        assert_eq!(Command::parse("SAVE 1"), None);
        assert_eq!(Command::parse("ON1 "), None);
    }
}
