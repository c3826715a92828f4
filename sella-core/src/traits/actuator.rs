//! Actuator output traits
//!
//! The seating unit has two binary-drive linear actuators behind relays.
//! Relay 1 drives the unit toward the sitting configuration, relay 2
//! toward the lying configuration.

/// The two actuator channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Relay 1 - drives toward sitting
    Sit,
    /// Relay 2 - drives toward lying
    Lie,
}

impl Channel {
    /// One-based relay index as used on the wire (`ON1`, `OFF2`, ...)
    pub fn index(self) -> u8 {
        match self {
            Channel::Sit => 1,
            Channel::Lie => 2,
        }
    }

    /// Map a one-based relay index back to a channel
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Channel::Sit),
            2 => Some(Channel::Lie),
            _ => None,
        }
    }

    /// The opposing channel
    pub fn opposite(self) -> Self {
        match self {
            Channel::Sit => Channel::Lie,
            Channel::Lie => Channel::Sit,
        }
    }
}

/// Trait for a single binary actuator output
///
/// Implementations control the relay via GPIO, SSR, or a test double.
pub trait Actuator {
    /// Energize or de-energize the actuator
    fn set_on(&mut self, on: bool);

    /// Check if the actuator is currently energized
    fn is_on(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        assert_eq!(Channel::from_index(Channel::Sit.index()), Some(Channel::Sit));
        assert_eq!(Channel::from_index(Channel::Lie.index()), Some(Channel::Lie));
        assert_eq!(Channel::from_index(0), None);
        assert_eq!(Channel::from_index(3), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Channel::Sit.opposite(), Channel::Lie);
        assert_eq!(Channel::Lie.opposite(), Channel::Sit);
    }
}
