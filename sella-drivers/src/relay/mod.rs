//! Relay outputs for the linear actuators
//!
//! Each actuation direction is driven by a relay on a GPIO pin
//! (directly or via an opto-isolated relay board). The pair wrapper
//! enforces the hardware interlock: the two relays drive the same
//! motor in opposite directions and must never be energized together.

use sella_core::traits::{Actuator, Channel};

/// Trait for GPIO pin abstraction
pub trait RelayPin {
    /// Set the pin high
    fn set_high(&mut self);

    /// Set the pin low
    fn set_low(&mut self);

    /// Check if the pin is set high
    fn is_set_high(&self) -> bool;
}

/// Single relay output
///
/// Controls one relay via a GPIO pin. The pin can be configured as
/// active-high (default) or active-low.
pub struct RelayActuator<P> {
    pin: P,
    /// If true, relay ON = pin LOW
    inverted: bool,
    /// Current logical state (true = relay energized)
    on: bool,
}

impl<P: RelayPin> RelayActuator<P> {
    /// Create a new relay output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, relay is ON when pin is LOW (for active-low boards)
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            on: false,
        };
        // Ensure relay starts de-energized
        relay.set_on(false);
        relay
    }

    /// Create a new relay with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new relay with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: RelayPin> Actuator for RelayActuator<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;

        if on != self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Both relays are never allowed on at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterlockError;

/// The actuator relay pair
///
/// Owns both direction relays and refuses to energize one while the
/// other is still on.
pub struct RelayPair<P> {
    sit: RelayActuator<P>,
    lie: RelayActuator<P>,
}

impl<P: RelayPin> RelayPair<P> {
    pub fn new(sit: RelayActuator<P>, lie: RelayActuator<P>) -> Self {
        Self { sit, lie }
    }

    fn relay(&mut self, channel: Channel) -> &mut RelayActuator<P> {
        match channel {
            Channel::Sit => &mut self.sit,
            Channel::Lie => &mut self.lie,
        }
    }

    /// De-energize one relay
    pub fn release(&mut self, channel: Channel) {
        self.relay(channel).set_on(false);
    }

    /// Energize one relay, failing if its opposite is still on
    pub fn energize(&mut self, channel: Channel) -> Result<(), InterlockError> {
        if self.relay(channel.opposite()).is_on() {
            return Err(InterlockError);
        }
        self.relay(channel).set_on(true);
        Ok(())
    }

    /// De-energize both relays
    pub fn all_off(&mut self) {
        self.sit.set_on(false);
        self.lie.set_on(false);
    }

    pub fn is_on(&self, channel: Channel) -> bool {
        match channel {
            Channel::Sit => self.sit.is_on(),
            Channel::Lie => self.lie.is_on(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl RelayPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn pair() -> RelayPair<MockPin> {
        RelayPair::new(
            RelayActuator::new_active_high(MockPin::new()),
            RelayActuator::new_active_high(MockPin::new()),
        )
    }

    #[test]
    fn test_active_high_relay() {
        let mut relay = RelayActuator::new_active_high(MockPin::new());

        // Initially off
        assert!(!relay.is_on());
        assert!(!relay.pin.is_set_high());

        relay.set_on(true);
        assert!(relay.is_on());
        assert!(relay.pin.is_set_high());

        relay.set_on(false);
        assert!(!relay.is_on());
        assert!(!relay.pin.is_set_high());
    }

    #[test]
    fn test_active_low_relay() {
        let mut relay = RelayActuator::new_active_low(MockPin::new());

        // Initially off (pin is high for active-low)
        assert!(!relay.is_on());
        assert!(relay.pin.is_set_high());

        relay.set_on(true);
        assert!(relay.is_on());
        assert!(!relay.pin.is_set_high());
    }

    #[test]
    fn test_pair_interlock() {
        let mut pair = pair();

        assert!(pair.energize(Channel::Sit).is_ok());
        assert!(pair.is_on(Channel::Sit));

        // Opposite direction refused while sit relay is energized
        assert_eq!(pair.energize(Channel::Lie), Err(InterlockError));
        assert!(!pair.is_on(Channel::Lie));

        pair.release(Channel::Sit);
        assert!(pair.energize(Channel::Lie).is_ok());
        assert!(pair.is_on(Channel::Lie));
    }

    #[test]
    fn test_all_off() {
        let mut pair = pair();
        assert!(pair.energize(Channel::Lie).is_ok());

        pair.all_off();
        assert!(!pair.is_on(Channel::Sit));
        assert!(!pair.is_on(Channel::Lie));
    }

    #[test]
    fn test_re_energizing_same_channel_is_ok() {
        let mut pair = pair();
        assert!(pair.energize(Channel::Sit).is_ok());
        assert!(pair.energize(Channel::Sit).is_ok());
        assert!(pair.is_on(Channel::Sit));
    }
}
