//! Command arbitration state
//!
//! Tracks the exclusive lock held during a timed manual actuation and the
//! SAVE debounce window. The arbiter owns no hardware; the controller asks
//! it whether a command may proceed and applies the resulting actuator
//! effects itself.
//!
//! While the lock is held, only the manual command matching the locked
//! channel is accepted (it ends the actuation early); everything else is
//! answered with "busy". The lock otherwise clears on timer expiry.

use crate::config::ArbiterConfig;
use crate::traits::Channel;

/// The exclusive lock held during a timed manual actuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManualLock {
    pub channel: Channel,
    pub started_at_ms: u32,
}

/// Command arbitration state
#[derive(Debug, Clone)]
pub struct Arbiter {
    cfg: ArbiterConfig,
    lock: Option<ManualLock>,
    last_save_ms: Option<u32>,
}

impl Arbiter {
    pub fn new(cfg: ArbiterConfig) -> Self {
        Self {
            cfg,
            lock: None,
            last_save_ms: None,
        }
    }

    /// Whether a timed manual actuation is in progress
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// The channel held by the active lock, if any
    pub fn locked_channel(&self) -> Option<Channel> {
        self.lock.map(|l| l.channel)
    }

    /// Begin a timed manual actuation
    ///
    /// Returns false if a lock is already held; the caller replies "busy"
    /// and must not touch the actuators.
    pub fn begin_manual(&mut self, channel: Channel, now_ms: u32) -> bool {
        if self.lock.is_some() {
            return false;
        }
        self.lock = Some(ManualLock {
            channel,
            started_at_ms: now_ms,
        });
        true
    }

    /// End the running manual actuation if `channel` matches the lock
    ///
    /// Returns the channel to de-energize on a match.
    pub fn end_manual(&mut self, channel: Channel) -> Option<Channel> {
        match self.lock {
            Some(lock) if lock.channel == channel => {
                self.lock = None;
                Some(channel)
            }
            _ => None,
        }
    }

    /// Check the lock timer, clearing it on expiry
    ///
    /// Called once per loop iteration. Returns the channel to de-energize
    /// when the manual duration has elapsed.
    pub fn poll_expiry(&mut self, now_ms: u32) -> Option<Channel> {
        let lock = self.lock?;
        if now_ms.wrapping_sub(lock.started_at_ms) >= self.cfg.manual_duration_ms {
            self.lock = None;
            Some(lock.channel)
        } else {
            None
        }
    }

    /// Gate a save request through the debounce window
    ///
    /// A request inside `save_debounce_ms` of the previous accepted save is
    /// rejected (silently, per the command contract). Acceptance records
    /// the new timestamp.
    pub fn accept_save(&mut self, now_ms: u32) -> bool {
        if let Some(prev) = self.last_save_ms {
            if now_ms.wrapping_sub(prev) < self.cfg.save_debounce_ms {
                return false;
            }
        }
        self.last_save_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arbiter() -> Arbiter {
        Arbiter::new(ArbiterConfig::default())
    }

    #[test]
    fn test_manual_lock_lifecycle() {
        let mut arb = arbiter();
        assert!(!arb.is_locked());

        assert!(arb.begin_manual(Channel::Sit, 1000));
        assert!(arb.is_locked());
        assert_eq!(arb.locked_channel(), Some(Channel::Sit));

        // Second manual request while locked is refused
        assert!(!arb.begin_manual(Channel::Lie, 2000));
        assert_eq!(arb.locked_channel(), Some(Channel::Sit));
    }

    #[test]
    fn test_lock_expires_after_duration() {
        let mut arb = arbiter();
        arb.begin_manual(Channel::Sit, 1000);

        // 11.999 s in: still running
        assert_eq!(arb.poll_expiry(12_999), None);
        assert!(arb.is_locked());

        // 12 s elapsed: lock clears, actuator to de-energize returned
        assert_eq!(arb.poll_expiry(13_000), Some(Channel::Sit));
        assert!(!arb.is_locked());

        // Further polls are inert
        assert_eq!(arb.poll_expiry(14_000), None);
    }

    #[test]
    fn test_matching_command_ends_lock_early() {
        let mut arb = arbiter();
        arb.begin_manual(Channel::Lie, 0);

        assert_eq!(arb.end_manual(Channel::Sit), None);
        assert!(arb.is_locked());

        assert_eq!(arb.end_manual(Channel::Lie), Some(Channel::Lie));
        assert!(!arb.is_locked());
    }

    #[test]
    fn test_save_debounce_window() {
        let mut arb = arbiter();

        assert!(arb.accept_save(1000));
        // Inside 2500 ms: rejected
        assert!(!arb.accept_save(2000));
        assert!(!arb.accept_save(3499));
        // Window elapsed relative to the accepted save at t=1000
        assert!(arb.accept_save(3500));
        // Rejected saves do not extend the window
        assert!(!arb.accept_save(4000));
        assert!(arb.accept_save(6000));
    }

    #[test]
    fn test_first_save_always_accepted() {
        let mut arb = arbiter();
        assert!(arb.accept_save(0));
    }

    #[test]
    fn test_lock_timer_survives_wrap() {
        let mut arb = arbiter();
        arb.begin_manual(Channel::Sit, u32::MAX - 5000);

        assert_eq!(arb.poll_expiry(u32::MAX - 1000), None);
        // 12 s elapsed across the wrap point
        assert_eq!(arb.poll_expiry(7000), Some(Channel::Sit));
    }
}
