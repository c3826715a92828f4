//! Position state machine
//!
//! While auto mode is active the unit is either holding one discrete
//! configuration estimate or mid-reversal.
//! A reversal always passes through a settle window: the outgoing actuator
//! is de-energized, the machine waits `settle_delay_ms`, and only then is
//! the opposite actuator energized. The auto path can therefore never have
//! both actuators energized at the same instant.
//!
//! The switch threshold sits `hysteresis` beyond the convergence band
//! (8.0° vs 5.0° with defaults), which keeps the machine from oscillating
//! when the error hovers near a boundary.

use crate::config::LevelingConfig;
use crate::traits::Channel;

/// Discrete estimate of the current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    Sitting,
    Lying,
}

impl Position {
    /// The opposing configuration
    pub fn opposite(self) -> Self {
        match self {
            Position::Sitting => Position::Lying,
            Position::Lying => Position::Sitting,
        }
    }

    /// The actuator that drives toward this configuration
    pub fn actuator(self) -> Channel {
        match self {
            Position::Sitting => Channel::Sit,
            Position::Lying => Channel::Lie,
        }
    }

    /// Seed the position estimate from the sign of the initial error
    ///
    /// A positive weighted error means the target is above the current
    /// orientation, so the unit is assumed to be lying.
    pub fn seed_from_error(error_x10: i16) -> Self {
        if error_x10 > 0 {
            Position::Lying
        } else {
            Position::Sitting
        }
    }
}

/// Leveling state: stable in a configuration, or mid actuator reversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelState {
    /// Holding a configuration estimate; no reversal in progress
    Stable(Position),
    /// Outgoing actuator de-energized, waiting out the settle delay
    Switching {
        from: Position,
        started_at_ms: u32,
    },
}

/// Actuator effect of one state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Nothing to do this tick
    Hold,
    /// Error inside the convergence band; caller exits auto mode and
    /// de-energizes everything
    Converged,
    /// Reversal begins: de-energize the outgoing actuator
    BeginSettle { off: Channel },
    /// Settle delay elapsed: energize the incoming actuator
    EngageOpposite { on: Channel },
}

/// Advance the state machine by one control tick
///
/// Pure transition function over (state, weighted error, time): returns the
/// next state and the actuator effect the caller must apply. Timer math is
/// wrapping, so a millisecond counter rollover does not stall a reversal.
pub fn step(
    state: LevelState,
    error_x10: i16,
    now_ms: u32,
    cfg: &LevelingConfig,
) -> (LevelState, Step) {
    match state {
        LevelState::Stable(pos) => {
            if error_x10.abs() <= cfg.tolerance_x10 {
                return (state, Step::Converged);
            }

            let switch_x10 = cfg.tolerance_x10 + cfg.hysteresis_x10;
            let crossing = match pos {
                Position::Sitting => error_x10 < -switch_x10,
                Position::Lying => error_x10 > switch_x10,
            };

            if crossing {
                (
                    LevelState::Switching {
                        from: pos,
                        started_at_ms: now_ms,
                    },
                    Step::BeginSettle {
                        off: pos.actuator(),
                    },
                )
            } else {
                (state, Step::Hold)
            }
        }
        LevelState::Switching { from, started_at_ms } => {
            if now_ms.wrapping_sub(started_at_ms) >= cfg.settle_delay_ms {
                let to = from.opposite();
                (
                    LevelState::Stable(to),
                    Step::EngageOpposite { on: to.actuator() },
                )
            } else {
                (state, Step::Hold)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LevelingConfig {
        LevelingConfig::default()
    }

    #[test]
    fn test_seed_from_error_sign() {
        assert_eq!(Position::seed_from_error(58), Position::Lying);
        assert_eq!(Position::seed_from_error(-58), Position::Sitting);
        assert_eq!(Position::seed_from_error(0), Position::Sitting);
    }

    #[test]
    fn test_converges_inside_tolerance_from_either_position() {
        for pos in [Position::Sitting, Position::Lying] {
            for error in [-50, -10, 0, 10, 50] {
                let (next, effect) = step(LevelState::Stable(pos), error, 0, &cfg());
                assert_eq!(effect, Step::Converged);
                assert_eq!(next, LevelState::Stable(pos));
            }
        }
    }

    #[test]
    fn test_holds_inside_hysteresis_band() {
        // 5.0° < |error| <= 8.0°: outside tolerance, below switch threshold
        let (next, effect) = step(LevelState::Stable(Position::Sitting), -80, 0, &cfg());
        assert_eq!(effect, Step::Hold);
        assert_eq!(next, LevelState::Stable(Position::Sitting));

        let (_, effect) = step(LevelState::Stable(Position::Lying), 80, 0, &cfg());
        assert_eq!(effect, Step::Hold);
    }

    #[test]
    fn test_sitting_switches_on_large_negative_error() {
        let (next, effect) = step(LevelState::Stable(Position::Sitting), -81, 500, &cfg());
        assert_eq!(effect, Step::BeginSettle { off: Channel::Sit });
        assert_eq!(
            next,
            LevelState::Switching {
                from: Position::Sitting,
                started_at_ms: 500,
            }
        );
    }

    #[test]
    fn test_lying_switches_on_large_positive_error() {
        let (next, effect) = step(LevelState::Stable(Position::Lying), 81, 500, &cfg());
        assert_eq!(effect, Step::BeginSettle { off: Channel::Lie });
        assert!(matches!(next, LevelState::Switching { from: Position::Lying, .. }));
    }

    #[test]
    fn test_mirror_directions_do_not_switch() {
        // A sitting unit with a large positive error stays put; so does a
        // lying unit with a large negative error.
        let (_, effect) = step(LevelState::Stable(Position::Sitting), 200, 0, &cfg());
        assert_eq!(effect, Step::Hold);
        let (_, effect) = step(LevelState::Stable(Position::Lying), -200, 0, &cfg());
        assert_eq!(effect, Step::Hold);
    }

    #[test]
    fn test_settle_delay_gates_engagement() {
        let switching = LevelState::Switching {
            from: Position::Sitting,
            started_at_ms: 1000,
        };

        // 999 ms in: still settling
        let (next, effect) = step(switching, -200, 1999, &cfg());
        assert_eq!(effect, Step::Hold);
        assert_eq!(next, switching);

        // Exactly 1000 ms: engage the opposite actuator
        let (next, effect) = step(switching, -200, 2000, &cfg());
        assert_eq!(effect, Step::EngageOpposite { on: Channel::Lie });
        assert_eq!(next, LevelState::Stable(Position::Lying));
    }

    #[test]
    fn test_settle_survives_timer_wrap() {
        let switching = LevelState::Switching {
            from: Position::Lying,
            started_at_ms: u32::MAX - 200,
        };

        // 800 ms after the wrap point = 1001 ms elapsed
        let (next, effect) = step(switching, 200, 800, &cfg());
        assert_eq!(effect, Step::EngageOpposite { on: Channel::Sit });
        assert_eq!(next, LevelState::Stable(Position::Sitting));
    }

    #[test]
    fn test_full_reversal_never_energizes_both() {
        // Walk a sitting-to-lying reversal tick by tick and track both
        // relays; they must never be on together.
        let cfg = cfg();
        let mut sit_on = true; // Stable(Sitting) holds the sit actuator
        let mut lie_on = false;
        let mut state = LevelState::Stable(Position::Sitting);

        for tick in 0..20u32 {
            let now = tick * cfg.tick_interval_ms;
            let (next, effect) = step(state, -200, now, &cfg);
            match effect {
                Step::BeginSettle { off } => match off {
                    Channel::Sit => sit_on = false,
                    Channel::Lie => lie_on = false,
                },
                Step::EngageOpposite { on } => match on {
                    Channel::Sit => sit_on = true,
                    Channel::Lie => lie_on = true,
                },
                _ => {}
            }
            assert!(!(sit_on && lie_on), "both actuators energized at tick {}", tick);
            state = next;
        }

        assert_eq!(state, LevelState::Stable(Position::Lying));
        assert!(lie_on);
        assert!(!sit_on);
    }
}
