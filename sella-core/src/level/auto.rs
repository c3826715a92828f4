//! Auto-leveling controller
//!
//! Owns the leveling state while auto mode is active. Activation decides
//! between "already at target" and seeding the position estimate from the
//! initial error sign; each control tick re-fuses the sample and feeds the
//! state machine. Sensor loss exits auto mode immediately.

use crate::config::LevelingConfig;
use crate::level::machine::{step, LevelState, Position, Step};
use crate::tilt::{weighted_error_x10, TiltPair};

/// Result of an activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activation {
    /// Initial error within tolerance; auto mode was not entered
    AlreadyAtTarget,
    /// Auto mode entered with the given seeded position estimate
    ///
    /// Activation touches no actuator: movement starts when a tick
    /// crosses the switch threshold and the reversal sequence engages
    /// the opposite actuator after the settle delay.
    Started { seed: Position },
}

/// Result of one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Auto mode is not active
    Inactive,
    /// Sampler reported unavailable; auto mode exited, caller must force
    /// all actuators off
    SensorLost,
    /// State machine effect to apply
    Effect(Step),
}

/// Auto-leveling controller
#[derive(Debug, Clone)]
pub struct AutoLeveler {
    cfg: LevelingConfig,
    target: TiltPair,
    state: Option<LevelState>,
}

impl AutoLeveler {
    pub fn new(cfg: LevelingConfig) -> Self {
        Self {
            cfg,
            target: TiltPair::default(),
            state: None,
        }
    }

    /// Whether auto mode is currently active
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Request activation toward `target` given the current orientation
    ///
    /// Replaces any leveling already in progress.
    pub fn activate(&mut self, target: TiltPair, current: TiltPair) -> Activation {
        let error = weighted_error_x10(target, current);
        if error.abs() <= self.cfg.tolerance_x10 {
            return Activation::AlreadyAtTarget;
        }

        let seed = Position::seed_from_error(error);
        self.target = target;
        self.state = Some(LevelState::Stable(seed));
        Activation::Started { seed }
    }

    /// Drop out of auto mode without touching the actuators
    pub fn deactivate(&mut self) {
        self.state = None;
    }

    /// Advance one control tick with the latest sample
    ///
    /// `Step::Converged` deactivates auto mode before returning.
    pub fn tick(&mut self, sample: Option<TiltPair>, now_ms: u32) -> TickOutcome {
        let Some(state) = self.state else {
            return TickOutcome::Inactive;
        };

        let Some(current) = sample else {
            self.state = None;
            return TickOutcome::SensorLost;
        };

        let error = weighted_error_x10(self.target, current);
        let (next, effect) = step(state, error, now_ms, &self.cfg);

        self.state = match effect {
            Step::Converged => None,
            _ => Some(next),
        };

        TickOutcome::Effect(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Channel;

    fn leveler() -> AutoLeveler {
        AutoLeveler::new(LevelingConfig::default())
    }

    #[test]
    fn test_activation_seeds_from_error_sign() {
        // target = (10°, -4°), current = (0°, 0°) => error 5.8° > 5°,
        // auto activates with seeded position Lying
        let mut lv = leveler();
        let result = lv.activate(TiltPair::new(100, -40), TiltPair::new(0, 0));
        assert_eq!(result, Activation::Started { seed: Position::Lying });
        assert!(lv.is_active());
    }

    #[test]
    fn test_activation_already_at_target() {
        let mut lv = leveler();
        // error = 0.7*5 + 0.3*5 = 5.0°, exactly at tolerance
        let result = lv.activate(TiltPair::new(50, 50), TiltPair::new(0, 0));
        assert_eq!(result, Activation::AlreadyAtTarget);
        assert!(!lv.is_active());
    }

    #[test]
    fn test_negative_error_seeds_sitting() {
        let mut lv = leveler();
        let result = lv.activate(TiltPair::new(-100, -100), TiltPair::new(0, 0));
        assert_eq!(result, Activation::Started { seed: Position::Sitting });
    }

    #[test]
    fn test_tick_inactive() {
        let mut lv = leveler();
        assert_eq!(lv.tick(Some(TiltPair::default()), 0), TickOutcome::Inactive);
    }

    #[test]
    fn test_sensor_loss_exits_auto() {
        let mut lv = leveler();
        lv.activate(TiltPair::new(200, 200), TiltPair::new(0, 0));
        assert!(lv.is_active());

        assert_eq!(lv.tick(None, 200), TickOutcome::SensorLost);
        assert!(!lv.is_active());

        // Subsequent ticks are inert
        assert_eq!(lv.tick(Some(TiltPair::default()), 400), TickOutcome::Inactive);
    }

    #[test]
    fn test_convergence_exits_auto() {
        let mut lv = leveler();
        lv.activate(TiltPair::new(100, 100), TiltPair::new(0, 0));

        // Sample right on target
        let outcome = lv.tick(Some(TiltPair::new(100, 100)), 200);
        assert_eq!(outcome, TickOutcome::Effect(Step::Converged));
        assert!(!lv.is_active());
    }

    #[test]
    fn test_leveling_run_to_convergence() {
        // Seed Lying (error > 0), cross the switch threshold, settle,
        // engage Sit, then converge as the orientation approaches target.
        let mut lv = leveler();
        let target = TiltPair::new(200, 200);
        assert_eq!(
            lv.activate(target, TiltPair::new(0, 0)),
            Activation::Started { seed: Position::Lying }
        );

        // Error 20° > 8°: reversal begins
        assert_eq!(
            lv.tick(Some(TiltPair::new(0, 0)), 200),
            TickOutcome::Effect(Step::BeginSettle { off: Channel::Lie })
        );

        // Still settling
        assert_eq!(
            lv.tick(Some(TiltPair::new(0, 0)), 400),
            TickOutcome::Effect(Step::Hold)
        );

        // Settle elapsed: engage the sit actuator
        assert_eq!(
            lv.tick(Some(TiltPair::new(0, 0)), 1200),
            TickOutcome::Effect(Step::EngageOpposite { on: Channel::Sit })
        );

        // Orientation rises toward target but still outside tolerance
        assert_eq!(
            lv.tick(Some(TiltPair::new(120, 120)), 1400),
            TickOutcome::Effect(Step::Hold)
        );

        // Inside tolerance: converged, auto mode exits
        assert_eq!(
            lv.tick(Some(TiltPair::new(160, 160)), 1600),
            TickOutcome::Effect(Step::Converged)
        );
        assert!(!lv.is_active());
    }

    #[test]
    fn test_reactivation_replaces_running_level() {
        let mut lv = leveler();
        lv.activate(TiltPair::new(200, 200), TiltPair::new(0, 0));
        // New activation toward the other direction re-seeds
        let result = lv.activate(TiltPair::new(-200, -200), TiltPair::new(0, 0));
        assert_eq!(result, Activation::Started { seed: Position::Sitting });
        assert!(lv.is_active());
    }
}
