//! Auto-leveling state machine
//!
//! Defines the discrete position estimate and the transition logic that
//! sequences the two actuators safely. The state machine is explicit,
//! finite, and deterministic.

pub mod auto;
pub mod machine;

pub use auto::{Activation, AutoLeveler, TickOutcome};
pub use machine::{step, LevelState, Position, Step};
