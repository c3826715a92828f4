//! Main controller coordinating arbitration, leveling, and occupancy
//!
//! The controller is the single owner of all control state. It consumes
//! decoded link events and the 200 ms tick, and returns lists of actions
//! for the controller task to apply: relay commands, outbound status
//! lines, and preset store operations. Flash access itself happens in the
//! task, outside this pure layer, so everything here tests on the host.

use heapless::Vec;

use sella_core::arbiter::Arbiter;
use sella_core::config::{ArbiterConfig, LevelingConfig, OccupancyConfig};
use sella_core::level::auto::{Activation, AutoLeveler, TickOutcome};
use sella_core::level::machine::Step;
use sella_core::occupancy::{Occupancy, OccupancyMonitor};
use sella_core::presets::{clamp_slot, owner_key, OwnerKey, UNKNOWN_OWNER};
use sella_core::tilt::TiltPair;
use sella_core::traits::Channel;
use sella_link::{Command, Posture, Status};

/// Upper bound on actions produced by a single controller step
pub const MAX_ACTIONS: usize = 8;

/// Side effects for the controller task to apply, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Drive one relay directly
    Actuate { channel: Channel, on: bool },
    /// Energize one relay through the interlock
    Engage(Channel),
    /// De-energize both relays
    AllOff,
    /// Queue an outbound status line
    Notify(Status),
    /// Fetch a preset for the current owner; the task feeds the result
    /// back through [`Controller::preset_loaded`]
    LoadPreset { slot: u8 },
    /// Persist a preset for the current owner
    StorePreset { slot: u8, target: TiltPair },
    /// Enter terminal suspension
    Suspend,
}

pub type Actions = Vec<Action, MAX_ACTIONS>;

fn posture_channel(posture: Posture) -> Channel {
    match posture {
        Posture::Sit => Channel::Sit,
        Posture::Lie => Channel::Lie,
    }
}

fn channel_posture(channel: Channel) -> Posture {
    match channel {
        Channel::Sit => Posture::Sit,
        Channel::Lie => Posture::Lie,
    }
}

/// Central control state
pub struct Controller {
    arbiter: Arbiter,
    leveler: AutoLeveler,
    occupancy: OccupancyMonitor,
    /// Presence delta per tick, from the control tick interval
    tick_interval_ms: u32,
    /// Owner token of the connected client (or the unknown fallback)
    owner: OwnerKey,
    /// Latest fused orientation sample; None while sensors unavailable
    tilt: Option<TiltPair>,
    /// Terminal once set; every input is ignored afterwards
    suspended: bool,
}

impl Controller {
    pub fn new(
        leveling: LevelingConfig,
        arbiter: ArbiterConfig,
        occupancy: OccupancyConfig,
    ) -> Self {
        let mut owner = OwnerKey::new();
        let _ = owner.push_str(UNKNOWN_OWNER);
        Self {
            arbiter: Arbiter::new(arbiter),
            tick_interval_ms: leveling.tick_interval_ms,
            leveler: AutoLeveler::new(leveling),
            occupancy: OccupancyMonitor::new(occupancy),
            owner,
            tilt: None,
            suspended: false,
        }
    }

    /// Owner token used for preset store keys
    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// A client connected with the given identity
    pub fn on_connect(&mut self, identity: &str) {
        self.owner = owner_key(Some(identity));
    }

    /// The client disconnected
    ///
    /// Running actuations and auto mode continue; only the session
    /// identity is dropped.
    pub fn on_disconnect(&mut self) {
        self.owner = owner_key(None);
    }

    /// Record the latest orientation sample from the sampler task
    pub fn set_tilt(&mut self, sample: Option<TiltPair>) {
        self.tilt = sample;
    }

    /// Process one remote command
    pub fn handle_command(&mut self, cmd: Command, now_ms: u32) -> Actions {
        let mut actions = Actions::new();
        if self.suspended {
            return actions;
        }

        match cmd {
            Command::Relay { index, on } => self.handle_relay(index, on, &mut actions),
            Command::Manual(posture) => self.handle_manual(posture, now_ms, &mut actions),
            Command::Auto { slot } => self.handle_auto(slot, &mut actions),
            Command::Save { slot } => self.handle_save(slot, now_ms, &mut actions),
        }

        actions
    }

    fn handle_relay(&mut self, index: u8, on: bool, actions: &mut Actions) {
        if self.arbiter.is_locked() {
            let _ = actions.push(Action::Notify(Status::Busy));
            return;
        }
        if self.leveler.is_active() {
            let _ = actions.push(Action::Notify(Status::AutoRunning));
            return;
        }
        let Some(channel) = Channel::from_index(index) else {
            return;
        };
        let _ = actions.push(Action::Actuate { channel, on });
        let _ = actions.push(Action::Notify(Status::RelaySet { index, on }));
    }

    fn handle_manual(&mut self, posture: Posture, now_ms: u32, actions: &mut Actions) {
        let channel = posture_channel(posture);

        if self.arbiter.is_locked() {
            // Only the matching command is answered: it ends the
            // actuation early; anything else is busy.
            match self.arbiter.end_manual(channel) {
                Some(channel) => {
                    let _ = actions.push(Action::Actuate { channel, on: false });
                    let _ = actions.push(Action::Notify(Status::ManualStopped(posture)));
                }
                None => {
                    let _ = actions.push(Action::Notify(Status::Busy));
                }
            }
            return;
        }

        if self.leveler.is_active() {
            let _ = actions.push(Action::Notify(Status::AutoRunning));
            return;
        }

        if self.arbiter.begin_manual(channel, now_ms) {
            let _ = actions.push(Action::Actuate { channel, on: true });
            let _ = actions.push(Action::Notify(Status::ManualStarted(posture)));
        }
    }

    fn handle_auto(&mut self, slot: u8, actions: &mut Actions) {
        if self.arbiter.is_locked() {
            let _ = actions.push(Action::Notify(Status::Busy));
            return;
        }
        // The preset lives in flash; the task loads it and calls back
        // into preset_loaded. A new AUTO while leveling re-targets.
        let _ = actions.push(Action::LoadPreset {
            slot: clamp_slot(slot),
        });
    }

    /// Continuation of an AUTO command once the preset is loaded
    pub fn preset_loaded(&mut self, slot: u8, target: TiltPair) -> Actions {
        let mut actions = Actions::new();
        if self.suspended {
            return actions;
        }

        // A never-saved preset reads back as (0.0, 0.0); that exact pair
        // is treated as missing even if deliberately saved.
        if target == TiltPair::new(0, 0) {
            let _ = actions.push(Action::Notify(Status::NoSuchPreset { slot }));
            return actions;
        }

        let Some(current) = self.tilt else {
            let _ = actions.push(Action::Notify(Status::SensorsUnavailable));
            return actions;
        };

        let was_active = self.leveler.is_active();
        match self.leveler.activate(target, current) {
            Activation::AlreadyAtTarget => {
                if was_active {
                    // Re-target landed inside tolerance: stop the run
                    self.leveler.deactivate();
                    let _ = actions.push(Action::AllOff);
                }
                let _ = actions.push(Action::Notify(Status::AlreadyAtTarget));
            }
            Activation::Started { seed: _ } => {
                if was_active {
                    let _ = actions.push(Action::AllOff);
                }
                let _ = actions.push(Action::Notify(Status::AutoStarted { slot }));
            }
        }

        actions
    }

    fn handle_save(&mut self, slot: u8, now_ms: u32, actions: &mut Actions) {
        if self.arbiter.is_locked() {
            let _ = actions.push(Action::Notify(Status::Busy));
            return;
        }

        let Some(current) = self.tilt else {
            let _ = actions.push(Action::Notify(Status::SensorsUnavailable));
            return;
        };

        // Debounce is checked last so a rejected save never consumes
        // the window; rejection is silent by contract.
        if !self.arbiter.accept_save(now_ms) {
            return;
        }

        let slot = clamp_slot(slot);
        let _ = actions.push(Action::StorePreset {
            slot,
            target: current,
        });
        let _ = actions.push(Action::Notify(Status::PresetSaved { slot }));
    }

    /// One 200 ms control tick
    ///
    /// `presence` is the latest presence ADC reading, if the sensors task
    /// produced one since the previous tick.
    pub fn tick(&mut self, now_ms: u32, presence: Option<u16>) -> Actions {
        let mut actions = Actions::new();
        if self.suspended {
            return actions;
        }

        // Manual lock timer
        if let Some(channel) = self.arbiter.poll_expiry(now_ms) {
            let _ = actions.push(Action::Actuate { channel, on: false });
            let _ = actions.push(Action::Notify(Status::ManualComplete(channel_posture(
                channel,
            ))));
        }

        // Auto-leveling step
        match self.leveler.tick(self.tilt, now_ms) {
            TickOutcome::Inactive => {}
            TickOutcome::SensorLost => {
                let _ = actions.push(Action::AllOff);
                let _ = actions.push(Action::Notify(Status::SensorsUnavailable));
            }
            TickOutcome::Effect(step) => match step {
                Step::Hold => {}
                Step::Converged => {
                    let _ = actions.push(Action::AllOff);
                    let _ = actions.push(Action::Notify(Status::Converged));
                }
                Step::BeginSettle { off } => {
                    let _ = actions.push(Action::Actuate {
                        channel: off,
                        on: false,
                    });
                }
                Step::EngageOpposite { on } => {
                    let _ = actions.push(Action::Engage(on));
                }
            },
        }

        // Occupancy dwell
        if let Some(raw) = presence {
            if let Occupancy::SuspendDue = self.occupancy.update(raw, self.tick_interval_ms) {
                self.suspended = true;
                let _ = actions.push(Action::AllOff);
                let _ = actions.push(Action::Notify(Status::Suspending));
                let _ = actions.push(Action::Suspend);
            }
        }

        actions
    }
}
