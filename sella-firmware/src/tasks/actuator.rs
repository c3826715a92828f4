//! Actuator relay task
//!
//! Sole owner of the two direction relays. Every relay change in the
//! system flows through this task's command channel, so the interlock
//! check in the driver sees the true relay state.

use defmt::*;
use embassy_rp::gpio::Output;

use sella_drivers::relay::{RelayPair, RelayPin};

use crate::channels::{ActuatorCommand, ACTUATOR_CMD};

/// Relay GPIO output
pub struct RelayOut(Output<'static>);

impl RelayOut {
    pub fn new(pin: Output<'static>) -> Self {
        Self(pin)
    }
}

impl RelayPin for RelayOut {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Actuator task - applies relay commands from the controller
#[embassy_executor::task]
pub async fn actuator_task(mut relays: RelayPair<RelayOut>) {
    info!("Actuator task started");

    // Known-safe starting state
    relays.all_off();

    loop {
        match ACTUATOR_CMD.receive().await {
            ActuatorCommand::Set { channel, on } => {
                if on {
                    if relays.energize(channel).is_err() {
                        warn!(
                            "Relay {} refused, opposite still energized",
                            channel.index()
                        );
                    }
                } else {
                    relays.release(channel);
                }
            }
            ActuatorCommand::Engage(channel) => {
                if relays.energize(channel).is_err() {
                    warn!("Interlock refused relay {}", channel.index());
                }
            }
            ActuatorCommand::AllOff => {
                relays.all_off();
            }
        }
    }
}
