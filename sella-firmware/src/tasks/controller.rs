//! Main controller task
//!
//! Single owner of all control state. Selects over inbound link events
//! and the 200 ms tick, runs the pure controller, and applies the
//! resulting actions: relay commands, status lines, and preset store
//! operations. Flash access happens here, between control steps, never
//! inside them.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Instant;

use sella_core::config::{ArbiterConfig, LevelingConfig, OccupancyConfig};
use sella_core::occupancy::OccupancyMonitor;
use sella_hal_rp2040::Rp2040FlashStore;
use sella_link::LinkEvent;

use crate::channels::{
    ActuatorCommand, ACTUATOR_CMD, CONNECTED, LINK_EVENTS, PRESENCE, STATUS_OUT, TILT_READING,
};
use crate::controller::{Action, Actions, Controller};
use crate::presets::PresetStore;
use crate::tasks::tick::TICK_SIGNAL;

type Store = PresetStore<Rp2040FlashStore<'static>>;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut store: Store) {
    info!("Controller task started");

    let occupancy_cfg = OccupancyConfig::default();
    let mut controller = Controller::new(
        LevelingConfig::default(),
        ArbiterConfig::default(),
        occupancy_cfg,
    );

    loop {
        match select(LINK_EVENTS.receive(), TICK_SIGNAL.wait()).await {
            Either::First(event) => match event {
                LinkEvent::Connected(identity) => {
                    info!("Client connected: {=str}", identity.as_str());
                    controller.on_connect(identity.as_str());
                    CONNECTED.store(true, Ordering::Relaxed);
                }
                LinkEvent::Disconnected => {
                    info!("Client disconnected");
                    CONNECTED.store(false, Ordering::Relaxed);
                    controller.on_disconnect();
                }
                LinkEvent::Command(cmd) => {
                    debug!("Command: {:?}", cmd);
                    let now_ms = Instant::now().as_millis() as u32;
                    let actions = controller.handle_command(cmd, now_ms);
                    apply(&mut controller, &mut store, actions, &occupancy_cfg).await;
                }
                LinkEvent::Unrecognized => {
                    // Filtered in the RX task
                }
            },

            Either::Second(now_ms) => {
                // Latest sensor values published since the previous tick
                if let Some(sample) = TILT_READING.try_take() {
                    controller.set_tilt(sample);
                }
                let presence = PRESENCE.try_take();

                let actions = controller.tick(now_ms, presence);
                apply(&mut controller, &mut store, actions, &occupancy_cfg).await;
            }
        }
    }
}

/// Apply a batch of controller actions in order
async fn apply(
    controller: &mut Controller,
    store: &mut Store,
    actions: Actions,
    occupancy_cfg: &OccupancyConfig,
) {
    for action in actions {
        match action {
            Action::LoadPreset { slot } => {
                let target = store.get(controller.owner(), slot).await;
                // Feed the loaded preset back; the follow-up actions
                // never touch the store again
                for follow in controller.preset_loaded(slot, target) {
                    apply_effect(follow, occupancy_cfg).await;
                }
            }
            Action::StorePreset { slot, target } => {
                if let Err(e) = store.put(controller.owner(), slot, target).await {
                    warn!("Preset write failed: {:?}", e);
                }
            }
            other => apply_effect(other, occupancy_cfg).await,
        }
    }
}

/// Apply a single store-free action
async fn apply_effect(action: Action, occupancy_cfg: &OccupancyConfig) {
    match action {
        Action::Actuate { channel, on } => {
            ACTUATOR_CMD.send(ActuatorCommand::Set { channel, on }).await;
        }
        Action::Engage(channel) => {
            ACTUATOR_CMD.send(ActuatorCommand::Engage(channel)).await;
        }
        Action::AllOff => {
            ACTUATOR_CMD.send(ActuatorCommand::AllOff).await;
        }
        Action::Notify(status) => {
            if STATUS_OUT.try_send(status).is_err() {
                warn!("Status channel full, dropping line");
            }
        }
        Action::Suspend => {
            suspend(occupancy_cfg).await;
        }
        Action::LoadPreset { .. } | Action::StorePreset { .. } => {
            // Store actions are handled one level up
        }
    }
}

/// Terminal suspension: wait for the seat to be reoccupied, then reset
///
/// No in-memory state survives suspension; the wake path is a full
/// system reset back through boot.
async fn suspend(occupancy_cfg: &OccupancyConfig) -> ! {
    info!("Suspended on sustained vacancy, waiting for presence");

    loop {
        let raw = PRESENCE.wait().await;
        if OccupancyMonitor::is_wake(raw, occupancy_cfg) {
            info!("Presence detected, resetting");
            cortex_m::peripheral::SCB::sys_reset();
        }
    }
}
