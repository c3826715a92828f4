//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod actuator;
pub mod controller;
pub mod link_rx;
pub mod link_tx;
pub mod orientation;
pub mod sensors;
pub mod tick;

pub use actuator::{actuator_task, RelayOut};
pub use controller::controller_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use orientation::{orientation_task, SamplerConfig};
pub use sensors::{sensors_task, SensorsConfig};
pub use tick::tick_task;
