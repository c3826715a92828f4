//! Wireless gateway line protocol
//!
//! This crate defines the serial protocol between the firmware and the
//! wireless gateway module that carries the remote-control link. The
//! gateway is a line-oriented modem: one `\n`-terminated message per line
//! in either direction.
//!
//! # Protocol overview
//!
//! Inbound (gateway to firmware):
//! - `+CONN:<identity>` - a client connected; identity is the peer address
//! - `+DISC` - the client disconnected
//! - command text forwarded verbatim from the client (`ON1`, `AUTO2`,
//!   `Sit`, ...)
//!
//! Outbound (firmware to gateway):
//! - `+NAME=<name>` once at startup to set the advertised device name
//! - free-text status lines, forwarded to the connected client
//!
//! The gateway handles pairing, advertising, and connection management
//! itself; this crate only parses and renders lines.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod line;
pub mod status;

pub use command::{Command, Posture, DEFAULT_SLOT};
pub use events::{parse_event, Identity, LinkEvent, MAX_IDENTITY_LEN};
pub use line::{LineReader, MAX_LINE_LEN};
pub use status::{Status, MAX_STATUS_LEN};
