//! Gateway UART receive task
//!
//! Reads bytes from the wireless gateway, reassembles lines, and
//! forwards decoded events to the controller. Gateway chatter that
//! matches nothing is logged and dropped here.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use sella_link::{parse_event, LineReader, LinkEvent};

use crate::channels::LINK_EVENTS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and decodes lines from the gateway
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut reader = LineReader::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    let Some(line) = reader.push(byte) else {
                        continue;
                    };

                    match parse_event(line.as_str()) {
                        LinkEvent::Unrecognized => {
                            debug!("Ignoring gateway line: {=str}", line.as_str());
                        }
                        event => {
                            if LINK_EVENTS.try_send(event).is_err() {
                                warn!("Link event channel full, dropping event");
                            }
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
