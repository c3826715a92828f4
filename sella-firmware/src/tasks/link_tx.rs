//! Gateway UART transmit task
//!
//! Pushes the advertised device name once at startup, then drains the
//! outbound status channel. Lines are best-effort: while no client
//! session exists they are consumed and dropped.

use core::fmt::Write as _;
use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use crate::channels::{CONNECTED, STATUS_OUT};

/// Name the gateway advertises to clients
const DEVICE_NAME: &str = "SELLA_SEAT";

/// Link TX task - writes lines to the gateway
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    // Configure the gateway's advertised identity once at startup
    let mut name_line: String<40> = String::new();
    let _ = write!(name_line, "+NAME={}", DEVICE_NAME);
    send_line(&mut tx, name_line.as_str()).await;

    loop {
        let status = STATUS_OUT.receive().await;

        if !CONNECTED.load(Ordering::Relaxed) {
            trace!("No session, dropping status line");
            continue;
        }

        let line = status.render();
        send_line(&mut tx, line.as_str()).await;
    }
}

async fn send_line(tx: &mut BufferedUartTx, line: &str) {
    let result = async {
        tx.write_all(line.as_bytes()).await?;
        tx.write_all(b"\n").await
    }
    .await;

    if result.is_err() {
        warn!("Failed to write line to gateway");
    }
}
