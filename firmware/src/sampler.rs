// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! The scheduler loop.
//!
//! One iteration = one [`LinkMonitor`] tick. While a peer is
//! subscribed each tick runs one strictly sequential
//! sample → display → notify cycle, then holds for the sampling
//! period; that hold is the backpressure keeping the softdevice's
//! notification queue drained. While idle the loop only polls the
//! subscription flag.

use consts::{HISTORY_DEPTH, IDLE_POLL_MS, NOTIFY_ON_READ_FAILURE, SAMPLING_PERIOD_MS};
use defmt::{error, info, warn};
use embassy_time::Timer;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use nrf_softdevice::ble::gatt_server::{notify_value, set_value, NotifyValueError};
use nrf_softdevice::{RawError, Softdevice};
use sampling::{format, Gateway, History, LinkMonitor, Reading, Sensor, Tick};

use crate::panel::Panel;
use crate::server::Server;
use crate::{CONNECTION, SUBSCRIBED};

pub async fn run_sampler<S, D>(
    sd: &Softdevice,
    server: &Server,
    mut gateway: Gateway<S>,
    mut panel: Panel<D>,
) -> !
where
    S: Sensor,
    D: DrawTarget<Color = Rgb565>,
{
    let mut monitor = LinkMonitor::new();
    let mut history: History<HISTORY_DEPTH> = History::new();

    loop {
        match monitor.tick(SUBSCRIBED.load(core::sync::atomic::Ordering::Relaxed)) {
            Tick::Sample { seq } => {
                let (reading, ok) = gateway.try_read().await;
                show(&mut panel, seq, &reading, ok);
                history.push(reading);

                if ok || NOTIFY_ON_READ_FAILURE {
                    publish(sd, server, &reading).await;
                }

                Timer::after_millis(SAMPLING_PERIOD_MS).await;
            }
            Tick::Dropped => {
                info!("peer gone, back to idle screen");
                panel.welcome();
            }
            Tick::Idle => Timer::after_millis(IDLE_POLL_MS).await,
        }
    }
}

fn show<D>(panel: &mut Panel<D>, seq: u16, reading: &Reading, ok: bool)
where
    D: DrawTarget<Color = Rgb565>,
{
    match format::status_line(seq, reading, ok) {
        Ok(line) => {
            if ok {
                info!("{=str}", line.as_str());
            } else {
                warn!("sensor read failed: {=str}", line.as_str());
            }
            panel.status(line.as_str());
        }
        Err(_) => error!("status line overflowed its buffer"),
    }
}

/// Update the characteristic values and notify the subscriber. When
/// the read failed this still publishes the gateway's last-known
/// values (see `consts::NOTIFY_ON_READ_FAILURE`).
async fn publish(sd: &Softdevice, server: &Server, reading: &Reading) {
    match format::fine_payload(reading) {
        Ok(payload) => notify(sd, server.pms.fine_handle(), payload.as_bytes()).await,
        Err(_) => error!("fine payload too large to notify"),
    }

    // The coarse value stays readable either way; notifying it too is
    // a build-time choice (`coarse-channel`).
    match format::coarse_payload(reading) {
        Ok(payload) => {
            #[cfg(feature = "coarse-channel")]
            notify(sd, server.pms.coarse_handle(), payload.as_bytes()).await;

            #[cfg(not(feature = "coarse-channel"))]
            if let Err(e) = set_value(sd, server.pms.coarse_handle(), payload.as_bytes()) {
                error!("set_value error: {:?}", e);
            }
        }
        Err(_) => error!("coarse payload too large to notify"),
    }
}

async fn notify(sd: &Softdevice, handle: u16, payload: &[u8]) {
    if let Err(e) = set_value(sd, handle, payload) {
        error!("set_value error: {:?}", e);
        return;
    }

    let connection = CONNECTION.read().await;
    let Some(conn) = connection.as_ref() else {
        return;
    };
    match notify_value(conn, handle, payload) {
        Ok(()) => {}
        Err(NotifyValueError::Raw(RawError::BleGattsSysAttrMissing)) => {
            // Ignore this error, no need to be spammed while we are
            // waiting for sys attrs to be available
        }
        Err(e) => error!("notify error: {:?}", e),
    }
}
