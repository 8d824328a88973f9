// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Particulate-matter GATT service.
//!
//! One service, two characteristics carrying the JSON-fragment
//! payloads produced by [`sampling::format`]. Both are registered and
//! readable; only the fine channel is notified by default (see the
//! `coarse-channel` feature).

use consts::PM_PAYLOAD_MAX;
use defmt::info;
use heapless::Vec;
use nrf_softdevice::gatt_service;

use crate::SUBSCRIBED;

#[gatt_service(uuid = "c8d1d262-861f-4082-947e-f383a259aaf3")]
pub struct Pms {
    // Fine particulate (PM2.5), `{"P25":N}`
    #[characteristic(uuid = "b0f332a8-a5aa-4f3f-bb43-f99e7791ae01", read, notify)]
    fine: Vec<u8, PM_PAYLOAD_MAX>,

    // Coarse particulate (PM10), `{"P10":N}`
    #[characteristic(uuid = "b0f332a8-a5aa-4f3f-bb43-f99e7791ae02", read, notify)]
    coarse: Vec<u8, PM_PAYLOAD_MAX>,
}

impl Pms {
    pub(crate) fn handle(&self, event: PmsEvent) {
        match event {
            PmsEvent::FineCccdWrite { notifications } => {
                info!("fine channel subscription: {}", notifications);
                SUBSCRIBED.store(notifications, core::sync::atomic::Ordering::Relaxed);
            }
            PmsEvent::CoarseCccdWrite { notifications } => {
                // Sampling is driven by the fine channel; the coarse
                // value stays readable either way.
                info!("coarse channel subscription: {}", notifications);
            }
        }
    }

    pub(crate) fn fine_handle(&self) -> u16 {
        self.fine_value_handle
    }

    pub(crate) fn coarse_handle(&self) -> u16 {
        self.coarse_value_handle
    }
}
