// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

use core::mem;

use consts::{ATT_MTU, DEVICE_NAME, SERVICES_LIST, SETTLE_DELAY_MS, SHORT_NAME};
use defmt::{error, info};
use embassy_time::Timer;
use nrf_softdevice::ble::advertisement_builder::{
    ExtendedAdvertisementBuilder, ExtendedAdvertisementPayload, Flag, ServiceList,
};
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::gatt_server;
use nrf_softdevice::{raw, Softdevice};

use crate::pms::Pms;
use crate::{CONNECTION, SUBSCRIBED};

#[gatt_server]
pub struct Server {
    pub(crate) pms: Pms,
}

impl Server {
    fn handle_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::Pms(e) => self.pms.handle(e),
        }
    }
}

pub fn initialize_sd() -> &'static mut Softdevice {
    let config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: ATT_MTU as u16 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(raw::BLE_GATTS_VLOC_STACK as u8),
        }),
        // One HVN queue slot: a congested peer back-pressures into the
        // sampling period instead of queueing stale readings.
        conn_gatts: Some(raw::ble_gatts_conn_cfg_t { hvn_tx_queue_size: 1 }),

        ..Default::default()
    };

    Softdevice::enable(&config)
}

pub async fn run_bluetooth(sd: &'static Softdevice, server: &Server) {
    static ADV_DATA: ExtendedAdvertisementPayload = ExtendedAdvertisementBuilder::new()
        .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
        .services_128(ServiceList::Complete, &SERVICES_LIST)
        .short_name(SHORT_NAME)
        .build();

    static SCAN_DATA: ExtendedAdvertisementPayload = ExtendedAdvertisementBuilder::new().full_name(DEVICE_NAME).build();

    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &ADV_DATA,
        scan_data: &SCAN_DATA,
    };

    loop {
        // Set advertising timer in units of 625us (about 50ms with 75 units)
        let config = peripheral::Config {
            interval: 75,
            ..Default::default()
        };

        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("advertise error: {:?}", e);
                Timer::after_millis(SETTLE_DELAY_MS).await;
                continue;
            }
        };
        info!("advertising done!");

        *CONNECTION.write().await = Some(conn.clone());

        // Runs until the peer disconnects.
        let e = gatt_server::run(&conn, server, |e| server.handle_event(e)).await;
        info!("gatt_server run exited: {:?}", e);

        *CONNECTION.write().await = None;
        SUBSCRIBED.store(false, core::sync::atomic::Ordering::Relaxed);

        // Give the softdevice the chance to get things ready again
        // before restarting advertising.
        Timer::after_millis(SETTLE_DELAY_MS).await;
        info!("start advertising");
    }
}
