// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

#![no_std]

/// Full device name advertised over BLE.
/// This is the complete name that will appear when scanning for the device.
/// Used in scan response data since it's longer than the short name.
pub const DEVICE_NAME: &str = "Sentair PM Monitor";

/// Short device name used in limited advertising data.
/// Kept short so the advertising packet stays within the 31-byte limit
/// together with the 128-bit service UUID.
pub const SHORT_NAME: &str = "Sentair";

/// UUID of the particulate-matter GATT service.
pub const PM_SERVICE_UUID: u128 = 0xc8d1d262_861f_4082_947e_f383a259aaf3;

/// UUID of the fine-particulate (PM2.5) characteristic.
pub const PM25_CHARAC_UUID: u128 = 0xb0f332a8_a5aa_4f3f_bb43_f99e7791ae01;

/// UUID of the coarse-particulate (PM10) characteristic.
pub const PM10_CHARAC_UUID: u128 = 0xb0f332a8_a5aa_4f3f_bb43_f99e7791ae02;

/// List of BLE service UUIDs advertised by this device.
pub const SERVICES_LIST: [[u8; 16]; 1] = [PM_SERVICE_UUID.to_le_bytes()];

/// ATT MTU for the GATT connection. The notification payloads are tiny
/// JSON fragments, so the BLE 4.x default is enough.
pub const ATT_MTU: usize = 23;

/// Maximum length in bytes of a characteristic payload. A notification
/// larger than this would not fit a single ATT packet at [`ATT_MTU`].
pub const PM_PAYLOAD_MAX: usize = 20;

/// Wait between successive sample-and-notify cycles. Notifying faster
/// than this risks piling up packets in the softdevice's HVN queue
/// ("congestion") when the peer drains slowly.
pub const SAMPLING_PERIOD_MS: u64 = 5000;

/// Poll interval of the scheduler while no peer is subscribed.
pub const IDLE_POLL_MS: u64 = 200;

/// Pause after a disconnect before advertising is restarted, giving the
/// softdevice time to tear the old connection down.
pub const SETTLE_DELAY_MS: u64 = 500;

/// The sample sequence counter counts `0..COUNTER_WRAP`, then wraps to 0.
/// Display-sequence aid only; three digits on the status line.
pub const COUNTER_WRAP: u16 = 1000;

/// Depth of the rolling history of recent readings kept for debugging.
pub const HISTORY_DEPTH: usize = 32;

/// When a sensor read fails, the last successfully observed values (zeros
/// before any success) are still pushed to the subscriber. Flip this to
/// suppress notifications on failed reads instead.
pub const NOTIFY_ON_READ_FAILURE: bool = true;

/// How long a single sensor command/response exchange may take before the
/// read attempt is reported as failed.
pub const SENSOR_READ_TIMEOUT_MS: u64 = 1000;
