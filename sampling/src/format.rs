// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status line and notification payload formatting.
//!
//! The status line is fixed width so successive samples overwrite each
//! other cleanly on the panel. Over-range values are clamped to the
//! three-digit field, never widened. The notification payloads go
//! through capacity-checked writes; blowing the 20-byte budget is a
//! typed error, not a truncated packet.

use core::fmt::Write;

use consts::PM_PAYLOAD_MAX;
use heapless::String;

use crate::Reading;

/// Capacity of a status line: `"NNN P25:XXX P10:YYY  "` plus slack.
pub const STATUS_LINE_MAX: usize = 24;

/// Largest value a three-digit status-line field can show.
const DISPLAY_CLAMP: u16 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// The formatted text did not fit its buffer.
    Overflow,
}

/// Render the fixed-width status line for one tick. Failed reads carry
/// the trailing `E` marker instead of the two-space pad.
pub fn status_line(
    seq: u16,
    reading: &Reading,
    ok: bool,
) -> Result<String<STATUS_LINE_MAX>, FormatError> {
    let mut line = String::new();
    write!(
        line,
        "{:03} P25:{:03} P10:{:03}{}",
        seq.min(DISPLAY_CLAMP),
        reading.pm2_5.min(DISPLAY_CLAMP),
        reading.pm10.min(DISPLAY_CLAMP),
        if ok { "  " } else { " E" },
    )
    .map_err(|_| FormatError::Overflow)?;
    Ok(line)
}

/// Notification payload for the fine-particulate characteristic.
pub fn fine_payload(reading: &Reading) -> Result<String<PM_PAYLOAD_MAX>, FormatError> {
    let mut payload = String::new();
    write!(payload, "{{\"P25\":{}}}", reading.pm2_5).map_err(|_| FormatError::Overflow)?;
    Ok(payload)
}

/// Notification payload for the coarse-particulate characteristic.
pub fn coarse_payload(reading: &Reading) -> Result<String<PM_PAYLOAD_MAX>, FormatError> {
    let mut payload = String::new();
    write!(payload, "{{\"P10\":{}}}", reading.pm10).map_err(|_| FormatError::Overflow)?;
    Ok(payload)
}
