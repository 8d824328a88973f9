// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

/// One particulate sample, concentrations in µg/m³.
///
/// Values are conventionally below 1000; the status line clamps larger
/// ones to keep its fixed width (see [`crate::format`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Fine particulate matter (PM2.5).
    pub pm2_5: u16,
    /// Coarse particulate matter (PM10).
    pub pm10: u16,
}
