// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::Reading;

/// Transport-level particle sensor: one bounded-latency measurement
/// attempt per call. No retries here; the scheduler's periodic tick is
/// the retry policy.
#[allow(async_fn_in_trait)]
pub trait Sensor {
    type Error;

    async fn measure(&mut self) -> Result<Reading, Self::Error>;
}

/// Wraps the sensor with stale-value semantics.
///
/// On a failed read the last successfully observed reading is returned
/// unchanged with `ok = false` — zeros before any success. Callers
/// treat `ok = false` as "use stale and mark as error", not "no data".
pub struct Gateway<S> {
    sensor: S,
    last: Reading,
}

impl<S: Sensor> Gateway<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            last: Reading::default(),
        }
    }

    /// Attempt one reading.
    pub async fn try_read(&mut self) -> (Reading, bool) {
        match self.sensor.measure().await {
            Ok(reading) => {
                self.last = reading;
                (reading, true)
            }
            Err(_) => (self.last, false),
        }
    }

    /// Last successfully observed reading.
    pub fn last(&self) -> Reading {
        self.last
    }
}
