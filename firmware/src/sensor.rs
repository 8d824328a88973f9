// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! HPMA115S0 transport driver on the sensor UART.
//!
//! The sensor runs in host-query mode: every tick sends one read
//! command and collects the 8-byte response through the protocol
//! accumulator. All waits are bounded by
//! [`consts::SENSOR_READ_TIMEOUT_MS`]; a timeout surfaces as a failed
//! read attempt and the gateway's stale-value semantics take over.

use consts::SENSOR_READ_TIMEOUT_MS;
use defmt::{info, warn};
use embassy_nrf::buffered_uarte::BufferedUarte;
use embassy_nrf::peripherals::{TIMER1, UARTE0};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};
use hpma_protocol::{self as protocol, Accumulator, FeedResult, Measurement, ACK};
use sampling::{Reading, Sensor};

#[derive(Debug, defmt::Format)]
pub enum SensorError {
    /// The UART transport failed.
    Transport,
    /// No complete valid response within the timeout.
    Timeout,
    /// The sensor refused a control command.
    Nack,
}

pub struct Hpma115s0<'d> {
    uart: BufferedUarte<'d, UARTE0, TIMER1>,
    acc: Accumulator,
}

impl<'d> Hpma115s0<'d> {
    pub fn new(uart: BufferedUarte<'d, UARTE0, TIMER1>) -> Self {
        Self {
            uart,
            acc: Accumulator::new(),
        }
    }

    /// Bring the sensor into host-query mode: fan and measurement
    /// cycle on, auto-send off.
    pub async fn init(&mut self) -> Result<(), SensorError> {
        self.control(&protocol::start_measurement_cmd()).await?;
        self.control(&protocol::set_auto_send_cmd(false)).await?;
        info!("sensor ready");
        Ok(())
    }

    async fn send(&mut self, cmd: &[u8]) -> Result<(), SensorError> {
        self.uart.write_all(cmd).await.map_err(|_| SensorError::Transport)?;
        self.uart.flush().await.map_err(|_| SensorError::Transport)
    }

    /// Send a control command and wait for the two-byte acknowledge.
    async fn control(&mut self, cmd: &[u8]) -> Result<(), SensorError> {
        self.send(cmd).await?;

        let mut response = [0u8; 2];
        match with_timeout(
            Duration::from_millis(SENSOR_READ_TIMEOUT_MS),
            self.uart.read_exact(&mut response),
        )
        .await
        {
            Ok(Ok(())) => {
                if response == ACK {
                    Ok(())
                } else {
                    Err(SensorError::Nack)
                }
            }
            Ok(Err(_)) => Err(SensorError::Transport),
            Err(_) => Err(SensorError::Timeout),
        }
    }

    async fn read_measurement(&mut self) -> Result<Measurement, SensorError> {
        let mut raw = [0u8; 16];
        loop {
            let n = self
                .uart
                .read(&mut raw)
                .await
                .map_err(|_| SensorError::Transport)?;
            if n == 0 {
                return Err(SensorError::Transport);
            }

            let mut window = &raw[..n];
            while !window.is_empty() {
                match self.acc.feed(window) {
                    FeedResult::Consumed => break,
                    FeedResult::Error { err, remaining } => {
                        warn!("dropped sensor frame: {:?}", err);
                        window = remaining;
                    }
                    FeedResult::Frame { measurement, .. } => return Ok(measurement),
                }
            }
        }
    }
}

impl Sensor for Hpma115s0<'_> {
    type Error = SensorError;

    async fn measure(&mut self) -> Result<Reading, SensorError> {
        // Stale bytes from an aborted exchange must not complete this one.
        self.acc.reset();
        self.send(&protocol::read_measurement_cmd()).await?;

        match with_timeout(
            Duration::from_millis(SENSOR_READ_TIMEOUT_MS),
            self.read_measurement(),
        )
        .await
        {
            Ok(Ok(m)) => Ok(Reading {
                pm2_5: m.pm2_5,
                pm10: m.pm10,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SensorError::Timeout),
        }
    }
}
