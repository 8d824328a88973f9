// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Honeywell HPMA115S0 particle sensor wire protocol.
//!
//! The sensor speaks a fixed-frame protocol over UART (9600 8N1). In
//! host-query mode (auto-send disabled) every exchange is one command
//! frame out, one response frame back. This crate owns the frame
//! building, checksum verification and measurement decoding; it never
//! touches the transport.

#![no_std]

#[cfg(test)]
mod tests;

/// First byte of every host-to-sensor command frame.
pub const CMD_HEAD: u8 = 0x68;

/// First byte of a sensor measurement response frame.
pub const RESP_HEAD: u8 = 0x40;

/// Positive acknowledge sent by the sensor for control commands.
pub const ACK: [u8; 2] = [0xA5, 0xA5];

/// Negative acknowledge sent by the sensor for control commands.
pub const NACK: [u8; 2] = [0x96, 0x96];

/// Length of every command frame: head, length, command, checksum.
pub const CMD_FRAME_LEN: usize = 4;

/// Length of a measurement response frame: head, length, command,
/// two big-endian data words and the checksum byte.
pub const MEASUREMENT_FRAME_LEN: usize = 8;

const CMD_START_MEASUREMENT: u8 = 0x01;
const CMD_STOP_MEASUREMENT: u8 = 0x02;
const CMD_READ_MEASUREMENT: u8 = 0x04;
const CMD_ENABLE_AUTO_SEND: u8 = 0x40;
const CMD_DISABLE_AUTO_SEND: u8 = 0x20;
const MEASUREMENT_DATA_LEN: u8 = 0x05;

/// Frame checksum: the low byte of the two's complement of the byte sum.
fn checksum(bytes: &[u8]) -> u8 {
    let sum: u32 = bytes.iter().map(|&b| u32::from(b)).sum();
    ((65536 - sum) % 256) as u8
}

fn command(cmd: u8) -> [u8; CMD_FRAME_LEN] {
    let mut frame = [CMD_HEAD, 0x01, cmd, 0];
    frame[3] = checksum(&frame[..3]);
    frame
}

/// Command frame requesting one particle measurement.
pub fn read_measurement_cmd() -> [u8; CMD_FRAME_LEN] {
    command(CMD_READ_MEASUREMENT)
}

/// Command frame starting the fan and the measurement cycle.
pub fn start_measurement_cmd() -> [u8; CMD_FRAME_LEN] {
    command(CMD_START_MEASUREMENT)
}

/// Command frame stopping the measurement cycle.
pub fn stop_measurement_cmd() -> [u8; CMD_FRAME_LEN] {
    command(CMD_STOP_MEASUREMENT)
}

/// Command frame switching the sensor between auto-send and host-query
/// mode. This firmware always disables auto-send at bring-up.
pub fn set_auto_send_cmd(enabled: bool) -> [u8; CMD_FRAME_LEN] {
    if enabled {
        command(CMD_ENABLE_AUTO_SEND)
    } else {
        command(CMD_DISABLE_AUTO_SEND)
    }
}

/// One decoded particle measurement, concentrations in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub pm2_5: u16,
    pub pm10: u16,
}

/// Why a complete response frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Head, length or command byte did not match a measurement response.
    Header,
    /// Byte sum did not match the trailing checksum.
    Checksum,
}

impl Measurement {
    /// Decode a complete measurement response frame.
    pub fn parse(frame: &[u8; MEASUREMENT_FRAME_LEN]) -> Result<Self, FrameError> {
        if frame[0] != RESP_HEAD
            || frame[1] != MEASUREMENT_DATA_LEN
            || frame[2] != CMD_READ_MEASUREMENT
        {
            return Err(FrameError::Header);
        }
        if checksum(&frame[..MEASUREMENT_FRAME_LEN - 1]) != frame[MEASUREMENT_FRAME_LEN - 1] {
            return Err(FrameError::Checksum);
        }
        Ok(Self {
            pm2_5: u16::from_be_bytes([frame[3], frame[4]]),
            pm10: u16::from_be_bytes([frame[5], frame[6]]),
        })
    }
}

/// Result of feeding bytes into the [`Accumulator`].
#[derive(Debug, PartialEq, Eq)]
pub enum FeedResult<'a> {
    /// All input consumed, no complete frame yet.
    Consumed,
    /// A complete frame was rejected. Unconsumed input follows; the
    /// accumulator has already resynchronized on the next header
    /// candidate inside the dropped frame, if any.
    Error { err: FrameError, remaining: &'a [u8] },
    /// A valid measurement frame was decoded. Unconsumed input follows.
    Frame {
        measurement: Measurement,
        remaining: &'a [u8],
    },
}

/// Streaming frame assembler for the measurement response.
///
/// UART delivers arbitrary chunks; the accumulator skips leading noise
/// until a header byte, collects one frame worth of bytes and decodes
/// it. Callers loop over `feed` with the unconsumed remainder until
/// `Consumed`.
pub struct Accumulator {
    buf: [u8; MEASUREMENT_FRAME_LEN],
    len: usize,
}

impl Accumulator {
    pub const fn new() -> Self {
        Self {
            buf: [0; MEASUREMENT_FRAME_LEN],
            len: 0,
        }
    }

    /// Drop accumulated bytes, e.g. before issuing a fresh command.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    pub fn feed<'a>(&mut self, input: &'a [u8]) -> FeedResult<'a> {
        let mut consumed = 0;
        while consumed < input.len() {
            let byte = input[consumed];
            consumed += 1;

            // Between frames, anything that is not a header is noise.
            if self.len == 0 && byte != RESP_HEAD {
                continue;
            }

            self.buf[self.len] = byte;
            self.len += 1;

            if self.len == MEASUREMENT_FRAME_LEN {
                let frame = self.buf;
                match Measurement::parse(&frame) {
                    Ok(measurement) => {
                        self.len = 0;
                        return FeedResult::Frame {
                            measurement,
                            remaining: &input[consumed..],
                        };
                    }
                    Err(err) => {
                        // Resynchronize on the next header candidate past
                        // the rejected frame's leading byte.
                        self.len = match frame[1..].iter().position(|&b| b == RESP_HEAD) {
                            Some(pos) => {
                                let start = pos + 1;
                                self.buf.copy_within(start.., 0);
                                MEASUREMENT_FRAME_LEN - start
                            }
                            None => 0,
                        };
                        return FeedResult::Error {
                            err,
                            remaining: &input[consumed..],
                        };
                    }
                }
            }
        }
        FeedResult::Consumed
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
