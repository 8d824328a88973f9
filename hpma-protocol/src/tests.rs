// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;

/// Build a valid measurement response frame for the given concentrations.
fn measurement_frame(pm2_5: u16, pm10: u16) -> [u8; MEASUREMENT_FRAME_LEN] {
    let [hi25, lo25] = pm2_5.to_be_bytes();
    let [hi10, lo10] = pm10.to_be_bytes();
    let mut frame = [0x40, 0x05, 0x04, hi25, lo25, hi10, lo10, 0];
    frame[7] = checksum(&frame[..7]);
    frame
}

#[test]
fn command_frames_match_datasheet() {
    // Checksum values straight from the HPMA115S0 datasheet examples.
    assert_eq!(read_measurement_cmd(), [0x68, 0x01, 0x04, 0x93]);
    assert_eq!(start_measurement_cmd(), [0x68, 0x01, 0x01, 0x96]);
    assert_eq!(stop_measurement_cmd(), [0x68, 0x01, 0x02, 0x95]);
    assert_eq!(set_auto_send_cmd(false), [0x68, 0x01, 0x20, 0x77]);
    assert_eq!(set_auto_send_cmd(true), [0x68, 0x01, 0x40, 0x57]);
}

#[test]
fn parse_decodes_measurement() {
    let frame = measurement_frame(35, 58);
    let m = Measurement::parse(&frame).unwrap();
    assert_eq!(m, Measurement { pm2_5: 35, pm10: 58 });
}

#[test]
fn parse_rejects_bad_checksum() {
    let mut frame = measurement_frame(35, 58);
    frame[7] = frame[7].wrapping_add(1);
    assert_eq!(Measurement::parse(&frame), Err(FrameError::Checksum));
}

#[test]
fn parse_rejects_wrong_header() {
    let mut frame = measurement_frame(35, 58);
    frame[0] = 0x41;
    assert_eq!(Measurement::parse(&frame), Err(FrameError::Header));

    let mut frame = measurement_frame(35, 58);
    frame[2] = 0x05;
    assert_eq!(Measurement::parse(&frame), Err(FrameError::Header));
}

#[test]
fn accumulator_decodes_split_input() {
    let frame = measurement_frame(12, 700);
    let mut acc = Accumulator::new();

    assert_eq!(acc.feed(&frame[..3]), FeedResult::Consumed);
    match acc.feed(&frame[3..]) {
        FeedResult::Frame {
            measurement,
            remaining,
        } => {
            assert_eq!(measurement, Measurement { pm2_5: 12, pm10: 700 });
            assert!(remaining.is_empty());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn accumulator_skips_leading_noise() {
    let frame = measurement_frame(1, 2);
    let mut input = [0u8; 3 + MEASUREMENT_FRAME_LEN];
    input[..3].copy_from_slice(&[0xA5, 0xA5, 0x00]);
    input[3..].copy_from_slice(&frame);

    let mut acc = Accumulator::new();
    match acc.feed(&input) {
        FeedResult::Frame { measurement, .. } => {
            assert_eq!(measurement, Measurement { pm2_5: 1, pm10: 2 });
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn accumulator_recovers_after_corrupt_frame() {
    let good = measurement_frame(44, 55);
    let mut corrupt = measurement_frame(9, 9);
    corrupt[7] = corrupt[7].wrapping_add(1);

    let mut input = [0u8; 2 * MEASUREMENT_FRAME_LEN];
    input[..MEASUREMENT_FRAME_LEN].copy_from_slice(&corrupt);
    input[MEASUREMENT_FRAME_LEN..].copy_from_slice(&good);

    let mut acc = Accumulator::new();
    let remaining = match acc.feed(&input) {
        FeedResult::Error {
            err: FrameError::Checksum,
            remaining,
        } => remaining,
        other => panic!("unexpected result: {:?}", other),
    };
    match acc.feed(remaining) {
        FeedResult::Frame { measurement, .. } => {
            assert_eq!(measurement, Measurement { pm2_5: 44, pm10: 55 });
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn accumulator_resyncs_on_header_inside_dropped_frame() {
    // A truncated frame start followed by a complete good frame: the
    // first 8 bytes fail the checksum, but the good frame's header is
    // inside them and must not be lost.
    let good = measurement_frame(123, 456);
    let mut input = [0u8; 4 + MEASUREMENT_FRAME_LEN];
    input[..4].copy_from_slice(&[0x40, 0x05, 0x04, 0x00]);
    input[4..].copy_from_slice(&good);

    let mut acc = Accumulator::new();
    let remaining = match acc.feed(&input) {
        FeedResult::Error { remaining, .. } => remaining,
        other => panic!("unexpected result: {:?}", other),
    };
    match acc.feed(remaining) {
        FeedResult::Frame { measurement, .. } => {
            assert_eq!(measurement, Measurement { pm2_5: 123, pm10: 456 });
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
