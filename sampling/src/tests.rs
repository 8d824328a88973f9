// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;

use consts::{COUNTER_WRAP, HISTORY_DEPTH};
use futures::executor::block_on;

/// Sensor that replays a fixed script of results.
struct ScriptedSensor {
    script: &'static [Result<Reading, ()>],
    at: usize,
}

impl ScriptedSensor {
    fn new(script: &'static [Result<Reading, ()>]) -> Self {
        Self { script, at: 0 }
    }
}

impl Sensor for ScriptedSensor {
    type Error = ();

    async fn measure(&mut self) -> Result<Reading, ()> {
        let result = self.script[self.at];
        self.at += 1;
        result
    }
}

fn reading(pm2_5: u16, pm10: u16) -> Reading {
    Reading { pm2_5, pm10 }
}

#[test]
fn counter_stays_in_range_and_wraps() {
    let mut monitor = LinkMonitor::new();
    let mut seen_wrap = false;
    let mut previous = 0;

    for _ in 0..2500 {
        match monitor.tick(true) {
            Tick::Sample { seq } => {
                assert!(seq < COUNTER_WRAP);
                if previous == COUNTER_WRAP - 1 {
                    assert_eq!(seq, 0);
                    seen_wrap = true;
                }
                previous = seq;
            }
            other => panic!("expected Sample, got {:?}", other),
        }
    }
    assert!(seen_wrap);
}

#[test]
fn counter_resets_exactly_once_per_drop() {
    let mut monitor = LinkMonitor::new();
    for _ in 0..5 {
        monitor.tick(true);
    }
    assert_eq!(monitor.counter(), 5);

    assert_eq!(monitor.tick(false), Tick::Dropped);
    assert_eq!(monitor.counter(), 0);
    assert_eq!(monitor.link(), Link::Disconnected);

    // A duplicate drop event is absorbed; the counter stays 0 and no
    // second Dropped is emitted.
    assert_eq!(monitor.tick(false), Tick::Idle);
    assert_eq!(monitor.counter(), 0);
}

#[test]
fn no_sampling_while_disconnected() {
    let mut monitor = LinkMonitor::new();
    for _ in 0..10 {
        assert_eq!(monitor.tick(false), Tick::Idle);
    }
    assert_eq!(monitor.counter(), 0);
}

#[test]
fn subscribe_then_unsubscribe_between_ticks_is_invisible() {
    let mut monitor = LinkMonitor::new();
    // The peer subscribed and unsubscribed before this tick; the flag
    // reads false again. The machine must stay Disconnected, counter 0.
    assert_eq!(monitor.tick(false), Tick::Idle);
    assert_eq!(monitor.link(), Link::Disconnected);
    assert_eq!(monitor.counter(), 0);
}

#[test]
fn reconnect_restarts_sequence_from_one() {
    let mut monitor = LinkMonitor::new();
    for _ in 0..7 {
        monitor.tick(true);
    }
    monitor.tick(false);
    assert_eq!(monitor.tick(true), Tick::Sample { seq: 1 });
}

#[test]
fn status_line_formats_good_reading() {
    let line = format::status_line(7, &reading(35, 58), true).unwrap();
    assert_eq!(line.as_str(), "007 P25:035 P10:058  ");
}

#[test]
fn status_line_marks_failed_reads() {
    let line = format::status_line(8, &reading(35, 58), false).unwrap();
    assert_eq!(line.as_str(), "008 P25:035 P10:058 E");
}

#[test]
fn status_line_clamps_over_range_values() {
    let line = format::status_line(9, &reading(1234, 4321), true).unwrap();
    assert_eq!(line.as_str(), "009 P25:999 P10:999  ");
}

#[test]
fn fine_payload_is_exact() {
    let payload = format::fine_payload(&reading(35, 58)).unwrap();
    assert_eq!(payload.as_str(), "{\"P25\":35}");

    let payload = format::coarse_payload(&reading(35, 58)).unwrap();
    assert_eq!(payload.as_str(), "{\"P10\":58}");
}

#[test]
fn fine_payload_round_trips_all_display_values() {
    for value in 0..COUNTER_WRAP {
        let payload = format::fine_payload(&reading(value, 0)).unwrap();
        let parsed: u16 = payload
            .strip_prefix("{\"P25\":")
            .and_then(|rest| rest.strip_suffix('}'))
            .and_then(|digits| digits.parse().ok())
            .unwrap();
        assert_eq!(parsed, value);
    }
}

#[test]
fn gateway_returns_zeros_on_first_failure() {
    static SCRIPT: [Result<Reading, ()>; 1] = [Err(())];
    let mut gateway = Gateway::new(ScriptedSensor::new(&SCRIPT));

    let (value, ok) = block_on(gateway.try_read());
    assert!(!ok);
    assert_eq!(value, Reading::default());
}

#[test]
fn gateway_keeps_stale_values_on_failure() {
    static SCRIPT: [Result<Reading, ()>; 3] = [
        Ok(Reading { pm2_5: 35, pm10: 58 }),
        Err(()),
        Ok(Reading { pm2_5: 12, pm10: 20 }),
    ];
    let mut gateway = Gateway::new(ScriptedSensor::new(&SCRIPT));

    let (value, ok) = block_on(gateway.try_read());
    assert!(ok);
    assert_eq!(value, reading(35, 58));

    // Failure: previous values unchanged, flagged as error.
    let (value, ok) = block_on(gateway.try_read());
    assert!(!ok);
    assert_eq!(value, reading(35, 58));

    // Recovery replaces the stale pair.
    let (value, ok) = block_on(gateway.try_read());
    assert!(ok);
    assert_eq!(value, reading(12, 20));
}

#[test]
fn history_never_exceeds_capacity() {
    let mut history: History<HISTORY_DEPTH> = History::new();
    for i in 0..(HISTORY_DEPTH as u16 + 1) {
        history.push(reading(i, i));
        assert!(history.len() <= history.capacity());
    }
    assert_eq!(history.len(), HISTORY_DEPTH);

    // The 33rd insert overwrote the oldest entry.
    assert_eq!(history.iter().next(), Some(&reading(1, 1)));
    assert_eq!(history.latest(), Some(&reading(HISTORY_DEPTH as u16, HISTORY_DEPTH as u16)));
}

#[test]
fn history_iterates_oldest_first() {
    let mut history: History<4> = History::new();
    for i in 0..6u16 {
        history.push(reading(i, 0));
    }
    let order: heapless::Vec<u16, 4> = history.iter().map(|r| r.pm2_5).collect();
    assert_eq!(order.as_slice(), &[2, 3, 4, 5]);
}
