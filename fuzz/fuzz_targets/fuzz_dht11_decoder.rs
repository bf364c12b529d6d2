//! Fuzz target: `Dht11::decode` over arbitrary line activity.
//!
//! Each input byte is one run on the data line: bit 7 is the level, bits
//! 0-6 the number of reads it lasts. Runs alternate freely, so the decoder
//! sees glitches, truncated frames and stuck lines.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every wait is bounded: total reads never exceed
//!   `(3 handshake + 80 bit phases) × (limit + 1)`
//! - The line is released (back to input) after every attempt
//! - An accepted frame always satisfies the checksum rule
//!
//! cargo fuzz run fuzz_dht11_decoder

#![no_main]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use verdant::app::ports::{Direction, LineLevel, SingleWireLine};
use verdant::config::Dht11Timing;
use verdant::sensors::dht11::Dht11;
use verdant::sensors::frame::CHECKSUM_TOLERANCE;

const LIMIT: u32 = 64;

struct FuzzLine {
    runs: VecDeque<(LineLevel, u32)>,
    reads: u32,
    direction: Direction,
}

impl SingleWireLine for FuzzLine {
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn write(&mut self, _level: LineLevel) {}

    fn read(&mut self) -> LineLevel {
        self.reads += 1;
        while matches!(self.runs.front(), Some(&(_, 0))) {
            self.runs.pop_front();
        }
        match self.runs.front_mut() {
            Some(run) => {
                run.1 -= 1;
                run.0
            }
            None => LineLevel::High,
        }
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let runs = data
        .iter()
        .map(|&b| (LineLevel::from(b & 0x80 != 0), u32::from(b & 0x7F)))
        .collect();
    let line = FuzzLine {
        runs,
        reads: 0,
        direction: Direction::Input,
    };
    let timing = Dht11Timing {
        polling_limit: LIMIT,
        bit_threshold: 8,
        settle_ms: 0,
        ..Dht11Timing::default()
    };

    let mut dht = Dht11::new(line, NoDelay, timing);
    let result = dht.decode();
    let (line, _) = dht.into_parts();

    assert!(line.reads <= (3 + 80) * (LIMIT + 1), "unbounded wait: {} reads", line.reads);
    assert_eq!(line.direction, Direction::Input, "line not released");

    if let Ok(frame) = result {
        let diff = i32::from(frame.data_sum()) - i32::from(frame.checksum());
        assert!(diff <= CHECKSUM_TOLERANCE, "accepted bad checksum: {:?}", frame);
    }
});
