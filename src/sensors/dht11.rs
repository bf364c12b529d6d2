//! DHT11 temperature / humidity sensor driver.
//!
//! # Protocol
//!
//! ```txt
//!    HOST REQUEST    ACK LOW  ACK HIGH   BIT (×40)
//!  ──┐            ┌──┐      ┌────────┐      ┌───┐      ┌───────┐
//!    │            │  │      │        │      │ 0 │      │   1   │
//!    └────────────┘  └──────┘        └──────┘   └──────┘       └──
//!       20 ms       ~20µs  80 µs    80 µs  50µs 26µs  50µs  70µs
//! ```
//!
//! The host pulls the line low for `start_hold_ms` (busy-waited), then releases it. The
//! sensor acknowledges with a low and a high pulse of ~80 µs each, then
//! sends 40 bits. Every bit starts with a ~50 µs low; the length of the
//! following high pulse carries the value.
//!
//! No capture peripheral is used. Every wait, including the per-bit waits,
//! is a [`poll::wait_while`] bounded by `polling_limit`, and a bit is a `1`
//! when its high pulse lasts at least `bit_threshold` poll iterations.
//!
//! The line is borrowed through a [`LineLease`] for the whole attempt and
//! released on every exit path, early timeouts included.

use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use log::{debug, trace};

use super::frame::{FRAME_BITS, RawFrame, SensorReading};
use super::poll::{self, PollTiming};
use crate::app::ports::{Direction, LineLevel, SingleWireLine};
use crate::config::Dht11Timing;
use crate::error::{Phase, TransmissionError};

/// Scoped exclusive use of the data line. Dropping it releases the line.
pub struct LineLease<'a, L: SingleWireLine> {
    line: &'a mut L,
}

impl<'a, L: SingleWireLine> LineLease<'a, L> {
    pub fn acquire(line: &'a mut L) -> Self {
        Self { line }
    }
}

impl<L: SingleWireLine> Deref for LineLease<'_, L> {
    type Target = L;

    fn deref(&self) -> &L {
        self.line
    }
}

impl<L: SingleWireLine> DerefMut for LineLease<'_, L> {
    fn deref_mut(&mut self) -> &mut L {
        self.line
    }
}

impl<L: SingleWireLine> Drop for LineLease<'_, L> {
    fn drop(&mut self) {
        self.line.release();
    }
}

/// A DHT11 on one single-wire line.
pub struct Dht11<L, D> {
    line: L,
    delay: D,
    timing: Dht11Timing,
}

impl<L, D> Dht11<L, D>
where
    L: SingleWireLine,
    D: DelayNs,
{
    /// Take ownership of the line and let the sensor settle for
    /// `timing.settle_ms` before the first request.
    pub fn new(mut line: L, mut delay: D, timing: Dht11Timing) -> Self {
        line.release();
        delay.delay_ms(timing.settle_ms);
        Self { line, delay, timing }
    }

    /// One request/response exchange. Never retries.
    pub fn decode(&mut self) -> Result<RawFrame, TransmissionError> {
        let timing = self.timing;
        let poll = PollTiming::from(&timing);
        let delay = &mut self.delay;
        let mut line = LineLease::acquire(&mut self.line);

        // Host request
        line.set_direction(Direction::Output);
        line.write(LineLevel::Low);
        // busy-wait: a scheduler tick can cut a millisecond sleep short of
        // the sensor's 18 ms minimum
        delay.delay_us(timing.start_hold_ms.saturating_mul(1000));
        line.set_direction(Direction::Input);

        // Sensor response
        expect_change(&mut *line, delay, LineLevel::High, poll, Phase::AwaitAckLow)?;
        expect_change(&mut *line, delay, LineLevel::Low, poll, Phase::AwaitAckHigh)?;
        expect_change(&mut *line, delay, LineLevel::High, poll, Phase::AwaitDataStart)?;

        // Data
        let mut bits: u64 = 0;
        for bit in 0..FRAME_BITS {
            expect_change(&mut *line, delay, LineLevel::Low, poll, Phase::BitLeadingLow { bit })?;
            let high = expect_change(&mut *line, delay, LineLevel::High, poll, Phase::BitHigh { bit })?;
            bits <<= 1;
            if high >= timing.bit_threshold {
                bits |= 1;
            }
        }
        drop(line);

        let frame = RawFrame::new(bits);
        trace!("dht11: raw frame {:#012x}", frame.bits());
        frame.verify_checksum().inspect_err(|e| debug!("dht11: {}", e))?;
        Ok(frame)
    }

    /// Decode and convert in one go.
    pub fn read(&mut self) -> Result<SensorReading, TransmissionError> {
        self.decode().map(RawFrame::extract)
    }

    /// Temperature only (°C). Costs a full exchange.
    pub fn read_temperature(&mut self) -> Result<f32, TransmissionError> {
        self.read().map(|r| r.temperature_c)
    }

    /// Relative humidity only (%). Costs a full exchange.
    pub fn read_humidity(&mut self) -> Result<f32, TransmissionError> {
        self.read().map(|r| r.humidity_pct)
    }

    pub fn timing(&self) -> &Dht11Timing {
        &self.timing
    }

    /// Give back the line and delay.
    pub fn into_parts(self) -> (L, D) {
        (self.line, self.delay)
    }
}

fn expect_change<L, D>(
    line: &mut L,
    delay: &mut D,
    level: LineLevel,
    timing: PollTiming,
    phase: Phase,
) -> Result<u32, TransmissionError>
where
    L: SingleWireLine,
    D: DelayNs,
{
    poll::wait_while(line, delay, level, timing).map_err(|_| {
        debug!("dht11: timeout during {}", phase);
        TransmissionError::Timeout(phase)
    })
}
