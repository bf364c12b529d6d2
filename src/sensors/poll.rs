//! Bounded busy-poll primitive shared by every single-wire wait phase.
//!
//! There is no capture peripheral on the line, so durations are measured in
//! poll iterations: sample, sleep `poll_delay_us`, repeat. The iteration
//! limit gives each wait a deterministic worst case of roughly
//! `polling_limit × poll_delay_us`.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{LineLevel, SingleWireLine};
use crate::config::Dht11Timing;

/// Delay / limit pair applied to every wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    pub poll_delay_us: u32,
    pub polling_limit: u32,
}

impl From<&Dht11Timing> for PollTiming {
    fn from(t: &Dht11Timing) -> Self {
        Self {
            poll_delay_us: t.poll_delay_us,
            polling_limit: t.polling_limit,
        }
    }
}

/// The line held its level for `polling_limit` iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTimeout;

/// Spin while the line reads `level`.
///
/// Returns the number of iterations spent (each one a sample followed by a
/// `poll_delay_us` sleep) once the line leaves `level`. The read that
/// observes the change is not counted. Fails as soon as the count reaches
/// `polling_limit`, without sampling again.
pub fn wait_while<L, D>(
    line: &mut L,
    delay: &mut D,
    level: LineLevel,
    timing: PollTiming,
) -> Result<u32, PollTimeout>
where
    L: SingleWireLine + ?Sized,
    D: DelayNs,
{
    let mut count: u32 = 0;
    while line.read() == level {
        count += 1;
        delay.delay_us(timing.poll_delay_us);
        if count >= timing.polling_limit {
            return Err(PollTimeout);
        }
    }
    Ok(count)
}
