//! Four-output level indicator bank.
//!
//! A level `n` lights the first `n` outputs ("bar graph"). Used for both
//! the fan and the pump bank; on the board each output is an LED standing
//! in for one actuator stage.

use embedded_hal::digital::OutputPin;
use log::warn;

/// Outputs per bank, and therefore the highest level.
pub const MAX_LEVEL: i32 = 4;

/// Clamp an arbitrary classifier output to a displayable level.
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(0, MAX_LEVEL)
}

pub struct LevelBank<P> {
    name: &'static str,
    pins: [P; MAX_LEVEL as usize],
    level: i32,
}

impl<P: OutputPin> LevelBank<P> {
    /// Take the pins and drive them all low.
    pub fn new(name: &'static str, pins: [P; MAX_LEVEL as usize]) -> Self {
        let mut bank = Self {
            name,
            pins,
            level: 0,
        };
        bank.off();
        bank
    }

    /// Light outputs `0 .. clamp(level)`, darken the rest. Returns the
    /// level actually shown.
    pub fn drive(&mut self, level: i32) -> i32 {
        let level = clamp_level(level);
        for (i, pin) in self.pins.iter_mut().enumerate() {
            let result = if (i as i32) < level {
                pin.set_high()
            } else {
                pin.set_low()
            };
            if result.is_err() {
                warn!("{}: output {} write failed", self.name, i);
            }
        }
        self.level = level;
        level
    }

    pub fn off(&mut self) {
        self.drive(0);
    }

    /// Last level driven.
    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pins(&self) -> &[P; MAX_LEVEL as usize] {
        &self.pins
    }
}
