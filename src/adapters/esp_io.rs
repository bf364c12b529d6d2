//! Line-level adapters over the raw `hw_init` helpers.
//!
//! | Type       | Implements                  | Backed by                     |
//! |------------|-----------------------------|-------------------------------|
//! | `EspLine`  | `SingleWireLine`            | GPIO direction / level        |
//! | `EspAdc`   | `AnalogSource`              | ADC1 oneshot channel          |
//! | `EspDelay` | `embedded_hal` `DelayNs`    | ROM busy-wait / FreeRTOS tick |
//! | `EspPin`   | `embedded_hal` `OutputPin`  | GPIO output                   |
//!
//! Off target the helpers fall back to the sim atomics, so these types
//! also work in host tests.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::app::ports::{AnalogSource, Direction, LineLevel, SingleWireLine};
use crate::drivers::hw_init;

/// Bidirectional single-wire data line on one GPIO.
#[derive(Debug)]
pub struct EspLine {
    gpio: i32,
}

impl EspLine {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl SingleWireLine for EspLine {
    fn set_direction(&mut self, direction: Direction) {
        hw_init::gpio_set_direction(self.gpio, direction);
    }

    fn write(&mut self, level: LineLevel) {
        hw_init::gpio_write(self.gpio, level.is_high());
    }

    fn read(&mut self) -> LineLevel {
        LineLevel::from(hw_init::gpio_read(self.gpio))
    }
}

/// One ADC1 channel.
#[derive(Debug)]
pub struct EspAdc {
    channel: u32,
}

impl EspAdc {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl AnalogSource for EspAdc {
    fn read_raw(&mut self) -> u16 {
        hw_init::adc1_read(self.channel)
    }
}

/// Microsecond waits busy-wait; millisecond waits yield to the scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspDelay;

impl DelayNs for EspDelay {
    fn delay_ns(&mut self, ns: u32) {
        hw_init::delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        hw_init::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        hw_init::delay_ms(ms);
    }
}

/// Push-pull GPIO output. Writes cannot fail once the pin is configured.
#[derive(Debug)]
pub struct EspPin {
    gpio: i32,
}

impl EspPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for EspPin {
    type Error = Infallible;
}

impl OutputPin for EspPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }
}
