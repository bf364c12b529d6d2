//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the climate sensor, the soil probe, both level banks and the
//! error LED, exposing them through [`SensorPort`] and [`ActuatorPort`].
//! Generic over the line-level types so tests can drive it with scripted
//! lines and recording pins; [`EspHardware`] is the on-board instance.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::esp_io::{EspAdc, EspDelay, EspLine, EspPin};
use crate::app::ports::{ActuatorPort, AnalogSource, Bank, SensorPort, SingleWireLine};
use crate::config::SystemConfig;
use crate::drivers::hw_init::{self, HwInitError};
use crate::drivers::level_bank::LevelBank;
use crate::drivers::status_led::StatusLed;
use crate::error::TransmissionError;
use crate::sensors::dht11::Dht11;
use crate::sensors::frame::SensorReading;
use crate::sensors::soil_moisture::{MoistureReading, SoilMoistureSensor};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<L, A, D, P> {
    climate: Dht11<L, D>,
    soil: SoilMoistureSensor<A, D>,
    fan: LevelBank<P>,
    pump: LevelBank<P>,
    error_led: StatusLed<P>,
}

impl<L, A, D, P> HardwareAdapter<L, A, D, P>
where
    L: SingleWireLine,
    A: AnalogSource,
    D: DelayNs,
    P: OutputPin,
{
    pub fn new(
        climate: Dht11<L, D>,
        soil: SoilMoistureSensor<A, D>,
        fan: LevelBank<P>,
        pump: LevelBank<P>,
        error_led: StatusLed<P>,
    ) -> Self {
        Self {
            climate,
            soil,
            fan,
            pump,
            error_led,
        }
    }

    pub fn fan_bank(&self) -> &LevelBank<P> {
        &self.fan
    }

    pub fn pump_bank(&self) -> &LevelBank<P> {
        &self.pump
    }

    pub fn error_led(&self) -> &StatusLed<P> {
        &self.error_led
    }

    fn bank_mut(&mut self, bank: Bank) -> &mut LevelBank<P> {
        match bank {
            Bank::Fan => &mut self.fan,
            Bank::Pump => &mut self.pump,
        }
    }
}

/// The board's hardware, on the pins named in [`SystemConfig::pins`].
pub type EspHardware = HardwareAdapter<EspLine, EspAdc, EspDelay, EspPin>;

impl EspHardware {
    /// Wire up every driver. Peripherals must already be configured by
    /// [`hw_init::init_peripherals`](crate::drivers::hw_init::init_peripherals).
    /// Blocks for the climate sensor's settle time.
    pub fn from_config(config: &SystemConfig) -> Result<Self, HwInitError> {
        let pins = &config.pins;
        let channel = hw_init::soil_channel(pins)?;
        Ok(Self::new(
            Dht11::new(EspLine::new(pins.dht_gpio), EspDelay, config.dht),
            SoilMoistureSensor::new(EspAdc::new(channel), EspDelay, &config.soil),
            LevelBank::new("fan", pins.fan_led_gpios.map(EspPin::new)),
            LevelBank::new("pump", pins.pump_led_gpios.map(EspPin::new)),
            StatusLed::new(EspPin::new(pins.sensor_error_led_gpio)),
        ))
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<L, A, D, P> SensorPort for HardwareAdapter<L, A, D, P>
where
    L: SingleWireLine,
    A: AnalogSource,
    D: DelayNs,
    P: OutputPin,
{
    fn read_climate(&mut self) -> Result<SensorReading, TransmissionError> {
        self.climate.read()
    }

    fn read_soil(&mut self) -> MoistureReading {
        self.soil.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<L, A, D, P> ActuatorPort for HardwareAdapter<L, A, D, P>
where
    L: SingleWireLine,
    A: AnalogSource,
    D: DelayNs,
    P: OutputPin,
{
    fn set_level(&mut self, bank: Bank, level: i32) -> i32 {
        self.bank_mut(bank).drive(level)
    }

    fn set_sensor_error(&mut self, on: bool) {
        self.error_led.set(on);
    }

    fn all_off(&mut self) {
        self.fan.off();
        self.pump.off();
        self.error_led.set(false);
    }
}
