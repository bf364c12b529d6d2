//! System configuration parameters
//!
//! All tunable parameters for the Verdant loop: pin assignments, single-wire
//! timing, soil calibration, loop cadence and the two level models. Resolved
//! once at startup and handed to [`ControlLoop`](crate::app::service::ControlLoop)
//! by value; nothing here is mutated afterwards.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::inference::dense::DenseWeights;
use crate::pins;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemConfig {
    pub pins: PinConfig,
    pub dht: Dht11Timing,
    pub soil: SoilConfig,
    pub timing: LoopTiming,
    pub models: ModelConfig,
}

/// GPIO assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub dht_gpio: i32,
    /// Soil probe input; its ADC1 channel follows from the pin.
    pub soil_adc_gpio: i32,
    pub fan_led_gpios: [i32; 4],
    pub pump_led_gpios: [i32; 4],
    pub sensor_error_led_gpio: i32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            dht_gpio: pins::DHT_GPIO,
            soil_adc_gpio: pins::SOIL_ADC_GPIO,
            fan_led_gpios: pins::FAN_LED_GPIOS,
            pump_led_gpios: pins::PUMP_LED_GPIOS,
            sensor_error_led_gpio: pins::SENSOR_ERROR_LED_GPIO,
        }
    }
}

/// Single-wire handshake and bit-sampling timing.
///
/// `bit_threshold` is expressed in poll iterations, so it has to be retuned
/// whenever `poll_delay_us` or the CPU clock changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dht11Timing {
    /// Host start signal: how long the line is held low (ms).
    pub start_hold_ms: u32,
    /// Delay between consecutive line samples (µs).
    pub poll_delay_us: u32,
    /// Poll iterations after which any wait phase is declared a timeout.
    pub polling_limit: u32,
    /// Minimum high-pulse poll count classified as a `1` bit.
    pub bit_threshold: u32,
    /// One-off settle time after the driver takes the line (ms).
    pub settle_ms: u32,
}

impl Default for Dht11Timing {
    fn default() -> Self {
        Self {
            start_hold_ms: 20,
            poll_delay_us: 5,
            // 1000 × 5 µs ≈ 5 ms worst case per phase
            polling_limit: 1000,
            // '0' highs are ~26 µs (≈5 polls), '1' highs ~70 µs (≈12 polls)
            bit_threshold: 8,
            settle_ms: 1000,
        }
    }
}

/// Upper bound on `SoilConfig::sample_count`. Keeps the burst short and
/// the 12-bit sample sum far from overflow.
pub const MAX_SOIL_SAMPLES: u32 = 1024;

/// Soil probe averaging and two-point calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilConfig {
    /// Raw ADC count in dry air (maps to 0 %).
    pub dry_raw: u16,
    /// Raw ADC count submerged in water (maps to 100 %).
    pub wet_raw: u16,
    /// Samples averaged per reading, at most [`MAX_SOIL_SAMPLES`].
    pub sample_count: u32,
    /// Delay between samples (µs).
    pub inter_sample_us: u32,
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            dry_raw: 4000,
            wet_raw: 1000,
            sample_count: 64,
            inter_sample_us: 50,
        }
    }
}

/// Control loop cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopTiming {
    /// Sleep after a completed cycle (ms).
    pub cycle_interval_ms: u32,
    /// Sleep after a sensor fault before retrying (ms).
    pub fault_backoff_ms: u32,
    /// Task watchdog timeout; must outlast the longest cycle (ms).
    pub watchdog_timeout_ms: u32,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 3000,
            fault_backoff_ms: 2000,
            watchdog_timeout_ms: 10_000,
        }
    }
}

/// Weights for the built-in fan and pump level classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub fan: DenseWeights,
    pub pump: DenseWeights,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fan: DenseWeights::default_fan(),
            pump: DenseWeights::default_pump(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

/// Errors from parsing or validating a [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse { line: usize, column: usize },
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { line, column } => {
                write!(f, "parse error at line {}, column {}", line, column)
            }
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl SystemConfig {
    /// Parse a (possibly partial) JSON document and validate the result.
    /// Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inconsistent values instead of clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dht = &self.dht;
        if dht.polling_limit == 0 {
            return Err(ConfigError::ValidationFailed("dht.polling_limit must be > 0"));
        }
        if dht.bit_threshold == 0 || dht.bit_threshold >= dht.polling_limit {
            return Err(ConfigError::ValidationFailed(
                "dht.bit_threshold must be within (0, polling_limit)",
            ));
        }
        if dht.start_hold_ms < 18 {
            return Err(ConfigError::ValidationFailed("dht.start_hold_ms must be >= 18"));
        }

        let soil = &self.soil;
        if soil.dry_raw <= soil.wet_raw {
            return Err(ConfigError::ValidationFailed("soil.dry_raw must exceed soil.wet_raw"));
        }
        if soil.sample_count == 0 || soil.sample_count > MAX_SOIL_SAMPLES {
            return Err(ConfigError::ValidationFailed(
                "soil.sample_count must be within 1..=1024",
            ));
        }

        if self.timing.cycle_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("timing.cycle_interval_ms must be > 0"));
        }
        let longest_sleep = self.timing.cycle_interval_ms.max(self.timing.fault_backoff_ms);
        if self.timing.watchdog_timeout_ms <= longest_sleep {
            return Err(ConfigError::ValidationFailed(
                "timing.watchdog_timeout_ms must exceed cycle_interval_ms and fault_backoff_ms",
            ));
        }

        if !self.models.fan.is_consistent() || !self.models.pump.is_consistent() {
            return Err(ConfigError::ValidationFailed(
                "models: weights and bias must have the same non-zero class count",
            ));
        }

        if self.pins.all().any(|gpio| !(0..pins::GPIO_NUM_MAX).contains(&gpio)) {
            return Err(ConfigError::ValidationFailed("pins: GPIO outside 0..=48"));
        }
        if self.pins.soil_adc_channel().is_none() {
            return Err(ConfigError::ValidationFailed(
                "pins.soil_adc_gpio must be an ADC1 pin (GPIO 1-10)",
            ));
        }
        if self.pins.has_duplicates() {
            return Err(ConfigError::ValidationFailed("pins: GPIO assigned twice"));
        }
        Ok(())
    }
}

impl PinConfig {
    /// ADC1 channel of the soil probe, `None` when the pin has no ADC1 channel.
    pub fn soil_adc_channel(&self) -> Option<u32> {
        pins::adc1_channel(self.soil_adc_gpio)
    }

    fn all(&self) -> impl Iterator<Item = i32> + '_ {
        [self.dht_gpio, self.soil_adc_gpio, self.sensor_error_led_gpio]
            .into_iter()
            .chain(self.fan_led_gpios)
            .chain(self.pump_led_gpios)
    }

    fn has_duplicates(&self) -> bool {
        let mut seen: heapless::Vec<i32, 11> = heapless::Vec::new();
        for gpio in self.all() {
            if seen.contains(&gpio) {
                return true;
            }
            let _ = seen.push(gpio);
        }
        false
    }
}
