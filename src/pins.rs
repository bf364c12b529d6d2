//! Default GPIO / peripheral pin assignments for the Verdant main board.
//!
//! These are the factory defaults for [`PinConfig`](crate::config::PinConfig).
//! A board revision that moves a pin overrides it in `verdant.json`
//! rather than editing drivers.

/// Number of GPIOs on the ESP32-S3 (GPIO 0–48).
pub const GPIO_NUM_MAX: i32 = 49;

// ---------------------------------------------------------------------------
// Climate sensor (DHT11, single-wire, open-drain with 10 kΩ pull-up)
// ---------------------------------------------------------------------------

/// Bidirectional data line of the DHT11.
pub const DHT_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Soil moisture probe (capacitive, analog)
// ---------------------------------------------------------------------------

/// Analog output of the soil probe (ADC1 channel 0).
pub const SOIL_ADC_GPIO: i32 = 1;

/// ADC1 channel wired to `gpio`. On the ESP32-S3 ADC1 covers GPIO 1–10
/// as channels 0–9; any other pin has no ADC1 channel.
pub const fn adc1_channel(gpio: i32) -> Option<u32> {
    match gpio {
        1..=10 => Some((gpio - 1) as u32),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Level indicator banks (4 LEDs each, active HIGH)
// ---------------------------------------------------------------------------

/// Fan bank, lowest level first.
pub const FAN_LED_GPIOS: [i32; 4] = [10, 11, 12, 13];
/// Pump bank, lowest level first.
pub const PUMP_LED_GPIOS: [i32; 4] = [14, 15, 16, 17];

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lit while the climate sensor is faulted.
pub const SENSOR_ERROR_LED_GPIO: i32 = 18;
