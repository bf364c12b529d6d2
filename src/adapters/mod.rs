//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                     | Connects to             |
//! |------------|--------------------------------|-------------------------|
//! | `esp_io`   | SingleWireLine, AnalogSource   | ESP32 GPIO, ADC1        |
//! |            | DelayNs, OutputPin             | ROM delay, GPIO         |
//! | `hardware` | SensorPort                     | DHT11, soil probe       |
//! |            | ActuatorPort                   | LED banks, error LED    |
//! | `log_sink` | EventSink                      | Serial log output       |

pub mod esp_io;
pub mod hardware;
pub mod log_sink;
