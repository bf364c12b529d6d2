//! Sensor subsystem.
//!
//! | Module          | Measures                          | Interface        |
//! |-----------------|-----------------------------------|------------------|
//! | `dht11`         | air temperature + humidity        | single-wire GPIO |
//! | `frame`         | (DHT11 frame layout, pure)        | —                |
//! | `poll`          | (bounded busy-wait primitive)     | —                |
//! | `soil_moisture` | volumetric soil moisture          | ADC              |

pub mod dht11;
pub mod frame;
pub mod poll;
pub mod soil_moisture;
