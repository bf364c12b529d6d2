//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one status line per application
//! event to the ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Cycle(r) => {
                info!(
                    "CYCLE #{} | T={:.1}\u{00b0}C RH={:.1}% | soil raw={} ({:.1}%) | fan={} pump={}",
                    r.cycle,
                    r.temperature_c,
                    r.humidity_pct,
                    r.soil_raw,
                    r.soil_pct,
                    r.fan_level,
                    r.pump_level,
                );
            }
            AppEvent::SensorFault { error, consecutive } => {
                warn!("FAULT | climate sensor: {} ({} in a row)", error, consecutive);
            }
            AppEvent::InferenceFailed { bank, error } => {
                warn!("INFER | {:?} model failed: {}; bank forced to 0", bank, error);
            }
            AppEvent::Started => {
                info!("START | control loop running");
            }
        }
    }
}
