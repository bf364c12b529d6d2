//! Verdant Firmware — Main Entry Point
//!
//! Hexagonal architecture, one synchronous control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspHardware              LogEventSink     EspDelay            │
//! │  (Sensor+Actuator)        (EventSink)      (DelayNs)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  decode · soil · infer fan/pump · actuate · report     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  QuantizedClassifier<DenseModel> ×2 (InferencePort)            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use verdant::adapters::esp_io::EspDelay;
use verdant::adapters::hardware::EspHardware;
use verdant::adapters::log_sink::LogEventSink;
use verdant::app::service::ControlLoop;
use verdant::config::SystemConfig;
use verdant::drivers::{hw_init, watchdog::Watchdog};
use verdant::error::Error;
use verdant::inference::classifier::QuantizedClassifier;
use verdant::inference::dense::DenseModel;

/// Board overrides, resolved once at boot.
const CONFIG_JSON: &str = include_str!("../verdant.json");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Verdant v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Resolve config ─────────────────────────────────────
    let config = match SystemConfig::from_json(CONFIG_JSON) {
        Ok(cfg) => {
            info!("Config loaded from verdant.json");
            cfg
        }
        Err(e) => {
            warn!("verdant.json rejected ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals(&config.pins) {
        // Nothing useful can run without the sensor line and LEDs.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new(config.timing.watchdog_timeout_ms);

    // ── 4. Construct adapters ─────────────────────────────────
    info!("Waiting {} ms for the DHT11 to settle", config.dht.settle_ms);
    let mut hw = EspHardware::from_config(&config).map_err(Error::from)?;
    watchdog.feed();

    let fan = QuantizedClassifier::new("fan", DenseModel::new(config.models.fan.clone()));
    let pump = QuantizedClassifier::new("pump", DenseModel::new(config.models.pump.clone()));
    let mut sink = LogEventSink::new();
    let mut delay = EspDelay;

    // ── 5. Control loop ───────────────────────────────────────
    let mut app = ControlLoop::new(config, fan, pump)?;
    app.run(&mut hw, &mut delay, &mut sink, |_| watchdog.feed())
}
