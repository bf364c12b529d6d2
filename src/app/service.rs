//! Application service — the hexagonal core.
//!
//! [`ControlLoop`] owns the resolved configuration and the two level
//! classifiers. Sensors, actuators and the event sink are injected at call
//! sites, so the whole cycle is testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │       ControlLoop        │
//! ActuatorPort ◀──│ decode · infer · actuate │◀── InferencePort ×2
//!                 └──────────────────────────┘
//! ```
//!
//! One cycle, always in this order:
//!
//! 1. one climate decode (never retried within the cycle);
//! 2. on a transmission error or humidity outside [0, 100] %: light the
//!    error LED, report, back off. Soil and inference are skipped;
//! 3. clear the error LED, sample the soil probe;
//! 4. run the fan then the pump classifier on the same features;
//! 5. drive the fan bank then the pump bank;
//! 6. report the cycle, sleep the cycle interval.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::{self, SensorError};
use crate::inference::FeatureVector;

use super::events::{AppEvent, CycleReport};
use super::ports::{ActuatorPort, Bank, EventSink, InferencePort, SensorPort};

/// Result of one [`ControlLoop::run_cycle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    SensorFault(SensorError),
}

/// Running counters, exposed for telemetry. Nothing acts on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Cycles attempted.
    pub cycles: u64,
    /// Cycles that reached actuation.
    pub completed: u64,
    /// Cycles skipped because of a sensor fault.
    pub sensor_faults: u64,
    /// Sensor faults in a row; reset by the next good reading.
    pub consecutive_faults: u32,
    /// Individual classifier failures (up to two per cycle).
    pub inference_failures: u64,
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop<F, Q> {
    config: SystemConfig,
    fan_model: F,
    pump_model: Q,
    stats: LoopStats,
}

impl<F, Q> ControlLoop<F, Q>
where
    F: InferencePort,
    Q: InferencePort,
{
    /// Construct the loop. Rejects an inconsistent configuration.
    pub fn new(config: SystemConfig, fan_model: F, pump_model: Q) -> error::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fan_model,
            pump_model,
            stats: LoopStats::default(),
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Darken every output and announce the loop.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started);
        info!(
            "ControlLoop started (cycle {} ms, back-off {} ms)",
            self.config.timing.cycle_interval_ms, self.config.timing.fault_backoff_ms
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one cycle without the trailing sleep.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.stats.cycles += 1;

        // 1–2. Climate
        let reading = match hw.read_climate() {
            Ok(r) if r.humidity_in_range() => r,
            Ok(r) => {
                let error = SensorError::HumidityOutOfRange(r.humidity_pct);
                return self.sensor_fault(error, hw, sink);
            }
            Err(e) => return self.sensor_fault(e.into(), hw, sink),
        };
        self.stats.consecutive_faults = 0;
        hw.set_sensor_error(false);

        // 3. Soil
        let soil = hw.read_soil();
        let features =
            FeatureVector::new(reading.temperature_c, reading.humidity_pct, soil.percent);
        debug!("features {:?}", features.as_array());

        // 4. Both classifiers before either bank moves
        let fan = classify(&mut self.fan_model, Bank::Fan, &features, &mut self.stats, sink);
        let pump = classify(&mut self.pump_model, Bank::Pump, &features, &mut self.stats, sink);

        // 5. Actuate
        let fan_level = hw.set_level(Bank::Fan, fan);
        let pump_level = hw.set_level(Bank::Pump, pump);

        // 6. Report
        self.stats.completed += 1;
        let report = CycleReport {
            cycle: self.stats.cycles,
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
            soil_raw: soil.raw,
            soil_pct: soil.percent,
            fan_level,
            pump_level,
        };
        sink.emit(&AppEvent::Cycle(report));
        CycleOutcome::Completed(report)
    }

    /// Sleep that follows `outcome` (ms).
    pub fn delay_after(&self, outcome: &CycleOutcome) -> u32 {
        match outcome {
            CycleOutcome::Completed(_) => self.config.timing.cycle_interval_ms,
            CycleOutcome::SensorFault(_) => self.config.timing.fault_backoff_ms,
        }
    }

    /// One cycle plus its trailing sleep.
    pub fn step(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        let outcome = self.run_cycle(hw, sink);
        delay.delay_ms(self.delay_after(&outcome));
        outcome
    }

    /// Cycle forever. `after_cycle` runs once per cycle, after the sleep
    /// (the firmware feeds the watchdog there).
    pub fn run(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
        mut after_cycle: impl FnMut(&CycleOutcome),
    ) -> ! {
        self.start(hw, sink);
        loop {
            let outcome = self.step(hw, delay, sink);
            after_cycle(&outcome);
        }
    }

    fn sensor_fault(
        &mut self,
        error: SensorError,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.stats.sensor_faults += 1;
        self.stats.consecutive_faults = self.stats.consecutive_faults.saturating_add(1);
        hw.set_sensor_error(true);
        sink.emit(&AppEvent::SensorFault {
            error,
            consecutive: self.stats.consecutive_faults,
        });
        CycleOutcome::SensorFault(error)
    }
}

/// Level for `bank`, or 0 if its classifier fails.
fn classify(
    model: &mut impl InferencePort,
    bank: Bank,
    features: &FeatureVector,
    stats: &mut LoopStats,
    sink: &mut impl EventSink,
) -> i32 {
    match model.infer(features) {
        Ok(c) => c.level(),
        Err(error) => {
            warn!("{:?} inference failed: {}", bank, error);
            stats.inference_failures += 1;
            sink.emit(&AppEvent::InferenceFailed { bank, error });
            0
        }
    }
}
