//! Capacitive soil moisture probe.
//!
//! Reads the probe's analog output, averages a burst of samples to
//! suppress converter noise, and applies a two-point linear calibration:
//! `dry_raw` (probe in air) maps to 0 %, `wet_raw` (probe in water) to
//! 100 %. Capacitive probes read *lower* when wetter, so `dry_raw > wet_raw`.

use embedded_hal::delay::DelayNs;

use crate::app::ports::AnalogSource;
use crate::config::SoilConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureCalibration {
    pub dry_raw: u16,
    pub wet_raw: u16,
}

impl From<&SoilConfig> for MoistureCalibration {
    fn from(c: &SoilConfig) -> Self {
        Self {
            dry_raw: c.dry_raw,
            wet_raw: c.wet_raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistureReading {
    /// Averaged ADC count.
    pub raw: u16,
    /// Calibrated moisture, 0 – 100 %.
    pub percent: f32,
}

/// Mean of `count` conversions, sleeping `inter_sample_us` after each.
/// Returns 0 without touching the source when `count` is 0.
pub fn sample_averaged<A, D>(source: &mut A, delay: &mut D, count: u32, inter_sample_us: u32) -> u16
where
    A: AnalogSource,
    D: DelayNs,
{
    if count == 0 {
        return 0;
    }
    let mut sum: u64 = 0;
    for _ in 0..count {
        sum += u64::from(source.read_raw());
        delay.delay_us(inter_sample_us);
    }
    (sum / u64::from(count)) as u16
}

/// `(dry − raw) × 100 / (dry − wet)`, clamped to [0, 100].
///
/// A degenerate calibration (`dry == wet`) reads as 0 %.
pub fn to_percent(raw: u16, dry_raw: u16, wet_raw: u16) -> f32 {
    if dry_raw == wet_raw {
        return 0.0;
    }
    let span = f32::from(dry_raw) - f32::from(wet_raw);
    let percent = (f32::from(dry_raw) - f32::from(raw)) * 100.0 / span;
    percent.clamp(0.0, 100.0)
}

pub struct SoilMoistureSensor<A, D> {
    source: A,
    delay: D,
    cal: MoistureCalibration,
    sample_count: u32,
    inter_sample_us: u32,
}

impl<A, D> SoilMoistureSensor<A, D>
where
    A: AnalogSource,
    D: DelayNs,
{
    pub fn new(source: A, delay: D, config: &SoilConfig) -> Self {
        Self {
            source,
            delay,
            cal: MoistureCalibration::from(config),
            sample_count: config.sample_count,
            inter_sample_us: config.inter_sample_us,
        }
    }

    pub fn set_calibration(&mut self, cal: MoistureCalibration) {
        self.cal = cal;
    }

    pub fn calibration(&self) -> MoistureCalibration {
        self.cal
    }

    pub fn read(&mut self) -> MoistureReading {
        let raw = sample_averaged(
            &mut self.source,
            &mut self.delay,
            self.sample_count,
            self.inter_sample_us,
        );
        MoistureReading {
            raw,
            percent: to_percent(raw, self.cal.dry_raw, self.cal.wet_raw),
        }
    }

    pub fn into_parts(self) -> (A, D) {
        (self.source, self.delay)
    }
}
