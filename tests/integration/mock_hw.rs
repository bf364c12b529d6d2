//! Mock hardware for integration tests.
//!
//! Line-level doubles (scripted single-wire line, fake ADC, recording
//! pins and delay) for exercising the real drivers, plus port-level
//! doubles (stub classifier, recording sink, [`MockHardware`]) for
//! exercising the control loop on its own.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use verdant::app::events::AppEvent;
use verdant::app::ports::{
    ActuatorPort, AnalogSource, Bank, Direction, EventSink, InferencePort, LineLevel, SensorPort,
    SingleWireLine,
};
use verdant::error::{InferenceError, TransmissionError};
use verdant::inference::{Classification, FeatureVector};
use verdant::sensors::frame::{RawFrame, SensorReading};
use verdant::sensors::soil_moisture::MoistureReading;

// ── Scripted single-wire line ─────────────────────────────────

/// Plays back `(level, reads)` runs; idles high (pulled up) once empty.
pub struct ScriptedLine {
    runs: VecDeque<(LineLevel, u32)>,
    pub reads: u32,
    pub released: u32,
    pub direction: Direction,
    pub writes: Vec<LineLevel>,
    pub directions: Vec<Direction>,
}

impl ScriptedLine {
    pub fn new(runs: impl IntoIterator<Item = (LineLevel, u32)>) -> Self {
        Self {
            runs: runs.into_iter().collect(),
            reads: 0,
            released: 0,
            direction: Direction::Input,
            writes: Vec::new(),
            directions: Vec::new(),
        }
    }

    /// No sensor on the line: reads idle high forever.
    pub fn silent() -> Self {
        Self::new(VecDeque::new())
    }

    /// Reads left in the script.
    pub fn remaining(&self) -> u32 {
        self.runs.iter().map(|&(_, n)| n).sum()
    }
}

impl SingleWireLine for ScriptedLine {
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.directions.push(direction);
    }

    fn write(&mut self, level: LineLevel) {
        self.writes.push(level);
    }

    fn read(&mut self) -> LineLevel {
        self.reads += 1;
        while matches!(self.runs.front(), Some(&(_, 0))) {
            self.runs.pop_front();
        }
        match self.runs.front_mut() {
            Some(run) => {
                run.1 -= 1;
                run.0
            }
            None => LineLevel::High,
        }
    }

    fn release(&mut self) {
        self.released += 1;
        self.set_direction(Direction::Input);
    }
}

/// Sensor-side pulse widths, in line reads.
#[derive(Debug, Clone, Copy)]
pub struct WireTiming {
    /// Highs before the sensor answers the request.
    pub ack_delay: u32,
    pub ack_low: u32,
    pub ack_high: u32,
    pub bit_low: u32,
    pub zero_high: u32,
    pub one_high: u32,
}

impl Default for WireTiming {
    fn default() -> Self {
        Self {
            ack_delay: 3,
            ack_low: 16,
            ack_high: 16,
            bit_low: 10,
            zero_high: 5,
            one_high: 14,
        }
    }
}

/// Handshake followed by the first `bits` bits of `frame`, MSB first.
pub fn partial_script(frame: RawFrame, bits: u8, w: WireTiming) -> Vec<(LineLevel, u32)> {
    let mut runs = vec![
        (LineLevel::High, w.ack_delay),
        (LineLevel::Low, w.ack_low),
        (LineLevel::High, w.ack_high),
    ];
    for i in 0..u32::from(bits) {
        let one = (frame.bits() >> (39 - i)) & 1 == 1;
        runs.push((LineLevel::Low, w.bit_low));
        runs.push((LineLevel::High, if one { w.one_high } else { w.zero_high }));
    }
    runs
}

/// A complete transmission of `frame`, ending with the sensor's final low.
pub fn frame_script(frame: RawFrame, w: WireTiming) -> Vec<(LineLevel, u32)> {
    let mut runs = partial_script(frame, 40, w);
    runs.push((LineLevel::Low, w.bit_low));
    runs
}

/// Frame with a checksum equal to the low byte of the data sum. Only a
/// valid frame when the sum fits in a byte; a wrapped checksum is rejected.
pub fn valid_frame(rh_int: u8, rh_frac: u8, temp_int: u8, temp_frac: u8) -> RawFrame {
    let sum = u16::from(rh_int) + u16::from(rh_frac) + u16::from(temp_int) + u16::from(temp_frac);
    RawFrame::from_bytes(rh_int, rh_frac, temp_int, temp_frac, sum as u8)
}

// ── Delay, ADC, pins ──────────────────────────────────────────

/// Accumulates requested delays instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
    pub ms_calls: Vec<u32>,
    pub us_calls: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.us_calls.push(us);
        self.total_ns += u64::from(us) * 1000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// ADC channel that always converts to `value`.
#[derive(Debug, Default)]
pub struct FakeAdc {
    pub value: u16,
    pub reads: u32,
}

impl FakeAdc {
    pub fn new(value: u16) -> Self {
        Self { value, reads: 0 }
    }
}

impl AnalogSource for FakeAdc {
    fn read_raw(&mut self) -> u16 {
        self.reads += 1;
        self.value
    }
}

/// Output pin whose level stays observable after it is moved into a driver.
#[derive(Debug, Clone, Default)]
pub struct MockPin(Rc<Cell<bool>>);

impl MockPin {
    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

/// Four pins plus handles to observe them.
pub fn pin_bank() -> ([MockPin; 4], [MockPin; 4]) {
    let pins: [MockPin; 4] = Default::default();
    (pins.clone(), pins)
}

pub fn lit(pins: &[MockPin; 4]) -> usize {
    pins.iter().filter(|p| p.is_high()).count()
}

// ── Port-level doubles ────────────────────────────────────────

/// Classifier returning a fixed class (or error) and recording its inputs.
pub struct StubInference {
    pub result: Result<usize, InferenceError>,
    pub calls: Vec<FeatureVector>,
}

impl StubInference {
    pub fn class(class: usize) -> Self {
        Self {
            result: Ok(class),
            calls: Vec::new(),
        }
    }

    pub fn failing(error: InferenceError) -> Self {
        Self {
            result: Err(error),
            calls: Vec::new(),
        }
    }
}

impl InferencePort for StubInference {
    fn infer(&mut self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        self.calls.push(*features);
        self.result.map(|class| Classification {
            scores: heapless::Vec::new(),
            class,
        })
    }
}

impl InferencePort for &mut StubInference {
    fn infer(&mut self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        (**self).infer(features)
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HwCall {
    ReadClimate,
    ReadSoil,
    SetLevel { bank: Bank, level: i32 },
    SensorError(bool),
    AllOff,
}

/// Port-level hardware double: scripted climate results, fixed soil
/// reading, and a log of every call.
pub struct MockHardware {
    pub climate: VecDeque<Result<SensorReading, TransmissionError>>,
    pub soil: MoistureReading,
    pub calls: Vec<HwCall>,
}

impl MockHardware {
    pub fn new(climate: impl IntoIterator<Item = Result<SensorReading, TransmissionError>>) -> Self {
        Self {
            climate: climate.into_iter().collect(),
            soil: MoistureReading {
                raw: 2500,
                percent: 50.0,
            },
            calls: Vec::new(),
        }
    }

    pub fn reading(temperature_c: f32, humidity_pct: f32) -> Result<SensorReading, TransmissionError> {
        Ok(SensorReading {
            temperature_c,
            humidity_pct,
        })
    }

    pub fn level(&self, bank: Bank) -> Option<i32> {
        self.calls.iter().rev().find_map(|c| match *c {
            HwCall::SetLevel { bank: b, level } if b == bank => Some(level),
            HwCall::AllOff => Some(0),
            _ => None,
        })
    }

    pub fn error_led(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match *c {
                HwCall::SensorError(on) => Some(on),
                HwCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, call: HwCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }
}

impl SensorPort for MockHardware {
    fn read_climate(&mut self) -> Result<SensorReading, TransmissionError> {
        self.calls.push(HwCall::ReadClimate);
        self.climate
            .pop_front()
            .unwrap_or(Err(TransmissionError::Timeout(verdant::error::Phase::AwaitAckLow)))
    }

    fn read_soil(&mut self) -> MoistureReading {
        self.calls.push(HwCall::ReadSoil);
        self.soil
    }
}

impl ActuatorPort for MockHardware {
    fn set_level(&mut self, bank: Bank, level: i32) -> i32 {
        let level = level.clamp(0, 4);
        self.calls.push(HwCall::SetLevel { bank, level });
        level
    }

    fn set_sensor_error(&mut self, on: bool) {
        self.calls.push(HwCall::SensorError(on));
    }

    fn all_off(&mut self) {
        self.calls.push(HwCall::AllOff);
    }
}
