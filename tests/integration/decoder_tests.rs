//! Integration tests for the single-wire decoder and the soil sampler,
//! driven through scripted lines and fake converters.

use verdant::app::ports::{Direction, LineLevel};
use verdant::config::{Dht11Timing, SoilConfig};
use verdant::error::{Phase, TransmissionError};
use verdant::sensors::dht11::Dht11;
use verdant::sensors::frame::RawFrame;
use verdant::sensors::soil_moisture::SoilMoistureSensor;

use crate::mock_hw::{
    FakeAdc, RecordingDelay, ScriptedLine, WireTiming, frame_script, partial_script, valid_frame,
};

const LIMIT: u32 = 40;

fn timing() -> Dht11Timing {
    Dht11Timing {
        polling_limit: LIMIT,
        bit_threshold: 8,
        settle_ms: 0,
        ..Dht11Timing::default()
    }
}

fn sensor(runs: Vec<(LineLevel, u32)>) -> Dht11<ScriptedLine, RecordingDelay> {
    Dht11::new(ScriptedLine::new(runs), RecordingDelay::default(), timing())
}

// ── Golden frames ─────────────────────────────────────────────

#[test]
fn golden_frame_decodes_exactly() {
    let golden = valid_frame(60, 5, 24, 3);
    let mut dht = sensor(frame_script(golden, WireTiming::default()));
    assert_eq!(dht.decode(), Ok(golden));

    let (line, _) = dht.into_parts();
    // the last bit's wait ends on the first read of the trailing low
    assert_eq!(line.remaining(), WireTiming::default().bit_low - 1);
}

#[test]
fn golden_frame_extracts_engineering_units() {
    let mut dht = sensor(frame_script(valid_frame(60, 5, 24, 3), WireTiming::default()));
    let r = dht.read().unwrap();
    assert!((r.humidity_pct - 60.5).abs() < 1e-4);
    assert!((r.temperature_c - 24.3).abs() < 1e-4);
}

#[test]
fn negative_temperature_frame() {
    // -5 as a two's-complement byte; 2 + 0xFB + 2 = 255 keeps the sum in a byte
    let frame = RawFrame::from_bytes(2, 0, 0xFB, 2, 255);
    let mut dht = sensor(frame_script(frame, WireTiming::default()));
    let t = dht.read_temperature().unwrap();
    assert!((t + 5.2).abs() < 1e-4, "got {t}");
}

#[test]
fn pulse_widths_near_threshold_classify_correctly() {
    // The leading-low wait consumes the first high read, so a high run of
    // `n` reads counts as `n - 1` iterations.
    let tight = WireTiming {
        zero_high: 8,
        one_high: 9,
        ..WireTiming::default()
    };
    let golden = valid_frame(0x55, 0x0A, 0x21, 0x01);
    let mut dht = sensor(frame_script(golden, tight));
    assert_eq!(dht.decode(), Ok(golden));
}

#[test]
fn host_request_holds_line_low() {
    let mut dht = sensor(frame_script(valid_frame(50, 0, 20, 0), WireTiming::default()));
    dht.decode().unwrap();
    let (line, delay) = dht.into_parts();
    assert_eq!(line.writes, vec![LineLevel::Low]);
    assert_eq!(
        &line.directions[..3],
        &[Direction::Input, Direction::Output, Direction::Input],
        "released at construction, driven for the request, then released"
    );
    assert!(delay.us_calls.contains(&20_000), "hold is busy-waited in µs");
    assert!(!delay.ms_calls.contains(&20), "hold must not go through the tick-based sleep");
}

// ── Timeouts ──────────────────────────────────────────────────

#[test]
fn absent_sensor_times_out_after_exactly_the_limit() {
    let mut dht = sensor(Vec::new());
    assert_eq!(
        dht.decode(),
        Err(TransmissionError::Timeout(Phase::AwaitAckLow))
    );
    let (line, _) = dht.into_parts();
    assert_eq!(line.reads, LIMIT);
}

#[test]
fn stuck_ack_low_times_out() {
    let runs = vec![(LineLevel::High, 3), (LineLevel::Low, 500)];
    let mut dht = sensor(runs);
    assert_eq!(
        dht.decode(),
        Err(TransmissionError::Timeout(Phase::AwaitAckHigh))
    );
    let (line, _) = dht.into_parts();
    // 3 highs + the low that ended the first wait + LIMIT lows
    assert_eq!(line.reads, 3 + 1 + LIMIT);
}

#[test]
fn stuck_data_start_times_out() {
    let runs = vec![
        (LineLevel::High, 3),
        (LineLevel::Low, 16),
        (LineLevel::High, 500),
    ];
    let mut dht = sensor(runs);
    assert_eq!(
        dht.decode(),
        Err(TransmissionError::Timeout(Phase::AwaitDataStart))
    );
    let (line, _) = dht.into_parts();
    // both acknowledge pulses, the high that ended the second wait, then LIMIT highs
    assert_eq!(line.reads, 3 + 16 + 1 + LIMIT);
}

#[test]
fn stuck_bit_leading_low_times_out_without_reading_further() {
    let frame = valid_frame(60, 5, 24, 3);
    let mut runs = partial_script(frame, 7, WireTiming::default());
    runs.push((LineLevel::Low, 500));
    runs.extend(frame_script(frame, WireTiming::default()));
    let mut dht = sensor(runs);

    assert_eq!(
        dht.decode(),
        Err(TransmissionError::Timeout(Phase::BitLeadingLow { bit: 7 }))
    );
    let (line, _) = dht.into_parts();
    let consumed: u32 = partial_script(frame, 7, WireTiming::default())
        .iter()
        .map(|&(_, n)| n)
        .sum();
    // every scripted read, the low that ended bit 6, then LIMIT lows
    assert_eq!(line.reads, consumed + 1 + LIMIT);
}

#[test]
fn bit_high_that_never_falls_times_out() {
    let frame = valid_frame(60, 5, 24, 3);
    let mut runs = partial_script(frame, 12, WireTiming::default());
    runs.push((LineLevel::Low, 10));
    runs.push((LineLevel::High, 500));
    let mut dht = sensor(runs);
    assert_eq!(
        dht.decode(),
        Err(TransmissionError::Timeout(Phase::BitHigh { bit: 12 }))
    );
}

#[test]
fn line_released_on_every_outcome() {
    let ok = sensor(frame_script(valid_frame(60, 5, 24, 3), WireTiming::default()));
    let timeout = sensor(Vec::new());
    let bad_sum = sensor(frame_script(
        RawFrame::from_bytes(60, 5, 24, 3, 80),
        WireTiming::default(),
    ));
    for mut dht in [ok, timeout, bad_sum] {
        let _ = dht.decode();
        let (line, _) = dht.into_parts();
        assert_eq!(line.released, 2);
        assert_eq!(line.direction, Direction::Input);
    }
}

// ── Checksum ──────────────────────────────────────────────────

#[test]
fn checksum_short_by_more_than_one_is_rejected() {
    let frame = RawFrame::from_bytes(60, 5, 24, 3, 90);
    let mut dht = sensor(frame_script(frame, WireTiming::default()));
    assert_eq!(
        dht.decode(),
        Err(TransmissionError::ChecksumMismatch {
            sum: 92,
            checksum: 90
        })
    );
}

#[test]
fn checksum_short_by_one_is_tolerated() {
    let frame = RawFrame::from_bytes(60, 5, 24, 3, 91);
    let mut dht = sensor(frame_script(frame, WireTiming::default()));
    assert_eq!(dht.decode(), Ok(frame));
}

#[test]
fn checksum_above_sum_passes() {
    let frame = RawFrame::from_bytes(60, 5, 24, 3, 200);
    let mut dht = sensor(frame_script(frame, WireTiming::default()));
    assert_eq!(dht.decode(), Ok(frame));
}

// ── Soil sampler ──────────────────────────────────────────────

#[test]
fn soil_sampler_averages_and_calibrates() {
    let config = SoilConfig::default();
    let mut soil = SoilMoistureSensor::new(FakeAdc::new(2500), RecordingDelay::default(), &config);
    let r = soil.read();
    assert_eq!(r.raw, 2500);
    assert!((r.percent - 50.0).abs() < 1e-4);

    let (adc, delay) = soil.into_parts();
    assert_eq!(adc.reads, config.sample_count);
    assert_eq!(
        delay.total_ns,
        u64::from(config.sample_count) * u64::from(config.inter_sample_us) * 1000
    );
}

#[test]
fn soil_sampler_clamps_outside_calibration() {
    let config = SoilConfig::default();
    let mut wet = SoilMoistureSensor::new(FakeAdc::new(0), RecordingDelay::default(), &config);
    let mut dry = SoilMoistureSensor::new(FakeAdc::new(4095), RecordingDelay::default(), &config);
    assert_eq!(wet.read().percent, 100.0);
    assert_eq!(dry.read().percent, 0.0);
}
