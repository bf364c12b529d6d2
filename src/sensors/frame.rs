//! DHT11 frame layout and field extraction.
//!
//! ```text
//!  39      32 31      24 23      16 15       8 7        0
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┐
//! │  RH int  │ RH frac  │  T int   │  T frac  │ checksum │
//! └──────────┴──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! Everything here is pure; the decoder hands over a [`RawFrame`] and the
//! rest can be tested against literal values.

use crate::error::TransmissionError;

/// Bits per frame.
pub const FRAME_BITS: u8 = 40;

const FRAME_MASK: u64 = (1 << FRAME_BITS) - 1;

/// Largest accepted `data sum − checksum`.
pub const CHECKSUM_TOLERANCE: i32 = 1;

/// A 40-bit frame, MSB first as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame(u64);

impl RawFrame {
    /// Wrap raw bits; anything above bit 39 is discarded.
    pub const fn new(bits: u64) -> Self {
        Self(bits & FRAME_MASK)
    }

    pub const fn from_bytes(rh_int: u8, rh_frac: u8, temp_int: u8, temp_frac: u8, checksum: u8) -> Self {
        Self(
            (rh_int as u64) << 32
                | (rh_frac as u64) << 24
                | (temp_int as u64) << 16
                | (temp_frac as u64) << 8
                | checksum as u64,
        )
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn rh_int(self) -> u8 {
        (self.0 >> 32) as u8
    }

    pub const fn rh_frac(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn temp_int(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn temp_frac(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn checksum(self) -> u8 {
        self.0 as u8
    }

    /// Sum of the four data bytes, without 8-bit wraparound.
    pub fn data_sum(self) -> u16 {
        u16::from(self.rh_int())
            + u16::from(self.rh_frac())
            + u16::from(self.temp_int())
            + u16::from(self.temp_frac())
    }

    /// Accept the frame unless `data_sum − checksum` exceeds
    /// [`CHECKSUM_TOLERANCE`].
    ///
    /// The difference is signed and only the upper side is bounded: a sum
    /// far *below* the checksum byte passes. Sensors in the field have been
    /// validated against exactly this rule, so it is kept as is.
    pub fn verify_checksum(self) -> Result<(), TransmissionError> {
        let sum = self.data_sum();
        let checksum = self.checksum();
        if i32::from(sum) - i32::from(checksum) > CHECKSUM_TOLERANCE {
            return Err(TransmissionError::ChecksumMismatch { sum, checksum });
        }
        Ok(())
    }

    pub fn extract(self) -> SensorReading {
        extract(self)
    }
}

/// Decoded climate reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius, one decimal of resolution.
    pub temperature_c: f32,
    /// Relative humidity in %, one decimal of resolution. Not range-checked.
    pub humidity_pct: f32,
}

impl SensorReading {
    pub fn humidity_in_range(&self) -> bool {
        (0.0..=100.0).contains(&self.humidity_pct)
    }
}

/// Convert a frame into engineering units.
///
/// The temperature integer byte is signed (two's complement). When it is
/// negative the fractional byte is subtracted rather than added, so
/// `-5` / `2` reads as −5.2 °C rather than −4.8 °C.
pub fn extract(frame: RawFrame) -> SensorReading {
    let temp_int = frame.temp_int() as i8;
    let mut temp_frac = f32::from(frame.temp_frac());
    if temp_int < 0 {
        temp_frac = -temp_frac;
    }

    SensorReading {
        temperature_c: f32::from(temp_int) + 0.1 * temp_frac,
        humidity_pct: f32::from(frame.rh_int()) + 0.1 * f32::from(frame.rh_frac()),
    }
}
