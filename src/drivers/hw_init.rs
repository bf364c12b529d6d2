//! One-shot hardware peripheral initialization and raw I/O helpers.
//!
//! Configures the ADC1 oneshot unit for the soil probe, the DHT11 data
//! line (pull-up, starts as input) and every LED output, using raw
//! ESP-IDF sys calls. Called once from `main()` before the control loop.
//!
//! Off target, the helpers act on a small bank of atomics so the adapters
//! built on them can be exercised from host tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::Direction;
use crate::config::PinConfig;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    /// The soil probe pin has no ADC1 channel.
    NotAnAdcPin(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::NotAnAdcPin(gpio) => write!(f, "GPIO{} is not an ADC1 pin", gpio),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(pins: &PinConfig) -> Result<(), HwInitError> {
    let channel = soil_channel(pins)?;
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc(channel)?;
        init_dht_line(pins.dht_gpio)?;
        init_gpio_outputs(pins)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(pins: &PinConfig) -> Result<(), HwInitError> {
    soil_channel(pins)?;
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

/// ADC1 channel of the soil probe pin.
pub fn soil_channel(pins: &PinConfig) -> Result<u32, HwInitError> {
    pins.soil_adc_channel()
        .ok_or(HwInitError::NotAnAdcPin(pins.soil_adc_gpio))
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc(channel: u32) -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation: full 0 – 3.3 V probe swing, 12-bit counts.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=soil)", channel);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("adc1: read on CH{} failed (rc={}), sample reads as 0", channel, ret);
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    sim::ADC.load(core::sync::atomic::Ordering::Relaxed)
}

// ── DHT11 data line ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_dht_line(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: DHT11 line on GPIO{} (pull-up, input)", pin);
    Ok(())
}

/// Switch a pin between host-driven and released. The pull-up configured
/// at init keeps the line high while released.
#[cfg(target_os = "espidf")]
pub fn gpio_set_direction(pin: i32, direction: Direction) {
    let mode = match direction {
        Direction::Output => gpio_mode_t_GPIO_MODE_OUTPUT,
        Direction::Input => gpio_mode_t_GPIO_MODE_INPUT,
    };
    // SAFETY: mode switch on a pin configured in init_dht_line(); main-loop only.
    unsafe {
        esp_idf_svc::sys::gpio_set_direction(pin, mode);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_direction(pin: i32, direction: Direction) {
    sim::set_bit(&sim::OUTPUT_MODE, pin, direction == Direction::Output);
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Sim: a pin in output mode reads back what was written; otherwise the
/// injected input level (idle high, like a pulled-up line).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    if sim::bit(&sim::OUTPUT_MODE, pin) {
        sim::bit(&sim::OUTPUTS, pin)
    } else {
        !sim::bit(&sim::INPUTS_LOW, pin)
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs(pins: &PinConfig) -> Result<(), HwInitError> {
    let singles = [pins.sensor_error_led_gpio];
    let output_pins = pins
        .fan_led_gpios
        .iter()
        .chain(pins.pump_led_gpios.iter())
        .chain(singles.iter());

    for &pin in output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (fan, pump, error LED)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_bit(&sim::OUTPUTS, pin, high);
}

// ── Delays ────────────────────────────────────────────────────

/// Busy-wait. Used for the single-wire poll cadence and ADC spacing,
/// where a scheduler tick would be far too coarse.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: ROM busy-wait, no shared state.
    unsafe { esp_rom_delay_us(us) };
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

/// Yielding delay for millisecond-scale waits.
#[cfg(target_os = "espidf")]
pub fn delay_ms(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_ms(_ms: u32) {}

// ── Simulation state ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU16, AtomicU64, Ordering};

    pub static ADC: AtomicU16 = AtomicU16::new(0);
    pub static OUTPUTS: AtomicU64 = AtomicU64::new(0);
    pub static OUTPUT_MODE: AtomicU64 = AtomicU64::new(0);
    pub static INPUTS_LOW: AtomicU64 = AtomicU64::new(0);

    fn mask(pin: i32) -> u64 {
        1u64 << (pin as u32 & 63)
    }

    pub fn bit(word: &AtomicU64, pin: i32) -> bool {
        word.load(Ordering::Relaxed) & mask(pin) != 0
    }

    pub fn set_bit(word: &AtomicU64, pin: i32, on: bool) {
        if on {
            word.fetch_or(mask(pin), Ordering::Relaxed);
        } else {
            word.fetch_and(!mask(pin), Ordering::Relaxed);
        }
    }
}

/// Sim: value returned by every subsequent [`adc1_read`].
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(raw: u16) {
    sim::ADC.store(raw, core::sync::atomic::Ordering::Relaxed);
}

/// Sim: level seen on `pin` while it is an input.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_input(pin: i32, high: bool) {
    sim::set_bit(&sim::INPUTS_LOW, pin, !high);
}

/// Sim: last level written to `pin`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_output_level(pin: i32) -> bool {
    sim::bit(&sim::OUTPUTS, pin)
}

/// Sim: whether `pin` is currently host-driven.
#[cfg(not(target_os = "espidf"))]
pub fn sim_is_output(pin: i32) -> bool {
    sim::bit(&sim::OUTPUT_MODE, pin)
}
