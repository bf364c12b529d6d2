//! Task Watchdog Timer (TWDT) driver.
//!
//! Subscribes the main task to the ESP-IDF TWDT so the board resets if the
//! control loop stalls. The loop feeds it once per cycle, so the timeout
//! has to exceed the longest cycle (sensor settle + decode + soil burst +
//! inter-cycle sleep).

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use core::cell::Cell;

use log::info;

pub struct Watchdog {
    timeout_ms: u32,
    feeds: Cell<u32>,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from main() before the loop starts; the TWDT
            // calls only touch ESP-IDF state and the null handle means the
            // calling task.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    feeds: Cell::new(0),
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): no-op ({} ms)", timeout_ms);
            Self {
                timeout_ms,
                feeds: Cell::new(0),
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feeds since boot.
    pub fn feeds(&self) -> u32 {
        self.feeds.get()
    }

    /// Feed the watchdog. Must be called at least every `timeout_ms`.
    pub fn feed(&self) {
        self.feeds.set(self.feeds.get().wrapping_add(1));
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: the calling task was subscribed in new().
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
