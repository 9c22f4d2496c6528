//! Time Base timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer whose callback runs the sensor tick.  Callbacks of a
//! single esp_timer are serialized, so a tick never preempts another tick.
//! On host builds the timer is a stub; tests call
//! [`sensors::on_timer_tick`](crate::sensors::on_timer_tick) directly.

use crate::drivers::hw_init::HwInitError;
use crate::ports::TickSource;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    crate::sensors::on_timer_tick(&mut crate::adapters::hardware::BoardLines::new());
}

/// Periodic Time Base backed by an esp_timer.
pub struct HwTickTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    running: bool,
}

impl Default for HwTickTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl HwTickTimer {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            handle: core::ptr::null_mut(),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(target_os = "espidf")]
impl TickSource for HwTickTimer {
    fn start_periodic(&mut self, period_us: u32) -> Result<(), HwInitError> {
        // SAFETY: `handle` is owned by this struct and only touched from the
        // main task.  The callback only enters a critical section.
        unsafe {
            if self.handle.is_null() {
                let args = esp_timer_create_args_t {
                    callback: Some(tick_cb),
                    arg: core::ptr::null_mut(),
                    dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                    name: b"timebase\0".as_ptr() as *const _,
                    // Overruns drop ticks instead of bursting to catch up.
                    skip_unhandled_events: true,
                };
                let ret = esp_timer_create(&args, &mut self.handle);
                if ret != ESP_OK {
                    return Err(HwInitError::TimerCreateFailed(ret));
                }
            }
            let ret = esp_timer_start_periodic(self.handle, u64::from(period_us));
            if ret != ESP_OK {
                return Err(HwInitError::TimerStartFailed(ret));
            }
        }
        self.running = true;
        info!("hw_timer: time base started ({} us)", period_us);
        Ok(())
    }

    fn stop(&mut self) {
        // SAFETY: null-checked handle created in start_periodic().
        unsafe {
            if !self.handle.is_null() {
                esp_timer_stop(self.handle);
            }
        }
        self.running = false;
    }
}

#[cfg(not(target_os = "espidf"))]
impl TickSource for HwTickTimer {
    fn start_periodic(&mut self, period_us: u32) -> Result<(), HwInitError> {
        log::info!("hw_timer(sim): time base not started ({} us requested)", period_us);
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

#[cfg(target_os = "espidf")]
impl Drop for HwTickTimer {
    fn drop(&mut self) {
        self.stop();
        // SAFETY: timer is stopped; handle is not used after this.
        unsafe {
            if !self.handle.is_null() {
                esp_timer_delete(self.handle);
            }
        }
    }
}
