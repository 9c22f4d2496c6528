//! One-shot hardware peripheral initialization.
//!
//! Configures the sensor GPIOs and the temperature ADC channel using raw
//! ESP-IDF sys calls. Called once from `main()` before the Time Base is
//! started.  Host builds get logging stubs.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerCreateFailed(i32),
    TimerStartFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)     => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc)  => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc)  => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::TimerCreateFailed(rc) => write!(f, "tick timer create failed (rc={})", rc),
            Self::TimerStartFailed(rc)  => write!(f, "tick timer start failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the tick timer starts; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop temperature poll.  `init_adc()` completes before either runs.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), pins::TEMP_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 configured (CH{}=temp)", pins::TEMP_ADC_CHANNEL);
    Ok(())
}

/// Blocking oneshot conversion.  `None` if the driver reports an error.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> Option<u16> {
    None
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // PAS and speed sensors are open collector, brake switch pulls to
    // ground: all need the internal pull-up.
    let input_pins = [
        pins::PAS_PRIMARY_GPIO,
        pins::PAS_SECONDARY_GPIO,
        pins::SPEED_GPIO,
        pins::BRAKE_GPIO,
    ];

    for &pin in &input_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: GPIO inputs configured (pas, speed, brake)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe from ISR and main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host stub: lines idle high (pull-ups, nothing connected).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO ISR Service (latched edge capture) ───────────────────

#[cfg(target_os = "espidf")]
use crate::sensors::capture::{pas_edge_isr, speed_edge_isr};

#[cfg(target_os = "espidf")]
unsafe extern "C" fn pas_gpio_isr(_arg: *mut core::ffi::c_void) {
    // Secondary level must be read here, at the edge, not at the next tick.
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    let secondary_high = unsafe { gpio_get_level(pins::PAS_SECONDARY_GPIO) } != 0;
    pas_edge_isr(secondary_high);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn speed_gpio_isr(_arg: *mut core::ffi::c_void) {
    speed_edge_isr();
}

/// Map an ESP-IDF return code from the ISR setup path.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn esp_check(ret: i32) -> Result<(), HwInitError> {
    if ret == 0 { Ok(()) } else { Err(HwInitError::IsrInstallFailed(ret)) }
}

/// Install the GPIO ISR service and register rising-edge handlers for the
/// PAS primary and speed lines.  Only needed for `CaptureMode::Latched`.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handlers below only
    // touch lock-free atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let handlers: [(i32, unsafe extern "C" fn(*mut core::ffi::c_void)); 2] = [
            (pins::PAS_PRIMARY_GPIO, pas_gpio_isr),
            (pins::SPEED_GPIO, speed_gpio_isr),
        ];
        for (pin, handler) in handlers {
            esp_check(gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_POSEDGE))?;
            esp_check(gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut()))?;
            esp_check(gpio_intr_enable(pin))?;
        }

        info!("hw_init: ISR service installed (pas primary, speed)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
