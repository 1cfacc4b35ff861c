//! NVS flash bring-up.
//!
//! The Wi-Fi driver persists calibration data in NVS, so the partition
//! must be live before the network stack starts. A partition left behind
//! by an older IDF layout (no free pages, or a newer on-flash version)
//! is erased once and the init retried; any other failure is fatal to
//! the caller.

use crate::error::CommsError;

#[cfg(target_os = "espidf")]
pub fn init_flash() -> Result<(), CommsError> {
    use esp_idf_svc::sys::*;
    use log::warn;

    // SAFETY: nvs_flash_init/erase are called once from main before any
    // other NVS user exists.
    let mut ret = unsafe { nvs_flash_init() };
    if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
        warn!("nvs: stale partition (rc={ret}), erasing and retrying");
        let erased = unsafe { nvs_flash_erase() };
        if erased != ESP_OK as i32 {
            return Err(CommsError::NvsInitFailed(erased));
        }
        ret = unsafe { nvs_flash_init() };
    }
    if ret != ESP_OK as i32 {
        return Err(CommsError::NvsInitFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_flash() -> Result<(), CommsError> {
    log::info!("nvs(sim): flash init skipped");
    Ok(())
}
