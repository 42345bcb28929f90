//! Repeating browser timer with deterministic teardown

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A `setInterval` registration. Cleared on `cancel` or drop.
pub struct Interval {
    handle: Option<i32>,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(period_ms: u32, callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::<dyn FnMut()>::new(callback);
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms as i32,
        )?;
        log::debug!("Tick timer {} started ({} ms)", handle, period_ms);
        Ok(Self {
            handle: Some(handle),
            _callback: callback,
        })
    }

    /// Stop firing now. The callback itself stays alive until drop, so this
    /// is safe to call from inside the callback.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(handle);
            }
            log::debug!("Tick timer {} cleared", handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
