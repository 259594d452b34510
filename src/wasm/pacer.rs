//! `setTimeout` pacing.

use std::time::Duration;

use async_trait::async_trait;
use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::deploy::Pacer;

#[derive(Debug, Clone, Copy, Default)]
pub struct WasmPacer;

#[async_trait(?Send)]
impl Pacer for WasmPacer {
    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let ms = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window()
                .map(|w| w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms).is_ok())
                .unwrap_or(false);
            if !scheduled {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
