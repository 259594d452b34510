//! WASM module: the deployer in the browser
//!
//! Binds the workflow to the OP_WALLET extension (`window.opnet`) and to the
//! OP_NET node over `fetch`.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         TokenLauncher (JS API)          │
//! │  connect, deploy, preview, estimate     │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │       Launcher<OpWallet, Fetch, Wasm>   │
//! │  session, workflow state, progress      │
//! └──────┬──────────────────┬───────────────┘
//!        │                  │
//! ┌──────▼───────┐   ┌──────▼───────────────┐
//! │   OpWallet   │   │   FetchRpcProvider   │
//! │ window.opnet │   │  btc_* over fetch    │
//! └──────────────┘   └──────────────────────┘
//! ```

mod fetch;
mod launcher;
mod opwallet;
mod pacer;

pub use fetch::{fetch_bytes, FetchRpcConnector, FetchRpcProvider};
pub use launcher::TokenLauncher;
pub use opwallet::OpWallet;
pub use pacer::WasmPacer;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;

pub(crate) fn js_error(message: impl ToString) -> JsValue {
    JsValue::from_str(&message.to_string())
}

pub(crate) fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

/// Best-effort message out of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
