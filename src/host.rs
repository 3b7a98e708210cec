/// Bindings to the `chrome.*` extension APIs exposed by `extension.js`
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn acquireLock(name: &str) -> Result<JsValue, JsValue>;

    fn onRuntimeMessage(callback: &js_sys::Function);

    fn extensionUrl(path: &str) -> String;
}

/// The parts of a browser tab the extension looks at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
}

pub async fn get_storage(key: &str) -> Result<Option<String>, String> {
    let value = getStorage(key)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;

    Ok(value.as_string())
}

pub async fn set_storage(key: &str, value: &str) -> Result<(), String> {
    setStorage(key, value)
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))
}

pub async fn active_tab() -> Result<TabInfo, String> {
    let tab_js = getActiveTab()
        .await
        .map_err(|e| format!("Failed to get active tab: {:?}", e))?;

    serde_wasm_bindgen::from_value(tab_js).map_err(|e| format!("Failed to parse tab: {:?}", e))
}

/// Send a message to the content script of `tab_id` and wait for its reply
pub async fn send_tab_message<T: Serialize + ?Sized>(tab_id: i32, message: &T) -> Result<JsValue, String> {
    let message_js = to_js(message)?;

    sendTabMessage(tab_id, message_js)
        .await
        .map_err(|e| format!("Failed to message tab {}: {:?}", tab_id, e))
}

/// A granted Web Lock, released when dropped
pub struct LockRelease(js_sys::Function);

impl Drop for LockRelease {
    fn drop(&mut self) {
        if let Err(e) = self.0.call0(&JsValue::NULL) {
            log::warn!("Failed to release lock: {:?}", e);
        }
    }
}

/// Wait for the origin-wide Web Lock `name`
pub async fn acquire_lock(name: &str) -> Result<LockRelease, String> {
    let release = acquireLock(name)
        .await
        .map_err(|e| format!("Failed to acquire lock {}: {:?}", name, e))?;

    release
        .dyn_into::<js_sys::Function>()
        .map(LockRelease)
        .map_err(|e| format!("Failed to acquire lock {}: {:?}", name, e))
}

/// Register a `chrome.runtime.onMessage` handler
///
/// The handler receives the message and the `sendResponse` function and
/// returns `true` when it will answer asynchronously.
pub fn on_runtime_message(handler: impl FnMut(JsValue, js_sys::Function) -> bool + 'static) {
    let callback =
        Closure::wrap(Box::new(handler) as Box<dyn FnMut(JsValue, js_sys::Function) -> bool>);
    onRuntimeMessage(callback.as_ref().unchecked_ref());
    callback.forget();
}

/// Absolute URL of a file packaged with the extension
pub fn extension_url(path: &str) -> String {
    extensionUrl(path)
}

/// Serialize into a plain JS object, with `None` as `null`
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize message: {:?}", e))
}
