/// Timestamp Bookmarks - Chrome Extension for bookmarking video timestamps
/// Built with Rust + WASM + Yew

mod background;
mod bookmark;
mod bridge;
mod config;
mod content;
mod host;
mod messages;
mod storage;
mod watch_url;
pub mod ui;

use config::ExtensionConfig;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(ExtensionConfig::default().log_level));
}

// Re-export time formatting for JavaScript access
#[wasm_bindgen]
pub fn format_time(seconds: f64) -> String {
    bookmark::format_time(seconds)
}

// Tab watcher: called by the background service worker for every tab update
#[wasm_bindgen]
pub fn handle_tab_updated(tab_id: i32, url: Option<String>) {
    wasm_bindgen_futures::spawn_local(async move {
        background::tab_updated(tab_id, url, &ExtensionConfig::default()).await;
    });
}

// Start the page controller in the content script
#[wasm_bindgen]
pub fn start_content() {
    if let Err(e) = content::start(ExtensionConfig::default()) {
        log::error!("{}", e);
    }
}

// Start the duration bridge in the page's own context
#[wasm_bindgen]
pub fn start_page_bridge() {
    if let Err(e) = bridge::start() {
        log::error!("{}", e);
    }
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
