/// Content script: the page controller injected into watch pages
mod controller;
mod duration;
mod page;
mod session;

pub use controller::PageController;
pub use page::WatchPage;

use crate::config::ExtensionConfig;
use crate::host;
use crate::storage::{BookmarkStore, ChromeStorage};
use crate::watch_url::watch_page_video_id;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlScriptElement};

const BRIDGE_SCRIPT: &str = "page_bridge.js";

/// Load the bridge into the page's own script context
fn inject_bridge(document: &Document) -> Result<(), String> {
    let root = document
        .document_element()
        .ok_or("Failed to find the document element")?;

    let script = document
        .create_element("script")
        .map_err(|e| format!("Failed to create script: {:?}", e))?
        .unchecked_into::<HtmlScriptElement>();
    script.set_type("module");
    script.set_src(&host::extension_url(BRIDGE_SCRIPT));

    root.append_child(&script)
        .map_err(|e| format!("Failed to inject bridge: {:?}", e))?;
    script.remove();
    Ok(())
}

pub fn start(config: ExtensionConfig) -> Result<(), String> {
    let window = web_sys::window().ok_or("Failed to get window")?;
    let document = window.document().ok_or("Failed to get document")?;

    inject_bridge(&document)?;

    let video_param = config.video_id_param;
    let controller = Rc::new(PageController::new(
        config,
        BookmarkStore::new(ChromeStorage),
        window.clone(),
        WatchPage::new(document),
    ));

    {
        let controller = controller.clone();
        host::on_runtime_message(move |message, send_response| {
            controller.handle_message(message, send_response)
        });
    }

    // Pages opened directly on a watch URL are not announced by the tab watcher
    // until their next update
    let href = window.location().href().ok();
    if let Some(video_id) = href.and_then(|href| watch_page_video_id(&href, video_param)) {
        spawn_local(controller.load_video(video_id));
    }

    log::info!("Page controller started");
    Ok(())
}
