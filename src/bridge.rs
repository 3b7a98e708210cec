/// Page bridge: runs in the page's own script context to reach the player API
use crate::host::to_js;
use crate::messages::PageMessage;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, MessageEvent, Window};

const PLAYER_ELEMENT_ID: &str = "movie_player";

/// Usable durations are finite and positive; anything else is unknown
pub fn normalize_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

/// `movie_player.getDuration()`, or `None` when the player is missing,
/// not ready, or throws
fn read_player_duration(document: &Document) -> Option<f64> {
    let player = document.get_element_by_id(PLAYER_ELEMENT_ID)?;
    let get_duration = js_sys::Reflect::get(&player, &JsValue::from_str("getDuration"))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    let value = get_duration.call0(&player).ok()?;

    normalize_duration(value.as_f64())
}

fn handle_message(window: &Window, event: &MessageEvent) -> Result<(), String> {
    let Ok(message) = serde_wasm_bindgen::from_value::<PageMessage>(event.data()) else {
        return Ok(());
    };
    let Some(reply) = message.duration_reply(window.document().as_ref().and_then(read_player_duration))
    else {
        return Ok(());
    };

    window
        .post_message(&to_js(&reply)?, "*")
        .map_err(|e| format!("Failed to post duration: {:?}", e))
}

pub fn start() -> Result<(), String> {
    let window = web_sys::window().ok_or("Failed to get window")?;

    let listener_window = window.clone();
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Err(e) = handle_message(&listener_window, &event) {
            log::warn!("{}", e);
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    window
        .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
        .map_err(|e| format!("Failed to listen for page messages: {:?}", e))?;
    on_message.forget();

    log::debug!("Page bridge ready");
    Ok(())
}
