/// Duration lookup through the page bridge
use crate::bridge::normalize_duration;
use crate::host::to_js;
use crate::messages::PageMessage;
use futures_util::future::{Either, select};
use futures_util::pin_mut;
use gloo_timers::future::TimeoutFuture;
use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MessageEvent, Window};

/// Window `message` listener that is removed when dropped
struct ListenerGuard {
    window: Window,
    callback: Closure<dyn FnMut(MessageEvent)>,
}

impl ListenerGuard {
    fn attach(window: &Window, callback: Closure<dyn FnMut(MessageEvent)>) -> Result<Self, String> {
        window
            .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to listen for page messages: {:?}", e))?;

        Ok(ListenerGuard {
            window: window.clone(),
            callback,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("message", self.callback.as_ref().unchecked_ref());
    }
}

/// Ask the bridge for the player duration and wait for the matching reply
///
/// Resolves to `None` when the bridge reports no duration, when no reply
/// arrives within `timeout_ms`, or when posting the request fails. Dropping
/// the future stops listening.
pub async fn request_duration(window: &Window, timeout_ms: u32) -> Option<f64> {
    let request_id = Uuid::new_v4().to_string();

    let mut resolve_slot = None;
    let reply = js_sys::Promise::new(&mut |resolve, _reject| resolve_slot = Some(resolve));
    let resolve: js_sys::Function = resolve_slot?;

    let expected_id = request_id.clone();
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Ok(message) = serde_wasm_bindgen::from_value::<PageMessage>(event.data()) else {
            return;
        };
        if let Some(duration) = message.duration_for(&expected_id) {
            let value = duration.map_or(JsValue::NULL, JsValue::from_f64);
            let _ = resolve.call1(&JsValue::UNDEFINED, &value);
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let _listener = match ListenerGuard::attach(window, on_message) {
        Ok(listener) => listener,
        Err(e) => {
            log::warn!("{}", e);
            return None;
        }
    };

    let request = PageMessage::GetVideoDuration {
        request_id: Some(request_id),
    };
    let posted = to_js(&request).and_then(|message| {
        window
            .post_message(&message, "*")
            .map_err(|e| format!("Failed to request duration: {:?}", e))
    });
    if let Err(e) = posted {
        log::warn!("{}", e);
        return None;
    }

    let reply = JsFuture::from(reply);
    let timeout = TimeoutFuture::new(timeout_ms);
    pin_mut!(reply, timeout);

    match select(reply, timeout).await {
        Either::Left((Ok(value), _)) => normalize_duration(value.as_f64()),
        Either::Left((Err(e), _)) => {
            log::warn!("Failed to read duration reply: {:?}", e);
            None
        }
        Either::Right(_) => {
            log::debug!("No duration reply within {}ms", timeout_ms);
            None
        }
    }
}
