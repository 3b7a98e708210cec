/// DOM access to the video page: player, control bar and progress bar
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlImageElement, HtmlVideoElement, MouseEvent};

const CONTROLS_CLASS: &str = "ytp-right-controls-left";
const VIDEO_CLASS: &str = "video-stream";
const PROGRESS_LIST_CLASS: &str = "ytp-progress-list";
const PLAYER_SELECTOR: &str = ".html5-video-player";
const AD_SHOWING_CLASS: &str = "ad-showing";

const BUTTON_CLASS: &str = "bookmark-btn";
const MARKER_CLASS: &str = "bookmark-scrubber";

pub const ICON_PATH: &str = "assets/bookmark.png";
pub const ICON_FILLED_PATH: &str = "assets/bookmark_filled.png";

/// Horizontal marker offset in pixels for a bookmark at `time`
///
/// The usable track is `track_width - inset`. Unknown duration or width
/// places the marker at the start of the bar.
pub fn marker_offset(time: f64, duration: Option<f64>, track_width: Option<f64>, inset: f64) -> f64 {
    let (Some(duration), Some(width)) = (duration, track_width) else {
        return 0.0;
    };
    if !(duration > 0.0) || !time.is_finite() {
        return 0.0;
    }

    let usable = (width - inset).max(0.0);
    (time / duration * usable).clamp(0.0, usable)
}

pub fn marker_style(offset: f64) -> String {
    format!(
        "top:-3px; left:-3px; position:absolute; height:10px; width:10px; border-radius:50%; \
         background: rgb(6, 173, 192); z-index:43; transform:translateX({}px);",
        offset
    )
}

/// The watch page the content script is injected into
pub struct WatchPage {
    document: Document,
}

impl WatchPage {
    pub fn new(document: Document) -> Self {
        WatchPage { document }
    }

    fn first_by_class(&self, class: &str) -> Option<Element> {
        self.document.get_elements_by_class_name(class).item(0)
    }

    fn video(&self) -> Option<HtmlVideoElement> {
        self.first_by_class(VIDEO_CLASS)?.dyn_into::<HtmlVideoElement>().ok()
    }

    pub fn current_time(&self) -> Option<f64> {
        self.video().map(|video| video.current_time())
    }

    pub fn seek(&self, time: f64) -> Result<(), String> {
        let video = self.video().ok_or("Failed to find the video player")?;
        video.set_current_time(time);
        Ok(())
    }

    pub fn is_ad_playing(&self) -> bool {
        self.document
            .query_selector(PLAYER_SELECTOR)
            .ok()
            .flatten()
            .map_or(false, |player| player.class_list().contains(AD_SHOWING_CLASS))
    }

    pub fn track_width(&self) -> Option<f64> {
        self.first_by_class(PROGRESS_LIST_CLASS)
            .map(|track| track.client_width() as f64)
    }

    pub fn has_marker(&self, marker_id: &str) -> bool {
        self.document.get_element_by_id(marker_id).is_some()
    }

    pub fn remove_marker(&self, marker_id: &str) {
        if let Some(marker) = self.document.get_element_by_id(marker_id) {
            marker.remove();
        }
    }

    /// Remove every bookmark marker from the progress bar
    pub fn clear_markers(&self) {
        let markers = self.document.get_elements_by_class_name(MARKER_CLASS);
        while let Some(marker) = markers.item(0) {
            marker.remove();
        }
    }

    pub fn draw_marker(&self, marker_id: &str, offset: f64) -> Result<(), String> {
        let track = self
            .first_by_class(PROGRESS_LIST_CLASS)
            .ok_or("Failed to find the progress bar")?;

        let marker = self
            .document
            .create_element("div")
            .map_err(|e| format!("Failed to create marker: {:?}", e))?;
        marker.set_id(marker_id);
        marker.set_class_name(MARKER_CLASS);
        marker
            .set_attribute("style", &marker_style(offset))
            .map_err(|e| format!("Failed to style marker: {:?}", e))?;

        track
            .prepend_with_node_1(&marker)
            .map_err(|e| format!("Failed to insert marker: {:?}", e))
    }

    pub fn has_bookmark_button(&self) -> bool {
        self.first_by_class(BUTTON_CLASS).is_some()
    }

    /// Put the bookmark button first in the player's control bar
    ///
    /// `on_click` runs after the icon switched to its filled variant; the
    /// plain icon comes back after `flash_ms`.
    pub fn insert_bookmark_button(
        &self,
        icon_url: String,
        icon_filled_url: String,
        flash_ms: u32,
        mut on_click: impl FnMut() + 'static,
    ) -> Result<(), String> {
        let controls = self
            .first_by_class(CONTROLS_CLASS)
            .ok_or("Failed to find the player controls")?;

        let icon = self
            .document
            .create_element("img")
            .map_err(|e| format!("Failed to create icon: {:?}", e))?
            .unchecked_into::<HtmlImageElement>();
        icon.set_src(&icon_url);
        icon.set_attribute("style", "height: 50%;")
            .map_err(|e| format!("Failed to style icon: {:?}", e))?;

        let button = self
            .document
            .create_element("button")
            .map_err(|e| format!("Failed to create button: {:?}", e))?
            .unchecked_into::<HtmlButtonElement>();
        button.set_class_name(&format!("ytp-button {}", BUTTON_CLASS));
        button.set_title("Click to bookmark current timestamp");
        button
            .set_attribute("style", "display: flex; align-items: center; justify-content: center;")
            .map_err(|e| format!("Failed to style button: {:?}", e))?;
        button
            .append_child(&icon)
            .map_err(|e| format!("Failed to attach icon: {:?}", e))?;

        let on_button_click = Closure::wrap(Box::new(move |_event: MouseEvent| {
            icon.set_src(&icon_filled_url);
            let icon = icon.clone();
            let icon_url = icon_url.clone();
            Timeout::new(flash_ms, move || icon.set_src(&icon_url)).forget();

            on_click();
        }) as Box<dyn FnMut(MouseEvent)>);
        button
            .add_event_listener_with_callback("click", on_button_click.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to listen for clicks: {:?}", e))?;
        on_button_click.forget();

        controls
            .insert_before(&button, controls.first_child().as_ref())
            .map_err(|e| format!("Failed to insert button: {:?}", e))?;

        Ok(())
    }
}
