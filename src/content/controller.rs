/// Page controller: bookmark button, progress bar markers and the
/// in-memory bookmark list of the loaded video
use crate::bookmark::{Bookmark, BookmarkList, BookmarkSelector, marker_id};
use crate::config::{DuplicateMarkerPolicy, ExtensionConfig};
use crate::content::page::{ICON_FILLED_PATH, ICON_PATH, WatchPage, marker_offset};
use crate::content::session::PageSession;
use crate::host::{self, to_js};
use crate::messages::ExtensionMessage;
use crate::storage::{BookmarkStore, KeyValueArea};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Window;

pub struct PageController<A> {
    config: ExtensionConfig,
    store: BookmarkStore<A>,
    window: Window,
    page: WatchPage,
    session: RefCell<Option<Rc<PageSession>>>,
}

impl<A: KeyValueArea + 'static> PageController<A> {
    pub fn new(config: ExtensionConfig, store: BookmarkStore<A>, window: Window, page: WatchPage) -> Self {
        PageController {
            config,
            store,
            window,
            page,
            session: RefCell::new(None),
        }
    }

    fn current_session(&self) -> Option<Rc<PageSession>> {
        self.session.borrow().clone()
    }

    /// The open session, if it shows `video_id`
    fn session_for(&self, video_id: &str) -> Option<Rc<PageSession>> {
        self.current_session()
            .filter(|session| session.video_id() == video_id)
    }

    fn replace_session(&self, video_id: String) -> Rc<PageSession> {
        let session = Rc::new(PageSession::new(video_id));
        if let Some(previous) = self.session.replace(Some(session.clone())) {
            previous.close();
        }
        session
    }

    /// `chrome.runtime.onMessage` handler; `true` keeps the reply channel open
    pub fn handle_message(self: &Rc<Self>, message: JsValue, send_response: js_sys::Function) -> bool {
        let message = match serde_wasm_bindgen::from_value::<ExtensionMessage>(message) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("Ignoring unknown message: {:?}", e);
                return false;
            }
        };

        match message {
            ExtensionMessage::New { video_id: Some(video_id) } => {
                spawn_local(self.clone().load_video(video_id));
                false
            }
            ExtensionMessage::New { video_id: None } => {
                log::debug!("Ignoring new video without an id");
                false
            }
            ExtensionMessage::Play { value } => {
                if let Err(e) = self.page.seek(value) {
                    log::warn!("{}", e);
                }
                false
            }
            ExtensionMessage::Delete { value, id } => {
                let this = self.clone();
                spawn_local(async move {
                    let remaining = this.delete_bookmark(BookmarkSelector::from_request(value, id)).await;
                    let reply = to_js(remaining.as_slice()).and_then(|reply| {
                        send_response
                            .call1(&JsValue::NULL, &reply)
                            .map_err(|e| format!("Failed to reply: {:?}", e))
                    });
                    if let Err(e) = reply {
                        log::warn!("{}", e);
                    }
                });
                true
            }
        }
    }

    /// Start a session for `video_id`: load its bookmarks, draw their
    /// markers and make sure the bookmark button exists
    pub async fn load_video(self: Rc<Self>, video_id: String) {
        log::info!("Loading bookmarks for {}", video_id);
        let previous = self.current_session();
        let session = self.replace_session(video_id);

        // The progress bar survives in-page navigation
        if previous.is_some_and(|previous| previous.video_id() != session.video_id()) {
            self.page.clear_markers();
        }

        let bookmarks = match self.store.load(session.video_id()).await {
            Ok(bookmarks) => bookmarks,
            Err(e) => {
                log::error!("{}", e);
                BookmarkList::new()
            }
        };
        if session.is_closed() {
            return;
        }
        session.set_bookmarks(bookmarks.clone());

        self.draw_markers(&session, &bookmarks).await;
        if session.is_closed() {
            return;
        }

        if let Err(e) = self.ensure_bookmark_button() {
            log::warn!("{}", e);
        }
    }

    async fn draw_markers(&self, session: &PageSession, bookmarks: &BookmarkList) {
        let mut duration = None;
        let mut looked_up = false;

        for bookmark in bookmarks.iter() {
            let id = bookmark.marker_id();
            if self.page.has_marker(&id) {
                match self.config.duplicate_markers {
                    DuplicateMarkerPolicy::Skip => continue,
                    DuplicateMarkerPolicy::Replace => self.page.remove_marker(&id),
                }
            }

            if !looked_up {
                duration = session.duration(&self.window, self.config.duration_timeout_ms).await;
                looked_up = true;
                if session.is_closed() {
                    return;
                }
            }

            let offset = marker_offset(
                bookmark.time,
                duration,
                self.page.track_width(),
                self.config.track_inset_px,
            );
            if let Err(e) = self.page.draw_marker(&id, offset) {
                log::warn!("{}", e);
            }
        }
    }

    fn ensure_bookmark_button(self: &Rc<Self>) -> Result<(), String> {
        if self.page.has_bookmark_button() {
            return Ok(());
        }

        let this = self.clone();
        self.page.insert_bookmark_button(
            host::extension_url(ICON_PATH),
            host::extension_url(ICON_FILLED_PATH),
            self.config.icon_flash_ms,
            move || spawn_local(this.clone().add_bookmark()),
        )
    }

    /// Bookmark the current playback position of the loaded video
    pub async fn add_bookmark(self: Rc<Self>) {
        if self.page.is_ad_playing() {
            log::debug!("Advertisement playing, not bookmarking");
            return;
        }
        let Some(session) = self.current_session() else {
            return;
        };
        let Some(time) = self.page.current_time() else {
            log::warn!("Failed to read the playback position");
            return;
        };

        let video_id = session.video_id().to_string();

        let mut duration = session.duration(&self.window, self.config.duration_timeout_ms).await;
        if session.is_closed() {
            // A repeated NEW for the same video only swaps the session
            if let Some(current) = self.session_for(&video_id) {
                duration = current.duration(&self.window, self.config.duration_timeout_ms).await;
            }
        }

        let bookmark = Bookmark::at(time);
        if self.session_for(&video_id).is_some() {
            let offset = marker_offset(time, duration, self.page.track_width(), self.config.track_inset_px);
            if let Err(e) = self.page.draw_marker(&bookmark.marker_id(), offset) {
                log::warn!("{}", e);
            }
        } else {
            log::debug!("Left {} while bookmarking, saving without a marker", video_id);
        }

        // Persisted whether or not the video is still shown
        match self.store.update(&video_id, |list| list.insert(bookmark)).await {
            Ok(bookmarks) => {
                if let Some(current) = self.session_for(&video_id) {
                    current.set_bookmarks(bookmarks);
                }
            }
            Err(e) => log::error!("{}", e),
        }
    }

    /// Remove matching bookmarks and their markers, returning what is left
    pub async fn delete_bookmark(&self, selector: BookmarkSelector) -> BookmarkList {
        let Some(session) = self.current_session() else {
            return BookmarkList::new();
        };

        let mut local = session.bookmarks();
        for removed in local.remove(&selector) {
            self.page.remove_marker(&removed.marker_id());
        }
        if let BookmarkSelector::Id(id) = &selector {
            self.page.remove_marker(&marker_id(id));
        }

        let mut removed = Vec::new();
        let result = self
            .store
            .update(session.video_id(), |list| removed = list.remove(&selector))
            .await;

        match result {
            Ok(bookmarks) => {
                if !session.is_closed() {
                    for bookmark in &removed {
                        self.page.remove_marker(&bookmark.marker_id());
                    }
                }
                session.set_bookmarks(bookmarks.clone());
                bookmarks
            }
            Err(e) => {
                log::error!("{}", e);
                session.set_bookmarks(local.clone());
                local
            }
        }
    }
}
