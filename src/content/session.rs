/// Per-video state of the page controller
use crate::bookmark::BookmarkList;
use crate::content::duration::request_duration;
use futures_util::future::{AbortHandle, Abortable};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use web_sys::Window;

/// The loaded video and everything tied to it
///
/// Created on every `NEW` notification and closed when the next one
/// arrives. Closing cancels pending duration lookups; work still running
/// for a closed session must not touch the page.
pub struct PageSession {
    video_id: String,
    bookmarks: RefCell<BookmarkList>,
    pending: RefCell<HashMap<u64, AbortHandle>>,
    next_request: Cell<u64>,
    closed: Cell<bool>,
}

impl PageSession {
    pub fn new(video_id: String) -> Self {
        PageSession {
            video_id,
            bookmarks: RefCell::new(BookmarkList::new()),
            pending: RefCell::new(HashMap::new()),
            next_request: Cell::new(0),
            closed: Cell::new(false),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn bookmarks(&self) -> BookmarkList {
        self.bookmarks.borrow().clone()
    }

    pub fn set_bookmarks(&self, bookmarks: BookmarkList) {
        *self.bookmarks.borrow_mut() = bookmarks;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn close(&self) {
        self.closed.set(true);
        for (_, handle) in self.pending.borrow_mut().drain() {
            handle.abort();
        }
    }

    /// Player duration, `None` if unknown, timed out or cancelled
    pub async fn duration(&self, window: &Window, timeout_ms: u32) -> Option<f64> {
        if self.is_closed() {
            return None;
        }

        let request = self.next_request.get();
        self.next_request.set(request + 1);

        let (handle, registration) = AbortHandle::new_pair();
        self.pending.borrow_mut().insert(request, handle);

        let result = Abortable::new(request_duration(window, timeout_ms), registration).await;
        self.pending.borrow_mut().remove(&request);

        result.unwrap_or_else(|_| {
            log::debug!("Duration lookup for {} cancelled", self.video_id);
            None
        })
    }
}
