/// Bookmark persistence on top of the host key-value storage
use crate::bookmark::BookmarkList;

/// Async string key-value area, `chrome.storage.local` in the extension
#[allow(async_fn_in_trait)]
pub trait KeyValueArea {
    /// Held while a read-modify-write is in progress; dropping it releases the key
    type Guard;

    async fn get(&self, key: &str) -> Result<Option<String>, String>;
    async fn set(&self, key: &str, value: String) -> Result<(), String>;

    /// Exclusive access to `key` for every context writing to this area
    async fn lock(&self, key: &str) -> Result<Self::Guard, String>;
}

/// `chrome.storage.local`
///
/// Writes are serialized through the Web Locks API, which is shared by
/// every tab of the same origin. Only content scripts write bookmarks, and
/// they all run on the video site's origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl KeyValueArea for ChromeStorage {
    type Guard = crate::host::LockRelease;

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        crate::host::get_storage(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), String> {
        crate::host::set_storage(key, &value).await
    }

    async fn lock(&self, key: &str) -> Result<Self::Guard, String> {
        crate::host::acquire_lock(&lock_name(key)).await
    }
}

/// Storage record key for a video's bookmarks
///
/// Bookmarks are keyed by video identifier alone.
pub fn storage_key(video_id: &str) -> String {
    video_id.to_string()
}

/// Web Lock name guarding a storage record
pub fn lock_name(key: &str) -> String {
    format!("timestamp-bookmarks:{}", key)
}

/// Per-video bookmark lists with serialized read-modify-write
pub struct BookmarkStore<A> {
    area: A,
}

impl<A: KeyValueArea> BookmarkStore<A> {
    pub fn new(area: A) -> Self {
        BookmarkStore { area }
    }

    #[cfg(test)]
    pub fn area(&self) -> &A {
        &self.area
    }

    /// Stored list for the video, empty when nothing was saved yet
    pub async fn load(&self, video_id: &str) -> Result<BookmarkList, String> {
        let stored = self.area.get(&storage_key(video_id)).await?;
        BookmarkList::from_json(stored.as_deref())
    }

    /// Re-read, change and write the list while holding the video's lock
    ///
    /// Two updates to the same video never interleave, even from different
    /// tabs, so neither can overwrite the other's change. Returns the list
    /// as written.
    pub async fn update<F>(&self, video_id: &str, change: F) -> Result<BookmarkList, String>
    where
        F: FnOnce(&mut BookmarkList),
    {
        let key = storage_key(video_id);
        let _guard = self.area.lock(&key).await?;

        let stored = self.area.get(&key).await?;
        let mut list = BookmarkList::from_json(stored.as_deref())?;
        change(&mut list);
        self.area.set(&key, list.to_json()?).await?;

        Ok(list)
    }
}

/// In-memory storage area for tests on both native and wasm targets
#[cfg(test)]
pub(crate) mod testing {
    use super::KeyValueArea;
    use futures_util::lock::{Mutex, OwnedMutexGuard};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::sync::Arc;

    async fn yield_now() {
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(0).await;
        #[cfg(not(target_arch = "wasm32"))]
        tokio::task::yield_now().await;
    }

    /// Yields between calls so concurrent updates interleave
    ///
    /// Clones share entries, counters and locks, like two extension
    /// contexts on one `chrome.storage.local`.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryArea {
        pub(crate) entries: Rc<RefCell<HashMap<String, String>>>,
        pub(crate) reads: Rc<Cell<usize>>,
        pub(crate) writes: Rc<Cell<usize>>,
        pub(crate) fail_writes: Rc<Cell<bool>>,
        locks: Rc<RefCell<HashMap<String, Arc<Mutex<()>>>>>,
    }

    impl MemoryArea {
        pub(crate) fn with_entry(key: &str, value: &str) -> Self {
            let area = MemoryArea::default();
            area.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            area
        }
    }

    impl KeyValueArea for MemoryArea {
        type Guard = OwnedMutexGuard<()>;

        async fn get(&self, key: &str) -> Result<Option<String>, String> {
            self.reads.set(self.reads.get() + 1);
            yield_now().await;
            Ok(self.entries.borrow().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<(), String> {
            yield_now().await;
            if self.fail_writes.get() {
                return Err("Failed to save storage: quota exceeded".to_string());
            }
            self.writes.set(self.writes.get() + 1);
            self.entries.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }

        async fn lock(&self, key: &str) -> Result<Self::Guard, String> {
            let mutex = self
                .locks
                .borrow_mut()
                .entry(key.to_string())
                .or_default()
                .clone();
            Ok(mutex.lock_owned().await)
        }
    }
}
