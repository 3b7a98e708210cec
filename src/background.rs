/// Tab watcher running in the background service worker
use crate::config::ExtensionConfig;
use crate::host;
use crate::messages::ExtensionMessage;
use crate::watch_url::{is_watch_page, video_id_param};

/// Notification for a tab whose address changed, if it is a watch page
///
/// A watch page without a usable identifier still produces a `NEW` with a
/// null id; the page controller ignores it.
pub fn message_for_tab(url: Option<&str>, config: &ExtensionConfig) -> Option<ExtensionMessage> {
    let url = url?;

    if !is_watch_page(url) {
        return None;
    }

    Some(ExtensionMessage::New {
        video_id: video_id_param(url, config.video_id_param),
    })
}

/// Forward one `chrome.tabs.onUpdated` event to the tab's page controller
///
/// `background.js` registers the listener synchronously and hands over
/// every event, including those queued while the module was loading.
pub async fn tab_updated(tab_id: i32, url: Option<String>, config: &ExtensionConfig) {
    let Some(message) = message_for_tab(url.as_deref(), config) else {
        return;
    };

    // Tabs without the content script reject the message
    if let Err(e) = host::send_tab_message(tab_id, &message).await {
        log::debug!("{}", e);
    }
}
