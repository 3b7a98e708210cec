/// Watch page detection and video identifier extraction
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const WATCH_PAGE_PATTERN: &str = r"^https?://(?:[A-Za-z0-9-]+\.)*youtube\.com/watch(?:[/?#]|$)";

fn watch_page_regex() -> &'static Regex {
    static WATCH_PAGE: OnceLock<Regex> = OnceLock::new();
    WATCH_PAGE.get_or_init(|| Regex::new(WATCH_PAGE_PATTERN).expect("watch page pattern is valid"))
}

/// Whether the address points at a single-video watch page
///
/// Examples:
/// - https://www.youtube.com/watch?v=abc → true
/// - https://m.youtube.com/watch?v=abc&t=42 → true
/// - https://www.youtube.com/results?search_query=rust → false
/// - https://notyoutube.com/watch?v=abc → false
pub fn is_watch_page(url: &str) -> bool {
    watch_page_regex().is_match(url.trim())
}

/// Value of the identifier query parameter, decoded the same way the
/// browser's `URLSearchParams` decodes it
///
/// An absent or empty parameter yields `None`.
pub fn video_id_param(url: &str, param: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Video identifier of a watch page, or `None` for any other address
pub fn watch_page_video_id(url: &str, param: &str) -> Option<String> {
    if is_watch_page(url) {
        video_id_param(url, param)
    } else {
        None
    }
}
