/// Bookmark records and the per-video bookmark list
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved position in a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    /// Empty only for records written before bookmarks carried ids,
    /// see [`BookmarkList::from_json`]
    #[serde(default)]
    pub id: String,
    pub time: f64,
    pub desc: String,
}

impl Bookmark {
    /// New bookmark at `time` seconds with a fresh id
    pub fn at(time: f64) -> Bookmark {
        Bookmark {
            id: Uuid::new_v4().to_string(),
            time,
            desc: format!("Bookmark at: {}", format_time(time)),
        }
    }

    pub fn marker_id(&self) -> String {
        marker_id(&self.id)
    }
}

/// Id of the progress bar marker drawn for bookmark `id`
pub fn marker_id(id: &str) -> String {
    format!("bookmark-marker-{}", id)
}

/// Id given to legacy records so their markers stay stable across reloads
fn legacy_id(time: f64) -> String {
    format!("t{}", time)
}

/// Which bookmarks a delete request targets
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkSelector {
    Id(String),
    Time(f64),
}

impl BookmarkSelector {
    /// Prefer the id when a request carries one
    pub fn from_request(time: f64, id: Option<String>) -> BookmarkSelector {
        match id {
            Some(id) if !id.is_empty() => BookmarkSelector::Id(id),
            _ => BookmarkSelector::Time(time),
        }
    }

    fn matches(&self, bookmark: &Bookmark) -> bool {
        match self {
            BookmarkSelector::Id(id) => bookmark.id == *id,
            BookmarkSelector::Time(time) => bookmark.time == *time,
        }
    }
}

/// Bookmarks for one video, sorted ascending by time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BookmarkList {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkList {
    pub fn new() -> Self {
        BookmarkList {
            bookmarks: Vec::new(),
        }
    }

    /// Parse a stored record; `None` means nothing was stored yet
    pub fn from_json(json: Option<&str>) -> Result<Self, String> {
        let Some(json) = json else {
            return Ok(BookmarkList::new());
        };

        let mut bookmarks: Vec<Bookmark> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse bookmarks: {:?}", e))?;

        for bookmark in bookmarks.iter_mut().filter(|b| b.id.is_empty()) {
            bookmark.id = legacy_id(bookmark.time);
        }
        bookmarks.sort_by(|a, b| a.time.total_cmp(&b.time));

        Ok(BookmarkList { bookmarks })
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.bookmarks)
            .map_err(|e| format!("Failed to serialize bookmarks: {:?}", e))
    }

    /// Append and re-sort; equal times keep insertion order
    pub fn insert(&mut self, bookmark: Bookmark) {
        self.bookmarks.push(bookmark);
        self.bookmarks.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Remove every bookmark the selector matches, returning what was removed
    pub fn remove(&mut self, selector: &BookmarkSelector) -> Vec<Bookmark> {
        let (removed, kept): (Vec<Bookmark>, Vec<Bookmark>) = self
            .bookmarks
            .drain(..)
            .partition(|b| selector.matches(b));
        self.bookmarks = kept;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.iter()
    }

    pub fn as_slice(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}

/// Convert seconds to `HH:MM:SS`, dropping fractional seconds
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark(id: &str, time: f64) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            time,
            desc: format!("Bookmark at: {}", format_time(time)),
        }
    }

    fn times(list: &BookmarkList) -> Vec<f64> {
        list.iter().map(|b| b.time).collect()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00:00");
        assert_eq!(format_time(59.0), "00:00:59");
        assert_eq!(format_time(3661.0), "01:01:01");
    }

    #[test]
    fn test_format_time_truncates_fraction() {
        assert_eq!(format_time(59.999), "00:00:59");
        assert_eq!(format_time(125.5), "00:02:05");
    }

    #[test]
    fn test_format_time_out_of_range() {
        assert_eq!(format_time(-3.0), "00:00:00");
        assert_eq!(format_time(f64::NAN), "00:00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00:00");
        assert_eq!(format_time(100.0 * 3600.0), "100:00:00");
    }

    #[test]
    fn test_bookmark_at() {
        let b = Bookmark::at(3661.4);

        assert_eq!(b.time, 3661.4);
        assert_eq!(b.desc, "Bookmark at: 01:01:01");
        assert!(!b.id.is_empty());
        assert_ne!(b.id, Bookmark::at(3661.4).id);
    }

    #[test]
    fn test_insert_keeps_sorted() {
        let mut list = BookmarkList::new();
        list.insert(bookmark("a", 30.0));
        list.insert(bookmark("b", 5.0));
        list.insert(bookmark("c", 12.5));

        assert_eq!(times(&list), vec![5.0, 12.5, 30.0]);
    }

    #[test]
    fn test_insert_equal_times_keeps_order() {
        let mut list = BookmarkList::new();
        list.insert(bookmark("first", 10.0));
        list.insert(bookmark("second", 10.0));

        let ids: Vec<&str> = list.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_remove_by_time() {
        let mut list = BookmarkList::new();
        list.insert(bookmark("a", 5.0));
        list.insert(bookmark("b", 10.0));
        list.insert(bookmark("c", 15.0));

        let removed = list.remove(&BookmarkSelector::Time(10.0));

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, "b");
        assert_eq!(times(&list), vec![5.0, 15.0]);
    }

    #[test]
    fn test_remove_by_id_leaves_same_time_sibling() {
        let mut list = BookmarkList::new();
        list.insert(bookmark("a", 10.0));
        list.insert(bookmark("b", 10.0));

        list.remove(&BookmarkSelector::Id("a".to_string()));

        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].id, "b");
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut list = BookmarkList::new();
        list.insert(bookmark("a", 5.0));
        let before = list.clone();

        let removed = list.remove(&BookmarkSelector::Time(99.0));

        assert!(removed.is_empty());
        assert_eq!(list, before);
    }

    #[test]
    fn test_selector_from_request() {
        assert_eq!(
            BookmarkSelector::from_request(4.0, Some("x".to_string())),
            BookmarkSelector::Id("x".to_string())
        );
        assert_eq!(
            BookmarkSelector::from_request(4.0, Some(String::new())),
            BookmarkSelector::Time(4.0)
        );
        assert_eq!(BookmarkSelector::from_request(4.0, None), BookmarkSelector::Time(4.0));
    }

    #[test]
    fn test_from_json_none_is_empty() {
        let list = BookmarkList::from_json(None).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_from_json_legacy_records() {
        let json = r#"[{"time":10,"desc":"b"},{"time":5,"desc":"a"}]"#;

        let list = BookmarkList::from_json(Some(json)).unwrap();

        assert_eq!(times(&list), vec![5.0, 10.0]);
        assert_eq!(list.as_slice()[0].desc, "a");
        assert_eq!(list.as_slice()[0].id, "t5");
        assert_eq!(list.as_slice()[1].id, "t10");
    }

    #[test]
    fn test_from_json_invalid() {
        let result = BookmarkList::from_json(Some("{not json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_json_is_plain_array() {
        let mut list = BookmarkList::new();
        list.insert(bookmark("a", 1.5));

        let json = list.to_json().unwrap();

        assert_eq!(json, r#"[{"id":"a","time":1.5,"desc":"Bookmark at: 00:00:01"}]"#);
        assert_eq!(BookmarkList::from_json(Some(&json)).unwrap(), list);
    }

    #[test]
    fn test_marker_id() {
        assert_eq!(bookmark("abc", 1.0).marker_id(), "bookmark-marker-abc");
    }
}
