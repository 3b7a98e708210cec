/// Messages exchanged between the extension contexts
use serde::{Deserialize, Serialize};

/// Sent through `chrome.tabs.sendMessage` to the page controller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtensionMessage {
    /// A watch page finished loading or changed video
    New {
        #[serde(rename = "videoId", default)]
        video_id: Option<String>,
    },
    /// Seek the player to `value` seconds
    Play { value: f64 },
    /// Remove a bookmark; answered with the remaining bookmarks as a JSON array
    Delete {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

/// Sent through `window.postMessage` between the page controller and the
/// bridge running in the page's own context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageMessage {
    GetVideoDuration {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
    },
    VideoDurationResponse {
        duration: Option<f64>,
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
    },
}

impl PageMessage {
    /// Answer to this message if it is a duration request
    pub fn duration_reply(&self, duration: Option<f64>) -> Option<PageMessage> {
        match self {
            PageMessage::GetVideoDuration { request_id } => Some(PageMessage::VideoDurationResponse {
                duration,
                request_id: request_id.clone(),
            }),
            PageMessage::VideoDurationResponse { .. } => None,
        }
    }

    /// Duration carried by the response to request `id`
    pub fn duration_for(&self, id: &str) -> Option<Option<f64>> {
        match self {
            PageMessage::VideoDurationResponse {
                duration,
                request_id: Some(request_id),
            } if request_id == id => Some(*duration),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_message_wire_format() {
        let msg = ExtensionMessage::New {
            video_id: Some("abc".to_string()),
        };

        assert_eq!(serde_json::to_value(&msg).unwrap(), json!({"type": "NEW", "videoId": "abc"}));
    }

    #[test]
    fn test_new_message_with_null_id() {
        let msg: ExtensionMessage = serde_json::from_value(json!({"type": "NEW", "videoId": null})).unwrap();
        assert_eq!(msg, ExtensionMessage::New { video_id: None });

        let msg = ExtensionMessage::New { video_id: None };
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!({"type": "NEW", "videoId": null}));
    }

    #[test]
    fn test_play_and_delete_wire_format() {
        let play: ExtensionMessage = serde_json::from_value(json!({"type": "PLAY", "value": 12.5})).unwrap();
        assert_eq!(play, ExtensionMessage::Play { value: 12.5 });

        let delete: ExtensionMessage = serde_json::from_value(json!({"type": "DELETE", "value": 3})).unwrap();
        assert_eq!(delete, ExtensionMessage::Delete { value: 3.0, id: None });

        let delete = ExtensionMessage::Delete {
            value: 3.0,
            id: Some("b1".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            json!({"type": "DELETE", "value": 3.0, "id": "b1"})
        );
    }

    #[test]
    fn test_unknown_message_is_rejected() {
        let result = serde_json::from_value::<ExtensionMessage>(json!({"type": "PAUSE"}));
        assert!(result.is_err());

        let result = serde_json::from_value::<PageMessage>(json!({"source": "react-devtools"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_page_message_wire_format() {
        let request = PageMessage::GetVideoDuration {
            request_id: Some("r1".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "GET_VIDEO_DURATION", "requestId": "r1"})
        );

        let legacy: PageMessage = serde_json::from_value(json!({"type": "GET_VIDEO_DURATION"})).unwrap();
        assert_eq!(legacy, PageMessage::GetVideoDuration { request_id: None });
    }

    #[test]
    fn test_duration_reply_echoes_request_id() {
        let request = PageMessage::GetVideoDuration {
            request_id: Some("r1".to_string()),
        };

        let reply = request.duration_reply(Some(212.0)).unwrap();

        assert_eq!(
            reply,
            PageMessage::VideoDurationResponse {
                duration: Some(212.0),
                request_id: Some("r1".to_string()),
            }
        );
        assert_eq!(reply.duration_reply(None), None);
    }

    #[test]
    fn test_duration_for_matches_request_id() {
        let reply = PageMessage::VideoDurationResponse {
            duration: None,
            request_id: Some("r1".to_string()),
        };

        assert_eq!(reply.duration_for("r1"), Some(None));
        assert_eq!(reply.duration_for("r2"), None);

        let uncorrelated = PageMessage::VideoDurationResponse {
            duration: Some(10.0),
            request_id: None,
        };
        assert_eq!(uncorrelated.duration_for("r1"), None);
    }
}
