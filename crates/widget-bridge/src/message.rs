//! Message envelope types for the comm channel.
//!
//! Only the parts of the envelope this bridge consumes are modeled: the
//! header (for msg_id correlation), the parent header (for resolving the
//! originating cell), and the content as raw JSON. Widget state inside the
//! content is opaque here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub msg_id: String,
    pub msg_type: String,
}

impl Header {
    pub fn new(msg_type: &str) -> Self {
        Header {
            msg_id: Uuid::new_v4().to_string(),
            msg_type: msg_type.to_string(),
        }
    }
}

/// A message delivered by (or handed to) the channel transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub header: Header,
    #[serde(default)]
    pub parent_header: Option<Header>,
    #[serde(default)]
    pub content: Value,
}

impl Message {
    /// The msg_id of the request this message responds to, if any.
    pub fn parent_msg_id(&self) -> Option<&str> {
        self.parent_header.as_ref().map(|h| h.msg_id.as_str())
    }
}

/// The `content.data` payload of a comm_open message.
///
/// All fields are optional: backends vary in what they include, and partial
/// payloads are tolerated at parse time. Missing required pieces are rejected
/// later, when a model is actually created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommOpenData {
    #[serde(default)]
    pub target_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_module: Option<String>,
    #[serde(default)]
    pub state: Value,
}

impl CommOpenData {
    /// Extract the open payload from a comm_open message's `content.data`.
    pub fn from_message(msg: &Message) -> Self {
        msg.content
            .get("data")
            .cloned()
            .and_then(|data| serde_json::from_value(data).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comm_open_data_from_message() {
        let msg = Message {
            header: Header::new("comm_open"),
            parent_header: None,
            content: json!({
                "comm_id": "abc",
                "data": {
                    "target_name": "ipython.widget",
                    "model_name": "IntSliderModel",
                    "model_module": "widget-extras",
                    "state": {"value": 5}
                }
            }),
        };

        let data = CommOpenData::from_message(&msg);
        assert_eq!(data.target_name.as_deref(), Some("ipython.widget"));
        assert_eq!(data.model_name.as_deref(), Some("IntSliderModel"));
        assert_eq!(data.model_module.as_deref(), Some("widget-extras"));
        assert_eq!(data.state["value"], 5);
    }

    #[test]
    fn test_comm_open_data_tolerates_partial_payload() {
        let msg = Message {
            header: Header::new("comm_open"),
            parent_header: None,
            content: json!({"data": {"model_name": "M"}}),
        };

        let data = CommOpenData::from_message(&msg);
        assert_eq!(data.model_name.as_deref(), Some("M"));
        assert!(data.model_module.is_none());
        assert!(data.state.is_null());
    }

    #[test]
    fn test_comm_open_data_missing_data_is_default() {
        let msg = Message {
            header: Header::new("comm_open"),
            parent_header: None,
            content: json!({}),
        };

        let data = CommOpenData::from_message(&msg);
        assert!(data.model_name.is_none());
    }
}
