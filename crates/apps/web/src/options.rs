use serde::Deserialize;

pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:3001/api/chat";
pub const DEFAULT_CHAT_TIMEOUT_MS: u32 = 30_000;

/// Host page configuration passed to `mount` as JSON. Every field is
/// optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MountOptions {
    pub container_id: String,
    pub image_id: String,
    /// Directory holding the layer images.
    pub asset_base: String,
    pub chat_endpoint: String,
    /// Client-side request timeout; 0 disables it.
    pub chat_timeout_ms: u32,
    pub controls: ControlIds,
}

/// Element ids of the optional controls. Missing elements are skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlIds {
    pub zoom_in: String,
    pub zoom_out: String,
    pub layer_select: String,
    pub chat_toggle: String,
    pub chat_window: String,
    pub chat_close: String,
    pub chat_messages: String,
    pub chat_input: String,
    pub chat_send: String,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            container_id: "image-container".to_string(),
            image_id: "zoomable-image".to_string(),
            asset_base: "assets".to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            chat_timeout_ms: DEFAULT_CHAT_TIMEOUT_MS,
            controls: ControlIds::default(),
        }
    }
}

impl Default for ControlIds {
    fn default() -> Self {
        Self {
            zoom_in: "zoom-in".to_string(),
            zoom_out: "zoom-out".to_string(),
            layer_select: "layer-select".to_string(),
            chat_toggle: "chat-toggle".to_string(),
            chat_window: "chat-window".to_string(),
            chat_close: "chat-close".to_string(),
            chat_messages: "chat-messages".to_string(),
            chat_input: "chat-input".to_string(),
            chat_send: "chat-send".to_string(),
        }
    }
}

impl MountOptions {
    /// Blank input means all defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_json_uses_defaults() {
        assert_eq!(MountOptions::from_json("").unwrap(), MountOptions::default());
        assert_eq!(MountOptions::from_json("{}").unwrap(), MountOptions::default());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let opts = MountOptions::from_json(
            r#"{"chatEndpoint":"/api/chat","chatTimeoutMs":0,"controls":{"chatSend":"send"}}"#,
        )
        .unwrap();
        assert_eq!(opts.chat_endpoint, "/api/chat");
        assert_eq!(opts.chat_timeout_ms, 0);
        assert_eq!(opts.controls.chat_send, "send");
        assert_eq!(opts.controls.chat_input, "chat-input");
        assert_eq!(opts.image_id, "zoomable-image");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(MountOptions::from_json("{chatEndpoint:").is_err());
    }
}
