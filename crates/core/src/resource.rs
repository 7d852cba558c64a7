//! UI resources: renderable bundles produced by tools and displayed by the host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// URI scheme used by every generated UI resource.
pub const UI_SCHEME: &str = "ui://";

/// MIME type used when a resource payload is a URL to be framed.
pub const MIME_URI_LIST: &str = "text/uri-list";

/// MIME type used when a resource payload is inline markup.
pub const MIME_HTML: &str = "text/html";

const DEFAULT_TITLE: &str = "Interactive Component";

/// Preferred frame size for rendering, as CSS lengths (`["900px", "700px"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize(pub String, pub String);

impl FrameSize {
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self(width.into(), height.into())
    }

    /// Frame size in pixels.
    pub fn px(width: u32, height: u32) -> Self {
        Self(format!("{}px", width), format!("{}px", height))
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::px(800, 600)
    }
}

/// Rendering hints attached to a UI resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiResourceMetadata {
    pub title: String,
    #[serde(
        rename = "mcpui.dev/ui-preferred-frame-size",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_frame_size: Option<FrameSize>,
    #[serde(
        rename = "mcpui.dev/ui-initial-render-data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_render_data: Option<serde_json::Value>,
    /// Additional metadata entries, kept sorted so serialization is stable.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// An immutable, renderable content bundle.
///
/// Serialized in the mcp-ui shape (`text` for the payload, `_meta` for the
/// metadata) so any mcp-ui compatible renderer can display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiResource {
    pub uri: String,
    pub mime_type: String,
    #[serde(rename = "text")]
    pub payload: String,
    #[serde(rename = "_meta")]
    pub metadata: UiResourceMetadata,
}

impl UiResource {
    /// Parsed form of the resource URI, if it follows the `ui://<kind>/<id>` scheme.
    pub fn resource_uri(&self) -> Option<ResourceUri> {
        self.uri.parse().ok()
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}

/// Input to [`build`].
#[derive(Debug, Clone, Default)]
pub struct UiResourceConfig {
    pub uri: String,
    pub mime_type: Option<String>,
    pub payload: String,
    pub title: Option<String>,
    pub frame_size: Option<FrameSize>,
    pub initial_data: Option<serde_json::Value>,
    pub extra_meta: BTreeMap<String, serde_json::Value>,
}

impl UiResourceConfig {
    /// Inline HTML bundle.
    pub fn html(uri: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: Some(MIME_HTML.to_string()),
            payload: markup.into(),
            ..Default::default()
        }
    }

    /// External page referenced by URL.
    pub fn url(uri: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: Some(MIME_URI_LIST.to_string()),
            payload: url.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn frame_size(mut self, frame_size: FrameSize) -> Self {
        self.frame_size = Some(frame_size);
        self
    }

    pub fn initial_data(mut self, data: serde_json::Value) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra_meta.insert(key.into(), value);
        self
    }
}

/// Build a UI resource from its configuration.
///
/// Pure: the same configuration always produces the same resource. Uniqueness
/// of the URI is the caller's responsibility.
pub fn build(config: UiResourceConfig) -> UiResource {
    UiResource {
        uri: config.uri,
        mime_type: config
            .mime_type
            .unwrap_or_else(|| MIME_URI_LIST.to_string()),
        payload: config.payload,
        metadata: UiResourceMetadata {
            title: config.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            preferred_frame_size: Some(config.frame_size.unwrap_or_default()),
            initial_render_data: Some(
                config
                    .initial_data
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            ),
            extra: config.extra_meta,
        },
    }
}

/// Resource descriptor returned by `resources/read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// A `ui://<kind>/<id>` URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    pub kind: String,
    pub id: String,
}

impl ResourceUri {
    pub fn new(kind: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            kind: kind.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", UI_SCHEME, self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceUriError {
    #[error("URI must start with ui://: {0}")]
    Scheme(String),
    #[error("URI must have the form ui://<kind>/<id>: {0}")]
    Shape(String),
}

impl FromStr for ResourceUri {
    type Err = ResourceUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(UI_SCHEME)
            .ok_or_else(|| ResourceUriError::Scheme(s.to_string()))?;

        match rest.split_once('/') {
            Some((kind, id)) if !kind.is_empty() && !id.is_empty() => Ok(Self::new(kind, id)),
            _ => Err(ResourceUriError::Shape(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> UiResourceConfig {
        UiResourceConfig::html("ui://assessment/17", "<h1>Assessment</h1>")
            .title("Interactive Assessment Form")
            .frame_size(FrameSize::px(900, 700))
            .initial_data(json!({"type": "maturity", "assessmentId": 17}))
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = build(sample_config());
        let second = build(sample_config());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_build_defaults() {
        let resource = build(UiResourceConfig {
            uri: "ui://example/interactive-form".to_string(),
            payload: "https://example.com/interactive-form".to_string(),
            ..Default::default()
        });

        assert_eq!(resource.mime_type, MIME_URI_LIST);
        assert_eq!(resource.title(), "Interactive Component");
        assert_eq!(
            resource.metadata.preferred_frame_size,
            Some(FrameSize::new("800px", "600px"))
        );
        assert_eq!(resource.metadata.initial_render_data, Some(json!({})));
    }

    #[test]
    fn test_wire_shape() {
        let resource = build(sample_config().meta("theme", json!("light")));
        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(value["uri"], "ui://assessment/17");
        assert_eq!(value["mimeType"], "text/html");
        assert_eq!(value["text"], "<h1>Assessment</h1>");
        assert_eq!(value["_meta"]["title"], "Interactive Assessment Form");
        assert_eq!(
            value["_meta"]["mcpui.dev/ui-preferred-frame-size"],
            json!(["900px", "700px"])
        );
        assert_eq!(
            value["_meta"]["mcpui.dev/ui-initial-render-data"]["assessmentId"],
            17
        );
        assert_eq!(value["_meta"]["theme"], "light");

        let parsed: UiResource = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, resource);
    }

    #[test]
    fn test_url_config() {
        let resource = build(UiResourceConfig::url(
            "ui://example/form",
            "https://example.com/form",
        ));
        assert_eq!(resource.mime_type, MIME_URI_LIST);
        assert_eq!(resource.payload, "https://example.com/form");
    }

    #[test]
    fn test_resource_uri_roundtrip() {
        let uri = ResourceUri::new("report", 1700000000123u64);
        assert_eq!(uri.to_string(), "ui://report/1700000000123");

        let parsed: ResourceUri = "ui://report/1700000000123".parse().unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn test_resource_uri_rejects_bad_input() {
        assert!(matches!(
            "http://report/1".parse::<ResourceUri>(),
            Err(ResourceUriError::Scheme(_))
        ));
        assert!(matches!(
            "ui://report".parse::<ResourceUri>(),
            Err(ResourceUriError::Shape(_))
        ));
        assert!(matches!(
            "ui://report/".parse::<ResourceUri>(),
            Err(ResourceUriError::Shape(_))
        ));
    }
}
