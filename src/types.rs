//! Core records and per-call option bags

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::id::{ExtensionId, WebsessionId, WebviewId};

/// The public record describing a live webview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebviewInfo {
    /// Webview id
    pub id: WebviewId,
    /// Owning extension id
    pub extension: ExtensionId,
    /// Websession used by the webview, if not the host default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websession: Option<WebsessionId>,
}

/// Partial-attribute filter for `query`; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebviewFilter {
    pub id: Option<WebviewId>,
    pub extension: Option<ExtensionId>,
    pub websession: Option<WebsessionId>,
}

impl WebviewFilter {
    /// Whether the record satisfies every set field
    pub fn matches(&self, info: &WebviewInfo) -> bool {
        self.id.as_ref().is_none_or(|id| *id == info.id)
            && self
                .extension
                .as_ref()
                .is_none_or(|ext| *ext == info.extension)
            && self
                .websession
                .as_ref()
                .is_none_or(|ws| Some(ws) == info.websession.as_ref())
    }
}

/// Identity of the caller issuing host operations
///
/// `WebviewHost::current` resolves the context's own webview, mirroring
/// calls made from inside an embedded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    /// Extension the caller belongs to
    pub extension: ExtensionId,
    /// The caller's own webview, when the caller runs inside one
    pub webview: Option<WebviewId>,
}

impl HostContext {
    /// A context for an extension running outside any webview
    pub fn extension(extension: impl Into<ExtensionId>) -> Self {
        Self {
            extension: extension.into(),
            webview: None,
        }
    }

    /// A context for code running inside a webview
    pub fn webview(extension: impl Into<ExtensionId>, webview: impl Into<WebviewId>) -> Self {
        Self {
            extension: extension.into(),
            webview: Some(webview.into()),
        }
    }
}

/// Options for `load_url`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadUrlOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<String>,
}

/// Options for `load_file`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadFileOptions {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub query: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Stylesheet origin for `insert_css`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CssOrigin {
    /// User stylesheet, wins over page styles
    User,
    /// Author stylesheet, participates in normal cascade order
    #[default]
    Author,
}

/// Options for `insert_css`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssOptions {
    pub origin: CssOrigin,
}

/// Options for `execute_javascript`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptOptions {
    /// Treat the execution as user-gesture initiated
    pub user_gesture: bool,
}

/// Options for `adjust_selection`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustSelection {
    /// Amount to move the selection start by
    pub start: Option<i32>,
    /// Amount to move the selection end by
    pub end: Option<i32>,
}

/// Where the DevTools frontend docks relative to the inspected webview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DevToolsDockMode {
    Left,
    Right,
    #[default]
    Bottom,
    Undocked,
    Detach,
}

/// Options for `open_devtools`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevToolsOptions {
    pub mode: DevToolsDockMode,
    /// Bring the DevTools window to front after opening
    pub activate: bool,
}
