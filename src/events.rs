//! Event channels and typed payloads
//!
//! Every notification from the engine arrives on one of the named channels in
//! [`EventKind`], as a `(WebviewEvent, EventDetails)` pair. The envelope
//! always identifies the emitting webview and its owning extension; the
//! details carry the channel-specific snapshot taken at emission time.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::id::{ExtensionId, WebviewId};
use crate::input::InputDetails;
use crate::types::WebviewInfo;

/// The named event channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// Webview created
    Created,
    /// Webview removed
    Removed,
    /// The document in the top-level frame finished loading
    DomReady,
    /// Page started loading
    LoadStarted,
    /// Page stopped loading
    LoadStopped,
    /// Page load is done
    LoadFinished,
    /// Page load failed
    LoadFailed,
    /// Page load cancelled
    LoadCancelled,
    /// Page title updated
    PageTitleUpdated,
    /// Page favicon updated
    PageFaviconUpdated,
    /// Page navigation started
    NavigationStarted,
    /// Page navigation redirected
    NavigationRedirected,
    /// Page navigation ended
    NavigationDone,
    /// Page navigation ended without changing url
    NavigationInPageDone,
    /// Renderer process shut down
    Shutdown,
    /// Page became unresponsive
    PageUnresponsive,
    /// Page became responsive again
    PageResponsive,
    /// Input event observed
    Input,
    /// Webview entered fullscreen mode
    EnteredFullscreen,
    /// Webview exited fullscreen mode
    ExitedFullscreen,
    /// User changed zoom level
    ZoomChanged,
    /// Webview gained focus
    Focused,
    /// Webview lost focus
    Unfocused,
    /// DevTools opened
    DevtoolsOpened,
    /// DevTools closed
    DevtoolsClosed,
    /// DevTools focused
    DevtoolsFocused,
    /// DevTools instructed the page to reload
    DevtoolsReload,
    /// Page requested login credentials
    Login,
    /// Media started playing
    MediaStarted,
    /// Media paused or finished playing
    MediaPaused,
    /// Page theme color changed
    ThemeColorChanged,
    /// Pointer moved over a link or keyboard focus reached a link
    UpdatedTargetUrl,
    /// Cursor type changed
    CursorChanged,
    /// Context menu opened
    ContextMenu,
    /// Preferred size changed
    PreferredSizeChanged,
    /// Console message logged
    ConsoleMessage,
    /// New window requested
    WindowOpen,
}

/// Envelope identifying the webview an event originates from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebviewEvent {
    /// Webview id
    pub id: WebviewId,
    /// Owning extension id
    pub extension: ExtensionId,
}

/// Details for load failure and cancellation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFailedDetails {
    pub error_code: i32,
    pub error_description: String,
    pub validated_url: String,
    pub is_main_frame: bool,
    pub frame_id: i64,
}

/// Details for title updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleDetails {
    pub title: String,
    /// Whether the page set the title explicitly (vs derived from the url)
    pub explicit_set: bool,
}

/// Details for favicon updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaviconDetails {
    pub favicons: Vec<String>,
}

/// Details for navigation start and redirect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStartedDetails {
    pub url: String,
    pub is_same_document: bool,
    pub is_main_frame: bool,
    pub frame_id: i64,
}

/// Details for completed navigations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDoneDetails {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_response_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status_text: Option<String>,
}

/// Details for in-page navigations (fragment or history API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationInPageDoneDetails {
    pub url: String,
    pub is_main_frame: bool,
    pub frame_id: i64,
}

/// Why a renderer process went away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShutdownReason {
    CleanExit,
    AbnormalExit,
    Killed,
    Crashed,
    Oom,
    LaunchFailed,
    IntegrityFailure,
}

/// Details for renderer process shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownDetails {
    pub reason: ShutdownReason,
    pub exit_code: i32,
}

/// Direction of a user-initiated zoom change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Details for user zoom changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomDetails {
    pub direction: ZoomDirection,
}

/// An authentication challenge raised by the page or a proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub url: String,
    pub is_proxy: bool,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub realm: String,
}

/// Details for audibility changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDetails {
    pub audible: bool,
}

/// Details for theme color changes; `None` means the page cleared its color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColorDetails {
    pub color: Option<String>,
}

/// Details for target-url updates (link hover)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUrlDetails {
    pub url: String,
}

/// Details for cursor changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorDetails {
    /// Cursor type name as reported by the engine
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// What kind of media element a context menu was opened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaType {
    None,
    Image,
    Audio,
    Video,
    Canvas,
    File,
    Plugin,
}

/// Input modality that triggered a context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuSourceType {
    None,
    Mouse,
    Keyboard,
    Touch,
    TouchMenu,
    LongPress,
    LongTap,
    TouchHandle,
    Stylus,
    AdjustSelection,
    AdjustSelectionReset,
}

/// Media element state flags at context-menu time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaFlags {
    pub in_error: bool,
    pub is_paused: bool,
    pub is_muted: bool,
    pub has_audio: bool,
    pub is_looping: bool,
    pub is_controls_visible: bool,
    pub can_toggle_controls: bool,
    pub can_print: bool,
    pub can_save: bool,
    pub can_show_picture_in_picture: bool,
    pub is_showing_picture_in_picture: bool,
    pub can_rotate: bool,
    pub can_loop: bool,
}

/// Editing capabilities at context-menu time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditFlags {
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_cut: bool,
    pub can_copy: bool,
    pub can_paste: bool,
    pub can_delete: bool,
    pub can_select_all: bool,
    pub can_edit_richly: bool,
}

/// Full snapshot taken when a context menu opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuDetails {
    pub x: i32,
    pub y: i32,
    pub frame_id: i64,
    #[serde(rename = "linkURL")]
    pub link_url: String,
    pub link_text: String,
    #[serde(rename = "pageURL")]
    pub page_url: String,
    #[serde(rename = "frameURL")]
    pub frame_url: String,
    #[serde(rename = "srcURL")]
    pub src_url: String,
    pub media_type: MediaType,
    pub has_image_contents: bool,
    pub is_editable: bool,
    pub selection_text: String,
    pub title_text: String,
    pub alt_text: String,
    pub suggested_filename: String,
    pub selection_rect: Rect,
    pub selection_start_offset: i32,
    pub misspelled_word: String,
    pub dictionary_suggestions: Vec<String>,
    pub frame_charset: String,
    pub input_field_type: String,
    pub spellcheck_enabled: bool,
    pub menu_source_type: MenuSourceType,
    pub media_flags: MediaFlags,
    pub edit_flags: EditFlags,
}

/// Details for preferred-size changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredSizeDetails {
    pub width: u32,
    pub height: u32,
}

/// Details for console messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessageDetails {
    pub level: i32,
    pub message: String,
    pub line: i32,
}

/// Requested placement policy for a new window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    Default,
    ForegroundTab,
    BackgroundTab,
    NewWindow,
    Other,
}

/// Referrer policy accompanying a window-open request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    Default,
    UnsafeUrl,
    NoReferrerWhenDowngrade,
    NoReferrer,
    Origin,
    StrictOriginWhenCrossOrigin,
    SameOrigin,
    StrictOrigin,
}

/// Referrer of a window-open request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    pub url: String,
    pub policy: ReferrerPolicy,
}

/// Details for new-window requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOpenDetails {
    pub url: String,
    pub frame_name: String,
    pub features: String,
    pub disposition: Disposition,
    pub referrer: Referrer,
}

/// The channel-specific payload delivered alongside the envelope
///
/// Channels without a payload (focus, fullscreen, media, devtools
/// lifecycle, responsiveness) use `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetails {
    None,
    Webview(WebviewInfo),
    LoadFailed(LoadFailedDetails),
    Title(TitleDetails),
    Favicon(FaviconDetails),
    NavigationStarted(NavigationStartedDetails),
    NavigationDone(NavigationDoneDetails),
    NavigationInPageDone(NavigationInPageDoneDetails),
    Shutdown(ShutdownDetails),
    Zoom(ZoomDetails),
    Login(LoginRequest),
    Audio(AudioDetails),
    ThemeColor(ThemeColorDetails),
    TargetUrl(TargetUrlDetails),
    Cursor(CursorDetails),
    ContextMenu(Box<ContextMenuDetails>),
    PreferredSize(PreferredSizeDetails),
    ConsoleMessage(ConsoleMessageDetails),
    WindowOpen(WindowOpenDetails),
    Input(InputDetails),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_wire_names() {
        let json = serde_json::to_string(&EventKind::NavigationInPageDone).unwrap();
        assert_eq!(json, "\"navigationInPageDone\"");
        let back: EventKind = serde_json::from_str("\"domReady\"").unwrap();
        assert_eq!(back, EventKind::DomReady);
    }

    #[test]
    fn test_shutdown_reason_wire_names() {
        let json = serde_json::to_string(&ShutdownReason::CleanExit).unwrap();
        assert_eq!(json, "\"clean-exit\"");
        let back: ShutdownReason = serde_json::from_str("\"launch-failed\"").unwrap();
        assert_eq!(back, ShutdownReason::LaunchFailed);
    }

    #[test]
    fn test_context_menu_url_casing() {
        let details = ContextMenuDetails {
            x: 1,
            y: 2,
            frame_id: 0,
            link_url: "https://a.test".into(),
            link_text: String::new(),
            page_url: "https://p.test".into(),
            frame_url: String::new(),
            src_url: String::new(),
            media_type: MediaType::None,
            has_image_contents: false,
            is_editable: false,
            selection_text: String::new(),
            title_text: String::new(),
            alt_text: String::new(),
            suggested_filename: String::new(),
            selection_rect: Rect::default(),
            selection_start_offset: 0,
            misspelled_word: String::new(),
            dictionary_suggestions: Vec::new(),
            frame_charset: "utf-8".into(),
            input_field_type: "none".into(),
            spellcheck_enabled: false,
            menu_source_type: MenuSourceType::Mouse,
            media_flags: MediaFlags::default(),
            edit_flags: EditFlags::default(),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("linkURL").is_some());
        assert!(json.get("pageURL").is_some());
        assert_eq!(json["menuSourceType"], "mouse");
    }

    #[test]
    fn test_disposition_wire_names() {
        let json = serde_json::to_string(&Disposition::ForegroundTab).unwrap();
        assert_eq!(json, "\"foreground-tab\"");
    }
}
