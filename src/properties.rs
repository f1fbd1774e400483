//! Webview creation configuration
//!
//! The creation surface groups options by concern (content, security, fonts,
//! dialogs) instead of one flat bag, and validates the whole configuration
//! before anything reaches the engine. Unknown or conflicting combinations
//! fail at `create` time with `InvalidArgument`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{AutoResize, Rect};
use crate::id::{WebsessionId, WindowId};

/// How animated images (GIF, APNG) are played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageAnimationPolicy {
    /// Play animations normally
    #[default]
    Animate,
    /// Play each animation once, then freeze
    AnimateOnce,
    /// Show only the first frame
    NoAnimation,
}

/// When media elements are allowed to start playback on their own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    /// Autoplay is always allowed
    NoUserGestureRequired,
    /// Autoplay requires a prior user gesture
    #[default]
    UserGestureRequired,
    /// Autoplay requires document-level user activation
    DocumentUserActivationRequired,
}

/// Renderer feature toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSettings {
    pub javascript: bool,
    pub images: bool,
    pub image_animation_policy: ImageAnimationPolicy,
    pub webgl: bool,
    pub plugins: bool,
    pub experimental_features: bool,
    pub scroll_bounce: bool,
    pub text_areas_are_resizable: bool,
    pub webview_tag: bool,
    pub spellcheck: bool,
    pub enable_web_sql: bool,
    pub enable_preferred_size_mode: bool,
    pub navigate_on_drag_drop: bool,
    pub disable_html_fullscreen_window_resize: bool,
    pub background_throttling: bool,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            javascript: true,
            images: true,
            image_animation_policy: ImageAnimationPolicy::Animate,
            webgl: true,
            plugins: false,
            experimental_features: false,
            scroll_bounce: false,
            text_areas_are_resizable: true,
            webview_tag: false,
            spellcheck: true,
            enable_web_sql: false,
            enable_preferred_size_mode: false,
            navigate_on_drag_drop: false,
            disable_html_fullscreen_window_resize: false,
            background_throttling: true,
        }
    }
}

/// Web platform security toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub web_security: bool,
    pub allow_running_insecure_content: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            web_security: true,
            allow_running_insecure_content: false,
        }
    }
}

/// Default font families and sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSettings {
    pub standard_family: Option<String>,
    pub serif_family: Option<String>,
    pub sans_serif_family: Option<String>,
    pub monospace_family: Option<String>,
    pub cursive_family: Option<String>,
    pub fantasy_family: Option<String>,
    pub default_size: u32,
    pub default_monospace_size: u32,
    pub minimum_size: u32,
    pub default_encoding: Option<String>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            standard_family: None,
            serif_family: None,
            sans_serif_family: None,
            monospace_family: None,
            cursive_family: None,
            fantasy_family: None,
            default_size: 16,
            default_monospace_size: 13,
            minimum_size: 1,
            default_encoding: None,
        }
    }
}

/// JavaScript dialog policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogSettings {
    /// Suppress repeated dialogs after the first few (`alert` spam guards)
    pub safe_dialogs: bool,
    /// Message shown by the safe-dialogs suppression checkbox
    pub safe_dialogs_message: Option<String>,
    /// Disable JavaScript dialogs entirely
    pub disable_dialogs: bool,
}

/// Full configuration for creating a webview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebviewProperties {
    /// Window to attach to at creation (optional; a webview may be detached)
    pub window: Option<WindowId>,
    /// Initial bounds within the window
    pub bounds: Option<Rect>,
    /// Auto-resize behavior while attached
    pub auto_resize: Option<AutoResize>,
    /// Storage partition; `None` uses the host's default session
    pub websession: Option<WebsessionId>,
    /// Whether DevTools may be opened on this webview
    pub devtools: bool,
    /// Initial zoom factor; `None` means engine default (1.0)
    pub zoom_factor: Option<f64>,
    /// Render to an offscreen buffer instead of the window
    pub offscreen: bool,
    /// Title exposed to assistive technology
    pub accessible_title: Option<String>,
    pub content: ContentSettings,
    pub security: SecuritySettings,
    pub fonts: FontSettings,
    pub dialogs: DialogSettings,
    pub autoplay_policy: AutoplayPolicy,
}

impl WebviewProperties {
    /// Properties attached to a window with the given bounds
    pub fn attached(window: WindowId, bounds: Rect) -> Self {
        Self {
            window: Some(window),
            bounds: Some(bounds),
            ..Default::default()
        }
    }

    /// Properties for an offscreen webview
    pub fn offscreen() -> Self {
        Self {
            offscreen: true,
            ..Default::default()
        }
    }

    /// Check the whole configuration for malformed or conflicting options
    pub fn validate(&self) -> Result<()> {
        if let Some(factor) = self.zoom_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(Error::invalid_argument(format!(
                    "zoomFactor must be finite and positive, got {factor}"
                )));
            }
        }
        if let Some(bounds) = &self.bounds {
            if bounds.is_empty() {
                return Err(Error::invalid_argument(
                    "bounds must cover at least one pixel",
                ));
            }
        }
        if self.fonts.default_size == 0 || self.fonts.default_monospace_size == 0 {
            return Err(Error::invalid_argument("font sizes must be positive"));
        }
        if self.fonts.minimum_size > self.fonts.default_size {
            return Err(Error::invalid_argument(
                "minimum font size exceeds the default font size",
            ));
        }
        if self.dialogs.disable_dialogs && self.dialogs.safe_dialogs {
            return Err(Error::invalid_argument(
                "safeDialogs has no effect when dialogs are disabled",
            ));
        }
        if self.dialogs.safe_dialogs_message.is_some() && !self.dialogs.safe_dialogs {
            return Err(Error::invalid_argument(
                "safeDialogsMessage requires safeDialogs",
            ));
        }
        Ok(())
    }
}
