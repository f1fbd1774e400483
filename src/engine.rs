//! Engine seam
//!
//! The control plane never renders anything itself: every operation is
//! delegated to an external rendering engine behind these traits. `Engine`
//! creates per-webview surfaces; `EngineSurface` is the per-webview contract,
//! one method per delegated operation. All mutable webview state lives behind
//! the surface.

use std::sync::Arc;

use async_trait::async_trait;

use crate::bus::EventBus;
use crate::error::Result;
use crate::events::{EventDetails, EventKind, LoginRequest, WebviewEvent};
use crate::geometry::{AutoResize, Rect};
use crate::id::{CssKey, WindowId};
use crate::input::InputEvent;
use crate::properties::{ImageAnimationPolicy, WebviewProperties};
use crate::types::{
    AdjustSelection, CssOptions, DevToolsOptions, LoadFileOptions, LoadUrlOptions, ScriptOptions,
    WebviewInfo,
};

/// Handle the engine uses to emit events for one webview
///
/// The sink pins the envelope at creation time, so the engine cannot emit
/// under another webview's identity.
#[derive(Clone)]
pub struct EventSink {
    bus: Arc<EventBus>,
    envelope: WebviewEvent,
}

impl EventSink {
    pub(crate) fn new(bus: Arc<EventBus>, envelope: WebviewEvent) -> Self {
        Self { bus, envelope }
    }

    /// The envelope this sink emits under
    pub fn envelope(&self) -> &WebviewEvent {
        &self.envelope
    }

    /// Emit an event on the given channel
    pub fn emit(&self, kind: EventKind, details: EventDetails) {
        self.bus.emit(kind, self.envelope.clone(), details);
    }
}

/// Factory for per-webview engine surfaces
#[async_trait]
pub trait Engine: Send + Sync {
    /// Create the engine-side surface for a new webview
    ///
    /// `info` carries the identity the host minted; `sink` is where the
    /// engine reports every state change for this webview. The engine owns
    /// defaults for any property the host leaves unset.
    async fn create_webview(
        &self,
        info: &WebviewInfo,
        properties: &WebviewProperties,
        sink: EventSink,
    ) -> Result<Arc<dyn EngineSurface>>;
}

/// Per-webview operations delegated to the engine
///
/// No ordering is guaranteed between concurrent calls on the same surface;
/// the engine arbitrates (last write wins for conflicting mutations).
#[async_trait]
pub trait EngineSurface: Send + Sync {
    // Window attachment
    async fn attach(&self, window: &WindowId) -> Result<()>;
    /// Returns `false` when the webview was not attached (status, not error)
    async fn detach(&self) -> Result<bool>;
    async fn move_top(&self) -> Result<()>;
    async fn attached_window(&self) -> Result<Option<WindowId>>;
    async fn set_bounds(&self, bounds: Rect) -> Result<()>;
    async fn bounds(&self) -> Result<Rect>;
    /// Returns the effective bounds after applying the new policy
    async fn set_auto_resize(&self, options: AutoResize) -> Result<Rect>;

    // Authentication
    async fn login(&self, username: Option<&str>, password: Option<&str>) -> Result<()>;
    async fn pending_login(&self) -> Result<Option<LoginRequest>>;

    // Navigation
    async fn load_url(&self, url: &str, options: &LoadUrlOptions) -> Result<()>;
    async fn load_file(&self, path: &str, options: &LoadFileOptions) -> Result<()>;
    async fn download_url(&self, url: &str) -> Result<()>;
    async fn url(&self) -> Result<String>;
    async fn is_loading(&self) -> Result<bool>;
    async fn is_loading_main_frame(&self) -> Result<bool>;
    async fn is_waiting_for_response(&self) -> Result<bool>;
    async fn close(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
    async fn reload(&self) -> Result<()>;
    async fn reload_ignoring_cache(&self) -> Result<()>;

    // Focus
    async fn is_focused(&self) -> Result<bool>;
    async fn focus(&self) -> Result<()>;

    // Offscreen rendering
    async fn is_offscreen(&self) -> Result<bool>;
    async fn start_painting(&self) -> Result<()>;
    async fn stop_painting(&self) -> Result<()>;
    async fn is_painting(&self) -> Result<bool>;
    async fn set_frame_rate(&self, fps: u32) -> Result<()>;
    async fn frame_rate(&self) -> Result<u32>;
    async fn invalidate(&self) -> Result<()>;

    // Performance
    async fn set_background_throttling(&self, value: bool) -> Result<()>;
    async fn background_throttling(&self) -> Result<bool>;
    async fn set_image_animation_policy(&self, policy: ImageAnimationPolicy) -> Result<()>;

    // Audio
    async fn set_audio_muted(&self, muted: bool) -> Result<()>;
    async fn is_audio_muted(&self) -> Result<bool>;
    async fn is_currently_audible(&self) -> Result<bool>;

    // Selection
    async fn select_all(&self) -> Result<()>;
    async fn unselect(&self) -> Result<()>;
    async fn adjust_selection(&self, options: AdjustSelection) -> Result<()>;

    // User agent
    async fn set_user_agent(&self, user_agent: &str) -> Result<()>;
    async fn user_agent(&self) -> Result<String>;

    // Injection
    async fn insert_css(&self, css: &str, options: &CssOptions) -> Result<CssKey>;
    /// Removing a key that is not present is a no-op
    async fn remove_css(&self, key: &CssKey) -> Result<()>;
    async fn execute_javascript(&self, code: &str, options: &ScriptOptions) -> Result<()>;

    // Renderer process
    async fn process_id(&self) -> Result<u32>;
    async fn is_crashed(&self) -> Result<bool>;
    async fn crash(&self) -> Result<()>;

    // Clipboard and editing
    async fn undo(&self) -> Result<()>;
    async fn redo(&self) -> Result<()>;
    async fn copy(&self) -> Result<()>;
    async fn copy_image_at(&self, x: i32, y: i32) -> Result<()>;
    async fn paste(&self) -> Result<()>;
    async fn paste_and_match_style(&self) -> Result<()>;
    async fn delete_selection(&self) -> Result<()>;
    async fn replace(&self, text: &str) -> Result<()>;
    async fn replace_misspelling(&self, text: &str) -> Result<()>;
    async fn insert_text(&self, text: &str) -> Result<()>;
    async fn send_input(&self, event: &InputEvent) -> Result<()>;

    // History
    async fn go_to_index(&self, index: usize) -> Result<()>;
    async fn go_to_offset(&self, offset: i32) -> Result<()>;
    /// Returns `false` when the offset falls outside the history (status)
    async fn can_go_to_offset(&self, offset: i32) -> Result<bool>;
    async fn can_go_back(&self) -> Result<bool>;
    async fn can_go_forward(&self) -> Result<bool>;
    async fn clear_history(&self) -> Result<()>;
    async fn go_back(&self) -> Result<()>;
    async fn go_forward(&self) -> Result<()>;

    // Zoom
    /// Out-of-range values are clamped to the visual zoom limits
    async fn set_zoom_factor(&self, factor: f64) -> Result<()>;
    async fn zoom_factor(&self) -> Result<f64>;
    async fn set_zoom_level(&self, level: f64) -> Result<()>;
    async fn zoom_level(&self) -> Result<f64>;
    async fn set_visual_zoom_level_limits(&self, minimum: f64, maximum: f64) -> Result<()>;

    // DevTools
    async fn open_devtools(&self, options: &DevToolsOptions) -> Result<()>;
    async fn close_devtools(&self) -> Result<()>;
    async fn is_devtools_opened(&self) -> Result<bool>;
    async fn is_devtools_focused(&self) -> Result<bool>;
    async fn inspect_element(&self, x: i32, y: i32) -> Result<()>;

    // Misc
    async fn title(&self) -> Result<String>;
    async fn set_ignore_menu_shortcuts(&self, ignore: bool) -> Result<()>;
    async fn set_background_color(&self, color: &str) -> Result<()>;

    /// Tear down the engine-side surface; called by the host on removal
    async fn destroy(&self) -> Result<()>;
}
