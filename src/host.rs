//! Webview control plane
//!
//! `WebviewHost` is the single entry point: it mints webview identities,
//! keeps the directory of live webviews, validates arguments, and delegates
//! every operation to the engine surface registered for the target id. All
//! other mutable state lives in the engine.
//!
//! Calls against the same webview issued concurrently have no ordering
//! guarantee; the engine arbitrates. There is no cancellation for in-flight
//! calls. Calls are unbounded by default; see [`HostConfig::call_timeout`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::bus::{EmittedEvent, EventBus};
use crate::engine::{Engine, EngineSurface, EventSink};
use crate::error::{Error, Result};
use crate::events::{EventDetails, EventKind, LoginRequest, WebviewEvent};
use crate::geometry::{AutoResize, Rect};
use crate::id::{CssKey, ExtensionId, ListenerId, WebviewId, WindowId};
use crate::input::InputEvent;
use crate::properties::{ImageAnimationPolicy, WebviewProperties};
use crate::types::{
    AdjustSelection, CssOptions, DevToolsOptions, HostContext, LoadFileOptions, LoadUrlOptions,
    ScriptOptions, WebviewFilter, WebviewInfo,
};

/// Offscreen frame rates the engine accepts
const FRAME_RATE_RANGE: std::ops::RangeInclusive<u32> = 1..=240;

/// Host-level call policy
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Deadline applied to every delegated engine call. `None` (the default)
    /// leaves calls unbounded; a call that exceeds the deadline fails with
    /// `Error::Timeout`. The engine-side operation is not cancelled.
    pub call_timeout: Option<Duration>,
}

/// One directory entry: the public record plus the engine surface,
/// and the creation-time gates the host enforces itself.
struct Entry {
    info: WebviewInfo,
    surface: Arc<dyn EngineSurface>,
    devtools_enabled: bool,
    offscreen: bool,
}

/// The webview control plane
pub struct WebviewHost {
    engine: Arc<dyn Engine>,
    config: HostConfig,
    registry: RwLock<HashMap<WebviewId, Entry>>,
    bus: Arc<EventBus>,
    next_id: AtomicU64,
}

impl WebviewHost {
    /// Create a host over the given engine with default call policy
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self::with_config(engine, HostConfig::default())
    }

    /// Create a host with an explicit call policy
    pub fn with_config(engine: Arc<dyn Engine>, config: HostConfig) -> Self {
        Self {
            engine,
            config,
            registry: RwLock::new(HashMap::new()),
            bus: Arc::new(EventBus::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn mint_id(&self) -> WebviewId {
        WebviewId::new(format!("wv-{}", self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    /// Look up the surface for an id, or fail with `NotFound`
    async fn surface(&self, id: &WebviewId) -> Result<Arc<dyn EngineSurface>> {
        let registry = self.registry.read().await;
        registry
            .get(id)
            .map(|entry| Arc::clone(&entry.surface))
            .ok_or_else(|| Error::webview_not_found(id))
    }

    /// Like `surface`, but requires `devtools: true` at creation
    async fn devtools_surface(&self, id: &WebviewId) -> Result<Arc<dyn EngineSurface>> {
        let registry = self.registry.read().await;
        let entry = registry
            .get(id)
            .ok_or_else(|| Error::webview_not_found(id))?;
        if !entry.devtools_enabled {
            return Err(Error::invalid_state(
                "devtools were not enabled when this webview was created",
            ));
        }
        Ok(Arc::clone(&entry.surface))
    }

    /// Like `surface`, but requires an offscreen webview
    async fn offscreen_surface(&self, id: &WebviewId) -> Result<Arc<dyn EngineSurface>> {
        let registry = self.registry.read().await;
        let entry = registry
            .get(id)
            .ok_or_else(|| Error::webview_not_found(id))?;
        if !entry.offscreen {
            return Err(Error::invalid_state("webview does not render offscreen"));
        }
        Ok(Arc::clone(&entry.surface))
    }

    /// Apply the configured call deadline to a delegated call
    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                Error::Timeout(format!("{operation} did not resolve within {limit:?}"))
            })?,
            None => call.await,
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a listener on an event channel
    ///
    /// Listeners on one channel are invoked in registration order.
    pub fn add_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&WebviewEvent, &EventDetails) + Send + Sync + 'static,
    {
        self.bus.add_listener(kind, listener)
    }

    /// Unregister a listener. No-op when it is not registered.
    pub fn remove_listener(&self, kind: EventKind, id: ListenerId) {
        self.bus.remove_listener(kind, id);
    }

    /// Receive every emitted event over an async channel
    pub fn watch(&self) -> tokio::sync::mpsc::UnboundedReceiver<EmittedEvent> {
        self.bus.watch()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Get the record of a live webview
    pub async fn get(&self, id: &WebviewId) -> Result<WebviewInfo> {
        let registry = self.registry.read().await;
        registry
            .get(id)
            .map(|entry| entry.info.clone())
            .ok_or_else(|| Error::webview_not_found(id))
    }

    /// List live webviews matching the filter's set fields
    pub async fn query(&self, filter: &WebviewFilter) -> Result<Vec<WebviewInfo>> {
        let registry = self.registry.read().await;
        Ok(registry
            .values()
            .filter(|entry| filter.matches(&entry.info))
            .map(|entry| entry.info.clone())
            .collect())
    }

    /// Create a webview owned by `extension`
    ///
    /// The whole configuration is validated before the engine sees it.
    pub async fn create(
        &self,
        extension: &ExtensionId,
        properties: &WebviewProperties,
    ) -> Result<WebviewInfo> {
        properties.validate()?;

        let id = self.mint_id();
        let info = WebviewInfo {
            id: id.clone(),
            extension: extension.clone(),
            websession: properties.websession.clone(),
        };
        let envelope = WebviewEvent {
            id: id.clone(),
            extension: extension.clone(),
        };
        let sink = EventSink::new(Arc::clone(&self.bus), envelope.clone());

        let surface = self
            .bounded(
                "create",
                self.engine.create_webview(&info, properties, sink),
            )
            .await?;

        {
            let mut registry = self.registry.write().await;
            registry.insert(
                id.clone(),
                Entry {
                    info: info.clone(),
                    surface,
                    devtools_enabled: properties.devtools,
                    offscreen: properties.offscreen,
                },
            );
        }
        info!(webview = %id, extension = %extension, "webview created");
        self.bus
            .emit(EventKind::Created, envelope, EventDetails::Webview(info.clone()));
        Ok(info)
    }

    /// Destroy the given webviews
    ///
    /// All ids are checked up front: an unknown id fails the whole call with
    /// `NotFound` before anything is destroyed. Each entry leaves the
    /// directory only once its surface is torn down, so an engine failure
    /// partway leaves the failed webview and the rest of the batch registered
    /// and removable.
    pub async fn remove(&self, ids: &[WebviewId]) -> Result<()> {
        let mut registry = self.registry.write().await;
        for id in ids {
            if !registry.contains_key(id) {
                return Err(Error::webview_not_found(id));
            }
        }

        for id in ids {
            // Duplicate ids in the batch: later occurrences are no-ops.
            let Some(entry) = registry.get(id) else {
                continue;
            };
            let surface = Arc::clone(&entry.surface);
            self.bounded("remove", surface.destroy()).await?;

            if let Some(entry) = registry.remove(id) {
                info!(webview = %entry.info.id, "webview removed");
                let envelope = WebviewEvent {
                    id: entry.info.id.clone(),
                    extension: entry.info.extension.clone(),
                };
                self.bus.emit(
                    EventKind::Removed,
                    envelope,
                    EventDetails::Webview(entry.info),
                );
            }
        }
        Ok(())
    }

    /// The calling context's own webview
    pub async fn current(&self, ctx: &HostContext) -> Result<WebviewInfo> {
        let id = ctx
            .webview
            .as_ref()
            .ok_or_else(|| Error::invalid_state("calling context has no webview"))?;
        self.get(id).await
    }

    // =========================================================================
    // Window attachment
    // =========================================================================

    /// Attach the webview to a window (re-attaching moves it)
    pub async fn attach(&self, id: &WebviewId, window: &WindowId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("attach", surface.attach(window)).await
    }

    /// Detach from the current window; `false` when already detached
    pub async fn detach(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("detach", surface.detach()).await
    }

    /// Raise the webview above its window siblings
    pub async fn move_top(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("moveTop", surface.move_top()).await
    }

    /// The window the webview is attached to, if any
    pub async fn attached_window(&self, id: &WebviewId) -> Result<Option<WindowId>> {
        let surface = self.surface(id).await?;
        self.bounded("getAttachedWindow", surface.attached_window())
            .await
    }

    /// Set the bounds within the attached window
    pub async fn set_bounds(&self, id: &WebviewId, bounds: Rect) -> Result<()> {
        if bounds.is_empty() {
            return Err(Error::invalid_argument(
                "bounds must cover at least one pixel",
            ));
        }
        let surface = self.surface(id).await?;
        self.bounded("setBounds", surface.set_bounds(bounds)).await
    }

    /// Current bounds within the attached window
    pub async fn bounds(&self, id: &WebviewId) -> Result<Rect> {
        let surface = self.surface(id).await?;
        self.bounded("getBounds", surface.bounds()).await
    }

    /// Change the auto-resize policy; returns the effective bounds
    pub async fn set_auto_resize(&self, id: &WebviewId, options: AutoResize) -> Result<Rect> {
        let surface = self.surface(id).await?;
        self.bounded("setAutoResize", surface.set_auto_resize(options))
            .await
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Answer a pending authentication challenge
    pub async fn login(
        &self,
        id: &WebviewId,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("login", surface.login(username, password))
            .await
    }

    /// The pending authentication challenge, if any
    pub async fn pending_login(&self, id: &WebviewId) -> Result<Option<LoginRequest>> {
        let surface = self.surface(id).await?;
        self.bounded("getLogin", surface.pending_login()).await
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate to a URL
    pub async fn load_url(
        &self,
        id: &WebviewId,
        url: &str,
        options: &LoadUrlOptions,
    ) -> Result<()> {
        if url.is_empty() {
            return Err(Error::invalid_argument("url must not be empty"));
        }
        debug!(webview = %id, url, "loadURL");
        let surface = self.surface(id).await?;
        self.bounded("loadURL", surface.load_url(url, options)).await
    }

    /// Load a bundled file by path
    pub async fn load_file(
        &self,
        id: &WebviewId,
        path: &str,
        options: &LoadFileOptions,
    ) -> Result<()> {
        if path.is_empty() {
            return Err(Error::invalid_argument("path must not be empty"));
        }
        let surface = self.surface(id).await?;
        self.bounded("loadFile", surface.load_file(path, options))
            .await
    }

    /// Download a URL without navigating
    pub async fn download_url(&self, id: &WebviewId, url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(Error::invalid_argument("url must not be empty"));
        }
        let surface = self.surface(id).await?;
        self.bounded("downloadURL", surface.download_url(url)).await
    }

    /// Current URL of the main frame
    pub async fn url(&self, id: &WebviewId) -> Result<String> {
        let surface = self.surface(id).await?;
        self.bounded("getURL", surface.url()).await
    }

    /// Whether any frame is still loading
    pub async fn is_loading(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isLoading", surface.is_loading()).await
    }

    /// Whether the main frame is still loading
    pub async fn is_loading_main_frame(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isLoadingMainFrame", surface.is_loading_main_frame())
            .await
    }

    /// Whether the webview is waiting for the first response byte
    pub async fn is_waiting_for_response(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isWaitingForResponse", surface.is_waiting_for_response())
            .await
    }

    /// Close the page, as if `window.close()` ran
    pub async fn close(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("close", surface.close()).await
    }

    /// Stop any pending navigation
    pub async fn stop(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("stop", surface.stop()).await
    }

    /// Reload the current page
    pub async fn reload(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("reload", surface.reload()).await
    }

    /// Reload, bypassing caches
    pub async fn reload_ignoring_cache(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("reloadIgnoringCache", surface.reload_ignoring_cache())
            .await
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Whether the webview holds input focus
    pub async fn is_focused(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isFocused", surface.is_focused()).await
    }

    /// Give the webview input focus
    pub async fn focus(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("focus", surface.focus()).await
    }

    // =========================================================================
    // Offscreen rendering
    // =========================================================================

    /// Whether the webview renders to an offscreen buffer
    pub async fn is_offscreen(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isOffscreen", surface.is_offscreen()).await
    }

    /// Start producing offscreen frames
    pub async fn start_painting(&self, id: &WebviewId) -> Result<()> {
        let surface = self.offscreen_surface(id).await?;
        self.bounded("startPainting", surface.start_painting()).await
    }

    /// Stop producing offscreen frames
    pub async fn stop_painting(&self, id: &WebviewId) -> Result<()> {
        let surface = self.offscreen_surface(id).await?;
        self.bounded("stopPainting", surface.stop_painting()).await
    }

    /// Whether offscreen frames are being produced
    pub async fn is_painting(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.offscreen_surface(id).await?;
        self.bounded("isPainting", surface.is_painting()).await
    }

    /// Set the offscreen frame rate (1 to 240 fps)
    pub async fn set_frame_rate(&self, id: &WebviewId, fps: u32) -> Result<()> {
        if !FRAME_RATE_RANGE.contains(&fps) {
            return Err(Error::invalid_argument(format!(
                "frame rate must be within {FRAME_RATE_RANGE:?}, got {fps}"
            )));
        }
        let surface = self.offscreen_surface(id).await?;
        self.bounded("setFrameRate", surface.set_frame_rate(fps))
            .await
    }

    /// Current offscreen frame rate
    pub async fn frame_rate(&self, id: &WebviewId) -> Result<u32> {
        let surface = self.offscreen_surface(id).await?;
        self.bounded("getFrameRate", surface.frame_rate()).await
    }

    /// Repaint the whole offscreen surface
    pub async fn invalidate(&self, id: &WebviewId) -> Result<()> {
        let surface = self.offscreen_surface(id).await?;
        self.bounded("invalidate", surface.invalidate()).await
    }

    // =========================================================================
    // Performance
    // =========================================================================

    /// Throttle timers and rendering while backgrounded
    pub async fn set_background_throttling(&self, id: &WebviewId, value: bool) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded(
            "setBackgroundThrottling",
            surface.set_background_throttling(value),
        )
        .await
    }

    /// Current background throttling policy
    pub async fn background_throttling(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("getBackgroundThrottling", surface.background_throttling())
            .await
    }

    /// Change how animated images play
    pub async fn set_image_animation_policy(
        &self,
        id: &WebviewId,
        policy: ImageAnimationPolicy,
    ) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded(
            "setImageAnimationPolicy",
            surface.set_image_animation_policy(policy),
        )
        .await
    }

    // =========================================================================
    // Audio
    // =========================================================================

    /// Mute or unmute page audio
    pub async fn set_audio_muted(&self, id: &WebviewId, muted: bool) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("setAudioMuted", surface.set_audio_muted(muted))
            .await
    }

    /// Whether page audio is muted
    pub async fn is_audio_muted(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isAudioMuted", surface.is_audio_muted()).await
    }

    /// Whether the page is actually emitting sound right now
    pub async fn is_currently_audible(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isCurrentlyAudible", surface.is_currently_audible())
            .await
    }

    // =========================================================================
    // Selection and editing
    // =========================================================================

    /// Select the whole document
    pub async fn select_all(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("selectAll", surface.select_all()).await
    }

    /// Clear the current selection
    pub async fn unselect(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("unselect", surface.unselect()).await
    }

    /// Move the selection endpoints by the given amounts
    pub async fn adjust_selection(&self, id: &WebviewId, options: AdjustSelection) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("adjustSelection", surface.adjust_selection(options))
            .await
    }

    // =========================================================================
    // User agent
    // =========================================================================

    /// Override the user agent for this webview
    pub async fn set_user_agent(&self, id: &WebviewId, user_agent: &str) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("setUserAgent", surface.set_user_agent(user_agent))
            .await
    }

    /// The user agent in effect for this webview
    pub async fn user_agent(&self, id: &WebviewId) -> Result<String> {
        let surface = self.surface(id).await?;
        self.bounded("getUserAgent", surface.user_agent()).await
    }

    // =========================================================================
    // Injection
    // =========================================================================

    /// Insert a stylesheet; the returned key removes it again
    pub async fn insert_css(
        &self,
        id: &WebviewId,
        css: &str,
        options: &CssOptions,
    ) -> Result<CssKey> {
        let surface = self.surface(id).await?;
        self.bounded("insertCSS", surface.insert_css(css, options))
            .await
    }

    /// Remove a previously inserted stylesheet (no-op for unknown keys)
    pub async fn remove_css(&self, id: &WebviewId, key: &CssKey) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("removeCSS", surface.remove_css(key)).await
    }

    /// Run JavaScript in the page
    pub async fn execute_javascript(
        &self,
        id: &WebviewId,
        code: &str,
        options: &ScriptOptions,
    ) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("executeJavaScript", surface.execute_javascript(code, options))
            .await
    }

    // =========================================================================
    // Renderer process
    // =========================================================================

    /// OS process id of the renderer
    pub async fn process_id(&self, id: &WebviewId) -> Result<u32> {
        let surface = self.surface(id).await?;
        self.bounded("getProcessId", surface.process_id()).await
    }

    /// Whether the renderer process has crashed
    pub async fn is_crashed(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("isCrashed", surface.is_crashed()).await
    }

    /// Deliberately crash the renderer (testing hook)
    pub async fn crash(&self, id: &WebviewId) -> Result<()> {
        debug!(webview = %id, "crash requested");
        let surface = self.surface(id).await?;
        self.bounded("crash", surface.crash()).await
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Undo the last edit
    pub async fn undo(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("undo", surface.undo()).await
    }

    /// Redo the last undone edit
    pub async fn redo(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("redo", surface.redo()).await
    }

    /// Copy the selection to the clipboard
    pub async fn copy(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("copy", surface.copy()).await
    }

    /// Copy the image at the given page coordinates
    pub async fn copy_image_at(&self, id: &WebviewId, x: i32, y: i32) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("copyImageAt", surface.copy_image_at(x, y)).await
    }

    /// Paste from the clipboard
    pub async fn paste(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("paste", surface.paste()).await
    }

    /// Paste from the clipboard, matching the surrounding style
    pub async fn paste_and_match_style(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("pasteAndMatchStyle", surface.paste_and_match_style())
            .await
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Delete the selection
    pub async fn delete_selection(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("delete", surface.delete_selection()).await
    }

    /// Replace the selection with `text`
    pub async fn replace(&self, id: &WebviewId, text: &str) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("replace", surface.replace(text)).await
    }

    /// Replace the misspelled word under the cursor with `text`
    pub async fn replace_misspelling(&self, id: &WebviewId, text: &str) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("replaceMisspelling", surface.replace_misspelling(text))
            .await
    }

    /// Insert `text` at the cursor
    pub async fn insert_text(&self, id: &WebviewId, text: &str) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("insertText", surface.insert_text(text)).await
    }

    /// Dispatch a synthetic input event to the page
    pub async fn send_input(&self, id: &WebviewId, event: &InputEvent) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("sendInput", surface.send_input(event)).await
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Navigate to an absolute history index
    pub async fn go_to_index(&self, id: &WebviewId, index: usize) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("goToIndex", surface.go_to_index(index)).await
    }

    /// Navigate relative to the current history entry
    pub async fn go_to_offset(&self, id: &WebviewId, offset: i32) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("goToOffset", surface.go_to_offset(offset)).await
    }

    /// Whether `go_to_offset` would stay inside the history
    pub async fn can_go_to_offset(&self, id: &WebviewId, offset: i32) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("canGoToOffset", surface.can_go_to_offset(offset))
            .await
    }

    /// Whether a previous history entry exists
    pub async fn can_go_back(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("canGoBack", surface.can_go_back()).await
    }

    /// Whether a next history entry exists
    pub async fn can_go_forward(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.surface(id).await?;
        self.bounded("canGoForward", surface.can_go_forward()).await
    }

    /// Drop all history entries except the current one
    pub async fn clear_history(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("clearHistory", surface.clear_history()).await
    }

    /// Navigate one entry back
    pub async fn go_back(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("goBack", surface.go_back()).await
    }

    /// Navigate one entry forward
    pub async fn go_forward(&self, id: &WebviewId) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded("goForward", surface.go_forward()).await
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Set the zoom factor (1.0 = 100%); clamped to the visual limits
    pub async fn set_zoom_factor(&self, id: &WebviewId, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "zoom factor must be finite and positive, got {factor}"
            )));
        }
        let surface = self.surface(id).await?;
        self.bounded("setZoomFactor", surface.set_zoom_factor(factor))
            .await
    }

    /// Current zoom factor
    pub async fn zoom_factor(&self, id: &WebviewId) -> Result<f64> {
        let surface = self.surface(id).await?;
        self.bounded("getZoomFactor", surface.zoom_factor()).await
    }

    /// Set the zoom level (0 = 100%, each step scales by 1.2)
    pub async fn set_zoom_level(&self, id: &WebviewId, level: f64) -> Result<()> {
        if !level.is_finite() {
            return Err(Error::invalid_argument("zoom level must be finite"));
        }
        let surface = self.surface(id).await?;
        self.bounded("setZoomLevel", surface.set_zoom_level(level))
            .await
    }

    /// Current zoom level
    pub async fn zoom_level(&self, id: &WebviewId) -> Result<f64> {
        let surface = self.surface(id).await?;
        self.bounded("getZoomLevel", surface.zoom_level()).await
    }

    /// Constrain pinch-to-zoom (and subsequent factor sets) to a range
    pub async fn set_visual_zoom_level_limits(
        &self,
        id: &WebviewId,
        minimum: f64,
        maximum: f64,
    ) -> Result<()> {
        if !minimum.is_finite() || !maximum.is_finite() || minimum <= 0.0 || minimum > maximum {
            return Err(Error::invalid_argument(format!(
                "zoom limits must satisfy 0 < minimum <= maximum, got [{minimum}, {maximum}]"
            )));
        }
        let surface = self.surface(id).await?;
        self.bounded(
            "setVisualZoomLevelLimits",
            surface.set_visual_zoom_level_limits(minimum, maximum),
        )
        .await
    }

    // =========================================================================
    // DevTools
    // =========================================================================

    /// Open DevTools (requires `devtools: true` at creation)
    pub async fn open_devtools(&self, id: &WebviewId, options: &DevToolsOptions) -> Result<()> {
        let surface = self.devtools_surface(id).await?;
        self.bounded("openDevTools", surface.open_devtools(options))
            .await
    }

    /// Close DevTools
    pub async fn close_devtools(&self, id: &WebviewId) -> Result<()> {
        let surface = self.devtools_surface(id).await?;
        self.bounded("closeDevTools", surface.close_devtools()).await
    }

    /// Whether DevTools are open
    pub async fn is_devtools_opened(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.devtools_surface(id).await?;
        self.bounded("isDevToolsOpened", surface.is_devtools_opened())
            .await
    }

    /// Whether DevTools hold input focus
    pub async fn is_devtools_focused(&self, id: &WebviewId) -> Result<bool> {
        let surface = self.devtools_surface(id).await?;
        self.bounded("isDevToolsFocused", surface.is_devtools_focused())
            .await
    }

    /// Open DevTools if closed, close them if open
    pub async fn toggle_devtools(&self, id: &WebviewId) -> Result<()> {
        let surface = self.devtools_surface(id).await?;
        if self
            .bounded("toggleDevTools", surface.is_devtools_opened())
            .await?
        {
            self.bounded("toggleDevTools", surface.close_devtools())
                .await
        } else {
            self.bounded(
                "toggleDevTools",
                surface.open_devtools(&DevToolsOptions::default()),
            )
            .await
        }
    }

    /// Open DevTools and inspect the element at the given coordinates
    pub async fn inspect_element(&self, id: &WebviewId, x: i32, y: i32) -> Result<()> {
        let surface = self.devtools_surface(id).await?;
        self.bounded("inspectElement", surface.inspect_element(x, y))
            .await
    }

    // =========================================================================
    // Misc
    // =========================================================================

    /// Current page title
    pub async fn title(&self, id: &WebviewId) -> Result<String> {
        let surface = self.surface(id).await?;
        self.bounded("getTitle", surface.title()).await
    }

    /// Keep menu accelerators from firing while the webview is focused
    pub async fn set_ignore_menu_shortcuts(&self, id: &WebviewId, ignore: bool) -> Result<()> {
        let surface = self.surface(id).await?;
        self.bounded(
            "setIgnoreMenuShortcuts",
            surface.set_ignore_menu_shortcuts(ignore),
        )
        .await
    }

    /// Set the background color (`#rgb`, `#rrggbb` or `#rrggbbaa`)
    pub async fn set_background_color(&self, id: &WebviewId, color: &str) -> Result<()> {
        if !is_hex_color(color) {
            return Err(Error::invalid_argument(format!(
                "background color must be #rgb, #rrggbb or #rrggbbaa, got {color:?}"
            )));
        }
        let surface = self.surface(id).await?;
        self.bounded("setBackgroundColor", surface.set_background_color(color))
            .await
    }
}

/// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`
fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
