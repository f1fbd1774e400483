//! In-memory engine
//!
//! `StubEngine` implements the engine seam without any rendering: every
//! surface keeps its state in memory and completes page loads synchronously,
//! emitting the same lifecycle events a real engine would. It backs the
//! acceptance tests and lets embedders develop against the host without a
//! browser engine present.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tracing::debug;

use crate::engine::{Engine, EngineSurface, EventSink};
use crate::error::{Error, Result};
use crate::events::{
    AudioDetails, EventDetails, EventKind, LoginRequest, NavigationDoneDetails,
    NavigationStartedDetails, ShutdownDetails, ShutdownReason, TitleDetails,
};
use crate::geometry::{AutoResize, Rect};
use crate::id::{CssKey, WebviewId, WindowId};
use crate::input::{InputDetails, InputEvent};
use crate::properties::{ImageAnimationPolicy, WebviewProperties};
use crate::types::{
    AdjustSelection, CssOptions, DevToolsOptions, LoadFileOptions, LoadUrlOptions, ScriptOptions,
    WebviewInfo,
};

/// Zoom level n corresponds to a factor of 1.2^n
const ZOOM_STEP: f64 = 1.2;

/// Live surfaces by webview id; entries leave the map on destroy
type SurfaceMap = Mutex<HashMap<WebviewId, Arc<StubWebview>>>;

/// Engine-less engine: all state in memory, loads complete synchronously
pub struct StubEngine {
    surfaces: Arc<SurfaceMap>,
    next_process_id: AtomicU32,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            surfaces: Arc::new(Mutex::new(HashMap::new())),
            next_process_id: AtomicU32::new(1000),
        }
    }

    /// Direct access to a live surface, for test orchestration.
    /// Returns `None` once the webview has been destroyed.
    pub fn surface(&self, id: &WebviewId) -> Option<Arc<StubWebview>> {
        self.surfaces.lock().unwrap().get(id).cloned()
    }

    /// Raise an authentication challenge on a webview, as a page would.
    /// No-op for destroyed webviews: dead ids never emit.
    pub fn raise_login(&self, id: &WebviewId, request: LoginRequest) {
        if let Some(surface) = self.surface(id) {
            surface.state.lock().unwrap().pending_login = Some(request.clone());
            surface
                .sink
                .emit(EventKind::Login, EventDetails::Login(request));
        }
    }

    /// Make the next destroy of this webview fail, for failure-path tests
    pub fn fail_destroy(&self, id: &WebviewId, message: &str) {
        if let Some(surface) = self.surface(id) {
            surface.state.lock().unwrap().destroy_error = Some(message.to_string());
        }
    }

    /// Mark a webview as currently emitting sound
    pub fn mark_audible(&self, id: &WebviewId, audible: bool) {
        if let Some(surface) = self.surface(id) {
            surface.state.lock().unwrap().audible = audible;
            let kind = if audible {
                EventKind::MediaStarted
            } else {
                EventKind::MediaPaused
            };
            surface
                .sink
                .emit(kind, EventDetails::Audio(AudioDetails { audible }));
        }
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for StubEngine {
    async fn create_webview(
        &self,
        info: &WebviewInfo,
        properties: &WebviewProperties,
        sink: EventSink,
    ) -> Result<Arc<dyn EngineSurface>> {
        let process_id = self.next_process_id.fetch_add(1, Ordering::Relaxed);
        let surface = Arc::new(StubWebview {
            id: info.id.clone(),
            offscreen: properties.offscreen,
            process_id,
            sink,
            state: Mutex::new(State::from_properties(properties)),
            surfaces: Arc::downgrade(&self.surfaces),
        });
        self.surfaces
            .lock()
            .unwrap()
            .insert(info.id.clone(), Arc::clone(&surface));
        debug!(webview = %info.id, process_id, "stub surface created");
        Ok(surface)
    }
}

/// Mutable per-webview state
struct State {
    window: Option<WindowId>,
    bounds: Rect,
    auto_resize: AutoResize,
    url: String,
    title: String,
    user_agent: String,
    history: Vec<String>,
    history_index: usize,
    zoom_factor: f64,
    zoom_limits: Option<(f64, f64)>,
    painting: bool,
    frame_rate: u32,
    background_throttling: bool,
    image_animation_policy: ImageAnimationPolicy,
    muted: bool,
    audible: bool,
    focused: bool,
    devtools_open: bool,
    devtools_focused: bool,
    ignore_menu_shortcuts: bool,
    background_color: String,
    css: HashMap<CssKey, String>,
    next_css_key: u64,
    pending_login: Option<LoginRequest>,
    crashed: bool,
    closed: bool,
    destroy_error: Option<String>,
}

impl State {
    fn from_properties(properties: &WebviewProperties) -> Self {
        const BLANK: &str = "about:blank";
        Self {
            window: properties.window.clone(),
            bounds: properties.bounds.unwrap_or_default(),
            auto_resize: properties.auto_resize.unwrap_or_default(),
            url: BLANK.to_string(),
            title: String::new(),
            user_agent: String::new(),
            history: vec![BLANK.to_string()],
            history_index: 0,
            zoom_factor: properties.zoom_factor.unwrap_or(1.0),
            zoom_limits: None,
            // Offscreen webviews start painting immediately
            painting: properties.offscreen,
            frame_rate: 60,
            background_throttling: properties.content.background_throttling,
            image_animation_policy: properties.content.image_animation_policy,
            muted: false,
            audible: false,
            focused: false,
            devtools_open: false,
            devtools_focused: false,
            ignore_menu_shortcuts: false,
            background_color: "#ffffff".to_string(),
            css: HashMap::new(),
            next_css_key: 1,
            pending_login: None,
            crashed: false,
            closed: false,
            destroy_error: None,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::invalid_state("webview is closed"));
        }
        Ok(())
    }

    fn clamp_zoom(&self, factor: f64) -> f64 {
        match self.zoom_limits {
            Some((min, max)) => factor.clamp(min, max),
            None => factor,
        }
    }
}

/// One in-memory webview surface
pub struct StubWebview {
    id: WebviewId,
    offscreen: bool,
    process_id: u32,
    sink: EventSink,
    state: Mutex<State>,
    /// Backref into the engine's surface map, for self-removal on destroy
    surfaces: Weak<SurfaceMap>,
}

impl StubWebview {
    /// Complete a navigation synchronously, emitting the load lifecycle
    fn navigate(&self, url: String, push_history: bool) {
        {
            let mut state = self.state.lock().unwrap();
            if push_history {
                let cut = state.history_index + 1;
                state.history.truncate(cut);
                state.history.push(url.clone());
                state.history_index = state.history.len() - 1;
            }
            state.url = url.clone();
            state.title = url.clone();
            state.crashed = false;
        }

        self.sink.emit(EventKind::LoadStarted, EventDetails::None);
        self.sink.emit(
            EventKind::NavigationStarted,
            EventDetails::NavigationStarted(NavigationStartedDetails {
                url: url.clone(),
                is_same_document: false,
                is_main_frame: true,
                frame_id: 1,
            }),
        );
        self.sink.emit(
            EventKind::NavigationDone,
            EventDetails::NavigationDone(NavigationDoneDetails {
                url: url.clone(),
                http_response_code: Some(200),
                http_status_text: Some("OK".to_string()),
            }),
        );
        self.sink.emit(
            EventKind::PageTitleUpdated,
            EventDetails::Title(TitleDetails {
                title: url,
                explicit_set: false,
            }),
        );
        self.sink.emit(EventKind::DomReady, EventDetails::None);
        self.sink.emit(EventKind::LoadFinished, EventDetails::None);
    }

    /// Resolved history position after applying `offset`, if in range
    fn offset_target(state: &State, offset: i32) -> Option<usize> {
        let target = state.history_index as i64 + offset as i64;
        (target >= 0 && (target as usize) < state.history.len()).then_some(target as usize)
    }
}

#[async_trait]
impl EngineSurface for StubWebview {
    // Window attachment

    async fn attach(&self, window: &WindowId) -> Result<()> {
        self.state.lock().unwrap().window = Some(window.clone());
        Ok(())
    }

    async fn detach(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().window.take().is_some())
    }

    async fn move_top(&self) -> Result<()> {
        let state = self.state.lock().unwrap();
        if state.window.is_none() {
            return Err(Error::invalid_state("webview is not attached to a window"));
        }
        Ok(())
    }

    async fn attached_window(&self) -> Result<Option<WindowId>> {
        Ok(self.state.lock().unwrap().window.clone())
    }

    async fn set_bounds(&self, bounds: Rect) -> Result<()> {
        self.state.lock().unwrap().bounds = bounds;
        Ok(())
    }

    async fn bounds(&self) -> Result<Rect> {
        Ok(self.state.lock().unwrap().bounds)
    }

    async fn set_auto_resize(&self, options: AutoResize) -> Result<Rect> {
        let mut state = self.state.lock().unwrap();
        state.auto_resize = options;
        Ok(state.bounds)
    }

    // Authentication

    async fn login(&self, _username: Option<&str>, _password: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.pending_login.take().is_none() {
            return Err(Error::invalid_state("no pending authentication challenge"));
        }
        Ok(())
    }

    async fn pending_login(&self) -> Result<Option<LoginRequest>> {
        Ok(self.state.lock().unwrap().pending_login.clone())
    }

    // Navigation

    async fn load_url(&self, url: &str, _options: &LoadUrlOptions) -> Result<()> {
        self.state.lock().unwrap().ensure_open()?;
        self.navigate(url.to_string(), true);
        Ok(())
    }

    async fn load_file(&self, path: &str, options: &LoadFileOptions) -> Result<()> {
        self.state.lock().unwrap().ensure_open()?;
        let mut url = format!("file://{path}");
        if let Some(search) = &options.search {
            url.push('?');
            url.push_str(search.trim_start_matches('?'));
        } else if !options.query.is_empty() {
            let mut pairs: Vec<String> = options
                .query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            pairs.sort();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        if let Some(hash) = &options.hash {
            url.push('#');
            url.push_str(hash.trim_start_matches('#'));
        }
        self.navigate(url, true);
        Ok(())
    }

    async fn download_url(&self, _url: &str) -> Result<()> {
        self.state.lock().unwrap().ensure_open()
    }

    async fn url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn is_loading(&self) -> Result<bool> {
        // Stub loads complete before load_url returns
        Ok(false)
    }

    async fn is_loading_main_frame(&self) -> Result<bool> {
        Ok(false)
    }

    async fn is_waiting_for_response(&self) -> Result<bool> {
        Ok(false)
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.sink.emit(EventKind::LoadStopped, EventDetails::None);
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        let url = {
            let state = self.state.lock().unwrap();
            state.ensure_open()?;
            state.url.clone()
        };
        self.navigate(url, false);
        Ok(())
    }

    async fn reload_ignoring_cache(&self) -> Result<()> {
        self.reload().await
    }

    // Focus

    async fn is_focused(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().focused)
    }

    async fn focus(&self) -> Result<()> {
        self.state.lock().unwrap().focused = true;
        self.sink.emit(EventKind::Focused, EventDetails::None);
        Ok(())
    }

    // Offscreen rendering

    async fn is_offscreen(&self) -> Result<bool> {
        Ok(self.offscreen)
    }

    async fn start_painting(&self) -> Result<()> {
        self.state.lock().unwrap().painting = true;
        Ok(())
    }

    async fn stop_painting(&self) -> Result<()> {
        self.state.lock().unwrap().painting = false;
        Ok(())
    }

    async fn is_painting(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().painting)
    }

    async fn set_frame_rate(&self, fps: u32) -> Result<()> {
        self.state.lock().unwrap().frame_rate = fps;
        Ok(())
    }

    async fn frame_rate(&self) -> Result<u32> {
        Ok(self.state.lock().unwrap().frame_rate)
    }

    async fn invalidate(&self) -> Result<()> {
        Ok(())
    }

    // Performance

    async fn set_background_throttling(&self, value: bool) -> Result<()> {
        self.state.lock().unwrap().background_throttling = value;
        Ok(())
    }

    async fn background_throttling(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().background_throttling)
    }

    async fn set_image_animation_policy(&self, policy: ImageAnimationPolicy) -> Result<()> {
        self.state.lock().unwrap().image_animation_policy = policy;
        Ok(())
    }

    // Audio

    async fn set_audio_muted(&self, muted: bool) -> Result<()> {
        self.state.lock().unwrap().muted = muted;
        Ok(())
    }

    async fn is_audio_muted(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().muted)
    }

    async fn is_currently_audible(&self) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.audible && !state.muted)
    }

    // Selection

    async fn select_all(&self) -> Result<()> {
        Ok(())
    }

    async fn unselect(&self) -> Result<()> {
        Ok(())
    }

    async fn adjust_selection(&self, _options: AdjustSelection) -> Result<()> {
        Ok(())
    }

    // User agent

    async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
        self.state.lock().unwrap().user_agent = user_agent.to_string();
        Ok(())
    }

    async fn user_agent(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().user_agent.clone())
    }

    // Injection

    async fn insert_css(&self, css: &str, _options: &CssOptions) -> Result<CssKey> {
        let mut state = self.state.lock().unwrap();
        let key = CssKey::new(format!("css-{}", state.next_css_key));
        state.next_css_key += 1;
        state.css.insert(key.clone(), css.to_string());
        Ok(key)
    }

    async fn remove_css(&self, key: &CssKey) -> Result<()> {
        self.state.lock().unwrap().css.remove(key);
        Ok(())
    }

    async fn execute_javascript(&self, _code: &str, _options: &ScriptOptions) -> Result<()> {
        let state = self.state.lock().unwrap();
        state.ensure_open()?;
        if state.crashed {
            return Err(Error::invalid_state("renderer has crashed"));
        }
        Ok(())
    }

    // Renderer process

    async fn process_id(&self) -> Result<u32> {
        Ok(self.process_id)
    }

    async fn is_crashed(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().crashed)
    }

    async fn crash(&self) -> Result<()> {
        self.state.lock().unwrap().crashed = true;
        self.sink.emit(
            EventKind::Shutdown,
            EventDetails::Shutdown(ShutdownDetails {
                reason: ShutdownReason::Crashed,
                exit_code: 139,
            }),
        );
        Ok(())
    }

    // Clipboard and editing

    async fn undo(&self) -> Result<()> {
        Ok(())
    }

    async fn redo(&self) -> Result<()> {
        Ok(())
    }

    async fn copy(&self) -> Result<()> {
        Ok(())
    }

    async fn copy_image_at(&self, _x: i32, _y: i32) -> Result<()> {
        Ok(())
    }

    async fn paste(&self) -> Result<()> {
        Ok(())
    }

    async fn paste_and_match_style(&self) -> Result<()> {
        Ok(())
    }

    async fn delete_selection(&self) -> Result<()> {
        Ok(())
    }

    async fn replace(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn replace_misspelling(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn insert_text(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn send_input(&self, event: &InputEvent) -> Result<()> {
        self.sink.emit(
            EventKind::Input,
            EventDetails::Input(InputDetails {
                kind: event.observed_kind(),
                modifiers: event.modifiers().to_vec(),
            }),
        );
        Ok(())
    }

    // History

    async fn go_to_index(&self, index: usize) -> Result<()> {
        let url = {
            let mut state = self.state.lock().unwrap();
            if index >= state.history.len() {
                return Err(Error::invalid_argument(format!(
                    "history index {index} out of range (len {})",
                    state.history.len()
                )));
            }
            state.history_index = index;
            state.history[index].clone()
        };
        self.navigate(url, false);
        Ok(())
    }

    async fn go_to_offset(&self, offset: i32) -> Result<()> {
        let url = {
            let mut state = self.state.lock().unwrap();
            let Some(target) = Self::offset_target(&state, offset) else {
                return Err(Error::invalid_argument(format!(
                    "history offset {offset} out of range"
                )));
            };
            state.history_index = target;
            state.history[target].clone()
        };
        self.navigate(url, false);
        Ok(())
    }

    async fn can_go_to_offset(&self, offset: i32) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(Self::offset_target(&state, offset).is_some())
    }

    async fn can_go_back(&self) -> Result<bool> {
        self.can_go_to_offset(-1).await
    }

    async fn can_go_forward(&self) -> Result<bool> {
        self.can_go_to_offset(1).await
    }

    async fn clear_history(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let current = state.history[state.history_index].clone();
        state.history = vec![current];
        state.history_index = 0;
        Ok(())
    }

    async fn go_back(&self) -> Result<()> {
        self.go_to_offset(-1).await
    }

    async fn go_forward(&self) -> Result<()> {
        self.go_to_offset(1).await
    }

    // Zoom

    async fn set_zoom_factor(&self, factor: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.zoom_factor = state.clamp_zoom(factor);
        Ok(())
    }

    async fn zoom_factor(&self) -> Result<f64> {
        Ok(self.state.lock().unwrap().zoom_factor)
    }

    async fn set_zoom_level(&self, level: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.zoom_factor = state.clamp_zoom(ZOOM_STEP.powf(level));
        Ok(())
    }

    async fn zoom_level(&self) -> Result<f64> {
        let state = self.state.lock().unwrap();
        Ok(state.zoom_factor.ln() / ZOOM_STEP.ln())
    }

    async fn set_visual_zoom_level_limits(&self, minimum: f64, maximum: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.zoom_limits = Some((minimum, maximum));
        state.zoom_factor = state.clamp_zoom(state.zoom_factor);
        Ok(())
    }

    // DevTools

    async fn open_devtools(&self, options: &DevToolsOptions) -> Result<()> {
        let was_open = {
            let mut state = self.state.lock().unwrap();
            let was_open = state.devtools_open;
            state.devtools_open = true;
            state.devtools_focused = options.activate;
            was_open
        };
        if !was_open {
            self.sink.emit(EventKind::DevtoolsOpened, EventDetails::None);
        }
        Ok(())
    }

    async fn close_devtools(&self) -> Result<()> {
        let was_open = {
            let mut state = self.state.lock().unwrap();
            let was_open = state.devtools_open;
            state.devtools_open = false;
            state.devtools_focused = false;
            was_open
        };
        if was_open {
            self.sink.emit(EventKind::DevtoolsClosed, EventDetails::None);
        }
        Ok(())
    }

    async fn is_devtools_opened(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().devtools_open)
    }

    async fn is_devtools_focused(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().devtools_focused)
    }

    async fn inspect_element(&self, _x: i32, _y: i32) -> Result<()> {
        self.open_devtools(&DevToolsOptions::default()).await
    }

    // Misc

    async fn title(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().title.clone())
    }

    async fn set_ignore_menu_shortcuts(&self, ignore: bool) -> Result<()> {
        self.state.lock().unwrap().ignore_menu_shortcuts = ignore;
        Ok(())
    }

    async fn set_background_color(&self, color: &str) -> Result<()> {
        self.state.lock().unwrap().background_color = color.to_string();
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(message) = state.destroy_error.take() {
                return Err(Error::engine("destroy", message));
            }
            state.closed = true;
        }
        if let Some(surfaces) = self.surfaces.upgrade() {
            surfaces.lock().unwrap().remove(&self.id);
        }
        Ok(())
    }
}
