//! # Oriel
//!
//! Typed async control plane for embedded webviews.
//!
//! Oriel is the host side of a webview runtime: it mints opaque webview ids,
//! keeps the directory of live webviews, validates every call, and delegates
//! the actual rendering to an external engine behind the [`Engine`] trait.
//! State changes come back as typed events on named channels.
//!
//! ## Features
//!
//! - **One entry point** - every operation goes through [`WebviewHost`]
//! - **Typed events** - 37 named channels with structured payloads
//! - **Engine-agnostic** - any engine implementing two traits plugs in
//! - **Testable** - ships [`StubEngine`], a complete in-memory engine
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use oriel::{
//!     EventKind, ExtensionId, LoadUrlOptions, StubEngine, WebviewHost, WebviewProperties,
//! };
//!
//! #[tokio::main]
//! async fn main() -> oriel::Result<()> {
//!     let host = WebviewHost::new(Arc::new(StubEngine::new()));
//!
//!     host.add_listener(EventKind::LoadFinished, |event, _| {
//!         println!("{} finished loading", event.id);
//!     });
//!
//!     let extension = ExtensionId::new("my-extension");
//!     let info = host.create(&extension, &WebviewProperties::default()).await?;
//!
//!     host.load_url(&info.id, "https://example.com", &LoadUrlOptions::default())
//!         .await?;
//!     assert_eq!(host.url(&info.id).await?, "https://example.com");
//!
//!     host.remove(&[info.id]).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Call policy
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use oriel::{HostConfig, StubEngine, WebviewHost};
//!
//! // Fail delegated calls that take longer than two seconds.
//! let config = HostConfig {
//!     call_timeout: Some(Duration::from_secs(2)),
//! };
//! let host = WebviewHost::with_config(Arc::new(StubEngine::new()), config);
//! ```

pub mod bus;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod id;
pub mod input;
pub mod properties;
pub mod stub;
pub mod types;

// Re-exports
pub use bus::{EmittedEvent, EventBus, Listener};
pub use engine::{Engine, EngineSurface, EventSink};
pub use error::{Error, Result};
pub use events::{EventDetails, EventKind, LoginRequest, WebviewEvent};
pub use geometry::{AutoResize, Rect};
pub use host::{HostConfig, WebviewHost};
pub use id::{CssKey, ExtensionId, ListenerId, WebsessionId, WebviewId, WindowId};
pub use input::{InputEvent, KeyInput, MouseInput, WheelInput};
pub use properties::WebviewProperties;
pub use stub::{StubEngine, StubWebview};
pub use types::{
    AdjustSelection, CssOptions, DevToolsOptions, HostContext, LoadFileOptions, LoadUrlOptions,
    ScriptOptions, WebviewFilter, WebviewInfo,
};
