//! Integration tests for the webview control plane
//!
//! Everything runs against the in-memory engine, so the suite needs no
//! display server or browser install.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use oriel::events::{LoginRequest, ShutdownReason};
use oriel::input::{KeyEventKind, KeyInput, ObservedInputKind};
use oriel::types::DevToolsOptions;
use oriel::{
    Engine, EngineSurface, Error, EventDetails, EventKind, EventSink, ExtensionId, HostConfig,
    LoadFileOptions, LoadUrlOptions, Rect, Result, StubEngine, WebviewFilter, WebviewHost,
    WebviewId, WebviewInfo, WebviewProperties, WindowId,
};

fn host() -> WebviewHost {
    WebviewHost::new(Arc::new(StubEngine::new()))
}

fn extension() -> ExtensionId {
    ExtensionId::new("test-extension")
}

async fn create(host: &WebviewHost) -> WebviewInfo {
    host.create(&extension(), &WebviewProperties::default())
        .await
        .expect("Failed to create webview")
}

// ===== Lifecycle =====

#[tokio::test]
async fn test_create_get_query_remove() {
    let host = host();
    let info = create(&host).await;

    assert_eq!(host.get(&info.id).await.expect("get failed"), info);

    let all = host
        .query(&WebviewFilter::default())
        .await
        .expect("query failed");
    assert_eq!(all, vec![info.clone()]);

    host.remove(&[info.id.clone()]).await.expect("remove failed");
    assert!(matches!(host.get(&info.id).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_query_filters_by_extension() {
    let host = host();
    let mine = host
        .create(&ExtensionId::new("ext-a"), &WebviewProperties::default())
        .await
        .unwrap();
    host.create(&ExtensionId::new("ext-b"), &WebviewProperties::default())
        .await
        .unwrap();

    let filter = WebviewFilter {
        extension: Some(ExtensionId::new("ext-a")),
        ..Default::default()
    };
    let found = host.query(&filter).await.unwrap();
    assert_eq!(found, vec![mine]);
}

#[tokio::test]
async fn test_remove_unknown_id_destroys_nothing() {
    let host = host();
    let info = create(&host).await;

    let result = host
        .remove(&[info.id.clone(), WebviewId::new("wv-missing")])
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    // The known id survived the failed batch.
    assert!(host.get(&info.id).await.is_ok());
}

#[tokio::test]
async fn test_removed_webview_is_gone_from_engine() {
    let engine = Arc::new(StubEngine::new());
    let host = WebviewHost::new(Arc::clone(&engine) as Arc<dyn Engine>);
    let info = create(&host).await;

    assert!(engine.surface(&info.id).is_some());
    host.remove(&[info.id.clone()]).await.unwrap();
    assert!(engine.surface(&info.id).is_none());

    // A dead id never emits, even through engine-side hooks.
    let mut rx = host.watch();
    engine.raise_login(
        &info.id,
        LoginRequest {
            url: "https://auth.test".into(),
            is_proxy: false,
            scheme: "basic".into(),
            host: "auth.test".into(),
            port: 443,
            realm: "staging".into(),
        },
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_destroy_keeps_rest_of_batch_registered() {
    let engine = Arc::new(StubEngine::new());
    let host = WebviewHost::new(Arc::clone(&engine) as Arc<dyn Engine>);
    let first = create(&host).await;
    let second = create(&host).await;
    let mut rx = host.watch();

    engine.fail_destroy(&second.id, "renderer teardown hung");
    let result = host
        .remove(&[first.id.clone(), second.id.clone()])
        .await;
    assert!(matches!(result, Err(Error::Engine { .. })));

    // The first webview was fully removed and announced.
    assert!(matches!(host.get(&first.id).await, Err(Error::NotFound(_))));
    let emitted = rx.try_recv().expect("no removed event for first webview");
    assert_eq!(emitted.kind, EventKind::Removed);
    assert_eq!(emitted.event.id, first.id);

    // The failed one is still registered, operable, and removable.
    assert!(rx.try_recv().is_err());
    assert!(host.get(&second.id).await.is_ok());
    assert_eq!(host.url(&second.id).await.unwrap(), "about:blank");
    host.remove(&[second.id.clone()]).await.unwrap();
    assert!(matches!(host.get(&second.id).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_id_fails_with_not_found() {
    let host = host();
    let bogus = WebviewId::new("wv-404");
    assert!(matches!(host.url(&bogus).await, Err(Error::NotFound(_))));
    assert!(matches!(host.focus(&bogus).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_create_and_remove_emit_events() {
    let host = host();
    let mut rx = host.watch();

    let info = create(&host).await;
    let created = rx.try_recv().expect("no created event");
    assert_eq!(created.kind, EventKind::Created);
    assert_eq!(created.event.id, info.id);
    assert_eq!(created.details, EventDetails::Webview(info.clone()));

    host.remove(&[info.id.clone()]).await.unwrap();
    let removed = rx.try_recv().expect("no removed event");
    assert_eq!(removed.kind, EventKind::Removed);
    assert_eq!(removed.event.id, info.id);
}

#[tokio::test]
async fn test_create_rejects_invalid_properties() {
    let host = host();
    let props = WebviewProperties {
        zoom_factor: Some(-1.0),
        ..Default::default()
    };
    assert!(matches!(
        host.create(&extension(), &props).await,
        Err(Error::InvalidArgument(_))
    ));
    // Nothing was registered.
    assert!(host.query(&WebviewFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_current_resolves_calling_webview() {
    use oriel::HostContext;

    let host = host();
    let info = create(&host).await;

    let ctx = HostContext::webview("test-extension", info.id.clone());
    assert_eq!(host.current(&ctx).await.unwrap(), info);

    let no_webview = HostContext::extension("test-extension");
    assert!(matches!(
        host.current(&no_webview).await,
        Err(Error::InvalidState(_))
    ));
}

// ===== Events =====

#[tokio::test]
async fn test_listeners_fire_in_registration_order() {
    let host = host();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for tag in ["a", "b", "c"] {
        let seen = Arc::clone(&seen);
        host.add_listener(EventKind::Created, move |_, _| {
            seen.lock().unwrap().push(tag);
        });
    }

    create(&host).await;
    assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_removed_listener_stops_firing() {
    let host = host();
    let calls = Arc::new(AtomicUsize::new(0));
    let id = {
        let calls = Arc::clone(&calls);
        host.add_listener(EventKind::Created, move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };

    create(&host).await;
    host.remove_listener(EventKind::Created, id);
    host.remove_listener(EventKind::Created, id); // double removal is a no-op
    create(&host).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_load_finished_fires_once_per_load() {
    let host = host();
    let info = create(&host).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener = {
        let seen = Arc::clone(&seen);
        host.add_listener(EventKind::LoadFinished, move |event, _| {
            seen.lock().unwrap().push(event.id.clone());
        })
    };

    host.load_url(&info.id, "https://example.com", &LoadUrlOptions::default())
        .await
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![info.id.clone()]);

    host.remove_listener(EventKind::LoadFinished, listener);
    host.load_url(&info.id, "https://example.org", &LoadUrlOptions::default())
        .await
        .unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_load_emits_lifecycle_once() {
    let host = host();
    let info = create(&host).await;
    let mut rx = host.watch();

    host.load_url(&info.id, "https://example.com", &LoadUrlOptions::default())
        .await
        .unwrap();

    let mut kinds = Vec::new();
    while let Ok(emitted) = rx.try_recv() {
        assert_eq!(emitted.event.id, info.id);
        kinds.push(emitted.kind);
    }
    assert_eq!(
        kinds,
        vec![
            EventKind::LoadStarted,
            EventKind::NavigationStarted,
            EventKind::NavigationDone,
            EventKind::PageTitleUpdated,
            EventKind::DomReady,
            EventKind::LoadFinished,
        ]
    );
}

#[tokio::test]
async fn test_send_input_reports_observed_kind() {
    let host = host();
    let info = create(&host).await;
    let mut rx = host.watch();

    let event = KeyInput::new(KeyEventKind::Char, "a").into();
    host.send_input(&info.id, &event).await.unwrap();

    let emitted = rx.try_recv().expect("no input event");
    assert_eq!(emitted.kind, EventKind::Input);
    match emitted.details {
        EventDetails::Input(details) => assert_eq!(details.kind, ObservedInputKind::Char),
        other => panic!("expected input details, got {other:?}"),
    }
}

// ===== Navigation =====

#[tokio::test]
async fn test_load_url_round_trip() {
    let host = host();
    let info = create(&host).await;

    assert_eq!(host.url(&info.id).await.unwrap(), "about:blank");
    host.load_url(&info.id, "https://example.com", &LoadUrlOptions::default())
        .await
        .unwrap();
    assert_eq!(host.url(&info.id).await.unwrap(), "https://example.com");
    assert!(!host.is_loading(&info.id).await.unwrap());
}

#[tokio::test]
async fn test_load_url_rejects_empty_url() {
    let host = host();
    let info = create(&host).await;
    assert!(matches!(
        host.load_url(&info.id, "", &LoadUrlOptions::default()).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_load_file_builds_url_with_search_and_hash() {
    let host = host();
    let info = create(&host).await;

    let options = LoadFileOptions {
        search: Some("tab=settings".into()),
        hash: Some("general".into()),
        ..Default::default()
    };
    host.load_file(&info.id, "/app/index.html", &options)
        .await
        .unwrap();
    assert_eq!(
        host.url(&info.id).await.unwrap(),
        "file:///app/index.html?tab=settings#general"
    );
}

#[tokio::test]
async fn test_history_navigation() {
    let host = host();
    let info = create(&host).await;
    let opts = LoadUrlOptions::default();

    host.load_url(&info.id, "https://a.test", &opts).await.unwrap();
    host.load_url(&info.id, "https://b.test", &opts).await.unwrap();

    assert!(host.can_go_back(&info.id).await.unwrap());
    assert!(!host.can_go_forward(&info.id).await.unwrap());

    host.go_back(&info.id).await.unwrap();
    assert_eq!(host.url(&info.id).await.unwrap(), "https://a.test");
    assert!(host.can_go_forward(&info.id).await.unwrap());

    host.go_forward(&info.id).await.unwrap();
    assert_eq!(host.url(&info.id).await.unwrap(), "https://b.test");

    // about:blank, a, b: offset -2 is in range, -3 is not.
    assert!(host.can_go_to_offset(&info.id, -2).await.unwrap());
    assert!(!host.can_go_to_offset(&info.id, -3).await.unwrap());
    assert!(matches!(
        host.go_to_offset(&info.id, -3).await,
        Err(Error::InvalidArgument(_))
    ));

    host.clear_history(&info.id).await.unwrap();
    assert!(!host.can_go_back(&info.id).await.unwrap());
    assert!(!host.can_go_forward(&info.id).await.unwrap());
}

#[tokio::test]
async fn test_new_load_truncates_forward_history() {
    let host = host();
    let info = create(&host).await;
    let opts = LoadUrlOptions::default();

    host.load_url(&info.id, "https://a.test", &opts).await.unwrap();
    host.load_url(&info.id, "https://b.test", &opts).await.unwrap();
    host.go_back(&info.id).await.unwrap();
    host.load_url(&info.id, "https://c.test", &opts).await.unwrap();

    assert!(!host.can_go_forward(&info.id).await.unwrap());
    host.go_back(&info.id).await.unwrap();
    assert_eq!(host.url(&info.id).await.unwrap(), "https://a.test");
}

// ===== Window attachment =====

#[tokio::test]
async fn test_attach_detach() {
    let host = host();
    let window = WindowId::new("win-1");
    let props = WebviewProperties::attached(window.clone(), Rect::new(0, 0, 800, 600));
    let info = host.create(&extension(), &props).await.unwrap();

    assert_eq!(
        host.attached_window(&info.id).await.unwrap(),
        Some(window)
    );
    assert!(host.detach(&info.id).await.unwrap());
    assert!(!host.detach(&info.id).await.unwrap());
    assert_eq!(host.attached_window(&info.id).await.unwrap(), None);

    // Stacking order is meaningless while detached.
    assert!(matches!(
        host.move_top(&info.id).await,
        Err(Error::InvalidState(_))
    ));

    host.attach(&info.id, &WindowId::new("win-2")).await.unwrap();
    assert!(host.move_top(&info.id).await.is_ok());
}

#[tokio::test]
async fn test_bounds_round_trip_and_validation() {
    let host = host();
    let info = create(&host).await;

    let bounds = Rect::new(10, 20, 300, 200);
    host.set_bounds(&info.id, bounds).await.unwrap();
    assert_eq!(host.bounds(&info.id).await.unwrap(), bounds);

    assert!(matches!(
        host.set_bounds(&info.id, Rect::new(0, 0, 0, 100)).await,
        Err(Error::InvalidArgument(_))
    ));
}

// ===== Offscreen rendering =====

#[tokio::test]
async fn test_offscreen_painting_lifecycle() {
    let host = host();
    let info = host
        .create(&extension(), &WebviewProperties::offscreen())
        .await
        .unwrap();

    assert!(host.is_offscreen(&info.id).await.unwrap());
    assert!(host.is_painting(&info.id).await.unwrap());

    host.stop_painting(&info.id).await.unwrap();
    assert!(!host.is_painting(&info.id).await.unwrap());
    host.start_painting(&info.id).await.unwrap();
    assert!(host.is_painting(&info.id).await.unwrap());

    assert_eq!(host.frame_rate(&info.id).await.unwrap(), 60);
    host.set_frame_rate(&info.id, 30).await.unwrap();
    assert_eq!(host.frame_rate(&info.id).await.unwrap(), 30);
    assert!(matches!(
        host.set_frame_rate(&info.id, 0).await,
        Err(Error::InvalidArgument(_))
    ));

    host.invalidate(&info.id).await.unwrap();
}

#[tokio::test]
async fn test_painting_requires_offscreen_webview() {
    let host = host();
    let info = create(&host).await;

    assert!(!host.is_offscreen(&info.id).await.unwrap());
    assert!(matches!(
        host.start_painting(&info.id).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        host.frame_rate(&info.id).await,
        Err(Error::InvalidState(_))
    ));
}

// ===== DevTools =====

#[tokio::test]
async fn test_devtools_lifecycle() {
    let host = host();
    let props = WebviewProperties {
        devtools: true,
        ..Default::default()
    };
    let info = host.create(&extension(), &props).await.unwrap();
    let mut rx = host.watch();

    assert!(!host.is_devtools_opened(&info.id).await.unwrap());
    host.open_devtools(&info.id, &DevToolsOptions::default())
        .await
        .unwrap();
    assert!(host.is_devtools_opened(&info.id).await.unwrap());
    assert_eq!(rx.try_recv().unwrap().kind, EventKind::DevtoolsOpened);

    host.toggle_devtools(&info.id).await.unwrap();
    assert!(!host.is_devtools_opened(&info.id).await.unwrap());
    assert_eq!(rx.try_recv().unwrap().kind, EventKind::DevtoolsClosed);

    host.toggle_devtools(&info.id).await.unwrap();
    assert!(host.is_devtools_opened(&info.id).await.unwrap());
}

#[tokio::test]
async fn test_devtools_gated_on_creation_flag() {
    let host = host();
    let info = create(&host).await;

    assert!(matches!(
        host.open_devtools(&info.id, &DevToolsOptions::default()).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        host.inspect_element(&info.id, 10, 10).await,
        Err(Error::InvalidState(_))
    ));
}

// ===== Zoom =====

#[tokio::test]
async fn test_zoom_factor_round_trip() {
    let host = host();
    let info = create(&host).await;

    assert_eq!(host.zoom_factor(&info.id).await.unwrap(), 1.0);
    host.set_zoom_factor(&info.id, 1.5).await.unwrap();
    assert_eq!(host.zoom_factor(&info.id).await.unwrap(), 1.5);

    assert!(matches!(
        host.set_zoom_factor(&info.id, 0.0).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        host.set_zoom_factor(&info.id, f64::NAN).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_zoom_limits_clamp_factor() {
    let host = host();
    let info = create(&host).await;

    host.set_visual_zoom_level_limits(&info.id, 0.5, 2.0)
        .await
        .unwrap();
    host.set_zoom_factor(&info.id, 3.0).await.unwrap();
    assert_eq!(host.zoom_factor(&info.id).await.unwrap(), 2.0);
    host.set_zoom_factor(&info.id, 0.1).await.unwrap();
    assert_eq!(host.zoom_factor(&info.id).await.unwrap(), 0.5);

    assert!(matches!(
        host.set_visual_zoom_level_limits(&info.id, 2.0, 1.0).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_zoom_level_maps_to_factor() {
    let host = host();
    let info = create(&host).await;

    host.set_zoom_level(&info.id, 1.0).await.unwrap();
    let factor = host.zoom_factor(&info.id).await.unwrap();
    assert!((factor - 1.2).abs() < 1e-9);
    let level = host.zoom_level(&info.id).await.unwrap();
    assert!((level - 1.0).abs() < 1e-9);
}

// ===== Renderer process =====

#[tokio::test]
async fn test_crash_emits_shutdown_and_reload_recovers() {
    let host = host();
    let info = create(&host).await;
    let mut rx = host.watch();

    assert!(!host.is_crashed(&info.id).await.unwrap());
    host.crash(&info.id).await.unwrap();
    assert!(host.is_crashed(&info.id).await.unwrap());

    let emitted = rx.try_recv().expect("no shutdown event");
    assert_eq!(emitted.kind, EventKind::Shutdown);
    match emitted.details {
        EventDetails::Shutdown(details) => {
            assert_eq!(details.reason, ShutdownReason::Crashed);
        }
        other => panic!("expected shutdown details, got {other:?}"),
    }

    assert!(matches!(
        host.execute_javascript(&info.id, "1 + 1", &Default::default())
            .await,
        Err(Error::InvalidState(_))
    ));

    host.reload(&info.id).await.unwrap();
    assert!(!host.is_crashed(&info.id).await.unwrap());
}

#[tokio::test]
async fn test_process_ids_are_distinct() {
    let host = host();
    let first = create(&host).await;
    let second = create(&host).await;
    assert_ne!(
        host.process_id(&first.id).await.unwrap(),
        host.process_id(&second.id).await.unwrap()
    );
}

// ===== Authentication =====

#[tokio::test]
async fn test_login_answers_pending_challenge() {
    let engine = Arc::new(StubEngine::new());
    let host = WebviewHost::new(Arc::clone(&engine) as Arc<dyn Engine>);
    let info = create(&host).await;

    assert_eq!(host.pending_login(&info.id).await.unwrap(), None);
    assert!(matches!(
        host.login(&info.id, Some("user"), Some("pass")).await,
        Err(Error::InvalidState(_))
    ));

    let mut rx = host.watch();
    let request = LoginRequest {
        url: "https://auth.test".into(),
        is_proxy: false,
        scheme: "basic".into(),
        host: "auth.test".into(),
        port: 443,
        realm: "staging".into(),
    };
    engine.raise_login(&info.id, request.clone());
    assert_eq!(rx.try_recv().unwrap().kind, EventKind::Login);
    assert_eq!(host.pending_login(&info.id).await.unwrap(), Some(request));

    host.login(&info.id, Some("user"), Some("pass")).await.unwrap();
    assert_eq!(host.pending_login(&info.id).await.unwrap(), None);
}

// ===== Audio =====

#[tokio::test]
async fn test_mute_silences_audible_page() {
    let engine = Arc::new(StubEngine::new());
    let host = WebviewHost::new(Arc::clone(&engine) as Arc<dyn Engine>);
    let info = create(&host).await;

    assert!(!host.is_currently_audible(&info.id).await.unwrap());
    engine.mark_audible(&info.id, true);
    assert!(host.is_currently_audible(&info.id).await.unwrap());

    host.set_audio_muted(&info.id, true).await.unwrap();
    assert!(host.is_audio_muted(&info.id).await.unwrap());
    assert!(!host.is_currently_audible(&info.id).await.unwrap());
}

// ===== Injection =====

#[tokio::test]
async fn test_insert_css_keys_are_removable() {
    let host = host();
    let info = create(&host).await;

    let first = host
        .insert_css(&info.id, "body { margin: 0 }", &Default::default())
        .await
        .unwrap();
    let second = host
        .insert_css(&info.id, "a { color: red }", &Default::default())
        .await
        .unwrap();
    assert_ne!(first, second);

    host.remove_css(&info.id, &first).await.unwrap();
    // Removing the same key again is a no-op.
    host.remove_css(&info.id, &first).await.unwrap();
}

// ===== Misc =====

#[tokio::test]
async fn test_user_agent_round_trip() {
    let host = host();
    let info = create(&host).await;
    host.set_user_agent(&info.id, "oriel-test/1.0").await.unwrap();
    assert_eq!(host.user_agent(&info.id).await.unwrap(), "oriel-test/1.0");
}

#[tokio::test]
async fn test_background_color_validation() {
    let host = host();
    let info = create(&host).await;

    host.set_background_color(&info.id, "#abc").await.unwrap();
    host.set_background_color(&info.id, "#a1b2c3d4").await.unwrap();
    assert!(matches!(
        host.set_background_color(&info.id, "red").await,
        Err(Error::InvalidArgument(_))
    ));
}

// ===== Call policy =====

/// Engine whose surface creation never finishes in time
struct StalledEngine;

#[async_trait]
impl Engine for StalledEngine {
    async fn create_webview(
        &self,
        _info: &WebviewInfo,
        _properties: &WebviewProperties,
        _sink: EventSink,
    ) -> Result<Arc<dyn EngineSurface>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("sleep outlives every test deadline")
    }
}

#[tokio::test(start_paused = true)]
async fn test_call_timeout_fails_slow_engine_calls() {
    let config = HostConfig {
        call_timeout: Some(Duration::from_millis(50)),
    };
    let host = WebviewHost::with_config(Arc::new(StalledEngine), config);

    let result = host.create(&extension(), &WebviewProperties::default()).await;
    assert!(matches!(result, Err(Error::Timeout(_))));
}

#[tokio::test]
async fn test_fast_calls_pass_under_timeout() {
    let config = HostConfig {
        call_timeout: Some(Duration::from_secs(5)),
    };
    let host = WebviewHost::with_config(Arc::new(StubEngine::new()), config);
    let info = create(&host).await;
    assert_eq!(host.url(&info.id).await.unwrap(), "about:blank");
}
