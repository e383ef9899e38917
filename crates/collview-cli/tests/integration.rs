use std::sync::Arc;

use collview_api::memory::{Failure, MemoryTransport};
use collview_api::CollectionRepository;
use collview_core::config::CollviewConfig;
use collview_core::models::collection::{Collection, CollectionDraft};
use collview_core::models::plugin::PluginManifest;
use collview_core::models::theme::Theme;
use collview_store::{FileStore, LocalStore, MemoryStore, THEME_KEY};
use collview_viewer::dev::{dev_services, DevThemeService};
use collview_viewer::services::ThemeService;
use collview_viewer::{CollectionViewer, FetchState, HostServices, RenderOptions, View};

fn plain() -> RenderOptions {
    RenderOptions {
        width: 160,
        ..RenderOptions::default()
    }
}

#[test]
fn test_config_defaults() {
    let config = CollviewConfig::default();
    assert_eq!(config.api_base_url.as_str(), "http://localhost:8005/api/v1");
    assert_eq!(config.theme, Theme::Light);
    assert!(!config.dev_mode);
}

#[test]
fn test_config_roundtrip() {
    let config = CollviewConfig::default();
    let serialized = toml::to_string_pretty(&config).unwrap();
    let deserialized: CollviewConfig = toml::from_str(&serialized).unwrap();
    assert_eq!(config.api_base_url, deserialized.api_base_url);
}

#[tokio::test]
async fn test_full_pipeline_in_memory() {
    let transport = Arc::new(MemoryTransport::new());
    let repo = CollectionRepository::new(transport.clone());

    // 1. Create collections through the repository
    let research = repo
        .create(&CollectionDraft::new("Research").description("Papers").color("#3b82f6"))
        .await
        .unwrap();
    let notes = repo
        .create(&CollectionDraft::new("Notes").color("rgb(16, 185, 129)"))
        .await
        .unwrap();

    // 2. Round-trip through find_by_id
    assert_eq!(repo.find_by_id(&research.id).await.unwrap(), research);

    // 3. Mount a viewer backed by the host api capability
    let services = HostServices::none().with_api(transport.clone());
    let mut viewer =
        CollectionViewer::new(&services, &CollviewConfig::default(), Arc::new(MemoryStore::new()))
            .unwrap();
    viewer.mount();

    let state = viewer.settled().await;
    match state.view() {
        View::Populated(items) => {
            let names: Vec<_> = items.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["Research", "Notes"]);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    let out = viewer.render(&plain());
    assert!(out.starts_with("Collections (2)"));
    assert!(out.find("■ Research").unwrap() < out.find("■ Notes").unwrap());
    assert!(!out.contains("Chat sessions"));

    // 4. Update and delete, then reload
    let renamed = repo
        .update(&notes.id, &CollectionDraft::new("Daily notes"))
        .await
        .unwrap();
    assert_eq!(renamed.id, notes.id);
    repo.delete(&research.id).await.unwrap();

    viewer.reload();
    match viewer.settled().await {
        FetchState::Ready(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].name, "Daily notes");
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(transport.call_count("GET"), 3);

    // 5. Delete the last one: empty view
    repo.delete(&notes.id).await.unwrap();
    viewer.reload();
    assert_eq!(viewer.settled().await.view(), View::Empty);
    assert!(viewer.render(&plain()).starts_with("No collections found"));
}

#[tokio::test]
async fn test_error_view_and_recovery() {
    let seeded = Collection {
        id: "c-1".to_string(),
        name: "Archive".to_string(),
        description: "Old documents".to_string(),
        color: "#999".to_string(),
        created_at: "2025-10-28T10:29:28.038862".to_string(),
        updated_at: "2025-10-28T10:29:28.038862".to_string(),
        document_count: 7,
        chat_session_count: Some(0),
    };
    let transport = Arc::new(MemoryTransport::with_collections(vec![seeded]));
    transport.fail_next(Failure::Status(502, "Bad Gateway".to_string()));

    let mut viewer = CollectionViewer::with_transport(transport.clone(), None, Theme::Dark);
    viewer.mount();

    let out = match viewer.settled().await {
        FetchState::Failed(message) => {
            assert_eq!(message, "HTTP error (502): Bad Gateway");
            viewer.render(&plain())
        }
        other => panic!("unexpected state: {other:?}"),
    };
    assert!(out.contains("Press r to reload"));
    assert!(!out.contains('■'));

    viewer.reload();
    assert!(matches!(viewer.settled().await, FetchState::Ready(_)));
    let out = viewer.render(&plain());
    assert!(out.contains("Chat sessions: 0"));
    assert!(out.contains("Created: Oct 28, 2025, 10:29 AM"));
}

#[tokio::test]
async fn test_dev_services_drive_viewer_theme() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn LocalStore> = Arc::new(FileStore::new(dir.path().join("local_storage.json")));
    store.store(THEME_KEY, "dark").unwrap();

    let services = dev_services(store.clone()).with_api(Arc::new(MemoryTransport::new()));
    let mut viewer =
        CollectionViewer::new(&services, &CollviewConfig::default(), Arc::new(MemoryStore::new()))
            .unwrap();
    assert_eq!(viewer.theme(), Theme::Dark);

    viewer.mount();
    viewer.settled().await;

    // A second service over the same store sees the persisted preference.
    let other = DevThemeService::new(store);
    assert_eq!(other.current_theme(), Theme::Dark);
}

#[test]
fn test_plugin_manifest() {
    let manifest = PluginManifest::collection_viewer();
    assert_eq!(manifest.plugin.plugin_slug, "CollectionViewer");
    assert_eq!(manifest.modules.len(), 1);
    assert_eq!(manifest.modules[0].display_name, "Collection Viewer");

    let json = serde_json::to_string(&manifest).unwrap();
    assert!(json.contains("\"bundle_location\":\"dist/remoteEntry.js\""));
}

#[test]
fn test_theme_roundtrip() {
    for theme in [Theme::Light, Theme::Dark] {
        let parsed: Theme = theme.to_string().parse().unwrap();
        assert_eq!(theme, parsed);
    }
}
