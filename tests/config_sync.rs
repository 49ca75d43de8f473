//! Configuration sync across storage, repository, session, editors and preview.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use auth_site::editor::{EditorError, SectionEditor, SubmitOutcome};
use auth_site::preview::{render_login, PreviewStore};
use auth_site::repository::repo::serialize;
use auth_site::repository::{ConfigCache, ConfigRepository, LoadOutcome, CONFIG_FILE};
use auth_site::session::{AdminSession, SessionPhase};
use auth_site::site::{default_config, AuthPolicy, SiteConfig, SiteInfo, Theme};
use auth_site::storage::MemoryStore;

use common::start_programmable_backend;

fn repository_over(store: Arc<MemoryStore>) -> Arc<ConfigRepository> {
    Arc::new(ConfigRepository::new(store, Arc::new(ConfigCache::new())))
}

async fn store_with_public_fallback(status: u16, body: String) -> (Arc<MemoryStore>, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = start_programmable_backend(move |path| {
        let body = body.clone();
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            if path == "/public/config.json" {
                (status, body)
            } else {
                (404, "{}".to_string())
            }
        }
    })
    .await;

    let base = format!("http://{}/public/", addr).parse().unwrap();
    (Arc::new(MemoryStore::new().with_public_base(base)), hits)
}

#[tokio::test]
async fn test_download_failure_falls_back_to_public_url() {
    let mut published = default_config();
    published.revision = 7;
    published.site.name = "Published".into();
    let body = String::from_utf8(serialize(&published).unwrap()).unwrap();

    let (store, hits) = store_with_public_fallback(200, body).await;
    store.insert(CONFIG_FILE, serialize(&default_config()).unwrap());
    store.fail_download(true);
    let repo = repository_over(store.clone());

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded, published);
    assert_eq!(repo.cache().revision(), Some(7));
    assert_eq!(store.download_calls(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_public_url_not_found_is_missing() {
    let (store, hits) = store_with_public_fallback(404, "{\"error\":\"not_found\"}".into()).await;
    let repo = repository_over(store);

    assert_eq!(repo.load_detailed().await, LoadOutcome::Missing);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_both_paths_failing_is_unreachable() {
    let (store, hits) = store_with_public_fallback(500, "boom".into()).await;
    store.insert(CONFIG_FILE, "{}");
    store.fail_download(true);
    let repo = repository_over(store);

    assert!(matches!(repo.load_detailed().await, LoadOutcome::Unreachable(_)));
    assert!(repo.load().await.is_none());
    assert!(repo.cache().is_empty());
    // One fallback per call, never a retry loop.
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_public_url_empty_body() {
    let (store, _hits) = store_with_public_fallback(200, "   ".into()).await;
    store.fail_download(true);
    let repo = repository_over(store);
    assert_eq!(repo.load_detailed().await, LoadOutcome::Empty);
}

#[tokio::test]
async fn test_first_visit_initializes_then_edits() {
    let store = Arc::new(MemoryStore::new());
    let repo = repository_over(store.clone());

    let session = AdminSession::start(repo.clone(), true).await;
    assert_eq!(session.phase(), SessionPhase::NeedsInitialization);

    assert_eq!(session.initialize().await.unwrap(), SessionPhase::Ready);
    let config = session.config().unwrap();

    let mut theme = SectionEditor::<Theme>::from_config(&config, true);
    theme.edit(|t| t.brand_color = "#3B82F6".into()).unwrap();
    let outcome = theme.submit(|draft| session.save_section(draft)).await.unwrap();
    let SubmitOutcome::Saved(saved) = outcome else {
        panic!("expected a save");
    };
    assert_eq!(saved.revision, 2);

    let mut auth = SectionEditor::<AuthPolicy>::from_config(&saved, true);
    auth.toggle_provider("totallyUnknownProvider").unwrap();
    auth.submit(|draft| session.save_section(draft)).await.unwrap();

    let stored: SiteConfig = serde_json::from_slice(&store.get(CONFIG_FILE).unwrap()).unwrap();
    assert_eq!(stored.revision, 3);
    assert_eq!(stored.theme.brand_color, "#3B82F6");
    assert_eq!(stored.auth.enabled_providers, vec!["google", "github", "totallyUnknownProvider"]);
    assert_eq!(stored.site, default_config().site);

    let view = render_login(None, &stored, None);
    let labels: Vec<_> = view.providers.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Continue with Google",
            "Continue with GitHub",
            "Continue with Totallyunknownprovider"
        ]
    );
}

#[tokio::test]
async fn test_listing_outage_never_loads() {
    let store = Arc::new(MemoryStore::new());
    store.insert(CONFIG_FILE, serialize(&default_config()).unwrap());
    store.fail_list(true);

    let session = AdminSession::start(repository_over(store.clone()), true).await;
    assert_eq!(session.phase(), SessionPhase::NeedsInitialization);
    assert_eq!(store.download_calls(), 0);
}

#[tokio::test]
async fn test_preview_edits_never_reach_storage() {
    let store = Arc::new(MemoryStore::new());
    let repo = repository_over(store.clone());
    repo.initialize().await.unwrap();
    let uploads = store.upload_calls();

    let session = AdminSession::start(repo.clone(), true).await;
    let committed = session.config().unwrap();
    let preview = PreviewStore::seeded(committed.clone());
    let mut rx = preview.subscribe();

    let mut theme = SectionEditor::<Theme>::from_config(&committed, true).with_preview(preview.clone());
    theme.edit(|t| t.accent_color = "#F59E0B".into()).unwrap();
    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone().unwrap();
    assert_eq!(seen.theme.accent_color, "#F59E0B");

    let mut site = SectionEditor::<SiteInfo>::from_config(&committed, true).with_preview(preview.clone());
    site.edit(|s: &mut SiteInfo| s.name = "Draft Name".into()).unwrap();
    assert!(!rx.has_changed().unwrap());

    let view = render_login(preview.current().as_deref(), &committed, None);
    assert!(view.is_preview);
    assert!(view.theme.css.contains("--config-accent-color: #F59E0B;"));
    assert_eq!(view.head.title, "Supabase Auth");

    assert_eq!(store.upload_calls(), uploads);
    assert_eq!(repo.load().await.unwrap(), committed);
}

#[tokio::test]
async fn test_read_only_session_and_editors() {
    let store = Arc::new(MemoryStore::new());
    let repo = repository_over(store.clone());
    repo.initialize().await.unwrap();

    let session = AdminSession::start(repo, false).await;
    assert!(!session.snapshot().is_admin);

    let mut theme = SectionEditor::<Theme>::from_config(&session.config().unwrap(), session.is_admin());
    assert!(matches!(theme.edit(|t| t.brand_color = "#000000".into()), Err(EditorError::ReadOnly)));
    assert!(matches!(
        theme.submit(|draft| session.save_section(draft)).await,
        Err(EditorError::ReadOnly)
    ));
    assert_eq!(store.upload_calls(), 1);
}
