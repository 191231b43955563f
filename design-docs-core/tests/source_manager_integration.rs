use design_docs_core::config::{Config, DocumentationSource, SourceName};
use design_docs_core::contract::MockContentFetcher;
use design_docs_core::error::FetchError;
use design_docs_core::source_manager::SourceManager;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PATH: &str = "components/breadcrumbs.md";

fn two_source_config() -> Config {
    Config {
        sources: vec![
            DocumentationSource::public("https://github.com/example/public-docs.git"),
            DocumentationSource::internal("https://github.com/example/internal-docs.git"),
        ],
        refresh_interval_secs: 300,
        cache_enabled: true,
    }
}

/// Answers every fetch from a fixed per-source table; `None` entries mean "not found".
fn scripted(public: Option<&'static str>, internal: Option<&'static str>) -> MockContentFetcher {
    let mut fetcher = MockContentFetcher::new();
    fetcher.expect_fetch().returning(move |source, _| {
        let text = match source.name {
            SourceName::Public => public,
            SourceName::Internal => internal,
        };
        Ok(text.map(str::to_string))
    });
    fetcher
}

#[tokio::test]
async fn single_source_content_is_attributed_without_override() {
    let manager =
        SourceManager::new(&two_source_config(), scripted(Some("public body"), None)).unwrap();

    let content = manager.resolve(PATH).await.expect("content should resolve");
    assert_eq!(content.source, SourceName::Public);
    assert_eq!(content.overrides, None);
    assert_eq!(content.body, "public body");
    assert_eq!(content.file_path, PATH);
    assert!(!content.last_updated.is_empty());
}

#[tokio::test]
async fn higher_priority_source_overrides_lower() {
    let manager = SourceManager::new(
        &two_source_config(),
        scripted(Some("public body"), Some("internal body")),
    )
    .unwrap();

    let content = manager.resolve(PATH).await.unwrap();
    assert_eq!(content.source, SourceName::Internal);
    assert_eq!(content.overrides, Some(SourceName::Public));
    assert_eq!(content.body, "internal body");
}

#[tokio::test]
async fn priority_not_config_order_decides_the_winner() {
    let mut config = two_source_config();
    config.sources[0].priority = 10;
    config.sources[1].priority = 3;
    let manager = SourceManager::new(
        &config,
        scripted(Some("public body"), Some("internal body")),
    )
    .unwrap();

    let content = manager.resolve(PATH).await.unwrap();
    assert_eq!(content.source, SourceName::Public);
    assert_eq!(content.overrides, Some(SourceName::Internal));
}

#[tokio::test]
async fn frontmatter_merges_across_sources() {
    let manager = SourceManager::new(
        &two_source_config(),
        scripted(
            Some("---\nstatus: draft\nowner: x\n---\nlow"),
            Some("---\nstatus: final\n---\nhigh"),
        ),
    )
    .unwrap();

    let content = manager.resolve(PATH).await.unwrap();
    assert_eq!(
        content.frontmatter,
        BTreeMap::from([
            ("owner".to_string(), "x".to_string()),
            ("status".to_string(), "final".to_string()),
        ])
    );
    assert_eq!(content.body, "high");
}

#[tokio::test]
async fn missing_everywhere_is_absent() {
    let manager = SourceManager::new(&two_source_config(), scripted(None, None)).unwrap();
    assert_eq!(manager.resolve("non-existent-file.md").await, None);
    assert_eq!(manager.cached_paths(), 0);
}

#[tokio::test]
async fn failing_source_is_skipped() {
    let mut fetcher = MockContentFetcher::new();
    fetcher
        .expect_fetch()
        .returning(|source, _| match source.name {
            SourceName::Public => Ok(Some("public body".to_string())),
            SourceName::Internal => Err(FetchError::Status {
                status: 401,
                url: "https://api.github.com/repos/example/internal-docs/contents/x".into(),
            }),
        });
    let manager = SourceManager::new(&two_source_config(), fetcher).unwrap();

    let content = manager.resolve(PATH).await.unwrap();
    assert_eq!(content.source, SourceName::Public);
    assert_eq!(content.overrides, None);
}

#[tokio::test]
async fn errors_everywhere_resolve_to_absent() {
    let mut fetcher = MockContentFetcher::new();
    fetcher
        .expect_fetch()
        .returning(|source, _| Err(FetchError::InvalidLocator(source.repo.clone())));
    let manager = SourceManager::new(&two_source_config(), fetcher).unwrap();

    assert_eq!(manager.resolve(PATH).await, None);
}

#[tokio::test]
async fn cached_resolve_issues_no_further_fetches() {
    let mut fetcher = MockContentFetcher::new();
    // One call per enabled source, for the first resolve only.
    fetcher
        .expect_fetch()
        .times(2)
        .returning(|source, _| Ok(Some(format!("{} body", source.name))));
    let manager = SourceManager::new(&two_source_config(), fetcher).unwrap();

    let first = manager.resolve(PATH).await.unwrap();
    let second = manager.resolve(PATH).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cached_paths(), 1);
}

#[tokio::test]
async fn refresh_forces_a_fresh_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut fetcher = MockContentFetcher::new();
    fetcher.expect_fetch().returning(move |_, _| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some(format!("version {n}")))
    });
    let config = Config {
        sources: vec![DocumentationSource::public(
            "https://github.com/example/public-docs.git",
        )],
        ..two_source_config()
    };
    let manager = SourceManager::new(&config, fetcher).unwrap();

    assert_eq!(manager.resolve(PATH).await.unwrap().body, "version 0");
    assert_eq!(manager.resolve(PATH).await.unwrap().body, "version 0");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    manager.refresh();
    assert_eq!(manager.cached_paths(), 0);
    assert_eq!(manager.resolve(PATH).await.unwrap().body, "version 1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn disabled_cache_always_fetches() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut fetcher = MockContentFetcher::new();
    fetcher.expect_fetch().returning(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some("body".to_string()))
    });
    let config = Config {
        sources: vec![DocumentationSource::public(
            "https://github.com/example/public-docs.git",
        )],
        cache_enabled: false,
        ..two_source_config()
    };
    let manager = SourceManager::new(&config, fetcher).unwrap();

    manager.resolve(PATH).await.unwrap();
    manager.resolve(PATH).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(manager.cached_paths(), 0);
}

#[tokio::test]
async fn expired_entries_are_fetched_again() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut fetcher = MockContentFetcher::new();
    fetcher.expect_fetch().returning(move |_, _| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some(format!("version {n}")))
    });
    let config = Config {
        sources: vec![DocumentationSource::public(
            "https://github.com/example/public-docs.git",
        )],
        refresh_interval_secs: 1,
        cache_enabled: true,
    };
    let manager = SourceManager::new(&config, fetcher).unwrap();

    assert_eq!(manager.resolve(PATH).await.unwrap().body, "version 0");
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(manager.resolve(PATH).await.unwrap().body, "version 1");
}

#[tokio::test]
async fn disabled_sources_are_never_queried() {
    let mut config = two_source_config();
    config.sources[1].enabled = false;

    let mut fetcher = MockContentFetcher::new();
    fetcher
        .expect_fetch()
        .withf(|source, _| source.name == SourceName::Public)
        .times(1)
        .returning(|_, _| Ok(Some("public body".to_string())));
    let manager = SourceManager::new(&config, fetcher).unwrap();

    let content = manager.resolve(PATH).await.unwrap();
    assert_eq!(content.source, SourceName::Public);
    assert_eq!(content.overrides, None);
    assert_eq!(
        manager
            .enabled_sources()
            .iter()
            .map(|s| s.name)
            .collect::<Vec<_>>(),
        vec![SourceName::Public]
    );
}

#[tokio::test]
async fn invalid_configuration_aborts_construction() {
    let mut config = two_source_config();
    config.sources[1].priority = 1;
    assert!(SourceManager::new(&config, MockContentFetcher::new()).is_err());
}

#[test]
fn source_status_reflects_config_and_refresh() {
    let mut config = two_source_config();
    config.sources[1].enabled = false;
    let manager = SourceManager::new(&config, MockContentFetcher::new()).unwrap();

    let status = manager.source_status();
    assert_eq!(status.len(), 2);
    assert_eq!(status[0].name, SourceName::Public);
    assert!(status[0].enabled);
    assert_eq!(status[0].priority, 1);
    assert!(!status[0].auth_required);
    assert_eq!(status[1].name, SourceName::Internal);
    assert!(!status[1].enabled);
    assert!(status[1].auth_required);
    assert!(status.iter().all(|s| s.last_sync.is_none()));

    manager.refresh();
    let status = manager.source_status();
    let stamp = status[0].last_sync.as_deref().expect("last sync after refresh");
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
    assert_eq!(status[0].last_sync, status[1].last_sync);
}
