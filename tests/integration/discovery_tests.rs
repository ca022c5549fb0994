//! Integration tests for artifact discovery
//!
//! These tests use wiremock to serve job pages and directory listings and
//! run full discovery against them.

use artifact_scout::archive::{build_archive_client, verify_archive};
use artifact_scout::config::{DiscoveryConfig, TranslationConfig};
use artifact_scout::progress::{NullSink, RecordingSink};
use artifact_scout::{Scout, ScoutError, UrlError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STORAGE: &str = "https://storage.example.com";
const ROOT: &str = "/gcs/bucket/logs/job/42/artifacts/";

/// Creates a test configuration that treats the mock server as the browsing frontend
fn create_test_config(server: &MockServer) -> DiscoveryConfig {
    let mut config = DiscoveryConfig::default();
    config.translation = TranslationConfig {
        frontend_prefix: server.uri(),
        browse_path_segment: "/gcs".to_string(),
        storage_prefix: STORAGE.to_string(),
    };
    config.crawl.ignored_path_fragments = ["/namespaces/".to_string()].into_iter().collect();
    config.crawl.descend_override_names.clear();
    config.http.fetch_timeout_ms = 500;
    config
}

/// Renders a directory-listing page
fn listing(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|href| {
            let text = href.trim_end_matches('/').rsplit('/').next().unwrap_or(href);
            format!("<li><a href=\"{}\">{}</a></li>\n", href, text)
        })
        .collect();
    format!("<html><body><ul>\n{}</ul></body></html>", items)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_page_expecting(server: &MockServer, page: &str, body: String, calls: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Job page linking straight to the artifacts directory
async fn mount_job_page(server: &MockServer) -> String {
    mount_page(server, "/job/42", listing(&[ROOT])).await;
    format!("{}/job/42", server.uri())
}

fn storage_url(path: &str) -> String {
    format!("{}{}", STORAGE, path.trim_start_matches("/gcs"))
}

#[tokio::test]
async fn test_direct_archive_link_performs_no_fetch() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/gcs/bucket/logs/job/42/must-gather.tar", server.uri());

    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![format!("{}/bucket/logs/job/42/must-gather.tar", STORAGE)]
    );
}

#[tokio::test]
async fn test_direct_archive_outside_frontend_is_returned_as_is() {
    let server = MockServer::start().await;
    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = "https://mirror.example.org/dumps/must-gather.tar";

    let result = scout.discover(entry, &NullSink).await.unwrap();

    assert_eq!(result.matched_urls, vec![entry.to_string()]);
}

#[tokio::test]
async fn test_summary_page_to_nested_archive() {
    let server = MockServer::start().await;
    let job_dir = "/gcs/bucket/logs/job/42/";

    // Job summary page with an "Artifacts" link to the browsing frontend
    mount_page(
        &server,
        "/view/job/42",
        format!(
            r#"<html><body><a href="/log">Build Log</a> <a href="{}{}">Artifacts</a></body></html>"#,
            server.uri(),
            job_dir
        ),
    )
    .await;
    mount_page(&server, job_dir, listing(&["../", ROOT, "/gcs/bucket/logs/job/42/build-log.txt"])).await;
    mount_page(
        &server,
        ROOT,
        listing(&[
            "../",
            &format!("{}namespaces/", ROOT),
            &format!("{}e2e-test/", ROOT),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("{}namespaces/", ROOT)))
        .respond_with(html(listing(&[])))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(
        &server,
        &format!("{}e2e-test/", ROOT),
        listing(&[
            "../",
            &format!("{}e2e-test/build-log.txt", ROOT),
            &format!("{}e2e-test/must-gather.tar", ROOT),
        ]),
    )
    .await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/view/job/42", server.uri());

    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![storage_url(&format!("{}e2e-test/must-gather.tar", ROOT))]
    );
}

#[tokio::test]
async fn test_sibling_matches_follow_page_order() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["zeta/", "alpha/"])).await;
    mount_page(&server, &format!("{}zeta/", ROOT), listing(&["must-gather.tar"])).await;
    mount_page(&server, &format!("{}alpha/", ROOT), listing(&["must-gather.tar"])).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![
            storage_url(&format!("{}zeta/must-gather.tar", ROOT)),
            storage_url(&format!("{}alpha/must-gather.tar", ROOT)),
        ]
    );
}

#[tokio::test]
async fn test_subdirectory_matches_precede_later_anchors() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["a/", "must-gather.tar", "b/"])).await;
    mount_page(&server, &format!("{}a/", ROOT), listing(&["deeper/"])).await;
    mount_page(&server, &format!("{}a/deeper/", ROOT), listing(&["must-gather.tar"])).await;
    mount_page(&server, &format!("{}b/", ROOT), listing(&["must-gather.tar"])).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![
            storage_url(&format!("{}a/deeper/must-gather.tar", ROOT)),
            storage_url(&format!("{}must-gather.tar", ROOT)),
            storage_url(&format!("{}b/must-gather.tar", ROOT)),
        ]
    );
}

#[tokio::test]
async fn test_subdirectory_timeout_keeps_sibling_matches() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["slow/", "fast/"])).await;
    Mock::given(method("GET"))
        .and(path(format!("{}slow/", ROOT)))
        .respond_with(html(listing(&["must-gather.tar"])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, &format!("{}fast/", ROOT), listing(&["must-gather.tar"])).await;

    let mut config = create_test_config(&server);
    config.http.fetch_timeout_ms = 300;
    let scout = Scout::new(config).unwrap();
    let sink = RecordingSink::new();

    let result = scout.discover(&entry, &sink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![storage_url(&format!("{}fast/must-gather.tar", ROOT))]
    );
    assert!(sink
        .messages()
        .iter()
        .any(|m| m.starts_with("Skipping") && m.contains("slow/")));
}

#[tokio::test]
async fn test_subdirectory_error_status_is_isolated() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["broken/", "ok/"])).await;
    Mock::given(method("GET"))
        .and(path(format!("{}broken/", ROOT)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, &format!("{}ok/", ROOT), listing(&["must-gather.tar"])).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.matched_urls[0].ends_with("/ok/must-gather.tar"));
}

#[tokio::test]
async fn test_artifacts_root_failure_is_fatal() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;
    // ROOT itself is not mounted, so it answers 404

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let err = scout.discover(&entry, &NullSink).await.unwrap_err();

    assert!(matches!(err, ScoutError::Fetch { url, .. } if url.ends_with(ROOT)));
}

#[tokio::test]
async fn test_entry_page_failure_is_fatal() {
    let server = MockServer::start().await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/job/missing", server.uri());
    let err = scout.discover(&entry, &NullSink).await.unwrap_err();

    assert!(matches!(err, ScoutError::Fetch { .. }));
}

#[tokio::test]
async fn test_missing_artifacts_directory() {
    let server = MockServer::start().await;
    mount_page(&server, "/job/42", listing(&["/gcs/bucket/logs/job/42/build-log.txt"])).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/job/42", server.uri());
    let err = scout.discover(&entry, &NullSink).await.unwrap_err();

    assert!(matches!(err, ScoutError::NotFound { what, .. } if what == "artifacts directory"));
}

#[tokio::test]
async fn test_summary_link_followed_only_once() {
    let server = MockServer::start().await;
    let artifacts_link = |target: &str| format!(r#"<a href="{}">Artifacts</a>"#, target);

    mount_page(&server, "/view/1", artifacts_link("/view/2")).await;
    mount_page_expecting(&server, "/view/2", artifacts_link("/view/3"), 1).await;
    mount_page_expecting(&server, "/view/3", listing(&[ROOT]), 0).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/view/1", server.uri());
    let err = scout.discover(&entry, &NullSink).await.unwrap_err();

    assert!(matches!(err, ScoutError::NotFound { url, .. } if url.ends_with("/view/2")));
}

#[tokio::test]
async fn test_ignored_directories_are_not_fetched() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(
        &server,
        ROOT,
        listing(&["namespaces/", "e2e/"]),
    )
    .await;
    mount_page_expecting(&server, &format!("{}namespaces/", ROOT), listing(&["must-gather.tar"]), 0).await;
    mount_page(&server, &format!("{}e2e/", ROOT), listing(&["namespaces/"])).await;
    mount_page_expecting(&server, &format!("{}e2e/namespaces/", ROOT), listing(&["must-gather.tar"]), 0).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let sink = RecordingSink::new();
    let result = scout.discover(&entry, &sink).await.unwrap();

    assert!(result.is_empty());
    let pruned = sink
        .messages()
        .iter()
        .filter(|m| m.starts_with("Pruning"))
        .count();
    assert_eq!(pruned, 2);
}

#[tokio::test]
async fn test_override_name_descends_into_ignored_path() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["gather-extra/", "gather-must-gather/"])).await;
    mount_page_expecting(&server, &format!("{}gather-extra/", ROOT), listing(&["must-gather.tar"]), 0).await;
    mount_page(
        &server,
        &format!("{}gather-must-gather/", ROOT),
        listing(&["must-gather.tar"]),
    )
    .await;

    let mut config = create_test_config(&server);
    config.crawl.ignored_path_fragments = ["/gather-".to_string()].into_iter().collect();
    config.crawl.descend_override_names = ["gather-must-gather".to_string()].into_iter().collect();
    let scout = Scout::new(config).unwrap();

    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![storage_url(&format!("{}gather-must-gather/must-gather.tar", ROOT))]
    );
}

#[tokio::test]
async fn test_discovery_is_deterministic() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["b/", "a/", "c/"])).await;
    for dir in ["a", "b", "c"] {
        mount_page(
            &server,
            &format!("{}{}/", ROOT, dir),
            listing(&["x/", "must-gather.tar"]),
        )
        .await;
        mount_page(
            &server,
            &format!("{}{}/x/", ROOT, dir),
            listing(&["must-gather.tar"]),
        )
        .await;
    }

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let first = scout.discover(&entry, &NullSink).await.unwrap();
    let second = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(first.len(), 6);
    assert_eq!(first, second);
    assert!(first.matched_urls[0].ends_with("/b/x/must-gather.tar"));
    assert!(first.matched_urls[1].ends_with("/b/must-gather.tar"));
}

#[tokio::test]
async fn test_parent_and_cyclic_links_are_not_followed() {
    let server = MockServer::start().await;
    mount_page_expecting(&server, "/job/42", listing(&[ROOT]), 1).await;

    mount_page(&server, ROOT, listing(&["/job/42/", "../", "loop/"])).await;
    mount_page_expecting(
        &server,
        &format!("{}loop/", ROOT),
        listing(&["../", ROOT, &format!("{}loop/", ROOT), "./", "must-gather.tar"]),
        1,
    )
    .await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/job/42", server.uri());
    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![storage_url(&format!("{}loop/must-gather.tar", ROOT))]
    );
}

#[tokio::test]
async fn test_max_depth_stops_descent() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;

    mount_page(&server, ROOT, listing(&["d1/"])).await;
    mount_page(&server, &format!("{}d1/", ROOT), listing(&["d2/", "must-gather.tar"])).await;
    mount_page_expecting(&server, &format!("{}d1/d2/", ROOT), listing(&["must-gather.tar"]), 0).await;

    let mut config = create_test_config(&server);
    config.crawl.max_depth = 1;
    let scout = Scout::new(config).unwrap();

    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![storage_url(&format!("{}d1/must-gather.tar", ROOT))]
    );
}

#[tokio::test]
async fn test_progress_milestones() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;
    mount_page(&server, ROOT, listing(&["must-gather.tar"])).await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let sink = RecordingSink::new();
    scout.discover(&entry, &sink).await.unwrap();

    let messages = sink.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with("Resolving artifacts directory from"));
    assert!(messages[1].starts_with("Found artifacts directory at"));
    assert!(messages[2].starts_with("Found archive at https://storage.example.com/"));
}

#[tokio::test]
async fn test_cancelled_discovery() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let entry = format!("{}/job/42", server.uri());
    let err = scout
        .discover_with_cancel(&entry, &NullSink, cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::Cancelled));
}

#[tokio::test]
async fn test_malformed_entry_url() {
    let server = MockServer::start().await;
    let scout = Scout::new(create_test_config(&server)).unwrap();

    let err = scout.discover("not a url", &NullSink).await.unwrap_err();

    assert!(matches!(err, ScoutError::Url(UrlError::Parse { .. })));
}

#[tokio::test]
async fn test_concurrent_discoveries_share_scout() {
    let server = MockServer::start().await;
    let entry = mount_job_page(&server).await;
    mount_page(&server, ROOT, listing(&["e2e/"])).await;
    mount_page(&server, &format!("{}e2e/", ROOT), listing(&["must-gather.tar"])).await;

    let scout = std::sync::Arc::new(Scout::new(create_test_config(&server)).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scout = scout.clone();
            let entry = entry.clone();
            tokio::spawn(async move { scout.discover(&entry, &NullSink).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.len(), 1);
    }
}

#[tokio::test]
async fn test_verify_archive_rejects_missing() {
    let server = MockServer::start().await;
    let scout = Scout::new(create_test_config(&server)).unwrap();

    let url = format!("{}/bucket/must-gather.tar", server.uri());
    let err = verify_archive(&build_archive_client(&scout.config().http).unwrap(), &url)
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::InvalidArchive { .. }));
}

#[tokio::test]
async fn test_verify_archive_accepts_non_empty() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/bucket/must-gather.tar"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", "1024")
                .set_body_bytes(vec![0u8; 1024]),
        )
        .mount(&server)
        .await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let url = format!("{}/bucket/must-gather.tar", server.uri());
    let info = verify_archive(&build_archive_client(&scout.config().http).unwrap(), &url)
        .await
        .unwrap();

    assert_eq!(info.content_length, 1024);
}

#[tokio::test]
async fn test_verify_archive_keeps_length_of_encoded_object() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/bucket/must-gather.tar"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .insert_header("content-length", "2048")
                .set_body_bytes(vec![0u8; 2048]),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let client = build_archive_client(&config.http).unwrap();
    let url = format!("{}/bucket/must-gather.tar", server.uri());
    let info = verify_archive(&client, &url).await.unwrap();

    assert_eq!(info.content_length, 2048);
}

#[tokio::test]
async fn test_artifacts_link_with_query_is_crawled() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/job/7",
        listing(&["/gcs/bucket/logs/job/7/artifacts/?sort=name"]),
    )
    .await;
    mount_page(&server, "/gcs/bucket/logs/job/7/artifacts/", listing(&["e2e/"])).await;
    mount_page(
        &server,
        "/gcs/bucket/logs/job/7/artifacts/e2e/",
        listing(&["must-gather.tar"]),
    )
    .await;

    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/job/7", server.uri());
    let result = scout.discover(&entry, &NullSink).await.unwrap();

    assert_eq!(
        result.matched_urls,
        vec![storage_url("/gcs/bucket/logs/job/7/artifacts/e2e/must-gather.tar")]
    );
}

#[tokio::test]
async fn test_direct_archive_reports_resolution_start() {
    let server = MockServer::start().await;
    let scout = Scout::new(create_test_config(&server)).unwrap();
    let entry = format!("{}/gcs/bucket/logs/job/42/must-gather.tar", server.uri());

    let sink = RecordingSink::new();
    scout.discover(&entry, &sink).await.unwrap();

    let messages = sink.messages();
    assert!(messages[0].starts_with("Resolving artifacts directory from"));
    assert!(messages
        .last()
        .unwrap()
        .starts_with("Found archive at https://storage.example.com/"));
}
