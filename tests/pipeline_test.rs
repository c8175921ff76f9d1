//! End-to-end pipeline behaviour against a scripted engine

mod common;

use common::{MockEngine, request, sample_result, service_with};
use crawl_service::{CacheMode, ContentFilter, CrawlError, RawCrawlResult};
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn successful_crawl_maps_the_engine_result() {
    let (service, stats) = service_with(MockEngine::succeeding());

    let resp = service.crawl(request("https://example.com")).await;

    assert!(resp.success);
    assert!(resp.error_message.is_none());
    assert_eq!(resp.markdown, "# Example Domain");
    assert_eq!(resp.metadata["title"], json!("Example Domain"));
    assert_eq!(resp.screenshot_base64.as_deref(), Some("iVBORw0KGgo="));
    assert!(resp.extracted_content.is_none());
    assert_eq!(stats.launches.load(Ordering::SeqCst), 1);
    assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
    assert_eq!(service.gate().in_flight(), 0);
}

#[tokio::test]
async fn default_request_runs_with_pruning_and_no_extraction() {
    let (service, stats) = service_with(MockEngine::succeeding());

    service.crawl(request("https://example.com")).await;

    let config = stats.last_run_config.lock().clone().expect("engine ran");
    assert_eq!(config.cache_mode, CacheMode::Bypass);
    assert!(config.screenshot);
    assert_eq!(config.word_count_threshold, 10);
    assert!(matches!(config.content_filter, Some(ContentFilter::Pruning(_))));
    assert!(config.extraction_strategy.is_none());
}

#[tokio::test]
async fn long_html_is_cut_to_five_hundred_characters() {
    let (service, _) = service_with(MockEngine::new(|url, _| {
        Ok(RawCrawlResult {
            html: Some("a".repeat(1000)),
            ..sample_result(url)
        })
    }));

    let resp = service.crawl(request("https://example.com")).await;

    let html = resp.html.expect("html on success");
    assert_eq!(html.chars().count(), 500);
    assert!(html.chars().all(|c| c == 'a'));
}

#[tokio::test]
async fn structured_extraction_is_pretty_printed() {
    let (service, stats) = service_with(MockEngine::new(|url, _| {
        Ok(RawCrawlResult {
            extracted_content: Some(json!({ "items": [{ "index": 0, "content": { "title": "Example Domain" } }] })),
            ..sample_result(url)
        })
    }));

    let mut req = request("https://example.com");
    req.instruction = Some("extract page title".into());
    req.api_token = Some("sk-request".into());
    let resp = service.crawl(req).await;

    let extracted = resp.extracted_content.expect("extracted content");
    let parsed: serde_json::Value = serde_json::from_str(&extracted).expect("valid json");
    assert_eq!(parsed[0]["content"]["title"], json!("Example Domain"));

    let config = stats.last_run_config.lock().clone().expect("engine ran");
    let strategy = config.extraction_strategy.expect("strategy attached");
    assert_eq!(strategy.api_token, "sk-request");
}

#[tokio::test]
async fn missing_credential_fails_at_execution_not_configuration() {
    let (service, stats) = service_with(MockEngine::new(|_, config| {
        let strategy = config
            .extraction_strategy
            .as_ref()
            .expect("strategy is built even without a credential");
        assert!(strategy.uses_sentinel_token());
        Err(CrawlError::Extraction(
            "provider returned 401 Unauthorized: invalid api key".into(),
        ))
    }));

    let mut req = request("https://example.com");
    req.instruction = Some("extract page title".into());
    let resp = service.crawl(req).await;

    assert!(!resp.success);
    let message = resp.error_message.expect("error message on failure");
    assert!(message.contains("401"));
    assert_eq!(resp.markdown, "");
    assert!(resp.extracted_content.is_none());
    assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn engine_errors_produce_the_failure_shape_and_close_the_session() {
    let (service, stats) = service_with(MockEngine::new(|_, _| {
        Err(CrawlError::Execution("Page navigation timeout after 120 seconds".into()))
    }));

    let resp = service.crawl(request("https://slow.example.com")).await;

    assert!(!resp.success);
    assert_eq!(
        resp.error_message.as_deref(),
        Some("Execution error: Page navigation timeout after 120 seconds")
    );
    assert_eq!(resp.markdown, "");
    assert!(resp.html.is_none());
    assert!(resp.screenshot_base64.is_none());
    assert!(resp.metadata.is_empty());
    assert!(resp.extracted_content.is_none());
    assert_eq!(stats.launches.load(Ordering::SeqCst), 1);
    assert_eq!(stats.closes.load(Ordering::SeqCst), 1);
    assert_eq!(service.gate().in_flight(), 0);
}

#[tokio::test]
async fn reported_engine_failures_keep_their_message() {
    let (service, _) = service_with(MockEngine::new(|url, _| {
        Ok(RawCrawlResult {
            success: false,
            error_message: Some("net::ERR_NAME_NOT_RESOLVED".into()),
            ..sample_result(url)
        })
    }));

    let resp = service.crawl(request("https://nope.invalid")).await;

    assert!(!resp.success);
    assert_eq!(resp.error_message.as_deref(), Some("net::ERR_NAME_NOT_RESOLVED"));
    assert_eq!(resp.markdown, "");
    assert!(resp.screenshot_base64.is_none());
}

#[tokio::test]
async fn launch_failures_release_the_slot() {
    let (service, stats) = service_with(MockEngine::failing_launch());

    let resp = service.crawl(request("https://example.com")).await;

    assert!(!resp.success);
    assert!(resp.error_message.is_some());
    assert_eq!(stats.closes.load(Ordering::SeqCst), 0);
    assert_eq!(service.gate().in_flight(), 0);
}

#[tokio::test]
async fn smart_mode_off_disables_filtering() {
    let (service, stats) = service_with(MockEngine::succeeding());

    let mut req = request("https://example.com");
    req.smart_mode = false;
    req.bypass_cache = false;
    req.css_selector = Some("article".into());
    service.crawl(req).await;

    let config = stats.last_run_config.lock().clone().expect("engine ran");
    assert!(config.content_filter.is_none());
    assert_eq!(config.cache_mode, CacheMode::Enabled);
    assert_eq!(config.css_selector.as_deref(), Some("article"));
}
