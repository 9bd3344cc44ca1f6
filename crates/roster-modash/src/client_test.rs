use serde_json::json;

use super::*;

fn test_client(base_url: &str) -> ModashClient {
    ModashClient::with_base_url("test-key", base_url, 5, "roster-test/0.1", 0, 0)
        .expect("client construction should not fail")
}

#[test]
fn media_url_appends_endpoint_and_encodes_post_url() {
    let client = test_client("https://api.modash.io/v1");
    let url = client
        .media_url(Platform::Instagram, "https://www.instagram.com/p/abc/?igsh=1")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.modash.io/v1/raw/ig/post-info?url=https%3A%2F%2Fwww.instagram.com%2Fp%2Fabc%2F%3Figsh%3D1"
    );
}

#[test]
fn media_url_tolerates_trailing_slash_on_base() {
    let client = test_client("https://api.modash.io/v1/");
    let url = client
        .media_url(Platform::TikTok, "https://www.tiktok.com/@a/video/1")
        .unwrap();
    assert!(url
        .as_str()
        .starts_with("https://api.modash.io/v1/raw/tiktok/media-info?url="));
}

#[test]
fn each_platform_has_its_own_endpoint() {
    assert_eq!(media_endpoint(Platform::Instagram), "raw/ig/post-info");
    assert_eq!(media_endpoint(Platform::TikTok), "raw/tiktok/media-info");
    assert_eq!(media_endpoint(Platform::YouTube), "raw/youtube/video-info");
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = ModashClient::with_base_url("k", "not a url", 5, "ua", 0, 0);
    assert!(matches!(result, Err(ModashError::InvalidBaseUrl { .. })));
}

#[test]
fn error_true_with_message_is_provider_error() {
    let body = json!({ "error": true, "message": "Post not available" });
    let err = check_provider_error(&body).unwrap_err();
    assert!(matches!(err, ModashError::Provider(ref m) if m == "Post not available"));
}

#[test]
fn error_string_is_provider_error() {
    let body = json!({ "error": "unsupported url" });
    let err = check_provider_error(&body).unwrap_err();
    assert!(matches!(err, ModashError::Provider(ref m) if m == "unsupported url"));
}

#[test]
fn error_object_uses_nested_message() {
    let body = json!({ "error": { "code": 42, "message": "quota" } });
    let err = check_provider_error(&body).unwrap_err();
    assert!(matches!(err, ModashError::Provider(ref m) if m == "quota"));
}

#[test]
fn falsy_error_fields_are_success() {
    assert!(check_provider_error(&json!({ "error": false, "items": [] })).is_ok());
    assert!(check_provider_error(&json!({ "error": null })).is_ok());
    assert!(check_provider_error(&json!({ "error": "" })).is_ok());
    assert!(check_provider_error(&json!({ "stats": {} })).is_ok());
}

#[test]
fn from_app_config_requires_api_key() {
    let config = AppConfig {
        database_url: "postgres://localhost/roster".to_string(),
        env: roster_core::Environment::Test,
        bind_addr: "127.0.0.1:3000".parse().unwrap(),
        log_level: "info".to_string(),
        modash_api_key: None,
        modash_base_url: DEFAULT_BASE_URL.to_string(),
        modash_request_timeout_secs: 30,
        modash_user_agent: "ua".to_string(),
        modash_max_retries: 0,
        modash_retry_backoff_base_secs: 0,
        db_max_connections: 1,
        db_min_connections: 1,
        db_acquire_timeout_secs: 1,
        analytics_link_timeout_secs: 1,
        analytics_max_concurrent_links: 1,
        analytics_inter_request_delay_ms: 0,
    };
    assert!(matches!(
        ModashClient::from_app_config(&config),
        Err(ModashError::MissingApiKey)
    ));
}
