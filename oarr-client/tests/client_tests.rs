use oarr_client::{ClientConfig, ClientError, OarrClient};
use oarr_model::{canonicalize_url, CanonicalRecord, IncomingRecord, Register, TextField};
use oarr_reconcile::{RecordStore, StoreError};
use oarr_types::RecordId;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, api_key: Option<&str>) -> OarrClient {
    OarrClient::new(ClientConfig {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
        ..Default::default()
    })
    .unwrap()
}

fn stored(id: &str, url: &str) -> Value {
    json!({
        "id": id,
        "register": {
            "metadata": [{"lang": "en", "default": true, "record": {"url": url, "name": "Repo"}}]
        }
    })
}

fn record(url: &str) -> CanonicalRecord {
    let mut register = Register::default();
    register.set_text(TextField::Url, url, None);
    CanonicalRecord::from(IncomingRecord {
        register,
        ..Default::default()
    })
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn config_default() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.api_key, None);
    assert_eq!(cfg.timeout_secs, 30);
}

#[test]
fn config_deserialize_fills_defaults() {
    let cfg: ClientConfig = serde_json::from_value(json!({"base_url": "http://oarr.test/api"})).unwrap();
    assert_eq!(cfg.timeout_secs, 30);
    assert_eq!(cfg.api_key, None);
}

#[test]
fn base_url_gets_trailing_slash() {
    let client = OarrClient::new(ClientConfig {
        base_url: "http://oarr.test/api".into(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(client.base_url(), "http://oarr.test/api/");
    assert!(!client.can_write());
}

#[test]
fn empty_base_url_is_rejected() {
    let err = OarrClient::new(ClientConfig {
        base_url: "  ".into(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

// ── Reads ───────────────────────────────────────────────────────

#[tokio::test]
async fn get_record_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/record/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored("abc", "http://repo.org")))
        .mount(&server)
        .await;

    let found = client(&server, None)
        .get_record(&RecordId::parse("abc").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id().map(RecordId::as_str), Some("abc"));
    assert_eq!(found.register.url(), Some("http://repo.org"));
}

#[tokio::test]
async fn get_missing_record_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/record/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let found = client(&server, None)
        .get_record(&RecordId::parse("nope").unwrap())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn url_lookup_sends_terms_query_and_takes_first_hit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"total": 2, "hits": [
                {"_id": "first", "_source": stored("first", "https://repo.org/")},
                {"_id": "second", "_source": stored("second", "http://repo.org")}
            ]}
        })))
        .mount(&server)
        .await;

    let variants = canonicalize_url("http://repo.org");
    let found = client(&server, None)
        .find_by_url_variants(&variants)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id().map(RecordId::as_str), Some("first"));

    let requests = server.received_requests().await.unwrap();
    let (_, source) = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "source")
        .unwrap();
    let source: Value = serde_json::from_str(&source).unwrap();
    assert_eq!(source["size"], json!(1));
    let sent: Vec<String> =
        serde_json::from_value(source["query"]["terms"]["register.metadata.record.url.exact"].clone())
            .unwrap();
    assert_eq!(sent, variants.into_iter().collect::<Vec<_>>());
}

#[tokio::test]
async fn url_lookup_without_hits_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .mount(&server)
        .await;

    let found = client(&server, None)
        .find_by_url_variants(&canonicalize_url("repo.org"))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn lookup_server_error_maps_to_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .find_by_url_variants(&canonicalize_url("repo.org"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}

// ── Writes ──────────────────────────────────────────────────────

#[tokio::test]
async fn save_new_record_posts_to_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/record"))
        .and(query_param("api_key", "secret"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true, "id": "new-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server, Some("secret"))
        .save_record(&record("http://repo.org"), None)
        .await
        .unwrap();
    assert_eq!(id.as_str(), "new-id");

    let requests = server.received_requests().await.unwrap();
    let body: CanonicalRecord = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body.register.url(), Some("http://repo.org"));
    assert!(body.id().is_none());
}

#[tokio::test]
async fn save_existing_record_posts_to_its_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/record/abc"))
        .and(query_param("api_key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let id = RecordId::parse("abc").unwrap();
    let saved = client(&server, Some("secret"))
        .save_record(&record("http://repo.org"), Some(&id))
        .await
        .unwrap();
    assert_eq!(saved, id);
}

#[tokio::test]
async fn save_without_api_key_is_refused_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, None)
        .save(&record("http://repo.org"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AuthRequired));
}

#[tokio::test]
async fn unsuccessful_save_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/record"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"success": false, "error": "bad record"})))
        .mount(&server)
        .await;

    let err = client(&server, Some("secret"))
        .save(&record("http://repo.org"), None)
        .await
        .unwrap_err();
    match err {
        ClientError::Api(msg) => assert_eq!(msg, "bad record"),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unsuccessful_save_through_store_trait_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/record"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = client(&server, Some("secret"))
        .save_record(&record("http://repo.org"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}
