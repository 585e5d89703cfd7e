mod common;

use common::{mount_search, search_settings, TEST_API_KEY};
use leadhunt::{
    domain::StepOutcome,
    services::{SearchProvider, SerperClient},
};
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn sends_query_and_returns_organic_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(serde_json::json!({ "q": "Acme official site", "num": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "organic": [
                { "title": "Acme", "link": "https://www.acme.com", "snippet": "Acme Corp home" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SerperClient::new(&search_settings(&server), TEST_API_KEY.to_string());
    let hits = client.search("Acme official site", 1).await.into_option().unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].link, "https://www.acme.com");
    assert_eq!(hits[0].snippet, "Acme Corp home");
}

#[tokio::test]
async fn hits_with_missing_fields_get_defaults() {
    let server = MockServer::start().await;
    mount_search(&server, 10, serde_json::json!([{ "link": "https://linkedin.com/in/x" }])).await;

    let client = SerperClient::new(&search_settings(&server), TEST_API_KEY.to_string());
    let hits = client.search("q", 10).await.into_option().unwrap();

    assert_eq!(hits[0].title, "");
    assert_eq!(hits[0].link, "https://linkedin.com/in/x");
}

#[tokio::test]
async fn response_without_results_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "credits": 1 })),
        )
        .mount(&server)
        .await;

    let client = SerperClient::new(&search_settings(&server), TEST_API_KEY.to_string());
    assert_eq!(client.search("q", 10).await, StepOutcome::Empty);
}

#[tokio::test]
async fn error_status_is_a_soft_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = SerperClient::new(&search_settings(&server), "wrong-key".to_string());
    let outcome = client.search("q", 10).await;

    assert!(matches!(outcome, StepOutcome::Failed(_)));
    assert_eq!(outcome.into_option(), None);
}

#[tokio::test]
async fn garbage_body_is_a_soft_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = SerperClient::new(&search_settings(&server), TEST_API_KEY.to_string());
    assert!(matches!(client.search("q", 10).await, StepOutcome::Failed(_)));
}
