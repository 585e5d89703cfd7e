use std::time::Duration;

use leadhunt::{
    configuration::CrawlerSettings,
    domain::StepOutcome,
    services::{HttpPageFetcher, PageFetcher},
};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn settings() -> CrawlerSettings {
    CrawlerSettings {
        page_timeout_secs: 1,
        user_agent: "leadhunt-test".to_string(),
        ..CrawlerSettings::default()
    }
}

#[tokio::test]
async fn fetches_page_with_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .and(header("user-agent", "leadhunt-test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>jane.doe@acme.com</p>")
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(&settings()).unwrap();
    let outcome = fetcher.fetch_page(&format!("{}/contact", server.uri())).await;

    assert_eq!(outcome, StepOutcome::Found("<p>jane.doe@acme.com</p>".to_string()));
}

#[tokio::test]
async fn non_success_status_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(&settings()).unwrap();
    let outcome = fetcher.fetch_page(&format!("{}/team", server.uri())).await;

    assert!(matches!(outcome, StepOutcome::Failed(_)));
}

#[tokio::test]
async fn slow_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(&settings()).unwrap();
    let outcome = fetcher.fetch_page(&server.uri()).await;

    assert!(matches!(outcome, StepOutcome::Failed(_)));
}
