#![allow(dead_code)]

use async_trait::async_trait;
use leadhunt::{
    configuration::SearchSettings,
    domain::StepOutcome,
    services::{MxLookup, PageFetcher},
};
use serde_json::Value;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_API_KEY: &str = "test-key";

pub fn search_settings(server: &MockServer) -> SearchSettings {
    SearchSettings {
        url: format!("{}/search", server.uri()),
        lead_result_count: 10,
        timeout_secs: 2,
    }
}

/// Answers searches asking for `num` results with `organic` hits.
pub async fn mount_search(server: &MockServer, num: u32, organic: Value) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("X-API-KEY", TEST_API_KEY))
        .and(body_partial_json(serde_json::json!({ "num": num })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "organic": organic
        })))
        .mount(server)
        .await;
}

/// Every domain has a mail exchange.
pub struct AlwaysMx;

#[async_trait]
impl MxLookup for AlwaysMx {
    async fn mail_exchanges(&self, domain: &str) -> StepOutcome<Vec<String>> {
        StepOutcome::Found(vec![format!("mx.{}", domain)])
    }
}

/// No site is reachable.
pub struct DeadSite;

#[async_trait]
impl PageFetcher for DeadSite {
    async fn fetch_page(&self, _: &str) -> StepOutcome<String> {
        StepOutcome::failed("connection refused")
    }
}
