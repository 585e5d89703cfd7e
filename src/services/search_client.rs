use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{header::USER_AGENT, Client};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::SearchSettings,
    domain::{RawResult, StepOutcome},
};

const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.159 Safari/537.36",
];

/// Anything that can answer a web search with organic hits.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, result_count: u32) -> StepOutcome<Vec<RawResult>>;
}

pub struct SerperClient {
    client: Client,
    api_key: String,
    url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Option<Vec<RawResult>>,
}

impl SerperClient {
    pub fn new(settings: &SearchSettings, api_key: String) -> Self {
        SerperClient {
            client: Client::new(),
            api_key,
            url: settings.url.clone(),
            timeout: settings.timeout(),
        }
    }
}

fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str, result_count: u32) -> StepOutcome<Vec<RawResult>> {
        let res = self
            .client
            .post(&self.url)
            .header("X-API-KEY", &self.api_key)
            .header(USER_AGENT, random_user_agent())
            .json(&SearchQuery {
                q: query,
                num: result_count,
            })
            .timeout(self.timeout)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(e) => {
                log::warn!("No response from search api on query {}: {:?}", query, e);
                return StepOutcome::failed(e);
            }
        };

        if !res.status().is_success() {
            log::warn!(
                "Search api answered {} on query: {}",
                res.status(),
                query
            );
            return StepOutcome::failed(format!("search api status {}", res.status()));
        }

        match res.json::<SearchResponse>().await {
            Ok(SearchResponse {
                organic: Some(hits),
            }) if !hits.is_empty() => {
                log::info!("Found {} results on query: {}", hits.len(), query);
                StepOutcome::Found(hits)
            }
            Ok(_) => {
                log::info!("Found no results on query: {}", query);
                StepOutcome::Empty
            }
            Err(e) => {
                log::warn!("Error when deserializing search response: {:?}", e);
                StepOutcome::failed(e)
            }
        }
    }
}
