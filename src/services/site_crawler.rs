use std::{collections::BTreeSet, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{Html, Selector};

use crate::{
    configuration::CrawlerSettings,
    domain::{
        email::{extract_emails, is_on_domain, normalize_email, pick_best_email},
        StepOutcome,
    },
};

const INVISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> StepOutcome<String>;
}

pub struct HttpPageFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(settings: &CrawlerSettings) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&settings.user_agent)?,
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(HttpPageFetcher {
            client,
            timeout: settings.page_timeout(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> StepOutcome<String> {
        let res = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(res) => res,
            Err(e) => {
                log::warn!("Failed to fetch {}: {:?}", url, e);
                return StepOutcome::failed(e);
            }
        };

        if !res.status().is_success() {
            log::debug!("Skipping {} with status {}", url, res.status());
            return StepOutcome::failed(format!("status {}", res.status()));
        }

        match res.text().await {
            Ok(body) if body.trim().is_empty() => StepOutcome::Empty,
            Ok(body) => StepOutcome::Found(body),
            Err(e) => {
                log::warn!("Failed to read body of {}: {:?}", url, e);
                StepOutcome::failed(e)
            }
        }
    }
}

/// Email addresses in the visible text and `mailto:` links of an html page.
pub fn page_emails(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let text = document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name().to_string()))
                .is_some_and(|name| INVISIBLE_ELEMENTS.contains(&name.as_str()));
            match hidden {
                true => None,
                false => Some(text.trim().to_string()),
            }
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<String>>()
        .join(" ");

    let mut emails = extract_emails(&text);

    let mailto_selector = Selector::parse(r#"a[href^="mailto:"]"#).unwrap();
    for tag in document.select(&mailto_selector) {
        let Some(href) = tag.value().attr("href") else {
            continue;
        };
        let address = href
            .trim_start_matches("mailto:")
            .split('?')
            .next()
            .unwrap_or_default();
        let address = normalize_email(address);
        if address.contains('@') && !emails.contains(&address) {
            emails.push(address);
        }
    }

    emails
}

pub struct SiteCrawler {
    fetcher: Arc<dyn PageFetcher>,
    scheme: String,
    paths: Vec<String>,
}

impl SiteCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: &CrawlerSettings) -> Self {
        SiteCrawler {
            fetcher,
            scheme: settings.scheme.clone(),
            paths: settings.paths.clone(),
        }
    }

    fn page_url(&self, domain: &str, path: &str) -> String {
        match path.is_empty() || path.starts_with('/') {
            true => format!("{}://{}{}", self.scheme, domain, path),
            false => format!("{}://{}/{}", self.scheme, domain, path),
        }
    }

    /// On-domain addresses found across the configured paths.
    pub async fn collect_candidates(&self, domain: &str) -> BTreeSet<String> {
        let mut found_emails = BTreeSet::new();

        for path in self.paths.iter() {
            let url = self.page_url(domain, path);
            let html = match self.fetcher.fetch_page(&url).await {
                StepOutcome::Found(html) => html,
                StepOutcome::Empty | StepOutcome::Failed(_) => continue,
            };

            for email in page_emails(&html) {
                if is_on_domain(&email, domain) {
                    found_emails.insert(email);
                }
            }
        }

        found_emails
    }

    /// Best address for `full_name` on `domain`, if the site exposes any.
    pub async fn crawl(&self, domain: &str, full_name: &str) -> StepOutcome<String> {
        log::info!("Crawling {} for contact info", domain);

        let candidates = self.collect_candidates(domain).await;
        if candidates.is_empty() {
            return StepOutcome::Empty;
        }
        log::info!("Found {} raw emails on {}", candidates.len(), domain);

        pick_best_email(&candidates, full_name).into()
    }
}
