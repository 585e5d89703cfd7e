use std::sync::Arc;

use url::Url;

use crate::domain::{StepOutcome, UNKNOWN_COMPANY};

use super::SearchProvider;

pub struct DomainResolver {
    search: Arc<dyn SearchProvider>,
}

pub fn build_company_domain_query(company: &str) -> String {
    format!("{} official site", company)
}

/// Bare host of a link, lower-cased and without `www.`.
pub fn extract_domain_from_url(link: &str) -> Option<String> {
    let parsed_url = Url::parse(link).ok()?;
    match parsed_url.host_str() {
        Some("") | None => None,
        Some(host) => {
            let host = host.to_lowercase();
            match host.strip_prefix("www.") {
                Some(h) => Some(h.to_string()),
                None => Some(host),
            }
        }
    }
}

impl DomainResolver {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        DomainResolver { search }
    }

    /// Takes the top hit for "<company> official site". Never disambiguates
    /// between companies sharing a name.
    pub async fn resolve(&self, company: &str) -> StepOutcome<String> {
        let company = company.trim();
        if company.is_empty() || company == UNKNOWN_COMPANY {
            return StepOutcome::Empty;
        }

        log::info!("Resolving domain for: {}", company);
        let query = build_company_domain_query(company);

        self.search.search(&query, 1).await.and_then(|hits| {
            StepOutcome::from(
                hits.first()
                    .and_then(|hit| extract_domain_from_url(&hit.link)),
            )
        })
    }
}
