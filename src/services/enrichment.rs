use std::sync::Arc;

use crate::domain::{
    classify_intent, email::heuristic_guess, EmailStatus, EnrichedLead, Lead, StepOutcome,
    UNKNOWN_COMPANY,
};

use super::{has_mail_exchange, DomainResolver, MxLookup, SiteCrawler};

/// Where a cascade stopped without producing an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadEnd {
    UnknownCompany,
    NoDomain,
    NoMailExchange,
    NoGuess,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HuntOutcome {
    Crawled { domain: String, email: String },
    Guessed { domain: String, email: String },
    NotFound(DeadEnd),
}

impl HuntOutcome {
    pub fn email(&self) -> Option<&str> {
        match self {
            HuntOutcome::Crawled { email, .. } | HuntOutcome::Guessed { email, .. } => {
                Some(email.as_str())
            }
            HuntOutcome::NotFound(_) => None,
        }
    }

    pub fn status(&self) -> EmailStatus {
        match self {
            HuntOutcome::Crawled { .. } => EmailStatus::Verified,
            HuntOutcome::Guessed { .. } => EmailStatus::Guessed,
            HuntOutcome::NotFound(_) => EmailStatus::NotFound,
        }
    }
}

pub struct Enricher {
    resolver: DomainResolver,
    mx_lookup: Arc<dyn MxLookup>,
    crawler: SiteCrawler,
    hiring_keyword: String,
}

impl Enricher {
    pub fn new(
        resolver: DomainResolver,
        mx_lookup: Arc<dyn MxLookup>,
        crawler: SiteCrawler,
        hiring_keyword: String,
    ) -> Self {
        Enricher {
            resolver,
            mx_lookup,
            crawler,
            hiring_keyword,
        }
    }

    /// domain -> MX -> crawl -> guess. Stops at the first address found; a
    /// guess is only attempted against a mail-capable domain.
    pub async fn hunt(&self, name: &str, company: &str) -> HuntOutcome {
        if company.trim() == UNKNOWN_COMPANY {
            return HuntOutcome::NotFound(DeadEnd::UnknownCompany);
        }

        let domain = match self.resolver.resolve(company).await {
            StepOutcome::Found(domain) => domain,
            StepOutcome::Empty | StepOutcome::Failed(_) => {
                log::info!("No domain found for company: {}", company);
                return HuntOutcome::NotFound(DeadEnd::NoDomain);
            }
        };

        if !has_mail_exchange(self.mx_lookup.as_ref(), &domain).await {
            log::warn!("Domain {} has no mail servers", domain);
            return HuntOutcome::NotFound(DeadEnd::NoMailExchange);
        }

        if let StepOutcome::Found(email) = self.crawler.crawl(&domain, name).await {
            return HuntOutcome::Crawled { domain, email };
        }

        log::info!("Crawl of {} found nothing for {}, guessing format", domain, name);
        match heuristic_guess(name, &domain) {
            Some(email) => HuntOutcome::Guessed { domain, email },
            None => HuntOutcome::NotFound(DeadEnd::NoGuess),
        }
    }

    pub async fn enrich(&self, lead: &Lead) -> EnrichedLead {
        let outcome = self.hunt(&lead.name, &lead.company).await;
        let intent = classify_intent(&lead.snippet, &self.hiring_keyword);

        EnrichedLead::from_lead(
            lead,
            outcome.email().map(|e| e.to_string()),
            outcome.status(),
            intent,
        )
    }
}
