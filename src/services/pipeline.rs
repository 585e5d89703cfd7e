use std::{collections::HashSet, sync::Arc};

use tokio::sync::Semaphore;

use crate::{
    dal::{InsertOutcome, LeadStore},
    domain::{build_lead_search_query, parse_raw_result, EnrichedLead, Lead, StepOutcome},
};

use super::{Enricher, SearchProvider};

/// Scrapes one batch of leads and runs the enrichment cascade over it.
///
/// Results come back in input order. Leads already present in the store are
/// skipped and left out of the returned list.
pub struct LeadPipeline {
    search: Arc<dyn SearchProvider>,
    enricher: Arc<Enricher>,
    store: Arc<dyn LeadStore>,
    lead_result_count: u32,
    max_workers: usize,
}

impl LeadPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        enricher: Arc<Enricher>,
        store: Arc<dyn LeadStore>,
        lead_result_count: u32,
        max_workers: usize,
    ) -> Self {
        LeadPipeline {
            search,
            enricher,
            store,
            lead_result_count,
            max_workers: max_workers.max(1),
        }
    }

    pub async fn scrape_leads(&self, role: &str, industry: &str) -> Vec<Lead> {
        log::info!("Scraping LinkedIn for {} in {}", role, industry);
        let query = build_lead_search_query(role, industry);

        let hits = match self.search.search(&query, self.lead_result_count).await {
            StepOutcome::Found(hits) => hits,
            StepOutcome::Empty => vec![],
            StepOutcome::Failed(reason) => {
                log::warn!("Lead search failed: {}", reason);
                vec![]
            }
        };

        let leads: Vec<Lead> = hits
            .iter()
            .filter_map(|hit| parse_raw_result(hit, role))
            .collect();
        log::info!("Parsed {} leads out of {} results", leads.len(), hits.len());

        leads
    }

    pub async fn process_job(&self, role: &str, industry: &str) -> Vec<EnrichedLead> {
        let leads = self.scrape_leads(role, industry).await;
        self.enrich_leads(leads).await
    }

    pub async fn enrich_leads(&self, leads: Vec<Lead>) -> Vec<EnrichedLead> {
        let leads = dedup_by_url(leads);
        if leads.is_empty() {
            return vec![];
        }

        let workers = Arc::new(Semaphore::new(self.max_workers));
        let handles: Vec<_> = leads
            .into_iter()
            .map(|lead| {
                let workers = workers.clone();
                let enricher = self.enricher.clone();
                let store = self.store.clone();

                tokio::spawn(async move {
                    let _permit = workers.acquire_owned().await.ok()?;
                    process_lead(enricher, store, lead).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Some(enriched)) => results.push(enriched),
                Ok(None) => {}
                Err(e) => log::error!("Lead enrichment task died: {:?}", e),
            }
        }

        log::info!("Enriched {} new leads", results.len());
        results
    }
}

/// Keeps the first lead for every url.
fn dedup_by_url(leads: Vec<Lead>) -> Vec<Lead> {
    let mut seen_urls = HashSet::new();
    leads
        .into_iter()
        .filter(|lead| seen_urls.insert(lead.url.clone()))
        .collect()
}

async fn process_lead(
    enricher: Arc<Enricher>,
    store: Arc<dyn LeadStore>,
    lead: Lead,
) -> Option<EnrichedLead> {
    match store.lead_exists(&lead.url).await {
        Ok(true) => {
            log::info!("Skipping already stored lead: {}", lead.url);
            return None;
        }
        Ok(false) => {}
        Err(e) => log::warn!("Could not check store for {}: {:?}", lead.url, e),
    }

    let enriched = enricher.enrich(&lead).await;

    match store.insert_lead(&enriched).await {
        Ok(InsertOutcome::Inserted) => Some(enriched),
        Ok(InsertOutcome::AlreadyPresent) => {
            log::info!("Lead stored concurrently by another job: {}", lead.url);
            None
        }
        Err(e) => {
            log::error!("Error inserting lead in db: {:?}", e);
            Some(enriched)
        }
    }
}
