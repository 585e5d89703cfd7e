use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::EnrichedLead;

use super::lead_db::{self, LeadStats, StoredLead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

/// Dedup ledger and result table for enriched leads, keyed by `url`.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn lead_exists(&self, url: &str) -> anyhow::Result<bool>;
    async fn insert_lead(&self, lead: &EnrichedLead) -> anyhow::Result<InsertOutcome>;
    /// Newest first.
    async fn all_leads(&self) -> anyhow::Result<Vec<StoredLead>>;
    async fn lead_stats(&self) -> anyhow::Result<LeadStats>;
}

/// Every call checks out its own pooled connection; it goes back to the pool
/// when the call returns, on the error path too.
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        PgLeadStore { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn lead_exists(&self, url: &str) -> anyhow::Result<bool> {
        let mut con = self.pool.acquire().await?;
        Ok(lead_db::lead_exists(&mut con, url).await?)
    }

    async fn insert_lead(&self, lead: &EnrichedLead) -> anyhow::Result<InsertOutcome> {
        let mut con = self.pool.acquire().await?;
        match lead_db::insert_lead(&mut con, lead).await? {
            true => Ok(InsertOutcome::Inserted),
            false => Ok(InsertOutcome::AlreadyPresent),
        }
    }

    async fn all_leads(&self) -> anyhow::Result<Vec<StoredLead>> {
        let mut con = self.pool.acquire().await?;
        Ok(lead_db::get_leads(&mut con).await?)
    }

    async fn lead_stats(&self) -> anyhow::Result<LeadStats> {
        let mut con = self.pool.acquire().await?;
        Ok(lead_db::get_lead_stats(&mut con).await?)
    }
}

/// Process-local store with the same uniqueness rule as the leads table.
#[derive(Default)]
pub struct MemoryLeadStore {
    rows: Mutex<Vec<StoredLead>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls(urls: &[&str]) -> Self {
        let rows = urls
            .iter()
            .map(|url| StoredLead {
                name: String::new(),
                role: String::new(),
                company: String::new(),
                url: url.to_string(),
                email: None,
                status: "NotFound".to_string(),
                intent: "COLD".to_string(),
            })
            .collect();
        MemoryLeadStore {
            rows: Mutex::new(rows),
        }
    }

    fn rows(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Vec<StoredLead>>> {
        self.rows
            .lock()
            .map_err(|_| anyhow::anyhow!("memory lead store lock poisoned"))
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn lead_exists(&self, url: &str) -> anyhow::Result<bool> {
        Ok(self.rows()?.iter().any(|row| row.url == url))
    }

    async fn insert_lead(&self, lead: &EnrichedLead) -> anyhow::Result<InsertOutcome> {
        let mut rows = self.rows()?;
        if rows.iter().any(|row| row.url == lead.url) {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        rows.push(StoredLead::from(lead));
        Ok(InsertOutcome::Inserted)
    }

    async fn all_leads(&self) -> anyhow::Result<Vec<StoredLead>> {
        Ok(self.rows()?.iter().rev().cloned().collect())
    }

    async fn lead_stats(&self) -> anyhow::Result<LeadStats> {
        let rows = self.rows()?;
        let with_email = rows.iter().filter(|row| row.email.is_some()).count();
        Ok(LeadStats::new(rows.len() as i64, with_email as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailStatus, Intent};

    fn lead(url: &str, email: Option<&str>) -> EnrichedLead {
        EnrichedLead {
            name: "Jane Doe".to_string(),
            role: "CTO".to_string(),
            company: "Acme".to_string(),
            email: email.map(|e| e.to_string()),
            status: EmailStatus::Verified,
            intent: Intent::Cold,
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn second_insert_of_same_url_is_already_present() {
        let store = MemoryLeadStore::new();
        let first = store.insert_lead(&lead("u1", Some("a@acme.com"))).await.unwrap();
        let second = store.insert_lead(&lead("u1", None)).await.unwrap();

        assert_eq!(first, InsertOutcome::Inserted);
        assert_eq!(second, InsertOutcome::AlreadyPresent);
        assert_eq!(store.all_leads().await.unwrap().len(), 1);
        assert_eq!(
            store.all_leads().await.unwrap()[0].email.as_deref(),
            Some("a@acme.com")
        );
    }

    #[tokio::test]
    async fn newest_first_and_stats() {
        let store = MemoryLeadStore::new();
        store.insert_lead(&lead("u1", Some("a@acme.com"))).await.unwrap();
        store.insert_lead(&lead("u2", None)).await.unwrap();

        let urls: Vec<String> = store
            .all_leads()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.url)
            .collect();
        assert_eq!(urls, vec!["u2", "u1"]);

        let stats = store.lead_stats().await.unwrap();
        assert_eq!(stats, LeadStats::new(2, 1));
        assert_eq!(stats.success_rate, 50);
    }
}
