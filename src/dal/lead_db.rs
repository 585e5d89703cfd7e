use serde::Serialize;
use sqlx::PgConnection;

use crate::domain::EnrichedLead;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredLead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub url: String,
    pub email: Option<String>,
    pub status: String,
    pub intent: String,
}

impl From<&EnrichedLead> for StoredLead {
    fn from(value: &EnrichedLead) -> Self {
        StoredLead {
            name: value.name.clone(),
            role: value.role.clone(),
            company: value.company.clone(),
            url: value.url.clone(),
            email: value.email.clone(),
            status: value.status.to_string(),
            intent: value.intent.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadStats {
    pub total: i64,
    pub with_email: i64,
    /// Whole percent of stored leads that carry an email.
    pub success_rate: i64,
}

impl LeadStats {
    pub fn new(total: i64, with_email: i64) -> Self {
        let success_rate = match total > 0 {
            true => with_email * 100 / total,
            false => 0,
        };
        LeadStats {
            total,
            with_email,
            success_rate,
        }
    }
}

pub async fn lead_exists(con: &mut PgConnection, url: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r"
        select exists(
            select 1 from leads where url = $1
        )
        ",
    )
    .bind(url)
    .fetch_one(&mut *con)
    .await
}

/// Returns false when a row with the same url already exists.
pub async fn insert_lead(con: &mut PgConnection, lead: &EnrichedLead) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r"
        insert into leads
            (name, role, company, url, email, status, intent)
        values
            ($1, $2, $3, $4, $5, $6, $7)
        on conflict (url) do nothing
        ",
    )
    .bind(&lead.name)
    .bind(&lead.role)
    .bind(&lead.company)
    .bind(&lead.url)
    .bind(&lead.email)
    .bind(lead.status.as_str())
    .bind(lead.intent.as_str())
    .execute(&mut *con)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_leads(con: &mut PgConnection) -> Result<Vec<StoredLead>, sqlx::Error> {
    sqlx::query_as::<_, StoredLead>(
        r"
        select
            name, role, company, url, email, status, intent
        from
            leads
        order by id desc
        ",
    )
    .fetch_all(&mut *con)
    .await
}

pub async fn get_lead_stats(con: &mut PgConnection) -> Result<LeadStats, sqlx::Error> {
    let (total, with_email) = sqlx::query_as::<_, (i64, i64)>(
        r"
        select
            count(*) as total,
            count(email) as with_email
        from
            leads
        ",
    )
    .fetch_one(&mut *con)
    .await?;

    Ok(LeadStats::new(total, with_email))
}

#[cfg(test)]
mod tests {
    use super::LeadStats;

    #[test]
    fn success_rate_is_whole_percent() {
        assert_eq!(LeadStats::new(3, 2).success_rate, 66);
        assert_eq!(LeadStats::new(0, 0).success_rate, 0);
        assert_eq!(LeadStats::new(4, 4).success_rate, 100);
    }
}
