use std::fmt;

use serde::{Deserialize, Serialize};

use super::lead::Lead;

/// How much trust the email carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailStatus {
    /// Found on the company's own site.
    Verified,
    /// Synthesized from the name, never checked.
    Guessed,
    NotFound,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Verified => "Verified",
            EmailStatus::Guessed => "Guessed",
            EmailStatus::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Hot,
    Cold,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Hot => "HOT",
            Intent::Cold => "COLD",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single keyword check on the snippet, case-insensitive.
pub fn classify_intent(snippet: &str, hiring_keyword: &str) -> Intent {
    let keyword = hiring_keyword.trim().to_lowercase();
    match !keyword.is_empty() && snippet.to_lowercase().contains(&keyword) {
        true => Intent::Hot,
        false => Intent::Cold,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub email: Option<String>,
    pub status: EmailStatus,
    pub intent: Intent,
    pub url: String,
}

impl EnrichedLead {
    pub fn from_lead(lead: &Lead, email: Option<String>, status: EmailStatus, intent: Intent) -> Self {
        EnrichedLead {
            name: lead.name.clone(),
            role: lead.role.clone(),
            company: lead.company.clone(),
            email,
            status,
            intent,
            url: lead.url.clone(),
        }
    }
}
