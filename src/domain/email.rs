use std::{collections::BTreeSet, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;

const FIRST_NAME_SCORE: i32 = 50;
const LAST_NAME_SCORE: i32 = 50;
const GENERIC_PENALTY: i32 = -10;

const GENERIC_MAILBOXES: [&str; 9] = [
    "info", "contact", "hello", "sales", "support", "office", "admin", "enquiries", "inquiries",
];

// Accepts "name@domain.com", "name (at) domain.com" and "name [at] domain.com".
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+(?:\s*[\[(]\s*at\s*[\])]\s*|\s*@\s*)[a-z0-9.-]+\.[a-z]{2,}")
        .expect("valid email regex")
});
static AT_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\[(]\s*at\s*[\])]\s*|\s*@\s*").expect("valid separator regex")
});

/// Lower-cases an address and turns obfuscated separators back into `@`.
pub fn normalize_email(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    AT_SEPARATOR
        .replace_all(&lower, "@")
        .trim_end_matches('.')
        .to_string()
}

/// All email-like substrings in `text`, normalized, first occurrence order.
pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL_PATTERN
        .find_iter(text)
        .map(|m| normalize_email(m.as_str()))
        .filter(|email| email.matches('@').count() == 1)
        .unique()
        .collect()
}

pub fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

fn local_part(email: &str) -> &str {
    email.split_once('@').map(|(local, _)| local).unwrap_or(email)
}

/// True when the address lives on `domain` or one of its subdomains.
pub fn is_on_domain(email: &str, domain: &str) -> bool {
    let domain = domain.to_lowercase();
    match email_domain(email) {
        Some(host) => host == domain || host.ends_with(&format!(".{}", domain)),
        None => false,
    }
}

pub fn is_generic_mailbox(email: &str) -> bool {
    let local = local_part(email);
    GENERIC_MAILBOXES.iter().any(|generic| local.contains(generic))
}

/// Lower-cased name pieces with punctuation removed.
pub fn name_tokens(full_name: &str) -> Vec<String> {
    full_name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect()
}

pub fn score_email(email: &str, first: &str, last: Option<&str>) -> i32 {
    let local = local_part(email);
    let mut score = 0;

    if !first.is_empty() && local.contains(first) {
        score += FIRST_NAME_SCORE;
    }
    if let Some(last) = last.filter(|l| !l.is_empty()) {
        if local.contains(last) {
            score += LAST_NAME_SCORE;
        }
    }
    if is_generic_mailbox(email) {
        score += GENERIC_PENALTY;
    }
    score
}

/// Chooses the address most likely to belong to `full_name`.
///
/// With no name match at all a generic mailbox is preferred, and failing that
/// any candidate is returned. Ties go to the lexically smallest address.
pub fn pick_best_email(candidates: &BTreeSet<String>, full_name: &str) -> Option<String> {
    let tokens = name_tokens(full_name);
    let Some(first) = tokens.first() else {
        return candidates.iter().next().cloned();
    };
    let last = match tokens.len() > 1 {
        true => tokens.last().map(|l| l.as_str()),
        false => None,
    };

    let mut best: Option<(&String, i32)> = None;
    for email in candidates {
        let score = score_email(email, first, last);
        log::debug!("Candidate {} scored {}", email, score);
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((email, score)),
        }
    }

    let (best_email, best_score) = best?;
    if best_score <= 0 {
        if let Some(generic) = candidates.iter().find(|e| is_generic_mailbox(e)) {
            return Some(generic.clone());
        }
    }
    Some(best_email.clone())
}

/// `first.last@domain`, or nothing for single-word names.
pub fn heuristic_guess(full_name: &str, domain: &str) -> Option<String> {
    let tokens = name_tokens(full_name);
    if tokens.len() < 2 {
        return None;
    }
    let first = tokens.first()?;
    let last = tokens.last()?;

    Some(format!("{}.{}@{}", first, last, domain.to_lowercase()))
}
