use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker for "company extraction failed". Downstream enrichment is skipped
/// for leads carrying it.
pub const UNKNOWN_COMPANY: &str = "Unknown";

const MAX_COMPANY_LEN: usize = 40;
const MAX_NAME_WORDS: usize = 6;

const TITLE_NOISE: [&str; 3] = [" | LinkedIn", " - LinkedIn", " – LinkedIn"];
const NAME_DELIMITERS: [&str; 3] = [" - ", " | ", " – "]; // the last one is an en-dash

const COMPANY_BLACKLIST: [&str; 18] = [
    "area",
    "greater",
    "remote",
    "london",
    "new york",
    "san francisco",
    "los angeles",
    "chicago",
    "boston",
    "seattle",
    "austin",
    "toronto",
    "berlin",
    "united states",
    "united kingdom",
    "india",
    "linkedin",
    "self-employed",
];

// A run of capitalized words. A period only stays inside a word when more
// word characters follow it ("Acme.io"), so "Acme. Previously" ends at "Acme".
const COMPANY_PHRASE: &str =
    r"([A-Z0-9][\w&']*(?:\.[\w&']+)*(?:\s+[A-Z0-9&][\w&']*(?:\.[\w&']+)*)*)";

static AT_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:\bat\s+|@\s*){}", COMPANY_PHRASE))
        .expect("valid at-company regex")
});
static OF_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\bof\s+{}", COMPANY_PHRASE)).expect("valid of-company regex")
});
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[][^)\]]*[)\]]").expect("valid bracket regex"));
static EXPERIENCE_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Experience:\s*([^·|\n]+)").expect("valid experience regex")
});

/// One organic hit as returned by the search API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub url: String,
    pub snippet: String,
}

impl Lead {
    pub fn has_known_company(&self) -> bool {
        self.company != UNKNOWN_COMPANY
    }
}

pub fn build_lead_search_query(role: &str, industry: &str) -> String {
    format!(r#"site:linkedin.com/in "{}" "{}""#, role, industry)
}

/// Turns a search hit into a lead. Returns `None` when no plausible person
/// name can be pulled out of the title.
pub fn parse_raw_result(raw: &RawResult, role: &str) -> Option<Lead> {
    let title = clean_title(&raw.title);
    let name = extract_person_name(&title)?;
    let company = extract_company(&title, &raw.snippet);

    Some(Lead {
        name,
        role: role.to_string(),
        company,
        url: raw.link.clone(),
        snippet: raw.snippet.clone(),
    })
}

fn clean_title(title: &str) -> String {
    TITLE_NOISE
        .iter()
        .fold(title.to_string(), |acc, noise| acc.replace(noise, ""))
        .trim()
        .to_string()
}

fn extract_person_name(title: &str) -> Option<String> {
    let head = NAME_DELIMITERS
        .iter()
        .filter_map(|delimiter| title.find(delimiter))
        .min()
        .map(|idx| &title[..idx])
        .unwrap_or(title);

    // "Jane Doe (She/Her)" -> "Jane Doe"
    let unbracketed = BRACKETED.replace_all(head, " ");

    // "Jane Doe, MBA" -> "Jane Doe"
    let head = match unbracketed.split_once(',') {
        Some((name, _)) => name,
        None => unbracketed.as_ref(),
    };
    let head = head.trim();
    let head = head
        .strip_prefix("Dr.")
        .or_else(|| head.strip_prefix("Dr "))
        .unwrap_or(head)
        .trim();

    let words = head.split_whitespace().count();
    match words > 0 && words <= MAX_NAME_WORDS && head.chars().any(char::is_alphabetic) {
        true => Some(head.split_whitespace().collect::<Vec<_>>().join(" ")),
        false => None,
    }
}

fn extract_company(title: &str, snippet: &str) -> String {
    let from_at = AT_COMPANY
        .captures_iter(snippet)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .find_map(accept_company);
    if let Some(company) = from_at {
        return company;
    }

    let from_of = OF_COMPANY
        .captures_iter(snippet)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .find_map(accept_company);
    if let Some(company) = from_of {
        return company;
    }

    let segments: Vec<&str> = title.split(" - ").collect();
    if segments.len() >= 3 {
        if let Some(company) = segments.last().and_then(|last| accept_company(last)) {
            return company;
        }
    }

    EXPERIENCE_COMPANY
        .captures(snippet)
        .and_then(|caps| caps.get(1))
        .and_then(|m| accept_company(m.as_str()))
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
}

fn accept_company(candidate: &str) -> Option<String> {
    let company = candidate
        .trim()
        .trim_end_matches(['.', ',', ';', ':'])
        .trim();

    if company.is_empty()
        || company.chars().count() > MAX_COMPANY_LEN
        || company == UNKNOWN_COMPANY
        || is_location_noise(company)
    {
        return None;
    }
    Some(company.to_string())
}

fn is_location_noise(company: &str) -> bool {
    let lower = company.to_lowercase();
    COMPANY_BLACKLIST.contains(&lower.as_str())
        || lower.split_whitespace().last() == Some("area")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, snippet: &str) -> RawResult {
        RawResult {
            title: title.to_string(),
            link: "https://www.linkedin.com/in/someone".to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn parses_name_and_company_from_snippet() {
        let lead = parse_raw_result(
            &raw(
                "Jane Doe - VP Sales - Acme Corp",
                "Sales leader at Acme Corp · we are hiring in Boston",
            ),
            "VP Sales",
        )
        .unwrap();

        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.company, "Acme Corp");
        assert_eq!(lead.role, "VP Sales");
        assert_eq!(lead.url, "https://www.linkedin.com/in/someone");
    }

    #[test]
    fn strips_platform_branding_and_uses_title_segments() {
        let lead = parse_raw_result(
            &raw("John Smith - Founder - Globex | LinkedIn", "Building things."),
            "Founder",
        )
        .unwrap();

        assert_eq!(lead.name, "John Smith");
        assert_eq!(lead.company, "Globex");
    }

    #[test]
    fn splits_name_on_pipe_and_en_dash() {
        let lead = parse_raw_result(&raw("Ana Lima | Growth", ""), "Growth").unwrap();
        assert_eq!(lead.name, "Ana Lima");

        let lead = parse_raw_result(&raw("Ana Lima – Growth", ""), "Growth").unwrap();
        assert_eq!(lead.name, "Ana Lima");
    }

    #[test]
    fn cleans_credentials_and_honorifics() {
        let lead = parse_raw_result(&raw("Dr. Maria Rossi, PhD - CTO", ""), "CTO").unwrap();
        assert_eq!(lead.name, "Maria Rossi");
    }

    #[test]
    fn drops_pronouns_and_other_bracketed_notes() {
        let lead = parse_raw_result(&raw("Jane Doe (She/Her) - VP Sales", ""), "VP Sales").unwrap();
        assert_eq!(lead.name, "Jane Doe");

        let lead = parse_raw_result(&raw("Raj Patel [he/him], CPA - CFO", ""), "CFO").unwrap();
        assert_eq!(lead.name, "Raj Patel");
    }

    #[test]
    fn company_stops_at_sentence_end() {
        let lead = parse_raw_result(
            &raw("Sam Lee - Marketing", "Marketing lead at Acme. Previously Globex."),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, "Acme");

        let lead = parse_raw_result(
            &raw("Sam Lee - Marketing", "Growth at Acme.io, ex Initech"),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, "Acme.io");
    }

    #[test]
    fn handle_form_needs_no_space() {
        let lead = parse_raw_result(
            &raw("Priya Nair - CTO", "CTO @Stripe · building payments"),
            "CTO",
        )
        .unwrap();
        assert_eq!(lead.company, "Stripe");

        let lead = parse_raw_result(&raw("Priya Nair - CTO", "CTO @ Stripe"), "CTO").unwrap();
        assert_eq!(lead.company, "Stripe");
    }

    #[test]
    fn prefers_at_over_of() {
        let lead = parse_raw_result(
            &raw("Sam Lee - Marketing", "Head of Growth at Initech · 500+ connections"),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, "Initech");
    }

    #[test]
    fn falls_back_to_experience_marker() {
        let lead = parse_raw_result(
            &raw("Sam Lee - Marketing", "Experience: Umbrella Labs · Education: MIT"),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, "Umbrella Labs");
    }

    #[test]
    fn location_is_never_a_company() {
        let lead = parse_raw_result(
            &raw("Sam Lee - Marketing", "Based at San Francisco Bay Area · 500 connections"),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, UNKNOWN_COMPANY);

        let lead = parse_raw_result(
            &raw("Sam Lee - Marketing - London", "Marketing person"),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, UNKNOWN_COMPANY);
    }

    #[test]
    fn overlong_company_is_rejected() {
        let lead = parse_raw_result(
            &raw(
                "Sam Lee - Marketing",
                "Works at The Very Long Name Of A Company That Never Seems To End Incorporated",
            ),
            "Marketing",
        )
        .unwrap();
        assert_eq!(lead.company, UNKNOWN_COMPANY);
    }

    #[test]
    fn keeps_lead_with_unknown_company() {
        let lead = parse_raw_result(&raw("Jo March", "no employer here"), "Writer").unwrap();
        assert_eq!(lead.name, "Jo March");
        assert!(!lead.has_known_company());
    }

    #[test]
    fn rejects_titles_without_a_name() {
        assert!(parse_raw_result(&raw(" | LinkedIn", ""), "x").is_none());
        assert!(parse_raw_result(&raw("12345 - 678", ""), "x").is_none());
        assert!(parse_raw_result(
            &raw("one two three four five six seven eight", ""),
            "x"
        )
        .is_none());
    }

    #[test]
    fn builds_linkedin_query() {
        assert_eq!(
            build_lead_search_query("CTO", "Fintech"),
            r#"site:linkedin.com/in "CTO" "Fintech""#
        );
    }
}
