//! Proposal facts extracted from the request prompt.
use chrono::{Datelike, Local};
use regex::Regex;
use std::sync::LazyLock;

static COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:para\s+|de\s+|empresa\s+)([A-Z][a-zA-Z\s&]+(?:SA\s+de\s+CV|S\.A\.|Inc\.|Corp\.|Ltd\.)?)",
    )
    .unwrap()
});

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}\s+de\s+\w+\s+de\s+\d{4}|\d{1,2}/\d{1,2}/\d{4}").unwrap());

static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\s*([^\n]*)").unwrap());

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Company, date and title pulled out of a free-form proposal prompt.
///
/// Extraction is best-effort pattern matching; every field has a usable
/// default so a sparse prompt still yields a complete proposal header.
///
/// # Example
///
/// ```rust
/// use proforma::generate::prompt::ProposalInfo;
///
/// let info = ProposalInfo::extract(
///     "# Modernización\nPropuesta para Acme Corp, fecha 15/03/2026",
/// );
/// assert_eq!(info.company, "Acme Corp");
/// assert_eq!(info.date, "15/03/2026");
/// assert_eq!(info.title, "Modernización");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalInfo {
    pub company: String,
    pub date: String,
    pub title: String,
}

impl ProposalInfo {
    pub fn extract(prompt: &str) -> Self {
        let company = COMPANY
            .captures(prompt)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| "Cliente Estimado".to_string());

        let date = DATE
            .find(prompt)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(today_long_form);

        let title = TITLE
            .captures(prompt)
            .map(|caps| caps[1].trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Propuesta Técnica".to_string());

        Self {
            company,
            date,
            title,
        }
    }
}

/// Today's date in Spanish long form, e.g. `05 de marzo de 2026`.
fn today_long_form() -> String {
    let today = Local::now();
    format!(
        "{:02} de {} de {}",
        today.day(),
        MONTHS[today.month0() as usize],
        today.year()
    )
}
