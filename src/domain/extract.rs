use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use super::{
    listing::{BusinessRecord, ListingCapture, NOT_AVAILABLE, UNKNOWN_STATUS},
    locator::LocatorStrategy,
};

const STATUS_MARKERS: [&str; 4] = ["open", "closed", "opens", "closes"];
const STATUS_MAX_CHARS: usize = 60;
const ADDRESS_MIN_CHARS: usize = 21;

lazy_static! {
    static ref PHONE: Regex = Regex::new(r"(?:(?:\+91[\s-]*)?\d{10}|\d{5}[\s-]\d{5})").unwrap();
    static ref PHONE_LINE: Regex =
        Regex::new(r"^\s*(?:\+91[\s-]*)?(?:\d{10}|\d{5}[\s-]\d{5})\s*$").unwrap();
}

/// Which candidate address lines count as "a phone number".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressPhoneRule {
    /// Reject a line if a phone number appears anywhere in it.
    #[default]
    AnyMatch,
    /// Reject a line only if it is nothing but a phone number.
    PhoneOnly,
}

#[derive(Debug, Clone)]
pub struct ExtractionRules {
    pub name_locator: LocatorStrategy,
    /// Links containing this are the search surface's own and never a website.
    pub surface_domain: String,
    pub address_phone_rule: AddressPhoneRule,
}

/// Builds one record. Every field is derived on its own; one field coming
/// up empty never stops the others.
pub fn extract_record(
    capture: &ListingCapture,
    rules: &ExtractionRules,
    keyword: &str,
    area: &str,
) -> BusinessRecord {
    let name = extract_name(&capture.html, &rules.name_locator);
    let website = extract_website(&capture.link_hrefs, &rules.surface_domain);
    let phone = extract_phone(&capture.raw_text);
    let open_status = extract_open_status(&capture.raw_text);
    let address = extract_address(capture.lines(), &name, rules.address_phone_rule);

    BusinessRecord {
        name,
        website,
        phone,
        open_status,
        address,
        keyword: keyword.to_string(),
        area: area.to_string(),
    }
}

pub fn extract_name(html: &str, locator: &LocatorStrategy) -> String {
    locator
        .locate(html)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn extract_website(link_hrefs: &[String], surface_domain: &str) -> String {
    link_hrefs
        .iter()
        .find(|href| href.starts_with("http") && !href.contains(surface_domain))
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn find_phone(text: &str) -> Option<&str> {
    PHONE.find(text).map(|m| m.as_str().trim())
}

pub fn extract_phone(text: &str) -> String {
    find_phone(text)
        .map(str::to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn extract_open_status(text: &str) -> String {
    text.split('\n')
        .find(|line| {
            let line = line.to_lowercase();
            STATUS_MARKERS.iter().any(|marker| line.contains(marker))
        })
        .map(|line| {
            line.trim()
                .chars()
                .take(STATUS_MAX_CHARS)
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .unwrap_or_else(|| UNKNOWN_STATUS.to_string())
}

pub fn extract_address<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    name: &str,
    phone_rule: AddressPhoneRule,
) -> String {
    // Length counts the line as rendered, surrounding whitespace included.
    lines
        .into_iter()
        .find(|line| {
            line.chars().count() >= ADDRESS_MIN_CHARS
                && line.trim() != name
                && !is_phone_line(line, phone_rule)
        })
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn is_phone_line(line: &str, phone_rule: AddressPhoneRule) -> bool {
    match phone_rule {
        AddressPhoneRule::AnyMatch => find_phone(line).is_some(),
        AddressPhoneRule::PhoneOnly => PHONE_LINE.is_match(line),
    }
}

/// Host of the search entry point without a leading `www.`,
/// e.g. `https://www.google.com/maps` gives `google.com`.
pub fn surface_domain(entry_url: &str) -> Option<String> {
    let parsed_url = Url::parse(entry_url).ok()?;
    match parsed_url.host_str() {
        Some("") | None => None,
        Some(host) => match host.strip_prefix("www.") {
            Some(h) => Some(h.to_lowercase()),
            None => Some(host.to_lowercase()),
        },
    }
}
