use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

/// How the title of a listing card is found inside its HTML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// A fixed CSS descendant path.
    Structure { selector: String },
    /// An attribute value of the first element matching `selector`.
    Attribute { selector: String, attribute: String },
    /// The text of the first element carrying the ARIA `role`.
    TextRole { role: String },
}

impl Default for LocatorStrategy {
    fn default() -> Self {
        LocatorStrategy::Structure {
            selector: "div.Nv2PK > div > div > div > div > div > div".to_string(),
        }
    }
}

impl LocatorStrategy {
    /// Fails closed: a bad selector, no match or blank text all give `None`.
    pub fn locate(&self, html: &str) -> Option<String> {
        if html.trim().is_empty() {
            return None;
        }
        let fragment = Html::parse_fragment(html);

        let value = match self {
            LocatorStrategy::Structure { selector } => {
                let selector = Selector::parse(selector).ok()?;
                fragment.select(&selector).next().map(element_text)
            }
            LocatorStrategy::Attribute {
                selector,
                attribute,
            } => {
                let selector = Selector::parse(selector).ok()?;
                fragment
                    .select(&selector)
                    .find_map(|el| el.value().attr(attribute))
                    .map(|v| v.trim().to_string())
            }
            LocatorStrategy::TextRole { role } => {
                let selector = Selector::parse(&format!(r#"[role="{}"]"#, role)).ok()?;
                fragment.select(&selector).next().map(element_text)
            }
        }?;

        match value.is_empty() {
            true => None,
            false => Some(value),
        }
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().flat_map(str::split_whitespace).join(" ")
}
