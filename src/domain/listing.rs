use serde::Serialize;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_STATUS: &str = "Unknown";

pub const CSV_HEADER: [&str; 7] = [
    "Name", "Website", "Phone", "Open", "Address", "Keyword", "Area",
];

/// What one rendered result card looked like at enumeration time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingCapture {
    /// Rendered text of the card, one visual line per `\n`.
    pub raw_text: String,
    /// Resolved `href` of every anchor inside the card, in document order.
    pub link_hrefs: Vec<String>,
    /// Outer HTML of the card. Empty when it could not be read.
    pub html: String,
}

impl ListingCapture {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw_text.split('\n')
    }
}

/// One output row. Missing values are sentinels, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessRecord {
    pub name: String,
    pub website: String,
    pub phone: String,
    pub open_status: String,
    pub address: String,
    pub keyword: String,
    pub area: String,
}
