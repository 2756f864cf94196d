use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thirtyfour::error::WebDriverError;
use thiserror::Error;
use tokio::time::{self, Instant};

use crate::{
    configuration::SearchSettings,
    domain::{
        listing::ListingCapture,
        task::{parse_area, Task},
    },
};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("element `{locator}` not found after waiting {timeout:?}")]
    ElementNotFound { locator: String, timeout: Duration },

    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("listing card could not be read: {0}")]
    Unreadable(String),

    #[error(transparent)]
    WebDriver(#[from] WebDriverError),
}

/// The browsing surface a search runs against.
#[async_trait]
pub trait SearchSurface: Send + Sync {
    type Card: ListingCard;

    async fn open(&self, url: &str) -> Result<(), SurfaceError>;

    /// Waits up to `timeout` for the input, clears it, types `query` and presses Enter.
    async fn submit_query(
        &self,
        input_selector: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<(), SurfaceError>;

    async fn count(&self, selector: &str) -> Result<usize, SurfaceError>;

    async fn cards(&self, selector: &str) -> Result<Vec<Self::Card>, SurfaceError>;
}

/// One rendered result card, read only when asked to.
#[async_trait]
pub trait ListingCard: Send + Sync {
    async fn capture(&self) -> Result<ListingCapture, SurfaceError>;
}

/// How long to wait for results to render after submitting a query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SettleStrategy {
    FixedDelay {
        millis: u64,
    },
    /// Poll the number of cards until it stops changing.
    PollUntilStable {
        interval_ms: u64,
        max_wait_ms: u64,
        stable_polls: u32,
    },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        SettleStrategy::FixedDelay { millis: 4000 }
    }
}

impl SettleStrategy {
    pub async fn settle<S>(&self, surface: &S, selector: &str) -> Result<(), SurfaceError>
    where
        S: SearchSurface + ?Sized,
    {
        match *self {
            SettleStrategy::FixedDelay { millis } => {
                time::sleep(Duration::from_millis(millis)).await;
                Ok(())
            }
            SettleStrategy::PollUntilStable {
                interval_ms,
                max_wait_ms,
                stable_polls,
            } => {
                let deadline = Instant::now() + Duration::from_millis(max_wait_ms);
                let mut last_count = None;
                let mut streak = 0;

                loop {
                    let count = surface.count(selector).await?;
                    streak = match (count, last_count) {
                        (0, _) => 0,
                        (c, Some(last)) if c == last => streak + 1,
                        _ => 1,
                    };
                    last_count = Some(count);

                    if streak >= stable_polls.max(1) {
                        log::debug!("Results settled at {} cards", count);
                        return Ok(());
                    }
                    if Instant::now() >= deadline {
                        log::debug!("Results still changing after {}ms, moving on", max_wait_ms);
                        return Ok(());
                    }

                    time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }
}

/// Single pass over the cards of one search. Each card is captured when reached.
pub struct Listings<C> {
    cards: std::vec::IntoIter<C>,
}

impl<C: ListingCard> Listings<C> {
    pub fn new(cards: Vec<C>) -> Self {
        Listings {
            cards: cards.into_iter(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub async fn next(&mut self) -> Option<Result<ListingCapture, SurfaceError>> {
        let card = self.cards.next()?;
        Some(card.capture().await)
    }
}

pub struct SearchResults<C> {
    pub query: String,
    pub area: String,
    pub listings: Listings<C>,
}

pub async fn run_search<S>(
    surface: &S,
    settings: &SearchSettings,
    task: &Task,
) -> Result<SearchResults<S::Card>, SurfaceError>
where
    S: SearchSurface + ?Sized,
{
    let query = task.query();
    let area = parse_area(&query);
    log::info!("Searching: {}", query);

    surface.open(&settings.entry_url).await?;
    time::sleep(settings.page_load_delay()).await;

    surface
        .submit_query(&settings.input_selector, &query, settings.input_wait())
        .await?;
    settings
        .settle
        .settle(surface, &settings.listing_selector)
        .await?;

    let cards = surface.cards(&settings.listing_selector).await?;
    log::info!("Found {} listings", cards.len());

    Ok(SearchResults {
        query,
        area,
        listings: Listings::new(cards),
    })
}
