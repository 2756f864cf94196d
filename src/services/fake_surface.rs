use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use super::{ListingCard, SearchSurface, SettleStrategy, SurfaceError};
use crate::{configuration::SearchSettings, domain::listing::ListingCapture};

pub fn search_settings() -> SearchSettings {
    SearchSettings {
        entry_url: "https://www.google.com/maps".to_string(),
        input_selector: "#searchboxinput".to_string(),
        listing_selector: "div.Nv2PK".to_string(),
        input_wait_secs: 10,
        page_load_delay_ms: 2000,
        settle: SettleStrategy::FixedDelay { millis: 4000 },
        inter_task_delay_ms: 2000,
        cities: vec![],
        keywords: vec![],
    }
}

/// `None` stands for a card whose text can no longer be read.
#[derive(Debug, Clone)]
pub struct FakeCard(pub Option<ListingCapture>);

#[async_trait]
impl ListingCard for FakeCard {
    async fn capture(&self) -> Result<ListingCapture, SurfaceError> {
        self.0
            .clone()
            .ok_or_else(|| SurfaceError::Unreadable("stale element reference".to_string()))
    }
}

#[derive(Default)]
pub struct FakeSurface {
    pub navigation_fails: bool,
    pub input_present: bool,
    pub missing_input_for: Vec<String>,
    default_cards: Vec<FakeCard>,
    cards_by_query: HashMap<String, Vec<FakeCard>>,
    counts: Mutex<VecDeque<usize>>,
    count_calls: Mutex<usize>,
    submitted: Mutex<Vec<String>>,
}

impl FakeSurface {
    pub fn with_captures(captures: Vec<ListingCapture>) -> Self {
        FakeSurface {
            input_present: true,
            default_cards: captures.into_iter().map(|c| FakeCard(Some(c))).collect(),
            ..Default::default()
        }
    }

    /// Successive answers to `count`; the last one repeats.
    pub fn with_counts(self, counts: Vec<usize>) -> Self {
        FakeSurface {
            counts: Mutex::new(counts.into()),
            ..self
        }
    }

    pub fn with_missing_input(mut self, query: &str) -> Self {
        self.missing_input_for.push(query.to_string());
        self
    }

    pub fn with_query_results(mut self, query: &str, cards: Vec<FakeCard>) -> Self {
        self.cards_by_query.insert(query.to_string(), cards);
        self
    }

    pub fn submitted_queries(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn count_calls(&self) -> usize {
        *self.count_calls.lock().unwrap()
    }

    fn current_cards(&self) -> Vec<FakeCard> {
        let submitted = self.submitted.lock().unwrap();
        submitted
            .last()
            .and_then(|query| self.cards_by_query.get(query))
            .unwrap_or(&self.default_cards)
            .clone()
    }
}

#[async_trait]
impl SearchSurface for FakeSurface {
    type Card = FakeCard;

    async fn open(&self, url: &str) -> Result<(), SurfaceError> {
        match self.navigation_fails {
            true => Err(SurfaceError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
            false => Ok(()),
        }
    }

    async fn submit_query(
        &self,
        input_selector: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<(), SurfaceError> {
        if !self.input_present || self.missing_input_for.iter().any(|q| q == query) {
            return Err(SurfaceError::ElementNotFound {
                locator: input_selector.to_string(),
                timeout,
            });
        }
        self.submitted.lock().unwrap().push(query.to_string());
        Ok(())
    }

    async fn count(&self, _selector: &str) -> Result<usize, SurfaceError> {
        *self.count_calls.lock().unwrap() += 1;
        let mut counts = self.counts.lock().unwrap();
        let count = match counts.len() {
            0 => self.current_cards().len(),
            1 => counts[0],
            _ => counts.pop_front().unwrap_or_default(),
        };
        Ok(count)
    }

    async fn cards(&self, _selector: &str) -> Result<Vec<FakeCard>, SurfaceError> {
        Ok(self.current_cards())
    }
}
