use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::{prelude::*, ChromiumLikeCapabilities};

use super::{ListingCard, SearchSurface, SurfaceError};
use crate::{configuration::BrowserSettings, domain::listing::ListingCapture};

const QUERY_POLL_INTERVAL: Duration = Duration::from_millis(250);
const HIDE_WEBDRIVER_FLAG: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// One Chrome session driven over WebDriver, reused for every search.
pub struct Droid {
    driver: WebDriver,
}

impl Droid {
    pub async fn launch(settings: &BrowserSettings) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.add_arg("--headless")?;
        }
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            settings.window_width, settings.window_height
        ))?;
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_experimental_option("excludeSwitches", vec!["enable-automation"])?;

        log::info!("Connecting to webdriver at {}", settings.webdriver_url);
        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> WebDriverResult<()> {
        self.driver.quit().await
    }

    async fn hide_automation(&self) -> WebDriverResult<()> {
        self.driver.execute(HIDE_WEBDRIVER_FLAG, Vec::new()).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchSurface for Droid {
    type Card = MapsCard;

    async fn open(&self, url: &str) -> Result<(), SurfaceError> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| SurfaceError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        // The flag is per document, so it goes again after every navigation
        self.hide_automation().await?;
        Ok(())
    }

    async fn submit_query(
        &self,
        input_selector: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<(), SurfaceError> {
        let input = self
            .driver
            .query(By::Css(input_selector.to_string()))
            .wait(timeout, QUERY_POLL_INTERVAL)
            .first()
            .await
            .map_err(|e| {
                log::debug!("Waiting for {} failed: {:?}", input_selector, e);
                SurfaceError::ElementNotFound {
                    locator: input_selector.to_string(),
                    timeout,
                }
            })?;

        input.clear().await?;
        input.send_keys(query).await?;
        input.send_keys(Key::Enter + "").await?;
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize, SurfaceError> {
        let elements = self.driver.find_all(By::Css(selector.to_string())).await?;
        Ok(elements.len())
    }

    async fn cards(&self, selector: &str) -> Result<Vec<MapsCard>, SurfaceError> {
        let elements = self.driver.find_all(By::Css(selector.to_string())).await?;
        Ok(elements.into_iter().map(MapsCard).collect())
    }
}

/// A result card still living in the browser.
pub struct MapsCard(WebElement);

impl MapsCard {
    async fn link_hrefs(&self) -> Vec<String> {
        let a_tags = match self.0.find_all(By::Tag("a")).await {
            Ok(a_tags) => a_tags,
            Err(e) => {
                log::debug!("Could not list links of a card: {:?}", e);
                return vec![];
            }
        };

        let mut hrefs = vec![];
        for a_tag in a_tags {
            // The property, unlike the attribute, is already resolved to an absolute url
            match a_tag.prop("href").await {
                Ok(Some(href)) => hrefs.push(href),
                Ok(None) => {}
                Err(e) => log::debug!("Could not read href: {:?}", e),
            }
        }
        hrefs
    }
}

#[async_trait]
impl ListingCard for MapsCard {
    async fn capture(&self) -> Result<ListingCapture, SurfaceError> {
        let raw_text = self
            .0
            .text()
            .await
            .map_err(|e| SurfaceError::Unreadable(e.to_string()))?;

        let html = match self.0.outer_html().await {
            Ok(html) => html,
            Err(e) => {
                log::debug!("Could not read card html: {:?}", e);
                String::new()
            }
        };
        let link_hrefs = self.link_hrefs().await;

        Ok(ListingCapture {
            raw_text,
            link_hrefs,
            html,
        })
    }
}
