use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    domain::{
        extract::{surface_domain, AddressPhoneRule, ExtractionRules},
        locator::LocatorStrategy,
        task::Task,
    },
    services::SettleStrategy,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub search: SearchSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_width: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub entry_url: String,
    pub input_selector: String,
    pub listing_selector: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub input_wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_load_delay_ms: u64,
    pub settle: SettleStrategy,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub inter_task_delay_ms: u64,
    pub cities: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default)]
    pub name_locator: LocatorStrategy,
    #[serde(default)]
    pub address_phone_rule: AddressPhoneRule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub directory: String,
}

impl SearchSettings {
    pub fn input_wait(&self) -> Duration {
        Duration::from_secs(self.input_wait_secs)
    }

    pub fn page_load_delay(&self) -> Duration {
        Duration::from_millis(self.page_load_delay_ms)
    }

    pub fn inter_task_delay(&self) -> Duration {
        Duration::from_millis(self.inter_task_delay_ms)
    }

    pub fn tasks(&self) -> Vec<Task> {
        Task::cross_product(&self.cities, &self.keywords)
    }
}

impl Settings {
    pub fn extraction_rules(&self) -> anyhow::Result<ExtractionRules> {
        let surface_domain = surface_domain(&self.search.entry_url).with_context(|| {
            format!(
                "search.entry_url has no host: {:?}",
                self.search.entry_url
            )
        })?;

        Ok(ExtractionRules {
            name_locator: self.extraction.name_locator.clone(),
            surface_domain,
            address_phone_rule: self.extraction.address_phone_rule,
        })
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    let configuration_directory = base_path.join("configuration");

    let environment = Environment::try_from(
        std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into()),
    )
    .map_err(anyhow::Error::msg)
    .context("Failed to parse APP_ENVIRONMENT")?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        .add_source(environment_source())
        .build()
        .context("Failed to read configuration")?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize configuration")
}

/// `APP_SEARCH__INTER_TASK_DELAY_MS=500` sets `search.inter_task_delay_ms`;
/// `APP_SEARCH__CITIES=pune,delhi` replaces the city list.
fn environment_source() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("search.cities")
        .with_list_parse_key("search.keywords")
}
