use crate::{
    Config,
    model::{CurrencyInfo, ExchangeQuote, WeatherRecord},
    source::{
        exchangerate::ExchangeRateApiSource, restcountries::RestCountriesSource,
        weatherstack::WeatherstackSource,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod exchangerate;
pub mod restcountries;
pub mod weatherstack;

/// Bound on every outbound call; a lookup that times out degrades to absence
/// rather than failing the request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Client {
    Client::builder().timeout(HTTP_TIMEOUT).build().unwrap_or_default()
}

/// External services that require an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    Weatherstack,
    ExchangeRate,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Weatherstack => "weatherstack",
            ServiceId::ExchangeRate => "exchangerate",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::Weatherstack, ServiceId::ExchangeRate]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherstack" => Ok(ServiceId::Weatherstack),
            "exchangerate" => Ok(ServiceId::ExchangeRate),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: weatherstack, exchangerate."
            )),
        }
    }
}

/// Current weather for a city. Absence covers every failure mode: transport
/// errors, error-shaped provider responses, and malformed payloads.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Option<WeatherRecord>;
}

/// Country name → currency. Total: falls back to USD/"$" on any failure and
/// makes no call at all when the country is unknown.
#[async_trait]
pub trait CurrencySource: Send + Sync + Debug {
    async fn resolve(&self, country: Option<&str>) -> CurrencyInfo;
}

/// Exchange rate from a base currency into the target. `rate: None` on any
/// failure or when the provider's table has no entry for the target.
#[async_trait]
pub trait RateSource: Send + Sync + Debug {
    async fn quote(&self, base: &str, target: CurrencyInfo) -> ExchangeQuote;
}

/// The full set of enrichment sources the report builder needs.
#[derive(Debug)]
pub struct Sources {
    pub weather: Box<dyn WeatherSource>,
    pub currency: Box<dyn CurrencySource>,
    pub rates: Box<dyn RateSource>,
}

/// Construct the live HTTP sources from config.
pub fn sources_from_config(config: &Config) -> anyhow::Result<Sources> {
    let weather_key = require_api_key(config, ServiceId::Weatherstack)?;
    let rates_key = require_api_key(config, ServiceId::ExchangeRate)?;

    Ok(Sources {
        weather: Box::new(WeatherstackSource::new(weather_key)),
        currency: Box::new(RestCountriesSource::new()),
        rates: Box::new(ExchangeRateApiSource::new(rates_key)),
    })
}

fn require_api_key(config: &Config, id: ServiceId) -> anyhow::Result<String> {
    config
        .service_api_key(id)
        .map(str::to_owned)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured for service '{id}'.\n\
                 Hint: run `tripbudget configure {id}` and enter your API key."
            )
        })
}
