use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::model::CurrencyInfo;

use super::CurrencySource;

/// Currency resolution backed by the restcountries name endpoint.
///
/// Resolution is best-effort by contract: every failure path falls back to
/// USD/"$" and the pipeline never sees an error from here.
#[derive(Debug, Clone)]
pub struct RestCountriesSource {
    http: Client,
}

impl RestCountriesSource {
    pub fn new() -> Self {
        Self { http: super::http_client() }
    }

    async fn fetch_currency(&self, country: &str) -> Result<CurrencyInfo> {
        let mut url = Url::parse("https://restcountries.com/v3.1/name/")
            .context("Failed to build restcountries URL")?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("restcountries URL cannot carry a path segment"))?
            .push(country);
        url.query_pairs_mut().append_pair("fields", "currencies");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to restcountries")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("restcountries request failed with status {status}"));
        }

        let countries: Vec<RcCountry> = res
            .json()
            .await
            .context("Failed to parse restcountries JSON")?;

        first_currency(countries)
            .ok_or_else(|| anyhow!("restcountries returned no currency data for '{country}'"))
    }
}

impl Default for RestCountriesSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    // serde_json's preserve_order Map keeps the response's listing order, so
    // "first listed currency" means exactly that.
    #[serde(default)]
    currencies: serde_json::Map<String, Value>,
}

/// First listed currency of the first matching country; symbol falls back to
/// the code itself when the reference data carries none.
fn first_currency(countries: Vec<RcCountry>) -> Option<CurrencyInfo> {
    let (code, currency) = countries
        .into_iter()
        .find_map(|c| c.currencies.into_iter().next())?;

    let symbol = currency
        .get("symbol")
        .and_then(Value::as_str)
        .map_or_else(|| code.clone(), str::to_string);

    Some(CurrencyInfo { code, symbol })
}

#[async_trait]
impl CurrencySource for RestCountriesSource {
    async fn resolve(&self, country: Option<&str>) -> CurrencyInfo {
        // No country, no lookup.
        let Some(country) = country else {
            return CurrencyInfo::usd();
        };

        match self.fetch_currency(country).await {
            Ok(currency) => currency,
            Err(err) => {
                tracing::warn!(
                    "Currency resolution for '{country}' failed, defaulting to USD: {err:#}"
                );
                CurrencyInfo::usd()
            }
        }
    }
}
