use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::model::{CurrencyInfo, ExchangeQuote};

use super::RateSource;

/// Exchange-rate lookup backed by the exchangerate-api `latest/{base}` table.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiSource {
    api_key: String,
    http: Client,
}

impl ExchangeRateApiSource {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: super::http_client() }
    }

    /// Fetch the full rate table for `base`. A table that simply has no entry
    /// for the target is handled by the caller; this only fails on transport
    /// or shape problems.
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let mut url = Url::parse("https://v6.exchangerate-api.com/v6/")
            .context("Failed to build exchangerate-api URL")?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("exchangerate-api URL cannot carry a path segment"))?
            .push(&self.api_key)
            .push("latest")
            .push(base);

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to exchangerate-api")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("exchangerate-api request failed with status {status}"));
        }

        let parsed: XrResponse = res
            .json()
            .await
            .context("Failed to parse exchangerate-api JSON")?;

        parsed
            .conversion_rates
            .ok_or_else(|| anyhow!("exchangerate-api response carried no conversion_rates table"))
    }
}

#[derive(Debug, Deserialize)]
struct XrResponse {
    conversion_rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateSource for ExchangeRateApiSource {
    async fn quote(&self, base: &str, target: CurrencyInfo) -> ExchangeQuote {
        match self.fetch_rates(base).await {
            Ok(rates) => {
                let rate = rates.get(&target.code).copied();
                if rate.is_none() {
                    tracing::warn!(
                        "exchangerate-api table for {base} has no entry for {}",
                        target.code
                    );
                }
                ExchangeQuote { rate, target }
            }
            Err(err) => {
                tracing::warn!("Exchange rate lookup for {base} unavailable: {err:#}");
                ExchangeQuote::unavailable(target)
            }
        }
    }
}
