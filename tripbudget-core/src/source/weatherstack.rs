use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::WeatherRecord;

use super::WeatherSource;

/// Weather lookup backed by the weatherstack `current` endpoint.
///
/// The endpoint answers HTTP 200 even for failed lookups and signals the
/// failure through an `error` object in the body, so both the status and the
/// body shape are checked.
#[derive(Debug, Clone)]
pub struct WeatherstackSource {
    api_key: String,
    http: Client,
}

impl WeatherstackSource {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: super::http_client() }
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherRecord> {
        let url = "http://api.weatherstack.com/current";

        let res = self
            .http
            .get(url)
            .query(&[("access_key", self.api_key.as_str()), ("query", city)])
            .send()
            .await
            .context("Failed to send request to weatherstack (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read weatherstack current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "weatherstack current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: WsCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse weatherstack current JSON")?;

        if let Some(error) = parsed.error {
            return Err(anyhow!(
                "weatherstack reported an error for '{city}': {}",
                error.info.unwrap_or_else(|| "no detail provided".to_string()),
            ));
        }

        // All-or-nothing: a 200 body without both blocks yields no record.
        let (location, current) = parsed
            .location
            .zip(parsed.current)
            .ok_or_else(|| anyhow!("weatherstack response missing location or current data"))?;

        Ok(WeatherRecord {
            city: location.name,
            country: location.country,
            region: location.region,
            local_time: location.localtime,
            temperature_c: current.temperature,
            feels_like_c: current.feelslike,
            humidity_pct: current.humidity,
            precipitation_mm: current.precip,
            uv_index: current.uv_index,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WsError {
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    name: String,
    country: String,
    region: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    temperature: f64,
    feelslike: f64,
    humidity: u8,
    precip: f64,
    uv_index: f64,
}

#[derive(Debug, Deserialize)]
struct WsCurrentResponse {
    error: Option<WsError>,
    location: Option<WsLocation>,
    current: Option<WsCurrent>,
}

#[async_trait]
impl WeatherSource for WeatherstackSource {
    async fn current(&self, city: &str) -> Option<WeatherRecord> {
        match self.fetch_current(city).await {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!("Weather lookup for '{city}' unavailable: {err:#}");
                None
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back off to a char boundary so multibyte bodies can't panic the cut.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
