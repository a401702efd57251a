//! The budget aggregation pipeline.
//!
//! Sequencing matters: weather runs first because currency resolution needs
//! the country it reports; the rate lookup needs the resolved currency. The
//! cost-of-living lookup has no data dependency on any of them and reads the
//! preloaded table directly. Every enrichment step is allowed to come back
//! empty; only validation rejects a request outright.

use crate::{
    costs::CostTable,
    model::{BudgetReport, ConvertedTotals, TripRequest},
    source::Sources,
    validate::{ValidationError, validate},
};

/// The currency the user's budget is denominated in before conversion.
pub const BASE_CURRENCY: &str = "USD";

/// Builds best-effort budget reports from validated requests.
pub struct ReportBuilder {
    sources: Sources,
    costs: CostTable,
}

impl ReportBuilder {
    pub fn new(sources: Sources, costs: CostTable) -> Self {
        Self { sources, costs }
    }

    /// Assemble a report for an already-validated request.
    ///
    /// Never fails: sections whose lookups came back empty are simply absent,
    /// and conversion figures are computed only when a rate was found.
    pub async fn build(&self, request: &TripRequest) -> BudgetReport {
        tracing::debug!("Building budget report for '{}'", request.destination);

        let weather = self.sources.weather.current(&request.destination).await;
        let country = weather.as_ref().map(|w| w.country.as_str());

        let currency = self.sources.currency.resolve(country).await;
        let quote = self.sources.rates.quote(BASE_CURRENCY, currency).await;

        let cost_of_living = self.costs.lookup(&request.destination);

        let days = f64::from(request.duration_days);
        let daily_budget = round2(request.budget / days);
        let conversion = quote.rate.map(|rate| {
            let converted_budget = round2(request.budget * rate);
            ConvertedTotals { converted_budget, daily_budget: round2(converted_budget / days) }
        });

        BudgetReport {
            request: request.clone(),
            currency: quote.target,
            daily_budget,
            conversion,
            weather,
            cost_of_living,
        }
    }

    /// Full pipeline entry point over raw form fields: validate, then build.
    /// A validation failure is the only error this can return, and it is
    /// returned before any external lookup is made.
    pub async fn plan(
        &self,
        destination: &str,
        budget_raw: &str,
        duration_raw: &str,
    ) -> Result<BudgetReport, ValidationError> {
        let request = validate(destination, budget_raw, duration_raw)?;
        Ok(self.build(&request).await)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{CurrencyInfo, ExchangeQuote, WeatherRecord},
        source::{CurrencySource, RateSource, WeatherSource},
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedWeather(Option<WeatherRecord>);

    #[async_trait]
    impl WeatherSource for FixedWeather {
        async fn current(&self, _city: &str) -> Option<WeatherRecord> {
            self.0.clone()
        }
    }

    /// Resolves a fixed currency when (and only when) a country was supplied.
    #[derive(Debug)]
    struct FixedCurrency(CurrencyInfo);

    #[async_trait]
    impl CurrencySource for FixedCurrency {
        async fn resolve(&self, country: Option<&str>) -> CurrencyInfo {
            match country {
                Some(_) => self.0.clone(),
                None => CurrencyInfo::usd(),
            }
        }
    }

    #[derive(Debug)]
    struct FixedRate(Option<f64>);

    #[async_trait]
    impl RateSource for FixedRate {
        async fn quote(&self, _base: &str, target: CurrencyInfo) -> ExchangeQuote {
            ExchangeQuote { rate: self.0, target }
        }
    }

    #[derive(Debug)]
    struct PanicWeather;

    #[async_trait]
    impl WeatherSource for PanicWeather {
        async fn current(&self, _city: &str) -> Option<WeatherRecord> {
            panic!("weather source must not be called");
        }
    }

    #[derive(Debug)]
    struct PanicCurrency;

    #[async_trait]
    impl CurrencySource for PanicCurrency {
        async fn resolve(&self, _country: Option<&str>) -> CurrencyInfo {
            panic!("currency source must not be called");
        }
    }

    #[derive(Debug)]
    struct PanicRate;

    #[async_trait]
    impl RateSource for PanicRate {
        async fn quote(&self, _base: &str, _target: CurrencyInfo) -> ExchangeQuote {
            panic!("rate source must not be called");
        }
    }

    fn tokyo_weather() -> WeatherRecord {
        WeatherRecord {
            city: "Tokyo".to_string(),
            country: "Japan".to_string(),
            region: "Tokyo".to_string(),
            local_time: "2024-05-01 14:30".to_string(),
            temperature_c: 21.0,
            feels_like_c: 19.0,
            humidity_pct: 55,
            precipitation_mm: 0.2,
            uv_index: 5.0,
        }
    }

    fn yen() -> CurrencyInfo {
        CurrencyInfo { code: "JPY".to_string(), symbol: "¥".to_string() }
    }

    fn sample_costs() -> CostTable {
        CostTable::from_reader(
            "city,country,meal,rent\nTokyo,Japan,8.5,1200\n".as_bytes(),
        )
        .expect("sample table should parse")
    }

    fn builder(
        weather: Option<WeatherRecord>,
        currency: CurrencyInfo,
        rate: Option<f64>,
        costs: CostTable,
    ) -> ReportBuilder {
        ReportBuilder::new(
            Sources {
                weather: Box::new(FixedWeather(weather)),
                currency: Box::new(FixedCurrency(currency)),
                rates: Box::new(FixedRate(rate)),
            },
            costs,
        )
    }

    fn tokyo_request() -> TripRequest {
        TripRequest { destination: "Tokyo".to_string(), budget: 1000.0, duration_days: 10 }
    }

    #[tokio::test]
    async fn full_report_when_every_lookup_succeeds() {
        let builder = builder(Some(tokyo_weather()), yen(), Some(147.2), sample_costs());

        let report = builder.build(&tokyo_request()).await;

        assert_eq!(report.currency, yen());
        assert_eq!(report.daily_budget, 100.0);
        let totals = report.conversion.expect("conversion should be present");
        assert_eq!(totals.converted_budget, 147200.0);
        assert_eq!(totals.daily_budget, 14720.0);
        assert_eq!(report.weather, Some(tokyo_weather()));
        assert!(report.cost_of_living.is_some());
    }

    #[tokio::test]
    async fn weather_absence_defaults_currency_and_keeps_other_sections() {
        // Country can't be derived, so the resolver is handed None and the
        // currency falls back to USD. A 0.65 rate on a 1000/10 request gives
        // 650.00 converted and 65.00 converted daily.
        let builder = builder(None, yen(), Some(0.65), sample_costs());

        let report = builder.build(&tokyo_request()).await;

        assert!(report.weather.is_none());
        assert_eq!(report.currency, CurrencyInfo::usd());
        assert_eq!(report.daily_budget, 100.0);
        let totals = report.conversion.expect("conversion should be present");
        assert_eq!(totals.converted_budget, 650.0);
        assert_eq!(totals.daily_budget, 65.0);
        assert!(report.cost_of_living.is_some());
    }

    #[tokio::test]
    async fn missing_rate_blanks_only_the_conversion_section() {
        let builder = builder(Some(tokyo_weather()), yen(), None, sample_costs());

        let report = builder.build(&tokyo_request()).await;

        assert!(report.conversion.is_none());
        assert_eq!(report.daily_budget, 100.0);
        assert_eq!(report.currency, yen());
        assert!(report.weather.is_some());
        assert!(report.cost_of_living.is_some());
        assert!(report.render().contains("Currency conversion to JPY unavailable."));
    }

    #[tokio::test]
    async fn unknown_city_blanks_only_the_cost_section() {
        let builder = builder(Some(tokyo_weather()), yen(), Some(147.2), CostTable::default());

        let report = builder.build(&tokyo_request()).await;

        assert!(report.cost_of_living.is_none());
        assert!(report.weather.is_some());
        assert!(report.conversion.is_some());
    }

    #[tokio::test]
    async fn converted_totals_are_rounded_to_cents() {
        let request =
            TripRequest { destination: "Tokyo".to_string(), budget: 100.0, duration_days: 3 };
        let builder = builder(None, yen(), Some(0.333_333), sample_costs());

        let report = builder.build(&request).await;

        assert_eq!(report.daily_budget, 33.33);
        let totals = report.conversion.expect("conversion should be present");
        assert_eq!(totals.converted_budget, 33.33);
        assert_eq!(totals.daily_budget, 11.11);
    }

    #[tokio::test]
    async fn identical_inputs_render_identically() {
        let request = tokyo_request();
        let make = || builder(Some(tokyo_weather()), yen(), Some(147.2), sample_costs());

        let first = make().build(&request).await;
        let second = make().build(&request).await;

        assert_eq!(first, second);
        assert_eq!(first.render(), second.render());
    }

    #[tokio::test]
    async fn invalid_destination_makes_no_external_calls() {
        let builder = ReportBuilder::new(
            Sources {
                weather: Box::new(PanicWeather),
                currency: Box::new(PanicCurrency),
                rates: Box::new(PanicRate),
            },
            CostTable::default(),
        );

        let err = builder.plan("12345", "1000", "10").await.unwrap_err();

        assert_eq!(err, ValidationError::InvalidDestination);
        assert_eq!(err.to_string(), "Error: Destination must only contain letters and spaces.");
    }

    #[tokio::test]
    async fn plan_runs_the_pipeline_on_valid_input() {
        let builder = builder(Some(tokyo_weather()), yen(), Some(147.2), sample_costs());

        let report = builder.plan("Tokyo", "1000", "10").await.expect("plan should succeed");

        assert_eq!(report.request, tokyo_request());
        assert!(report.conversion.is_some());
    }
}
