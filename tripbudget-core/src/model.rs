use serde::{Deserialize, Serialize};

/// A validated trip-planning request. Construct via [`crate::validate::validate`];
/// the fields are not re-checked anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub budget: f64,
    pub duration_days: u32,
}

/// Current weather at the destination, as reported by the weather provider.
///
/// All-or-nothing: either the provider answered with both its location and
/// current-conditions blocks and every field here is populated, or the whole
/// record is absent from the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    pub region: String,
    pub local_time: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub precipitation_mm: f64,
    pub uv_index: f64,
}

/// Currency resolved for the destination country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    /// 3-letter currency code, e.g. "JPY".
    pub code: String,
    /// Display symbol, e.g. "¥". Falls back to the code when the reference
    /// data carries no symbol.
    pub symbol: String,
}

impl CurrencyInfo {
    /// The fallback used whenever the destination currency cannot be resolved.
    pub fn usd() -> Self {
        Self { code: "USD".to_string(), symbol: "$".to_string() }
    }
}

impl Default for CurrencyInfo {
    fn default() -> Self {
        Self::usd()
    }
}

/// Result of an exchange-rate lookup.
///
/// `rate: None` means "conversion unavailable" and is distinct from a zero
/// rate; the target currency is carried through either way so the report can
/// still name it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub rate: Option<f64>,
    pub target: CurrencyInfo,
}

impl ExchangeQuote {
    pub fn unavailable(target: CurrencyInfo) -> Self {
        Self { rate: None, target }
    }
}

/// One matched row of the cost-of-living table: (category, value) pairs in
/// the table's column order, with the city/country key columns stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfLivingRecord {
    pub categories: Vec<(String, f64)>,
}

/// Budget totals expressed in the resolved target currency. Present on a
/// report exactly when the exchange rate was available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedTotals {
    pub converted_budget: f64,
    pub daily_budget: f64,
}

/// The final aggregate handed back to the caller. Optional sections reflect
/// which enrichment lookups succeeded; only validation can fail a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub request: TripRequest,
    /// Resolved target currency (the USD default when resolution failed).
    pub currency: CurrencyInfo,
    /// Daily budget in the base currency; always present.
    pub daily_budget: f64,
    pub conversion: Option<ConvertedTotals>,
    pub weather: Option<WeatherRecord>,
    pub cost_of_living: Option<CostOfLivingRecord>,
}

impl BudgetReport {
    /// Render the report as the user-facing text block. Missing sections are
    /// marked "unavailable" rather than omitted silently.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "You are planning a {}-day trip to {} with a budget of ${:.2}.\n",
            self.request.duration_days, self.request.destination, self.request.budget,
        ));
        out.push_str(&format!("Daily budget: ${:.2}\n", self.daily_budget));

        match &self.conversion {
            Some(totals) => {
                out.push_str(&format!(
                    "Budget in {}: {}{:.2}\n",
                    self.currency.code, self.currency.symbol, totals.converted_budget,
                ));
                out.push_str(&format!(
                    "Daily budget in {}: {}{:.2}\n",
                    self.currency.code, self.currency.symbol, totals.daily_budget,
                ));
            }
            None => {
                out.push_str(&format!(
                    "Currency conversion to {} unavailable.\n",
                    self.currency.code,
                ));
            }
        }

        match &self.weather {
            Some(w) => {
                out.push_str(&format!(
                    "Weather in {}, {} ({}): {:.0}°C (feels like {:.0}°C), \
                     humidity {}%, precipitation {}mm, UV index {}, local time {}\n",
                    w.city,
                    w.country,
                    w.region,
                    w.temperature_c,
                    w.feels_like_c,
                    w.humidity_pct,
                    w.precipitation_mm,
                    w.uv_index,
                    w.local_time,
                ));
            }
            None => out.push_str("Weather: unavailable\n"),
        }

        match &self.cost_of_living {
            Some(costs) => {
                out.push_str("Cost of living:\n");
                for (category, value) in &costs.categories {
                    out.push_str(&format!("  {category}: {value}\n"));
                }
            }
            None => out.push_str("Cost of living: unavailable\n"),
        }

        out
    }
}
