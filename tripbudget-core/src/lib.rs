//! Core library for the `tripbudget` CLI.
//!
//! This crate defines:
//! - Request validation and the fatal/non-fatal error split
//! - Abstraction over the external data sources (weather, country
//!   reference, exchange rates) with absence-on-failure semantics
//! - The static cost-of-living reference table
//! - The report builder that aggregates everything into one best-effort
//!   budget report
//!
//! It is used by `tripbudget-cli`, but can also be reused by other binaries
//! or services.

pub mod config;
pub mod costs;
pub mod model;
pub mod report;
pub mod source;
pub mod validate;

pub use config::{Config, ServiceConfig};
pub use costs::CostTable;
pub use model::{
    BudgetReport, ConvertedTotals, CostOfLivingRecord, CurrencyInfo, ExchangeQuote, TripRequest,
    WeatherRecord,
};
pub use report::{BASE_CURRENCY, ReportBuilder};
pub use source::{CurrencySource, RateSource, ServiceId, Sources, WeatherSource};
pub use validate::{ValidationError, validate};
