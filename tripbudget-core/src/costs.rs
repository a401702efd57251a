//! Static cost-of-living reference table.
//!
//! Loaded once at process start from a CSV file whose header row names the
//! columns. The `city` and `country` columns are key columns; every other
//! column is a cost category. The loaded table is read-only and shared.

use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};

use crate::model::CostOfLivingRecord;

#[derive(Debug, Clone)]
struct CostRow {
    city: String,
    categories: Vec<(String, f64)>,
}

/// In-memory cost-of-living table, preserving file row and column order.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    rows: Vec<CostRow>,
}

impl CostTable {
    /// Load the table from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open cost-of-living table: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to read cost-of-living table: {}", path.display()))
    }

    /// Parse the table from any CSV source. Rows with no parseable city cell
    /// are skipped; non-numeric category cells are skipped per row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);

        let headers = csv
            .headers()
            .context("Cost-of-living table has no header row")?
            .clone();

        let city_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("city"))
            .context("Cost-of-living table has no 'city' column")?;
        let country_idx = headers.iter().position(|h| h.eq_ignore_ascii_case("country"));

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record.context("Failed to parse cost-of-living table row")?;

            let Some(city) = record.get(city_idx) else {
                continue;
            };

            let mut categories = Vec::new();
            for (idx, header) in headers.iter().enumerate() {
                if idx == city_idx || Some(idx) == country_idx {
                    continue;
                }
                if let Some(value) = record.get(idx).and_then(|v| v.trim().parse::<f64>().ok()) {
                    categories.push((header.to_string(), value));
                }
            }

            rows.push(CostRow { city: city.trim().to_string(), categories });
        }

        Ok(Self { rows })
    }

    /// Case-insensitive exact match on the city column; the first matching
    /// row wins when duplicates exist (table order).
    pub fn lookup(&self, city: &str) -> Option<CostOfLivingRecord> {
        self.rows
            .iter()
            .find(|row| row.city.eq_ignore_ascii_case(city.trim()))
            .map(|row| CostOfLivingRecord { categories: row.categories.clone() })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
city,country,meal,rent,transport
Tokyo,Japan,8.5,1200,1.7
Paris,France,14.0,1100,1.9
paris,Mock,1.0,1.0,1.0
Lima,Peru,4.2,450,0.5
";

    fn table() -> CostTable {
        CostTable::from_reader(SAMPLE.as_bytes()).expect("sample table should parse")
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let record = table().lookup("TOKYO").expect("Tokyo should match");

        assert_eq!(
            record.categories,
            vec![
                ("meal".to_string(), 8.5),
                ("rent".to_string(), 1200.0),
                ("transport".to_string(), 1.7),
            ]
        );
    }

    #[test]
    fn key_columns_are_excluded_from_the_record() {
        let record = table().lookup("Lima").expect("Lima should match");

        assert!(record.categories.iter().all(|(name, _)| name != "city" && name != "country"));
        assert_eq!(record.categories.len(), 3);
    }

    #[test]
    fn first_matching_row_wins() {
        let record = table().lookup("Paris").expect("Paris should match");

        // The real France row comes first in table order.
        assert_eq!(record.categories[0], ("meal".to_string(), 14.0));
    }

    #[test]
    fn no_match_returns_none() {
        assert!(table().lookup("Atlantis").is_none());
    }

    #[test]
    fn missing_city_column_is_an_error() {
        let err = CostTable::from_reader("town,meal\nTokyo,8.5\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no 'city' column"));
    }

    #[test]
    fn non_numeric_cells_are_skipped() {
        let table = CostTable::from_reader(
            "city,country,meal,note\nOslo,Norway,18.0,expensive\n".as_bytes(),
        )
        .expect("table should parse");

        let record = table.lookup("Oslo").expect("Oslo should match");
        assert_eq!(record.categories, vec![("meal".to_string(), 18.0)]);
    }
}
