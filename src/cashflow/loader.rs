//! Load dated cash flows from CSV
//!
//! Expected columns: `Date` (`YYYY-MM-DD`), `Amount`, and an optional
//! `Series` used to split one file into independent series.

use super::{CashFlow, CashFlowSeries, DEFAULT_SERIES_ID};
use crate::error::{Result, XirrError};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Series", default)]
    series: Option<String>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Amount")]
    amount: f64,
}

impl CsvRow {
    /// `row` is the 1-based data row, used for error reporting
    fn to_cashflow(&self, row: usize) -> Result<CashFlow> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            XirrError::InvalidDate {
                row,
                value: self.date.clone(),
            }
        })?;
        Ok(CashFlow::new(date, self.amount))
    }

    fn series_id(&self) -> &str {
        match self.series.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_SERIES_ID,
        }
    }
}

fn read_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load every row of a CSV file as one series, in file order
pub fn load_cashflows<P: AsRef<Path>>(path: P) -> Result<Vec<CashFlow>> {
    let file = std::fs::File::open(path)?;
    load_cashflows_from_reader(file)
}

/// Load every row from any reader (e.g., string buffer, stdin) as one series
pub fn load_cashflows_from_reader<R: Read>(reader: R) -> Result<Vec<CashFlow>> {
    read_rows(reader)?
        .iter()
        .enumerate()
        .map(|(i, row)| row.to_cashflow(i + 1))
        .collect()
}

/// Load a CSV file and group its rows by the `Series` column
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<Vec<CashFlowSeries>> {
    let file = std::fs::File::open(path)?;
    load_series_from_reader(file)
}

/// Group rows from any reader by the `Series` column
///
/// Series are returned in order of first appearance; flows keep file order
/// within each series.
pub fn load_series_from_reader<R: Read>(reader: R) -> Result<Vec<CashFlowSeries>> {
    let mut series: Vec<CashFlowSeries> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, row) in read_rows(reader)?.iter().enumerate() {
        let flow = row.to_cashflow(i + 1)?;
        let id = row.series_id();
        let slot = match index.get(id) {
            Some(&slot) => slot,
            None => {
                series.push(CashFlowSeries::new(id, Vec::new()));
                index.insert(id.to_string(), series.len() - 1);
                series.len() - 1
            }
        };
        series[slot].flows.push(flow);
    }

    log::debug!("Loaded {} cash flow series", series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_single_series() {
        let csv = "Date,Amount\n2019-01-01,-100\n2020-01-01, 112.5\n";
        let flows = load_cashflows_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(flows[0].amount, -100.0);
        assert_eq!(flows[1].amount, 112.5);
    }

    #[test]
    fn test_group_series_in_order_of_appearance() {
        let csv = "Series,Date,Amount\n\
                   b,2019-01-01,-50\n\
                   a,2019-01-01,-100\n\
                   b,2019-06-01,55\n\
                   ,2019-01-01,-1\n\
                   a,2020-01-01,112\n";
        let series = load_series_from_reader(csv.as_bytes()).unwrap();

        let ids: Vec<&str> = series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", DEFAULT_SERIES_ID]);
        assert_eq!(series[0].flows.len(), 2);
        assert_eq!(series[0].flows[1].amount, 55.0);
        assert_eq!(series[1].flows[1].amount, 112.0);
        assert_eq!(series[2].flows.len(), 1);
    }

    #[test]
    fn test_invalid_date_reports_row() {
        let csv = "Date,Amount\n2019-01-01,-100\n01/01/2020,112\n";
        match load_cashflows_from_reader(csv.as_bytes()) {
            Err(XirrError::InvalidDate { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "01/01/2020");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_amount_is_csv_error() {
        let csv = "Date,Amount\n2019-01-01,lots\n";
        assert!(matches!(
            load_cashflows_from_reader(csv.as_bytes()),
            Err(XirrError::Csv(_))
        ));
    }

    #[test]
    fn test_load_sample_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_cashflows.csv");
        let series = load_series(&path).expect("Failed to load sample cash flows");

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].id, "doubling");
        assert!(series.iter().all(|s| !s.is_empty()));
    }
}
