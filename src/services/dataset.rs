// src/services/dataset.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::Reader;
use log::{info, warn};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{ForecastError, Result};
use crate::models::Record;

const EMBEDDED_DATASET: &str = include_str!("../../data/savings_and_current_account_data.json");

/// Row shape shared by the JSON and CSV datasets.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Savings_Account_Balance")]
    savings: Option<f64>,
    #[serde(rename = "Current_Account_Expenditure")]
    expenditure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Embedded,
    JsonFile(PathBuf),
    CsvFile(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Picks JSON or CSV from the file extension, defaulting to JSON.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            DatasetSource::CsvFile(path)
        } else {
            DatasetSource::JsonFile(path)
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Embedded => "embedded dataset".to_string(),
            DatasetSource::JsonFile(p) => format!("JSON file {}", p.display()),
            DatasetSource::CsvFile(p) => format!("CSV file {}", p.display()),
            DatasetSource::Url(url) => format!("feed {}", url),
        }
    }

    pub async fn load(&self) -> Result<Vec<Record>> {
        info!("Loading records from {}", self.describe());
        let records = match self {
            DatasetSource::Embedded => parse_json(EMBEDDED_DATASET)?,
            DatasetSource::JsonFile(path) => parse_json(&tokio::fs::read_to_string(path).await?)?,
            DatasetSource::CsvFile(path) => parse_csv(&tokio::fs::read_to_string(path).await?)?,
            DatasetSource::Url(url) => {
                let body = reqwest::get(url).await?.error_for_status()?.text().await?;
                parse_json(&body)?
            }
        };
        info!("Loaded {} records", records.len());
        Ok(records)
    }
}

pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    let raw: Vec<RawRecord> = serde_json::from_str(text)?;
    into_records(raw)
}

pub fn parse_csv(text: &str) -> Result<Vec<Record>> {
    let mut rdr = Reader::from_reader(text.as_bytes());
    let raw = rdr.deserialize().collect::<std::result::Result<Vec<RawRecord>, _>>()?;
    into_records(raw)
}

fn into_records(raw: Vec<RawRecord>) -> Result<Vec<Record>> {
    if raw.is_empty() {
        return Err(ForecastError::invalid_input("dataset contains no records"));
    }

    let mut records = Vec::with_capacity(raw.len());
    for (idx, row) in raw.into_iter().enumerate() {
        let date = parse_date(&row.date).ok_or_else(|| {
            ForecastError::Dataset(format!("record {}: unrecognized date '{}'", idx, row.date))
        })?;
        let savings = finite_field(idx, "Savings_Account_Balance", row.savings)?;
        let expenditure = finite_field(idx, "Current_Account_Expenditure", row.expenditure)?;
        records.push(Record::new(date, savings, expenditure));
    }

    if records.windows(2).any(|w| w[1].date < w[0].date) {
        warn!("Records are not in chronological order; keeping the given order");
    }
    Ok(records)
}

fn finite_field(idx: usize, name: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(ForecastError::invalid_input(format!(
            "record {}: {} is not finite ({})",
            idx, name, v
        ))),
        None => Err(ForecastError::invalid_input(format!(
            "record {}: {} is missing",
            idx, name
        ))),
    }
}

/// Accepts `YYYY-MM-DD`, US-style `MM/DD/YYYY`, RFC 3339 timestamps,
/// `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_json() {
        let text = r#"[
            {"Date": "2024-01-31", "Savings_Account_Balance": 1000.5, "Current_Account_Expenditure": 250},
            {"Date": "2024-02-29T00:00:00Z", "Savings_Account_Balance": 1100, "Current_Account_Expenditure": 260.25}
        ]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(records[0].savings, 1000.5);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(records[1].expenditure, 260.25);
    }

    #[test]
    fn missing_value_is_invalid_input() {
        let text = r#"[{"Date": "2024-01-31", "Savings_Account_Balance": null, "Current_Account_Expenditure": 250}]"#;
        let err = parse_json(text).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("Savings_Account_Balance is missing"));
    }

    #[test]
    fn parses_csv_with_empty_cell_as_missing() {
        let text = "Date,Savings_Account_Balance,Current_Account_Expenditure\n\
                    2024-01-31,1000,250\n\
                    2024-02-29,1100,260\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].savings, 1100.0);

        let broken = "Date,Savings_Account_Balance,Current_Account_Expenditure\n2024-01-31,,250\n";
        assert!(parse_csv(broken).unwrap_err().is_invalid_input());
    }

    #[test]
    fn bad_date_and_empty_dataset_are_rejected() {
        let text = r#"[{"Date": "last tuesday", "Savings_Account_Balance": 1, "Current_Account_Expenditure": 2}]"#;
        assert!(matches!(parse_json(text), Err(ForecastError::Dataset(_))));
        assert!(parse_json("[]").unwrap_err().is_invalid_input());
        assert!(matches!(parse_json("{"), Err(ForecastError::Json(_))));
    }

    #[test]
    fn accepts_us_style_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("03/09/2024"), Some(expected));
        assert_eq!(parse_date("3/9/2024"), Some(expected));
        assert_eq!(parse_date("2024-03-09 12:30:00"), Some(expected));
        assert_eq!(parse_date("13/01/2024"), None);

        let text = r#"[{"Date": "1/31/2024", "Savings_Account_Balance": 1, "Current_Account_Expenditure": 2}]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[tokio::test]
    async fn loads_csv_file_from_disk() {
        let path = std::env::temp_dir().join(format!("forecast-records-{}.csv", std::process::id()));
        tokio::fs::write(
            &path,
            "Date,Savings_Account_Balance,Current_Account_Expenditure\n2024-01-31,1000,250\n",
        )
        .await
        .unwrap();
        let records = DatasetSource::from_path(&path).load().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expenditure, 250.0);

        let missing = DatasetSource::JsonFile("does/not/exist.json".into()).load().await;
        assert!(matches!(missing, Err(ForecastError::Io(_))));
    }

    #[test]
    fn source_from_extension() {
        assert_eq!(DatasetSource::from_path("a/b.CSV"), DatasetSource::CsvFile("a/b.CSV".into()));
        assert_eq!(DatasetSource::from_path("a/b.json"), DatasetSource::JsonFile("a/b.json".into()));
    }

    #[tokio::test]
    async fn embedded_dataset_loads() {
        let records = DatasetSource::Embedded.load().await.unwrap();
        assert_eq!(records.len(), 24);
        assert!(records.windows(2).all(|w| w[0].date < w[1].date));
    }
}
