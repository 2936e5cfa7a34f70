// BMI Record - one measurement event
// Created only from a validated submission; bmi/category come from the classifier.

use crate::classifier::{check_positive, classify, Category, Classification};
use crate::error::{BmiError, Result};
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Column order of the persisted table
pub const COLUMNS: [&str; 6] = ["Name", "Weight", "Height", "BMI", "Category", "Date"];

/// `Date` column format, second precision
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// SUBMISSION (raw form input)
// ============================================================================

/// Validated form input: trimmed name plus positive, finite measurements
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub weight_kg: f64,
    pub height_m: f64,
}

impl Submission {
    /// Parse the three raw text fields of the entry form
    pub fn parse(name: &str, weight: &str, height: &str) -> Result<Self> {
        let name = normalize_name(name)?;
        let weight_kg = parse_measurement("weight", weight)?;
        let height_m = parse_measurement("height", height)?;

        Ok(Submission {
            name,
            weight_kg,
            height_m,
        })
    }
}

fn parse_measurement(field: &'static str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BmiError::measurement(field, "is required"));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| BmiError::measurement(field, format!("'{}' is not a number", trimmed)))?;

    check_positive(field, value)?;
    Ok(value)
}

/// Trim a user-supplied name; empty or whitespace-only is rejected
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BmiError::InvalidName);
    }
    Ok(trimmed.to_string())
}

/// Owner key: names compare case-insensitively
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============================================================================
// RECORD
// ============================================================================

/// Rows are rebuilt through the classifier on load, see `CsvRow`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CsvRow")]
pub struct BmiRecord {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "Weight")]
    weight_kg: f64,

    #[serde(rename = "Height")]
    height_m: f64,

    #[serde(rename = "BMI")]
    bmi: f64,

    #[serde(rename = "Category")]
    category: Category,

    #[serde(rename = "Date", with = "date_format")]
    timestamp: NaiveDateTime,
}

impl BmiRecord {
    /// Classify a submission and stamp it with the current local time
    pub fn from_submission(submission: Submission) -> Result<Self> {
        let now = Local::now().naive_local().trunc_subsecs(0);
        Self::new_at(&submission.name, submission.weight_kg, submission.height_m, now)
    }

    /// Build a record with an explicit timestamp (sub-second part is dropped)
    pub fn new_at(
        name: &str,
        weight_kg: f64,
        height_m: f64,
        timestamp: NaiveDateTime,
    ) -> Result<Self> {
        let name = normalize_name(name)?;
        let Classification { bmi, category } = classify(weight_kg, height_m)?;

        Ok(BmiRecord {
            name,
            weight_kg,
            height_m,
            bmi,
            category,
            timestamp: timestamp.trunc_subsecs(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn classification(&self) -> Classification {
        Classification {
            bmi: self.bmi,
            category: self.category,
        }
    }

    /// `Date` column text
    pub fn date_string(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }

    /// Case-insensitive owner match
    pub fn belongs_to(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }
}

// ============================================================================
// PERSISTED ROW
// ============================================================================

/// Largest gap tolerated between a stored `BMI` and the recomputed one.
/// Covers writers that round half-to-even instead of half away from zero.
const BMI_TOLERANCE: f64 = 0.01 + 1e-9;

/// One CSV row as written on disk, before any of it is trusted
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "Weight")]
    weight_kg: f64,

    #[serde(rename = "Height")]
    height_m: f64,

    #[serde(rename = "BMI")]
    bmi: f64,

    #[serde(rename = "Category")]
    category: String,

    #[serde(rename = "Date", with = "date_format")]
    timestamp: NaiveDateTime,
}

impl TryFrom<CsvRow> for BmiRecord {
    type Error = String;

    fn try_from(row: CsvRow) -> std::result::Result<Self, Self::Error> {
        let stored_category = row
            .category
            .parse::<Category>()
            .map_err(|e| e.to_string())?;
        let record = BmiRecord::new_at(&row.name, row.weight_kg, row.height_m, row.timestamp)
            .map_err(|e| e.to_string())?;

        if (record.bmi - row.bmi).abs() > BMI_TOLERANCE {
            return Err(format!(
                "stored BMI {} for '{}' does not match {} computed from weight and height",
                row.bmi, record.name, record.bmi
            ));
        }
        if record.category != stored_category {
            return Err(format!(
                "stored category {} for '{}' does not match {} computed from weight and height",
                stored_category, record.name, record.category
            ));
        }

        Ok(record)
    }
}

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_submission_parse_ok() {
        let s = Submission::parse("  Ada  ", " 70 ", "1.75").unwrap();
        assert_eq!(s.name, "Ada");
        assert_eq!(s.weight_kg, 70.0);
        assert_eq!(s.height_m, 1.75);
    }

    #[test]
    fn test_submission_rejects_blank_name() {
        let err = Submission::parse("   ", "70", "1.75").unwrap_err();
        assert!(matches!(err, BmiError::InvalidName));
    }

    #[test]
    fn test_submission_rejects_bad_numbers() {
        for (w, h, field) in [
            ("abc", "1.75", "weight"),
            ("", "1.75", "weight"),
            ("70", "tall", "height"),
            ("70", "0", "height"),
            ("-70", "1.75", "weight"),
            ("NaN", "1.75", "weight"),
            ("70", "inf", "height"),
        ] {
            match Submission::parse("Ada", w, h) {
                Err(BmiError::InvalidMeasurement { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidMeasurement for ({w}, {h}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_record_is_consistent_with_classifier() {
        let rec = BmiRecord::new_at("Ada", 90.0, 1.70, at(9, 30, 0)).unwrap();
        assert_eq!(rec.bmi(), 31.14);
        assert_eq!(rec.category(), Category::Obese);
        assert_eq!(rec.classification(), classify(90.0, 1.70).unwrap());
    }

    #[test]
    fn test_timestamp_has_second_precision() {
        let with_nanos = at(9, 30, 15).with_nanosecond(123_456_789).unwrap();
        let rec = BmiRecord::new_at("Ada", 70.0, 1.75, with_nanos).unwrap();
        assert_eq!(rec.timestamp(), at(9, 30, 15));
        assert_eq!(rec.date_string(), "2025-03-14 09:30:15");

        let live = BmiRecord::from_submission(Submission::parse("Ada", "70", "1.75").unwrap()).unwrap();
        assert_eq!(live.timestamp().nanosecond(), 0);
    }

    #[test]
    fn test_belongs_to_ignores_case_and_padding() {
        let rec = BmiRecord::new_at("Ada Lovelace", 70.0, 1.75, at(8, 0, 0)).unwrap();
        assert!(rec.belongs_to("ada lovelace"));
        assert!(rec.belongs_to("  ADA LOVELACE "));
        assert!(!rec.belongs_to("Ada"));
    }

    #[test]
    fn test_row_is_rebuilt_through_classifier() {
        let row = CsvRow {
            name: " Ada ".to_string(),
            weight_kg: 70.0,
            height_m: 1.75,
            bmi: 22.86,
            category: "normal".to_string(),
            timestamp: at(8, 0, 0),
        };
        let rec = BmiRecord::try_from(row).unwrap();
        assert_eq!(rec, BmiRecord::new_at("Ada", 70.0, 1.75, at(8, 0, 0)).unwrap());
    }

    #[test]
    fn test_row_with_inconsistent_bmi_or_category_is_rejected() {
        let row = |bmi: f64, category: &str| CsvRow {
            name: "Ada".to_string(),
            weight_kg: 70.0,
            height_m: 1.75,
            bmi,
            category: category.to_string(),
            timestamp: at(8, 0, 0),
        };

        assert!(BmiRecord::try_from(row(99.0, "Underweight")).is_err());
        assert!(BmiRecord::try_from(row(22.86, "Obese")).is_err());
        assert!(BmiRecord::try_from(row(22.86, "Skinny")).is_err());
        // one-cent rounding differences are accepted and re-derived
        assert_eq!(BmiRecord::try_from(row(22.85, "Normal")).unwrap().bmi(), 22.86);
    }

    #[test]
    fn test_row_with_invalid_measurement_is_rejected() {
        let row = CsvRow {
            name: "Ada".to_string(),
            weight_kg: 70.0,
            height_m: 0.0,
            bmi: 0.0,
            category: "Obese".to_string(),
            timestamp: at(8, 0, 0),
        };
        assert!(BmiRecord::try_from(row).is_err());
    }

    #[test]
    fn test_new_at_rejects_blank_name() {
        assert!(matches!(
            BmiRecord::new_at(" ", 70.0, 1.75, at(8, 0, 0)),
            Err(BmiError::InvalidName)
        ));
    }
}
