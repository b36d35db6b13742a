use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::models::labels::{country_label, purpose_label, type_label};
use crate::utils::constants::YIELD_BREAKPOINTS_KT;

/// Ordinal yield bucket. Intervals are right-closed, with zero in the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum YieldCategory {
    #[serde(rename = "<1kt")]
    Under1Kt,
    #[serde(rename = "1-10kt")]
    From1To10Kt,
    #[serde(rename = "10-100kt")]
    From10To100Kt,
    #[serde(rename = "100-1000kt")]
    From100To1000Kt,
    #[serde(rename = ">1000kt")]
    Over1000Kt,
}

impl YieldCategory {
    pub const ALL: [YieldCategory; 5] = [
        YieldCategory::Under1Kt,
        YieldCategory::From1To10Kt,
        YieldCategory::From10To100Kt,
        YieldCategory::From100To1000Kt,
        YieldCategory::Over1000Kt,
    ];

    pub fn from_yield(yield_kt: f64) -> Self {
        let bucket = YIELD_BREAKPOINTS_KT
            .iter()
            .position(|&upper| yield_kt <= upper)
            .unwrap_or(YIELD_BREAKPOINTS_KT.len());
        Self::ALL[bucket]
    }

    pub fn label(&self) -> &'static str {
        match self {
            YieldCategory::Under1Kt => "<1kt",
            YieldCategory::From1To10Kt => "1-10kt",
            YieldCategory::From10To100Kt => "10-100kt",
            YieldCategory::From100To1000Kt => "100-1000kt",
            YieldCategory::Over1000Kt => ">1000kt",
        }
    }
}

impl fmt::Display for YieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One cleaned and enriched detonation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DetonationRecord {
    pub id: u32,
    pub country_code: String,
    pub country: String,
    pub purpose_code: String,
    pub purpose_label: String,
    pub type_code: String,
    pub type_label: String,
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub decade: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0, message = "latitude outside [-90, 90]"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "longitude outside [-180, 180]"))]
    pub longitude: Option<f64>,

    /// Cleaned yield, never negative
    pub yield_kt: f64,

    pub yield_category: YieldCategory,
}

impl DetonationRecord {
    /// Normalize raw field values into a record, deriving labels, year,
    /// decade and yield category. Coordinates may be absent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        country_code: &str,
        purpose_code: &str,
        type_code: &str,
        date: Option<NaiveDate>,
        latitude: impl Into<Option<f64>>,
        longitude: impl Into<Option<f64>>,
        yield_kt: Option<f64>,
    ) -> Self {
        let yield_kt = clean_yield(yield_kt);
        let year = date.map(|d| d.year());

        Self {
            id,
            country_code: country_code.trim().to_string(),
            country: country_label(country_code).to_string(),
            purpose_code: purpose_code.trim().to_string(),
            purpose_label: purpose_label(purpose_code).to_string(),
            type_code: type_code.trim().to_string(),
            type_label: type_label(type_code).to_string(),
            date,
            year,
            decade: year.map(decade_of),
            latitude: latitude.into(),
            longitude: longitude.into(),
            yield_kt,
            yield_category: YieldCategory::from_yield(yield_kt),
        }
    }

    pub fn has_date(&self) -> bool {
        self.date.is_some()
    }

    /// Latitude and longitude, when both were readable
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Missing, non-finite and negative yields all become 0 kt.
pub fn clean_yield(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}
