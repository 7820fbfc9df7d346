use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use crate::utils::coordinates::wkt_point;

/// One CSV row as exported, before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNdviRow {
    #[serde(rename = "system:index", default)]
    pub system_index: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub ndvi_value: String,
    pub measurement_date: String,
}

/// Timestamp of an observation, keeping whether the source carried an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementTime {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

impl MeasurementTime {
    /// Parse the date formats seen in NDVI exports.
    ///
    /// Purely numeric values of eight digits are read as `YYYYMMDD`; longer
    /// ones as milliseconds since the Unix epoch (UTC, stored naive).
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(compact) = Self::parse_compact_date(trimmed) {
            return Some(compact);
        }

        if let Some(millis) = Self::parse_epoch_millis(trimmed) {
            return Some(millis);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(MeasurementTime::Zoned(dt));
        }

        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
                return Some(MeasurementTime::Zoned(dt));
            }
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(MeasurementTime::Naive(dt));
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return date.and_hms_opt(0, 0, 0).map(MeasurementTime::Naive);
            }
        }

        None
    }

    fn parse_compact_date(value: &str) -> Option<Self> {
        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let year = value[0..4].parse::<i32>().ok()?;
        let month = value[4..6].parse::<u32>().ok()?;
        let day = value[6..8].parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(MeasurementTime::Naive)
    }

    fn parse_epoch_millis(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('-').unwrap_or(value);
        if digits.len() < 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let millis = value.parse::<i64>().ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| MeasurementTime::Naive(dt.naive_utc()))
    }

    pub fn naive(&self) -> NaiveDateTime {
        match self {
            MeasurementTime::Naive(dt) => *dt,
            MeasurementTime::Zoned(dt) => dt.naive_local(),
        }
    }

    /// ISO-8601 text: `YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]`
    pub fn to_iso8601(&self) -> String {
        let naive = self.naive();
        let fraction = if naive.nanosecond() == 0 {
            ""
        } else if naive.nanosecond() % 1_000 == 0 {
            "%.6f"
        } else {
            "%.9f"
        };

        match self {
            MeasurementTime::Naive(dt) => dt
                .format(&format!("%Y-%m-%dT%H:%M:%S{}", fraction))
                .to_string(),
            MeasurementTime::Zoned(dt) => dt
                .format(&format!("%Y-%m-%dT%H:%M:%S{}%:z", fraction))
                .to_string(),
        }
    }
}

impl std::fmt::Display for MeasurementTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl Serialize for MeasurementTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

/// A single NDVI observation shaped as a row of the remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NdviRecord {
    #[serde(skip)]
    pub source_index: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub ndvi_value: f64,

    pub measurement_date: MeasurementTime,

    pub geo: String,
}

impl NdviRecord {
    pub fn new(
        source_index: Option<String>,
        latitude: f64,
        longitude: f64,
        ndvi_value: f64,
        measurement_date: MeasurementTime,
    ) -> Self {
        Self {
            source_index,
            latitude,
            longitude,
            ndvi_value,
            measurement_date,
            geo: wkt_point(longitude, latitude),
        }
    }
}
