//! Decoding of CF-convention time axes (`<unit> since <epoch>`).
//!
//! Only the standard (proleptic Gregorian) calendar is supported, which is
//! what ERA5 and most reanalysis products use.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{NetCdfError, NetCdfResult};

/// A parsed `units` attribute of a time variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    /// Length of one unit in milliseconds
    pub unit_ms: i64,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Parse strings such as `hours since 1900-01-01 00:00:00.0` or
    /// `seconds since 1970-01-01`.
    pub fn parse(units: &str) -> NetCdfResult<Self> {
        let invalid = || NetCdfError::InvalidTime(units.to_string());

        let lower = units.trim().to_ascii_lowercase();
        let (unit, epoch) = lower.split_once(" since ").ok_or_else(invalid)?;

        let unit_ms = match unit.trim() {
            "milliseconds" | "millisecond" | "msec" | "ms" => 1,
            "seconds" | "second" | "secs" | "sec" | "s" => 1_000,
            "minutes" | "minute" | "mins" | "min" => 60_000,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600_000,
            "days" | "day" | "d" => 86_400_000,
            _ => return Err(invalid()),
        };

        let epoch = parse_epoch(epoch.trim()).ok_or_else(invalid)?;
        Ok(Self { unit_ms, epoch })
    }

    /// Convert one raw axis value into a timestamp.
    pub fn decode(&self, value: f64) -> NetCdfResult<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(NetCdfError::InvalidTime(format!(
                "non-finite time value {}",
                value
            )));
        }
        let offset_ms = (value * self.unit_ms as f64).round() as i64;
        Ok(self.epoch + Duration::milliseconds(offset_ms))
    }

    /// Convert a whole axis.
    pub fn decode_all(&self, values: &[f64]) -> NetCdfResult<Vec<DateTime<Utc>>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    let s = s
        .trim_end_matches(" utc")
        .trim_end_matches('z')
        .trim_end_matches("+00:00")
        .trim();

    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dt%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dt%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dt%H:%M",
    ];

    for fmt in FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}
