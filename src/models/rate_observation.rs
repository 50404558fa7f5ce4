use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::HistoryError;

/// Date layout used by the upstream provider.
pub const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%d";

// One upstream reading after its fields have been extracted and coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct RateObservation {
    pub date: NaiveDate,
    pub dollar: f64,
}

impl RateObservation {
    /// Extracts `date` and `dollar` from a raw upstream entry.
    pub fn from_value(entry: &Value) -> Result<Self, HistoryError> {
        let date = entry
            .get("date")
            .ok_or_else(|| HistoryError::DataStructure("date".into()))?;
        let dollar = entry
            .get("dollar")
            .ok_or_else(|| HistoryError::DataStructure("dollar".into()))?;

        Ok(Self {
            date: parse_date(date)?,
            dollar: parse_dollar(dollar)?,
        })
    }
}

/// Accepts either a `YYYY-MM-DD` string or a structured
/// `{"year": .., "month": .., "day": ..}` value.
pub fn parse_date(value: &Value) -> Result<NaiveDate, HistoryError> {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), UPSTREAM_DATE_FORMAT)
            .map_err(|e| HistoryError::InvalidData(format!("date '{}': {}", s, e))),
        Value::Object(fields) => {
            let part = |name: &str| {
                fields
                    .get(name)
                    .and_then(Value::as_u64)
                    .ok_or_else(|| HistoryError::DataStructure(format!("date.{}", name)))
            };
            let year = i32::try_from(part("year")?)
                .map_err(|_| HistoryError::InvalidData("date year out of range".into()))?;
            let month = u32::try_from(part("month")?)
                .map_err(|_| HistoryError::InvalidData("date month out of range".into()))?;
            let day = u32::try_from(part("day")?)
                .map_err(|_| HistoryError::InvalidData("date day out of range".into()))?;

            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                HistoryError::InvalidData(format!("date {}-{}-{} does not exist", year, month, day))
            })
        }
        other => Err(HistoryError::InvalidData(format!("unsupported date value: {}", other))),
    }
}

/// Coerces a JSON number or numeric string to a finite float.
pub fn parse_dollar(value: &Value) -> Result<f64, HistoryError> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match rate {
        Some(r) if r.is_finite() => Ok(r),
        _ => Err(HistoryError::InvalidData(format!("dollar '{}' is not a number", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_iso_date_and_string_rate() {
        let obs = RateObservation::from_value(&json!({"date": "2024-03-05", "dollar": "45.5"})).unwrap();
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(obs.dollar, 45.5);
    }

    #[test]
    fn test_parses_structured_date_and_numeric_rate() {
        let obs = RateObservation::from_value(&json!({
            "date": {"year": 2023, "month": 12, "day": 31},
            "dollar": 36.01
        }))
        .unwrap();
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(obs.dollar, 36.01);
    }

    #[test]
    fn test_missing_key_is_data_structure_error() {
        let err = RateObservation::from_value(&json!({"date": "2024-03-05"})).unwrap_err();
        assert!(matches!(err, HistoryError::DataStructure(ref k) if k == "dollar"));

        let err = RateObservation::from_value(&json!({"dollar": 1.0})).unwrap_err();
        assert!(matches!(err, HistoryError::DataStructure(ref k) if k == "date"));
    }

    #[test]
    fn test_rejects_other_date_layouts() {
        let err = parse_date(&json!("05/03/2024")).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidData(_)));

        let err = parse_date(&json!({"year": 2024, "month": 2, "day": 30})).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidData(_)));
    }

    #[test]
    fn test_rejects_oversized_structured_date_parts() {
        let err = parse_date(&json!({"year": 2024, "month": 4294967299u64, "day": 5})).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidData(_)));

        let err = parse_date(&json!({"year": 2024, "month": 3, "day": 4294967301u64})).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidData(_)));
    }

    #[test]
    fn test_rejects_non_numeric_rates() {
        assert!(parse_dollar(&json!("abc")).is_err());
        assert!(parse_dollar(&json!(null)).is_err());
        assert!(parse_dollar(&json!("NaN")).is_err());
        assert_eq!(parse_dollar(&json!(" 40.0 ")).unwrap(), 40.0);
    }
}
