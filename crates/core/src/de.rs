//! Lenient field deserializers for upstream records.
//!
//! Records come from a schemaless document store, so any field can be
//! missing, `null`, or of an unexpected shape. These helpers map such values
//! to a neutral default instead of rejecting the whole record. Use them with
//! `#[serde(default, deserialize_with = "...")]`.

use std::str::FromStr;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::Timestamp;

/// Parse a string field into `T`, yielding `None` when absent or unrecognized.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

/// Parse a timestamp, yielding `None` when absent or malformed.
///
/// Accepts everything [`Timestamp::parse`] does plus millisecond epoch
/// numbers. Zoneless strings stay wall-clock readings.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Timestamp::parse(&s),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(Timestamp::Instant),
        _ => None,
    })
}

/// Parse a boolean, treating anything but `true`/`"true"` as `false`.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Parse a signed quantity, fractions included, yielding zero when absent or
/// malformed.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_quantity<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// Parse an optional unsigned count, yielding `None` when absent or malformed.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parse an optional string, yielding `None` for non-strings.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse an optional decimal amount from a number or a numeric string.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_owned(),
        _ => return Ok(None),
    };
    Ok(Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok())
}

/// Parse an optional reference to another entity.
///
/// Accepts a bare ID (string or number) or an embedded document carrying
/// `_id`/`id`, which is what the upstream API returns for populated
/// references.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn lenient_ref<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(id_string)
        .map(T::from))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("_id").or_else(|| map.get("id")).and_then(id_string),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::OrderStatus;
    use chrono::Timelike;

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "lenient")]
        status: Option<OrderStatus>,
        #[serde(default, deserialize_with = "lenient_datetime")]
        at: Option<Timestamp>,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_quantity")]
        qty: Decimal,
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let record: Record = serde_json::from_str("{}").unwrap();
        assert!(record.status.is_none());
        assert!(record.at.is_none());
        assert!(!record.flag);
        assert_eq!(record.qty, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_fields_take_defaults() {
        let record: Record =
            serde_json::from_str(r#"{"status":"shipped","at":"soon","flag":1,"qty":"many"}"#)
                .unwrap();
        assert!(record.status.is_none());
        assert!(record.at.is_none());
        assert!(!record.flag);
        assert_eq!(record.qty, Decimal::ZERO);
    }

    #[test]
    fn test_well_formed_fields_parse() {
        let record: Record = serde_json::from_str(
            r#"{"status":"completed","at":"2025-04-02T23:59:59Z","flag":true,"qty":12.7}"#,
        )
        .unwrap();
        assert_eq!(record.status, Some(OrderStatus::Completed));
        assert_eq!(record.at.unwrap().in_zone(&chrono::Utc).hour(), 23);
        assert!(record.flag);
        assert_eq!(record.qty, Decimal::new(127, 1));
    }

    #[derive(Deserialize)]
    struct RefRecord {
        #[serde(default, deserialize_with = "lenient_ref")]
        building: Option<crate::BuildingId>,
    }

    #[test]
    fn test_lenient_ref_shapes() {
        let bare: RefRecord = serde_json::from_str(r#"{"building":"b1"}"#).unwrap();
        assert_eq!(bare.building.unwrap().as_str(), "b1");
        let populated: RefRecord =
            serde_json::from_str(r#"{"building":{"_id":"b2","name":"Tower"}}"#).unwrap();
        assert_eq!(populated.building.unwrap().as_str(), "b2");
        let numeric: RefRecord = serde_json::from_str(r#"{"building":7}"#).unwrap();
        assert_eq!(numeric.building.unwrap().as_str(), "7");
        let empty: RefRecord = serde_json::from_str(r#"{"building":""}"#).unwrap();
        assert!(empty.building.is_none());
    }

    #[test]
    fn test_zoneless_and_epoch_timestamps() {
        let wall: Record = serde_json::from_str(r#"{"at":"2025-04-02T23:59:59"}"#).unwrap();
        assert!(matches!(wall.at, Some(Timestamp::WallClock(_))));
        let epoch: Record = serde_json::from_str(r#"{"at":1743638399000}"#).unwrap();
        assert_eq!(epoch.at, Timestamp::parse("2025-04-02T23:59:59Z"));
    }

    #[test]
    fn test_fractional_quantity_is_kept() {
        let record: Record = serde_json::from_str(r#"{"qty":"0.5"}"#).unwrap();
        assert_eq!(record.qty, Decimal::new(5, 1));
        let negative: Record = serde_json::from_str(r#"{"qty":-1.25}"#).unwrap();
        assert_eq!(negative.qty, Decimal::new(-125, 2));
    }
}
