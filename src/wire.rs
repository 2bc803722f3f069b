//! Field codecs for the persisted JSON format.
//!
//! The stored record comes from older app versions and hand-edited exports, so
//! decoding is lenient: numbers may arrive as JSON numbers or strings, dates as
//! ISO strings or empty strings, flags as booleans or strings. Anything
//! unusable decodes to the field's own fallback instead of failing the
//! whole record.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::inputs::parse_amount;

struct LenientAmount;

impl<'de> Visitor<'de> for LenientAmount {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(parse_amount(&v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(parse_amount(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LenientAmount)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

fn to_json_number<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero() {
        if let Some(i) = value.to_i64() {
            return s.serialize_i64(i);
        }
    }
    // Parsing the decimal text picks the nearest f64, which prints back as the same digits.
    let float = value.normalize().to_string().parse::<f64>().unwrap_or(0.0);
    s.serialize_f64(float)
}

/// A required amount: unusable input decodes to zero.
pub mod amount {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        to_json_number(value, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        Ok(d.deserialize_any(LenientAmount)?.unwrap_or(Decimal::ZERO))
    }
}

/// An optional amount: absent, null, empty or unusable input decodes to `None`.
pub mod optional_amount {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => to_json_number(v, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        d.deserialize_any(LenientAmount)
    }
}

/// Decodes a field, keeping `fallback` when the stored value does not fit the
/// field's type (an unknown enum variant, a string where a bool belongs...).
pub fn decode_or<'de, D, T>(d: D, fallback: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(d)?;
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(value = %raw, expected = std::any::type_name::<T>(), error = %e, "unusable field value; using fallback");
            Ok(fallback)
        }
    }
}

/// [`decode_or`] with the type's default as fallback.
pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    decode_or(d, T::default())
}

/// A free-text field: numbers and booleans keep their text, anything else is empty.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// A yes/no flag: accepts booleans, `"true"`/`"false"` strings and 0/1.
/// Anything else reads as `false`.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

/// A timestamp; unusable input reads as the current time.
pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = Value::deserialize(d)?;
    Ok(raw
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now))
}

/// An optional calendar date stored as `YYYY-MM-DD`, with `""` meaning "not set".
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(d)?;
        Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(parse_date))
    }

    /// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part is kept).
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
    }
}
