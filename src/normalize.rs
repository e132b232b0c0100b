//! Boundary adapters for the loosely typed wire formats of both services.
//!
//! Amounts may arrive as `"123.45"` or `123.45`, dates as `"2024-01-05"`, and
//! some objects either alone or wrapped in an array. Everything is resolved
//! here so the rest of the crate only sees `Decimal`, `Date` and `Vec`.

use crate::alias::Date;
use crate::error::Error;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Number(serde_json::Number),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(value) => value,
            RawScalar::Number(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

pub fn parse_amount(raw: &str) -> Result<Decimal, Error> {
    let value = unquote(raw);
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|error| Error::new_parse(format!("invalid amount {value:?} : {error}")))
}

pub fn parse_date(raw: &str) -> Result<Date, Error> {
    let value = unquote(raw);
    Date::parse_from_str(value, "%Y-%m-%d")
        .map_err(|error| Error::new_parse(format!("invalid date {value:?} : {error}")))
}

pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawScalar::deserialize(deserializer)?;
    parse_amount(&raw.into_text()).map_err(serde::de::Error::custom)
}

pub fn deserialize_option_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawScalar>::deserialize(deserializer)? {
        Some(raw) => {
            let text = raw.into_text();
            if unquote(&text).is_empty() {
                Ok(None)
            } else {
                parse_amount(&text).map(Some).map_err(serde::de::Error::custom)
            }
        }
        None => Ok(None),
    }
}

pub fn deserialize_option_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !unquote(&text).is_empty() => {
            parse_date(&text).map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Reads an explicit `null` as the default value of the field type.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn deserialize_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(match value {
        Some(OneOrMany::Many(values)) => values,
        Some(OneOrMany::One(value)) => vec![value],
        None => Vec::new(),
    })
}

/// Writes a balance as a quoted amount with two decimals.
pub fn serialize_option_balance<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(amount) => serializer.serialize_str(&format!("{:.2}", amount)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Serialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize_amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "deserialize_option_amount")]
        rate: Option<Decimal>,
        #[serde(default, deserialize_with = "deserialize_option_date")]
        date: Option<Date>,
        #[serde(default, deserialize_with = "deserialize_one_or_many")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "deserialize_null_default")]
        label: String,
        #[serde(default, deserialize_with = "deserialize_null_default")]
        tags: Vec<String>,
    }

    #[derive(Serialize)]
    struct Update {
        #[serde(serialize_with = "serialize_option_balance")]
        balance: Option<Decimal>,
    }

    #[test]
    fn parse_amount_01() {
        assert_eq!(parse_amount("-42.50").unwrap(), dec!(-42.50));
        assert_eq!(parse_amount("\"123.45\"").unwrap(), dec!(123.45));
        assert_eq!(parse_amount(" 12 ").unwrap(), dec!(12));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn parse_date_01() {
        assert_eq!(parse_date("2024-01-05").unwrap(), make_date_(2024, 1, 5));
        assert_eq!(parse_date("\"2024-02-29\"").unwrap(), make_date_(2024, 2, 29));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("05/01/2024").is_err());
    }

    #[test]
    fn amount_quoted_or_bare() {
        let quoted: Sample = serde_json::from_str(r#"{"amount":"-42.50"}"#).unwrap();
        assert_eq!(quoted.amount, dec!(-42.50));
        let bare: Sample = serde_json::from_str(r#"{"amount":10.25}"#).unwrap();
        assert_eq!(bare.amount, dec!(10.25));
        let integer: Sample = serde_json::from_str(r#"{"amount":7}"#).unwrap();
        assert_eq!(integer.amount, dec!(7));
        assert!(serde_json::from_str::<Sample>(r#"{"amount":"ten"}"#).is_err());
    }

    #[test]
    fn optional_fields() {
        let sample: Sample = serde_json::from_str(r#"{"amount":"1"}"#).unwrap();
        assert!(sample.rate.is_none());
        assert!(sample.date.is_none());
        assert!(sample.items.is_empty());

        let sample: Sample =
            serde_json::from_str(r#"{"amount":"1","rate":"","date":null}"#).unwrap();
        assert!(sample.rate.is_none());
        assert!(sample.date.is_none());

        let sample: Sample =
            serde_json::from_str(r#"{"amount":"1","rate":"1.0825","date":"2024-01-05"}"#)
                .unwrap();
        assert_eq!(sample.rate, Some(dec!(1.0825)));
        assert_eq!(sample.date, Some(make_date_(2024, 1, 5)));

        assert!(serde_json::from_str::<Sample>(r#"{"amount":"1","date":"yesterday"}"#).is_err());
    }

    #[test]
    fn null_reads_as_default() {
        let sample: Sample =
            serde_json::from_str(r#"{"amount":"1","label":null,"tags":null}"#).unwrap();
        assert!(sample.label.is_empty());
        assert!(sample.tags.is_empty());

        let sample: Sample =
            serde_json::from_str(r#"{"amount":"1","label":"x","tags":["a"]}"#).unwrap();
        assert_eq!(sample.label, "x");
        assert_eq!(sample.tags, vec!["a".to_string()]);

        let sample: Sample = serde_json::from_str(r#"{"amount":"1"}"#).unwrap();
        assert!(sample.label.is_empty());
    }

    #[test]
    fn one_or_many() {
        let one: Sample = serde_json::from_str(r#"{"amount":"1","items":"a"}"#).unwrap();
        assert_eq!(one.items, vec!["a".to_string()]);
        let many: Sample = serde_json::from_str(r#"{"amount":"1","items":["a","b"]}"#).unwrap();
        assert_eq!(many.items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn balance_written_as_string() {
        let update = Update {
            balance: Some(dec!(1234.5)),
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"balance":"1234.50"}"#
        );
    }

    fn make_date_(year: i32, month: u32, day: u32) -> Date {
        Date::from_ymd_opt(year, month, day).unwrap()
    }
}
