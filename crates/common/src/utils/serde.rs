//! Serialization utilities for common data types
//!
//! Reusable serde helpers for wire formats that do not map one-to-one onto
//! the Rust types used in memory.

use serde::{Deserialize, Deserializer, Serializer};

/// Text form used for calendar dates on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional calendar date as `YYYY-MM-DD` text.
///
/// `null`, a missing field and an empty string all deserialize to `None`.
///
/// # Usage
/// ```rust
/// use chrono::NaiveDate;
/// use kelvin_common::utils::serde::option_date_ymd;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Example {
///     #[serde(default, with = "option_date_ymd")]
///     birthday: Option<NaiveDate>,
/// }
/// ```
pub mod option_date_ymd {
    use chrono::NaiveDate;

    use super::*;

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Optional duration expressed as (fractional) seconds.
pub mod option_duration_secs {
    use std::time::Duration;

    use super::*;

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_f64(duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<f64>::deserialize(deserializer)? {
            Some(secs) => Duration::try_from_secs_f64(secs).map(Some).map_err(|err| {
                serde::de::Error::custom(format!("invalid duration {secs}: {err}"))
            }),
            None => Ok(None),
        }
    }
}

/// Optional secret sent in clear text on the wire.
///
/// [`SecureString`](crate::SecureString) masks itself when serialized; this
/// helper is for the few fields (such as a new account password) that the
/// server must actually receive.
pub mod option_secret_exposed {
    use super::*;
    use crate::SecureString;

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    pub fn serialize<S>(secret: &Option<SecureString>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match secret {
            Some(secret) => serializer.serialize_str(secret.expose()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecureString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.map(SecureString::new))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Dated {
        #[serde(default, with = "option_date_ymd")]
        birthday: Option<NaiveDate>,
    }

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Timed {
        #[serde(default, with = "option_duration_secs")]
        timeout: Option<Duration>,
    }

    #[test]
    fn test_date_serializes_as_ymd() {
        let data = Dated { birthday: NaiveDate::from_ymd_opt(2001, 2, 3) };
        let json = serde_json::to_string(&data).expect("serialize");
        assert_eq!(json, r#"{"birthday":"2001-02-03"}"#);
    }

    #[test]
    fn test_date_absent_null_and_empty_are_none() {
        for json in [r#"{}"#, r#"{"birthday":null}"#, r#"{"birthday":""}"#] {
            let data: Dated = serde_json::from_str(json).expect("deserialize");
            assert_eq!(data.birthday, None, "input {json}");
        }
    }

    #[test]
    fn test_date_rejects_other_formats() {
        let result: Result<Dated, _> = serde_json::from_str(r#"{"birthday":"03.02.2001"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_secs_accepts_fractions() {
        let data: Timed = serde_json::from_str(r#"{"timeout":2.5}"#).expect("deserialize");
        assert_eq!(data.timeout, Some(Duration::from_millis(2500)));
    }

    #[derive(Serialize, Deserialize, Debug)]
    struct Account {
        #[serde(default, with = "option_secret_exposed")]
        password: Option<crate::SecureString>,
    }

    #[test]
    fn test_secret_exposed_on_wire_but_masked_in_debug() {
        let account = Account { password: Some(crate::SecureString::new("s3cr3t")) };
        let json = serde_json::to_string(&account).expect("serialize");
        assert_eq!(json, r#"{"password":"s3cr3t"}"#);
        assert!(!format!("{account:?}").contains("s3cr3t"));

        let back: Account = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.password.as_ref().map(|p| p.expose()), Some("s3cr3t"));
    }

    #[test]
    fn test_duration_secs_rejects_negative() {
        let result: Result<Timed, _> = serde_json::from_str(r#"{"timeout":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_secs_rejects_overflow() {
        let result: Result<Timed, _> = serde_json::from_str(r#"{"timeout":1e20}"#);
        let err = result.expect_err("1e20 seconds do not fit a Duration");
        assert!(err.to_string().contains("invalid duration"));
    }
}
