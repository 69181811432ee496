use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{self, Deserialize, Deserializer};

/*-------------------------------------------------------------------------------------------------
  DateTime Format
-------------------------------------------------------------------------------------------------*/

pub(crate) const AWS_IP_RANGES_DATETIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Parse a `createDate` value (`YYYY-MM-DD-hh-mm-ss`, UTC).
pub fn parse(value: &str) -> chrono::ParseResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, AWS_IP_RANGES_DATETIME_FORMAT)
        .map(|naive_date_time| naive_date_time.and_utc())
}

/// Format a timestamp the way the published document does.
pub fn format(date: &DateTime<Utc>) -> String {
    date.format(AWS_IP_RANGES_DATETIME_FORMAT).to_string()
}

/// Deserialize an optional `createDate`; a missing field is `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
