use crate::core::datetime;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/*-------------------------------------------------------------------------------------------------
  Feed
-------------------------------------------------------------------------------------------------*/

/// A parsed AWS IP ranges document, as handed to
/// [AwsIpPrefixes::from_feed](crate::AwsIpPrefixes::from_feed).
///
/// Every field is optional so that a document missing a required field can be reported as
/// [Error::MalformedFeed](crate::Error::MalformedFeed) rather than a generic parse error.
/// Field names follow the published JSON document.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Feed {
    /// Publication time in Unix epoch seconds, as text.
    #[serde(rename = "syncToken")]
    pub sync_token: Option<String>,

    /// Publication time (UTC).
    #[serde(
        rename = "createDate",
        default,
        deserialize_with = "datetime::deserialize_option"
    )]
    pub create_date: Option<DateTime<Utc>>,

    #[serde(rename = "prefixes")]
    pub ipv4_prefixes: Option<Vec<RawPrefix>>,

    pub ipv6_prefixes: Option<Vec<RawPrefix>>,

    /// Digest of the raw payload, when the loader computed one.
    #[serde(skip)]
    pub content_hash: Option<String>,
}

/*--------------------------------------------------------------------------------------
  Raw Prefix
--------------------------------------------------------------------------------------*/

/// One entry of the `prefixes` or `ipv6_prefixes` arrays: a single (prefix, service) pair.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct RawPrefix {
    /// CIDR network; `ip_prefix` or `ipv6_prefix` in the published document.
    #[serde(alias = "ip_prefix", alias = "ipv6_prefix")]
    pub network: Option<String>,
    pub region: Option<String>,
    pub network_border_group: Option<String>,
    pub service: Option<String>,
}

impl RawPrefix {
    pub fn new(network: &str, region: &str, network_border_group: &str, service: &str) -> Self {
        Self {
            network: Some(network.to_string()),
            region: Some(region.to_string()),
            network_border_group: Some(network_border_group.to_string()),
            service: Some(service.to_string()),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_feed_deserialize() {
        let json = r#"{
          "syncToken": "1640995200",
          "createDate": "2022-01-01-00-00-00",
          "prefixes": [
            {
              "ip_prefix": "10.0.0.0/8",
              "region": "us-east-1",
              "network_border_group": "us-east-1",
              "service": "AMAZON"
            }
          ],
          "ipv6_prefixes": [
            {
              "ipv6_prefix": "2001:db8::/32",
              "region": "us-east-1",
              "network_border_group": "us-east-1",
              "service": "AMAZON"
            }
          ]
        }"#;

        let feed: Feed = serde_json::from_str(json).unwrap();

        let expected = Feed {
            sync_token: Some("1640995200".to_string()),
            create_date: Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()),
            ipv4_prefixes: Some(vec![RawPrefix::new(
                "10.0.0.0/8",
                "us-east-1",
                "us-east-1",
                "AMAZON",
            )]),
            ipv6_prefixes: Some(vec![RawPrefix::new(
                "2001:db8::/32",
                "us-east-1",
                "us-east-1",
                "AMAZON",
            )]),
            content_hash: None,
        };

        assert_eq!(feed, expected);
    }

    #[test]
    fn test_feed_missing_fields() {
        let feed: Feed = serde_json::from_str(r#"{"prefixes": [{"region": "us-east-1"}]}"#).unwrap();

        assert_eq!(feed.sync_token, None);
        assert_eq!(feed.create_date, None);
        assert_eq!(feed.ipv6_prefixes, None);

        let raw = &feed.ipv4_prefixes.unwrap()[0];
        assert_eq!(raw.network, None);
        assert_eq!(raw.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_feed_invalid_create_date() {
        let result: serde_json::Result<Feed> = serde_json::from_str(r#"{"createDate": "yesterday"}"#);
        assert!(result.is_err());
    }
}
