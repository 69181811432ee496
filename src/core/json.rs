use crate::core::errors::Result;
use crate::core::feed::Feed;
use sha2::{Digest, Sha256};

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

/// Parse the AWS IP ranges JSON document into a [Feed], stamped with the SHA-256 digest of the
/// raw payload.
pub fn parse(json: &str) -> Result<Feed> {
    let mut feed: Feed = serde_json::from_str(json)?;
    feed.content_hash = Some(content_hash(json));
    Ok(feed)
}

/// Lowercase hex SHA-256 digest of the payload, for integrity display.
pub fn content_hash(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;

    #[test]
    fn test_parse() {
        let json = r#"{
          "syncToken": "1640995200",
          "createDate": "2022-01-01-00-00-00",
          "prefixes": [],
          "ipv6_prefixes": []
        }"#;

        let feed = parse(json).unwrap();
        assert_eq!(feed.sync_token.as_deref(), Some("1640995200"));
        assert_eq!(feed.content_hash, Some(content_hash(json)));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse("{"), Err(Error::Json(_))));
        assert!(matches!(parse("42"), Err(Error::Json(_))));
    }

    #[test]
    fn test_content_hash() {
        // SHA-256 of the empty string
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(content_hash("{}"), content_hash("{ }"));
    }

    #[test]
    fn test_parse_html_error_page() {
        assert!(matches!(
            parse("<html><body>Service Unavailable</body></html>"),
            Err(Error::Json(_))
        ));
    }
}
