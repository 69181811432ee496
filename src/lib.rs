//! Longest-prefix-match lookups against the published
//! [AWS IP address ranges](https://docs.aws.amazon.com/vpc/latest/userguide/aws-ip-ranges.html).
//!
//! The library retrieves the AWS IP ranges JSON document, combines the per-service entries into
//! one [AwsIpPrefix] record per network, and stores the records in an immutable, sorted
//! [AwsIpPrefixes] collection that answers "which AWS region, network border group, and
//! services own this IP address or network?"
//!
//! ```no_run
//! use awsipprefixes::FilterBuilder;
//!
//! // Get the AWS IP ranges
//! let aws_ip_prefixes = awsipprefixes::get_ranges()?;
//!
//! // Find the longest-match prefix for an IP address
//! let aws_ip_prefix = aws_ip_prefixes.get_longest_match_prefix("3.141.102.225")?;
//! println!("{aws_ip_prefix} {:?}", aws_ip_prefix.services());
//!
//! // Find every published prefix that contains the address
//! for supernet in aws_ip_prefixes.get_supernet_prefixes("3.141.102.225")? {
//!     println!("{supernet}");
//! }
//!
//! // Filter the AWS IP prefixes
//! let filter = FilterBuilder::new(&aws_ip_prefixes)
//!     .ipv4()
//!     .regions("us-west-2")?
//!     .services("S3")?
//!     .build();
//! let filtered = aws_ip_prefixes.filter(&filter);
//! println!("{} S3 prefixes in us-west-2", filtered.len());
//! # Ok::<(), awsipprefixes::Error>(())
//! ```

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::aws_ip_prefix::{AwsIpPrefix, Comparand, IntoPrefixNetwork};
pub use crate::core::aws_ip_prefixes::AwsIpPrefixes;
pub use crate::core::client::{get_ranges, Client, ClientBuilder};
pub use crate::core::combine::combine_prefixes;
pub use crate::core::errors::{Error, Result};
pub use crate::core::feed::{Feed, RawPrefix};
pub use crate::core::filter::{Filter, FilterBuilder};
pub use crate::core::ip_version::IpVersion;
pub use crate::core::lookup_key::LookupKey;
pub use crate::core::search_results::SearchResults;
pub use crate::core::utils::{IntoStrings, IntoVersions};

pub use crate::core::datetime;
pub use crate::core::json;

pub use ipnetwork;
