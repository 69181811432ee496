use crate::core::aws_ip_prefix::AwsIpPrefix;
use crate::core::combine::combine_prefixes;
use crate::core::errors::{Error, Result};
use crate::core::feed::{Feed, RawPrefix};
use crate::core::filter::Filter;
use crate::core::ip_version::IpVersion;
use crate::core::json;
use crate::core::lookup_key::LookupKey;
use crate::core::search_results::SearchResults;
use crate::core::utils;
use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use log::{debug, info, trace, warn};
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Chain;
use std::slice;
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  AWS IP Prefixes
-------------------------------------------------------------------------------------------------*/

/// Collection of AWS IP prefixes providing longest-prefix-match lookups
/// ([AwsIpPrefixes::get_longest_match_prefix]), supernet lookups
/// ([AwsIpPrefixes::get_supernet_prefixes]), and [AwsIpPrefixes::filter].
///
/// The IPv4 and IPv6 prefixes are held in two separate sorted sequences with at most one record
/// per network; records that the source lists once per service are combined when the
/// collection is built. A collection is never modified after construction: filtering and
/// searching build new, independent collections, so a collection can be shared freely between
/// threads.
#[derive(Clone, Debug, Default)]
pub struct AwsIpPrefixes {
    sync_token: String,
    create_date: DateTime<Utc>,
    content_hash: Option<String>,

    ipv4_prefixes: Vec<AwsIpPrefix>,
    ipv6_prefixes: Vec<AwsIpPrefix>,

    regions: OnceCell<BTreeSet<Arc<str>>>,
    network_border_groups: OnceCell<BTreeSet<Arc<str>>>,
    services: OnceCell<BTreeSet<Arc<str>>>,
}

/*--------------------------------------------------------------------------------------
  AWS IP Prefixes Implementation
--------------------------------------------------------------------------------------*/

impl AwsIpPrefixes {
    /*-------------------------------------------------------------------------
      Constructors
    -------------------------------------------------------------------------*/

    /// Build a collection from IPv4 and IPv6 [AwsIpPrefix] records.
    ///
    /// Records that share a prefix are combined with [combine_prefixes]; construction fails if
    /// they disagree on region or network border group ([Error::InvariantViolation]), or if a
    /// record is in the wrong version's list ([Error::TypeMismatch]).
    pub fn new<S, I4, I6>(
        sync_token: S,
        create_date: DateTime<Utc>,
        ipv4_prefixes: I4,
        ipv6_prefixes: I6,
        content_hash: Option<String>,
    ) -> Result<Self>
    where
        S: Into<String>,
        I4: IntoIterator<Item = AwsIpPrefix>,
        I6: IntoIterator<Item = AwsIpPrefix>,
    {
        let aws_ip_prefixes = Self {
            sync_token: sync_token.into(),
            create_date,
            content_hash,
            ipv4_prefixes: process_prefixes(ipv4_prefixes, IpVersion::V4)?,
            ipv6_prefixes: process_prefixes(ipv6_prefixes, IpVersion::V6)?,
            ..Default::default()
        };

        debug!(
            "Built AWS IP prefixes: {} IPv4 and {} IPv6 prefixes",
            aws_ip_prefixes.ipv4_prefixes.len(),
            aws_ip_prefixes.ipv6_prefixes.len()
        );

        Ok(aws_ip_prefixes)
    }

    /// Build a collection from a parsed [Feed]. Fails with [Error::MalformedFeed] when the feed
    /// or one of its raw records is missing a required field.
    pub fn from_feed(feed: Feed) -> Result<Self> {
        let sync_token = feed.sync_token.ok_or_else(|| missing_field("syncToken"))?;
        let create_date = feed.create_date.ok_or_else(|| missing_field("createDate"))?;
        let raw_ipv4_prefixes = feed.ipv4_prefixes.ok_or_else(|| missing_field("prefixes"))?;
        let raw_ipv6_prefixes = feed
            .ipv6_prefixes
            .ok_or_else(|| missing_field("ipv6_prefixes"))?;

        info!(
            "Feed {sync_token} ({create_date}): {} IPv4 and {} IPv6 prefix entries",
            raw_ipv4_prefixes.len(),
            raw_ipv6_prefixes.len()
        );

        // Region, network border group, and service names repeat across thousands of entries;
        // share one allocation per distinct name.
        let mut names: BTreeSet<Arc<str>> = BTreeSet::new();

        let ipv4_prefixes = raw_ipv4_prefixes
            .iter()
            .enumerate()
            .map(|(index, raw)| raw_prefix(raw, IpVersion::V4, index, &mut names))
            .collect::<Result<Vec<AwsIpPrefix>>>()?;

        let ipv6_prefixes = raw_ipv6_prefixes
            .iter()
            .enumerate()
            .map(|(index, raw)| raw_prefix(raw, IpVersion::V6, index, &mut names))
            .collect::<Result<Vec<AwsIpPrefix>>>()?;

        Self::new(
            sync_token,
            create_date,
            ipv4_prefixes,
            ipv6_prefixes,
            feed.content_hash,
        )
    }

    /// Parse and build a collection from the AWS IP ranges JSON document.
    ///
    /// ```
    /// let json = r#"{
    ///   "syncToken": "1640995200",
    ///   "createDate": "2022-01-01-00-00-00",
    ///   "prefixes": [
    ///     {"ip_prefix": "3.5.140.0/22", "region": "ap-northeast-2",
    ///      "network_border_group": "ap-northeast-2", "service": "AMAZON"}
    ///   ],
    ///   "ipv6_prefixes": []
    /// }"#;
    ///
    /// let aws_ip_prefixes = awsipprefixes::AwsIpPrefixes::from_json(json)?;
    /// assert_eq!(aws_ip_prefixes.len(), 1);
    /// assert!(aws_ip_prefixes.contains("3.5.141.7"));
    /// # Ok::<(), awsipprefixes::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_feed(json::parse(json)?)
    }

    /// New collection of already-processed records, carrying over this collection's metadata.
    fn derive(&self, ipv4_prefixes: Vec<AwsIpPrefix>, ipv6_prefixes: Vec<AwsIpPrefix>) -> Self {
        Self {
            sync_token: self.sync_token.clone(),
            create_date: self.create_date,
            content_hash: self.content_hash.clone(),
            ipv4_prefixes,
            ipv6_prefixes,
            ..Default::default()
        }
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Publication time of the AWS IP ranges in Unix epoch time format.
    pub fn sync_token(&self) -> &str {
        &self.sync_token
    }

    /// Publication time of the AWS IP ranges in UTC.
    pub fn create_date(&self) -> &DateTime<Utc> {
        &self.create_date
    }

    /// SHA-256 digest of the JSON document the collection was built from, when available.
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    /// Sorted IPv4 prefixes.
    pub fn ipv4_prefixes(&self) -> &[AwsIpPrefix] {
        &self.ipv4_prefixes
    }

    /// Sorted IPv6 prefixes.
    pub fn ipv6_prefixes(&self) -> &[AwsIpPrefix] {
        &self.ipv6_prefixes
    }

    pub fn len(&self) -> usize {
        self.ipv4_prefixes.len() + self.ipv6_prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All prefixes: IPv4 then IPv6, each in sorted order.
    pub fn iter(&self) -> Chain<slice::Iter<'_, AwsIpPrefix>, slice::Iter<'_, AwsIpPrefix>> {
        self.ipv4_prefixes.iter().chain(self.ipv6_prefixes.iter())
    }

    /// AWS regions represented in the collection.
    pub fn regions(&self) -> &BTreeSet<Arc<str>> {
        self.regions
            .get_or_init(|| self.iter().map(|prefix| Arc::clone(&prefix.region)).collect())
    }

    /// Network border groups represented in the collection.
    pub fn network_border_groups(&self) -> &BTreeSet<Arc<str>> {
        self.network_border_groups.get_or_init(|| {
            self.iter()
                .map(|prefix| Arc::clone(&prefix.network_border_group))
                .collect()
        })
    }

    /// AWS services represented in the collection.
    ///
    /// `AMAZON` is not a service but an identifier for all IP address ranges: every prefix is
    /// part of the `AMAZON` superset, and some prefixes are only tagged with `AMAZON`.
    pub fn services(&self) -> &BTreeSet<Arc<str>> {
        self.services.get_or_init(|| {
            self.iter()
                .flat_map(|prefix| prefix.services.iter().cloned())
                .collect()
        })
    }

    /*-------------------------------------------------------------------------
      Get Reference Counted Strings
    -------------------------------------------------------------------------*/

    /// Get the shared region name for the provided region, if it is in the collection.
    pub fn get_region(&self, value: &str) -> Option<Arc<str>> {
        utils::get_arc_str_from_set(value, self.regions())
    }

    /// Get the shared network border group name for the provided name, if it is in the
    /// collection.
    pub fn get_network_border_group(&self, value: &str) -> Option<Arc<str>> {
        utils::get_arc_str_from_set(value, self.network_border_groups())
    }

    /// Get the shared service name for the provided service, if it is in the collection.
    pub fn get_service(&self, value: &str) -> Option<Arc<str>> {
        utils::get_arc_str_from_set(value, self.services())
    }

    /*-------------------------------------------------------------------------
      Exact Lookup
    -------------------------------------------------------------------------*/

    /// Binary search the version's sequence for a record whose prefix is exactly `network`.
    pub(crate) fn lookup_exact(&self, network: &IpNetwork) -> Option<&AwsIpPrefix> {
        let prefixes = match IpVersion::of(network) {
            IpVersion::V4 => &self.ipv4_prefixes,
            IpVersion::V6 => &self.ipv6_prefixes,
        };

        let key = utils::ipnetwork::sort_key(network);
        prefixes
            .binary_search_by(|prefix| utils::ipnetwork::sort_key(&prefix.prefix).cmp(&key))
            .ok()
            .map(|index| &prefixes[index])
    }

    /*-------------------------------------------------------------------------
      Get Longest Match Prefix
    -------------------------------------------------------------------------*/

    /// Get the longest-match (most specific) [AwsIpPrefix] containing the address, interface,
    /// network, or prefix.
    ///
    /// Walks the key's supernets from its own prefix length down to `/0`, returning the first
    /// published prefix found. Fails with [Error::NotFound] when no published prefix contains
    /// the key, and with [Error::InvalidArgument] for a string that is not an IP address or
    /// network.
    pub fn get_longest_match_prefix<K: LookupKey + ?Sized>(&self, key: &K) -> Result<&AwsIpPrefix> {
        let network = key.to_network()?;

        let aws_ip_prefix = utils::ipnetwork::supernets(&network)
            .find_map(|supernet| {
                trace!("Longest match for {network}: try {supernet}");
                self.lookup_exact(&supernet)
            })
            .ok_or_else(|| {
                Error::NotFound(format!("{network} is not contained in the AWS IP prefixes"))
            })?;

        Ok(aws_ip_prefix)
    }

    /// Like [AwsIpPrefixes::get_longest_match_prefix], but a key that is not contained in the
    /// collection is `None`.
    pub fn get<K: LookupKey + ?Sized>(&self, key: &K) -> Result<Option<&AwsIpPrefix>> {
        match self.get_longest_match_prefix(key) {
            Ok(aws_ip_prefix) => Ok(Some(aws_ip_prefix)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Like [AwsIpPrefixes::get_longest_match_prefix], but a key that is not contained in the
    /// collection returns `default`.
    pub fn get_or<'a, K: LookupKey + ?Sized>(
        &'a self,
        key: &K,
        default: &'a AwsIpPrefix,
    ) -> Result<&'a AwsIpPrefix> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /*-------------------------------------------------------------------------
      Get Supernet Prefixes
    -------------------------------------------------------------------------*/

    /// Get every published [AwsIpPrefix] that contains the key, sorted shortest prefix first;
    /// the last record is the longest match.
    ///
    /// AWS sometimes publishes both a summary block and a more specific block with different
    /// services; this returns both. Fails with [Error::NotFound] when no prefix contains the key.
    pub fn get_supernet_prefixes<K: LookupKey + ?Sized>(
        &self,
        key: &K,
    ) -> Result<Vec<&AwsIpPrefix>> {
        let network = key.to_network()?;

        let mut aws_ip_prefixes: Vec<&AwsIpPrefix> = utils::ipnetwork::supernets(&network)
            .filter_map(|supernet| self.lookup_exact(&supernet))
            .collect();

        if aws_ip_prefixes.is_empty() {
            return Err(Error::NotFound(format!(
                "{network} is not contained in the AWS IP prefixes"
            )));
        }

        aws_ip_prefixes.sort();
        Ok(aws_ip_prefixes)
    }

    /*-------------------------------------------------------------------------
      Contains
    -------------------------------------------------------------------------*/

    /// Is the address, interface, or network contained in the AWS IP prefixes? Strings that are
    /// not IP addresses or networks are not contained.
    pub fn contains<K: LookupKey + ?Sized>(&self, key: &K) -> bool {
        match self.get_longest_match_prefix(key) {
            Ok(_) => true,
            Err(error) => {
                if !error.is_not_found() {
                    debug!("{error}");
                }
                false
            }
        }
    }

    /*-------------------------------------------------------------------------
      Search
    -------------------------------------------------------------------------*/

    /// Search for the AWS IP prefixes that contain the provided [IpNetwork] CIDRs.
    pub fn search<'p, I>(&self, values: I) -> SearchResults
    where
        I: IntoIterator<Item = &'p IpNetwork>,
    {
        let mut prefix_matches: BTreeMap<IpNetwork, Vec<AwsIpPrefix>> = BTreeMap::new();
        let mut prefixes_not_found: BTreeSet<IpNetwork> = BTreeSet::new();
        let mut result_aws_ip_prefixes: BTreeSet<AwsIpPrefix> = BTreeSet::new();

        for prefix in values {
            match self.get_supernet_prefixes(prefix) {
                Ok(aws_ip_prefixes) => {
                    let aws_ip_prefixes: Vec<AwsIpPrefix> =
                        aws_ip_prefixes.into_iter().cloned().collect();
                    result_aws_ip_prefixes.extend(aws_ip_prefixes.iter().cloned());
                    prefix_matches.insert(*prefix, aws_ip_prefixes);
                }
                Err(_) => {
                    warn!("Search CIDR not found in AWS IP prefixes: {prefix}");
                    prefixes_not_found.insert(*prefix);
                }
            }
        }

        let (ipv4_prefixes, ipv6_prefixes): (Vec<AwsIpPrefix>, Vec<AwsIpPrefix>) =
            result_aws_ip_prefixes
                .into_iter()
                .partition(|aws_ip_prefix| aws_ip_prefix.version().is_ipv4());

        SearchResults {
            aws_ip_prefixes: self.derive(ipv4_prefixes, ipv6_prefixes),
            prefix_matches,
            prefixes_not_found,
        }
    }

    /*-------------------------------------------------------------------------
      Filter
    -------------------------------------------------------------------------*/

    /// Filter the AWS IP prefixes using the provided [Filter], returning a new collection with
    /// the same metadata. The collection is not modified.
    pub fn filter(&self, filter: &Filter) -> AwsIpPrefixes {
        let select = |prefixes: &[AwsIpPrefix]| -> Vec<AwsIpPrefix> {
            prefixes
                .iter()
                .filter(|aws_ip_prefix| filter.include_prefix(aws_ip_prefix))
                .cloned()
                .collect()
        };

        self.derive(select(&self.ipv4_prefixes), select(&self.ipv6_prefixes))
    }
}

/*--------------------------------------------------------------------------------------
  Iterate over AWS IP Prefixes
--------------------------------------------------------------------------------------*/

impl<'a> IntoIterator for &'a AwsIpPrefixes {
    type Item = &'a AwsIpPrefix;
    type IntoIter = Chain<slice::Iter<'a, AwsIpPrefix>, slice::Iter<'a, AwsIpPrefix>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Group by prefix, combine duplicates, and sort.
fn process_prefixes<I>(prefixes: I, version: IpVersion) -> Result<Vec<AwsIpPrefix>>
where
    I: IntoIterator<Item = AwsIpPrefix>,
{
    let mut grouped: BTreeMap<IpNetwork, Vec<AwsIpPrefix>> = BTreeMap::new();
    for aws_ip_prefix in prefixes {
        let aws_ip_prefix = aws_ip_prefix.require(version)?;
        grouped
            .entry(aws_ip_prefix.prefix)
            .or_default()
            .push(aws_ip_prefix);
    }

    let mut deduplicated: Vec<AwsIpPrefix> = grouped
        .into_values()
        .map(|mut group| {
            if group.len() == 1 {
                Ok(group.remove(0))
            } else {
                combine_prefixes(&group)
            }
        })
        .collect::<Result<Vec<AwsIpPrefix>>>()?;

    deduplicated.sort();
    Ok(deduplicated)
}

/// Build a record from one raw feed entry.
fn raw_prefix(
    raw: &RawPrefix,
    version: IpVersion,
    index: usize,
    names: &mut BTreeSet<Arc<str>>,
) -> Result<AwsIpPrefix> {
    let (list, network_field) = match version {
        IpVersion::V4 => ("prefixes", "ip_prefix"),
        IpVersion::V6 => ("ipv6_prefixes", "ipv6_prefix"),
    };
    let field = |value: &Option<String>, name: &str| -> Result<String> {
        value
            .clone()
            .ok_or_else(|| missing_field(&format!("{list}[{index}].{name}")))
    };

    let network = field(&raw.network, network_field)?;
    let region = field(&raw.region, "region")?;
    let network_border_group = field(&raw.network_border_group, "network_border_group")?;
    let service = field(&raw.service, "service")?;

    let aws_ip_prefix =
        AwsIpPrefix::new(network, &region, &network_border_group, service)?.require(version)?;

    Ok(AwsIpPrefix::with_parts(
        aws_ip_prefix.prefix,
        utils::intern(&aws_ip_prefix.region, names),
        utils::intern(&aws_ip_prefix.network_border_group, names),
        aws_ip_prefix
            .services
            .iter()
            .map(|service| utils::intern(service, names))
            .collect(),
    ))
}

fn missing_field(name: &str) -> Error {
    Error::MalformedFeed(format!("missing required field `{name}`"))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
