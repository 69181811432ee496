use crate::core::errors::{Error, Result};
use crate::core::ip_version::IpVersion;
use crate::core::lookup_key::LookupKey;
use crate::core::utils::{self, IntoStrings};
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  AWS IP Prefix
-------------------------------------------------------------------------------------------------*/

/// AWS IP Prefix record containing the IP prefix, region, network border group, and services
/// associated with the prefix.
///
/// Records are immutable. The prefix is always held in canonical network form (no host bits
/// set) and the services are kept sorted and deduplicated, so equality and ordering are
/// deterministic.
///
/// Sort order: IPv4 before IPv6, network address, prefix length, region, network border group,
/// then the sorted services.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AwsIpPrefix {
    pub(crate) prefix: IpNetwork,
    pub(crate) region: Arc<str>,
    pub(crate) network_border_group: Arc<str>,
    pub(crate) services: BTreeSet<Arc<str>>,
}

/*--------------------------------------------------------------------------------------
  Prefix Network Input
--------------------------------------------------------------------------------------*/

/// Network values accepted by the [AwsIpPrefix] constructors. Strings must be CIDR networks
/// with no host bits set.
pub trait IntoPrefixNetwork {
    fn into_prefix_network(self) -> Result<IpNetwork>;
}

impl IntoPrefixNetwork for IpNetwork {
    fn into_prefix_network(self) -> Result<IpNetwork> {
        if utils::ipnetwork::is_canonical(&self) {
            Ok(self)
        } else {
            Err(Error::InvalidArgument(format!(
                "{self} has host bits set; expected {}/{}",
                self.network(),
                self.prefix()
            )))
        }
    }
}

impl IntoPrefixNetwork for Ipv4Network {
    fn into_prefix_network(self) -> Result<IpNetwork> {
        IpNetwork::V4(self).into_prefix_network()
    }
}

impl IntoPrefixNetwork for Ipv6Network {
    fn into_prefix_network(self) -> Result<IpNetwork> {
        IpNetwork::V6(self).into_prefix_network()
    }
}

impl IntoPrefixNetwork for &str {
    fn into_prefix_network(self) -> Result<IpNetwork> {
        self.parse::<IpNetwork>()
            .map_err(|error| {
                Error::InvalidArgument(format!("Invalid IP prefix {self:?}: {error}"))
            })?
            .into_prefix_network()
    }
}

impl IntoPrefixNetwork for String {
    fn into_prefix_network(self) -> Result<IpNetwork> {
        self.as_str().into_prefix_network()
    }
}

impl IntoPrefixNetwork for &String {
    fn into_prefix_network(self) -> Result<IpNetwork> {
        self.as_str().into_prefix_network()
    }
}

/*--------------------------------------------------------------------------------------
  Comparand
--------------------------------------------------------------------------------------*/

/// The right-hand side of a fallible comparison with an [AwsIpPrefix]. Networks and strings
/// compare on the prefix alone.
#[derive(Clone, Copy, Debug)]
pub enum Comparand<'a> {
    Prefix(&'a AwsIpPrefix),
    Network(IpNetwork),
    Text(&'a str),
}

impl<'a> From<&'a AwsIpPrefix> for Comparand<'a> {
    fn from(value: &'a AwsIpPrefix) -> Self {
        Comparand::Prefix(value)
    }
}

impl From<IpNetwork> for Comparand<'_> {
    fn from(value: IpNetwork) -> Self {
        Comparand::Network(value)
    }
}

impl<'a> From<&'a str> for Comparand<'a> {
    fn from(value: &'a str) -> Self {
        Comparand::Text(value)
    }
}

/*--------------------------------------------------------------------------------------
  AWS IP Prefix Implementation
--------------------------------------------------------------------------------------*/

impl AwsIpPrefix {
    /// Create a new [AwsIpPrefix] record.
    ///
    /// `services` may be a single service name or a collection of names.
    ///
    /// ```
    /// use awsipprefixes::AwsIpPrefix;
    ///
    /// let prefix = AwsIpPrefix::new("3.5.140.0/22", "ap-northeast-2", "ap-northeast-2", ["S3", "EC2"])?;
    /// assert_eq!(prefix.services().iter().map(|s| s.as_ref()).collect::<Vec<_>>(), ["EC2", "S3"]);
    /// # Ok::<(), awsipprefixes::Error>(())
    /// ```
    pub fn new<N, S>(
        network: N,
        region: &str,
        network_border_group: &str,
        services: S,
    ) -> Result<Self>
    where
        N: IntoPrefixNetwork,
        S: IntoStrings,
    {
        let prefix = network.into_prefix_network()?;

        if region.is_empty() {
            return Err(Error::InvalidArgument(format!("{prefix}: empty region")));
        }
        if network_border_group.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "{prefix}: empty network border group"
            )));
        }

        let services = utils::to_arc_str_set(services);
        if services.is_empty() || services.iter().any(|service| service.is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "{prefix}: services must be non-empty names"
            )));
        }

        Ok(Self {
            prefix,
            region: Arc::from(region),
            network_border_group: Arc::from(network_border_group),
            services,
        })
    }

    /// Create a new IPv4 [AwsIpPrefix]; an IPv6 network is a [Error::TypeMismatch].
    pub fn ipv4<N, S>(
        network: N,
        region: &str,
        network_border_group: &str,
        services: S,
    ) -> Result<Self>
    where
        N: IntoPrefixNetwork,
        S: IntoStrings,
    {
        Self::new(network, region, network_border_group, services)?.require(IpVersion::V4)
    }

    /// Create a new IPv6 [AwsIpPrefix]; an IPv4 network is a [Error::TypeMismatch].
    pub fn ipv6<N, S>(
        network: N,
        region: &str,
        network_border_group: &str,
        services: S,
    ) -> Result<Self>
    where
        N: IntoPrefixNetwork,
        S: IntoStrings,
    {
        Self::new(network, region, network_border_group, services)?.require(IpVersion::V6)
    }

    pub(crate) fn require(self, version: IpVersion) -> Result<Self> {
        if self.version() == version {
            Ok(self)
        } else {
            Err(Error::TypeMismatch(format!(
                "{} is an {} prefix; expected {version}",
                self.prefix,
                self.version()
            )))
        }
    }

    /// Rebuild a record around a shared region, border group, and service names (used when a
    /// collection interns its strings).
    pub(crate) fn with_parts(
        prefix: IpNetwork,
        region: Arc<str>,
        network_border_group: Arc<str>,
        services: BTreeSet<Arc<str>>,
    ) -> Self {
        Self {
            prefix,
            region,
            network_border_group,
            services,
        }
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// The public IP network prefix.
    pub fn prefix(&self) -> IpNetwork {
        self.prefix
    }

    /// The AWS region, or `GLOBAL` for edge locations (e.g. `CLOUDFRONT` and `ROUTE53`).
    pub fn region(&self) -> &Arc<str> {
        &self.region
    }

    /// A network border group is a unique set of Availability Zones or Local Zones from where
    /// AWS advertises IP addresses.
    pub fn network_border_group(&self) -> &Arc<str> {
        &self.network_border_group
    }

    /// Services that use IP addresses in this prefix.
    ///
    /// `AMAZON` is not a service but an identifier for all IP address ranges; some prefixes
    /// are only tagged with `AMAZON`.
    pub fn services(&self) -> &BTreeSet<Arc<str>> {
        &self.services
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.services.contains(service)
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::of(&self.prefix)
    }

    pub fn network_address(&self) -> IpAddr {
        self.prefix.network()
    }

    /// Length of the network prefix, in bits.
    pub fn prefixlen(&self) -> u8 {
        self.prefix.prefix()
    }

    /// Number of addresses in the prefix; saturates at `u128::MAX` for `::/0`.
    pub fn num_addresses(&self) -> u128 {
        let max_prefixlen: u32 = match self.prefix {
            IpNetwork::V4(_) => 32,
            IpNetwork::V6(_) => 128,
        };
        let host_bits = max_prefixlen - u32::from(self.prefixlen());
        1u128.checked_shl(host_bits).unwrap_or(u128::MAX)
    }

    pub fn netmask(&self) -> IpAddr {
        self.prefix.mask()
    }

    pub fn hostmask(&self) -> IpAddr {
        utils::ipnetwork::hostmask(&self.prefix)
    }

    /// `network/prefix-length` notation.
    pub fn with_prefixlen(&self) -> String {
        self.prefix.to_string()
    }

    /// `network/netmask` notation.
    pub fn with_netmask(&self) -> String {
        format!("{}/{}", self.network_address(), self.netmask())
    }

    /// `network/hostmask` notation.
    pub fn with_hostmask(&self) -> String {
        format!("{}/{}", self.network_address(), self.hostmask())
    }

    /*-------------------------------------------------------------------------
      Membership
    -------------------------------------------------------------------------*/

    /// Is the address, interface, or network contained in this prefix? Keys of the other IP
    /// version, and strings that do not parse, are not contained.
    pub fn contains<K: LookupKey + ?Sized>(&self, key: &K) -> bool {
        key.to_network()
            .map(|network| utils::ipnetwork::is_subnet_of(network, self.prefix))
            .unwrap_or(false)
    }

    /*-------------------------------------------------------------------------
      Comparisons
    -------------------------------------------------------------------------*/

    /// Compare against another record (full sort order), a network, or a string parsed as a
    /// network (prefix only).
    ///
    /// Fails with [Error::InvalidArgument] for a string that is not a network, and with
    /// [Error::TypeMismatch] when a bare network is of the other IP version.
    pub fn compare<'a, C: Into<Comparand<'a>>>(&self, other: C) -> Result<Ordering> {
        let other: Comparand<'a> = other.into();
        let network = match other {
            Comparand::Prefix(prefix) => return Ok(self.cmp(prefix)),
            Comparand::Network(network) => network,
            Comparand::Text(text) => text.into_prefix_network()?,
        };

        self.partial_cmp(&network).ok_or_else(|| {
            Error::TypeMismatch(format!(
                "Cannot compare {} prefix {} with {} network {network}",
                self.version(),
                self.prefix,
                IpVersion::of(&network)
            ))
        })
    }

    /// Equality counterpart of [AwsIpPrefix::compare]. Networks of the other IP version are
    /// simply unequal.
    pub fn equals<'a, C: Into<Comparand<'a>>>(&self, other: C) -> Result<bool> {
        let other: Comparand<'a> = other.into();
        match other {
            Comparand::Prefix(prefix) => Ok(self == prefix),
            Comparand::Network(network) => Ok(self == &network),
            Comparand::Text(text) => Ok(*self == text.into_prefix_network()?),
        }
    }

    fn sort_key(&self) -> (IpVersion, u128, u8) {
        utils::ipnetwork::sort_key(&self.prefix)
    }
}

/*--------------------------------------------------------------------------------------
  Ordering and Equality
--------------------------------------------------------------------------------------*/

impl Ord for AwsIpPrefix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.region.cmp(&other.region))
            .then_with(|| self.network_border_group.cmp(&other.network_border_group))
            .then_with(|| self.services.cmp(&other.services))
    }
}

impl PartialOrd for AwsIpPrefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<IpNetwork> for AwsIpPrefix {
    fn eq(&self, other: &IpNetwork) -> bool {
        self.prefix == *other
    }
}

impl PartialOrd<IpNetwork> for AwsIpPrefix {
    fn partial_cmp(&self, other: &IpNetwork) -> Option<Ordering> {
        if self.prefix.is_ipv4() != other.is_ipv4() {
            return None;
        }
        Some(self.sort_key().cmp(&utils::ipnetwork::sort_key(other)))
    }
}

impl fmt::Display for AwsIpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
