use crate::core::errors::{Error, Result};
use ipnetwork::IpNetwork;
use std::fmt;

/*-------------------------------------------------------------------------------------------------
  IP Version
-------------------------------------------------------------------------------------------------*/

/// IP version (IPv4 or IPv6) of a prefix, used to pick the per-version sequence in an
/// [AwsIpPrefixes](crate::AwsIpPrefixes) collection and to filter it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    pub fn is_ipv4(&self) -> bool {
        match self {
            IpVersion::V4 => true,
            IpVersion::V6 => false,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        match self {
            IpVersion::V4 => false,
            IpVersion::V6 => true,
        }
    }

    /// Version number as published (`4` or `6`).
    pub fn number(&self) -> u8 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }

    /// Number of address bits (`32` or `128`).
    pub fn max_prefix_length(&self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    pub fn of(network: &IpNetwork) -> Self {
        match network {
            IpNetwork::V4(_) => IpVersion::V4,
            IpNetwork::V6(_) => IpVersion::V6,
        }
    }
}

impl TryFrom<u8> for IpVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(IpVersion::V4),
            6 => Ok(IpVersion::V6),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid IP version: {value} (expected 4 or 6)"
            ))),
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPv{}", self.number())
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
