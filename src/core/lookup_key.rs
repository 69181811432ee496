use crate::core::aws_ip_prefix::AwsIpPrefix;
use crate::core::errors::{Error, Result};
use crate::core::utils;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/*-------------------------------------------------------------------------------------------------
  Lookup Key
-------------------------------------------------------------------------------------------------*/

/// Anything that can be searched for in the AWS IP prefixes: IP addresses, interfaces (an
/// address with a prefix length, host bits allowed), networks, existing [AwsIpPrefix] records,
/// and strings in any of those forms.
///
/// Addresses become `/32` or `/128` networks; host bits are cleared.
///
/// ```
/// use awsipprefixes::LookupKey;
///
/// let network = "10.0.1.5/16".to_network().unwrap();
/// assert_eq!(network.to_string(), "10.0.0.0/16");
/// ```
pub trait LookupKey {
    fn to_network(&self) -> Result<IpNetwork>;
}

impl LookupKey for IpNetwork {
    fn to_network(&self) -> Result<IpNetwork> {
        utils::ipnetwork::network_prefix(self)
    }
}

impl LookupKey for Ipv4Network {
    fn to_network(&self) -> Result<IpNetwork> {
        IpNetwork::V4(*self).to_network()
    }
}

impl LookupKey for Ipv6Network {
    fn to_network(&self) -> Result<IpNetwork> {
        IpNetwork::V6(*self).to_network()
    }
}

impl LookupKey for IpAddr {
    fn to_network(&self) -> Result<IpNetwork> {
        Ok(IpNetwork::from(*self))
    }
}

impl LookupKey for Ipv4Addr {
    fn to_network(&self) -> Result<IpNetwork> {
        IpAddr::V4(*self).to_network()
    }
}

impl LookupKey for Ipv6Addr {
    fn to_network(&self) -> Result<IpNetwork> {
        IpAddr::V6(*self).to_network()
    }
}

impl LookupKey for AwsIpPrefix {
    fn to_network(&self) -> Result<IpNetwork> {
        Ok(self.prefix())
    }
}

impl LookupKey for str {
    fn to_network(&self) -> Result<IpNetwork> {
        self.trim()
            .parse::<IpNetwork>()
            .map_err(|error| {
                Error::InvalidArgument(format!("Invalid IP address or network {self:?}: {error}"))
            })?
            .to_network()
    }
}

impl LookupKey for String {
    fn to_network(&self) -> Result<IpNetwork> {
        self.as_str().to_network()
    }
}

impl<K: LookupKey + ?Sized> LookupKey for &K {
    fn to_network(&self) -> Result<IpNetwork> {
        (**self).to_network()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aws_ip_prefix::tests::test_aws_ipv4_prefix;

    #[test]
    fn test_address_keys() {
        let address: IpAddr = "10.0.1.5".parse().unwrap();
        assert_eq!(address.to_network().unwrap().to_string(), "10.0.1.5/32");

        let address: Ipv6Addr = "2001:db8::1".parse().unwrap();
        assert_eq!(address.to_network().unwrap().to_string(), "2001:db8::1/128");
    }

    #[test]
    fn test_interface_keys_are_reduced() {
        let interface: IpNetwork = "10.0.1.5/24".parse().unwrap();
        assert_eq!(interface.to_network().unwrap().to_string(), "10.0.1.0/24");
    }

    #[test]
    fn test_string_keys() {
        assert_eq!("10.0.1.5".to_network().unwrap().to_string(), "10.0.1.5/32");
        assert_eq!(" 10.0.1.5/8 ".to_network().unwrap().to_string(), "10.0.0.0/8");
        assert_eq!(
            "2001:db8::1/64".to_string().to_network().unwrap().to_string(),
            "2001:db8::/64"
        );
        assert!(matches!(
            "not-an-address".to_network(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_prefix_keys() {
        let prefix = test_aws_ipv4_prefix();
        assert_eq!(prefix.to_network().unwrap(), prefix.prefix());
    }
}
