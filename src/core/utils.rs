use std::collections::BTreeSet;
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  Utilities
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Normalize Values to a Set of Strings
--------------------------------------------------------------------------------------*/

/// Values accepted wherever the API takes "one string or a collection of strings" (record
/// services, filter parameters). A single string is a one-element collection.
pub trait IntoStrings {
    fn into_strings(self) -> Vec<String>;
}

impl IntoStrings for &str {
    fn into_strings(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoStrings for String {
    fn into_strings(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoStrings for &String {
    fn into_strings(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> IntoStrings for Vec<S> {
    fn into_strings(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> IntoStrings for &[S] {
    fn into_strings(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> IntoStrings for [S; N] {
    fn into_strings(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> IntoStrings for BTreeSet<S> {
    fn into_strings(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

/// Normalize to a sorted, deduplicated set of shared strings.
pub(crate) fn to_arc_str_set<V: IntoStrings>(values: V) -> BTreeSet<Arc<str>> {
    values.into_strings().into_iter().map(Arc::from).collect()
}

/*--------------------------------------------------------------------------------------
  Normalize Values to a Set of IP Version Numbers
--------------------------------------------------------------------------------------*/

/// Values accepted wherever the API takes "one IP version number or a collection of version
/// numbers". A single number is a one-element collection.
pub trait IntoVersions {
    fn into_versions(self) -> Vec<u8>;
}

impl IntoVersions for u8 {
    fn into_versions(self) -> Vec<u8> {
        vec![self]
    }
}

impl IntoVersions for Vec<u8> {
    fn into_versions(self) -> Vec<u8> {
        self
    }
}

impl IntoVersions for &[u8] {
    fn into_versions(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<const N: usize> IntoVersions for [u8; N] {
    fn into_versions(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl IntoVersions for BTreeSet<u8> {
    fn into_versions(self) -> Vec<u8> {
        self.into_iter().collect()
    }
}

/*--------------------------------------------------------------------------------------
  Work with Reference Counted String Slices
--------------------------------------------------------------------------------------*/

pub fn get_arc_str_from_set(value: &str, set: &BTreeSet<Arc<str>>) -> Option<Arc<str>> {
    set.get(value).map(Arc::clone)
}

/// Get the shared copy of `value` from `set`, adding it on first use.
pub(crate) fn intern(value: &str, set: &mut BTreeSet<Arc<str>>) -> Arc<str> {
    match set.get(value) {
        Some(existing) => Arc::clone(existing),
        None => {
            let new: Arc<str> = Arc::from(value);
            set.insert(Arc::clone(&new));
            new
        }
    }
}

/*--------------------------------------------------------------------------------------
  IP Network Supplemental Functions
--------------------------------------------------------------------------------------*/

pub mod ipnetwork {
    use crate::core::errors::Result;
    use crate::core::ip_version::IpVersion;
    use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    /*
        IpNetwork keeps whatever host bits it was parsed with ("10.0.1.5/16" is
        a valid IpNetwork). Records must hold the canonical network form, while
        lookup keys are accepted with host bits and reduced before searching.
    */

    pub fn is_canonical(ip_network: &IpNetwork) -> bool {
        ip_network.ip() == ip_network.network()
    }

    pub fn network_prefix(ip_network: &IpNetwork) -> Result<IpNetwork> {
        new_network_prefix(ip_network, ip_network.prefix())
    }

    /// The supernet of `ip_network` with `mask_bits` prefix length, in canonical form.
    pub fn new_network_prefix(ip_network: &IpNetwork, mask_bits: u8) -> Result<IpNetwork> {
        let new_prefix = match ip_network {
            IpNetwork::V4(ipv4_network) => {
                let masked = Ipv4Network::new(ipv4_network.ip(), mask_bits)?;
                IpNetwork::V4(Ipv4Network::new(masked.network(), mask_bits)?)
            }
            IpNetwork::V6(ipv6_network) => {
                let masked = Ipv6Network::new(ipv6_network.ip(), mask_bits)?;
                IpNetwork::V6(Ipv6Network::new(masked.network(), mask_bits)?)
            }
        };

        Ok(new_prefix)
    }

    /// The canonical network and each of its supernets, longest prefix first, ending with `/0`.
    pub fn supernets(ip_network: &IpNetwork) -> impl Iterator<Item = IpNetwork> + '_ {
        (0..=ip_network.prefix())
            .rev()
            .filter_map(move |mask_bits| new_network_prefix(ip_network, mask_bits).ok())
    }

    /// `subnet` lies within `supernet`; networks of different IP versions never match.
    pub fn is_subnet_of(subnet: IpNetwork, supernet: IpNetwork) -> bool {
        match (subnet, supernet) {
            (IpNetwork::V4(ipv4_subnet), IpNetwork::V4(ipv4_supernet)) => {
                ipv4_supernet.is_supernet_of(ipv4_subnet)
            }
            (IpNetwork::V6(ipv6_subnet), IpNetwork::V6(ipv6_supernet)) => {
                ipv6_supernet.is_supernet_of(ipv6_subnet)
            }
            _ => false,
        }
    }

    /// Numeric ordering key: IP version, network address, then prefix length.
    pub fn sort_key(ip_network: &IpNetwork) -> (IpVersion, u128, u8) {
        let address = match ip_network.network() {
            IpAddr::V4(address) => u32::from(address) as u128,
            IpAddr::V6(address) => u128::from(address),
        };
        (IpVersion::of(ip_network), address, ip_network.prefix())
    }

    /// Host (wildcard) mask: the bitwise inverse of the net mask.
    pub fn hostmask(ip_network: &IpNetwork) -> IpAddr {
        match ip_network.mask() {
            IpAddr::V4(mask) => IpAddr::V4(Ipv4Addr::from(!u32::from(mask))),
            IpAddr::V6(mask) => IpAddr::V6(Ipv6Addr::from(!u128::from(mask))),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
