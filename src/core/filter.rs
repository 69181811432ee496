use crate::core::aws_ip_prefix::AwsIpPrefix;
use crate::core::aws_ip_prefixes::AwsIpPrefixes;
use crate::core::errors::{Error, Result};
use crate::core::ip_version::IpVersion;
use crate::core::utils::{IntoStrings, IntoVersions};
use log::trace;
use std::collections::BTreeSet;
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  FilterBuilder
-------------------------------------------------------------------------------------------------*/

/// Builder used to construct a [Filter] object with the desired filter parameters.
///
/// Filter values are validated against the values observed in the [AwsIpPrefixes] collection;
/// a value that does not appear in the collection is an [Error::InvalidArgument], so typos fail
/// loudly instead of silently producing an empty result.
#[derive(Debug)]
pub struct FilterBuilder<'a> {
    aws_ip_prefixes: &'a AwsIpPrefixes,

    versions: Option<BTreeSet<IpVersion>>,
    regions: Option<BTreeSet<Arc<str>>>,
    network_border_groups: Option<BTreeSet<Arc<str>>>,
    services: Option<BTreeSet<Arc<str>>>,
}

/*--------------------------------------------------------------------------------------
  Filter Builder Implementation
--------------------------------------------------------------------------------------*/

impl<'a> FilterBuilder<'a> {
    /// Create a new [FilterBuilder] object for an [AwsIpPrefixes] object. By default, no
    /// filter parameters are set and every parameter includes all the values observed in the
    /// collection. Set the desired filter parameters using the builder methods and then call
    /// the [FilterBuilder::build] method to create the [Filter] object.
    ///
    /// ```rust
    /// # fn main() -> awsipprefixes::Result<()> {
    /// # let json = r#"{"syncToken": "1", "createDate": "2022-01-01-00-00-00",
    /// #   "prefixes": [{"ip_prefix": "3.5.140.0/22", "region": "us-west-1",
    /// #     "network_border_group": "us-west-1", "service": "EC2"}],
    /// #   "ipv6_prefixes": []}"#;
    /// # let aws_ip_prefixes = awsipprefixes::AwsIpPrefixes::from_json(json)?;
    /// let filter = awsipprefixes::FilterBuilder::new(&aws_ip_prefixes)
    ///     .ipv4()
    ///     .regions(["us-west-1"])?
    ///     .network_border_groups("us-west-1")?
    ///     .services(["EC2"])?
    ///     .build();
    ///
    /// assert_eq!(aws_ip_prefixes.filter(&filter).len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(aws_ip_prefixes: &'a AwsIpPrefixes) -> Self {
        Self {
            aws_ip_prefixes,
            versions: None,
            regions: None,
            network_border_groups: None,
            services: None,
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Include IPv4 prefixes.
    pub fn ipv4(self) -> Self {
        self.add_version(IpVersion::V4)
    }

    /// Include IPv6 prefixes.
    pub fn ipv6(self) -> Self {
        self.add_version(IpVersion::V6)
    }

    fn add_version(mut self, version: IpVersion) -> Self {
        self.versions.get_or_insert_with(BTreeSet::new).insert(version);
        self
    }

    /// Include prefixes with the provided IP version number(s) (`4` and/or `6`).
    pub fn versions<V: IntoVersions>(mut self, versions: V) -> Result<Self> {
        let versions = versions
            .into_versions()
            .into_iter()
            .map(IpVersion::try_from)
            .collect::<Result<BTreeSet<IpVersion>>>()?;
        self.versions = non_empty(versions);
        Ok(self)
    }

    /// Include AWS IP Prefixes from the provided AWS regions.
    pub fn regions<V: IntoStrings>(mut self, regions: V) -> Result<Self> {
        let regions = validate(regions, "region", |region| {
            self.aws_ip_prefixes.get_region(region)
        })?;
        self.regions = non_empty(regions);
        Ok(self)
    }

    /// Include AWS IP Prefixes from the provided network border groups.
    pub fn network_border_groups<V: IntoStrings>(
        mut self,
        network_border_groups: V,
    ) -> Result<Self> {
        let network_border_groups = validate(
            network_border_groups,
            "network border group",
            |network_border_group| {
                self.aws_ip_prefixes
                    .get_network_border_group(network_border_group)
            },
        )?;
        self.network_border_groups = non_empty(network_border_groups);
        Ok(self)
    }

    /// Include AWS IP Prefixes used by the provided services. Use `AMAZON` to include every
    /// prefix.
    pub fn services<V: IntoStrings>(mut self, services: V) -> Result<Self> {
        let services = validate(services, "service", |service| {
            self.aws_ip_prefixes.get_service(service)
        })?;
        self.services = non_empty(services);
        Ok(self)
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    /// Build the [Filter] object; unset parameters include all values observed in the
    /// collection.
    pub fn build(self) -> Filter {
        Filter {
            versions: self
                .versions
                .unwrap_or_else(|| BTreeSet::from([IpVersion::V4, IpVersion::V6])),
            regions: self
                .regions
                .unwrap_or_else(|| self.aws_ip_prefixes.regions().clone()),
            network_border_groups: self
                .network_border_groups
                .unwrap_or_else(|| self.aws_ip_prefixes.network_border_groups().clone()),
            services: self
                .services
                .unwrap_or_else(|| self.aws_ip_prefixes.services().clone()),
        }
    }
}

/// Resolve each value to the collection's shared string, failing on the first unknown value.
fn validate<V, F>(values: V, kind: &str, lookup: F) -> Result<BTreeSet<Arc<str>>>
where
    V: IntoStrings,
    F: Fn(&str) -> Option<Arc<str>>,
{
    values
        .into_strings()
        .iter()
        .map(|value| {
            lookup(value).ok_or_else(|| Error::InvalidArgument(format!("Invalid {kind}: {value}")))
        })
        .collect()
}

/// An empty set of values means no constraint.
fn non_empty<T: Ord>(set: BTreeSet<T>) -> Option<BTreeSet<T>> {
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/*-------------------------------------------------------------------------------------------------
  Filter
-------------------------------------------------------------------------------------------------*/

/// Filter used to include AWS IP Prefixes based on the IP version, regions, network border
/// groups, and services associated with the prefixes. Use the [FilterBuilder] to construct a
/// [Filter] object with the desired filter parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    /// Include AWS IP Prefixes with these IP versions.
    versions: BTreeSet<IpVersion>,

    /// Include AWS IP Prefixes from these AWS regions.
    regions: BTreeSet<Arc<str>>,

    /// Include AWS IP Prefixes from these network border groups.
    network_border_groups: BTreeSet<Arc<str>>,

    /// Include AWS IP Prefixes used by any of these services.
    services: BTreeSet<Arc<str>>,
}

/*--------------------------------------------------------------------------------------
  Filter Implementation
--------------------------------------------------------------------------------------*/

impl Filter {
    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Check if the filter includes IPv4 prefixes.
    pub fn ipv4(&self) -> bool {
        self.versions.contains(&IpVersion::V4)
    }

    /// Check if the filter includes IPv6 prefixes.
    pub fn ipv6(&self) -> bool {
        self.versions.contains(&IpVersion::V6)
    }

    /// IP versions included in the filter.
    pub fn versions(&self) -> &BTreeSet<IpVersion> {
        &self.versions
    }

    /// AWS regions included in the filter.
    pub fn regions(&self) -> &BTreeSet<Arc<str>> {
        &self.regions
    }

    /// Network border groups included in the filter.
    pub fn network_border_groups(&self) -> &BTreeSet<Arc<str>> {
        &self.network_border_groups
    }

    /// AWS services included in the filter.
    pub fn services(&self) -> &BTreeSet<Arc<str>> {
        &self.services
    }

    /*-------------------------------------------------------------------------
      Filter Functions
    -------------------------------------------------------------------------*/

    pub(crate) fn match_version(&self, aws_ip_prefix: &AwsIpPrefix) -> bool {
        self.versions.contains(&aws_ip_prefix.version())
    }

    pub(crate) fn match_regions(&self, aws_ip_prefix: &AwsIpPrefix) -> bool {
        self.regions.contains(&aws_ip_prefix.region)
    }

    pub(crate) fn match_network_border_groups(&self, aws_ip_prefix: &AwsIpPrefix) -> bool {
        self.network_border_groups
            .contains(&aws_ip_prefix.network_border_group)
    }

    pub(crate) fn match_services(&self, aws_ip_prefix: &AwsIpPrefix) -> bool {
        self.services
            .intersection(&aws_ip_prefix.services)
            .next()
            .is_some()
    }

    pub(crate) fn include_prefix(&self, prefix: &AwsIpPrefix) -> bool {
        let filters = [
            Filter::match_version,
            Filter::match_regions,
            Filter::match_network_border_groups,
            Filter::match_services,
        ];
        let include = filters.iter().all(|filter| filter(self, prefix));
        trace!("Filter {prefix}: include={include}");
        include
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aws_ip_prefix::tests::{test_aws_ipv4_prefix, test_aws_ipv6_prefix};
    use crate::core::aws_ip_prefixes::tests::test_aws_ip_prefixes;

    /*----------------------------------------------------------------------------------
      Filter Builder and Filter
    ----------------------------------------------------------------------------------*/

    /*-------------------------------------------------------------------------
      Test Getter and Setter Methods
    -------------------------------------------------------------------------*/

    #[test]
    fn test_getter_and_setter_methods() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        // Filter 1: IPv4, us-east-1, us-west-1, EC2, S3
        let filter1 = FilterBuilder::new(&aws_ip_prefixes)
            .ipv4()
            .regions(["us-east-1", "us-west-1"])
            .unwrap()
            .network_border_groups(["us-east-1", "us-west-1"])
            .unwrap()
            .services(["EC2", "S3"])
            .unwrap()
            .build();

        assert!(filter1.ipv4());
        assert!(!filter1.ipv6());
        assert_eq!(filter1.regions().len(), 2);
        assert_eq!(filter1.network_border_groups().len(), 2);
        assert_eq!(filter1.services().len(), 2);

        // Filter 2: IPv6, us-east-1, S3
        let filter2 = FilterBuilder::new(&aws_ip_prefixes)
            .ipv6()
            .regions("us-east-1")
            .unwrap()
            .network_border_groups("us-east-1")
            .unwrap()
            .services("S3")
            .unwrap()
            .build();

        assert!(!filter2.ipv4());
        assert!(filter2.ipv6());
        assert_eq!(filter2.regions().len(), 1);
        assert_eq!(filter2.network_border_groups().len(), 1);
        assert_eq!(filter2.services().len(), 1);

        // Filter 3: IPv4/IPv6 without other parameters includes everything observed
        let filter3 = FilterBuilder::new(&aws_ip_prefixes).ipv4().ipv6().build();

        assert!(filter3.ipv4());
        assert!(filter3.ipv6());
        assert_eq!(filter3.regions(), aws_ip_prefixes.regions());
        assert_eq!(
            filter3.network_border_groups(),
            aws_ip_prefixes.network_border_groups()
        );
        assert_eq!(filter3.services(), aws_ip_prefixes.services());
    }

    #[test]
    fn test_unset_parameters_equal_full_sets() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let unset = FilterBuilder::new(&aws_ip_prefixes).build();
        let explicit = FilterBuilder::new(&aws_ip_prefixes)
            .versions([4, 6])
            .unwrap()
            .regions(aws_ip_prefixes.regions().clone())
            .unwrap()
            .network_border_groups(aws_ip_prefixes.network_border_groups().clone())
            .unwrap()
            .services(aws_ip_prefixes.services().clone())
            .unwrap()
            .build();
        let empty = FilterBuilder::new(&aws_ip_prefixes)
            .regions(Vec::<String>::new())
            .unwrap()
            .build();

        assert_eq!(unset, explicit);
        assert_eq!(unset, empty);
        assert_eq!(aws_ip_prefixes.filter(&unset).len(), aws_ip_prefixes.len());
    }

    #[test]
    fn test_invalid_values() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        for result in [
            FilterBuilder::new(&aws_ip_prefixes).regions("us-east-3"),
            FilterBuilder::new(&aws_ip_prefixes).regions(["us-east-1", "US-EAST-1"]),
            FilterBuilder::new(&aws_ip_prefixes).network_border_groups("us-west-2-sea-1"),
            FilterBuilder::new(&aws_ip_prefixes).services("EC3"),
            FilterBuilder::new(&aws_ip_prefixes).versions([5]),
        ] {
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_versions() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let ipv6_only = FilterBuilder::new(&aws_ip_prefixes)
            .versions([6])
            .unwrap()
            .build();
        assert!(!ipv6_only.ipv4());
        assert!(ipv6_only.ipv6());
        assert_eq!(ipv6_only.versions().len(), 1);

        let filtered = aws_ip_prefixes.filter(&ipv6_only);
        assert!(filtered.ipv4_prefixes().is_empty());
        assert_eq!(filtered.ipv6_prefixes().len(), 3);

        let single = FilterBuilder::new(&aws_ip_prefixes).versions(6).unwrap().build();
        assert_eq!(single, ipv6_only);

        let from_vec = FilterBuilder::new(&aws_ip_prefixes)
            .versions(vec![4, 6])
            .unwrap()
            .build();
        assert!(from_vec.ipv4());
        assert!(from_vec.ipv6());

        assert!(matches!(
            FilterBuilder::new(&aws_ip_prefixes).versions(5),
            Err(Error::InvalidArgument(_))
        ));
    }

    /*-------------------------------------------------------------------------
      Test Filter Functions
    -------------------------------------------------------------------------*/

    #[test]
    fn test_filter_match_version() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let filter_ipv4 = FilterBuilder::new(&aws_ip_prefixes).ipv4().build();
        let filter_ipv6 = FilterBuilder::new(&aws_ip_prefixes).ipv6().build();
        let filter_none = FilterBuilder::new(&aws_ip_prefixes).build();

        let ipv4_prefix = test_aws_ipv4_prefix();
        let ipv6_prefix = test_aws_ipv6_prefix();

        assert!(filter_ipv4.match_version(&ipv4_prefix));
        assert!(!filter_ipv4.match_version(&ipv6_prefix));

        assert!(filter_ipv6.match_version(&ipv6_prefix));
        assert!(!filter_ipv6.match_version(&ipv4_prefix));

        assert!(filter_none.match_version(&ipv4_prefix));
        assert!(filter_none.match_version(&ipv6_prefix));
    }

    #[test]
    fn test_filter_match_regions() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let region_filter = FilterBuilder::new(&aws_ip_prefixes)
            .regions(["us-east-1"])
            .unwrap()
            .build();
        let no_region_filter = FilterBuilder::new(&aws_ip_prefixes).build();

        let prefix1 = test_aws_ipv4_prefix();
        let prefix2 = AwsIpPrefix {
            region: Arc::from("us-west-1"),
            ..test_aws_ipv4_prefix()
        };

        assert!(region_filter.match_regions(&prefix1));
        assert!(!region_filter.match_regions(&prefix2));

        assert!(no_region_filter.match_regions(&prefix1));
        assert!(no_region_filter.match_regions(&prefix2));
    }

    #[test]
    fn test_filter_match_network_border_group() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let network_border_group_filter = FilterBuilder::new(&aws_ip_prefixes)
            .network_border_groups(["us-east-1"])
            .unwrap()
            .build();

        let prefix1 = test_aws_ipv4_prefix();
        let prefix2 = AwsIpPrefix {
            network_border_group: Arc::from("us-west-1"),
            ..test_aws_ipv4_prefix()
        };

        assert!(network_border_group_filter.match_network_border_groups(&prefix1));
        assert!(!network_border_group_filter.match_network_border_groups(&prefix2));
    }

    #[test]
    fn test_filter_match_services() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let services_filter = FilterBuilder::new(&aws_ip_prefixes)
            .services(["S3", "CLOUDFRONT"])
            .unwrap()
            .build();

        let ec2_only = test_aws_ipv4_prefix();
        let ec2_and_s3 = AwsIpPrefix::new("10.1.0.0/16", "us-west-1", "us-west-1", ["EC2", "S3"])
            .unwrap();

        assert!(!services_filter.match_services(&ec2_only));
        assert!(services_filter.match_services(&ec2_and_s3)); // Any shared service matches
    }

    #[test]
    fn test_filter_amazon_service() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let amazon = FilterBuilder::new(&aws_ip_prefixes)
            .services("AMAZON")
            .unwrap()
            .build();
        let filtered = aws_ip_prefixes.filter(&amazon);

        assert!(filtered.iter().all(|prefix| prefix.has_service("AMAZON")));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_filter_include_prefix() {
        let aws_ip_prefixes = test_aws_ip_prefixes();

        let filter = FilterBuilder::new(&aws_ip_prefixes)
            .ipv4()
            .regions("us-east-1")
            .unwrap()
            .services("EC2")
            .unwrap()
            .build();

        assert!(filter.include_prefix(&test_aws_ipv4_prefix()));
        assert!(!filter.include_prefix(&test_aws_ipv6_prefix()));
    }
}
