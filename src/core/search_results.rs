use crate::core::aws_ip_prefix::AwsIpPrefix;
use crate::core::aws_ip_prefixes::AwsIpPrefixes;
use ipnetwork::IpNetwork;
use std::collections::{BTreeMap, BTreeSet};

/*-------------------------------------------------------------------------------------------------
  Search Results
-------------------------------------------------------------------------------------------------*/

/// Search results containing the matching [AwsIpPrefixes], a map of found
/// prefixes, and the set of prefixes not found in the AWS IP prefixes.
#[derive(Clone, Debug, Default)]
pub struct SearchResults {
    /// [AwsIpPrefixes] object containing every AWS IP prefix that matched a
    /// search CIDR.
    pub aws_ip_prefixes: AwsIpPrefixes,

    /// Map of found [IpNetwork] prefixes to the [AwsIpPrefix] records that
    /// contain them, shortest prefix first; the last record is the longest
    /// match.
    pub prefix_matches: BTreeMap<IpNetwork, Vec<AwsIpPrefix>>,

    /// Set of [IpNetwork] prefixes not found in the AWS IP prefixes.
    pub prefixes_not_found: BTreeSet<IpNetwork>,
}

impl SearchResults {
    /// The longest-match [AwsIpPrefix] found for a search CIDR.
    pub fn longest_match(&self, prefix: &IpNetwork) -> Option<&AwsIpPrefix> {
        self.prefix_matches.get(prefix).and_then(|matches| matches.last())
    }

    /// Every search CIDR was found.
    pub fn all_found(&self) -> bool {
        self.prefixes_not_found.is_empty()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use crate::core::aws_ip_prefixes::tests::test_aws_ip_prefixes;
    use ipnetwork::IpNetwork;

    #[test]
    fn test_longest_match() {
        let aws_ip_prefixes = test_aws_ip_prefixes();
        let search: Vec<IpNetwork> = vec!["10.0.1.5".parse().unwrap()];

        let search_results = aws_ip_prefixes.search(&search);

        assert!(search_results.all_found());
        assert_eq!(
            search_results.longest_match(&search[0]).unwrap().to_string(),
            "10.0.0.0/16"
        );
    }

    #[test]
    fn test_not_found() {
        let aws_ip_prefixes = test_aws_ip_prefixes();
        let search: Vec<IpNetwork> = vec!["192.0.2.1".parse().unwrap()];

        let search_results = aws_ip_prefixes.search(&search);

        assert!(!search_results.all_found());
        assert!(search_results.longest_match(&search[0]).is_none());
        assert!(search_results.aws_ip_prefixes.is_empty());
    }
}
