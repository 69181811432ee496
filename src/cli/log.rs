use awsipprefixes::SearchResults;
use ipnetwork::IpNetwork;
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Search Results
--------------------------------------------------------------------------------------*/

pub fn search_results(search_cidrs: &[IpNetwork], search_results: &SearchResults) {
    let count_search_cidrs = search_cidrs.len();
    info!("Searched for {count_search_cidrs} CIDR(s) in the AWS IP prefixes");

    let count_search_cidrs_found = search_results.prefix_matches.len();
    let count_containing_prefixes = search_results.aws_ip_prefixes.len();
    if count_search_cidrs_found > 0 {
        info!("Found {count_search_cidrs_found} search CIDR(s) contained in {count_containing_prefixes} AWS IP Prefix(es)");
    };

    for (search_cidr, aws_ip_prefixes) in &search_results.prefix_matches {
        if let Some(longest_match) = aws_ip_prefixes.last() {
            info!("{search_cidr} longest match: {longest_match}");
        }
    }

    let count_search_cidrs_not_found = search_results.prefixes_not_found.len();
    if count_search_cidrs_not_found > 0 {
        warn!("Did not find {count_search_cidrs_not_found} search CIDR(s)");
        for search_cidr in &search_results.prefixes_not_found {
            warn!("Not found: {search_cidr}");
        }
    };
}
