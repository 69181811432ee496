use awsipprefixes::ipnetwork::IpNetwork;
use awsipprefixes::{FilterBuilder, Result};

fn main() -> Result<()> {
    // Get the AWS IP ranges
    let aws_ip_prefixes = awsipprefixes::get_ranges()?;
    println!(
        "{} AWS IP prefixes published {} (sync token {})",
        aws_ip_prefixes.len(),
        aws_ip_prefixes.create_date(),
        aws_ip_prefixes.sync_token()
    );

    // Find the longest match prefix for an IP address
    let prefix = aws_ip_prefixes.get_longest_match_prefix("3.141.102.225")?;
    println!("{prefix} {} {:?}", prefix.region(), prefix.services());

    // Find every published prefix that contains an IP address
    for supernet in aws_ip_prefixes.get_supernet_prefixes("44.192.140.65")? {
        println!("{supernet} {:?}", supernet.services());
    }

    // Search for IP prefixes
    let search_prefixes: Vec<IpNetwork> = ["3.141.102.225", "44.192.140.65", "1.1.1.1"]
        .iter()
        .filter_map(|prefix| prefix.parse().ok())
        .collect();
    let search_results = aws_ip_prefixes.search(&search_prefixes);
    for aws_ip_prefix in &search_results.aws_ip_prefixes {
        println!("{aws_ip_prefix:?}");
    }
    for not_found in &search_results.prefixes_not_found {
        println!("{not_found} is not an AWS IP address");
    }

    // Filter the AWS IP prefixes
    let filter = FilterBuilder::new(&aws_ip_prefixes)
        .ipv4()
        .regions(["us-west-2"])?
        .services(["S3"])?
        .build();
    let filtered_prefixes = aws_ip_prefixes.filter(&filter);
    for aws_ip_prefix in &filtered_prefixes {
        println!("{}", aws_ip_prefix.with_netmask());
    }

    Ok(())
}
