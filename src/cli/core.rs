use crate::cli;
use awsipprefixes::{AwsIpPrefixes, ClientBuilder, Error, Filter, FilterBuilder, LookupKey, Result};
use ipnetwork::IpNetwork;
use log::{error, info};
use std::fs;

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Load the AWS IP Prefixes from a local file or the URL
--------------------------------------------------------------------------------------*/

pub fn load_prefixes(args: &cli::Args) -> Result<AwsIpPrefixes> {
    if let Some(file) = &args.file {
        info!("Load AWS IP ranges from file: {file:?}");
        let json = fs::read_to_string(file)?;
        return AwsIpPrefixes::from_json(&json);
    }

    let mut builder = ClientBuilder::new();
    if let Some(url) = &args.url {
        builder.url(url);
    }
    if let Some(ca_file) = &args.ca_file {
        builder.ca_file(ca_file);
    }
    if let Some(ca_path) = &args.ca_path {
        builder.ca_path(ca_path);
    }

    builder.build().get_ranges()
}

/*--------------------------------------------------------------------------------------
  Parse IP Network prefixes from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn parse_prefixes(args: &cli::Args) -> Result<Option<Vec<IpNetwork>>> {
    let Some(search_cidrs) = &args.search_cidrs else {
        return Ok(None);
    };

    let prefixes = search_cidrs
        .iter()
        .map(|prefix| {
            prefix.to_network().inspect_err(|_| {
                error!("Invalid IP prefix: {:?}", prefix);
            })
        })
        .collect::<Result<Vec<IpNetwork>>>()?;

    Ok(Some(prefixes))
}

/*--------------------------------------------------------------------------------------
  Build AWS IP Prefixes filter from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_filter(args: &cli::Args, aws_ip_prefixes: &AwsIpPrefixes) -> Result<Filter> {
    let mut filter_builder = FilterBuilder::new(aws_ip_prefixes);

    if args.ipv4 {
        filter_builder = filter_builder.ipv4();
    }
    if args.ipv6 {
        filter_builder = filter_builder.ipv6();
    }

    if let Some(regions) = &args.regions {
        let regions: Vec<String> = regions
            .iter()
            .map(|region| cli::utils::to_lowercase(region, ["GLOBAL"]))
            .collect();
        filter_builder = filter_builder
            .regions(regions)
            .inspect_err(|error| log_invalid("region", error))?;
    }

    if let Some(network_border_groups) = &args.network_border_groups {
        let network_border_groups: Vec<String> = network_border_groups
            .iter()
            .map(|network_border_group| {
                cli::utils::to_lowercase(network_border_group, ["GLOBAL"])
            })
            .collect();
        filter_builder = filter_builder
            .network_border_groups(network_border_groups)
            .inspect_err(|error| log_invalid("network border group", error))?;
    }

    if let Some(services) = &args.services {
        let services: Vec<String> = services
            .iter()
            .map(|service| service.to_uppercase())
            .collect();
        filter_builder = filter_builder
            .services(services)
            .inspect_err(|error| log_invalid("service", error))?;
    }

    Ok(filter_builder.build())
}

fn log_invalid(kind: &str, error: &Error) {
    error!("{error}; the {kind} was not found in the AWS IP ranges");
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
