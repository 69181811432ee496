use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about="Find the AWS IP prefixes that contain IP addresses and networks.", long_about = None)]
pub struct Args {
    /// Include IPv4 prefixes
    #[arg(short = '4', long)]
    pub ipv4: bool,

    /// Include IPv6 prefixes
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Include prefixes from these AWS Regions
    #[arg(short = 'r', long = "region")]
    pub regions: Option<Vec<String>>,

    /// Include prefixes from these Network Border Groups
    #[arg(short = 'g', long = "network-border-group")]
    pub network_border_groups: Option<Vec<String>>,

    /// Include prefixes used by these AWS Services
    #[arg(short = 's', long = "service")]
    pub services: Option<Vec<String>>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Save the results to a CSV file
    #[arg(long = "csv")]
    pub csv_file: Option<PathBuf>,

    /// Load the AWS IP ranges from a local JSON file instead of the URL
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// URL of the AWS IP ranges JSON
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// PEM file of CA certificates to trust instead of the built-in roots
    #[arg(long, conflicts_with = "file")]
    pub ca_file: Option<PathBuf>,

    /// Directory of PEM CA certificates to trust instead of the built-in roots
    #[arg(long, conflicts_with = "file")]
    pub ca_path: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Search CIDRs - find AWS IP Prefixes that contain these IP addresses or networks
    pub search_cidrs: Option<Vec<String>>,
}

/*-------------------------------------------------------------------------------------------------
  Output Format
-------------------------------------------------------------------------------------------------*/

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table of prefixes with their regions, network border groups, and services
    #[default]
    Table,

    /// List of (RFC4632) CIDR-format prefixes
    Cidr,

    /// List of IP networks in network mask format (n.n.n.n m.m.m.m)
    Netmask,

    /// AWS Regions of the matching prefixes
    Regions,

    /// Network Border Groups of the matching prefixes
    NetworkBorderGroups,

    /// AWS Services of the matching prefixes
    Services,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
