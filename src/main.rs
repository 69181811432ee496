use awsipprefixes::{AwsIpPrefixes, Result};
use clap::Parser;
use log::error;
use std::process::ExitCode;

mod cli;

/*-------------------------------------------------------------------------------------------------
  Main
-------------------------------------------------------------------------------------------------*/

fn main() -> ExitCode {
    let args = cli::Args::parse();

    // Initialize logging
    let logging = stderrlog::new()
        .module(module_path!())
        .module("awsipprefixes")
        .verbosity(args.verbose.log_level_filter())
        .init();
    if let Err(error) = logging {
        eprintln!("Unable to initialize logging: {error}");
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            error!("{error}");
            ExitCode::from(1)
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Run
-------------------------------------------------------------------------------------------------*/

/// Run the command; returns whether every search CIDR was found.
fn run(args: &cli::Args) -> Result<bool> {
    let aws_ip_prefixes = cli::load_prefixes(args)?;
    let search_cidrs = cli::parse_prefixes(args)?;

    // Validate the filter values against the full AWS IP prefixes
    let filter = cli::build_filter(args, &aws_ip_prefixes)?;

    let (results, all_found): (AwsIpPrefixes, bool) = match &search_cidrs {
        Some(search_cidrs) => {
            let search_results = aws_ip_prefixes.search(search_cidrs);
            cli::log::search_results(search_cidrs, &search_results);
            let all_found = search_results.all_found();
            (search_results.aws_ip_prefixes, all_found)
        }
        None => (aws_ip_prefixes, true),
    };

    let filtered = results.filter(&filter);

    match args.output {
        cli::OutputFormat::Table => cli::output::prefix_table(&filtered),
        cli::OutputFormat::Cidr => cli::output::prefixes_in_cidr_format(&filtered),
        cli::OutputFormat::Netmask => cli::output::prefixes_in_netmask_format(&filtered),
        cli::OutputFormat::Regions => cli::output::regions(&filtered),
        cli::OutputFormat::NetworkBorderGroups => cli::output::network_border_groups(&filtered),
        cli::OutputFormat::Services => cli::output::services(&filtered),
    }

    if let Some(csv_file) = &args.csv_file {
        cli::csv::save(&filtered, csv_file)?;
    }

    Ok(all_found)
}
