use crate::cli::csv::join_services;
use awsipprefixes::{datetime, AwsIpPrefixes};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Prefix Table
--------------------------------------------------------------------------------------*/

pub fn prefix_table(aws_ip_prefixes: &AwsIpPrefixes) {
    println!("{}", build_prefix_table(aws_ip_prefixes));
    println!("{}", build_summary_table(aws_ip_prefixes));
}

fn build_prefix_table(aws_ip_prefixes: &AwsIpPrefixes) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("IP Prefix")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new("Region")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new("Network Border Group")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new("Services")
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
    ]);

    for prefix in aws_ip_prefixes {
        table.add_row(vec![
            Cell::new(prefix).add_attribute(Attribute::Bold),
            Cell::new(prefix.region()),
            Cell::new(prefix.network_border_group()),
            Cell::new(join_services(
                prefix.services().iter().map(|service| service.as_ref()),
            )),
        ]);
    }

    // Right-align the IP Prefix column
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table
}

fn build_summary_table(aws_ip_prefixes: &AwsIpPrefixes) -> Table {
    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    summary_table.add_row(vec![
        Cell::new(aws_ip_prefixes.len()),
        Cell::new("AWS IP Prefixes"),
    ]);
    summary_table.add_row(vec![
        Cell::new(aws_ip_prefixes.regions().len()),
        Cell::new("AWS Regions"),
    ]);
    summary_table.add_row(vec![
        Cell::new(aws_ip_prefixes.network_border_groups().len()),
        Cell::new("Network Border Groups"),
    ]);
    summary_table.add_row(vec![
        Cell::new(aws_ip_prefixes.services().len()),
        Cell::new("AWS Services"),
    ]);
    summary_table.add_row(vec![
        Cell::new(aws_ip_prefixes.sync_token()),
        Cell::new(format!(
            "Sync Token ({})",
            datetime::format(aws_ip_prefixes.create_date())
        )),
    ]);

    if let Some(column) = summary_table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    summary_table
}

/*--------------------------------------------------------------------------------------
  Prefixes In CIDR Format
--------------------------------------------------------------------------------------*/

pub fn prefixes_in_cidr_format(aws_ip_prefixes: &AwsIpPrefixes) {
    for aws_ip_prefix in aws_ip_prefixes {
        println!("{}", aws_ip_prefix.with_prefixlen());
    }
}

/*--------------------------------------------------------------------------------------
  Prefixes In Netmask Format
--------------------------------------------------------------------------------------*/

pub fn prefixes_in_netmask_format(aws_ip_prefixes: &AwsIpPrefixes) {
    for aws_ip_prefix in aws_ip_prefixes {
        println!(
            "{} {}",
            aws_ip_prefix.network_address(),
            aws_ip_prefix.netmask()
        );
    }
}

/*--------------------------------------------------------------------------------------
  Regions, Network Border Groups, and Services
--------------------------------------------------------------------------------------*/

pub fn regions(aws_ip_prefixes: &AwsIpPrefixes) {
    print_set(aws_ip_prefixes.regions());
}

pub fn network_border_groups(aws_ip_prefixes: &AwsIpPrefixes) {
    print_set(aws_ip_prefixes.network_border_groups());
}

pub fn services(aws_ip_prefixes: &AwsIpPrefixes) {
    print_set(aws_ip_prefixes.services());
}

fn print_set(values: &BTreeSet<Arc<str>>) {
    for value in values {
        println!("{value}");
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
