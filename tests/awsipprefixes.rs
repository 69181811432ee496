use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/*-------------------------------------------------------------------------------------------------
  awsipprefixes Binary Tests
-------------------------------------------------------------------------------------------------*/

/// The `awsipprefixes` command, reading the AWS IP ranges from the test fixture.
fn awsipprefixes() -> Command {
    let mut command = Command::cargo_bin("awsipprefixes").unwrap();
    command.arg("--file").arg("tests/data/ip-ranges.json");
    command
}

/*--------------------------------------------------------------------------------------
  No Arguments - Parse and Display All AWS IP Prefixes
--------------------------------------------------------------------------------------*/

#[test]
fn command_no_args() {
    awsipprefixes()
        .assert()
        .success()
        .stdout(predicate::str::contains("3.5.140.0/22"))
        .stdout(predicate::str::contains("2a05:d07a:a000::/40"));
}

/*--------------------------------------------------------------------------------------
  Version
--------------------------------------------------------------------------------------*/

#[test]
fn command_version() {
    Command::cargo_bin("awsipprefixes")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

/*--------------------------------------------------------------------------------------
  Input Errors
--------------------------------------------------------------------------------------*/

#[test]
fn command_missing_file() {
    Command::cargo_bin("awsipprefixes")
        .unwrap()
        .arg("--file")
        .arg("tests/data/no-such-file.json")
        .assert()
        .failure()
        .code(1);
}

/*--------------------------------------------------------------------------------------
  Output Formats
--------------------------------------------------------------------------------------*/

/*-----------------------------------------------------------------------------
  Output: Table
-----------------------------------------------------------------------------*/

#[test]
fn command_output_table() {
    awsipprefixes()
        .arg("--output")
        .arg("table")
        .assert()
        .success()
        .stdout(predicate::str::contains("Network Border Group"))
        .stdout(predicate::str::contains("us-east-1-atl-1"))
        .stdout(predicate::str::contains("AMAZON, EC2, S3"));
}

/*-----------------------------------------------------------------------------
  Output: CIDR
-----------------------------------------------------------------------------*/

#[test]
fn command_output_cidr() {
    awsipprefixes()
        .arg("--output")
        .arg("cidr")
        .assert()
        .success()
        .stdout(
            "3.5.140.0/22\n\
             15.230.221.0/24\n\
             44.192.0.0/11\n\
             44.192.140.64/28\n\
             52.84.0.0/15\n\
             52.94.76.0/22\n\
             2600:1f18::/33\n\
             2600:9000::/28\n\
             2a05:d07a:a000::/40\n",
        );
}

/*--------------------------------------------------------------------------------------
  Output: Netmask
--------------------------------------------------------------------------------------*/

#[test]
fn command_output_netmask() {
    awsipprefixes()
        .arg("--ipv4")
        .arg("--output")
        .arg("netmask")
        .assert()
        .success()
        .stdout(predicate::str::contains("3.5.140.0 255.255.252.0\n"))
        .stdout(predicate::str::contains("44.192.0.0 255.224.0.0\n"));
}

/*-----------------------------------------------------------------------------
  Output: Regions
-----------------------------------------------------------------------------*/

#[test]
fn command_output_regions() {
    awsipprefixes()
        .arg("--output")
        .arg("regions")
        .assert()
        .success()
        .stdout("GLOBAL\nap-northeast-2\neu-south-1\nus-east-1\nus-west-2\n");
}

/*-----------------------------------------------------------------------------
  Output: Network Border Groups
-----------------------------------------------------------------------------*/

#[test]
fn command_output_network_border_groups() {
    awsipprefixes()
        .arg("--output")
        .arg("network-border-groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("us-east-1-atl-1\n"));
}

/*-----------------------------------------------------------------------------
  Output: Services
-----------------------------------------------------------------------------*/

#[test]
fn command_output_services() {
    awsipprefixes()
        .arg("-o")
        .arg("services")
        .assert()
        .success()
        .stdout("AMAZON\nCLOUDFRONT\nEC2\nEC2_INSTANCE_CONNECT\nS3\n");
}

/*--------------------------------------------------------------------------------------
  Search
--------------------------------------------------------------------------------------*/

/*-----------------------------------------------------------------------------
  Search: IP Address
-----------------------------------------------------------------------------*/

#[test]
fn command_search_ip_address() {
    awsipprefixes()
        .arg("-o")
        .arg("cidr")
        .arg("44.192.140.65")
        .assert()
        .success()
        .stdout("44.192.0.0/11\n44.192.140.64/28\n");
}

#[test]
fn command_search_ipv6_address() {
    awsipprefixes()
        .arg("-o")
        .arg("cidr")
        .arg("2600:9000:2000::1")
        .assert()
        .success()
        .stdout("2600:9000::/28\n");
}

#[test]
fn command_search_and_filter() {
    awsipprefixes()
        .arg("-o")
        .arg("cidr")
        .arg("--service")
        .arg("EC2")
        .arg("44.192.140.65")
        .assert()
        .success()
        .stdout("44.192.0.0/11\n");
}

/*-----------------------------------------------------------------------------
  Search: IP Address Not Found
-----------------------------------------------------------------------------*/

#[test]
fn command_search_ip_address_not_found() {
    awsipprefixes()
        .arg("1.1.1.1")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn command_search_some_not_found() {
    awsipprefixes()
        .arg("-o")
        .arg("cidr")
        .arg("3.5.141.7")
        .arg("1.1.1.1")
        .assert()
        .failure()
        .code(1)
        .stdout("3.5.140.0/22\n");
}

#[test]
fn command_search_invalid_ip_address() {
    awsipprefixes()
        .arg("not-an-ip-address")
        .assert()
        .failure()
        .code(1);
}

/*--------------------------------------------------------------------------------------
  Filter
--------------------------------------------------------------------------------------*/

/*-----------------------------------------------------------------------------
  Filter: IPv4
-----------------------------------------------------------------------------*/

#[test]
fn command_filter_ipv4() {
    awsipprefixes()
        .arg("--ipv4")
        .arg("-o")
        .arg("cidr")
        .assert()
        .success()
        .stdout(predicate::str::contains("3.5.140.0/22"))
        .stdout(predicate::str::contains("::").not());
}

/*-----------------------------------------------------------------------------
  Filter: IPv6
-----------------------------------------------------------------------------*/

#[test]
fn command_filter_ipv6() {
    awsipprefixes()
        .arg("--ipv6")
        .arg("-o")
        .arg("cidr")
        .assert()
        .success()
        .stdout("2600:1f18::/33\n2600:9000::/28\n2a05:d07a:a000::/40\n");
}

/*-----------------------------------------------------------------------------
  Filter: Region
-----------------------------------------------------------------------------*/

#[test]
fn command_filter_region() {
    awsipprefixes()
        .arg("--region")
        .arg("global")
        .arg("-o")
        .arg("cidr")
        .assert()
        .success()
        .stdout("52.84.0.0/15\n2600:9000::/28\n");
}

#[test]
fn command_filter_invalid_region() {
    awsipprefixes()
        .arg("--region")
        .arg("us-east-3")
        .assert()
        .failure()
        .code(1);
}

/*-----------------------------------------------------------------------------
  Filter: Network Border Group
-----------------------------------------------------------------------------*/

#[test]
fn command_filter_network_border_group() {
    awsipprefixes()
        .arg("--network-border-group")
        .arg("us-east-1-atl-1")
        .arg("-o")
        .arg("cidr")
        .assert()
        .success()
        .stdout("15.230.221.0/24\n");
}

/*-----------------------------------------------------------------------------
  Filter: Service
-----------------------------------------------------------------------------*/

#[test]
fn command_filter_service() {
    awsipprefixes()
        .arg("--service")
        .arg("s3")
        .arg("-o")
        .arg("cidr")
        .assert()
        .success()
        .stdout("3.5.140.0/22\n2a05:d07a:a000::/40\n");
}

/*-----------------------------------------------------------------------------
  Filter - IPv4, Region, Network Border Group, Service
-----------------------------------------------------------------------------*/

#[test]
fn command_filter_ipv4_region_network_border_group_service() {
    awsipprefixes()
        .arg("--ipv4")
        .arg("--region")
        .arg("us-east-1")
        .arg("--network-border-group")
        .arg("us-east-1")
        .arg("--service")
        .arg("EC2")
        .arg("-o")
        .arg("cidr")
        .assert()
        .success()
        .stdout("44.192.0.0/11\n");
}

/*--------------------------------------------------------------------------------------
  Save to CSV
--------------------------------------------------------------------------------------*/

#[test]
fn command_save_to_csv() {
    let csv_file = std::env::temp_dir().join(format!(
        "awsipprefixes-command-save-to-csv-{}.csv",
        std::process::id()
    ));

    awsipprefixes()
        .arg("--service")
        .arg("CLOUDFRONT")
        .arg("-o")
        .arg("cidr")
        .arg("--csv")
        .arg(&csv_file)
        .assert()
        .success();

    let contents = fs::read_to_string(&csv_file).unwrap();
    fs::remove_file(&csv_file).unwrap();

    assert_eq!(
        contents,
        "AWS IP Prefix,Region,Network Border Group,Services\n\
         52.84.0.0/15,GLOBAL,GLOBAL,\"AMAZON, CLOUDFRONT\"\n\
         2600:9000::/28,GLOBAL,GLOBAL,\"AMAZON, CLOUDFRONT\"\n"
    );
}
