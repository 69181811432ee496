use awsipprefixes::{AwsIpPrefixes, Result};
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save AWS IP Prefixes to CSV File
-------------------------------------------------------------------------------------------------*/

pub fn save(aws_ip_prefixes: &AwsIpPrefixes, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.serialize([
        "AWS IP Prefix",
        "Region",
        "Network Border Group",
        "Services",
    ])?;

    // Write prefix records
    for aws_ip_prefix in aws_ip_prefixes {
        let record = (
            aws_ip_prefix.with_prefixlen(),
            aws_ip_prefix.region().as_ref(),
            aws_ip_prefix.network_border_group().as_ref(),
            join_services(aws_ip_prefix.services().iter().map(|service| service.as_ref())),
        );
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}

pub(crate) fn join_services<'s, I: Iterator<Item = &'s str>>(services: I) -> String {
    services.collect::<Vec<&str>>().join(", ")
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use awsipprefixes::AwsIpPrefix;
    use chrono::Utc;
    use std::fs;

    #[test]
    fn test_save() {
        let aws_ip_prefixes = AwsIpPrefixes::new(
            "1640995200",
            Utc::now(),
            vec![AwsIpPrefix::new("10.0.0.0/8", "us-east-1", "us-east-1", ["S3", "EC2"]).unwrap()],
            Vec::<AwsIpPrefix>::new(),
            None,
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("awsipprefixes-{}.csv", std::process::id()));
        save(&aws_ip_prefixes, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "AWS IP Prefix,Region,Network Border Group,Services");
        assert_eq!(lines[1], "10.0.0.0/8,us-east-1,us-east-1,\"EC2, S3\"");
    }
}
