use crate::core::aws_ip_prefix::AwsIpPrefix;
use crate::core::errors::{Error, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/*-------------------------------------------------------------------------------------------------
  Combine AWS IP Prefixes
-------------------------------------------------------------------------------------------------*/

/// Combine two or more [AwsIpPrefix] records advertising the same prefix into one record whose
/// services are the union of the inputs' services.
///
/// The published JSON lists a prefix once per service that uses it. All records must share the
/// same prefix, region, and network border group: records that disagree indicate corrupt source
/// data and fail with [Error::InvariantViolation] (records of different IP versions fail with
/// [Error::TypeMismatch]).
///
/// ```
/// use awsipprefixes::{combine_prefixes, AwsIpPrefix};
///
/// let ec2 = AwsIpPrefix::new("3.5.140.0/22", "ap-northeast-2", "ap-northeast-2", "EC2")?;
/// let s3 = AwsIpPrefix::new("3.5.140.0/22", "ap-northeast-2", "ap-northeast-2", "S3")?;
///
/// let combined = combine_prefixes([&ec2, &s3])?;
/// assert_eq!(combined.services().len(), 2);
/// # Ok::<(), awsipprefixes::Error>(())
/// ```
pub fn combine_prefixes<'p, I>(prefixes: I) -> Result<AwsIpPrefix>
where
    I: IntoIterator<Item = &'p AwsIpPrefix>,
{
    let prefixes: Vec<&AwsIpPrefix> = prefixes.into_iter().collect();

    let (first, rest) = match prefixes.split_first() {
        Some((first, rest)) if !rest.is_empty() => (*first, rest),
        _ => {
            return Err(Error::InvariantViolation(format!(
                "At least two prefixes are required to combine; received {}",
                prefixes.len()
            )))
        }
    };

    for prefix in rest {
        if prefix.version() != first.version() {
            return Err(Error::TypeMismatch(format!(
                "Cannot combine {} prefix {} with {} prefix {}",
                first.version(),
                first,
                prefix.version(),
                prefix
            )));
        }

        // Only the services may differ
        if prefix.prefix != first.prefix
            || prefix.region != first.region
            || prefix.network_border_group != first.network_border_group
        {
            return Err(Error::InvariantViolation(format!(
                "Cannot combine prefixes with different prefix, region, or network border group \
                 values: ({}, {}, {}) and ({}, {}, {})",
                first.prefix,
                first.region,
                first.network_border_group,
                prefix.prefix,
                prefix.region,
                prefix.network_border_group
            )));
        }
    }

    let services: BTreeSet<Arc<str>> = prefixes
        .iter()
        .flat_map(|prefix| prefix.services.iter().cloned())
        .collect();

    Ok(AwsIpPrefix::with_parts(
        first.prefix,
        Arc::clone(&first.region),
        Arc::clone(&first.network_border_group),
        services,
    ))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
