/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod aws_ip_prefix;
pub mod aws_ip_prefixes;
pub mod client;
pub mod combine;
pub mod datetime;
pub mod errors;
pub mod feed;
pub mod filter;
pub mod ip_version;
pub mod json;
pub mod lookup_key;
pub mod search_results;
pub mod utils;
