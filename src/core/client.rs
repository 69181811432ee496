use crate::core::aws_ip_prefixes::AwsIpPrefixes;
use crate::core::errors::{Error, Result};
use log::{debug, error, info, warn};
use reqwest::blocking;
use reqwest::{Certificate, StatusCode};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ retrieves and parses the AWS IP ranges using the client
/// configuration from the environment ([ClientBuilder::new]). Returns an [AwsIpPrefixes] object
/// that allows you to quickly query ([get_longest_match_prefix](AwsIpPrefixes::get_longest_match_prefix()),
/// [filter](AwsIpPrefixes::filter()), etc.) the AWS IP prefixes.
///
/// ```no_run
/// let aws_ip_prefixes = awsipprefixes::get_ranges()?;
///
/// let aws_ip_prefix = aws_ip_prefixes.get_longest_match_prefix("3.141.102.225")?;
/// println!("{aws_ip_prefix} {}", aws_ip_prefix.region());
/// # Ok::<(), awsipprefixes::Error>(())
/// ```
pub fn get_ranges() -> Result<AwsIpPrefixes> {
    Client::new().get_ranges()
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the client configuration. The
/// [ClientBuilder] struct provides setters for each configuration value and a
/// [ClientBuilder::build] method to create a [Client] instance.
///
/// ```
/// let client = awsipprefixes::ClientBuilder::default()
///     .url("https://ip-ranges.amazonaws.com/ip-ranges.json")
///     .ca_file("/etc/ssl/certs/ca-certificates.crt")
///     .timeout(5000) // 5 seconds
///     .build();
///
/// assert_eq!(client.timeout(), 5000);
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
///
/// If you want to use the default configuration values, ignoring any environment variables, use
/// the [ClientBuilder::default] method to create a new [ClientBuilder] instance.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    ca_file: Option<PathBuf>,
    ca_path: Option<PathBuf>,
    timeout: u64,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with default configuration values.
    ///
    /// ```
    /// let client = awsipprefixes::ClientBuilder::default().build();
    ///
    /// assert_eq!(client.url(), "https://ip-ranges.amazonaws.com/ip-ranges.json");
    /// assert_eq!(client.ca_file(), None);
    /// assert_eq!(client.ca_path(), None);
    /// assert_eq!(client.timeout(), 10000);
    /// ```
    fn default() -> Self {
        Self {
            url: "https://ip-ranges.amazonaws.com/ip-ranges.json".to_string(),
            ca_file: None,
            ca_path: None,
            timeout: 10_000, // 10 seconds
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set and default values when the environment
    /// variables are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `AWSIPPREFIXES_URL`
    /// - `AWSIPPREFIXES_CA_FILE`
    /// - `AWSIPPREFIXES_CA_PATH`
    /// - `AWSIPPREFIXES_TIMEOUT`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            url: get_env_var("AWSIPPREFIXES_URL", default.url),
            ca_file: parse_env_var("AWSIPPREFIXES_CA_FILE").or(default.ca_file),
            ca_path: parse_env_var("AWSIPPREFIXES_CA_PATH").or(default.ca_path),
            timeout: get_env_var("AWSIPPREFIXES_TIMEOUT", default.timeout),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the URL used to retrieve the AWS IP ranges; defaults to
    /// `https://ip-ranges.amazonaws.com/ip-ranges.json` - see
    /// [AWS IP address ranges](https://docs.aws.amazon.com/vpc/latest/userguide/aws-ip-ranges.html)
    /// in the Amazon Virtual Private Cloud (VPC) User Guide for details.
    pub fn url<'s>(&'s mut self, url: &str) -> &'s mut Self {
        self.url = url.to_string();
        self
    }

    /// Set a PEM file containing one or more CA certificates to trust, in addition to the
    /// built-in roots, when verifying the server.
    pub fn ca_file<P: AsRef<Path>>(&mut self, ca_file: P) -> &mut Self {
        self.ca_file = Some(ca_file.as_ref().to_path_buf());
        self
    }

    /// Set a directory of PEM CA certificates to trust, in addition to the built-in roots,
    /// when verifying the server.
    pub fn ca_path<P: AsRef<Path>>(&mut self, ca_path: P) -> &mut Self {
        self.ca_path = Some(ca_path.as_ref().to_path_buf());
        self
    }

    /// Set the request timeout in milliseconds; defaults to `10000` milliseconds (10 seconds).
    pub fn timeout(&mut self, timeout: u64) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Client {
        Client {
            url: self.url.clone(),
            ca_file: self.ca_file.clone(),
            ca_path: self.ca_path.clone(),
            timeout: self.timeout,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// A blocking HTTPS client for retrieving the AWS IP ranges JSON and building an
/// [AwsIpPrefixes] collection from it. Each call to [Client::get_ranges] fetches a fresh copy of
/// the document; nothing is cached between calls.
///
/// The [Client::new] method attempts to source configuration values from environment variables
/// when set and uses default values when the environment variables are not set.
///
/// If you want to use the default configuration values, ignoring any environment variables, use
/// the [Client::default] method to create a new [Client] instance.
///
/// ```no_run
/// let client = awsipprefixes::Client::new();
/// let aws_ip_prefixes = client.get_ranges()?;
/// # Ok::<(), awsipprefixes::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    ca_file: Option<PathBuf>,
    ca_path: Option<PathBuf>,
    timeout: u64,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    /// Create a new [Client] with default configuration values.
    ///
    /// ```
    /// let client = awsipprefixes::Client::default();
    ///
    /// assert_eq!(client.url(), "https://ip-ranges.amazonaws.com/ip-ranges.json");
    /// assert_eq!(client.timeout(), 10000);
    /// ```
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Get the URL used to retrieve the AWS IP ranges.
    /// Defaults to `https://ip-ranges.amazonaws.com/ip-ranges.json`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the PEM file of additional trusted CA certificates, if any.
    pub fn ca_file(&self) -> Option<&Path> {
        self.ca_file.as_deref()
    }

    /// Get the directory of additional trusted CA certificates, if any.
    pub fn ca_path(&self) -> Option<&Path> {
        self.ca_path.as_deref()
    }

    /// Get the request timeout in milliseconds. Defaults to 10000 milliseconds.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /*-------------------------------------------------------------------------
      Get Ranges
    -------------------------------------------------------------------------*/

    /// Retrieves, parses, and returns an [AwsIpPrefixes] collection built from the AWS IP ranges
    /// JSON at the configured URL.
    pub fn get_ranges(&self) -> Result<AwsIpPrefixes> {
        let json = self.get_json_from_url()?;
        AwsIpPrefixes::from_json(&json)
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// Get the AWS IP ranges JSON from the URL.
    fn get_json_from_url(&self) -> Result<String> {
        let http_client = self.http_client()?;

        info!("Get AWS IP ranges from URL: GET {}", self.url);
        let response = http_client.get(&self.url).send()?;
        check_status(response.status(), &self.url)?;

        let json = response.text()?;
        info!("Received {} bytes from {}", json.len(), self.url);

        Ok(json)
    }

    /// Build the HTTP client with the configured timeout and trust store.
    fn http_client(&self) -> Result<blocking::Client> {
        let mut builder = blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .tls_built_in_root_certs(self.uses_built_in_roots());

        for certificate in self.root_certificates()? {
            builder = builder.add_root_certificate(certificate);
        }

        Ok(builder.build()?)
    }

    /// The built-in root certificates are trusted only when no CA file or CA directory is
    /// configured; otherwise the configured certificates are the whole trust store.
    fn uses_built_in_roots(&self) -> bool {
        self.ca_file.is_none() && self.ca_path.is_none()
    }

    /// Load the CA certificates from the configured CA file and CA directory.
    fn root_certificates(&self) -> Result<Vec<Certificate>> {
        let mut certificates = Vec::new();

        if let Some(ca_file) = &self.ca_file {
            if !ca_file.is_file() {
                return Err(Error::InvalidArgument(format!(
                    "CA file {ca_file:?} is not a file"
                )));
            }
            info!("Using CA file: {ca_file:?}");
            certificates.push(Certificate::from_pem(&fs::read(ca_file)?)?);
        }

        if let Some(ca_path) = &self.ca_path {
            if !ca_path.is_dir() {
                return Err(Error::InvalidArgument(format!(
                    "CA path {ca_path:?} is not a directory"
                )));
            }
            info!("Using CA path: {ca_path:?}");

            for entry in fs::read_dir(ca_path)? {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                match fs::read(&path)
                    .map_err(Error::from)
                    .and_then(|pem| Certificate::from_pem(&pem).map_err(Error::from))
                {
                    Ok(certificate) => {
                        debug!("Loaded CA certificate: {path:?}");
                        certificates.push(certificate);
                    }
                    Err(error) => warn!("Skipping CA certificate {path:?}: {error}"),
                }
            }
        }

        Ok(certificates)
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Convert a 4xx or 5xx response status into an [Error::Http].
fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if !(status.is_client_error() || status.is_server_error()) {
        return Ok(());
    }

    let kind = if status.is_client_error() {
        "Client"
    } else {
        "Server"
    };
    error!("{kind} error {status} retrieving {url}");

    Err(Error::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().map(str::to_string),
        url: url.to_string(),
    })
}

/// Get and parse an environment variable value, if it is set and valid.
fn parse_env_var<T: FromStr>(env_var: &str) -> Option<T> {
    env::var(env_var).ok().and_then(|value| {
        value
            .parse::<T>()
            .inspect(|_| info!("Using {}: {}", env_var, value))
            .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
            .ok()
    })
}

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: FromStr>(env_var: &str, default: T) -> T {
    parse_env_var(env_var).unwrap_or(default)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
