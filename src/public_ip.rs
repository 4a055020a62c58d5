use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use log::{info, warn};

use crate::error::{Error, Result};

const IPV4_ECHO_URL: &str = "https://4.kritzl.dev";
const IPV6_ECHO_URL: &str = "https://6.kritzl.dev";

/// The host's externally visible addresses, at most one per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicAddrs {
    pub v4: Option<Ipv4Addr>,
    pub v6: Option<Ipv6Addr>,
}

/// Fetches the public IP addresses of this host from HTTPS echo services
/// that answer with the caller's address as plain text.
pub struct Resolver {
    ipv4_url: String,
    ipv6_url: String,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_urls(IPV4_ECHO_URL, IPV6_ECHO_URL)
    }

    pub fn with_urls(ipv4_url: impl Into<String>, ipv6_url: impl Into<String>) -> Self {
        Resolver {
            ipv4_url: ipv4_url.into(),
            ipv6_url: ipv6_url.into(),
        }
    }

    /// Asks both echo services which address this host connects from.
    ///
    /// An endpoint that cannot be reached at all means the host has no
    /// connectivity for that family; failing to determine both addresses is
    /// an error, since there would be nothing to publish.
    pub fn resolve(&self) -> Result<PublicAddrs> {
        let v4 = fetch::<Ipv4Addr>(&self.ipv4_url)?;
        let v6 = fetch::<Ipv6Addr>(&self.ipv6_url)?;

        match (v4, v6) {
            (None, None) => {
                return Err(Error::network(
                    "could not determine a public address for either family",
                ));
            }
            (Some(v4), None) => info!("Public IPv4 address is {}, no IPv6 connectivity", v4),
            (None, Some(v6)) => info!("Public IPv6 address is {}, no IPv4 connectivity", v6),
            (Some(v4), Some(v6)) => info!("Public addresses are {} and {}", v4, v6),
        }

        Ok(PublicAddrs { v4, v6 })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch<T: FromStr>(url: &str) -> Result<Option<T>> {
    let response = match attohttpc::get(url).send() {
        Ok(response) => response,
        Err(e) => {
            warn!("Could not reach {}: {}", url, e);
            return Ok(None);
        }
    };
    if !response.is_success() {
        return Err(Error::network(format!(
            "{} answered with status {}",
            url,
            response.status()
        )));
    }
    let body = response
        .text()
        .map_err(|e| Error::network(format!("failed to read response from {}: {}", url, e)))?;
    let trimmed = body.trim();
    trimmed.parse().map(Some).map_err(|_| {
        Error::network(format!(
            "{} did not return a well-formed address: {:?}",
            url, trimmed
        ))
    })
}
