// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::error::{AmbiverseError, ConfigurationSnafu};
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt::{self, Display, Formatter};
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Default for Protocol {
    fn default() -> Self {
        Self::Http
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Https => "https",
        })
    }
}

impl FromStr for Protocol {
    type Err = AmbiverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => ConfigurationSnafu {
                reason: format!("unsupported protocol {:?}", s),
            }
            .fail(),
        }
    }
}

/// Connection parameters of a service.
///
/// ```
/// use ambiverse_client::{ClientConfig, Protocol};
///
/// let config = ClientConfig::new("nlu.example.org")
///     .with_port(8080)
///     .with_path("api/v2")
///     .with_protocol(Protocol::Https);
/// assert_eq!(
///     config.base_url("entitylinking").unwrap(),
///     "https://nlu.example.org:8080/api/v2/entitylinking"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub hostname: String,
    pub port: u16,
    /// Prefix of the API paths on the host.
    pub path: Option<String>,
    pub protocol: Protocol,
    /// Maximum duration of a single request. Unlimited if absent.
    #[serde(with = "optional_seconds")]
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            port: 80,
            path: None,
            protocol: Protocol::Http,
            timeout: None,
        }
    }
}

// Characters which would turn part of the hostname into another component of the URL.
const HOSTNAME_DELIMITERS: &[char] = &['/', '?', '#', '@', ':'];

impl ClientConfig {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The base URL of the API mounted at `segment` below the configured path.
    ///
    /// The result has the form `{protocol}://{hostname}:{port}/{path}/{segment}`, with the slashes
    /// around `path` and `segment` normalized so that exactly one separates each component.
    pub fn base_url(&self, segment: &str) -> Result<String, AmbiverseError> {
        let hostname = self.hostname.trim();
        ensure!(
            !hostname.is_empty(),
            ConfigurationSnafu {
                reason: "hostname is required",
            }
        );
        // IPv6 literals are bracketed, as they appear in URLs.
        let valid = match hostname.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            Some(address) => address.parse::<Ipv6Addr>().is_ok(),
            None => {
                !hostname.contains(HOSTNAME_DELIMITERS) && !hostname.contains(char::is_whitespace)
            }
        };
        ensure!(
            valid,
            ConfigurationSnafu {
                reason: format!("invalid hostname {:?}", hostname),
            }
        );

        let path = self
            .path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(segment))
            .map(|component| component.trim_matches('/'))
            .filter(|component| !component.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        let base_url = format!("{}://{}:{}/{}", self.protocol, hostname, self.port, path);
        Url::parse(&base_url).map_err(|err| {
            ConfigurationSnafu {
                reason: format!("invalid base URL {}: {}", base_url, err),
            }
            .build()
        })?;
        Ok(base_url)
    }
}

// Timeouts are configured as a (possibly fractional) number of seconds.
mod optional_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        timeout: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match timeout {
            Some(timeout) => serializer.serialize_f64(timeout.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        secs.map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|err| {
                serde::de::Error::custom(format!("invalid timeout {} seconds: {}", secs, err))
            })
        })
        .transpose()
    }
}
