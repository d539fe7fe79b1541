// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::schema::SchemaError;
use snafu::{IntoError, Snafu};

/// Errors returned by the [KnowledgeGraph](crate::KnowledgeGraph) and
/// [AmbiverseNlu](crate::AmbiverseNlu) clients.
///
/// Every failure aborts the single call which produced it. Use [AmbiverseError::kind] to decide
/// how to react without matching on individual variants.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AmbiverseError {
    #[snafu(display("invalid client configuration: {}", reason))]
    Configuration { reason: String },

    #[snafu(display("invalid argument: {}", reason))]
    Usage { reason: String },

    /// The service answered with a status other than the one the endpoint returns on success.
    ///
    /// If the body of the response was a service error message, it is kept in `message`.
    #[snafu(display(
        "{} responded with HTTP {} (expected {}){}",
        url,
        actual,
        expected,
        message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default()
    ))]
    Status {
        url: String,
        expected: u16,
        actual: u16,
        message: Option<String>,
    },

    /// The request failed without producing a complete response.
    #[snafu(display("request to {} failed: {}", url, message))]
    Request { url: String, message: String },

    #[snafu(display("unable to encode request body for {}: {}", url, source))]
    Encode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("response from {} is not valid JSON: {}", url, source))]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("response from {} is JSON {}, not an object", url, found))]
    NotAnObject { url: String, found: &'static str },

    #[snafu(display("{}", source))]
    Marshall { source: SchemaError },
}

/// Coarse classification of an [AmbiverseError].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client was constructed with invalid parameters. No request was attempted.
    Configuration,
    /// A method was called with a malformed argument. No request was attempted.
    Usage,
    /// The request failed or the service answered with an unexpected status.
    Transport,
    /// The response could not be parsed or did not match the expected schema.
    Data,
}

impl AmbiverseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Usage { .. } => ErrorKind::Usage,
            Self::Status { .. } | Self::Request { .. } => ErrorKind::Transport,
            Self::Encode { .. }
            | Self::Decode { .. }
            | Self::NotAnObject { .. }
            | Self::Marshall { .. } => ErrorKind::Data,
        }
    }

    /// The HTTP status of the response, if the service answered with an unexpected one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

/// Context for embedding network client errors into [AmbiverseError].
///
/// This type implements the [IntoError] trait from SNAFU, so it can be used with
/// [ResultExt::context](snafu::ResultExt::context) just like automatically generated SNAFU
/// contexts. [surf::Error] does not implement [std::error::Error], so it is flattened into its
/// [Display](std::fmt::Display) form.
pub(crate) struct RequestFailed<'a> {
    pub url: &'a str,
}

impl IntoError<AmbiverseError> for RequestFailed<'_> {
    type Source = surf::Error;

    fn into_error(self, source: Self::Source) -> AmbiverseError {
        AmbiverseError::Request {
            url: self.url.to_string(),
            message: source.to_string(),
        }
    }
}
