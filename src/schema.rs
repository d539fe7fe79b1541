// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Conversion between API records and generic JSON objects.
//!
//! The field table of each record is its derived serde implementation: wire names, primitive
//! types and nesting are all declared on the struct definitions in [crate::types]. This module
//! adds the loading and dumping entry points, plus the few primitive types serde does not
//! validate on its own (URLs and ISO 8601 date-times).

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use snafu::{ResultExt, Snafu};
use std::fmt::{self, Display, Formatter};
use url::Url;

/// A generic JSON object, as sent to and received from the service.
pub type JsonMap = serde_json::Map<String, Value>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SchemaError {
    #[snafu(display("unable to load {}: {}", record, source))]
    Load {
        record: &'static str,
        source: serde_json::Error,
    },

    #[snafu(display("unable to dump {}: {}", record, source))]
    Dump {
        record: &'static str,
        source: serde_json::Error,
    },

    #[snafu(display("{} dumps to JSON {}, not an object", record, found))]
    NotAnObject {
        record: &'static str,
        found: &'static str,
    },
}

// Helper trait with a blanket implementation allowing us to load and dump any record which has
// serde implementations.
pub trait Schema: Sized {
    /// Validate a JSON object and build a record from it.
    fn load(object: JsonMap) -> Result<Self, SchemaError>;

    /// Produce a JSON object containing the declared fields of this record.
    fn dump(&self) -> Result<JsonMap, SchemaError>;
}

impl<T: Serialize + DeserializeOwned> Schema for T {
    fn load(object: JsonMap) -> Result<Self, SchemaError> {
        serde_json::from_value(Value::Object(object)).context(LoadSnafu {
            record: record_name::<T>(),
        })
    }

    fn dump(&self) -> Result<JsonMap, SchemaError> {
        match serde_json::to_value(self).context(DumpSnafu {
            record: record_name::<T>(),
        })? {
            Value::Object(object) => Ok(object),
            other => NotAnObjectSnafu {
                record: record_name::<T>(),
                found: json_kind(&other),
            }
            .fail(),
        }
    }
}

fn record_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    if name.contains('<') {
        name
    } else {
        name.rsplit("::").next().unwrap_or(name)
    }
}

/// Name of the JSON type of `value`, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Display implementation for types which serialize to JSON. Displays as a valid JSON object.
pub fn fmt_as_json<T: Serialize>(v: &T, f: &mut Formatter<'_>) -> fmt::Result {
    let string = serde_json::to_string(v).map_err(|_| fmt::Error)?;
    write!(f, "{}", string)
}

#[derive(Debug, Snafu)]
pub enum UrlError {
    #[snafu(display("invalid URL {:?}: {}", url, source))]
    Parse {
        url: String,
        source: url::ParseError,
    },

    #[snafu(display("unsupported URL scheme {:?} in {:?}", scheme, url))]
    Scheme { url: String, scheme: String },

    #[snafu(display("URL {:?} has no host", url))]
    NoHost { url: String },
}

/// An absolute web URL.
///
/// The URL is validated when it is loaded, but the text it was loaded from is kept and dumped
/// verbatim, so records survive a load and dump unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WebUrl {
    text: String,
    parsed: Url,
}

const WEB_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

impl WebUrl {
    pub fn parse(text: impl Into<String>) -> Result<Self, UrlError> {
        let text = text.into();
        let parsed = Url::parse(&text).context(ParseSnafu { url: &text })?;
        snafu::ensure!(
            WEB_SCHEMES.contains(&parsed.scheme()),
            SchemeSnafu {
                url: &text,
                scheme: parsed.scheme(),
            }
        );
        snafu::ensure!(parsed.has_host(), NoHostSnafu { url: &text });
        Ok(Self { text, parsed })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

impl TryFrom<String> for WebUrl {
    type Error = UrlError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

impl From<WebUrl> for String {
    fn from(url: WebUrl) -> Self {
        url.text
    }
}

impl Display for WebUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Optional ISO 8601 date-times.
///
/// Timestamps with an offset are accepted in RFC 3339 form. Timestamps without an offset are
/// interpreted as UTC. Dumped timestamps are always RFC 3339 in UTC.
pub mod iso8601 {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(time) = DateTime::parse_from_rfc3339(text) {
            return Some(time.with_timezone(&Utc));
        }
        NAIVE_FORMATS.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(text, format)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
    }

    pub fn serialize<S: Serializer>(
        time: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => {
                serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid ISO 8601 date-time {:?}", text))),
            None => Ok(None),
        }
    }
}
