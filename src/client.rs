// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::config::ClientConfig;
use crate::error::{
    AmbiverseError, ConfigurationSnafu, DecodeSnafu, EncodeSnafu, MarshallSnafu,
    NotAnObjectSnafu, RequestFailed, StatusSnafu,
};
use crate::schema::{json_kind, JsonMap, Schema};
use crate::types::ErrorMessage;
use futures::future::BoxFuture;
use serde_json::Value;
use snafu::ResultExt;
use std::fmt::{self, Debug, Formatter};
use surf::http::{mime, Method};
use surf::{
    middleware::Next, Body, Client, Config, Request, RequestBuilder, Response, StatusCode, Url,
};
use tracing::{event, Level};

/// Transport shared by the API clients.
///
/// Holds the base URL of one API and turns a relative path, a method and an optional JSON payload
/// into the JSON object returned by the service.
#[derive(Clone)]
pub(crate) struct BaseClient {
    base_url: String,
    http: Client,
}

impl Debug for BaseClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BaseClient {
    /// Create a client for the API mounted at `segment` on the configured host.
    pub fn new(config: &ClientConfig, segment: &str) -> Result<Self, AmbiverseError> {
        let base_url = config.base_url(segment)?;
        let http = Client::try_from(Config::new().set_timeout(config.timeout)).map_err(|err| {
            ConfigurationSnafu {
                reason: format!("unable to create HTTP client: {}", err),
            }
            .build()
        })?;
        Ok(Self {
            base_url,
            http: http.with(trace),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call the endpoint at `path` below the base URL.
    ///
    /// `data` is sent as a JSON body with any method other than GET. The call fails unless the
    /// service answers with `status`, and the body of the answer must be a JSON object.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        status: StatusCode,
        data: Option<&Value>,
    ) -> Result<JsonMap, AmbiverseError> {
        let url = format!("{}{}", self.base_url, path);
        let parsed = Url::parse(&url).map_err(|err| {
            ConfigurationSnafu {
                reason: format!("invalid endpoint URL {}: {}", url, err),
            }
            .build()
        })?;

        let mut req = RequestBuilder::new(method, parsed);
        if method != Method::Get {
            if let Some(data) = data {
                let encoded = serde_json::to_string(data).context(EncodeSnafu { url: &url })?;
                let mut body = Body::from_string(encoded);
                body.set_mime(mime::JSON);
                req = req.body(body);
            }
        }

        let mut res = self
            .http
            .send(req.build())
            .await
            .context(RequestFailed { url: &url })?;
        if res.status() != status {
            // The body is only used to enrich the error, so failing to read it is not an error
            // in itself.
            let message = res
                .body_bytes()
                .await
                .ok()
                .and_then(|body| serde_json::from_slice::<ErrorMessage>(&body).ok())
                .and_then(|error| error.message);
            event!(
                Level::WARN,
                "{} {} responded with {} (expected {})",
                method,
                url,
                res.status(),
                status
            );
            return StatusSnafu {
                url,
                expected: u16::from(status),
                actual: u16::from(res.status()),
                message,
            }
            .fail();
        }

        // Read raw bytes, so that a body which is not UTF-8 fails as a decoding error.
        let body = res
            .body_bytes()
            .await
            .context(RequestFailed { url: &url })?;
        match serde_json::from_slice::<Value>(&body).context(DecodeSnafu { url: &url })? {
            Value::Object(object) => Ok(object),
            other => NotAnObjectSnafu {
                url,
                found: json_kind(&other),
            }
            .fail(),
        }
    }

    /// Load a typed record from a JSON object returned by [BaseClient::call].
    pub fn marshall<T: Schema>(&self, object: JsonMap) -> Result<T, AmbiverseError> {
        T::load(object).context(MarshallSnafu)
    }
}

/// Client middleware which logs requests and responses.
pub fn trace(
    req: Request,
    client: Client,
    next: Next<'_>,
) -> BoxFuture<'_, surf::Result<Response>> {
    Box::pin(async move {
        event!(
            Level::DEBUG,
            "--> sending request {{method: {}, url: {}, content-type: {:?}}}",
            req.method(),
            req.url(),
            req.content_type(),
        );
        let res = next.run(req, client).await?;
        event!(
            Level::DEBUG,
            "<-- received response {{status: {}, content-type: {:?}}}",
            res.status(),
            res.content_type(),
        );
        Ok(res)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Category;
    use serde_json::json;

    #[test]
    fn base_url_is_fixed_at_construction() {
        let client = BaseClient::new(
            &ClientConfig::new("localhost").with_path("/api/"),
            "knowledgegraph",
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:80/api/knowledgegraph");
    }

    #[test]
    fn construction_requires_a_hostname() {
        let err = BaseClient::new(&ClientConfig::default(), "knowledgegraph").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn marshall_failures_are_data_errors() {
        let client = BaseClient::new(&ClientConfig::new("localhost"), "knowledgegraph").unwrap();
        let object = match json!({ "id": "Q1", "name": 7 }) {
            Value::Object(object) => object,
            _ => unreachable!(),
        };
        let err = client.marshall::<Category>(object).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[async_std::test]
    async fn unreachable_hosts_are_transport_errors() {
        // Nothing listens on port 1 of the loopback interface.
        let config = ClientConfig::new("127.0.0.1").with_port(1);
        let client = BaseClient::new(&config, "knowledgegraph").unwrap();
        let err = client
            .call("/entities/_meta", Method::Get, StatusCode::Ok, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), None);
    }
}
