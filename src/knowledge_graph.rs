// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::client::BaseClient;
use crate::config::ClientConfig;
use crate::error::{AmbiverseError, UsageSnafu};
use crate::schema::JsonMap;
use crate::types::{CategoriesResponse, Category, EntitiesResponse, Entity, Meta};
use serde_json::Value;
use snafu::ensure;
use std::collections::BTreeMap;
use surf::{http::Method, StatusCode};

/// Client for the KnowledgeGraph API.
///
/// Every lookup comes in two flavors: the plain method loads the response into typed records, the
/// `_raw` method returns the JSON object sent by the service without validating it.
#[derive(Clone, Debug)]
pub struct KnowledgeGraph {
    client: BaseClient,
}

impl KnowledgeGraph {
    pub const BASE_PATH: &'static str = "knowledgegraph";

    pub fn new(config: &ClientConfig) -> Result<Self, AmbiverseError> {
        Ok(Self {
            client: BaseClient::new(config, Self::BASE_PATH)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Look up entities by identifier.
    ///
    /// Blank identifiers are rejected with a usage error before any request is sent.
    pub async fn entities<S: AsRef<str> + Sync>(
        &self,
        identifiers: &[S],
    ) -> Result<BTreeMap<String, Entity>, AmbiverseError> {
        let response = self.entities_raw(identifiers).await?;
        let EntitiesResponse { entities } = self.client.marshall(response)?;
        Ok(entities)
    }

    /// Like [KnowledgeGraph::entities], but returns the response without validating it. The
    /// identifiers are checked all the same.
    pub async fn entities_raw<S: AsRef<str> + Sync>(
        &self,
        identifiers: &[S],
    ) -> Result<JsonMap, AmbiverseError> {
        let body = identifiers_body(identifiers)?;
        self.client
            .call("/entities", Method::Post, StatusCode::Ok, Some(&body))
            .await
    }

    /// Describe the dataset behind the entities endpoint.
    pub async fn entities_meta(&self) -> Result<Meta, AmbiverseError> {
        let response = self.entities_meta_raw().await?;
        self.client.marshall(response)
    }

    pub async fn entities_meta_raw(&self) -> Result<JsonMap, AmbiverseError> {
        self.client
            .call("/entities/_meta", Method::Get, StatusCode::Ok, None)
            .await
    }

    /// Look up categories by identifier.
    ///
    /// Blank identifiers are rejected with a usage error before any request is sent.
    pub async fn categories<S: AsRef<str> + Sync>(
        &self,
        identifiers: &[S],
    ) -> Result<BTreeMap<String, Category>, AmbiverseError> {
        let response = self.categories_raw(identifiers).await?;
        let CategoriesResponse { categories } = self.client.marshall(response)?;
        Ok(categories)
    }

    pub async fn categories_raw<S: AsRef<str> + Sync>(
        &self,
        identifiers: &[S],
    ) -> Result<JsonMap, AmbiverseError> {
        let body = identifiers_body(identifiers)?;
        self.client
            .call("/categories", Method::Post, StatusCode::Ok, Some(&body))
            .await
    }

    /// Describe the dataset behind the categories endpoint.
    pub async fn categories_meta(&self) -> Result<Meta, AmbiverseError> {
        let response = self.categories_meta_raw().await?;
        self.client.marshall(response)
    }

    pub async fn categories_meta_raw(&self) -> Result<JsonMap, AmbiverseError> {
        self.client
            .call("/categories/_meta", Method::Get, StatusCode::Ok, None)
            .await
    }
}

// The lookup endpoints take a JSON array of identifiers.
fn identifiers_body<S: AsRef<str>>(identifiers: &[S]) -> Result<Value, AmbiverseError> {
    identifiers
        .iter()
        .enumerate()
        .map(|(i, identifier)| -> Result<Value, AmbiverseError> {
            let identifier = identifier.as_ref();
            ensure!(
                !identifier.trim().is_empty(),
                UsageSnafu {
                    reason: format!("identifier {} is blank", i),
                }
            );
            Ok(Value::String(identifier.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn base_url_includes_knowledgegraph() {
        let kg = KnowledgeGraph::new(&ClientConfig::new("kg.example.org").with_port(8080)).unwrap();
        assert_eq!(kg.base_url(), "http://kg.example.org:8080/knowledgegraph");
    }

    #[test]
    fn identifiers_are_sent_as_an_array() {
        assert_eq!(
            identifiers_body(&["Q1", "Q2"]).unwrap(),
            json!(["Q1", "Q2"])
        );
        assert_eq!(identifiers_body::<String>(&[]).unwrap(), json!([]));
    }

    #[test]
    fn blank_identifiers_are_usage_errors() {
        let err = identifiers_body(&["Q1", " "]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.to_string(), "invalid argument: identifier 1 is blank");
    }
}
