// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::client::BaseClient;
use crate::config::ClientConfig;
use crate::error::{AmbiverseError, MarshallSnafu, UsageSnafu};
use crate::schema::{JsonMap, Schema};
use crate::types::{AnalyzeInput, AnalyzeOutput, Meta};
use serde_json::Value;
use snafu::{ensure, ResultExt};
use surf::{http::Method, StatusCode};

/// Client for the AmbiverseNLU entity linking API.
#[derive(Clone, Debug)]
pub struct AmbiverseNlu {
    client: BaseClient,
}

impl AmbiverseNlu {
    pub const BASE_PATH: &'static str = "entitylinking";

    pub fn new(config: &ClientConfig) -> Result<Self, AmbiverseError> {
        Ok(Self {
            client: BaseClient::new(config, Self::BASE_PATH)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Find and link the entities mentioned in a text.
    ///
    /// An input without text, or with a confidence threshold outside [0.0, 1.0], is rejected with
    /// a usage error before any request is sent.
    pub async fn analyze(&self, input: &AnalyzeInput) -> Result<AnalyzeOutput, AmbiverseError> {
        let response = self.analyze_raw(input).await?;
        self.client.marshall(response)
    }

    /// Like [AmbiverseNlu::analyze], but returns the response without validating it. The input
    /// is checked all the same.
    pub async fn analyze_raw(&self, input: &AnalyzeInput) -> Result<JsonMap, AmbiverseError> {
        check_input(input)?;
        let body = Value::Object(input.dump().context(MarshallSnafu)?);
        self.client
            .call("/analyze", Method::Post, StatusCode::Ok, Some(&body))
            .await
    }

    /// Describe the dataset behind the entity linking endpoint.
    pub async fn meta(&self) -> Result<Meta, AmbiverseError> {
        let response = self.meta_raw().await?;
        self.client.marshall(response)
    }

    pub async fn meta_raw(&self) -> Result<JsonMap, AmbiverseError> {
        self.client
            .call("/analyze/_meta", Method::Get, StatusCode::Ok, None)
            .await
    }
}

fn check_input(input: &AnalyzeInput) -> Result<(), AmbiverseError> {
    ensure!(
        input.text.as_deref().map_or(false, |text| !text.trim().is_empty()),
        UsageSnafu {
            reason: "analyze input has no text",
        }
    );
    if let Some(threshold) = input.confidence_threshold {
        ensure!(
            (0.0..=1.0).contains(&threshold),
            UsageSnafu {
                reason: format!("confidence threshold {} is not in [0.0, 1.0]", threshold),
            }
        );
    }
    Ok(())
}
