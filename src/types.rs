// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::schema::{fmt_as_json, iso8601, JsonMap, WebUrl};
use chrono::{DateTime, Utc};
use fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Error envelope returned by the service with non-success statuses.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Informational reply of the service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub additional_properties: JsonMap,
}

/// Description of the dataset backing an endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump_version: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(with = "iso8601", default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_size: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
}

/// A name of an entity in one language.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<WebUrl>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<WebUrl>,
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

/// A node of the knowledge graph.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The most salient type of the entity, e.g. `PERSON` or `ORGANIZATION`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Names of the entity, keyed by language.
    #[serde(default)]
    pub names: BTreeMap<String, Label>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub detailed_descriptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default)]
    pub links: Vec<WebUrl>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Entity {
    /// The name of the entity in `language`, if the knowledge graph has one.
    pub fn name(&self, language: &str) -> Option<&str> {
        self.names.get(language)?.value.as_deref()
    }
}

/// Response body of the knowledge graph endpoint POST /entities.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitiesResponse {
    #[serde(default)]
    pub entities: BTreeMap<String, Entity>,
}

/// Response body of the knowledge graph endpoint POST /categories.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
}

/// The entity a [Match] was linked to.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// The linked entity, if the service expanded it.
    #[serde(rename = "matches", default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

/// An occurrence of an entity mention in the analyzed text.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// The character length of the match in the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_length: Option<i64>,
    /// The character offset of the match in the text, starting at 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_offset: Option<i64>,
    /// The matched substring of the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<MatchEntity>,
}

/// A mention supplied by the caller instead of being detected by the service.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedMention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_offset: Option<i64>,
}

impl AnnotatedMention {
    pub fn new(char_offset: i64, char_length: i64) -> Self {
        Self {
            char_length: Some(char_length),
            char_offset: Some(char_offset),
        }
    }
}

/// Request body for the entity linking endpoint POST /analyze.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeInput {
    /// Returned unchanged in the output, to identify the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    /// Language of the text. Detected by the service if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Entities with a confidence below this threshold are dropped. Must be in [0.0, 1.0].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    /// Whether the entities of the document are related to each other. The service assumes so
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coherent_document: Option<bool>,
    #[serde(default)]
    pub annotated_mentions: Vec<AnnotatedMention>,
}

impl AnalyzeInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    pub fn with_coherent_document(mut self, coherent: bool) -> Self {
        self.coherent_document = Some(coherent);
        self
    }

    pub fn with_annotated_mention(mut self, mention: AnnotatedMention) -> Self {
        self.annotated_mentions.push(mention);
        self
    }
}

/// An entity found in the analyzed text.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<WebUrl>,
    /// How central the entity is to the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Response body of the entity linking endpoint POST /analyze.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    /// Language of the text, as given in the input or detected by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub entities: Vec<OutputEntity>,
}

impl AnalyzeOutput {
    /// The entities of type `kind`, in the order the service returned them.
    pub fn get_by_type(&self, kind: &str) -> Vec<&OutputEntity> {
        self.entities
            .iter()
            .filter(|entity| entity.kind.as_deref() == Some(kind))
            .collect()
    }
}

macro_rules! display_as_json {
    ($($record:ty),* $(,)?) => {
        $(
            impl Display for $record {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    fmt_as_json(self, f)
                }
            }
        )*
    };
}

display_as_json!(
    ErrorMessage,
    MessageResponse,
    Meta,
    Category,
    Label,
    Author,
    Image,
    Entity,
    EntitiesResponse,
    CategoriesResponse,
    MatchEntity,
    Match,
    AnnotatedMention,
    AnalyzeInput,
    OutputEntity,
    AnalyzeOutput,
);
