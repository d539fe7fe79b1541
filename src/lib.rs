// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Client for the AmbiverseNLU entity linking and KnowledgeGraph web APIs.
//!
//! [AmbiverseNlu] finds the entities mentioned in a text and links them to the knowledge graph.
//! [KnowledgeGraph] looks up entities and categories of the knowledge graph by identifier. Both
//! are configured with a [ClientConfig] naming the host which serves the APIs.
//!
//! All data structures sent to and returned by the API endpoints correspond directly to Rust data
//! structures via the serde serialization and deserialization interfaces. The [Schema] trait
//! converts between these records and generic JSON objects. Every endpoint method has a `_raw`
//! twin which returns the JSON object sent by the service without loading it into a record.
//!
//! Each method sends exactly one request and waits for the complete response. There are no
//! retries: any failure is returned as an [AmbiverseError], which [AmbiverseError::kind]
//! classifies as a configuration, usage, transport or data error.
//!
//! ```no_run
//! use ambiverse_client::{AmbiverseNlu, AnalyzeInput, ClientConfig};
//!
//! # async fn run() -> Result<(), ambiverse_client::AmbiverseError> {
//! let nlu = AmbiverseNlu::new(&ClientConfig::new("localhost").with_port(8080))?;
//! let output = nlu
//!     .analyze(&AnalyzeInput::new("Einstein was born in Ulm.").with_language("en"))
//!     .await?;
//! for person in output.get_by_type("PERSON") {
//!     println!("{}", person);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
pub mod error;
pub mod knowledge_graph;
pub mod nlu;
pub mod schema;
pub mod types;

pub use client::trace;
pub use config::*;
pub use error::{AmbiverseError, ErrorKind};
pub use knowledge_graph::KnowledgeGraph;
pub use nlu::AmbiverseNlu;
pub use schema::{JsonMap, Schema, SchemaError, WebUrl};
pub use types::*;
