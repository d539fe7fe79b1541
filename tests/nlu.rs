// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

mod common;

use ambiverse_client::{AmbiverseNlu, AnalyzeInput, AnnotatedMention, ErrorKind};
use common::{content_type, respond, serve, unreachable};
use serde_json::{json, Value};
use tide::{Request, StatusCode};

// Links "Einstein" and "Ulm" in any text, and echoes the request body under "input".
fn nlu() -> AmbiverseNlu {
    let mut app = tide::new();
    app.at("/entitylinking/analyze")
        .post(|mut req: Request<()>| async move {
            if content_type(&req).as_deref() != Some("application/json") {
                return respond(StatusCode::UnsupportedMediaType, json!({}));
            }
            let input: Value = req.body_json().await?;
            respond(
                StatusCode::Ok,
                json!({
                    "docId": input["docId"],
                    "language": input.get("language").cloned().unwrap_or_else(|| json!("en")),
                    "matches": [
                        {
                            "charLength": 8,
                            "charOffset": 0,
                            "text": "Einstein",
                            "entity": { "id": "http://www.wikidata.org/entity/Q937", "confidence": 0.86 }
                        },
                        {
                            "charLength": 3,
                            "charOffset": 21,
                            "text": "Ulm",
                            "entity": { "id": "http://www.wikidata.org/entity/Q3012", "confidence": 0.71 }
                        }
                    ],
                    "entities": [
                        {
                            "id": "http://www.wikidata.org/entity/Q937",
                            "url": "http://en.wikipedia.org/wiki/Albert_Einstein",
                            "salience": 0.64,
                            "name": "Albert Einstein",
                            "type": "PERSON"
                        },
                        {
                            "id": "http://www.wikidata.org/entity/Q3012",
                            "url": "http://en.wikipedia.org/wiki/Ulm",
                            "salience": 0.21,
                            "name": "Ulm",
                            "type": "LOCATION"
                        }
                    ],
                    "input": input
                }),
            )
        });
    app.at("/entitylinking/analyze/_meta").get(|_| async {
        respond(
            StatusCode::Ok,
            json!({
                "dumpVersion": "20180120",
                "languages": ["en", "de", "es", "zh"],
                "creationDate": "2018-03-14T08:15:00+01:00",
                "collectionSize": 2_956_112
            }),
        )
    });
    AmbiverseNlu::new(&serve(app)).unwrap()
}

#[async_std::test]
async fn analyze_links_entities() {
    let nlu = nlu();
    let output = nlu
        .analyze(&AnalyzeInput::new("Einstein was born in Ulm.").with_doc_id("doc-1"))
        .await
        .unwrap();
    assert_eq!(output.doc_id.as_deref(), Some("doc-1"));
    assert_eq!(output.language.as_deref(), Some("en"));
    assert_eq!(output.matches.len(), 2);
    assert_eq!(output.matches[1].text.as_deref(), Some("Ulm"));
    assert_eq!(output.matches[1].char_offset, Some(21));
    assert_eq!(
        output.matches[0].entity.as_ref().and_then(|e| e.confidence),
        Some(0.86)
    );

    let people = output.get_by_type("PERSON");
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name.as_deref(), Some("Albert Einstein"));
    assert_eq!(output.get_by_type("LOCATION")[0].salience, Some(0.21));
    assert!(output.get_by_type("ORGANIZATION").is_empty());
}

#[async_std::test]
async fn analyze_sends_the_dumped_input() {
    let nlu = nlu();
    let input = AnalyzeInput::new("Einstein was born in Ulm.")
        .with_doc_id("doc-2")
        .with_language("de")
        .with_confidence_threshold(0.25)
        .with_coherent_document(true)
        .with_annotated_mention(AnnotatedMention::new(0, 8));
    let raw = nlu.analyze_raw(&input).await.unwrap();
    assert_eq!(
        raw["input"],
        json!({
            "docId": "doc-2",
            "language": "de",
            "text": "Einstein was born in Ulm.",
            "confidenceThreshold": 0.25,
            "coherentDocument": true,
            "annotatedMentions": [{ "charLength": 8, "charOffset": 0 }]
        })
    );
    assert_eq!(raw["language"], json!("de"));
}

#[async_std::test]
async fn raw_analyze_skips_validation() {
    let mut app = tide::new();
    app.at("/entitylinking/analyze").post(|_| async {
        respond(
            StatusCode::Ok,
            json!({ "docId": 17, "entities": [{ "id": "Q937", "url": "not a url" }] }),
        )
    });
    let nlu = AmbiverseNlu::new(&serve(app)).unwrap();
    let input = AnalyzeInput::new("Einstein");

    let err = nlu.analyze(&input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);

    let raw = nlu.analyze_raw(&input).await.unwrap();
    assert_eq!(
        Value::Object(raw),
        json!({ "docId": 17, "entities": [{ "id": "Q937", "url": "not a url" }] })
    );
}

#[async_std::test]
async fn invalid_input_fails_before_any_request() {
    let nlu = AmbiverseNlu::new(&unreachable()).unwrap();
    let inputs = vec![
        AnalyzeInput::default(),
        AnalyzeInput::new("  "),
        AnalyzeInput::new("Ulm").with_confidence_threshold(1.5),
    ];
    for input in &inputs {
        assert_eq!(
            nlu.analyze(input).await.unwrap_err().kind(),
            ErrorKind::Usage
        );
        assert_eq!(
            nlu.analyze_raw(input).await.unwrap_err().kind(),
            ErrorKind::Usage
        );
    }
    assert_eq!(
        nlu.analyze(&AnalyzeInput::new("Ulm"))
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::Transport
    );
}

#[async_std::test]
async fn meta_describes_the_dataset() {
    let nlu = nlu();
    let meta = nlu.meta().await.unwrap();
    assert_eq!(meta.dump_version.as_deref(), Some("20180120"));
    assert_eq!(meta.languages.len(), 4);
    assert_eq!(meta.collection_size, Some(2_956_112));
    assert_eq!(
        meta.creation_date.map(|date| date.to_rfc3339()),
        Some("2018-03-14T07:15:00+00:00".to_string())
    );
    assert_eq!(nlu.meta_raw().await.unwrap()["languages"][3], json!("zh"));
}

#[async_std::test]
async fn missing_meta_is_a_transport_error() {
    let nlu = AmbiverseNlu::new(&serve(tide::new())).unwrap();
    let err = nlu.meta().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), Some(404));
}
