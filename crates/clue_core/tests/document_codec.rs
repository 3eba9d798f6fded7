use clue_core::{
    export_content_json, AddTileOptions, Document, DocumentError, DocumentType, TileError,
    TileFields, TileKind, TileRegistry, TileValidationError,
};
use serde_json::{json, Value};

fn saved_document() -> Value {
    json!({
        "uid": "u1",
        "type": "problem",
        "key": "doc-1",
        "createdAt": 1700000000000_i64,
        "title": "Investigation 1",
        "properties": { "section": "whatIf" },
        "changeCount": 7,
        "content": {
            "tiles": [
                {
                    "id": "t-text",
                    "content": { "type": "Text", "text": "<p>Hi</p>", "format": "html" }
                },
                {
                    "id": "t-image",
                    "title": "Leaf",
                    "display": "teacher",
                    "content": {
                        "type": "Image",
                        "key": "img1",
                        "imageData": "base64...",
                        "createdAt": 1000,
                        "createdBy": "u1"
                    }
                },
                {
                    "content": { "type": "Numberline", "points": [{ "id": "p1", "xValue": 2 }] }
                }
            ]
        }
    })
}

#[test]
fn decodes_saved_document_through_registry() {
    let registry = TileRegistry::with_builtin_tiles();
    let document = Document::from_value(saved_document(), &registry).unwrap();

    assert_eq!(document.kind(), DocumentType::Problem);
    assert_eq!(document.key(), "doc-1");
    assert_eq!(document.title(), Some("Investigation 1"));
    assert_eq!(document.property("section"), Some("whatIf"));
    assert_eq!(document.change_count(), 7);

    let kinds: Vec<TileKind> = document.content().tiles().map(|tile| tile.kind()).collect();
    assert_eq!(kinds, [TileKind::Text, TileKind::Image, TileKind::Numberline]);

    let image = document.content().get_tile("t-image").unwrap();
    assert_eq!(image.title(), "Leaf");
    assert_eq!(image.display(), Some(clue_core::DisplayUserType::Teacher));

    let generated = &document.content().tile_ids()[2];
    assert!(!generated.is_empty());
}

#[test]
fn encoding_then_decoding_preserves_tiles() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::new("u1", DocumentType::Personal, "doc-2").created_at_ms(42);
    for kind in TileKind::VALUES {
        if kind == TileKind::Image {
            continue;
        }
        document
            .add_tile(&registry, kind.as_str(), &TileFields::new(), AddTileOptions::default())
            .unwrap();
    }

    let text = document.to_json_pretty().unwrap();
    let decoded = Document::from_json(&text, &registry).unwrap();

    assert_eq!(decoded.content(), document.content());
    assert_eq!(decoded.created_at(), 42);
    assert_eq!(decoded.change_count(), document.change_count());
}

#[test]
fn unknown_tile_kind_names_the_tile() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut value = saved_document();
    value["content"]["tiles"][0]["content"]["type"] = json!("Drawing");

    let err = Document::from_value(value, &registry).unwrap_err();
    match err {
        DocumentError::Tile {
            tile_id: Some(tile_id),
            source: TileError::UnknownKind(kind),
        } => {
            assert_eq!(tile_id, "t-text");
            assert_eq!(kind, "Drawing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_tile_fields_are_rejected() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut value = saved_document();
    value["content"]["tiles"][1]["content"]
        .as_object_mut()
        .unwrap()
        .remove("imageData");

    let err = Document::from_value(value, &registry).unwrap_err();
    assert!(matches!(
        err,
        DocumentError::Tile {
            source: TileError::Validation(TileValidationError::MissingField {
                field: "imageData",
                ..
            }),
            ..
        }
    ));
}

#[test]
fn structural_problems_are_reported() {
    let registry = TileRegistry::with_builtin_tiles();

    let mut missing_type = saved_document();
    missing_type["content"]["tiles"][0]["content"]
        .as_object_mut()
        .unwrap()
        .remove("type");
    assert!(matches!(
        Document::from_value(missing_type, &registry),
        Err(DocumentError::InvalidDocument(_))
    ));

    let mut duplicate = saved_document();
    duplicate["content"]["tiles"][1]["id"] = json!("t-text");
    assert!(matches!(
        Document::from_value(duplicate, &registry),
        Err(DocumentError::DuplicateTileId(id)) if id == "t-text"
    ));

    let mut blank_key = saved_document();
    blank_key["key"] = json!("  ");
    assert!(matches!(
        Document::from_value(blank_key, &registry),
        Err(DocumentError::InvalidDocument(_))
    ));

    assert!(matches!(
        Document::from_json("{ not json", &registry),
        Err(DocumentError::Json(_))
    ));
}

#[test]
fn exported_content_holds_only_tiles() {
    let registry = TileRegistry::with_builtin_tiles();
    let document = Document::from_value(saved_document(), &registry).unwrap();

    let exported: Value =
        serde_json::from_str(&export_content_json(document.content()).unwrap()).unwrap();
    let object = exported.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(exported["tiles"].as_array().map(Vec::len), Some(3));
    assert_eq!(exported["tiles"][1]["content"]["type"], "Image");
    assert_eq!(exported["tiles"][1]["title"], "Leaf");
}

#[test]
fn export_strips_dataflow_samples_but_saved_json_keeps_them() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::from_value(saved_document(), &registry).unwrap();
    let program = json!({
        "values": {
            "n1": { "name": "sensor", "recentValues": [1, 2, 3] },
            "n2": { "name": "light" }
        }
    });
    let dataflow_id = document
        .add_tile(
            &registry,
            "Dataflow",
            json!({ "program": program }).as_object().unwrap(),
            AddTileOptions::default(),
        )
        .unwrap();

    let exported: Value =
        serde_json::from_str(&export_content_json(document.content()).unwrap()).unwrap();
    let tile = &exported["tiles"][3];
    assert_eq!(tile["id"], dataflow_id.as_str());
    assert_eq!(tile["content"]["type"], "Dataflow");
    assert!(tile["content"]["program"]["values"]["n1"].get("recentValues").is_none());
    assert_eq!(tile["content"]["program"]["values"]["n1"]["name"], "sensor");
    assert_eq!(exported["tiles"][1]["content"]["type"], "Image");

    let saved: Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
    assert_eq!(
        saved["content"]["tiles"][3]["content"]["program"]["values"]["n1"]["recentValues"],
        json!([1, 2, 3])
    );
}

#[test]
fn decode_errors_expose_content_free_codes() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut unknown = saved_document();
    unknown["content"]["tiles"][0]["content"]["type"] = json!("secret <b>kind</b>");
    let err = Document::from_value(unknown, &registry).unwrap_err();
    assert_eq!(err.code(), "unknown_kind");
    assert!(!err.code().contains("secret"));

    let mut invalid = saved_document();
    invalid["content"]["tiles"][1]["content"]["createdBy"] = json!(7);
    let err = Document::from_value(invalid, &registry).unwrap_err();
    assert_eq!(err.code(), "tile_validation");

    let err = Document::from_json("{ not json", &registry).unwrap_err();
    assert_eq!(err.code(), "json");
}
