use clue_core::model::image::ImageTile;
use clue_core::model::text::TextTile;
use clue_core::{
    AddTileOptions, Document, DocumentError, DocumentEvent, DocumentType, TileError, TileFields,
    TileKind, TileRegistry, TileValidationError, Visibility,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn fields(value: Value) -> TileFields {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn image_fields() -> TileFields {
    fields(json!({
        "key": "img1",
        "imageData": "base64...",
        "createdAt": 1000,
        "createdBy": "u1"
    }))
}

fn recording(document: &mut Document) -> Rc<RefCell<Vec<DocumentEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    document.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn add_tile_builds_through_registry_and_notifies() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::new("u1", DocumentType::Personal, "doc-1");
    let events = recording(&mut document);

    let text_id = document
        .add_tile(
            &registry,
            "Text",
            &fields(json!({ "text": "notes" })),
            AddTileOptions::default(),
        )
        .unwrap();
    let image_id = document
        .add_tile(
            &registry,
            "Image",
            &image_fields(),
            AddTileOptions {
                index: Some(0),
                ..AddTileOptions::default()
            },
        )
        .unwrap();

    assert_eq!(document.content().tile_ids(), [image_id.clone(), text_id.clone()]);
    assert_eq!(document.change_count(), 2);
    assert_eq!(
        *events.borrow(),
        vec![
            DocumentEvent::TileAdded {
                tile_id: text_id,
                kind: TileKind::Text,
                index: 0,
            },
            DocumentEvent::TileAdded {
                tile_id: image_id,
                kind: TileKind::Image,
                index: 0,
            },
        ]
    );
}

#[test]
fn failed_mutations_change_nothing_and_emit_nothing() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::new("u1", DocumentType::Personal, "doc-1");
    let events = recording(&mut document);

    let mut incomplete = image_fields();
    incomplete.remove("imageData");
    let err = document
        .add_tile(&registry, "Image", &incomplete, AddTileOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::Tile {
            tile_id: None,
            source: TileError::Validation(TileValidationError::MissingField {
                field: "imageData",
                ..
            }),
        }
    ));

    assert!(matches!(
        document.remove_tile("missing"),
        Err(DocumentError::TileNotFound(_))
    ));
    assert!(matches!(
        document.add_tile(
            &registry,
            "Text",
            &TileFields::new(),
            AddTileOptions {
                index: Some(3),
                ..AddTileOptions::default()
            },
        ),
        Err(DocumentError::IndexOutOfRange { index: 3, len: 0 })
    ));

    assert!(document.content().is_empty());
    assert_eq!(document.change_count(), 0);
    assert!(events.borrow().is_empty());
}

#[test]
fn replacing_content_keeps_kind() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::new("u1", DocumentType::Problem, "doc-1");
    let image_id = document
        .add_tile(&registry, "Image", &image_fields(), AddTileOptions::default())
        .unwrap();

    let err = document
        .replace_tile_content(&image_id, TextTile::plain("nope").into())
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::KindChange {
            from: TileKind::Image,
            to: TileKind::Text,
            ..
        }
    ));

    let image = document
        .content()
        .get_tile(&image_id)
        .and_then(|tile| tile.content().as_image())
        .unwrap()
        .with_title(Some("Leaf".to_string()));
    document
        .replace_tile_content(&image_id, image.into())
        .unwrap();

    let tile = document.content().get_tile(&image_id).unwrap();
    assert_eq!(tile.title(), "Leaf");
    assert_eq!(tile.explicit_title(), None);
}

#[test]
fn tile_titles_moves_and_copies_emit_events() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::new("u1", DocumentType::Planning, "doc-1");
    let first = document
        .add_tile(&registry, "Numberline", &TileFields::new(), AddTileOptions::default())
        .unwrap();
    let second = document
        .add_tile(&registry, "Table", &TileFields::new(), AddTileOptions::default())
        .unwrap();
    let events = recording(&mut document);

    document
        .set_tile_title(&first, Some("Number line 1".to_string()))
        .unwrap();
    document.move_tile(&second, 0).unwrap();
    document.move_tile(&second, 0).unwrap();
    let copy = document.copy_tile(&first).unwrap();

    assert_ne!(copy, first);
    assert_eq!(document.content().tile_ids(), [second.clone(), first.clone(), copy.clone()]);
    assert_eq!(
        document.content().get_tile(&copy).unwrap().title(),
        "Number line 1"
    );
    assert_eq!(
        *events.borrow(),
        vec![
            DocumentEvent::TileTitleChanged {
                tile_id: first.clone(),
                title: Some("Number line 1".to_string()),
            },
            DocumentEvent::TileMoved {
                tile_id: second,
                from: 1,
                to: 0,
            },
            DocumentEvent::TileAdded {
                tile_id: copy,
                kind: TileKind::Numberline,
                index: 2,
            },
        ]
    );
    assert_eq!(document.change_count(), 5);
}

#[test]
fn unsubscribed_observers_stop_receiving_events() {
    let mut document = Document::new("u1", DocumentType::LearningLog, "doc-1");
    let events = Rc::new(RefCell::new(0_u32));
    let sink = Rc::clone(&events);
    let id = document.subscribe(move |_| *sink.borrow_mut() += 1);

    document.set_title(Some("Log".to_string()));
    assert!(document.unsubscribe(id));
    assert!(!document.unsubscribe(id));
    document.set_property("color", "blue");

    assert_eq!(*events.borrow(), 1);
    assert_eq!(document.observer_count(), 0);
    assert_eq!(document.property("color"), Some("blue"));
    assert_eq!(document.change_count(), 2);
}

#[test]
fn image_record_can_be_inserted_directly() {
    let mut document = Document::new("u1", DocumentType::Personal, "doc-1");
    let image = ImageTile::new("img2", "base64...", 5, "u1")
        .unwrap()
        .with_original_source("leaf.png");
    let tile = clue_core::TileModel::new(image.into()).titled(Some("Leaf".to_string()));
    let tile_id = tile.id().to_string();

    document.insert_tile(tile, None).unwrap();
    let stored = document.content().get_tile(&tile_id).unwrap();
    assert_eq!(stored.kind(), TileKind::Image);
    assert_eq!(stored.title(), "Leaf");
    assert_eq!(document.content().tiles_of_kind(TileKind::Image).len(), 1);
    assert!(document.content().tiles_of_kind(TileKind::Text).is_empty());
}

#[test]
fn visibility_and_group_changes_notify_observers() {
    let mut document = Document::new("u1", DocumentType::Personal, "doc-1");
    let events = recording(&mut document);

    document.set_visibility(Some(Visibility::Public));
    document.set_group_id(Some("g1".to_string()));
    document.set_group_id(None);

    assert_eq!(document.visibility(), Some(Visibility::Public));
    assert_eq!(document.group_id(), None);
    assert_eq!(document.change_count(), 3);
    assert_eq!(
        *events.borrow(),
        vec![
            DocumentEvent::VisibilityChanged {
                visibility: Some(Visibility::Public)
            },
            DocumentEvent::GroupChanged {
                group_id: Some("g1".to_string())
            },
            DocumentEvent::GroupChanged { group_id: None },
        ]
    );
}

#[test]
fn copied_dataflow_tile_drops_recent_values() {
    let registry = TileRegistry::with_builtin_tiles();
    let mut document = Document::new("u1", DocumentType::Problem, "doc-1");
    let original = document
        .add_tile(
            &registry,
            "Dataflow",
            &fields(json!({
                "program": {
                    "values": { "n1": { "name": "sensor", "recentValues": [0.5, 0.7] } }
                }
            })),
            AddTileOptions::default(),
        )
        .unwrap();

    let copy = document.copy_tile(&original).unwrap();

    let program_of = |tile_id: &str| {
        document
            .content()
            .get_tile(tile_id)
            .and_then(|tile| tile.content().as_dataflow())
            .map(|dataflow| dataflow.program.clone())
            .unwrap()
    };
    assert!(program_of(&original)["values"]["n1"].get("recentValues").is_some());
    assert!(program_of(&copy)["values"]["n1"].get("recentValues").is_none());
    assert_eq!(program_of(&copy)["values"]["n1"]["name"], "sensor");
}
