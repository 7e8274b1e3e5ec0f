//! Views whose companions were generated by the build script.

use porbeagle::{Component, MessagePayload, PayloadError, Snowflake, ViewParts};
use porbeagle_fixture_welcome::models::Member;
use porbeagle_fixture_welcome::views::{Notice, Welcome};
use pretty_assertions::assert_eq;

fn ferris() -> Member {
    Member {
        name: "Ferris".to_string(),
        avatar_url: None,
    }
}

fn button_labels(components: &[Component]) -> Vec<Vec<Option<String>>> {
    components
        .iter()
        .map(|component| match component {
            Component::ActionRow(row) => row
                .components
                .iter()
                .map(|c| match c {
                    Component::Button(b) => b.label.clone(),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}

#[test]
fn test_payload_from_view_in_private_module() {
    let view = Welcome::create(ferris());
    let payload = MessagePayload::from_view(&view);

    assert!(payload.validate().is_ok());
    assert_eq!(payload.content.as_deref(), Some("Welcome, Ferris!"));
    assert_eq!(payload.sticker_ids, vec![Snowflake::new(5456508906066544)]);
    assert_eq!(payload.embeds.len(), 2);
    assert_eq!(payload.embeds[0].title.as_deref(), Some("Ferris"));
    assert_eq!(
        button_labels(&payload.components),
        vec![
            vec![Some("Accept".to_string()), Some("Decline".to_string())],
            vec![Some("Rules".to_string())],
        ]
    );
}

#[test]
fn test_unmarked_snowflake_is_not_a_sticker() {
    let view = Welcome::create(ferris());
    assert_eq!(view.stickers(), vec![Snowflake::new(5456508906066544)]);
    assert!(!view.stickers().contains(&view.raw_id));
}

#[test]
fn test_view_without_parts() {
    let notice = Notice {
        text: "Maintenance at noon".to_string(),
    };
    assert!(notice.stickers().is_empty());
    assert!(notice.embeds().is_empty());
    assert!(notice.components().is_empty());

    let payload = MessagePayload::from_view(&notice);
    assert!(payload.validate().is_ok());
    assert_eq!(payload.content.as_deref(), Some("Maintenance at noon"));

    let empty = MessagePayload::from_view(&Notice {
        text: String::new(),
    });
    assert_eq!(empty.validate(), Err(PayloadError::Empty));
}

#[test]
fn test_payload_json_shape() {
    let view = Welcome::create(ferris());
    let json: serde_json::Value =
        serde_json::from_str(&MessagePayload::from_view(&view).to_json().unwrap()).unwrap();

    assert_eq!(json["sticker_ids"], serde_json::json!(["5456508906066544"]));
    assert_eq!(json["components"][0]["type"], "action_row");
    assert_eq!(json["components"][1]["components"][0]["url"], "https://example.com/rules");
}
