// Stacker News payload decoding, against response bodies shaped like the
// live GraphQL API's.

use mirrorbot::client::stacker::{
    GraphQlResponse, HasNewNotesData, ItemsData, UpsertCommentData,
};
use mirrorbot::client::Item;

#[test]
fn items_page_accepts_string_and_numeric_ids() {
    let json = r#"{
        "data": {
            "items": {
                "cursor": "eyJvZmZzZXQiOjIxfQ==",
                "items": [
                    {"id": "410001", "title": "Jack on bitcoin", "url": "https://twitter.com/jack/status/1"},
                    {"id": 410002, "title": "Ask SN: favourite relay?", "url": null},
                    {"id": "410003", "title": "A note", "url": "https://primal.net/e/note1abc"}
                ]
            }
        }
    }"#;

    let resp: GraphQlResponse<ItemsData> = serde_json::from_str(json).unwrap();
    let page = resp.into_data("items").unwrap().items;

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].id, 410001);
    assert_eq!(page.items[1].id, 410002);
    assert_eq!(page.items[1].url, "", "null url becomes empty");
    assert_eq!(page.items[2].url, "https://primal.net/e/note1abc");
}

#[test]
fn item_without_url_or_title_fields() {
    let item: Item = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
    assert_eq!(
        item,
        Item {
            id: 7,
            title: String::new(),
            url: String::new(),
        }
    );
}

#[test]
fn non_numeric_id_is_rejected() {
    let result: Result<Item, _> = serde_json::from_str(r#"{"id": "abc", "url": null}"#);
    assert!(result.is_err());
}

#[test]
fn upsert_comment_returns_new_id() {
    let json = r#"{"data": {"upsertComment": {"id": "512345"}}}"#;
    let resp: GraphQlResponse<UpsertCommentData> = serde_json::from_str(json).unwrap();
    assert_eq!(resp.into_data("upsertComment").unwrap().upsert_comment.id, 512345);
}

#[test]
fn upsert_comment_error_surfaces_message() {
    let json = r#"{
        "data": {"upsertComment": null},
        "errors": [{"message": "insufficient funds", "path": ["upsertComment"]}]
    }"#;
    let resp: GraphQlResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
    let err = resp.into_data("upsertComment").unwrap_err();
    assert!(err.to_string().contains("insufficient funds"));
    assert!(err.to_string().contains("upsertComment"));
}

#[test]
fn has_new_notes_flag() {
    let yes: GraphQlResponse<HasNewNotesData> =
        serde_json::from_str(r#"{"data": {"hasNewNotes": true}}"#).unwrap();
    let no: GraphQlResponse<HasNewNotesData> =
        serde_json::from_str(r#"{"data": {"hasNewNotes": false}}"#).unwrap();
    assert!(yes.into_data("hasNewNotes").unwrap().has_new_notes);
    assert!(!no.into_data("hasNewNotes").unwrap().has_new_notes);
}
