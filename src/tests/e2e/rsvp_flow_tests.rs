use crate::config::Settings;
use crate::modules::rsvps::core::feed::FeedList;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use crate::shell;
use crate::shell::graphql::schema;
use crate::shell::state::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value as Json, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const PATH: &str = "rsvps";

async fn settle(state: &AppState, predicate: impl FnMut(&FeedList) -> bool) -> FeedList {
    let mut receiver = state.feed.lock().await.watch();
    let list = tokio::time::timeout(Duration::from_secs(2), receiver.wait_for(predicate))
        .await
        .expect("timed out waiting for the feed")
        .expect("feed channel closed")
        .clone();
    list
}

#[tokio::test]
async fn submitted_messages_appear_in_the_open_feed() {
    let store = Arc::new(InMemoryRecordStore::new());
    let state = AppState::new(store.clone(), PATH);
    let app = shell::http::router(state.clone());

    let response = app
        .clone()
        .oneshot(Request::post("/messages/toggle").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    settle(&state, |list| *list == FeedList::NoSubmissions).await;

    for body in [
        r#"{"email":"first@b.com","attendance":"yes","message":"  costume ready  "}"#,
        r#"{"email":"second@b.com","attendance":"no","message":"ignored"}"#,
        r#"{"email":"bad-email","attendance":"yes","message":"never stored"}"#,
    ] {
        app.clone()
            .oneshot(
                Request::post("/rsvp")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
    }

    let list = settle(&state, |list| matches!(list, FeedList::Entries(_))).await;
    assert_eq!(store.snapshot(PATH).await.len(), 2);
    assert_eq!(list.entries().len(), 1);
    assert_eq!(list.entries()[0].sender, "From: first@b.com");
    assert_eq!(list.entries()[0].message, "costume ready");
    assert_eq!(store.subscriptions_opened(), 1);
}

#[tokio::test]
async fn graphql_drives_the_form_and_the_feed() {
    let store = Arc::new(InMemoryRecordStore::new());
    let state = AppState::new(store.clone(), PATH);
    let schema = schema(state.clone());

    let response = schema
        .execute(r#"mutation { selectAttendance(attendance: NO, message: "typed") { messageFieldVisible attendance message } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "selectAttendance": { "messageFieldVisible": false, "attendance": "NO", "message": "" } })
    );

    let response = schema
        .execute(r#"mutation { submitRsvp(email: "a@b.com", attendance: YES, message: "hi") { recordKey form { notice { kind } theme email } } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data: Json = response.data.into_json().unwrap();
    let key = data["submitRsvp"]["recordKey"].as_str().unwrap().to_string();
    assert!(store.snapshot(PATH).await.get(&key).is_some());
    assert_eq!(data["submitRsvp"]["form"]["notice"]["kind"], "success");
    assert_eq!(data["submitRsvp"]["form"]["theme"], "celebration");
    assert_eq!(data["submitRsvp"]["form"]["email"], "");

    let response = schema.execute(r#"mutation { toggleMessages { visible label } }"#).await;
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "toggleMessages": { "visible": true, "label": "Hide Messages" } })
    );
    settle(&state, |list| matches!(list, FeedList::Entries(_))).await;

    let response = schema
        .execute(r#"{ messages { state entries { sender message } } }"#)
        .await;
    let data: Json = response.data.into_json().unwrap();
    assert_eq!(data["messages"]["state"], "entries");
    assert_eq!(
        data["messages"]["entries"],
        json!([{ "sender": "From: a@b.com", "message": "hi" }])
    );
}

#[tokio::test]
async fn graphql_returns_a_rejected_submission_without_sharing_it() {
    let store = Arc::new(InMemoryRecordStore::new());
    let schema = schema(AppState::new(store.clone(), PATH));

    let response = schema
        .execute(r#"mutation { submitRsvp(email: "bad-email", attendance: YES) { recordKey form { flaggedFields email } } }"#)
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "submitRsvp": { "recordKey": null, "form": { "flaggedFields": ["email"], "email": "bad-email" } } })
    );
    assert_eq!(store.append_attempts(), 0);

    let response = schema.execute(r#"{ form { flaggedFields email } }"#).await;
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "form": { "flaggedFields": [], "email": "" } })
    );
}

#[tokio::test]
async fn the_composed_app_serves_both_surfaces() {
    let settings = Settings::from_lookup(|_| None).unwrap();
    let app = shell::app(&settings);

    let response = app
        .clone()
        .oneshot(Request::get("/rsvp/form").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/gql").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("graphiql"));
}
