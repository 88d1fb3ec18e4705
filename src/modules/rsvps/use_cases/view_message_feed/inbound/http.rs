use axum::{Json, extract::State, response::Html, response::IntoResponse};
use serde::Serialize;

use crate::modules::rsvps::core::feed::FeedList;
use crate::shell::state::{AppState, PageFeedViewer};

#[derive(Serialize)]
pub struct MessageFeedResponse {
    pub visible: bool,
    pub label: &'static str,
    pub list: FeedList,
}

impl From<&PageFeedViewer> for MessageFeedResponse {
    fn from(viewer: &PageFeedViewer) -> Self {
        Self {
            visible: viewer.is_visible(),
            label: viewer.toggle_label(),
            list: viewer.rendered(),
        }
    }
}

pub async fn handle_toggle(State(state): State<AppState>) -> impl IntoResponse {
    let mut viewer = state.feed.lock().await;
    viewer.toggle().await;
    Json(MessageFeedResponse::from(&*viewer))
}

pub async fn handle_list(State(state): State<AppState>) -> impl IntoResponse {
    let viewer = state.feed.lock().await;
    Json(MessageFeedResponse::from(&*viewer))
}

/// The `<li>` items for the message list; empty while the list is hidden.
pub async fn handle_list_html(State(state): State<AppState>) -> impl IntoResponse {
    let viewer = state.feed.lock().await;
    Html(
        viewer
            .displayed()
            .map(|list| list.to_html())
            .unwrap_or_default(),
    )
}
