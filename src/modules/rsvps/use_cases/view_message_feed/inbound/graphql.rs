use async_graphql::{Context, Object, Result as GqlResult, SimpleObject};

use crate::modules::rsvps::core::feed::FeedEntry;
use crate::shell::state::{AppState, PageFeedViewer};

#[derive(SimpleObject, Clone)]
pub struct GqlFeedEntry {
    pub sender: String,
    pub message: String,
    pub timestamp: String,
}

impl From<FeedEntry> for GqlFeedEntry {
    fn from(v: FeedEntry) -> Self {
        Self {
            sender: v.sender,
            message: v.message,
            timestamp: v.timestamp,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlMessageFeed {
    pub visible: bool,
    pub label: String,
    pub state: String,
    pub placeholder: Option<String>,
    pub entries: Vec<GqlFeedEntry>,
    /// List items as HTML; empty while hidden.
    pub html: String,
}

impl From<&PageFeedViewer> for GqlMessageFeed {
    fn from(viewer: &PageFeedViewer) -> Self {
        let list = viewer.rendered();
        Self {
            visible: viewer.is_visible(),
            label: viewer.toggle_label().to_string(),
            state: list.state().to_string(),
            placeholder: list.placeholder().map(str::to_string),
            entries: list.entries().iter().cloned().map(Into::into).collect(),
            html: viewer
                .displayed()
                .map(|list| list.to_html())
                .unwrap_or_default(),
        }
    }
}

pub struct MessageFeedQuery;

#[Object]
impl MessageFeedQuery {
    async fn messages(&self, context: &Context<'_>) -> GqlResult<GqlMessageFeed> {
        let state = context.data_unchecked::<AppState>();
        let viewer = state.feed.lock().await;
        Ok(GqlMessageFeed::from(&*viewer))
    }
}

pub struct MessageFeedMutation;

#[Object]
impl MessageFeedMutation {
    async fn toggle_messages(&self, context: &Context<'_>) -> GqlResult<GqlMessageFeed> {
        let state = context.data_unchecked::<AppState>();
        let mut viewer = state.feed.lock().await;
        viewer.toggle().await;
        Ok(GqlMessageFeed::from(&*viewer))
    }
}
