// Toggleable, live attendee message feed.
//
// Purpose
// - Show or hide the message list on demand and keep it current while open.
//
// Responsibilities
// - Subscribe to the record set the first time the list is shown, never again.
// - Re-render the whole list on every update, hidden or not.
// - Replace the list with an error placeholder when the subscription reports a failure.

use crate::modules::rsvps::core::feed::{FeedList, render_feed};
use crate::shared::infrastructure::record_store::{RecordStore, SnapshotUpdate};
use std::sync::Arc;
use tokio::sync::watch;

pub const SHOW_LABEL: &str = "Show Messages";
pub const HIDE_LABEL: &str = "Hide Messages";

pub fn apply_update(update: SnapshotUpdate) -> FeedList {
    match update {
        Ok(snapshot) => render_feed(&snapshot),
        Err(error) => {
            tracing::error!(%error, "error loading messages");
            FeedList::Failed
        }
    }
}

pub struct MessageFeedViewer<TStore>
where
    TStore: RecordStore + ?Sized,
{
    path: String,
    store: Arc<TStore>,
    visible: bool,
    subscribed: bool,
    rendered: Arc<watch::Sender<FeedList>>,
}

impl<TStore> MessageFeedViewer<TStore>
where
    TStore: RecordStore + ?Sized,
{
    pub fn new(path: impl Into<String>, store: Arc<TStore>) -> Self {
        let (rendered, _) = watch::channel(FeedList::Blank);
        Self {
            path: path.into(),
            store,
            visible: false,
            subscribed: false,
            rendered: Arc::new(rendered),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.visible { HIDE_LABEL } else { SHOW_LABEL }
    }

    /// The list as last rendered, whether or not it is on screen.
    pub fn rendered(&self) -> FeedList {
        self.rendered.borrow().clone()
    }

    /// The list the user sees; `None` while hidden.
    pub fn displayed(&self) -> Option<FeedList> {
        self.visible.then(|| self.rendered())
    }

    pub fn watch(&self) -> watch::Receiver<FeedList> {
        self.rendered.subscribe()
    }

    /// Flip visibility. Returns the new visibility.
    pub async fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        if self.visible && !self.subscribed {
            self.rendered.send_replace(FeedList::Loading);
            let mut subscription = self.store.subscribe(&self.path).await;
            self.subscribed = true;
            tracing::info!(path = %self.path, "subscribed to message feed");

            let rendered = self.rendered.clone();
            tokio::spawn(async move {
                while let Some(update) = subscription.next().await {
                    let next = apply_update(update);
                    rendered.send_if_modified(|current| {
                        if *current == next {
                            return false;
                        }
                        *current = next;
                        true
                    });
                }
                tracing::debug!("message feed subscription ended");
            });
        }
        self.visible
    }
}

#[cfg(test)]
mod message_feed_viewer_tests {
    use super::*;
    use crate::modules::rsvps::core::attendance::Attendance;
    use crate::modules::rsvps::core::feed::LOAD_FAILED_TEXT;
    use crate::modules::rsvps::core::record::{RecordKey, RsvpRecord, ServerTimestamp};
    use crate::modules::rsvps::core::snapshot::Snapshot;
    use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
    use crate::shared::infrastructure::record_store::{StoreError, Subscription};
    use crate::tests::fixtures::records::{snapshot_of, stored_rsvp};
    use async_trait::async_trait;
    use rstest::{fixture, rstest};
    use std::time::Duration;
    use tokio::sync::{Mutex, mpsc};
    use tokio::time::timeout;

    const PATH: &str = "rsvps";

    type Viewer = MessageFeedViewer<InMemoryRecordStore>;

    /// Accepts subscriptions but never delivers anything.
    #[derive(Default)]
    struct SilentStore {
        held: Mutex<Vec<mpsc::UnboundedSender<SnapshotUpdate>>>,
    }

    #[async_trait]
    impl RecordStore for SilentStore {
        async fn append(&self, _path: &str, _record: RsvpRecord) -> Result<RecordKey, StoreError> {
            Err(StoreError::Offline)
        }

        async fn subscribe(&self, _path: &str) -> Subscription {
            let (sender, subscription) = Subscription::channel();
            self.held.lock().await.push(sender);
            subscription
        }
    }

    fn record(attendance: Attendance, message: &str) -> RsvpRecord {
        RsvpRecord {
            email: "a@b.com".to_string(),
            attendance,
            message: message.to_string(),
            timestamp: ServerTimestamp,
        }
    }

    async fn wait_until(viewer: &Viewer, predicate: impl FnMut(&FeedList) -> bool) -> FeedList {
        let mut receiver = viewer.watch();
        let list = timeout(Duration::from_secs(2), receiver.wait_for(predicate))
            .await
            .expect("timed out waiting for the feed")
            .expect("feed channel closed")
            .clone();
        list
    }

    #[fixture]
    fn before_each() -> (Arc<InMemoryRecordStore>, Viewer) {
        let store = Arc::new(InMemoryRecordStore::new());
        let viewer = MessageFeedViewer::new(PATH, store.clone());
        (store, viewer)
    }

    #[rstest]
    fn it_should_start_hidden_and_unsubscribed(before_each: (Arc<InMemoryRecordStore>, Viewer)) {
        let (store, viewer) = before_each;
        assert!(!viewer.is_visible());
        assert!(!viewer.is_subscribed());
        assert_eq!(viewer.toggle_label(), SHOW_LABEL);
        assert_eq!(viewer.rendered(), FeedList::Blank);
        assert_eq!(viewer.displayed(), None);
        assert_eq!(store.subscriptions_opened(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_loading_until_the_first_update() {
        let store = Arc::new(SilentStore::default());
        let mut viewer = MessageFeedViewer::new(PATH, store);

        assert!(viewer.toggle().await);

        assert_eq!(viewer.displayed(), Some(FeedList::Loading));
        assert_eq!(viewer.toggle_label(), HIDE_LABEL);
        assert!(viewer.is_subscribed());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_subscribe_exactly_once_across_toggles(
        before_each: (Arc<InMemoryRecordStore>, Viewer),
    ) {
        let (store, mut viewer) = before_each;
        assert!(viewer.toggle().await);
        assert!(!viewer.toggle().await);
        assert!(viewer.toggle().await);
        assert!(!viewer.toggle().await);
        assert_eq!(store.subscriptions_opened(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_render_the_current_set_then_live_changes(
        before_each: (Arc<InMemoryRecordStore>, Viewer),
    ) {
        let (store, mut viewer) = before_each;
        viewer.toggle().await;
        wait_until(&viewer, |list| *list == FeedList::NoSubmissions).await;

        store.append(PATH, record(Attendance::Yes, "hi")).await.unwrap();

        let list = wait_until(&viewer, |list| matches!(list, FeedList::Entries(_))).await;
        assert_eq!(list.entries().len(), 1);
        assert_eq!(list.entries()[0].sender, "From: a@b.com");
        assert_eq!(list.entries()[0].message, "hi");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_no_messages_when_nothing_survives_the_filter(
        before_each: (Arc<InMemoryRecordStore>, Viewer),
    ) {
        let (store, mut viewer) = before_each;
        store.append(PATH, record(Attendance::Yes, "  ")).await.unwrap();
        store.append(PATH, record(Attendance::No, "hey")).await.unwrap();

        viewer.toggle().await;

        let list = wait_until(&viewer, |list| *list != FeedList::Loading).await;
        assert_eq!(list, FeedList::NoMessages);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_updating_while_hidden(
        before_each: (Arc<InMemoryRecordStore>, Viewer),
    ) {
        let (store, mut viewer) = before_each;
        viewer.toggle().await;
        wait_until(&viewer, |list| *list == FeedList::NoSubmissions).await;
        viewer.toggle().await;

        store.append(PATH, record(Attendance::Yes, "while hidden")).await.unwrap();
        wait_until(&viewer, |list| matches!(list, FeedList::Entries(_))).await;
        assert_eq!(viewer.displayed(), None);

        viewer.toggle().await;
        let shown = viewer.displayed().expect("list should be displayed");
        assert_eq!(shown.entries()[0].message, "while hidden");
        assert_eq!(store.subscriptions_opened(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_the_error_placeholder_and_stay_subscribed(
        before_each: (Arc<InMemoryRecordStore>, Viewer),
    ) {
        let (store, mut viewer) = before_each;
        viewer.toggle().await;
        wait_until(&viewer, |list| *list == FeedList::NoSubmissions).await;

        store
            .fail_subscribers(PATH, StoreError::Transport("connection reset".into()))
            .await;
        let list = wait_until(&viewer, |list| *list == FeedList::Failed).await;
        assert_eq!(list.placeholder(), Some(LOAD_FAILED_TEXT));

        store.append(PATH, record(Attendance::Yes, "back")).await.unwrap();
        wait_until(&viewer, |list| matches!(list, FeedList::Entries(_))).await;
        assert_eq!(store.subscriptions_opened(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_the_error_placeholder_when_the_first_update_fails(
        before_each: (Arc<InMemoryRecordStore>, Viewer),
    ) {
        let (store, mut viewer) = before_each;
        store.set_offline(true);
        viewer.toggle().await;
        let list = wait_until(&viewer, |list| *list == FeedList::Failed).await;
        assert_eq!(list.to_html(), format!("<li>{LOAD_FAILED_TEXT}</li>"));
    }

    #[rstest]
    fn it_should_render_an_unchanged_snapshot_identically() {
        let snapshot = snapshot_of(vec![("r1", stored_rsvp("a@b.com", "yes", "hi"))]);
        let first = apply_update(Ok(snapshot.clone()));
        let second = apply_update(Ok(snapshot));
        assert_eq!(first, second);
        assert_eq!(apply_update(Ok(Snapshot::new())), FeedList::NoSubmissions);
    }
}
