use crate::modules::rsvps::core::validation::FormFields;
use crate::modules::rsvps::use_cases::submit_rsvp::controller::FormController;
use crate::modules::rsvps::use_cases::submit_rsvp::form_view::PageFormView;
use crate::modules::rsvps::use_cases::view_message_feed::viewer::MessageFeedViewer;
use crate::shared::infrastructure::record_store::RecordStore;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type PageFormController = FormController<dyn RecordStore, PageFormView>;
pub type PageFeedViewer = MessageFeedViewer<dyn RecordStore>;

/// Shared by every request. Forms are per request; the message feed is one page-wide list.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub path: String,
    pub feed: Arc<Mutex<PageFeedViewer>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            feed: Arc::new(Mutex::new(MessageFeedViewer::new(path.clone(), store.clone()))),
            store,
            path,
        }
    }

    /// A form holding one client's input, with the attendance choice applied.
    pub fn form_controller(&self, fields: FormFields) -> PageFormController {
        let attendance = fields.attendance;
        let mut view = PageFormView::new();
        view.fill(FormFields {
            attendance: None,
            ..fields
        });
        let mut controller = FormController::new(self.path.clone(), self.store.clone(), view);
        if let Some(attendance) = attendance {
            controller.select_attendance(attendance);
        }
        controller
    }
}
