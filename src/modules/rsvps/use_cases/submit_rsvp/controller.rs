// Form controller for a single RSVP.
//
// Responsibilities
// - React to attendance changes by showing or hiding the optional message field.
// - On submit: clear old feedback, validate, write one record, reflect the outcome.
// - Keep the typed values when the write fails so the user can submit again.

use crate::modules::rsvps::core::attendance::Attendance;
use crate::modules::rsvps::core::record::RecordKey;
use crate::modules::rsvps::core::validation::{ValidationIssue, validate_submission};
use crate::modules::rsvps::use_cases::submit_rsvp::form_view::{FormView, Notice, Theme};
use crate::shared::infrastructure::record_store::{RecordStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

pub const VALIDATION_FAILED_TEXT: &str = "Please check the form for errors.";
pub const ATTENDING_TEXT: &str = "Woohoo! Can't wait to see your meme-tastic costume! 🎉 See you there!";
pub const NOT_ATTENDING_TEXT: &str = "Aww, sorry you can't make it! Thanks for letting us know.";
pub const SAVE_FAILED_TEXT: &str = "Oh no! There was an error saving your RSVP. Please try again.";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form rejected: {0:?}")]
    Validation(Vec<ValidationIssue>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
}

pub fn confirmation_text(attendance: Attendance) -> &'static str {
    match attendance {
        Attendance::Yes => ATTENDING_TEXT,
        Attendance::No => NOT_ATTENDING_TEXT,
    }
}

pub struct FormController<TStore, TView>
where
    TStore: RecordStore + ?Sized,
    TView: FormView,
{
    path: String,
    store: Arc<TStore>,
    view: TView,
    phase: FormPhase,
}

impl<TStore, TView> FormController<TStore, TView>
where
    TStore: RecordStore + ?Sized,
    TView: FormView,
{
    pub fn new(path: impl Into<String>, store: Arc<TStore>, view: TView) -> Self {
        Self {
            path: path.into(),
            store,
            view,
            phase: FormPhase::Idle,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn view(&self) -> &TView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TView {
        &mut self.view
    }

    pub fn select_attendance(&mut self, attendance: Attendance) {
        self.view.select_attendance(attendance);
        match attendance {
            Attendance::Yes => self.view.show_message_field(true),
            Attendance::No => {
                self.view.show_message_field(false);
                self.view.clear_message();
            }
        }
    }

    pub async fn submit(&mut self) -> Result<RecordKey, SubmitError> {
        self.phase = FormPhase::Validating;
        self.view.clear_notice();
        self.view.apply_theme(None);
        self.view.clear_field_flags();

        let record = match validate_submission(&self.view.fields()) {
            Ok(record) => record,
            Err(issues) => {
                for issue in &issues {
                    tracing::warn!(%issue, "rsvp form rejected");
                    self.view.flag_field(issue.field());
                }
                self.view.show_notice(Notice::error(VALIDATION_FAILED_TEXT));
                self.phase = FormPhase::Idle;
                return Err(SubmitError::Validation(issues));
            }
        };

        self.phase = FormPhase::Submitting;
        let attendance = record.attendance;
        let outcome = self.store.append(&self.path, record).await;
        self.phase = FormPhase::Idle;

        match outcome {
            Ok(key) => {
                tracing::info!(record_key = %key, %attendance, "rsvp saved");
                self.view
                    .show_notice(Notice::success(confirmation_text(attendance)));
                self.view.apply_theme(Some(Theme::for_attendance(attendance)));
                self.view.reset_fields();
                self.view.show_message_field(false);
                self.view.clear_field_flags();
                Ok(key)
            }
            Err(error) => {
                tracing::error!(%error, "error saving rsvp");
                self.view.show_notice(Notice::error(SAVE_FAILED_TEXT));
                Err(SubmitError::Store(error))
            }
        }
    }
}
