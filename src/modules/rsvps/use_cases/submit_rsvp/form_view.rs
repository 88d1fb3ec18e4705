use crate::modules::rsvps::core::attendance::Attendance;
use crate::modules::rsvps::core::validation::{FormField, FormFields};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Page background applied after a saved RSVP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Celebration,
    Regret,
}

impl Theme {
    pub fn for_attendance(attendance: Attendance) -> Self {
        match attendance {
            Attendance::Yes => Theme::Celebration,
            Attendance::No => Theme::Regret,
        }
    }
}

/// The form as the controller sees it: field values to read, feedback to write.
pub trait FormView: Send {
    fn fields(&self) -> FormFields;
    fn select_attendance(&mut self, attendance: Attendance);
    fn show_message_field(&mut self, visible: bool);
    fn clear_message(&mut self);
    fn flag_field(&mut self, field: FormField);
    fn clear_field_flags(&mut self);
    /// Display the notice and scroll it into view.
    fn show_notice(&mut self, notice: Notice);
    fn clear_notice(&mut self);
    fn apply_theme(&mut self, theme: Option<Theme>);
    fn reset_fields(&mut self);
}

/// In-process form state, rendered by the inbound adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageFormView {
    pub fields: FormFields,
    pub message_field_visible: bool,
    pub flagged_fields: Vec<FormField>,
    pub notice: Option<Notice>,
    pub theme: Option<Theme>,
    /// Times a notice was scrolled into view.
    pub notice_scrolls: u32,
}

impl PageFormView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type values into the form, as the user would.
    pub fn fill(&mut self, fields: FormFields) {
        self.fields = fields;
    }
}

impl FormView for PageFormView {
    fn fields(&self) -> FormFields {
        self.fields.clone()
    }

    fn select_attendance(&mut self, attendance: Attendance) {
        self.fields.attendance = Some(attendance);
    }

    fn show_message_field(&mut self, visible: bool) {
        self.message_field_visible = visible;
    }

    fn clear_message(&mut self) {
        self.fields.message.clear();
    }

    fn flag_field(&mut self, field: FormField) {
        if !self.flagged_fields.contains(&field) {
            self.flagged_fields.push(field);
        }
    }

    fn clear_field_flags(&mut self) {
        self.flagged_fields.clear();
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.notice_scrolls += 1;
    }

    fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn apply_theme(&mut self, theme: Option<Theme>) {
        self.theme = theme;
    }

    fn reset_fields(&mut self) {
        self.fields = FormFields::default();
    }
}
