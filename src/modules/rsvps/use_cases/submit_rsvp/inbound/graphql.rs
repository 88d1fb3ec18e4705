use async_graphql::{Context, Enum, ID, Object, Result as GqlResult, SimpleObject};

use crate::modules::rsvps::core::attendance::Attendance;
use crate::modules::rsvps::core::validation::{FormField, FormFields};
use crate::modules::rsvps::use_cases::submit_rsvp::form_view::{
    Notice, NoticeKind, PageFormView, Theme,
};
use crate::shell::state::AppState;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlAttendance {
    Yes,
    No,
}

impl From<GqlAttendance> for Attendance {
    fn from(v: GqlAttendance) -> Self {
        match v {
            GqlAttendance::Yes => Attendance::Yes,
            GqlAttendance::No => Attendance::No,
        }
    }
}

impl From<Attendance> for GqlAttendance {
    fn from(v: Attendance) -> Self {
        match v {
            Attendance::Yes => GqlAttendance::Yes,
            Attendance::No => GqlAttendance::No,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlNotice {
    pub kind: String,
    pub text: String,
}

impl From<Notice> for GqlNotice {
    fn from(v: Notice) -> Self {
        let kind = match v.kind {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        };
        Self {
            kind: kind.to_string(),
            text: v.text,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlFormView {
    pub email: String,
    pub attendance: Option<GqlAttendance>,
    pub message: String,
    pub message_field_visible: bool,
    pub flagged_fields: Vec<String>,
    pub notice: Option<GqlNotice>,
    pub theme: Option<String>,
}

impl From<PageFormView> for GqlFormView {
    fn from(v: PageFormView) -> Self {
        Self {
            email: v.fields.email,
            attendance: v.fields.attendance.map(Into::into),
            message: v.fields.message,
            message_field_visible: v.message_field_visible,
            flagged_fields: v
                .flagged_fields
                .into_iter()
                .map(|field| match field {
                    FormField::Email => "email".to_string(),
                    FormField::Attendance => "attendance".to_string(),
                })
                .collect(),
            notice: v.notice.map(Into::into),
            theme: v.theme.map(|theme| match theme {
                Theme::Celebration => "celebration".to_string(),
                Theme::Regret => "regret".to_string(),
            }),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlSubmitResult {
    /// Set when the record was saved.
    pub record_key: Option<ID>,
    pub form: GqlFormView,
}

pub struct RsvpFormQuery;

#[Object]
impl RsvpFormQuery {
    /// A blank form.
    async fn form(&self) -> GqlFormView {
        PageFormView::new().into()
    }
}

pub struct RsvpFormMutation;

#[Object]
impl RsvpFormMutation {
    async fn submit_rsvp(
        &self,
        context: &Context<'_>,
        email: String,
        attendance: Option<GqlAttendance>,
        message: Option<String>,
    ) -> GqlResult<GqlSubmitResult> {
        let state = context.data_unchecked::<AppState>();
        let mut controller = state.form_controller(FormFields {
            email,
            attendance: attendance.map(Into::into),
            message: message.unwrap_or_default(),
        });

        // Rejections and failed saves are reported through the returned form.
        let record_key = controller.submit().await.ok().map(ID);

        Ok(GqlSubmitResult {
            record_key,
            form: controller.view().clone().into(),
        })
    }

    async fn select_attendance(
        &self,
        context: &Context<'_>,
        attendance: GqlAttendance,
        email: Option<String>,
        message: Option<String>,
    ) -> GqlResult<GqlFormView> {
        let state = context.data_unchecked::<AppState>();
        let controller = state.form_controller(FormFields {
            email: email.unwrap_or_default(),
            attendance: Some(attendance.into()),
            message: message.unwrap_or_default(),
        });
        Ok(controller.view().clone().into())
    }
}
