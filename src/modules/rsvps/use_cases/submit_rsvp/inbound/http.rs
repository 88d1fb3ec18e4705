use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::rsvps::core::attendance::Attendance;
use crate::modules::rsvps::core::validation::FormFields;
use crate::modules::rsvps::use_cases::submit_rsvp::controller::SubmitError;
use crate::modules::rsvps::use_cases::submit_rsvp::form_view::PageFormView;
use crate::shell::state::AppState;

/// The client's form as currently filled in. Each request carries its own form.
#[derive(Deserialize)]
pub struct FormBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub attendance: Option<Attendance>,
    #[serde(default)]
    pub message: String,
}

impl From<FormBody> for FormFields {
    fn from(body: FormBody) -> Self {
        Self {
            email: body.email,
            attendance: body.attendance,
            message: body.message,
        }
    }
}

#[derive(Deserialize)]
pub struct SelectAttendanceBody {
    pub attendance: Attendance,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct FormResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_key: Option<String>,
    pub form: PageFormView,
}

impl FormResponse {
    fn form(form: PageFormView) -> Self {
        Self {
            record_key: None,
            form,
        }
    }
}

pub async fn handle_submit(
    State(state): State<AppState>,
    body: Result<Json<FormBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let mut controller = state.form_controller(body.into());
    let outcome = controller.submit().await;
    let form = controller.view().clone();
    match outcome {
        Ok(record_key) => (
            StatusCode::CREATED,
            Json(FormResponse {
                record_key: Some(record_key),
                form,
            }),
        )
            .into_response(),
        Err(SubmitError::Validation(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(FormResponse::form(form))).into_response()
        }
        Err(SubmitError::Store(_)) => {
            (StatusCode::BAD_GATEWAY, Json(FormResponse::form(form))).into_response()
        }
    }
}

pub async fn handle_select_attendance(
    State(state): State<AppState>,
    body: Result<Json<SelectAttendanceBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let controller = state.form_controller(FormFields {
        email: body.email,
        attendance: Some(body.attendance),
        message: body.message,
    });
    Json(FormResponse::form(controller.view().clone())).into_response()
}

/// A blank form.
pub async fn handle_form() -> impl IntoResponse {
    Json(FormResponse::form(PageFormView::new()))
}
