// Pure validation for an RSVP submission.
//
// Purpose
// - Check the raw form fields and produce the record to write on success.
//
// Responsibilities
// - Email must be non-empty after trimming and contain "@".
// - An attendance choice must be present.
// - Normalize: trim email and message, force the message empty when not attending.
// - Never perform input or output.

use crate::modules::rsvps::core::attendance::Attendance;
use crate::modules::rsvps::core::record::{RsvpRecord, ServerTimestamp};

/// Raw field values as the user left them in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormFields {
    pub email: String,
    pub attendance: Option<Attendance>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Email,
    Attendance,
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("please enter a valid email address")]
    InvalidEmail,

    #[error("attendance choice missing")]
    MissingAttendance,
}

impl ValidationIssue {
    pub fn field(&self) -> FormField {
        match self {
            ValidationIssue::InvalidEmail => FormField::Email,
            ValidationIssue::MissingAttendance => FormField::Attendance,
        }
    }
}

pub fn validate_submission(fields: &FormFields) -> Result<RsvpRecord, Vec<ValidationIssue>> {
    let email = fields.email.trim();
    let mut issues = Vec::new();

    if email.is_empty() || !email.contains('@') {
        issues.push(ValidationIssue::InvalidEmail);
    }
    let Some(attendance) = fields.attendance else {
        issues.push(ValidationIssue::MissingAttendance);
        return Err(issues);
    };
    if !issues.is_empty() {
        return Err(issues);
    }

    let message = match attendance {
        Attendance::Yes => fields.message.trim().to_string(),
        Attendance::No => String::new(),
    };

    Ok(RsvpRecord {
        email: email.to_string(),
        attendance,
        message,
        timestamp: ServerTimestamp,
    })
}
