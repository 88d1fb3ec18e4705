// Shared test fixture for RSVP form submissions.
// Compiled into the crate only during tests (see `src/lib.rs`).

use crate::modules::rsvps::core::attendance::Attendance;
use crate::modules::rsvps::core::validation::FormFields;
use serde::Deserialize;
use std::fs;

const SUBMISSION_JSON: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/tests/fixtures/json/rsvp_submission.json"
);

// JSON -> DTO (transport shape)
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpSubmissionDto {
    pub email: String,
    pub attendance: Option<Attendance>,
    pub message: String,
}

pub struct FormFieldsBuilder {
    inner: FormFields,
}

impl Default for FormFieldsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl FormFieldsBuilder {
    pub fn new() -> Self {
        let json_str = fs::read_to_string(SUBMISSION_JSON).unwrap();
        let dto: RsvpSubmissionDto = serde_json::from_str(&json_str).unwrap();

        Self {
            inner: FormFields {
                email: dto.email,
                attendance: dto.attendance,
                message: dto.message,
            },
        }
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.inner.email = v.into();
        self
    }

    pub fn attendance(mut self, v: Option<Attendance>) -> Self {
        self.inner.attendance = v;
        self
    }

    pub fn message(mut self, v: impl Into<String>) -> Self {
        self.inner.message = v.into();
        self
    }

    pub fn build(self) -> FormFields {
        self.inner
    }
}

#[cfg(test)]
mod rsvp_form_fields_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_new_and_parses_json() {
        let built = FormFieldsBuilder::default().build();
        assert_eq!(built.email, "guest@example.com");
        assert_eq!(built.attendance, Some(Attendance::Yes));
        assert_eq!(built.message, "See you there!");
    }

    #[rstest]
    fn setters_override_all_fields() {
        let custom = FormFieldsBuilder::new()
            .email("other@example.com")
            .attendance(Some(Attendance::No))
            .message("nope")
            .build();

        assert_eq!(custom.email, "other@example.com");
        assert_eq!(custom.attendance, Some(Attendance::No));
        assert_eq!(custom.message, "nope");
    }
}
