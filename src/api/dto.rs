use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ConflictWarning, RegistrationOutcome, UserId};

/// Body of every register/withdraw call, admin- or student-initiated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest<'a> {
    pub student_id: &'a UserId,
}

/// Only `warning` decides the outcome; `conflictingCourses` is taken in
/// whatever shape the server sends.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub conflicting_courses: Option<Value>,
}

impl From<RegistrationResponse> for RegistrationOutcome {
    fn from(resp: RegistrationResponse) -> Self {
        match resp.warning {
            Some(warning) if !warning.is_empty() => {
                let conflicting_courses = match resp.conflicting_courses {
                    Some(Value::Array(courses)) => courses,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![other],
                };
                RegistrationOutcome::ConflictWarning(ConflictWarning {
                    warning,
                    conflicting_courses,
                })
            }
            _ => RegistrationOutcome::Registered,
        }
    }
}
