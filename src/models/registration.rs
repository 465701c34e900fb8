use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CourseCode;

/// Result of a student-initiated registration that the server accepted.
///
/// A conflict warning is still a success: the server registered the student
/// but flags overlapping timeslots. The caller decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    ConflictWarning(ConflictWarning),
}

impl RegistrationOutcome {
    pub fn warning(&self) -> Option<&ConflictWarning> {
        match self {
            RegistrationOutcome::Registered => None,
            RegistrationOutcome::ConflictWarning(w) => Some(w),
        }
    }
}

/// The server's warning, kept as sent. Conflicting courses are usually
/// summaries rather than full course records, so they stay raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictWarning {
    pub warning: String,
    #[serde(default)]
    pub conflicting_courses: Vec<Value>,
}

impl ConflictWarning {
    /// Codes of the conflicting courses that carry one.
    pub fn conflicting_codes(&self) -> Vec<CourseCode> {
        self.conflicting_courses
            .iter()
            .filter_map(|c| c.get("code").and_then(Value::as_str))
            .map(CourseCode::from)
            .collect()
    }
}
