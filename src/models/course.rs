use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::UserId;

/// Human-chosen course code (e.g. `CS101`). The one key used to address a
/// course everywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(String);

impl CourseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CourseCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub instructors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub schedule: Vec<Schedule>,
    pub capacity: u32,
    #[serde(default)]
    pub registered_students: Vec<UserId>,
    #[serde(default)]
    pub makeup_lectures: Vec<MakeupLecture>,
    #[serde(default, deserialize_with = "deserialize_dates")]
    pub no_class_dates: Vec<NaiveDate>,
}

impl Course {
    /// Seats left according to the cached copy. Display only; the server
    /// owns the capacity check.
    pub fn seats_remaining(&self) -> u32 {
        let taken = u32::try_from(self.registered_students.len()).unwrap_or(u32::MAX);
        self.capacity.saturating_sub(taken)
    }

    pub fn has_student(&self, student: &UserId) -> bool {
        self.registered_students.contains(student)
    }
}

/// A weekly timeslot. Times are free-form (`"9:00"`, `"09:00 AM"`, ...) and
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupLecture {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// Partial update payload sent with `PATCH`. Absent fields are left alone
/// by the server. `description` and `location` use `Some(None)` to send an
/// explicit `null`, which clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CourseCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Schedule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_students: Option<Vec<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub makeup_lectures: Option<Vec<MakeupLecture>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_class_dates: Option<Vec<NaiveDate>>,
}

impl From<&Course> for CoursePatch {
    fn from(course: &Course) -> Self {
        Self {
            code: Some(course.code.clone()),
            name: Some(course.name.clone()),
            description: Some(course.description.clone()),
            instructors: Some(course.instructors.clone()),
            location: Some(course.location.clone()),
            start_date: Some(course.start_date),
            end_date: Some(course.end_date),
            schedule: Some(course.schedule.clone()),
            capacity: Some(course.capacity),
            registered_students: Some(course.registered_students.clone()),
            makeup_lectures: Some(course.makeup_lectures.clone()),
            no_class_dates: Some(course.no_class_dates.clone()),
        }
    }
}

/// Accepts `YYYY-MM-DD` or an RFC3339 timestamp (its UTC date is kept).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
}

fn deserialize_dates<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_date(s).ok_or_else(|| D::Error::custom(format!("invalid date: {s}"))))
        .collect()
}
