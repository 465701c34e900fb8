pub mod course;
pub mod registration;
pub mod user;

pub use course::{Course, CourseCode, CoursePatch, MakeupLecture, Schedule};
pub use registration::{ConflictWarning, RegistrationOutcome};
pub use user::{Role, User, UserId};
