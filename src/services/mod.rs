pub mod course_store;
pub mod user_store;

pub use course_store::CourseStore;
pub use user_store::UserStore;
