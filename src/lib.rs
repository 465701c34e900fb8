pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use api::{ApiConfig, CourseApi, HttpApiClient, UserApi};
pub use error::{AppError, AppResult};
pub use session::Session;
