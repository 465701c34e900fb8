use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::UserApi;
use crate::error::AppError;
use crate::models::{Course, CourseCode, RegistrationOutcome, User, UserId};

/// The signed-in student and the courses they are registered in.
///
/// Starts signed out. Registration and withdrawal failures propagate; the
/// registered-course refresh is best effort and records its last failure in
/// `last_error` instead of disturbing the cached list.
pub struct UserStore {
    api: Arc<dyn UserApi>,
    user: Option<User>,
    registered_courses: Vec<Course>,
    last_error: Option<String>,
}

impl UserStore {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            user: None,
            registered_courses: Vec::new(),
            last_error: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn registered_courses(&self) -> &[Course] {
        &self.registered_courses
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_registered(&self, code: &CourseCode) -> bool {
        self.registered_courses.iter().any(|c| &c.code == code)
    }

    pub async fn sign_in(&mut self, user_id: &UserId) -> Result<(), AppError> {
        let user = self.api.fetch_user(user_id).await?;
        info!("Signed in as {} ({:?})", user.name, user.role);
        self.user = Some(user);
        self.registered_courses.clear();
        self.last_error = None;
        Ok(())
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.name);
        }
        self.registered_courses.clear();
        self.last_error = None;
    }

    fn current_user_id(&self) -> Result<UserId, AppError> {
        self.user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(AppError::NotAuthenticated)
    }

    pub async fn load_registered_courses(&mut self) -> Result<(), AppError> {
        let student = self.current_user_id()?;

        match self.api.fetch_registered_courses(&student).await {
            Ok(courses) => {
                info!("Loaded {} registered courses", courses.len());
                self.registered_courses = courses;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching registered courses: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// A conflict warning is handed back as-is and the registered list is
    /// left untouched; the caller decides whether to keep the registration.
    pub async fn register(&mut self, code: &CourseCode) -> Result<RegistrationOutcome, AppError> {
        let student = self.current_user_id()?;

        let outcome = self
            .api
            .register_for_course(&student, code)
            .await
            .inspect_err(|e| error!("Error registering for course {}: {}", code, e))?;

        if let RegistrationOutcome::ConflictWarning(w) = &outcome {
            let conflicts: Vec<String> = w
                .conflicting_codes()
                .iter()
                .map(|c| c.to_string())
                .collect();
            warn!(
                "Registration for {} reported: {} (conflicts: {})",
                code,
                w.warning,
                conflicts.join(", ")
            );
            return Ok(outcome);
        }

        self.refresh_after_change().await;
        Ok(outcome)
    }

    pub async fn withdraw(&mut self, code: &CourseCode) -> Result<(), AppError> {
        let student = self.current_user_id()?;

        self.api
            .withdraw_from_course(&student, code)
            .await
            .inspect_err(|e| error!("Error withdrawing from course {}: {}", code, e))?;

        self.refresh_after_change().await;
        Ok(())
    }

    // The mutation already succeeded; a failed refresh only leaves the cache stale.
    async fn refresh_after_change(&mut self) {
        if let Err(e) = self.load_registered_courses().await {
            warn!("Registered courses may be stale: {}", e);
        }
    }
}
