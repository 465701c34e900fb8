use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::CourseApi;
use crate::error::AppError;
use crate::models::{Course, CourseCode, CoursePatch, UserId};

/// Cached course catalogue for the admin and browsing views.
///
/// Every operation goes to the server first and only then reconciles the
/// local list. Errors propagate and leave the list as it was.
pub struct CourseStore {
    api: Arc<dyn CourseApi>,
    courses: Vec<Course>,
}

impl CourseStore {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self {
            api,
            courses: Vec::new(),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn find(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.iter().find(|c| &c.code == code)
    }

    pub async fn load_courses(&mut self) -> Result<(), AppError> {
        let courses = self.api.fetch_courses().await?;
        info!("Loaded {} courses", courses.len());
        self.courses = courses;
        Ok(())
    }

    /// Appends the server's copy, which may carry fields the payload lacked.
    pub async fn add_course(&mut self, course: &Course) -> Result<(), AppError> {
        let created = self.api.create_course(course).await?;
        debug!("Created course {}", created.code);
        self.courses.push(created);
        Ok(())
    }

    /// Returns whether a cached entry with `code` was replaced. A miss is not
    /// an error: the server accepted the update, the cache just never held it.
    pub async fn edit_course(
        &mut self,
        code: &CourseCode,
        updated: &Course,
    ) -> Result<bool, AppError> {
        self.api.update_course(code, &CoursePatch::from(updated)).await?;

        match self.courses.iter_mut().find(|c| &c.code == code) {
            Some(entry) => {
                *entry = updated.clone();
                debug!("Updated course {}", code);
                Ok(true)
            }
            None => {
                warn!("Updated course {} is not in the local list", code);
                Ok(false)
            }
        }
    }

    pub async fn remove_course(&mut self, code: &CourseCode) -> Result<(), AppError> {
        self.api.delete_course(code).await?;
        self.courses.retain(|c| &c.code != code);
        debug!("Removed course {}", code);
        Ok(())
    }

    /// Registration changes seat counts server side, so the whole list is
    /// reloaded rather than patched.
    pub async fn register_for_course(
        &mut self,
        code: &CourseCode,
        student: &UserId,
    ) -> Result<(), AppError> {
        self.api.register_course(code, student).await?;
        info!("Registered student {} for {}", student, code);
        self.load_courses().await
    }

    pub async fn withdraw_from_course(
        &mut self,
        code: &CourseCode,
        student: &UserId,
    ) -> Result<(), AppError> {
        self.api.withdraw_course(code, student).await?;
        info!("Withdrew student {} from {}", student, code);
        self.load_courses().await
    }
}
