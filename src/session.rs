use std::sync::Arc;

use tracing::{Span, info, info_span};
use uuid::Uuid;

use crate::api::{CourseApi, UserApi};
use crate::services::{CourseStore, UserStore};

/// Owns the stores for one user session. Dropping it (or calling `end`)
/// discards every cached course and user record.
pub struct Session {
    id: Uuid,
    span: Span,
    courses: CourseStore,
    user: UserStore,
}

impl Session {
    pub fn start<A>(api: Arc<A>) -> Self
    where
        A: CourseApi + UserApi + 'static,
    {
        let id = Uuid::new_v4();
        let span = info_span!("session", id = %id);
        span.in_scope(|| info!("Session started"));

        let course_api: Arc<dyn CourseApi> = api.clone();
        let user_api: Arc<dyn UserApi> = api;

        Self {
            id,
            span,
            courses: CourseStore::new(course_api),
            user: UserStore::new(user_api),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Span to instrument store calls made on behalf of this session.
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn courses(&self) -> &CourseStore {
        &self.courses
    }

    pub fn courses_mut(&mut self) -> &mut CourseStore {
        &mut self.courses
    }

    pub fn user(&self) -> &UserStore {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut UserStore {
        &mut self.user
    }

    pub fn end(mut self) {
        self.user.sign_out();
        self.span.in_scope(|| {
            info!(
                "Session ended ({} cached courses discarded)",
                self.courses.courses().len()
            )
        });
    }
}
