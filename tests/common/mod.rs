#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use coursereg::error::{AppError, AppResult};
use coursereg::models::{
    ConflictWarning, Course, CourseCode, CoursePatch, RegistrationOutcome, Role, Schedule, User,
    UserId,
};
use coursereg::{CourseApi, UserApi};

pub const STUDENT_ID: &str = "67ccfd4c028d9d90a51d8e85";

pub fn course(code: &str, capacity: u32) -> Course {
    Course {
        code: CourseCode::from(code),
        name: format!("{code} course"),
        description: None,
        instructors: vec!["Dr. Smith".to_string()],
        location: None,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2025, 4, 25).expect("valid date"),
        schedule: vec![Schedule {
            day: "Monday".to_string(),
            start_time: "9:00".to_string(),
            end_time: "10:30".to_string(),
        }],
        capacity,
        registered_students: Vec::new(),
        makeup_lectures: Vec::new(),
        no_class_dates: Vec::new(),
    }
}

pub fn student() -> User {
    User {
        id: UserId::from(STUDENT_ID),
        role: Role::Student,
        name: "Test Student".to_string(),
        email: "test.student@example.com".to_string(),
        password: None,
        registered_courses: Vec::new(),
    }
}

#[derive(Default)]
pub struct FakeState {
    pub courses: Vec<Course>,
    pub users: Vec<User>,
    /// Returned (once) by the next student registration.
    pub next_warning: Option<ConflictWarning>,
    /// Operation name that fails with a 500.
    pub fail_on: Option<&'static str>,
    pub calls: Vec<&'static str>,
}

/// In-memory stand-in for the registration server.
#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_courses(courses: Vec<Course>) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.courses = courses;
            state.users = vec![student()];
        }
        api
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_on(&self, op: &'static str) {
        self.state.lock().unwrap().fail_on = Some(op);
    }

    pub fn server_courses(&self) -> Vec<Course> {
        self.state.lock().unwrap().courses.clone()
    }

    fn enter(&self, op: &'static str) -> AppResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        if state.fail_on == Some(op) {
            return Err(AppError::Api {
                status: 500,
                body: format!("{op} failed"),
            });
        }
        Ok(state)
    }
}

fn not_found(what: &str) -> AppError {
    AppError::Api {
        status: 404,
        body: format!("{what} not found"),
    }
}

fn apply(course: &mut Course, patch: &CoursePatch) {
    if let Some(code) = &patch.code {
        course.code = code.clone();
    }
    if let Some(name) = &patch.name {
        course.name = name.clone();
    }
    if let Some(description) = &patch.description {
        course.description = description.clone();
    }
    if let Some(instructors) = &patch.instructors {
        course.instructors = instructors.clone();
    }
    if let Some(location) = &patch.location {
        course.location = location.clone();
    }
    if let Some(date) = patch.start_date {
        course.start_date = date;
    }
    if let Some(date) = patch.end_date {
        course.end_date = date;
    }
    if let Some(schedule) = &patch.schedule {
        course.schedule = schedule.clone();
    }
    if let Some(capacity) = patch.capacity {
        course.capacity = capacity;
    }
}

#[async_trait]
impl CourseApi for FakeApi {
    async fn fetch_courses(&self) -> AppResult<Vec<Course>> {
        let state = self.enter("fetch_courses")?;
        Ok(state.courses.clone())
    }

    async fn create_course(&self, course: &Course) -> AppResult<Course> {
        let mut state = self.enter("create_course")?;
        // The server fills in defaults the payload left out.
        let mut created = course.clone();
        created.location.get_or_insert_with(|| "TBA".to_string());
        created.registered_students.clear();
        state.courses.push(created.clone());
        Ok(created)
    }

    async fn update_course(&self, code: &CourseCode, patch: &CoursePatch) -> AppResult<Course> {
        let mut state = self.enter("update_course")?;
        let entry = state
            .courses
            .iter_mut()
            .find(|c| &c.code == code)
            .ok_or_else(|| not_found("course"))?;
        apply(entry, patch);
        Ok(entry.clone())
    }

    async fn delete_course(&self, code: &CourseCode) -> AppResult<()> {
        let mut state = self.enter("delete_course")?;
        state.courses.retain(|c| &c.code != code);
        Ok(())
    }

    async fn register_course(&self, code: &CourseCode, student: &UserId) -> AppResult<Course> {
        let mut state = self.enter("register_course")?;
        let entry = state
            .courses
            .iter_mut()
            .find(|c| &c.code == code)
            .ok_or_else(|| not_found("course"))?;
        entry.registered_students.push(student.clone());
        Ok(entry.clone())
    }

    async fn withdraw_course(&self, code: &CourseCode, student: &UserId) -> AppResult<Course> {
        let mut state = self.enter("withdraw_course")?;
        let entry = state
            .courses
            .iter_mut()
            .find(|c| &c.code == code)
            .ok_or_else(|| not_found("course"))?;
        entry.registered_students.retain(|s| s != student);
        Ok(entry.clone())
    }
}

#[async_trait]
impl UserApi for FakeApi {
    async fn fetch_user(&self, user: &UserId) -> AppResult<User> {
        let state = self.enter("fetch_user")?;
        state
            .users
            .iter()
            .find(|u| &u.id == user)
            .cloned()
            .ok_or_else(|| not_found("user"))
    }

    async fn fetch_registered_courses(&self, student: &UserId) -> AppResult<Vec<Course>> {
        let state = self.enter("fetch_registered_courses")?;
        Ok(state
            .courses
            .iter()
            .filter(|c| c.has_student(student))
            .cloned()
            .collect())
    }

    async fn register_for_course(
        &self,
        student: &UserId,
        code: &CourseCode,
    ) -> AppResult<RegistrationOutcome> {
        let mut state = self.enter("register_for_course")?;
        let warning = state.next_warning.take();
        let entry = state
            .courses
            .iter_mut()
            .find(|c| &c.code == code)
            .ok_or_else(|| not_found("course"))?;
        entry.registered_students.push(student.clone());
        Ok(match warning {
            Some(w) => RegistrationOutcome::ConflictWarning(w),
            None => RegistrationOutcome::Registered,
        })
    }

    async fn withdraw_from_course(&self, student: &UserId, code: &CourseCode) -> AppResult<()> {
        let mut state = self.enter("withdraw_from_course")?;
        let entry = state
            .courses
            .iter_mut()
            .find(|c| &c.code == code)
            .ok_or_else(|| not_found("course"))?;
        entry.registered_students.retain(|s| s != student);
        Ok(())
    }
}
