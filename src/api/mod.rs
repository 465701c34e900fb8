pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Course, CourseCode, CoursePatch, RegistrationOutcome, User, UserId};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url =
            env::var("COURSEREG_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(AppError::Config("COURSEREG_API_URL is empty".to_string()));
        }
        Ok(Self::new(base_url.trim()))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Admin course resource plus the admin-initiated register/withdraw calls.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn fetch_courses(&self) -> AppResult<Vec<Course>>;
    async fn create_course(&self, course: &Course) -> AppResult<Course>;
    async fn update_course(&self, code: &CourseCode, patch: &CoursePatch) -> AppResult<Course>;
    async fn delete_course(&self, code: &CourseCode) -> AppResult<()>;
    async fn register_course(&self, code: &CourseCode, student: &UserId) -> AppResult<Course>;
    async fn withdraw_course(&self, code: &CourseCode, student: &UserId) -> AppResult<Course>;
}

/// Student resource.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn fetch_user(&self, user: &UserId) -> AppResult<User>;
    async fn fetch_registered_courses(&self, student: &UserId) -> AppResult<Vec<Course>>;
    async fn register_for_course(
        &self,
        student: &UserId,
        code: &CourseCode,
    ) -> AppResult<RegistrationOutcome>;
    async fn withdraw_from_course(&self, student: &UserId, code: &CourseCode) -> AppResult<()>;
}

#[derive(Clone, Debug)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
}

impl HttpApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Config(format!("Invalid base URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("Invalid base URL {}", config.base_url)));
        }
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder) -> AppResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("API error {}: {}", status, body);
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            error!("Failed to parse response: {}", e);
            AppError::Decode(e)
        })
    }
}

#[async_trait]
impl CourseApi for HttpApiClient {
    async fn fetch_courses(&self) -> AppResult<Vec<Course>> {
        let url = self.endpoint(&["admin", "courses"])?;
        self.execute_json(self.request(Method::GET, url)).await
    }

    async fn create_course(&self, course: &Course) -> AppResult<Course> {
        let url = self.endpoint(&["admin", "courses"])?;
        self.execute_json(self.request(Method::POST, url).json(course)).await
    }

    async fn update_course(&self, code: &CourseCode, patch: &CoursePatch) -> AppResult<Course> {
        let url = self.endpoint(&["admin", "courses", code.as_str()])?;
        self.execute_json(self.request(Method::PATCH, url).json(patch)).await
    }

    async fn delete_course(&self, code: &CourseCode) -> AppResult<()> {
        let url = self.endpoint(&["admin", "courses", code.as_str()])?;
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn register_course(&self, code: &CourseCode, student: &UserId) -> AppResult<Course> {
        let url = self.endpoint(&["register", code.as_str()])?;
        let body = dto::StudentRequest { student_id: student };
        self.execute_json(self.request(Method::POST, url).json(&body)).await
    }

    async fn withdraw_course(&self, code: &CourseCode, student: &UserId) -> AppResult<Course> {
        let url = self.endpoint(&["withdraw", code.as_str()])?;
        let body = dto::StudentRequest { student_id: student };
        self.execute_json(self.request(Method::POST, url).json(&body)).await
    }
}

#[async_trait]
impl UserApi for HttpApiClient {
    async fn fetch_user(&self, user: &UserId) -> AppResult<User> {
        let url = self.endpoint(&["student", user.as_str()])?;
        self.execute_json(self.request(Method::GET, url)).await
    }

    async fn fetch_registered_courses(&self, student: &UserId) -> AppResult<Vec<Course>> {
        let url = self.endpoint(&["student", student.as_str(), "courses"])?;
        self.execute_json(self.request(Method::GET, url)).await
    }

    async fn register_for_course(
        &self,
        student: &UserId,
        code: &CourseCode,
    ) -> AppResult<RegistrationOutcome> {
        let url = self.endpoint(&["student", "register", code.as_str()])?;
        let body = dto::StudentRequest { student_id: student };
        let text = self.execute(self.request(Method::POST, url).json(&body)).await?;

        if text.trim().is_empty() {
            return Ok(RegistrationOutcome::Registered);
        }

        // A body without a usable `warning` string is a plain acknowledgement.
        match serde_json::from_str::<dto::RegistrationResponse>(&text) {
            Ok(resp) => Ok(resp.into()),
            Err(e) => {
                debug!("Registration response is not a warning object: {}", e);
                Ok(RegistrationOutcome::Registered)
            }
        }
    }

    async fn withdraw_from_course(&self, student: &UserId, code: &CourseCode) -> AppResult<()> {
        let url = self.endpoint(&["student", "withdraw", code.as_str()])?;
        let body = dto::StudentRequest { student_id: student };
        self.execute(self.request(Method::POST, url).json(&body)).await?;
        Ok(())
    }
}
