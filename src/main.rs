use std::env;
use std::sync::Arc;

use tracing::{Instrument, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursereg::models::UserId;
use coursereg::{ApiConfig, AppError, HttpApiClient, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "coursereg=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::new_from_env()?;
    let student_id = env::var("COURSEREG_STUDENT_ID")
        .map_err(|_| AppError::Config("COURSEREG_STUDENT_ID is not set".to_string()))?;

    let api = Arc::new(HttpApiClient::new(config)?);
    info!("using API at {}", api.base_url());
    let student = UserId::new(student_id);
    let mut session = Session::start(api);
    let span = session.span().clone();

    async {
        session.user_mut().sign_in(&student).await?;
        session.courses_mut().load_courses().await?;
        if let Err(e) = session.user_mut().load_registered_courses().await {
            warn!("continuing without registered courses: {}", e);
        }
        Ok::<_, AppError>(())
    }
    .instrument(span)
    .await?;

    for course in session.courses().courses() {
        let marker = if session.user().is_registered(&course.code) { "*" } else { " " };
        info!(
            "{} {:<10} {:<40} {:>3} seats left",
            marker,
            course.code.as_str(),
            course.name,
            course.seats_remaining()
        );
    }

    session.end();
    Ok(())
}
