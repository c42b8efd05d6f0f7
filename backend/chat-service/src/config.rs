use dotenvy::dotenv;
use std::env;

/// Service configuration, read once at startup.
///
/// Collaborator URLs point at the internal services that own users, posts
/// and uploaded assets; this service only ever calls their read/delete
/// endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub profile_service_url: String,
    pub post_service_url: String,
    pub asset_service_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| crate::error::AppError::Config("DATABASE_URL missing".into()))?;
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let profile_service_url = env::var("PROFILE_SERVICE_URL")
            .unwrap_or_else(|_| "http://user-service:3001".into());
        let post_service_url =
            env::var("POST_SERVICE_URL").unwrap_or_else(|_| "http://post-service:3002".into());
        let asset_service_url =
            env::var("ASSET_SERVICE_URL").unwrap_or_else(|_| "http://asset-service:3003".into());

        Ok(Self {
            database_url,
            port,
            profile_service_url,
            post_service_url,
            asset_service_url,
        })
    }
}
