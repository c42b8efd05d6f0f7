use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::clients::{AssetStore, PostDirectory, ProfileDirectory};
use crate::error::AppError;
use crate::models::{PostSummary, PublicProfile};

#[derive(Clone)]
pub struct HttpAssetStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAssetStore {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteAssetResponse {
    deleted: bool,
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn delete_asset(&self, uri: &str) -> Result<bool, AppError> {
        let response = self
            .http
            .delete(format!("{}/internal/assets", self.base_url))
            .query(&[("uri", uri)])
            .send()
            .await
            .map_err(|e| AppError::UpstreamAsset(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamAsset(format!(
                "asset service returned {}",
                response.status()
            )));
        }

        let body: DeleteAssetResponse = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamAsset(e.to_string()))?;
        Ok(body.deleted)
    }
}

#[derive(Clone)]
pub struct HttpProfileDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProfileDirectory {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload {
    username: String,
    #[serde(default)]
    profile_pic: String,
    #[serde(default)]
    name: String,
}

#[async_trait]
impl ProfileDirectory for HttpProfileDirectory {
    async fn get_public_profile(&self, user_id: Uuid) -> Result<PublicProfile, AppError> {
        let response = self
            .http
            .get(format!(
                "{}/internal/users/{}/public-profile",
                self.base_url, user_id
            ))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, %user_id, "profile lookup failed");
                AppError::Internal
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), %user_id, "profile lookup failed");
            return Err(AppError::Internal);
        }

        let payload: ProfilePayload = response.json().await.map_err(|e| {
            warn!(error = %e, %user_id, "profile payload malformed");
            AppError::Internal
        })?;

        Ok(PublicProfile {
            id: user_id,
            username: payload.username,
            profile_pic: payload.profile_pic,
            name: payload.name,
        })
    }
}

#[derive(Clone)]
pub struct HttpPostDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPostDirectory {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl PostDirectory for HttpPostDirectory {
    async fn get_post_summary(&self, post_id: Uuid) -> Result<Option<PostSummary>, AppError> {
        let response = self
            .http
            .get(format!(
                "{}/internal/posts/{}/summary",
                self.base_url, post_id
            ))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, %post_id, "post summary lookup failed");
                AppError::Internal
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!(status = %response.status(), %post_id, "post summary lookup failed");
            return Err(AppError::Internal);
        }

        let summary: PostSummary = response.json().await.map_err(|e| {
            warn!(error = %e, %post_id, "post summary payload malformed");
            AppError::Internal
        })?;
        Ok(Some(summary))
    }
}
