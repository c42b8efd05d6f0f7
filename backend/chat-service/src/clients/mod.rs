//! Interfaces to the services this core collaborates with but does not own:
//! uploaded chat assets, public user profiles and post summaries.
//!
//! Everything behind these traits is someone else's data. The messaging
//! core only ever reads profiles/posts and deletes assets it attached, and
//! it degrades gracefully when any of them is unavailable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{PostSummary, PublicProfile};

pub mod http;

pub use http::{HttpAssetStore, HttpPostDirectory, HttpProfileDirectory};

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Delete an uploaded asset by its resolved URI. Returns whether the
    /// asset existed. Failures map to the non-fatal upstream-asset kind;
    /// callers log and continue.
    async fn delete_asset(&self, uri: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn get_public_profile(&self, user_id: Uuid) -> Result<PublicProfile, AppError>;
}

#[async_trait]
pub trait PostDirectory: Send + Sync {
    /// `None` when the post no longer exists (shared posts can outlive
    /// their source).
    async fn get_post_summary(&self, post_id: Uuid) -> Result<Option<PostSummary>, AppError>;
}
