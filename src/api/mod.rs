//! Community API access
//!
//! The controller talks to the server only through [`CommunityApi`], so the
//! HTTP client can be swapped for an in-memory fake in tests.
//!
//! ```text
//! InteractionController ──▶ Arc<dyn CommunityApi>
//!                               ├── HttpApi (reqwest, production)
//!                               └── test fakes
//! ```

mod client;
mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod fake;

pub use client::HttpApi;
pub use error::ApiError;
pub use models::{
    flatten_comments, Comment, CommentId, EntityKey, GuestGrant, LeaderboardEntry, LikeStatus,
    Post, PostDetail, PostId, UserDetails,
};

use crate::session::Credential;
use async_trait::async_trait;

/// The REST surface the client depends on
///
/// Reads take an optional credential so viewer-specific fields (`is_liked`)
/// reflect the signed-in user. Mutations require one.
#[async_trait]
pub trait CommunityApi: Send + Sync {
    /// `GET /posts/`
    async fn list_posts(&self, credential: Option<&Credential>) -> Result<Vec<Post>, ApiError>;

    /// `GET /posts/{id}/`
    async fn get_post(
        &self,
        id: PostId,
        credential: Option<&Credential>,
    ) -> Result<PostDetail, ApiError>;

    /// `POST /posts/`
    async fn create_post(&self, content: &str, credential: &Credential) -> Result<(), ApiError>;

    /// `DELETE /posts/{id}/`
    async fn delete_post(&self, id: PostId, credential: &Credential) -> Result<(), ApiError>;

    /// `POST /posts/{id}/like/` or `POST /comments/{id}/like/`
    async fn toggle_like(
        &self,
        target: EntityKey,
        credential: &Credential,
    ) -> Result<LikeStatus, ApiError>;

    /// `POST /posts/{id}/comments/`
    async fn create_comment(
        &self,
        post: PostId,
        parent: Option<CommentId>,
        content: &str,
        credential: &Credential,
    ) -> Result<(), ApiError>;

    /// `GET /leaderboard/`
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;

    /// `GET /me/` - verifies a Basic credential
    async fn me(&self, credential: &Credential) -> Result<UserDetails, ApiError>;

    /// `POST /guest-login/`
    async fn guest_login(&self, username: &str) -> Result<GuestGrant, ApiError>;
}
