//! Wire models for the community API
//!
//! These mirror the JSON the server sends. Counters and viewer flags default
//! when absent because anonymous listings omit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type PostId = u64;
pub type CommentId = u64;

/// Something that can be liked, keyed the way the optimistic cache keys it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityKey {
    Post(PostId),
    Comment(CommentId),
}

impl EntityKey {
    /// Path of the like/unlike toggle endpoint for this entity
    pub fn like_path(&self) -> String {
        match self {
            EntityKey::Post(id) => format!("/posts/{}/like/", id),
            EntityKey::Comment(id) => format!("/comments/{}/like/", id),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Post(id) => write!(f, "post#{}", id),
            EntityKey::Comment(id) => write!(f, "comment#{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
}

impl Post {
    pub fn key(&self) -> EntityKey {
        EntityKey::Post(self.id)
    }
}

/// Post detail: the post plus its root comments, each carrying its replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub parent: Option<CommentId>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn key(&self) -> EntityKey {
        EntityKey::Comment(self.id)
    }
}

/// Depth-first walk of a comment forest, yielding `(depth, comment)` in
/// display order (a comment, then its replies, then its next sibling)
pub fn flatten_comments(roots: &[Comment]) -> Vec<(usize, &Comment)> {
    fn walk<'a>(nodes: &'a [Comment], depth: usize, out: &mut Vec<(usize, &'a Comment)>) {
        for node in nodes {
            out.push((depth, node));
            walk(&node.replies, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(roots, 0, &mut out);
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub karma: i64,
    #[serde(default)]
    pub post_likes: Option<u32>,
    #[serde(default)]
    pub comment_likes: Option<u32>,
}

/// Identity returned by `GET /me/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDetails {
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
}

/// Response of `POST /guest-login/`; `auth_token` is a full header value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuestGrant {
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    pub auth_token: String,
}

/// What the server says a like toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeStatus {
    Liked,
    Unliked,
    /// Duplicate like caught by the server's uniqueness constraint
    Ignored,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LikeResponse {
    pub status: LikeStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPost<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewComment<'a> {
    pub content: &'a str,
    pub parent: Option<CommentId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GuestLoginRequest<'a> {
    pub username: &'a str,
}
