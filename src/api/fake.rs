//! In-memory [`CommunityApi`] for tests
//!
//! Records every call as a short string and fails the operations named in
//! `fail` with the given status. Created posts and comments are stored so
//! refetches see them.

use super::models::{
    Author, Comment, CommentId, EntityKey, GuestGrant, LeaderboardEntry, LikeStatus, Post,
    PostDetail, PostId, UserDetails,
};
use super::{ApiError, CommunityApi};
use crate::session::Credential;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeState {
    pub posts: Vec<PostDetail>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub calls: Vec<String>,
    /// Operation name to the status it fails with
    pub fail: HashMap<&'static str, u16>,
    /// (username, password, is_staff) accepted by `me`
    pub accounts: Vec<(String, String, bool)>,
    next_id: u64,
}

#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

pub fn author(id: u64, username: &str) -> Author {
    Author {
        id,
        username: username.to_string(),
        is_staff: false,
    }
}

pub fn post(id: PostId, by: &str, likes: u32, liked: bool) -> Post {
    Post {
        id,
        author: author(id, by),
        content: format!("post {}", id),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        likes_count: likes,
        is_liked: liked,
    }
}

pub fn comment(id: CommentId, by: &str, replies: Vec<Comment>) -> Comment {
    Comment {
        id,
        author: author(id, by),
        content: format!("comment {}", id),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
        parent: None,
        likes_count: 0,
        is_liked: false,
        replies,
    }
}

impl FakeApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.next_id = 100;
            state.posts = posts
                .into_iter()
                .map(|post| PostDetail {
                    post,
                    comments: Vec::new(),
                })
                .collect();
        }
        api
    }

    pub fn fail(&self, op: &'static str) {
        self.fail_with(op, 401);
    }

    pub fn fail_with(&self, op: &'static str, status: u16) {
        self.state.lock().unwrap().fail.insert(op, status);
    }

    pub fn succeed(&self, op: &'static str) {
        self.state.lock().unwrap().fail.remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn add_account(&self, username: &str, password: &str, is_staff: bool) {
        self.state.lock().unwrap().accounts.push((
            username.to_string(),
            password.to_string(),
            is_staff,
        ));
    }

    pub fn set_comments(&self, post: PostId, comments: Vec<Comment>) {
        let mut state = self.state.lock().unwrap();
        if let Some(detail) = state.posts.iter_mut().find(|d| d.post.id == post) {
            detail.comments = comments;
        }
    }

    fn record(&self, op: &'static str, call: String) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(&status) = state.fail.get(op) {
            return Err(ApiError::Status {
                status,
                body: format!("{} rejected", op),
            });
        }
        Ok(())
    }
}

fn auth_tag(credential: Option<&Credential>) -> &'static str {
    if credential.is_some() {
        "auth"
    } else {
        "anon"
    }
}

#[async_trait]
impl CommunityApi for FakeApi {
    async fn list_posts(&self, credential: Option<&Credential>) -> Result<Vec<Post>, ApiError> {
        self.record("list", format!("list {}", auth_tag(credential)))?;
        let state = self.state.lock().unwrap();
        Ok(state.posts.iter().map(|d| d.post.clone()).collect())
    }

    async fn get_post(
        &self,
        id: PostId,
        credential: Option<&Credential>,
    ) -> Result<PostDetail, ApiError> {
        self.record("get_post", format!("get_post {} {}", id, auth_tag(credential)))?;
        let state = self.state.lock().unwrap();
        state
            .posts
            .iter()
            .find(|d| d.post.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "Not found".into(),
            })
    }

    async fn create_post(&self, content: &str, _credential: &Credential) -> Result<(), ApiError> {
        self.record("create_post", format!("create_post {}", content))?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let mut created = post(id, "someone", 0, false);
        created.content = content.to_string();
        state.posts.insert(
            0,
            PostDetail {
                post: created,
                comments: Vec::new(),
            },
        );
        Ok(())
    }

    async fn delete_post(&self, id: PostId, _credential: &Credential) -> Result<(), ApiError> {
        self.record("delete", format!("delete {}", id))?;
        self.state.lock().unwrap().posts.retain(|d| d.post.id != id);
        Ok(())
    }

    async fn toggle_like(
        &self,
        target: EntityKey,
        _credential: &Credential,
    ) -> Result<LikeStatus, ApiError> {
        self.record("like", format!("like {}", target))?;
        Ok(LikeStatus::Liked)
    }

    async fn create_comment(
        &self,
        post: PostId,
        parent: Option<CommentId>,
        content: &str,
        _credential: &Credential,
    ) -> Result<(), ApiError> {
        self.record(
            "comment",
            format!("comment {} {:?} {}", post, parent, content),
        )?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let mut created = comment(state.next_id, "someone", Vec::new());
        created.content = content.to_string();
        created.parent = parent;
        if let Some(detail) = state.posts.iter_mut().find(|d| d.post.id == post) {
            detail.comments.push(created);
        }
        Ok(())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.record("leaderboard", "leaderboard".to_string())?;
        Ok(self.state.lock().unwrap().leaderboard.clone())
    }

    async fn me(&self, credential: &Credential) -> Result<UserDetails, ApiError> {
        self.record("me", "me".to_string())?;
        let state = self.state.lock().unwrap();
        state
            .accounts
            .iter()
            .find(|(user, pass, _)| Credential::basic(user, pass) == *credential)
            .map(|(user, _, is_staff)| UserDetails {
                username: user.clone(),
                is_staff: *is_staff,
            })
            .ok_or(ApiError::Status {
                status: 401,
                body: "Invalid username/password.".into(),
            })
    }

    async fn guest_login(&self, username: &str) -> Result<GuestGrant, ApiError> {
        self.record("guest_login", format!("guest_login {}", username))?;
        Ok(GuestGrant {
            username: username.to_string(),
            is_staff: false,
            auth_token: Credential::basic(username, "guest").header_value().to_string(),
        })
    }
}
