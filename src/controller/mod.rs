//! Interaction controller
//!
//! Owns the session, the pending-action slot, and the optimistic like
//! cache, and mediates every user intent (like, comment, post, delete)
//! against the community API.
//!
//! # Flow
//!
//! ```text
//!  intent ──▶ require_auth ──session?──▶ execute ──▶ API
//!                  │ no                      ▲
//!                  ▼                         │
//!            pending slot ──login──▶ complete_authentication (replay once)
//! ```
//!
//! Likes are optimistic: the counter flips before the request and rolls back
//! from a per-call snapshot on failure. Everything else refetches after a
//! successful mutation instead of predicting server state.

mod auth;
mod error;
mod likes;
mod pending;


pub use auth::{AuthFlow, AuthState};
pub use error::ActionError;
pub use likes::{LikeLedger, LikeState, LikeTicket};
pub use pending::PendingAction;

use crate::api::{
    models::flatten_comments, ApiError, CommentId, CommunityApi, EntityKey, LeaderboardEntry,
    LikeStatus, Post, PostDetail, PostId,
};
use crate::session::{Credential, Login, Role, Session};
use pending::require_content;
use std::sync::Arc;

/// What an executed action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Liked(LikeState),
    Commented,
    Posted,
}

/// Result of routing an intent through [`InteractionController::require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthGate {
    /// A session existed and the action ran immediately
    Executed(ActionOutcome),
    /// The action is parked; the caller should present the sign-in flow
    CredentialRequired,
}

/// First half of a like: the optimistic flip is applied, the request is not
/// yet sent. Carries everything a background task needs to send it.
#[derive(Debug, Clone)]
pub struct LikeRequest {
    pub ticket: LikeTicket,
    pub credential: Credential,
}

pub struct InteractionController {
    api: Arc<dyn CommunityApi>,
    auth: AuthFlow,
    likes: LikeLedger,
    feed: Vec<Post>,
    thread: Option<PostDetail>,
    leaderboard: Vec<LeaderboardEntry>,
}

impl InteractionController {
    pub fn new(api: Arc<dyn CommunityApi>) -> Self {
        Self {
            api,
            auth: AuthFlow::new(),
            likes: LikeLedger::new(),
            feed: Vec::new(),
            thread: None,
            leaderboard: Vec::new(),
        }
    }

    /// Shared handle to the API, for requests run off the event loop
    pub fn api(&self) -> Arc<dyn CommunityApi> {
        Arc::clone(&self.api)
    }

    // ─────────────────────────────────────────────────────────────────────
    // State accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> Option<&Session> {
        self.auth.session()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.auth.pending()
    }

    pub fn feed(&self) -> &[Post] {
        &self.feed
    }

    pub fn thread(&self) -> Option<&PostDetail> {
        self.thread.as_ref()
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// Current (possibly optimistic) like state of an entity
    pub fn like_state(&self, key: EntityKey) -> Option<LikeState> {
        self.likes.get(key)
    }

    pub fn can_delete(&self, post: &Post) -> bool {
        self.session()
            .is_some_and(|s| s.can_delete(&post.author.username))
    }

    fn credential(&self) -> Option<Credential> {
        self.session().map(|s| s.credential.clone())
    }

    fn require_session(&self) -> Result<Credential, ActionError> {
        self.credential().ok_or(ActionError::AuthRequired)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────

    /// Run `action` now if signed in, otherwise park it (replacing any
    /// previously parked action) and ask for credentials
    pub async fn require_auth(&mut self, action: PendingAction) -> Result<AuthGate, ActionError> {
        action.validate()?;

        if self.session().is_some() {
            let outcome = self.execute(action).await?;
            return Ok(AuthGate::Executed(outcome));
        }

        tracing::debug!("Deferring until sign-in: {}", action.to_json());
        if let Some(displaced) = self.auth.defer(action) {
            tracing::info!(
                "Pending action replaced: {} (dropped {})",
                self.auth.pending().map(|a| a.to_json()).unwrap_or_default(),
                displaced.to_json()
            );
        }
        Ok(AuthGate::CredentialRequired)
    }

    /// Install `session`, then replay the pending action (if any) exactly once
    ///
    /// The session is in place before the replay starts, so the replayed
    /// action always sees it.
    pub async fn complete_authentication(
        &mut self,
        session: Session,
    ) -> Result<Option<ActionOutcome>, ActionError> {
        tracing::info!(
            "Signed in as {} ({}, credential {})",
            session.identity,
            session.role.label(),
            session.credential.fingerprint()
        );

        let Some(action) = self.auth.install(session) else {
            return Ok(None);
        };

        tracing::info!("Replaying pending action: {}", action.describe());
        let outcome = self.execute(action).await.inspect_err(|e| {
            tracing::warn!("Pending action failed after sign-in: {}", e);
        })?;
        Ok(Some(outcome))
    }

    /// Open the sign-in flow explicitly (no pending action)
    pub fn begin_sign_in(&mut self) {
        self.auth.begin_sign_in();
    }

    /// Abandon sign-in; the pending action is discarded
    pub fn cancel_authentication(&mut self) -> Option<PendingAction> {
        let discarded = self.auth.cancel();
        if let Some(action) = &discarded {
            tracing::info!("Sign-in cancelled, discarded: {}", action.describe());
        }
        discarded
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.auth.sign_out() {
            tracing::info!("Signed out {}", session.identity);
        }
    }

    /// Verify a username/password pair with `GET /me/` and sign in
    pub async fn login_with_password(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Option<ActionOutcome>, ActionError> {
        if username.trim().is_empty() {
            return Err(ActionError::ValidationFailed(
                "Username cannot be empty".to_string(),
            ));
        }

        let credential = Credential::basic(username.trim(), password);
        let details = self.api.me(&credential).await.map_err(|e| {
            tracing::warn!("Password login failed for {}: {}", username, e);
            if e.is_auth_rejection() {
                ActionError::RequestFailed("Invalid credentials".to_string())
            } else {
                ActionError::from(e)
            }
        })?;

        let session = Session::new(
            details.username,
            Role::from_login(details.is_staff, false),
            credential,
        );
        self.sign_in(session).await
    }

    /// Claim a guest name with `POST /guest-login/` and sign in
    pub async fn login_as_guest(
        &mut self,
        name: &str,
    ) -> Result<Option<ActionOutcome>, ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ActionError::ValidationFailed(
                "Guest name cannot be empty".to_string(),
            ));
        }

        let grant = self.api.guest_login(name).await.map_err(|e| {
            tracing::warn!("Guest login failed for {}: {}", name, e);
            match e.status() {
                // Name taken or reserved; outages and 5xx stay request failures
                Some(400..=499) if !e.is_auth_rejection() => ActionError::ValidationFailed(
                    "Please choose a different name (or this one is protected)".to_string(),
                ),
                _ => ActionError::from(e),
            }
        })?;

        if grant.username != name {
            tracing::info!("Guest name {} was taken, server assigned {}", name, grant.username);
        }

        let session = Session::new(
            grant.username,
            Role::from_login(grant.is_staff, true),
            Credential::from_header(grant.auth_token),
        );
        self.sign_in(session).await
    }

    pub async fn login(&mut self, login: Login) -> Result<Option<ActionOutcome>, ActionError> {
        match login {
            Login::Guest(name) => self.login_as_guest(&name).await,
            Login::Password { user, password } => {
                self.login_with_password(&user, &password).await
            }
        }
    }

    /// Refresh viewer-dependent data as the new identity, then complete
    async fn sign_in(&mut self, session: Session) -> Result<Option<ActionOutcome>, ActionError> {
        let credential = session.credential.clone();
        if let Err(e) = self.reload_feed(Some(&credential)).await {
            tracing::warn!("Feed refresh after sign-in failed: {}", e);
        }
        if let Some(id) = self.thread.as_ref().map(|t| t.post.id) {
            if let Err(e) = self.reload_thread(id, Some(&credential)).await {
                tracing::warn!("Thread refresh after sign-in failed: {}", e);
            }
        }
        self.complete_authentication(session).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Likes
    // ─────────────────────────────────────────────────────────────────────

    /// Apply the optimistic flip for `key` and return the request to send
    pub fn begin_like(&mut self, key: EntityKey) -> Result<LikeRequest, ActionError> {
        let credential = self.require_session()?;
        let ticket = self.likes.toggle(key).ok_or_else(|| {
            ActionError::ValidationFailed(format!("{} is not loaded", key))
        })?;

        tracing::debug!(
            "Optimistic like {}: {:?} -> {:?}",
            key,
            ticket.before,
            ticket.after
        );
        Ok(LikeRequest { ticket, credential })
    }

    /// Reconcile the outcome of a like request with the optimistic state
    pub fn settle_like(
        &mut self,
        ticket: &LikeTicket,
        result: Result<LikeStatus, ApiError>,
    ) -> Result<LikeState, ActionError> {
        match result {
            Ok(status) => {
                if status == LikeStatus::Ignored {
                    tracing::debug!("Server ignored like on {} (already liked)", ticket.key);
                }
                Ok(self.likes.get(ticket.key).unwrap_or(ticket.after))
            }
            // 2xx with an unreadable body: the toggle was applied
            Err(ApiError::Decode(body)) => {
                tracing::warn!("Like on {} applied, response unreadable: {}", ticket.key, body);
                Ok(self.likes.get(ticket.key).unwrap_or(ticket.after))
            }
            Err(e) => {
                let rollback = self.likes.rollback(ticket);
                tracing::warn!("Like on {} failed ({}), rollback: {:?}", ticket.key, e, rollback);
                Err(ActionError::from(e))
            }
        }
    }

    /// Optimistic like/unlike: flip, send, keep on success, roll back on failure
    pub async fn toggle_like(&mut self, key: EntityKey) -> Result<LikeState, ActionError> {
        let request = self.begin_like(key)?;
        let result = self.api.toggle_like(key, &request.credential).await;
        self.settle_like(&request.ticket, result)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Comments and posts
    // ─────────────────────────────────────────────────────────────────────

    /// Post a comment (or reply when `parent` is set), then refetch the tree
    pub async fn submit_comment(
        &mut self,
        post: PostId,
        parent: Option<CommentId>,
        content: &str,
    ) -> Result<(), ActionError> {
        require_content(content, "Comment")?;
        let credential = self.require_session()?;

        self.api
            .create_comment(post, parent, content.trim(), &credential)
            .await
            .inspect_err(|e| tracing::warn!("Failed to comment on post #{}: {}", post, e))?;

        tracing::info!("Comment added to post #{}", post);
        if let Err(e) = self.reload_thread(post, Some(&credential)).await {
            tracing::warn!("Thread refresh after comment failed: {}", e);
        }
        Ok(())
    }

    pub async fn create_post(&mut self, content: &str) -> Result<(), ActionError> {
        require_content(content, "Post")?;
        let credential = self.require_session()?;

        self.api
            .create_post(content.trim(), &credential)
            .await
            .inspect_err(|e| tracing::warn!("Failed to post: {}", e))?;

        tracing::info!("Post published");
        if let Err(e) = self.reload_feed(Some(&credential)).await {
            tracing::warn!("Feed refresh after post failed: {}", e);
        }
        Ok(())
    }

    /// Delete a post; it leaves the local feed only if the server agrees
    pub async fn delete_post(&mut self, post: PostId) -> Result<(), ActionError> {
        let credential = self.require_session()?;

        if let Some(known) = self.feed.iter().find(|p| p.id == post) {
            if !self.can_delete(known) {
                return Err(ActionError::Forbidden(format!(
                    "only {} or an admin can delete post #{}",
                    known.author.username, post
                )));
            }
        }

        self.api
            .delete_post(post, &credential)
            .await
            .inspect_err(|e| tracing::warn!("Failed to delete post #{}: {}", post, e))?;

        tracing::info!("Post #{} deleted", post);
        self.feed.retain(|p| p.id != post);
        self.likes.forget(EntityKey::Post(post));
        if self.thread.as_ref().is_some_and(|t| t.post.id == post) {
            self.thread = None;
        }
        Ok(())
    }

    async fn execute(&mut self, action: PendingAction) -> Result<ActionOutcome, ActionError> {
        match action {
            PendingAction::LikePost { post } => self
                .toggle_like(EntityKey::Post(post))
                .await
                .map(ActionOutcome::Liked),
            PendingAction::LikeComment { comment, .. } => self
                .toggle_like(EntityKey::Comment(comment))
                .await
                .map(ActionOutcome::Liked),
            PendingAction::CreateComment {
                post,
                parent,
                content,
            } => self
                .submit_comment(post, parent, &content)
                .await
                .map(|_| ActionOutcome::Commented),
            PendingAction::CreatePost { content } => self
                .create_post(&content)
                .await
                .map(|_| ActionOutcome::Posted),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    pub async fn load_feed(&mut self) -> Result<(), ActionError> {
        let credential = self.credential();
        self.reload_feed(credential.as_ref()).await
    }

    pub async fn open_thread(&mut self, post: PostId) -> Result<(), ActionError> {
        let credential = self.credential();
        self.reload_thread(post, credential.as_ref()).await
    }

    /// Refetch the open thread; no-op when none is open
    pub async fn refresh_thread(&mut self) -> Result<(), ActionError> {
        match self.thread.as_ref().map(|t| t.post.id) {
            Some(id) => self.open_thread(id).await,
            None => Ok(()),
        }
    }

    pub fn close_thread(&mut self) {
        self.thread = None;
    }

    pub async fn load_leaderboard(&mut self) -> Result<(), ActionError> {
        self.leaderboard = self.api.leaderboard().await?;
        Ok(())
    }

    async fn reload_feed(&mut self, credential: Option<&Credential>) -> Result<(), ActionError> {
        let posts = self.api.list_posts(credential).await?;
        for post in &posts {
            self.likes
                .observe(post.key(), LikeState::new(post.likes_count, post.is_liked));
        }
        tracing::debug!("Feed loaded: {} posts", posts.len());
        self.feed = posts;
        Ok(())
    }

    async fn reload_thread(
        &mut self,
        post: PostId,
        credential: Option<&Credential>,
    ) -> Result<(), ActionError> {
        let detail = self.api.get_post(post, credential).await?;

        self.likes.observe(
            detail.post.key(),
            LikeState::new(detail.post.likes_count, detail.post.is_liked),
        );
        let comments = flatten_comments(&detail.comments);
        for (_, comment) in &comments {
            self.likes.observe(
                comment.key(),
                LikeState::new(comment.likes_count, comment.is_liked),
            );
        }

        tracing::debug!("Thread #{} loaded: {} comments", post, comments.len());
        self.thread = Some(detail);
        Ok(())
    }
}
