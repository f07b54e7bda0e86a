// TUI application state
//
// Holds the interaction controller plus everything that only exists on
// screen: current view, cursor positions, the open modal and the toast.
// Key handlers in mod.rs translate keys into the intent methods here.

use super::components::Toast;
use super::input::InputHandler;
use super::modal::{ComposeTarget, Modal};
use super::theme::Theme;
use crate::api::{flatten_comments, ApiError, Comment, CommentId, EntityKey, LikeStatus, Post, PostId};
use crate::controller::{
    ActionError, ActionOutcome, AuthGate, InteractionController, LikeRequest, LikeTicket,
    PendingAction,
};
use crate::logging::LogBuffer;
use crate::session::Login;
use crossterm::event::KeyCode;
use tokio::sync::mpsc;

/// A like request finished off the event loop
#[derive(Debug)]
pub struct LikeCompletion {
    pub ticket: LikeTicket,
    pub result: Result<LikeStatus, ApiError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Thread,
}

/// What the cursor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Post(PostId),
    Comment { post: PostId, comment: CommentId },
}

const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];

pub struct App {
    pub ctl: InteractionController,
    pub view: View,
    pub feed_selected: usize,
    /// 0 is the post itself, n is the n-th flattened comment
    pub thread_selected: usize,
    pub modal: Option<Modal>,
    pub toast: Option<Toast>,
    pub log_buffer: LogBuffer,
    pub theme: Theme,
    pub should_quit: bool,
    /// Like requests sent but not yet settled
    pub likes_in_flight: usize,
    frame: usize,
    input_handler: InputHandler,
    like_tx: mpsc::Sender<LikeCompletion>,
}

fn failure_label(action: &PendingAction) -> &'static str {
    match action {
        PendingAction::LikePost { .. } | PendingAction::LikeComment { .. } => "Like failed",
        PendingAction::CreateComment { .. } => "Failed to comment",
        PendingAction::CreatePost { .. } => "Failed to post",
    }
}

/// Error text without the category prefix, for inline form errors
fn short_message(e: &ActionError) -> String {
    match e {
        ActionError::RequestFailed(m)
        | ActionError::ValidationFailed(m)
        | ActionError::Forbidden(m) => m.clone(),
        ActionError::AuthRequired => e.to_string(),
    }
}

impl App {
    pub fn new(
        ctl: InteractionController,
        log_buffer: LogBuffer,
        theme: Theme,
        like_tx: mpsc::Sender<LikeCompletion>,
    ) -> Self {
        Self {
            ctl,
            view: View::Feed,
            feed_selected: 0,
            thread_selected: 0,
            modal: None,
            toast: None,
            log_buffer,
            theme,
            should_quit: false,
            likes_in_flight: 0,
            frame: 0,
            input_handler: InputHandler::default(),
            like_tx,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input and animation
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Failure notice: error border, stays up longer
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::error(message));
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    /// Spinner frame while likes are in flight
    pub fn spinner_char(&self) -> Option<char> {
        (self.likes_in_flight > 0).then(|| SPINNER[self.frame % SPINNER.len()])
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    pub fn thread_rows(&self) -> Vec<(usize, &Comment)> {
        self.ctl
            .thread()
            .map(|t| flatten_comments(&t.comments))
            .unwrap_or_default()
    }

    fn row_count(&self) -> usize {
        match self.view {
            View::Feed => self.ctl.feed().len(),
            View::Thread => self.ctl.thread().map_or(0, |t| 1 + flatten_comments(&t.comments).len()),
        }
    }

    pub fn selected(&self) -> Option<Selection> {
        match self.view {
            View::Feed => self
                .ctl
                .feed()
                .get(self.feed_selected)
                .map(|p| Selection::Post(p.id)),
            View::Thread => {
                let thread = self.ctl.thread()?;
                match self.thread_selected {
                    0 => Some(Selection::Post(thread.post.id)),
                    n => flatten_comments(&thread.comments)
                        .get(n - 1)
                        .map(|(_, c)| Selection::Comment {
                            post: thread.post.id,
                            comment: c.id,
                        }),
                }
            }
        }
    }

    pub fn selected_post(&self) -> Option<&Post> {
        match self.view {
            View::Feed => self.ctl.feed().get(self.feed_selected),
            View::Thread => self.ctl.thread().map(|t| &t.post),
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let last = self.row_count().saturating_sub(1);
        let cursor = match self.view {
            View::Feed => &mut self.feed_selected,
            View::Thread => &mut self.thread_selected,
        };
        *cursor = cursor.saturating_add_signed(delta).min(last);
    }

    fn clamp_selection(&mut self) {
        self.move_selection(0);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation and reads
    // ─────────────────────────────────────────────────────────────────────

    pub async fn refresh(&mut self) {
        if let Err(e) = self.ctl.load_feed().await {
            self.show_error(format!("Failed to load feed: {}", short_message(&e)));
        }
        if let Err(e) = self.ctl.load_leaderboard().await {
            tracing::warn!("Leaderboard refresh failed: {}", e);
        }
        if self.view == View::Thread {
            if let Err(e) = self.ctl.refresh_thread().await {
                self.show_error(format!("Failed to load post: {}", short_message(&e)));
            }
        }
        self.clamp_selection();
    }

    pub async fn open_selected(&mut self) {
        if self.view != View::Feed {
            return;
        }
        let Some(id) = self.selected_post().map(|p| p.id) else {
            return;
        };
        match self.ctl.open_thread(id).await {
            Ok(()) => {
                self.view = View::Thread;
                self.thread_selected = 0;
            }
            Err(e) => self.show_error(format!("Failed to load post: {}", short_message(&e))),
        }
    }

    pub fn back(&mut self) {
        if self.view == View::Thread {
            self.ctl.close_thread();
            self.view = View::Feed;
            self.clamp_selection();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Intents
    // ─────────────────────────────────────────────────────────────────────

    /// Route a privileged action through the controller's auth gate
    pub async fn intent(&mut self, action: PendingAction) {
        let label = failure_label(&action);
        let prompt = action.describe();
        match self.ctl.require_auth(action).await {
            Ok(AuthGate::Executed(outcome)) => self.report(outcome),
            Ok(AuthGate::CredentialRequired) => {
                self.modal = Some(Modal::sign_in(Some(prompt)));
            }
            Err(e) => self.show_error(format!("{}: {}", label, short_message(&e))),
        }
    }

    fn report(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::Liked(_) => {}
            ActionOutcome::Commented => self.show_toast("Comment posted"),
            ActionOutcome::Posted => {
                self.show_toast("Post published");
                self.feed_selected = 0;
            }
        }
    }

    /// Like the selection: optimistic flip now, request in the background
    pub async fn like_selected(&mut self) {
        let Some(selection) = self.selected() else {
            return;
        };
        let (key, action) = match selection {
            Selection::Post(post) => (EntityKey::Post(post), PendingAction::LikePost { post }),
            Selection::Comment { post, comment } => (
                EntityKey::Comment(comment),
                PendingAction::LikeComment { post, comment },
            ),
        };

        if self.ctl.session().is_none() {
            self.intent(action).await;
            return;
        }
        match self.ctl.begin_like(key) {
            Ok(request) => self.spawn_like(request),
            Err(e) => self.show_error(format!("Like failed: {}", short_message(&e))),
        }
    }

    fn spawn_like(&mut self, request: LikeRequest) {
        self.likes_in_flight += 1;
        let api = self.ctl.api();
        let tx = self.like_tx.clone();
        tokio::spawn(async move {
            let LikeRequest { ticket, credential } = request;
            let result = api.toggle_like(ticket.key, &credential).await;
            // Receiver gone means the UI is shutting down
            let _ = tx.send(LikeCompletion { ticket, result }).await;
        });
    }

    pub fn settle_like(&mut self, done: LikeCompletion) {
        self.likes_in_flight = self.likes_in_flight.saturating_sub(1);
        if let Err(e) = self.ctl.settle_like(&done.ticket, done.result) {
            self.show_error(format!("Like failed: {}", short_message(&e)));
        }
    }

    pub fn compose_post(&mut self) {
        self.modal = Some(Modal::compose(ComposeTarget::Post));
    }

    /// Comment on the open post, or reply when a comment is selected
    pub fn compose_comment(&mut self) {
        let target = match self.selected() {
            Some(Selection::Post(post)) if self.view == View::Thread => ComposeTarget::Comment {
                post,
                parent: None,
                replying_to: None,
            },
            Some(Selection::Comment { post, comment }) => {
                let author = self
                    .thread_rows()
                    .iter()
                    .find(|(_, c)| c.id == comment)
                    .map(|(_, c)| c.author.username.clone());
                ComposeTarget::Comment {
                    post,
                    parent: Some(comment),
                    replying_to: author,
                }
            }
            _ => {
                self.show_toast("Open a post to comment");
                return;
            }
        };
        self.modal = Some(Modal::compose(target));
    }

    pub async fn submit_compose(&mut self, target: ComposeTarget, text: String) {
        let action = match target {
            ComposeTarget::Post => PendingAction::CreatePost { content: text },
            ComposeTarget::Comment { post, parent, .. } => PendingAction::CreateComment {
                post,
                parent,
                content: text,
            },
        };
        if let Err(e) = action.validate() {
            if let Some(modal) = &mut self.modal {
                modal.set_error(short_message(&e));
            }
            return;
        }
        self.modal = None;
        self.intent(action).await;
    }

    pub fn request_delete(&mut self) {
        let Some(post) = self.selected_post() else {
            return;
        };
        let id = post.id;
        if self.ctl.session().is_none() {
            self.show_toast("Sign in to delete posts");
        } else if !self.ctl.can_delete(post) {
            self.show_error("Only the author or an admin can delete this post");
        } else {
            self.modal = Some(Modal::ConfirmDelete(id));
        }
    }

    pub async fn confirm_delete(&mut self, post: PostId) {
        self.modal = None;
        match self.ctl.delete_post(post).await {
            Ok(()) => {
                self.show_toast("Post deleted");
                if self.view == View::Thread && self.ctl.thread().is_none() {
                    self.view = View::Feed;
                }
                self.clamp_selection();
            }
            Err(e) => self.show_error(format!("Failed to delete: {}", short_message(&e))),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────

    pub fn begin_sign_in(&mut self) {
        if let Some(session) = self.ctl.session() {
            let message = format!("Already signed in as {}", session.identity);
            self.show_toast(message);
            return;
        }
        self.ctl.begin_sign_in();
        self.modal = Some(Modal::sign_in(None));
    }

    pub async fn submit_sign_in(&mut self, login: Login) {
        match self.ctl.login(login).await {
            Ok(outcome) => {
                self.modal = None;
                if let Some(session) = self.ctl.session() {
                    let message = format!("Signed in as {}", session.identity);
                    self.show_toast(message);
                }
                if let Some(outcome) = outcome {
                    self.report(outcome);
                }
                if let Err(e) = self.ctl.load_leaderboard().await {
                    tracing::warn!("Leaderboard refresh failed: {}", e);
                }
            }
            // Signed in, but the replayed action failed
            Err(e) if self.ctl.session().is_some() => {
                self.modal = None;
                self.show_error(format!("Signed in, but: {}", short_message(&e)));
            }
            Err(e) => {
                if let Some(modal) = &mut self.modal {
                    modal.set_error(short_message(&e));
                }
            }
        }
        self.clamp_selection();
    }

    pub fn cancel_sign_in(&mut self) {
        self.modal = None;
        if let Some(action) = self.ctl.cancel_authentication() {
            self.show_toast(format!("Cancelled: {}", action.describe()));
        }
    }

    pub async fn sign_out(&mut self) {
        if self.ctl.session().is_none() {
            return;
        }
        self.ctl.logout();
        self.show_toast("Signed out");
        self.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{comment, post, FakeApi};
    use crate::controller::{AuthState, LikeState};
    use std::sync::Arc;

    async fn app_with(
        posts: Vec<Post>,
    ) -> (Arc<FakeApi>, App, mpsc::Receiver<LikeCompletion>) {
        let api = Arc::new(FakeApi::with_posts(posts));
        let (tx, rx) = mpsc::channel(16);
        let mut app = App::new(
            InteractionController::new(api.clone()),
            LogBuffer::new(),
            Theme::dark(),
            tx,
        );
        app.refresh().await;
        (api, app, rx)
    }

    #[tokio::test]
    async fn test_anonymous_like_opens_sign_in_then_replays() {
        let (api, mut app, _rx) = app_with(vec![post(1, "bo", 3, false)]).await;

        app.like_selected().await;
        assert!(matches!(app.modal, Some(Modal::SignIn(_))));
        assert_eq!(app.ctl.auth_state(), AuthState::AwaitingCredential);

        app.submit_sign_in(Login::Guest("ana".into())).await;

        assert!(app.modal.is_none());
        assert_eq!(
            app.ctl.like_state(EntityKey::Post(1)),
            Some(LikeState::new(4, true))
        );
        assert_eq!(
            api.calls().iter().filter(|c| c.starts_with("like")).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_signed_in_like_settles_over_channel() {
        let (api, mut app, mut rx) = app_with(vec![post(1, "bo", 3, false)]).await;
        app.submit_sign_in(Login::Guest("ana".into())).await;
        api.fail("like");

        app.like_selected().await;
        assert_eq!(app.likes_in_flight, 1);
        assert_eq!(
            app.ctl.like_state(EntityKey::Post(1)),
            Some(LikeState::new(4, true))
        );

        let done = rx.recv().await.unwrap();
        app.settle_like(done);

        assert_eq!(app.likes_in_flight, 0);
        assert_eq!(
            app.ctl.like_state(EntityKey::Post(1)),
            Some(LikeState::new(3, false))
        );
        assert!(app.toast.as_ref().unwrap().message.starts_with("Like failed"));
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_modal_with_error() {
        let (api, mut app, _rx) = app_with(vec![]).await;
        api.fail_with("guest_login", 400);
        app.begin_sign_in();

        app.submit_sign_in(Login::Guest("admin".into())).await;

        let Some(Modal::SignIn(form)) = &app.modal else {
            panic!("sign-in modal should stay open");
        };
        assert_eq!(
            form.error.as_deref(),
            Some("Please choose a different name (or this one is protected)")
        );
    }

    #[tokio::test]
    async fn test_cancel_sign_in_discards_action() {
        let (api, mut app, _rx) = app_with(vec![]).await;
        app.compose_post();
        app.submit_compose(ComposeTarget::Post, "hello".into()).await;
        assert!(matches!(app.modal, Some(Modal::SignIn(_))));

        app.cancel_sign_in();

        assert!(app.modal.is_none());
        assert!(app.ctl.pending().is_none());
        assert_eq!(app.toast.as_ref().unwrap().message, "Cancelled: publish post");
        assert!(!api.calls().iter().any(|c| c.starts_with("create_post")));
    }

    #[tokio::test]
    async fn test_blank_compose_keeps_modal_open() {
        let (api, mut app, _rx) = app_with(vec![]).await;
        app.compose_post();
        let calls_before = api.calls().len();

        app.submit_compose(ComposeTarget::Post, "   ".into()).await;

        let Some(Modal::Compose(form)) = &app.modal else {
            panic!("compose modal should stay open");
        };
        assert_eq!(form.error.as_deref(), Some("Post cannot be empty"));
        assert_eq!(api.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_thread_navigation_and_reply_target() {
        let (api, mut app, _rx) = app_with(vec![post(1, "bo", 0, false)]).await;
        api.set_comments(1, vec![comment(10, "cy", vec![comment(11, "dee", vec![])])]);

        app.open_selected().await;
        assert_eq!(app.view, View::Thread);

        app.move_selection(5);
        assert_eq!(
            app.selected(),
            Some(Selection::Comment {
                post: 1,
                comment: 11
            })
        );

        app.compose_comment();
        let Some(Modal::Compose(form)) = &app.modal else {
            panic!("compose modal");
        };
        assert_eq!(
            form.target,
            ComposeTarget::Comment {
                post: 1,
                parent: Some(11),
                replying_to: Some("dee".into()),
            }
        );

        app.back();
        assert_eq!(app.view, View::Feed);
        assert!(app.ctl.thread().is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_permission() {
        let (_api, mut app, _rx) = app_with(vec![post(1, "bo", 0, false)]).await;
        app.submit_sign_in(Login::Guest("ana".into())).await;

        app.request_delete();
        assert!(app.modal.is_none());
        assert_eq!(
            app.toast.as_ref().unwrap().message,
            "Only the author or an admin can delete this post"
        );
    }
}
