// Modal system for TUI overlays
//
// Self-contained dialogs that own their form state, handle their own input
// and return actions. App holds Option<Modal>; the event loop acts on the
// returned ModalAction.

use crate::api::{CommentId, PostId};
use crate::session::Login;
use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    Close,
    /// Abandon sign-in (discards any pending action)
    CancelSignIn,
    SignIn(Login),
    Submit(ComposeTarget, String),
    Delete(PostId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInField {
    Guest,
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub guest_name: String,
    pub username: String,
    pub password: String,
    focus: Option<SignInField>,
    /// What will happen after sign-in, when an action is waiting
    pub prompt: Option<String>,
    pub error: Option<String>,
}

impl SignInForm {
    pub fn new(prompt: Option<String>) -> Self {
        Self {
            prompt,
            ..Self::default()
        }
    }

    pub fn focus(&self) -> SignInField {
        self.focus.unwrap_or(SignInField::Guest)
    }

    pub fn is_guest_mode(&self) -> bool {
        self.focus() == SignInField::Guest
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus() {
            SignInField::Guest => &mut self.guest_name,
            SignInField::Username => &mut self.username,
            SignInField::Password => &mut self.password,
        }
    }

    fn cycle(&mut self) {
        self.focus = Some(match self.focus() {
            SignInField::Guest => SignInField::Username,
            SignInField::Username => SignInField::Password,
            SignInField::Password => SignInField::Guest,
        });
    }

    fn login(&self) -> Login {
        if self.is_guest_mode() {
            Login::Guest(self.guest_name.clone())
        } else {
            Login::Password {
                user: self.username.clone(),
                password: self.password.clone(),
            }
        }
    }
}

/// Where composed text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeTarget {
    Post,
    Comment {
        post: PostId,
        parent: Option<CommentId>,
        /// Author being replied to, for the dialog title
        replying_to: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ComposeForm {
    pub target: ComposeTarget,
    pub text: String,
    pub error: Option<String>,
}

impl ComposeForm {
    pub fn title(&self) -> String {
        match &self.target {
            ComposeTarget::Post => " New post ".to_string(),
            ComposeTarget::Comment {
                replying_to: Some(who),
                ..
            } => format!(" Reply to {} ", who),
            ComposeTarget::Comment { post, .. } => format!(" Comment on #{} ", post),
        }
    }
}

/// Available modal types
#[derive(Debug, Clone)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    SignIn(SignInForm),
    Compose(ComposeForm),
    ConfirmDelete(PostId),
}

impl Modal {
    pub fn sign_in(prompt: Option<String>) -> Self {
        Modal::SignIn(SignInForm::new(prompt))
    }

    pub fn compose(target: ComposeTarget) -> Self {
        Modal::Compose(ComposeForm {
            target,
            text: String::new(),
            error: None,
        })
    }

    /// Show an error inside a form modal; other modals ignore it
    pub fn set_error(&mut self, message: impl Into<String>) {
        match self {
            Modal::SignIn(form) => form.error = Some(message.into()),
            Modal::Compose(form) => form.error = Some(message.into()),
            Modal::Help | Modal::ConfirmDelete(_) => {}
        }
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::ConfirmDelete(id) => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    ModalAction::Delete(*id)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::SignIn(form) => match key {
                KeyCode::Esc => ModalAction::CancelSignIn,
                KeyCode::Tab => {
                    form.cycle();
                    form.error = None;
                    ModalAction::None
                }
                KeyCode::Enter => ModalAction::SignIn(form.login()),
                KeyCode::Backspace => {
                    form.field_mut().pop();
                    ModalAction::None
                }
                KeyCode::Char(c) => {
                    form.field_mut().push(c);
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
            Modal::Compose(form) => match key {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => ModalAction::Submit(form.target.clone(), form.text.clone()),
                KeyCode::Backspace => {
                    form.text.pop();
                    ModalAction::None
                }
                KeyCode::Char(c) => {
                    form.text.push(c);
                    form.error = None;
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
        }
    }
}
