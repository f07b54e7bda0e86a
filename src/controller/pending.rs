//! Deferred actions
//!
//! A privileged intent captured while nobody is signed in. It is a plain
//! descriptor rather than a closure, so it can be logged, compared, and
//! replayed against whatever session exists when it finally runs.

use super::ActionError;
use crate::api::{CommentId, PostId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingAction {
    LikePost {
        post: PostId,
    },
    LikeComment {
        post: PostId,
        comment: CommentId,
    },
    CreateComment {
        post: PostId,
        parent: Option<CommentId>,
        content: String,
    },
    CreatePost {
        content: String,
    },
}

impl PendingAction {
    /// Reject content that would fail anyway before asking anyone to sign in
    pub fn validate(&self) -> Result<(), ActionError> {
        match self {
            PendingAction::CreateComment { content, .. } => require_content(content, "Comment"),
            PendingAction::CreatePost { content } => require_content(content, "Post"),
            PendingAction::LikePost { .. } | PendingAction::LikeComment { .. } => Ok(()),
        }
    }

    /// Short human description for toasts and logs
    pub fn describe(&self) -> String {
        match self {
            PendingAction::LikePost { post } => format!("like post #{}", post),
            PendingAction::LikeComment { comment, .. } => format!("like comment #{}", comment),
            PendingAction::CreateComment {
                post,
                parent: Some(parent),
                ..
            } => format!("reply to comment #{} on post #{}", parent, post),
            PendingAction::CreateComment { post, .. } => format!("comment on post #{}", post),
            PendingAction::CreatePost { .. } => "publish post".to_string(),
        }
    }

    /// JSON form used in structured log lines
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.describe())
    }
}

/// Trimmed content must be non-empty
pub(crate) fn require_content(content: &str, what: &str) -> Result<(), ActionError> {
    if content.trim().is_empty() {
        return Err(ActionError::ValidationFailed(format!(
            "{} cannot be empty",
            what
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_json_shape() {
        let action = PendingAction::CreateComment {
            post: 3,
            parent: None,
            content: "hi".into(),
        };
        let json: serde_json::Value = serde_json::from_str(&action.to_json()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "create_comment", "post": 3, "parent": null, "content": "hi"})
        );

        let back: PendingAction = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_blank_content_fails_validation() {
        let blank = PendingAction::CreatePost {
            content: " \n\t ".into(),
        };
        assert!(matches!(
            blank.validate(),
            Err(ActionError::ValidationFailed(_))
        ));
        assert!(PendingAction::LikePost { post: 1 }.validate().is_ok());
    }

    #[test]
    fn test_describe() {
        let reply = PendingAction::CreateComment {
            post: 3,
            parent: Some(9),
            content: "x".into(),
        };
        assert_eq!(reply.describe(), "reply to comment #9 on post #3");
        assert_eq!(
            PendingAction::LikeComment { post: 3, comment: 9 }.describe(),
            "like comment #9"
        );
    }
}
