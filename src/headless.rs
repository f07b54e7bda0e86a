// Headless mode - one-shot commands against the community API
//
// Write commands go through the same deferred path as the TUI: the action
// is handed to require_auth while anonymous (so it is parked), then the
// sign-in replays it.

use crate::api::{flatten_comments, CommunityApi, HttpApi, LeaderboardEntry, Post, PostDetail};
use crate::cli::Commands;
use crate::config::Config;
use crate::controller::{
    ActionError, ActionOutcome, AuthGate, InteractionController, PendingAction,
};
use crate::session::Login;
use anyhow::{anyhow, Result};
use std::fmt::Write;
use std::sync::Arc;

pub async fn run(config: &Config, command: Commands) -> Result<()> {
    let api: Arc<dyn CommunityApi> =
        Arc::new(HttpApi::new(&config.api_url, config.request_timeout())?);
    let mut ctl = InteractionController::new(api);

    match command {
        Commands::Feed => {
            ctl.load_feed().await?;
            print!("{}", render_feed(ctl.feed()));
        }
        Commands::Thread { id } => {
            ctl.open_thread(id).await?;
            if let Some(thread) = ctl.thread() {
                print!("{}", render_thread(thread));
            }
        }
        Commands::Leaderboard => {
            ctl.load_leaderboard().await?;
            print!("{}", render_leaderboard(ctl.leaderboard()));
        }
        Commands::Post { content, sign_in } => {
            let outcome =
                deferred(&mut ctl, PendingAction::CreatePost { content }, sign_in.resolve()?)
                    .await?;
            report(outcome);
        }
        Commands::Like {
            post,
            comment,
            sign_in,
        } => {
            let action = match comment {
                Some(comment) => {
                    ctl.open_thread(post).await?;
                    PendingAction::LikeComment { post, comment }
                }
                None => {
                    ctl.load_feed().await?;
                    PendingAction::LikePost { post }
                }
            };
            let outcome = deferred(&mut ctl, action, sign_in.resolve()?).await?;
            report(outcome);
        }
        Commands::Comment {
            post,
            content,
            parent,
            sign_in,
        } => {
            let action = PendingAction::CreateComment {
                post,
                parent,
                content,
            };
            let outcome = deferred(&mut ctl, action, sign_in.resolve()?).await?;
            report(outcome);
            if let Some(thread) = ctl.thread() {
                print!("{}", render_thread(thread));
            }
        }
        Commands::Delete { post, sign_in } => {
            ctl.login(sign_in.resolve()?).await?;
            ctl.delete_post(post).await?;
            println!("Deleted post #{}", post);
        }
        Commands::Config { .. } => {
            return Err(anyhow!("config is handled before headless dispatch"));
        }
    }
    Ok(())
}

/// Park `action`, sign in, and return what the replay produced
async fn deferred(
    ctl: &mut InteractionController,
    action: PendingAction,
    login: Login,
) -> Result<ActionOutcome, ActionError> {
    match ctl.require_auth(action).await? {
        AuthGate::Executed(outcome) => Ok(outcome),
        AuthGate::CredentialRequired => ctl.login(login).await?.ok_or_else(|| {
            ActionError::RequestFailed("signed in but nothing was replayed".to_string())
        }),
    }
}

fn report(outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::Liked(state) => println!(
            "{} ({} like{})",
            if state.liked { "Liked" } else { "Unliked" },
            state.count,
            if state.count == 1 { "" } else { "s" }
        ),
        ActionOutcome::Commented => println!("Comment posted"),
        ActionOutcome::Posted => println!("Post published"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain-text rendering
// ─────────────────────────────────────────────────────────────────────────────

fn heart(liked: bool) -> &'static str {
    if liked {
        "♥"
    } else {
        "♡"
    }
}

pub fn render_feed(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts yet.\n".to_string();
    }
    let mut out = String::new();
    for post in posts {
        let _ = writeln!(
            out,
            "#{:<5} {} · {}  {} {}",
            post.id,
            post.author.username,
            post.created_at.format("%Y-%m-%d %H:%M"),
            heart(post.is_liked),
            post.likes_count
        );
        let _ = writeln!(out, "       {}", post.content);
    }
    out
}

pub fn render_thread(thread: &PostDetail) -> String {
    let mut out = render_feed(std::slice::from_ref(&thread.post));
    let comments = flatten_comments(&thread.comments);
    if comments.is_empty() {
        out.push_str("       (no comments)\n");
        return out;
    }
    for (depth, comment) in comments {
        let indent = "  ".repeat(depth + 3);
        let _ = writeln!(
            out,
            "{}[{}] {}: {}  {} {}",
            indent,
            comment.id,
            comment.author.username,
            comment.content,
            heart(comment.is_liked),
            comment.likes_count
        );
    }
    out
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No activity yet.\n".to_string();
    }
    let mut out = String::from("Daily Top 5\n");
    for (rank, entry) in entries.iter().take(5).enumerate() {
        let _ = writeln!(out, "{}. {:<20} {} karma", rank + 1, entry.username, entry.karma);
    }
    out
}
