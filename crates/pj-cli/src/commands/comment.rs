//! Comment command
//!
//! Add, like and show comments on a stored post.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pj_core::comment::{CommentEngine, CommentForest};
use pj_core::error::PandajeonError;
use pj_core::store::{apply_with_retry, ForestStore};
use pj_core::types::{ClockIds, CommentId, PostId};
use pj_storage::FileForestStore;

use super::AppContext;

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Add a comment, or a reply with --parent
    Add(AddArgs),

    /// Toggle your like on a comment or reply
    Like {
        /// Comment ID
        id: u64,

        /// Post the comment belongs to
        #[arg(long)]
        post: u64,
    },

    /// Show the comment tree of a post
    Show {
        /// Post to show
        #[arg(long)]
        post: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for adding a comment
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Comment text
    pub content: String,

    /// Display name
    #[arg(long, short, env = "PANDAJEON_AUTHOR", default_value = "익명 판다")]
    pub author: String,

    /// Reply to this comment
    #[arg(long)]
    pub parent: Option<u64>,

    /// Post to comment on
    #[arg(long)]
    pub post: u64,
}

/// Execute the comment command
pub fn execute(ctx: &AppContext, cmd: CommentCommand) -> Result<()> {
    let store = ctx.store()?;

    match cmd {
        CommentCommand::Add(args) => {
            ensure_post(&store, PostId(args.post))?;
            add_comment(ctx, &store, args)
        }
        CommentCommand::Like { id, post } => {
            ensure_post(&store, PostId(post))?;
            like_comment(ctx, &store, PostId(post), CommentId(id))
        }
        CommentCommand::Show { post, json } => {
            ensure_post(&store, PostId(post))?;
            show_comments(&store, PostId(post), json)
        }
    }
}

/// Comments only hang off posts the feed knows about
fn ensure_post(store: &FileForestStore, post: PostId) -> Result<()> {
    if !store.contains_post(post)? {
        return Err(PandajeonError::PostNotFound(post).into());
    }
    Ok(())
}

fn add_comment(ctx: &AppContext, store: &dyn ForestStore, args: AddArgs) -> Result<()> {
    use colored::Colorize;

    let engine = CommentEngine::from_config(&ctx.config.engine);
    let label = &ctx.config.board.just_now_label;
    let parent = args.parent.map(CommentId);
    let mut ids = ClockIds::new();
    let mut new_id = None;

    let stored = apply_with_retry(store, PostId(args.post), ctx.config.store.max_retries, |forest| {
        let (next, id) =
            engine.try_insert_comment(forest, &args.content, &args.author, label, parent, &mut ids)?;
        new_id = Some(id);
        Ok(next)
    })
    .with_context(|| match parent {
        Some(parent) => format!("Failed to reply to comment {}", parent),
        None => format!("Failed to comment on post {}", args.post),
    })?;

    if let Some(id) = new_id {
        println!(
            "{} Added comment {} (post {}, v{})",
            "✓".green(),
            id.to_string().cyan(),
            args.post,
            stored.version
        );
    }
    Ok(())
}

fn like_comment(ctx: &AppContext, store: &dyn ForestStore, post: PostId, id: CommentId) -> Result<()> {
    use colored::Colorize;

    let engine = CommentEngine::from_config(&ctx.config.engine);
    let stored = apply_with_retry(store, post, ctx.config.store.max_retries, |forest| {
        engine.try_toggle_like(forest, id)
    })
    .with_context(|| format!("Failed to like comment {} on post {}", id, post))?;

    if let Some(node) = stored.value.get(id) {
        let heart = if node.liked_by_viewer { "♥".red() } else { "♡".normal() };
        println!("{} {} {}", heart, node.like_count, id.to_string().dimmed());
    }
    Ok(())
}

fn show_comments(store: &dyn ForestStore, post: PostId, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let stored = store
        .load(post)
        .with_context(|| format!("Failed to load comments for post {}", post))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stored.value)?);
        return Ok(());
    }

    if stored.value.is_empty() {
        println!("No comments yet.");
        return Ok(());
    }

    println!(
        "{}",
        format!("Post {} · 댓글 {}", post, stored.value.len())
            .bold()
            .underline()
    );
    println!();
    print!("{}", render_tree(&stored.value));
    Ok(())
}

/// Plain-text rendering, replies indented under their parent
pub fn render_tree(forest: &CommentForest) -> String {
    let mut out = String::new();
    for (depth, node) in forest.walk() {
        let indent = "    ".repeat(depth);
        let marker = if depth == 0 { "" } else { "↳ " };
        let heart = if node.liked_by_viewer { "♥" } else { "♡" };
        out.push_str(&format!(
            "{}{}{} · {} [{}]\n",
            indent, marker, node.author, node.created_label, node.id
        ));
        out.push_str(&format!("{}{}{}\n", indent, " ".repeat(marker.chars().count()), node.content));
        out.push_str(&format!(
            "{}{}{} {}\n",
            indent,
            " ".repeat(marker.chars().count()),
            heart,
            node.like_count
        ));
    }
    out
}
