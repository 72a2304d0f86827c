//! Post command
//!
//! Submit, like and browse posts in the feed.

use anyhow::{Context, Result};
use clap::Subcommand;
use pj_core::board::{NewPost, Post};
use pj_core::error::PandajeonError;
use pj_core::types::{PostId, SequentialIds};
use pj_storage::FileForestStore;

use super::comment::render_tree;
use super::AppContext;

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Publish a post at the top of the feed
    Submit {
        /// Post body
        content: String,

        /// Post title
        #[arg(long, short)]
        title: String,

        /// Sub-community (default from config)
        #[arg(long, short, default_value = "")]
        sub: String,

        /// Image URL or data URL
        #[arg(long)]
        image: Option<String>,

        /// Display name
        #[arg(long, short, env = "PANDAJEON_AUTHOR", default_value = "익명 판다")]
        author: String,
    },

    /// Toggle your like on a post
    Like {
        /// Post ID
        id: u64,
    },

    /// List posts, newest first
    List {
        /// Only posts in this sub
        #[arg(long, short)]
        sub: Option<String>,

        /// Zero-based page index (ignored with --sub)
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a post with its comments
    Show {
        /// Post ID
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the post command
pub fn execute(ctx: &AppContext, cmd: PostCommand) -> Result<()> {
    let store = ctx.store()?;

    match cmd {
        PostCommand::Submit {
            content,
            title,
            sub,
            image,
            author,
        } => {
            let mut draft = NewPost::new(sub, title, content, author);
            if let Some(image) = image {
                draft = draft.with_image(image);
            }
            submit_post(ctx, &store, draft)
        }
        PostCommand::Like { id } => like_post(ctx, &store, PostId(id)),
        PostCommand::List { sub, page, json } => list_posts(ctx, &store, sub, page, json),
        PostCommand::Show { id, json } => show_post(ctx, &store, PostId(id), json),
    }
}

fn submit_post(ctx: &AppContext, store: &FileForestStore, draft: NewPost) -> Result<()> {
    use colored::Colorize;

    let id = store
        .update_feed(&ctx.config, |board| {
            let next = board.max_post_id().map_or(1, |id| id.0 + 1);
            board.submit_post(draft, &mut SequentialIds::starting_at(next))
        })
        .context("Failed to submit post")?;

    println!("{} Submitted post {}", "✓".green(), id.to_string().cyan());
    Ok(())
}

fn like_post(ctx: &AppContext, store: &FileForestStore, id: PostId) -> Result<()> {
    use colored::Colorize;

    let post = store
        .update_feed(&ctx.config, |board| {
            board.toggle_post_like(id)?;
            board.get(id).cloned().ok_or(PandajeonError::PostNotFound(id))
        })
        .with_context(|| format!("Failed to like post {}", id))?;

    let heart = if post.is_liked { "♥".red() } else { "♡".normal() };
    println!("{} {} {}", heart, post.likes, id.to_string().dimmed());
    Ok(())
}

fn list_posts(
    ctx: &AppContext,
    store: &FileForestStore,
    sub: Option<String>,
    page: usize,
    as_json: bool,
) -> Result<()> {
    use colored::Colorize;

    let board = store.load_board(&ctx.config).context("Failed to load feed")?;

    let (posts, has_more): (Vec<Post>, bool) = match &sub {
        Some(sub) => (board.filter(sub).into_iter().cloned().collect(), false),
        None => {
            let page = board.page(page);
            (page.posts, page.has_more)
        }
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("{}", board.subs().join(" · ").dimmed());
    println!();

    if posts.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }

    print!("{}", render_feed(&posts));
    if has_more {
        println!();
        println!("{}", format!("More: --page {}", page + 1).dimmed());
    }
    Ok(())
}

fn show_post(ctx: &AppContext, store: &FileForestStore, id: PostId, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let board = store.load_board(&ctx.config).context("Failed to load feed")?;
    let post = board.get(id).ok_or(PandajeonError::PostNotFound(id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(post)?);
        return Ok(());
    }

    println!("{}", format!("[{}] {}", post.sub, post.title).bold());
    println!("{}", format!("{} · {}", post.author, post.time).dimmed());
    println!();
    println!("{}", post.content);
    if let Some(image) = &post.image {
        println!("{}", image.dimmed());
    }
    println!();
    println!("♥ {}  댓글 {}", post.likes, post.comments.total_count());

    if !post.comments.is_empty() {
        println!();
        print!("{}", render_tree(&post.comments));
    }
    Ok(())
}

/// Plain-text feed listing, one line per post
pub fn render_feed(posts: &[Post]) -> String {
    let mut out = String::new();
    for post in posts {
        let heart = if post.is_liked { "♥" } else { "♡" };
        out.push_str(&format!(
            "{:>4}  [{}] {} · {} · {}  {} {}  댓글 {}\n",
            post.id.0,
            post.sub,
            post.title,
            post.author,
            post.time,
            heart,
            post.likes,
            post.comments.total_count()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pj_core::board::Board;
    use pj_core::config::Config;

    #[test]
    fn test_render_feed() {
        let mut board = Board::new(&Config::default());
        let mut ids = SequentialIds::default();
        let first = board
            .submit_post(NewPost::new("판교맛집", "라멘집", "차슈 추가", "panda"), &mut ids)
            .unwrap();
        board
            .submit_post(NewPost::new("", "질문", "본문", "u2"), &mut ids)
            .unwrap();
        board.toggle_post_like(first).unwrap();

        let rendered = render_feed(board.posts());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "   2  [자유] 질문 · u2 · 방금 전  ♡ 0  댓글 0");
        assert_eq!(lines[1], "   1  [판교맛집] 라멘집 · panda · 방금 전  ♥ 1  댓글 0");
    }
}
