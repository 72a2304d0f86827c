//! pandajeon - anonymous community board CLI
//!
//! Keeps the feed and each post's comment forest on disk and drives the
//! comment tree engine against them.
//!
//! ## Quick Start
//!
//! ```bash
//! # Publish a post
//! pandajeon post submit "거기 차슈 추가 필수" --title "판교 라멘집" --sub 판교맛집
//!
//! # Comment on post 1, then reply to comment 1712345678901
//! pandajeon comment add "ㅇㅈ" --post 1 --author 라멘매니아
//! pandajeon comment add "저도요" --post 1 --parent 1712345678901
//!
//! # Like it, then look at the thread
//! pandajeon comment like 1712345678901 --post 1
//! pandajeon post show 1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
