//! Article summarizer server binary.
//! Run with: cargo run --bin article-summarizer-server

use std::process::ExitCode;

use article_summarizer::start_article_summarizer;

fn main() -> ExitCode {
    start_article_summarizer::run()
}
