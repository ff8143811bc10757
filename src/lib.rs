//! Article and YouTube summarization service with session-scoped follow-up questions.

// Strict lint policy
#![deny(warnings)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(dead_code)]
#![deny(non_camel_case_types)]
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)]
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]

// Clippy
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
#![deny(overflowing_literals)]

/// Service configuration and environment overrides.
pub mod config;
/// Remote completion model access.
pub mod llm;
/// URL classification and content fetching.
#[allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
pub mod loader;
/// Follow-up question answering.
pub mod qa;
/// HTTP server and API routes.
#[allow(clippy::missing_errors_doc, clippy::unused_async)]
pub mod server;
/// Session records, storage and expiry.
pub mod session;
/// Entry helpers to start the summarizer server.
pub mod start_article_summarizer;
/// Style templates, prompt rendering and reply parsing.
pub mod summarizer;
