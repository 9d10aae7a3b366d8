//! bandcheck-report: Attempt report rendering.
//!
//! Turns a scored [`AttemptRecord`](bandcheck_core::attempt::AttemptRecord)
//! into a self-contained HTML page or a markdown document.

pub mod html;
pub mod markdown;

pub use html::{generate_html, write_html_report};
pub use markdown::{generate_markdown, write_markdown_report};
