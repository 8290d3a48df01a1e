#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Bulk email dispatch engine: personalizes a message per recipient,
//! sends it through a pluggable SMTP transport with pacing and per-send
//! timeouts, reports incremental progress to a caller-supplied sink, and
//! finalizes every job into an immutable delivery record.

pub mod domain;
pub mod infrastructure;
