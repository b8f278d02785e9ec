//! Integration tests module
//!
//! End-to-end runs of the osslist binary. No test reaches the network:
//! repositories live on hosts no adapter serves and URL checks are either
//! skipped or only see malformed URLs.

pub mod common;
pub mod generate;
pub mod validate;
