//! Core utilities shared by the osslist binary and library: the error
//! taxonomy, natural ordering and platform paths.

pub mod core;

pub use core::error::{InvalidUrl, OsslistError, OsslistResult, UrlFailure};
pub use core::error_help::{format_error_with_help, ErrorHelp};
