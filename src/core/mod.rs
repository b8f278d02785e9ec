//! Core module re-exports.
//!
//! Errors, natural ordering and paths live in `osslist-core`; the shared API
//! quota tracker lives here because it depends on the HTTP stack.

pub use osslist_core::core::*;
pub use osslist_core::*;

/// API quota tracking shared by the hosting platform clients.
pub mod rate_limit;

/// `Link` header pagination helpers.
pub mod pagination;
