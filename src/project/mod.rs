//! The normalized project data model and the reconciliation of user input
//! with repository data.

pub mod reconciler;
pub mod record;
pub mod types;

pub use reconciler::ProjectReconciler;
pub use record::ProjectRecord;
pub use types::{Activity, License};
