pub mod error;
pub mod error_help;
pub mod natural;
pub mod path;

pub use error::{InvalidUrl, OsslistError, OsslistResult, UrlFailure};
