use crate::core::error::OsslistError;

/// Actionable hints attached to errors shown on the command line.
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for OsslistError {
    fn help(&self) -> Option<String> {
        match self {
            OsslistError::Yaml(_) => {
                Some("Check the indentation of the project list; categories map to sequences of projects.".to_string())
            }
            OsslistError::FatalInput(_) => Some(
                "Every project needs non-empty `name`, `repository` and `description` strings."
                    .to_string(),
            ),
            OsslistError::DuplicateProject(_) => {
                Some("Project names must be unique across all categories.".to_string())
            }
            OsslistError::InvalidUrl(_) => Some(
                "Fix the listed URLs or rerun with `--invalid-url report` to only list them."
                    .to_string(),
            ),
            OsslistError::QuotaExhausted { platform, .. } => Some(match *platform {
                "GitLab" => "Set GITLAB_TOKEN to raise the GitLab rate limit, or wait for the reset."
                    .to_string(),
                _ => "Set GITHUB_TOKEN to raise the GitHub rate limit to 5000/hour, or wait for the reset."
                    .to_string(),
            }),
            OsslistError::Config(_) => {
                Some("See `osslist --help` for the configuration file location.".to_string())
            }
            _ => None,
        }
    }
}

/// Render an error followed by its hint, if any.
pub fn format_error_with_help(error: &OsslistError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}
