use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A dated event with an optional link to evidence (release page, commit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub date: NaiveDate,
    pub url: Option<String>,
}

impl Activity {
    pub fn new(date: NaiveDate, url: impl Into<String>) -> Self {
        Self {
            date,
            url: Some(url.into()),
        }
    }

    /// An activity without a link, e.g. a user supplied date.
    pub fn dated(date: NaiveDate) -> Self {
        Self { date, url: None }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// A license name with an optional link to the license text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub name: String,
    pub url: Option<String>,
}

impl License {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
