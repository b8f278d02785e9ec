//! Loading of the curated project list
//!
//! The input is a YAML mapping from category label to a sequence of project
//! entries:
//!
//! ```yaml
//! Tools:
//!   - name: ripgrep
//!     repository: https://github.com/BurntSushi/ripgrep
//!     description: Recursive line-oriented search
//!     languages: [Rust]
//!     first_release: 2016-09-13
//! ```
//!
//! Mandatory fields are validated here so that a malformed file aborts the
//! run before any network call is made.

use crate::core::{OsslistError, OsslistResult};
use chrono::{DateTime, NaiveDate};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

const KNOWN_KEYS: &[&str] = &[
    "name",
    "repository",
    "description",
    "homepage",
    "license",
    "languages",
    "tags",
    "first_release",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// One entry as written by the user, validated but not yet reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawProject {
    pub name: String,
    pub repository: String,
    pub description: String,
    pub homepage: Option<String>,
    pub license: Option<String>,
    pub languages: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub first_release: Option<NaiveDate>,
}

impl RawProject {
    pub fn new(
        name: impl Into<String>,
        repository: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// A category label with its entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCategory {
    pub name: String,
    pub projects: Vec<RawProject>,
}

/// The whole parsed input file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectInput {
    pub categories: Vec<InputCategory>,
}

impl ProjectInput {
    /// Read and validate an input file.
    pub fn load(path: &Path) -> OsslistResult<Self> {
        if !path.exists() {
            return Err(OsslistError::FatalInput(format!(
                "Input file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Validate YAML text.
    pub fn parse(content: &str) -> OsslistResult<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        let mapping = match root {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(OsslistError::FatalInput(
                    "input must map category names to project lists".to_string(),
                ))
            }
        };

        let mut categories = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = scalar_string(&key).ok_or_else(|| {
                OsslistError::FatalInput(format!("category name {:?} is not a string", key))
            })?;
            let entries = match value {
                Value::Sequence(entries) => entries,
                Value::Null => Vec::new(),
                _ => {
                    return Err(OsslistError::FatalInput(format!(
                        "category '{}' must be a list of projects",
                        name
                    )))
                }
            };

            let projects = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| parse_entry(&format!("{}[{}]", name, index), entry))
                .collect::<OsslistResult<Vec<_>>>()?;
            categories.push(InputCategory { name, projects });
        }

        Ok(Self { categories })
    }

    /// Every entry with its category label, in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RawProject)> {
        self.categories.iter().flat_map(|category| {
            category
                .projects
                .iter()
                .map(move |project| (category.name.as_str(), project))
        })
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.projects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names used by more than one entry anywhere in the file, sorted.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (_, project) in self.entries() {
            *seen.entry(project.name.as_str()).or_default() += 1;
        }
        let mut duplicates: Vec<String> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect();
        duplicates.sort();
        duplicates
    }
}

fn parse_entry(location: &str, entry: &Value) -> OsslistResult<RawProject> {
    let fields = entry.as_mapping().ok_or_else(|| {
        OsslistError::FatalInput(format!("{}: project entry must be a mapping", location))
    })?;

    for key in fields.keys() {
        let known = key.as_str().is_some_and(|k| KNOWN_KEYS.contains(&k));
        if !known {
            warn!(location, key = ?key, "ignoring unknown key");
        }
    }

    // mandatory fields must be YAML strings; `name: 2048` is a mistake
    let required = |key: &str| -> OsslistResult<String> {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                OsslistError::FatalInput(format!("{}: project needs a {}", location, key))
            })
    };

    let name = required("name")?;
    let repository = required("repository")?;
    let description = required("description")?;

    let optional = |key: &str| fields.get(key).and_then(scalar_string).filter(|v| !v.is_empty());

    let first_release = match optional("first_release") {
        Some(text) => Some(parse_date(&text).ok_or_else(|| {
            OsslistError::FatalInput(format!(
                "{} ({}): first_release '{}' is not a date",
                location, name, text
            ))
        })?),
        None => None,
    };

    Ok(RawProject {
        homepage: optional("homepage"),
        license: optional("license"),
        languages: list(location, "languages", fields.get("languages"))?,
        tags: list(location, "tags", fields.get("tags"))?,
        first_release,
        name,
        repository,
        description,
    })
}

/// Strings, numbers and booleans as text; YAML users write `license: 2.0`.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A sequence of strings or one comma separated string.
fn list(location: &str, key: &str, value: Option<&Value>) -> OsslistResult<Option<Vec<String>>> {
    let items: Vec<String> = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                scalar_string(item).ok_or_else(|| {
                    OsslistError::FatalInput(format!("{}: {} must be strings", location, key))
                })
            })
            .collect::<OsslistResult<_>>()?,
        Some(Value::String(text)) => text.split(',').map(|s| s.trim().to_string()).collect(),
        Some(_) => {
            return Err(OsslistError::FatalInput(format!(
                "{}: {} must be a list",
                location, key
            )))
        }
    };

    let items: Vec<String> = items.into_iter().filter(|s| !s.is_empty()).collect();
    Ok((!items.is_empty()).then_some(items))
}

/// Parse a user supplied release date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
Web:
  - name: zola
    repository: https://github.com/getzola/zola
    description: A static site generator
    homepage: https://www.getzola.org
    languages: [Rust]
    tags: static, blog
Other:
  - name: inkscape
    repository: https://gitlab.com/inkscape/inkscape
    description: Vector graphics editor
    license: GPL-2.0
    first_release: 2003-11-02
    homepage: ""
"#;

    #[test]
    fn test_parse_sample() {
        let input = ProjectInput::parse(SAMPLE).unwrap();

        assert_eq!(input.categories.len(), 2);
        assert_eq!(input.categories[0].name, "Web");
        assert_eq!(input.categories[1].name, "Other");
        assert_eq!(input.len(), 2);

        let zola = &input.categories[0].projects[0];
        assert_eq!(zola.homepage.as_deref(), Some("https://www.getzola.org"));
        assert_eq!(zola.languages, Some(vec!["Rust".to_string()]));
        assert_eq!(
            zola.tags,
            Some(vec!["static".to_string(), "blog".to_string()])
        );
        assert_eq!(zola.license, None);

        let inkscape = &input.categories[1].projects[0];
        assert_eq!(inkscape.homepage, None);
        assert_eq!(inkscape.license.as_deref(), Some("GPL-2.0"));
        assert_eq!(
            inkscape.first_release,
            NaiveDate::from_ymd_opt(2003, 11, 2)
        );
    }

    #[test]
    fn test_missing_mandatory_field() {
        let err = ProjectInput::parse(
            "Tools:\n  - name: a\n    repository: https://github.com/a/a\n",
        )
        .unwrap_err();
        match err {
            OsslistError::FatalInput(msg) => {
                assert_eq!(msg, "Tools[0]: project needs a description");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mistyped_mandatory_field() {
        let err = ProjectInput::parse(
            "Tools:\n  - name: [a]\n    repository: r\n    description: d\n",
        )
        .unwrap_err();
        assert!(matches!(err, OsslistError::FatalInput(_)));
    }

    #[test]
    fn test_non_string_mandatory_fields() {
        let err = ProjectInput::parse(
            "A:\n  - {name: 2048, repository: \"https://github.com/x/y\", description: d}\n",
        )
        .unwrap_err();
        assert!(matches!(err, OsslistError::FatalInput(ref msg) if msg == "A[0]: project needs a name"));

        let err = ProjectInput::parse(
            "A:\n  - {name: game, repository: \"https://github.com/x/y\", description: true}\n",
        )
        .unwrap_err();
        assert!(matches!(err, OsslistError::FatalInput(ref msg) if msg == "A[0]: project needs a description"));
    }

    #[test]
    fn test_optional_scalars_are_text() {
        let input = ProjectInput::parse(
            "A:\n  - {name: a, repository: r, description: d, license: 2.0}\n",
        )
        .unwrap();
        assert_eq!(input.categories[0].projects[0].license.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = ProjectInput::parse("Tools: [\n").unwrap_err();
        assert!(matches!(err, OsslistError::Yaml(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        assert!(matches!(
            ProjectInput::parse("- a\n- b\n"),
            Err(OsslistError::FatalInput(_))
        ));
        assert!(ProjectInput::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_first_release() {
        let err = ProjectInput::parse(
            "A:\n  - name: a\n    repository: r\n    description: d\n    first_release: soon\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("first_release 'soon'"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 14);
        assert_eq!(parse_date("2020-03-14"), expected);
        assert_eq!(parse_date("2020/03/14"), expected);
        assert_eq!(parse_date("14.03.2020"), expected);
        assert_eq!(parse_date("2020-03-14T10:00:00Z"), expected);
        assert_eq!(parse_date("March 2020"), None);
    }

    #[test]
    fn test_duplicate_names_across_categories() {
        let input = ProjectInput::parse(
            r#"
A:
  - {name: x, repository: r, description: d}
  - {name: y, repository: r, description: d}
B:
  - {name: x, repository: r, description: d}
  - {name: y, repository: r, description: d}
  - {name: z, repository: r, description: d}
"#,
        )
        .unwrap();
        assert_eq!(input.duplicate_names(), vec!["x", "y"]);
    }

    #[test]
    fn test_entries_keep_file_order() {
        let input = ProjectInput::parse(SAMPLE).unwrap();
        let names: Vec<(&str, &str)> = input
            .entries()
            .map(|(category, p)| (category, p.name.as_str()))
            .collect();
        assert_eq!(names, vec![("Web", "zola"), ("Other", "inkscape")]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let input = ProjectInput::load(file.path()).unwrap();
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProjectInput::load(Path::new("/nonexistent/projects.yaml")).unwrap_err();
        assert!(matches!(err, OsslistError::FatalInput(_)));
    }
}
