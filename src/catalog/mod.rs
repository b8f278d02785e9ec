//! The grouped, ordered collection of reconciled projects
//!
//! Entries are reconciled concurrently by a bounded pool of tasks. Results
//! are bucketed per category as they arrive and then sorted, so the catalog
//! never depends on completion order:
//!
//! - categories alphabetically, with `Other` always last
//! - projects by name in case-insensitive natural order

use crate::core::{natural, OsslistError, OsslistResult};
use crate::input::ProjectInput;
use crate::project::{ProjectReconciler, ProjectRecord};
use indicatif::ProgressBar;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Label of the catch-all category rendered after all others.
pub const OTHER_CATEGORY: &str = "Other";

/// Order of category labels: alphabetical ignoring case, `Other` last.
pub fn compare_categories(a: &str, b: &str) -> Ordering {
    match (a == OTHER_CATEGORY, b == OTHER_CATEGORY) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub records: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCatalog {
    categories: Vec<Category>,
}

impl ProjectCatalog {
    /// Group and order records given as `(category, record)` pairs.
    ///
    /// Records with equal names keep their relative input order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, ProjectRecord)>,
    {
        let mut buckets: HashMap<String, Vec<ProjectRecord>> = HashMap::new();
        for (category, record) in records {
            buckets.entry(category).or_default().push(record);
        }

        let mut categories: Vec<Category> = buckets
            .into_iter()
            .map(|(name, mut records)| {
                records.sort_by(|a, b| natural::compare_ignore_case(&a.name, &b.name));
                Category { name, records }
            })
            .collect();
        categories.sort_by(|a, b| compare_categories(&a.name, &b.name));

        Self { categories }
    }

    /// Reconcile every input entry with at most `workers` in flight.
    ///
    /// A fatal error stops new work from being scheduled; entries already
    /// running are allowed to finish before the error is returned. Duplicate
    /// names are reported once everything has been reconciled.
    pub async fn build(
        input: &ProjectInput,
        reconciler: &ProjectReconciler,
        workers: usize,
        progress: &ProgressBar,
    ) -> OsslistResult<Self> {
        let workers = workers.max(1);
        info!(projects = input.len(), workers, "reconciling projects");

        let mut results: BTreeMap<usize, (String, ProjectRecord)> = BTreeMap::new();
        let mut failure: Option<OsslistError> = None;
        let mut join_set = JoinSet::new();

        for (index, (category, raw)) in input.entries().enumerate() {
            if join_set.len() >= workers {
                if let Some(joined) = join_set.join_next().await {
                    collect(joined, &mut results, &mut failure, progress);
                }
            }
            if failure.is_some() {
                break;
            }

            let reconciler = reconciler.clone();
            let category = category.to_string();
            let raw = raw.clone();
            join_set.spawn(async move {
                debug!(project = %raw.name, "reconciling");
                let record = reconciler.reconcile(&raw).await;
                (index, category, record)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            collect(joined, &mut results, &mut failure, progress);
        }
        progress.finish_and_clear();

        if let Some(e) = failure {
            return Err(e);
        }

        // BTreeMap iteration restores input order before grouping
        let catalog = Self::from_records(results.into_values());
        catalog.check_for_duplicates()?;
        Ok(catalog)
    }

    /// Fail with every name used by more than one record, across categories.
    pub fn check_for_duplicates(&self) -> OsslistResult<()> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in self.records() {
            *counts.entry(record.name.as_str()).or_default() += 1;
        }

        let mut duplicates: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect();

        if duplicates.is_empty() {
            return Ok(());
        }
        duplicates.sort();
        Err(OsslistError::DuplicateProject(duplicates))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All records in catalog order.
    pub fn records(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.categories.iter().flat_map(|c| c.records.iter())
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Joined = Result<(usize, String, OsslistResult<ProjectRecord>), tokio::task::JoinError>;

fn collect(
    joined: Joined,
    results: &mut BTreeMap<usize, (String, ProjectRecord)>,
    failure: &mut Option<OsslistError>,
    progress: &ProgressBar,
) {
    progress.inc(1);
    let outcome = joined
        .map_err(|e| OsslistError::Task(e.to_string()))
        .and_then(|(index, category, record)| record.map(|record| (index, category, record)));

    match outcome {
        Ok((index, category, record)) => {
            results.insert(index, (category, record));
        }
        Err(e) => {
            if failure.is_none() {
                *failure = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::*;
    use crate::repository::AdapterFactory;
    use std::sync::Arc;

    fn record(name: &str) -> ProjectRecord {
        ProjectRecord::new(name, "https://example.com/a/b", "d")
    }

    fn names(category: &Category) -> Vec<&str> {
        category.records.iter().map(|r| r.name.as_str()).collect()
    }

    fn reconciler(github: &MockGitHubProvider) -> ProjectReconciler {
        let factory = AdapterFactory::new(
            Arc::new(github.clone()),
            Arc::new(MockGitLabProvider::new()),
            Vec::new(),
        );
        ProjectReconciler::new(Arc::new(factory))
    }

    #[test]
    fn test_category_order() {
        let catalog = ProjectCatalog::from_records(vec![
            ("B".to_string(), record("b")),
            ("Other".to_string(), record("o")),
            ("A".to_string(), record("a")),
        ]);
        let order: Vec<&str> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "Other"]);
    }

    #[test]
    fn test_category_order_ignores_case() {
        let mut labels = vec!["beta", "Other", "Alpha", "alpha"];
        labels.sort_by(|a, b| compare_categories(a, b));
        assert_eq!(labels, vec!["Alpha", "alpha", "beta", "Other"]);
    }

    #[test]
    fn test_records_sorted_naturally_ignoring_case() {
        let catalog = ProjectCatalog::from_records(
            ["tool10", "Tool2", "alpha", "tool1"]
                .into_iter()
                .map(|n| ("A".to_string(), record(n))),
        );
        assert_eq!(
            names(&catalog.categories()[0]),
            vec!["alpha", "tool1", "Tool2", "tool10"]
        );
    }

    #[test]
    fn test_duplicates_across_categories() {
        let catalog = ProjectCatalog::from_records(vec![
            ("A".to_string(), record("x")),
            ("B".to_string(), record("x")),
            ("B".to_string(), record("z")),
            ("C".to_string(), record("z")),
            ("C".to_string(), record("y")),
        ]);
        match catalog.check_for_duplicates() {
            Err(OsslistError::DuplicateProject(names)) => assert_eq!(names, vec!["x", "z"]),
            other => panic!("expected duplicates, got {:?}", other),
        }
    }

    #[test]
    fn test_no_duplicates() {
        let catalog = ProjectCatalog::from_records(vec![
            ("A".to_string(), record("x")),
            ("B".to_string(), record("y")),
        ]);
        assert!(catalog.check_for_duplicates().is_ok());
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_build_is_independent_of_worker_count() {
        let github = MockGitHubProvider::new();
        for name in ["a", "b", "c", "d"] {
            github.add_repo(MockGitHubRepo::new("o", name).with_last_commit("s", "2024-01-01"));
        }
        let input = ProjectInput::parse(
            r#"
Other:
  - {name: d, repository: "https://github.com/o/d", description: x}
Tools:
  - {name: c, repository: "https://github.com/o/c", description: x}
  - {name: a, repository: "https://github.com/o/a", description: x}
Libraries:
  - {name: b, repository: "https://github.com/o/b", description: x}
  - {name: e, repository: "https://unknown.example/o/e", description: x}
"#,
        )
        .unwrap();
        let reconciler = reconciler(&github);

        let serial = ProjectCatalog::build(&input, &reconciler, 1, &ProgressBar::hidden())
            .await
            .unwrap();
        let parallel = ProjectCatalog::build(&input, &reconciler, 8, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(serial, parallel);
        let order: Vec<&str> = serial.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["Libraries", "Tools", "Other"]);
        assert_eq!(names(&serial.categories()[1]), vec!["a", "c"]);
        assert_eq!(serial.len(), 5);
    }

    #[tokio::test]
    async fn test_build_reports_duplicates() {
        let input = ProjectInput::parse(
            r#"
A:
  - {name: same, repository: "https://unknown.example/a/b", description: x}
B:
  - {name: same, repository: "https://unknown.example/c/d", description: x}
"#,
        )
        .unwrap();
        let err = ProjectCatalog::build(
            &input,
            &reconciler(&MockGitHubProvider::new()),
            2,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OsslistError::DuplicateProject(names) if names == vec!["same"]));
    }

    #[tokio::test]
    async fn test_build_stops_on_quota_exhaustion() {
        let github = MockGitHubProvider::new();
        github.exhaust_quota();
        let input = ProjectInput::parse(
            r#"
A:
  - {name: a, repository: "https://github.com/o/a", description: x}
  - {name: b, repository: "https://github.com/o/b", description: x}
  - {name: c, repository: "https://github.com/o/c", description: x}
"#,
        )
        .unwrap();

        let err = ProjectCatalog::build(&input, &reconciler(&github), 1, &ProgressBar::hidden())
            .await
            .unwrap_err();
        assert!(matches!(err, OsslistError::QuotaExhausted { .. }));
        // no further entries are scheduled after the first failure
        assert_eq!(github.call_count("repo"), 1);
    }
}
