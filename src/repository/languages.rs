/// Share of total usage the reported languages must exceed.
pub const LANGUAGE_COVERAGE: f64 = 0.8;

/// The most used languages whose cumulative share exceeds 80%.
///
/// Languages are ordered by descending usage; equal usage keeps the input
/// order. A language that brings the running share to exactly 80% does not
/// stop the scan, the next one is included too. Usage may be in any unit
/// (bytes on GitHub, percent on GitLab).
pub fn dominant_languages(usage: Vec<(String, f64)>) -> Vec<String> {
    let total: f64 = usage.iter().map(|(_, amount)| amount.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut ranked = usage;
    // stable, so ties keep input order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut covered = 0.0;
    let mut languages = Vec::new();
    for (name, amount) in ranked {
        languages.push(name);
        covered += amount.max(0.0);
        if covered / total > LANGUAGE_COVERAGE {
            break;
        }
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(n, a)| (n.to_string(), *a)).collect()
    }

    #[test]
    fn test_exactly_eighty_percent_continues() {
        let result = dominant_languages(usage(&[("A", 80.0), ("B", 15.0), ("C", 5.0)]));
        assert_eq!(result, vec!["A", "B"]);
    }

    #[test]
    fn test_just_above_eighty_percent_stops() {
        let result = dominant_languages(usage(&[("A", 80.001), ("B", 14.999), ("C", 5.0)]));
        assert_eq!(result, vec!["A"]);
    }

    #[test]
    fn test_sorted_by_usage() {
        let result = dominant_languages(usage(&[("Shell", 100.0), ("Rust", 9000.0), ("C", 400.0)]));
        assert_eq!(result, vec!["Rust"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let result = dominant_languages(usage(&[("B", 25.0), ("A", 25.0), ("C", 25.0), ("D", 25.0)]));
        assert_eq!(result, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_gitlab_percentages() {
        let result = dominant_languages(usage(&[("Ruby", 66.69), ("JavaScript", 22.98), ("HTML", 10.33)]));
        assert_eq!(result, vec!["Ruby", "JavaScript"]);
    }

    #[test]
    fn test_empty_usage() {
        assert!(dominant_languages(Vec::new()).is_empty());
        assert!(dominant_languages(usage(&[("A", 0.0)])).is_empty());
    }
}
