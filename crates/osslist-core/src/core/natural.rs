//! Natural ("alphanumeric") string ordering.
//!
//! Strings are split into alternating runs of non-digits and digits. Digit
//! runs compare as integers, everything else compares lexicographically, so
//! `v1.9.0` sorts before `v1.10.0`.

use std::cmp::Ordering;

/// Split into runs, always starting with a (possibly empty) text run so that
/// runs at the same position of two strings are of the same kind.
fn runs(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = false;

    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        if is_digit != in_digits {
            out.push(&s[start..idx]);
            start = idx;
            in_digits = is_digit;
        }
    }
    out.push(&s[start..]);
    if in_digits {
        out.push("");
    }
    out
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_runs(a: &str, b: &str) -> Ordering {
    let left = runs(a);
    let right = runs(b);

    for (idx, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        // odd positions hold digit runs
        let ord = if idx % 2 == 1 {
            compare_numeric(l, r)
        } else {
            l.cmp(r)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

/// Natural comparison. Strings that are equal under natural ordering but
/// differ in bytes (`"v01"` vs `"v1"`) fall back to byte order, which keeps
/// this a total order.
pub fn compare(a: &str, b: &str) -> Ordering {
    compare_runs(a, b).then_with(|| a.cmp(b))
}

/// Case-insensitive natural comparison, still total.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    compare_runs(&a.to_lowercase(), &b.to_lowercase()).then_with(|| compare(a, b))
}

/// Sort in place by a string key using natural ordering.
pub fn sort_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare(key(a), key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tags_sort_numerically() {
        let mut tags = vec!["v1.2.0", "v1.10.0", "v1.9.0"];
        tags.sort_by(|a, b| compare(a, b));
        assert_eq!(tags, vec!["v1.2.0", "v1.9.0", "v1.10.0"]);
    }

    #[test]
    fn test_runs_alternate() {
        assert_eq!(runs("abc"), vec!["abc"]);
        assert_eq!(runs("1a"), vec!["", "1", "a"]);
        assert_eq!(runs("a10b2"), vec!["a", "10", "b", "2", ""]);
        assert_eq!(runs(""), vec![""]);
    }

    #[test]
    fn test_text_before_longer_text() {
        assert_eq!(compare("release", "release-2"), Ordering::Less);
        assert_eq!(compare("2.0", "10.0"), Ordering::Less);
        assert_eq!(compare("10.0", "2.0"), Ordering::Greater);
    }

    #[test]
    fn test_leading_zeros_stay_total() {
        assert_eq!(compare_runs("v01", "v1"), Ordering::Equal);
        assert_ne!(compare("v01", "v1"), Ordering::Equal);
        assert_eq!(compare("v01", "v01"), Ordering::Equal);
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        let big = "build-123456789012345678901234567890";
        let bigger = "build-923456789012345678901234567890";
        assert_eq!(compare(big, bigger), Ordering::Less);
    }

    #[test]
    fn test_ignore_case() {
        let mut names = vec!["beta", "Alpha", "alpha2", "Alpha10"];
        names.sort_by(|a, b| compare_ignore_case(a, b));
        assert_eq!(names, vec!["Alpha", "alpha2", "Alpha10", "beta"]);
    }

    #[test]
    fn test_sort_by_key() {
        let mut items = vec![("b", 1), ("a10", 2), ("a9", 3)];
        sort_by_key(&mut items, |item| item.0);
        assert_eq!(items, vec![("a9", 3), ("a10", 2), ("b", 1)]);
    }
}
