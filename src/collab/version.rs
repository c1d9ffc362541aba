//! Version comparator collaborator (spec.md §6 `ensure-older`).
//!
//! RPM version/release strings are not semver: segments are split at
//! transitions between digit and non-digit runs and compared
//! numerically-then-lexically per segment, the classic `rpmvercmp`
//! algorithm. Grounded on `original_source/lib/install.c`'s
//! `rpmEnsureOlder`, which compares version first and only falls back to
//! comparing release when the versions are equal.

use std::cmp::Ordering;

pub trait VersionComparator {
    fn compare_versions(&self, a: &str, b: &str) -> Ordering;

    /// True iff `(version, release)` is strictly older than
    /// `(other_version, other_release)`.
    fn is_older(&self, version: &str, release: &str, other_version: &str, other_release: &str) -> bool {
        match self.compare_versions(version, other_version) {
            Ordering::Equal => self.compare_versions(release, other_release) == Ordering::Less,
            ord => ord == Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RpmVersionComparator;

impl VersionComparator for RpmVersionComparator {
    fn compare_versions(&self, a: &str, b: &str) -> Ordering {
        rpmvercmp(a, b)
    }
}

fn rpmvercmp(a: &str, b: &str) -> Ordering {
    let a_segs = split_segments(a);
    let b_segs = split_segments(b);

    for (sa, sb) in a_segs.iter().zip(b_segs.iter()) {
        let ord = compare_segment(sa, sb);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a_segs.len().cmp(&b_segs.len())
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    let a_numeric = a.chars().next().is_some_and(|c| c.is_ascii_digit());
    let b_numeric = b.chars().next().is_some_and(|c| c.is_ascii_digit());

    match (a_numeric, b_numeric) {
        (true, true) => {
            let a_trimmed = a.trim_start_matches('0');
            let b_trimmed = b.trim_start_matches('0');
            if a_trimmed.len() != b_trimmed.len() {
                a_trimmed.len().cmp(&b_trimmed.len())
            } else {
                a_trimmed.cmp(b_trimmed)
            }
        }
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

fn split_segments(v: &str) -> Vec<&str> {
    let bytes = v.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut is_digit = bytes.first().map(|b| b.is_ascii_digit());

    for (i, b) in bytes.iter().enumerate() {
        let digit = b.is_ascii_digit();
        if Some(digit) != is_digit {
            if i > start {
                segments.push(&v[start..i]);
            }
            start = i;
            is_digit = Some(digit);
        }
    }
    if start < bytes.len() {
        segments.push(&v[start..]);
    }
    segments.into_iter().filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_versions_equal() {
        assert_eq!(rpmvercmp("1.0", "1.0"), Ordering::Equal);
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert_eq!(rpmvercmp("1.9", "1.10"), Ordering::Less);
        assert_eq!(rpmvercmp("1.10", "1.9"), Ordering::Greater);
    }

    #[test]
    fn leading_zeros_ignored() {
        assert_eq!(rpmvercmp("1.01", "1.1"), Ordering::Equal);
    }

    #[test]
    fn alpha_before_numeric_in_same_position() {
        // "1.0a" vs "1.0" -- the comparator treats an extra trailing
        // segment as newer, mirroring rpmvercmp's length tie-break.
        assert_eq!(rpmvercmp("1.0", "1.0a"), Ordering::Less);
    }

    #[test]
    fn is_older_falls_back_to_release() {
        let cmp = RpmVersionComparator;
        assert!(cmp.is_older("1.0", "1", "1.0", "2"));
        assert!(!cmp.is_older("1.0", "2", "1.0", "1"));
        assert!(cmp.is_older("1.0", "5", "1.1", "1"));
    }
}
