//! Strongly-typed migration version wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Sort key and unique identifier of a migration.
///
/// Derived from a filename with the direction suffix stripped. Ordering is
/// plain byte-wise string ordering; no format is enforced, so zero-padded
/// sequences or timestamp prefixes are what keep the order meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Create a new `Version`, panicking in debug builds if it is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(version: impl Into<String>) -> Self {
        let s = version.into();
        debug_assert!(!s.is_empty(), "Version must not be empty");
        Self(s)
    }

    /// Try to create a new `Version`, returning `None` if it is empty.
    pub fn try_new(version: impl Into<String>) -> Option<Self> {
        let s = version.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Version {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Version {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_version_try_new_rejects_empty() {
        assert!(Version::try_new("").is_none());
        assert_eq!(Version::try_new("0001_init").unwrap(), "0001_init");
    }

    #[test]
    fn test_version_orders_lexicographically() {
        let mut versions = vec![
            Version::new("0010_c"),
            Version::new("0002_b"),
            Version::new("0001_a"),
        ];
        versions.sort();
        let names: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(names, vec!["0001_a", "0002_b", "0010_c"]);
    }

    #[test]
    fn test_version_borrow_allows_str_lookup() {
        let mut map = BTreeMap::new();
        map.insert(Version::new("0001_a"), 1);
        assert_eq!(map.get("0001_a"), Some(&1));
    }

    #[test]
    fn test_version_serializes_transparently() {
        let yaml = serde_yaml::to_string(&Version::new("0001_a")).unwrap();
        assert_eq!(yaml.trim(), "0001_a");
    }
}
