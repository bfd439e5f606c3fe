// File: src/story/ids.rs

//! Storage key type for persisted stories.
//!
//! Every `create-story` request allocates a fresh [`StorageKey`]; the story
//! directory is named after it, so two requests can never share a location.

use core::fmt;
use core::str::FromStr;

use uuid::Uuid;

/// Unique identifier of one persisted story directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StorageKey(Uuid);

impl StorageKey {
    /// Allocate a new random key (UUID v4).
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Directory name used on disk.
    #[must_use]
    pub fn dir_name(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.simple(), f)
    }
}

impl FromStr for StorageKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_keys_are_distinct() {
        let keys: HashSet<StorageKey> = (0..1_000).map(|_| StorageKey::generate()).collect();
        assert_eq!(keys.len(), 1_000);
    }

    #[test]
    fn test_dir_name_parses_back() {
        let key = StorageKey::generate();
        let parsed: StorageKey = key.dir_name().parse().unwrap();
        assert_eq!(parsed, key);
        assert_eq!(key.to_string(), key.dir_name());
    }

    #[test]
    fn test_dir_name_is_path_safe() {
        let name = StorageKey::generate().dir_name();
        assert_eq!(name.len(), 32);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
