//! Tag ordering.
//!
//! Registries return tags in lexical order, which puts `1.10` before `1.9`.
//! [`VersionKey`] gives tags a version-like order instead: numeric tokens
//! compare by value, everything else by upper-cased character codes, and
//! `latest` always sorts last.

use regex::Regex;
use std::sync::LazyLock;

#[cfg(test)]
mod tests;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is a valid regex"));

/// Sort key for a tag.
///
/// `Tokens` compare element-wise with the shorter sequence first when one is
/// a prefix of the other. `Latest` is greater than every `Tokens` value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionKey {
    Tokens(Vec<u128>),
    Latest,
}

impl VersionKey {
    /// Builds the sort key for a tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::version::VersionKey;
    ///
    /// assert!(VersionKey::new("1.2.10") > VersionKey::new("1.2.9"));
    /// assert!(VersionKey::new("LATEST") > VersionKey::new("99"));
    /// ```
    pub fn new(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("latest") {
            return Self::Latest;
        }

        let tokens = WORD
            .find_iter(tag)
            .flat_map(|token| token_values(token.as_str()))
            .collect();

        Self::Tokens(tokens)
    }
}

impl From<&str> for VersionKey {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A run of digits is one value; anything else is one value per character.
fn token_values(token: &str) -> Vec<u128> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        // Oversized numbers still sort after every smaller one
        vec![token.parse().unwrap_or(u128::MAX)]
    } else {
        token
            .to_uppercase()
            .chars()
            .map(|c| u128::from(u32::from(c)))
            .collect()
    }
}

/// Sorts tags ascending by [`VersionKey`].
///
/// The sort is stable: tags with equal keys keep their relative order.
///
/// # Examples
///
/// ```
/// use libdrui::version::sort_tags;
///
/// let mut tags = vec!["2.0".to_string(), "latest".to_string(), "1.0".to_string()];
/// sort_tags(&mut tags);
/// assert_eq!(tags, ["1.0", "2.0", "latest"]);
/// ```
pub fn sort_tags(tags: &mut [String]) {
    tags.sort_by_cached_key(|tag| VersionKey::new(tag));
}

/// Picks the tag to open when a repository is selected without one.
///
/// Prefers `latest`, then the highest tag of an already sorted list.
pub fn default_tag(tags: &[String]) -> Option<&str> {
    tags.iter()
        .find(|tag| tag.as_str() == "latest")
        .or_else(|| tags.last())
        .map(String::as_str)
}
