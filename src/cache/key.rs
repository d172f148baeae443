//! Cache Key Module
//!
//! Normalized request identity: route path plus canonicalized query string.

use std::fmt;

// == Cache Key ==
/// Identity of a cacheable request.
///
/// Query pairs are sorted by name, then value, before rendering, so two
/// requests that differ only in parameter order share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for `path` with the given query pairs.
    pub fn from_request<K, V>(path: &str, query: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        pairs.sort_unstable();

        let mut key = String::with_capacity(path.len() + 16 * pairs.len());
        key.push_str(path);
        for (i, (name, value)) in pairs.iter().enumerate() {
            key.push(if i == 0 { '?' } else { '&' });
            escape_into(&mut key, name);
            key.push('=');
            escape_into(&mut key, value);
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Escapes the characters that delimit pairs so keys stay unambiguous.
fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
}
