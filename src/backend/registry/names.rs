/**
 * Name Registry
 *
 * Maps normalized collection URLs to resource names and resolves arbitrary
 * request paths back to the resource that owns them.
 *
 * # Resolution
 *
 * A request path is reduced to its path component (query dropped), trailing
 * slashes are stripped, then segments are popped from the end until a
 * registered URL matches. `/things/42/subscribe?x=1` therefore resolves
 * through `/things/42/subscribe`, `/things/42` and finally `/things`.
 */

use regex::Regex;
use std::collections::HashMap;

/// Normalized URL -> resource name
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: HashMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `url` to `name`, returning the name previously bound to it
    pub fn insert(&mut self, url: &str, name: impl Into<String>) -> Option<String> {
        self.names.insert(normalize(url), name.into())
    }

    /// Unbind `url`
    pub fn remove(&mut self, url: &str) -> Option<String> {
        self.names.remove(&normalize(url))
    }

    /// Name bound to exactly this URL
    pub fn get(&self, url: &str) -> Option<&str> {
        self.names.get(&normalize(url)).map(String::as_str)
    }

    /// Resource name owning `path` (longest registered prefix)
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let mut candidate = normalize(path);
        loop {
            if let Some(name) = self.names.get(&candidate) {
                return Some(name);
            }
            match candidate.rfind('/') {
                Some(idx) if idx > 0 => candidate.truncate(idx),
                _ => return None,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Path component without query, fragment or trailing slashes
pub fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Name for a collection URL
///
/// With a regex, capture group 1 of its first match is the name; `None` when
/// the regex does not match or has no first group. Without one, the URL
/// minus its leading slash is the name.
pub fn derive_name(url: &str, regex: Option<&Regex>) -> Option<String> {
    match regex {
        Some(regex) => regex
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string()),
        None => Some(url.strip_prefix('/').unwrap_or(url).to_string()),
    }
}
