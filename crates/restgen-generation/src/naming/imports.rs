//! Import tracking for raw (package-qualified) names

use std::collections::{BTreeMap, BTreeSet};

/// Records the packages a generated file refers to and the local alias each
/// one is bound to
///
/// Aliases are derived from the trailing path segments: `k8s.io/api/core/v1`
/// becomes `v1`, then `corev1` if `v1` is already taken by another path.
#[derive(Debug, Clone, Default)]
pub struct ImportTracker {
    by_path: BTreeMap<String, String>,
    by_alias: BTreeMap<String, String>,
}

impl ImportTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` and return its local alias
    pub fn local_name_of(&mut self, path: &str) -> String {
        if let Some(alias) = self.by_path.get(path) {
            return alias.clone();
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut alias = String::new();
        for n in 1..=segments.len() {
            alias = sanitize(&segments[segments.len() - n..].concat());
            if !self.by_alias.contains_key(&alias) {
                break;
            }
        }
        // Every suffix is taken; fall back to a numbered alias.
        if self.by_alias.contains_key(&alias) {
            let base = alias.clone();
            let mut i = 2;
            while self.by_alias.contains_key(&alias) {
                alias = format!("{}{}", base, i);
                i += 1;
            }
        }

        self.by_path.insert(path.to_string(), alias.clone());
        self.by_alias.insert(alias.clone(), path.to_string());
        alias
    }

    /// Whether nothing has been imported
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Import lines sorted by path, aliased unless the alias is exactly the
    /// last path segment
    pub fn import_lines(&self) -> Vec<String> {
        self.by_path
            .iter()
            .map(|(path, alias)| {
                if last_segment(path) == alias.as_str() {
                    format!("\"{}\"", path)
                } else {
                    format!("{} \"{}\"", alias, path)
                }
            })
            .collect()
    }
}

/// Prefix for aliases that would otherwise not start with a letter
const ALIAS_PREFIX: &str = "pkg";

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn sanitize(segment: &str) -> String {
    let alias = segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase();
    match alias.chars().next() {
        Some(c) if !c.is_ascii_digit() => alias,
        _ => format!("{}{}", ALIAS_PREFIX, alias),
    }
}

/// Bring a hand-written import entry into line form.
///
/// `github.com/gorilla/mux` becomes `"github.com/gorilla/mux"`; entries that
/// are already quoted (optionally with an alias) are kept as they are.
pub fn normalize_import_line(entry: &str) -> String {
    let entry = entry.trim();
    if entry.contains('"') {
        entry.to_string()
    } else {
        format!("\"{}\"", entry)
    }
}

/// Merge import entries into a sorted, deduplicated list of lines
pub fn merge_import_lines<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    entries
        .into_iter()
        .filter(|e| !e.trim().is_empty())
        .map(normalize_import_line)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
