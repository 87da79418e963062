//! Ignore rule loading and matching
//!
//! Builds an ordered rule list from built-in defaults, repo-local ignore
//! files, the user-global ignore file and explicit operator rules, then
//! matches normalized relative paths against it.
//!
//! The glob engine is deliberately simplified: `*` matches any run of
//! characters at whole-string level (so `**` degenerates to `*`), every
//! other regex metacharacter is literal.

use ccx_domain::constants::{DEFAULT_IGNORE_PATTERNS, GLOBAL_IGNORE_FILE};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// A single compiled ignore rule
#[derive(Debug, Clone)]
struct IgnoreRule {
    /// Compiled whole-string glob
    regex: Regex,
    /// Rule ended in `/`: matches directory components only
    dir_only: bool,
    /// Rule contains `/`: matches the full normalized path
    full_path: bool,
}

/// Matches relative paths against an ordered set of ignore rules.
///
/// Matching is a pure disjunction over the rules, so it is independent of
/// rule insertion order; ordering only determines which duplicate survives.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Build a matcher from raw patterns, collapsing duplicates and keeping
    /// the first occurrence. Patterns that fail to compile are logged and
    /// dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            if !seen.insert(pattern.to_string()) {
                continue;
            }
            match compile_rule(pattern) {
                Some(rule) => rules.push(rule),
                None => warn!(pattern, "dropping unparseable ignore pattern"),
            }
        }

        Self { rules }
    }

    /// Build the full rule set for a codebase: built-in defaults, then any
    /// root-level dotfile ending in `ignore`, then the user-global ignore
    /// file, then explicit operator rules.
    pub fn for_codebase(root: &Path, custom_patterns: &[String]) -> Self {
        let mut patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| (*p).to_string())
            .collect();

        patterns.extend(load_repo_ignore_files(root));
        patterns.extend(load_global_ignore_file());
        patterns.extend(custom_patterns.iter().cloned());

        Self::new(patterns)
    }

    /// Number of active rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether `relative_path` is ignored. `is_dir` selects directory rule
    /// semantics for the final component.
    ///
    /// A path is ignored if any rule matches it or any ancestor directory
    /// matches a directory rule.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        let normalized = relative_path.replace('\\', "/");
        let normalized = normalized.trim_matches('/');
        if normalized.is_empty() {
            return false;
        }

        let components: Vec<&str> = normalized.split('/').collect();
        let basename = components[components.len() - 1];

        self.rules.iter().any(|rule| {
            if rule.dir_only {
                // Directory components of the path; include the final
                // component only when the path itself is a directory.
                let dir_components = if is_dir {
                    &components[..]
                } else {
                    &components[..components.len() - 1]
                };
                dir_components.iter().any(|c| rule.regex.is_match(c))
            } else if rule.full_path {
                rule.regex.is_match(normalized)
            } else {
                rule.regex.is_match(basename)
            }
        })
    }
}

/// Compile one pattern into a rule
fn compile_rule(pattern: &str) -> Option<IgnoreRule> {
    let dir_only = pattern.ends_with('/');
    let body = if dir_only {
        pattern.trim_end_matches('/')
    } else {
        pattern
    };
    let full_path = body.contains('/');

    Regex::new(&glob_to_regex(body)).ok().map(|regex| IgnoreRule {
        regex,
        dir_only,
        full_path,
    })
}

/// Translate the simplified glob syntax into an anchored regex: `*` becomes
/// `.*`, everything else is escaped literally.
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    out.push('^');
    for c in pattern.chars() {
        if c == '*' {
            out.push_str(".*");
        } else {
            out.push_str(&regex::escape(&c.to_string()));
        }
    }
    out.push('$');
    out
}

/// Read patterns from every root-level dotfile whose name ends in `ignore`
/// (`.gitignore`, `.ccxignore`, ...). Files are visited in name order so
/// duplicate collapsing is deterministic.
fn load_repo_ignore_files(root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(String::from))
        .filter(|name| name.starts_with('.') && name.ends_with("ignore"))
        .collect();
    names.sort();

    let mut patterns = Vec::new();
    for name in names {
        match std::fs::read_to_string(root.join(&name)) {
            Ok(content) => {
                debug!(file = %name, "loaded repo ignore file");
                patterns.extend(parse_ignore_file(&content));
            }
            Err(e) => warn!(file = %name, error = %e, "failed to read repo ignore file"),
        }
    }
    patterns
}

/// Read the optional user-global ignore file under the home directory
fn load_global_ignore_file() -> Vec<String> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    let path = home.join(GLOBAL_IGNORE_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_ignore_file(&content),
        Err(_) => Vec::new(),
    }
}

/// One rule per line; `#` comments and blank lines are skipped
fn parse_ignore_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
