use glob::Pattern;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the per-project ignore file looked up in the target root.
pub const IGNORE_FILE_NAME: &str = ".feed-llm-ignore";

const DEFAULT_IGNORES: &str = include_str!("default_ignores.txt");

/// Glob patterns matched against an entry's base name.
///
/// A matching entry never becomes a tree node, and a matching directory
/// hides its whole subtree.
#[derive(Debug, Clone, Default)]
pub struct IgnorePredicate {
    patterns: Vec<Pattern>,
}

impl IgnorePredicate {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles `patterns`, skipping (and logging) any that fail to parse.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                match Pattern::new(raw) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        warn!(event = "ignore.pattern.invalid", pattern = raw, error = %e);
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Built-in defaults followed by `<root>/.feed-llm-ignore`, or nothing at
    /// all when `no_ignore` is set.
    pub fn load(root: &Path, no_ignore: bool) -> Self {
        if no_ignore {
            debug!(event = "ignore.load.disabled");
            return Self::empty();
        }

        let mut lines: Vec<String> = pattern_lines(DEFAULT_IGNORES).collect();

        let user_file = root.join(IGNORE_FILE_NAME);
        if user_file.is_file() {
            match fs::read_to_string(&user_file) {
                Ok(content) => lines.extend(pattern_lines(&content)),
                Err(e) => warn!(
                    event = "ignore.file.unreadable",
                    path = %user_file.display(),
                    error = %e
                ),
            }
        }

        let predicate = Self::from_patterns(lines);
        debug!(event = "ignore.load.completed", patterns = predicate.len());
        predicate
    }

    /// True if `name` matches any pattern. Case-sensitive.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn pattern_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}
