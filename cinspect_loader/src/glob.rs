/* Input path expansion: literal paths pass through, glob patterns are matched against a directory walk */

use crate::error::{LoadError, LoadResult};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const WILDCARDS: [char; 3] = ['*', '?', '['];

/* Check whether an input argument is a glob pattern rather than a path */
pub fn is_pattern(input: &str) -> bool {
    input.contains(WILDCARDS)
}

/* Expand every input into concrete file paths, sorted and deduplicated per pattern, in argument order */
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> LoadResult<Vec<PathBuf>> {
    let mut seen = BTreeSet::new();
    let mut paths = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let expanded = if is_pattern(input) {
            expand_pattern(input)?
        } else {
            vec![PathBuf::from(input)]
        };

        for path in expanded {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}

fn expand_pattern(pattern: &str) -> LoadResult<Vec<PathBuf>> {
    let normalized = pattern.replace('\\', "/");
    let (base, rest) = split_literal_prefix(&normalized);
    let regex = pattern_to_regex(&rest).map_err(|source| LoadError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let walk_root = if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base.clone()
    };

    let mut walker = WalkDir::new(&walk_root).follow_links(true).min_depth(1);
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut matches = BTreeSet::new();
    if walk_root.is_dir() {
        for entry in walker {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: walk_root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&walk_root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if regex.is_match(&relative) {
                matches.insert(base.join(&relative));
            }
        }
    }

    debug!(pattern, matched = matches.len(), "expanded input pattern");

    if matches.is_empty() {
        return Err(LoadError::NoMatches {
            pattern: pattern.to_string(),
        });
    }

    Ok(matches.into_iter().collect())
}

/* Split a pattern into its literal leading directories and the remaining pattern components */
fn split_literal_prefix(pattern: &str) -> (PathBuf, String) {
    let components: Vec<&str> = pattern.split('/').collect();
    let first_wild = components
        .iter()
        .position(|component| is_pattern(component))
        .unwrap_or(components.len().saturating_sub(1));

    let base = components[..first_wild].join("/");
    let base = if base.is_empty() && pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        Path::new(&base).to_path_buf()
    };

    (base, components[first_wild..].join("/"))
}

/* Only ranges keep their meaning inside a class; everything else is literal */
fn class_body(body: &str) -> String {
    body.chars()
        .map(|c| if c == '-' { c.to_string() } else { regex::escape(&c.to_string()) })
        .collect()
}

/* Translate a glob into an anchored regex over '/'-separated relative paths.
 * Unlike a shell, wildcards also match names starting with a dot. */
fn pattern_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let Some(close) = chars[i + 1..].iter().position(|c| *c == ']') else {
                    out.push_str(r"\[");
                    i += 1;
                    continue;
                };
                let class: String = chars[i + 1..i + 1 + close].iter().collect();
                out.push('[');
                let body = match class.strip_prefix('!') {
                    Some(negated) => {
                        out.push('^');
                        negated
                    }
                    None => class.as_str(),
                };
                out.push_str(&class_body(body));
                out.push(']');
                i += close + 2;
                continue;
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out.push('$');
    Regex::new(&out)
}
