// Target loading: command-line URLs and newline-delimited host files

use crate::error::LoadError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;
use url::Url;

/// True when `url` parses with an http(s) scheme and a host.
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Parse a single line as a target, trying to add http:// if needed
pub fn parse_target_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if validate_url(line) {
        return Some(line.to_string());
    }

    // "ftp://host" parses fine but must not become "http://ftp://host"
    if line.contains("://") {
        return None;
    }

    let with_scheme = format!("http://{}", line);
    if validate_url(&with_scheme) {
        return Some(with_scheme);
    }

    None
}

/// Load and parse targets from a file, skipping blanks, comments and bad lines
pub fn load_targets_from_file(path: &Path) -> Result<Vec<String>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut targets = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_target_line(trimmed) {
            Some(target) => targets.push(target),
            None => warn!(
                "Skipping invalid URL '{}' ({}:{})",
                trimmed,
                path.display(),
                line_no + 1
            ),
        }
    }

    if targets.is_empty() {
        return Err(LoadError::NoTargetsInFile(path.to_path_buf()));
    }

    Ok(targets)
}

/// Merge command-line targets with an optional hosts file.
///
/// A malformed command-line target is fatal, unlike a bad line in a file.
/// Duplicates are dropped, first occurrence wins.
pub fn load_targets(cli_targets: &[String], hosts_file: Option<&Path>) -> Result<Vec<String>, LoadError> {
    let mut targets = Vec::new();

    for raw in cli_targets {
        let target =
            parse_target_line(raw).ok_or_else(|| LoadError::InvalidTarget(raw.to_string()))?;
        targets.push(target);
    }

    if let Some(path) = hosts_file {
        targets.extend(load_targets_from_file(path)?);
    }

    if targets.is_empty() {
        return Err(LoadError::NoTargets);
    }

    Ok(dedup_preserving_order(targets))
}

pub(crate) fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
