// Candidate path lists: the bundled default list and user wordlists

use crate::error::LoadError;
use crate::model::{FileKind, Severity};
use crate::targets::dedup_preserving_order;
use std::fs;
use std::path::Path;

pub const DEFAULT_WORDLIST: &str = include_str!("../wordlists/default.txt");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: String,
    pub kind: FileKind,
}

impl Candidate {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let kind = FileKind::from_path(&path);
        Self { path, kind }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl FileKind {
    /// Guess the file kind from the last path segment
    pub fn from_path(path: &str) -> Self {
        let lower = path.trim().trim_end_matches('/').to_lowercase();
        let name = lower.rsplit('/').next().unwrap_or(&lower);
        let is_yaml = name.ends_with(".yml") || name.ends_with(".yaml");

        if lower.ends_with(".git/config") {
            FileKind::GitConfig
        } else if name == ".env" || name.starts_with(".env.") || name.ends_with(".env") {
            FileKind::Env
        } else if is_yaml && (name.starts_with("docker-compose") || name.starts_with("compose")) {
            FileKind::DockerCompose
        } else if name.starts_with("phpinfo")
            || name == "server-status"
            || name == "server-info"
            || name.ends_with(".html")
            || name.ends_with(".htm")
        {
            FileKind::Html
        } else if name.starts_with("wp-config") {
            FileKind::WordpressConfig
        } else if name.ends_with(".php") && (name.contains("config") || name.contains("settings")) {
            FileKind::PhpConfig
        } else if is_yaml && name.starts_with("application") {
            FileKind::SpringYaml
        } else if name.starts_with("application") && name.ends_with(".properties") {
            FileKind::SpringProperties
        } else if is_yaml && name.starts_with("database") {
            FileKind::DatabaseYaml
        } else if name == "web.config" {
            FileKind::WebConfig
        } else if name.ends_with(".ini") {
            FileKind::Ini
        } else if name.starts_with("secrets") || name.starts_with("credentials") {
            FileKind::Secrets
        } else {
            FileKind::Generic
        }
    }
}

/// Parse wordlist text: one path per line, `#` comments and blanks skipped
pub fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Load wordlist from file
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let words = parse_wordlist(&content);
    if words.is_empty() {
        return Err(LoadError::EmptyWordlist(path.to_path_buf()));
    }

    Ok(words)
}

pub fn default_candidates() -> Vec<Candidate> {
    parse_wordlist(DEFAULT_WORDLIST)
        .into_iter()
        .map(Candidate::new)
        .collect()
}

/// Build the final candidate list.
///
/// `--files` and `--wordlist` entries replace the bundled defaults; with
/// neither, the defaults are used.
pub fn load_candidates(files: &[String], wordlist: Option<&Path>) -> Result<Vec<Candidate>, LoadError> {
    let mut paths: Vec<String> = files
        .iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    if let Some(path) = wordlist {
        paths.extend(load_wordlist(path)?);
    }

    if files.is_empty() && wordlist.is_none() {
        return Ok(default_candidates());
    }

    if paths.is_empty() {
        return Err(LoadError::NoCandidates);
    }

    Ok(dedup_preserving_order(paths)
        .into_iter()
        .map(Candidate::new)
        .collect())
}
