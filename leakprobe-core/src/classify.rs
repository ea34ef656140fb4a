// Response classification: status code first, then a per-kind content check

use crate::candidates::Candidate;
use crate::model::{FileKind, Finding, Outcome};
use leakprobe_scanner::ProbeResult;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SNIPPET_LENGTH: usize = 300;

static ENV_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(export\s+)?[A-Za-z_][A-Za-z0-9_.]*\s*=").unwrap());

static INI_SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\[[^\]\r\n]+\]\s*$").unwrap());

static YAML_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[A-Za-z_][A-Za-z0-9_.-]*\s*:(\s|$)").unwrap());

// Content a catch-all page will not carry
const HTML_DISCLOSURE_MARKERS: &[&str] = &[
    "PHP Version",
    "phpinfo()",
    "PHP License",
    "Apache Server Status",
    "Apache Server Information",
    "Server Version:",
    "Index of /",
];

static SECRET_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Key names must start a word or follow a separator: DB_PASSWORD yes, bypass no
        (r#"(?im)(?:^|[^a-z0-9])pass(word|wd)?\s*[=:]\s*['"]?[^'"\s]+"#, "password"),
        (r#"(?im)(?:^|[^a-z0-9])api[_-]?key\s*[=:]\s*['"]?[^'"\s]+"#, "API key"),
        (r#"(?im)(?:^|[^a-z0-9])secret([_-]?key)?\s*[=:]\s*['"]?[^'"\s]+"#, "secret key"),
        (r#"(?im)(?:^|[^a-z0-9])(access|auth)[_-]?token\s*[=:]\s*['"]?[^'"\s]+"#, "access token"),
        (r"AKIA[0-9A-Z]{16}", "AWS access key"),
        (r"-----BEGIN [A-Z ]*PRIVATE KEY-----", "private key"),
        (r"gh[pousr]_[A-Za-z0-9]{36}", "GitHub token"),
        (r"sk_live_[0-9a-zA-Z]{24,}", "Stripe secret key"),
        (r"xox[baprs]-[0-9A-Za-z-]{10,}", "Slack token"),
        (r"(?i)(postgres(ql)?|mysql|mongodb(\+srv)?|redis|amqp)://[^\s:/]+:[^\s@/]+@", "database URL with credentials"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).unwrap(), label))
    .collect()
});

/// Classify a probe result for `candidate`.
///
/// Only a 200 can be a finding. With `verify_content` the body must also look
/// like the expected file, which filters out servers that answer every path
/// with the same HTML page. HTML kinds skip the HTML rejection and rely on
/// their signature alone.
pub fn classify(candidate: &Candidate, result: &ProbeResult, verify_content: bool) -> Outcome {
    if result.is_error() {
        return Outcome::Unreachable;
    }

    if result.status_code != 200 {
        return Outcome::NotFound;
    }

    if !verify_content {
        return Outcome::Found;
    }

    if result.body.trim().is_empty() {
        return Outcome::SoftNotFound;
    }

    if candidate.kind != FileKind::Html && looks_like_html(&result.body) {
        return Outcome::SoftNotFound;
    }

    if matches_signature(candidate.kind, &result.body) {
        Outcome::Found
    } else {
        Outcome::SoftNotFound
    }
}

pub fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(512).collect::<String>().to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html") || head.contains("<body")
}

/// Does `body` contain what a real file of this kind would?
pub fn matches_signature(kind: FileKind, body: &str) -> bool {
    match kind {
        FileKind::Env => ENV_ASSIGNMENT.is_match(body),
        FileKind::DockerCompose => {
            body.contains("services:") || (body.contains("image:") && YAML_KEY.is_match(body))
        }
        FileKind::PhpConfig => {
            body.contains("<?php") || body.contains("define(") || body.contains("$config")
        }
        FileKind::WordpressConfig => {
            body.contains("DB_NAME") || body.contains("DB_PASSWORD") || body.contains("table_prefix")
        }
        FileKind::GitConfig => {
            body.contains("[core]")
                || body.contains("[remote")
                || body.contains("repositoryformatversion")
        }
        FileKind::SpringYaml => {
            YAML_KEY.is_match(body)
                && (body.contains("spring:") || body.contains("server:") || body.contains("datasource"))
        }
        FileKind::SpringProperties => {
            body.contains("spring.") || body.contains("server.port") || ENV_ASSIGNMENT.is_match(body)
        }
        FileKind::DatabaseYaml => {
            body.contains("adapter:") || body.contains("database:") || body.contains("password:")
        }
        FileKind::WebConfig => body.contains("<configuration") || body.contains("connectionStrings"),
        FileKind::Ini => INI_SECTION.is_match(body) || ENV_ASSIGNMENT.is_match(body),
        FileKind::Secrets => YAML_KEY.is_match(body) || body.trim_start().starts_with('{'),
        FileKind::Html => HTML_DISCLOSURE_MARKERS.iter().any(|marker| body.contains(marker)),
        FileKind::Generic => true,
    }
}

/// Labels of recognisable secrets in `content`, in pattern order, no repeats
pub fn find_secret_markers(content: &str) -> Vec<String> {
    SECRET_PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(content))
        .map(|(_, label)| label.to_string())
        .collect()
}

/// First `max` characters of `body` with control characters stripped
pub fn snippet(body: &str, max: usize) -> Option<String> {
    let preview: String = body
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max)
        .collect();
    let preview = preview.trim_end().to_string();

    if preview.is_empty() { None } else { Some(preview) }
}

/// Size of the file on the server. A truncated body only tells us the cap,
/// so the Content-Length header wins when present.
fn reported_length(result: &ProbeResult) -> usize {
    match result.content_length {
        Some(length) if result.truncated => usize::try_from(length).unwrap_or(usize::MAX),
        _ => result.body.len(),
    }
}

impl Finding {
    pub fn from_probe(target: &str, candidate: &Candidate, result: &ProbeResult) -> Self {
        Self {
            target: target.to_string(),
            path: candidate.path.clone(),
            url: result.url.clone(),
            status_code: result.status_code,
            kind: candidate.kind,
            severity: candidate.severity(),
            content_type: result.content_type.clone(),
            content_length: reported_length(result),
            snippet: snippet(&result.body, SNIPPET_LENGTH),
            secrets: find_secret_markers(&result.body),
        }
    }
}
