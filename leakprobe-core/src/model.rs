use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of file a candidate path points at. Drives both the severity
/// label and the content check applied to a 200 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Env,
    DockerCompose,
    PhpConfig,
    WordpressConfig,
    GitConfig,
    SpringYaml,
    SpringProperties,
    DatabaseYaml,
    WebConfig,
    Ini,
    Secrets,
    /// Pages that are HTML by nature: phpinfo, server-status, stray .html files
    Html,
    Generic,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Env => "env",
            FileKind::DockerCompose => "docker_compose",
            FileKind::PhpConfig => "php_config",
            FileKind::WordpressConfig => "wordpress_config",
            FileKind::GitConfig => "git_config",
            FileKind::SpringYaml => "spring_yaml",
            FileKind::SpringProperties => "spring_properties",
            FileKind::DatabaseYaml => "database_yaml",
            FileKind::WebConfig => "web_config",
            FileKind::Ini => "ini",
            FileKind::Secrets => "secrets",
            FileKind::Html => "html",
            FileKind::Generic => "generic",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FileKind::Env | FileKind::WordpressConfig | FileKind::Secrets => Severity::Critical,
            FileKind::PhpConfig
            | FileKind::GitConfig
            | FileKind::SpringYaml
            | FileKind::SpringProperties
            | FileKind::DatabaseYaml
            | FileKind::WebConfig => Severity::High,
            FileKind::DockerCompose | FileKind::Html | FileKind::Generic => Severity::Medium,
            FileKind::Ini => Severity::Low,
        }
    }
}

/// How a single (target, path) request turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Found,
    NotFound,
    /// 200, but the body is a catch-all page rather than the file
    SoftNotFound,
    Unreachable,
}

/// A target+path combination confirmed accessible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub target: String,
    pub path: String,
    pub url: String,
    pub status_code: u16,
    pub kind: FileKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub secrets: Vec<String>,
}
