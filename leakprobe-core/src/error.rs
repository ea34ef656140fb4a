use std::path::PathBuf;
use thiserror::Error;

/// Problems with user supplied input. All of these abort before any request is sent.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL '{0}'. Please provide a full URL (e.g., http://example.com)")]
    InvalidTarget(String),

    #[error("No valid URLs found in {}", .0.display())]
    NoTargetsInFile(PathBuf),

    #[error("Wordlist {} is empty or contains only comments", .0.display())]
    EmptyWordlist(PathBuf),

    #[error("Either a URL, --target or --hosts-file must be provided")]
    NoTargets,

    #[error("Candidate path list is empty")]
    NoCandidates,
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("No targets provided")]
    NoTargets,

    #[error("Candidate path list is empty")]
    NoCandidates,

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Scanner(#[from] leakprobe_scanner::ScanError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
