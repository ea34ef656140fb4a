// Tests for candidate path lists

use leakprobe_core::candidates::{
    Candidate, DEFAULT_WORDLIST, default_candidates, load_candidates, load_wordlist, parse_wordlist,
};
use leakprobe_core::error::LoadError;
use leakprobe_core::model::{FileKind, Severity};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Default list
// ============================================================================

#[test]
fn test_default_candidates() {
    let paths: Vec<String> = default_candidates().into_iter().map(|c| c.path).collect();

    assert_eq!(
        paths,
        vec![
            ".env",
            "docker-compose.yml",
            "config.php",
            "wp-config.php",
            ".git/config",
            "application.yml",
            "application.properties",
            "database.yml",
            "web.config",
            "config.ini",
            "secrets.yml",
        ]
    );
}

#[test]
fn test_default_wordlist_has_comment_header() {
    assert!(DEFAULT_WORDLIST.starts_with('#'));
    assert_eq!(parse_wordlist(DEFAULT_WORDLIST).len(), 11);
}

// ============================================================================
// File kinds
// ============================================================================

#[test]
fn test_file_kind_from_default_paths() {
    assert_eq!(FileKind::from_path(".env"), FileKind::Env);
    assert_eq!(FileKind::from_path("docker-compose.yml"), FileKind::DockerCompose);
    assert_eq!(FileKind::from_path("config.php"), FileKind::PhpConfig);
    assert_eq!(FileKind::from_path("wp-config.php"), FileKind::WordpressConfig);
    assert_eq!(FileKind::from_path(".git/config"), FileKind::GitConfig);
    assert_eq!(FileKind::from_path("application.yml"), FileKind::SpringYaml);
    assert_eq!(FileKind::from_path("application.properties"), FileKind::SpringProperties);
    assert_eq!(FileKind::from_path("database.yml"), FileKind::DatabaseYaml);
    assert_eq!(FileKind::from_path("web.config"), FileKind::WebConfig);
    assert_eq!(FileKind::from_path("config.ini"), FileKind::Ini);
    assert_eq!(FileKind::from_path("secrets.yml"), FileKind::Secrets);
}

#[test]
fn test_file_kind_variants() {
    assert_eq!(FileKind::from_path("/.env.production"), FileKind::Env);
    assert_eq!(FileKind::from_path("api/.ENV"), FileKind::Env);
    assert_eq!(FileKind::from_path("docker-compose.prod.yaml"), FileKind::DockerCompose);
    assert_eq!(FileKind::from_path("config/database.yml"), FileKind::DatabaseYaml);
    assert_eq!(FileKind::from_path("backup.zip"), FileKind::Generic);
    assert_eq!(FileKind::from_path("phpinfo.php"), FileKind::Html);
    assert_eq!(FileKind::from_path("server-status"), FileKind::Html);
    assert_eq!(FileKind::from_path("admin/debug.html"), FileKind::Html);
}

#[test]
fn test_candidate_severity() {
    assert_eq!(Candidate::new(".env").severity(), Severity::Critical);
    assert_eq!(Candidate::new(".git/config").severity(), Severity::High);
    assert_eq!(Candidate::new("docker-compose.yml").severity(), Severity::Medium);
    assert_eq!(Candidate::new("config.ini").severity(), Severity::Low);
}

// ============================================================================
// Wordlists
// ============================================================================

#[test]
fn test_load_wordlist_with_comments_and_blanks() {
    let temp_dir = TempDir::new().unwrap();
    let wordlist_path = temp_dir.path().join("paths.txt");

    fs::write(&wordlist_path, "# Comment line\n.env\n\n  backup.sql  \n# Another\n\t.htpasswd\t").unwrap();

    let words = load_wordlist(&wordlist_path).unwrap();
    assert_eq!(words, vec![".env", "backup.sql", ".htpasswd"]);
}

#[test]
fn test_load_wordlist_only_comments() {
    let temp_dir = TempDir::new().unwrap();
    let wordlist_path = temp_dir.path().join("paths.txt");

    fs::write(&wordlist_path, "# Comment 1\n# Comment 2\n").unwrap();

    let result = load_wordlist(&wordlist_path);
    assert!(matches!(result, Err(LoadError::EmptyWordlist(_))));
}

#[test]
fn test_load_wordlist_nonexistent_file() {
    let result = load_wordlist(&PathBuf::from("/nonexistent/path/wordlist.txt"));
    assert!(matches!(result, Err(LoadError::Read { .. })));
}

// ============================================================================
// Candidate list assembly
// ============================================================================

#[test]
fn test_load_candidates_defaults() {
    let candidates = load_candidates(&[], None).unwrap();
    assert_eq!(candidates, default_candidates());
}

#[test]
fn test_load_candidates_files_override_defaults() {
    let files = vec![".env".to_string(), "backup.sql".to_string(), ".env".to_string()];
    let candidates = load_candidates(&files, None).unwrap();

    let paths: Vec<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec![".env", "backup.sql"]);
}

#[test]
fn test_load_candidates_files_and_wordlist() {
    let temp_dir = TempDir::new().unwrap();
    let wordlist_path = temp_dir.path().join("paths.txt");
    fs::write(&wordlist_path, "secrets.yml\n.env\n").unwrap();

    let files = vec![".env".to_string()];
    let candidates = load_candidates(&files, Some(wordlist_path.as_path())).unwrap();

    let paths: Vec<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec![".env", "secrets.yml"]);
}

#[test]
fn test_load_candidates_blank_files_is_error() {
    let files = vec!["  ".to_string()];
    let result = load_candidates(&files, None);
    assert!(matches!(result, Err(LoadError::NoCandidates)));
}
