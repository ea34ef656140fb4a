pub mod candidates;
pub mod classify;
pub mod error;
pub mod model;
pub mod probe;
pub mod report;
pub mod targets;

use colored::Colorize;

pub use candidates::{Candidate, load_candidates, load_wordlist};
pub use error::{LoadError, ProbeError};
pub use model::{FileKind, Finding, Outcome, Severity};
pub use probe::{ProbeCallback, ProbeOptions, ProbeRecord, ScanSummary, execute_probe};
pub use report::{ReportFormat, generate_report, save_report};
pub use targets::load_targets;

pub fn print_banner() {
    let banner = r#"
  _            _                       _
 | | ___  __ _| | ___ __  _ __ ___  | |__   ___
 | |/ _ \/ _` | |/ / '_ \| '__/ _ \ | '_ \ / _ \
 | |  __/ (_| |   <| |_) | | | (_) || |_) |  __/
 |_|\___|\__,_|_|\_\ .__/|_|  \___(_)_.__/ \___|
                   |_|"#;
    eprintln!("{}", banner.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_white(),
        "- exposed sensitive file scanner. For authorized testing only.".dimmed()
    );
}
