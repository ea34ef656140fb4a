use anyhow::Context;
use clap::ArgMatches;
use colored::{ColoredString, Colorize};
use leakprobe_core::model::{Outcome, Severity};
use leakprobe_core::probe::{
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, ProbeCallback, ProbeOptions, ProbeRecord,
    ScanSummary, execute_probe,
};
use leakprobe_core::report::{ReportFormat, SeverityCounts, generate_report, save_report};
use leakprobe_core::{load_candidates, load_targets};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};

/// Everything the scan needs, lifted out of clap's matches
#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub targets: Vec<String>,
    pub hosts_file: Option<PathBuf>,
    pub files: Vec<String>,
    pub wordlist: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub user_agent: Option<String>,
    pub insecure: bool,
    pub verify_content: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl ScanArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        // Positional URLs first, then -t values
        let mut targets: Vec<String> = matches
            .get_many::<String>("URL")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        if let Some(vals) = matches.get_many::<String>("target") {
            targets.extend(vals.cloned());
        }

        let files = matches
            .get_many::<String>("files")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();

        let format = matches
            .get_one::<String>("format")
            .and_then(|f| f.parse().ok())
            .unwrap_or_default();

        Self {
            targets,
            hosts_file: matches.get_one::<String>("hosts-file").map(|p| expand_path(p)),
            files,
            wordlist: matches.get_one::<String>("wordlist").map(|p| expand_path(p)),
            output: matches.get_one::<String>("output").map(|p| expand_path(p)),
            format,
            timeout_secs: *matches.get_one::<u64>("timeout").unwrap_or(&DEFAULT_TIMEOUT_SECS),
            concurrency: *matches
                .get_one::<usize>("concurrency")
                .unwrap_or(&DEFAULT_CONCURRENCY),
            user_agent: matches.get_one::<String>("user-agent").cloned(),
            insecure: matches.get_flag("insecure"),
            verify_content: !matches.get_flag("no-verify-content"),
            verbose: matches.get_flag("verbose"),
            quiet: matches.get_flag("quiet"),
        }
    }
}

/// Expand a leading `~` in a user supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    PathBuf::from(expanded.as_ref())
}

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
    }
}

fn print_record(record: &ProbeRecord, verbose: bool) {
    match (&record.finding, record.outcome) {
        (Some(finding), _) => {
            println!(
                "{} {} {} ({} bytes)",
                "[FOUND]".green().bold(),
                severity_label(finding.severity),
                finding.url.bright_white(),
                finding.content_length
            );
            if !finding.secrets.is_empty() {
                println!(
                    "        {} {}",
                    "└─ secrets:".cyan(),
                    finding.secrets.join(", ").red()
                );
            }
        }
        (None, Outcome::SoftNotFound) if verbose => {
            println!(
                "{} {} ({} but content does not match)",
                "[SOFT-404]".yellow(),
                record.url,
                record.status_code
            );
        }
        (None, Outcome::NotFound) if verbose => {
            println!(
                "{} {} (Status Code: {})",
                "[-]".dimmed(),
                record.url.dimmed(),
                record.status_code
            );
        }
        (None, Outcome::Unreachable) if verbose => {
            println!(
                "{} {} ({})",
                "[ERROR]".red(),
                record.url,
                record.error.as_deref().unwrap_or("unknown error")
            );
        }
        _ => {}
    }
}

fn print_summary(summary: &ScanSummary) {
    let divider = "═".repeat(60);
    let counts = SeverityCounts::from_findings(&summary.findings);

    println!();
    println!("{}", divider.bright_blue().bold());

    if summary.findings.is_empty() {
        println!("{} No sensitive files were found.", "✓".green().bold());
    } else {
        println!(
            "{}",
            "The following potentially sensitive files were found:".bright_white().bold()
        );
        for finding in &summary.findings {
            println!("  {} {}", severity_label(finding.severity), finding.url);
        }
        println!();
        println!(
            "Findings: {}  (critical {}, high {}, medium {}, low {})",
            counts.total().to_string().bright_white().bold(),
            counts.critical,
            counts.high,
            counts.medium,
            counts.low
        );
    }

    println!(
        "Requests: {}  Not found: {}  Soft 404: {}  Unreachable: {}  ({:.2}s)",
        summary.requests_sent,
        summary.not_found,
        summary.soft_not_found,
        summary.unreachable,
        summary.duration_secs()
    );
    for target in &summary.unreachable_targets {
        println!("{} {} could not be reached", "⚠".yellow().bold(), target);
    }
    println!("{}", divider.bright_blue().bold());
}

/// Run a full scan: load inputs, probe, print, and optionally write the report
pub async fn handle_scan(args: &ScanArgs) -> anyhow::Result<()> {
    let targets = load_targets(&args.targets, args.hosts_file.as_deref())?;
    let candidates = load_candidates(&args.files, args.wordlist.as_deref())?;

    if !args.quiet {
        println!(
            "{} Scanning {} host(s) for {} path(s)",
            "→".blue(),
            targets.len().to_string().bright_white(),
            candidates.len().to_string().bright_white()
        );
        println!(
            "{} Workers: {}  Timeout: {}s  Content check: {}\n",
            "→".blue(),
            args.concurrency,
            args.timeout_secs,
            if args.verify_content { "on" } else { "off" }
        );
    }

    let options = ProbeOptions {
        targets,
        candidates,
        concurrency: args.concurrency,
        timeout_secs: args.timeout_secs,
        user_agent: args.user_agent.clone(),
        insecure: args.insecure,
        verify_content: args.verify_content,
        show_progress_bar: !args.quiet && !args.verbose,
        ..ProbeOptions::new(Vec::new(), Vec::new())
    };

    let verbose = args.verbose;
    let callback: ProbeCallback = Arc::new(move |record: &ProbeRecord| {
        print_record(record, verbose);
    });

    let summary = execute_probe(options, Some(callback))
        .await
        .context("Scan failed")?;

    print_summary(&summary);

    if let Some(ref output) = args.output {
        let report = generate_report(&summary, args.format).context("Failed to render report")?;
        save_report(&report, output)
            .with_context(|| format!("Error writing to output file {}", output.display()))?;
        info!("Results saved to {}", output.display());
        if !args.quiet {
            println!(
                "{} Results saved to {}",
                "✓".green().bold(),
                output.display().to_string().bright_white()
            );
        }
    }

    Ok(())
}
