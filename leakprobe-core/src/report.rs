// Report generation from a finished scan

use crate::model::{Finding, Severity};
use crate::probe::ScanSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

const SEPARATOR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
    Markdown,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(format!("Unknown report format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

pub fn generate_report(summary: &ScanSummary, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(summary)),
        ReportFormat::Json => generate_json_report(summary),
        ReportFormat::Csv => Ok(generate_csv_report(summary)),
        ReportFormat::Markdown => Ok(generate_markdown_report(summary)),
    }
}

/// Plain text listing of the findings, one block per file, and nothing else
pub fn generate_text_report(summary: &ScanSummary) -> String {
    let mut report = String::new();

    if summary.findings.is_empty() {
        report.push_str("No sensitive files found.\n");
        return report;
    }

    report.push_str("Potentially sensitive files found:\n");
    for finding in &summary.findings {
        report.push_str(&format!("URL: {}\n", finding.url));
        report.push_str(&format!("Severity: {}\n", finding.severity.as_str().to_uppercase()));
        if !finding.secrets.is_empty() {
            report.push_str(&format!("Secrets: {}\n", finding.secrets.join(", ")));
        }
        report.push_str(&format!(
            "Content:\n{}\n",
            finding.snippet.as_deref().unwrap_or("")
        ));
        report.push_str(&"-".repeat(SEPARATOR_WIDTH));
        report.push('\n');
    }

    report
}

pub fn generate_json_report(summary: &ScanSummary) -> Result<String, serde_json::Error> {
    let counts = SeverityCounts::from_findings(&summary.findings);

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "leakprobe",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
                "disclaimer": "For authorized security testing only"
            },
            "scan": {
                "targets": summary.targets,
                "start_time": summary.started_at.to_rfc3339(),
                "end_time": summary.finished_at.to_rfc3339(),
                "duration_seconds": summary.duration_secs(),
                "candidate_paths": summary.candidate_count,
                "requests_sent": summary.requests_sent
            },
            "summary": {
                "total_findings": summary.findings.len(),
                "not_found": summary.not_found,
                "soft_not_found": summary.soft_not_found,
                "unreachable": summary.unreachable,
                "unreachable_targets": summary.unreachable_targets,
                "severity_breakdown": counts
            },
            "findings": summary.findings
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_csv_report(summary: &ScanSummary) -> String {
    let mut report =
        String::from("target,path,url,status_code,kind,severity,content_length,secrets\n");

    for finding in &summary.findings {
        let row = [
            csv_field(&finding.target),
            csv_field(&finding.path),
            csv_field(&finding.url),
            finding.status_code.to_string(),
            finding.kind.as_str().to_string(),
            finding.severity.as_str().to_string(),
            finding.content_length.to_string(),
            csv_field(&finding.secrets.join(";")),
        ];
        report.push_str(&row.join(","));
        report.push('\n');
    }

    report
}

pub fn generate_markdown_report(summary: &ScanSummary) -> String {
    let counts = SeverityCounts::from_findings(&summary.findings);
    let mut report = String::new();

    report.push_str("# leakprobe scan report\n\n");
    report.push_str("| | |\n|---|---|\n");
    report.push_str(&format!(
        "| Scan date | {} |\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("| Duration | {:.2}s |\n", summary.duration_secs()));
    report.push_str(&format!("| Targets | {} |\n", format_targets(&summary.targets)));
    report.push_str(&format!("| Requests | {} |\n", summary.requests_sent));
    report.push_str(&format!("| Findings | {} |\n", counts.total()));
    report.push_str(&format!("| Unreachable | {} |\n\n", summary.unreachable));

    report.push_str("## Findings\n\n");
    if summary.findings.is_empty() {
        report.push_str("No sensitive files found.\n");
        return report;
    }

    report.push_str("| Severity | URL | Kind | Status | Size | Secrets |\n");
    report.push_str("|---|---|---|---|---|---|\n");
    for finding in &summary.findings {
        report.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            finding.severity.as_str().to_uppercase(),
            markdown_cell(&finding.url),
            finding.kind.as_str(),
            finding.status_code,
            finding.content_length,
            markdown_cell(&finding.secrets.join(", "))
        ));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_targets(targets: &[String]) -> String {
    if targets.len() == 1 {
        markdown_cell(&targets[0])
    } else {
        format!("{} URLs", targets.len())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_markdown_cell_escapes_pipes() {
        assert_eq!(markdown_cell("a|b\nc"), "a\\|b c");
    }
}
