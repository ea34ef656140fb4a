// Probe orchestration: every candidate path against every target, bounded parallelism

use crate::candidates::Candidate;
use crate::classify::classify;
use crate::error::ProbeError;
use crate::model::{Finding, Outcome};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use leakprobe_scanner::{ProbeResult, Prober};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Options for configuring a probe run
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub targets: Vec<String>,
    pub candidates: Vec<Candidate>,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: Option<String>,
    pub insecure: bool,
    pub verify_content: bool,
    pub show_progress_bar: bool,
}

impl ProbeOptions {
    pub fn new(targets: Vec<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            targets,
            candidates,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: None,
            insecure: false,
            verify_content: true,
            show_progress_bar: false,
        }
    }
}

/// One classified request
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    pub target: String,
    pub path: String,
    pub url: String,
    pub status_code: u16,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub finding: Option<Finding>,
}

impl ProbeRecord {
    fn new(target: &str, candidate: &Candidate, result: ProbeResult, verify_content: bool) -> Self {
        let outcome = classify(candidate, &result, verify_content);
        let finding = (outcome == Outcome::Found)
            .then(|| Finding::from_probe(target, candidate, &result));

        Self {
            target: target.to_string(),
            path: candidate.path.clone(),
            url: result.url,
            status_code: result.status_code,
            outcome,
            error: result.error,
            finding,
        }
    }
}

/// Called for every record as soon as its request completes
pub type ProbeCallback = Arc<dyn Fn(&ProbeRecord) + Send + Sync>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub targets: Vec<String>,
    pub candidate_count: usize,
    pub requests_sent: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub findings: Vec<Finding>,
    pub not_found: usize,
    pub soft_not_found: usize,
    pub unreachable: usize,
    /// Targets for which every request failed at the transport level
    pub unreachable_targets: Vec<String>,
}

impl ScanSummary {
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    fn from_records(
        targets: Vec<String>,
        candidate_count: usize,
        started_at: DateTime<Utc>,
        records: Vec<ProbeRecord>,
    ) -> Self {
        let requests_sent = records.len();
        let mut not_found = 0;
        let mut soft_not_found = 0;
        let mut unreachable = 0;
        let mut failures_per_target: HashMap<&str, usize> = HashMap::new();

        for record in &records {
            match record.outcome {
                Outcome::Found => {}
                Outcome::NotFound => not_found += 1,
                Outcome::SoftNotFound => soft_not_found += 1,
                Outcome::Unreachable => {
                    unreachable += 1;
                    *failures_per_target.entry(record.target.as_str()).or_default() += 1;
                }
            }
        }

        let unreachable_targets: Vec<String> = targets
            .iter()
            .filter(|t| failures_per_target.get(t.as_str()) == Some(&candidate_count))
            .cloned()
            .collect();

        let findings = records.into_iter().filter_map(|r| r.finding).collect();

        Self {
            targets,
            candidate_count,
            requests_sent,
            started_at,
            finished_at: Utc::now(),
            findings,
            not_found,
            soft_not_found,
            unreachable,
            unreachable_targets,
        }
    }
}

/// Execute a probe run with the given options.
///
/// Findings come back in target order then candidate order, whatever order
/// the requests finished in.
pub async fn execute_probe(
    options: ProbeOptions,
    callback: Option<ProbeCallback>,
) -> Result<ScanSummary, ProbeError> {
    let ProbeOptions {
        targets,
        candidates,
        concurrency,
        timeout_secs,
        max_redirects,
        user_agent,
        insecure,
        verify_content,
        show_progress_bar,
    } = options;

    if targets.is_empty() {
        return Err(ProbeError::NoTargets);
    }

    if candidates.is_empty() {
        return Err(ProbeError::NoCandidates);
    }

    let mut jobs = Vec::with_capacity(targets.len() * candidates.len());
    for target in &targets {
        for candidate in &candidates {
            let url = build_probe_url(target, &candidate.path)?;
            jobs.push((target.clone(), candidate.clone(), url));
        }
    }

    let total_requests = jobs.len();
    let concurrency = concurrency.max(1);
    info!(
        "Starting scan of {} target(s): {} paths, {} requests, {} workers",
        targets.len(),
        candidates.len(),
        total_requests,
        concurrency
    );

    let mut builder = Prober::builder()
        .with_timeout(timeout_secs)
        .with_max_redirects(max_redirects)
        .with_insecure(insecure);
    if let Some(user_agent) = user_agent {
        builder = builder.with_user_agent(user_agent);
    }
    let prober = builder.build()?;

    let progress_bar = show_progress_bar.then(|| {
        let pb = ProgressBar::new(total_requests as u64);
        pb.set_style(
            ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    });

    let started_at = Utc::now();
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = Vec::with_capacity(total_requests);

    for (index, (target, candidate, url)) in jobs.into_iter().enumerate() {
        let prober = prober.clone();
        let semaphore = semaphore.clone();
        let progress_bar = progress_bar.clone();
        let callback = callback.clone();

        tasks.push(tokio::spawn(async move {
            // Held until the request is classified
            let _permit = semaphore.acquire().await;

            let result = prober.probe(&url).await;
            let record = ProbeRecord::new(&target, &candidate, result, verify_content);
            log_record(&record);

            if let Some(callback) = callback {
                match progress_bar {
                    Some(ref pb) => pb.suspend(|| callback(&record)),
                    None => callback(&record),
                }
            }
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }

            (index, record)
        }));
    }

    let mut indexed = Vec::with_capacity(total_requests);
    for joined in join_all(tasks).await {
        indexed.push(joined?);
    }
    indexed.sort_by_key(|(index, _)| *index);
    let records: Vec<ProbeRecord> = indexed.into_iter().map(|(_, record)| record).collect();

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let summary = ScanSummary::from_records(targets, candidates.len(), started_at, records);

    for target in &summary.unreachable_targets {
        warn!("Target {} was unreachable for every path", target);
    }
    info!(
        "Scan complete: {} finding(s) from {} requests in {:.2}s",
        summary.findings.len(),
        summary.requests_sent,
        summary.duration_secs()
    );

    Ok(summary)
}

fn log_record(record: &ProbeRecord) {
    match record.outcome {
        Outcome::Found => info!("Found: {} (Status Code: {})", record.url, record.status_code),
        Outcome::NotFound => debug!("Not Found: {} (Status Code: {})", record.url, record.status_code),
        Outcome::SoftNotFound => debug!(
            "Ignoring {}: status {} but content does not match",
            record.url, record.status_code
        ),
        Outcome::Unreachable => debug!(
            "Error checking {}: {}",
            record.url,
            record.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Build a probe URL from a target and a candidate path.
///
/// Any path on the target is kept as a prefix; query and fragment are dropped.
pub fn build_probe_url(base_url: &str, path: &str) -> Result<String, ProbeError> {
    let mut url = Url::parse(base_url).map_err(|e| ProbeError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ProbeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }

    let current_path = url.path().to_string();
    let path_base = if current_path.ends_with('/') {
        current_path
    } else {
        format!("{}/", current_path)
    };

    let new_path = format!("{}{}", path_base, path.trim_start_matches('/'));
    url.set_path(&new_path);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url.to_string())
}
