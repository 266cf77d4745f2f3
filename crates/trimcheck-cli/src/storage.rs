//! Persistent report storage
//!
//! Every `trimcheck run` is saved regardless of `--output` mode.
//! Directory layout: `<report-dir>/{host_port}_{timestamp}/`

use std::path::{Path, PathBuf};

use trimcheck_core::{HarnessConfig, RunReport, to_http_file};

/// Default `--report-dir`
pub const DEFAULT_REPORT_DIR: &str = ".trimcheck/reports";

const REDACTED: &str = "***";

/// Save a run under `base/{host_port}_{timestamp}/`.
///
/// Returns the report directory path on success.
pub fn save_report(
    report: &RunReport,
    config: &HarnessConfig,
    base: &Path,
) -> Result<PathBuf, std::io::Error> {
    let report_dir = base.join(build_dir_name(&report.base_url));
    std::fs::create_dir_all(&report_dir)?;

    // config.toml: snapshot of the effective config, credentials masked
    let config_toml = toml::to_string_pretty(&redacted(config))
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    std::fs::write(report_dir.join("config.toml"), config_toml)?;

    let summary = serde_json::json!({
        "verdict": report.verdict,
        "totals": report.totals,
        "sweep": report.sweep.as_ref().map(|s| serde_json::json!({
            "accessible": s.accessible,
            "total": s.total,
            "result": s.outcome.label(),
        })),
        "meta": {
            "started_at": report.started_at,
            "duration_secs": report.duration_secs,
            "base_url": report.base_url,
            "guard": report.guard.summary(),
            "skip_marker_version": report.skip_marker_version,
        },
    });
    std::fs::write(
        report_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary).unwrap_or_default(),
    )?;

    std::fs::write(
        report_dir.join("report.json"),
        serde_json::to_string_pretty(report).unwrap_or_default(),
    )?;

    let failures = report.failures();
    if !failures.is_empty() {
        std::fs::write(
            report_dir.join("failures.json"),
            serde_json::to_string_pretty(&failures).unwrap_or_default(),
        )?;
        let http_content = to_http_file(&failures, &report.base_url, "base_url");
        std::fs::write(report_dir.join("reproductions.http"), http_content)?;
    }

    Ok(report_dir)
}

fn redacted(config: &HarnessConfig) -> HarnessConfig {
    let mut config = config.clone();
    if config.api_token.is_some() {
        config.api_token = Some(REDACTED.to_string());
    }
    if config.api_key.is_some() {
        config.api_key = Some(REDACTED.to_string());
    }
    for (name, value) in &mut config.headers {
        let lower = name.to_lowercase();
        if ["auth", "token", "key", "cookie"].iter().any(|s| lower.contains(s)) {
            *value = REDACTED.to_string();
        }
    }
    config
}

/// `{host_port}_{timestamp}` e.g. `localhost_8080_20260205T193000`
fn build_dir_name(base_url: &str) -> String {
    let host_port = extract_host_port(base_url);
    let ts = chrono::Utc::now().format("%Y%m%dT%H%M%S");
    format!("{host_port}_{ts}")
}

/// `"http://localhost:8080/path"` → `"localhost_8080"`
fn extract_host_port(url: &str) -> String {
    url.split("://")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("unknown")
        .replace(':', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimcheck_core::{
        Category, FailureKind, GuardReport, Intent, Outcome, RequestSnapshot, ScenarioReport,
        Totals, Verdict, VerdictPolicy, VerdictStatus,
    };

    fn scenario(name: &str, outcome: Outcome) -> ScenarioReport {
        ScenarioReport {
            scenario: name.into(),
            endpoint: "GET /api/fetch_plan_data".into(),
            category: Category::Planning,
            intent: Intent::Contract,
            variant: "none".into(),
            expected: vec![400],
            status: Some(500),
            elapsed_ms: 20,
            outcome,
            request: Some(RequestSnapshot {
                method: "GET".into(),
                url: "http://localhost:8080/api/fetch_plan_data".into(),
                ..RequestSnapshot::default()
            }),
        }
    }

    fn report(scenarios: Vec<ScenarioReport>) -> RunReport {
        let mut r = RunReport {
            base_url: "http://localhost:8080".into(),
            started_at: "2026-02-05T19:30:00+00:00".into(),
            duration_secs: 0.4,
            skip_marker_version: 3,
            guard: GuardReport {
                reachable: true,
                status: Some(200),
                excerpt: None,
                error: None,
                elapsed_ms: 3,
            },
            scenarios,
            sweep: None,
            totals: Totals::default(),
            verdict: Verdict {
                status: VerdictStatus::Pass,
                exit_code: 0,
                reason: String::new(),
            },
        };
        r.judge(&VerdictPolicy::default());
        r
    }

    #[test]
    fn extract_host_port_standard() {
        assert_eq!(extract_host_port("http://localhost:8080"), "localhost_8080");
        assert_eq!(
            extract_host_port("https://trim-manager.appliedbellcurve.com"),
            "trim-manager.appliedbellcurve.com"
        );
        assert_eq!(
            extract_host_port("http://10.0.0.1:3000/v1"),
            "10.0.0.1_3000"
        );
    }

    #[test]
    fn dir_name_format() {
        let name = build_dir_name("http://localhost:8080");
        assert!(name.starts_with("localhost_8080_"));
        let ts = name.trim_start_matches("localhost_8080_");
        assert_eq!(ts.len(), "20260205T193000".len());
        assert_eq!(ts.as_bytes()[8], b'T');
    }

    #[test]
    fn passing_run_writes_no_failure_files() {
        let dir = tempfile::tempdir().unwrap();
        let r = report(vec![]);
        let path = save_report(&r, &HarnessConfig::default(), dir.path()).unwrap();

        assert!(path.join("summary.json").exists());
        assert!(path.join("report.json").exists());
        assert!(path.join("config.toml").exists());
        assert!(!path.join("failures.json").exists());
        assert!(!path.join("reproductions.http").exists());
    }

    #[test]
    fn failing_run_writes_reproductions() {
        let dir = tempfile::tempdir().unwrap();
        let r = report(vec![scenario(
            "fetch_plan_data_missing_params",
            Outcome::fail(
                FailureKind::ContractViolation,
                "GET /api/fetch_plan_data expected {400} got 500",
            ),
        )]);
        let path = save_report(&r, &HarnessConfig::default(), dir.path()).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path.join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["verdict"]["exit_code"], 1);
        assert_eq!(summary["totals"]["fail"], 1);

        let http = std::fs::read_to_string(path.join("reproductions.http")).unwrap();
        assert!(http.contains("GET {{base_url}}/api/fetch_plan_data"));

        let failures: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path.join("failures.json")).unwrap())
                .unwrap();
        assert_eq!(failures.as_array().unwrap().len(), 1);
    }

    #[test]
    fn credentials_are_masked_in_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HarnessConfig {
            api_token: Some("real-secret".into()),
            api_key: Some("real-key".into()),
            headers: [("X-Session-Token".to_string(), "real-header".to_string())].into(),
            ..HarnessConfig::default()
        };
        let path = save_report(&report(vec![]), &cfg, dir.path()).unwrap();
        let snapshot = std::fs::read_to_string(path.join("config.toml")).unwrap();
        assert!(!snapshot.contains("real-secret"));
        assert!(!snapshot.contains("real-key"));
        assert!(!snapshot.contains("real-header"));
        assert!(snapshot.contains(REDACTED));
    }
}
