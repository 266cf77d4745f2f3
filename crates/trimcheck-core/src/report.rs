//! Run report types and terminal rendering

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::endpoint::Category;
use crate::response::RequestSnapshot;
use crate::scenario::Intent;
use crate::verdict::{Outcome, Totals, Verdict, VerdictPolicy};

// ── Report types ──

/// Result of the one-off connectivity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GuardReport {
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl GuardReport {
    /// `"reachable (200 in 84ms)"`
    #[must_use]
    pub fn summary(&self) -> String {
        match (&self.status, &self.error) {
            (Some(status), _) => format!("reachable ({status} in {}ms)", self.elapsed_ms),
            (None, Some(err)) => format!("unreachable ({err})"),
            (None, None) => "unreachable".to_string(),
        }
    }
}

/// One executed scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioReport {
    pub scenario: String,
    /// `"POST /api/optimise_metallizer"`
    pub endpoint: String,
    pub category: Category,
    pub intent: Intent,
    /// Payload variant label (`valid`, `missing_required`, `none`, ...)
    pub variant: String,
    pub expected: Vec<u16>,
    /// Observed status of the judged call; absent when nothing was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub elapsed_ms: u64,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSnapshot>,
}

impl ScenarioReport {
    /// Progress line: `"  health_check: PASS (200 in 84ms)"`
    #[must_use]
    pub fn progress_line(&self) -> String {
        let observed = self
            .status
            .map_or_else(|| "no response".to_string(), |s| s.to_string());
        match &self.outcome {
            Outcome::Pass => format!(
                "  {}: PASS ({observed} in {}ms)",
                self.scenario, self.elapsed_ms
            ),
            Outcome::Skip { reason, .. } => {
                format!("  {}: SKIP ({observed}: {reason})", self.scenario)
            }
            Outcome::Fail { kind, detail, .. } => {
                format!("  {}: FAIL [{}] {detail}", self.scenario, kind.as_str())
            }
        }
    }
}

/// One endpoint in the accessibility sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SweepLine {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SweepReport {
    pub accessible: usize,
    pub total: usize,
    pub outcome: Outcome,
    pub lines: Vec<SweepLine>,
}

/// Complete result of one run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    pub base_url: String,
    /// RFC 3339 start time
    pub started_at: String,
    pub duration_secs: f64,
    pub skip_marker_version: u32,
    pub guard: GuardReport,
    pub scenarios: Vec<ScenarioReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepReport>,
    pub totals: Totals,
    pub verdict: Verdict,
}

impl RunReport {
    /// Fold scenario and sweep outcomes into totals and a verdict
    #[must_use]
    pub fn judge(&mut self, policy: &VerdictPolicy) -> &Verdict {
        let outcomes: Vec<&Outcome> = self
            .scenarios
            .iter()
            .map(|s| &s.outcome)
            .chain(self.sweep.as_ref().map(|s| &s.outcome))
            .collect();
        self.totals = Totals::count(outcomes.iter().copied());
        self.verdict = policy.verdict(&outcomes);
        &self.verdict
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.scenarios.iter().filter(|s| s.outcome.is_fail()).collect()
    }

    #[must_use]
    pub fn skips(&self) -> Vec<&ScenarioReport> {
        self.scenarios
            .iter()
            .filter(|s| matches!(s.outcome, Outcome::Skip { .. }))
            .collect()
    }

    /// `"PASS: 120 passed, 9 skipped, 0 failed (exit 0)"`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} passed, {} skipped, {} failed (exit {})",
            self.verdict.status,
            self.totals.pass,
            self.totals.skip,
            self.totals.fail,
            self.verdict.exit_code
        )
    }

    /// Human-readable report for stdout
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Target: {}", self.base_url));
        lines.push(format!("Guard:  {}", self.guard.summary()));
        lines.push(String::new());

        let failures = self.failures();
        if !failures.is_empty() {
            lines.push(format!("Failures ({}):", failures.len()));
            for f in failures {
                if let Outcome::Fail {
                    kind,
                    detail,
                    excerpt,
                } = &f.outcome
                {
                    lines.push(format!("  [{}] {}: {detail}", kind.as_str(), f.scenario));
                    lines.push(format!("         variant: {}", f.variant));
                    if let Some(ex) = excerpt {
                        lines.push(format!("         body: {ex}"));
                    }
                }
            }
            lines.push(String::new());
        }

        let skips = self.skips();
        if !skips.is_empty() {
            lines.push(format!("Skipped ({}):", skips.len()));
            for s in skips {
                if let Outcome::Skip { reason, .. } = &s.outcome {
                    lines.push(format!("  {}: {reason}", s.scenario));
                }
            }
            lines.push(String::new());
        }

        if let Some(sweep) = &self.sweep {
            lines.push(format!(
                "Accessibility: {}/{} endpoints ({})",
                sweep.accessible,
                sweep.total,
                sweep.outcome.label()
            ));
            for line in sweep.lines.iter().filter(|l| !l.accessible) {
                let observed = line
                    .status
                    .map(|s| s.to_string())
                    .or_else(|| line.error.clone())
                    .unwrap_or_default();
                lines.push(format!("  inaccessible: {} ({observed})", line.endpoint));
            }
            lines.push(String::new());
        }

        lines.push(format!("{}: {}", self.verdict.status, self.verdict.reason));
        lines.push(self.summary_line());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{FailureKind, VerdictStatus};

    fn scenario(name: &str, status: Option<u16>, outcome: Outcome) -> ScenarioReport {
        ScenarioReport {
            scenario: name.to_string(),
            endpoint: "GET /".to_string(),
            category: Category::Health,
            intent: Intent::Success,
            variant: "none".to_string(),
            expected: vec![200],
            status,
            elapsed_ms: 84,
            outcome,
            request: None,
        }
    }

    fn report(scenarios: Vec<ScenarioReport>) -> RunReport {
        let mut r = RunReport {
            base_url: "http://127.0.0.1:8000".into(),
            started_at: "2026-01-01T00:00:00Z".into(),
            duration_secs: 1.5,
            skip_marker_version: 3,
            guard: GuardReport {
                reachable: true,
                status: Some(200),
                excerpt: Some("ok".into()),
                error: None,
                elapsed_ms: 12,
            },
            scenarios,
            sweep: None,
            totals: Totals::default(),
            verdict: Verdict {
                status: VerdictStatus::Fail,
                exit_code: 0,
                reason: String::new(),
            },
        };
        r.judge(&VerdictPolicy::default());
        r
    }

    #[test]
    fn progress_lines() {
        let pass = scenario("health_check", Some(200), Outcome::Pass);
        assert_eq!(pass.progress_line(), "  health_check: PASS (200 in 84ms)");

        let skip = scenario(
            "optimise_wastage_success",
            Some(500),
            Outcome::Skip {
                reason: "Solver license currently in use".into(),
                marker: "solver_license".into(),
            },
        );
        assert_eq!(
            skip.progress_line(),
            "  optimise_wastage_success: SKIP (500: Solver license currently in use)"
        );

        let conn = scenario(
            "health_check",
            None,
            Outcome::fail(FailureKind::Connectivity, "connection refused"),
        );
        assert_eq!(
            conn.progress_line(),
            "  health_check: FAIL [connectivity] connection refused"
        );
    }

    #[test]
    fn judge_counts_sweep() {
        let mut r = report(vec![scenario("a", Some(200), Outcome::Pass)]);
        r.sweep = Some(SweepReport {
            accessible: 1,
            total: 2,
            outcome: Outcome::fail(FailureKind::SweepShortfall, "1/2"),
            lines: vec![],
        });
        let v = r.judge(&VerdictPolicy::default()).clone();
        assert_eq!(v.status, VerdictStatus::Fail);
        assert_eq!(v.exit_code, 1);
        assert_eq!(r.totals.total(), 2);
    }

    #[test]
    fn summary_line_snapshot() {
        let r = report(vec![
            scenario("a", Some(200), Outcome::Pass),
            scenario(
                "b",
                Some(500),
                Outcome::Skip {
                    reason: "x".into(),
                    marker: "y".into(),
                },
            ),
        ]);
        insta::assert_snapshot!(r.summary_line(), @"PASS: 1 passed, 1 skipped, 0 failed (exit 0)");
    }

    #[test]
    fn terminal_lists_failures_and_skips() {
        let r = report(vec![
            scenario(
                "fetch_plan_data_missing_params",
                Some(500),
                Outcome::fail(
                    FailureKind::ContractViolation,
                    "GET /api/fetch_plan_data expected {400} got 500",
                )
                .with_excerpt("Internal Server Error"),
            ),
            scenario(
                "b",
                Some(404),
                Outcome::Skip {
                    reason: "Sales forecast not available in backend".into(),
                    marker: "sales_forecast_missing".into(),
                },
            ),
        ]);
        insta::assert_snapshot!(r.to_terminal(), @r"
        Target: http://127.0.0.1:8000
        Guard:  reachable (200 in 12ms)

        Failures (1):
          [contract_violation] fetch_plan_data_missing_params: GET /api/fetch_plan_data expected {400} got 500
                 variant: none
                 body: Internal Server Error

        Skipped (1):
          b: Sales forecast not available in backend

        FAIL: 1 failures (1 contract, 0 fixture)
        FAIL: 0 passed, 1 skipped, 1 failed (exit 1)
        ");
    }

    #[test]
    fn report_round_trips_through_json() {
        let r = report(vec![scenario("a", Some(200), Outcome::Pass)]);
        let json = serde_json::to_string(&r).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scenarios, r.scenarios);
        assert_eq!(back.verdict, r.verdict);
    }
}
