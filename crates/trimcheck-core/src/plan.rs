//! Dry run plan and config validation
//!
//! Describes what a run *would* send without touching the network.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::HarnessConfig;
use crate::scenario::{Intent, Mode, ScenarioSet};

// ── Plan types ──

/// Complete dry run plan: scenarios, request counts, and config warnings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunPlan {
    pub base_url: String,
    pub scenarios: Vec<PlannedScenario>,
    /// Bare requests in the accessibility sweep (0 when disabled)
    pub sweep_requests: u64,
    /// Total requests that would be sent, guard included
    pub total_requests: u64,
    pub validations: Vec<Validation>,
}

/// Execution plan for a single scenario.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlannedScenario {
    pub scenario: String,
    pub endpoint: String,
    pub intent: Intent,
    pub variant: String,
    pub expected: Vec<u16>,
    /// `single`, `idempotent` or `load`
    pub mode: String,
    /// Requests including priming steps
    pub requests: u64,
    pub skip_markers: Vec<String>,
}

/// A validation check result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Validation {
    pub check: String,
    pub status: ValidationStatus,
    pub message: String,
}

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Build the plan for the given selection.
#[must_use]
pub fn build_plan(
    config: &HarnessConfig,
    set: &ScenarioSet,
    selected: &[&str],
    sweep: bool,
) -> RunPlan {
    let scenarios: Vec<PlannedScenario> = set
        .scenarios()
        .iter()
        .filter(|s| selected.contains(&s.name.as_str()))
        .map(|s| {
            let (mode, calls) = match s.mode {
                Mode::Single => ("single", 1),
                Mode::Idempotent => ("idempotent", 2),
                Mode::Load(plan) => ("load", plan.calls as u64),
            };
            PlannedScenario {
                scenario: s.name.clone(),
                endpoint: s.label(),
                intent: s.intent,
                variant: s.payload.variant_label().to_string(),
                expected: s.expected.iter().copied().collect(),
                mode: mode.to_string(),
                requests: calls + s.setup.len() as u64,
                skip_markers: s.skips.iter().map(|m| m.id.to_string()).collect(),
            }
        })
        .collect();

    let sweep_requests = if sweep { set.registry().len() as u64 } else { 0 };
    let total_requests = 1 + sweep_requests + scenarios.iter().map(|s| s.requests).sum::<u64>();

    RunPlan {
        base_url: config.base_url.clone(),
        scenarios,
        sweep_requests,
        total_requests,
        validations: validate_config(config),
    }
}

// ── Config validation ──

/// Patterns that suggest a placeholder value rather than a real credential.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-token",
    "your_token",
    "YOUR_TOKEN",
    "your-api-key",
    "YOUR_API_KEY",
    "CHANGEME",
    "changeme",
    "placeholder",
    "xxx",
    "XXX",
    "REPLACE_ME",
];

fn placeholder_in(value: &str) -> Option<&'static str> {
    if value.contains('<') && value.contains('>') {
        return Some("<...>");
    }
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|p| value.contains(p))
}

/// Validate config and produce validation results.
#[must_use]
pub fn validate_config(config: &HarnessConfig) -> Vec<Validation> {
    let mut checks = Vec::new();

    if config.base_url.starts_with("http://") || config.base_url.starts_with("https://") {
        checks.push(Validation {
            check: "base_url".into(),
            status: ValidationStatus::Ok,
            message: format!("base_url: {}", config.base_url),
        });
    } else {
        checks.push(Validation {
            check: "base_url".into(),
            status: ValidationStatus::Error,
            message: format!(
                "base_url: {} (missing http:// or https:// prefix)",
                config.base_url
            ),
        });
    }

    checks.push(Validation {
        check: "timeout".into(),
        status: ValidationStatus::Ok,
        message: format!("timeout: {}s per request", config.timeout_secs),
    });

    let credentials = [
        ("api_token", config.api_token.as_deref()),
        ("api_key", config.api_key.as_deref()),
    ];
    for (name, value) in credentials {
        let validation = match value {
            None => Validation {
                check: name.into(),
                status: ValidationStatus::Warning,
                message: format!("{name}: not set; authenticated endpoints may reject requests"),
            },
            Some(v) => match placeholder_in(v) {
                Some(p) => Validation {
                    check: name.into(),
                    status: ValidationStatus::Warning,
                    message: format!("{name}: contains '{p}', may be placeholder"),
                },
                None => Validation {
                    check: name.into(),
                    status: ValidationStatus::Ok,
                    message: format!("{name}: set"),
                },
            },
        };
        checks.push(validation);
    }

    for (key, value) in &config.headers {
        if let Some(p) = placeholder_in(value) {
            checks.push(Validation {
                check: "headers".into(),
                status: ValidationStatus::Warning,
                message: format!("{key}: contains '{p}', may be placeholder"),
            });
        }
    }

    if !config.status_overrides.is_empty() {
        checks.push(Validation {
            check: "status_overrides".into(),
            status: ValidationStatus::Ok,
            message: format!("status_overrides: {} applied", config.status_overrides.len()),
        });
    }

    checks
}

// ── Display helpers ──

impl RunPlan {
    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Dry run against {}: {} scenarios, {} requests planned\n",
            self.base_url,
            self.scenarios.len(),
            self.total_requests,
        ));

        for s in &self.scenarios {
            let expected: Vec<String> = s.expected.iter().map(u16::to_string).collect();
            lines.push(format!(
                "{} [{}] {} -> {{{}}}",
                s.scenario,
                s.intent,
                s.endpoint,
                expected.join(", ")
            ));
            if s.mode != "single" || s.requests > 1 {
                lines.push(format!("  Mode: {} ({} requests)", s.mode, s.requests));
            }
            if s.variant != "none" {
                lines.push(format!("  Payload: {}", s.variant));
            }
            if !s.skip_markers.is_empty() {
                lines.push(format!("  Skips: {}", s.skip_markers.join(", ")));
            }
        }
        if self.sweep_requests > 0 {
            lines.push(format!(
                "\nAccessibility sweep: {} endpoints",
                self.sweep_requests
            ));
        }
        lines.push(String::new());

        lines.push("Config validation:".into());
        for v in &self.validations {
            lines.push(format!("  [{}] {}", v.status, v.message));
        }

        lines.join("\n")
    }

    /// Returns true if any validation has Error status.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn names(set: &ScenarioSet) -> Vec<&str> {
        set.scenarios().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn counts_modes_and_setup() {
        let set = ScenarioSet::builtin().unwrap();
        let plan = build_plan(
            &HarnessConfig::default(),
            &set,
            &["health_check", "health_check_load", "fetch_scheduler_data_success"],
            false,
        );
        let by_name = |n: &str| plan.scenarios.iter().find(|s| s.scenario == n).unwrap();
        assert_eq!(by_name("health_check").requests, 1);
        assert_eq!(by_name("health_check_load").requests, 10);
        assert_eq!(by_name("health_check_load").mode, "load");
        assert_eq!(by_name("fetch_scheduler_data_success").requests, 2);
        assert_eq!(plan.total_requests, 1 + 1 + 10 + 2);
    }

    #[test]
    fn sweep_adds_one_request_per_endpoint() {
        let set = ScenarioSet::builtin().unwrap();
        let all = names(&set);
        let with = build_plan(&HarnessConfig::default(), &set, &all, true);
        let without = build_plan(&HarnessConfig::default(), &set, &all, false);
        assert_eq!(
            with.total_requests - without.total_requests,
            set.registry().len() as u64
        );
    }

    #[test]
    fn placeholder_credentials_warn() {
        let cfg = HarnessConfig {
            api_token: Some("your-token-here".into()),
            api_key: Some("k-123".into()),
            headers: BTreeMap::from([("X-Tenant".into(), "<tenant>".into())]),
            ..HarnessConfig::default()
        };
        let checks = validate_config(&cfg);
        let status = |c: &str| {
            checks
                .iter()
                .filter(|v| v.check == c)
                .map(|v| v.status)
                .collect::<Vec<_>>()
        };
        assert_eq!(status("api_token"), vec![ValidationStatus::Warning]);
        assert_eq!(status("api_key"), vec![ValidationStatus::Ok]);
        assert_eq!(status("headers"), vec![ValidationStatus::Warning]);
    }

    #[test]
    fn bad_base_url_is_error() {
        let cfg = HarnessConfig {
            base_url: "localhost:8000".into(),
            ..HarnessConfig::default()
        };
        let set = ScenarioSet::builtin().unwrap();
        assert!(build_plan(&cfg, &set, &[], false).has_errors());
    }

    #[test]
    fn plan_terminal_output() {
        let set = ScenarioSet::builtin().unwrap();
        let plan = build_plan(
            &HarnessConfig::default(),
            &set,
            &["optimise_metallizer_success"],
            true,
        );
        let text = plan.to_terminal();
        assert!(text.contains("1 scenarios"));
        assert!(text.contains(
            "optimise_metallizer_success [success] POST /api/optimise_metallizer -> {200}"
        ));
        assert!(text.contains("Payload: valid_metallizer"));
        assert!(text.contains("Accessibility sweep:"));
        assert!(text.contains("[OK] base_url: https://trim-manager.appliedbellcurve.com"));
    }
}
