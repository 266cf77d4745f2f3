//! Suite runner: guard, scenario state machine, sweep, report
//!
//! Each selected scenario runs at most once:
//! `REGISTERED -> PAYLOAD_BUILT -> INVOKED -> {PASS | SKIP | FAIL}`.
//! A fixture failure skips straight to FAIL without sending anything.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde_json::Value;
use trimcheck_core::scenario::{Mode, SetupStep, skip::SKIP_MARKERS_VERSION};
use trimcheck_core::{
    Category, EndpointSpec, ExecutionResult, FailureKind, HarnessConfig, Outcome, RunReport,
    Scenario, ScenarioReport, ScenarioSet, Totals, Verdict, VerdictPolicy, VerdictStatus,
};
use trimcheck_core::classify::{classify, judge_load};

use crate::engine::{ConnectivityError, Engine, EngineError};
use crate::guard;
use crate::load::run_load;
use crate::sweep::sweep;

/// Which scenarios to run
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Empty means every category
    pub categories: Vec<Category>,
    /// Substring of the scenario name
    pub name: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn matches(&self, scenario: &Scenario, category: Category) -> bool {
        (self.categories.is_empty() || self.categories.contains(&category))
            && self
                .name
                .as_deref()
                .is_none_or(|n| scenario.name.contains(n))
    }

    /// Selected scenarios paired with their endpoints, in table order
    #[must_use]
    pub fn select<'a>(&self, set: &'a ScenarioSet) -> Vec<(&'a Scenario, &'a EndpointSpec)> {
        set.scenarios()
            .iter()
            .filter_map(|s| set.endpoint_of(s).map(|e| (s, e)))
            .filter(|(s, e)| self.matches(s, e.category))
            .collect()
    }
}

/// Runs a validated scenario set against one deployment
pub struct SuiteRunner<'a> {
    config: &'a HarnessConfig,
    set: &'a ScenarioSet,
    selection: Selection,
    seed: Option<u64>,
    sweep: bool,
    policy: VerdictPolicy,
    progress: bool,
}

impl<'a> SuiteRunner<'a> {
    #[must_use]
    pub fn new(config: &'a HarnessConfig, set: &'a ScenarioSet) -> Self {
        Self {
            config,
            set,
            selection: Selection::default(),
            seed: None,
            sweep: true,
            policy: VerdictPolicy::default(),
            progress: false,
        }
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Shuffle the selected scenarios with a seeded RNG
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_sweep(mut self, sweep: bool) -> Self {
        self.sweep = sweep;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: VerdictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Print one line per scenario to stderr
    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Run the guard, every selected scenario, and the sweep.
    ///
    /// # Errors
    ///
    /// Returns error only if the HTTP client cannot be built or a configured
    /// header is invalid; every per-scenario problem is recorded in the
    /// report instead.
    pub fn run(&self) -> Result<RunReport, EngineError> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let start = Instant::now();

        let engine = Engine::new(self.config)?;
        let guard = guard::check_health(self.config, self.set.registry());

        let mut selected = self.selection.select(self.set);
        if let Some(seed) = self.seed {
            selected.shuffle(&mut SmallRng::seed_from_u64(seed));
            tracing::debug!(seed, "shuffled scenario order");
        }
        if self.progress {
            eprintln!(
                "Running {} scenarios against {}...",
                selected.len(),
                engine.base_url()
            );
        }

        let scenarios: Vec<ScenarioReport> = selected
            .into_iter()
            .map(|(scenario, endpoint)| {
                let report = self.execute(&engine, scenario, endpoint);
                log_outcome(scenario, &report);
                if self.progress {
                    eprintln!("{}", report.progress_line());
                }
                report
            })
            .collect();

        let sweep_report = self.sweep.then(|| sweep(&engine, self.set.registry()));

        let mut report = RunReport {
            base_url: self.config.base_url.clone(),
            started_at,
            duration_secs: 0.0,
            skip_marker_version: SKIP_MARKERS_VERSION,
            guard,
            scenarios,
            sweep: sweep_report,
            totals: Totals::default(),
            verdict: Verdict {
                status: VerdictStatus::Fail,
                exit_code: 0,
                reason: String::new(),
            },
        };
        report.judge(&self.policy);
        report.duration_secs = start.elapsed().as_secs_f64();
        Ok(report)
    }

    /// Drive one scenario through its state machine
    fn execute(
        &self,
        engine: &Engine,
        scenario: &Scenario,
        endpoint: &EndpointSpec,
    ) -> ScenarioReport {
        let mut report = ScenarioReport {
            scenario: scenario.name.clone(),
            endpoint: endpoint.label(),
            category: endpoint.category,
            intent: scenario.intent,
            variant: scenario.payload.variant_label().to_string(),
            expected: scenario.expected.iter().copied().collect(),
            status: None,
            elapsed_ms: 0,
            outcome: Outcome::Pass,
            request: None,
        };

        // REGISTERED -> PAYLOAD_BUILT
        let body = match scenario.payload.resolve() {
            Ok(body) => body,
            Err(e) => {
                report.outcome = Outcome::fail(FailureKind::FixtureInvariant, e.to_string());
                return report;
            }
        };

        // PAYLOAD_BUILT -> INVOKED
        let query = match self.prime(engine, scenario) {
            Ok(query) => query,
            Err(detail) => {
                report.outcome = Outcome::fail(FailureKind::FixtureInvariant, detail);
                return report;
            }
        };

        match scenario.mode {
            Mode::Single => match engine.invoke(endpoint, &query, body.as_ref()) {
                Ok(result) => {
                    report.outcome = classify(endpoint, scenario, &result);
                    record(&mut report, result);
                }
                Err(e) => report.outcome = connectivity_failure(endpoint, &e),
            },
            Mode::Idempotent => {
                let outcome =
                    idempotent(engine, scenario, endpoint, &query, body.as_ref(), &mut report);
                report.outcome = outcome;
            }
            Mode::Load(plan) => {
                let run = run_load(engine, endpoint, &query, body.as_ref(), &plan);
                report.outcome = judge_load(&plan, &run.statuses, run.wall_ms);
                if let Some(sample) = run.sample {
                    record(&mut report, sample);
                }
                report.elapsed_ms = run.wall_ms;
            }
        }
        report
    }

    /// Run the priming steps and return the query with captured values applied.
    ///
    /// Priming responses are not judged. A step whose payload cannot be built
    /// fails the scenario.
    fn prime(&self, engine: &Engine, scenario: &Scenario) -> Result<Vec<(String, String)>, String> {
        let mut query = scenario.query.clone();
        for step in &scenario.setup {
            let Some(endpoint) = self.set.registry().get(step.method, &step.path) else {
                continue;
            };
            let body = step.payload.resolve().map_err(|e| e.to_string())?;
            match engine.invoke(endpoint, &[], body.as_ref()) {
                Ok(result) => {
                    tracing::debug!(
                        scenario = %scenario.name,
                        step = %endpoint.label(),
                        status = result.status,
                        "priming step"
                    );
                    apply_capture(step, &result, &mut query);
                }
                Err(e) => {
                    tracing::warn!(
                        scenario = %scenario.name,
                        step = %endpoint.label(),
                        error = %e,
                        "priming step failed"
                    );
                }
            }
        }
        Ok(query)
    }
}

/// Send twice; a differing second status is a non-idempotent read
fn idempotent(
    engine: &Engine,
    scenario: &Scenario,
    endpoint: &EndpointSpec,
    query: &[(String, String)],
    body: Option<&Value>,
    report: &mut ScenarioReport,
) -> Outcome {
    let first = match engine.invoke(endpoint, query, body) {
        Ok(result) => result,
        Err(e) => return connectivity_failure(endpoint, &e),
    };
    let outcome = classify(endpoint, scenario, &first);
    let first_status = first.status;
    record(report, first);
    if outcome != Outcome::Pass {
        return outcome;
    }

    match engine.invoke(endpoint, query, body) {
        Ok(second) if second.status == first_status => Outcome::Pass,
        Ok(second) => Outcome::fail(
            FailureKind::NonIdempotentRead,
            format!(
                "{} returned {first_status} then {}",
                endpoint.label(),
                second.status
            ),
        )
        .with_excerpt(second.excerpt()),
        Err(e) => connectivity_failure(endpoint, &e),
    }
}

/// Replace the captured parameter when the priming call returned it
fn apply_capture(step: &SetupStep, result: &ExecutionResult, query: &mut Vec<(String, String)>) {
    let Some(capture) = &step.capture else {
        return;
    };
    if result.status != 200 {
        return;
    }
    let Some(value) = result
        .json
        .as_ref()
        .and_then(Value::as_object)
        .and_then(|obj| obj.get(&capture.key))
    else {
        return;
    };
    let value = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match query.iter_mut().find(|(k, _)| *k == capture.param) {
        Some((_, v)) => *v = value,
        None => query.push((capture.param.clone(), value)),
    }
}

fn record(report: &mut ScenarioReport, result: ExecutionResult) {
    report.status = Some(result.status);
    report.elapsed_ms = result.elapsed_ms;
    report.request = Some(result.request);
}

fn connectivity_failure(endpoint: &EndpointSpec, e: &ConnectivityError) -> Outcome {
    tracing::error!(endpoint = %endpoint.label(), error = %e, "request did not reach server");
    Outcome::fail(FailureKind::Connectivity, format!("{}: {e}", endpoint.label()))
}

fn log_outcome(scenario: &Scenario, report: &ScenarioReport) {
    match &report.outcome {
        Outcome::Pass => tracing::info!(
            scenario = %scenario.name,
            method = %scenario.method,
            path = %scenario.path,
            status = ?report.status,
            elapsed_ms = report.elapsed_ms,
            outcome = "pass",
        ),
        Outcome::Skip { reason, marker } => tracing::warn!(
            scenario = %scenario.name,
            method = %scenario.method,
            path = %scenario.path,
            status = ?report.status,
            elapsed_ms = report.elapsed_ms,
            outcome = "skip",
            marker = %marker,
            "{reason}"
        ),
        Outcome::Fail { kind, detail, .. } => tracing::warn!(
            scenario = %scenario.name,
            method = %scenario.method,
            path = %scenario.path,
            status = ?report.status,
            elapsed_ms = report.elapsed_ms,
            outcome = "fail",
            kind = kind.as_str(),
            "{detail}"
        ),
    }
}
