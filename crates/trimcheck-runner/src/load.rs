//! Load pool: fan one request out over a fixed set of scoped workers

use std::time::Instant;

use serde_json::Value;
use trimcheck_core::scenario::LoadPlan;
use trimcheck_core::{EndpointSpec, ExecutionResult};

use crate::engine::Engine;

/// Joined results of one load run
#[derive(Debug)]
pub struct LoadRun {
    /// One entry per call; `None` when no response arrived
    pub statuses: Vec<Option<u16>>,
    pub wall_ms: u64,
    /// First call that produced a response, for the report
    pub sample: Option<ExecutionResult>,
}

/// Issue `plan.calls` requests across `plan.workers` threads.
///
/// Each worker owns its share of the calls and returns its own results; they
/// are merged only after every worker has joined.
#[must_use]
pub fn run_load(
    engine: &Engine,
    endpoint: &EndpointSpec,
    query: &[(String, String)],
    body: Option<&Value>,
    plan: &LoadPlan,
) -> LoadRun {
    let workers = plan.workers.clamp(1, plan.calls.max(1));
    let start = Instant::now();

    let per_worker: Vec<Vec<Result<ExecutionResult, String>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let share = (w..plan.calls).step_by(workers).count();
                let handle = scope.spawn(move || {
                    (0..share)
                        .map(|_| {
                            engine
                                .invoke(endpoint, query, body)
                                .map_err(|e| e.to_string())
                        })
                        .collect::<Vec<_>>()
                });
                (share, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(share, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| vec![Err("worker panicked".to_string()); share])
            })
            .collect()
    });

    let wall_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut statuses = Vec::with_capacity(plan.calls);
    let mut sample = None;
    for result in per_worker.into_iter().flatten() {
        match result {
            Ok(r) => {
                statuses.push(Some(r.status));
                if sample.is_none() {
                    sample = Some(r);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "load call failed");
                statuses.push(None);
            }
        }
    }

    LoadRun {
        statuses,
        wall_ms,
        sample,
    }
}
