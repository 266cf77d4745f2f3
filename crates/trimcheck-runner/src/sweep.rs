//! Accessibility sweep: one bare request per registered endpoint

use serde_json::json;
use trimcheck_core::classify::{is_accessible, judge_sweep};
use trimcheck_core::{EndpointRegistry, HttpMethod, SweepLine, SweepReport};

use crate::engine::Engine;

/// Send each endpoint a bare request and judge the share that answered.
///
/// POST sends `{}` (file uploads send nothing); GET sends no query.
#[must_use]
pub fn sweep(engine: &Engine, registry: &EndpointRegistry) -> SweepReport {
    let empty = json!({});
    let lines: Vec<SweepLine> = registry
        .iter()
        .map(|endpoint| {
            let body = (endpoint.method == HttpMethod::Post && !endpoint.is_file_upload())
                .then_some(&empty);
            match engine.invoke(endpoint, &[], body) {
                Ok(result) => SweepLine {
                    endpoint: endpoint.label(),
                    status: Some(result.status),
                    accessible: is_accessible(Some(result.status)),
                    error: None,
                },
                Err(e) => SweepLine {
                    endpoint: endpoint.label(),
                    status: None,
                    accessible: false,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    let accessible = lines.iter().filter(|l| l.accessible).count();
    let outcome = judge_sweep(accessible, lines.len());
    tracing::info!(accessible, total = lines.len(), outcome = outcome.label(), "accessibility sweep");

    SweepReport {
        accessible,
        total: lines.len(),
        outcome,
        lines,
    }
}
