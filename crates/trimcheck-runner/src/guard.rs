//! Session connectivity guard
//!
//! One GET against the health endpoint before any scenario runs. The result
//! is diagnostic only: scenarios run regardless and make their own assertions.

use std::time::{Duration, Instant};

use trimcheck_core::response::excerpt;
use trimcheck_core::{Category, EndpointRegistry, GuardReport, HarnessConfig};

use crate::engine::Engine;

/// Fixed guard timeout, independent of the per-request setting
pub const GUARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Call the health endpoint once.
#[must_use]
pub fn check_health(config: &HarnessConfig, registry: &EndpointRegistry) -> GuardReport {
    let start = Instant::now();
    let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let unreachable = |error: String, elapsed_ms: u64| GuardReport {
        reachable: false,
        status: None,
        excerpt: None,
        error: Some(error),
        elapsed_ms,
    };

    let Some(health) = registry.by_category(Category::Health).into_iter().next() else {
        return unreachable("no health endpoint registered".to_string(), 0);
    };
    let engine = match Engine::with_timeout(config, GUARD_TIMEOUT) {
        Ok(engine) => engine,
        Err(e) => return unreachable(e.to_string(), elapsed_ms()),
    };

    let report = match engine.invoke(health, &[], None) {
        Ok(result) => GuardReport {
            reachable: true,
            status: Some(result.status),
            excerpt: Some(excerpt(&result.body)),
            error: None,
            elapsed_ms: result.elapsed_ms,
        },
        Err(e) => unreachable(e.to_string(), elapsed_ms()),
    };

    if report.reachable {
        tracing::info!(
            base_url = %config.base_url,
            status = ?report.status,
            elapsed_ms = report.elapsed_ms,
            "server reachable"
        );
    } else {
        tracing::warn!(
            base_url = %config.base_url,
            error = report.error.as_deref().unwrap_or_default(),
            "server unreachable; scenarios will still run"
        );
    }
    report
}
