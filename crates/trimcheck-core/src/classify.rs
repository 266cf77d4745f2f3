//! Expectation classifier
//!
//! Turns one observed response into [`Outcome`]. Order matters: skip markers
//! first, then the accepted status set, then the structural contract of a 200
//! body, then the latency budget. Aggregate judgements for the load and
//! accessibility runs live here too so they stay pure.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::endpoint::EndpointSpec;
use crate::response::ExecutionResult;
use crate::scenario::{BodyRule, LoadPlan, Scenario, Shape, skip};
use crate::verdict::{FailureKind, Outcome};

/// Statuses that count as "handled the request" in the accessibility sweep
pub const ACCESSIBLE_STATUSES: [u16; 3] = [200, 400, 500];

/// Share of endpoints that must be accessible
pub const SWEEP_THRESHOLD: f64 = 0.9;

/// Judge a single response against its scenario
#[must_use]
pub fn classify(endpoint: &EndpointSpec, scenario: &Scenario, result: &ExecutionResult) -> Outcome {
    if let Some(marker) = skip::find_match(&scenario.skips, result.status, &result.text) {
        return Outcome::Skip {
            reason: marker.reason.to_string(),
            marker: marker.id.to_string(),
        };
    }

    if !scenario.expected.contains(&result.status) {
        return Outcome::fail(
            FailureKind::ContractViolation,
            format!(
                "{} expected {} got {}",
                endpoint.label(),
                scenario.expected_display(),
                result.status
            ),
        )
        .with_excerpt(result.excerpt());
    }

    if result.status == 200 {
        if let Some(rule) = &scenario.body_rule {
            if let Err(detail) = check_body(rule, result) {
                return Outcome::fail(
                    FailureKind::StructuralAssertion,
                    format!("{}: {detail}", endpoint.label()),
                )
                .with_excerpt(result.excerpt());
            }
        }
    }

    if let Some(budget) = scenario.latency_budget_ms {
        if result.elapsed_ms > budget {
            return Outcome::fail(
                FailureKind::LatencyExceeded,
                format!("{} took {}ms > {budget}ms", endpoint.label(), result.elapsed_ms),
            );
        }
    }

    Outcome::Pass
}

/// JSON Schema equivalent of a [`BodyRule::Json`]
#[must_use]
pub fn body_schema(shape: Shape, any_of: &[String], allow_empty: bool) -> Value {
    let mut schema = match shape {
        Shape::Object => json!({ "type": "object" }),
        Shape::ObjectOrArray => json!({ "type": ["object", "array"] }),
    };
    if !any_of.is_empty() {
        let mut branches: Vec<Value> = any_of
            .iter()
            .map(|k| json!({ "required": [k] }))
            .collect();
        if allow_empty {
            branches.push(json!({ "maxProperties": 0 }));
        }
        schema["anyOf"] = Value::Array(branches);
    }
    schema
}

fn check_body(rule: &BodyRule, result: &ExecutionResult) -> Result<(), String> {
    match rule {
        BodyRule::TextContainsAny { needles } => {
            let lower = result.text.to_lowercase();
            if needles.iter().any(|n| lower.contains(&n.to_lowercase())) {
                Ok(())
            } else {
                Err(format!("body contains none of {needles:?}"))
            }
        }
        BodyRule::Json {
            shape,
            any_of,
            allow_empty,
        } => {
            if !result.declares_json() {
                return Err(format!(
                    "Content-Type {} is not application/json",
                    result.content_type.as_deref().unwrap_or("(none)")
                ));
            }
            let Some(body) = &result.json else {
                return Err("body is not valid JSON".to_string());
            };
            let schema = body_schema(*shape, any_of, *allow_empty);
            let validator = jsonschema::validator_for(&schema)
                .map_err(|e| format!("invalid body contract: {e}"))?;
            let errors: Vec<String> = validator
                .iter_errors(body)
                .take(5)
                .map(|e| e.to_string())
                .collect();
            if errors.is_empty() {
                Ok(())
            } else if any_of.is_empty() {
                Err(errors.join("; "))
            } else {
                Err(format!(
                    "expected one of {any_of:?}: {}",
                    errors.join("; ")
                ))
            }
        }
    }
}

/// Aggregate judgement of a load run.
///
/// `statuses` holds one entry per call; `None` is a call that never got a response.
#[must_use]
pub fn judge_load(plan: &LoadPlan, statuses: &[Option<u16>], wall_ms: u64) -> Outcome {
    let ok = statuses.iter().filter(|s| **s == Some(200)).count();
    if ok >= plan.min_ok && wall_ms < plan.max_wall_ms {
        return Outcome::Pass;
    }
    Outcome::fail(
        FailureKind::LoadShortfall,
        format!(
            "{ok}/{} status 200 (need {}) in {wall_ms}ms (limit {}ms); {}",
            statuses.len(),
            plan.min_ok,
            plan.max_wall_ms,
            distribution(statuses)
        ),
    )
}

/// `"200×7, 500×2, error×1"`
#[must_use]
pub fn distribution(statuses: &[Option<u16>]) -> String {
    let mut counts: BTreeMap<u16, usize> = BTreeMap::new();
    let mut errors = 0;
    for s in statuses {
        match s {
            Some(code) => *counts.entry(*code).or_default() += 1,
            None => errors += 1,
        }
    }
    let mut parts: Vec<String> = counts.iter().map(|(c, n)| format!("{c}×{n}")).collect();
    if errors > 0 {
        parts.push(format!("error×{errors}"));
    }
    parts.join(", ")
}

#[must_use]
pub fn is_accessible(status: Option<u16>) -> bool {
    status.is_some_and(|s| ACCESSIBLE_STATUSES.contains(&s))
}

/// Aggregate judgement of the accessibility sweep
#[must_use]
pub fn judge_sweep(accessible: usize, total: usize) -> Outcome {
    #[allow(clippy::cast_precision_loss)]
    let ratio = if total == 0 {
        0.0
    } else {
        accessible as f64 / total as f64
    };
    if ratio >= SWEEP_THRESHOLD {
        Outcome::Pass
    } else {
        Outcome::fail(
            FailureKind::SweepShortfall,
            format!(
                "{accessible}/{total} endpoints accessible ({:.1}%, need {:.0}%)",
                ratio * 100.0,
                SWEEP_THRESHOLD * 100.0
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Category, EndpointSpec};
    use crate::response::RequestSnapshot;
    use crate::scenario::skip::{MISSING_CAMPAIGN_DATA, SOLVER_LICENSE};

    fn endpoint() -> EndpointSpec {
        EndpointSpec::post("/api/save_campaign_plan", Category::Campaign).with_body()
    }

    fn response(status: u16, ct: Option<&str>, body: &str) -> ExecutionResult {
        ExecutionResult::new(
            status,
            ct.map(str::to_string),
            body,
            40,
            RequestSnapshot::default(),
        )
    }

    fn json_response(status: u16, body: &str) -> ExecutionResult {
        response(status, Some("application/json"), body)
    }

    fn save_plan() -> Scenario {
        Scenario::post("save", "/api/save_campaign_plan")
            .success()
            .object_with(&["campaign_id", "id", "message"])
            .skip(&[SOLVER_LICENSE])
    }

    // --- skip precedence ---

    #[test]
    fn skip_marker_wins_over_status_mismatch() {
        let outcome = classify(
            &endpoint(),
            &save_plan(),
            &json_response(500, "{\"detail\":\"Single-use license in use\"}"),
        );
        assert!(matches!(outcome, Outcome::Skip { ref marker, .. } if marker == "solver_license"));
    }

    #[test]
    fn unlisted_marker_does_not_skip() {
        let s = save_plan();
        let outcome = classify(
            &endpoint(),
            &s,
            &json_response(500, "not enough values to unpack"),
        );
        assert!(!s.skips.contains(&MISSING_CAMPAIGN_DATA));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::ContractViolation));
    }

    #[test]
    fn marker_at_end_of_long_traceback_still_skips() {
        use crate::response::MAX_BODY_BYTES;

        let s = Scenario::post("hybrid", "/api/save_campaign_plan")
            .success()
            .object_or_array()
            .skip(&[MISSING_CAMPAIGN_DATA]);
        let mut traceback = String::from("Traceback (most recent call last):\n");
        while traceback.len() <= MAX_BODY_BYTES + 1000 {
            traceback.push_str("  File \"/app/scheduler.py\", line 118, in build_plan\n");
        }
        traceback.push_str("ValueError: not enough values to unpack (expected 3, got 2)\n");

        let result = response(500, Some("text/html"), &traceback);
        assert!(!result.body.contains("not enough values to unpack"));
        let outcome = classify(&endpoint(), &s, &result);
        assert!(matches!(
            outcome,
            Outcome::Skip { ref marker, .. } if marker == "missing_campaign_data"
        ));
    }

    #[test]
    fn text_rule_sees_the_whole_body() {
        let s = Scenario::get("health", "/")
            .success()
            .text_contains_any(&["ok"]);
        let text = format!("{}status: OK", " ".repeat(5000));
        assert_eq!(
            classify(&endpoint(), &s, &response(200, Some("text/plain"), &text)),
            Outcome::Pass
        );
    }

    // --- status ---

    #[test]
    fn contract_violation_detail() {
        let outcome = classify(&endpoint(), &save_plan(), &json_response(404, "{}"));
        match outcome {
            Outcome::Fail {
                kind,
                detail,
                excerpt,
            } => {
                assert_eq!(kind, FailureKind::ContractViolation);
                assert_eq!(detail, "POST /api/save_campaign_plan expected {200} got 404");
                assert_eq!(excerpt.as_deref(), Some("{}"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn broad_liveness_set_passes_500() {
        let s = Scenario::post("live", "/api/save_campaign_plan").liveness(&[200, 400, 500]);
        assert_eq!(
            classify(&endpoint(), &s, &response(500, None, "oops")),
            Outcome::Pass
        );
    }

    // --- structure ---

    #[test]
    fn documented_key_present_passes() {
        let outcome = classify(
            &endpoint(),
            &save_plan(),
            &json_response(200, "{\"message\":\"saved\"}"),
        );
        assert_eq!(outcome, Outcome::Pass);
    }

    #[test]
    fn documented_keys_absent_fails() {
        let outcome = classify(
            &endpoint(),
            &save_plan(),
            &json_response(200, "{\"status\":\"ok\"}"),
        );
        assert_eq!(outcome.failure_kind(), Some(FailureKind::StructuralAssertion));
    }

    #[test]
    fn non_json_content_type_fails() {
        let outcome = classify(
            &endpoint(),
            &save_plan(),
            &response(200, Some("text/html"), "{\"message\":\"saved\"}"),
        );
        match outcome {
            Outcome::Fail { kind, detail, .. } => {
                assert_eq!(kind, FailureKind::StructuralAssertion);
                assert!(detail.contains("text/html"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scalar_body_fails_object_or_array() {
        let s = Scenario::post("any", "/api/save_campaign_plan")
            .success()
            .object_or_array();
        assert_eq!(
            classify(&endpoint(), &s, &json_response(200, "[1,2]")),
            Outcome::Pass
        );
        assert_eq!(
            classify(&endpoint(), &s, &json_response(200, "\"done\"")).failure_kind(),
            Some(FailureKind::StructuralAssertion)
        );
    }

    #[test]
    fn empty_object_allowed_when_declared() {
        let strict = save_plan();
        let lenient = save_plan().allow_empty();
        let empty = json_response(200, "{}");
        assert!(classify(&endpoint(), &strict, &empty).is_fail());
        assert_eq!(classify(&endpoint(), &lenient, &empty), Outcome::Pass);
    }

    #[test]
    fn structure_only_checked_on_200() {
        let s = Scenario::post("s", "/api/save_campaign_plan")
            .expect(&[200, 400])
            .object_with(&["id"]);
        assert_eq!(
            classify(&endpoint(), &s, &response(400, Some("text/plain"), "bad")),
            Outcome::Pass
        );
    }

    #[test]
    fn text_rule_is_case_insensitive() {
        let health = EndpointSpec::get("/", Category::Health);
        let s = Scenario::get("health", "/")
            .success()
            .text_contains_any(&["200", "ok"]);
        assert_eq!(
            classify(&health, &s, &response(200, Some("text/plain"), "Service OK")),
            Outcome::Pass
        );
        assert!(classify(&health, &s, &response(200, None, "up")).is_fail());
    }

    // --- latency ---

    #[test]
    fn latency_budget_downgrades_pass() {
        let health = EndpointSpec::get("/", Category::Health);
        let s = Scenario::get("health", "/").success().within_ms(5);
        let outcome = classify(&health, &s, &response(200, None, "ok"));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::LatencyExceeded));
    }

    // --- schema compilation ---

    #[test]
    fn body_schema_shape() {
        let schema = body_schema(Shape::Object, &["id".into(), "message".into()], true);
        insta::assert_snapshot!(
            serde_json::to_string_pretty(&schema).unwrap(),
            @r#"
        {
          "anyOf": [
            {
              "required": [
                "id"
              ]
            },
            {
              "required": [
                "message"
              ]
            },
            {
              "maxProperties": 0
            }
          ],
          "type": "object"
        }
        "#
        );
    }

    // --- aggregates ---

    #[test]
    fn load_needs_eight_ok_within_wall() {
        let plan = LoadPlan::default();
        let mut statuses = vec![Some(200); 8];
        statuses.extend([Some(500), None]);
        assert_eq!(judge_load(&plan, &statuses, 1_200), Outcome::Pass);
        assert_eq!(
            judge_load(&plan, &statuses, 30_000).failure_kind(),
            Some(FailureKind::LoadShortfall)
        );

        let mut short = vec![Some(200); 7];
        short.extend([Some(500), Some(500), None]);
        match judge_load(&plan, &short, 900) {
            Outcome::Fail { detail, .. } => {
                assert_eq!(
                    detail,
                    "7/10 status 200 (need 8) in 900ms (limit 30000ms); 200×7, 500×2, error×1"
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sweep_threshold() {
        assert_eq!(judge_sweep(9, 10), Outcome::Pass);
        assert_eq!(judge_sweep(46, 46), Outcome::Pass);
        assert!(judge_sweep(41, 46).is_fail());
        assert!(judge_sweep(0, 0).is_fail());
        assert!(is_accessible(Some(500)));
        assert!(!is_accessible(Some(404)));
        assert!(!is_accessible(None));
    }
}
