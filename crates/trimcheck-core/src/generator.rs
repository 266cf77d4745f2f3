//! HTTP file generator - converts failing scenarios to .http format

use crate::report::ScenarioReport;
use crate::verdict::Outcome;

/// Generate .http file content from failing scenarios.
///
/// Scenarios without a recorded request (fixture failures) are listed as
/// comments only.
#[must_use]
pub fn to_http_file(failures: &[&ScenarioReport], base_url: &str, base_url_var: &str) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "# Auto-generated reproduction cases ({} failures)",
        failures.len()
    ));
    lines.push(format!("# Base URL variable: {{{{{base_url_var}}}}}"));
    lines.push(String::new());

    for (idx, report) in failures.iter().enumerate() {
        let kind = report
            .outcome
            .failure_kind()
            .map_or("unknown", |k| k.as_str());
        let observed = report
            .status
            .map_or_else(|| "no response".to_string(), |s| s.to_string());
        lines.push(format!("### [{idx}] {} - {kind} {observed}", report.scenario));
        lines.push(format!(
            "# Expected: {:?}, variant: {}",
            report.expected, report.variant
        ));
        if let Outcome::Fail { detail, .. } = &report.outcome {
            lines.push(format!("# {detail}"));
        }

        let Some(request) = &report.request else {
            lines.push("# (no request was sent)".to_string());
            lines.push(String::new());
            lines.push("###".to_string());
            lines.push(String::new());
            continue;
        };

        // Request line
        let url = match request.url.strip_prefix(base_url) {
            Some(rest) if !base_url.is_empty() => format!("{{{{{base_url_var}}}}}{rest}"),
            _ => request.url.clone(),
        };
        lines.push(format!("{} {}", request.method, url));

        // Headers
        for (key, value) in &request.headers {
            if !matches!(key.to_lowercase().as_str(), "host" | "content-length") {
                lines.push(format!("{key}: {value}"));
            }
        }

        // Body
        if let Some(body) = &request.body {
            if !request
                .headers
                .keys()
                .any(|k| k.eq_ignore_ascii_case("content-type"))
            {
                lines.push("Content-Type: application/json".to_string());
            }
            lines.push(String::new());
            lines.push(body.clone());
        }

        lines.push(String::new());
        lines.push("###".to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Category;
    use crate::response::RequestSnapshot;
    use crate::scenario::Intent;
    use crate::verdict::FailureKind;
    use std::collections::BTreeMap;

    fn failing(request: Option<RequestSnapshot>) -> ScenarioReport {
        ScenarioReport {
            scenario: "optimise_metallizer_success".into(),
            endpoint: "POST /api/optimise_metallizer".into(),
            category: Category::Optimization,
            intent: Intent::Success,
            variant: "valid_metallizer".into(),
            expected: vec![200],
            status: request.as_ref().map(|_| 500),
            elapsed_ms: 310,
            outcome: Outcome::fail(
                FailureKind::ContractViolation,
                "POST /api/optimise_metallizer expected {200} got 500",
            ),
            request,
        }
    }

    fn sample_request() -> RequestSnapshot {
        RequestSnapshot {
            method: "POST".into(),
            url: "http://127.0.0.1:8000/api/optimise_metallizer".into(),
            headers: BTreeMap::from([
                ("Accept".into(), "application/json".into()),
                ("Content-Length".into(), "42".into()),
                ("X-API-Key".into(), "k".into()),
            ]),
            body: Some(r#"{"machine_category":"Metallizer"}"#.into()),
        }
    }

    #[test]
    fn http_file_snapshot() {
        let report = failing(Some(sample_request()));
        let out = to_http_file(&[&report], "http://127.0.0.1:8000", "base_url");
        insta::assert_snapshot!(out, @r#"
        # Auto-generated reproduction cases (1 failures)
        # Base URL variable: {{base_url}}

        ### [0] optimise_metallizer_success - contract_violation 500
        # Expected: [200], variant: valid_metallizer
        # POST /api/optimise_metallizer expected {200} got 500
        POST {{base_url}}/api/optimise_metallizer
        Accept: application/json
        X-API-Key: k
        Content-Type: application/json

        {"machine_category":"Metallizer"}

        ###
        "#);
    }

    #[test]
    fn foreign_url_kept_verbatim() {
        let report = failing(Some(sample_request()));
        let out = to_http_file(&[&report], "https://elsewhere", "base_url");
        assert!(out.contains("POST http://127.0.0.1:8000/api/optimise_metallizer"));
    }

    #[test]
    fn missing_request_is_commented() {
        let report = failing(None);
        let out = to_http_file(&[&report], "http://127.0.0.1:8000", "base_url");
        assert!(out.contains("no response"));
        assert!(out.contains("# (no request was sent)"));
        assert!(!out.contains("POST {{base_url}}"));
    }
}
