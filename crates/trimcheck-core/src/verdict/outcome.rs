//! Per-scenario outcomes and failure kinds

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a scenario failed; determines the exit code
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Status outside the accepted set
    ContractViolation,
    /// 200 response without the documented JSON shape or keys
    StructuralAssertion,
    LatencyExceeded,
    /// A repeated read returned a different status
    NonIdempotentRead,
    LoadShortfall,
    SweepShortfall,
    /// Timeout, refused connection or transport failure
    Connectivity,
    /// Fixture builder refused to emit the payload
    FixtureInvariant,
}

impl FailureKind {
    /// Exit code contributed by this kind
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::ContractViolation
            | Self::StructuralAssertion
            | Self::LatencyExceeded
            | Self::NonIdempotentRead
            | Self::LoadShortfall
            | Self::SweepShortfall => 1,
            Self::FixtureInvariant => 2,
            Self::Connectivity => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContractViolation => "contract_violation",
            Self::StructuralAssertion => "structural_assertion",
            Self::LatencyExceeded => "latency_exceeded",
            Self::NonIdempotentRead => "non_idempotent_read",
            Self::LoadShortfall => "load_shortfall",
            Self::SweepShortfall => "sweep_shortfall",
            Self::Connectivity => "connectivity",
            Self::FixtureInvariant => "fixture_invariant",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ContractViolation => "Status outside the accepted set",
            Self::StructuralAssertion => "Response body lacks the documented shape",
            Self::LatencyExceeded => "Response slower than the latency budget",
            Self::NonIdempotentRead => "Repeated read returned a different status",
            Self::LoadShortfall => "Too few successful calls under load",
            Self::SweepShortfall => "Too few endpoints accessible",
            Self::Connectivity => "Request did not reach the server",
            Self::FixtureInvariant => "Fixture violates a domain invariant",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Terminal state of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Outcome {
    Pass,
    /// Known environment limitation; never counts as a failure
    Skip { reason: String, marker: String },
    Fail {
        kind: FailureKind,
        detail: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        excerpt: Option<String>,
    },
}

impl Outcome {
    #[must_use]
    pub fn fail(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Fail {
            kind,
            detail: detail.into(),
            excerpt: None,
        }
    }

    /// Attach a body excerpt to a failure; no-op otherwise
    #[must_use]
    pub fn with_excerpt(self, text: impl Into<String>) -> Self {
        match self {
            Self::Fail { kind, detail, .. } => Self::Fail {
                kind,
                detail,
                excerpt: Some(text.into()),
            },
            other => other,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Skip { .. } => "SKIP",
            Self::Fail { .. } => "FAIL",
        }
    }

    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Fail { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Skip { reason, .. } => write!(f, "SKIP ({reason})"),
            Self::Fail { kind, detail, .. } => write!(f, "FAIL [{}] {detail}", kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(FailureKind::ContractViolation.exit_code(), 1);
        assert_eq!(FailureKind::StructuralAssertion.exit_code(), 1);
        assert_eq!(FailureKind::LoadShortfall.exit_code(), 1);
        assert_eq!(FailureKind::FixtureInvariant.exit_code(), 2);
        assert_eq!(FailureKind::Connectivity.exit_code(), 3);
    }

    #[test]
    fn excerpt_only_attaches_to_failures() {
        let pass = Outcome::Pass.with_excerpt("body");
        assert_eq!(pass, Outcome::Pass);

        let fail = Outcome::fail(FailureKind::ContractViolation, "x").with_excerpt("body");
        assert!(matches!(fail, Outcome::Fail { excerpt: Some(ref e), .. } if e == "body"));
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(Outcome::Skip {
            reason: "license".into(),
            marker: "solver_license".into(),
        })
        .unwrap();
        assert_eq!(json["result"], "skip");
        assert_eq!(json["marker"], "solver_license");

        let json = serde_json::to_value(Outcome::fail(FailureKind::Connectivity, "refused")).unwrap();
        assert_eq!(json["kind"], "connectivity");
        assert!(json.get("excerpt").is_none());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Outcome::Pass.to_string(), "PASS");
        assert_eq!(
            Outcome::fail(FailureKind::LatencyExceeded, "6001ms > 5000ms").to_string(),
            "FAIL [latency_exceeded] 6001ms > 5000ms"
        );
    }
}
