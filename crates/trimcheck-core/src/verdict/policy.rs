//! Verdict policy: folds scenario outcomes into a run verdict

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{FailureKind, Outcome};

/// Policy for judging a run
#[derive(Debug, Clone, Default)]
pub struct VerdictPolicy {
    /// Count environment skips as failures (exit 1)
    pub strict: bool,
}

impl VerdictPolicy {
    #[must_use]
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Highest exit code among the outcomes.
    ///
    /// Contract-level failures give 1, fixture failures 2, connectivity 3.
    #[must_use]
    pub fn exit_code<'a>(&self, outcomes: impl IntoIterator<Item = &'a Outcome>) -> i32 {
        outcomes
            .into_iter()
            .map(|o| match o {
                Outcome::Pass => 0,
                Outcome::Skip { .. } => i32::from(self.strict),
                Outcome::Fail { kind, .. } => kind.exit_code(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Determine the verdict.
    ///
    /// PASS requires at least one outcome and no failures; skips pass unless strict.
    #[must_use]
    pub fn verdict(&self, outcomes: &[&Outcome]) -> Verdict {
        let totals = Totals::count(outcomes.iter().copied());
        let exit_code = self.exit_code(outcomes.iter().copied());

        let failed = totals.fail > 0 || (self.strict && totals.skip > 0);
        let status = if totals.total() > 0 && !failed {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        };

        let reason = if status == VerdictStatus::Pass {
            if totals.skip > 0 {
                format!("All scenarios passed ({} skipped)", totals.skip)
            } else {
                "All scenarios passed".to_string()
            }
        } else if totals.total() == 0 {
            "No scenarios were run".to_string()
        } else {
            let kinds: Vec<FailureKind> = outcomes.iter().filter_map(|o| o.failure_kind()).collect();
            let connectivity = kinds
                .iter()
                .filter(|k| **k == FailureKind::Connectivity)
                .count();
            let fixture = kinds
                .iter()
                .filter(|k| **k == FailureKind::FixtureInvariant)
                .count();
            let contract = kinds.len() - connectivity - fixture;

            let mut parts = Vec::new();
            if contract + fixture > 0 {
                parts.push(format!(
                    "{} failures ({contract} contract, {fixture} fixture)",
                    contract + fixture
                ));
            }
            if connectivity > 0 {
                parts.push(format!("{connectivity} errors (connectivity)"));
            }
            if self.strict && totals.skip > 0 {
                parts.push(format!("{} skips (strict)", totals.skip));
            }
            parts.join("; ")
        };

        Verdict {
            status,
            exit_code,
            reason,
        }
    }
}

/// Outcome counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Totals {
    pub pass: usize,
    pub skip: usize,
    pub fail: usize,
}

impl Totals {
    #[must_use]
    pub fn count<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        outcomes.into_iter().fold(Self::default(), |mut t, o| {
            match o {
                Outcome::Pass => t.pass += 1,
                Outcome::Skip { .. } => t.skip += 1,
                Outcome::Fail { .. } => t.fail += 1,
            }
            t
        })
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.pass + self.skip + self.fail
    }
}

/// Final verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub exit_code: i32,
    pub reason: String,
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}
