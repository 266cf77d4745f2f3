//! Fixture factory: deterministic request payloads per domain entity
//!
//! `build(kind, variant)` returns the same document on every call. Typed
//! variants are checked against their entity's invariants before they are
//! handed out; malformed variants are plain JSON and never pass through the
//! typed builders.

pub mod entities;
pub mod orders;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub use entities::{
    CampaignChangeSet, CampaignPlan, CampaignSuggestion, CampaignVersion, MachineCategory,
    MachineRecord, OptimizationRequest, PlannerRequest, ResultsUpdate, RollsPlanned,
    SalesForecast, SchedulerRequest, SecondaryDataBatch, SelectedOrders, SlittingOrderBatch,
    UserRecord, Validate,
};

/// Domain entity a fixture represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Optimization,
    Scheduler,
    Planner,
    CampaignPlan,
    SalesForecast,
    User,
    Machine,
    SlittingOrders,
    SecondaryData,
    ResultsUpdate,
    SelectedOrders,
    RollsPlanned,
    CampaignChangeSet,
    CampaignSuggestion,
    CampaignVersion,
}

impl EntityKind {
    pub const ALL: [Self; 15] = [
        Self::Optimization,
        Self::Scheduler,
        Self::Planner,
        Self::CampaignPlan,
        Self::SalesForecast,
        Self::User,
        Self::Machine,
        Self::SlittingOrders,
        Self::SecondaryData,
        Self::ResultsUpdate,
        Self::SelectedOrders,
        Self::RollsPlanned,
        Self::CampaignChangeSet,
        Self::CampaignSuggestion,
        Self::CampaignVersion,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimization => "optimization",
            Self::Scheduler => "scheduler",
            Self::Planner => "planner",
            Self::CampaignPlan => "campaign_plan",
            Self::SalesForecast => "sales_forecast",
            Self::User => "user",
            Self::Machine => "machine",
            Self::SlittingOrders => "slitting_orders",
            Self::SecondaryData => "secondary_data",
            Self::ResultsUpdate => "results_update",
            Self::SelectedOrders => "selected_orders",
            Self::RollsPlanned => "rolls_planned",
            Self::CampaignChangeSet => "campaign_change_set",
            Self::CampaignSuggestion => "campaign_suggestion",
            Self::CampaignVersion => "campaign_version",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload flavour requested from the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Valid,
    ValidPrimary,
    ValidSecondary,
    ValidMetallizer,
    MissingRequired,
    InvalidType,
}

impl Variant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ValidPrimary => "valid_primary",
            Self::ValidSecondary => "valid_secondary",
            Self::ValidMetallizer => "valid_metallizer",
            Self::MissingRequired => "missing_required",
            Self::InvalidType => "invalid_type",
        }
    }

    /// Whether the variant is expected to satisfy the endpoint's contract
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(
            self,
            Self::Valid | Self::ValidPrimary | Self::ValidSecondary | Self::ValidMetallizer
        )
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Valid,
            Self::ValidPrimary,
            Self::ValidSecondary,
            Self::ValidMetallizer,
            Self::MissingRequired,
            Self::InvalidType,
        ]
        .into_iter()
        .find(|v| v.as_str() == s)
        .ok_or_else(|| FixtureError::UnknownVariant(s.to_string()))
    }
}

// ── Errors ──

/// A payload would break one of its entity's cross-field rules
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} violates {rule}: {detail}")]
pub struct FixtureInvariantError {
    pub entity: String,
    pub rule: String,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error(transparent)]
    Invariant(#[from] FixtureInvariantError),
    #[error("Unsupported variant {variant} for {kind}")]
    UnsupportedVariant { kind: EntityKind, variant: Variant },
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),
    #[error("Encode error: {0}")]
    Encode(String),
}

// ── Payload ──

/// A built request body
#[derive(Debug, Clone, PartialEq)]
pub enum FixturePayload {
    Optimization(OptimizationRequest),
    Scheduler(SchedulerRequest),
    Planner(PlannerRequest),
    CampaignPlan(CampaignPlan),
    SalesForecast(SalesForecast),
    User(UserRecord),
    Machine(MachineRecord),
    SlittingOrders(SlittingOrderBatch),
    SecondaryData(SecondaryDataBatch),
    ResultsUpdate(ResultsUpdate),
    SelectedOrders(SelectedOrders),
    RollsPlanned(RollsPlanned),
    CampaignChangeSet(CampaignChangeSet),
    CampaignSuggestion(CampaignSuggestion),
    CampaignVersion(CampaignVersion),
    /// Deliberately broken document; bypasses typed invariants
    Malformed { kind: EntityKind, body: Value },
}

impl FixturePayload {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Optimization(_) => EntityKind::Optimization,
            Self::Scheduler(_) => EntityKind::Scheduler,
            Self::Planner(_) => EntityKind::Planner,
            Self::CampaignPlan(_) => EntityKind::CampaignPlan,
            Self::SalesForecast(_) => EntityKind::SalesForecast,
            Self::User(_) => EntityKind::User,
            Self::Machine(_) => EntityKind::Machine,
            Self::SlittingOrders(_) => EntityKind::SlittingOrders,
            Self::SecondaryData(_) => EntityKind::SecondaryData,
            Self::ResultsUpdate(_) => EntityKind::ResultsUpdate,
            Self::SelectedOrders(_) => EntityKind::SelectedOrders,
            Self::RollsPlanned(_) => EntityKind::RollsPlanned,
            Self::CampaignChangeSet(_) => EntityKind::CampaignChangeSet,
            Self::CampaignSuggestion(_) => EntityKind::CampaignSuggestion,
            Self::CampaignVersion(_) => EntityKind::CampaignVersion,
            Self::Malformed { kind, .. } => *kind,
        }
    }

    /// Run the entity's invariant checks; malformed payloads always pass.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), FixtureInvariantError> {
        match self {
            Self::Optimization(p) => p.validate(),
            Self::Scheduler(p) => p.validate(),
            Self::Planner(p) => p.validate(),
            Self::CampaignPlan(p) => p.validate(),
            Self::SalesForecast(p) => p.validate(),
            Self::User(p) => p.validate(),
            Self::Machine(p) => p.validate(),
            Self::SlittingOrders(p) => p.validate(),
            Self::SecondaryData(p) => p.validate(),
            Self::ResultsUpdate(p) => p.validate(),
            Self::SelectedOrders(p) => p.validate(),
            Self::RollsPlanned(p) => p.validate(),
            Self::CampaignChangeSet(p) => p.validate(),
            Self::CampaignSuggestion(p) => p.validate(),
            Self::CampaignVersion(p) => p.validate(),
            Self::Malformed { .. } => Ok(()),
        }
    }

    /// Serialize to the JSON document sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<Value, FixtureError> {
        let encoded = match self {
            Self::Optimization(p) => serde_json::to_value(p),
            Self::Scheduler(p) => serde_json::to_value(p),
            Self::Planner(p) => serde_json::to_value(p),
            Self::CampaignPlan(p) => serde_json::to_value(p),
            Self::SalesForecast(p) => serde_json::to_value(p),
            Self::User(p) => serde_json::to_value(p),
            Self::Machine(p) => serde_json::to_value(p),
            Self::SlittingOrders(p) => serde_json::to_value(p),
            Self::SecondaryData(p) => serde_json::to_value(p),
            Self::ResultsUpdate(p) => serde_json::to_value(p),
            Self::SelectedOrders(p) => serde_json::to_value(p),
            Self::RollsPlanned(p) => serde_json::to_value(p),
            Self::CampaignChangeSet(p) => serde_json::to_value(p),
            Self::CampaignSuggestion(p) => serde_json::to_value(p),
            Self::CampaignVersion(p) => serde_json::to_value(p),
            Self::Malformed { body, .. } => return Ok(body.clone()),
        };
        encoded.map_err(|e| FixtureError::Encode(format!("{}: {e}", self.kind())))
    }
}

// ── Factory ──

/// Build a payload for `kind` in the requested `variant`.
///
/// # Errors
///
/// - [`FixtureError::UnsupportedVariant`] for pairs outside the vocabulary
/// - [`FixtureError::Invariant`] if a typed payload breaks its own rules
pub fn build(kind: EntityKind, variant: Variant) -> Result<FixturePayload, FixtureError> {
    let payload = match variant {
        Variant::MissingRequired => FixturePayload::Malformed {
            kind,
            body: json!({}),
        },
        Variant::InvalidType => FixturePayload::Malformed {
            kind,
            body: malformed(kind).ok_or(FixtureError::UnsupportedVariant { kind, variant })?,
        },
        Variant::Valid => valid(kind),
        Variant::ValidPrimary | Variant::ValidSecondary | Variant::ValidMetallizer => {
            if kind != EntityKind::Optimization {
                return Err(FixtureError::UnsupportedVariant { kind, variant });
            }
            FixturePayload::Optimization(match variant {
                Variant::ValidSecondary => OptimizationRequest::secondary(),
                Variant::ValidMetallizer => OptimizationRequest::metallizer(),
                _ => OptimizationRequest::primary(),
            })
        }
    };
    payload.validate()?;
    Ok(payload)
}

fn valid(kind: EntityKind) -> FixturePayload {
    match kind {
        EntityKind::Optimization => FixturePayload::Optimization(OptimizationRequest::primary()),
        EntityKind::Scheduler => FixturePayload::Scheduler(SchedulerRequest::changeover()),
        EntityKind::Planner => FixturePayload::Planner(PlannerRequest::sample()),
        EntityKind::CampaignPlan => FixturePayload::CampaignPlan(CampaignPlan::sample()),
        EntityKind::SalesForecast => FixturePayload::SalesForecast(SalesForecast::sample()),
        EntityKind::User => FixturePayload::User(UserRecord::sample()),
        EntityKind::Machine => FixturePayload::Machine(MachineRecord::sample()),
        EntityKind::SlittingOrders => FixturePayload::SlittingOrders(SlittingOrderBatch::sample()),
        EntityKind::SecondaryData => FixturePayload::SecondaryData(SecondaryDataBatch::sample()),
        EntityKind::ResultsUpdate => FixturePayload::ResultsUpdate(ResultsUpdate::sample()),
        EntityKind::SelectedOrders => FixturePayload::SelectedOrders(SelectedOrders::sample()),
        EntityKind::RollsPlanned => FixturePayload::RollsPlanned(RollsPlanned::sample()),
        EntityKind::CampaignChangeSet => {
            FixturePayload::CampaignChangeSet(CampaignChangeSet::sample())
        }
        EntityKind::CampaignSuggestion => {
            FixturePayload::CampaignSuggestion(CampaignSuggestion::sample())
        }
        EntityKind::CampaignVersion => FixturePayload::CampaignVersion(CampaignVersion::sample()),
    }
}

/// Type-confused documents; `None` where the entity has no such document
fn malformed(kind: EntityKind) -> Option<Value> {
    let body = match kind {
        EntityKind::Optimization => json!({"company": "CPFL", "data": "invalid"}),
        EntityKind::Scheduler => json!({"client_name": "CPFL", "data": null}),
        EntityKind::Planner => json!({"monthYear": null, "plant": null}),
        EntityKind::CampaignPlan => json!({"client_name": "CPFL", "campaign_plan": null}),
        EntityKind::SalesForecast => json!({
            "client_name": "CPFL",
            "month": "2024-01",
            "plant": "AMD",
            "forecast": "not_a_list",
        }),
        EntityKind::User => json!({"userId": "test-user", "data": null}),
        EntityKind::SlittingOrders => json!({
            "company": "CPFL",
            "material_group": "BOPP",
            "material_codes": ["MAT001"],
            "slitting_orders": {},
            "start_time": "invalid-time-format",
        }),
        EntityKind::ResultsUpdate => json!({"data": "invalid"}),
        EntityKind::SelectedOrders => json!({
            "client_name": "CPFL",
            "plant": "AMD",
            "month_year": "2024-01",
            "selected_orders": "not_a_list",
            "total_orders": 100,
            "selected_count": 50,
            "omitted_count": 50,
        }),
        EntityKind::RollsPlanned => json!({
            "client_name": "CPFL",
            "plant": "AMD",
            "material_name": "BOPP",
            "customer_data": "not_a_list",
        }),
        EntityKind::CampaignSuggestion => json!({"action": "invalid_action"}),
        EntityKind::CampaignVersion => json!({"campaign_id": null, "data": null}),
        EntityKind::Machine | EntityKind::SecondaryData | EntityKind::CampaignChangeSet => {
            return None;
        }
    };
    Some(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities::SecondaryRow;
    use proptest::prelude::*;

    // --- factory tests ---

    #[test]
    fn every_kind_builds_valid() {
        for kind in EntityKind::ALL {
            let payload = build(kind, Variant::Valid).unwrap();
            assert_eq!(payload.kind(), kind);
            assert!(payload.to_json().unwrap().is_object(), "{kind}");
        }
    }

    #[test]
    fn builds_are_deterministic() {
        for kind in EntityKind::ALL {
            let a = build(kind, Variant::Valid).unwrap().to_json().unwrap();
            let b = build(kind, Variant::Valid).unwrap().to_json().unwrap();
            assert_eq!(a, b, "{kind}");
        }
    }

    #[test]
    fn missing_required_is_empty_object() {
        for kind in EntityKind::ALL {
            let body = build(kind, Variant::MissingRequired)
                .unwrap()
                .to_json()
                .unwrap();
            assert_eq!(body, json!({}));
        }
    }

    #[test]
    fn valid_optimization_is_primary() {
        let FixturePayload::Optimization(req) = build(EntityKind::Optimization, Variant::Valid).unwrap()
        else {
            panic!("expected optimization payload");
        };
        assert_eq!(req.machine_category, MachineCategory::Primary);
    }

    #[test]
    fn machine_variants_only_for_optimization() {
        let err = build(EntityKind::Scheduler, Variant::ValidMetallizer).unwrap_err();
        assert!(matches!(err, FixtureError::UnsupportedVariant { .. }));
        assert_eq!(
            err.to_string(),
            "Unsupported variant valid_metallizer for scheduler"
        );
    }

    #[test]
    fn invalid_type_unsupported_for_machine() {
        assert!(matches!(
            build(EntityKind::Machine, Variant::InvalidType),
            Err(FixtureError::UnsupportedVariant { .. })
        ));
    }

    #[test]
    fn slitting_invalid_type_carries_bad_time() {
        let body = build(EntityKind::SlittingOrders, Variant::InvalidType)
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(body["start_time"], "invalid-time-format");
    }

    #[test]
    fn variant_parse_round_trips_names() {
        assert_eq!(
            "valid_secondary".parse::<Variant>().unwrap(),
            Variant::ValidSecondary
        );
        assert!("bogus".parse::<Variant>().is_err());
        assert!(Variant::ValidPrimary.is_valid());
        assert!(!Variant::InvalidType.is_valid());
    }

    #[test]
    fn invariant_error_message() {
        let err = FixtureInvariantError {
            entity: "SecondaryDataBatch".into(),
            rule: "sets_divisible".into(),
            detail: "row 0".into(),
        };
        assert_eq!(
            FixtureError::from(err).to_string(),
            "SecondaryDataBatch violates sets_divisible: row 0"
        );
    }

    // --- invariant properties ---

    fn secondary_batch(rows: Vec<(u32, u32)>, jumbo: u32, lm: u32) -> SecondaryDataBatch {
        SecondaryDataBatch {
            secondary_data: rows
                .into_iter()
                .map(|(merged_width, sets)| SecondaryRow { merged_width, sets })
                .collect(),
            jumbo_width: jumbo,
            length_multiple: lm,
            ..SecondaryDataBatch::sample()
        }
    }

    proptest! {
        #[test]
        fn secondary_rows_accepted_iff_rules_hold(
            rows in prop::collection::vec((1u32..10_000, 0u32..200), 0..8),
            jumbo in 1000u32..9000,
            lm in 1u32..8,
        ) {
            let batch = secondary_batch(rows.clone(), jumbo, lm);
            let ok = rows.iter().all(|(w, s)| s % lm == 0 && *w < jumbo);
            prop_assert_eq!(batch.validate().is_ok(), ok);
        }

        #[test]
        fn multiplied_sets_under_jumbo_always_pass(
            widths in prop::collection::vec(1u32..2000, 1..6),
            factors in prop::collection::vec(0u32..40, 6),
            lm in 1u32..8,
        ) {
            let rows = widths
                .iter()
                .zip(&factors)
                .map(|(w, f)| (*w, f * lm))
                .collect();
            prop_assert!(secondary_batch(rows, 8700, lm).validate().is_ok());
        }

        #[test]
        fn ranged_machine_window_ordering(min in 0u32..10_000, max in 0u32..10_000) {
            let mut req = OptimizationRequest::secondary();
            req.min_width_range = Some(min);
            req.max_width_range = Some(max);
            let ok = min < max && max <= req.max_width;
            prop_assert_eq!(req.validate().is_ok(), ok);
        }
    }
}
