//! Declarative scenario table
//!
//! A [`Scenario`] names one request against one registered endpoint and the
//! statuses that count as passing. The whole table is validated against the
//! [`EndpointRegistry`] once, by [`ScenarioSet::new`], before anything runs.

pub mod skip;
mod table;

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::endpoint::{EndpointRegistry, EndpointSpec, HttpMethod, RegistryError};
use crate::fixture::{self, EntityKind, FixtureError, Variant};
pub use skip::SkipMarker;
pub use table::builtin;

/// Statuses a scenario may list as accepted
pub const STATUS_VOCABULARY: [u16; 5] = [200, 400, 404, 500, 502];

/// Statuses an empty required-field payload may produce
pub const MISSING_INPUT_STATUSES: [u16; 2] = [400, 500];

/// What a scenario is meant to demonstrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Broad accepted set; only shows the endpoint is reachable
    Liveness,
    /// Exact status set; no body check
    Contract,
    /// Valid input; 200 plus a structural check
    Success,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Liveness => "liveness",
            Self::Contract => "contract",
            Self::Success => "success",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fan-out parameters for a load scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadPlan {
    pub calls: usize,
    pub workers: usize,
    pub min_ok: usize,
    pub max_wall_ms: u64,
}

impl Default for LoadPlan {
    fn default() -> Self {
        Self {
            calls: 10,
            workers: 5,
            min_ok: 8,
            max_wall_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Mode {
    #[default]
    Single,
    /// Send twice; the second status must equal the first
    Idempotent,
    Load(LoadPlan),
}

/// Request body source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Payload {
    None,
    Fixture {
        entity: EntityKind,
        variant: Variant,
    },
    /// A fixture reduced to a subset of its top-level keys
    Projection {
        entity: EntityKind,
        variant: Variant,
        keys: Vec<String>,
    },
    /// Endpoint-specific literal document
    Literal { body: Value },
}

impl Payload {
    /// Label used in reports
    #[must_use]
    pub fn variant_label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fixture { variant, .. } | Self::Projection { variant, .. } => variant.as_str(),
            Self::Literal { .. } => "literal",
        }
    }

    #[must_use]
    pub fn is_valid_variant(&self) -> bool {
        match self {
            Self::Fixture { variant, .. } | Self::Projection { variant, .. } => variant.is_valid(),
            Self::None | Self::Literal { .. } => false,
        }
    }

    /// Build the body for one invocation.
    ///
    /// # Errors
    ///
    /// Propagates fixture build failures.
    pub fn resolve(&self) -> Result<Option<Value>, FixtureError> {
        match self {
            Self::None => Ok(None),
            Self::Fixture { entity, variant } => {
                fixture::build(*entity, *variant)?.to_json().map(Some)
            }
            Self::Projection {
                entity,
                variant,
                keys,
            } => {
                let full = fixture::build(*entity, *variant)?.to_json()?;
                let projected: Map<String, Value> = keys
                    .iter()
                    .filter_map(|k| full.get(k).map(|v| (k.clone(), v.clone())))
                    .collect();
                Ok(Some(Value::Object(projected)))
            }
            Self::Literal { body } => Ok(Some(body.clone())),
        }
    }
}

/// Top-level JSON type a 200 body must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Object,
    ObjectOrArray,
}

/// Structural contract applied to a 200 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BodyRule {
    Json {
        shape: Shape,
        /// At least one must be present when non-empty
        any_of: Vec<String>,
        /// `{}` satisfies the rule even when keys are documented
        allow_empty: bool,
    },
    /// Case-insensitive substring match on the raw text
    TextContainsAny { needles: Vec<String> },
}

/// Copy a key from a priming response into a query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    pub key: String,
    pub param: String,
}

/// A request sent before the judged call; its response is not classified
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupStep {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<Capture>,
}

impl SetupStep {
    #[must_use]
    pub fn post(path: &str, entity: EntityKind) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.to_string(),
            payload: Payload::Fixture {
                entity,
                variant: Variant::Valid,
            },
            capture: None,
        }
    }

    #[must_use]
    pub fn capture(mut self, key: &str, param: &str) -> Self {
        self.capture = Some(Capture {
            key: key.to_string(),
            param: param.to_string(),
        });
        self
    }
}

/// One (endpoint, input, expectation) row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub intent: Intent,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    pub payload: Payload,
    pub expected: BTreeSet<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skips: Vec<SkipMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_rule: Option<BodyRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_budget_ms: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub setup: Vec<SetupStep>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            intent: Intent::Contract,
            mode: Mode::Single,
            query: Vec::new(),
            payload: Payload::None,
            expected: BTreeSet::new(),
            skips: Vec::new(),
            body_rule: None,
            latency_budget_ms: None,
            setup: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(name: &str, path: &str) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    #[must_use]
    pub fn post(name: &str, path: &str) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    #[must_use]
    pub fn expect(mut self, statuses: &[u16]) -> Self {
        self.expected = statuses.iter().copied().collect();
        self
    }

    /// Broad accepted set; reachability only
    #[must_use]
    pub fn liveness(mut self, statuses: &[u16]) -> Self {
        self.intent = Intent::Liveness;
        self.expect(statuses)
    }

    /// Exactly 200
    #[must_use]
    pub fn success(mut self) -> Self {
        self.intent = Intent::Success;
        self.expect(&[200])
    }

    #[must_use]
    pub fn query(mut self, pairs: &[(&str, &str)]) -> Self {
        self.query = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self
    }

    #[must_use]
    pub fn fixture(mut self, entity: EntityKind, variant: Variant) -> Self {
        self.payload = Payload::Fixture { entity, variant };
        self
    }

    #[must_use]
    pub fn project(mut self, entity: EntityKind, variant: Variant, keys: &[&str]) -> Self {
        self.payload = Payload::Projection {
            entity,
            variant,
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
        };
        self
    }

    #[must_use]
    pub fn literal(mut self, body: Value) -> Self {
        self.payload = Payload::Literal { body };
        self
    }

    /// 200 body must be a JSON object carrying one of `keys`
    #[must_use]
    pub fn object_with(mut self, keys: &[&str]) -> Self {
        self.body_rule = Some(BodyRule::Json {
            shape: Shape::Object,
            any_of: keys.iter().map(|k| (*k).to_string()).collect(),
            allow_empty: false,
        });
        self
    }

    #[must_use]
    pub fn object_or_array(mut self) -> Self {
        self.body_rule = Some(BodyRule::Json {
            shape: Shape::ObjectOrArray,
            any_of: Vec::new(),
            allow_empty: false,
        });
        self
    }

    /// Let an empty object satisfy the documented keys
    #[must_use]
    pub fn allow_empty(mut self) -> Self {
        if let Some(BodyRule::Json { allow_empty, .. }) = &mut self.body_rule {
            *allow_empty = true;
        }
        self
    }

    #[must_use]
    pub fn text_contains_any(mut self, needles: &[&str]) -> Self {
        self.body_rule = Some(BodyRule::TextContainsAny {
            needles: needles.iter().map(|n| (*n).to_string()).collect(),
        });
        self
    }

    #[must_use]
    pub fn skip(mut self, markers: &[SkipMarker]) -> Self {
        self.skips = markers.to_vec();
        self
    }

    #[must_use]
    pub fn within_ms(mut self, budget: u64) -> Self {
        self.latency_budget_ms = Some(budget);
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn setup(mut self, step: SetupStep) -> Self {
        self.setup.push(step);
        self
    }

    /// Whether this scenario sends input meant to satisfy the contract
    #[must_use]
    pub fn sends_valid_input(&self) -> bool {
        self.intent == Intent::Success || self.payload.is_valid_variant()
    }

    /// `"GET /api/fetch_plan_data"`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Accepted statuses rendered as `{200, 400}`
    #[must_use]
    pub fn expected_display(&self) -> String {
        let codes: Vec<String> = self.expected.iter().map(u16::to_string).collect();
        format!("{{{}}}", codes.join(", "))
    }
}

// ── Validation ──

#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("Scenario {0}: endpoint {1} is not registered")]
    UnknownEndpoint(String, String),
    #[error("Duplicate scenario name: {0}")]
    DuplicateScenario(String),
    #[error("Scenario {0}: valid input lacks required parameter {1}")]
    MissingRequiredParam(String, String),
    #[error("Scenario {0}: accepted status set is empty")]
    EmptyExpectation(String),
    #[error("Scenario {0}: status {1} is outside the accepted vocabulary")]
    StatusOutsideVocabulary(String, u16),
    #[error("Scenario {0}: missing required input must not accept status {1}")]
    MissingInputAccepted(String, u16),
    #[error("Scenario {0}: success scenario has no body rule")]
    SuccessWithoutBodyRule(String),
    #[error("Endpoint {0} has no scenario")]
    UncoveredEndpoint(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A scenario table checked against the registry
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    registry: EndpointRegistry,
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    /// Validate every table invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`SuiteError`] found, scanning scenarios in order
    /// and then endpoints in registration order.
    pub fn new(registry: EndpointRegistry, scenarios: Vec<Scenario>) -> Result<Self, SuiteError> {
        let mut names = HashSet::new();
        for s in &scenarios {
            if !names.insert(s.name.as_str()) {
                return Err(SuiteError::DuplicateScenario(s.name.clone()));
            }
            let Some(endpoint) = registry.get(s.method, &s.path) else {
                return Err(SuiteError::UnknownEndpoint(s.name.clone(), s.label()));
            };
            if let Some(step) = s
                .setup
                .iter()
                .find(|step| registry.get(step.method, &step.path).is_none())
            {
                return Err(SuiteError::UnknownEndpoint(
                    s.name.clone(),
                    format!("{} {}", step.method, step.path),
                ));
            }
            check_statuses(s)?;
            if s.sends_valid_input() {
                check_required_params(s, endpoint)?;
            }
            check_missing_input(s)?;
            if s.intent == Intent::Success && s.body_rule.is_none() {
                return Err(SuiteError::SuccessWithoutBodyRule(s.name.clone()));
            }
        }

        if let Some(uncovered) = registry
            .iter()
            .find(|e| !scenarios.iter().any(|s| s.method == e.method && s.path == e.path))
        {
            return Err(SuiteError::UncoveredEndpoint(uncovered.label()));
        }

        Ok(Self {
            registry,
            scenarios,
        })
    }

    /// The built-in catalog and table.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in table itself is inconsistent.
    pub fn builtin() -> Result<Self, SuiteError> {
        Self::new(EndpointRegistry::catalog()?, builtin())
    }

    #[must_use]
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| s.name == name)
    }

    /// Endpoint a scenario targets; present for every scenario in the set
    #[must_use]
    pub fn endpoint_of(&self, scenario: &Scenario) -> Option<&EndpointSpec> {
        self.registry.get(scenario.method, &scenario.path)
    }
}

fn check_statuses(s: &Scenario) -> Result<(), SuiteError> {
    if s.expected.is_empty() {
        return Err(SuiteError::EmptyExpectation(s.name.clone()));
    }
    match s
        .expected
        .iter()
        .find(|code| !STATUS_VOCABULARY.contains(code))
    {
        Some(code) => Err(SuiteError::StatusOutsideVocabulary(s.name.clone(), *code)),
        None => Ok(()),
    }
}

/// An empty required-field payload may only be answered with 400 or 500
fn check_missing_input(s: &Scenario) -> Result<(), SuiteError> {
    if s.payload.variant_label() != Variant::MissingRequired.as_str() {
        return Ok(());
    }
    match s.expected.iter().find(|code| !MISSING_INPUT_STATUSES.contains(code)) {
        Some(code) => Err(SuiteError::MissingInputAccepted(s.name.clone(), *code)),
        None => Ok(()),
    }
}

fn check_required_params(s: &Scenario, endpoint: &EndpointSpec) -> Result<(), SuiteError> {
    match endpoint
        .required_params
        .iter()
        .find(|p| !s.query.iter().any(|(k, _)| k == *p))
    {
        Some(missing) => Err(SuiteError::MissingRequiredParam(
            s.name.clone(),
            missing.clone(),
        )),
        None => Ok(()),
    }
}
