//! trimcheck-core: Endpoint catalog, fixtures and verdict logic
//!
//! This crate holds everything that does not touch the network: the
//! endpoint registry, fixture factory, scenario table, skip markers,
//! expectation classifier, run verdict, configuration and report types.

pub mod classify;
pub mod config;
pub mod endpoint;
pub mod fixture;
pub mod generator;
pub mod plan;
pub mod report;
pub mod response;
pub mod scenario;
pub mod schema;
pub mod verdict;

pub use classify::classify;
pub use config::{ConfigError, HarnessConfig, StatusOverride};
pub use endpoint::{BodyEncoding, Category, EndpointRegistry, EndpointSpec, HttpMethod, RegistryError};
pub use fixture::{EntityKind, FixtureError, FixtureInvariantError, FixturePayload, Variant};
pub use generator::to_http_file;
pub use plan::RunPlan;
pub use report::{GuardReport, RunReport, ScenarioReport, SweepLine, SweepReport};
pub use response::{ExecutionResult, RequestSnapshot};
pub use scenario::{Intent, Mode, Scenario, ScenarioSet, SkipMarker, SuiteError};
pub use verdict::{FailureKind, Outcome, Totals, Verdict, VerdictPolicy, VerdictStatus};
