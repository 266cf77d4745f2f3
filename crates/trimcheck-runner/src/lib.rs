//! trimcheck-runner: HTTP execution against a live deployment
//!
//! The execution engine, connectivity guard, load pool, accessibility sweep
//! and the suite runner that ties them to the scenario table.

pub mod engine;
pub mod guard;
pub mod load;
pub mod suite;
pub mod sweep;

pub use engine::{ConnectivityError, Engine, EngineError};
pub use suite::{Selection, SuiteRunner};
