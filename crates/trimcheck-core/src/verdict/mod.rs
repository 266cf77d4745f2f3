//! Verdict module - scenario outcomes, failure kinds, and run policy

mod outcome;
mod policy;

pub use outcome::{FailureKind, Outcome};
pub use policy::{Totals, Verdict, VerdictPolicy, VerdictStatus};
