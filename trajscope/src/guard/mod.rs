//! Invariant checking and violation reporting.
//!
//! The guard is a diagnostics facility, not a correctness gate: the data model does not
//! statically prevent an out-of-order trajectory or an unsorted spectrum. Checks detect and
//! report breaches at use time and hand control flow back to the caller through [`Verdict`].

pub(crate) mod log;
pub(crate) mod rules;
pub(crate) mod violation;

pub use log::{InvariantGuard, SubscriptionId, VIOLATION_LOG_CAPACITY};
pub use rules::EIGEN_EPSILON;
pub use violation::{Rule, Severity, Verdict, Violation};
