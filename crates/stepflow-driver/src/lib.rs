//! # stepflow-driver — Execution Driver
//!
//! Runs a self-contained [`Plan`](stepflow_core::Plan) to a done state.
//!
//! ## Run Protocol
//!
//! 1. Take a fresh continuation from the plan.
//! 2. Optionally pump: apply unit items while the plan stays open, up to
//!    [`DriverConfig::pump_steps`].
//! 3. Apply `EndOfInput` once. The cascade through `connect` finalizes
//!    every stage.
//! 4. On `Succeed`, stop. On a halt, log the issues; with a recovery action,
//!    ask the [`RecoveryDecider`]. Recovering resumes from step 2 (or
//!    directly from a done transition).
//!
//! Nothing is retried automatically. [`DriverConfig::max_recoveries`] caps
//! the number of recovery actions one run may invoke.
//!
//! ## Observability
//!
//! Each run opens a `run_plan` tracing span. Pumping, recovery and the
//! final outcome are logged at `debug`; halts at `warn`. No subscriber is
//! installed here; that is the host's concern.

pub mod config;
pub mod decider;
pub mod driver;
pub mod execution;

pub use config::{DriverConfig, MAX_PUMP_STEPS};
pub use decider::{AlwaysRecover, Decision, NeverRecover, RecoveryDecider};
pub use driver::{run, Driver};
pub use execution::{Execution, RecoverableHalt, RunStats, Step};
