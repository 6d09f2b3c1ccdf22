//! # Recovery Decisions
//!
//! The driver never recovers on its own. When a plan halts with a recovery
//! action, a [`RecoveryDecider`] chooses between invoking the action and
//! accepting the halt as final.

use stepflow_core::Issue;

/// Outcome of a recovery decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Invoke the recovery action and keep driving.
    Recover,
    /// Stop here; the halt becomes final.
    Accept,
}

/// Chooses whether to recover from a recoverable halt.
pub trait RecoveryDecider {
    /// Decide, given the issues of the halt in reporting order.
    fn decide(&mut self, issues: &[Issue]) -> Decision;
}

impl<F> RecoveryDecider for F
where
    F: FnMut(&[Issue]) -> Decision,
{
    fn decide(&mut self, issues: &[Issue]) -> Decision {
        self(issues)
    }
}

/// Accepts every halt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRecover;

impl RecoveryDecider for NeverRecover {
    fn decide(&mut self, _issues: &[Issue]) -> Decision {
        Decision::Accept
    }
}

/// Recovers from every recoverable halt.
///
/// Pair with [`DriverConfig::max_recoveries`](crate::DriverConfig) when the
/// plan might halt recoverably forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRecover;

impl RecoveryDecider for AlwaysRecover {
    fn decide(&mut self, _issues: &[Issue]) -> Decision {
        Decision::Recover
    }
}
