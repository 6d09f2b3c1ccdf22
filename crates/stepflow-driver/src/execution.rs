//! # Interactive Execution
//!
//! [`Execution`] is the driver's state machine exposed one decision at a
//! time. [`Driver::run`](crate::Driver::run) is a loop over it; hosts that
//! want to inspect a halt before deciding can drive it directly.
//!
//! ## States
//!
//! ```text
//!                    resume()
//! Running ───────────────────────────▶ Succeeded          (terminal)
//!    ▲                    │
//!    │                    ├──────────▶ HaltedFinal        (terminal)
//!    │                    │
//!    │ recover()          ▼
//!    └────────────── HaltedRecoverable ──accept()──▶ final DoneTransition
//! ```
//!
//! Resuming applies up to `pump_steps` unit items while the plan stays
//! open, then `EndOfInput` exactly once. A halt is logged before any
//! recovery action can run.

use serde::{Deserialize, Serialize};
use stepflow_core::{
    Continuation, DoneTransition, EndOfInput, Halted, Issue, Plan, Recover, Transition,
};

use crate::config::DriverConfig;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Recovery actions invoked.
    pub recoveries: u32,
    /// Unit items applied while pumping.
    pub pump_steps: usize,
    /// `EndOfInput` applications.
    pub eoi_applications: usize,
}

/// A plan being driven.
pub struct Execution<A> {
    pending: Transition<(), (), A>,
    config: DriverConfig,
    stats: RunStats,
}

/// Result of [`Execution::resume`].
pub enum Step<A> {
    /// The plan succeeded.
    Succeeded {
        /// Terminal transition of the plan.
        done: DoneTransition<(), (), A>,
        /// Counters for the whole run.
        stats: RunStats,
    },
    /// The plan halted with no recovery action, or the recovery budget is
    /// spent.
    HaltedFinal {
        /// Terminal transition of the plan.
        done: DoneTransition<(), (), A>,
        /// Counters for the whole run.
        stats: RunStats,
    },
    /// The plan halted and can be recovered.
    HaltedRecoverable(RecoverableHalt<A>),
}

impl<A> Step<A> {
    /// Whether no further driving is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Step::HaltedRecoverable(_))
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &RunStats {
        match self {
            Step::Succeeded { stats, .. } | Step::HaltedFinal { stats, .. } => stats,
            Step::HaltedRecoverable(halt) => &halt.stats,
        }
    }
}

/// A halt waiting for the host's decision.
pub struct RecoverableHalt<A> {
    issues: Vec<Issue>,
    recover: Recover<(), (), A>,
    output: Vec<()>,
    overflow: Vec<()>,
    config: DriverConfig,
    stats: RunStats,
}

impl<A> RecoverableHalt<A> {
    /// Issues of the halt, in reporting order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Invoke the recovery action and keep driving.
    pub fn recover(self) -> Execution<A> {
        let mut stats = self.stats;
        stats.recoveries += 1;
        tracing::debug!(recoveries = stats.recoveries, "invoking recovery action");
        Execution {
            pending: (self.recover)(),
            config: self.config,
            stats,
        }
    }

    /// Accept the halt as final. The recovery action is dropped unused.
    pub fn accept(self) -> DoneTransition<(), (), A> {
        tracing::debug!(issues = self.issues.len(), "recoverable halt accepted");
        DoneTransition::halt(Halted::new(self.issues), self.output, self.overflow)
    }
}

impl<A> Execution<A> {
    /// Start driving a fresh instance of `plan`.
    pub fn start<P>(plan: &P, config: DriverConfig) -> Self
    where
        P: Plan<A> + ?Sized,
    {
        Self {
            pending: Transition::Continue {
                state: plan.initial(),
                output: Vec::new(),
            },
            config,
            stats: RunStats::default(),
        }
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Drive until the plan reaches a done state.
    pub fn resume(self) -> Step<A> {
        let Execution {
            pending,
            config,
            mut stats,
        } = self;
        let done = match pending {
            Transition::Continue { state, .. } => drive(state, &config, &mut stats),
            Transition::Succeed {
                value,
                output,
                overflow,
            } => DoneTransition::succeed(value, output, overflow),
            Transition::Halt {
                halted,
                output,
                overflow,
            } => DoneTransition::halt(halted, output, overflow),
        };
        classify(done, config, stats)
    }
}

/// Pump unit items while the plan stays open, then send `EndOfInput`.
fn drive<A>(
    mut state: Box<dyn Continuation<(), (), A>>,
    config: &DriverConfig,
    stats: &mut RunStats,
) -> DoneTransition<(), (), A> {
    for _ in 0..config.pump_steps {
        stats.pump_steps += 1;
        match state.apply_item(()) {
            Transition::Continue { state: next, .. } => state = next,
            Transition::Succeed {
                value,
                output,
                overflow,
            } => {
                tracing::debug!(pumped = stats.pump_steps, "plan finished while pumping");
                return DoneTransition::succeed(value, output, overflow);
            }
            Transition::Halt {
                halted,
                output,
                overflow,
            } => {
                tracing::debug!(pumped = stats.pump_steps, "plan halted while pumping");
                return DoneTransition::halt(halted, output, overflow);
            }
        }
    }
    stats.eoi_applications += 1;
    tracing::debug!(pumped = stats.pump_steps, "applying end of input");
    state.apply_eoi(EndOfInput)
}

fn classify<A>(done: DoneTransition<(), (), A>, config: DriverConfig, stats: RunStats) -> Step<A> {
    match done {
        DoneTransition::Succeed { .. } => {
            tracing::debug!(recoveries = stats.recoveries, "plan succeeded");
            Step::Succeeded { done, stats }
        }
        DoneTransition::Halt {
            halted: Halted { issues, recover },
            output,
            overflow,
        } => {
            tracing::warn!(
                issues = %summarize(&issues),
                recoverable = recover.is_some(),
                "plan halted"
            );
            match recover {
                Some(recover) if config.allows_recovery(stats.recoveries) => {
                    Step::HaltedRecoverable(RecoverableHalt {
                        issues,
                        recover,
                        output,
                        overflow,
                        config,
                        stats,
                    })
                }
                Some(_) => {
                    tracing::debug!(
                        recoveries = stats.recoveries,
                        "recovery budget spent; halt is final"
                    );
                    Step::HaltedFinal {
                        done: DoneTransition::halt(Halted::new(issues), output, overflow),
                        stats,
                    }
                }
                None => Step::HaltedFinal {
                    done: DoneTransition::halt(Halted::new(issues), output, overflow),
                    stats,
                },
            }
        }
    }
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
