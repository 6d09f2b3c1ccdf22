//! # Driver
//!
//! Runs a [`Plan`] to completion. Recovery is always the caller's choice:
//! [`run`] never recovers, [`Driver::run`] asks a [`RecoveryDecider`] at
//! every recoverable halt.

use stepflow_core::{DoneTransition, Plan};

use crate::config::DriverConfig;
use crate::decider::{Decision, NeverRecover, RecoveryDecider};
use crate::execution::{Execution, RunStats, Step};

/// Run `plan` with the default configuration. Every halt is final.
pub fn run<A, P>(plan: &P) -> DoneTransition<(), (), A>
where
    P: Plan<A> + ?Sized,
{
    Driver::new(DriverConfig::default()).run(plan, NeverRecover)
}

/// Drives plans under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Driver {
    config: DriverConfig,
    last_stats: RunStats,
}

impl Driver {
    /// A driver using `config` as given.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            last_stats: RunStats::default(),
        }
    }

    /// A driver using `config` after validating it.
    pub fn try_new(config: DriverConfig) -> Result<Self, stepflow_core::StepflowError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// The active configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Counters from the most recent [`run`](Self::run).
    pub fn last_stats(&self) -> &RunStats {
        &self.last_stats
    }

    /// Run a fresh instance of `plan` until it succeeds or halts finally.
    ///
    /// Halts carrying a recovery action are put to `decider`. `Accept`
    /// returns the halt with its recovery action removed; `Recover` invokes
    /// the action and keeps driving from the transition it produces.
    pub fn run<A, P, R>(&mut self, plan: &P, mut decider: R) -> DoneTransition<(), (), A>
    where
        P: Plan<A> + ?Sized,
        R: RecoveryDecider,
    {
        let span = tracing::debug_span!(
            "run_plan",
            pump_steps = self.config.pump_steps,
            max_recoveries = ?self.config.max_recoveries,
        );
        let _guard = span.enter();

        let mut execution = Execution::start(plan, self.config.clone());
        let (done, stats) = loop {
            match execution.resume() {
                Step::Succeeded { done, stats } | Step::HaltedFinal { done, stats } => {
                    break (done, stats)
                }
                Step::HaltedRecoverable(halt) => match decider.decide(halt.issues()) {
                    Decision::Recover => execution = halt.recover(),
                    Decision::Accept => {
                        let stats = *halt.stats();
                        break (halt.accept(), stats);
                    }
                },
            }
        };
        tracing::debug!(
            success = done.is_success(),
            recoveries = stats.recoveries,
            pump_steps = stats.pump_steps,
            "run finished"
        );
        self.last_stats = stats;
        done
    }
}
