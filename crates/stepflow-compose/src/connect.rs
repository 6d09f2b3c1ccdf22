//! # Connect Operator
//!
//! Composes an upstream `StateMachine<I, O, X>` with a downstream
//! `StateMachine<O, P, A>` into one `StateMachine<I, P, A>`. The upstream's
//! final value `X` is discarded.
//!
//! ## Protocol
//!
//! ```text
//! apply(items)
//!   upstream Continue(u', out) ──▶ downstream.apply(out)
//!       downstream Continue(d', p)   ──▶ Continue((u', d'), p)
//!       downstream Succeed / Halt    ──▶ composite done, overflow = []
//!   upstream Succeed / Halt ──────▶ "upstream finished" (below)
//!
//! apply_eoi()
//!   upstream.apply_eoi() ─────────▶ "upstream finished"
//!
//! upstream finished (output, overflow)
//!   downstream.apply(output), then downstream.apply_eoi()
//!   composite state  = upstream Halted if upstream halted, else downstream's
//!   composite overflow = upstream overflow
//! ```
//!
//! ## Recovery
//!
//! `connect` never invokes a recovery action. It lifts component actions
//! into composite ones:
//!
//! - A downstream halt while upstream is still open resumes with the
//!   retained upstream continuation.
//! - A recoverable upstream halt keeps the downstream un-finalized inside
//!   the composite action, so recovery resumes feeding the same downstream.
//!   A final upstream halt finalizes the downstream immediately.
//! - If the downstream also halted recoverably while draining, both halts
//!   surface in order: upstream's first, then (after upstream recovers and
//!   any further upstream halts) the downstream's. Upstream output produced
//!   in between is held back and fed to the downstream once it recovers.
//! - A downstream halt after upstream finished resumes the downstream and
//!   finalizes it at once, since no more input can arrive.
//!
//! Upstream issues always take precedence: when upstream halts, the
//! composite halt carries upstream's issues verbatim. Downstream issues
//! are dropped only when the upstream halt is final.

use std::marker::PhantomData;

use stepflow_core::{
    Continuation, Done, DoneTransition, EndOfInput, Halted, Issue, Recover, StateMachine,
    Transition,
};

// ─── Connected processor ─────────────────────────────────────────────

/// Two processors connected end to end.
///
/// `O` is the type flowing between them and `X` the upstream's discarded
/// final value.
pub struct Connected<U, D, O, X> {
    upstream: U,
    downstream: D,
    _link: PhantomData<fn() -> (O, X)>,
}

impl<U: Clone, D: Clone, O, X> Clone for Connected<U, D, O, X> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            downstream: self.downstream.clone(),
            _link: PhantomData,
        }
    }
}

impl<U, D, O, X> Connected<U, D, O, X> {
    /// The upstream processor.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// The downstream processor.
    pub fn downstream(&self) -> &D {
        &self.downstream
    }
}

/// Feed the output of `upstream` into `downstream`.
pub fn connect<I, O, X, P, A, U, D>(upstream: U, downstream: D) -> Connected<U, D, O, X>
where
    U: StateMachine<I, O, X>,
    D: StateMachine<O, P, A>,
{
    Connected {
        upstream,
        downstream,
        _link: PhantomData,
    }
}

impl<I, O, X, P, A, U, D> StateMachine<I, P, A> for Connected<U, D, O, X>
where
    U: StateMachine<I, O, X>,
    D: StateMachine<O, P, A>,
    I: Clone + 'static,
    O: 'static,
    X: 'static,
    P: 'static,
    A: 'static,
{
    fn initial(&self) -> Box<dyn Continuation<I, P, A>> {
        Box::new(Joint {
            upstream: self.upstream.initial(),
            downstream: self.downstream.initial(),
        })
    }
}

/// Method-call form of [`connect`].
pub trait ConnectExt<I, O, X>: StateMachine<I, O, X> + Sized {
    /// Feed this processor's output into `downstream`.
    fn connect<P, A, D>(self, downstream: D) -> Connected<Self, D, O, X>
    where
        D: StateMachine<O, P, A>,
    {
        connect(self, downstream)
    }
}

impl<I, O, X, M> ConnectExt<I, O, X> for M where M: StateMachine<I, O, X> {}

// ─── Composite continuation ──────────────────────────────────────────

/// Both halves open.
struct Joint<I, O, X, P, A> {
    upstream: Box<dyn Continuation<I, O, X>>,
    downstream: Box<dyn Continuation<O, P, A>>,
}

impl<I, O, X, P, A> Continuation<I, P, A> for Joint<I, O, X, P, A>
where
    I: Clone + 'static,
    O: 'static,
    X: 'static,
    P: 'static,
    A: 'static,
{
    fn apply(self: Box<Self>, items: Vec<I>) -> Transition<I, P, A> {
        let Joint {
            upstream,
            downstream,
        } = *self;
        resume(upstream.apply(items), downstream)
    }

    fn apply_eoi(self: Box<Self>, eoi: EndOfInput) -> DoneTransition<I, P, A> {
        let Joint {
            upstream,
            downstream,
        } = *self;
        settle_upstream(upstream.apply_eoi(eoi), downstream)
    }
}

/// Continue the composite from a fresh upstream transition.
fn resume<I, O, X, P, A>(
    upstream: Transition<I, O, X>,
    downstream: Box<dyn Continuation<O, P, A>>,
) -> Transition<I, P, A>
where
    I: Clone + 'static,
    O: 'static,
    X: 'static,
    P: 'static,
    A: 'static,
{
    match upstream {
        Transition::Continue { state, output } => {
            advance(state, step(downstream, output), Vec::new())
        }
        Transition::Succeed {
            value,
            output,
            overflow,
        } => settle_upstream(DoneTransition::succeed(value, output, overflow), downstream).into(),
        Transition::Halt {
            halted,
            output,
            overflow,
        } => settle_upstream(DoneTransition::halt(halted, output, overflow), downstream).into(),
    }
}

/// Upstream is still open; fold a downstream transition into the composite.
fn advance<I, O, X, P, A>(
    upstream: Box<dyn Continuation<I, O, X>>,
    downstream: Transition<O, P, A>,
    prefix: Vec<P>,
) -> Transition<I, P, A>
where
    I: Clone + 'static,
    O: 'static,
    X: 'static,
    P: 'static,
    A: 'static,
{
    match downstream {
        Transition::Continue { state, output } => Transition::Continue {
            state: Box::new(Joint {
                upstream,
                downstream: state,
            }),
            output: concat(prefix, output),
        },
        Transition::Succeed {
            value,
            output,
            overflow,
        } => {
            tracing::trace!(
                unconsumed = overflow.len(),
                "downstream finished before upstream; upstream dropped"
            );
            Transition::Succeed {
                value,
                output: concat(prefix, output),
                overflow: Vec::new(),
            }
        }
        Transition::Halt {
            halted, output, ..
        } => {
            let halted = halted.map_recover(move |recover| -> Recover<I, P, A> {
                Box::new(move || advance(upstream, recover(), Vec::new()))
            });
            Transition::Halt {
                halted,
                output: concat(prefix, output),
                overflow: Vec::new(),
            }
        }
    }
}

/// Upstream reached a terminal state: drain its output into the downstream
/// and decide the composite terminal state.
fn settle_upstream<I, O, X, P, A>(
    upstream: DoneTransition<I, O, X>,
    downstream: Box<dyn Continuation<O, P, A>>,
) -> DoneTransition<I, P, A>
where
    I: Clone + 'static,
    O: 'static,
    X: 'static,
    P: 'static,
    A: 'static,
{
    let (state, output, overflow) = upstream.into_parts();
    let drained = step(downstream, output);
    match state {
        Done::Success(_) => finish(overflow, drained, Vec::new()),
        Done::Halted(Halted {
            issues,
            recover: None,
        }) => {
            let disposed = finish(overflow, drained, Vec::new());
            if !disposed.issues().is_empty() {
                tracing::debug!(
                    suppressed = disposed.issues().len(),
                    "downstream issues superseded by upstream halt"
                );
            }
            let (_, output, overflow) = disposed.into_parts();
            DoneTransition::halt(Halted::new(issues), output, overflow)
        }
        Done::Halted(Halted {
            issues,
            recover: Some(recover),
        }) => match drained {
            Transition::Continue {
                state: downstream,
                output,
            } => DoneTransition::halt(
                Halted::recoverable(issues, move || resume(recover(), downstream)),
                output,
                overflow,
            ),
            Transition::Halt {
                halted:
                    Halted {
                        issues: pending,
                        recover: Some(downstream_recover),
                    },
                output,
                ..
            } => DoneTransition::halt(
                Halted::recoverable(issues, move || {
                    blocked(recover(), Vec::new(), pending, downstream_recover)
                }),
                output,
                overflow,
            ),
            finished => {
                // Downstream already finished while draining; recovering
                // upstream can only surface the downstream result.
                let mut settled = finish(overflow.clone(), finished, Vec::new());
                let output = settled.take_output();
                DoneTransition::halt(
                    Halted::recoverable(issues, move || Transition::from(settled)),
                    output,
                    overflow,
                )
            }
        },
    }
}

/// Upstream has been recovered while the downstream still sits in a
/// recoverable halt. Upstream output is held in `buffer` until the
/// downstream is recovered; further upstream halts surface first.
fn blocked<I, O, X, P, A>(
    upstream: Transition<I, O, X>,
    mut buffer: Vec<O>,
    issues: Vec<Issue>,
    recover: Recover<O, P, A>,
) -> Transition<I, P, A>
where
    I: Clone + 'static,
    O: 'static,
    X: 'static,
    P: 'static,
    A: 'static,
{
    match upstream {
        Transition::Continue {
            state,
            mut output,
        } => {
            buffer.append(&mut output);
            Transition::Halt {
                halted: Halted::recoverable(issues, move || {
                    advance(state, refeed(recover(), buffer), Vec::new())
                }),
                output: Vec::new(),
                overflow: Vec::new(),
            }
        }
        Transition::Succeed {
            mut output,
            overflow,
            ..
        } => {
            buffer.append(&mut output);
            let again = overflow.clone();
            Transition::Halt {
                halted: Halted::recoverable(issues, move || {
                    Transition::from(finish(again, refeed(recover(), buffer), Vec::new()))
                }),
                output: Vec::new(),
                overflow,
            }
        }
        Transition::Halt {
            halted:
                Halted {
                    issues: upstream_issues,
                    recover: Some(upstream_recover),
                },
            mut output,
            overflow,
        } => {
            buffer.append(&mut output);
            Transition::Halt {
                halted: Halted::recoverable(upstream_issues, move || {
                    blocked(upstream_recover(), buffer, issues, recover)
                }),
                output: Vec::new(),
                overflow,
            }
        }
        Transition::Halt {
            halted:
                Halted {
                    issues: upstream_issues,
                    recover: None,
                },
            overflow,
            ..
        } => {
            tracing::debug!(
                suppressed = issues.len(),
                "downstream issues superseded by upstream halt"
            );
            Transition::Halt {
                halted: Halted::new(upstream_issues),
                output: Vec::new(),
                overflow,
            }
        }
    }
}

/// Feed held-back `items` into a freshly recovered downstream. If the
/// downstream halts again recoverably, the items wait for that recovery.
fn refeed<O, P, A>(downstream: Transition<O, P, A>, items: Vec<O>) -> Transition<O, P, A>
where
    O: 'static,
    P: 'static,
    A: 'static,
{
    if items.is_empty() {
        return downstream;
    }
    match downstream {
        Transition::Continue { state, output } => match step(state, items) {
            Transition::Continue {
                state,
                output: more,
            } => Transition::Continue {
                state,
                output: concat(output, more),
            },
            Transition::Succeed {
                value,
                output: more,
                overflow,
            } => Transition::Succeed {
                value,
                output: concat(output, more),
                overflow,
            },
            Transition::Halt {
                halted,
                output: more,
                overflow,
            } => Transition::Halt {
                halted,
                output: concat(output, more),
                overflow,
            },
        },
        Transition::Halt {
            halted,
            output,
            overflow,
        } => {
            let halted = halted.map_recover(move |recover| -> Recover<O, P, A> {
                Box::new(move || refeed(recover(), items))
            });
            Transition::Halt {
                halted,
                output,
                overflow,
            }
        }
        finished => finished,
    }
}

/// Upstream is finished; finalize the downstream.
fn finish<I, O, P, A>(
    overflow: Vec<I>,
    downstream: Transition<O, P, A>,
    prefix: Vec<P>,
) -> DoneTransition<I, P, A>
where
    I: Clone + 'static,
    O: 'static,
    P: 'static,
    A: 'static,
{
    match downstream {
        Transition::Continue { state, output } => {
            let done = state.apply_eoi(EndOfInput);
            close(overflow, done, concat(prefix, output))
        }
        Transition::Succeed {
            value,
            output,
            overflow: dropped,
        } => close(overflow, DoneTransition::succeed(value, output, dropped), prefix),
        Transition::Halt {
            halted,
            output,
            overflow: dropped,
        } => close(overflow, DoneTransition::halt(halted, output, dropped), prefix),
    }
}

/// Map a finalized downstream into the composite, reporting `overflow`.
fn close<I, O, P, A>(
    overflow: Vec<I>,
    downstream: DoneTransition<O, P, A>,
    prefix: Vec<P>,
) -> DoneTransition<I, P, A>
where
    I: Clone + 'static,
    O: 'static,
    P: 'static,
    A: 'static,
{
    let (state, output, _) = downstream.into_parts();
    let output = concat(prefix, output);
    match state {
        Done::Success(value) => DoneTransition::succeed(value, output, overflow),
        Done::Halted(halted) => {
            let halted = if halted.is_recoverable() {
                let again = overflow.clone();
                halted.map_recover(move |recover| -> Recover<I, P, A> {
                    Box::new(move || Transition::from(finish(again, recover(), Vec::new())))
                })
            } else {
                Halted::new(halted.issues)
            };
            DoneTransition::halt(halted, output, overflow)
        }
    }
}

/// Apply `items` to `downstream`; an empty batch leaves it untouched.
fn step<O, P, A>(downstream: Box<dyn Continuation<O, P, A>>, items: Vec<O>) -> Transition<O, P, A> {
    if items.is_empty() {
        Transition::Continue {
            state: downstream,
            output: Vec::new(),
        }
    } else {
        downstream.apply(items)
    }
}

fn concat<T>(mut prefix: Vec<T>, mut rest: Vec<T>) -> Vec<T> {
    if prefix.is_empty() {
        rest
    } else {
        prefix.append(&mut rest);
        prefix
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
