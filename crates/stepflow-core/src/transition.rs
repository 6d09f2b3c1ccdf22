//! # Transitions
//!
//! A [`Transition`] is the result of applying input to a continuation: the
//! next state, the output produced by the step, and for terminal results
//! the `overflow` (input supplied but never consumed).
//!
//! ## Invariants
//!
//! - `output` is in production order and is never reordered downstream.
//! - `overflow` is the unconsumed suffix of the supplied input, in order.
//! - Only terminal transitions carry `overflow`. A `Continue` consumed
//!   everything it was given.

use std::fmt;
use std::mem;

use crate::continuation::Continuation;
use crate::issue::Issue;
use crate::state::{Done, Halted, State};

// ─── Transition ──────────────────────────────────────────────────────

/// Result of a single step.
pub enum Transition<I, O, A> {
    /// The processor stays open.
    Continue {
        /// Next continuation.
        state: Box<dyn Continuation<I, O, A>>,
        /// Output produced by this step.
        output: Vec<O>,
    },
    /// The processor completed with a value.
    Succeed {
        /// Final value.
        value: A,
        /// Output produced by this step.
        output: Vec<O>,
        /// Unconsumed input.
        overflow: Vec<I>,
    },
    /// The processor stopped with issues.
    Halt {
        /// Issues and optional recovery action.
        halted: Halted<I, O, A>,
        /// Output produced by this step.
        output: Vec<O>,
        /// Unconsumed input.
        overflow: Vec<I>,
    },
}

impl<I, O, A> Transition<I, O, A> {
    /// Box `state` into a `Continue` transition.
    pub fn next<C>(state: C, output: Vec<O>) -> Self
    where
        C: Continuation<I, O, A> + 'static,
    {
        Self::Continue {
            state: Box::new(state),
            output,
        }
    }

    /// Output produced by this step.
    pub fn output(&self) -> &[O] {
        match self {
            Self::Continue { output, .. }
            | Self::Succeed { output, .. }
            | Self::Halt { output, .. } => output,
        }
    }

    /// Whether the resulting state is terminal.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Continue { .. })
    }

    /// Narrow to the terminal subset, returning `self` unchanged on `Continue`.
    pub fn into_done(self) -> Result<DoneTransition<I, O, A>, Self> {
        match self {
            Self::Continue { .. } => Err(self),
            Self::Succeed {
                value,
                output,
                overflow,
            } => Ok(DoneTransition::Succeed {
                value,
                output,
                overflow,
            }),
            Self::Halt {
                halted,
                output,
                overflow,
            } => Ok(DoneTransition::Halt {
                halted,
                output,
                overflow,
            }),
        }
    }

    /// Split into state, output and overflow.
    pub fn into_state(self) -> (State<I, O, A>, Vec<O>, Vec<I>) {
        match self {
            Self::Continue { state, output } => (State::Continuation(state), output, Vec::new()),
            Self::Succeed {
                value,
                output,
                overflow,
            } => (State::Success(value), output, overflow),
            Self::Halt {
                halted,
                output,
                overflow,
            } => (State::Halted(halted), output, overflow),
        }
    }
}

impl<I, O, A> From<DoneTransition<I, O, A>> for Transition<I, O, A> {
    fn from(done: DoneTransition<I, O, A>) -> Self {
        match done {
            DoneTransition::Succeed {
                value,
                output,
                overflow,
            } => Self::Succeed {
                value,
                output,
                overflow,
            },
            DoneTransition::Halt {
                halted,
                output,
                overflow,
            } => Self::Halt {
                halted,
                output,
                overflow,
            },
        }
    }
}

impl<I: fmt::Debug, O: fmt::Debug, A: fmt::Debug> fmt::Debug for Transition<I, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue { output, .. } => f
                .debug_struct("Continue")
                .field("output", output)
                .finish_non_exhaustive(),
            Self::Succeed {
                value,
                output,
                overflow,
            } => f
                .debug_struct("Succeed")
                .field("value", value)
                .field("output", output)
                .field("overflow", overflow)
                .finish(),
            Self::Halt {
                halted,
                output,
                overflow,
            } => f
                .debug_struct("Halt")
                .field("halted", halted)
                .field("output", output)
                .field("overflow", overflow)
                .finish(),
        }
    }
}

// ─── DoneTransition ──────────────────────────────────────────────────

/// Terminal subset of [`Transition`]. The only result of `apply_eoi`.
pub enum DoneTransition<I, O, A> {
    /// Completed with a value.
    Succeed {
        /// Final value.
        value: A,
        /// Output produced by this step.
        output: Vec<O>,
        /// Unconsumed input.
        overflow: Vec<I>,
    },
    /// Stopped with issues.
    Halt {
        /// Issues and optional recovery action.
        halted: Halted<I, O, A>,
        /// Output produced by this step.
        output: Vec<O>,
        /// Unconsumed input.
        overflow: Vec<I>,
    },
}

impl<I, O, A> DoneTransition<I, O, A> {
    /// A successful completion.
    pub fn succeed(value: A, output: Vec<O>, overflow: Vec<I>) -> Self {
        Self::Succeed {
            value,
            output,
            overflow,
        }
    }

    /// A halt.
    pub fn halt(halted: Halted<I, O, A>, output: Vec<O>, overflow: Vec<I>) -> Self {
        Self::Halt {
            halted,
            output,
            overflow,
        }
    }

    /// Output produced by this step.
    pub fn output(&self) -> &[O] {
        match self {
            Self::Succeed { output, .. } | Self::Halt { output, .. } => output,
        }
    }

    /// Unconsumed input.
    pub fn overflow(&self) -> &[I] {
        match self {
            Self::Succeed { overflow, .. } | Self::Halt { overflow, .. } => overflow,
        }
    }

    /// Whether this is a `Succeed`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeed { .. })
    }

    /// Final value, if successful.
    pub fn value(&self) -> Option<&A> {
        match self {
            Self::Succeed { value, .. } => Some(value),
            Self::Halt { .. } => None,
        }
    }

    /// Issues of a halt; empty on success.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Succeed { .. } => &[],
            Self::Halt { halted, .. } => halted.issues(),
        }
    }

    /// Move the output out, leaving it empty.
    pub fn take_output(&mut self) -> Vec<O> {
        match self {
            Self::Succeed { output, .. } | Self::Halt { output, .. } => mem::take(output),
        }
    }

    /// Prepend output produced by earlier steps of the same composite step.
    pub fn prepend_output(mut self, mut prefix: Vec<O>) -> Self {
        if !prefix.is_empty() {
            match &mut self {
                Self::Succeed { output, .. } | Self::Halt { output, .. } => {
                    prefix.append(output);
                    *output = prefix;
                }
            }
        }
        self
    }

    /// Split into terminal state, output and overflow.
    pub fn into_parts(self) -> (Done<I, O, A>, Vec<O>, Vec<I>) {
        match self {
            Self::Succeed {
                value,
                output,
                overflow,
            } => (Done::Success(value), output, overflow),
            Self::Halt {
                halted,
                output,
                overflow,
            } => (Done::Halted(halted), output, overflow),
        }
    }

    /// Reassemble from parts.
    pub fn from_parts(state: Done<I, O, A>, output: Vec<O>, overflow: Vec<I>) -> Self {
        match state {
            Done::Success(value) => Self::succeed(value, output, overflow),
            Done::Halted(halted) => Self::halt(halted, output, overflow),
        }
    }
}

impl<I: fmt::Debug, O: fmt::Debug, A: fmt::Debug> fmt::Debug for DoneTransition<I, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeed {
                value,
                output,
                overflow,
            } => f
                .debug_struct("Succeed")
                .field("value", value)
                .field("output", output)
                .field("overflow", overflow)
                .finish(),
            Self::Halt {
                halted,
                output,
                overflow,
            } => f
                .debug_struct("Halt")
                .field("halted", halted)
                .field("output", output)
                .field("overflow", overflow)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuation::EndOfInput;

    /// Echoes every item and succeeds at end of input with the item count.
    struct Echo(usize);

    impl Continuation<u8, u8, usize> for Echo {
        fn apply(self: Box<Self>, items: Vec<u8>) -> Transition<u8, u8, usize> {
            let seen = self.0 + items.len();
            Transition::next(Echo(seen), items)
        }

        fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<u8, u8, usize> {
            DoneTransition::succeed(self.0, vec![], vec![])
        }
    }

    #[test]
    fn apply_item_matches_single_element_batch() {
        let single = Box::new(Echo(0)).apply_item(9);
        let batch = Box::new(Echo(0)).apply(vec![9]);
        assert_eq!(single.output(), batch.output());
        assert!(!single.is_done());
    }

    #[test]
    fn into_done_rejects_continue() {
        let t = Box::new(Echo(0)).apply(vec![1, 2]);
        let t = t.into_done().unwrap_err();
        assert_eq!(t.output(), &[1, 2]);
    }

    #[test]
    fn into_done_accepts_terminal() {
        let t: Transition<u8, u8, usize> = DoneTransition::succeed(2, vec![1], vec![3]).into();
        let done = t.into_done().unwrap();
        assert_eq!(done.value(), Some(&2));
        assert_eq!(done.output(), &[1]);
        assert_eq!(done.overflow(), &[3]);
    }

    #[test]
    fn into_state_splits_continue() {
        let (state, output, overflow) = Box::new(Echo(0)).apply(vec![4]).into_state();
        assert_eq!(state.name(), "CONTINUATION");
        assert_eq!(output, vec![4]);
        assert!(overflow.is_empty());
    }

    #[test]
    fn prepend_output_keeps_order() {
        let done: DoneTransition<u8, u8, usize> = DoneTransition::succeed(0, vec![3, 4], vec![]);
        let done = done.prepend_output(vec![1, 2]);
        assert_eq!(done.output(), &[1, 2, 3, 4]);
    }

    #[test]
    fn take_output_empties() {
        let mut done: DoneTransition<u8, u8, usize> =
            DoneTransition::halt(Halted::new(vec![Issue::new("x")]), vec![1], vec![2]);
        assert_eq!(done.take_output(), vec![1]);
        assert!(done.output().is_empty());
        assert_eq!(done.issues()[0].message, "x");
        assert!(!done.is_success());
    }

    #[test]
    fn parts_round_trip_preserves_halt() {
        let done: DoneTransition<u8, u8, usize> =
            DoneTransition::halt(Halted::new(vec![Issue::new("x")]), vec![1], vec![2]);
        let (state, output, overflow) = done.into_parts();
        let done = DoneTransition::from_parts(state, output, overflow);
        assert_eq!(done.issues().len(), 1);
        assert_eq!(done.overflow(), &[2]);
    }
}
