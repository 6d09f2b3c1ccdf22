//! # Processor States
//!
//! The three states a processor can be in, and the terminal subset.
//!
//! ```text
//! Continuation ──apply(items)──▶ Continuation | Success | Halted
//! Continuation ──apply_eoi()───▶ Success | Halted
//! Halted ──recover()──▶ (any Transition)
//! ```
//!
//! `Success` and `Halted` together form [`Done`]. A `Halted` without a
//! recovery action is permanently terminal for its branch.

use std::fmt;

use crate::continuation::Continuation;
use crate::issue::Issue;
use crate::transition::Transition;

/// Deferred recovery action stored inside a [`Halted`] state.
///
/// Ownership moves to whichever component decides to invoke it; it can be
/// invoked at most once.
pub type Recover<I, O, A> = Box<dyn FnOnce() -> Transition<I, O, A>>;

// ─── Halted ──────────────────────────────────────────────────────────

/// A processor stopped because of one or more issues.
pub struct Halted<I, O, A> {
    /// Issues in the order they were reported.
    pub issues: Vec<Issue>,
    /// Optional action producing a fresh transition to resume from.
    pub recover: Option<Recover<I, O, A>>,
}

impl<I, O, A> Halted<I, O, A> {
    /// A halt with no recovery action.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            recover: None,
        }
    }

    /// A halt whose `recover` action resumes processing.
    pub fn recoverable<F>(issues: Vec<Issue>, recover: F) -> Self
    where
        F: FnOnce() -> Transition<I, O, A> + 'static,
    {
        Self {
            issues,
            recover: Some(Box::new(recover)),
        }
    }

    /// Issues in reporting order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Whether a recovery action is attached.
    pub fn is_recoverable(&self) -> bool {
        self.recover.is_some()
    }

    /// Drop the recovery action, making this halt final.
    pub fn into_final(self) -> Self {
        Self::new(self.issues)
    }

    /// Replace the recovery action with one of another shape.
    ///
    /// Used by composite processors to lift a component's recovery into
    /// the composite's types. Issues are carried over unchanged.
    pub fn map_recover<J, P, B, F>(self, lift: F) -> Halted<J, P, B>
    where
        F: FnOnce(Recover<I, O, A>) -> Recover<J, P, B>,
    {
        Halted {
            issues: self.issues,
            recover: self.recover.map(lift),
        }
    }
}

impl<I, O, A> fmt::Debug for Halted<I, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Halted")
            .field("issues", &self.issues)
            .field("recoverable", &self.recover.is_some())
            .finish()
    }
}

// ─── State ───────────────────────────────────────────────────────────

/// The state of a processor after a step.
pub enum State<I, O, A> {
    /// Open; accepts more input and `EndOfInput`.
    Continuation(Box<dyn Continuation<I, O, A>>),
    /// Terminal; processing produced exactly one final value.
    Success(A),
    /// Terminal but possibly recoverable.
    Halted(Halted<I, O, A>),
}

impl<I, O, A> State<I, O, A> {
    /// Whether this state is terminal.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Continuation(_))
    }

    /// Canonical name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Continuation(_) => "CONTINUATION",
            Self::Success(_) => "SUCCESS",
            Self::Halted(_) => "HALTED",
        }
    }
}

impl<I, O, A: fmt::Debug> fmt::Debug for State<I, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuation(_) => f.write_str("Continuation(..)"),
            Self::Success(value) => f.debug_tuple("Success").field(value).finish(),
            Self::Halted(halted) => halted.fmt(f),
        }
    }
}

// ─── Done ────────────────────────────────────────────────────────────

/// Terminal subset of [`State`].
pub enum Done<I, O, A> {
    /// Processing completed with a value.
    Success(A),
    /// Processing stopped with issues.
    Halted(Halted<I, O, A>),
}

impl<I, O, A> From<Done<I, O, A>> for State<I, O, A> {
    fn from(done: Done<I, O, A>) -> Self {
        match done {
            Done::Success(value) => State::Success(value),
            Done::Halted(halted) => State::Halted(halted),
        }
    }
}

impl<I, O, A: fmt::Debug> fmt::Debug for Done<I, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => f.debug_tuple("Success").field(value).finish(),
            Self::Halted(halted) => halted.fmt(f),
        }
    }
}
