//! # Continuation Contract
//!
//! A continuation is an open processor state. Every `apply*` method takes
//! `self: Box<Self>`, so a continuation is consumed by the step that
//! advances it. The next state is whatever the returned
//! [`Transition`] carries; the old value can never be stepped twice.

use crate::transition::{DoneTransition, Transition};

/// Marker signalling that no further input will ever arrive.
///
/// Not a regular input item. Applying it is the only way to move a
/// continuation into a terminal state without a processor-initiated stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EndOfInput;

/// An open processor state.
///
/// Implementations must never panic for any input value. Unrecoverable
/// problems are reported by returning a `Halt` transition.
pub trait Continuation<I, O, A> {
    /// Consume some prefix of `items` (possibly all, possibly none).
    ///
    /// A `Continue` result means every item was consumed. A terminal
    /// result reports the unconsumed suffix as `overflow`.
    fn apply(self: Box<Self>, items: Vec<I>) -> Transition<I, O, A>;

    /// Apply a single item. Always equivalent to `apply(vec![item])`.
    fn apply_item(self: Box<Self>, item: I) -> Transition<I, O, A> {
        self.apply(vec![item])
    }

    /// Finalize: no more input will come.
    fn apply_eoi(self: Box<Self>, eoi: EndOfInput) -> DoneTransition<I, O, A>;
}
