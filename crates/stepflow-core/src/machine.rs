//! # Processor Contract
//!
//! A processor is an immutable value exposing one initial continuation.
//! Processors are composed, never mutated; `initial()` returns a fresh
//! continuation on every call so the same processor can be run any number
//! of times.

use std::rc::Rc;

use crate::continuation::Continuation;

/// A stream processor from `I` items to `O` items with final value `A`.
pub trait StateMachine<I, O, A> {
    /// The initial continuation (`s0`).
    fn initial(&self) -> Box<dyn Continuation<I, O, A>>;
}

/// Type-erased processor.
pub type BoxMachine<I, O, A> = Box<dyn StateMachine<I, O, A>>;

impl<I, O, A, M> StateMachine<I, O, A> for Box<M>
where
    M: StateMachine<I, O, A> + ?Sized,
{
    fn initial(&self) -> Box<dyn Continuation<I, O, A>> {
        (**self).initial()
    }
}

impl<I, O, A, M> StateMachine<I, O, A> for Rc<M>
where
    M: StateMachine<I, O, A> + ?Sized,
{
    fn initial(&self) -> Box<dyn Continuation<I, O, A>> {
        (**self).initial()
    }
}

impl<I, O, A, M> StateMachine<I, O, A> for &M
where
    M: StateMachine<I, O, A> + ?Sized,
{
    fn initial(&self) -> Box<dyn Continuation<I, O, A>> {
        (**self).initial()
    }
}
