//! # Transformers
//!
//! Stateless per-item transforms. Both consume every item they are given
//! and finish with `()` at end of input.

use std::rc::Rc;

use stepflow_core::{Continuation, DoneTransition, EndOfInput, StateMachine, Transition};

// ─── Map ─────────────────────────────────────────────────────────────

/// Applies a function to every item.
pub struct Map<F> {
    f: Rc<F>,
}

impl<F> Map<F> {
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f: Rc::new(f) }
    }
}

impl<F> Clone for Map<F> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<I, O, F> StateMachine<I, O, ()> for Map<F>
where
    F: Fn(I) -> O + 'static,
    I: 'static,
    O: 'static,
{
    fn initial(&self) -> Box<dyn Continuation<I, O, ()>> {
        Box::new(self.clone())
    }
}

impl<I, O, F> Continuation<I, O, ()> for Map<F>
where
    F: Fn(I) -> O + 'static,
    I: 'static,
    O: 'static,
{
    fn apply(self: Box<Self>, items: Vec<I>) -> Transition<I, O, ()> {
        let output = items.into_iter().map(|item| (self.f)(item)).collect();
        Transition::Continue {
            state: self,
            output,
        }
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<I, O, ()> {
        DoneTransition::succeed((), Vec::new(), Vec::new())
    }
}

// ─── Filter ──────────────────────────────────────────────────────────

/// Keeps the items matching a predicate, in order.
pub struct Filter<F> {
    keep: Rc<F>,
}

impl<F> Filter<F> {
    /// Wrap `keep`.
    pub fn new(keep: F) -> Self {
        Self { keep: Rc::new(keep) }
    }
}

impl<F> Clone for Filter<F> {
    fn clone(&self) -> Self {
        Self {
            keep: Rc::clone(&self.keep),
        }
    }
}

impl<I, F> StateMachine<I, I, ()> for Filter<F>
where
    F: Fn(&I) -> bool + 'static,
    I: 'static,
{
    fn initial(&self) -> Box<dyn Continuation<I, I, ()>> {
        Box::new(self.clone())
    }
}

impl<I, F> Continuation<I, I, ()> for Filter<F>
where
    F: Fn(&I) -> bool + 'static,
    I: 'static,
{
    fn apply(self: Box<Self>, items: Vec<I>) -> Transition<I, I, ()> {
        let output = items.into_iter().filter(|item| (self.keep)(item)).collect();
        Transition::Continue {
            state: self,
            output,
        }
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<I, I, ()> {
        DoneTransition::succeed((), Vec::new(), Vec::new())
    }
}
