//! # Take — Bounded Consumer
//!
//! Collects exactly `n` items, then succeeds. Items of the same batch past
//! the `n`th are not consumed and come back as overflow, in order. At end of
//! input with fewer than `n` items, succeeds with what it has.

use std::marker::PhantomData;

use stepflow_core::{Continuation, DoneTransition, EndOfInput, StateMachine, Transition};

/// Iteratee collecting the first `n` items.
pub struct Take<T> {
    n: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T> Take<T> {
    /// Take `n` items.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            _item: PhantomData,
        }
    }
}

impl<T: 'static> StateMachine<T, (), Vec<T>> for Take<T> {
    fn initial(&self) -> Box<dyn Continuation<T, (), Vec<T>>> {
        Box::new(TakeState {
            n: self.n,
            taken: Vec::with_capacity(self.n.min(1024)),
        })
    }
}

struct TakeState<T> {
    n: usize,
    taken: Vec<T>,
}

impl<T: 'static> Continuation<T, (), Vec<T>> for TakeState<T> {
    fn apply(mut self: Box<Self>, items: Vec<T>) -> Transition<T, (), Vec<T>> {
        let wanted = self.n - self.taken.len();
        let mut items = items.into_iter();
        self.taken.extend(items.by_ref().take(wanted));
        if self.taken.len() == self.n {
            return Transition::Succeed {
                value: self.taken,
                output: Vec::new(),
                overflow: items.collect(),
            };
        }
        Transition::Continue {
            state: self,
            output: Vec::new(),
        }
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<T, (), Vec<T>> {
        DoneTransition::succeed(self.taken, Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepflow_core::feed;

    #[test]
    fn take_two_of_five_overflows_three() {
        let t = Take::<char>::new(2).initial().apply(vec!['a', 'b', 'c', 'd', 'e']);
        match t {
            Transition::Succeed {
                value, overflow, ..
            } => {
                assert_eq!(value, vec!['a', 'b']);
                assert_eq!(overflow, vec!['c', 'd', 'e']);
            }
            other => panic!("expected Succeed, got {other:?}"),
        }
    }

    #[test]
    fn take_spans_chunks() {
        let fed = feed(&Take::new(3), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(fed.done.value(), Some(&vec![1, 2, 3]));
        assert_eq!(fed.done.overflow(), &[4]);
    }

    #[test]
    fn take_short_input_succeeds_at_eoi() {
        let fed = feed(&Take::new(5), vec![vec![1]]);
        assert_eq!(fed.done.value(), Some(&vec![1]));
        assert!(fed.done.overflow().is_empty());
    }

    #[test]
    fn take_zero_finishes_on_first_step() {
        let t = Take::<i32>::new(0).initial().apply(vec![9]);
        assert!(t.is_done());
    }
}
