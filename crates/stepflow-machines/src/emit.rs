//! # Emit — Chunked Enumerator
//!
//! Emits a fixed sequence. Every unit input item pulls one chunk of up to
//! `chunk_size` items. A unit item arriving after the sequence is exhausted
//! is not consumed: the emitter succeeds and reports it (and any later
//! units) as overflow. `EndOfInput` flushes whatever is left.

use std::rc::Rc;

use stepflow_core::{Continuation, DoneTransition, EndOfInput, StateMachine, Transition};

/// Enumerator over a fixed sequence.
#[derive(Debug, Clone)]
pub struct Emit<O> {
    items: Rc<[O]>,
    chunk_size: usize,
}

impl<O> Emit<O> {
    /// Emit `items`, one item per unit step.
    pub fn new(items: impl Into<Vec<O>>) -> Self {
        Self {
            items: items.into().into(),
            chunk_size: 1,
        }
    }

    /// Number of items pulled by each unit step. Zero is treated as one.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl<O: Clone + 'static> StateMachine<(), O, ()> for Emit<O> {
    fn initial(&self) -> Box<dyn Continuation<(), O, ()>> {
        Box::new(EmitState {
            items: Rc::clone(&self.items),
            chunk_size: self.chunk_size,
            position: 0,
        })
    }
}

struct EmitState<O> {
    items: Rc<[O]>,
    chunk_size: usize,
    position: usize,
}

impl<O: Clone + 'static> Continuation<(), O, ()> for EmitState<O> {
    fn apply(mut self: Box<Self>, units: Vec<()>) -> Transition<(), O, ()> {
        let mut output = Vec::new();
        let mut units = units.into_iter();
        while units.next().is_some() {
            if self.position >= self.items.len() {
                let mut overflow = vec![()];
                overflow.extend(units.by_ref());
                return Transition::Succeed {
                    value: (),
                    output,
                    overflow,
                };
            }
            let end = (self.position + self.chunk_size).min(self.items.len());
            output.extend_from_slice(&self.items[self.position..end]);
            self.position = end;
        }
        Transition::Continue {
            state: self,
            output,
        }
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<(), O, ()> {
        let rest = self.items[self.position..].to_vec();
        DoneTransition::succeed((), rest, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eoi_flushes_everything() {
        let done = Emit::new(vec![1, 2, 3]).initial().apply_eoi(EndOfInput);
        assert!(done.is_success());
        assert_eq!(done.output(), &[1, 2, 3]);
        assert!(done.overflow().is_empty());
    }

    #[test]
    fn unit_steps_pull_chunks() {
        let emit = Emit::new(vec![1, 2, 3]).chunk_size(2);
        let t = emit.initial().apply_item(());
        assert_eq!(t.output(), &[1, 2]);
        let Transition::Continue { state, .. } = t else {
            panic!("expected Continue");
        };
        let t = state.apply_item(());
        assert_eq!(t.output(), &[3]);
        let Transition::Continue { state, .. } = t else {
            panic!("expected Continue");
        };
        let done = state.apply_eoi(EndOfInput);
        assert!(done.output().is_empty());
    }

    #[test]
    fn exhausted_emitter_reports_unconsumed_units() {
        let t = Emit::new(vec![7]).initial().apply(vec![(), (), ()]);
        match t {
            Transition::Succeed {
                output, overflow, ..
            } => {
                assert_eq!(output, vec![7]);
                assert_eq!(overflow.len(), 2);
            }
            other => panic!("expected Succeed, got {other:?}"),
        }
    }

    #[test]
    fn zero_chunk_size_behaves_as_one() {
        let t = Emit::new(vec!['a', 'b']).chunk_size(0).initial().apply_item(());
        assert_eq!(t.output(), &['a']);
    }

    #[test]
    fn emitter_is_reusable() {
        let emit = Emit::new(vec![1, 2]);
        let first = emit.initial().apply_eoi(EndOfInput);
        let second = emit.initial().apply_eoi(EndOfInput);
        assert_eq!(first.output(), second.output());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Pulling chunk by chunk and flushing at the end yields the
            /// sequence unchanged, whatever the chunk size.
            #[test]
            fn pulled_output_is_the_sequence(
                items in prop::collection::vec(any::<u8>(), 0..50),
                chunk_size in 0usize..8,
                pulls in 0usize..20
            ) {
                let mut state = Emit::new(items.clone()).chunk_size(chunk_size).initial();
                let mut seen = Vec::new();
                for _ in 0..pulls {
                    match state.apply_item(()) {
                        Transition::Continue { state: next, mut output } => {
                            seen.append(&mut output);
                            state = next;
                        }
                        done => {
                            seen.extend_from_slice(done.output());
                            prop_assert!(done.is_done());
                            prop_assert_eq!(seen, items);
                            return Ok(());
                        }
                    }
                }
                seen.extend_from_slice(state.apply_eoi(EndOfInput).output());
                prop_assert_eq!(seen, items);
            }
        }
    }
}
