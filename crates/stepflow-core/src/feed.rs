//! # Host-Side Feeding
//!
//! [`feed`] plays the host's role for processors with external input: it
//! applies a sequence of chunks in order, then `EndOfInput`, and collects
//! what came out. If the processor finishes before the chunks run out, the
//! chunks it never saw are appended to the terminal overflow so that no
//! supplied item goes missing.
//!
//! Recovery actions are not invoked here. A halt ends feeding and is
//! returned as-is.

use crate::continuation::EndOfInput;
use crate::machine::StateMachine;
use crate::transition::{DoneTransition, Transition};

/// Result of [`feed`].
#[derive(Debug)]
pub struct Fed<I, O, A> {
    /// Output of every step, concatenated in production order.
    pub output: Vec<O>,
    /// Terminal transition. Its output has been moved into `output`.
    pub done: DoneTransition<I, O, A>,
    /// Number of continuation steps applied, including `EndOfInput`.
    pub steps: usize,
}

/// Feed `chunks` then `EndOfInput` to a fresh instance of `machine`.
pub fn feed<I, O, A, M, C>(machine: &M, chunks: C) -> Fed<I, O, A>
where
    M: StateMachine<I, O, A> + ?Sized,
    C: IntoIterator<Item = Vec<I>>,
{
    let mut output = Vec::new();
    let mut steps = 0;
    let mut state = machine.initial();
    let mut chunks = chunks.into_iter();

    while let Some(chunk) = chunks.next() {
        steps += 1;
        match state.apply(chunk) {
            Transition::Continue {
                state: next,
                output: mut out,
            } => {
                output.append(&mut out);
                state = next;
            }
            Transition::Succeed {
                value,
                output: mut out,
                mut overflow,
            } => {
                output.append(&mut out);
                overflow.extend(chunks.by_ref().flatten());
                return Fed {
                    output,
                    done: DoneTransition::succeed(value, Vec::new(), overflow),
                    steps,
                };
            }
            Transition::Halt {
                halted,
                output: mut out,
                mut overflow,
            } => {
                output.append(&mut out);
                overflow.extend(chunks.by_ref().flatten());
                return Fed {
                    output,
                    done: DoneTransition::halt(halted, Vec::new(), overflow),
                    steps,
                };
            }
        }
    }

    let mut done = state.apply_eoi(EndOfInput);
    output.append(&mut done.take_output());
    Fed {
        output,
        done,
        steps: steps + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuation::Continuation;
    use crate::issue::Issue;
    use crate::state::Halted;

    /// Sums items; succeeds as soon as the running total reaches `limit`.
    struct Capped {
        limit: i64,
    }

    struct CappedState {
        limit: i64,
        total: i64,
    }

    impl StateMachine<i64, i64, i64> for Capped {
        fn initial(&self) -> Box<dyn Continuation<i64, i64, i64>> {
            Box::new(CappedState {
                limit: self.limit,
                total: 0,
            })
        }
    }

    impl Continuation<i64, i64, i64> for CappedState {
        fn apply(self: Box<Self>, items: Vec<i64>) -> Transition<i64, i64, i64> {
            let mut total = self.total;
            let mut items = items.into_iter();
            let mut output = Vec::new();
            while let Some(item) = items.next() {
                if item < 0 {
                    let mut overflow = vec![item];
                    overflow.extend(items.by_ref());
                    return Transition::Halt {
                        halted: Halted::new(vec![Issue::new("negative")]),
                        output,
                        overflow,
                    };
                }
                total += item;
                output.push(total);
                if total >= self.limit {
                    return Transition::Succeed {
                        value: total,
                        output,
                        overflow: items.by_ref().collect(),
                    };
                }
            }
            Transition::next(
                CappedState {
                    limit: self.limit,
                    total,
                },
                output,
            )
        }

        fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<i64, i64, i64> {
            DoneTransition::succeed(self.total, vec![], vec![])
        }
    }

    #[test]
    fn feeds_all_chunks_then_eoi() {
        let fed = feed(&Capped { limit: 100 }, vec![vec![1, 2], vec![3]]);
        assert_eq!(fed.output, vec![1, 3, 6]);
        assert_eq!(fed.done.value(), Some(&6));
        assert_eq!(fed.steps, 3);
    }

    #[test]
    fn early_finish_keeps_unseen_chunks_in_overflow() {
        let fed = feed(&Capped { limit: 3 }, vec![vec![1, 2, 5], vec![6, 7]]);
        assert_eq!(fed.done.value(), Some(&3));
        assert_eq!(fed.done.overflow(), &[5, 6, 7]);
        assert_eq!(fed.steps, 1);
    }

    #[test]
    fn halt_stops_feeding() {
        let fed = feed(&Capped { limit: 100 }, vec![vec![1], vec![-1, 2], vec![3]]);
        assert_eq!(fed.output, vec![1]);
        assert_eq!(fed.done.issues()[0].message, "negative");
        assert_eq!(fed.done.overflow(), &[-1, 2, 3]);
    }

    #[test]
    fn no_chunks_is_just_eoi() {
        let fed = feed(&Capped { limit: 1 }, Vec::<Vec<i64>>::new());
        assert_eq!(fed.done.value(), Some(&0));
        assert_eq!(fed.steps, 1);
    }
}
