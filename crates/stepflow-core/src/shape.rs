//! # Processor Shapes
//!
//! Named specializations of [`StateMachine`] for readability. They add no
//! behaviour: each is a marker trait with a blanket implementation, so any
//! processor with matching type parameters is automatically usable under
//! the shape's name.
//!
//! | Shape | I | O | A |
//! |-------|---|---|---|
//! | `Enumerator<O>` | `()` | payload | `()` |
//! | `Iteratee<I, A>` | payload | `()` | result |
//! | `Transformer<I, O>` | payload | payload | `()` |
//! | `Plan<A>` | `()` | `()` | result |

use crate::machine::StateMachine;

/// Producer. Stepping with unit input yields output chunks until done.
pub trait Enumerator<O>: StateMachine<(), O, ()> {}

impl<O, M> Enumerator<O> for M where M: StateMachine<(), O, ()> + ?Sized {}

/// Consumer. Fed chunks, yields a final value or halts.
pub trait Iteratee<I, A>: StateMachine<I, (), A> {}

impl<I, A, M> Iteratee<I, A> for M where M: StateMachine<I, (), A> + ?Sized {}

/// Pure transform from input chunks to output chunks.
pub trait Transformer<I, O>: StateMachine<I, O, ()> {}

impl<I, O, M> Transformer<I, O> for M where M: StateMachine<I, O, ()> + ?Sized {}

/// Self-contained pipeline with no external input or output, ready to run.
pub trait Plan<A>: StateMachine<(), (), A> {}

impl<A, M> Plan<A> for M where M: StateMachine<(), (), A> + ?Sized {}
