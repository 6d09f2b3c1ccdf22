//! # stepflow-core — Stream Processor Algebra
//!
//! Defines the algebra every stepflow processor is written against. A
//! processor is an immutable value exposing an initial [`Continuation`];
//! applying input to a continuation yields a [`Transition`] carrying the
//! next [`State`], the output of the step and, for terminal results, the
//! unconsumed `overflow`.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged unions everywhere.** `State`, `Done`, `Transition` and
//!    `DoneTransition` are enums. Every consumer matches exhaustively, so a
//!    `Halted` or `Succeed` case can never be silently dropped.
//!
//! 2. **Step and finalization are separate.** `apply(items)` may ask for
//!    more; `apply_eoi(EndOfInput)` must return a `DoneTransition`. An empty
//!    batch is a legitimate batch, not a sentinel.
//!
//! 3. **Linear ownership.** Continuations are consumed by the step that
//!    advances them (`self: Box<Self>`). A superseded state cannot be
//!    stepped again, and `EndOfInput` reaches a continuation at most once.
//!
//! 4. **Problems are data.** Processors never panic on input. They return
//!    a `Halted` state holding [`Issue`]s and, optionally, a recovery action.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `stepflow-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod continuation;
pub mod error;
pub mod feed;
pub mod issue;
pub mod machine;
pub mod shape;
pub mod state;
pub mod transition;

// Re-export primary types for ergonomic imports.
pub use continuation::{Continuation, EndOfInput};
pub use error::StepflowError;
pub use feed::{feed, Fed};
pub use issue::Issue;
pub use machine::{BoxMachine, StateMachine};
pub use shape::{Enumerator, Iteratee, Plan, Transformer};
pub use state::{Done, Halted, Recover, State};
pub use transition::{DoneTransition, Transition};
