//! # stepflow-machines — Reference Processors
//!
//! Small, general-purpose processors written against the
//! [`stepflow_core`] contract. Each conforms to one of the named shapes:
//!
//! - **Enumerator**: [`Emit`] emits a fixed sequence in chunks.
//! - **Transformer**: [`Map`] and [`Filter`].
//! - **Iteratee**: [`Fold`], [`Sum`], [`Collect`], [`Take`], and the
//!   recoverable [`TryFold`].
//!
//! All of them are chunk-insensitive: how the input is split into batches
//! never changes the concatenated output or the final value.

pub mod emit;
pub mod fold;
pub mod take;
pub mod transform;

pub use emit::Emit;
pub use fold::{CheckedSum, Collect, Fold, Sum, TryFold};
pub use take::Take;
pub use transform::{Filter, Map};
