//! # stepflow-compose — The Connect Operator
//!
//! Builds linear pipelines by connecting processors end to end. The result
//! of [`connect`] is itself a processor, so pipelines of any length are
//! built by repeated connection:
//!
//! ```
//! use stepflow_compose::ConnectExt;
//! use stepflow_core::{EndOfInput, StateMachine};
//! use stepflow_machines::{Emit, Map, Sum};
//!
//! let plan = Emit::new(vec![1, 2, 3])
//!     .connect(Map::new(|x: i64| x * 2))
//!     .connect(Sum::<i64>::new());
//! let done = plan.initial().apply_eoi(EndOfInput);
//! assert_eq!(done.value(), Some(&12));
//! ```
//!
//! Connection is associative: `(a · b) · c` and `a · (b · c)` produce the
//! same output, overflow, final value and issues for chunk-insensitive
//! processors.

pub mod connect;

pub use connect::{connect, ConnectExt, Connected};
