//! # Folding Iteratees
//!
//! Consumers that reduce their input to a single value.
//!
//! - [`Fold`] — infallible left fold.
//! - [`Sum`] / [`Collect`] — common folds with nameable types.
//! - [`TryFold`] — fallible fold that halts mid-stream on the first
//!   rejected item, with a recovery action that skips it.

use std::marker::PhantomData;
use std::rc::Rc;

use stepflow_core::{
    Continuation, DoneTransition, EndOfInput, Halted, Issue, StateMachine, Transition,
};

// ─── Fold ────────────────────────────────────────────────────────────

/// Left fold from an initial accumulator.
pub struct Fold<F, A> {
    init: A,
    f: Rc<F>,
}

impl<F, A> Fold<F, A> {
    /// Fold with `f`, starting from `init`.
    pub fn new(init: A, f: F) -> Self {
        Self {
            init,
            f: Rc::new(f),
        }
    }
}

impl<I, A, F> StateMachine<I, (), A> for Fold<F, A>
where
    F: Fn(A, I) -> A + 'static,
    A: Clone + 'static,
    I: 'static,
{
    fn initial(&self) -> Box<dyn Continuation<I, (), A>> {
        Box::new(FoldState {
            acc: self.init.clone(),
            f: Rc::clone(&self.f),
        })
    }
}

struct FoldState<F, A> {
    acc: A,
    f: Rc<F>,
}

impl<I, A, F> Continuation<I, (), A> for FoldState<F, A>
where
    F: Fn(A, I) -> A + 'static,
    A: 'static,
    I: 'static,
{
    fn apply(self: Box<Self>, items: Vec<I>) -> Transition<I, (), A> {
        let FoldState { acc, f } = *self;
        let acc = items.into_iter().fold(acc, |acc, item| f(acc, item));
        Transition::next(FoldState { acc, f }, Vec::new())
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<I, (), A> {
        DoneTransition::succeed(self.acc, Vec::new(), Vec::new())
    }
}

// ─── Sum ─────────────────────────────────────────────────────────────

/// Addition that reports overflow instead of wrapping or panicking.
pub trait CheckedSum: Sized {
    /// `self + other`, or `None` on overflow.
    fn checked_sum(self, other: Self) -> Option<Self>;
}

macro_rules! impl_checked_sum {
    ($($t:ty),*) => {
        $(
            impl CheckedSum for $t {
                fn checked_sum(self, other: Self) -> Option<Self> {
                    self.checked_add(other)
                }
            }
        )*
    };
}

impl_checked_sum!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Sums every item, starting from `T::default()`.
///
/// Overflow halts the iteratee. The halt is final; its overflow is the
/// item that did not fit followed by the rest of the batch.
pub struct Sum<T>(PhantomData<fn() -> T>);

impl<T> Sum<T> {
    /// A new summing iteratee.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Sum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateMachine<T, (), T> for Sum<T>
where
    T: CheckedSum + Copy + Default + 'static,
{
    fn initial(&self) -> Box<dyn Continuation<T, (), T>> {
        Box::new(SumState { total: T::default() })
    }
}

struct SumState<T> {
    total: T,
}

impl<T> Continuation<T, (), T> for SumState<T>
where
    T: CheckedSum + Copy + Default + 'static,
{
    fn apply(self: Box<Self>, items: Vec<T>) -> Transition<T, (), T> {
        let mut total = self.total;
        for (at, item) in items.iter().enumerate() {
            match total.checked_sum(*item) {
                Some(next) => total = next,
                None => {
                    return Transition::Halt {
                        halted: Halted::new(vec![Issue::new("sum overflow")]),
                        output: Vec::new(),
                        overflow: items[at..].to_vec(),
                    };
                }
            }
        }
        Transition::next(SumState { total }, Vec::new())
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<T, (), T> {
        DoneTransition::succeed(self.total, Vec::new(), Vec::new())
    }
}

// ─── Collect ─────────────────────────────────────────────────────────

/// Collects every item into a `Vec`.
pub struct Collect<T>(PhantomData<fn() -> T>);

impl<T> Collect<T> {
    /// A new collecting iteratee.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Collect<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> StateMachine<T, (), Vec<T>> for Collect<T> {
    fn initial(&self) -> Box<dyn Continuation<T, (), Vec<T>>> {
        Box::new(CollectState { items: Vec::new() })
    }
}

struct CollectState<T> {
    items: Vec<T>,
}

impl<T: 'static> Continuation<T, (), Vec<T>> for CollectState<T> {
    fn apply(mut self: Box<Self>, mut items: Vec<T>) -> Transition<T, (), Vec<T>> {
        self.items.append(&mut items);
        Transition::Continue {
            state: self,
            output: Vec::new(),
        }
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<T, (), Vec<T>> {
        DoneTransition::succeed(self.items, Vec::new(), Vec::new())
    }
}

// ─── TryFold ─────────────────────────────────────────────────────────

/// Fallible left fold.
///
/// When `f` rejects an item the iteratee halts mid-stream. The overflow is
/// the rejected item followed by the rest of the batch. The recovery action
/// skips the rejected item and resumes folding the rest of the batch from
/// the accumulator reached before the rejection.
pub struct TryFold<F, A> {
    init: A,
    f: Rc<F>,
}

impl<F, A> TryFold<F, A> {
    /// Fold with `f`, starting from `init`.
    pub fn new(init: A, f: F) -> Self {
        Self {
            init,
            f: Rc::new(f),
        }
    }
}

impl<I, A, F> StateMachine<I, (), A> for TryFold<F, A>
where
    F: Fn(&A, &I) -> Result<A, Issue> + 'static,
    A: Clone + 'static,
    I: Clone + 'static,
{
    fn initial(&self) -> Box<dyn Continuation<I, (), A>> {
        Box::new(TryFoldState {
            acc: self.init.clone(),
            f: Rc::clone(&self.f),
        })
    }
}

struct TryFoldState<F, A> {
    acc: A,
    f: Rc<F>,
}

impl<I, A, F> Continuation<I, (), A> for TryFoldState<F, A>
where
    F: Fn(&A, &I) -> Result<A, Issue> + 'static,
    A: 'static,
    I: Clone + 'static,
{
    fn apply(self: Box<Self>, items: Vec<I>) -> Transition<I, (), A> {
        let TryFoldState { mut acc, f } = *self;
        let mut items = items.into_iter();
        while let Some(item) = items.next() {
            match f(&acc, &item) {
                Ok(next) => acc = next,
                Err(issue) => {
                    let rest: Vec<I> = items.by_ref().collect();
                    let mut overflow = Vec::with_capacity(rest.len() + 1);
                    overflow.push(item);
                    overflow.extend(rest.iter().cloned());
                    let resume = TryFoldState { acc, f };
                    let halted = Halted::recoverable(vec![issue], move || {
                        Continuation::<I, (), A>::apply(Box::new(resume), rest)
                    });
                    return Transition::Halt {
                        halted,
                        output: Vec::new(),
                        overflow,
                    };
                }
            }
        }
        Transition::next(TryFoldState { acc, f }, Vec::new())
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<I, (), A> {
        DoneTransition::succeed(self.acc, Vec::new(), Vec::new())
    }
}
