//! Stage functions that may or may not suspend
//!
//! Every operator accepts its user function through one of the adapters in
//! this module. A plain function produces its result immediately, a suspending
//! one produces a future. Invoking either yields an [`Eval`], and operators
//! drive every `Eval` through the same `resolve().await`, so no operator needs
//! a separate code path for async callbacks.
//!
//! # Examples
//! ```
//! use lazy_stream::stage::{Eval, StageFn};
//!
//! # async fn example() {
//! let mut double: StageFn<i32, i32> = StageFn::plain(|x| x * 2);
//! let mut slow_double: StageFn<i32, i32> = StageFn::suspending(|x| async move {
//!     tokio::task::yield_now().await;
//!     x * 2
//! });
//!
//! assert!(matches!(double.invoke(2), Eval::Ready(4)));
//! assert!(slow_double.invoke(2).is_suspended());
//! assert_eq!(slow_double.invoke(2).resolve().await, 4);
//! # }
//! ```

use futures::future::BoxFuture;
use futures_util::FutureExt;
use std::fmt;
use std::future::Future;

/// Outcome of invoking a stage function
pub enum Eval<R> {
    /// The function returned a value directly
    Ready(R),
    /// The function returned a future that must be awaited
    Suspended(BoxFuture<'static, R>),
}

impl<R> Eval<R> {
    pub fn is_suspended(&self) -> bool {
        matches!(self, Eval::Suspended(_))
    }

    /// Await the result if the stage suspended, otherwise hand it back as is
    pub async fn resolve(self) -> R {
        match self {
            Eval::Ready(value) => value,
            Eval::Suspended(fut) => fut.await,
        }
    }
}

impl<R> fmt::Debug for Eval<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eval::Ready(_) => f.write_str("Eval::Ready"),
            Eval::Suspended(_) => f.write_str("Eval::Suspended"),
        }
    }
}

/// A single-argument stage function taking its argument by value
pub enum StageFn<A, R> {
    Plain(Box<dyn FnMut(A) -> R + Send>),
    Suspending(Box<dyn FnMut(A) -> BoxFuture<'static, R> + Send>),
}

impl<A, R> StageFn<A, R>
where
    A: 'static,
    R: 'static,
{
    /// Wrap a function that computes its result without suspending
    pub fn plain<F>(f: F) -> Self
    where
        F: FnMut(A) -> R + Send + 'static,
    {
        StageFn::Plain(Box::new(f))
    }

    /// Wrap a function returning a future
    pub fn suspending<F, Fut>(mut f: F) -> Self
    where
        F: FnMut(A) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        StageFn::Suspending(Box::new(move |arg| f(arg).boxed()))
    }

    pub fn invoke(&mut self, arg: A) -> Eval<R> {
        match self {
            StageFn::Plain(f) => Eval::Ready(f(arg)),
            StageFn::Suspending(f) => Eval::Suspended(f(arg)),
        }
    }

    pub fn is_suspending(&self) -> bool {
        matches!(self, StageFn::Suspending(_))
    }
}

impl<A, R> fmt::Debug for StageFn<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageFn::Plain(_) => f.write_str("StageFn::Plain"),
            StageFn::Suspending(_) => f.write_str("StageFn::Suspending"),
        }
    }
}

/// Element transformation used by `map`, `flat_map` and `iterate`
pub type Mapper<T, U, E> = StageFn<T, Result<U, E>>;

/// Left-fold step used by `reduce`: `(accumulator, element) -> accumulator`
pub type Folder<A, T, E> = StageFn<(A, T), Result<A, E>>;

/// A test applied to a borrowed element
///
/// Suspending predicates must return a `'static` future, so they copy out of
/// the element whatever they need before the first await.
pub enum Predicate<T, E> {
    Plain(Box<dyn FnMut(&T) -> Result<bool, E> + Send>),
    Suspending(Box<dyn FnMut(&T) -> BoxFuture<'static, Result<bool, E>> + Send>),
}

impl<T, E> Predicate<T, E>
where
    T: 'static,
    E: 'static,
{
    pub fn plain<F>(f: F) -> Self
    where
        F: FnMut(&T) -> Result<bool, E> + Send + 'static,
    {
        Predicate::Plain(Box::new(f))
    }

    pub fn suspending<F, Fut>(mut f: F) -> Self
    where
        F: FnMut(&T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
    {
        Predicate::Suspending(Box::new(move |item: &T| f(item).boxed()))
    }

    pub fn test(&mut self, item: &T) -> Eval<Result<bool, E>> {
        match self {
            Predicate::Plain(f) => Eval::Ready(f(item)),
            Predicate::Suspending(f) => Eval::Suspended(f(item)),
        }
    }

    pub fn is_suspending(&self) -> bool {
        matches!(self, Predicate::Suspending(_))
    }
}

impl<T, E> fmt::Debug for Predicate<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Plain(_) => f.write_str("Predicate::Plain"),
            Predicate::Suspending(_) => f.write_str("Predicate::Suspending"),
        }
    }
}
