//! The chainable stream type
//!
//! [`LazyStream`] owns one lazy sequence plus the configuration that applies
//! to it. Chaining methods consume the stream and return a new one wrapping
//! the old sequence; terminal methods consume it and drive the sequence. A
//! stream can therefore be drained at most once, and the compiler rejects a
//! second terminal call on the same value.
//!
//! Every stage function may be plain or suspending. The `*_async` variants
//! accept functions returning futures, the `try_*` variants accept functions
//! that fail, and the `*_stage` variants take a prebuilt [`StageFn`] or
//! [`Predicate`]; all of them feed the same operator.
//!
//! # Examples
//! ```
//! use lazy_stream::LazyStream;
//!
//! # async fn example() {
//! let evens = LazyStream::iterate(1, |x| x + 1)
//!     .filter(|x| x % 2 == 0)
//!     .map_async(|x| async move { x * 10 })
//!     .limit(3)
//!     .to_list()
//!     .await
//!     .unwrap();
//! assert_eq!(evens, vec![20, 40, 60]);
//! # }
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::collector::Collector;
use crate::error::StreamError;
use crate::generator::Generator;
use crate::lazy_seq::{self, LazySeq};
use crate::pipe::Pipe;
use crate::stage::{Folder, Mapper, Predicate, StageFn};
use crate::stream_configuration::StreamConfig;
use crate::stream_performance_metrics::StreamMetrics;

/// A lazy, single-pass, chainable stream of `T`
pub struct LazyStream<T, E = StreamError> {
    seq: LazySeq<T, E>,
    config: Arc<StreamConfig>,
}

// ================================
// Infallible sources
// ================================

impl<T> LazyStream<T, StreamError>
where
    T: Send + 'static,
{
    /// Stream over a finite in-memory iterable
    pub fn of<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Send + 'static,
        <I as IntoIterator>::IntoIter: Send,
    {
        Self::from_seq(lazy_seq::from_iter(iterable))
    }

    pub fn empty() -> Self {
        Self::from_seq(lazy_seq::empty())
    }

    /// Unbounded stream `seed, f(seed), f(f(seed)), ...`
    pub fn iterate<F>(seed: T, mut next_fn: F) -> Self
    where
        T: Clone,
        F: FnMut(T) -> T + Send + 'static,
    {
        Self::iterate_stage(seed, StageFn::plain(move |x| Ok(next_fn(x))))
    }

    /// Like [`LazyStream::iterate`], awaiting `next_fn` between elements
    pub fn iterate_async<F, Fut>(seed: T, mut next_fn: F) -> Self
    where
        T: Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::iterate_stage(
            seed,
            StageFn::suspending(move |x| {
                let fut = next_fn(x);
                async move { Ok(fut.await) }
            }),
        )
    }
}

impl<T, E> LazyStream<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    // ================================
    // Sources and composition
    // ================================

    /// Adopt a hand-built sequence
    pub fn from_seq(seq: LazySeq<T, E>) -> Self {
        Self {
            seq,
            config: Arc::new(StreamConfig::default()),
        }
    }

    /// Stream over an iterable whose items may already be errors
    pub fn from_results<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = Result<T, E>> + Send + 'static,
        <I as IntoIterator>::IntoIter: Send,
    {
        Self::from_seq(lazy_seq::from_results(iterable))
    }

    /// Unbounded iteration whose step may fail; the stream ends after the error
    pub fn try_iterate<F>(seed: T, next_fn: F) -> Self
    where
        T: Clone,
        F: FnMut(T) -> Result<T, E> + Send + 'static,
    {
        Self::iterate_stage(seed, StageFn::plain(next_fn))
    }

    pub fn iterate_stage(seed: T, next_fn: Mapper<T, T, E>) -> Self
    where
        T: Clone,
    {
        Self::from_seq(lazy_seq::iterate(seed, next_fn))
    }

    /// All of `first`, then all of `second`; keeps `first`'s configuration
    pub fn concat(first: Self, second: Self) -> Self {
        let config = first.config;
        Self {
            seq: lazy_seq::concat(first.seq, second.seq),
            config,
        }
    }

    /// Attach a configuration; streams derived from this one inherit it
    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Convert the error type of every error this stream delivers
    pub fn err_into<E2>(self) -> LazyStream<T, E2>
    where
        E2: From<E> + Send + 'static,
    {
        use futures_util::stream::StreamExt;
        LazyStream {
            seq: self.seq.map(|item| item.map_err(E2::from)).boxed(),
            config: self.config,
        }
    }

    /// Give up the configuration and take the raw sequence
    pub fn into_seq(self) -> LazySeq<T, E> {
        self.seq
    }

    fn derive<U, F>(self, f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnOnce(LazySeq<T, E>) -> LazySeq<U, E>,
    {
        LazyStream {
            seq: f(self.seq),
            config: self.config,
        }
    }

    /// Sequence and config for a terminal operation, traced if configured
    fn drive(self) -> (LazySeq<T, E>, Arc<StreamConfig>) {
        let seq = if self.config.trace_pulls {
            lazy_seq::traced(self.seq, self.config.name.clone())
        } else {
            self.seq
        };
        (seq, self.config)
    }

    // ================================
    // Operator stages
    // ================================

    pub fn map<U, F>(self, mut f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        self.map_stage(StageFn::plain(move |x| Ok(f(x))))
    }

    pub fn map_async<U, F, Fut>(self, mut f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.map_stage(StageFn::suspending(move |x| {
            let fut = f(x);
            async move { Ok(fut.await) }
        }))
    }

    pub fn try_map<U, F>(self, f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnMut(T) -> Result<U, E> + Send + 'static,
    {
        self.map_stage(StageFn::plain(f))
    }

    pub fn try_map_async<U, F, Fut>(self, f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        self.map_stage(StageFn::suspending(f))
    }

    pub fn map_stage<U>(self, stage: Mapper<T, U, E>) -> LazyStream<U, E>
    where
        U: Send + 'static,
    {
        self.derive(|seq| lazy_seq::map(seq, stage))
    }

    pub fn filter<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        self.filter_stage(Predicate::plain(move |x: &T| Ok(predicate(x))))
    }

    /// Filter with a predicate returning a future
    ///
    /// The future must not borrow the element; copy out what it needs first.
    pub fn filter_async<F, Fut>(self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.filter_stage(Predicate::suspending(move |x: &T| {
            let fut = predicate(x);
            async move { Ok(fut.await) }
        }))
    }

    pub fn try_filter<F>(self, predicate: F) -> Self
    where
        F: FnMut(&T) -> Result<bool, E> + Send + 'static,
    {
        self.filter_stage(Predicate::plain(predicate))
    }

    pub fn filter_stage(self, predicate: Predicate<T, E>) -> Self {
        self.derive(|seq| lazy_seq::filter(seq, predicate))
    }

    /// Drop values equal to one already emitted, keeping first occurrences
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.derive(lazy_seq::distinct)
    }

    /// [`LazyStream::distinct`] for types that only implement `PartialEq`
    pub fn distinct_by_eq(self) -> Self
    where
        T: PartialEq + Clone,
    {
        self.derive(lazy_seq::distinct_by_eq)
    }

    /// At most `n` elements; `limit(0)` never pulls from upstream
    pub fn limit(self, n: usize) -> Self {
        self.derive(|seq| lazy_seq::limit(seq, n))
    }

    pub fn skip(self, n: usize) -> Self {
        self.derive(|seq| lazy_seq::skip(seq, n))
    }

    /// Replace each element with a sub-stream; the sub-stream's own
    /// configuration is ignored
    pub fn flat_map<U, F>(self, mut f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnMut(T) -> LazyStream<U, E> + Send + 'static,
    {
        self.flat_map_stage(StageFn::plain(move |x| Ok(f(x).seq)))
    }

    pub fn flat_map_async<U, F, Fut>(self, mut f: F) -> LazyStream<U, E>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = LazyStream<U, E>> + Send + 'static,
    {
        self.flat_map_stage(StageFn::suspending(move |x| {
            let fut = f(x);
            async move { Ok(fut.await.seq) }
        }))
    }

    pub fn flat_map_stage<U>(self, stage: Mapper<T, LazySeq<U, E>, E>) -> LazyStream<U, E>
    where
        U: Send + 'static,
    {
        self.derive(|seq| lazy_seq::flat_map(seq, stage))
    }

    /// Run `f` on every element as it passes, without changing it
    pub fn peek<F>(self, f: F) -> Self
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.derive(|seq| lazy_seq::peek(seq, f))
    }

    /// Natural order; drains upstream on the first pull
    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.sorted_by(T::cmp)
    }

    pub fn sorted_by<F>(self, cmp: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering + Send + 'static,
    {
        self.derive(|seq| lazy_seq::sorted_by(seq, cmp))
    }

    /// Apply a reusable pipeline segment
    pub fn through<U>(self, pipe: &Pipe<T, U, E>) -> LazyStream<U, E>
    where
        U: Send + 'static,
    {
        self.derive(|seq| pipe.apply(seq))
    }

    /// Count what is pulled through this point of the pipeline
    pub fn with_metrics(self, name: impl Into<String>) -> (Self, Arc<Mutex<StreamMetrics>>) {
        let config = self.config;
        let (seq, metrics) = lazy_seq::with_metrics(self.seq, name.into());
        (Self { seq, config }, metrics)
    }

    // ================================
    // Terminal operations
    // ================================

    /// Drain everything into a `Vec`
    ///
    /// Never returns for an unbounded source without an upstream `limit`,
    /// unless the configuration sets `max_items`.
    pub async fn to_list(self) -> Result<Vec<T>, E>
    where
        E: From<StreamError>,
    {
        let (seq, config) = self.drive();
        let out = lazy_seq::collect_vec(seq, &config.collect).await?;
        log::debug!("[{}] to_list collected {} elements", config.name, out.len());
        Ok(out)
    }

    /// Hand back a pull handle without consuming anything
    pub fn to_generator(self) -> Generator<T, E> {
        let (seq, config) = self.drive();
        log::debug!("[{}] to_generator", config.name);
        Generator::new(seq, config.name.clone())
    }

    pub async fn collect<C>(self, collector: C) -> Result<C::Output, E>
    where
        C: Collector<T, E>,
    {
        let (seq, config) = self.drive();
        log::debug!("[{}] collect", config.name);
        collector.collect(seq, &config).await
    }

    /// Left fold in source order; `identity` for an empty stream
    pub async fn reduce<A, F>(self, identity: A, mut f: F) -> Result<A, E>
    where
        A: Send + 'static,
        F: FnMut(A, T) -> A + Send + 'static,
    {
        self.reduce_stage(identity, StageFn::plain(move |(acc, x)| Ok(f(acc, x))))
            .await
    }

    pub async fn reduce_async<A, F, Fut>(self, identity: A, mut f: F) -> Result<A, E>
    where
        A: Send + 'static,
        F: FnMut(A, T) -> Fut + Send + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        self.reduce_stage(
            identity,
            StageFn::suspending(move |(acc, x)| {
                let fut = f(acc, x);
                async move { Ok(fut.await) }
            }),
        )
        .await
    }

    pub async fn try_reduce<A, F>(self, identity: A, mut f: F) -> Result<A, E>
    where
        A: Send + 'static,
        F: FnMut(A, T) -> Result<A, E> + Send + 'static,
    {
        self.reduce_stage(identity, StageFn::plain(move |(acc, x)| f(acc, x)))
            .await
    }

    pub async fn reduce_stage<A>(self, identity: A, f: Folder<A, T, E>) -> Result<A, E>
    where
        A: Send + 'static,
    {
        let (seq, config) = self.drive();
        let result = lazy_seq::fold(seq, identity, f).await;
        log::debug!("[{}] reduce finished (ok: {})", config.name, result.is_ok());
        result
    }

    /// `true` on the first element satisfying `predicate`; `false` when empty
    pub async fn any_match<F>(self, mut predicate: F) -> Result<bool, E>
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        self.any_match_stage(Predicate::plain(move |x: &T| Ok(predicate(x))))
            .await
    }

    pub async fn any_match_async<F, Fut>(self, mut predicate: F) -> Result<bool, E>
    where
        F: FnMut(&T) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.any_match_stage(Predicate::suspending(move |x: &T| {
            let fut = predicate(x);
            async move { Ok(fut.await) }
        }))
        .await
    }

    pub async fn any_match_stage(self, predicate: Predicate<T, E>) -> Result<bool, E> {
        let (seq, config) = self.drive();
        let result = lazy_seq::any_match(seq, predicate).await;
        log::debug!("[{}] any_match -> {:?}", config.name, result.as_ref().ok());
        result
    }

    /// `false` on the first element failing `predicate`; `true` when empty
    pub async fn all_match<F>(self, mut predicate: F) -> Result<bool, E>
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        self.all_match_stage(Predicate::plain(move |x: &T| Ok(predicate(x))))
            .await
    }

    pub async fn all_match_async<F, Fut>(self, mut predicate: F) -> Result<bool, E>
    where
        F: FnMut(&T) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.all_match_stage(Predicate::suspending(move |x: &T| {
            let fut = predicate(x);
            async move { Ok(fut.await) }
        }))
        .await
    }

    pub async fn all_match_stage(self, predicate: Predicate<T, E>) -> Result<bool, E> {
        let (seq, config) = self.drive();
        let result = lazy_seq::all_match(seq, predicate).await;
        log::debug!("[{}] all_match -> {:?}", config.name, result.as_ref().ok());
        result
    }

    /// First element that makes it through the chain, or `None`
    pub async fn find_any(self) -> Result<Option<T>, E> {
        let (seq, config) = self.drive();
        let result = lazy_seq::find_first(seq).await;
        log::debug!(
            "[{}] find_any found: {:?}",
            config.name,
            result.as_ref().map(|found| found.is_some()).ok()
        );
        result
    }

    pub async fn count(self) -> Result<usize, E> {
        let (seq, config) = self.drive();
        let result = lazy_seq::count(seq).await;
        log::debug!("[{}] count -> {:?}", config.name, result.as_ref().ok());
        result
    }

    pub async fn min(self) -> Result<Option<T>, E>
    where
        T: Ord,
    {
        self.min_by(T::cmp).await
    }

    pub async fn max(self) -> Result<Option<T>, E>
    where
        T: Ord,
    {
        self.max_by(T::cmp).await
    }

    pub async fn min_by<F>(self, cmp: F) -> Result<Option<T>, E>
    where
        F: FnMut(&T, &T) -> Ordering + Send,
    {
        let (seq, _config) = self.drive();
        lazy_seq::min_by(seq, cmp).await
    }

    pub async fn max_by<F>(self, cmp: F) -> Result<Option<T>, E>
    where
        F: FnMut(&T, &T) -> Ordering + Send,
    {
        let (seq, _config) = self.drive();
        lazy_seq::max_by(seq, cmp).await
    }

    pub async fn for_each<F>(self, mut f: F) -> Result<(), E>
    where
        F: FnMut(T) + Send + 'static,
    {
        let (seq, config) = self.drive();
        log::debug!("[{}] for_each", config.name);
        lazy_seq::for_each(
            seq,
            StageFn::plain(move |x| {
                f(x);
                Ok(())
            }),
        )
        .await
    }

    pub async fn for_each_async<F, Fut>(self, mut f: F) -> Result<(), E>
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (seq, config) = self.drive();
        log::debug!("[{}] for_each_async", config.name);
        lazy_seq::for_each(
            seq,
            StageFn::suspending(move |x| {
                let fut = f(x);
                async move {
                    fut.await;
                    Ok(())
                }
            }),
        )
        .await
    }
}

impl<T, E> fmt::Debug for LazyStream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyStream")
            .field("name", &self.config.name)
            .finish_non_exhaustive()
    }
}
