//! Lazy sequences and the operators over them
//!
//! A [`LazySeq`] is a boxed, single-pass stream of `Result<T, E>`. Every
//! operator in this module wraps the previous sequence in a new one and does
//! nothing until the outermost sequence is polled; each poll pulls at most one
//! element through the chain. `Err` items pass through stages untouched and
//! terminal operations stop at the first one.

use async_stream::stream;
use futures_util::pin_mut;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::StreamError;
use crate::stage::{Folder, Mapper, Predicate, StageFn};
use crate::stream_configuration::BufferConfig;
use crate::stream_performance_metrics::StreamMetrics;

/// A boxed, heap-allocated, single-pass sequence of results
pub type LazySeq<T, E> = BoxStream<'static, Result<T, E>>;

// ================================
// Producers
// ================================

/// A sequence that completes immediately
pub fn empty<T, E>() -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    stream::empty().boxed()
}

/// Wrap a finite in-memory iterable
pub fn from_iter<I, T, E>(iter: I) -> LazySeq<T, E>
where
    I: IntoIterator<Item = T> + Send + 'static,
    <I as IntoIterator>::IntoIter: Send,
    T: Send + 'static,
    E: Send + 'static,
{
    stream::iter(iter.into_iter().map(Ok)).boxed()
}

/// Wrap an iterable whose iteration can itself fail
pub fn from_results<I, T, E>(iter: I) -> LazySeq<T, E>
where
    I: IntoIterator<Item = Result<T, E>> + Send + 'static,
    <I as IntoIterator>::IntoIter: Send,
    T: Send + 'static,
    E: Send + 'static,
{
    stream::iter(iter).boxed()
}

/// Unbounded sequence `seed, f(seed), f(f(seed)), ...`
///
/// `next_fn` runs only when the element after the current one is pulled, so a
/// consumer that takes `n` elements causes `n - 1` applications. An error from
/// `next_fn` is emitted once and ends the sequence.
pub fn iterate<T, E>(seed: T, mut next_fn: Mapper<T, T, E>) -> LazySeq<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    stream! {
        let mut current = seed;
        loop {
            yield Ok(current.clone());
            match next_fn.invoke(current).resolve().await {
                Ok(next) => current = next,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
    .boxed()
}

/// Drain `first` completely, then `second`
pub fn concat<T, E>(first: LazySeq<T, E>, second: LazySeq<T, E>) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(first);
        while let Some(item) = first.next().await {
            yield item;
        }
        pin_mut!(second);
        while let Some(item) = second.next().await {
            yield item;
        }
    }
    .boxed()
}

// ================================
// Operator stages
// ================================

pub fn map<T, U, E>(s: LazySeq<T, E>, mut f: Mapper<T, U, E>) -> LazySeq<U, E>
where
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        while let Some(item) = s.next().await {
            match item {
                Ok(value) => yield f.invoke(value).resolve().await,
                Err(e) => yield Err(e),
            }
        }
    }
    .boxed()
}

pub fn filter<T, E>(s: LazySeq<T, E>, mut predicate: Predicate<T, E>) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        while let Some(item) = s.next().await {
            match item {
                Ok(value) => match predicate.test(&value).resolve().await {
                    Ok(true) => yield Ok(value),
                    Ok(false) => {}
                    Err(e) => yield Err(e),
                },
                Err(e) => yield Err(e),
            }
        }
    }
    .boxed()
}

/// Keep the first occurrence of every value, tracked in a hash set
///
/// The set lives inside the sequence and is never shared, so it is unlocked.
/// `T`'s `Hash` must agree with its `Eq`; a type that breaks that contract gets
/// unspecified (but memory-safe) deduplication, as with `HashSet` itself.
pub fn distinct<T, E>(s: LazySeq<T, E>) -> LazySeq<T, E>
where
    T: Eq + Hash + Clone + Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        let mut seen = HashSet::new();
        while let Some(item) = s.next().await {
            match item {
                Ok(value) => {
                    if seen.insert(value.clone()) {
                        yield Ok(value);
                    }
                }
                Err(e) => yield Err(e),
            }
        }
    }
    .boxed()
}

/// Equality-only deduplication for element types without a hash
///
/// Every element is compared with all values kept so far.
pub fn distinct_by_eq<T, E>(s: LazySeq<T, E>) -> LazySeq<T, E>
where
    T: PartialEq + Clone + Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        let mut seen: Vec<T> = Vec::new();
        while let Some(item) = s.next().await {
            match item {
                Ok(value) => {
                    if !seen.contains(&value) {
                        seen.push(value.clone());
                        yield Ok(value);
                    }
                }
                Err(e) => yield Err(e),
            }
        }
    }
    .boxed()
}

/// First `n` items, pulling at most `n` items from upstream
pub fn limit<T, E>(s: LazySeq<T, E>, n: usize) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    if n == 0 {
        return empty();
    }

    stream! {
        pin_mut!(s);
        let mut remaining = n;
        while let Some(item) = s.next().await {
            let failed = item.is_err();
            remaining -= 1;
            yield item;
            if failed || remaining == 0 {
                break;
            }
        }
    }
    .boxed()
}

/// Drop the first `n` elements
pub fn skip<T, E>(s: LazySeq<T, E>, n: usize) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        let mut to_skip = n;
        while let Some(item) = s.next().await {
            match item {
                Ok(_) if to_skip > 0 => to_skip -= 1,
                other => yield other,
            }
        }
    }
    .boxed()
}

/// Replace each element with the sequence `f` builds for it, in source order
pub fn flat_map<T, U, E>(s: LazySeq<T, E>, mut f: Mapper<T, LazySeq<U, E>, E>) -> LazySeq<U, E>
where
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        while let Some(item) = s.next().await {
            match item {
                Ok(value) => match f.invoke(value).resolve().await {
                    Ok(inner) => {
                        pin_mut!(inner);
                        while let Some(sub_item) = inner.next().await {
                            yield sub_item;
                        }
                    }
                    Err(e) => yield Err(e),
                },
                Err(e) => yield Err(e),
            }
        }
    }
    .boxed()
}

/// Observe each element as it passes
pub fn peek<T, E, F>(s: LazySeq<T, E>, mut f: F) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T) + Send + 'static,
{
    stream! {
        pin_mut!(s);
        while let Some(item) = s.next().await {
            if let Ok(value) = &item {
                f(value);
            }
            yield item;
        }
    }
    .boxed()
}

/// Buffer the whole upstream on first pull, then emit it in `cmp` order
///
/// The sort is stable. An upstream error is emitted instead of any element.
pub fn sorted_by<T, E, F>(s: LazySeq<T, E>, mut cmp: F) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T, &T) -> Ordering + Send + 'static,
{
    stream! {
        pin_mut!(s);
        let mut buf = Vec::new();
        let mut failure = None;
        while let Some(item) = s.next().await {
            match item {
                Ok(value) => buf.push(value),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        match failure {
            Some(e) => yield Err(e),
            None => {
                buf.sort_by(|a, b| cmp(a, b));
                for value in buf {
                    yield Ok(value);
                }
            }
        }
    }
    .boxed()
}

/// Log every pull at trace level under `name`
pub fn traced<T, E>(s: LazySeq<T, E>, name: String) -> LazySeq<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(s);
        let mut pulls = 0usize;
        while let Some(item) = s.next().await {
            log::trace!(
                "[{}] pulled element #{} ({})",
                name,
                pulls,
                if item.is_ok() { "ok" } else { "error" }
            );
            pulls += 1;
            yield item;
        }
        log::trace!("[{}] sequence exhausted after {} pulls", name, pulls);
    }
    .boxed()
}

/// Record pull metrics at this point of the pipeline
pub fn with_metrics<T, E>(s: LazySeq<T, E>, name: String) -> (LazySeq<T, E>, Arc<Mutex<StreamMetrics>>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let metrics = Arc::new(Mutex::new(StreamMetrics::new().with_name(name)));
    let metrics_clone = Arc::clone(&metrics);

    let monitored = stream! {
        pin_mut!(s);
        while let Some(item) = s.next().await {
            {
                let mut m = metrics_clone.lock().await;
                if item.is_ok() {
                    m.record_item();
                } else {
                    m.record_error();
                }
            }
            yield item;
        }

        {
            let mut m = metrics_clone.lock().await;
            m.finalize();
        }
    }
    .boxed();

    (monitored, metrics)
}

// ================================
// Terminal operations
// ================================

/// Drain into a vector, honouring the buffer bounds
pub async fn collect_vec<T, E>(mut s: LazySeq<T, E>, config: &BufferConfig) -> Result<Vec<T>, E>
where
    T: Send + 'static,
    E: From<StreamError> + Send + 'static,
{
    let initial = match config.max_items {
        Some(max) => config.initial_capacity.min(max),
        None => config.initial_capacity,
    };
    let mut out = Vec::with_capacity(initial);

    while let Some(item) = s.next().await {
        let value = item?;
        if let Some(limit) = config.max_items {
            if out.len() >= limit {
                log::warn!("Collect aborted: more than {} items", limit);
                return Err(StreamError::CapacityExceeded { limit }.into());
            }
        }
        out.push(value);
    }
    Ok(out)
}

/// Sequential left fold; returns `identity` for an empty sequence
pub async fn fold<T, A, E>(mut s: LazySeq<T, E>, identity: A, mut f: Folder<A, T, E>) -> Result<A, E>
where
    T: Send + 'static,
    A: Send + 'static,
    E: Send + 'static,
{
    let mut acc = identity;
    while let Some(item) = s.next().await {
        acc = f.invoke((acc, item?)).resolve().await?;
    }
    Ok(acc)
}

/// `true` as soon as one element satisfies `predicate`
pub async fn any_match<T, E>(mut s: LazySeq<T, E>, mut predicate: Predicate<T, E>) -> Result<bool, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    while let Some(item) = s.next().await {
        let value = item?;
        if predicate.test(&value).resolve().await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `false` as soon as one element fails `predicate`
pub async fn all_match<T, E>(mut s: LazySeq<T, E>, mut predicate: Predicate<T, E>) -> Result<bool, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    while let Some(item) = s.next().await {
        let value = item?;
        if !predicate.test(&value).resolve().await? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// First element, pulling exactly one item from the chain
pub async fn find_first<T, E>(mut s: LazySeq<T, E>) -> Result<Option<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    s.next().await.transpose()
}

pub async fn count<T, E>(mut s: LazySeq<T, E>) -> Result<usize, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let mut n = 0;
    while let Some(item) = s.next().await {
        item?;
        n += 1;
    }
    Ok(n)
}

/// Element for which `keep_current(current, candidate)` never gave way
async fn select_by<T, E, F>(mut s: LazySeq<T, E>, mut keep_current: F) -> Result<Option<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T, &T) -> bool + Send,
{
    let mut best: Option<T> = None;
    while let Some(item) = s.next().await {
        let value = item?;
        best = match best {
            Some(current) if keep_current(&current, &value) => Some(current),
            _ => Some(value),
        };
    }
    Ok(best)
}

/// Smallest element; the first one wins ties
pub async fn min_by<T, E, F>(s: LazySeq<T, E>, mut cmp: F) -> Result<Option<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T, &T) -> Ordering + Send,
{
    select_by(s, move |current, candidate| cmp(current, candidate) != Ordering::Greater).await
}

/// Largest element; the last one wins ties
pub async fn max_by<T, E, F>(s: LazySeq<T, E>, mut cmp: F) -> Result<Option<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T, &T) -> Ordering + Send,
{
    select_by(s, move |current, candidate| cmp(current, candidate) == Ordering::Greater).await
}

pub async fn for_each<T, E>(mut s: LazySeq<T, E>, mut f: StageFn<T, Result<(), E>>) -> Result<(), E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    while let Some(item) = s.next().await {
        f.invoke(item?).resolve().await?;
    }
    Ok(())
}
