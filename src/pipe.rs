use crate::error::StreamError;
use crate::lazy_seq::{self, LazySeq};
use crate::stage::{Predicate, StageFn};
use std::future::Future;
use std::sync::Arc;

/// A Pipe is a reusable pipeline segment from one element type to another.
/// It's a function from LazySeq[I] to LazySeq[O], applied with `LazyStream::through`.
pub struct Pipe<I, O, E = StreamError> {
    f: Arc<dyn Fn(LazySeq<I, E>) -> LazySeq<O, E> + Send + Sync + 'static>,
}

impl<I, O, E> Clone for Pipe<I, O, E> {
    fn clone(&self) -> Self {
        Pipe {
            f: Arc::clone(&self.f),
        }
    }
}

impl<I, O, E> Pipe<I, O, E> {
    /// Create a new pipe from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(LazySeq<I, E>) -> LazySeq<O, E> + Send + Sync + 'static,
    {
        Pipe { f: Arc::new(f) }
    }

    /// Apply this pipe to a sequence
    pub fn apply(&self, input: LazySeq<I, E>) -> LazySeq<O, E> {
        (self.f)(input)
    }
}

/// Create a pipe that applies the given function to each element
pub fn map<I, O, E, F>(f: F) -> Pipe<I, O, E>
where
    F: Fn(I) -> O + Send + Sync + Clone + 'static,
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    Pipe::new(move |input| {
        let f = f.clone();
        lazy_seq::map(input, StageFn::plain(move |i| Ok(f(i))))
    })
}

/// Create a pipe that applies the given async function to each element
pub fn map_async<I, O, E, F, Fut>(f: F) -> Pipe<I, O, E>
where
    F: Fn(I) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = O> + Send + 'static,
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    Pipe::new(move |input| {
        let f = f.clone();
        lazy_seq::map(
            input,
            StageFn::suspending(move |i| {
                let fut = f(i);
                async move { Ok(fut.await) }
            }),
        )
    })
}

/// Create a pipe that filters elements based on the predicate
pub fn filter<I, E, F>(predicate: F) -> Pipe<I, I, E>
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
    E: Send + 'static,
{
    Pipe::new(move |input| {
        let predicate = predicate.clone();
        lazy_seq::filter(input, Predicate::plain(move |i: &I| Ok(predicate(i))))
    })
}

/// Create a pipe that keeps at most `n` elements
pub fn limit<I, E>(n: usize) -> Pipe<I, I, E>
where
    I: Send + 'static,
    E: Send + 'static,
{
    Pipe::new(move |input| lazy_seq::limit(input, n))
}

/// Compose two pipes together
pub fn compose<I, M, O, E>(p1: Pipe<I, M, E>, p2: Pipe<M, O, E>) -> Pipe<I, O, E>
where
    I: Send + 'static,
    M: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    Pipe::new(move |input| p2.apply(p1.apply(input)))
}

/// Identity pipe that doesn't transform the sequence
pub fn identity<I, E>() -> Pipe<I, I, E>
where
    I: Send + 'static,
    E: Send + 'static,
{
    Pipe::new(|input| input)
}

/// Extension trait for pipes
pub trait PipeExt<I, O, E> {
    /// Compose this pipe with another pipe
    fn compose<P>(self, other: Pipe<O, P, E>) -> Pipe<I, P, E>
    where
        P: Send + 'static;
}

impl<I, O, E> PipeExt<I, O, E> for Pipe<I, O, E>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    fn compose<P>(self, other: Pipe<O, P, E>) -> Pipe<I, P, E>
    where
        P: Send + 'static,
    {
        compose(self, other)
    }
}
