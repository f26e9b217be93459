//! Collectors: terminal consumers of a lazy sequence
//!
//! A collector takes ownership of a pipeline's sequence and folds it into a
//! result. The built-in collectors cover lists, generators, grouping,
//! counting and string joining; implementing [`Collector`] is enough to plug a
//! custom one into `LazyStream::collect`.

use async_trait::async_trait;
use futures_util::stream::StreamExt;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::StreamError;
use crate::generator::Generator;
use crate::lazy_seq::{self, LazySeq};
use crate::stream_configuration::StreamConfig;

/// Accepts a lazy sequence and returns the accumulated result
#[async_trait]
pub trait Collector<T, E>: Send
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output: Send;

    /// Consume `seq`; the first error it delivers is returned unchanged
    async fn collect(self, seq: LazySeq<T, E>, config: &StreamConfig) -> Result<Self::Output, E>;
}

/// Collect every element into a `Vec`, in order
#[derive(Debug, Clone, Copy, Default)]
pub struct ToList;

#[async_trait]
impl<T, E> Collector<T, E> for ToList
where
    T: Send + 'static,
    E: From<StreamError> + Send + 'static,
{
    type Output = Vec<T>;

    async fn collect(self, seq: LazySeq<T, E>, config: &StreamConfig) -> Result<Vec<T>, E> {
        lazy_seq::collect_vec(seq, &config.collect).await
    }
}

/// Hand the sequence back as a pull handle without consuming anything
#[derive(Debug, Clone, Copy, Default)]
pub struct ToGenerator;

#[async_trait]
impl<T, E> Collector<T, E> for ToGenerator
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Generator<T, E>;

    async fn collect(self, seq: LazySeq<T, E>, config: &StreamConfig) -> Result<Generator<T, E>, E> {
        Ok(Generator::new(seq, config.name.clone()))
    }
}

/// Group elements by key; each group keeps source order
pub struct GroupingBy<F, K> {
    key_fn: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> GroupingBy<F, K> {
    pub fn new(key_fn: F) -> Self {
        Self {
            key_fn,
            _key: PhantomData,
        }
    }
}

#[async_trait]
impl<T, E, F, K> Collector<T, E> for GroupingBy<F, K>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T) -> K + Send,
    K: Eq + Hash + Send,
{
    type Output = HashMap<K, Vec<T>>;

    async fn collect(mut self, mut seq: LazySeq<T, E>, _config: &StreamConfig) -> Result<HashMap<K, Vec<T>>, E> {
        let mut groups: HashMap<K, Vec<T>> = HashMap::new();
        while let Some(item) = seq.next().await {
            let value = item?;
            groups.entry((self.key_fn)(&value)).or_default().push(value);
        }
        Ok(groups)
    }
}

/// Count the elements
#[derive(Debug, Clone, Copy, Default)]
pub struct Counting;

#[async_trait]
impl<T, E> Collector<T, E> for Counting
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = usize;

    async fn collect(self, seq: LazySeq<T, E>, _config: &StreamConfig) -> Result<usize, E> {
        lazy_seq::count(seq).await
    }
}

/// Render each element with `Display` and join them with a separator
#[derive(Debug, Clone, Default)]
pub struct Joining {
    separator: String,
}

impl Joining {
    pub fn with(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

#[async_trait]
impl<T, E> Collector<T, E> for Joining
where
    T: Display + Send + 'static,
    E: Send + 'static,
{
    type Output = String;

    async fn collect(self, mut seq: LazySeq<T, E>, _config: &StreamConfig) -> Result<String, E> {
        let mut out = String::new();
        let mut first = true;
        while let Some(item) = seq.next().await {
            let value = item?;
            if !first {
                out.push_str(&self.separator);
            }
            out.push_str(&value.to_string());
            first = false;
        }
        Ok(out)
    }
}
