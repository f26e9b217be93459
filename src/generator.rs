//! Pull handle over a lazy sequence
//!
//! A [`Generator`] is what `to_generator` hands back: the caller drives the
//! pipeline one `next().await` at a time and receives `None` once it is
//! exhausted. The handle records where the sequence is in its lifecycle.
//! After a sequence ends (exhausted, failed or cancelled), the handle drops it
//! and every further `next()` returns `None` without touching upstream.

use futures_core::Stream;
use futures_util::future::poll_fn;
use futures_util::stream::StreamExt;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::lazy_seq::LazySeq;

/// Lifecycle of a sequence owned by a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing has been pulled yet
    Unconsumed,
    /// At least one element has been pulled and more may follow
    Draining,
    /// The sequence reported its end
    Exhausted,
    /// The consumer stopped early
    Cancelled,
    /// The sequence delivered an error
    Failed,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamState::Exhausted | StreamState::Cancelled | StreamState::Failed
        )
    }
}

/// Single-consumer pull handle over a pipeline
pub struct Generator<T, E> {
    seq: Option<LazySeq<T, E>>,
    state: StreamState,
    name: String,
    pulled: usize,
}

impl<T, E> Generator<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new(seq: LazySeq<T, E>, name: impl Into<String>) -> Self {
        Self {
            seq: Some(seq),
            state: StreamState::Unconsumed,
            name: name.into(),
            pulled: 0,
        }
    }

    /// Pull the next element; `None` signals exhaustion
    pub async fn next(&mut self) -> Option<Result<T, E>> {
        poll_fn(|cx| self.poll_pull(cx)).await
    }

    /// Stop pulling and release the sequence
    pub fn cancel(&mut self) {
        if self.seq.take().is_some() {
            log::debug!("[{}] generator cancelled after {} elements", self.name, self.pulled);
            self.state = StreamState::Cancelled;
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Number of elements handed to the caller so far
    pub fn pulled(&self) -> usize {
        self.pulled
    }

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<T, E>>> {
        let seq = match self.seq.as_mut() {
            Some(seq) => seq,
            None => return Poll::Ready(None),
        };

        match seq.poll_next_unpin(cx) {
            Poll::Pending => {
                self.state = StreamState::Draining;
                Poll::Pending
            }
            Poll::Ready(Some(Ok(value))) => {
                self.state = StreamState::Draining;
                self.pulled += 1;
                Poll::Ready(Some(Ok(value)))
            }
            Poll::Ready(Some(Err(e))) => {
                log::debug!("[{}] generator failed after {} elements", self.name, self.pulled);
                self.seq = None;
                self.state = StreamState::Failed;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                log::debug!("[{}] generator exhausted after {} elements", self.name, self.pulled);
                self.seq = None;
                self.state = StreamState::Exhausted;
                Poll::Ready(None)
            }
        }
    }
}

impl<T, E> Stream for Generator<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_pull(cx)
    }
}

impl<T, E> fmt::Debug for Generator<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("pulled", &self.pulled)
            .finish()
    }
}
