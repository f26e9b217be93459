//! Lazy, chainable, asynchronously evaluated streams.
//!
//! A [`LazyStream`] is built from a source (`of`, `iterate`, `concat`), extended
//! with operator stages (`map`, `filter`, `distinct`, `limit`, `flat_map`, ...)
//! and finally drained by a terminal operation (`to_list`, `reduce`,
//! `find_any`, `any_match`, a [`Collector`], or a [`Generator`] pulled by
//! hand). Nothing is computed before a terminal operation pulls, and each pull
//! moves exactly one element through the chain. Stage functions may be plain
//! or return futures.

pub mod error;
pub mod stage;
pub mod lazy_seq;
pub mod generator;
pub mod collector;
pub mod stream;
pub mod pipe;

pub mod stream_configuration;
pub mod stream_performance_metrics;

pub use collector::{Collector, Counting, GroupingBy, Joining, ToGenerator, ToList};
pub use error::{StreamError, StreamResult};
pub use generator::{Generator, StreamState};
pub use lazy_seq::LazySeq;
pub use stream::LazyStream;
pub use pipe::{Pipe, PipeExt};
pub use stage::{Eval, Folder, Mapper, Predicate, StageFn};
pub use stream_configuration::{BufferConfig, StreamConfig};
pub use stream_performance_metrics::StreamMetrics;
