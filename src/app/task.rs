// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work returned by the update loop
//!
//! A [`Task`] is a batch of message streams. Handlers never run service calls
//! inline; they describe them as tasks, and the runtime drives each stream and
//! feeds every produced message back into `update`.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::future::Future;

/// Batch of asynchronous units, each producing zero or more messages
#[must_use = "tasks do nothing unless handed to the runtime"]
pub struct Task<M> {
    units: Vec<BoxStream<'static, M>>,
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ units: {} }}", self.units.len())
    }
}

impl<M: Send + 'static> Task<M> {
    /// No work
    pub fn none() -> Self {
        Self { units: Vec::new() }
    }

    /// Run `future` and map its output to one message
    pub fn perform<T, F, Map>(future: F, map: Map) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        Map: FnOnce(T) -> M + Send + 'static,
    {
        Self {
            units: vec![stream::once(async move { map(future.await) }).boxed()],
        }
    }

    /// Drive `source` to completion, mapping every item to a message
    pub fn run<S, Map>(source: S, map: Map) -> Self
    where
        S: Stream + Send + 'static,
        Map: FnMut(S::Item) -> M + Send + 'static,
    {
        Self {
            units: vec![source.map(map).boxed()],
        }
    }

    /// Combine several tasks into one
    pub fn batch(tasks: impl IntoIterator<Item = Task<M>>) -> Self {
        Self {
            units: tasks.into_iter().flat_map(|task| task.units).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.units.is_empty()
    }

    /// Hand the units over to a runtime
    pub fn into_streams(self) -> Vec<BoxStream<'static, M>> {
        self.units
    }
}
