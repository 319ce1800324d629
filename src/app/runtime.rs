// SPDX-License-Identifier: GPL-3.0-only

//! Task executor for the update loop
//!
//! Each unit of a [`Task`] is spawned on tokio and forwards its messages over
//! an unbounded channel. A unit reports `Finished` when its future is dropped,
//! after its last message or after a panic, so once every spawned unit has
//! finished and its messages have been received the runtime is idle.
//!
//! ```text
//!  spawn(Task) ──▶ tokio::spawn(unit) ──▶ Envelope::Message(m) ──┐
//!                                    └──▶ Envelope::Finished ────┤
//!                                                                ▼
//!                                          next() / try_next() ◀── channel
//! ```

use crate::app::task::Task;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

enum Envelope<M> {
    Message(M),
    Finished,
}

/// Sends `Finished` for one unit when dropped
struct FinishGuard<M> {
    sender: mpsc::UnboundedSender<Envelope<M>>,
    completed: bool,
}

impl<M> Drop for FinishGuard<M> {
    fn drop(&mut self) {
        if !self.completed {
            warn!("Task unit stopped before its stream ended");
        }
        let _ = self.sender.send(Envelope::Finished);
    }
}

/// Drives tasks and hands their messages back to the caller
pub struct Runtime<M> {
    sender: mpsc::UnboundedSender<Envelope<M>>,
    receiver: mpsc::UnboundedReceiver<Envelope<M>>,
    in_flight: usize,
}

impl<M> std::fmt::Debug for Runtime<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl<M: Send + 'static> Default for Runtime<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> Runtime<M> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start every unit of `task`
    ///
    /// Must be called from within a tokio runtime context.
    pub fn spawn(&mut self, task: Task<M>) {
        if task.is_none() {
            return;
        }
        for mut unit in task.into_streams() {
            self.in_flight += 1;
            let mut guard = FinishGuard {
                sender: self.sender.clone(),
                completed: false,
            };
            tokio::spawn(async move {
                while let Some(message) = unit.next().await {
                    if guard.sender.send(Envelope::Message(message)).is_err() {
                        // Runtime dropped
                        break;
                    }
                }
                guard.completed = true;
            });
        }
        trace!(in_flight = self.in_flight, "Task spawned");
    }

    /// Units that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    fn accept(&mut self, envelope: Envelope<M>) -> Option<M> {
        match envelope {
            Envelope::Message(message) => Some(message),
            Envelope::Finished => {
                self.in_flight = self.in_flight.saturating_sub(1);
                None
            }
        }
    }

    /// Next message that is already available, without waiting
    pub fn try_next(&mut self) -> Option<M> {
        while let Ok(envelope) = self.receiver.try_recv() {
            if let Some(message) = self.accept(envelope) {
                return Some(message);
            }
        }
        None
    }

    /// Wait for the next message; `None` once the runtime is idle
    pub async fn next(&mut self) -> Option<M> {
        while self.in_flight > 0 {
            let envelope = self.receiver.recv().await?;
            if let Some(message) = self.accept(envelope) {
                return Some(message);
            }
        }
        None
    }

    /// Feed messages through `update` until no work remains
    ///
    /// Tasks returned by `update` are spawned as they appear.
    pub async fn run_until_idle<S>(
        &mut self,
        state: &mut S,
        mut update: impl FnMut(&mut S, M) -> Task<M>,
    ) {
        let mut handled = 0usize;
        while let Some(message) = self.next().await {
            let task = update(state, message);
            self.spawn(task);
            handled += 1;
        }
        debug!(handled, "Runtime idle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::time::Duration;

    fn explode() -> u32 {
        panic!("unit blew up")
    }

    #[tokio::test]
    async fn test_follow_up_tasks_are_driven() {
        let mut runtime = Runtime::new();
        runtime.spawn(Task::perform(async { 3u32 }, |v| v));

        // Every nonzero value spawns a follow-up one lower
        let mut seen = Vec::new();
        runtime
            .run_until_idle(&mut seen, |seen, value| {
                seen.push(value);
                if value == 0 {
                    Task::none()
                } else {
                    Task::perform(async move { value - 1 }, |v| v)
                }
            })
            .await;

        assert_eq!(seen, vec![3, 2, 1, 0]);
        assert!(runtime.is_idle());
    }

    #[tokio::test]
    async fn test_streams_deliver_every_item() {
        let mut runtime = Runtime::new();
        runtime.spawn(Task::run(stream::iter(vec![1, 2, 3]), |v| v * 10));
        assert_eq!(runtime.in_flight(), 1);

        let mut seen = Vec::new();
        while let Some(value) = runtime.next().await {
            seen.push(value);
        }
        assert_eq!(seen, vec![10, 20, 30]);
        assert!(runtime.is_idle());
    }

    #[tokio::test]
    async fn test_idle_runtime_returns_none() {
        let mut runtime: Runtime<()> = Runtime::new();
        runtime.spawn(Task::none());
        assert!(runtime.next().await.is_none());
        assert!(runtime.try_next().is_none());
    }

    #[tokio::test]
    async fn test_panicking_unit_still_finishes() {
        let mut runtime = Runtime::new();
        runtime.spawn(Task::batch([
            Task::perform(async { explode() }, |v| v),
            Task::perform(async { 7u32 }, |v| v),
        ]));

        let mut seen = Vec::new();
        let settled = tokio::time::timeout(
            Duration::from_secs(2),
            runtime.run_until_idle(&mut seen, |seen, value| {
                seen.push(value);
                Task::none()
            }),
        )
        .await;

        assert!(settled.is_ok(), "runtime must settle after a unit panics");
        assert_eq!(seen, vec![7]);
        assert!(runtime.is_idle());
    }
}
