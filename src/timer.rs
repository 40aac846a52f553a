//! Scheduled tasks with explicit cancellation.
//!
//! Components never mutate state from a timer task. A timer only posts a
//! message into the owning component's channel; the component drains that
//! channel on its next tick. Dropping the [`Timer`] cancels the task, so a
//! component that is torn down stops receiving messages.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tokio_util::sync::CancellationToken;

/// Handle to a scheduled task. The task is cancelled when the handle drops.
#[derive(Debug)]
pub struct Timer {
    token: CancellationToken,
}

impl Timer {
    fn spawn<F>(task: impl FnOnce(CancellationToken) -> F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        tokio::spawn(task(token.clone()));
        Self { token }
    }

    #[cfg(test)]
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Post `msg` to `tx` every `period`, starting one period from now.
pub fn every<M>(period: Duration, tx: UnboundedSender<M>, msg: M) -> Timer
where
    M: Clone + Send + 'static,
{
    Timer::spawn(move |token| async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = ticks.tick() => {
                    if tx.send(msg.clone()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Post `msg` to `tx` once, after `delay`.
pub fn after<M>(delay: Duration, tx: UnboundedSender<M>, msg: M) -> Timer
where
    M: Send + 'static,
{
    Timer::spawn(move |token| async move {
        tokio::select! {
            () = token.cancelled() => {}
            () = sleep(delay) => {
                let _ = tx.send(msg);
            }
        }
    })
}

/// Message queue owned by a component: timers write into it, the component
/// drains it on tick.
#[derive(Debug)]
pub struct Mailbox<M> {
    tx: UnboundedSender<M>,
    rx: UnboundedReceiver<M>,
}

impl<M> Default for Mailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Mailbox<M> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> UnboundedSender<M> {
        self.tx.clone()
    }

    /// Take every message queued so far.
    pub fn drain(&mut self) -> Vec<M> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }
}
