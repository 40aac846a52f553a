use std::time::Duration;

use crate::timer::{self, Mailbox, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Advance;

/// Index over `len` items that a repeating timer moves forward, wrapping
/// around at the end.
///
/// The timer only runs between [`Rotator::start`] and [`Rotator::stop`].
/// Once stopped, pending timer messages are discarded, so nothing moves the
/// index after teardown.
#[derive(Debug)]
pub struct Rotator {
    index: usize,
    len: usize,
    period: Duration,
    mailbox: Mailbox<Advance>,
    timer: Option<Timer>,
}

impl Rotator {
    pub fn new(len: usize, period: Duration) -> Self {
        Self {
            index: 0,
            len,
            period,
            mailbox: Mailbox::new(),
            timer: None,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub const fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Start rotating. Does nothing for an empty list or when already running.
    pub fn start(&mut self) {
        if self.len == 0 || self.timer.is_some() {
            return;
        }
        self.timer = Some(timer::every(self.period, self.mailbox.sender(), Advance));
    }

    pub fn stop(&mut self) {
        self.timer = None;
        self.mailbox.drain();
    }

    pub const fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub const fn previous(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub const fn goto(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Apply timer firings queued since the last tick.
    pub fn handle_tick(&mut self) {
        for Advance in self.mailbox.drain() {
            if self.timer.is_some() {
                self.next();
            }
        }
    }
}
