//! Bus-functional drivers for ready/valid channels.
//!
//! A [`Source`] plays the producer side of a channel and a [`Sink`] the
//! consumer side. Both are [`Process`]es: spawn them on the kernel to run
//! their prologue, then pass them to [`Kernel::tick`](crate::Kernel::tick)
//! until they report [`Activity::Done`].

use tracing::debug;

use crate::channel::{Channel, ChannelConsumer, ChannelProducer};
use crate::kernel::{Activity, Process};
use crate::signal::{Drive, SignalView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Not spawned yet.
    Idle,
    /// Offering or collecting.
    Active,
    Done,
}

/// Sends a sequence of values over a channel, one per accepted transfer.
#[derive(Debug)]
pub struct Source {
    channel: Channel,
    producer: ChannelProducer,
    values: Vec<u64>,
    sent: usize,
    phase: Phase,
}

impl Source {
    /// Creates a source that will send `values` in order on `channel`.
    pub fn send(channel: &Channel, producer: ChannelProducer, values: Vec<u64>) -> Self {
        Self {
            channel: channel.clone(),
            producer,
            values,
            sent: 0,
            phase: Phase::Idle,
        }
    }

    /// Number of values accepted so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Returns `true` once every value was accepted.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Gives the channel's write tokens back.
    pub fn into_producer(self) -> ChannelProducer {
        self.producer
    }

    fn finish(&mut self, next: &mut Drive) -> Activity {
        self.producer.withdraw(next);
        self.phase = Phase::Done;
        debug!(channel = self.channel.name(), sent = self.sent, "source done");
        Activity::Done
    }
}

impl Process for Source {
    fn start(&mut self, next: &mut Drive) {
        match self.values.first() {
            Some(&first) => {
                self.producer.offer(next, first);
                self.phase = Phase::Active;
            }
            None => {
                self.finish(next);
            }
        }
    }

    fn on_tick(&mut self, now: &SignalView<'_>, next: &mut Drive) -> Activity {
        match self.phase {
            Phase::Idle => Activity::Running,
            Phase::Done => Activity::Done,
            Phase::Active => {
                if !self.channel.accepted(now) {
                    return Activity::Running;
                }
                self.sent += 1;
                match self.values.get(self.sent) {
                    Some(&value) => {
                        self.producer.offer(next, value);
                        Activity::Running
                    }
                    None => self.finish(next),
                }
            }
        }
    }
}

/// Collects a fixed number of values from a channel.
#[derive(Debug)]
pub struct Sink {
    channel: Channel,
    consumer: ChannelConsumer,
    count: usize,
    values: Vec<u64>,
    stalls: Vec<bool>,
    cycle: usize,
    phase: Phase,
}

impl Sink {
    /// Creates a sink that collects `count` values from `channel`.
    pub fn recv(channel: &Channel, consumer: ChannelConsumer, count: usize) -> Self {
        Self {
            channel: channel.clone(),
            consumer,
            count,
            values: Vec::with_capacity(count),
            stalls: Vec::new(),
            cycle: 0,
            phase: Phase::Idle,
        }
    }

    /// Deasserts ready on the ticks where `pattern` is `true`.
    ///
    /// The pattern is repeated from the tick after the sink is spawned. An
    /// empty pattern never stalls.
    pub fn with_stall_pattern(mut self, pattern: Vec<bool>) -> Self {
        self.stalls = pattern;
        self
    }

    /// Values collected so far, in transfer order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Returns `true` once `count` values were collected.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Consumes the sink and returns the collected values.
    pub fn into_values(self) -> Vec<u64> {
        self.values
    }

    /// Gives the channel's write token back.
    pub fn into_consumer(self) -> ChannelConsumer {
        self.consumer
    }

    fn stalled(&self, cycle: usize) -> bool {
        !self.stalls.is_empty() && self.stalls[cycle % self.stalls.len()]
    }

    fn finish(&mut self, next: &mut Drive) -> Activity {
        self.consumer.set_ready(next, false);
        self.phase = Phase::Done;
        debug!(
            channel = self.channel.name(),
            received = self.values.len(),
            "sink done"
        );
        Activity::Done
    }
}

impl Process for Sink {
    fn start(&mut self, next: &mut Drive) {
        if self.count == 0 {
            self.finish(next);
            return;
        }
        self.consumer.set_ready(next, !self.stalled(0));
        self.phase = Phase::Active;
    }

    fn on_tick(&mut self, now: &SignalView<'_>, next: &mut Drive) -> Activity {
        match self.phase {
            Phase::Idle => Activity::Running,
            Phase::Done => Activity::Done,
            Phase::Active => {
                if self.channel.accepted(now) {
                    self.values.push(now.get(self.channel.data));
                    if self.values.len() == self.count {
                        return self.finish(next);
                    }
                }
                self.cycle += 1;
                self.consumer.set_ready(next, !self.stalled(self.cycle));
                Activity::Running
            }
        }
    }
}
