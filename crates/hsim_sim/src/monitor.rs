//! Passive channel observer.

use crate::channel::{Channel, ChannelState};
use crate::kernel::{Activity, Process};
use crate::signal::{Drive, SignalView};
use crate::time::Tick;

/// Records the state of a set of channels at every tick.
///
/// A monitor owns no write tokens and never keeps a run alive.
#[derive(Debug, Default)]
pub struct Monitor {
    channels: Vec<Channel>,
    samples: Vec<(Tick, Vec<ChannelState>)>,
}

impl Monitor {
    /// Creates a monitor over `channels`; indices into this list name them later.
    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            channels,
            samples: Vec::new(),
        }
    }

    /// The watched channels.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Every recorded sample, oldest first.
    pub fn samples(&self) -> &[(Tick, Vec<ChannelState>)] {
        &self.samples
    }

    /// The most recent sample.
    pub fn last(&self) -> Option<&(Tick, Vec<ChannelState>)> {
        self.samples.last()
    }

    /// Values accepted on channel `index`, with the tick of each transfer.
    pub fn transfers(&self, index: usize) -> Vec<(Tick, u64)> {
        self.samples
            .iter()
            .filter_map(|(tick, states)| {
                states
                    .get(index)
                    .filter(|s| s.accepted())
                    .map(|s| (*tick, s.data))
            })
            .collect()
    }

    /// Ticks at which every channel in `indices` transferred.
    pub fn coincident(&self, indices: &[usize]) -> Vec<Tick> {
        self.samples
            .iter()
            .filter(|(_, states)| {
                indices
                    .iter()
                    .all(|&i| states.get(i).is_some_and(ChannelState::accepted))
            })
            .map(|(tick, _)| *tick)
            .collect()
    }

    /// Forgets all recorded samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Process for Monitor {
    fn on_tick(&mut self, now: &SignalView<'_>, _next: &mut Drive) -> Activity {
        let states = self.channels.iter().map(|c| c.state(now)).collect();
        self.samples.push((now.tick(), states));
        Activity::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Sink, Source};
    use crate::kernel::Kernel;

    #[test]
    fn records_every_tick() {
        let mut kernel = Kernel::new();
        let (ch, _tx, _rx) = Channel::new(&mut kernel, "c", 8).unwrap();
        let mut monitor = Monitor::new(vec![ch]);
        for _ in 0..3 {
            kernel.tick(&mut monitor, &mut []).unwrap();
        }
        assert_eq!(monitor.samples().len(), 3);
        assert_eq!(monitor.last().map(|(t, _)| *t), Some(Tick(2)));
        assert!(monitor.transfers(0).is_empty());
    }

    #[test]
    fn transfers_and_coincident_ticks() {
        let mut kernel = Kernel::new();
        let (x, x_tx, x_rx) = Channel::new(&mut kernel, "x", 8).unwrap();
        let (y, y_tx, y_rx) = Channel::new(&mut kernel, "y", 8).unwrap();
        let mut monitor = Monitor::new(vec![x.clone(), y.clone()]);
        let mut x_src = Source::send(&x, x_tx, vec![1, 2]);
        let mut x_snk = Sink::recv(&x, x_rx, 2);
        let mut y_src = Source::send(&y, y_tx, vec![7, 8]);
        let mut y_snk = Sink::recv(&y, y_rx, 2).with_stall_pattern(vec![true, false]);
        kernel.spawn(&mut x_src);
        kernel.spawn(&mut x_snk);
        kernel.spawn(&mut y_src);
        kernel.spawn(&mut y_snk);
        kernel
            .run_until_idle(
                &mut monitor,
                &mut [&mut x_src, &mut x_snk, &mut y_src, &mut y_snk],
            )
            .unwrap();

        assert_eq!(monitor.transfers(0), vec![(Tick(0), 1), (Tick(1), 2)]);
        assert_eq!(monitor.transfers(1), vec![(Tick(1), 7), (Tick(3), 8)]);
        assert_eq!(monitor.coincident(&[0, 1]), vec![Tick(1)]);
        assert!(monitor.transfers(5).is_empty());

        monitor.clear();
        assert!(monitor.samples().is_empty());
    }

    #[test]
    fn monitor_does_not_keep_run_alive() {
        let mut kernel = Kernel::new();
        let (ch, _tx, _rx) = Channel::new(&mut kernel, "c", 8).unwrap();
        let mut dut = Monitor::default();
        let mut monitor = Monitor::new(vec![ch]);
        let outcome = kernel.tick(&mut dut, &mut [&mut monitor]).unwrap();
        assert_eq!(outcome.active, 0);
    }
}
