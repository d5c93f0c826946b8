//! Link volumes per time bin.

use std::collections::BTreeMap;

use qs_core::{LinkId, Tick};
use qs_events::{Event, EventHandler};
use qs_sim::SimObserver;

/// Counts vehicles leaving each link, per time bin.
///
/// Bin `i` covers `[i·bin_secs, (i + 1)·bin_secs)`.  Bins run up to and
/// including the one holding `max_time`; later events are added to that last
/// bin.  Final-link exits count like any other.
///
/// Works both as an [`EventHandler`] on an `EventBus` and directly as a
/// [`SimObserver`].
#[derive(Clone, Debug)]
pub struct VolumeCounter {
    bin_secs: u64,
    bins:     usize,
    counts:   BTreeMap<LinkId, Vec<u32>>,
}

impl VolumeCounter {
    /// # Panics
    ///
    /// If `bin_secs` is 0.
    pub fn new(bin_secs: u32, max_time: Tick) -> Self {
        assert!(bin_secs > 0, "bin size must be positive");
        let bin_secs = bin_secs as u64;
        Self {
            bin_secs,
            bins: (max_time.0 / bin_secs) as usize + 1,
            counts: BTreeMap::new(),
        }
    }

    /// Hourly bins for one day.
    pub fn hourly() -> Self {
        Self::new(3_600, Tick::from_hms(23, 59, 59))
    }

    pub fn bin_secs(&self) -> u64 {
        self.bin_secs
    }

    pub fn bin_count(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn bin_of(&self, tick: Tick) -> usize {
        ((tick.0 / self.bin_secs) as usize).min(self.bins - 1)
    }

    /// Counts for `link`, one per bin, or `None` if no vehicle left it.
    pub fn volumes(&self, link: LinkId) -> Option<&[u32]> {
        self.counts.get(&link).map(Vec::as_slice)
    }

    pub fn volume(&self, link: LinkId, bin: usize) -> u32 {
        self.volumes(link).and_then(|v| v.get(bin)).copied().unwrap_or(0)
    }

    /// Sum over all bins.
    pub fn total(&self, link: LinkId) -> u64 {
        self.volumes(link).map_or(0, |v| v.iter().map(|&n| n as u64).sum())
    }

    /// Links with at least one count, ascending.
    pub fn links(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.counts.keys().copied()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    fn record(&mut self, event: &Event) {
        if let Event::LinkLeft { tick, link, .. } = *event {
            let bin = self.bin_of(tick);
            let bins = self.bins;
            self.counts.entry(link).or_insert_with(|| vec![0; bins])[bin] += 1;
        }
    }
}

impl EventHandler for VolumeCounter {
    fn handle(&mut self, event: &Event) {
        self.record(event);
    }
}

impl SimObserver for VolumeCounter {
    fn on_event(&mut self, event: &Event) {
        self.record(event);
    }
}
