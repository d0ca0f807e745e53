// src/picker/kb_debug.rs  -  Keyboard debug instrumentation hook
use crate::keys::ModifierMap;
use std::time::{Duration, Instant};

/// Observes the decoder and poll loop.  Never alters control flow.
pub trait KbDebug {
    /// Called once per decoded frame with the typing and raw key counts
    fn show(&mut self, typing_keys: usize, raw_keys: usize, modifiers: ModifierMap);
    /// Called after each poll-loop micro-delay
    fn instrument_loop_delay(&mut self, start: Instant, end: Instant);
    /// One-line summary for the end of the session
    fn report(&self) -> String;
}

/// Logs frame activity and keeps loop-delay statistics
#[derive(Debug, Default)]
pub struct LoopDelayStats {
    frames:    u64,
    delays:    u64,
    total:     Duration,
    min:       Option<Duration>,
    max:       Duration,
    last_show: Option<(usize, usize, ModifierMap)>,
}

impl LoopDelayStats {
    pub fn new() -> Self { Self::default() }

    pub fn mean(&self) -> Option<Duration> {
        u32::try_from(self.delays).ok()
            .filter(|n| *n > 0)
            .map(|n| self.total / n)
    }
}

impl KbDebug for LoopDelayStats {
    fn show(&mut self, typing_keys: usize, raw_keys: usize, modifiers: ModifierMap) {
        self.frames += 1;
        let now = (typing_keys, raw_keys, modifiers);
        // Only log transitions; the loop runs far too often to log every frame
        if self.last_show != Some(now) {
            log::debug!("[kb-debug] typing={typing_keys} raw={raw_keys} mods={modifiers:?}");
            self.last_show = Some(now);
        }
    }

    fn instrument_loop_delay(&mut self, start: Instant, end: Instant) {
        let d = end.saturating_duration_since(start);
        self.delays += 1;
        self.total  += d;
        self.max     = self.max.max(d);
        self.min     = Some(self.min.map_or(d, |m| m.min(d)));
    }

    fn report(&self) -> String {
        match self.mean() {
            Some(mean) => format!(
                "{} frames, {} loop delays: min {:?} mean {:?} max {:?}",
                self.frames, self.delays, self.min.unwrap_or_default(), mean, self.max
            ),
            None => format!("{} frames, no loop delays", self.frames),
        }
    }
}
