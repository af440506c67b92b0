use crate::types::KeyId;

/// Timer value loaded when a release is armed. One bit shifts out per tick,
/// so releases confirm on the eighth tick after the last up edge.
pub const DEFAULT_RELEASE_PATTERN: u8 = 0x80;

/// Sentinel a decaying timer reaches one tick before it would vanish; the
/// sweep confirms the release at that point.
const CONFIRM_SENTINEL: u8 = 0x01;

/// Per-key release timers. Presses are confirmed immediately by the
/// dispatcher and never pass through here; only releases are delayed, so a
/// key that bounces on its way up stays logically held for the whole window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    timers: Vec<u8>,
    pattern: u8,
}

impl Debouncer {
    /// One timer per key, all idle. `pattern` is the value `arm` loads.
    pub fn new(key_count: usize, pattern: u8) -> Self {
        Self {
            timers: vec![0; key_count],
            pattern,
        }
    }

    pub fn set_pattern(&mut self, pattern: u8) {
        self.pattern = pattern;
    }

    /// Start (or restart) the release countdown for the key.
    pub fn arm(&mut self, key: KeyId) {
        if let Some(timer) = self.timers.get_mut(key.index()) {
            *timer = self.pattern;
        }
    }

    /// Discard any pending release for the key. A down edge inside the
    /// window lands here, absorbing the bounce.
    pub fn cancel(&mut self, key: KeyId) {
        if let Some(timer) = self.timers.get_mut(key.index()) {
            *timer = 0;
        }
    }

    pub fn is_pending(&self, key: KeyId) -> bool {
        self.timers.get(key.index()).is_some_and(|&t| t != 0)
    }

    /// Advance every timer one step, in key-id order. Timers that have
    /// decayed to the sentinel confirm through the callback and go idle;
    /// all other live timers shift right one bit.
    pub fn tick<F: FnMut(KeyId)>(&mut self, mut confirm: F) {
        for (index, timer) in self.timers.iter_mut().enumerate() {
            if *timer == CONFIRM_SENTINEL {
                *timer = 0;
                confirm(KeyId(index as u16));
            } else {
                *timer >>= 1;
            }
        }
    }
}
