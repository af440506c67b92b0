use crate::types::KeyId;

/// Number of key slots in a report, and therefore the rollover bound.
pub const REPORT_SLOTS: usize = 6;

/// Fixed-capacity queue of the currently held regular keys, most recent
/// press first. A key appears at most once; re-pushing a held key moves it
/// back to the front instead of growing the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverQueue {
    slots: [KeyId; REPORT_SLOTS],
    len: usize,
}

impl Default for RolloverQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RolloverQueue {
    pub const fn new() -> Self {
        Self {
            slots: [KeyId(0); REPORT_SLOTS],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, key: KeyId) -> bool {
        self.slots[..self.len].contains(&key)
    }

    /// Insert at the front, shifting the rest down. When the queue is full
    /// the oldest entry falls off the end.
    pub fn push_front(&mut self, key: KeyId) {
        if let Some(pos) = self.slots[..self.len].iter().position(|&k| k == key) {
            self.slots[..=pos].rotate_right(1);
            return;
        }
        let kept = self.len.min(REPORT_SLOTS - 1);
        self.slots.copy_within(..kept, 1);
        self.slots[0] = key;
        self.len = (self.len + 1).min(REPORT_SLOTS);
    }

    /// Remove the key, closing the gap so relative order is preserved.
    /// Returns whether the key was present.
    pub fn remove(&mut self, key: KeyId) -> bool {
        match self.slots[..self.len].iter().position(|&k| k == key) {
            Some(pos) => {
                self.slots.copy_within(pos + 1..self.len, pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Held keys, newest first.
    pub fn iter(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.slots[..self.len].iter().copied()
    }
}
