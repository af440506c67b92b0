use crate::layout::{KeyDef, Layout};
use crate::rollover::{RolloverQueue, REPORT_SLOTS};
use serde::{Deserialize, Serialize};

/// Sentinel for an empty report slot.
pub const NO_KEY: u8 = 0;

/// One complete output frame: the modifier mask plus up to six key codes,
/// newest press first, sentinel elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Report {
    pub modifiers: u8,
    pub keys: [u8; REPORT_SLOTS],
}

impl Report {
    pub const fn empty() -> Self {
        Self {
            modifiers: 0,
            keys: [NO_KEY; REPORT_SLOTS],
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Build a report from the current queue and mask. Pure; the caller
    /// decides when one is worth delivering.
    pub fn assemble(queue: &RolloverQueue, modifiers: u8, layout: &Layout) -> Self {
        let mut keys = [NO_KEY; REPORT_SLOTS];
        for (slot, key) in queue.iter().enumerate() {
            keys[slot] = match layout.def(key) {
                KeyDef::Key(code) => code,
                KeyDef::Modifier(_) | KeyDef::Unused => NO_KEY,
            };
        }
        Self { modifiers, keys }
    }
}
