use serde::{Deserialize, Serialize};

/// Stable index of one physical key position in the matrix.
///
/// Ids are column-major: walking the matrix column by column, row by row
/// inside each column, yields ids 0, 1, 2, ... This matches the order in
/// which the scanner visits positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub u16);

impl KeyId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Direction of a raw electrical transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Down,
    Up,
}

/// One observed transition on one key position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyId,
    pub edge: Edge,
}

impl KeyEvent {
    pub const fn new(key: KeyId, edge: Edge) -> Self {
        Self { key, edge }
    }
}

/// Matrix geometry. A column sample is one `u32` bit-field, so at most 32
/// rows are supported; `Layout` construction enforces the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: u8,
    pub cols: u8,
}

impl Dimensions {
    pub const fn new(rows: u8, cols: u8) -> Self {
        Self { rows, cols }
    }

    pub const fn key_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Column-major id of the position at (row, col).
    pub const fn key_id(&self, row: u8, col: u8) -> KeyId {
        KeyId(col as u16 * self.rows as u16 + row as u16)
    }

    /// Inverse of `key_id`, for diagnostics. A zero-row matrix has no
    /// positions, so every id maps to (0, 0) there.
    pub const fn position(&self, key: KeyId) -> (u8, u8) {
        if self.rows == 0 {
            return (0, 0);
        }
        ((key.0 % self.rows as u16) as u8, (key.0 / self.rows as u16) as u8)
    }

    /// Mask with the low `rows` bits set; column samples are AND-ed with it
    /// so stray high bits from the bus never reach edge detection.
    pub const fn row_mask(&self) -> u32 {
        if self.rows >= 32 {
            u32::MAX
        } else {
            (1u32 << self.rows) - 1
        }
    }
}

/// Host-to-device status lamp bits, boot-protocol layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorState(pub u8);

impl IndicatorState {
    pub const NUM_LOCK: u8 = 0x01;
    pub const CAPS_LOCK: u8 = 0x02;
    pub const SCROLL_LOCK: u8 = 0x04;

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn num_lock(self) -> bool {
        self.0 & Self::NUM_LOCK != 0
    }

    pub const fn caps_lock(self) -> bool {
        self.0 & Self::CAPS_LOCK != 0
    }

    pub const fn scroll_lock(self) -> bool {
        self.0 & Self::SCROLL_LOCK != 0
    }
}
