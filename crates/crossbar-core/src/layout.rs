use crate::types::{Dimensions, KeyId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First code of the modifier range in the HID usage tables. Modifiers never
/// occupy report slots, so slot codes must stay below this point.
pub const MODIFIER_CODE_BASE: u8 = 0xE0;

/// Static classification of one matrix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyDef {
    /// Position with no switch behind it. Edges here are ignored.
    Unused,
    /// Regular key; the code fills report slots.
    Key(u8),
    /// Modifier key; the pattern is OR-ed into the modifier mask.
    Modifier(u8),
}

impl KeyDef {
    pub const fn is_modifier(self) -> bool {
        matches!(self, KeyDef::Modifier(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("matrix has {rows} rows, at most 32 are supported")]
    TooManyRows { rows: u8 },
    #[error("layout defines {got} positions, a {rows}x{cols} matrix has {want}")]
    WrongKeyCount {
        got: usize,
        want: usize,
        rows: u8,
        cols: u8,
    },
    #[error("position {index} has key code {code:#04x}, valid codes are 0x01..=0xDF")]
    InvalidKeyCode { index: usize, code: u8 },
    #[error("position {index} has modifier pattern {pattern:#010b}, exactly one bit must be set")]
    InvalidModifierPattern { index: usize, pattern: u8 },
}

/// Immutable mapping from key positions to their definitions. Validated on
/// construction; the event paths index it without further checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutData", into = "LayoutData")]
pub struct Layout {
    dims: Dimensions,
    defs: Vec<KeyDef>,
}

#[derive(Serialize, Deserialize, Clone)]
struct LayoutData {
    dims: Dimensions,
    defs: Vec<KeyDef>,
}

impl TryFrom<LayoutData> for Layout {
    type Error = LayoutError;

    fn try_from(data: LayoutData) -> Result<Self, LayoutError> {
        Layout::new(data.dims, data.defs)
    }
}

impl From<Layout> for LayoutData {
    fn from(layout: Layout) -> Self {
        Self {
            dims: layout.dims,
            defs: layout.defs,
        }
    }
}

impl Layout {
    pub fn new(dims: Dimensions, defs: Vec<KeyDef>) -> Result<Self, LayoutError> {
        if dims.rows > 32 {
            return Err(LayoutError::TooManyRows { rows: dims.rows });
        }
        if defs.len() != dims.key_count() {
            return Err(LayoutError::WrongKeyCount {
                got: defs.len(),
                want: dims.key_count(),
                rows: dims.rows,
                cols: dims.cols,
            });
        }
        for (index, def) in defs.iter().enumerate() {
            match *def {
                KeyDef::Key(code) if code == 0 || code >= MODIFIER_CODE_BASE => {
                    return Err(LayoutError::InvalidKeyCode { index, code });
                }
                KeyDef::Modifier(pattern) if !pattern.is_power_of_two() => {
                    return Err(LayoutError::InvalidModifierPattern { index, pattern });
                }
                _ => {}
            }
        }
        Ok(Self { dims, defs })
    }

    /// Construction for tables whose validity is asserted by tests.
    pub(crate) fn from_checked_parts(dims: Dimensions, defs: Vec<KeyDef>) -> Self {
        Self { dims, defs }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn key_count(&self) -> usize {
        self.defs.len()
    }

    /// Definition of the position, `Unused` for ids outside the matrix.
    pub fn def(&self, key: KeyId) -> KeyDef {
        self.defs.get(key.index()).copied().unwrap_or(KeyDef::Unused)
    }
}
