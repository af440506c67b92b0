pub mod debounce;
pub mod engine;
pub mod keymap;
pub mod layout;
pub mod parser;
pub mod report;
pub mod rollover;
pub mod runtime;
pub mod scan;
pub mod types;

pub use engine::{Engine, Profile};
pub use layout::{KeyDef, Layout, LayoutError};
pub use report::{Report, NO_KEY};
pub use rollover::{RolloverQueue, REPORT_SLOTS};
pub use runtime::{ChannelTransport, ScanRuntime, Transport};
pub use scan::{MatrixBus, MatrixScanner, ScriptedBus};
pub use types::{Dimensions, Edge, IndicatorState, KeyEvent, KeyId};
