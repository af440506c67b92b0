use crate::types::{Dimensions, Edge, IndicatorState, KeyEvent};
use parking_lot::Mutex;
use std::sync::Arc;

/// Electrical access to one keyboard matrix. Implementations own the wire
/// details (pin polarity, settle time); the scanner only sees logical
/// levels.
pub trait MatrixBus {
    /// Drive the column's strobe line to its active level.
    fn assert_strobe(&mut self, col: u8);

    /// Return the column's strobe line to its inactive level.
    fn deassert_strobe(&mut self, col: u8);

    /// Wait for the row lines to settle after a strobe change. The duration
    /// is a property of the electrical design, so the bus owns it.
    fn settle(&mut self);

    /// Sample the row lines. Bit n set means the switch in row n of the
    /// strobed column is closed.
    fn sample_rows(&mut self) -> u32;

    /// Present the host's status lamp state. Boards without indicators
    /// ignore it.
    fn set_indicators(&mut self, _state: IndicatorState) {}
}

/// Walks the matrix one column at a time and turns sample differences into
/// key edges. Holds the previous sample per column; everything else is
/// stateless.
#[derive(Debug)]
pub struct MatrixScanner {
    dims: Dimensions,
    previous: Vec<u32>,
}

impl MatrixScanner {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            previous: vec![0; dims.cols as usize],
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// One full pass over the matrix. For every changed bit, `on_edge` is
    /// invoked synchronously, rows in ascending order within a column,
    /// columns in ascending order across the pass.
    pub fn scan<B, F>(&mut self, bus: &mut B, mut on_edge: F)
    where
        B: MatrixBus + ?Sized,
        F: FnMut(KeyEvent),
    {
        let mask = self.dims.row_mask();
        for col in 0..self.dims.cols {
            bus.assert_strobe(col);
            bus.settle();
            let current = bus.sample_rows() & mask;
            bus.deassert_strobe(col);

            let change = current ^ self.previous[col as usize];
            if change != 0 {
                for row in 0..self.dims.rows {
                    let bit = 1u32 << row;
                    if change & bit != 0 {
                        let edge = if current & bit != 0 {
                            Edge::Down
                        } else {
                            Edge::Up
                        };
                        on_edge(KeyEvent::new(self.dims.key_id(row, col), edge));
                    }
                }
            }
            self.previous[col as usize] = current;
        }
    }
}

/// Bus that plays back prerecorded column samples, one frame per scan pass.
/// After the last frame it keeps returning that frame, so the matrix looks
/// frozen in its final state. This is how the pipeline runs off-hardware, in
/// tests and examples.
#[derive(Debug)]
pub struct ScriptedBus {
    frames: Vec<Vec<u32>>,
    cycle: usize,
    active: Option<u8>,
    indicators: Arc<Mutex<Option<IndicatorState>>>,
}

impl ScriptedBus {
    /// `frames[cycle][col]` is the row sample for `col` during scan pass
    /// `cycle`.
    pub fn new(frames: Vec<Vec<u32>>) -> Self {
        Self {
            frames,
            cycle: 0,
            active: None,
            indicators: Arc::new(Mutex::new(None)),
        }
    }

    /// Handle onto the most recent state handed to `set_indicators`. Stays
    /// readable after the bus has moved into a runtime.
    pub fn indicators(&self) -> Arc<Mutex<Option<IndicatorState>>> {
        Arc::clone(&self.indicators)
    }

    /// True once every scripted frame has been scanned at least once.
    pub fn finished(&self) -> bool {
        self.cycle >= self.frames.len()
    }

    fn frame(&self) -> Option<&[u32]> {
        if self.frames.is_empty() {
            return None;
        }
        let index = self.cycle.min(self.frames.len() - 1);
        Some(&self.frames[index])
    }
}

impl MatrixBus for ScriptedBus {
    fn assert_strobe(&mut self, col: u8) {
        self.active = Some(col);
    }

    fn deassert_strobe(&mut self, col: u8) {
        self.active = None;
        let cols = self.frame().map(|f| f.len()).unwrap_or(0);
        if cols > 0 && col as usize + 1 == cols {
            self.cycle += 1;
        }
    }

    fn settle(&mut self) {}

    fn sample_rows(&mut self) -> u32 {
        let (Some(col), Some(frame)) = (self.active, self.frame()) else {
            return 0;
        };
        frame.get(col as usize).copied().unwrap_or(0)
    }

    fn set_indicators(&mut self, state: IndicatorState) {
        *self.indicators.lock() = Some(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyId;

    /// Records the exact call sequence while serving fixed samples.
    struct RecordingBus {
        samples: Vec<u32>,
        calls: Vec<String>,
        active: Option<u8>,
    }

    impl RecordingBus {
        fn new(samples: Vec<u32>) -> Self {
            Self {
                samples,
                calls: Vec::new(),
                active: None,
            }
        }
    }

    impl MatrixBus for RecordingBus {
        fn assert_strobe(&mut self, col: u8) {
            self.active = Some(col);
            self.calls.push(format!("assert {col}"));
        }

        fn deassert_strobe(&mut self, col: u8) {
            self.active = None;
            self.calls.push(format!("deassert {col}"));
        }

        fn settle(&mut self) {
            self.calls.push("settle".to_string());
        }

        fn sample_rows(&mut self) -> u32 {
            self.calls.push("sample".to_string());
            self.active
                .and_then(|c| self.samples.get(c as usize))
                .copied()
                .unwrap_or(0)
        }
    }

    fn collect_edges(scanner: &mut MatrixScanner, bus: &mut impl MatrixBus) -> Vec<(KeyId, Edge)> {
        let mut edges = Vec::new();
        scanner.scan(bus, |ev| edges.push((ev.key, ev.edge)));
        edges
    }

    #[test]
    fn per_column_call_order_is_strobe_settle_sample_deassert() {
        let mut scanner = MatrixScanner::new(Dimensions::new(2, 2));
        let mut bus = RecordingBus::new(vec![0, 0]);
        scanner.scan(&mut bus, |_| {});
        assert_eq!(
            bus.calls,
            vec![
                "assert 0", "settle", "sample", "deassert 0", //
                "assert 1", "settle", "sample", "deassert 1",
            ]
        );
    }

    #[test]
    fn unchanged_samples_emit_nothing() {
        let mut scanner = MatrixScanner::new(Dimensions::new(4, 3));
        let mut bus = RecordingBus::new(vec![0b0101, 0b0000, 0b1111]);

        let first = collect_edges(&mut scanner, &mut bus);
        assert_eq!(first.len(), 6);

        let second = collect_edges(&mut scanner, &mut bus);
        assert!(second.is_empty());
    }

    #[test]
    fn edges_come_row_order_within_column_order() {
        let mut scanner = MatrixScanner::new(Dimensions::new(3, 2));
        // col 0: rows 0 and 2 close; col 1: row 1 closes.
        let mut bus = RecordingBus::new(vec![0b101, 0b010]);

        let edges = collect_edges(&mut scanner, &mut bus);
        let dims = scanner.dims();
        assert_eq!(
            edges,
            vec![
                (dims.key_id(0, 0), Edge::Down),
                (dims.key_id(2, 0), Edge::Down),
                (dims.key_id(1, 1), Edge::Down),
            ]
        );

        // Everything opens again: same positions, up edges.
        let mut bus = RecordingBus::new(vec![0, 0]);
        let edges = collect_edges(&mut scanner, &mut bus);
        assert_eq!(
            edges,
            vec![
                (dims.key_id(0, 0), Edge::Up),
                (dims.key_id(2, 0), Edge::Up),
                (dims.key_id(1, 1), Edge::Up),
            ]
        );
    }

    #[test]
    fn rows_outside_the_matrix_are_masked_off() {
        let mut scanner = MatrixScanner::new(Dimensions::new(2, 1));
        // Bus reports noise on rows 2..31; only rows 0..1 exist.
        let mut bus = RecordingBus::new(vec![0xFFFF_FFFC]);
        let edges = collect_edges(&mut scanner, &mut bus);
        assert!(edges.is_empty());
    }

    #[test]
    fn scripted_bus_advances_one_frame_per_pass() {
        let dims = Dimensions::new(2, 2);
        let mut scanner = MatrixScanner::new(dims);
        let mut bus = ScriptedBus::new(vec![
            vec![0b00, 0b00],
            vec![0b01, 0b00],
            vec![0b00, 0b00],
        ]);

        assert!(collect_edges(&mut scanner, &mut bus).is_empty());
        assert_eq!(
            collect_edges(&mut scanner, &mut bus),
            vec![(dims.key_id(0, 0), Edge::Down)]
        );
        assert_eq!(
            collect_edges(&mut scanner, &mut bus),
            vec![(dims.key_id(0, 0), Edge::Up)]
        );
        assert!(bus.finished());

        // Past the end the last frame repeats and stays quiet.
        assert!(collect_edges(&mut scanner, &mut bus).is_empty());
    }
}
