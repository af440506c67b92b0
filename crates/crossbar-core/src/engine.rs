use crate::debounce::{Debouncer, DEFAULT_RELEASE_PATTERN};
use crate::layout::{KeyDef, Layout};
use crate::report::Report;
use crate::rollover::RolloverQueue;
use crate::types::{Edge, KeyEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tuning knobs for an engine and the runtime driving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Value loaded into a key's release timer on an up edge. One bit per
    /// tick, so `0x80` confirms on the eighth tick.
    #[serde(default = "default_release_pattern")]
    pub release_pattern: u8,
    /// Cadence of the timer sweep.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Pause between scan passes; zero free-runs the scan loop.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,
}

fn default_release_pattern() -> u8 {
    DEFAULT_RELEASE_PATTERN
}

fn default_tick_interval_ms() -> u64 {
    1
}

fn default_scan_interval_ms() -> u64 {
    1
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            release_pattern: DEFAULT_RELEASE_PATTERN,
            tick_interval_ms: 1,
            scan_interval_ms: 1,
        }
    }
}

/// Turns raw key edges into confirmed key state and reports.
///
/// Down edges confirm immediately. Up edges only arm a per-key timer; the
/// release confirms when the timer has decayed, and any down edge on the
/// same key before that discards the pending release. Every confirmed
/// press or release rebuilds the report.
pub struct Engine {
    layout: Layout,
    profile: Profile,
    pressed: Vec<bool>,
    debounce: Debouncer,
    queue: RolloverQueue,
    modifiers: u8,
}

impl Engine {
    pub fn new(layout: Layout) -> Self {
        Self::with_profile(layout, Profile::default())
    }

    pub fn with_profile(layout: Layout, mut profile: Profile) -> Self {
        if profile.release_pattern == 0 {
            warn!("release pattern 0 would never confirm releases, using the default");
            profile.release_pattern = DEFAULT_RELEASE_PATTERN;
        }
        let key_count = layout.key_count();
        let debounce = Debouncer::new(key_count, profile.release_pattern);
        Self {
            layout,
            profile,
            pressed: vec![false; key_count],
            debounce,
            queue: RolloverQueue::new(),
            modifiers: 0,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn profile(&self) -> Profile {
        self.profile.clone()
    }

    pub fn set_profile(&mut self, mut profile: Profile) {
        if profile.release_pattern == 0 {
            warn!("release pattern 0 would never confirm releases, using the default");
            profile.release_pattern = DEFAULT_RELEASE_PATTERN;
        }
        self.debounce.set_pattern(profile.release_pattern);
        self.profile = profile;
    }

    pub fn is_pressed(&self, key: crate::types::KeyId) -> bool {
        self.pressed.get(key.index()).copied().unwrap_or(false)
    }

    /// Rebuild the report from current state without changing anything.
    pub fn current_report(&self) -> Report {
        Report::assemble(&self.queue, self.modifiers, &self.layout)
    }

    /// Feed one raw edge. A confirmed press returns the rebuilt report;
    /// everything else returns `None`.
    pub fn on_event(&mut self, event: KeyEvent) -> Option<Report> {
        let key = event.key;
        if key.index() >= self.layout.key_count() {
            warn!(key = key.index(), "edge outside the matrix, dropped");
            return None;
        }
        let def = self.layout.def(key);
        if def == KeyDef::Unused {
            debug!(key = key.index(), "edge on unused position, ignored");
            return None;
        }

        match event.edge {
            Edge::Down => {
                if self.pressed[key.index()] {
                    // Bounce inside the release window: the key never
                    // logically left, so just drop the pending release.
                    self.debounce.cancel(key);
                    return None;
                }
                self.pressed[key.index()] = true;
                self.debounce.cancel(key);
                match def {
                    KeyDef::Modifier(bit) => self.modifiers |= bit,
                    KeyDef::Key(_) => self.queue.push_front(key),
                    KeyDef::Unused => unreachable!("unused positions are filtered above"),
                }
                let (row, col) = self.layout.dims().position(key);
                debug!(row, col, "press confirmed");
                Some(self.current_report())
            }
            Edge::Up => {
                self.debounce.arm(key);
                None
            }
        }
    }

    /// Advance the release timers one step. Each release confirmed by this
    /// sweep rebuilds the report and hands it to `deliver`, in key-id
    /// order.
    pub fn tick(&mut self, mut deliver: impl FnMut(&Report)) {
        let Self {
            layout,
            pressed,
            debounce,
            queue,
            modifiers,
            ..
        } = self;
        debounce.tick(|key| {
            pressed[key.index()] = false;
            match layout.def(key) {
                KeyDef::Modifier(bit) => *modifiers &= !bit,
                KeyDef::Key(_) => {
                    if !queue.remove(key) {
                        // Reachable when the key was evicted by rollover
                        // overflow, or the matrix produced an up edge with
                        // no matching press.
                        let (row, col) = layout.dims().position(key);
                        warn!(row, col, "release confirmed for a key absent from the queue");
                    }
                }
                KeyDef::Unused => {}
            }
            let (row, col) = layout.dims().position(key);
            debug!(row, col, "release confirmed");
            deliver(&Report::assemble(queue, *modifiers, layout));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{
        self, KEY_A, KEY_B, KEY_C, KEY_D, KEY_E, KEY_F, KEY_G, KEY_H, MOD_LEFT_SHIFT,
    };
    use crate::report::NO_KEY;
    use crate::types::{Dimensions, KeyId};

    /// 1x9 strip: one shift, eight letters.
    fn strip_engine() -> Engine {
        let defs = vec![
            KeyDef::Modifier(MOD_LEFT_SHIFT),
            KeyDef::Key(KEY_A),
            KeyDef::Key(KEY_B),
            KeyDef::Key(KEY_C),
            KeyDef::Key(KEY_D),
            KeyDef::Key(KEY_E),
            KeyDef::Key(KEY_F),
            KeyDef::Key(KEY_G),
            KeyDef::Key(KEY_H),
        ];
        let layout = Layout::new(Dimensions::new(1, 9), defs).unwrap();
        Engine::new(layout)
    }

    fn down(engine: &mut Engine, id: u16) -> Option<Report> {
        engine.on_event(KeyEvent::new(KeyId(id), Edge::Down))
    }

    fn up(engine: &mut Engine, id: u16) -> Option<Report> {
        engine.on_event(KeyEvent::new(KeyId(id), Edge::Up))
    }

    fn run_ticks(engine: &mut Engine, n: usize) -> Vec<Report> {
        let mut out = Vec::new();
        for _ in 0..n {
            engine.tick(|r| out.push(*r));
        }
        out
    }

    #[test]
    fn press_is_confirmed_on_the_edge_itself() {
        let mut engine = strip_engine();
        let report = down(&mut engine, 1).expect("press must report immediately");
        assert_eq!(report.keys[0], KEY_A);
        assert!(engine.is_pressed(KeyId(1)));
    }

    #[test]
    fn up_edge_reports_nothing_until_the_window_elapses() {
        let mut engine = strip_engine();
        down(&mut engine, 1);

        assert_eq!(up(&mut engine, 1), None);
        assert!(engine.is_pressed(KeyId(1)), "still held during the window");

        // Seven ticks shift the timer, the eighth confirms.
        assert!(run_ticks(&mut engine, 7).is_empty());
        let reports = run_ticks(&mut engine, 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], Report::empty());
        assert!(!engine.is_pressed(KeyId(1)));
    }

    #[test]
    fn bounce_inside_the_window_keeps_the_key_held() {
        let mut engine = strip_engine();
        let first = down(&mut engine, 1);
        assert!(first.is_some());

        // Release starts bouncing: up, a few ticks, then contact again.
        up(&mut engine, 1);
        assert!(run_ticks(&mut engine, 3).is_empty());
        assert_eq!(down(&mut engine, 1), None, "re-press inside the window is silent");

        // The pending release is gone; the key stays held indefinitely.
        assert!(run_ticks(&mut engine, 32).is_empty());
        assert!(engine.is_pressed(KeyId(1)));
        assert_eq!(engine.current_report().keys[0], KEY_A);
    }

    #[test]
    fn modifier_with_two_letters_then_release_and_overflow() {
        let mut engine = strip_engine();

        // Shift down, then B and C.
        let r = down(&mut engine, 0).unwrap();
        assert_eq!(r.modifiers, MOD_LEFT_SHIFT);
        assert_eq!(r.keys, [NO_KEY; 6]);

        down(&mut engine, 2); // B
        let r = down(&mut engine, 3).unwrap(); // C
        assert_eq!(r.modifiers, MOD_LEFT_SHIFT);
        assert_eq!(r.keys, [KEY_C, KEY_B, NO_KEY, NO_KEY, NO_KEY, NO_KEY]);

        // Release B; after the window the slot closes up.
        up(&mut engine, 2);
        let reports = run_ticks(&mut engine, 8);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].modifiers, MOD_LEFT_SHIFT);
        assert_eq!(reports[0].keys, [KEY_C, NO_KEY, NO_KEY, NO_KEY, NO_KEY, NO_KEY]);

        // Six more presses fill the queue; the sixth evicts C even though
        // it is still held.
        for id in 4..=8 {
            down(&mut engine, id);
        }
        down(&mut engine, 1);
        let report = engine.current_report();
        assert!(!report.keys.contains(&KEY_C));
        assert!(engine.is_pressed(KeyId(3)));
    }

    #[test]
    fn seventh_press_drops_the_oldest_from_the_report() {
        let mut engine = strip_engine();
        for id in 1..=6 {
            down(&mut engine, id);
        }
        let report = engine.current_report();
        assert_eq!(report.keys, [KEY_F, KEY_E, KEY_D, KEY_C, KEY_B, KEY_A]);

        let report = down(&mut engine, 7).unwrap();
        assert_eq!(report.keys, [KEY_G, KEY_F, KEY_E, KEY_D, KEY_C, KEY_B]);
        assert!(engine.is_pressed(KeyId(1)), "evicted key is still physically held");
    }

    #[test]
    fn releasing_an_evicted_key_leaves_the_report_intact() {
        let mut engine = strip_engine();
        for id in 1..=7 {
            down(&mut engine, id);
        }
        let before = engine.current_report();

        // A was evicted by the seventh press; its release has nothing to
        // remove and must change nothing else.
        up(&mut engine, 1);
        let reports = run_ticks(&mut engine, 8);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], before);
        assert!(!engine.is_pressed(KeyId(1)));
    }

    #[test]
    fn duplicate_edges_are_no_ops() {
        let mut engine = strip_engine();
        down(&mut engine, 1);
        let before = engine.current_report();

        assert_eq!(down(&mut engine, 1), None);
        assert_eq!(engine.current_report(), before);

        // Double up just rearms the same timer; one release in total.
        up(&mut engine, 1);
        up(&mut engine, 1);
        let reports = run_ticks(&mut engine, 16);
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn modifier_release_clears_only_its_bit() {
        let mut engine = strip_engine();
        down(&mut engine, 0);
        down(&mut engine, 1);
        up(&mut engine, 0);
        let reports = run_ticks(&mut engine, 8);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].modifiers, 0);
        assert_eq!(reports[0].keys[0], KEY_A);
    }

    #[test]
    fn unused_positions_and_out_of_range_ids_are_ignored() {
        let defs = vec![KeyDef::Key(KEY_A), KeyDef::Unused];
        let layout = Layout::new(Dimensions::new(1, 2), defs).unwrap();
        let mut engine = Engine::new(layout);

        assert_eq!(down(&mut engine, 1), None);
        assert_eq!(up(&mut engine, 1), None);
        assert_eq!(down(&mut engine, 40), None);
        assert!(run_ticks(&mut engine, 16).is_empty());
        assert_eq!(engine.current_report(), Report::empty());
    }

    #[test]
    fn interleaved_sequence_keeps_queue_and_report_consistent() {
        let mut engine = strip_engine();
        down(&mut engine, 1);
        down(&mut engine, 2);
        down(&mut engine, 3);
        up(&mut engine, 2);
        run_ticks(&mut engine, 8);
        down(&mut engine, 4);
        up(&mut engine, 1);
        run_ticks(&mut engine, 8);

        let report = engine.current_report();
        assert_eq!(report.keys, [KEY_D, KEY_C, NO_KEY, NO_KEY, NO_KEY, NO_KEY]);
        assert!(engine.is_pressed(KeyId(3)));
        assert!(engine.is_pressed(KeyId(4)));
        assert!(!engine.is_pressed(KeyId(1)));
        assert!(!engine.is_pressed(KeyId(2)));
    }

    #[test]
    fn custom_release_pattern_shortens_the_window() {
        let mut profile = Profile::default();
        profile.release_pattern = 0x02;
        let layout = keymap::tenkeyless();
        let dims = layout.dims();
        let mut engine = Engine::with_profile(layout, profile);

        let a = dims.key_id(2, 1);
        engine.on_event(KeyEvent::new(a, Edge::Down));
        engine.on_event(KeyEvent::new(a, Edge::Up));
        assert!(run_ticks(&mut engine, 1).is_empty());
        assert_eq!(run_ticks(&mut engine, 1).len(), 1);
    }

    #[test]
    fn zero_release_pattern_falls_back_to_the_default() {
        let mut profile = Profile::default();
        profile.release_pattern = 0;
        let engine = Engine::with_profile(keymap::tenkeyless(), profile);
        assert_eq!(engine.profile().release_pattern, DEFAULT_RELEASE_PATTERN);
    }
}
