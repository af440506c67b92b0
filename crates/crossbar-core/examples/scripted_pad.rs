use anyhow::Result;
use crossbar_core::engine::Engine;
use crossbar_core::keymap;
use crossbar_core::parser;
use crossbar_core::report::{Report, NO_KEY};
use crossbar_core::runtime::{ChannelTransport, ScanRuntime};
use crossbar_core::scan::ScriptedBus;
use crossbar_core::types::IndicatorState;
use std::time::Duration;

const PAD: &str = "\
; two-row macro pad
2x3
esc    a  b
lshift c  enter
";

fn frame(closed: &[(u8, u8)]) -> Vec<u32> {
    let mut samples = vec![0u32; 3];
    for &(row, col) in closed {
        samples[col as usize] |= 1 << row;
    }
    samples
}

fn show(report: &Report) -> String {
    let keys: Vec<&str> = report
        .keys
        .iter()
        .filter(|&&code| code != NO_KEY)
        .map(|&code| keymap::code_name(code).unwrap_or("?"))
        .collect();
    format!("mods {:#04x} keys [{}]", report.modifiers, keys.join(" "))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let layout = parser::parse_keymap(PAD)?;
    let engine = Engine::new(layout);

    // Tap A, then hold shift while tapping C, then let everything go.
    let script = vec![
        frame(&[]),
        frame(&[(0, 1)]),
        frame(&[]),
        frame(&[(1, 0)]),
        frame(&[(1, 0), (1, 1)]),
        frame(&[(1, 0)]),
        frame(&[]),
    ];
    let bus = ScriptedBus::new(script);
    let lamps = bus.indicators();

    let (transport, reports, indicators) = ChannelTransport::new(32);
    indicators.send(IndicatorState::new(IndicatorState::CAPS_LOCK))?;

    let runtime = ScanRuntime::spawn(engine, bus, transport);
    while let Ok(report) = reports.recv_timeout(Duration::from_millis(200)) {
        println!("{}", show(&report));
    }
    runtime.shutdown();

    if let Some(state) = *lamps.lock() {
        println!(
            "lamps: caps={} num={} scroll={}",
            state.caps_lock(),
            state.num_lock(),
            state.scroll_lock()
        );
    }
    Ok(())
}
