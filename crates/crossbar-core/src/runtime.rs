use crate::engine::Engine;
use crate::report::Report;
use crate::scan::{MatrixBus, MatrixScanner};
use crate::types::IndicatorState;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Where finished reports go. Delivery is fire and forget: a transport that
/// cannot take a report drops it without disturbing key state.
pub trait Transport: Send {
    fn deliver(&mut self, report: &Report);

    /// Latest status lamp state from the host, if any arrived. Polled once
    /// per scan pass and forwarded to the bus.
    fn indicators(&mut self) -> Option<IndicatorState> {
        None
    }
}

impl<F> Transport for F
where
    F: FnMut(&Report) + Send,
{
    fn deliver(&mut self, report: &Report) {
        self(report)
    }
}

/// Channel-backed transport for tests and host-side consumers. Reports go
/// out over a bounded channel; indicator state comes back over another.
pub struct ChannelTransport {
    reports: Sender<Report>,
    indicators: Receiver<IndicatorState>,
}

impl ChannelTransport {
    /// Returns the transport plus the host ends: a receiver for reports
    /// and a sender for indicator state.
    pub fn new(capacity: usize) -> (Self, Receiver<Report>, Sender<IndicatorState>) {
        let (report_tx, report_rx) = bounded(capacity);
        let (indicator_tx, indicator_rx) = bounded(capacity);
        (
            Self {
                reports: report_tx,
                indicators: indicator_rx,
            },
            report_rx,
            indicator_tx,
        )
    }
}

impl Transport for ChannelTransport {
    fn deliver(&mut self, report: &Report) {
        if self.reports.try_send(*report).is_err() {
            debug!("report dropped, receiver full or gone");
        }
    }

    fn indicators(&mut self) -> Option<IndicatorState> {
        // Bursts collapse to the latest state.
        let mut latest = None;
        while let Ok(state) = self.indicators.try_recv() {
            latest = Some(state);
        }
        latest
    }
}

/// Owns the two threads of the pipeline: the scan loop walking the matrix
/// and the tick thread sweeping the release timers. Both share the engine
/// behind a mutex and hold it only while updating key state.
pub struct ScanRuntime {
    engine: Arc<Mutex<Engine>>,
    running: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    scan_thread: Option<JoinHandle<()>>,
    tick_thread: Option<JoinHandle<()>>,
}

impl ScanRuntime {
    pub fn spawn<B, T>(engine: Engine, bus: B, transport: T) -> Self
    where
        B: MatrixBus + Send + 'static,
        T: Transport + 'static,
    {
        let profile = engine.profile();
        let dims = engine.layout().dims();
        let engine = Arc::new(Mutex::new(engine));
        let transport = Arc::new(Mutex::new(transport));
        let running = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let scan_interval = Duration::from_millis(profile.scan_interval_ms);
        let scan_thread = {
            let engine = Arc::clone(&engine);
            let transport = Arc::clone(&transport);
            let running = Arc::clone(&running);
            let mut bus = bus;
            thread::spawn(move || {
                let mut scanner = MatrixScanner::new(dims);
                info!(rows = dims.rows, cols = dims.cols, "scan loop started");
                while running.load(Ordering::Relaxed) {
                    scanner.scan(&mut bus, |event| {
                        let report = engine.lock().on_event(event);
                        if let Some(report) = report {
                            transport.lock().deliver(&report);
                        }
                    });
                    let state = transport.lock().indicators();
                    if let Some(state) = state {
                        bus.set_indicators(state);
                    }
                    if !scan_interval.is_zero() {
                        thread::sleep(scan_interval);
                    }
                }
                info!("scan loop stopped");
            })
        };

        let tick_interval = Duration::from_millis(profile.tick_interval_ms.max(1));
        let tick_thread = {
            let engine = Arc::clone(&engine);
            let transport = Arc::clone(&transport);
            thread::spawn(move || {
                let ticker = tick(tick_interval);
                info!(interval_ms = tick_interval.as_millis() as u64, "release sweep started");
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            let mut engine = engine.lock();
                            engine.tick(|report| transport.lock().deliver(report));
                        }
                        recv(stop_rx) -> _ => break,
                    }
                }
                info!("release sweep stopped");
            })
        };

        Self {
            engine,
            running,
            stop_tx: Some(stop_tx),
            scan_thread: Some(scan_thread),
            tick_thread: Some(tick_thread),
        }
    }

    /// Shared handle to the engine, for inspection from the host side.
    pub fn engine(&self) -> Arc<Mutex<Engine>> {
        Arc::clone(&self.engine)
    }

    /// Stop both threads and wait for them.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.scan_thread.is_none() && self.tick_thread.is_none() {
            return;
        }
        self.running.store(false, Ordering::Relaxed);
        self.stop_tx.take();
        if let Some(handle) = self.scan_thread.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.tick_thread.take() {
            let _ = handle.join();
        }
        info!("scan runtime stopped");
    }
}

impl Drop for ScanRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}
