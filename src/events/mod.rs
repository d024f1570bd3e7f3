//! Navigation event thread.
//!
//! [`EventThread`] owns the live PCI snapshot, the stream registry and a FIFO
//! of pending [`NavEvent`]s, all behind one session lock. The demuxer control
//! path pushes key queries, the output subsystem pushes pointer changes
//! through a [`MouseSink`], and a single background worker drains the queue.
//!
//! # Locking
//!
//! The session lock is held only while the queue or registry is touched. The
//! worker releases it before taking the demuxer-wide lock to reach the
//! command interpreter or the overlay output, and takes it back afterwards.
//! Producers may therefore push while holding the demuxer-wide lock.
//!
//! # Example
//!
//! ```rust,ignore
//! let events = EventThread::new(demux_lock, es_out, &NavConfig::default());
//! events.register_stream(EsId(1), EsCategory::Video)?;
//! events.register_stream(EsId(2), EsCategory::Subtitle)?;
//! events.update(&pci_packet)?;
//! events.submit_nav_query(NavQuery::Down)?;
//! ```

pub mod dispatch;
pub mod queue;
pub mod registry;

pub use dispatch::{click, navigate, Click, KeyOutcome};
pub use queue::{MouseButtons, MouseSample, NavEvent, NavQuery};
pub use registry::{StreamKey, StreamRegistration, StreamRegistry};

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use menunav_pci::{ColorResolver, PciSnapshot, PlaceholderColors};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use crate::config::NavConfig;
use crate::error::{NavError, Result};
use crate::host::{DemuxLock, EsCategory, EsId, EsOut};

use dispatch::Dispatcher;

/// Outcome of [`EventThread::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PciUpdate {
    /// The snapshot was installed; the worker is running.
    Applied,
    /// No stream is registered, so there is nothing to highlight on.
    NoStreams,
    /// The packet could not be decoded; the previous snapshot stays live.
    Malformed,
}

/// State guarded by the session lock.
#[derive(Default)]
pub(crate) struct Session {
    pub(crate) pending: VecDeque<NavEvent>,
    pub(crate) streams: StreamRegistry,
    pub(crate) pci: Option<Arc<PciSnapshot>>,
    /// Bumped by every reset; a worker stops once it no longer matches.
    generation: u64,
    running: bool,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    fn aborted(&self, generation: u64) -> bool {
        self.generation != generation
    }
}

#[derive(Default)]
pub(crate) struct Shared {
    session: Mutex<Session>,
    wait: Condvar,
}

/// Pointer callback handed to the output subsystem for one video stream.
///
/// The sink holds no reference into the registry; its [`StreamKey`] is
/// resolved on every call, so samples for a stream that has been
/// unregistered are dropped.
#[derive(Clone)]
pub struct MouseSink {
    shared: Weak<Shared>,
    stream: StreamKey,
}

impl MouseSink {
    /// The registry key this sink reports for.
    pub fn stream(&self) -> StreamKey {
        self.stream
    }

    /// Report a new pointer state.
    ///
    /// Returns `true` when a mouse event was queued for the worker.
    pub fn on_sample(&self, new: MouseSample) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };

        let mut session = shared.session.lock();
        let running = session.running;
        let Some(entry) = session.streams.get_mut(self.stream) else {
            return false;
        };

        let old = std::mem::replace(&mut entry.mouse, new);
        if !running {
            return false;
        }

        session.pending.push_back(NavEvent::Mouse {
            stream: self.stream,
            old,
            new,
        });
        shared.wait.notify_one();
        true
    }

    /// Forget the remembered pointer state, e.g. when the video output
    /// is recreated.
    pub fn reset(&self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        let mut session = shared.session.lock();
        if let Some(entry) = session.streams.get_mut(self.stream) {
            entry.mouse = MouseSample::default();
        }
    }
}

impl std::fmt::Debug for MouseSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MouseSink")
            .field("stream", &self.stream)
            .finish()
    }
}

/// Menu navigation session for one demuxer.
pub struct EventThread {
    shared: Arc<Shared>,
    dispatcher: Arc<Dispatcher>,
    es_out: Arc<dyn EsOut>,
    thread_name: String,
}

impl EventThread {
    /// Create a stopped session.
    ///
    /// Highlight colours are resolved with the configured placeholder entry
    /// until [`with_color_resolver`](Self::with_color_resolver) installs a
    /// real colour table.
    pub fn new(demux: DemuxLock, es_out: Arc<dyn EsOut>, config: &NavConfig) -> Self {
        let colors: Arc<dyn ColorResolver> =
            Arc::new(PlaceholderColors::new(config.highlight.placeholder_clut));

        Self {
            shared: Arc::new(Shared::default()),
            dispatcher: Arc::new(Dispatcher::new(demux, Arc::clone(&es_out), colors)),
            es_out,
            thread_name: config.events.thread_name.clone(),
        }
    }

    /// Resolve highlight colours through `colors`.
    pub fn with_color_resolver(mut self, colors: Arc<dyn ColorResolver>) -> Self {
        self.dispatcher = Arc::new(self.dispatcher.with_colors(colors));
        self
    }

    /// Install a new PCI packet and start the worker if needed.
    ///
    /// Does nothing while no stream is registered. Only a failure to start
    /// the worker thread is an error.
    pub fn update(&self, raw: &[u8]) -> Result<PciUpdate> {
        let mut session = self.shared.session.lock();

        if session.streams.is_empty() {
            debug!("Ignoring PCI update: no elementary streams registered");
            return Ok(PciUpdate::NoStreams);
        }

        let snapshot = match PciSnapshot::parse(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Dropping malformed PCI packet");
                return Ok(PciUpdate::Malformed);
            }
        };

        if !session.running {
            let generation = session.generation;
            let shared = Arc::clone(&self.shared);
            let dispatcher = Arc::clone(&self.dispatcher);
            let handle = thread::Builder::new()
                .name(self.thread_name.clone())
                .spawn(move || run(shared, dispatcher, generation))
                .map_err(NavError::Spawn)?;

            session.worker = Some(handle);
            session.running = true;
        }

        debug!(buttons = snapshot.button_count(), "Installed PCI snapshot");
        session.pci = Some(Arc::new(snapshot));
        Ok(PciUpdate::Applied)
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Option<Arc<PciSnapshot>> {
        self.shared.session.lock().pci.clone()
    }

    /// Stop the worker, drop queued events and forget the snapshot.
    ///
    /// Blocks until the worker has exited, unless called from the worker
    /// itself, in which case the worker exits after its current event. No
    /// lock is held while joining, so a new session may be started by
    /// another thread in the meantime.
    pub fn reset(&self) {
        let worker = {
            let mut session = self.shared.session.lock();
            session.generation = session.generation.wrapping_add(1);
            session.running = false;
            session.pending.clear();
            session.pci = None;
            self.shared.wait.notify_all();
            session.worker.take()
        };

        let Some(handle) = worker else {
            return;
        };

        if handle.thread().id() == thread::current().id() {
            warn!("Navigation reset requested from the event thread; not joining");
            return;
        }

        if handle.join().is_err() {
            warn!("Navigation event thread panicked");
        }
    }

    /// Whether navigation events are currently accepted.
    pub fn is_running(&self) -> bool {
        self.shared.session.lock().running
    }

    /// Queue a key navigation query for the worker.
    pub fn submit_nav_query(&self, query: NavQuery) -> Result<()> {
        let mut session = self.shared.session.lock();
        if !session.running {
            return Err(NavError::NotRunning);
        }

        session.pending.push_back(NavEvent::Nav(query));
        self.shared.wait.notify_one();
        Ok(())
    }

    /// Number of events waiting for the worker.
    pub fn pending_events(&self) -> usize {
        self.shared.session.lock().pending.len()
    }

    /// Track a new elementary stream.
    ///
    /// Video streams are also subscribed to pointer events; if the output
    /// subsystem refuses, the stream is not registered. Until the
    /// subscription completes the stream is reserved but invisible, so a
    /// concurrent [`update`](Self::update) does not count it.
    pub fn register_stream(&self, es: EsId, category: EsCategory) -> Result<StreamKey> {
        if category != EsCategory::Video {
            let key = self.shared.session.lock().streams.insert(es, category);
            debug!(es = %es, ?category, "Registered elementary stream");
            return Ok(key);
        }

        let key = self.shared.session.lock().streams.reserve(es, category);
        let sink = MouseSink {
            shared: Arc::downgrade(&self.shared),
            stream: key,
        };

        if let Err(source) = self.es_out.subscribe_mouse(es, sink) {
            warn!(es = %es, error = %source, "Unable to subscribe to mouse events");
            self.shared.session.lock().streams.remove(key);
            return Err(NavError::Subscribe { es, source });
        }

        if !self.shared.session.lock().streams.activate(key) {
            debug!(es = %es, "Stream removed while subscribing");
        }

        debug!(es = %es, ?category, "Registered elementary stream");
        Ok(key)
    }

    /// Stop tracking a stream. Returns whether it was registered.
    pub fn unregister_stream(&self, es: EsId) -> bool {
        let removed = self.shared.session.lock().streams.remove_es(es).is_some();
        if removed {
            debug!(es = %es, "Unregistered elementary stream");
        }
        removed
    }

    /// Number of registered streams.
    pub fn stream_count(&self) -> usize {
        self.shared.session.lock().streams.len()
    }
}

impl Drop for EventThread {
    fn drop(&mut self) {
        self.reset();
        self.shared.session.lock().streams.clear();
    }
}

/// Worker loop: wait for events, drain them in order, exit once the session
/// it was started for has been reset.
fn run(shared: Arc<Shared>, dispatcher: Arc<Dispatcher>, generation: u64) {
    info!(generation, "Navigation event thread started");

    let mut session = shared.session.lock();
    loop {
        while !session.aborted(generation) && session.pending.is_empty() {
            shared.wait.wait(&mut session);
        }

        if session.aborted(generation) {
            break;
        }

        while let Some(event) = session.pending.pop_front() {
            dispatcher.dispatch(&mut session, event);
            if session.aborted(generation) {
                break;
            }
        }
    }
    drop(session);

    info!("Navigation event thread stopped");
}
