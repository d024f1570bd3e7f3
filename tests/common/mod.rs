//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires an [`EventThread`] to a recording
//! command interpreter and a fake output subsystem, plus a small 2x2 menu.

#![allow(dead_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use menunav::{
    CommandInterpreter, DemuxContext, DemuxLock, EsCategory, EsId, EsOut, EsOutError,
    EventThread, MouseSink, NavConfig, SPRM_SELECTED_BUTTON,
};
use menunav_pci::{Button, ButtonGeometry, HighlightDescriptor, PciSnapshot};

/// One interpreter call, in the order the worker made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetSprm(u16, u16),
    Interpret([u8; 8]),
}

/// Observable state of [`RecordingInterpreter`].
#[derive(Debug, Default)]
pub struct VmState {
    pub selected: u16,
    pub calls: Vec<Call>,
    /// Name of the thread that made the last `interpret` call.
    pub last_thread: Option<String>,
}

impl VmState {
    pub fn interpret_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Interpret(_)))
            .count()
    }
}

/// Interpreter that records every call into a shared [`VmState`].
pub struct RecordingInterpreter {
    state: Arc<Mutex<VmState>>,
}

impl CommandInterpreter for RecordingInterpreter {
    fn get_sprm(&self, index: u16) -> u16 {
        if index == SPRM_SELECTED_BUTTON {
            self.state.lock().selected
        } else {
            0
        }
    }

    fn set_sprm(&mut self, index: u16, value: u16) {
        let mut state = self.state.lock();
        if index == SPRM_SELECTED_BUTTON {
            state.selected = value;
        }
        state.calls.push(Call::SetSprm(index, value));
    }

    fn interpret(&mut self, commands: &[u8; 8]) {
        let mut state = self.state.lock();
        state.calls.push(Call::Interpret(*commands));
        state.last_thread = thread::current().name().map(str::to_string);
    }
}

type SubscribeHook = Box<dyn Fn(EsId) + Send + Sync>;

/// Output subsystem that keeps mouse sinks and records highlight pushes.
#[derive(Default)]
pub struct FakeOutput {
    sinks: Mutex<Vec<(EsId, MouseSink)>>,
    highlights: Mutex<Vec<(EsId, HighlightDescriptor)>>,
    refuse: Mutex<bool>,
    on_subscribe: Mutex<Option<SubscribeHook>>,
}

impl FakeOutput {
    /// Run `hook` inside every following mouse subscription, before it is
    /// accepted or refused.
    pub fn on_subscribe(&self, hook: impl Fn(EsId) + Send + Sync + 'static) {
        *self.on_subscribe.lock() = Some(Box::new(hook));
    }

    /// Make every following mouse subscription fail.
    pub fn refuse_subscriptions(&self) {
        *self.refuse.lock() = true;
    }

    pub fn sink(&self, es: EsId) -> Option<MouseSink> {
        self.sinks
            .lock()
            .iter()
            .find(|(id, _)| *id == es)
            .map(|(_, sink)| sink.clone())
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn highlights(&self) -> Vec<(EsId, HighlightDescriptor)> {
        self.highlights.lock().clone()
    }
}

impl EsOut for FakeOutput {
    fn subscribe_mouse(&self, es: EsId, sink: MouseSink) -> Result<(), EsOutError> {
        if let Some(hook) = self.on_subscribe.lock().as_ref() {
            hook(es);
        }
        if *self.refuse.lock() {
            return Err(EsOutError::new("no video output"));
        }
        self.sinks.lock().push((es, sink));
        Ok(())
    }

    fn set_highlight(&self, es: EsId, highlight: &HighlightDescriptor) {
        self.highlights.lock().push((es, *highlight));
    }
}

/// An [`EventThread`] with recording collaborators.
pub struct TestHarness {
    pub demux: DemuxLock,
    pub vm: Arc<Mutex<VmState>>,
    pub output: Arc<FakeOutput>,
    pub events: Arc<EventThread>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(NavConfig::default())
    }

    pub fn with_config(config: NavConfig) -> Self {
        let vm = Arc::new(Mutex::new(VmState::default()));
        let demux = Arc::new(Mutex::new(DemuxContext::with_interpreter(
            RecordingInterpreter {
                state: Arc::clone(&vm),
            },
        )));
        let output = Arc::new(FakeOutput::default());
        let events = Arc::new(EventThread::new(
            Arc::clone(&demux),
            output.clone(),
            &config,
        ));

        Self {
            demux,
            vm,
            output,
            events,
        }
    }

    /// Register one video and one subtitle stream and load [`menu`].
    pub fn started() -> Self {
        let harness = Self::new();
        harness
            .events
            .register_stream(VIDEO, EsCategory::Video)
            .unwrap();
        harness
            .events
            .register_stream(SUBTITLE, EsCategory::Subtitle)
            .unwrap();
        harness.events.update(&menu_packet()).unwrap();
        harness
    }

    pub fn select(&self, button: u16) {
        self.vm.lock().selected = button;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.vm.lock().calls.clone()
    }

    /// Wait until the interpreter has seen `n` interpret calls.
    pub fn wait_for_interprets(&self, n: usize) {
        assert!(
            eventually(|| self.vm.lock().interpret_count() >= n),
            "worker did not reach {n} interpret calls: {:?}",
            self.calls()
        );
    }
}

pub const VIDEO: EsId = EsId(1);
pub const SUBTITLE: EsId = EsId(2);

/// Poll `check` until it holds or five seconds pass.
pub fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    check()
}

/// A 2x2 menu of 100x50 buttons:
///
/// ```text
/// 1 2
/// 3 4
/// ```
///
/// Neighbours follow the grid. Button 2 auto-activates. Each button's
/// command is eight copies of its index.
pub fn menu() -> PciSnapshot {
    let button = |index: u8, col: u16, row: u16| Button {
        index,
        geometry: ButtonGeometry {
            x_start: col * 100,
            x_end: col * 100 + 99,
            y_start: row * 50,
            y_end: row * 50 + 49,
        },
        up: if row == 1 { index - 2 } else { 0 },
        down: if row == 0 { index + 2 } else { 0 },
        left: if col == 1 { index - 1 } else { 0 },
        right: if col == 0 { index + 1 } else { 0 },
        auto_action: index == 2,
        command: [index; 8],
        color_index: 1,
    };

    PciSnapshot {
        color_table: [[0x1234_FFFF, 0x5678_F0F0], [0; 2], [0; 2]],
        buttons: vec![
            button(1, 0, 0),
            button(2, 1, 0),
            button(3, 0, 1),
            button(4, 1, 1),
        ],
        ..Default::default()
    }
}

pub fn menu_packet() -> Vec<u8> {
    menu().to_bytes().to_vec()
}
