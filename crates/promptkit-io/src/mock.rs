//! Mock console implementations for testing

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use promptkit_core::{
    ansi, ClearType, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, Frame,
    InterruptGuard, KeyDecoder, KeyToken, RawModeGuard,
};

fn lock<T>(mutex: &Mutex<T>) -> ConsoleResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| ConsoleError::Terminal("mock console state poisoned".to_string()))
}

/// Scripted console input.
///
/// Keys are delivered in batches, one batch per `read_keys` call. Once the
/// script is exhausted `read_keys` reports closed input. Clones share the same
/// script, so a test can keep a handle to push keys or trigger interrupts
/// while a prompt owns the other.
#[derive(Clone)]
pub struct MockConsoleInput {
    batches: Arc<Mutex<VecDeque<Vec<KeyToken>>>>,
    window_size: Arc<Mutex<(u16, u16)>>,
    interrupted: Arc<AtomicBool>,
    raw_mode_active: Arc<AtomicBool>,
    raw_mode_entries: Arc<AtomicUsize>,
}

impl Default for MockConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsoleInput {
    pub fn new() -> Self {
        Self {
            batches: Arc::new(Mutex::new(VecDeque::new())),
            window_size: Arc::new(Mutex::new((
                promptkit_core::console::DEFAULT_TERMINAL_WIDTH as u16,
                promptkit_core::console::DEFAULT_TERMINAL_HEIGHT as u16,
            ))),
            interrupted: Arc::new(AtomicBool::new(false)),
            raw_mode_active: Arc::new(AtomicBool::new(false)),
            raw_mode_entries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Input that delivers each key as its own batch.
    pub fn with_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = KeyToken>,
    {
        let input = Self::new();
        for key in keys {
            input.queue_batch(vec![key]);
        }
        input
    }

    pub fn with_window_size(self, cols: u16, rows: u16) -> Self {
        self.set_window_size(cols, rows);
        self
    }

    pub fn queue_key(&self, key: impl Into<KeyToken>) {
        self.queue_batch(vec![key.into()]);
    }

    /// Queue keys delivered together by a single read.
    pub fn queue_batch(&self, keys: Vec<KeyToken>) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push_back(keys);
        }
    }

    /// Queue each character of `text` as a separate key.
    pub fn queue_text(&self, text: &str) {
        for c in text.chars() {
            self.queue_key(c);
        }
    }

    /// Decode raw terminal bytes and queue the resulting keys as one batch.
    pub fn queue_bytes(&self, bytes: &[u8]) {
        let mut decoder = KeyDecoder::new();
        let mut keys = decoder.feed(bytes);
        keys.extend(decoder.flush());
        if !keys.is_empty() {
            self.queue_batch(keys);
        }
    }

    pub fn remaining_batches(&self) -> usize {
        self.batches.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn set_window_size(&self, cols: u16, rows: u16) {
        if let Ok(mut size) = self.window_size.lock() {
            *size = (cols, rows);
        }
    }

    /// Simulate SIGINT arriving inside an interrupt guard.
    pub fn trigger_interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn is_raw_mode_active(&self) -> bool {
        self.raw_mode_active.load(Ordering::SeqCst)
    }

    /// How many times raw mode has been entered.
    pub fn raw_mode_entries(&self) -> usize {
        self.raw_mode_entries.load(Ordering::SeqCst)
    }
}

impl ConsoleInput for MockConsoleInput {
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        let was_active = self.raw_mode_active.swap(true, Ordering::SeqCst);
        self.raw_mode_entries.fetch_add(1, Ordering::SeqCst);
        let active = Arc::clone(&self.raw_mode_active);
        // Nested prompts re-enter raw mode; only the outermost guard leaves it.
        Ok(RawModeGuard::new(
            move || active.store(was_active, Ordering::SeqCst),
            "Mock",
        ))
    }

    fn read_keys(&self) -> ConsoleResult<Option<Vec<KeyToken>>> {
        Ok(lock(&self.batches)?.pop_front())
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(*lock(&self.window_size)?)
    }

    fn interrupt_guard(&self) -> ConsoleResult<InterruptGuard> {
        let flag = Arc::clone(&self.interrupted);
        Ok(InterruptGuard::new(Arc::clone(&self.interrupted), move || {
            flag.store(false, Ordering::SeqCst)
        }))
    }
}

#[derive(Debug)]
struct OutputState {
    text: String,
    cursor_visible: bool,
    frames: Vec<Frame>,
    flushes: usize,
}

/// Console output that records everything written to it.
///
/// Output is recorded as the ANSI text a real terminal would receive.
#[derive(Clone)]
pub struct MockConsoleOutput {
    state: Arc<Mutex<OutputState>>,
}

impl Default for MockConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsoleOutput {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(OutputState {
                text: String::new(),
                cursor_visible: true,
                frames: Vec::new(),
                flushes: 0,
            })),
        }
    }

    /// Everything written so far, escape sequences included.
    pub fn output(&self) -> String {
        self.state.lock().map(|s| s.text.clone()).unwrap_or_default()
    }

    /// Written text with escape sequences removed.
    pub fn plain_output(&self) -> String {
        promptkit_core::SafeTextFilter::strip(&self.output())
    }

    pub fn clear_output(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.text.clear();
        }
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.state.lock().map(|s| s.cursor_visible).unwrap_or(true)
    }

    /// Every frame rendered, in order.
    pub fn frames(&self) -> Vec<Frame> {
        self.state.lock().map(|s| s.frames.clone()).unwrap_or_default()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.state.lock().ok().and_then(|s| s.frames.last().cloned())
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().map(|s| s.flushes).unwrap_or(0)
    }

    fn write(&self, text: &str) -> ConsoleResult<()> {
        lock(&self.state)?.text.push_str(text);
        Ok(())
    }
}

impl ConsoleOutput for MockConsoleOutput {
    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        self.write(text)
    }

    fn move_cursor_relative(&self, row_delta: i16, col_delta: i16) -> ConsoleResult<()> {
        self.write(&ansi::move_relative(row_delta, col_delta))
    }

    fn clear(&self, clear_type: ClearType) -> ConsoleResult<()> {
        self.write(ansi::clear(clear_type))
    }

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
        let mut state = lock(&self.state)?;
        state.cursor_visible = visible;
        state.text.push_str(ansi::cursor_visibility(visible));
        Ok(())
    }

    fn flush(&self) -> ConsoleResult<()> {
        lock(&self.state)?.flushes += 1;
        Ok(())
    }

    fn record_frame(&self, frame: &Frame) {
        if let Ok(mut state) = self.state.lock() {
            state.frames.push(frame.clone());
        }
    }
}
