//! Progress bar over a list of items.
//!
//! [`Progress::run`] drives the bar itself, calling a fallible callback per
//! item. [`ProgressBar`] is the manual form for work that does not fit a
//! single loop.
//!
//! Neither form reads keys, so raw mode is never entered. Instead an
//! interrupt guard is held while the bar is shown: Ctrl-C marks the bar as
//! interrupted and shows the cursor straight away, and the bar is cancelled
//! as soon as the current item finishes.

use promptkit_core::{
    BoxError, Frame, InterruptGuard, PromptError, PromptResult, PromptState, RenderEngine,
    Terminal,
};

use crate::theme::{self, BoxStyle};

type ItemLabelFn<T> = Box<dyn Fn(&T) -> String>;

/// Runs a callback over every item while showing a progress bar.
///
/// ```no_run
/// use promptkit::Progress;
///
/// let sizes = Progress::new("Measuring files", vec!["a.txt", "b.txt"])?
///     .with_item_label(|path| path.to_string())
///     .run(|path| Ok(std::fs::metadata(path)?.len()))?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
pub struct Progress<T> {
    label: String,
    items: Vec<T>,
    item_label: Option<ItemLabelFn<T>>,
}

impl<T> Progress<T> {
    /// Fails with [`PromptError::InvalidConfiguration`] when `items` is empty.
    pub fn new(label: impl Into<String>, items: impl IntoIterator<Item = T>) -> PromptResult<Self> {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Err(PromptError::InvalidConfiguration(
                "progress bar must have at least one item".to_string(),
            ));
        }
        Ok(Self {
            label: label.into(),
            items,
            item_label: None,
        })
    }

    /// Describe each item under the bar once it has been processed.
    pub fn with_item_label<F>(mut self, item_label: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.item_label = Some(Box::new(item_label));
        self
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn run<R, F>(self, callback: F) -> PromptResult<Vec<R>>
    where
        F: FnMut(T) -> Result<R, BoxError>,
    {
        crate::with_native_terminal(|terminal| self.run_on(terminal, callback))
    }

    /// Call `callback` on every item in order and collect the results.
    ///
    /// A callback error is drawn under the bar, the terminal is restored and
    /// the error is returned as [`PromptError::Callback`]. An interrupt
    /// returns [`PromptError::Cancelled`] after the current item.
    pub fn run_on<R, F>(self, terminal: &Terminal, mut callback: F) -> PromptResult<Vec<R>>
    where
        F: FnMut(T) -> Result<R, BoxError>,
    {
        let mut bar = ProgressBar::start(terminal, &self.label, self.items.len())?;
        let mut results = Vec::with_capacity(self.items.len());

        for item in self.items {
            let label = self.item_label.as_ref().map(|f| f(&item)).unwrap_or_default();
            match callback(item) {
                Ok(result) => results.push(result),
                Err(e) => return Err(bar.fail(e)),
            }
            bar.advance(label)?;
        }

        bar.finish()?;
        Ok(results)
    }
}

/// A progress bar advanced by hand.
///
/// Dropping the bar without calling [`ProgressBar::finish`] still shows the
/// cursor and releases the interrupt guard.
pub struct ProgressBar<'t> {
    label: String,
    total: usize,
    progress: usize,
    item_label: String,
    state: PromptState,
    error: Option<String>,
    width: usize,
    engine: RenderEngine<'t>,
    interrupt: InterruptGuard,
}

impl<'t> ProgressBar<'t> {
    /// Hide the cursor and draw an empty bar.
    pub fn start(terminal: &'t Terminal, label: &str, total: usize) -> PromptResult<Self> {
        if total == 0 {
            return Err(PromptError::InvalidConfiguration(
                "progress bar must have at least one item".to_string(),
            ));
        }
        let interrupt = terminal.input().interrupt_guard()?;
        let width = terminal.width();
        let mut bar = Self {
            label: label.to_string(),
            total,
            progress: 0,
            item_label: String::new(),
            state: PromptState::Active,
            error: None,
            width,
            engine: RenderEngine::new(terminal.output()).with_width(width),
            interrupt,
        };
        bar.render()?;
        Ok(bar)
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Completed fraction between 0 and 1.
    pub fn percentage(&self) -> f64 {
        self.progress as f64 / self.total as f64
    }

    /// Count one more item done and show `item_label` under the bar.
    ///
    /// Returns [`PromptError::Cancelled`] if an interrupt arrived since the
    /// last call.
    pub fn advance(&mut self, item_label: impl Into<String>) -> PromptResult<()> {
        self.progress = (self.progress + 1).min(self.total);
        self.item_label = item_label.into();
        if self.interrupt.is_interrupted() {
            log::debug!("progress interrupted at {}/{}", self.progress, self.total);
            self.state = PromptState::Cancelled;
            self.render()?;
            self.engine.restore()?;
            return Err(PromptError::Cancelled);
        }
        self.render()
    }

    /// Draw the completed bar and show the cursor.
    pub fn finish(mut self) -> PromptResult<()> {
        self.state = PromptState::Submitted;
        self.render()?;
        self.engine.restore()?;
        Ok(())
    }

    /// Draw `error` under the bar, show the cursor, and return it as a
    /// callback failure.
    pub fn fail(&mut self, error: BoxError) -> PromptError {
        let error = PromptError::Callback(error);
        log::debug!("progress failed: {error}");
        self.state = PromptState::Errored;
        self.error = Some(error.to_string());
        if let Err(e) = self.render().and_then(|_| Ok(self.engine.restore()?)) {
            log::warn!("could not draw progress error: {e}");
        }
        error
    }

    fn render(&mut self) -> PromptResult<()> {
        let frame = self.frame();
        self.engine.render_frame(&frame)?;
        Ok(())
    }

    fn frame(&self) -> Frame {
        let info = format!("{}/{}", self.progress, self.total);
        let style = BoxStyle::new(&self.label, self.state, self.width)
            .with_info(&info)
            .with_error(self.error.is_some());

        let filled = style.width * self.progress / self.total;
        let bar = format!(
            "{}{}",
            theme::cyan(&"█".repeat(filled)),
            theme::dim(&"░".repeat(style.width - filled))
        );

        let mut frame = Frame::from_lines(style.draw(&[bar]));
        if let Some(footer) = theme::footer(
            self.state,
            self.error.as_deref(),
            promptkit_core::prompt::DEFAULT_CANCEL_MESSAGE,
            &self.item_label,
        ) {
            frame.push(footer);
        }
        frame
    }
}
