use crate::command::{Command, Effect};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Messages processed per wake-up before the loop yields back to `select!`.
const MAX_BATCH: usize = 100;
/// How long a wake-up keeps draining queued messages.
const BATCH_WINDOW: Duration = Duration::from_micros(100);

/// Where the interface is drawn.
///
/// Draw on [`Stderr`](OutputTarget::Stderr) when stdout carries data, for
/// example the value of the coupon the user picked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

impl OutputTarget {
    fn writer(self) -> Box<dyn Write + Send> {
        match self {
            OutputTarget::Stdout => Box::new(io::stdout()),
            OutputTarget::Stderr => Box::new(io::stderr()),
        }
    }
}

type Backend = CrosstermBackend<Box<dyn Write + Send>>;

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Terminal setup, drawing or teardown failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Terminal and loop settings for a [`Program`].
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     focus_reporting: true,
///     output: OutputTarget::Stderr,
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Redraw rate cap, clamped to 1..=120. Default 60.
    pub fps: u32,
    /// Draw on the alternate screen. Default true.
    pub alt_screen: bool,
    /// Deliver pastes as a single event. Default true.
    pub bracketed_paste: bool,
    /// Report terminal focus gained/lost. Default false.
    pub focus_reporting: bool,
    /// Restore the terminal before a panic message is printed. Default true.
    pub catch_panics: bool,
    /// Stop on a ctrl-c signal that bypasses raw mode. Default true.
    pub handle_signals: bool,
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            bracketed_paste: true,
            focus_reporting: false,
            catch_panics: true,
            handle_signals: true,
            output: OutputTarget::Stdout,
        }
    }
}

/// Terminal modes entered for one program run.
///
/// Leaving happens exactly once: explicitly through
/// [`leave`](TerminalSession::leave), or on drop if the program is dropped
/// without running to completion.
struct TerminalSession {
    alt_screen: bool,
    output: OutputTarget,
    active: bool,
}

impl TerminalSession {
    fn enter(options: &ProgramOptions) -> Result<(Self, Terminal<Backend>), ProgramError> {
        if options.catch_panics {
            install_panic_hook(options.alt_screen, options.output);
        }

        enable_raw_mode()?;
        let session = TerminalSession {
            alt_screen: options.alt_screen,
            output: options.output,
            active: true,
        };

        let mut writer = options.output.writer();
        if options.alt_screen {
            execute!(writer, EnterAlternateScreen)?;
        }
        if options.bracketed_paste {
            execute!(writer, EnableBracketedPaste)?;
        }
        if options.focus_reporting {
            execute!(writer, EnableFocusChange)?;
        }
        execute!(writer, cursor::Hide)?;

        let terminal = Terminal::new(CrosstermBackend::new(writer))?;
        Ok((session, terminal))
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        reset_terminal(self.alt_screen, self.output)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Undo every mode the session may have entered. Keeps going after a
/// failure so as much state as possible is restored; reports the raw-mode
/// result.
fn reset_terminal(alt_screen: bool, output: OutputTarget) -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut writer = output.writer();
    let _ = execute!(writer, DisableBracketedPaste, DisableFocusChange, cursor::Show);
    if alt_screen {
        let _ = execute!(writer, LeaveAlternateScreen);
    }
    raw
}

fn install_panic_hook(alt_screen: bool, output: OutputTarget) {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = reset_terminal(alt_screen, output);
            previous(info);
        }));
    });
}

/// Open `path` for appending, creating it if needed.
///
/// The terminal belongs to the interface while a program runs, so log
/// output goes to a file. Hand the file to a `tracing` subscriber as its
/// writer.
pub fn log_to_file(path: impl AsRef<Path>) -> io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

/// Cloneable control handle for a running [`Program`].
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<AtomicBool>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Queue a message for the model. Dropped once the program has exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Stop the program at its next wake-up.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// Why the event loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Quit,
    Killed,
    Interrupted,
}

/// Drives a [`Model`] on a real terminal.
///
/// ```rust,ignore
/// let app = Program::<CheckoutApp>::new(flags)?.run().await?;
/// if let Some(coupon) = app.applied() {
///     println!("{}", coupon.value);
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<Backend>,
    // Declared before `session` so listeners are released before the
    // terminal is restored when the program is dropped early.
    subscriptions: SubscriptionManager<M::Message>,
    session: TerminalSession,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    dirty: bool,
    quit: bool,
    killed: Arc<AtomicBool>,
}

impl<M: Model> Program<M> {
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Set up the terminal, initialize the model and start its declared
    /// subscriptions.
    ///
    /// Must be called inside a tokio runtime.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (session, terminal) = TerminalSession::enter(&options)?;
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);

        let mut program = Program {
            model,
            terminal,
            subscriptions: SubscriptionManager::new(msg_tx.clone()),
            session,
            msg_tx,
            msg_rx,
            options,
            dirty: true,
            quit: false,
            killed: Arc::new(AtomicBool::new(false)),
        };
        program.dispatch(init_cmd);
        program.sync_subscriptions();
        tracing::debug!(fps = program.options.fps, "program started");
        Ok(program)
    }

    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: Arc::clone(&self.killed),
        }
    }

    /// Run until the model quits, the handle kills the program, or ctrl-c
    /// arrives as a signal. Subscriptions are released and the terminal is
    /// restored before the final model is returned.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let outcome = self.event_loop().await;

        self.subscriptions.shutdown();
        let restored = self.session.leave();

        let exit = outcome?;
        restored?;
        tracing::debug!(?exit, "program finished");
        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<Exit, ProgramError> {
        self.draw()?;

        let period = Duration::from_secs_f64(1.0 / f64::from(self.options.fps.clamp(1, 120)));
        let mut frames = tokio::time::interval(period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let signals = self.options.handle_signals;

        loop {
            if self.killed.load(Ordering::SeqCst) {
                return Ok(Exit::Killed);
            }

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if signals => return Ok(Exit::Interrupted),

                Some(msg) = self.msg_rx.recv() => {
                    self.step(msg);
                    self.drain_queued();
                    if self.quit {
                        return Ok(Exit::Quit);
                    }
                }

                _ = frames.tick() => {
                    if self.dirty {
                        self.draw()?;
                    }
                }
            }
        }
    }

    /// Process messages that are already queued, within the batch limits,
    /// so a burst results in a single redraw.
    fn drain_queued(&mut self) {
        let deadline = Instant::now() + BATCH_WINDOW;
        for _ in 0..MAX_BATCH {
            if self.quit || Instant::now() >= deadline {
                break;
            }
            match self.msg_rx.try_recv() {
                Ok(msg) => self.step(msg),
                Err(_) => break,
            }
        }
    }

    fn step(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.dispatch(cmd);
        self.sync_subscriptions();
        self.dirty = true;
    }

    fn sync_subscriptions(&mut self) {
        let declared = self.model.subscriptions();
        self.subscriptions.reconcile(declared);
    }

    fn dispatch(&mut self, cmd: Command<M::Message>) {
        cmd.visit(&mut |effect| match effect {
            Effect::Nothing | Effect::Many(_) => {}
            Effect::Quit => self.quit = true,
            Effect::Emit(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            Effect::Later(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
        });
    }

    fn draw(&mut self) -> Result<(), ProgramError> {
        let model = &self.model;
        self.terminal.draw(|frame| model.view(frame))?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(opts.bracketed_paste);
        assert!(!opts.focus_reporting);
        assert_eq!(opts.output, OutputTarget::Stdout);
    }

    #[test]
    fn log_to_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picker.log");
        for line in ["first", "second"] {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "{line}").unwrap();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn handle_outlives_the_program() {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel::<u8>();
        let handle = ProgramHandle {
            msg_tx,
            killed: Arc::new(AtomicBool::new(false)),
        };
        drop(msg_rx);
        handle.send(1);
        handle.clone().kill();
        assert!(handle.killed.load(Ordering::SeqCst));
    }
}
