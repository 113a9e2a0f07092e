// Event handling and main bar loop

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Write};
use std::panic;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use super::input;
use super::line::BarLine;
use super::pointer::SetPointerShape;
use crate::bar::{ModuleId, Panel, PointerShape, runtime};
use crate::config::Config;
use crate::modules::{FactoryContext, ModuleRegistry};
use crate::services::{ServiceRegistry, SystemMonitor};

/// How often the shared system monitor samples CPU and memory
const SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Everything the bar loop waits on, from every producer thread
#[derive(Debug)]
pub enum BarEvent {
    Input(Event),             // Keyboard, mouse, focus or resize from the terminal
    Refresh(ModuleId),        // One module asked to be re-rendered
    Redraw(&'static str),     // Full refresh (signal or resume)
    Quit(&'static str),       // Stop the loop
}

impl From<ModuleId> for BarEvent {
    fn from(id: ModuleId) -> Self {
        BarEvent::Refresh(id)
    }
}

/// Spawn a dedicated thread reading terminal input.
fn spawn_input_thread(tx: Sender<BarEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(evt) => {
                    if tx.send(BarEvent::Input(evt)).is_err() {
                        break; // Main thread dropped the receiver
                    }
                }
                Err(e) => {
                    tracing::error!("terminal input failed: {}", e);
                    let _ = tx.send(BarEvent::Quit("terminal input closed"));
                    break;
                }
            }
        }
    });
}

/// Spawn a thread turning process signals into bar events.
#[cfg(unix)]
fn spawn_signal_thread(tx: Sender<BarEvent>) -> Result<()> {
    use signal_hook::consts::{SIGCONT, SIGHUP, SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGUSR1, SIGUSR2, SIGCONT, SIGINT, SIGTERM, SIGHUP])
        .context("Failed to install signal handlers")?;

    thread::spawn(move || {
        for signal in signals.forever() {
            let event = match signal {
                SIGUSR1 => BarEvent::Redraw("SIGUSR1"),
                SIGUSR2 => BarEvent::Redraw("SIGUSR2"),
                SIGCONT => BarEvent::Redraw("resumed"),
                SIGHUP => BarEvent::Quit("SIGHUP"),
                SIGTERM => BarEvent::Quit("SIGTERM"),
                _ => BarEvent::Quit("SIGINT"),
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_signal_thread(_tx: Sender<BarEvent>) -> Result<()> {
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        SetPointerShape(PointerShape::Default),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    )
}

fn enter_screen() -> io::Result<()> {
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, EnableFocusChange, Hide)
}

/// Restores the terminal when dropped
struct TerminalGuard {
    restore: fn() -> io::Result<()>,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)() {
            tracing::warn!("failed to restore terminal: {}", e);
        }
    }
}

/// Enable raw mode, then arm the guard before any further setup can fail
fn take_over(
    raw_mode: fn() -> io::Result<()>,
    setup: fn() -> io::Result<()>,
    restore: fn() -> io::Result<()>,
) -> Result<TerminalGuard> {
    raw_mode().context("Failed to enable raw mode")?;
    let guard = TerminalGuard { restore };
    setup().context("Failed to initialize terminal")?;
    Ok(guard)
}

/// Chain a hook that runs `restore` before the previous hook, but only for
/// panics on the thread that installed it. Module and service threads that
/// panic leave the terminal alone.
fn chain_panic_hook<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let owner = thread::current().id();
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if thread::current().id() == owner {
            restore();
        }
        tracing::error!("panic: {}", info);
        previous(info);
    }));
}

/// Start modules and services, take over the terminal and run until quit
pub fn run_bar(config: &Config) -> Result<()> {
    let mut services = ServiceRegistry::new();
    let monitor = SystemMonitor::new(SAMPLE_INTERVAL);
    let ctx = FactoryContext {
        stats: monitor.stats(),
    };
    services.register(Box::new(monitor));

    let registry = ModuleRegistry::builtin(&ctx);
    let configured = config.groups().map(|_, specs| registry.instantiate(specs));

    let (event_tx, event_rx) = mpsc::channel();
    let (table, groups) = runtime::start(configured, &mut services, &event_tx);
    tracing::info!("{} module(s) running", table.len());

    spawn_signal_thread(event_tx.clone())?;

    // Setup terminal: single row in the alternate screen, mouse and focus reporting
    chain_panic_hook(|| {
        let _ = restore_terminal();
    });
    let guard = take_over(enable_raw_mode, enter_screen, restore_terminal)?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    let width = terminal.size().map(|s| s.width).unwrap_or(0);

    let mut panel = Panel::new(table, groups, width as usize, config.layout_settings());
    panel.full_refresh();

    spawn_input_thread(event_tx.clone());
    drop(event_tx);

    // Main loop
    let result = run_loop(&mut terminal, &mut panel, event_rx, &mut io::stdout());

    drop(guard);
    services.stop_all();

    result
}

enum Step {
    Continue,
    Clear,
    Quit(&'static str),
}

fn apply(panel: &mut Panel, event: BarEvent) -> Step {
    match event {
        BarEvent::Refresh(id) => {
            panel.refresh(id);
        }
        BarEvent::Redraw(reason) => {
            tracing::debug!("full redraw: {}", reason);
            panel.full_refresh();
            return Step::Clear;
        }
        BarEvent::Quit(reason) => return Step::Quit(reason),
        BarEvent::Input(Event::Key(key)) if input::is_quit(&key) => return Step::Quit("ctrl+c"),
        BarEvent::Input(Event::Mouse(mouse)) => {
            panel.pointer(input::pointer_event(&mouse));
        }
        BarEvent::Input(Event::FocusLost) => {
            panel.focus_lost();
        }
        BarEvent::Input(Event::Resize(width, _)) => {
            panel.resize(width as usize);
        }
        BarEvent::Input(_) => {}
    }
    Step::Continue
}

/// Block for one event, drain whatever else is queued, apply it all and draw once.
///
/// A pointer shape that differs from the one at the start of the batch is
/// written to `pointer_out` after the frame.
pub fn run_loop<B, W>(
    terminal: &mut Terminal<B>,
    panel: &mut Panel,
    event_rx: Receiver<BarEvent>,
    pointer_out: &mut W,
) -> Result<()>
where
    B: Backend,
    W: Write,
{
    draw(terminal, panel)?;

    loop {
        // Always block for at least one event, then drain the queue
        let Ok(first) = event_rx.recv() else {
            return Ok(()); // Every producer is gone
        };

        let shape = panel.pointer_shape();
        let mut clear = false;
        for event in std::iter::once(first).chain(event_rx.try_iter()) {
            match apply(panel, event) {
                Step::Continue => {}
                Step::Clear => clear = true,
                Step::Quit(reason) => {
                    tracing::info!("quitting: {}", reason);
                    return Ok(());
                }
            }
        }

        if clear {
            terminal.clear().context("Failed to clear terminal")?;
        }
        draw(terminal, panel)?;

        if panel.pointer_shape() != shape {
            execute!(pointer_out, SetPointerShape(panel.pointer_shape())).context("Failed to set pointer shape")?;
        }
    }
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, panel: &Panel) -> Result<()> {
    terminal
        .draw(|frame| {
            let area = frame.area();
            let row = Rect {
                height: area.height.min(1),
                ..area
            };
            frame.render_widget(BarLine::new(panel.line()), row);
        })
        .context("Failed to draw bar")?;
    Ok(())
}
