use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use super::app::App;
use super::input::{InputSource, KeyboardPad};

/// The fixed-rate signal every loop iteration waits on.
pub trait FrameClock {
    /// Block until the next frame tick.
    fn wait(&mut self);
}

/// Frame clock backed by the system timer. Missed ticks are dropped rather
/// than replayed, so a slow frame never causes a burst of catch-up frames.
pub struct IntervalClock {
    period: Duration,
    next: Instant,
}

impl IntervalClock {
    pub fn new(frames_per_second: u32) -> Self {
        let period = Duration::from_secs(1) / frames_per_second.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }
}

impl FrameClock for IntervalClock {
    fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}

/// Spin up the terminal backend, drive the frame loop, and restore the
/// terminal when the user quits.
pub fn run_app(app: &mut App, frames_per_second: u32) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    // Release events make held directions exact; not every terminal has them.
    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("failed to enable key release events")?;
    }
    tracing::debug!(release_events, frames_per_second, "terminal ready");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(release_events);
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    let mut pad = KeyboardPad::new(release_events);
    let mut clock = IntervalClock::new(frames_per_second);

    let result = drive(&mut terminal, app, &mut pad, &mut clock);

    cleanup_terminal(&mut terminal, release_events)?;
    result
}

/// The frame loop: sample input once, advance the app, draw, then wait for
/// the next tick. Returns after the frame in which a quit was requested.
pub fn drive<B, I, C>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    input: &mut I,
    clock: &mut C,
) -> Result<()>
where
    B: Backend,
    I: InputSource,
    C: FrameClock,
{
    loop {
        let snapshot = input.poll()?;
        app.step(snapshot);
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;
        if app.should_quit() {
            return Ok(());
        }
        clock.wait();
    }
}

fn restore_terminal(release_events: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if release_events {
        execute!(stdout, PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)
}

fn cleanup_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    release_events: bool,
) -> Result<()> {
    if release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("failed to restore keyboard mode")?;
    }
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
