//! relchat-tui: Terminal UI for the Release Dashboard assistant
//!
//! This crate provides the TUI layer for relchat, including:
//! - The chat controller state machine and its animations
//! - The chat screen with welcome banner, typing indicator and dialogs
//! - Headless mode for testing and automation

pub mod animation;
pub mod controller;
pub mod conversation;
pub mod dispatch;
mod event;
pub mod headless;
mod screens;
pub mod status;
#[cfg(test)]
pub mod test_utils;
mod text;
pub mod typing;
mod ui;

pub use controller::{ChatController, Command, Completion, Modal, RequestId};
pub use event::{key_to_action, mouse_to_action, Action, Event, EventHandler};
pub use relchat_engine;
pub use status::ConnectionStatus;

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use relchat_engine::{ChatBackend, Config};

use dispatch::Dispatcher;

/// RAII guard for terminal state restoration.
#[derive(Default)]
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(
    config: &Config,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let mut guard = TerminalGuard::default();

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Lets terminals that support it report Shift+Enter distinctly
    if matches!(supports_keyboard_enhancement(), Ok(true)) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        guard.keyboard_enhanced = true;
    }

    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let mut controller = ChatController::new(config.ui);
    let mut events = EventHandler::new(config.ui.tick_rate());

    let result = run_loop(&mut terminal, &mut controller, &mut events, &backend).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut ChatController,
    events: &mut EventHandler,
    backend: &Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tx = events.sender();
    let mut dispatcher = Dispatcher::new();

    for command in controller.startup() {
        dispatcher.spawn(command, backend, &tx);
    }

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screens::render_app(controller, area, frame.buffer_mut());
        })?;

        let Some(event) = events.next().await else {
            break;
        };

        let now = Instant::now();
        // Animations advance on every event, not only on idle ticks
        controller.tick(now);

        let command = match event {
            Event::Key(key) => controller.handle_action(key_to_action(key), now),
            Event::Mouse(mouse) => controller.handle_action(mouse_to_action(mouse), now),
            Event::Completion(completion) => {
                controller.complete(completion, now);
                None
            }
            Event::Tick | Event::Resize(_, _) => None,
        };

        if let Some(command) = command {
            dispatcher.spawn(command, backend, &tx);
        }

        if controller.should_quit() {
            break;
        }
    }

    // In-flight requests are not waited for
    dispatcher.abort_all();
    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
