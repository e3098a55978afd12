//! Headless mode for the relchat TUI.
//!
//! Runs the chat screen against a [`TestBackend`] terminal, enabling E2E
//! testing and automation. Actions are sent via channels and the screen
//! state is captured after each render. Backend requests go through the
//! same dispatcher as the interactive UI.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use relchat_engine::{ChatBackend, UiConfig};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::controller::ChatController;
use crate::dispatch::Dispatcher;
use crate::event::{Action, Event};
use crate::screens::render_app;
use crate::status::ConnectionStatus;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Number of message entries in the conversation.
    pub entries: usize,
    /// Whether the typing indicator is shown.
    pub typing: bool,
    /// Whether a chat reply is outstanding.
    pub waiting: bool,
    /// Backend connection status.
    pub status: ConnectionStatus,
    /// Whether a dialog is open.
    pub modal_open: bool,
    /// Whether the welcome banner counts as present.
    pub welcome_visible: bool,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Whether the TUI should quit.
    pub should_quit: bool,
}

/// Handle to control a headless TUI instance.
///
/// Use this to send actions and observe state changes.
pub struct HeadlessHandle {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an action to the TUI.
    ///
    /// Returns `true` if the action was sent successfully.
    pub fn send_action(&self, action: Action) -> bool {
        self.action_tx.send(action).is_ok()
    }

    /// Type `text` into the input, one character at a time.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars()
            .all(|ch| self.send_action(Action::Insert(ch)))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait for the state to change, with a timeout.
    ///
    /// Returns `true` if state changed, `false` if timed out.
    pub async fn wait_for_change(&mut self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.state_rx.changed())
            .await
            .is_ok()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            if tokio::time::timeout(remaining, self.state_rx.changed())
                .await
                .is_err()
            {
                return None;
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        let text = text.to_string();
        self.wait_for(|s| s.screen_contents.contains(&text), timeout)
            .await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
    /// Animation timings.
    pub ui: UiConfig,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 10, // Faster tick rate for testing
            ui: UiConfig::default(),
        }
    }
}

/// Run the TUI in headless mode.
///
/// Returns a handle to control the TUI and a join handle for the background task.
///
/// # Example
///
/// ```ignore
/// let backend: Arc<dyn ChatBackend> = Arc::new(ApiClient::from_config(&config)?);
/// let (mut handle, task) = run_tui_headless(backend, HeadlessConfig::default());
///
/// handle.type_text("When is 4.2 released?");
/// handle.send_action(Action::Submit);
/// let state = handle.wait_for(|s| s.entries == 2, Duration::from_secs(5)).await;
///
/// handle.send_action(Action::Quit);
/// task.await??;
/// ```
pub fn run_tui_headless(
    backend: Arc<dyn ChatBackend>,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(backend, config, action_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle {
        action_tx,
        state_rx,
    };

    (handle, task)
}

async fn run_headless_loop(
    backend: Arc<dyn ChatBackend>,
    config: HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut terminal = Terminal::new(TestBackend::new(config.width, config.height))?;
    let mut controller = ChatController::new(config.ui);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let mut dispatcher = Dispatcher::new();
    for command in controller.startup() {
        dispatcher.spawn(command, &backend, &event_tx);
    }

    let tick_duration = Duration::from_millis(config.tick_rate_ms);

    loop {
        controller.tick(Instant::now());

        terminal.draw(|frame| {
            let area = frame.area();
            render_app(&controller, area, frame.buffer_mut());
        })?;

        let _ = state_tx.send(capture(&controller, terminal.backend().buffer()));

        if controller.should_quit() {
            break;
        }

        // Wait for an action, a finished request or the next tick
        let command = tokio::select! {
            action = action_rx.recv() => match action {
                Some(action) => controller.handle_action(action, Instant::now()),
                None => break,
            },
            Some(event) = event_rx.recv() => {
                if let Event::Completion(completion) = event {
                    controller.complete(completion, Instant::now());
                }
                None
            }
            () = tokio::time::sleep(tick_duration) => None,
        };

        if let Some(command) = command {
            dispatcher.spawn(command, &backend, &event_tx);
        }
    }

    dispatcher.abort_all();
    Ok(())
}

fn capture(controller: &ChatController, buffer: &Buffer) -> HeadlessState {
    HeadlessState {
        screen_contents: buffer_to_string(buffer),
        entries: controller.view().len(),
        typing: controller.is_typing(),
        waiting: controller.is_waiting(),
        status: controller.status(),
        modal_open: controller.modal().is_some(),
        welcome_visible: controller.welcome().is_visible(),
        show_help: controller.show_help(),
        should_quit: controller.should_quit(),
    }
}

/// Convert a terminal buffer to a string representation.
///
/// Trailing whitespace is trimmed from every row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedBackend;

    const WAIT: Duration = Duration::from_secs(5);

    fn start(backend: ScriptedBackend) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
        run_tui_headless(Arc::new(backend), HeadlessConfig::default())
    }

    #[test]
    fn test_headless_config_default() {
        let config = HeadlessConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.tick_rate_ms, 10);
    }

    #[tokio::test]
    async fn test_headless_startup_reports_status() {
        let (mut handle, task) = start(ScriptedBackend::online());

        let state = handle
            .wait_for(|s| s.status.is_connected(), WAIT)
            .await
            .expect("status should arrive");
        assert!(state.screen_contents.contains("Model: llama3 (RAG Enabled)"));
        assert!(state.welcome_visible);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_chat_round_trip() {
        let (mut handle, task) = start(ScriptedBackend::online());

        handle.type_text("hello");
        handle.send_action(Action::Submit);

        let state = handle
            .wait_for_text("echo: hello", WAIT)
            .await
            .expect("reply should be revealed");
        assert_eq!(state.entries, 2);
        assert!(!state.typing);
        assert!(!state.waiting);
        assert!(!state.welcome_visible);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_offline_chat_shows_network_error() {
        let (mut handle, task) = start(ScriptedBackend::offline());

        handle.type_text("hello");
        handle.send_action(Action::Submit);

        let state = handle
            .wait_for_text("Error: Network error occurred", WAIT)
            .await
            .expect("error reply should be revealed");
        assert_eq!(state.status, ConnectionStatus::Disconnected);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_clear_restores_welcome() {
        let (mut handle, task) = start(ScriptedBackend::online());

        handle.type_text("hi");
        handle.send_action(Action::Submit);
        handle
            .wait_for(|s| s.entries == 2 && !s.waiting, WAIT)
            .await
            .expect("reply should arrive");

        handle.send_action(Action::Clear);
        handle
            .wait_for(|s| s.modal_open, WAIT)
            .await
            .expect("confirmation should open");
        handle.send_action(Action::Insert('y'));

        let state = handle
            .wait_for(|s| s.entries == 0 && s.welcome_visible, WAIT)
            .await
            .expect("history should clear");
        assert!(state
            .screen_contents
            .contains("Welcome to Release Dashboard AI Assistant"));

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_failed_clear_shows_alert() {
        let (mut handle, task) = start(ScriptedBackend::clear_fails());

        handle.send_action(Action::Clear);
        handle.send_action(Action::Insert('y'));

        let state = handle
            .wait_for_text("Failed to clear history", WAIT)
            .await
            .expect("alert should show");
        assert!(state.modal_open);

        handle.send_action(Action::Back);
        let state = handle
            .wait_for(|s| !s.modal_open, WAIT)
            .await
            .expect("alert should close");
        assert!(!state.should_quit);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_quits_when_handle_dropped() {
        let (handle, task) = start(ScriptedBackend::slow());
        drop(handle);
        task.await.unwrap().unwrap();
    }
}
