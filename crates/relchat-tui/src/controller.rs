//! Chat controller.
//!
//! [`ChatController`] owns everything the chat screen shows and reacts to
//! input actions, backend completions and animation ticks. It never does
//! I/O itself: operations that need the backend return a [`Command`], and
//! the result comes back later as a [`Completion`]. Time is passed in as
//! `now` so every animation is driven by the caller's clock.

use std::time::{Duration, Instant};

use relchat_engine::{
    chat_outcome, ChatResponse, ClearResponse, ClientError, StatusResponse, UiConfig,
};

use crate::conversation::{ConversationView, TranscriptScroll, WelcomeBanner, WHEEL_STEP};
use crate::event::Action;
use crate::status::ConnectionStatus;
use crate::typing::TypingIndicator;
use crate::ui::widgets::{input_text_width, TextInputState};

/// Alert text when the backend refuses or fails to clear history.
pub const CLEAR_FAILED: &str = "Failed to clear history";

const BUSY_NOTICE: &str = "Still waiting for the previous reply";
const CLEAR_BUSY_NOTICE: &str = "Clearing history already in progress";

/// How long a status bar notification stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Lines scrolled by PageUp/PageDown.
const PAGE_STEP: usize = 10;

/// Identifies one chat request so late replies can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Backend work requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchStatus,
    SendChat { id: RequestId, message: String },
    ClearHistory,
}

/// Result of a [`Command`], fed back through [`ChatController::complete`].
#[derive(Debug)]
pub enum Completion {
    Status(Result<StatusResponse, ClientError>),
    Chat {
        id: RequestId,
        result: Result<ChatResponse, ClientError>,
    },
    Clear(Result<ClearResponse, ClientError>),
}

/// Dialog drawn over the chat screen. Only one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// "Clear all history?" with yes/no.
    ConfirmClear,
    /// Message dismissed by any key.
    Alert(String),
}

#[derive(Debug, Clone)]
struct Notification {
    text: String,
    expires: Instant,
}

/// State machine behind the chat screen.
#[derive(Debug)]
pub struct ChatController {
    ui: UiConfig,
    view: ConversationView,
    welcome: WelcomeBanner,
    typing: Option<TypingIndicator>,
    input: TextInputState,
    status: ConnectionStatus,
    model_label: Option<String>,
    pending_chat: Option<RequestId>,
    next_request: u64,
    clear_pending: bool,
    modal: Option<Modal>,
    show_help: bool,
    notification: Option<Notification>,
    scroll: TranscriptScroll,
    should_quit: bool,
}

impl ChatController {
    pub fn new(ui: UiConfig) -> Self {
        Self {
            ui,
            view: ConversationView::new(),
            welcome: WelcomeBanner::default(),
            typing: None,
            input: TextInputState::new(),
            status: ConnectionStatus::default(),
            model_label: None,
            pending_chat: None,
            next_request: 0,
            clear_pending: false,
            modal: None,
            show_help: false,
            notification: None,
            scroll: TranscriptScroll::new(),
            should_quit: false,
        }
    }

    /// Commands to run once the screen is up.
    pub fn startup(&mut self) -> Vec<Command> {
        vec![self.refresh_status()]
    }

    /// Ask the backend for its status. There is no periodic polling.
    pub fn refresh_status(&mut self) -> Command {
        tracing::debug!("refreshing backend status");
        Command::FetchStatus
    }

    /// Apply one input action.
    pub fn handle_action(&mut self, action: Action, now: Instant) -> Option<Command> {
        if action == Action::Quit {
            self.should_quit = true;
            return None;
        }

        if self.show_help {
            if action != Action::None {
                self.show_help = false;
            }
            return None;
        }

        match self.modal.take() {
            Some(Modal::ConfirmClear) => return self.handle_confirm(action),
            Some(Modal::Alert(text)) => {
                if action == Action::None {
                    self.modal = Some(Modal::Alert(text));
                }
                return None;
            }
            None => {}
        }

        match action {
            Action::Submit => return self.submit(now),
            Action::Clear => self.request_clear(now),
            Action::Back => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::Newline => self.input.insert('\n'),
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::Up => {
                if self.input.is_empty() || self.input.is_browsing_history() {
                    self.input.history_prev();
                } else {
                    self.scroll.scroll_up(1);
                }
            }
            Action::Down => {
                if self.input.is_browsing_history() {
                    self.input.history_next();
                } else {
                    self.scroll.scroll_down(1);
                }
            }
            Action::PageUp => self.scroll.scroll_up(PAGE_STEP),
            Action::PageDown => self.scroll.scroll_down(PAGE_STEP),
            Action::ScrollUp => self.scroll.scroll_up(WHEEL_STEP),
            Action::ScrollDown => self.scroll.scroll_down(WHEEL_STEP),
            Action::Quit | Action::None => {}
        }
        None
    }

    fn handle_confirm(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Submit | Action::Insert('y' | 'Y') => self.resolve_clear(true),
            Action::Back | Action::Insert('n' | 'N') => self.resolve_clear(false),
            _ => {
                self.modal = Some(Modal::ConfirmClear);
                None
            }
        }
    }

    /// Send the input as a chat message.
    ///
    /// Does nothing for blank input. While a reply or a clear is
    /// outstanding the submit is refused and the input is kept.
    pub fn submit(&mut self, now: Instant) -> Option<Command> {
        if self.input.is_blank() {
            return None;
        }
        if self.pending_chat.is_some() {
            self.notify(BUSY_NOTICE, now);
            return None;
        }
        if self.clear_pending {
            self.notify(CLEAR_BUSY_NOTICE, now);
            return None;
        }

        let message = self.input.submit();
        self.view.push_user(message.clone());
        self.welcome.dismiss(self.ui.fade(), now);
        self.scroll.to_bottom();

        if let Some(previous) = self.typing.take() {
            previous.stop();
        }
        self.typing = Some(TypingIndicator::start(self.ui.typing_rotation(), now));

        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.pending_chat = Some(id);
        tracing::debug!(request = id.0, "chat request issued");

        Some(Command::SendChat { id, message })
    }

    /// Open the confirmation dialog for clearing history.
    ///
    /// Refused while a clear or a chat reply is outstanding, so a clear
    /// never fades half of an exchange.
    pub fn request_clear(&mut self, now: Instant) {
        if self.clear_pending {
            self.notify(CLEAR_BUSY_NOTICE, now);
            return;
        }
        if self.pending_chat.is_some() {
            self.notify(BUSY_NOTICE, now);
            return;
        }
        self.modal = Some(Modal::ConfirmClear);
    }

    /// Answer the confirmation dialog. Declining changes nothing.
    pub fn resolve_clear(&mut self, confirmed: bool) -> Option<Command> {
        self.modal = None;
        if !confirmed {
            tracing::debug!("clear history declined");
            return None;
        }
        self.clear_pending = true;
        Some(Command::ClearHistory)
    }

    /// Apply the result of a backend request.
    pub fn complete(&mut self, completion: Completion, now: Instant) {
        match completion {
            Completion::Status(result) => self.apply_status(result),
            Completion::Chat { id, result } => self.apply_chat(id, result, now),
            Completion::Clear(result) => self.apply_clear(result, now),
        }
    }

    fn apply_status(&mut self, result: Result<StatusResponse, ClientError>) {
        match result {
            Ok(response) if response.success => {
                self.status = if response.is_connected() {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Disconnected
                };
                self.model_label = response.model_label();
                tracing::debug!(status = self.status.text(), "backend status");
            }
            Ok(response) => {
                tracing::warn!(error = ?response.error, "status check reported failure");
                self.status = ConnectionStatus::Disconnected;
            }
            Err(e) => {
                tracing::warn!(error = %e, "status check failed");
                self.status = ConnectionStatus::Disconnected;
            }
        }
    }

    fn apply_chat(
        &mut self,
        id: RequestId,
        result: Result<ChatResponse, ClientError>,
        now: Instant,
    ) {
        if self.pending_chat != Some(id) {
            tracing::debug!(request = id.0, "ignoring reply to a stale request");
            return;
        }
        self.pending_chat = None;

        // The indicator goes before the reply is appended.
        if let Some(typing) = self.typing.take() {
            typing.stop();
        }

        let (content, model) = match chat_outcome(result) {
            Ok(reply) => (reply.content, reply.model),
            Err(text) => (text, None),
        };

        self.view
            .push_assistant(content, model, self.ui.typewriter_interval(), now);
        self.welcome.dismiss(self.ui.fade(), now);
        self.scroll.to_bottom();
    }

    fn apply_clear(&mut self, result: Result<ClearResponse, ClientError>, now: Instant) {
        self.clear_pending = false;
        match result {
            Ok(response) if response.success => {
                let fading = self.view.fade_all(self.ui.fade(), now);
                tracing::debug!(fading, "history cleared");
                if self.view.is_empty() {
                    self.welcome.show();
                }
                self.scroll.to_bottom();
            }
            Ok(response) => {
                tracing::warn!(error = ?response.error, "clear history reported failure");
                self.modal = Some(Modal::Alert(CLEAR_FAILED.to_string()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "clear history failed");
                self.modal = Some(Modal::Alert(CLEAR_FAILED.to_string()));
            }
        }
    }

    /// Advance animations and expire notifications.
    pub fn tick(&mut self, now: Instant) {
        if let Some(typing) = self.typing.as_mut() {
            typing.advance(now);
        }

        let advanced = self.view.advance(now);
        if advanced.removed > 0 && self.view.is_empty() {
            self.welcome.show();
        }
        self.welcome.advance(now);

        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires)
        {
            self.notification = None;
        }
    }

    fn notify(&mut self, text: &str, now: Instant) {
        self.notification = Some(Notification {
            text: text.to_string(),
            expires: now + NOTIFICATION_TTL,
        });
    }

    /// Whether the send control is enabled: the trimmed input is non-empty.
    pub fn send_enabled(&self) -> bool {
        !self.input.is_blank()
    }

    /// Text rows the input box needs at `width` columns, soft-wrapped
    /// lines included, between one and the configured maximum.
    pub fn input_height(&self, width: u16) -> u16 {
        let rows = self.input.line_count(input_text_width(width));
        let lines = u16::try_from(rows).unwrap_or(u16::MAX);
        lines.clamp(1, self.ui.max_input_lines.max(1))
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    pub fn welcome(&self) -> &WelcomeBanner {
        &self.welcome
    }

    pub fn typing(&self) -> Option<&TypingIndicator> {
        self.typing.as_ref()
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn model_label(&self) -> Option<&str> {
        self.model_label.as_deref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.text.as_str())
    }

    /// Whether a chat reply is outstanding.
    pub fn is_waiting(&self) -> bool {
        self.pending_chat.is_some()
    }

    pub fn is_clearing(&self) -> bool {
        self.clear_pending
    }

    pub fn scroll(&self) -> &TranscriptScroll {
        &self.scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
