//! The chat screen: header, conversation, input box and status bar.

use super::Screen;
use crate::controller::ChatController;
use crate::conversation::ConversationPane;
use crate::ui::layout::chat_layout;
use crate::ui::theme::Styles;
use crate::ui::widgets::{InputBar, KeyHint, StatusBar};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

pub const APP_TITLE: &str = "Release Dashboard AI Assistant";

const HINTS: [KeyHint; 5] = [
    KeyHint::new("Enter", "Send"),
    KeyHint::new("Shift+Enter", "Newline"),
    KeyHint::new("Ctrl+L", "Clear"),
    KeyHint::new("F1", "Help"),
    KeyHint::new("Esc", "Quit"),
];

/// The only screen of the app.
pub struct ChatScreen;

impl ChatScreen {
    fn render_header(controller: &ChatController, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_style(area, Styles::default());

        let title = Line::from(vec![Span::raw(" "), Span::styled(APP_TITLE, Styles::title())]);
        buf.set_line(area.x, area.y, &title, area.width);

        let status = controller.status();
        let indicator = Line::from(vec![
            Span::styled(status.dot(), status.style()),
            Span::raw(" "),
            Span::styled(status.text(), status.style()),
            Span::raw(" "),
        ]);
        let width = u16::try_from(indicator.width()).unwrap_or(u16::MAX);
        if width < area.width {
            buf.set_line(area.x + area.width - width, area.y, &indicator, width);
        }

        if area.height > 1 {
            if let Some(label) = controller.model_label() {
                let model = Line::from(vec![Span::raw(" "), Span::styled(label, Styles::dim())]);
                buf.set_line(area.x, area.y + 1, &model, area.width);
            }
        }
    }
}

impl Screen for ChatScreen {
    fn render(&self, controller: &ChatController, area: Rect, buf: &mut Buffer) {
        let layout = chat_layout(area, controller.input_height(area.width));

        Self::render_header(controller, layout.header, buf);

        ConversationPane::new(controller.view(), controller.welcome(), controller.scroll())
            .typing(controller.typing())
            .render(layout.messages, buf);

        InputBar::new(controller.input())
            .focused(controller.modal().is_none() && !controller.show_help())
            .send_enabled(controller.send_enabled())
            .waiting(controller.is_waiting())
            .render(layout.input, buf);

        let mut status_bar = StatusBar::new("Chat").hints(HINTS.to_vec());
        if let Some(text) = controller.notification() {
            status_bar = status_bar.right(text);
        }
        status_bar.render(layout.status, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Completion, Modal, CLEAR_FAILED};
    use crate::event::Action;
    use crate::test_utils::{render_to_string, TEST_HEIGHT, TEST_WIDTH};
    use relchat_engine::{ClearResponse, StatusResponse, UiConfig};
    use std::time::Instant;

    fn controller() -> ChatController {
        ChatController::new(UiConfig::default())
    }

    fn render(controller: &ChatController) -> String {
        render_to_string(controller, TEST_WIDTH, TEST_HEIGHT)
    }

    #[test]
    fn test_initial_screen() {
        let c = controller();
        let out = render(&c);
        assert!(out.contains(APP_TITLE));
        assert!(out.contains("○ Disconnected"));
        assert!(out.contains("Welcome to Release Dashboard AI Assistant"));
        assert!(out.contains("Ask about releases"));
        assert!(out.contains("Shift+Enter"));
    }

    #[test]
    fn test_header_line_layout() {
        let c = controller();
        let out = render_to_string(&c, 60, 12);
        let header = out.lines().next().unwrap_or_default();
        assert_eq!(
            header,
            format!(" {APP_TITLE}{}○ Disconnected", " ".repeat(14))
        );
    }

    #[test]
    fn test_connected_header_with_model_label() {
        let mut c = controller();
        c.complete(
            Completion::Status(Ok(StatusResponse {
                success: true,
                ollama_running: true,
                model: Some("llama3".to_string()),
                rag_enabled: Some(true),
                error: None,
            })),
            Instant::now(),
        );
        let out = render(&c);
        assert!(out.contains("● Connected"));
        let second = out.lines().nth(1).unwrap_or_default();
        insta::assert_snapshot!(second.trim(), @"Model: llama3 (RAG Enabled)");
    }

    #[test]
    fn test_typing_indicator_and_waiting_control() {
        let now = Instant::now();
        let mut c = controller();
        for ch in "status of 4.2?".chars() {
            c.handle_action(Action::Insert(ch), now);
        }
        c.handle_action(Action::Submit, now);

        let out = render(&c);
        assert!(out.contains("status of 4.2?"));
        assert!(out.contains("Thinking..."));
        assert!(out.contains("Waiting"));
    }

    #[test]
    fn test_confirm_and_alert_dialogs() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_action(Action::Clear, now);
        assert!(render(&c).contains("Clear all chat history?"));

        c.handle_action(Action::Insert('y'), now);
        c.complete(
            Completion::Clear(Ok(ClearResponse {
                success: false,
                ..ClearResponse::default()
            })),
            now,
        );
        assert_eq!(c.modal(), Some(&Modal::Alert(CLEAR_FAILED.to_string())));
        assert!(render(&c).contains(CLEAR_FAILED));
    }

    #[test]
    fn test_long_input_wraps_instead_of_clipping() {
        let now = Instant::now();
        let mut c = controller();
        let text = format!("{}END", "word ".repeat(40));
        for ch in text.chars() {
            c.handle_action(Action::Insert(ch), now);
        }
        assert_eq!(c.input_height(TEST_WIDTH), 3);

        let out = render(&c);
        assert!(out.contains("END█"));
        let rows = out.lines().filter(|line| line.contains("word")).count();
        assert_eq!(rows, 3);
    }

    #[test]
    fn test_notification_in_status_bar() {
        let now = Instant::now();
        let mut c = controller();
        for ch in "one".chars() {
            c.handle_action(Action::Insert(ch), now);
        }
        c.handle_action(Action::Submit, now);
        c.handle_action(Action::Insert('x'), now);
        c.handle_action(Action::Submit, now);

        let out = render(&c);
        let status_line = out.lines().last().unwrap_or_default();
        assert!(status_line.contains("Still waiting for the previous reply"));
    }
}
