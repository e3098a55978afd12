//! Screen definitions for the relchat TUI.

pub mod chat;

use crate::controller::{ChatController, Modal};
use crate::ui::layout::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, controller: &ChatController, area: Rect, buf: &mut Buffer);
}

/// Render the chat screen and whatever is open on top of it.
pub fn render_app(controller: &ChatController, area: Rect, buf: &mut Buffer) {
    chat::ChatScreen.render(controller, area, buf);

    match controller.modal() {
        Some(Modal::ConfirmClear) => render_confirm_overlay(area, buf),
        Some(Modal::Alert(text)) => render_alert_overlay(text, area, buf),
        None => {}
    }

    if controller.show_help() {
        render_help_overlay(area, buf);
    }
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Keys
    Enter             Send message
    Shift+Enter       New line (also Alt+Enter, Ctrl+J)
    Up/Down           History, or scroll while typing
    PgUp/PgDn, wheel  Scroll conversation
    Ctrl+L            Clear history
    F1                Toggle this help
    Esc / Ctrl+C      Quit

  [Press any key to close]
";

    let width = 60.min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}

/// Render the clear-history confirmation dialog.
pub fn render_confirm_overlay(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::default(),
        Line::from("Clear all chat history?"),
        Line::styled("This cannot be undone.", Styles::dim()),
        Line::default(),
        Line::from(vec![
            Span::styled(" y ", Styles::key_hint()),
            Span::styled(" Yes   ", Styles::default()),
            Span::styled(" n ", Styles::key_hint()),
            Span::styled(" No", Styles::default()),
        ]),
    ];
    render_dialog(" Clear History ", lines, Styles::border_active(), area, buf);
}

/// Render an alert that any key dismisses.
pub fn render_alert_overlay(text: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::default(),
        Line::styled(text.to_string(), Styles::error()),
        Line::default(),
        Line::styled("[Press any key]", Styles::dim()),
    ];
    render_dialog(" Error ", lines, Styles::error(), area, buf);
}

fn render_dialog(
    title: &'static str,
    lines: Vec<Line<'static>>,
    border: ratatui::style::Style,
    area: Rect,
    buf: &mut Buffer,
) {
    let width = 44.min(area.width.saturating_sub(4));
    let height = u16::try_from(lines.len() + 3)
        .unwrap_or(u16::MAX)
        .min(area.height);
    let dialog_area = centered_fixed(width, height, area);

    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(dialog_area, buf);
}
