//! Input box with the send and clear controls.
//!
//! The box grows with its content; the caller decides the height (see
//! [`crate::controller::ChatController::input_height`]).

use crate::ui::theme::Styles;
use crate::ui::widgets::TextInputState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const PLACEHOLDER: &str = "Ask about releases, patches, Jira tickets...";

/// Columns taken by the border, the `> ` prefix and the cursor cell.
const CHROME_WIDTH: u16 = 5;

/// Columns left for text in an input box `box_width` wide.
pub fn input_text_width(box_width: u16) -> usize {
    usize::from(box_width.saturating_sub(CHROME_WIDTH).max(1))
}

/// Input box widget.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    focused: bool,
    send_enabled: bool,
    waiting: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(input: &'a TextInputState) -> Self {
        Self {
            input,
            focused: true,
            send_enabled: false,
            waiting: false,
        }
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Whether the send control is drawn as enabled.
    #[must_use]
    pub fn send_enabled(mut self, enabled: bool) -> Self {
        self.send_enabled = enabled;
        self
    }

    /// Whether a reply is being waited for.
    #[must_use]
    pub fn waiting(mut self, waiting: bool) -> Self {
        self.waiting = waiting;
        self
    }

    fn controls(&self) -> Line<'static> {
        let send_style = if self.send_enabled {
            Styles::button()
        } else {
            Styles::button_disabled()
        };
        let send_label = if self.waiting { " Waiting " } else { " Send " };
        Line::from(vec![
            Span::styled(send_label, send_style),
            Span::raw(" "),
            Span::styled(" Clear ", Styles::key_hint()),
            Span::raw(" "),
        ])
        .right_aligned()
    }

    /// Build display rows soft-wrapped at `width` columns and the index of
    /// the row holding the cursor.
    fn build_lines(&self, width: usize) -> (Vec<Line<'static>>, usize) {
        if self.input.is_empty() {
            let mut spans = vec![Span::styled("> ", Styles::active())];
            if self.focused {
                spans.push(Span::styled("█", Styles::active()));
            }
            spans.push(Span::styled(PLACEHOLDER, Styles::dim()));
            return (vec![Line::from(spans)], 0);
        }

        let (cursor_row, cursor_col) = self.input.cursor_row_col(width);
        let mut lines = Vec::new();

        for (idx, text) in self.input.wrapped_rows(width).into_iter().enumerate() {
            let prefix = if idx == 0 { "> " } else { "  " };
            let mut spans = vec![Span::styled(prefix, Styles::active())];
            if self.focused && idx == cursor_row {
                let before: String = text.chars().take(cursor_col).collect();
                let after: String = text.chars().skip(cursor_col).collect();
                spans.push(Span::styled(before, Styles::default()));
                spans.push(Span::styled("█", Styles::active()));
                spans.push(Span::styled(after, Styles::default()));
            } else {
                spans.push(Span::styled(text, Styles::default()));
            }
            lines.push(Line::from(spans));
        }

        (lines, cursor_row)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Styles::border_active()
        } else {
            Styles::border()
        };

        let block = Block::default()
            .title(" Message ")
            .title_style(Styles::title())
            .title_top(self.controls())
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Styles::default());

        let inner_height = usize::from(area.height.saturating_sub(2));
        let (lines, cursor_line) = self.build_lines(input_text_width(area.width));

        // Keep the cursor line visible
        let scroll = if lines.len() <= inner_height {
            0
        } else {
            cursor_line.saturating_sub(inner_height.saturating_sub(1))
        };

        Paragraph::new(lines)
            .block(block)
            .style(Styles::default())
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
