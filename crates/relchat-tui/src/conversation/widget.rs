//! Conversation pane widget.
//!
//! Draws the welcome banner, the message bubbles and the typing indicator
//! as one scrollable transcript.
//!
//! ```text
//! ┌─ Conversation ───────────────────────────────┐
//! │                          You · 10:42 AM       │
//! │                     When is 4.2 released?     │
//! │                                               │
//! │ Assistant · 10:42 AM · 🤖 llama3              │
//! │   Release 4.2 is planned for...               │
//! └───────────────────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::entry::{MessageEntry, Role};
use super::scroll::TranscriptScroll;
use super::view::ConversationView;
use super::welcome::{WelcomeBanner, FEATURE_TAGS, WELCOME_TEXT, WELCOME_TITLE};
use crate::text::{wrap_text, wrap_width};
use crate::typing::{TypingIndicator, DOT_COUNT};
use crate::ui::theme::{Styles, Symbols};

/// Indent of assistant message text under its author line.
const ASSISTANT_INDENT: &str = "  ";

/// Conversation pane widget.
pub struct ConversationPane<'a> {
    view: &'a ConversationView,
    welcome: &'a WelcomeBanner,
    typing: Option<&'a TypingIndicator>,
    scroll: &'a TranscriptScroll,
}

impl<'a> ConversationPane<'a> {
    pub fn new(
        view: &'a ConversationView,
        welcome: &'a WelcomeBanner,
        scroll: &'a TranscriptScroll,
    ) -> Self {
        Self {
            view,
            welcome,
            typing: None,
            scroll,
        }
    }

    /// Draw a typing indicator after the last message.
    #[must_use]
    pub fn typing(mut self, typing: Option<&'a TypingIndicator>) -> Self {
        self.typing = typing;
        self
    }

    /// Lay out the whole transcript for the given inner width.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.welcome.is_drawn() {
            welcome_lines(&mut lines, width, self.welcome.is_leaving());
        }

        // Bubbles leave a quarter of the width free on the opposite side
        let bubble_width = (width * 3 / 4).max(10).min(width.max(1));
        for entry in self.view.entries() {
            entry_lines(&mut lines, entry, bubble_width);
        }

        if let Some(typing) = self.typing {
            typing_lines(&mut lines, typing);
        }

        lines
    }
}

fn welcome_lines(lines: &mut Vec<Line<'static>>, width: usize, leaving: bool) {
    let (title_style, text_style, tag_style) = if leaving {
        (Styles::faded(), Styles::faded(), Styles::faded())
    } else {
        (Styles::title(), Styles::dim(), Styles::key_hint())
    };

    lines.push(Line::default());
    lines.push(Line::styled(WELCOME_TITLE, title_style).alignment(Alignment::Center));
    lines.push(Line::default());
    for text in wrap_text(WELCOME_TEXT, width.saturating_sub(4)) {
        lines.push(Line::styled(text, text_style).alignment(Alignment::Center));
    }
    lines.push(Line::default());

    let mut tags = Vec::new();
    for (i, tag) in FEATURE_TAGS.iter().enumerate() {
        if i > 0 {
            tags.push(Span::raw(" "));
        }
        tags.push(Span::styled(format!(" {tag} "), tag_style));
    }
    lines.push(Line::from(tags).alignment(Alignment::Center));
    lines.push(Line::default());
}

fn entry_lines(lines: &mut Vec<Line<'static>>, entry: &MessageEntry, bubble_width: usize) {
    let fading = entry.is_fading();
    let pick = |style: Style| if fading { Styles::faded() } else { style };

    let author_style = match entry.role() {
        Role::User => Styles::user(),
        Role::Assistant => Styles::assistant(),
    };
    let mut author = vec![
        Span::styled(entry.role().label(), pick(author_style)),
        Span::styled(format!(" · {}", entry.time_label()), pick(Styles::dim())),
    ];
    if let Some(model) = entry.model() {
        author.push(Span::styled(
            format!(" · {} {model}", Symbols::MODEL),
            pick(Styles::dim()),
        ));
    }

    match entry.role() {
        Role::User => {
            lines.push(Line::from(author).alignment(Alignment::Right));
            let wrapped = wrap_text(entry.visible_text(), bubble_width);
            let block_width = wrap_width(&wrapped);
            for text in wrapped {
                // Pad so the bubble's lines start at the same column
                let pad = block_width.saturating_sub(text.width());
                let padded = format!("{text}{}", " ".repeat(pad));
                lines.push(
                    Line::styled(padded, pick(Styles::default())).alignment(Alignment::Right),
                );
            }
        }
        Role::Assistant => {
            lines.push(Line::from(author));
            let wrap_at = bubble_width.saturating_sub(ASSISTANT_INDENT.len());
            for text in wrap_text(entry.visible_text(), wrap_at) {
                lines.push(Line::styled(
                    format!("{ASSISTANT_INDENT}{text}"),
                    pick(Styles::default()),
                ));
            }
        }
    }
    lines.push(Line::default());
}

fn typing_lines(lines: &mut Vec<Line<'static>>, typing: &TypingIndicator) {
    lines.push(Line::styled(Role::Assistant.label(), Styles::assistant()));

    let mut spans = vec![Span::styled(
        format!("{ASSISTANT_INDENT}{} ", typing.phrase()),
        Styles::dim(),
    )];
    for i in 0..DOT_COUNT {
        let (symbol, style) = if i < typing.dots() {
            (Symbols::DOT, Styles::active())
        } else {
            (Symbols::DOT_EMPTY, Styles::dim())
        };
        spans.push(Span::styled(symbol, style));
    }
    lines.push(Line::from(spans));
}

impl Widget for ConversationPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = self.build_lines(usize::from(inner.width));
        let offset = self.scroll.offset(lines.len(), usize::from(inner.height));

        Paragraph::new(lines)
            .style(Styles::default())
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use std::time::{Duration, Instant};

    const TYPE: Duration = Duration::from_millis(20);

    fn render(pane: ConversationPane<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        pane.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_welcome_banner_on_empty_view() {
        let view = ConversationView::new();
        let welcome = WelcomeBanner::default();
        let scroll = TranscriptScroll::new();

        let out = render(ConversationPane::new(&view, &welcome, &scroll), 80, 16);
        assert!(out.contains("Conversation"));
        assert!(out.contains(WELCOME_TITLE));
        assert!(out.contains("RAG Enabled"));
        assert!(out.contains("Context-Aware"));
    }

    #[test]
    fn test_hidden_banner_is_not_drawn() {
        let view = ConversationView::new();
        let welcome = WelcomeBanner::Hidden;
        let scroll = TranscriptScroll::new();

        let out = render(ConversationPane::new(&view, &welcome, &scroll), 80, 16);
        assert!(!out.contains(WELCOME_TITLE));
    }

    #[test]
    fn test_messages_with_author_lines() {
        let now = Instant::now();
        let mut view = ConversationView::new();
        view.push_user("When is 4.2 released?");
        view.push_assistant("Next Tuesday.", Some("llama3".to_string()), TYPE, now);
        view.advance(now + Duration::from_secs(1));
        let welcome = WelcomeBanner::Hidden;
        let scroll = TranscriptScroll::new();
        let time = view.entries()[0].time_label();

        let out = render(ConversationPane::new(&view, &welcome, &scroll), 80, 16);
        assert!(out.contains(&format!("You · {time}")));
        assert!(out.contains("When is 4.2 released?"));
        assert!(out.contains(&format!("Assistant · {}", view.entries()[1].time_label())));
        assert!(out.contains("llama3"));
        assert!(out.contains("  Next Tuesday."));
    }

    #[test]
    fn test_partial_reveal_shows_prefix_only() {
        let now = Instant::now();
        let mut view = ConversationView::new();
        view.push_assistant("Hello there", None, TYPE, now);
        view.advance(now + Duration::from_millis(40));
        let welcome = WelcomeBanner::Hidden;
        let scroll = TranscriptScroll::new();

        let out = render(ConversationPane::new(&view, &welcome, &scroll), 60, 10);
        assert!(out.contains("  Hel"));
        assert!(!out.contains("Hell"));
    }

    #[test]
    fn test_typing_indicator_is_drawn_last() {
        let now = Instant::now();
        let mut view = ConversationView::new();
        view.push_user("hi");
        let typing = TypingIndicator::start(Duration::from_secs(2), now);
        let welcome = WelcomeBanner::Hidden;
        let scroll = TranscriptScroll::new();

        let out = render(
            ConversationPane::new(&view, &welcome, &scroll).typing(Some(&typing)),
            60,
            10,
        );
        let user_at = out.find("You ·").unwrap_or(usize::MAX);
        let typing_at = out.find("Thinking...").unwrap_or(0);
        assert!(typing_at > user_at);
        assert!(out.contains("○○○"));
    }

    #[test]
    fn test_follow_mode_shows_newest_lines() {
        let mut view = ConversationView::new();
        for i in 0..20 {
            view.push_user(format!("message {i}"));
        }
        let welcome = WelcomeBanner::Hidden;
        let mut scroll = TranscriptScroll::new();

        let out = render(ConversationPane::new(&view, &welcome, &scroll), 60, 10);
        assert!(out.contains("message 19"));
        assert!(!out.contains("message 0│"));

        scroll.scroll_up(1000);
        let out = render(ConversationPane::new(&view, &welcome, &scroll), 60, 10);
        assert!(out.contains("message 0│"));
        assert!(!out.contains("message 19"));
    }
}
