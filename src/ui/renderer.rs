use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Classification, Message, Sender};
use crate::core::session::{Session, WELCOME_LINES};
use crate::ui::theme::Theme;
use crate::utils::input::InputBuffer;

/// Everything a frame needs beyond the session itself.
pub struct RenderContext<'a> {
    pub session: &'a Session,
    pub input: &'a InputBuffer,
    pub theme: &'a Theme,
    /// Lines scrolled up from the newest message. Zero follows the tail.
    pub scroll_from_bottom: u16,
    /// Time since the pending reply started, drives the typing animation.
    pub pending_elapsed: Option<Duration>,
}

pub fn classification_tag(classification: Classification) -> Option<&'static str> {
    match classification {
        Classification::Safe => None,
        Classification::Offensive => Some("[offensive]"),
        Classification::Irrelevant => Some("[off-topic]"),
    }
}

fn message_styles(message: &Message, theme: &Theme) -> (Style, Style) {
    match message.sender {
        Sender::User => (theme.user_prefix_style, theme.user_text_style),
        Sender::Bot => {
            let text_style = match message.classification {
                Classification::Safe => theme.bot_text_style,
                Classification::Offensive => theme.offensive_text_style,
                Classification::Irrelevant => theme.irrelevant_text_style,
            };
            (theme.bot_prefix_style, text_style)
        }
    }
}

fn typing_dots(elapsed: Duration) -> &'static str {
    match (elapsed.as_millis() / 400) % 4 {
        0 => "·",
        1 => "··",
        2 => "···",
        _ => "",
    }
}

/// Transcript lines in display order, including the welcome placeholder and
/// the typing indicator when they apply.
pub fn build_display_lines(
    session: &Session,
    theme: &Theme,
    pending_elapsed: Option<Duration>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if session.shows_welcome() {
        for text in WELCOME_LINES {
            lines.push(Line::from(Span::styled(text, theme.welcome_style)));
        }
        lines.push(Line::from(""));
    }

    for message in session.transcript() {
        let (prefix_style, text_style) = message_styles(message, theme);
        let prefix = match message.sender {
            Sender::User => "You: ",
            Sender::Bot => "Bot: ",
        };
        let mut spans = vec![Span::styled(prefix, prefix_style)];
        if message.is_bot() {
            if let Some(tag) = classification_tag(message.classification) {
                spans.push(Span::styled(format!("{tag} "), text_style));
            }
        }
        spans.push(Span::styled(message.text.clone(), text_style));
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if session.shows_pending_reply() {
        let dots = typing_dots(pending_elapsed.unwrap_or_default());
        lines.push(Line::from(vec![
            Span::styled("Bot: ", theme.bot_prefix_style),
            Span::styled(format!("typing{dots}"), theme.typing_indicator_style),
        ]));
    }

    lines
}

/// Rows the lines occupy once word-wrapped to `width` columns, matching the
/// transcript paragraph's `Wrap { trim: true }`.
pub fn wrapped_line_count(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let total: usize = lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            word_wrapped_rows(&text, width)
        })
        .sum();
    u16::try_from(total).unwrap_or(u16::MAX)
}

fn word_wrapped_rows(text: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut current = 0;
    for word in text.split_whitespace() {
        let mut word_width = UnicodeWidthStr::width(word);
        let needed = if current == 0 { word_width } else { word_width + 1 };
        if current + needed <= width {
            current += needed;
            continue;
        }
        if current > 0 {
            rows += 1;
        }
        // Words wider than the row are broken across rows.
        while word_width > width {
            word_width -= width;
            rows += 1;
        }
        current = word_width;
    }
    rows
}

/// Top-down paragraph offset for a view anchored `from_bottom` rows above
/// the tail.
pub fn top_offset(total_rows: u16, visible_rows: u16, from_bottom: u16) -> u16 {
    let max_offset = total_rows.saturating_sub(visible_rows);
    max_offset - from_bottom.min(max_offset)
}

/// Largest useful `from_bottom` value for the current layout.
pub fn max_scroll(total_rows: u16, visible_rows: u16) -> u16 {
    total_rows.saturating_sub(visible_rows)
}

pub fn title_text(session: &Session) -> String {
    let connection = match session.connection() {
        Some(health) => health.to_string(),
        None => "checking".to_string(),
    };
    format!(
        "ChatGuard v{} • Mode: {} • {}",
        env!("CARGO_PKG_VERSION"),
        session.mode(),
        connection
    )
}

pub fn input_title(session: &Session) -> String {
    if session.is_clear_pending() {
        return "Clear the whole conversation? (y/n)".to_string();
    }
    match session.input_notice() {
        Some(notice) => format!("Type your message • {notice}"),
        None => "Type your message (Enter to send, Ctrl+F mode, Ctrl+L clear, Esc to quit)"
            .to_string(),
    }
}

/// Split the frame into transcript, status and input rows.
pub fn layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Rows available for transcript text once the title is drawn.
pub fn transcript_rows(area: Rect) -> u16 {
    layout(area)[0].height.saturating_sub(1)
}

pub fn ui(f: &mut Frame, ctx: &RenderContext<'_>) {
    let theme = ctx.theme;
    let [transcript_area, status_area, input_area] = layout(f.area());

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let lines = build_display_lines(ctx.session, theme, ctx.pending_elapsed);
    let visible_rows = transcript_area.height.saturating_sub(1);
    let total_rows = wrapped_line_count(&lines, transcript_area.width);
    let offset = top_offset(total_rows, visible_rows, ctx.scroll_from_bottom);

    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(title_text(ctx.session), theme.title_style)),
        )
        .wrap(Wrap { trim: true })
        .scroll((offset, 0));
    f.render_widget(transcript, transcript_area);

    let status = ctx.session.status();
    let status_style = if status.is_error() {
        theme.status_error_style
    } else {
        theme.status_style
    };
    f.render_widget(
        Paragraph::new(Span::styled(status.to_string(), status_style)),
        status_area,
    );

    let title_style = if ctx.session.input_notice().is_some() {
        theme.counter_style
    } else {
        theme.input_title_style
    };

    // Keep the cursor in view on long single-line input.
    let inner_width = usize::from(input_area.width.saturating_sub(2));
    let before_cursor: String = ctx.input.text().chars().take(ctx.input.cursor()).collect();
    let cursor_col = UnicodeWidthStr::width(before_cursor.as_str());
    let horizontal = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let input = Paragraph::new(ctx.input.text().to_string())
        .style(theme.input_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style)
                .title(Span::styled(input_title(ctx.session), title_style)),
        )
        .scroll((0, u16::try_from(horizontal).unwrap_or(u16::MAX)));
    f.render_widget(input, input_area);

    if !ctx.session.is_clear_pending() {
        let visible_col = u16::try_from(cursor_col - horizontal).unwrap_or(0);
        f.set_cursor_position((input_area.x + 1 + visible_col, input_area.y + 1));
    }
}
