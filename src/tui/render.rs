use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::ui::NoticeLevel;

use super::form::Form;
use super::menu::{viewport_offset, MenuCursor};
use super::screen::{Banner, KeyHint, Toast};
use super::theme::Theme;

pub(crate) const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(crate) fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

pub(crate) fn panel_block<'a>(title: Option<&'a str>, theme: &Theme) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(theme.border);
    if let Some(title) = title {
        block = block.title_top(Line::from(Span::styled(format!(" {title} "), theme.accent)).left_aligned());
    }
    block
}

pub(crate) fn header(frame: &mut Frame<'_>, area: Rect, title: &str, root_note: Option<&str>, theme: &Theme) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(theme.border)
        .title_top(
            Line::from(vec![
                Span::styled(" STEWARD ", theme.accent),
                Span::styled(format!("· {title} "), theme.text),
            ])
            .left_aligned(),
        )
        .title_bottom(
            Line::from(Span::styled(
                format!(" v{} ", env!("CARGO_PKG_VERSION")),
                theme.muted,
            ))
            .right_aligned(),
        );
    if let Some(note) = root_note {
        block = block.title_top(
            Line::from(Span::styled(format!(" root: {note} "), theme.warn)).right_aligned(),
        );
    }
    frame.render_widget(block, area);
}

pub(crate) fn footer(frame: &mut Frame<'_>, area: Rect, hints: &[KeyHint], toast: Option<&Toast>, theme: &Theme) {
    let mut spans = Vec::new();
    for (index, (key, action)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ", theme.muted));
        }
        spans.push(Span::styled(*key, theme.highlight));
        spans.push(Span::styled(format!(" {action}"), theme.muted));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if let Some(toast) = toast {
        let text = format!(" {} ", toast.text);
        let width = text.chars().count().min(area.width as usize) as u16;
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y,
            width,
            height: 1,
        };
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(Span::styled(text, theme.accent)).right_aligned(),
            toast_area,
        );
    }
}

/// A selectable list with the cursor row marked and scrolled into view.
pub(crate) fn menu_list(
    frame: &mut Frame<'_>,
    area: Rect,
    title: Option<&str>,
    rows: &[Line<'_>],
    cursor: &MenuCursor,
    theme: &Theme,
) {
    let block = panel_block(title, theme);
    let inner_height = area.height.saturating_sub(2) as usize;
    let offset = viewport_offset(cursor.index(), inner_height.max(1));
    let mut lines = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate().skip(offset) {
        let marker = if index == cursor.index() { "› " } else { "  " };
        let marker_style = if index == cursor.index() {
            theme.highlight
        } else {
            theme.text
        };
        let mut spans = vec![Span::styled(marker, marker_style)];
        spans.extend(row.spans.iter().cloned());
        lines.push(Line::from(spans));
    }
    if rows.is_empty() {
        lines.push(Line::from(Span::styled("(nothing here)", theme.muted)));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(crate) fn key_value_lines<'a>(pairs: &[(String, String)], theme: &Theme) -> Vec<Line<'a>> {
    let width = pairs
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    pairs
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{key:width$}  "), theme.muted),
                Span::styled(value.clone(), theme.text),
            ])
        })
        .collect()
}

/// One line per field, cursor marker on the focused row, error lines
/// interleaved beneath the field they belong to.
pub(crate) fn form_lines<'a>(form: &Form, theme: &Theme) -> Vec<Line<'a>> {
    let width = form
        .fields
        .iter()
        .map(|field| field.label.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines = Vec::new();
    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focus;
        let marker = if focused { "› " } else { "  " };
        let value_style = if focused { theme.highlight } else { theme.text };
        lines.push(Line::from(vec![
            Span::styled(marker, theme.highlight),
            Span::styled(format!("{:width$}  ", field.label), theme.muted),
            Span::styled(field.display_value(), value_style),
        ]));
        if let Some(error) = &field.error {
            lines.push(Line::from(Span::styled(
                format!("  {:width$}  {error}", ""),
                theme.err,
            )));
        }
    }
    lines
}

/// Marker + label for a screen-managed focus row below the text fields.
pub(crate) fn extra_row_line<'a>(label: String, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if focused { "› " } else { "  " };
    let style = if focused { theme.highlight } else { theme.text };
    Line::from(vec![
        Span::styled(marker, theme.highlight),
        Span::styled(label, style),
    ])
}

fn level_decor(level: NoticeLevel, theme: &Theme) -> (&'static str, Style) {
    match level {
        NoticeLevel::Info => ("Info", theme.accent),
        NoticeLevel::Success => ("Done", theme.ok),
        NoticeLevel::Warning => ("Warning", theme.warn),
        NoticeLevel::Error => ("Error", theme.err),
    }
}

pub(crate) fn banner_overlay(frame: &mut Frame<'_>, banner: &Banner, theme: &Theme) {
    let area = centered_rect(64, 40, frame.area());
    frame.render_widget(Clear, area);
    let (label, style) = level_decor(banner.level, theme);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(style)
        .title_top(Line::from(Span::styled(format!(" {label} "), style)).left_aligned());
    let mut lines = vec![Line::from(Span::styled(banner.title.clone(), theme.text))];
    for body_line in &banner.body {
        lines.push(Line::from(Span::styled(body_line.clone(), theme.muted)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "press any key to continue",
        theme.muted,
    )));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
