use std::collections::VecDeque;
use std::time::Duration;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use vt100::Parser as VtParser;

pub(crate) const VT100_ENV: &str = "STEWARD_TUI_VT100";

pub(crate) const VT_ROWS: u16 = 2000;
pub(crate) const VT_COLS: u16 = 240;
pub(crate) const VT_SCROLLBACK: usize = 8000;

const MAX_OUTPUT_LINES: usize = 4000;

/// Output rendering goes through a vt100 emulator unless the operator opts
/// out, in which case the carriage-return-aware line buffer takes over.
pub(crate) fn vt100_enabled() -> bool {
    std::env::var(VT100_ENV)
        .ok()
        .is_none_or(|value| value != "0" && !value.eq_ignore_ascii_case("false"))
}

/// One display line of command output in the fallback buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputLine {
    pub(crate) stderr: bool,
    pub(crate) text: String,
}

pub(crate) fn vt_rows(
    parser: &mut VtParser,
    panel_rows: usize,
    panel_cols: usize,
    ui_scroll_offset: usize,
    follow: bool,
) -> (Vec<String>, usize, usize) {
    let safe_rows = panel_rows.max(1);
    parser.set_size(safe_rows as u16, panel_cols.max(1) as u16);
    // vt100 0.15.x can panic when scrollback offset exceeds visible row count.
    // Clamp to a safe range until we move to a parser version without this bug.
    let max_offset = vt_max_scrollback(parser).min(safe_rows.saturating_sub(1));
    let clamped = if follow {
        max_offset
    } else {
        ui_scroll_offset.min(max_offset)
    };
    let vt_scrollback = max_offset.saturating_sub(clamped);
    parser.set_scrollback(vt_scrollback);
    let rows = parser
        .screen()
        .rows_formatted(0, panel_cols.max(1) as u16)
        .map(|row| String::from_utf8_lossy(&row).into_owned())
        .collect::<Vec<String>>();
    (rows, clamped, max_offset)
}

fn vt_max_scrollback(parser: &mut VtParser) -> usize {
    let current = parser.screen().scrollback();
    parser.set_scrollback(usize::MAX);
    let max = parser.screen().scrollback();
    parser.set_scrollback(current);
    max
}

pub(crate) fn push_line(buffer: &mut VecDeque<OutputLine>, line: OutputLine) {
    buffer.push_back(line);
    while buffer.len() > MAX_OUTPUT_LINES {
        buffer.pop_front();
    }
}

/// Ingests one newline-free fragment of output into the fallback buffer.
/// Carriage returns and cursor-up sequences inside the fragment rewrite the
/// last line the way a terminal would, so dpkg/apt progress output collapses
/// instead of flooding the history.
pub(crate) fn ingest_fragment(buffer: &mut VecDeque<OutputLine>, stderr: bool, payload: &str) {
    let (normalized, cursor_up) = normalize_terminal_payload(payload);
    let fragments = normalized
        .split('\r')
        .map(sanitize_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<String>>();
    if fragments.is_empty() {
        return;
    }

    if fragments.len() == 1 && !normalized.contains('\r') {
        if cursor_up > 0 {
            replace_last_line(buffer, stderr, fragments[0].clone());
        } else {
            push_line(
                buffer,
                OutputLine {
                    stderr,
                    text: fragments[0].clone(),
                },
            );
        }
        return;
    }

    let mut first = true;
    for fragment in fragments {
        if first {
            if cursor_up > 0 {
                replace_last_line(buffer, stderr, fragment);
            } else {
                push_line(
                    buffer,
                    OutputLine {
                        stderr,
                        text: fragment,
                    },
                );
            }
            first = false;
        } else {
            replace_last_line(buffer, stderr, fragment);
        }
    }
}

/// Strips non-SGR escape sequences, counting cursor-up moves so the caller
/// can rewrite prior lines.
fn normalize_terminal_payload(raw: &str) -> (String, usize) {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::new();
    let mut i = 0usize;
    let mut cursor_up = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '\u{1b}' && i + 1 < chars.len() {
            match chars[i + 1] {
                '[' => {
                    let start = i;
                    i += 2;
                    let mut params = String::new();
                    while i < chars.len() {
                        let final_byte = chars[i];
                        if ('@'..='~').contains(&final_byte) {
                            if final_byte == 'm' {
                                out.extend(chars[start..=i].iter());
                            } else if final_byte == 'A' {
                                let count = params
                                    .split(';')
                                    .next()
                                    .and_then(|value| {
                                        if value.is_empty() {
                                            Some(1usize)
                                        } else {
                                            value.parse::<usize>().ok()
                                        }
                                    })
                                    .unwrap_or(1usize);
                                cursor_up = cursor_up.saturating_add(count);
                            }
                            break;
                        }
                        params.push(final_byte);
                        i += 1;
                    }
                }
                ']' => {
                    i += 2;
                    while i < chars.len() {
                        if chars[i] == '\u{0007}' {
                            break;
                        }
                        if chars[i] == '\u{1b}' && i + 1 < chars.len() && chars[i + 1] == '\\' {
                            i += 1;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
        } else {
            out.push(ch);
        }
        i += 1;
    }
    (out, cursor_up)
}

fn replace_last_line(buffer: &mut VecDeque<OutputLine>, stderr: bool, text: String) {
    if let Some(last) = buffer.back_mut() {
        last.stderr = stderr;
        last.text = text;
        return;
    }
    push_line(buffer, OutputLine { stderr, text });
}

pub(crate) fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|ch| {
            !matches!(
                ch,
                '\r'
                    | '\u{0000}'..='\u{0008}'
                    | '\u{000B}'
                    | '\u{000C}'
                    | '\u{000E}'..='\u{001A}'
                    | '\u{001C}'..='\u{001F}'
                    | '\u{007F}'
            )
        })
        .collect()
}

/// Converts a raw output row with SGR colour sequences into styled spans.
pub(crate) fn ansi_line(raw: &str, base: Style) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut style = base;
    let mut buf = String::new();
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        if chars[i] == '\u{1b}' && i + 1 < chars.len() && chars[i + 1] == '[' {
            if !buf.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut buf), style));
            }
            i += 2;
            let mut code = String::new();
            while i < chars.len() {
                let final_byte = chars[i];
                if ('@'..='~').contains(&final_byte) {
                    if final_byte == 'm' {
                        style = apply_sgr(style, &code, base);
                    }
                    break;
                }
                code.push(chars[i]);
                i += 1;
            }
        } else {
            buf.push(chars[i]);
        }
        i += 1;
    }
    if !buf.is_empty() {
        spans.push(Span::styled(buf, style));
    }
    if spans.is_empty() {
        return Line::from("");
    }
    Line::from(spans)
}

fn apply_sgr(current: Style, sgr: &str, base: Style) -> Style {
    let mut style = current;
    let parts = if sgr.is_empty() {
        vec!["0"]
    } else {
        sgr.split(';').collect::<Vec<&str>>()
    };
    for part in parts {
        match part.parse::<u8>() {
            Ok(0) => style = base,
            Ok(1) => style = style.add_modifier(Modifier::BOLD),
            Ok(2) => style = style.add_modifier(Modifier::DIM),
            Ok(3) => style = style.add_modifier(Modifier::ITALIC),
            Ok(4) => style = style.add_modifier(Modifier::UNDERLINED),
            Ok(22) => style = style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            Ok(23) => style = style.remove_modifier(Modifier::ITALIC),
            Ok(24) => style = style.remove_modifier(Modifier::UNDERLINED),
            Ok(30) => style = style.fg(Color::Black),
            Ok(31) => style = style.fg(Color::Red),
            Ok(32) => style = style.fg(Color::Green),
            Ok(33) => style = style.fg(Color::Yellow),
            Ok(34) => style = style.fg(Color::Blue),
            Ok(35) => style = style.fg(Color::Magenta),
            Ok(36) => style = style.fg(Color::Cyan),
            Ok(37) => style = style.fg(Color::Gray),
            Ok(39) => style = style.fg(base.fg.unwrap_or(Color::Reset)),
            Ok(90) => style = style.fg(Color::DarkGray),
            Ok(91) => style = style.fg(Color::LightRed),
            Ok(92) => style = style.fg(Color::LightGreen),
            Ok(93) => style = style.fg(Color::LightYellow),
            Ok(94) => style = style.fg(Color::LightBlue),
            Ok(95) => style = style.fg(Color::LightMagenta),
            Ok(96) => style = style.fg(Color::LightCyan),
            Ok(97) => style = style.fg(Color::White),
            _ => {}
        }
    }
    style
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h{minutes:02}m{secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{secs:02}s")
    } else {
        format!("{secs}s")
    }
}
