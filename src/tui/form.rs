use crossterm::event::{KeyCode, KeyEvent};

/// A single-line input. `secret` fields render as bullets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) secret: bool,
    pub(crate) error: Option<String>,
}

impl TextField {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
            error: None,
        }
    }

    pub(crate) fn secret(label: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::new(label)
        }
    }

    pub(crate) fn with_value(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(label)
        }
    }

    pub(crate) fn display_value(&self) -> String {
        if self.secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    pub(crate) fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// Field list plus focus. `extra_rows` reserves focus positions past the
/// text fields for screen-managed rows (toggles, submit buttons); the
/// screen interprets those itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Form {
    pub(crate) fields: Vec<TextField>,
    pub(crate) focus: usize,
    extra_rows: usize,
}

impl Form {
    pub(crate) fn new(fields: Vec<TextField>) -> Self {
        Self {
            fields,
            focus: 0,
            extra_rows: 0,
        }
    }

    pub(crate) fn with_extra_rows(fields: Vec<TextField>, extra_rows: usize) -> Self {
        Self {
            fields,
            focus: 0,
            extra_rows,
        }
    }

    fn positions(&self) -> usize {
        self.fields.len() + self.extra_rows
    }

    pub(crate) fn focused_field(&self) -> Option<&TextField> {
        self.fields.get(self.focus)
    }

    pub(crate) fn focus_next(&mut self) {
        let positions = self.positions();
        if positions > 0 {
            self.focus = (self.focus + 1) % positions;
        }
    }

    pub(crate) fn focus_prev(&mut self) {
        if self.focus > 0 {
            self.focus -= 1;
        }
    }

    pub(crate) fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    pub(crate) fn set_error(&mut self, index: usize, message: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = Some(message.into());
        }
    }

    pub(crate) fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|field| field.value.trim())
            .unwrap_or("")
    }

    /// Routes editing keys to the focused field. Enter is left for the
    /// screen's submit handling; everything consumed here returns true.
    pub(crate) fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                true
            }
            KeyCode::Down => {
                if self.focus + 1 < self.positions() {
                    self.focus += 1;
                }
                true
            }
            KeyCode::Up => {
                self.focus_prev();
                true
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                    field.error = None;
                }
                true
            }
            KeyCode::Char(ch) => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(ch);
                    field.error = None;
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}

pub(crate) fn parse_port(value: &str) -> Result<u16, String> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err("enter a port between 1 and 65535".to_owned()),
    }
}

pub(crate) fn require(value: &str, what: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{what} is required"))
    } else {
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn typed_characters_land_in_the_focused_field() {
        let mut form = Form::new(vec![TextField::new("name"), TextField::new("value")]);
        assert!(form.handle_key(&press(KeyCode::Char('a'))));
        form.focus_next();
        assert!(form.handle_key(&press(KeyCode::Char('b'))));
        assert_eq!(form.value(0), "a");
        assert_eq!(form.value(1), "b");
    }

    #[test]
    fn backspace_edits_and_clears_the_field_error() {
        let mut form = Form::new(vec![TextField::new("port")]);
        form.handle_key(&press(KeyCode::Char('8')));
        form.set_error(0, "bad");
        form.handle_key(&press(KeyCode::Backspace));
        assert_eq!(form.value(0), "");
        assert!(form.fields[0].error.is_none());
    }

    #[test]
    fn tab_cycles_through_fields_and_extra_rows() {
        let mut form = Form::with_extra_rows(vec![TextField::new("a"), TextField::new("b")], 1);
        assert_eq!(form.focus, 0);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, 2);
        assert!(form.focused_field().is_none());
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn secret_fields_mask_their_value() {
        let mut field = TextField::secret("password");
        field.value.push_str("hunter2");
        assert_eq!(field.display_value(), "•••••••");
    }

    #[test]
    fn parse_port_bounds() {
        assert_eq!(parse_port("8080"), Ok(8080));
        assert_eq!(parse_port(" 22 "), Ok(22));
        assert!(parse_port("0").is_err());
        assert!(parse_port("65536").is_err());
        assert!(parse_port("http").is_err());
    }

    #[test]
    fn require_rejects_blank_values() {
        assert!(require("  ", "user").is_err());
        assert_eq!(require(" www ", "user").unwrap(), "www");
    }
}
