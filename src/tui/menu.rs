use crossterm::event::KeyCode;

/// Cursor over a vertical list. Movement clamps at both ends; nothing here
/// wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MenuCursor {
    index: usize,
    len: usize,
}

impl MenuCursor {
    pub(crate) fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub(crate) fn move_down(&mut self) {
        if self.index + 1 < self.len {
            self.index += 1;
        }
    }

    /// Re-clamps the cursor after the backing list changed size.
    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }

    pub(crate) fn selected<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.index)
    }
}

/// Maps up/down and their vi aliases onto the cursor; returns whether the
/// key was consumed.
pub(crate) fn moved(cursor: &mut MenuCursor, code: KeyCode) -> bool {
    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            cursor.move_up();
            true
        }
        KeyCode::Down | KeyCode::Char('j') => {
            cursor.move_down();
            true
        }
        _ => false,
    }
}

/// Next category index for the tab key. The one place movement wraps.
pub(crate) fn cycle(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + 1) % len
    }
}

/// First visible row so the cursor stays inside a viewport of `height` rows.
pub(crate) fn viewport_offset(index: usize, height: usize) -> usize {
    index.saturating_sub(height.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut cursor = MenuCursor::new(4);
        for _ in 0..4 {
            cursor.move_down();
        }
        assert_eq!(cursor.index(), 3);
        for _ in 0..4 {
            cursor.move_up();
        }
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn down_n_then_up_n_returns_to_zero() {
        for len in [1usize, 2, 5, 9] {
            let mut cursor = MenuCursor::new(len);
            for _ in 0..len {
                cursor.move_down();
            }
            for _ in 0..len {
                cursor.move_up();
            }
            assert_eq!(cursor.index(), 0, "len {len}");
        }
    }

    #[test]
    fn vi_aliases_move_the_cursor() {
        let mut cursor = MenuCursor::new(3);
        assert!(moved(&mut cursor, KeyCode::Char('j')));
        assert_eq!(cursor.index(), 1);
        assert!(moved(&mut cursor, KeyCode::Char('k')));
        assert_eq!(cursor.index(), 0);
        assert!(!moved(&mut cursor, KeyCode::Char('x')));
    }

    #[test]
    fn set_len_reclamps_cursor() {
        let mut cursor = MenuCursor::new(5);
        for _ in 0..4 {
            cursor.move_down();
        }
        cursor.set_len(2);
        assert_eq!(cursor.index(), 1);
        cursor.set_len(0);
        assert_eq!(cursor.index(), 0);
        assert!(cursor.is_empty());
    }

    #[test]
    fn cycle_wraps_modulo_len() {
        assert_eq!(cycle(0, 3), 1);
        assert_eq!(cycle(2, 3), 0);
        assert_eq!(cycle(0, 0), 0);
    }

    #[test]
    fn viewport_keeps_cursor_visible() {
        assert_eq!(viewport_offset(0, 10), 0);
        assert_eq!(viewport_offset(9, 10), 0);
        assert_eq!(viewport_offset(10, 10), 1);
        assert_eq!(viewport_offset(25, 10), 16);
    }
}
