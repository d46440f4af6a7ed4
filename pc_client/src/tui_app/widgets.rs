use ratatui::widgets::{ListItem, ListState, ScrollbarState};

/// A bounded list of items drawn bottom-to-top, newest first, with a
/// selection that can scroll back through older items.
pub struct ScrollableList {
    max_items: usize,
    pub list_items: Vec<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            list_items: Vec::with_capacity(max_items),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    /// Add a newest item, dropping the oldest one when full.
    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.insert(0, item);
        self.list_items.truncate(self.max_items);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
        self.jump_to_last();
    }

    pub fn clear(&mut self) {
        self.list_items.clear();
        self.list_state.select(None);
        self.scroll_state = ScrollbarState::default();
    }

    pub fn len(&self) -> usize {
        self.list_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list_items.is_empty()
    }

    /// Index of the selected item, 0 being the newest.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn select(&mut self, idx: usize) {
        if self.list_items.is_empty() {
            return;
        }
        let idx = idx.min(self.list_items.len() - 1);
        self.list_state.select(Some(idx));
        // The scrollbar runs top to bottom, oldest to newest.
        self.scroll_state = self
            .scroll_state
            .position(self.list_items.len() - 1 - idx);
    }

    /// Scroll towards older items.
    pub fn move_up(&mut self) {
        let idx = self.list_state.selected().map_or(0, |idx| idx + 1);
        self.select(idx);
    }

    /// Scroll towards newer items.
    pub fn move_down(&mut self) {
        let idx = self
            .list_state
            .selected()
            .map_or(0, |idx| idx.saturating_sub(1));
        self.select(idx);
    }

    /// Select the oldest item.
    pub fn jump_to_first(&mut self) {
        self.select(self.list_items.len().saturating_sub(1));
    }

    /// Select the newest item.
    pub fn jump_to_last(&mut self) {
        self.select(0);
    }
}

/// Single line text input with a cursor.
#[derive(Debug, Default)]
pub struct UserInput {
    pub value: String,
    /// Cursor position in characters, not bytes.
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.char_idx)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.move_right();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.char_idx == 0 {
            return;
        }
        self.move_left();
        let idx = self.byte_idx();
        self.value.remove(idx);
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.char_idx < self.char_count() {
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.char_count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.char_count();
    }

    /// Take the current value, leaving the input empty.
    pub fn submit(&mut self) -> String {
        self.char_idx = 0;
        std::mem::take(&mut self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> UserInput {
        let mut input = UserInput::new();
        for c in text.chars() {
            input.input(c);
        }
        input
    }

    #[test]
    fn test_push_keeps_newest_selected() {
        let mut list = ScrollableList::new(8);
        list.push("first".into());
        list.push("second".into());
        assert_eq!(list.len(), 2);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_push_drops_oldest_when_full() {
        let mut list = ScrollableList::new(3);
        for i in 0..5 {
            list.push(format!("item {i}").into());
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.list_items[0], ListItem::new("item 4"));
        assert_eq!(list.list_items[2], ListItem::new("item 2"));
    }

    #[test]
    fn test_scrolling_is_clamped() {
        let mut list = ScrollableList::new(8);
        for i in 0..3 {
            list.push(format!("item {i}").into());
        }
        list.move_down();
        assert_eq!(list.selected(), Some(0));
        for _ in 0..10 {
            list.move_up();
        }
        assert_eq!(list.selected(), Some(2));
        list.jump_to_last();
        assert_eq!(list.selected(), Some(0));
        list.jump_to_first();
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn test_scrolling_empty_list() {
        let mut list = ScrollableList::new(8);
        list.move_up();
        list.jump_to_first();
        assert!(list.is_empty());
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_clear() {
        let mut list = ScrollableList::new(8);
        list.push("item".into());
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_input_and_submit() {
        let mut input = typed("raise");
        assert_eq!(input.char_idx, 5);
        assert_eq!(input.submit(), "raise");
        assert!(input.value.is_empty());
        assert_eq!(input.char_idx, 0);
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut input = typed("cal");
        input.jump_to_first();
        input.delete();
        assert_eq!(input.value, "al");
        input.input('c');
        input.jump_to_last();
        input.input('l');
        assert_eq!(input.value, "call");
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "cal");
        assert_eq!(input.char_idx, 2);
    }

    #[test]
    fn test_multibyte_names() {
        let mut input = typed("name 1 José");
        input.backspace();
        input.input('é');
        assert_eq!(input.value, "name 1 José");
        input.move_left();
        input.delete();
        assert_eq!(input.value, "name 1 Jos");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = typed("ab");
        input.move_right();
        assert_eq!(input.char_idx, 2);
        input.jump_to_first();
        input.move_left();
        input.backspace();
        assert_eq!(input.char_idx, 0);
        assert_eq!(input.value, "ab");
    }
}
