//! Value and selection state of plain text fields (`textarea`, `input`)

/// Linear text value with a selection, both measured in characters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextControl {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl TextControl {
    /// A control holding `value` with the caret at the end
    pub fn new(value: &str) -> Self {
        let mut control = TextControl::default();
        control.set_value(value);
        control
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value. Like browsers, the caret moves to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        let len = self.len();
        self.selection_start = len;
        self.selection_end = len;
    }

    /// Length of the value in characters
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Set the selection; both ends are clamped to the value and `end >= start`.
    pub fn set_selection_range(&mut self, start: usize, end: usize) {
        let len = self.len();
        let end = end.min(len);
        self.selection_start = start.min(end);
        self.selection_end = end;
    }

    /// Text currently selected
    pub fn selected_text(&self) -> String {
        self.value
            .chars()
            .skip(self.selection_start)
            .take(self.selection_end - self.selection_start)
            .collect()
    }
}
