use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{DrawContext, NodeControl, RowInfo};
use crate::geometry::Size;

type TextFn<K> = Box<dyn Fn(&RowInfo<K>) -> String>;
type TipFn<K> = Box<dyn Fn(&RowInfo<K>) -> Option<String>>;

/// Display width of a string in terminal cells.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Cut `s` to `max_width` cells, ending with an ellipsis when shortened.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// A control that shows a line of text computed from the row.
pub struct TextControl<K> {
    text: TextFn<K>,
    tooltip: Option<TipFn<K>>,
    column: Option<usize>,
    /// Fixed width; measured from the text when `None`.
    width: Option<u16>,
    editable: bool,
}

impl<K> TextControl<K> {
    pub fn new(text: impl Fn(&RowInfo<K>) -> String + 'static) -> Self {
        Self {
            text: Box::new(text),
            tooltip: None,
            column: None,
            width: None,
            editable: false,
        }
    }

    pub fn in_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Fn(&RowInfo<K>) -> Option<String> + 'static) -> Self {
        self.tooltip = Some(Box::new(tooltip));
        self
    }

    /// Allow label editing on this control.
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }
}

impl<K> NodeControl<K> for TextControl<K> {
    fn column(&self) -> Option<usize> {
        self.column
    }

    fn measure(&self, row: &RowInfo<K>, ctx: &DrawContext) -> Size {
        let width = self.width.unwrap_or_else(|| {
            display_width(&(self.text)(row)).min(u16::MAX as usize) as u16
        });
        Size::new(width.min(ctx.bounds.width), 1)
    }

    fn text(&self, row: &RowInfo<K>) -> String {
        (self.text)(row)
    }

    fn tooltip(&self, row: &RowInfo<K>) -> Option<String> {
        self.tooltip.as_ref().and_then(|tip| tip(row))
    }

    fn is_editable(&self, _row: &RowInfo<K>) -> bool {
        self.editable
    }
}
