//! RTF border and tab stop support.
//!
//! Paragraph borders and table-cell borders share one [`Border`] record. The
//! `\brdr*` style and property words operate on the border selected by the
//! last `\brdrt`/`\brdrb`/`\brdrl`/`\brdrr` (or `\clbrdr*`); with no selection
//! they apply to all four paragraph borders.

use super::types::ColorRef;

/// Border style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// No border
    #[default]
    None,
    /// Single line border (also used for double, thick, shadowed and hairline)
    Solid,
    /// Dashed border
    Dashes,
    /// Dotted border
    Dots,
    /// Dash-dot border
    DashDot,
    /// Dash-dot-dot border
    DashDotDot,
}

/// Border definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    /// Border style
    pub style: BorderStyle,
    /// Border width (in twips)
    pub width: i32,
    /// Border color reference, `-1` for automatic
    pub color: ColorRef,
    /// Space between border and content (in twips)
    pub space: i32,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            style: BorderStyle::None,
            width: 0,
            color: -1,
            space: 0,
        }
    }
}

impl Border {
    /// Check if border is visible
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.style != BorderStyle::None || self.width > 0
    }

    /// Restore the `\pard` / `\trowd` defaults; spacing is kept.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.style = BorderStyle::None;
        self.width = 0;
        self.color = -1;
    }
}

/// Side of a paragraph or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderSide {
    pub const ALL: [BorderSide; 4] = [
        BorderSide::Left,
        BorderSide::Right,
        BorderSide::Top,
        BorderSide::Bottom,
    ];
}

/// Border property written by `\brdrw`, `\brdrcf` and `\brsp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderField {
    Width,
    Color,
    Space,
}

impl BorderField {
    #[inline]
    pub(crate) fn apply(self, border: &mut Border, value: i32) {
        match self {
            BorderField::Width => border.width = value,
            BorderField::Color => border.color = value,
            BorderField::Space => border.space = value,
        }
    }
}

/// Borders for a paragraph or table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Borders {
    /// Left border
    pub left: Border,
    /// Right border
    pub right: Border,
    /// Top border
    pub top: Border,
    /// Bottom border
    pub bottom: Border,
}

impl Borders {
    #[inline]
    pub fn side(&self, side: BorderSide) -> &Border {
        match side {
            BorderSide::Left => &self.left,
            BorderSide::Right => &self.right,
            BorderSide::Top => &self.top,
            BorderSide::Bottom => &self.bottom,
        }
    }

    #[inline]
    pub fn side_mut(&mut self, side: BorderSide) -> &mut Border {
        match side {
            BorderSide::Left => &mut self.left,
            BorderSide::Right => &mut self.right,
            BorderSide::Top => &mut self.top,
            BorderSide::Bottom => &mut self.bottom,
        }
    }

    /// Iterate over the sides in left, right, top, bottom order.
    pub fn iter(&self) -> impl Iterator<Item = (BorderSide, &Border)> {
        BorderSide::ALL.into_iter().map(move |side| (side, self.side(side)))
    }

    /// Check if any border is visible
    #[inline]
    pub fn has_any_border(&self) -> bool {
        self.iter().any(|(_, border)| border.is_visible())
    }

    pub(crate) fn reset(&mut self) {
        for side in BorderSide::ALL {
            self.side_mut(side).reset();
        }
    }
}

/// Tab stop alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabAlignment {
    /// Left-aligned tab
    #[default]
    Left,
    /// Centered tab
    Center,
    /// Right-aligned tab
    Right,
    /// Decimal tab (align on decimal point)
    Decimal,
}

/// Tab stop leader character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabLeader {
    /// No leader
    #[default]
    None,
    /// Dot leader (........)
    Dot,
    /// Hyphen leader (--------)
    Hyphen,
    /// Underline leader (________)
    Underline,
    /// Thick line leader
    ThickLine,
}

/// Tab stop definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabStop {
    /// Position (in twips from left margin)
    pub position: i32,
    /// Alignment
    pub alignment: TabAlignment,
    /// Leader character
    pub leader: TabLeader,
}

impl TabStop {
    /// Create a left-aligned tab stop
    #[inline]
    pub fn new(position: i32) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_visibility() {
        let mut border = Border::default();
        assert!(!border.is_visible());

        border.width = 15;
        assert!(border.is_visible());

        border.width = 0;
        border.style = BorderStyle::Dots;
        assert!(border.is_visible());
    }

    #[test]
    fn test_reset_keeps_spacing() {
        let mut borders = Borders::default();
        for side in BorderSide::ALL {
            let border = borders.side_mut(side);
            border.style = BorderStyle::Solid;
            border.color = 2;
            border.space = 40;
        }
        borders.reset();

        assert!(!borders.has_any_border());
        assert_eq!(borders.top.space, 40);
        assert_eq!(borders.left.color, -1);
    }

    #[test]
    fn test_border_field_apply() {
        let mut border = Border::default();
        BorderField::Width.apply(&mut border, 30);
        BorderField::Color.apply(&mut border, 4);
        BorderField::Space.apply(&mut border, 20);
        assert_eq!((border.width, border.color, border.space), (30, 4, 20));
    }
}
