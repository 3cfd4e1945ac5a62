//! Page geometry handed in by the host.

use serde::{Deserialize, Serialize};

/// One sidebar element as measured on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidebarBox {
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Hidden by the page itself (not by the overlay).
    pub hidden: bool,
}

impl SidebarBox {
    pub fn visible(width: f64) -> Self {
        Self {
            width,
            hidden: false,
        }
    }

    pub fn hidden() -> Self {
        Self {
            width: 0.0,
            hidden: true,
        }
    }
}

/// Snapshot of the page the button sits on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub sidebars: Vec<SidebarBox>,
    pub body_width: f64,
}

impl PageLayout {
    pub fn new(body_width: f64, sidebars: Vec<SidebarBox>) -> Self {
        Self {
            sidebars,
            body_width,
        }
    }

    /// Whether some sidebar is hidden or takes at least `ratio` of the page.
    pub fn sidebar_in_the_way(&self, ratio: f64) -> bool {
        self.sidebars
            .iter()
            .any(|side| side.hidden || side.width / self.body_width >= ratio)
    }
}

/// Header measurements used to anchor the options menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderMetrics {
    pub header_height: f64,
    /// Bottom edge of the tab menu, in viewport coordinates.
    pub tab_menu_bottom: f64,
    pub scroll_y: f64,
}

/// Fixed-position placement of the options menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuPlacement {
    pub top: f64,
    pub left: f64,
}

impl MenuPlacement {
    /// Centre a menu of `menu_width` under the pointer, below the header.
    pub fn below_header(pointer_x: f64, header: &HeaderMetrics, menu_width: f64) -> Self {
        Self {
            top: header.header_height.max(header.tab_menu_bottom) - header.scroll_y,
            left: pointer_x - menu_width / 2.0,
        }
    }
}

/// Outline of the options menu: a box with an upward arrow centred on its
/// top edge, the arrow pointing at the anchor point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuShape {
    pub width: f64,
    pub height: f64,
    /// Height of the arrow; the box content starts below it.
    pub arrow_height: f64,
    pub stroke_width: f64,
    /// Polygon vertices, clockwise from the top-left corner of the box.
    pub outline: Vec<[f64; 2]>,
}

impl MenuShape {
    pub fn new(
        width: f64,
        height: f64,
        arrow_height: f64,
        arrow_half_len: f64,
        stroke_width: f64,
    ) -> Self {
        let mid = width / 2.0;
        let outline = vec![
            [0.0, arrow_height],
            [mid - arrow_half_len, arrow_height],
            [mid, 0.0],
            [mid + arrow_half_len, arrow_height],
            [width, arrow_height],
            [width, height],
            [0.0, height],
        ];
        Self {
            width,
            height,
            arrow_height,
            stroke_width,
            outline,
        }
    }

    /// SVG `points` attribute for the outline.
    pub fn svg_points(&self) -> String {
        self.outline
            .iter()
            .map(|[x, y]| format!("{x},{y}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Mouse button of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u16),
}

impl PointerButton {
    /// From the 1-based `which` numbering of mouse events.
    pub fn from_which(which: u16) -> Self {
        match which {
            1 => Self::Primary,
            2 => Self::Middle,
            3 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_in_the_way() {
        let narrow = PageLayout::new(1000.0, vec![SidebarBox::visible(300.0)]);
        assert!(!narrow.sidebar_in_the_way(0.342));

        let wide = PageLayout::new(1000.0, vec![SidebarBox::visible(342.0)]);
        assert!(wide.sidebar_in_the_way(0.342));

        let hidden = PageLayout::new(1000.0, vec![SidebarBox::visible(10.0), SidebarBox::hidden()]);
        assert!(hidden.sidebar_in_the_way(0.342));

        assert!(!PageLayout::default().sidebar_in_the_way(0.342));
    }

    #[test]
    fn test_menu_placement() {
        let header = HeaderMetrics {
            header_height: 60.0,
            tab_menu_bottom: 72.0,
            scroll_y: 12.0,
        };
        let placement = MenuPlacement::below_header(400.0, &header, 180.0);
        assert_eq!(placement, MenuPlacement { top: 60.0, left: 310.0 });
    }

    #[test]
    fn test_menu_shape_outline() {
        let shape = MenuShape::new(180.0, 45.0, 10.0, 7.5, 1.0);
        assert_eq!(shape.outline.len(), 7);
        assert_eq!(shape.outline[2], [90.0, 0.0]);
        assert_eq!(
            shape.svg_points(),
            "0,10 82.5,10 90,0 97.5,10 180,10 180,45 0,45"
        );
    }

    #[test]
    fn test_pointer_button_from_which() {
        assert_eq!(PointerButton::from_which(1), PointerButton::Primary);
        assert_eq!(PointerButton::from_which(3), PointerButton::Secondary);
        assert_eq!(PointerButton::from_which(9), PointerButton::Other(9));
    }
}
