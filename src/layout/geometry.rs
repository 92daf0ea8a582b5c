//! Page and cell geometry handed to the renderer
//!
//! Margins and pads are named as the page comes out of the printer. In
//! landscape the page is drawn turned a quarter, so its width and height
//! trade places and the named sides are reassigned to match.

use crate::settings::{FontStyle, HAlign, Settings, VAlign};

use super::types::{BoundingBox, Sides};

/// Size and grid of one page, in the orientation it is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: Sides,
    pub landscape: bool,
    pub rows: u32,
    pub columns: u32,
    pub row_gap: f64,
    pub column_gap: f64,
    /// Space between each cell and its text box
    pub pads: Sides,
    /// Rightward shift of every text box
    pub delta_x: f64,
    /// Upward shift of every text box
    pub delta_y: f64,
}

impl PageGeometry {
    pub fn from_settings(settings: &Settings) -> Self {
        let margins = Sides::new(
            settings.left_page_margin,
            settings.right_page_margin,
            settings.top_page_margin,
            settings.bottom_page_margin,
        );
        let pads = Sides::new(
            settings.left_pad,
            settings.right_pad,
            settings.top_pad,
            settings.bottom_pad,
        );
        let (width, height, margins, pads) = if settings.landscape {
            (settings.page_height, settings.page_width, margins.rotated(), pads.rotated())
        } else {
            (settings.page_width, settings.page_height, margins, pads)
        };
        Self {
            width,
            height,
            margins,
            landscape: settings.landscape,
            rows: settings.rows,
            columns: settings.columns,
            row_gap: settings.row_gap,
            column_gap: settings.column_gap,
            pads,
            delta_x: settings.delta_x,
            delta_y: settings.delta_y,
        }
    }

    /// The whole page
    pub fn page(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }

    /// The page less its margins
    pub fn print_area(&self) -> BoundingBox {
        self.page().inset(&self.margins)
    }

    /// Bounds of the cell at zero-based `row` and `column`
    pub fn cell(&self, row: u32, column: u32) -> BoundingBox {
        let area = self.print_area();
        let columns = self.columns.max(1) as f64;
        let rows = self.rows.max(1) as f64;
        let width = ((area.width - (columns - 1.0) * self.column_gap) / columns).max(0.0);
        let height = ((area.height - (rows - 1.0) * self.row_gap) / rows).max(0.0);
        BoundingBox::new(
            area.x + column as f64 * (width + self.column_gap),
            area.y + row as f64 * (height + self.row_gap),
            width,
            height,
        )
    }

    /// Every cell on a page, row by row
    pub fn cells(&self) -> impl Iterator<Item = BoundingBox> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| self.cell(row, col)))
    }

    /// Box the text of a cell is fitted into: the cell less its pads,
    /// shifted by the deltas
    pub fn text_box(&self, cell: BoundingBox) -> BoundingBox {
        cell.inset(&self.pads).translate(self.delta_x, -self.delta_y)
    }
}

/// Font used for label text
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub name: String,
    pub style: FontStyle,
    pub size: f64,
}

impl FontSpec {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            name: settings.font_name.clone(),
            style: settings.font_style,
            size: settings.font_size,
        }
    }
}

/// Everything the renderer needs to draw one label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCell {
    pub text: String,
    pub cell: BoundingBox,
    pub text_box: BoundingBox,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub font: FontSpec,
    /// Stroke the cell outline
    pub outline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 0.000001;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn sheet() -> Settings {
        Settings {
            page_width: 612.0,
            page_height: 792.0,
            left_page_margin: 13.5,
            right_page_margin: 13.5,
            top_page_margin: 36.0,
            bottom_page_margin: 36.0,
            rows: 10,
            columns: 3,
            column_gap: 9.0,
            row_gap: 0.0,
            left_pad: 9.0,
            right_pad: 9.0,
            top_pad: 4.5,
            bottom_pad: 4.5,
            landscape: false,
            ..Settings::default()
        }
    }

    #[test]
    fn test_portrait_keeps_names() {
        let page = PageGeometry::from_settings(&sheet());
        assert_eq!((page.width, page.height), (612.0, 792.0));
        assert_eq!(page.margins, Sides::new(13.5, 13.5, 36.0, 36.0));
        assert_eq!(page.print_area(), BoundingBox::new(13.5, 36.0, 585.0, 720.0));
    }

    #[test]
    fn test_landscape_swaps_page_margins_and_pads() {
        let settings = Settings {
            landscape: true,
            ..sheet()
        };
        let page = PageGeometry::from_settings(&settings);
        assert_eq!((page.width, page.height), (792.0, 612.0));
        assert_eq!(page.margins, Sides::new(36.0, 36.0, 13.5, 13.5));
        assert_eq!(page.pads, Sides::new(4.5, 4.5, 9.0, 9.0));
    }

    #[test]
    fn test_cells_tile_the_print_area() {
        let page = PageGeometry::from_settings(&sheet());
        let first = page.cell(0, 0);
        assert!(close(first.width, 189.0));
        assert!(close(first.height, 72.0));
        let last = page.cell(9, 2);
        assert!(close(last.right(), 612.0 - 13.5));
        assert!(close(last.bottom(), 792.0 - 36.0));
        let second = page.cell(0, 1);
        assert!(close(second.x, first.right() + 9.0));
        assert_eq!(page.cells().count(), 30);
    }

    #[test]
    fn test_text_box_applies_pads_and_deltas() {
        let settings = Settings {
            delta_x: 2.0,
            delta_y: 3.0,
            ..sheet()
        };
        let page = PageGeometry::from_settings(&settings);
        let text_box = page.text_box(page.cell(0, 0));
        assert!(close(text_box.x, 13.5 + 9.0 + 2.0));
        assert!(close(text_box.y, 36.0 + 4.5 - 3.0));
        assert!(close(text_box.width, 189.0 - 18.0));
        assert!(close(text_box.height, 72.0 - 9.0));
    }
}
