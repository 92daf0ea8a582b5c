//! Placement of label texts on pages of label cells
//!
//! [`placement`] decides which page, row, and column each text lands on;
//! [`geometry`] turns that into boxes on the page for the renderer.

pub mod error;
pub mod geometry;
pub mod placement;
pub mod types;

pub use error::LayoutError;
pub use geometry::{FontSpec, LabelCell, PageGeometry};
pub use placement::{needs_new_page, page_number, place, row_col, Placement};
pub use types::{BoundingBox, Point, Sides};
