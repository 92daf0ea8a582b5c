//! Document renderers
//!
//! A renderer receives the page geometry once, then one [`LabelCell`] per
//! placed label with explicit page breaks in between.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::SvgRenderer;

use crate::layout::{LabelCell, PageGeometry};

/// Receiver of placed labels
pub trait DocumentRenderer {
    /// Start the document; when `show_grid` is set every cell of every page
    /// is outlined
    fn open(&mut self, page: &PageGeometry, show_grid: bool);

    /// Draw one label on the current page
    fn draw_label(&mut self, label: &LabelCell);

    /// Continue on a fresh page
    fn start_new_page(&mut self);
}

/// One call made on a [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Open { page: PageGeometry, show_grid: bool },
    Label(LabelCell),
    NewPage,
}

/// Renderer that only records what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub ops: Vec<RenderOp>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels drawn, in order
    pub fn labels(&self) -> impl Iterator<Item = &LabelCell> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Label(label) => Some(label),
            _ => None,
        })
    }

    /// Number of pages the document would have
    pub fn page_count(&self) -> usize {
        let breaks = self.ops.iter().filter(|op| matches!(op, RenderOp::NewPage)).count();
        if self.ops.is_empty() {
            0
        } else {
            breaks + 1
        }
    }
}

impl DocumentRenderer for RecordingRenderer {
    fn open(&mut self, page: &PageGeometry, show_grid: bool) {
        self.ops.push(RenderOp::Open {
            page: page.clone(),
            show_grid,
        });
    }

    fn draw_label(&mut self, label: &LabelCell) {
        self.ops.push(RenderOp::Label(label.clone()));
    }

    fn start_new_page(&mut self) {
        self.ops.push(RenderOp::NewPage);
    }
}
