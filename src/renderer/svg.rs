//! SVG generation from placed labels
//!
//! The document is one outer `<svg>` holding a nested `<svg>` per page,
//! stacked top to bottom. Label text is clipped to its text box, which
//! truncates anything that overflows.

use crate::layout::{BoundingBox, LabelCell, PageGeometry};
use crate::settings::{HAlign, VAlign};

use super::{DocumentRenderer, SvgConfig};

/// Build an SVG document page by page
pub struct SvgRenderer {
    config: SvgConfig,
    page: Option<PageGeometry>,
    show_grid: bool,
    defs: Vec<String>,
    pages: Vec<Vec<String>>,
}

impl SvgRenderer {
    /// Create a new SVG renderer
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            page: None,
            show_grid: false,
            defs: vec![],
            pages: vec![],
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self, level: usize) -> String {
        if self.config.pretty_print {
            "  ".repeat(level)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn current_page(&mut self) -> &mut Vec<String> {
        if self.pages.is_empty() {
            self.pages.push(vec![]);
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Number of pages started so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rect(&self, bounds: &BoundingBox, class: &str, styles: &str) -> String {
        format!(
            r#"{}<rect class="{}{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(2),
            self.prefix(),
            class,
            num(bounds.x),
            num(bounds.y),
            num(bounds.width),
            num(bounds.height),
            styles
        )
    }

    /// Add a clip path for `bounds` and return its id
    fn add_clip(&mut self, bounds: &BoundingBox) -> String {
        let id = format!("{}clip-{}", self.prefix(), self.defs.len() + 1);
        self.defs.push(format!(
            r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            id,
            num(bounds.x),
            num(bounds.y),
            num(bounds.width),
            num(bounds.height)
        ));
        id
    }

    /// Add the text of a label, one `<tspan>` per line
    fn add_text(&mut self, label: &LabelCell) {
        let lines: Vec<&str> = label.text.split('\n').collect();
        let bounds = label.text_box;
        let size = label.font.size;
        let line_height = size * self.config.line_spacing;
        let block_height = line_height * (lines.len() as f64 - 1.0) + size;

        let (x, anchor) = match label.h_align {
            HAlign::Left | HAlign::Justify => (bounds.x, "start"),
            HAlign::Center => (bounds.center().x, "middle"),
            HAlign::Right => (bounds.right(), "end"),
        };
        let first_baseline = match label.v_align {
            VAlign::Top => bounds.y + size,
            VAlign::Center => bounds.y + (bounds.height - block_height) / 2.0 + size,
            VAlign::Bottom => bounds.bottom() - block_height + size,
        };

        let mut font_attrs = format!(
            r#" font-family="{}" font-size="{}""#,
            escape_xml(&label.font.name),
            num(size)
        );
        if label.font.style.is_bold() {
            font_attrs.push_str(r#" font-weight="bold""#);
        }
        if label.font.style.is_italic() {
            font_attrs.push_str(r#" font-style="italic""#);
        }

        let clip = self.add_clip(&bounds);
        let spans: String = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                format!(
                    r#"<tspan x="{}" y="{}">{}</tspan>"#,
                    num(x),
                    num(first_baseline + i as f64 * line_height),
                    escape_xml(line)
                )
            })
            .collect();
        let element = format!(
            r#"{}<text class="{}label" clip-path="url(#{})" text-anchor="{}"{}>{}</text>"#,
            self.indent_str(2),
            self.prefix(),
            clip,
            anchor,
            font_attrs,
            spans
        );
        self.current_page().push(element);
    }

    /// Build the final SVG string
    pub fn build(self) -> String {
        let nl = self.newline();
        let (width, height) = self
            .page
            .as_ref()
            .map_or((0.0, 0.0), |page| (page.width, page.height));
        let pages = self.pages.len().max(1);
        let gap = self.config.page_gap;
        let total_height = pages as f64 * height + (pages as f64 - 1.0) * gap;
        let prefix = self.prefix();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}pt" height="{h}pt" viewBox="0 0 {w} {h}">"#,
            w = num(width),
            h = num(total_height)
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str(&self.indent_str(1));
            svg.push_str("<defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str(&self.indent_str(2));
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(&self.indent_str(1));
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        let sheet = BoundingBox::new(0.0, 0.0, width, height);
        let grid: Vec<String> = match (&self.page, self.show_grid) {
            (Some(page), true) => page
                .cells()
                .map(|cell| self.rect(&cell, "grid", r#" fill="none" stroke="black" stroke-width="0.5""#))
                .collect(),
            _ => vec![],
        };
        let empty = vec![];
        for index in 0..pages {
            let elements = self.pages.get(index).unwrap_or(&empty);
            svg.push_str(&format!(
                r#"{}<svg class="{prefix}page" x="0" y="{}" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                self.indent_str(1),
                num(index as f64 * (height + gap)),
                w = num(width),
                h = num(height)
            ));
            svg.push_str(nl);
            svg.push_str(&self.rect(&sheet, "sheet", r#" fill="white""#));
            svg.push_str(nl);
            for elem in grid.iter().chain(elements.iter()) {
                svg.push_str(elem);
                svg.push_str(nl);
            }
            svg.push_str(&self.indent_str(1));
            svg.push_str("</svg>");
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

impl DocumentRenderer for SvgRenderer {
    fn open(&mut self, page: &PageGeometry, show_grid: bool) {
        self.page = Some(page.clone());
        self.show_grid = show_grid;
        self.pages = vec![vec![]];
    }

    fn draw_label(&mut self, label: &LabelCell) {
        if label.outline {
            let outline = self.rect(
                &label.cell,
                "cell",
                r#" fill="none" stroke="black" stroke-width="0.5""#,
            );
            self.current_page().push(outline);
        }
        self.add_text(label);
    }

    fn start_new_page(&mut self) {
        self.pages.push(vec![]);
    }
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
