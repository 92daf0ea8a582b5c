//! Options for the SVG label document

/// How the SVG document is laid out as text and stacked as pages
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Emit the `<?xml ...?>` prologue
    pub standalone: bool,

    /// One element per line, indented by nesting depth
    pub pretty_print: bool,

    /// Prepended to every class name and clip-path id
    pub class_prefix: Option<String>,

    /// Points left blank between one page and the next
    pub page_gap: f64,

    /// Baseline-to-baseline distance in units of the font size
    pub line_spacing: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("labrat-".to_string()),
            page_gap: 0.0,
            line_spacing: 1.2,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Use bare class names such as `page` and `label`
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Separate pages so they read as sheets when viewed
    pub fn with_page_gap(mut self, gap: f64) -> Self {
        self.page_gap = gap;
        self
    }

    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = spacing;
        self
    }
}
