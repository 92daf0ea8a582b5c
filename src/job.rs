//! One print or view job
//!
//! A job owns the resolved settings and the label texts. It places the
//! texts, drives a [`DocumentRenderer`], writes the document, and hands it
//! to the print or view command.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::layout::{self, FontSpec, LabelCell, LayoutError, PageGeometry};
use crate::renderer::{DocumentRenderer, SvgConfig, SvgRenderer};
use crate::settings::{FontStyle, Settings};
use crate::Error;

/// Starts external commands without waiting for them
pub trait CommandRunner {
    fn run_detached(&mut self, command: &str) -> std::io::Result<()>;
}

/// Runs commands through `sh -c` in the background
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run_detached(&mut self, command: &str) -> std::io::Result<()> {
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map(|_child| ())
    }
}

/// Substitute `%p` with `printer` and `%o` with `out_file`
pub fn expand_command(template: &str, printer: &str, out_file: &str) -> String {
    template.replace("%p", printer).replace("%o", out_file)
}

/// Resolved settings and the texts to put on labels
#[derive(Debug, Clone)]
pub struct LabelJob {
    settings: Settings,
    texts: Vec<String>,
}

impl LabelJob {
    /// Prepare `texts` for printing.
    ///
    /// Break markers become line breaks and each text is repeated `copies`
    /// times. In template mode the texts are replaced by the cell numbers of
    /// one page, set in bold 16pt Helvetica
    /// with every cell outlined.
    pub fn new(mut settings: Settings, texts: Vec<String>) -> Self {
        let texts = if settings.template {
            settings.font_name = "Helvetica".to_string();
            settings.font_style = FontStyle::Bold;
            settings.font_size = 16.0;
            settings.grid = true;
            (1..=settings.labels_per_page()).map(|n| n.to_string()).collect()
        } else {
            let copies = settings.copies as usize;
            let nl_sep = settings.nl_sep.clone();
            texts
                .iter()
                .map(|text| substitute_breaks(text, &nl_sep))
                .flat_map(|text| std::iter::repeat(text).take(copies))
                .collect()
        };
        Self { settings, texts }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Texts as they will appear, one per label
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Page, row, and column for every text
    pub fn placements(&self) -> Result<Vec<layout::Placement>, LayoutError> {
        layout::place(&self.texts, &self.settings)
    }

    /// Draw every label on `renderer`, breaking pages as placement decides
    pub fn render<R: DocumentRenderer>(&self, renderer: &mut R) -> Result<(), LayoutError> {
        let placements = self.placements()?;
        let page = PageGeometry::from_settings(&self.settings);
        let font = FontSpec::from_settings(&self.settings);

        renderer.open(&page, self.settings.template);
        for placement in &placements {
            let cell = page.cell(placement.row, placement.column);
            renderer.draw_label(&LabelCell {
                text: self.texts[placement.index].clone(),
                cell,
                text_box: page.text_box(cell),
                h_align: self.settings.h_align,
                v_align: self.settings.v_align,
                font: font.clone(),
                outline: self.settings.grid,
            });
            if placement.new_page_after {
                renderer.start_new_page();
            }
        }
        Ok(())
    }

    /// The whole document as SVG
    pub fn render_svg(&self, config: &SvgConfig) -> Result<String, LayoutError> {
        let mut renderer = SvgRenderer::new(config.clone());
        self.render(&mut renderer)?;
        Ok(renderer.build())
    }

    /// Render and write the document to the configured output file
    pub fn write(&self) -> crate::Result<PathBuf> {
        let path = PathBuf::from(&self.settings.out_file);
        self.write_to(&path)?;
        Ok(path)
    }

    /// Render and write the document to `path`
    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        let svg = self.render_svg(&SvgConfig::default())?;
        std::fs::write(path, svg).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), labels = self.texts.len(), "wrote label document");
        Ok(())
    }

    /// The print command with printer and output file filled in
    pub fn print_command(&self) -> String {
        expand_command(
            &self.settings.print_command,
            &self.settings.printer,
            &self.settings.out_file,
        )
    }

    /// The view command with the output file filled in
    pub fn view_command(&self) -> String {
        expand_command(&self.settings.view_command, &self.settings.printer, &self.settings.out_file)
    }

    /// Start the view command when viewing, else the print command
    pub fn dispatch(&self, runner: &mut dyn CommandRunner) -> crate::Result<()> {
        let (what, command) = if self.settings.view {
            ("Viewing", self.view_command())
        } else {
            ("Printing", self.print_command())
        };
        if self.settings.verbose {
            tracing::info!("{what} with:\n  {command} &");
        }
        runner
            .run_detached(&command)
            .map_err(|source| Error::Command { command, source })
    }

    /// Write the document, then print or view it
    pub fn run(&self, runner: &mut dyn CommandRunner) -> crate::Result<()> {
        self.write()?;
        self.dispatch(runner)
    }
}

fn substitute_breaks(text: &str, nl_sep: &str) -> String {
    if nl_sep.is_empty() {
        text.to_string()
    } else {
        text.replace(nl_sep, "\n")
    }
}
