//! Labrat - print or view labels on label printers and sheets of labels
//!
//! This library resolves job settings from defaults, config files, a
//! database of named label presets, and the command line, places label
//! texts on pages of label cells, and renders them as SVG.
//!
//! # Example
//!
//! ```rust
//! use labrat::{LabelJob, Settings, SvgConfig};
//!
//! let job = LabelJob::new(Settings::default(), vec!["Four score++and seven".to_string()]);
//! let svg = job.render_svg(&SvgConfig::default()).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("and seven"));
//! ```

pub mod config;
pub mod dimension;
pub mod error;
pub mod job;
pub mod labeldb;
pub mod layout;
pub mod pipeline;
pub mod reader;
pub mod renderer;
pub mod settings;

pub use config::{ConfigError, ConfigSources, Environment, APP_NAME};
pub use dimension::DimensionError;
pub use error::{Error, Result};
pub use job::{CommandRunner, LabelJob, ShellRunner};
pub use labeldb::{LabelDb, LabelDbError};
pub use layout::{LayoutError, Placement};
pub use renderer::{DocumentRenderer, SvgConfig, SvgRenderer};
pub use settings::{parse_args, CommandLine, OptionError, ParsedArgs, Settings};

/// Resolve settings for `args` and build the job for `texts`
///
/// # Example
///
/// ```rust
/// use labrat::{build_job, parse_args, CommandLine, ConfigSources, Environment, LabelDb};
///
/// let CommandLine::Run(args) = parse_args(["--rows=2", "--columns=2"]).unwrap() else {
///     unreachable!()
/// };
/// let sources = ConfigSources::new("labrat-doc", Environment::new()).with_prefix("/nonexistent");
/// let mut db = LabelDb::builtin();
/// let job = build_job(&args, &sources, &mut db, vec!["a".into(), "b".into(), "c".into()]).unwrap();
/// assert_eq!(job.placements().unwrap().len(), 3);
/// ```
pub fn build_job(
    args: &ParsedArgs,
    sources: &ConfigSources,
    db: &mut LabelDb,
    texts: Vec<String>,
) -> Result<LabelJob> {
    let settings = pipeline::resolve(args, sources, db)?;
    Ok(LabelJob::new(settings, texts))
}
