//! Labrat CLI
//!
//! Usage:
//!   labrat [OPTIONS] [TEXT...]
//!
//! Label texts come from the positional words, the `--in-file` file, or
//! standard input, in that order of preference.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labrat::reader::{read_label_file, read_labels};
use labrat::{
    parse_args, CommandLine, ConfigSources, Environment, Error, LabelDb, LabelJob, ParsedArgs,
    ShellRunner, APP_NAME,
};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labrat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let args = match parse_args(std::env::args_os().skip(1)) {
        Ok(CommandLine::Run(args)) => args,
        Ok(CommandLine::Message(message)) => {
            println!("{message}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("labrat: {e}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("labrat: {e}");
            if e.is_usage() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(args: &ParsedArgs) -> labrat::Result<()> {
    let env = Environment::from_process();
    let sources = ConfigSources::new(APP_NAME, env.clone());
    let mut db = LabelDb::new(sources.clone());

    if args.list_labels {
        for name in db.known_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let settings = labrat::pipeline::resolve(args, &sources, &mut db)?;
    let texts = match args.text() {
        Some(text) => vec![text],
        None => match &settings.in_file {
            Some(in_file) => {
                let path = env
                    .expand(in_file)
                    .unwrap_or_else(|| std::path::PathBuf::from(in_file));
                read_label_file(&path, &settings.nl_sep)?
            }
            None if settings.template || io::stdin().is_terminal() => Vec::new(),
            None => read_labels(io::stdin().lock(), &settings.nl_sep).map_err(|source| {
                Error::InputFile {
                    path: "<stdin>".into(),
                    source,
                }
            })?,
        },
    };

    let job = LabelJob::new(settings, texts);
    job.run(&mut ShellRunner)
}
