//! End-to-end tests: command line through settings resolution to SVG

use std::fs;
use std::path::Path;

use labrat::config::environment::under_prefix;
use labrat::{
    parse_args, pipeline, CommandLine, CommandRunner, ConfigSources, Environment, Error, LabelDb,
    LabelDbError, LabelJob, LayoutError, ParsedArgs, Settings, SvgConfig, APP_NAME,
};

const MM: f64 = 72.0 / 25.4;

struct Sandbox {
    root: tempfile::TempDir,
    env: Environment,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            env: Environment::new().with_home("/home/ded"),
        }
    }

    fn with_var(mut self, name: &str, value: &str) -> Self {
        self.env = self.env.with_var(name, value);
        self
    }

    fn put(&self, path: &str, content: &str) {
        let full = under_prefix(self.root.path(), Path::new(path));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn sources(&self) -> ConfigSources {
        ConfigSources::new(APP_NAME, self.env.clone()).with_prefix(self.root.path())
    }

    fn resolve(&self, list: &[&str]) -> labrat::Result<Settings> {
        let sources = self.sources();
        let mut db = LabelDb::new(sources.clone());
        pipeline::resolve(&args(list), &sources, &mut db)
    }
}

fn args(list: &[&str]) -> ParsedArgs {
    match parse_args(list.iter().copied()).unwrap() {
        CommandLine::Run(parsed) => parsed,
        CommandLine::Message(msg) => panic!("unexpected message: {msg}"),
    }
}

fn texts(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Label {i}")).collect()
}

fn svg(job: &LabelJob) -> String {
    job.render_svg(&SvgConfig::default()).unwrap()
}

fn page_count(svg: &str) -> usize {
    svg.matches(r#"class="labrat-page""#).count()
}

#[derive(Default)]
struct Recorder {
    commands: Vec<String>,
}

impl CommandRunner for Recorder {
    fn run_detached(&mut self, command: &str) -> std::io::Result<()> {
        self.commands.push(command.to_string());
        Ok(())
    }
}

#[test]
fn test_sheet_label_spreads_over_pages() {
    let sandbox = Sandbox::new();
    let settings = sandbox
        .resolve(&["--label=avery5160", "--start-label=29"])
        .unwrap();
    let job = LabelJob::new(settings, texts(35));

    let pages: Vec<usize> = job.placements().unwrap().iter().map(|p| p.page).collect();
    assert_eq!(pages.iter().filter(|&&p| p == 1).count(), 2);
    assert_eq!(pages.iter().filter(|&&p| p == 2).count(), 30);
    assert_eq!(pages.iter().filter(|&&p| p == 3).count(), 3);

    let svg = svg(&job);
    assert_eq!(page_count(&svg), 3);
    assert!(svg.contains(">Label 35</tspan>"));
}

#[test]
fn test_landscape_roll_label_is_drawn_turned() {
    let sandbox = Sandbox::new();
    let settings = sandbox.resolve(&["-l", "dymo30327"]).unwrap();
    assert!((settings.page_width - 24.0 * MM).abs() < 1e-6);
    let job = LabelJob::new(settings, vec!["Four score++and seven".to_string()]);
    let svg = svg(&job);
    assert!(svg.contains(r#"width="246.61pt" height="68.03pt""#), "{svg}");
    assert!(svg.contains(">Four score</tspan>"));
    assert!(svg.contains(">and seven</tspan>"));
}

#[test]
fn test_template_fills_one_page_with_numbers() {
    let sandbox = Sandbox::new();
    let settings = sandbox.resolve(&["--label=avery5160", "--template"]).unwrap();
    let job = LabelJob::new(settings, vec![]);
    assert_eq!(job.texts().len(), 30);
    let svg = svg(&job);
    assert_eq!(page_count(&svg), 1);
    assert!(svg.contains(">30</tspan>"));
    assert!(svg.contains(r#"font-weight="bold""#));
    assert!(svg.contains(r#"class="labrat-grid""#));
}

#[test]
fn test_config_file_from_environment_replaces_user_tier() {
    let sandbox = Sandbox::new().with_var("LABRAT_CONFIG", "~/labels/custom.yml");
    sandbox.put("/home/ded/.config/labrat/config.yml", "rows: 4\nprinter: seiko3\n");
    sandbox.put("/home/ded/labels/custom.yml", "rows: 6\n");
    sandbox.put("/etc/xdg/labrat/config.yml", "columns: 2\n");

    let settings = sandbox.resolve(&[]).unwrap();
    assert_eq!(settings.rows, 6);
    assert_eq!(settings.columns, 2);
    assert_eq!(settings.printer, "dymo");
}

#[test]
fn test_printer_from_environment_and_command_line() {
    let sandbox = Sandbox::new().with_var("PRINTER", "office");
    assert_eq!(sandbox.resolve(&[]).unwrap().printer, "office");
    assert_eq!(sandbox.resolve(&["-p", "shop"]).unwrap().printer, "shop");
}

#[test]
fn test_user_label_database_extends_builtin() {
    let sandbox = Sandbox::new();
    sandbox.put(
        "/home/ded/.config/labrat/labeldb.yml",
        "jars:\n  label: avery5160\n  columns: 2\n  font-size: 9\n",
    );
    let settings = sandbox.resolve(&["--label=jars"]).unwrap();
    assert_eq!((settings.rows, settings.columns), (10, 2));
    assert_eq!(settings.font_size, 9.0);
    assert_eq!(settings.label.as_deref(), Some("jars"));
}

#[test]
fn test_circular_label_database_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.put(
        "/home/ded/.config/labrat/labeldb.yml",
        "label1: {page-width: 18, label: label3}\n\
         label2: {page-width: 36, label: label1}\n\
         label3: {page-width: 45, label: label2}\n",
    );
    let err = sandbox.resolve(&["--label=label1"]).unwrap_err();
    assert!(matches!(
        err,
        Error::LabelDb(LabelDbError::CircularReference { ref chain }) if chain.len() == 4
    ));
    assert!(err.is_usage());
}

#[test]
fn test_blank_input_is_refused_unless_viewing() {
    let sandbox = Sandbox::new();
    let blank = vec!["   ".to_string()];

    let job = LabelJob::new(sandbox.resolve(&[]).unwrap(), blank.clone());
    assert!(matches!(job.placements(), Err(LayoutError::EmptyLabel)));

    let job = LabelJob::new(sandbox.resolve(&["--view"]).unwrap(), blank);
    assert_eq!(job.placements().unwrap().len(), 1);
}

#[test]
fn test_run_writes_then_prints() {
    let sandbox = Sandbox::new();
    let out = sandbox.root.path().join("out.svg");
    let out_arg = format!("--out-file={}", out.display());
    let settings = sandbox
        .resolve(&[out_arg.as_str(), "--printer=seiko3", "Hello", "world"])
        .unwrap();
    let job = LabelJob::new(settings, vec![args(&["Hello", "world"]).text().unwrap()]);

    let mut recorder = Recorder::default();
    job.run(&mut recorder).unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains(">Hello world</tspan>"));
    assert_eq!(recorder.commands, vec![format!("lpr -P seiko3 {}", out.display())]);
}

#[test]
fn test_usage_errors() {
    assert!(parse_args(["--no-such-option"]).is_err());
    assert!(parse_args(["--rows"]).is_err());

    let sandbox = Sandbox::new();
    let err = sandbox.resolve(&["--page-width=3cubits"]).unwrap_err();
    assert!(matches!(err, Error::Dimension(_)));
    let err = sandbox.resolve(&["--label=nosuch"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown label name 'nosuch'");
}

#[test]
fn test_help_lists_options() {
    match parse_args(["--help"]).unwrap() {
        CommandLine::Message(help) => {
            assert!(help.contains("--page-width"));
            assert!(help.contains("--label"));
        }
        CommandLine::Run(_) => panic!("--help should produce a message"),
    }
}
