//! Popup Studio CLI
//!
//! Usage:
//!   popup-studio [OPTIONS]
//!
//! Options:
//!   -l, --list               List the template catalog
//!   -t, --template <T>       Template index or name
//!   -c, --config <FILE>      Configuration document (JSON)
//!       --css <FILE>         Stylesheet override (editable mode only)
//!       --mode <MODE>        Stylesheet policy: inline, external, editable
//!       --sheet <PATH|URL>   External base sheet
//!       --settings <FILE>    Settings file (TOML format)
//!   -o, --output <KIND>      What to print: export, preview, css, config
//!   -v, --verbose / -q, --quiet

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tokio::time::Instant;
use tracing::{warn, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use popup_studio::stylesheet::SheetSource;
use popup_studio::{open_session, EditSession, SessionEvent, StudioError, StudioSettings, StyleMode};

const LOG_ENV: &str = "POPUP_STUDIO_LOG";

#[derive(Parser)]
#[command(name = "popup-studio")]
#[command(about = "Author promotional popup templates and export their code")]
struct Cli {
    /// List templates and exit
    #[arg(short, long)]
    list: bool,

    /// Template to render, by index or name
    #[arg(short, long)]
    template: Option<String>,

    /// Configuration document (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet override, only for the editable stylesheet mode
    #[arg(long)]
    css: Option<PathBuf>,

    /// Stylesheet policy of the catalog
    #[arg(long)]
    mode: Option<StyleMode>,

    /// External base sheet, a path or an http(s) URL
    #[arg(long)]
    sheet: Option<String>,

    /// Settings file (TOML format)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Output::Export)]
    output: Output,

    /// Leave out the font notice of the export
    #[arg(long)]
    no_font_notice: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Export,
    Preview,
    Css,
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(text) => println!("{}", text),
        Err(failure) => {
            eprintln!("{}", failure);
            std::process::exit(1);
        }
    }
}

/// Run the CLI, returning the text to print or the error report
async fn run(cli: &Cli) -> Result<String, String> {
    let settings = load_settings(cli).map_err(|e| format!("Error: {}", e))?;
    let mut session = open_session(&settings)
        .await
        .map_err(|e| format!("Error: {}", e))?;

    if cli.list {
        let lines: Vec<String> = session
            .catalog()
            .list()
            .into_iter()
            .map(|entry| format!("{:>2}  {}", entry.index, entry.name))
            .collect();
        return Ok(lines.join("\n"));
    }

    if let Some(choice) = &cli.template {
        let index = match choice.parse::<usize>() {
            Ok(index) => index,
            Err(_) => session
                .catalog()
                .find(choice)
                .map_err(|e| format!("Error: {}", e))?,
        };
        session
            .select_template(index)
            .map_err(|e| format!("Error: {}", e))?;
    }

    if let Some(path) = &cli.css {
        let css = read(path).map_err(|e| format!("Error: {}", e))?;
        session
            .edit_stylesheet(css, Instant::now())
            .map_err(|e| format!("Error: {}", e))?;
        session.flush();
    }

    if let Some(path) = &cli.config {
        let text = read(path).map_err(|e| format!("Error: {}", e))?;
        session.edit_config(text.clone(), Instant::now());
        for event in session.flush() {
            if let SessionEvent::ConfigRejected(err) = event {
                return Err(err.format(&text, &path.display().to_string()));
            }
        }
    }

    Ok(output(&session, cli.output))
}

fn output(session: &EditSession, kind: Output) -> String {
    let outputs = session.outputs();
    if let Some(err) = outputs.preview.error() {
        warn!(error = %err, "template failed to render");
    }
    match kind {
        Output::Export => outputs.export.clone(),
        Output::Preview => outputs.preview.preview_html(),
        Output::Css => outputs.stylesheet.clone(),
        Output::Config => session.config().to_pretty_string(),
    }
}

fn load_settings(cli: &Cli) -> Result<StudioSettings, StudioError> {
    let mut settings = match &cli.settings {
        Some(path) => StudioSettings::from_file(path)?,
        None => StudioSettings::default(),
    };
    if let Some(mode) = cli.mode {
        settings = settings.with_style_mode(mode);
    }
    if let Some(sheet) = &cli.sheet {
        settings = settings.with_sheet_source(SheetSource::parse(sheet));
    }
    if cli.no_font_notice {
        settings.export.include_font_notice = false;
    }
    Ok(settings)
}

fn read(path: &Path) -> Result<String, StudioError> {
    fs::read_to_string(path).map_err(|source| StudioError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Install the stderr subscriber: `POPUP_STUDIO_LOG`, then `RUST_LOG`, then the flags
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .compact(),
        )
        .init();
}
