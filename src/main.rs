//! # Scrawl CLI
//!
//! Usage:
//!   scrawl -i week.md -s notebook -r resources/
//!   cat week.md | scrawl -o week.pdf --seed 7
//!   scrawl -r resources/ --list-resources

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::info;

use scrawl::catalog::ResourceCatalog;
use scrawl::config::{Config, PaperStyle};
use scrawl::error::ScrawlError;
use scrawl::parser::fold_typography;

#[derive(Parser, Debug)]
#[command(
    name = "scrawl",
    version,
    about = "Render marked-up text as hand-written notebook pages"
)]
struct Cli {
    /// Input text file (stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Paper style [default: the config file's, else notebook]
    #[arg(short, long, value_enum)]
    style: Option<Paper>,

    /// Directory holding fonts and background images
    #[arg(short, long, value_name = "DIR", default_value = "resources")]
    resources: PathBuf,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fix the jitter sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Skip typography folding (smart quotes, dashes, bullets)
    #[arg(long)]
    raw: bool,

    /// Print the discovered fonts, roles and images, then exit
    #[arg(long)]
    list_resources: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Paper {
    Notebook,
    Plain,
}

impl From<Paper> for PaperStyle {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::Notebook => PaperStyle::Notebook,
            Paper::Plain => PaperStyle::Plain,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// The config file (or defaults) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<Config, ScrawlError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(style) = cli.style {
        config.paper = style.into();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), ScrawlError> {
    let config = resolve_config(cli)?;

    let catalog = scrawl::load_catalog(&cli.resources, &config);
    if cli.list_resources {
        print_resources(&catalog);
        return Ok(());
    }

    let text = read_input(cli.input.as_deref())?;
    let text = if cli.raw { text } else { fold_typography(&text) };

    let pdf = scrawl::render(&text, &catalog, &config)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(cli.input.as_deref(), config.paper));
    fs::write(&output, &pdf).map_err(|source| ScrawlError::Io {
        path: output.clone(),
        source,
    })?;

    info!("wrote {} bytes to {}", pdf.len(), output.display());
    eprintln!("✓ Written {} bytes to {}", pdf.len(), output.display());
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String, ScrawlError> {
    match input {
        Some(path) => fs::read_to_string(path).map_err(|source| ScrawlError::Input {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| ScrawlError::Input {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// `<stem>_<style>.pdf` next to the working directory.
fn default_output(input: Option<&Path>, paper: PaperStyle) -> PathBuf {
    let stem = input
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scrawl".to_string());
    PathBuf::from(format!("{}_{}.pdf", stem, paper.name()))
}

fn print_resources(catalog: &ResourceCatalog) {
    println!("Fonts:");
    for font in catalog.fonts() {
        println!("  {:<24} {}", font.name, font.path.display());
    }
    println!("Roles:");
    for (role, font) in catalog.roles() {
        println!("  {:<24} {}", role, font.name);
    }
    println!("Images:");
    for image in catalog.images() {
        println!("  {:<24} {}", image.name, image.path.display());
    }
    let fallbacks = catalog.system_fallbacks();
    if !fallbacks.is_empty() {
        println!("System fallbacks:");
        for font in fallbacks {
            println!("  {:<24} {}", font.name, font.path.display());
        }
    }
}
