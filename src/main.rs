use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;

use pageturn::panic_handler::initialize_panic_handler;
use pageturn::pdf::MupdfSource;
use pageturn::settings::load_settings;
use pageturn::viewer::{
    Container, ContainerMetrics, DocumentViewer, MeasuredContainer, NavControls, RasterSurface,
    ViewerConfig, ViewerPhase, ViewerUi,
};

/// Page-at-a-time document viewer
#[derive(Parser, Debug)]
#[command(name = "pageturn", version, about)]
struct Args {
    /// Settings file (defaults to <config dir>/pageturn/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document source key to open instead of the configured default
    #[arg(long)]
    source: Option<String>,

    /// Container width in density-independent pixels
    #[arg(long, default_value_t = 600.0)]
    width: f32,

    /// Display pixel density
    #[arg(long, default_value_t = 1.0)]
    density: f32,

    /// PNG file every rendered page is written to
    #[arg(long, default_value = "page.png")]
    output: PathBuf,

    /// Log file
    #[arg(long, default_value = "pageturn.log")]
    log_file: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, PartialEq)]
enum CliCommand {
    Next,
    Previous,
    Resize { width: f32, density: Option<f32> },
    Source(String),
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<CliCommand> {
    let mut parts = line.split_whitespace();
    let command = match parts.next()? {
        "next" | "n" => CliCommand::Next,
        "prev" | "p" => CliCommand::Previous,
        "resize" => {
            let width = parts.next()?.parse().ok()?;
            let density = match parts.next() {
                Some(value) => Some(value.parse().ok()?),
                None => None,
            };
            CliCommand::Resize { width, density }
        }
        "source" => CliCommand::Source(parts.next()?.to_string()),
        "status" => CliCommand::Status,
        "quit" | "q" => CliCommand::Quit,
        _ => return None,
    };
    Some(command)
}

const HELP: &str = "commands: next|n, prev|p, resize <width> [density], source <key>, status, quit|q";

/// Prints viewer output and writes every rendered page to a PNG file
struct TerminalUi {
    output: PathBuf,
}

impl ViewerUi for TerminalUi {
    fn page_indicator_changed(&self, text: &str) {
        println!("page {text}");
    }

    fn controls_changed(&self, controls: NavControls) {
        log::debug!(
            "Controls: previous {}, next {}",
            if controls.previous_disabled { "disabled" } else { "enabled" },
            if controls.next_disabled { "disabled" } else { "enabled" }
        );
    }

    fn page_rendered(&self, page: usize, surface: &RasterSurface) {
        let Some(image) = surface.to_image() else {
            error!("Surface buffer does not match its dimensions");
            return;
        };
        match image.save(&self.output) {
            Ok(()) => println!(
                "rendered page {page} ({}x{}) to {}",
                surface.width_px(),
                surface.height_px(),
                self.output.display()
            ),
            Err(e) => error!("Failed to write {}: {e}", self.output.display()),
        }
    }
}

fn describe(phase: ViewerPhase) -> String {
    match phase {
        ViewerPhase::Unloaded => "no document loaded".to_string(),
        ViewerPhase::Loading => "loading".to_string(),
        ViewerPhase::Ready {
            current_page,
            total_pages,
        } => format!("page {current_page}/{total_pages}"),
    }
}

async fn run(args: Args, config: ViewerConfig) -> Result<()> {
    let container = Rc::new(MeasuredContainer::new(ContainerMetrics::new(
        args.width,
        args.density,
    )));
    let ui = Rc::new(TerminalUi {
        output: args.output.clone(),
    });
    let viewer = DocumentViewer::new(Some(MupdfSource), container.clone(), ui, config);

    match &args.source {
        Some(key) => {
            if viewer.set_source(key).is_none() {
                println!("unknown source {key:?}");
            }
        }
        None => {
            viewer.start();
        }
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(CliCommand::Next) => {
                if !viewer.go_to_next_page() {
                    println!("{}", describe(viewer.phase()));
                }
            }
            Some(CliCommand::Previous) => {
                if !viewer.go_to_previous_page() {
                    println!("{}", describe(viewer.phase()));
                }
            }
            Some(CliCommand::Resize { width, density }) => {
                let current = container.metrics();
                container.set(ContainerMetrics::new(
                    width,
                    density.unwrap_or(current.pixel_density),
                ));
                viewer.on_resize();
            }
            Some(CliCommand::Source(key)) => {
                if viewer.catalog().resolve(&key).is_none() {
                    let keys: Vec<_> = viewer.catalog().keys().collect();
                    println!("unknown source {key:?} (known: {})", keys.join(", "));
                }
                viewer.set_source(&key);
            }
            Some(CliCommand::Status) => {
                let source = viewer.active_source().unwrap_or_else(|| "-".to_string());
                println!("{} [source {source}]", describe(viewer.phase()));
            }
            Some(CliCommand::Quit) => break,
            None => println!("{HELP}"),
        }
    }

    viewer.queue().idle().await;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(
        level,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("creating log file {}", args.log_file.display()))?,
    )?;
    initialize_panic_handler();

    info!("Starting pageturn");
    let settings = load_settings(args.config.as_deref());
    let config = settings.viewer_config();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = LocalSet::new().block_on(&runtime, run(args, config));

    if let Err(err) = &result {
        error!("Application error: {err:?}");
    }
    info!("Shutting down pageturn");
    result
}
