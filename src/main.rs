use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use simplelog::{Config, WriteLogger};

use pageport::document::{DocumentEngine, Frame, MemoryDocument};
use pageport::panic_handler::initialize_panic_handler;
use pageport::persist::{ViewSettings, settings_path};
use pageport::settings::{Settings, load_settings, preferred_config_path};
use pageport::{FrameStatus, ViewportController, script};

#[derive(Debug, Parser)]
#[command(
    name = "pageport",
    about = "Pan, zoom and page through a document on a fixed-size e-ink screen",
    version
)]
struct Args {
    /// JSON description of the document's page sizes
    document: PathBuf,

    /// Page to open, counted from 1. Defaults to the remembered page.
    #[arg(long)]
    page: Option<usize>,

    /// Keys to apply in order, e.g. "jjl]+m:3'"
    #[arg(long, default_value = "")]
    script: String,

    /// Config file instead of the one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "pageport.log")]
    log_file: PathBuf,

    /// Overrides the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Neither read nor write <document>.ini
    #[arg(long)]
    no_remember: bool,
}

type Controller = ViewportController<MemoryDocument>;

fn main() -> Result<()> {
    initialize_panic_handler();
    let args = Args::parse();

    let provisional = args
        .log_level
        .as_deref()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    WriteLogger::init(
        LevelFilter::Trace,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("cannot create log file {:?}", args.log_file))?,
    )?;
    log::set_max_level(provisional);

    let mut settings = match args.config.clone().or_else(preferred_config_path) {
        Some(path) => load_settings(&path),
        None => Settings::default(),
    };
    if let Some(level) = &args.log_level {
        settings.log_level = level.clone();
    }
    log::set_max_level(settings.log_level_filter());
    info!("Starting pageport on {:?}", args.document);

    let commands = script::parse(&args.script)?;
    let engine = MemoryDocument::from_json_file(&args.document)
        .with_context(|| format!("cannot read document {:?}", args.document))?;

    let remember = settings.remember_view && !args.no_remember;
    let ini_path = settings_path(&args.document);
    let stored = if remember {
        ViewSettings::load(&ini_path).unwrap_or_else(|e| {
            warn!("Ignoring view settings {ini_path:?}: {e}");
            None
        })
    } else {
        None
    };
    let page = match args.page {
        Some(number) => number.checked_sub(1).context("pages are counted from 1")?,
        None => stored
            .as_ref()
            .map_or(0, |s| s.resume_page(engine.page_count())),
    };

    let screen = settings.screen();
    let mut controller = ViewportController::open(engine, screen, page, stored.unwrap_or_default())?;
    let mut frame = Frame::new(screen);
    report("open", &mut controller, &mut frame);

    for cmd in commands {
        let label = match controller.apply(cmd) {
            Ok(outcome) => format!("{cmd:?} -> {outcome:?}"),
            Err(e) => {
                warn!("{cmd:?} failed: {e}");
                format!("{cmd:?} -> {e}")
            }
        };
        report(&label, &mut controller, &mut frame);
    }

    if remember {
        controller.view_settings().save(&ini_path)?;
    }
    info!("Shutting down pageport");
    Ok(())
}

fn report(label: &str, controller: &mut Controller, frame: &mut Frame) {
    for effect in controller.take_effects() {
        debug!("Effect: {effect:?}");
    }
    let status = match controller.render_frame(frame) {
        Ok(FrameStatus::Cached) => "cached",
        Ok(FrameStatus::Rendered) => "rendered",
        Err(e) => {
            warn!("Render failed: {e}");
            "render failed"
        }
    };
    let geometry = controller.geometry();
    println!(
        "{label}\n    page {}/{} {:?} zoom {:.2}  page {}x{}  view {}x{} at ({}, {})  frame {status}",
        controller.page() + 1,
        controller.page_count(),
        controller.orientation(),
        controller.zoom().factor(),
        geometry.page.width,
        geometry.page.height,
        geometry.view.width,
        geometry.view.height,
        geometry.view.x,
        geometry.view.y,
    );
}
