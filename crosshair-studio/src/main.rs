mod host;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use crosshair::prelude::*;
use crosshair::runtime::storage;

use host::{CliWidgetHost, ThreadedFileReader};

const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(
    name = "crosshair-studio",
    version,
    about = "Tune, preview and export crosshair overlays"
)]
struct Cli {
    /// Directory holding settings.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Directory crosshair state is persisted in
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Yaml control script to use instead of the built-in controls
    #[arg(long, global = true)]
    controls: Option<PathBuf>,

    /// Height of the simulated viewport in CSS pixels
    #[arg(long, global = true)]
    viewport_height: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply changes and write the rendered crosshair as a PNG
    Render(RenderArgs),
    /// Apply changes and print the resulting layout as JSON
    Show(ChangeArgs),
    /// Forget persisted state
    Reset,
}

#[derive(Args, Debug)]
struct ChangeArgs {
    /// Widget change, e.g. `--set gap=10` or `--set "aspect ratio=4:3"`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Background image (png or jpeg)
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    changes: ChangeArgs,

    /// Output PNG path
    #[arg(short, long, default_value = "crosshair.png")]
    out: PathBuf,
}

type StudioConfigurator =
    Configurator<CliWidgetHost, ThreadedFileReader, FileStorage>;

fn main() {
    init_logger();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(&cli)?;

    match &cli.command {
        Commands::Render(args) => {
            let configurator = apply(&settings, &args.changes)?;
            configurator.surface().write_png(&args.out)?;
            info!("Wrote {}", args.out.display());
        }
        Commands::Show(args) => {
            let configurator = apply(&settings, args)?;
            let layout = configurator
                .layout()
                .ok_or("nothing was laid out")?;
            println!("{}", serde_json::to_string_pretty(layout)?);
        }
        Commands::Reset => {
            let mut persistence = Persistence::with_key(
                FileStorage::new(&settings.storage_dir),
                &settings.storage_key,
            );
            persistence.reset();
            info!("Cleared `{}`", settings.storage_key);
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn Error>> {
    let config_dir = cli
        .config_dir
        .clone()
        .or_else(storage::config_dir)
        .ok_or("could not determine a config directory")?;

    let mut settings = match Settings::load_if_exists(&config_dir)? {
        Some(settings) => settings,
        None => {
            let settings = Settings::default();
            if let Err(err) = settings.save(&config_dir) {
                warn!("Unable to write default settings: {}", err);
            }
            settings
        }
    };

    if let Some(dir) = &cli.storage_dir {
        settings.storage_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(path) = &cli.controls {
        settings.controls_path = Some(path.to_string_lossy().into_owned());
    }
    if let Some(height) = cli.viewport_height {
        settings.viewport_height = height;
    }

    debug!("{:?}", settings);
    Ok(settings)
}

fn registry(
    settings: &Settings,
    resolutions: &ResolutionTable,
) -> Result<ControlRegistry, Box<dyn Error>> {
    match &settings.controls_path {
        Some(path) => ControlRegistry::from_path(Path::new(path)),
        None => Ok(crosshair_controls(resolutions)),
    }
}

fn apply(
    settings: &Settings,
    changes: &ChangeArgs,
) -> Result<StudioConfigurator, Box<dyn Error>> {
    let resolutions = ResolutionTable::default();
    let registry = registry(settings, &resolutions)?;
    let (tx, rx) = event_channel();

    let mut configurator = Configurator::new(
        registry,
        resolutions,
        Capabilities {
            host: CliWidgetHost::new(tx),
            reader: ThreadedFileReader,
            persistence: Persistence::with_key(
                FileStorage::new(&settings.storage_dir),
                &settings.storage_key,
            ),
            events: rx,
            viewport: Viewport {
                height: settings.viewport_height,
            },
        },
    )?;

    for change in &changes.set {
        let (name, value) = change
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", change))?;
        configurator.host_mut().set_from_text(name.trim(), value)?;
    }

    if let Some(image) = &changes.image {
        configurator
            .host_mut()
            .set_from_text(IMAGE, &image.to_string_lossy())?;
    }

    if !configurator.run_until_idle(IDLE_TIMEOUT) {
        return Err("timed out waiting for the pipeline to settle".into());
    }

    let specs = configurator.host().specs().count();
    debug!(
        "{} widgets, {} flushes, {} renders",
        specs,
        configurator.flush_count(),
        configurator.render_count()
    );

    Ok(configurator)
}
