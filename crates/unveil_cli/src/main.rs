//! Unveil CLI
//!
//! Render component manifests to markup and validate motion defaults.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unveil_animation::{MotionDefaults, Stage};
use unveil_core::{RecordingSurface, SystemPreferences, ThemeMode, ThemeProvider};

mod manifest;

use manifest::{Builder, Manifest};

/// Frames advanced after revealing, so coalesced parallax updates land
const SETTLE_FRAMES: usize = 2;
const FRAME_MS: f64 = 16.0;

#[derive(Parser)]
#[command(name = "unveil")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Unveil motion components CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a component manifest
    Render {
        /// Manifest file (TOML)
        manifest: PathBuf,

        /// Bring every element into view before rendering
        #[arg(short, long)]
        revealed: bool,

        /// Emit the element tree as JSON instead of HTML
        #[arg(long)]
        json: bool,

        /// Motion defaults file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Theme mode (light, dark, system); overrides the manifest
        #[arg(short, long)]
        theme: Option<ThemeMode>,

        /// Render as if the host prefers reduced motion
        #[arg(long)]
        reduced_motion: bool,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a motion defaults file and print the effective values
    Check {
        /// Defaults file (TOML)
        path: PathBuf,
    },
}

struct RenderOptions {
    revealed: bool,
    json: bool,
    config: Option<PathBuf>,
    theme: Option<ThemeMode>,
    reduced_motion: bool,
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            manifest,
            revealed,
            json,
            config,
            theme,
            reduced_motion,
            output,
        } => cmd_render(
            &manifest,
            RenderOptions {
                revealed,
                json,
                config,
                theme,
                reduced_motion,
                output,
            },
        ),

        Commands::Check { path } => cmd_check(&path),
    }
}

fn load_defaults(path: Option<&Path>) -> Result<MotionDefaults> {
    match path {
        Some(path) => MotionDefaults::load(path)
            .with_context(|| format!("Invalid motion defaults in {}", path.display())),
        None => Ok(MotionDefaults::default()),
    }
}

fn cmd_render(manifest_path: &Path, options: RenderOptions) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let defaults = load_defaults(options.config.as_deref())?;

    info!(
        "Rendering {} components from {}",
        manifest.components.len(),
        manifest_path.display()
    );

    let mut surface =
        RecordingSurface::new(manifest.viewport.into()).with_reduced_motion(options.reduced_motion);
    let components = {
        let mut builder = Builder::new(&mut surface, &defaults);
        manifest
            .components
            .iter()
            .map(|spec| builder.build(spec))
            .collect::<Result<Vec<_>>>()?
    };

    let mut stage = Stage::new(surface);
    for component in components {
        stage.add(component);
    }
    stage.mount();

    if options.revealed {
        stage.surface_mut().intersect_all();
        let mut routed = stage.pump();
        for _ in 0..SETTLE_FRAMES {
            stage.surface_mut().advance_frame(FRAME_MS);
            routed += stage.pump();
        }
        debug!("Routed {} surface events", routed);
    }

    let mut theme = ThemeProvider::new(options.theme.or(manifest.theme).unwrap_or_default());
    theme.mount(SystemPreferences {
        prefers_dark: false,
        prefers_reduced_motion: options.reduced_motion,
    });

    let rendered = if options.json {
        serde_json::to_string_pretty(&stage.render()).context("Failed to serialize element tree")?
    } else {
        let class = theme
            .context()
            .map(|context| context.class_name())
            .unwrap_or_default();
        format!(
            "<div class=\"{}\">\n{}\n</div>",
            class,
            stage.render_html()
        )
    };

    stage.teardown();
    debug!(
        "Released surface resources ({} commands recorded)",
        stage.surface().commands().len()
    );

    match options.output {
        Some(path) => {
            fs::write(&path, rendered.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let defaults = MotionDefaults::load(path)
        .with_context(|| format!("Invalid motion defaults in {}", path.display()))?;
    info!("{} is valid", path.display());
    print!("{}", defaults.to_toml()?);
    Ok(())
}
