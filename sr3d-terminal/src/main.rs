/// SR3D Terminal - painter's-algorithm renderer in the terminal
///
/// Controls:
///   - WASD: Move
///   - Arrow Keys: Turn and look
///   - Space / C: Rise / sink
///   - 1: Toggle vertex index overlay
///   - Q/ESC: Quit
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use nalgebra::Vector3;
use sr3d_core::{Model, Scene, SceneLoader, Transform, DEFAULT_DRAG, DEFAULT_RENDER_DISTANCE};
use sr3d_terminal::{AppConfig, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sr3d-terminal", about = "Software 3D renderer for the terminal")]
struct Cli {
    /// Scene file to load; a single cube is shown when omitted
    scene: Option<PathBuf>,

    /// Directory holding the model files a scene refers to
    #[arg(short, long, default_value = "assets/models")]
    models_dir: PathBuf,

    /// Models at least this far from the player are not drawn
    #[arg(long, default_value_t = DEFAULT_RENDER_DISTANCE)]
    render_distance: f32,

    /// Target frame rate
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Velocity lost per frame by moving models
    #[arg(long, default_value_t = DEFAULT_DRAG)]
    drag: f32,

    /// Spin the first model of the scene
    #[arg(long)]
    spin: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file (the terminal itself is taken by the renderer)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    println!("SR3D Terminal Renderer - Loading...");

    let mut scene = Scene::new();
    let start = match &cli.scene {
        Some(path) => SceneLoader::new(&cli.models_dir)
            .load_scene(path, &mut scene)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            let mut cube = Model::cube(2.0);
            Transform::translate_to(&mut cube, 0.0, 0.0, 6.0);
            scene.insert(cube);
            Vector3::zeros()
        }
    };
    println!("Loaded {} models", scene.len());

    let config = AppConfig {
        target_fps: cli.fps,
        drag: cli.drag,
        render_distance: cli.render_distance,
        spin: cli.spin,
    };

    let mut app = TerminalApp::new(scene, start, config).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    println!("Thank you for using SR3D Terminal Renderer!");
    Ok(())
}
