use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use computability_scenes::config::parse_resolution;
use computability_scenes::{
    AppConfig, AssetLoader, BuildOptions, PlanBackend, PreviewBackend, RenderBackend,
    SceneRecord, SceneRegistry,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "computability-scenes")]
#[command(about = "Scene timelines for a video on computability theory", long_about = None)]
struct Cli {
    /// Asset directory (overrides assets.base_path)
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Seed for randomised scene content (overrides scenes.seed)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneSelection {
    /// Scene to build
    #[arg(value_name = "SCENE", required_unless_present = "all")]
    scene: Option<String>,

    /// Build every registered scene in video order
    #[arg(long, conflicts_with = "scene")]
    all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered scenes
    List,
    /// Print the labels derived from the mathematicians folder
    Labels,
    /// Print or write the scheduled timeline as JSON
    Plan {
        #[command(flatten)]
        selection: SceneSelection,

        /// Write `<scene>.json` files into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render preview frames
    Render {
        #[command(flatten)]
        selection: SceneSelection,

        /// Output directory (overrides render.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frames per second (overrides render.fps)
        #[arg(long)]
        fps: Option<u32>,

        /// Frame size as WIDTHxHEIGHT (overrides render.resolution)
        #[arg(long)]
        resolution: Option<String>,

        /// Skip FFmpeg encoding
        #[arg(long)]
        no_encode: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn build_selected(
    registry: &SceneRegistry,
    selection: &SceneSelection,
    options: &BuildOptions,
) -> Result<Vec<SceneRecord>> {
    match (&selection.scene, selection.all) {
        (_, true) => registry.build_all(options),
        (Some(name), false) => Ok(vec![registry.build(name, options)?]),
        (None, false) => anyhow::bail!("Select a scene or pass --all"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    computability_scenes::logging::init_logging("info");

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(assets) = cli.assets {
        config.assets.base_path = assets;
    }
    if let Some(seed) = cli.seed {
        config.scenes.seed = seed;
    }

    let registry = SceneRegistry::builtin();
    let options = BuildOptions::new(&config.assets.base_path, config.scenes.seed);

    match cli.command {
        Commands::List => {
            for scene in registry.iter() {
                println!("{:<16} {}", scene.name(), scene.description());
            }
        }
        Commands::Labels => {
            let mut loader = AssetLoader::new(&config.assets.base_path);
            let assets = loader.scan(Path::new("mathematicians"))?;
            for label in assets.keys() {
                println!("{}", label);
            }
        }
        Commands::Plan { selection, output } => {
            let records = build_selected(&registry, &selection, &options)?;
            match output {
                Some(dir) => {
                    let mut backend = PlanBackend::new(&dir);
                    for record in &records {
                        let out = backend.render(record)?;
                        for file in out.files {
                            println!("Plan written to: {}", file.display());
                        }
                    }
                }
                None if records.len() == 1 => {
                    println!("{}", serde_json::to_string_pretty(&records[0])?);
                }
                None => println!("{}", serde_json::to_string_pretty(&records)?),
            }
        }
        Commands::Render {
            selection,
            output,
            fps,
            resolution,
            no_encode,
        } => {
            let output_dir = output.unwrap_or(config.render.output_dir.clone());
            let fps = fps.unwrap_or(config.render.fps);
            let size = match resolution {
                Some(value) => parse_resolution(&value)?,
                None => config.render.dimensions()?,
            };
            let records = build_selected(&registry, &selection, &options)?;

            let mut backend: Box<dyn RenderBackend> = match config.render.backend.as_str() {
                "plan" => Box::new(PlanBackend::new(&output_dir)),
                "preview" => Box::new(
                    PreviewBackend::new(&output_dir, fps, size)
                        .with_encoding(config.render.encode && !no_encode),
                ),
                other => anyhow::bail!("Unknown render backend '{}'", other),
            };

            for record in &records {
                println!("Rendering {} with {} backend", record.name, backend.name());
                let out = backend.render(record)?;
                println!(
                    "  {} frames, {} files under {}",
                    out.frames,
                    out.files.len(),
                    output_dir.display()
                );
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string(&config)?);
        }
    }

    Ok(())
}
